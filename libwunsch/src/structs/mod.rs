pub mod cost_model;
pub use cost_model::{Cost, CostModel, Delimiter, MalformedTableError, UnknownPairError};

pub mod sequence;
pub use sequence::Sequence;

pub mod sequence_pair;
pub use sequence_pair::{MalformedLinePolicy, MalformedPairError, PairFile, SequencePair};
