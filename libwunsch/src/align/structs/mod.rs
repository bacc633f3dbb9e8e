mod align_params;
pub use align_params::{AlignParams, MissingPairPolicy, Objective};

mod alignment;
pub use alignment::Alignment;

mod dp_table;
pub use dp_table::{DpTable, ScoreOverflowError};

mod trace;
pub use trace::{Trace, TraceStep};
