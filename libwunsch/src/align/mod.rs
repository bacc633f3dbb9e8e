pub mod structs;

mod engine;
pub use engine::{align, AlignmentEngine};

mod needleman_wunsch;
pub use needleman_wunsch::build_table;

mod traceback;
pub use traceback::{traceback, NoAlignmentError, TracebackError};
