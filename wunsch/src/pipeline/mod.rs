mod align;
pub use align::*;

mod generate;
pub use generate::*;

mod output_stage;
pub use output_stage::*;
