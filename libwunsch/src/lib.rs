pub mod align;
pub mod alphabet;
pub mod structs;
pub mod util;
