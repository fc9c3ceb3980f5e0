mod ingredients;
mod preferences;
mod recipes;

pub use ingredients::*;
pub use preferences::*;
pub use recipes::*;
