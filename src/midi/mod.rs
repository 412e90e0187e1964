mod output;
pub use output::*;

pub mod mackie;
