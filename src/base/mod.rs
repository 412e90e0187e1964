mod context;
pub use context::*;

mod unit;
pub use unit::*;

mod state_cell;
pub use state_cell::*;

mod scheduler;
pub use scheduler::*;
