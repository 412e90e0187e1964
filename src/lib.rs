mod base;
pub use base::*;

mod format;
pub use format::*;

mod midi;
pub use midi::*;

mod display;
pub use display::*;

mod device;
pub use device::*;

mod config;
pub use config::*;

#[cfg(test)]
mod test_util;
