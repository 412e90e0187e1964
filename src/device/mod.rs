mod global_state;
pub use global_state::*;

mod led;
pub use led::*;

mod fader;
pub use fader::*;

mod hardware;
pub use hardware::*;

mod surface;
pub use surface::*;
