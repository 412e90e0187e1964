mod color_util;
pub use color_util::*;

mod color;
pub use color::*;

mod lcd;
pub use lcd::*;

mod channel_text;
pub use channel_text::*;

mod segment;
pub use segment::*;

mod meter;
pub use meter::*;
