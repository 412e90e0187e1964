mod abbreviate;
pub use abbreviate::*;

mod translations;
pub use translations::*;

mod text;
pub use text::*;
