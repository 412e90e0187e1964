use crate::{Context, MidiOutput, RgbColor, UnitValue};
use approx::AbsDiffEq;
use std::cell::RefCell;
use std::rc::Rc;

impl AbsDiffEq for UnitValue {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.get().abs_diff_eq(&other.get(), epsilon)
    }
}

impl AbsDiffEq for RgbColor {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.r.abs_diff_eq(&other.r, epsilon)
            && self.g.abs_diff_eq(&other.g, epsilon)
            && self.b.abs_diff_eq(&other.b, epsilon)
    }
}

/// Output which remembers everything sent to it.
#[derive(Default)]
pub struct RecordingOutput {
    messages: RefCell<Vec<(Context, Vec<u8>)>>,
}

impl RecordingOutput {
    pub fn new() -> Rc<Self> {
        Default::default()
    }

    /// Returns the bytes of all messages sent so far and forgets them.
    pub fn take(&self) -> Vec<Vec<u8>> {
        self.messages
            .borrow_mut()
            .drain(..)
            .map(|(_, bytes)| bytes)
            .collect()
    }

    pub fn contexts(&self) -> Vec<Context> {
        self.messages.borrow().iter().map(|(c, _)| *c).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.messages.borrow_mut().clear();
    }
}

impl MidiOutput for RecordingOutput {
    fn send_midi(&self, context: Context, bytes: &[u8]) {
        self.messages.borrow_mut().push((context, bytes.to_vec()));
    }
}
