use crate::mackie;
use crate::{Context, OutputPort, StateCell};
use tracing::trace;

/// A button LED or display lamp, addressed by note number.
#[derive(Debug)]
pub struct Led {
    port: OutputPort,
    note: u8,
    is_on: StateCell<bool>,
}

impl Led {
    pub fn new(port: OutputPort, note: u8) -> Self {
        Self {
            port,
            note,
            is_on: StateCell::new(false),
        }
    }

    pub fn note(&self) -> u8 {
        self.note
    }

    pub fn is_on(&self, context: Context) -> bool {
        self.is_on.get(context)
    }

    /// Switches the LED unless it's known to be in the given state already.
    ///
    /// Returns whether something was transmitted.
    pub fn set(&self, context: Context, on: bool) -> bool {
        if !self.is_on.set(context, on) {
            return false;
        }
        self.send(context, on);
        true
    }

    /// Switches the LED even if it's known to be in the given state already. Used when the
    /// hardware state is unknown.
    pub fn force(&self, context: Context, on: bool) {
        self.is_on.set(context, on);
        self.send(context, on);
    }

    fn send(&self, context: Context, on: bool) {
        trace!("Switching LED {} {}", self.note, if on { "on" } else { "off" });
        self.port.send_short(context, mackie::led(self.note, on));
    }
}
