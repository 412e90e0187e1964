use crate::Context;
use helgoboss_midi::{
    Channel, ControllerNumber, KeyNumber, RawShortMessage, ShortMessage, ShortMessageFactory, U7,
};
use std::fmt;
use std::rc::Rc;
use tracing::trace;

/// Sys-ex device id of a Mackie Control main unit.
pub const MAIN_UNIT_SYSEX_DEVICE_ID: u8 = 0x14;

/// Sys-ex device id of a Mackie Control extender unit.
pub const EXTENDER_UNIT_SYSEX_DEVICE_ID: u8 = 0x15;

const SYSEX_START: u8 = 0xf0;
const SYSEX_END: u8 = 0xf7;
const MACKIE_MANUFACTURER_ID: [u8; 3] = [0x00, 0x00, 0x66];

/// The host's MIDI output port of one physical unit.
///
/// Writes are fire-and-forget byte emissions.
pub trait MidiOutput {
    fn send_midi(&self, context: Context, bytes: &[u8]);
}

/// Cheaply cloneable handle to the output of one physical unit.
#[derive(Clone)]
pub struct OutputPort {
    output: Rc<dyn MidiOutput>,
    sysex_device_id: u8,
}

impl OutputPort {
    pub fn new(output: Rc<dyn MidiOutput>, sysex_device_id: u8) -> Self {
        Self {
            output,
            sysex_device_id,
        }
    }

    pub fn sysex_device_id(&self) -> u8 {
        self.sysex_device_id
    }

    pub fn send_midi(&self, context: Context, bytes: &[u8]) {
        trace!("Sending {bytes:02X?} in {context}");
        self.output.send_midi(context, bytes);
    }

    pub fn send_short(&self, context: Context, message: RawShortMessage) {
        let (status_byte, data_byte_1, data_byte_2) = message.to_bytes();
        match status_byte & 0xf0 {
            // Program change and channel pressure carry only one data byte
            0xc0 | 0xd0 => self.send_midi(context, &[status_byte, data_byte_1.get()]),
            _ => self.send_midi(context, &[status_byte, data_byte_1.get(), data_byte_2.get()]),
        }
    }

    /// Sends a note-on on MIDI channel 1, which is how the surface addresses buttons and LEDs.
    pub fn send_note_on(&self, context: Context, note: u8, velocity: u8) {
        let message =
            RawShortMessage::note_on(Channel::new(0), KeyNumber::new(note), U7::new(velocity));
        self.send_short(context, message);
    }

    pub fn send_control_change(&self, context: Context, channel: u8, controller: u8, value: u8) {
        let message = RawShortMessage::control_change(
            Channel::new(channel),
            ControllerNumber::new(controller),
            U7::new(value),
        );
        self.send_short(context, message);
    }

    /// Wraps the given payload in a Mackie Control sys-ex frame addressed to this unit.
    pub fn send_sysex(&self, context: Context, payload: &[u8]) {
        let mut bytes = Vec::with_capacity(payload.len() + 6);
        bytes.push(SYSEX_START);
        bytes.extend_from_slice(&MACKIE_MANUFACTURER_ID);
        bytes.push(self.sysex_device_id);
        bytes.extend_from_slice(payload);
        bytes.push(SYSEX_END);
        self.send_midi(context, &bytes);
    }
}

impl fmt::Debug for OutputPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputPort")
            .field("sysex_device_id", &self.sysex_device_id)
            .finish()
    }
}
