//! Encoders for the Mackie Control messages the surface understands.
//!
//! Short messages are returned as [`RawShortMessage`]s, sys-ex messages as payloads which still
//! need to be framed by [`crate::OutputPort::send_sysex`].
use crate::UnitValue;
use helgoboss_midi::{
    Channel, ControllerNumber, KeyNumber, RawShortMessage, ShortMessageFactory, U14, U7,
};

/// Number of channel strips per physical unit.
pub const CHANNEL_COUNT: usize = 8;

/// Channel faders plus the main fader.
pub const FADER_COUNT: u8 = 9;

/// LEDs are addressed by notes below this one.
pub const LED_NOTE_COUNT: u8 = 0x76;

pub const LED_ON_VELOCITY: u8 = 0x7f;
pub const LED_OFF_VELOCITY: u8 = 0x00;

/// Highest level a channel meter can show.
pub const METER_LEVEL_MAX: u8 = 0x0e;

/// Level value which clears the overload indicator instead of setting a level.
pub const METER_CLEAR_OVERLOAD: u8 = 0x0f;

/// Number of characters of one channel cell within an LCD row.
pub const LCD_CELL_WIDTH: usize = 7;

/// Number of characters of one LCD row.
pub const LCD_ROW_WIDTH: usize = CHANNEL_COUNT * LCD_CELL_WIDTH;

const PITCH_BEND_MAX: u32 = 0x3fff;
const SEGMENT_DISPLAY_CHANNEL: u8 = 15;
const SEGMENT_CELL_CONTROLLER_OFFSET: u8 = 0x40;
const ENCODER_RING_CONTROLLER_OFFSET: u8 = 0x30;

const LCD_TEXT_COMMAND: u8 = 0x12;
const CHANNEL_METER_MODE_COMMAND: u8 = 0x20;
const METER_ORIENTATION_COMMAND: u8 = 0x21;
const SCRIBBLE_STRIP_COLORS_COMMAND: u8 = 0x72;

/// Signal LED + peak hold + LCD level meter
const CHANNEL_METER_MODE_ENABLED: u8 = 0x07;
/// Signal LED + peak hold only
const CHANNEL_METER_MODE_DISABLED: u8 = 0x05;

/// Note-on which switches an LED on or off.
pub fn led(note: u8, on: bool) -> RawShortMessage {
    let velocity = if on {
        LED_ON_VELOCITY
    } else {
        LED_OFF_VELOCITY
    };
    RawShortMessage::note_on(Channel::new(0), KeyNumber::new(note), U7::new(velocity))
}

/// Control change which writes an encoded byte to a 7-segment cell.
pub fn segment_cell(slot: u8, value: u8) -> RawShortMessage {
    RawShortMessage::control_change(
        Channel::new(SEGMENT_DISPLAY_CHANNEL),
        ControllerNumber::new(SEGMENT_CELL_CONTROLLER_OFFSET + slot),
        U7::new(value),
    )
}

/// Channel pressure which sets a channel meter. `level` is either within
/// `0..=METER_LEVEL_MAX` or [`METER_CLEAR_OVERLOAD`].
pub fn meter_level(meter: u8, level: u8) -> RawShortMessage {
    RawShortMessage::channel_pressure(Channel::new(0), U7::new((meter << 4) | (level & 0x0f)))
}

/// Converts a host meter power value into a channel meter level.
pub fn meter_level_from_power(power: UnitValue) -> u8 {
    // Power to linear, then scale to the meter's resolution
    let level = (power.get().sqrt() * METER_LEVEL_MAX as f64).ceil();
    num::clamp(level, 0.0, METER_LEVEL_MAX as f64) as u8
}

/// Pitch bend which moves a motorized fader.
pub fn fader_position(fader: u8, position: UnitValue) -> RawShortMessage {
    let value = position.to_discrete(PITCH_BEND_MAX) as u16;
    RawShortMessage::pitch_bend_change(Channel::new(fader), U14::new(value))
}

/// Control change which sets an encoder's LED ring.
pub fn encoder_ring(encoder: u8, value: u8) -> RawShortMessage {
    RawShortMessage::control_change(
        Channel::new(0),
        ControllerNumber::new(ENCODER_RING_CONTROLLER_OFFSET + encoder),
        U7::new(value),
    )
}

/// Character offset of a channel cell within the LCD.
pub fn lcd_offset(row: usize, channel: usize) -> u8 {
    (row * LCD_ROW_WIDTH + channel * LCD_CELL_WIDTH) as u8
}

/// Sys-ex payload which writes the given ASCII characters to the LCD, starting at `offset`.
pub fn lcd_text(offset: u8, chars: &[u8]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(chars.len() + 2);
    payload.push(LCD_TEXT_COMMAND);
    payload.push(offset);
    payload.extend(chars.iter().map(|c| c & 0x7f));
    payload
}

/// Sys-ex payload which enables or disables the LCD level meter of a channel.
pub fn channel_meter_mode(channel: u8, is_lcd_meter_enabled: bool) -> [u8; 3] {
    let mode = if is_lcd_meter_enabled {
        CHANNEL_METER_MODE_ENABLED
    } else {
        CHANNEL_METER_MODE_DISABLED
    };
    [CHANNEL_METER_MODE_COMMAND, channel, mode]
}

/// Sys-ex payload which sets the orientation of all LCD level meters.
pub fn meter_orientation(is_vertical: bool) -> [u8; 2] {
    [METER_ORIENTATION_COMMAND, is_vertical as u8]
}

/// Sys-ex payload which sets the backlight colors of all scribble strips.
pub fn scribble_strip_colors(color_codes: &[u8; CHANNEL_COUNT]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(CHANNEL_COUNT + 1);
    payload.push(SCRIBBLE_STRIP_COLORS_COMMAND);
    payload.extend_from_slice(color_codes);
    payload
}
