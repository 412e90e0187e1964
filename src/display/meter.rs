use crate::mackie::{self, METER_CLEAR_OVERLOAD};
use crate::{Context, OutputPort, StateCell, UnitValue};
use tracing::trace;

/// The level meter of one channel.
#[derive(Debug)]
pub struct MeterBinding {
    port: OutputPort,
    meter_id: u8,
    is_unassigned: StateCell<bool>,
}

impl MeterBinding {
    pub fn new(port: OutputPort, meter_id: u8) -> Self {
        Self {
            port,
            meter_id,
            is_unassigned: StateCell::new(false),
        }
    }

    /// Shows the given host meter power value. Ignored for unassigned channels because the host
    /// keeps sending stale levels for them, except for zero.
    pub fn on_level_change(&self, context: Context, power: UnitValue) {
        if self.is_unassigned.get(context) && !power.is_zero() {
            return;
        }
        self.send_level(context, mackie::meter_level_from_power(power));
    }

    /// Resets the meter whenever the channel is reported to be unassigned.
    pub fn set_unassigned(&self, context: Context, is_unassigned: bool) {
        self.is_unassigned.set(context, is_unassigned);
        if is_unassigned {
            self.send_level(context, 0);
        }
    }

    pub fn clear_overload(&self, context: Context) {
        self.send_level(context, METER_CLEAR_OVERLOAD);
    }

    /// Enables or disables the level meter next to the channel's LCD texts.
    pub fn send_channel_meter_mode(&self, context: Context, is_lcd_meter_enabled: bool) {
        self.port.send_sysex(
            context,
            &mackie::channel_meter_mode(self.meter_id, is_lcd_meter_enabled),
        );
    }

    fn send_level(&self, context: Context, level: u8) {
        trace!("Sending level {level} to meter {}", self.meter_id);
        self.port
            .send_short(context, mackie::meter_level(self.meter_id, level));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::RecordingOutput;
    use crate::MAIN_UNIT_SYSEX_DEVICE_ID;
    use std::rc::Rc;

    const CTX: Context = Context::new(1);

    fn meter(output: &Rc<RecordingOutput>, meter_id: u8) -> MeterBinding {
        MeterBinding::new(
            OutputPort::new(output.clone(), MAIN_UNIT_SYSEX_DEVICE_ID),
            meter_id,
        )
    }

    #[test]
    fn sends_scaled_levels() {
        // Given
        let output = RecordingOutput::new();
        let meter = meter(&output, 3);
        // When
        meter.on_level_change(CTX, UnitValue::new(0.25));
        meter.on_level_change(CTX, UnitValue::MAX);
        // Then
        assert_eq!(output.take(), vec![vec![0xd0, 0x37], vec![0xd0, 0x3e]]);
    }

    #[test]
    fn unassigned_channels_only_accept_zero() {
        // Given
        let output = RecordingOutput::new();
        let meter = meter(&output, 0);
        // When
        meter.set_unassigned(CTX, true);
        meter.on_level_change(CTX, UnitValue::new(0.5));
        meter.on_level_change(CTX, UnitValue::MIN);
        // Then
        assert_eq!(output.take(), vec![vec![0xd0, 0x00], vec![0xd0, 0x00]]);
        meter.set_unassigned(CTX, false);
        meter.on_level_change(CTX, UnitValue::MAX);
        assert_eq!(output.take(), vec![vec![0xd0, 0x0e]]);
    }

    #[test]
    fn overload_and_meter_mode() {
        // Given
        let output = RecordingOutput::new();
        let meter = meter(&output, 5);
        // When
        meter.clear_overload(CTX);
        meter.send_channel_meter_mode(CTX, true);
        // Then
        assert_eq!(
            output.take(),
            vec![
                vec![0xd0, 0x5f],
                vec![0xf0, 0x00, 0x00, 0x66, 0x14, 0x20, 0x05, 0x07, 0xf7]
            ]
        );
    }
}
