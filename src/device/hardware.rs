use crate::mackie::{self, CHANNEL_COUNT, FADER_COUNT, LED_NOTE_COUNT};
use crate::{
    ChannelColorBinding, ChannelDisplayComposer, ChannelTextFormatter, ColorManager, ColorRecord,
    Context, DisplayRow, FaderBinding, GlobalState, LcdDisplay, Led, MeterBinding, OutputPort, Scheduler,
    SegmentDisplayUnit, SurfaceConfig, UnitValue, EXTENDER_UNIT_SYSEX_DEVICE_ID,
    MAIN_UNIT_SYSEX_DEVICE_ID,
};
use derive_more::Display;
use std::rc::Rc;
use tracing::debug;

pub const SMPTE_LAMP_NOTE: u8 = 0x71;
pub const BEATS_LAMP_NOTE: u8 = 0x72;
pub const FLIP_BUTTON_NOTE: u8 = 50;

/// Control section buttons which have a shift action and therefore light up in shift mode:
/// bank left, display, time mode, F1-F8, marker, click, touch, replace, solo, rewind, forward.
pub const SHIFTABLE_BUTTON_NOTES: [u8; 18] = [
    46, 52, 53, 54, 55, 56, 57, 58, 59, 60, 61, 72, 75, 80, 89, 90, 91, 92,
];

/// Index of the main fader, which is addressed like a ninth channel fader.
const MAIN_FADER_INDEX: u8 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum DeviceKind {
    /// Has a control section with transport buttons, main fader and segment display.
    #[display(fmt = "main unit")]
    Main,
    #[display(fmt = "extender")]
    Extender,
}

impl DeviceKind {
    pub fn sysex_device_id(self) -> u8 {
        match self {
            DeviceKind::Main => MAIN_UNIT_SYSEX_DEVICE_ID,
            DeviceKind::Extender => EXTENDER_UNIT_SYSEX_DEVICE_ID,
        }
    }
}

/// Connects the host values of one mixer channel with the channel strip showing them.
#[derive(Debug)]
pub struct ChannelBinding {
    channel_index: usize,
    composer: Rc<ChannelDisplayComposer>,
    meter: Rc<MeterBinding>,
    fader: Rc<FaderBinding>,
    color: Option<Rc<ChannelColorBinding>>,
}

impl ChannelBinding {
    pub fn channel_index(&self) -> usize {
        self.channel_index
    }

    pub fn composer(&self) -> &ChannelDisplayComposer {
        &self.composer
    }

    /// The host reports encoder titles as pair of object title and value title.
    pub fn on_encoder_title_change(&self, context: Context, _object_title: &str, value_title: &str) {
        self.composer.set_parameter_name(context, value_title);
    }

    pub fn on_encoder_display_value_change(&self, context: Context, value: &str) {
        self.composer.set_parameter_value(context, value);
    }

    /// An empty second title is the only reliable sign of an unassigned channel.
    pub fn on_track_title_change(&self, context: Context, title: &str, title2: &str) {
        self.composer.set_channel_name(context, title);
        self.meter.set_unassigned(context, title2.is_empty());
    }

    pub fn on_encoder_color_change(&self, context: Context, color: ColorRecord) {
        if let Some(binding) = &self.color {
            binding.set_encoder_color(context, color);
        }
    }

    pub fn on_track_color_change(&self, context: Context, color: ColorRecord) {
        if let Some(binding) = &self.color {
            binding.set_channel_color(context, color);
        }
    }

    pub fn on_meter_level_change(&self, context: Context, power: UnitValue) {
        self.meter.on_level_change(context, power);
    }

    pub fn on_fader_position_change(&self, context: Context, position: UnitValue) {
        self.fader.on_position_change(context, position);
    }

    pub fn set_parameter_name_override(&self, context: Context, name: &str) {
        self.composer.set_parameter_name_override(context, name);
    }

    pub fn clear_parameter_name_override(&self, context: Context) {
        self.composer.clear_parameter_name_override(context);
    }
}

/// One physical unit of a surface.
#[derive(Debug)]
pub struct Device {
    kind: DeviceKind,
    port: OutputPort,
    lcd: Rc<LcdDisplay>,
    color_manager: Option<Rc<ColorManager>>,
    leds: Vec<Rc<Led>>,
    channels: Vec<ChannelBinding>,
    main_fader: Option<Rc<FaderBinding>>,
}

impl Device {
    pub fn new(
        kind: DeviceKind,
        port: OutputPort,
        config: &SurfaceConfig,
        global_state: &Rc<GlobalState>,
        scheduler: &Rc<Scheduler>,
    ) -> Self {
        let lcd = Rc::new(LcdDisplay::new(port.clone(), config.channel_width()));
        let color_manager = config
            .supports_channel_colors()
            .then(|| Rc::new(ColorManager::new(port.clone())));
        let leds = (0..LED_NOTE_COUNT)
            .map(|note| Rc::new(Led::new(port.clone(), note)))
            .collect();
        let formatter = ChannelTextFormatter::new(config.channel_width());
        let channels = (0..CHANNEL_COUNT)
            .map(|channel_index| {
                let lcd = lcd.clone();
                let composer = ChannelDisplayComposer::new(
                    formatter,
                    global_state.clone(),
                    scheduler.clone(),
                    Box::new(move |context: Context, row: DisplayRow, text: &str| {
                        lcd.send_text(context, row, channel_index, text);
                    }),
                );
                let meter = Rc::new(MeterBinding::new(port.clone(), channel_index as u8));
                bind_meter_to_global_state(&meter, global_state);
                ChannelBinding {
                    channel_index,
                    composer,
                    meter,
                    fader: FaderBinding::new(
                        port.clone(),
                        channel_index as u8,
                        global_state.clone(),
                    ),
                    color: color_manager.as_ref().map(|color_manager| {
                        ChannelColorBinding::new(
                            config.display_color_mode,
                            channel_index,
                            color_manager.clone(),
                        )
                    }),
                }
            })
            .collect();
        {
            let port = port.clone();
            global_state
                .is_global_lcd_meter_mode_vertical
                .add_on_change_callback(move |context, is_vertical| {
                    port.send_sysex(context, &mackie::meter_orientation(*is_vertical));
                });
        }
        let device = Self {
            kind,
            main_fader: (kind == DeviceKind::Main).then(|| {
                FaderBinding::new(port.clone(), MAIN_FADER_INDEX, global_state.clone())
            }),
            port,
            lcd,
            color_manager,
            leds,
            channels,
        };
        if kind == DeviceKind::Main {
            device.bind_control_section_leds(global_state);
        }
        device
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    pub fn port(&self) -> &OutputPort {
        &self.port
    }

    pub fn lcd(&self) -> &LcdDisplay {
        &self.lcd
    }

    pub fn color_manager(&self) -> Option<&ColorManager> {
        self.color_manager.as_deref()
    }

    pub fn channels(&self) -> &[ChannelBinding] {
        &self.channels
    }

    pub fn led(&self, note: u8) -> Option<&Led> {
        self.leds.get(note as usize).map(|led| led.as_ref())
    }

    pub fn main_fader(&self) -> Option<&FaderBinding> {
        self.main_fader.as_deref()
    }

    /// The lamps and port which show the segment display, if this unit has one.
    pub fn segment_display_unit(&self) -> Option<SegmentDisplayUnit> {
        if self.kind != DeviceKind::Main {
            return None;
        }
        Some(SegmentDisplayUnit {
            port: self.port.clone(),
            smpte_lamp: self.leds[SMPTE_LAMP_NOTE as usize].clone(),
            beats_lamp: self.leds[BEATS_LAMP_NOTE as usize].clone(),
        })
    }

    pub fn activate(&self, context: Context) {
        debug!("Activating {} in {context}", self.kind);
        self.reset_leds(context);
        // Units without assigned channels would keep showing white displays otherwise
        if let Some(color_manager) = &self.color_manager {
            color_manager.send_colors(context);
        }
    }

    pub fn send_channel_meter_modes(&self, context: Context, are_channel_meters_enabled: bool) {
        for channel in &self.channels {
            channel
                .meter
                .send_channel_meter_mode(context, are_channel_meters_enabled);
        }
    }

    pub fn deactivate(&self, context: Context) {
        debug!("Deactivating {} in {context}", self.kind);
        if let Some(color_manager) = &self.color_manager {
            color_manager.reset_colors(context);
        }
        self.lcd.clear_displays(context);
        for fader_index in 0..FADER_COUNT {
            self.port
                .send_short(context, mackie::fader_position(fader_index, UnitValue::MIN));
        }
        self.reset_leds(context);
        for encoder_index in 0..CHANNEL_COUNT as u8 {
            self.port
                .send_short(context, mackie::encoder_ring(encoder_index, 0));
        }
    }

    /// Switches off all LEDs, whatever state they are believed to be in.
    fn reset_leds(&self, context: Context) {
        for led in &self.leds {
            led.force(context, false);
        }
    }

    fn bind_control_section_leds(&self, global_state: &GlobalState) {
        let shiftable_leds: Vec<_> = SHIFTABLE_BUTTON_NOTES
            .iter()
            .map(|note| self.leds[*note as usize].clone())
            .collect();
        global_state
            .is_shift_mode_active
            .add_on_change_callback(move |context, is_shift_mode_active| {
                for led in &shiftable_leds {
                    led.set(context, *is_shift_mode_active);
                }
            });
        let flip_led = self.leds[FLIP_BUTTON_NOTE as usize].clone();
        global_state
            .is_flip_mode_active
            .add_on_change_callback(move |context, is_flip_mode_active| {
                flip_led.set(context, *is_flip_mode_active);
            });
    }
}

fn bind_meter_to_global_state(meter: &Rc<MeterBinding>, global_state: &GlobalState) {
    {
        let meter = meter.clone();
        // Meter modes go out before any default-priority listener of this flag runs
        global_state
            .are_channel_meters_enabled
            .add_on_change_callback_with_priority(
                move |context, are_enabled| {
                    meter.send_channel_meter_mode(context, *are_enabled);
                },
                0,
            );
    }
    let meter = meter.clone();
    global_state
        .should_meter_overloads_be_cleared
        .add_on_change_callback(move |context, should_be_cleared| {
            if *should_be_cleared {
                meter.clear_overload(context);
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::RecordingOutput;
    use crate::{ChannelColorSupport, DisplayColorMode, RgbColor};

    const CTX: Context = Context::new(1);

    struct Fixture {
        output: Rc<RecordingOutput>,
        global_state: Rc<GlobalState>,
        scheduler: Rc<Scheduler>,
        device: Device,
    }

    fn fixture(kind: DeviceKind, config: SurfaceConfig) -> Fixture {
        let output = RecordingOutput::new();
        let global_state = Rc::new(GlobalState::new());
        let scheduler = Rc::new(Scheduler::new());
        let port = OutputPort::new(output.clone(), kind.sysex_device_id());
        let device = Device::new(kind, port, &config, &global_state, &scheduler);
        Fixture {
            output,
            global_state,
            scheduler,
            device,
        }
    }

    #[test]
    fn channel_texts_reach_lcd() {
        // Given
        let f = fixture(DeviceKind::Extender, SurfaceConfig::default());
        let channel = &f.device.channels()[3];
        // When
        channel.on_encoder_title_change(CTX, "Stereo In", "Pan Left-Right");
        channel.on_track_title_change(CTX, "Bass", "Volume");
        // Then
        let lcd_message = |offset: u8, text: &[u8]| {
            let mut message = vec![0xf0, 0x00, 0x00, 0x66, 0x15, 0x12, offset];
            message.extend_from_slice(text);
            message.push(0xf7);
            message
        };
        assert_eq!(
            f.output.take(),
            vec![lcd_message(0x15, b" Pan   "), lcd_message(0x4d, b" Bass  ")]
        );
    }

    #[test]
    fn value_display_reverts_after_tick() {
        // Given
        let f = fixture(DeviceKind::Main, SurfaceConfig::default());
        let channel = &f.device.channels()[0];
        channel.on_encoder_title_change(CTX, "", "Volume");
        // When
        channel.on_encoder_display_value_change(CTX, "-6.02");
        // Then
        assert_eq!(f.device.lcd().text(CTX, DisplayRow::Upper, 0), "-6.02  ");
        f.scheduler.tick(CTX);
        assert_eq!(f.device.lcd().text(CTX, DisplayRow::Upper, 0), "Volume ");
    }

    #[test]
    fn unassigned_channel_resets_meter() {
        // Given
        let f = fixture(DeviceKind::Main, SurfaceConfig::default());
        let channel = &f.device.channels()[1];
        channel.on_track_title_change(CTX, "", "");
        f.output.clear();
        // When
        channel.on_meter_level_change(CTX, UnitValue::MAX);
        // Then
        assert!(f.output.is_empty());
    }

    #[test]
    fn shift_and_flip_leds_follow_global_state() {
        // Given
        let f = fixture(DeviceKind::Main, SurfaceConfig::default());
        // When
        f.global_state.is_shift_mode_active.set(CTX, true);
        // Then
        let messages = f.output.take();
        assert_eq!(messages.len(), SHIFTABLE_BUTTON_NOTES.len());
        assert!(messages.contains(&vec![0x90, 91, 0x7f]));
        assert!(f.device.led(54).unwrap().is_on(CTX));
        f.global_state.is_flip_mode_active.set(CTX, true);
        assert_eq!(f.output.take(), vec![vec![0x90, 50, 0x7f]]);
    }

    #[test]
    fn extenders_have_no_control_section() {
        // Given
        let f = fixture(DeviceKind::Extender, SurfaceConfig::default());
        // When
        f.global_state.is_shift_mode_active.set(CTX, true);
        // Then
        assert!(f.output.is_empty());
        assert!(f.device.segment_display_unit().is_none());
        assert!(f.device.main_fader().is_none());
    }

    #[test]
    fn channel_meter_modes_are_sent_first() {
        // Given
        let f = fixture(DeviceKind::Extender, SurfaceConfig::default());
        let order = Rc::new(std::cell::RefCell::new(Vec::new()));
        {
            let output = f.output.clone();
            let order = order.clone();
            f.global_state
                .are_channel_meters_enabled
                .add_on_change_callback(move |_, _| order.borrow_mut().push(output.take().len()));
        }
        // When
        f.global_state.are_channel_meters_enabled.set(CTX, true);
        // Then
        assert_eq!(*order.borrow(), vec![CHANNEL_COUNT]);
    }

    #[test]
    fn colors_only_with_channel_color_support() {
        // Given
        let config = SurfaceConfig {
            display_color_mode: DisplayColorMode::Encoders,
            has_individual_scribble_strips: true,
            channel_color_support: Some(ChannelColorSupport::Behringer),
        };
        let f = fixture(DeviceKind::Main, config);
        let channel = &f.device.channels()[2];
        // When
        channel.on_track_color_change(CTX, ColorRecord::new(true, RgbColor::new(0.0, 0.0, 1.0)));
        // Then
        assert_eq!(f.device.color_manager().unwrap().color_code(CTX, 2), 4);
        assert_eq!(f.output.take().len(), 1);
        let plain = fixture(DeviceKind::Main, SurfaceConfig::default());
        plain.device.channels()[2]
            .on_track_color_change(CTX, ColorRecord::new(true, RgbColor::WHITE));
        assert!(plain.output.is_empty());
    }

    #[test]
    fn deactivation_resets_hardware() {
        // Given
        let f = fixture(DeviceKind::Extender, SurfaceConfig::default());
        // When
        f.device.deactivate(CTX);
        // Then
        let messages = f.output.take();
        // Two LCD rows, faders, LEDs, encoder rings
        assert_eq!(
            messages.len(),
            2 + FADER_COUNT as usize + LED_NOTE_COUNT as usize + CHANNEL_COUNT
        );
        assert_eq!(messages[2], vec![0xe0, 0x00, 0x00]);
        assert_eq!(messages[messages.len() - 1], vec![0xb0, 0x37, 0x00]);
    }
}
