use crate::{
    ChannelBinding, Context, Device, DeviceKind, GlobalState, MidiOutput, OutputPort, Scheduler,
    SegmentDisplay, StateCell, SurfaceConfig,
};
use std::rc::Rc;
use tracing::info;

/// Output of one physical unit as handed over by the host.
pub struct SurfaceUnit {
    pub kind: DeviceKind,
    pub output: Rc<dyn MidiOutput>,
}

impl SurfaceUnit {
    pub fn new(kind: DeviceKind, output: Rc<dyn MidiOutput>) -> Self {
        Self { kind, output }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
struct LocatorPosition {
    time: String,
    time_format: String,
}

/// A complete surface consisting of one or more chained units which together form one mixer.
#[derive(Debug)]
pub struct Surface {
    config: SurfaceConfig,
    global_state: Rc<GlobalState>,
    scheduler: Rc<Scheduler>,
    devices: Vec<Device>,
    segment_display: SegmentDisplay,
    is_activated: StateCell<bool>,
    /// The host reports the locator position before the surface is activated.
    initial_locator_position: StateCell<LocatorPosition>,
}

impl Surface {
    /// Creates the surface for the given units in channel order.
    pub fn new(config: SurfaceConfig, units: Vec<SurfaceUnit>) -> Self {
        let global_state = Rc::new(GlobalState::new());
        let scheduler = Rc::new(Scheduler::new());
        let devices: Vec<_> = units
            .into_iter()
            .map(|unit| {
                let port = OutputPort::new(unit.output, unit.kind.sysex_device_id());
                Device::new(unit.kind, port, &config, &global_state, &scheduler)
            })
            .collect();
        let segment_display = SegmentDisplay::new(
            devices
                .iter()
                .filter_map(|device| device.segment_display_unit())
                .collect(),
        );
        Self {
            config,
            global_state,
            scheduler,
            devices,
            segment_display,
            is_activated: StateCell::new(false),
            initial_locator_position: StateCell::new(Default::default()),
        }
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn global_state(&self) -> &GlobalState {
        &self.global_state
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn segment_display(&self) -> &SegmentDisplay {
        &self.segment_display
    }

    /// All channel strips of all units in mixer order.
    pub fn channels(&self) -> impl Iterator<Item = &ChannelBinding> {
        self.devices.iter().flat_map(|device| device.channels())
    }

    pub fn channel(&self, index: usize) -> Option<&ChannelBinding> {
        self.channels().nth(index)
    }

    pub fn is_activated(&self, context: Context) -> bool {
        self.is_activated.get(context)
    }

    pub fn activate(&self, context: Context) {
        info!("Activating surface with {} units in {context}", self.devices.len());
        for device in &self.devices {
            device.activate(context);
        }
        self.global_state.are_motors_active.set(context, true);
        let are_channel_meters_enabled = self.global_state.are_channel_meters_enabled.get(context);
        for device in &self.devices {
            device.send_channel_meter_modes(context, are_channel_meters_enabled);
        }
        self.is_activated.set(context, true);
        let LocatorPosition { time, time_format } = self.initial_locator_position.get(context);
        self.segment_display.init_time(context, &time, &time_format);
    }

    pub fn deactivate(&self, context: Context) {
        info!("Deactivating surface in {context}");
        self.segment_display.clear_assignment(context);
        self.segment_display.clear_time(context);
        for device in &self.devices {
            device.deactivate(context);
        }
        self.is_activated.set(context, false);
    }

    /// Shows the transport position once the surface is activated. Until then, the latest
    /// position is remembered.
    pub fn on_transport_locator_change(&self, context: Context, time: &str, time_format: &str) {
        if self.is_activated.get(context) {
            self.segment_display.update_time(context, time, time_format);
        } else {
            self.initial_locator_position.set(
                context,
                LocatorPosition {
                    time: time.to_string(),
                    time_format: time_format.to_string(),
                },
            );
        }
    }

    /// Toggles between parameter names and values or, in shift mode, flips the display rows.
    pub fn on_display_button_press(&self, context: Context) {
        if self.global_state.is_shift_mode_active.get(context) {
            self.global_state.are_display_rows_flipped.toggle(context);
        } else {
            self.global_state.is_value_display_mode_active.toggle(context);
        }
    }

    /// Advances pending timers. The host calls this periodically.
    pub fn tick(&self, context: Context) {
        self.scheduler.tick(context);
    }
}
