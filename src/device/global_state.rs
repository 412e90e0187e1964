use crate::StateCell;

/// Session-wide flags shared by all units of a surface.
#[derive(Debug)]
pub struct GlobalState {
    /// Whether the name/value display rows show parameter values instead of parameter names.
    pub is_value_display_mode_active: StateCell<bool>,
    /// Whether the channel names are shown in the upper row instead of the lower one.
    pub are_display_rows_flipped: StateCell<bool>,
    pub is_shift_mode_active: StateCell<bool>,
    pub is_flip_mode_active: StateCell<bool>,
    pub are_motors_active: StateCell<bool>,
    /// Whether the LCDs show level meters next to the channel texts.
    pub are_channel_meters_enabled: StateCell<bool>,
    pub should_meter_overloads_be_cleared: StateCell<bool>,
    pub is_global_lcd_meter_mode_vertical: StateCell<bool>,
}

impl GlobalState {
    pub fn new() -> Self {
        Self {
            is_value_display_mode_active: StateCell::new(false),
            are_display_rows_flipped: StateCell::new(false),
            is_shift_mode_active: StateCell::new(false),
            is_flip_mode_active: StateCell::new(false),
            are_motors_active: StateCell::new(false),
            are_channel_meters_enabled: StateCell::new(false),
            should_meter_overloads_be_cleared: StateCell::new(false),
            is_global_lcd_meter_mode_vertical: StateCell::new(false),
        }
    }
}

impl Default for GlobalState {
    fn default() -> Self {
        Self::new()
    }
}
