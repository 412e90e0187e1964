use crate::{
    ChannelTextFormatter, Context, DisplayRow, GlobalState, Scheduler, StateCell, TimerKey,
};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU32, Ordering};

/// Receives the text which should be shown in a row of the channel's display cell.
pub type TextSink = Box<dyn Fn(Context, DisplayRow, &str)>;

/// Number of ticks a parameter value stays visible after it changed.
const LOCAL_VALUE_MODE_TICKS: u32 = 1;

static NEXT_COMPOSER_ID: AtomicU32 = AtomicU32::new(0);

/// Decides what the two display rows of one channel show.
///
/// One row shows the parameter name or value of the channel's encoder, the other one shows the
/// channel name. Which row is which depends on [`GlobalState::are_display_rows_flipped`]. A
/// parameter value is shown if value display mode is active or, for a short while, after the
/// value changed.
pub struct ChannelDisplayComposer {
    timer_key: TimerKey,
    formatter: ChannelTextFormatter,
    global_state: Rc<GlobalState>,
    scheduler: Rc<Scheduler>,
    send_text: TextSink,
    parameter_name: StateCell<String>,
    parameter_name_override: StateCell<Option<String>>,
    parameter_value: StateCell<String>,
    channel_name: StateCell<String>,
    is_local_value_mode_active: StateCell<bool>,
    weak_self: Weak<Self>,
}

impl ChannelDisplayComposer {
    pub fn new(
        formatter: ChannelTextFormatter,
        global_state: Rc<GlobalState>,
        scheduler: Rc<Scheduler>,
        send_text: TextSink,
    ) -> Rc<Self> {
        let id = NEXT_COMPOSER_ID.fetch_add(1, Ordering::Relaxed);
        let composer = Rc::new_cyclic(|weak_self: &Weak<Self>| Self {
            timer_key: TimerKey::new("updateDisplay", id),
            formatter,
            global_state: global_state.clone(),
            scheduler,
            send_text,
            parameter_name: StateCell::new(String::new()),
            parameter_name_override: StateCell::new(None),
            parameter_value: StateCell::new(String::new()),
            channel_name: StateCell::new(String::new()),
            is_local_value_mode_active: StateCell::new(false),
            weak_self: weak_self.clone(),
        });
        let weak = Rc::downgrade(&composer);
        global_state
            .is_value_display_mode_active
            .add_on_change_callback(move |context, _| {
                if let Some(composer) = weak.upgrade() {
                    composer.update_name_value_row(context);
                }
            });
        let weak = Rc::downgrade(&composer);
        global_state
            .are_display_rows_flipped
            .add_on_change_callback(move |context, _| {
                if let Some(composer) = weak.upgrade() {
                    composer.update_name_value_row(context);
                    composer.update_channel_name_row(context);
                }
            });
        composer
    }

    pub fn timer_key(&self) -> TimerKey {
        self.timer_key
    }

    pub fn set_parameter_name(&self, context: Context, name: &str) {
        // Name changes win over a pending value display
        self.is_local_value_mode_active.set(context, false);
        self.parameter_name
            .set(context, self.formatter.parameter_name(name));
        self.update_name_value_row(context);
    }

    /// Replaces the parameter name until the override is cleared. Takes effect with the next
    /// update of the name/value row.
    pub fn set_parameter_name_override(&self, context: Context, name: &str) {
        self.parameter_name_override
            .set(context, Some(self.formatter.parameter_name_override(name)));
    }

    pub fn clear_parameter_name_override(&self, context: Context) {
        self.parameter_name_override.set(context, None);
    }

    pub fn set_parameter_value(&self, context: Context, value: &str) {
        self.parameter_value
            .set(context, self.formatter.parameter_value(value));
        self.is_local_value_mode_active.set(context, true);
        self.update_name_value_row(context);
        let weak_self = self.weak_self.clone();
        self.scheduler.set_timeout(
            context,
            self.timer_key,
            LOCAL_VALUE_MODE_TICKS,
            move |context| {
                if let Some(composer) = weak_self.upgrade() {
                    composer.is_local_value_mode_active.set(context, false);
                    composer.update_name_value_row(context);
                }
            },
        );
    }

    pub fn set_channel_name(&self, context: Context, name: &str) {
        self.channel_name
            .set(context, self.formatter.channel_name(name));
        self.update_channel_name_row(context);
    }

    pub fn name_value_row(&self, context: Context) -> DisplayRow {
        if self.global_state.are_display_rows_flipped.get(context) {
            DisplayRow::Lower
        } else {
            DisplayRow::Upper
        }
    }

    /// Returns the text the name/value row should currently show.
    pub fn name_value_text(&self, context: Context) -> String {
        if self.is_local_value_mode_active.get(context)
            || self.global_state.is_value_display_mode_active.get(context)
        {
            self.parameter_value.get(context)
        } else {
            self.parameter_name_override
                .get(context)
                .unwrap_or_else(|| self.parameter_name.get(context))
        }
    }

    fn update_name_value_row(&self, context: Context) {
        let row = self.name_value_row(context);
        (self.send_text)(context, row, &self.name_value_text(context));
    }

    fn update_channel_name_row(&self, context: Context) {
        let row = self.name_value_row(context).other();
        (self.send_text)(context, row, &self.channel_name.get(context));
    }
}

impl fmt::Debug for ChannelDisplayComposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelDisplayComposer")
            .field("timer_key", &self.timer_key)
            .field("formatter", &self.formatter)
            .finish()
    }
}
