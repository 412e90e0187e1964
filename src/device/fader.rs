use crate::mackie;
use crate::{Context, GlobalState, OutputPort, StateCell, UnitValue};
use std::rc::Rc;
use tracing::trace;

/// A motorized fader which follows its host value while motors are active.
#[derive(Debug)]
pub struct FaderBinding {
    port: OutputPort,
    fader_index: u8,
    global_state: Rc<GlobalState>,
    last_position: StateCell<UnitValue>,
}

impl FaderBinding {
    pub fn new(port: OutputPort, fader_index: u8, global_state: Rc<GlobalState>) -> Rc<Self> {
        let binding = Rc::new(Self {
            port,
            fader_index,
            global_state: global_state.clone(),
            last_position: StateCell::new(UnitValue::MIN),
        });
        let weak = Rc::downgrade(&binding);
        global_state
            .are_motors_active
            .add_on_change_callback(move |context, are_motors_active| {
                if !*are_motors_active {
                    return;
                }
                if let Some(binding) = weak.upgrade() {
                    binding.send_position(context, binding.last_position.get(context));
                }
            });
        binding
    }

    pub fn on_position_change(&self, context: Context, position: UnitValue) {
        self.last_position.set(context, position);
        if self.global_state.are_motors_active.get(context) {
            self.send_position(context, position);
        }
    }

    fn send_position(&self, context: Context, position: UnitValue) {
        trace!("Moving fader {} to {}", self.fader_index, position.get());
        self.port
            .send_short(context, mackie::fader_position(self.fader_index, position));
    }
}
