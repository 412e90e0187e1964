use derive_more::Display;

/// Handle of one active session, handed out by the host.
///
/// All per-session state (state cells, pending timers, last transmitted bytes) is keyed by this
/// handle, so several activations of the same driver never see each other's values.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Debug, Default, Display)]
#[display(fmt = "context #{}", _0)]
pub struct Context(u32);

impl Context {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn id(self) -> u32 {
        self.0
    }
}
