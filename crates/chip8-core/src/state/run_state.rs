use crate::FaultCode;

/// Execution-state machine for host-observable control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RunState {
    /// Ready to execute the next instruction.
    #[default]
    Running,
    /// Blocked in `LD Vx, K` until a key is pressed and released.
    WaitingForKey {
        /// Destination register for the key value.
        register: u8,
        /// Key seen held down, stored once it is released.
        pressed: Option<u8>,
    },
    /// Fault is latched and no further progress is possible without reset/restore.
    FaultLatched(FaultCode),
}

impl RunState {
    /// Returns the currently latched fault, if this state is fault-latched.
    #[must_use]
    pub const fn latched_fault(self) -> Option<FaultCode> {
        match self {
            Self::FaultLatched(cause) => Some(cause),
            Self::Running | Self::WaitingForKey { .. } => None,
        }
    }

    /// Returns `true` while blocked on `LD Vx, K`.
    #[must_use]
    pub const fn is_waiting_for_key(self) -> bool {
        matches!(self, Self::WaitingForKey { .. })
    }
}
