use thiserror::Error;

/// Stable fault taxonomy for conditions that stop the interpreter.
///
/// A raised fault latches in [`crate::RunState::FaultLatched`] until the host
/// resets the machine or restores a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum FaultCode {
    /// Opcode does not belong to the CHIP-8 instruction set.
    #[error("illegal instruction encoding")]
    IllegalInstruction = 0x01,
    /// `CALL` with all stack slots in use.
    #[error("stack overflow")]
    StackOverflow = 0x02,
    /// `RET` with an empty stack.
    #[error("nothing to pop from stack")]
    StackUnderflow = 0x03,
    /// `PC` moved past the end of the 12-bit address space.
    #[error("program counter out of range")]
    ProgramCounterOutOfRange = 0x04,
}

impl FaultCode {
    /// Converts a fault code to its stable byte value.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Converts a stable byte value back into a fault code.
    #[must_use]
    pub const fn from_u8(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(Self::IllegalInstruction),
            0x02 => Some(Self::StackOverflow),
            0x03 => Some(Self::StackUnderflow),
            0x04 => Some(Self::ProgramCounterOutOfRange),
            _ => None,
        }
    }
}

/// Reasons a ROM image is rejected by [`crate::Machine::load_rom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum RomError {
    /// ROM contains no bytes.
    #[error("rom is empty")]
    Empty,
    /// ROM does not fit between the program address and the stack.
    #[error("rom is {size} bytes, at most {max} fit in memory")]
    TooLarge {
        /// Size of the rejected image.
        size: usize,
        /// Largest accepted size.
        max: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::{FaultCode, RomError};

    #[test]
    fn stable_code_roundtrip_is_bijective_for_defined_values() {
        for code in 0x01u8..=0x04 {
            let fault = FaultCode::from_u8(code).expect("defined taxonomy code");
            assert_eq!(fault.as_u8(), code);
        }
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert!(FaultCode::from_u8(0x00).is_none());
        assert!(FaultCode::from_u8(0xFF).is_none());
    }

    #[test]
    fn rom_error_messages_carry_sizes() {
        let err = RomError::TooLarge {
            size: 4000,
            max: 3232,
        };
        assert_eq!(err.to_string(), "rom is 4000 bytes, at most 3232 fit in memory");
        assert_eq!(RomError::Empty.to_string(), "rom is empty");
    }
}
