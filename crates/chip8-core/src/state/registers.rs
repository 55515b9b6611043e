use crate::memory::{PROGRAM_ADDRESS, STACK_ADDRESS};

/// Number of general-purpose registers (`V0..VF`).
pub const GENERAL_REGISTER_COUNT: usize = 16;
/// Index of the flag register `VF`.
pub const FLAG_REGISTER: u8 = 0xF;

/// Full architectural register state of the interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Registers {
    v: [u8; GENERAL_REGISTER_COUNT],
    i: u16,
    sp: u16,
    pc: u16,
    delay_timer: u8,
    sound_timer: u8,
}

impl Default for Registers {
    fn default() -> Self {
        Self {
            v: [0; GENERAL_REGISTER_COUNT],
            i: 0,
            sp: STACK_ADDRESS,
            pc: PROGRAM_ADDRESS,
            delay_timer: 0,
            sound_timer: 0,
        }
    }
}

impl Registers {
    /// Reads `Vx`; only the low nibble of `x` is used.
    #[must_use]
    pub const fn v(&self, x: u8) -> u8 {
        self.v[(x & 0x0F) as usize]
    }

    /// Writes `Vx`; only the low nibble of `x` is used.
    pub const fn set_v(&mut self, x: u8, value: u8) {
        self.v[(x & 0x0F) as usize] = value;
    }

    /// Reads the flag register `VF`.
    #[must_use]
    pub const fn vf(&self) -> u8 {
        self.v[FLAG_REGISTER as usize]
    }

    /// Writes the flag register `VF`.
    pub const fn set_vf(&mut self, value: u8) {
        self.v[FLAG_REGISTER as usize] = value;
    }

    /// All general-purpose registers in index order.
    #[must_use]
    pub const fn v_all(&self) -> &[u8; GENERAL_REGISTER_COUNT] {
        &self.v
    }

    /// Reads the address register `I`.
    #[must_use]
    pub const fn i(&self) -> u16 {
        self.i
    }

    /// Writes the address register `I`.
    pub const fn set_i(&mut self, value: u16) {
        self.i = value;
    }

    /// Reads the stack pointer (an absolute memory address).
    #[must_use]
    pub const fn sp(&self) -> u16 {
        self.sp
    }

    /// Writes the stack pointer.
    pub const fn set_sp(&mut self, value: u16) {
        self.sp = value;
    }

    /// Reads the program counter.
    #[must_use]
    pub const fn pc(&self) -> u16 {
        self.pc
    }

    /// Writes the program counter.
    pub const fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    /// Reads the delay timer.
    #[must_use]
    pub const fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    /// Writes the delay timer.
    pub const fn set_delay_timer(&mut self, value: u8) {
        self.delay_timer = value;
    }

    /// Reads the sound timer.
    #[must_use]
    pub const fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    /// Writes the sound timer.
    pub const fn set_sound_timer(&mut self, value: u8) {
        self.sound_timer = value;
    }

    /// Decrements both timers by one, saturating at zero.
    pub const fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{Registers, FLAG_REGISTER, GENERAL_REGISTER_COUNT};
    use crate::memory::{PROGRAM_ADDRESS, STACK_ADDRESS};

    #[test]
    fn defaults_point_at_program_and_stack_base() {
        let regs = Registers::default();
        assert_eq!(regs.pc(), PROGRAM_ADDRESS);
        assert_eq!(regs.sp(), STACK_ADDRESS);
        assert_eq!(regs.i(), 0);
        assert_eq!(regs.v_all(), &[0; GENERAL_REGISTER_COUNT]);
    }

    #[test]
    fn general_registers_are_independent() {
        let mut regs = Registers::default();
        for x in 0u8..16 {
            regs.set_v(x, x.wrapping_mul(17));
        }
        for x in 0u8..16 {
            assert_eq!(regs.v(x), x.wrapping_mul(17));
        }
        assert_eq!(regs.vf(), regs.v(FLAG_REGISTER));
    }

    #[test]
    fn register_index_uses_low_nibble() {
        let mut regs = Registers::default();
        regs.set_v(0x13, 0xAA);
        assert_eq!(regs.v(0x3), 0xAA);
    }

    #[test]
    fn timers_saturate_at_zero() {
        let mut regs = Registers::default();
        regs.set_delay_timer(1);
        regs.set_sound_timer(0);
        regs.tick_timers();
        assert_eq!(regs.delay_timer(), 0);
        assert_eq!(regs.sound_timer(), 0);
        regs.tick_timers();
        assert_eq!(regs.delay_timer(), 0);
    }
}
