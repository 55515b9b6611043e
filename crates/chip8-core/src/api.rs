//! Public host-facing API types for embedding the interpreter core.

use std::path::Path;

use crate::memory::{new_address_space, FONT, FONT_ADDRESS, MAX_ROM_SIZE, PROGRAM_ADDRESS};
use crate::timing::DEFAULT_INSTRUCTIONS_PER_FRAME;
use crate::{FaultCode, Keypad, Registers, Rng, RomError, RunState, DEFAULT_RNG_SEED};

/// Behavior switches where CHIP-8 interpreters historically disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[allow(clippy::struct_excessive_bools)]
pub struct Quirks {
    /// `8xy6`/`8xyE` shift `Vy` into `Vx` instead of shifting `Vx` in place.
    pub shift_uses_vy: bool,
    /// `Fx55`/`Fx65` leave `I` pointing past the last register transferred.
    pub memory_increments_i: bool,
    /// `Bnnn` adds `Vx` (the high nibble of `nnn`) instead of `V0`.
    pub jump_uses_vx: bool,
    /// `8xy1`/`8xy2`/`8xy3` clear `VF`.
    pub logic_resets_vf: bool,
    /// Sprites are cut off at the screen edge instead of wrapping.
    pub clip_sprites: bool,
}

impl Default for Quirks {
    fn default() -> Self {
        Self::modern()
    }
}

impl Quirks {
    /// Behavior of the original COSMAC VIP interpreter.
    #[must_use]
    pub const fn cosmac() -> Self {
        Self {
            shift_uses_vy: true,
            memory_increments_i: true,
            jump_uses_vx: false,
            logic_resets_vf: true,
            clip_sprites: true,
        }
    }

    /// Behavior of common present-day interpreters; what most ROMs expect.
    #[must_use]
    pub const fn modern() -> Self {
        Self {
            shift_uses_vy: false,
            memory_increments_i: false,
            jump_uses_vx: false,
            logic_resets_vf: false,
            clip_sprites: true,
        }
    }

    /// Behavior of CHIP-48 and SUPER-CHIP on the HP-48, including the
    /// `Bxnn` jump.
    #[must_use]
    pub const fn schip() -> Self {
        Self {
            jump_uses_vx: true,
            ..Self::modern()
        }
    }
}

/// Top-level configuration for a core instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CoreConfig {
    /// Instructions executed per 60 Hz frame.
    pub instructions_per_frame: u32,
    /// Interpreter compatibility switches.
    pub quirks: Quirks,
    /// Seed for the `RND` generator, applied on every reset.
    pub rng_seed: u32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            instructions_per_frame: DEFAULT_INSTRUCTIONS_PER_FRAME,
            quirks: Quirks::modern(),
            rng_seed: DEFAULT_RNG_SEED,
        }
    }
}

/// Complete host-visible machine state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CoreState {
    /// Register file and timers.
    pub regs: Registers,
    /// Flat 4 KiB memory image, including stack and framebuffer.
    pub memory: Box<[u8]>,
    /// Current keypad state.
    pub keypad: Keypad,
    /// Current execution state.
    pub run_state: RunState,
    /// `RND` generator.
    pub rng: Rng,
    /// Set when the framebuffer changes; cleared by the host after presenting.
    pub display_dirty: bool,
}

impl Default for CoreState {
    fn default() -> Self {
        Self::with_config(&CoreConfig::default())
    }
}

impl CoreState {
    /// Creates a powered-on state with the font loaded and no program.
    #[must_use]
    pub fn with_config(config: &CoreConfig) -> Self {
        let mut state = Self {
            regs: Registers::default(),
            memory: new_address_space(),
            keypad: Keypad::default(),
            run_state: RunState::Running,
            rng: Rng::new(config.rng_seed),
            display_dirty: true,
        };
        state.load_font();
        state
    }

    /// Applies canonical reset semantics and reloads `program`.
    ///
    /// Registers and timers are zeroed, `SP` and `PC` return to their boot
    /// values, memory is cleared, then the font and program are copied back
    /// in. Bytes past [`MAX_ROM_SIZE`] are ignored. Keypad state is kept since
    /// it mirrors the host's input.
    pub fn reset_canonical(&mut self, config: &CoreConfig, program: &[u8]) {
        self.regs = Registers::default();
        self.memory.fill(0);
        self.load_font();
        let len = program.len().min(MAX_ROM_SIZE);
        let start = usize::from(PROGRAM_ADDRESS);
        self.memory[start..start + len].copy_from_slice(&program[..len]);
        self.run_state = RunState::Running;
        self.rng = Rng::new(config.rng_seed);
        self.display_dirty = true;
    }

    /// Returns the latched fault, if any.
    #[must_use]
    pub const fn latched_fault(&self) -> Option<FaultCode> {
        self.run_state.latched_fault()
    }

    fn load_font(&mut self) {
        let start = usize::from(FONT_ADDRESS);
        self.memory[start..start + FONT.len()].copy_from_slice(&FONT);
    }
}

/// Output status from one instruction attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// Instruction executed.
    Retired {
        /// Raw instruction word.
        word: u16,
    },
    /// Blocked on `LD Vx, K`; no instruction executed.
    WaitingForKey,
    /// Fault was raised by this step or was already latched.
    Fault {
        /// Canonical fault code.
        cause: FaultCode,
    },
}

/// Aggregated outcome of one 60 Hz frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FrameOutcome {
    /// Instructions retired during the frame.
    pub instructions: u32,
    /// The framebuffer changed since the host last cleared the dirty flag.
    pub display_changed: bool,
    /// The sound timer is non-zero after the timer tick.
    pub sound_active: bool,
    /// Fault latched at the end of the frame, if any.
    pub fault: Option<FaultCode>,
}

/// A program image together with a display name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Rom {
    /// Raw program bytes, loaded at [`PROGRAM_ADDRESS`].
    pub data: Vec<u8>,
    /// Human-readable name.
    pub name: String,
}

impl Rom {
    /// Wraps raw bytes.
    #[must_use]
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            data,
            name: name.into(),
        }
    }

    /// Reads a ROM file; the name is the file name up to its first `.`.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be read.
    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        Ok(Self {
            data,
            name: Self::name_from_path(path),
        })
    }

    /// Display name for a ROM path: the file name up to its first `.`.
    #[must_use]
    pub fn name_from_path(path: &Path) -> String {
        path.file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.split('.').next())
            .unwrap_or_default()
            .to_owned()
    }

    /// Checks that the image fits in program memory.
    ///
    /// # Errors
    ///
    /// Returns [`RomError::Empty`] or [`RomError::TooLarge`].
    pub fn validate(&self) -> Result<(), RomError> {
        if self.data.is_empty() {
            Err(RomError::Empty)
        } else if self.data.len() > MAX_ROM_SIZE {
            Err(RomError::TooLarge {
                size: self.data.len(),
                max: MAX_ROM_SIZE,
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{CoreConfig, CoreState, Quirks, Rom};
    use crate::memory::{FONT, MAX_ROM_SIZE, MEMORY_SIZE, PROGRAM_ADDRESS, STACK_ADDRESS};
    use crate::timing::DEFAULT_INSTRUCTIONS_PER_FRAME;
    use crate::{FaultCode, RomError, RunState};

    #[test]
    fn default_config_uses_modern_quirks() {
        let config = CoreConfig::default();
        assert_eq!(config.quirks, Quirks::modern());
        assert_eq!(config.instructions_per_frame, DEFAULT_INSTRUCTIONS_PER_FRAME);
        assert_ne!(Quirks::cosmac(), Quirks::modern());
    }

    #[test]
    fn new_state_has_font_and_boot_registers() {
        let state = CoreState::default();
        assert_eq!(state.memory.len(), MEMORY_SIZE);
        assert_eq!(&state.memory[..FONT.len()], &FONT);
        assert_eq!(state.regs.pc(), PROGRAM_ADDRESS);
        assert_eq!(state.regs.sp(), STACK_ADDRESS);
        assert_eq!(state.run_state, RunState::Running);
    }

    #[test]
    fn canonical_reset_clears_memory_and_reloads_program() {
        let config = CoreConfig::default();
        let mut state = CoreState::with_config(&config);
        state.memory[0x800] = 0xAA;
        state.regs.set_v(3, 9);
        state.regs.set_pc(0x456);
        state.regs.set_sound_timer(4);
        state.run_state = RunState::FaultLatched(FaultCode::StackOverflow);

        state.reset_canonical(&config, &[0x12, 0x34]);

        assert_eq!(state.memory[0x800], 0);
        assert_eq!(state.memory[0x200], 0x12);
        assert_eq!(state.memory[0x201], 0x34);
        assert_eq!(&state.memory[..FONT.len()], &FONT);
        assert_eq!(state.regs.v(3), 0);
        assert_eq!(state.regs.pc(), PROGRAM_ADDRESS);
        assert_eq!(state.regs.sound_timer(), 0);
        assert_eq!(state.latched_fault(), None);
    }

    #[test]
    fn rom_name_is_file_name_before_first_dot() {
        assert_eq!(Rom::name_from_path(Path::new("/roms/PONG.ch8")), "PONG");
        assert_eq!(Rom::name_from_path(Path::new("games/tetris.v2.c8")), "tetris");
        assert_eq!(Rom::name_from_path(Path::new("noext")), "noext");
    }

    #[test]
    fn rom_validation_rejects_empty_and_oversized_images() {
        assert_eq!(Rom::new("x", Vec::new()).validate(), Err(RomError::Empty));
        assert_eq!(
            Rom::new("x", vec![0; MAX_ROM_SIZE + 1]).validate(),
            Err(RomError::TooLarge {
                size: MAX_ROM_SIZE + 1,
                max: MAX_ROM_SIZE
            })
        );
        assert_eq!(Rom::new("x", vec![0; MAX_ROM_SIZE]).validate(), Ok(()));
    }
}
