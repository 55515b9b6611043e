//! Core CHIP-8 interpreter for the chip8 libretro core and CLI.

/// Memory model primitives, font and fixed region map.
pub mod memory;
pub use memory::{
    decode_memory_region, glyph_address, new_address_space, read_u16_be, write_u16_be,
    MemoryRegion, ADDRESS_MASK, FIXED_MEMORY_REGIONS, FONT, FONT_ADDRESS, INSTRUCTION_SIZE,
    MAX_ROM_SIZE, MEMORY_SIZE, PROGRAM_ADDRESS, STACK_ADDRESS, STACK_DEPTH, VIDEO_BUFFER_ADDRESS,
    VIDEO_BUFFER_SIZE,
};

/// Register file, run state and random source.
pub mod state;
pub use state::{Registers, Rng, RunState, DEFAULT_RNG_SEED, FLAG_REGISTER, GENERAL_REGISTER_COUNT};

/// Fault taxonomy and ROM validation errors.
pub mod fault;
pub use fault::{FaultCode, RomError};

/// Opcode decoding.
pub mod decoder;
pub use decoder::{Decoder, Instruction};

/// Public host-facing API types.
pub mod api;
pub use api::{CoreConfig, CoreState, FrameOutcome, Quirks, Rom, StepOutcome};

/// Instruction execution and frame stepping.
pub mod execute;
pub use execute::{run_frame, step_one};

/// Framebuffer helpers and palettes.
pub mod display;
pub use display::{Palette, HEIGHT, WIDTH};

/// Hex keypad state.
pub mod keypad;
pub use keypad::{Key, Keypad, KEY_COUNT};

/// Square-wave beeper.
pub mod audio;
pub use audio::{Beeper, SAMPLE_RATE, SAMPLES_PER_FRAME};

/// Frame rate and speed constants.
pub mod timing;
pub use timing::{
    clamp_instructions_per_frame, DEFAULT_INSTRUCTIONS_PER_FRAME, FRAME_RATE,
    MAX_INSTRUCTIONS_PER_FRAME, MIN_INSTRUCTIONS_PER_FRAME,
};

/// Binary save states.
pub mod snapshot;
pub use snapshot::{
    read_snapshot, snapshot_to_vec, write_snapshot, SnapshotError, SnapshotVersion, SNAPSHOT_SIZE,
};

/// Memory-poke cheat codes.
pub mod cheat;
pub use cheat::{CheatCode, CheatError, CheatList, CheatPatch};

/// Listing generation.
pub mod disasm;
pub use disasm::{disassemble, disassemble_word, DisassemblyRow};

/// Frame-level emulator facade.
pub mod machine;
pub use machine::Machine;

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
