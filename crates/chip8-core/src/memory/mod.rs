//! Memory model primitives and the fixed CHIP-8 layout.

/// Built-in hexadecimal font.
pub mod font;
/// Fixed memory-region map and address decoder.
pub mod map;

pub use font::{glyph_address, FONT, FONT_ADDRESS, GLYPH_HEIGHT};
pub use map::{
    decode_memory_region, MemoryRegion, FIXED_MEMORY_REGIONS, INTERPRETER_END, INTERPRETER_START,
    PROGRAM_ADDRESS, PROGRAM_END, STACK_ADDRESS, STACK_END, VIDEO_BUFFER_ADDRESS,
    VIDEO_BUFFER_END,
};

/// Size in bytes of the CHIP-8 address space (4 KiB).
pub const MEMORY_SIZE: usize = 4096;
/// Mask applied to every address (12-bit bus).
pub const ADDRESS_MASK: u16 = 0x0FFF;
/// Size in bytes of one instruction word.
pub const INSTRUCTION_SIZE: u16 = 2;
/// Maximum number of return addresses the in-memory stack holds.
pub const STACK_DEPTH: usize = 16;
/// Largest ROM that fits between the program address and the stack.
pub const MAX_ROM_SIZE: usize = (STACK_ADDRESS - PROGRAM_ADDRESS) as usize;
/// Size in bytes of the framebuffer.
pub const VIDEO_BUFFER_SIZE: usize = (VIDEO_BUFFER_END - VIDEO_BUFFER_ADDRESS) as usize + 1;

/// Allocates a zeroed 4 KiB backing store.
#[must_use]
pub fn new_address_space() -> Box<[u8]> {
    vec![0; MEMORY_SIZE].into_boxed_slice()
}

/// Reads a big-endian word at `addr`.
///
/// Returns `None` if either byte is outside `memory`.
#[must_use]
pub fn read_u16_be(memory: &[u8], addr: u16) -> Option<u16> {
    let index = usize::from(addr);
    let hi = *memory.get(index)?;
    let lo = *memory.get(index + 1)?;
    Some(u16::from_be_bytes([hi, lo]))
}

/// Writes a big-endian word at `addr`.
///
/// Returns `None` without writing anything if the word does not fit.
pub fn write_u16_be(memory: &mut [u8], addr: u16, value: u16) -> Option<()> {
    let index = usize::from(addr);
    if index + 1 >= memory.len() {
        return None;
    }
    let [hi, lo] = value.to_be_bytes();
    memory[index] = hi;
    memory[index + 1] = lo;
    Some(())
}
