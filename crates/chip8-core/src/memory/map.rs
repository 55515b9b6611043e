//! Fixed CHIP-8 memory-region map and decoding helpers.

/// Inclusive start address of the interpreter area (font lives here).
pub const INTERPRETER_START: u16 = 0x000;
/// Inclusive end address of the interpreter area.
pub const INTERPRETER_END: u16 = 0x1FF;
/// Load address for programs and the reset value of `PC`.
pub const PROGRAM_ADDRESS: u16 = 0x200;
/// Inclusive end address of the program area.
pub const PROGRAM_END: u16 = 0xE9F;
/// Base address of the in-memory call stack and the reset value of `SP`.
pub const STACK_ADDRESS: u16 = 0xEA0;
/// Inclusive end address of the stack area.
pub const STACK_END: u16 = 0xEFF;
/// Base address of the 1-bpp framebuffer.
pub const VIDEO_BUFFER_ADDRESS: u16 = 0xF00;
/// Inclusive end address of the framebuffer.
pub const VIDEO_BUFFER_END: u16 = 0xFFF;

/// Region classification for CHIP-8 addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryRegion {
    /// Interpreter area (`0x000..=0x1FF`), holds the font.
    Interpreter,
    /// Program area (`0x200..=0xE9F`).
    Program,
    /// Call stack (`0xEA0..=0xEFF`).
    Stack,
    /// Framebuffer (`0xF00..=0xFFF`).
    Video,
}

impl MemoryRegion {
    /// Returns the inclusive bounds for this region.
    #[must_use]
    pub const fn bounds(self) -> (u16, u16) {
        match self {
            Self::Interpreter => (INTERPRETER_START, INTERPRETER_END),
            Self::Program => (PROGRAM_ADDRESS, PROGRAM_END),
            Self::Stack => (STACK_ADDRESS, STACK_END),
            Self::Video => (VIDEO_BUFFER_ADDRESS, VIDEO_BUFFER_END),
        }
    }

    /// Returns `true` when `addr` belongs to this region.
    #[must_use]
    pub const fn contains(self, addr: u16) -> bool {
        let (start, end) = self.bounds();
        addr >= start && addr <= end
    }

    /// Number of bytes covered by this region.
    #[must_use]
    pub const fn len(self) -> usize {
        let (start, end) = self.bounds();
        (end - start) as usize + 1
    }
}

/// Region layout in ascending address order.
pub const FIXED_MEMORY_REGIONS: [MemoryRegion; 4] = [
    MemoryRegion::Interpreter,
    MemoryRegion::Program,
    MemoryRegion::Stack,
    MemoryRegion::Video,
];

const _: () = assert_fixed_region_layout();

const fn assert_fixed_region_layout() {
    let mut index = 1;
    while index < FIXED_MEMORY_REGIONS.len() {
        let (_, previous_end) = FIXED_MEMORY_REGIONS[index - 1].bounds();
        let (start, _) = FIXED_MEMORY_REGIONS[index].bounds();
        assert!(
            previous_end + 1 == start,
            "fixed regions must be contiguous"
        );
        index += 1;
    }

    assert!(
        VIDEO_BUFFER_END as usize + 1 == super::MEMORY_SIZE,
        "regions must cover the whole address space"
    );
}

/// Decodes an address into its region. Addresses are masked to 12 bits first.
#[must_use]
pub const fn decode_memory_region(addr: u16) -> MemoryRegion {
    let addr = addr & super::ADDRESS_MASK;
    if addr <= INTERPRETER_END {
        MemoryRegion::Interpreter
    } else if addr <= PROGRAM_END {
        MemoryRegion::Program
    } else if addr <= STACK_END {
        MemoryRegion::Stack
    } else {
        MemoryRegion::Video
    }
}
