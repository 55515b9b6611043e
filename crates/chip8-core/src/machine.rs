//! Frame-level emulator facade driven by host adapters.

use crate::audio::Beeper;
use crate::cheat::CheatList;
use crate::display::{self, Palette};
use crate::execute;
use crate::memory::{VIDEO_BUFFER_ADDRESS, VIDEO_BUFFER_SIZE};
use crate::snapshot::{
    read_snapshot, snapshot_to_vec, write_snapshot, SnapshotError, SNAPSHOT_SIZE,
};
use crate::{CoreConfig, CoreState, FrameOutcome, Keypad, Rom, RomError};

/// A CHIP-8 machine with its program, cheats and audio generator.
#[derive(Debug, Clone)]
pub struct Machine {
    config: CoreConfig,
    state: CoreState,
    rom: Option<Rom>,
    cheats: CheatList,
    beeper: Beeper,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new(CoreConfig::default())
    }
}

impl Machine {
    /// Creates a powered-on machine with no program loaded.
    #[must_use]
    pub fn new(config: CoreConfig) -> Self {
        Self {
            state: CoreState::with_config(&config),
            config,
            rom: None,
            cheats: CheatList::default(),
            beeper: Beeper::default(),
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Replaces the configuration. Speed and quirks apply from the next
    /// frame; a new RNG seed applies from the next reset.
    pub fn set_config(&mut self, config: CoreConfig) {
        self.config = config;
    }

    /// Loaded program, if any.
    #[must_use]
    pub const fn rom(&self) -> Option<&Rom> {
        self.rom.as_ref()
    }

    /// Validates `rom`, resets the machine and loads the program.
    ///
    /// # Errors
    ///
    /// Returns a [`RomError`] and leaves the machine unchanged when the image
    /// is empty or does not fit.
    pub fn load_rom(&mut self, rom: Rom) -> Result<(), RomError> {
        rom.validate()?;
        log::info!("loaded rom {:?} ({} bytes)", rom.name, rom.data.len());
        self.state.reset_canonical(&self.config, &rom.data);
        self.beeper = Beeper::default();
        self.rom = Some(rom);
        Ok(())
    }

    /// Drops the program and cheats and clears the machine.
    pub fn unload(&mut self) {
        if let Some(rom) = self.rom.take() {
            log::info!("unloaded rom {:?}", rom.name);
        }
        self.cheats.reset();
        self.state.reset_canonical(&self.config, &[]);
        self.beeper = Beeper::default();
    }

    /// Resets the machine and reloads the current program.
    pub fn reset(&mut self) {
        let program = self.rom.as_ref().map_or(&[][..], |rom| &rom.data[..]);
        self.state.reset_canonical(&self.config, program);
        self.beeper = Beeper::default();
    }

    /// Runs one 60 Hz frame with `keys` held, then applies enabled cheats.
    ///
    /// Without a program nothing executes and the timers stay put.
    pub fn run_frame(&mut self, keys: Keypad) -> FrameOutcome {
        if self.rom.is_none() {
            return FrameOutcome::default();
        }
        self.state.keypad = keys;
        let outcome = execute::run_frame(&mut self.state, &self.config);
        self.cheats.apply(&mut self.state.memory);
        outcome
    }

    /// Renders the framebuffer into `out` and clears the dirty flag.
    pub fn render(&mut self, palette: &Palette, out: &mut [u32]) {
        display::render_xrgb8888(self.video_memory(), palette, out);
        self.state.display_dirty = false;
    }

    /// Appends one frame of stereo samples for the current sound timer.
    pub fn fill_audio(&mut self, out: &mut Vec<i16>) {
        let active = self.state.regs.sound_timer() > 0;
        self.beeper.fill_frame(active, out);
    }

    /// Size of the buffer [`Self::save_snapshot`] needs.
    #[must_use]
    pub const fn snapshot_size(&self) -> usize {
        SNAPSHOT_SIZE
    }

    /// Serializes the machine state into a new buffer.
    #[must_use]
    pub fn snapshot(&self) -> Vec<u8> {
        snapshot_to_vec(&self.state)
    }

    /// Serializes the machine state into `out`.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::BufferTooSmall`] when `out` is too short.
    pub fn save_snapshot(&self, out: &mut [u8]) -> Result<(), SnapshotError> {
        write_snapshot(&self.state, out)
    }

    /// Replaces the machine state with a snapshot.
    ///
    /// Memory is copied into the existing backing store, so pointers handed
    /// out by [`Self::memory_mut`] stay valid across restores.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] and keeps the current state when `input`
    /// is not a valid snapshot.
    pub fn restore(&mut self, input: &[u8]) -> Result<(), SnapshotError> {
        let CoreState {
            regs,
            memory,
            keypad,
            run_state,
            rng,
            display_dirty,
        } = read_snapshot(input).inspect_err(|error| {
            log::warn!("snapshot rejected: {error}");
        })?;
        self.state.memory.copy_from_slice(&memory);
        self.state.regs = regs;
        self.state.keypad = keypad;
        self.state.run_state = run_state;
        self.state.rng = rng;
        self.state.display_dirty = display_dirty;
        Ok(())
    }

    /// Cheat table applied after every frame.
    pub const fn cheats_mut(&mut self) -> &mut CheatList {
        &mut self.cheats
    }

    /// Full machine state.
    #[must_use]
    pub const fn state(&self) -> &CoreState {
        &self.state
    }

    /// The 4 KiB address space.
    #[must_use]
    pub fn memory(&self) -> &[u8] {
        &self.state.memory
    }

    /// Mutable view of the 4 KiB address space.
    pub fn memory_mut(&mut self) -> &mut [u8] {
        &mut self.state.memory
    }

    /// The 256-byte framebuffer.
    #[must_use]
    pub fn video_memory(&self) -> &[u8] {
        let start = usize::from(VIDEO_BUFFER_ADDRESS);
        &self.state.memory[start..start + VIDEO_BUFFER_SIZE]
    }

    /// Mutable view of the 256-byte framebuffer.
    pub fn video_memory_mut(&mut self) -> &mut [u8] {
        let start = usize::from(VIDEO_BUFFER_ADDRESS);
        &mut self.state.memory[start..start + VIDEO_BUFFER_SIZE]
    }
}
