//! Frontend-independent libretro runtime.
//!
//! [`RetroCore`] owns the machine and talks to the host only through the
//! [`Frontend`] trait, so the whole `retro_run` path can be driven by tests.

use std::ffi::c_uint;

use chip8_core::{CoreConfig, FaultCode, Machine, Rom, RomError, SNAPSHOT_SIZE};
use libretro_sys::{DEVICE_JOYPAD, MEMORY_SYSTEM_RAM, MEMORY_VIDEO_RAM};

use crate::ffi::DEVICE_NONE;
use crate::input::{read_keypad, INPUT_PORT};
use crate::options::CoreOptions;
use crate::video::{VideoFrame, PITCH};

/// Highest number of controller ports whose device assignment is tracked.
pub const MAX_PORTS: usize = 8;

/// Host services used while running a frame.
pub trait Frontend {
    /// Latches input for this frame.
    fn poll_input(&mut self);

    /// Reads one input; non-zero means pressed.
    fn input_state(&mut self, port: c_uint, device: c_uint, index: c_uint, id: c_uint) -> i16;

    /// Presents a frame of XRGB8888 pixels.
    fn video_refresh(&mut self, pixels: &[u32], width: usize, height: usize, pitch: usize);

    /// Queues interleaved stereo samples.
    fn audio_sample_batch(&mut self, samples: &[i16]);

    /// Returns fresh option values when the user changed them.
    fn updated_options(&mut self) -> Option<CoreOptions> {
        None
    }
}

/// The running core instance between `retro_init` and `retro_deinit`.
#[derive(Debug)]
pub struct RetroCore {
    machine: Machine,
    options: CoreOptions,
    video: VideoFrame,
    audio: Vec<i16>,
    port_devices: [c_uint; MAX_PORTS],
    reported_fault: Option<FaultCode>,
}

impl Default for RetroCore {
    fn default() -> Self {
        Self::new(CoreOptions::default())
    }
}

impl RetroCore {
    #[must_use]
    pub fn new(options: CoreOptions) -> Self {
        let mut config = CoreConfig::default();
        options.apply_to(&mut config);
        let mut video = VideoFrame::default();
        video.set_palette(options.palette.palette());
        Self {
            machine: Machine::new(config),
            options,
            video,
            audio: Vec::new(),
            port_devices: [DEVICE_JOYPAD; MAX_PORTS],
            reported_fault: None,
        }
    }

    #[must_use]
    pub const fn machine(&self) -> &Machine {
        &self.machine
    }

    #[must_use]
    pub const fn options(&self) -> &CoreOptions {
        &self.options
    }

    #[must_use]
    pub fn is_game_loaded(&self) -> bool {
        self.machine.rom().is_some()
    }

    /// Applies new option values; speed and quirks take effect next frame.
    pub fn apply_options(&mut self, options: CoreOptions) {
        let mut config = *self.machine.config();
        options.apply_to(&mut config);
        self.machine.set_config(config);
        self.video.set_palette(options.palette.palette());
        self.options = options;
    }

    /// Loads a ROM image.
    ///
    /// # Errors
    ///
    /// Returns the [`RomError`] from the machine when the image is rejected.
    pub fn load_game(&mut self, rom: Rom) -> Result<(), RomError> {
        self.machine.load_rom(rom)?;
        self.reported_fault = None;
        Ok(())
    }

    pub fn unload_game(&mut self) {
        self.machine.unload();
        self.reported_fault = None;
    }

    pub fn reset(&mut self) {
        self.machine.reset();
        self.reported_fault = None;
    }

    /// Records the device plugged into `port`.
    pub fn set_controller_port_device(&mut self, port: c_uint, device: c_uint) {
        match usize::try_from(port).ok().and_then(|port| self.port_devices.get_mut(port)) {
            Some(slot) => *slot = device,
            None => log::warn!("ignoring device {device} on unsupported port {port}"),
        }
    }

    /// Device currently recorded for `port`.
    #[must_use]
    pub fn port_device(&self, port: c_uint) -> Option<c_uint> {
        usize::try_from(port)
            .ok()
            .and_then(|port| self.port_devices.get(port))
            .copied()
    }

    /// Runs one frame: input, emulation, video, audio.
    pub fn run<F: Frontend + ?Sized>(&mut self, frontend: &mut F) {
        frontend.poll_input();
        if let Some(options) = frontend.updated_options() {
            self.apply_options(options);
        }

        let keys = if self.port_device(INPUT_PORT) == Some(DEVICE_NONE) {
            chip8_core::Keypad::default()
        } else {
            read_keypad(frontend)
        };

        let outcome = self.machine.run_frame(keys);
        if outcome.fault != self.reported_fault {
            if let Some(fault) = outcome.fault {
                log::error!("emulation stopped: {fault}");
            }
            self.reported_fault = outcome.fault;
        }

        self.video.update(&mut self.machine);
        frontend.video_refresh(
            self.video.pixels(),
            VideoFrame::width(),
            VideoFrame::height(),
            PITCH,
        );

        self.audio.clear();
        self.machine.fill_audio(&mut self.audio);
        frontend.audio_sample_batch(&self.audio);
    }

    #[must_use]
    pub const fn serialize_size(&self) -> usize {
        SNAPSHOT_SIZE
    }

    /// Writes a save state into `out`; `false` when it does not fit.
    pub fn serialize(&self, out: &mut [u8]) -> bool {
        match self.machine.save_snapshot(out) {
            Ok(()) => true,
            Err(error) => {
                log::warn!("serialize failed: {error}");
                false
            }
        }
    }

    /// Restores a save state; `false` leaves the machine untouched.
    pub fn unserialize(&mut self, input: &[u8]) -> bool {
        let restored = self.machine.restore(input).is_ok();
        if restored {
            self.reported_fault = self.machine.state().latched_fault();
        }
        restored
    }

    pub fn cheat_reset(&mut self) {
        self.machine.cheats_mut().reset();
    }

    /// Stores a cheat; malformed codes are logged and dropped.
    pub fn cheat_set(&mut self, index: usize, enabled: bool, code: &str) -> bool {
        match self.machine.cheats_mut().set(index, enabled, code) {
            Ok(()) => true,
            Err(error) => {
                log::warn!("cheat {index} rejected: {error}");
                false
            }
        }
    }

    /// Memory region exposed for `retro_get_memory_data`.
    pub fn memory(&mut self, id: c_uint) -> Option<&mut [u8]> {
        match id {
            MEMORY_SYSTEM_RAM => Some(self.machine.memory_mut()),
            MEMORY_VIDEO_RAM => Some(self.machine.video_memory_mut()),
            _ => None,
        }
    }
}
