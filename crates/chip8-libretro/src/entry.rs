//! The `retro_*` symbols a libretro frontend resolves from the core library.
//!
//! Each export locks the single [`RetroCore`] instance, forwards, and turns
//! failures into `false`, NULL or 0. Nothing here panics across the ABI.

#![allow(unsafe_code)]

use std::ffi::{c_char, c_uint, CStr};
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::{ptr, slice};

use chip8_core::{Rom, FRAME_RATE, HEIGHT, SAMPLE_RATE, WIDTH};
use libc::{c_void, size_t};
use libretro_sys::{
    AudioSampleBatchFn, AudioSampleFn, EnvironmentFn, GameInfo, InputPollFn, InputStateFn, Region,
    SystemAvInfo, SystemInfo, VideoRefreshFn, API_VERSION,
};

use crate::callbacks::{self, Environment, FfiFrontend};
use crate::core::RetroCore;
use crate::logger;
use crate::options::CoreOptions;

const LIBRARY_NAME: &CStr = c"chip8";
const LIBRARY_VERSION: &CStr = match CStr::from_bytes_with_nul(
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes(),
) {
    Ok(version) => version,
    Err(_) => c"unknown",
};
const VALID_EXTENSIONS: &CStr = c"ch8|c8|rom";

static CORE: Mutex<Option<RetroCore>> = Mutex::new(None);

fn with_core<R>(f: impl FnOnce(&mut RetroCore) -> R) -> Option<R> {
    let mut core = CORE.lock().unwrap_or_else(PoisonError::into_inner);
    let result = core.as_mut().map(f);
    if result.is_none() {
        log::warn!("core called before retro_init");
    }
    result
}

fn initial_options() -> CoreOptions {
    Environment::current().map_or_else(CoreOptions::default, |environment| {
        environment.read_options(CoreOptions::default())
    })
}

#[no_mangle]
pub extern "C" fn retro_api_version() -> c_uint {
    API_VERSION
}

/// Stores the environment callback, then advertises options and input
/// descriptors and picks up the frontend log interface.
#[no_mangle]
pub extern "C" fn retro_set_environment(callback: Option<EnvironmentFn>) {
    callbacks::update(|callbacks| callbacks.environment = callback);
    logger::install();
    let Some(environment) = Environment::current() else {
        logger::set_frontend_callback(None);
        return;
    };
    logger::set_frontend_callback(environment.log_interface());
    if !environment.set_variables() {
        log::debug!("frontend did not accept core options");
    }
    if !environment.set_input_descriptors() {
        log::debug!("frontend did not accept input descriptors");
    }
}

#[no_mangle]
pub extern "C" fn retro_set_video_refresh(callback: Option<VideoRefreshFn>) {
    callbacks::update(|callbacks| callbacks.video_refresh = callback);
}

#[no_mangle]
pub extern "C" fn retro_set_audio_sample(callback: Option<AudioSampleFn>) {
    callbacks::update(|callbacks| callbacks.audio_sample = callback);
}

#[no_mangle]
pub extern "C" fn retro_set_audio_sample_batch(callback: Option<AudioSampleBatchFn>) {
    callbacks::update(|callbacks| callbacks.audio_sample_batch = callback);
}

#[no_mangle]
pub extern "C" fn retro_set_input_poll(callback: Option<InputPollFn>) {
    callbacks::update(|callbacks| callbacks.input_poll = callback);
}

#[no_mangle]
pub extern "C" fn retro_set_input_state(callback: Option<InputStateFn>) {
    callbacks::update(|callbacks| callbacks.input_state = callback);
}

#[no_mangle]
pub extern "C" fn retro_init() {
    logger::install();
    log::info!("loading chip8 core...");
    *CORE.lock().unwrap_or_else(PoisonError::into_inner) = Some(RetroCore::new(initial_options()));
}

#[no_mangle]
pub extern "C" fn retro_deinit() {
    log::info!("unloading chip8 core...");
    *CORE.lock().unwrap_or_else(PoisonError::into_inner) = None;
}

/// Zeroes `info`, then fills in static library metadata.
///
/// # Safety
///
/// `info` must be NULL or point to writable `retro_system_info` storage.
#[no_mangle]
pub unsafe extern "C" fn retro_get_system_info(info: *mut SystemInfo) {
    if info.is_null() {
        return;
    }
    ptr::write_bytes(info, 0, 1);
    let info = &mut *info;
    info.library_name = LIBRARY_NAME.as_ptr();
    info.library_version = LIBRARY_VERSION.as_ptr();
    info.valid_extensions = VALID_EXTENSIONS.as_ptr();
    info.need_fullpath = false;
    info.block_extract = false;
}

/// Zeroes `info`, then reports 64x32 video at 60 fps and 44.1 kHz audio.
///
/// # Safety
///
/// `info` must be NULL or point to writable `retro_system_av_info` storage.
#[no_mangle]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub unsafe extern "C" fn retro_get_system_av_info(info: *mut SystemAvInfo) {
    if info.is_null() {
        return;
    }
    ptr::write_bytes(info, 0, 1);
    let info = &mut *info;
    info.geometry.base_width = WIDTH as c_uint;
    info.geometry.base_height = HEIGHT as c_uint;
    info.geometry.max_width = WIDTH as c_uint;
    info.geometry.max_height = HEIGHT as c_uint;
    info.geometry.aspect_ratio = WIDTH as f32 / HEIGHT as f32;
    info.timing.fps = f64::from(FRAME_RATE);
    info.timing.sample_rate = f64::from(SAMPLE_RATE);
}

#[no_mangle]
pub extern "C" fn retro_set_controller_port_device(port: c_uint, device: c_uint) {
    with_core(|core| core.set_controller_port_device(port, device));
}

#[no_mangle]
pub extern "C" fn retro_reset() {
    with_core(RetroCore::reset);
}

#[no_mangle]
pub extern "C" fn retro_run() {
    let callbacks = callbacks::current();
    with_core(|core| {
        let mut frontend = FfiFrontend::new(callbacks, *core.options());
        core.run(&mut frontend);
    });
}

#[no_mangle]
pub extern "C" fn retro_serialize_size() -> size_t {
    with_core(|core| core.serialize_size()).unwrap_or(0)
}

/// Writes a save state into `data`.
///
/// # Safety
///
/// `data` must be NULL or valid for `size` bytes of writes.
#[no_mangle]
pub unsafe extern "C" fn retro_serialize(data: *mut c_void, size: size_t) -> bool {
    if data.is_null() {
        return false;
    }
    let out = slice::from_raw_parts_mut(data.cast::<u8>(), size);
    with_core(|core| core.serialize(out)).unwrap_or(false)
}

/// Restores a save state from `data`.
///
/// # Safety
///
/// `data` must be NULL or valid for `size` bytes of reads.
#[no_mangle]
pub unsafe extern "C" fn retro_unserialize(data: *const c_void, size: size_t) -> bool {
    if data.is_null() {
        return false;
    }
    let input = slice::from_raw_parts(data.cast::<u8>(), size);
    with_core(|core| core.unserialize(input)).unwrap_or(false)
}

#[no_mangle]
pub extern "C" fn retro_cheat_reset() {
    with_core(RetroCore::cheat_reset);
}

/// Stores cheat `index`.
///
/// # Safety
///
/// `code` must be NULL or a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn retro_cheat_set(index: c_uint, enabled: bool, code: *const c_char) {
    if code.is_null() {
        return;
    }
    let code = CStr::from_ptr(code).to_string_lossy();
    let Ok(index) = usize::try_from(index) else {
        return;
    };
    with_core(|core| core.cheat_set(index, enabled, &code));
}

/// Copies the ROM out of `game`, selects XRGB8888 output and boots it.
///
/// # Safety
///
/// `game` must be NULL or point to a `retro_game_info` whose `data` is
/// valid for `size` bytes and whose `path` is NULL or NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn retro_load_game(game: *const GameInfo) -> bool {
    let Some(game) = game.as_ref() else {
        log::error!("retro_load_game: no game info");
        return false;
    };
    if game.data.is_null() || game.size == 0 {
        log::error!("retro_load_game: no rom data, need_fullpath is not supported");
        return false;
    }

    let data = slice::from_raw_parts(game.data.cast::<u8>(), game.size).to_vec();
    let name = if game.path.is_null() {
        String::from("rom")
    } else {
        let path = CStr::from_ptr(game.path).to_string_lossy();
        Rom::name_from_path(Path::new(path.as_ref()))
    };

    if let Some(environment) = Environment::current() {
        if !environment.set_pixel_format() {
            log::error!("frontend does not support XRGB8888 output");
            return false;
        }
    }

    with_core(|core| match core.load_game(Rom::new(name, data)) {
        Ok(()) => true,
        Err(error) => {
            log::error!("retro_load_game: {error}");
            false
        }
    })
    .unwrap_or(false)
}

/// No special game types exist for this system.
#[no_mangle]
pub extern "C" fn retro_load_game_special(
    _game_type: c_uint,
    _info: *const GameInfo,
    _num_info: size_t,
) -> bool {
    false
}

#[no_mangle]
pub extern "C" fn retro_unload_game() {
    with_core(RetroCore::unload_game);
}

#[no_mangle]
pub extern "C" fn retro_get_region() -> c_uint {
    Region::NTSC.to_uint()
}

#[no_mangle]
pub extern "C" fn retro_get_memory_data(id: c_uint) -> *mut c_void {
    with_core(|core| {
        core.memory(id)
            .map_or(ptr::null_mut(), |memory| memory.as_mut_ptr().cast::<c_void>())
    })
    .unwrap_or(ptr::null_mut())
}

#[no_mangle]
pub extern "C" fn retro_get_memory_size(id: c_uint) -> size_t {
    with_core(|core| core.memory(id).map_or(0, |memory| memory.len())).unwrap_or(0)
}
