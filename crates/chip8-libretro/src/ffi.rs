//! libretro ABI pieces that `libretro-sys` does not provide.

use std::ffi::{c_char, c_uint};

pub const ENVIRONMENT_SET_INPUT_DESCRIPTORS: c_uint = 11;
pub const ENVIRONMENT_GET_VARIABLE: c_uint = 15;
pub const ENVIRONMENT_SET_VARIABLES: c_uint = 16;
pub const ENVIRONMENT_GET_VARIABLE_UPDATE: c_uint = 17;
pub const ENVIRONMENT_GET_LOG_INTERFACE: c_uint = 27;

/// `RETRO_PIXEL_FORMAT_XRGB8888`.
pub const PIXEL_FORMAT_XRGB8888: c_uint = 1;

pub const LOG_DEBUG: c_uint = 0;
pub const LOG_INFO: c_uint = 1;
pub const LOG_WARN: c_uint = 2;
pub const LOG_ERROR: c_uint = 3;

pub type LogPrintfFn = unsafe extern "C" fn(level: c_uint, fmt: *const c_char, ...);

/// `struct retro_log_callback`.
#[repr(C)]
pub struct RetroLogCallback {
    pub log: Option<LogPrintfFn>,
}

/// `struct retro_variable`.
#[repr(C)]
pub struct RetroVariable {
    pub key: *const c_char,
    pub value: *const c_char,
}

/// `struct retro_input_descriptor`.
#[repr(C)]
pub struct RetroInputDescriptor {
    pub port: c_uint,
    pub device: c_uint,
    pub index: c_uint,
    pub id: c_uint,
    pub description: *const c_char,
}

/// `RETRO_DEVICE_NONE`.
pub const DEVICE_NONE: c_uint = 0;
