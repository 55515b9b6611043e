//! libretro core for the chip8 interpreter.
//!
//! The `retro_*` exports in [`entry`] drive a [`core::RetroCore`], which in
//! turn drives [`chip8_core::Machine`] and reaches the frontend through the
//! [`core::Frontend`] trait.

pub mod callbacks;
pub mod core;
pub mod entry;
pub mod ffi;
pub mod input;
pub mod logger;
pub mod options;
pub mod video;

pub use crate::core::{Frontend, RetroCore};
pub use crate::options::CoreOptions;
