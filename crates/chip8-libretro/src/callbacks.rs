//! Frontend callback storage and the environment command wrappers.

#![allow(unsafe_code)]

use std::ffi::{c_uint, CStr, CString};
use std::ptr;
use std::sync::{Mutex, PoisonError};

use libc::c_void;
use libretro_sys::{
    AudioSampleBatchFn, AudioSampleFn, EnvironmentFn, InputPollFn, InputStateFn, VideoRefreshFn,
    DEVICE_JOYPAD, ENVIRONMENT_SET_PIXEL_FORMAT,
};

use crate::core::Frontend;
use crate::ffi::{
    LogPrintfFn, RetroInputDescriptor, RetroLogCallback, RetroVariable,
    ENVIRONMENT_GET_LOG_INTERFACE, ENVIRONMENT_GET_VARIABLE, ENVIRONMENT_GET_VARIABLE_UPDATE,
    ENVIRONMENT_SET_INPUT_DESCRIPTORS, ENVIRONMENT_SET_VARIABLES, PIXEL_FORMAT_XRGB8888,
};
use crate::input::{INPUT_PORT, JOYPAD_KEYMAP};
use crate::options::{CoreOptions, OPTION_DEFINITIONS};

/// Every callback the frontend has handed us. `None` means unset or NULL.
#[derive(Clone, Copy)]
pub struct Callbacks {
    pub environment: Option<EnvironmentFn>,
    pub video_refresh: Option<VideoRefreshFn>,
    pub audio_sample: Option<AudioSampleFn>,
    pub audio_sample_batch: Option<AudioSampleBatchFn>,
    pub input_poll: Option<InputPollFn>,
    pub input_state: Option<InputStateFn>,
}

impl Callbacks {
    const EMPTY: Self = Self {
        environment: None,
        video_refresh: None,
        audio_sample: None,
        audio_sample_batch: None,
        input_poll: None,
        input_state: None,
    };
}

static CALLBACKS: Mutex<Callbacks> = Mutex::new(Callbacks::EMPTY);

/// Mutates the stored callbacks.
pub fn update(f: impl FnOnce(&mut Callbacks)) {
    let mut callbacks = CALLBACKS.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut callbacks);
}

/// Copy of the stored callbacks.
#[must_use]
pub fn current() -> Callbacks {
    *CALLBACKS.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Typed wrapper around `retro_environment_t`.
#[derive(Clone, Copy)]
pub struct Environment(EnvironmentFn);

impl Environment {
    #[must_use]
    pub fn current() -> Option<Self> {
        current().environment.map(Self)
    }

    fn call<T>(self, command: c_uint, data: *mut T) -> bool {
        // SAFETY: the frontend accepts any command and fails unknown ones;
        // `data` points at the structure the command documents.
        unsafe { (self.0)(command, data.cast::<c_void>()) }
    }

    /// Requests XRGB8888 output; `false` if the frontend refuses.
    #[must_use]
    pub fn set_pixel_format(self) -> bool {
        let mut format = PIXEL_FORMAT_XRGB8888;
        self.call(ENVIRONMENT_SET_PIXEL_FORMAT, &mut format)
    }

    /// The frontend's printf-style log function, if it offers one.
    #[must_use]
    pub fn log_interface(self) -> Option<LogPrintfFn> {
        let mut callback = RetroLogCallback { log: None };
        if self.call(ENVIRONMENT_GET_LOG_INTERFACE, &mut callback) {
            callback.log
        } else {
            None
        }
    }

    /// Advertises the core options.
    pub fn set_variables(self) -> bool {
        let strings: Vec<(CString, CString)> = OPTION_DEFINITIONS
            .iter()
            .filter_map(|definition| {
                let key = CString::new(definition.key).ok()?;
                let value = CString::new(definition.variable_value()).ok()?;
                Some((key, value))
            })
            .collect();
        let mut variables: Vec<RetroVariable> = strings
            .iter()
            .map(|(key, value)| RetroVariable {
                key: key.as_ptr(),
                value: value.as_ptr(),
            })
            .collect();
        variables.push(RetroVariable {
            key: ptr::null(),
            value: ptr::null(),
        });
        self.call(ENVIRONMENT_SET_VARIABLES, variables.as_mut_ptr())
    }

    /// Describes the joypad layout.
    pub fn set_input_descriptors(self) -> bool {
        let mut descriptors: Vec<RetroInputDescriptor> = JOYPAD_KEYMAP
            .iter()
            .map(|(id, _, label)| RetroInputDescriptor {
                port: INPUT_PORT,
                device: DEVICE_JOYPAD,
                index: 0,
                id: *id,
                description: label.as_ptr(),
            })
            .collect();
        descriptors.push(RetroInputDescriptor {
            port: 0,
            device: 0,
            index: 0,
            id: 0,
            description: ptr::null(),
        });
        self.call(ENVIRONMENT_SET_INPUT_DESCRIPTORS, descriptors.as_mut_ptr())
    }

    /// `true` when option values changed since the last query.
    #[must_use]
    pub fn variables_updated(self) -> bool {
        let mut updated = false;
        self.call(ENVIRONMENT_GET_VARIABLE_UPDATE, &mut updated) && updated
    }

    /// Current value of one option.
    #[must_use]
    pub fn variable(self, key: &str) -> Option<String> {
        let key = CString::new(key).ok()?;
        let mut variable = RetroVariable {
            key: key.as_ptr(),
            value: ptr::null(),
        };
        if !self.call(ENVIRONMENT_GET_VARIABLE, &mut variable) || variable.value.is_null() {
            return None;
        }
        // SAFETY: the frontend returned a NUL-terminated string that stays
        // valid until the next environment call.
        let value = unsafe { CStr::from_ptr(variable.value) };
        Some(value.to_string_lossy().into_owned())
    }

    /// `current` with every option the frontend reports applied on top.
    #[must_use]
    pub fn read_options(self, current: CoreOptions) -> CoreOptions {
        let mut options = current;
        for definition in &OPTION_DEFINITIONS {
            if let Some(value) = self.variable(definition.key) {
                options.set(definition.key, &value);
            }
        }
        options
    }
}

/// [`Frontend`] backed by the real libretro callbacks.
pub struct FfiFrontend {
    callbacks: Callbacks,
    options: CoreOptions,
}

impl FfiFrontend {
    #[must_use]
    pub const fn new(callbacks: Callbacks, options: CoreOptions) -> Self {
        Self { callbacks, options }
    }
}

impl Frontend for FfiFrontend {
    fn poll_input(&mut self) {
        if let Some(poll) = self.callbacks.input_poll {
            // SAFETY: frontend-provided callback with no arguments.
            unsafe { poll() };
        }
    }

    fn input_state(&mut self, port: c_uint, device: c_uint, index: c_uint, id: c_uint) -> i16 {
        self.callbacks.input_state.map_or(0, |state| {
            // SAFETY: frontend-provided callback taking plain integers.
            unsafe { state(port, device, index, id) }
        })
    }

    fn video_refresh(&mut self, pixels: &[u32], width: usize, height: usize, pitch: usize) {
        let Some(refresh) = self.callbacks.video_refresh else {
            return;
        };
        let (Ok(width), Ok(height)) = (c_uint::try_from(width), c_uint::try_from(height)) else {
            return;
        };
        // SAFETY: `pixels` holds `height` rows of `pitch` bytes for the
        // duration of the call.
        unsafe { refresh(pixels.as_ptr().cast::<c_void>(), width, height, pitch) };
    }

    fn audio_sample_batch(&mut self, samples: &[i16]) {
        if let Some(batch) = self.callbacks.audio_sample_batch {
            let mut remaining = samples;
            while remaining.len() >= 2 {
                // SAFETY: `remaining` holds `len / 2` interleaved stereo frames.
                let accepted = unsafe { batch(remaining.as_ptr(), remaining.len() / 2) };
                if accepted == 0 {
                    break;
                }
                remaining = &remaining[(accepted * 2).min(remaining.len())..];
            }
        } else if let Some(sample) = self.callbacks.audio_sample {
            for frame in samples.chunks_exact(2) {
                // SAFETY: frontend-provided callback taking two samples.
                unsafe { sample(frame[0], frame[1]) };
            }
        }
    }

    fn updated_options(&mut self) -> Option<CoreOptions> {
        let environment = Environment(self.callbacks.environment?);
        if !environment.variables_updated() {
            return None;
        }
        self.options = environment.read_options(self.options);
        Some(self.options)
    }
}
