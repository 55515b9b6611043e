//! RetroPad to hex keypad mapping.

use std::ffi::{c_uint, CStr};

use chip8_core::{Key, Keypad};
use libretro_sys::{
    DEVICE_ID_JOYPAD_A, DEVICE_ID_JOYPAD_B, DEVICE_ID_JOYPAD_DOWN, DEVICE_ID_JOYPAD_L,
    DEVICE_ID_JOYPAD_L2, DEVICE_ID_JOYPAD_L3, DEVICE_ID_JOYPAD_LEFT, DEVICE_ID_JOYPAD_R,
    DEVICE_ID_JOYPAD_R2, DEVICE_ID_JOYPAD_R3, DEVICE_ID_JOYPAD_RIGHT, DEVICE_ID_JOYPAD_SELECT,
    DEVICE_ID_JOYPAD_START, DEVICE_ID_JOYPAD_UP, DEVICE_ID_JOYPAD_X, DEVICE_ID_JOYPAD_Y,
    DEVICE_JOYPAD,
};

use crate::core::Frontend;

/// Port whose joypad drives the keypad.
pub const INPUT_PORT: c_uint = 0;

/// RetroPad button, the key it presses, and the label shown by the frontend.
pub const JOYPAD_KEYMAP: [(c_uint, Key, &CStr); 16] = [
    (DEVICE_ID_JOYPAD_B, Key::K0, c"Key 0"),
    (DEVICE_ID_JOYPAD_Y, Key::K3, c"Key 3"),
    (DEVICE_ID_JOYPAD_SELECT, Key::KE, c"Key E"),
    (DEVICE_ID_JOYPAD_START, Key::KF, c"Key F"),
    (DEVICE_ID_JOYPAD_UP, Key::K2, c"Key 2 (up)"),
    (DEVICE_ID_JOYPAD_DOWN, Key::K8, c"Key 8 (down)"),
    (DEVICE_ID_JOYPAD_LEFT, Key::K4, c"Key 4 (left)"),
    (DEVICE_ID_JOYPAD_RIGHT, Key::K6, c"Key 6 (right)"),
    (DEVICE_ID_JOYPAD_A, Key::K5, c"Key 5"),
    (DEVICE_ID_JOYPAD_X, Key::K1, c"Key 1"),
    (DEVICE_ID_JOYPAD_L, Key::K7, c"Key 7"),
    (DEVICE_ID_JOYPAD_R, Key::K9, c"Key 9"),
    (DEVICE_ID_JOYPAD_L2, Key::KA, c"Key A"),
    (DEVICE_ID_JOYPAD_R2, Key::KB, c"Key B"),
    (DEVICE_ID_JOYPAD_L3, Key::KC, c"Key C"),
    (DEVICE_ID_JOYPAD_R3, Key::KD, c"Key D"),
];

/// Queries every mapped button on [`INPUT_PORT`].
pub fn read_keypad<F: Frontend + ?Sized>(frontend: &mut F) -> Keypad {
    let mut keypad = Keypad::default();
    for (id, key, _) in JOYPAD_KEYMAP {
        let pressed = frontend.input_state(INPUT_PORT, DEVICE_JOYPAD, 0, id) != 0;
        keypad.set(key, pressed);
    }
    keypad
}

#[cfg(test)]
mod tests {
    use super::JOYPAD_KEYMAP;
    use chip8_core::{Key, KEY_COUNT};

    #[test]
    fn every_key_is_reachable_exactly_once() {
        let mut seen = [false; KEY_COUNT];
        for (_, key, _) in JOYPAD_KEYMAP {
            let index = usize::from(key.value());
            assert!(!seen[index], "{key:?} mapped twice");
            seen[index] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn buttons_are_distinct() {
        for (i, (a, _, _)) in JOYPAD_KEYMAP.iter().enumerate() {
            for (b, _, _) in &JOYPAD_KEYMAP[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(JOYPAD_KEYMAP[0].1, Key::K0);
    }
}
