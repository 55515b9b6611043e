//! 16-key hexadecimal keypad.
//!
//! The COSMAC VIP layout is
//!
//! ```text
//! 1 2 3 C
//! 4 5 6 D
//! 7 8 9 E
//! A 0 B F
//! ```

/// Number of keys on the keypad.
pub const KEY_COUNT: usize = 16;

/// A keypad key, identified by its hex value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Key {
    K0 = 0x0,
    K1 = 0x1,
    K2 = 0x2,
    K3 = 0x3,
    K4 = 0x4,
    K5 = 0x5,
    K6 = 0x6,
    K7 = 0x7,
    K8 = 0x8,
    K9 = 0x9,
    KA = 0xA,
    KB = 0xB,
    KC = 0xC,
    KD = 0xD,
    KE = 0xE,
    KF = 0xF,
}

impl Key {
    /// All keys in hex order.
    pub const ALL: [Self; KEY_COUNT] = [
        Self::K0,
        Self::K1,
        Self::K2,
        Self::K3,
        Self::K4,
        Self::K5,
        Self::K6,
        Self::K7,
        Self::K8,
        Self::K9,
        Self::KA,
        Self::KB,
        Self::KC,
        Self::KD,
        Self::KE,
        Self::KF,
    ];

    /// Key for the low nibble of `value`.
    #[must_use]
    pub const fn from_nibble(value: u8) -> Self {
        Self::ALL[(value & 0x0F) as usize]
    }

    /// Hex value of the key.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }
}

/// Pressed/released state of all sixteen keys as a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Keypad {
    bits: u16,
}

impl Keypad {
    /// Builds a keypad from a bitmask (bit `n` set means key `n` is down).
    #[must_use]
    pub const fn from_bits(bits: u16) -> Self {
        Self { bits }
    }

    /// Bitmask of pressed keys.
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.bits
    }

    /// Marks `key` as pressed.
    pub const fn press(&mut self, key: Key) {
        self.bits |= 1 << key.value();
    }

    /// Marks `key` as released.
    pub const fn release(&mut self, key: Key) {
        self.bits &= !(1 << key.value());
    }

    /// Sets the state of `key`.
    pub const fn set(&mut self, key: Key, pressed: bool) {
        if pressed {
            self.press(key);
        } else {
            self.release(key);
        }
    }

    /// Returns `true` if `key` is held.
    #[must_use]
    pub const fn is_pressed(self, key: Key) -> bool {
        self.bits & (1 << key.value()) != 0
    }

    /// Lowest-numbered pressed key, if any.
    #[must_use]
    pub const fn first_pressed(self) -> Option<Key> {
        if self.bits == 0 {
            None
        } else {
            Some(Key::from_nibble(self.bits.trailing_zeros() as u8))
        }
    }
}
