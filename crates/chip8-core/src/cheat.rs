//! Memory-poke cheat codes.
//!
//! A code is one or more `AAA:VV` patches (hex address, hex byte) joined with
//! `+`, for example `0x2F0:09+2F1:00`. Enabled patches are written to memory
//! after every frame.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::memory::ADDRESS_MASK;

/// Reasons a cheat code is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum CheatError {
    /// Code contains no patches.
    #[error("cheat code is empty")]
    Empty,
    /// A patch has no `:` between address and value.
    #[error("patch `{0}` is missing `:`")]
    MissingSeparator(String),
    /// Address part is not hexadecimal.
    #[error("patch `{0}` has an invalid address")]
    InvalidAddress(String),
    /// Address is past the end of memory.
    #[error("address {0:#x} is outside the 4 KiB address space")]
    AddressOutOfRange(u32),
    /// Value part is not a hexadecimal byte.
    #[error("patch `{0}` has an invalid value")]
    InvalidValue(String),
}

/// A single memory patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CheatPatch {
    /// Target address.
    pub address: u16,
    /// Byte written at `address`.
    pub value: u8,
}

/// A parsed cheat code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheatCode {
    /// Patches in the order they were written.
    pub patches: Vec<CheatPatch>,
}

fn strip_hex_prefix(text: &str) -> &str {
    text.strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text)
}

fn parse_patch(text: &str) -> Result<CheatPatch, CheatError> {
    let (address, value) = text
        .split_once(':')
        .ok_or_else(|| CheatError::MissingSeparator(text.to_owned()))?;

    let address = u32::from_str_radix(strip_hex_prefix(address.trim()), 16)
        .map_err(|_| CheatError::InvalidAddress(text.to_owned()))?;
    let address = u16::try_from(address)
        .ok()
        .filter(|address| *address <= ADDRESS_MASK)
        .ok_or(CheatError::AddressOutOfRange(address))?;
    let value = u8::from_str_radix(strip_hex_prefix(value.trim()), 16)
        .map_err(|_| CheatError::InvalidValue(text.to_owned()))?;

    Ok(CheatPatch { address, value })
}

impl CheatCode {
    /// Parses a `+`-joined list of `AAA:VV` patches.
    ///
    /// # Errors
    ///
    /// Returns a [`CheatError`] for the first malformed patch.
    pub fn parse(code: &str) -> Result<Self, CheatError> {
        let patches = code
            .split('+')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(parse_patch)
            .collect::<Result<Vec<_>, _>>()?;
        if patches.is_empty() {
            return Err(CheatError::Empty);
        }
        Ok(Self { patches })
    }

    /// Writes every patch into `memory`.
    pub fn apply(&self, memory: &mut [u8]) {
        for patch in &self.patches {
            if let Some(byte) = memory.get_mut(usize::from(patch.address)) {
                *byte = patch.value;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CheatSlot {
    enabled: bool,
    code: CheatCode,
}

/// Indexed cheat table, as the host frontend manages it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CheatList {
    slots: BTreeMap<usize, CheatSlot>,
}

impl CheatList {
    /// Stores `code` at `index`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns a [`CheatError`] and leaves the slot untouched when `code`
    /// does not parse.
    pub fn set(&mut self, index: usize, enabled: bool, code: &str) -> Result<(), CheatError> {
        let code = CheatCode::parse(code)?;
        self.slots.insert(index, CheatSlot { enabled, code });
        Ok(())
    }

    /// Removes every cheat.
    pub fn reset(&mut self) {
        self.slots.clear();
    }

    /// Number of enabled cheats.
    #[must_use]
    pub fn enabled_count(&self) -> usize {
        self.slots.values().filter(|slot| slot.enabled).count()
    }

    /// Writes all enabled cheats into `memory`, lowest index first.
    pub fn apply(&self, memory: &mut [u8]) {
        for slot in self.slots.values().filter(|slot| slot.enabled) {
            slot.code.apply(memory);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CheatCode, CheatError, CheatList, CheatPatch};

    #[test]
    fn parses_joined_patches_with_prefixes_and_spaces() {
        let code = CheatCode::parse(" 0x2F0:09 + 2f1 : 0xFF ").expect("code should parse");
        assert_eq!(
            code.patches,
            vec![
                CheatPatch {
                    address: 0x2F0,
                    value: 0x09
                },
                CheatPatch {
                    address: 0x2F1,
                    value: 0xFF
                },
            ]
        );
    }

    #[test]
    fn malformed_codes_are_rejected() {
        assert_eq!(CheatCode::parse(""), Err(CheatError::Empty));
        assert_eq!(CheatCode::parse(" + "), Err(CheatError::Empty));
        assert_eq!(
            CheatCode::parse("2F0"),
            Err(CheatError::MissingSeparator("2F0".to_owned()))
        );
        assert_eq!(
            CheatCode::parse("ZZ:01"),
            Err(CheatError::InvalidAddress("ZZ:01".to_owned()))
        );
        assert_eq!(
            CheatCode::parse("1000:01"),
            Err(CheatError::AddressOutOfRange(0x1000))
        );
        assert_eq!(
            CheatCode::parse("200:100"),
            Err(CheatError::InvalidValue("200:100".to_owned()))
        );
    }

    #[test]
    fn only_enabled_cheats_are_applied() {
        let mut cheats = CheatList::default();
        cheats.set(0, true, "300:AA").expect("valid");
        cheats.set(3, false, "301:BB").expect("valid");
        assert_eq!(cheats.enabled_count(), 1);

        let mut memory = vec![0u8; 4096];
        cheats.apply(&mut memory);
        assert_eq!(memory[0x300], 0xAA);
        assert_eq!(memory[0x301], 0x00);

        cheats.reset();
        assert_eq!(cheats.enabled_count(), 0);
    }

    #[test]
    fn failed_set_keeps_previous_entry() {
        let mut cheats = CheatList::default();
        cheats.set(0, true, "300:AA").expect("valid");
        assert!(cheats.set(0, true, "bogus").is_err());

        let mut memory = vec![0u8; 4096];
        cheats.apply(&mut memory);
        assert_eq!(memory[0x300], 0xAA);
    }

    #[test]
    fn sparse_and_huge_indices_are_stored_without_growing_a_table() {
        let mut cheats = CheatList::default();
        cheats.set(usize::MAX, true, "301:02").expect("valid");
        cheats.set(u32::MAX as usize, true, "302:03").expect("valid");
        cheats.set(0, true, "301:01").expect("valid");
        assert_eq!(cheats.enabled_count(), 3);

        let mut memory = vec![0u8; 4096];
        cheats.apply(&mut memory);
        assert_eq!(memory[0x301], 0x02);
        assert_eq!(memory[0x302], 0x03);
    }
}
