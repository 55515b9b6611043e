//! Prints a hash of machine state after a fixed input script, for comparing
//! builds across hosts.

use chip8_core::{CoreConfig, Key, Keypad, Machine, Quirks, Rom};
use log as _;
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

// Draws random glyphs at random positions, reacting to key 5.
const PROGRAM: [u8; 24] = [
    0xC0, 0x3F, // RND V0, 0x3F
    0xC1, 0x1F, // RND V1, 0x1F
    0xC2, 0x0F, // RND V2, 0x0F
    0xF2, 0x29, // LD F, V2
    0xD0, 0x15, // DRW V0, V1, 5
    0x63, 0x05, // LD V3, 5
    0xE3, 0xA1, // SKNP V3
    0x00, 0xE0, // CLS
    0xF4, 0x07, // LD V4, DT
    0x34, 0x00, // SE V4, 0
    0x12, 0x10, // JP 0x210
    0x12, 0x00, // JP 0x200
];

fn hash_bytes(hash: &mut u64, bytes: &[u8]) {
    for byte in bytes {
        *hash ^= u64::from(*byte);
        *hash = hash.wrapping_mul(0x1000_0000_01B3);
    }
}

fn fingerprint() -> String {
    let mut hash = 0xcbf2_9ce4_8422_2325_u64;

    for quirks in [Quirks::modern(), Quirks::cosmac()] {
        let mut machine = Machine::new(CoreConfig {
            quirks,
            ..CoreConfig::default()
        });
        machine
            .load_rom(Rom::new("fingerprint", PROGRAM.to_vec()))
            .expect("program fits");

        for frame in 0..240_u32 {
            let mut keys = Keypad::default();
            keys.set(Key::K5, frame % 37 < 5);
            let outcome = machine.run_frame(keys);
            hash_bytes(&mut hash, &outcome.instructions.to_le_bytes());
            hash_bytes(&mut hash, &[u8::from(outcome.display_changed)]);
        }

        hash_bytes(&mut hash, &machine.snapshot());
    }

    format!("{hash:016x}")
}

fn main() {
    println!("{}", fingerprint());
}
