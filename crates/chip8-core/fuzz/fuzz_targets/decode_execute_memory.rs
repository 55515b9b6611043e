#![no_main]

use chip8_core::{
    decode_memory_region, read_snapshot, step_one, CoreConfig, CoreState, Decoder, Quirks,
    MAX_ROM_SIZE,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    let word = u16::from_be_bytes([data[0], data[1]]);
    let addr = u16::from_be_bytes([data[2], data[3]]);
    if let Ok(instruction) = Decoder::decode(word) {
        assert_eq!(instruction.encode(), word);
    }
    let _ = decode_memory_region(addr);

    let quirks = if data[3] & 1 == 0 {
        Quirks::modern()
    } else {
        Quirks::cosmac()
    };
    let config = CoreConfig {
        quirks,
        ..CoreConfig::default()
    };
    let mut state = CoreState::with_config(&config);
    let program = &data[4..];
    state.reset_canonical(&config, &program[..program.len().min(MAX_ROM_SIZE)]);
    for _ in 0..256 {
        let _ = step_one(&mut state, &config);
    }

    let _ = read_snapshot(data);
});
