//! Power-on, reset and ROM loading behavior.

use chip8_core::{
    CoreConfig, Keypad, Machine, Rom, RomError, RunState, FONT, MAX_ROM_SIZE, PROGRAM_ADDRESS,
    STACK_ADDRESS,
};
use log as _;
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

#[test]
fn load_places_program_at_0x200_with_font_below() {
    let mut machine = Machine::new(CoreConfig::default());
    machine
        .load_rom(Rom::new("boot", vec![0xA2, 0x2A, 0x12, 0x02]))
        .expect("rom fits");

    let memory = machine.memory();
    assert_eq!(&memory[..FONT.len()], &FONT);
    assert_eq!(&memory[0x200..0x204], &[0xA2, 0x2A, 0x12, 0x02]);
    assert_eq!(machine.state().regs.pc(), PROGRAM_ADDRESS);
    assert_eq!(machine.state().regs.sp(), STACK_ADDRESS);
}

#[test]
fn largest_rom_fills_memory_up_to_the_stack() {
    let mut machine = Machine::default();
    machine
        .load_rom(Rom::new("full", vec![0x11; MAX_ROM_SIZE]))
        .expect("max size fits");
    assert_eq!(machine.memory()[usize::from(STACK_ADDRESS) - 1], 0x11);
    assert_eq!(machine.memory()[usize::from(STACK_ADDRESS)], 0x00);

    assert_eq!(
        machine.load_rom(Rom::new("big", vec![0; MAX_ROM_SIZE + 1])),
        Err(RomError::TooLarge {
            size: MAX_ROM_SIZE + 1,
            max: MAX_ROM_SIZE
        })
    );
    assert_eq!(machine.rom().map(|rom| rom.name.as_str()), Some("full"));
}

#[test]
fn reset_clears_fault_and_restarts_program() {
    let mut machine = Machine::default();
    // RET with an empty stack.
    machine
        .load_rom(Rom::new("underflow", vec![0x00, 0xEE]))
        .expect("rom fits");
    let outcome = machine.run_frame(Keypad::default());
    assert!(outcome.fault.is_some());
    assert_eq!(outcome.instructions, 0);

    machine.reset();
    assert_eq!(machine.state().run_state, RunState::Running);
    assert_eq!(machine.state().regs.pc(), PROGRAM_ADDRESS);
}

#[test]
fn reset_reseeds_random_sequence() {
    // RND V0, 0xFF; RND V1, 0xFF; JP 0x204
    let program = vec![0xC0, 0xFF, 0xC1, 0xFF, 0x12, 0x04];
    let mut machine = Machine::new(CoreConfig {
        rng_seed: 1234,
        ..CoreConfig::default()
    });
    machine.load_rom(Rom::new("rnd", program)).expect("rom fits");

    machine.run_frame(Keypad::default());
    let first = (machine.state().regs.v(0), machine.state().regs.v(1));
    machine.reset();
    machine.run_frame(Keypad::default());
    let second = (machine.state().regs.v(0), machine.state().regs.v(1));

    assert_eq!(first, second);
}
