//! Instruction execution for the CHIP-8 interpreter.
//!
//! Every step is precise: a faulting instruction leaves registers and memory
//! untouched and latches the fault in [`RunState::FaultLatched`].

mod alu;

pub use alu::AluResult;

use crate::display;
use crate::memory::{
    glyph_address, read_u16_be, write_u16_be, ADDRESS_MASK, INSTRUCTION_SIZE, STACK_ADDRESS,
    STACK_DEPTH, VIDEO_BUFFER_ADDRESS, VIDEO_BUFFER_SIZE,
};
use crate::timing::clamp_instructions_per_frame;
use crate::{
    CoreConfig, CoreState, Decoder, FaultCode, FrameOutcome, Instruction, Key, Registers,
    RunState, StepOutcome,
};

/// Highest stack pointer value, reached once all slots hold a return address.
#[allow(clippy::cast_possible_truncation)]
const STACK_LIMIT: u16 = STACK_ADDRESS + (STACK_DEPTH as u16) * 2;

/// Longest sprite `DRW` can draw (`n` is a nibble).
const MAX_SPRITE_ROWS: usize = 15;

enum Flow {
    Next,
    Skip,
    Jump(u16),
    Wait,
}

/// Executes one instruction, or advances the key-wait state machine.
pub fn step_one(state: &mut CoreState, config: &CoreConfig) -> StepOutcome {
    match state.run_state {
        RunState::FaultLatched(cause) => StepOutcome::Fault { cause },
        RunState::WaitingForKey { register, pressed } => step_key_wait(state, register, pressed),
        RunState::Running => step_running(state, config),
    }
}

/// Runs one 60 Hz frame.
///
/// Executes up to `config.instructions_per_frame` steps, stopping early on a
/// fault or while waiting for a key, then ticks both timers once.
pub fn run_frame(state: &mut CoreState, config: &CoreConfig) -> FrameOutcome {
    let budget = clamp_instructions_per_frame(config.instructions_per_frame);
    let mut instructions = 0;

    for _ in 0..budget {
        match step_one(state, config) {
            StepOutcome::Retired { .. } => instructions += 1,
            StepOutcome::WaitingForKey | StepOutcome::Fault { .. } => break,
        }
    }

    state.regs.tick_timers();

    FrameOutcome {
        instructions,
        display_changed: state.display_dirty,
        sound_active: state.regs.sound_timer() > 0,
        fault: state.latched_fault(),
    }
}

fn latch(state: &mut CoreState, cause: FaultCode) -> StepOutcome {
    log::warn!("fault latched at pc {:#05x}: {cause}", state.regs.pc());
    state.run_state = RunState::FaultLatched(cause);
    StepOutcome::Fault { cause }
}

fn step_key_wait(state: &mut CoreState, register: u8, pressed: Option<u8>) -> StepOutcome {
    match pressed {
        None => {
            if let Some(key) = state.keypad.first_pressed() {
                state.run_state = RunState::WaitingForKey {
                    register,
                    pressed: Some(key.value()),
                };
            }
            StepOutcome::WaitingForKey
        }
        Some(value) if state.keypad.is_pressed(Key::from_nibble(value)) => {
            StepOutcome::WaitingForKey
        }
        Some(value) => {
            state.regs.set_v(register, value);
            state.run_state = RunState::Running;
            StepOutcome::Retired {
                word: Instruction::WaitKey { x: register }.encode(),
            }
        }
    }
}

fn step_running(state: &mut CoreState, config: &CoreConfig) -> StepOutcome {
    let pc = state.regs.pc();
    if pc > ADDRESS_MASK - 1 {
        return latch(state, FaultCode::ProgramCounterOutOfRange);
    }
    let Some(word) = read_u16_be(&state.memory, pc) else {
        return latch(state, FaultCode::ProgramCounterOutOfRange);
    };
    let instruction = match Decoder::decode(word) {
        Ok(instruction) => instruction,
        Err(cause) => return latch(state, cause),
    };

    let flow = match execute(state, config, instruction) {
        Ok(flow) => flow,
        Err(cause) => return latch(state, cause),
    };

    let next_pc = match flow {
        Flow::Next | Flow::Wait => pc + INSTRUCTION_SIZE,
        Flow::Skip => pc + INSTRUCTION_SIZE * 2,
        Flow::Jump(target) => target,
    };
    state.regs.set_pc(next_pc);

    if matches!(flow, Flow::Wait) {
        return StepOutcome::WaitingForKey;
    }
    StepOutcome::Retired { word }
}

const fn skip_if(condition: bool) -> Flow {
    if condition {
        Flow::Skip
    } else {
        Flow::Next
    }
}

fn masked(addr: u16) -> usize {
    usize::from(addr & ADDRESS_MASK)
}

fn apply_alu(regs: &mut Registers, x: u8, result: AluResult) {
    regs.set_v(x, result.value);
    if let Some(flag) = result.flag {
        regs.set_vf(flag);
    }
}

#[allow(clippy::too_many_lines)]
fn execute(
    state: &mut CoreState,
    config: &CoreConfig,
    instruction: Instruction,
) -> Result<Flow, FaultCode> {
    let quirks = config.quirks;
    let regs = &mut state.regs;

    let flow = match instruction {
        Instruction::Sys { .. } => Flow::Next,
        Instruction::Cls => {
            let start = usize::from(VIDEO_BUFFER_ADDRESS);
            display::clear(&mut state.memory[start..start + VIDEO_BUFFER_SIZE]);
            state.display_dirty = true;
            Flow::Next
        }
        Instruction::Ret => {
            let sp = regs.sp();
            if sp <= STACK_ADDRESS {
                return Err(FaultCode::StackUnderflow);
            }
            let top = sp - 2;
            let target = read_u16_be(&state.memory, top).ok_or(FaultCode::StackUnderflow)?;
            regs.set_sp(top);
            Flow::Jump(target)
        }
        Instruction::Jump { nnn } => Flow::Jump(nnn),
        Instruction::Call { nnn } => {
            let sp = regs.sp();
            if sp >= STACK_LIMIT {
                return Err(FaultCode::StackOverflow);
            }
            let return_address = regs.pc() + INSTRUCTION_SIZE;
            write_u16_be(&mut state.memory, sp, return_address).ok_or(FaultCode::StackOverflow)?;
            regs.set_sp(sp + 2);
            Flow::Jump(nnn)
        }
        Instruction::SkipEqualImm { x, kk } => skip_if(regs.v(x) == kk),
        Instruction::SkipNotEqualImm { x, kk } => skip_if(regs.v(x) != kk),
        Instruction::SkipEqualReg { x, y } => skip_if(regs.v(x) == regs.v(y)),
        Instruction::SkipNotEqualReg { x, y } => skip_if(regs.v(x) != regs.v(y)),
        Instruction::LoadImm { x, kk } => {
            regs.set_v(x, kk);
            Flow::Next
        }
        Instruction::AddImm { x, kk } => {
            regs.set_v(x, regs.v(x).wrapping_add(kk));
            Flow::Next
        }
        Instruction::LoadReg { x, y } => {
            regs.set_v(x, regs.v(y));
            Flow::Next
        }
        Instruction::Or { x, y } => {
            let result = alu::logic(regs.v(x) | regs.v(y), quirks.logic_resets_vf);
            apply_alu(regs, x, result);
            Flow::Next
        }
        Instruction::And { x, y } => {
            let result = alu::logic(regs.v(x) & regs.v(y), quirks.logic_resets_vf);
            apply_alu(regs, x, result);
            Flow::Next
        }
        Instruction::Xor { x, y } => {
            let result = alu::logic(regs.v(x) ^ regs.v(y), quirks.logic_resets_vf);
            apply_alu(regs, x, result);
            Flow::Next
        }
        Instruction::AddReg { x, y } => {
            let result = alu::add(regs.v(x), regs.v(y));
            apply_alu(regs, x, result);
            Flow::Next
        }
        Instruction::Sub { x, y } => {
            let result = alu::sub(regs.v(x), regs.v(y));
            apply_alu(regs, x, result);
            Flow::Next
        }
        Instruction::SubReverse { x, y } => {
            let result = alu::sub(regs.v(y), regs.v(x));
            apply_alu(regs, x, result);
            Flow::Next
        }
        Instruction::ShiftRight { x, y } => {
            let source = if quirks.shift_uses_vy { regs.v(y) } else { regs.v(x) };
            apply_alu(regs, x, alu::shift_right(source));
            Flow::Next
        }
        Instruction::ShiftLeft { x, y } => {
            let source = if quirks.shift_uses_vy { regs.v(y) } else { regs.v(x) };
            apply_alu(regs, x, alu::shift_left(source));
            Flow::Next
        }
        Instruction::LoadIndex { nnn } => {
            regs.set_i(nnn);
            Flow::Next
        }
        Instruction::JumpOffset { nnn } => {
            let offset_register = if quirks.jump_uses_vx {
                nnn.to_be_bytes()[0] & 0x0F
            } else {
                0
            };
            Flow::Jump(nnn + u16::from(regs.v(offset_register)))
        }
        Instruction::Random { x, kk } => {
            let value = state.rng.next_u8() & kk;
            regs.set_v(x, value);
            Flow::Next
        }
        Instruction::Draw { x, y, n } => {
            let origin_x = usize::from(regs.v(x));
            let origin_y = usize::from(regs.v(y));
            let rows = usize::from(n).min(MAX_SPRITE_ROWS);
            let mut sprite = [0u8; MAX_SPRITE_ROWS];
            for (offset, byte) in (0u16..).zip(sprite.iter_mut().take(rows)) {
                *byte = state.memory[masked(regs.i().wrapping_add(offset))];
            }
            let start = usize::from(VIDEO_BUFFER_ADDRESS);
            let collision = display::draw_sprite(
                &mut state.memory[start..start + VIDEO_BUFFER_SIZE],
                origin_x,
                origin_y,
                &sprite[..rows],
                quirks.clip_sprites,
            );
            regs.set_vf(u8::from(collision));
            state.display_dirty = true;
            Flow::Next
        }
        Instruction::SkipKeyPressed { x } => {
            skip_if(state.keypad.is_pressed(Key::from_nibble(regs.v(x))))
        }
        Instruction::SkipKeyNotPressed { x } => {
            skip_if(!state.keypad.is_pressed(Key::from_nibble(regs.v(x))))
        }
        Instruction::LoadDelay { x } => {
            regs.set_v(x, regs.delay_timer());
            Flow::Next
        }
        Instruction::WaitKey { x } => {
            state.run_state = RunState::WaitingForKey {
                register: x,
                pressed: None,
            };
            Flow::Wait
        }
        Instruction::SetDelay { x } => {
            regs.set_delay_timer(regs.v(x));
            Flow::Next
        }
        Instruction::SetSound { x } => {
            regs.set_sound_timer(regs.v(x));
            Flow::Next
        }
        Instruction::AddIndex { x } => {
            regs.set_i(regs.i().wrapping_add(u16::from(regs.v(x))));
            Flow::Next
        }
        Instruction::LoadFont { x } => {
            regs.set_i(glyph_address(regs.v(x)));
            Flow::Next
        }
        Instruction::StoreBcd { x } => {
            let value = regs.v(x);
            let base = regs.i();
            state.memory[masked(base)] = value / 100;
            state.memory[masked(base.wrapping_add(1))] = (value / 10) % 10;
            state.memory[masked(base.wrapping_add(2))] = value % 10;
            Flow::Next
        }
        Instruction::StoreRegisters { x } => {
            let base = regs.i();
            for offset in 0..=x {
                state.memory[masked(base.wrapping_add(u16::from(offset)))] = regs.v(offset);
            }
            if quirks.memory_increments_i {
                regs.set_i(base.wrapping_add(u16::from(x) + 1));
            }
            Flow::Next
        }
        Instruction::LoadRegisters { x } => {
            let base = regs.i();
            for offset in 0..=x {
                let value = state.memory[masked(base.wrapping_add(u16::from(offset)))];
                regs.set_v(offset, value);
            }
            if quirks.memory_increments_i {
                regs.set_i(base.wrapping_add(u16::from(x) + 1));
            }
            Flow::Next
        }
    };

    Ok(flow)
}
