//! Instruction disassembly in Cowgod's notation.

use std::fmt;

use crate::decoder::{Decoder, Instruction};
use crate::memory::INSTRUCTION_SIZE;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single disassembled listing row.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisassemblyRow {
    /// Address of the first byte.
    pub address: u16,
    /// Bytes covered: 2, or 1 for a trailing odd byte.
    pub len_bytes: u8,
    /// Raw instruction word (or the lone byte).
    pub raw: u16,
    /// Mnemonic, e.g. `LD` or `DRW`; `.word`/`.byte` for data.
    pub mnemonic: String,
    /// Formatted operands, e.g. `V1, 0x2A`.
    pub operands: String,
    /// Word does not decode to a CHIP-8 instruction.
    pub is_illegal: bool,
}

impl fmt::Display for DisassemblyRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw = if self.len_bytes == 1 {
            format!("{:02X}  ", self.raw)
        } else {
            format!("{:04X}", self.raw)
        };
        write!(f, "{:03X}: {raw}  {}", self.address, self.mnemonic)?;
        if !self.operands.is_empty() {
            write!(f, " {}", self.operands)?;
        }
        Ok(())
    }
}

fn mnemonic_and_operands(instruction: Instruction) -> (&'static str, String) {
    match instruction {
        Instruction::Sys { nnn } => ("SYS", format!("0x{nnn:03X}")),
        Instruction::Cls => ("CLS", String::new()),
        Instruction::Ret => ("RET", String::new()),
        Instruction::Jump { nnn } => ("JP", format!("0x{nnn:03X}")),
        Instruction::Call { nnn } => ("CALL", format!("0x{nnn:03X}")),
        Instruction::SkipEqualImm { x, kk } => ("SE", format!("V{x:X}, 0x{kk:02X}")),
        Instruction::SkipNotEqualImm { x, kk } => ("SNE", format!("V{x:X}, 0x{kk:02X}")),
        Instruction::SkipEqualReg { x, y } => ("SE", format!("V{x:X}, V{y:X}")),
        Instruction::LoadImm { x, kk } => ("LD", format!("V{x:X}, 0x{kk:02X}")),
        Instruction::AddImm { x, kk } => ("ADD", format!("V{x:X}, 0x{kk:02X}")),
        Instruction::LoadReg { x, y } => ("LD", format!("V{x:X}, V{y:X}")),
        Instruction::Or { x, y } => ("OR", format!("V{x:X}, V{y:X}")),
        Instruction::And { x, y } => ("AND", format!("V{x:X}, V{y:X}")),
        Instruction::Xor { x, y } => ("XOR", format!("V{x:X}, V{y:X}")),
        Instruction::AddReg { x, y } => ("ADD", format!("V{x:X}, V{y:X}")),
        Instruction::Sub { x, y } => ("SUB", format!("V{x:X}, V{y:X}")),
        Instruction::ShiftRight { x, y } => ("SHR", format!("V{x:X}, V{y:X}")),
        Instruction::SubReverse { x, y } => ("SUBN", format!("V{x:X}, V{y:X}")),
        Instruction::ShiftLeft { x, y } => ("SHL", format!("V{x:X}, V{y:X}")),
        Instruction::SkipNotEqualReg { x, y } => ("SNE", format!("V{x:X}, V{y:X}")),
        Instruction::LoadIndex { nnn } => ("LD", format!("I, 0x{nnn:03X}")),
        Instruction::JumpOffset { nnn } => ("JP", format!("V0, 0x{nnn:03X}")),
        Instruction::Random { x, kk } => ("RND", format!("V{x:X}, 0x{kk:02X}")),
        Instruction::Draw { x, y, n } => ("DRW", format!("V{x:X}, V{y:X}, {n}")),
        Instruction::SkipKeyPressed { x } => ("SKP", format!("V{x:X}")),
        Instruction::SkipKeyNotPressed { x } => ("SKNP", format!("V{x:X}")),
        Instruction::LoadDelay { x } => ("LD", format!("V{x:X}, DT")),
        Instruction::WaitKey { x } => ("LD", format!("V{x:X}, K")),
        Instruction::SetDelay { x } => ("LD", format!("DT, V{x:X}")),
        Instruction::SetSound { x } => ("LD", format!("ST, V{x:X}")),
        Instruction::AddIndex { x } => ("ADD", format!("I, V{x:X}")),
        Instruction::LoadFont { x } => ("LD", format!("F, V{x:X}")),
        Instruction::StoreBcd { x } => ("LD", format!("B, V{x:X}")),
        Instruction::StoreRegisters { x } => ("LD", format!("[I], V{x:X}")),
        Instruction::LoadRegisters { x } => ("LD", format!("V{x:X}, [I]")),
    }
}

/// Disassembles the word at `address`.
#[must_use]
pub fn disassemble_word(address: u16, word: u16) -> DisassemblyRow {
    match Decoder::decode(word) {
        Ok(instruction) => {
            let (mnemonic, operands) = mnemonic_and_operands(instruction);
            DisassemblyRow {
                address,
                len_bytes: 2,
                raw: word,
                mnemonic: mnemonic.to_owned(),
                operands,
                is_illegal: false,
            }
        }
        Err(_) => DisassemblyRow {
            address,
            len_bytes: 2,
            raw: word,
            mnemonic: ".word".to_owned(),
            operands: format!("0x{word:04X} ; ILLEGAL"),
            is_illegal: true,
        },
    }
}

/// Disassembles `bytes` as if loaded at `origin`.
///
/// Words are read pairwise from the start; a trailing odd byte becomes a
/// `.byte` row.
#[must_use]
pub fn disassemble(bytes: &[u8], origin: u16) -> Vec<DisassemblyRow> {
    let mut rows = Vec::with_capacity(bytes.len().div_ceil(2));
    let mut address = origin;

    let mut words = bytes.chunks_exact(2);
    for pair in &mut words {
        rows.push(disassemble_word(
            address,
            u16::from_be_bytes([pair[0], pair[1]]),
        ));
        address = address.wrapping_add(INSTRUCTION_SIZE);
    }
    if let [byte] = words.remainder() {
        rows.push(DisassemblyRow {
            address,
            len_bytes: 1,
            raw: u16::from(*byte),
            mnemonic: ".byte".to_owned(),
            operands: format!("0x{byte:02X}"),
            is_illegal: false,
        });
    }

    rows
}
