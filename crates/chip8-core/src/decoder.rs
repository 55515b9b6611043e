//! Instruction decoder for the CHIP-8 instruction set.
//!
//! Opcodes are 16-bit big-endian words. Field names follow the usual
//! notation: `nnn` is a 12-bit address, `kk` an 8-bit immediate, `n` a 4-bit
//! immediate, and `x`/`y` register indices.

use crate::fault::FaultCode;

/// A decoded CHIP-8 instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Instruction {
    /// `0nnn`: machine-code routine call, ignored by interpreters.
    Sys { nnn: u16 },
    /// `00E0`: clear the display.
    Cls,
    /// `00EE`: return from subroutine.
    Ret,
    /// `1nnn`: jump to `nnn`.
    Jump { nnn: u16 },
    /// `2nnn`: call subroutine at `nnn`.
    Call { nnn: u16 },
    /// `3xkk`: skip next if `Vx == kk`.
    SkipEqualImm { x: u8, kk: u8 },
    /// `4xkk`: skip next if `Vx != kk`.
    SkipNotEqualImm { x: u8, kk: u8 },
    /// `5xy0`: skip next if `Vx == Vy`.
    SkipEqualReg { x: u8, y: u8 },
    /// `6xkk`: `Vx = kk`.
    LoadImm { x: u8, kk: u8 },
    /// `7xkk`: `Vx += kk` without carry.
    AddImm { x: u8, kk: u8 },
    /// `8xy0`: `Vx = Vy`.
    LoadReg { x: u8, y: u8 },
    /// `8xy1`: `Vx |= Vy`.
    Or { x: u8, y: u8 },
    /// `8xy2`: `Vx &= Vy`.
    And { x: u8, y: u8 },
    /// `8xy3`: `Vx ^= Vy`.
    Xor { x: u8, y: u8 },
    /// `8xy4`: `Vx += Vy`, `VF` = carry.
    AddReg { x: u8, y: u8 },
    /// `8xy5`: `Vx -= Vy`, `VF` = not borrow.
    Sub { x: u8, y: u8 },
    /// `8xy6`: shift right, `VF` = shifted-out bit.
    ShiftRight { x: u8, y: u8 },
    /// `8xy7`: `Vx = Vy - Vx`, `VF` = not borrow.
    SubReverse { x: u8, y: u8 },
    /// `8xyE`: shift left, `VF` = shifted-out bit.
    ShiftLeft { x: u8, y: u8 },
    /// `9xy0`: skip next if `Vx != Vy`.
    SkipNotEqualReg { x: u8, y: u8 },
    /// `Annn`: `I = nnn`.
    LoadIndex { nnn: u16 },
    /// `Bnnn`: jump to `nnn + V0` (or `+ Vx` under the jump quirk).
    JumpOffset { nnn: u16 },
    /// `Cxkk`: `Vx = random & kk`.
    Random { x: u8, kk: u8 },
    /// `Dxyn`: draw an `n`-row sprite from `[I]` at `(Vx, Vy)`.
    Draw { x: u8, y: u8, n: u8 },
    /// `Ex9E`: skip next if key `Vx` is pressed.
    SkipKeyPressed { x: u8 },
    /// `ExA1`: skip next if key `Vx` is not pressed.
    SkipKeyNotPressed { x: u8 },
    /// `Fx07`: `Vx = DT`.
    LoadDelay { x: u8 },
    /// `Fx0A`: wait for a key and store it in `Vx`.
    WaitKey { x: u8 },
    /// `Fx15`: `DT = Vx`.
    SetDelay { x: u8 },
    /// `Fx18`: `ST = Vx`.
    SetSound { x: u8 },
    /// `Fx1E`: `I += Vx`.
    AddIndex { x: u8 },
    /// `Fx29`: `I` = font glyph for `Vx`.
    LoadFont { x: u8 },
    /// `Fx33`: BCD of `Vx` into `[I..I+3]`.
    StoreBcd { x: u8 },
    /// `Fx55`: store `V0..=Vx` at `[I]`.
    StoreRegisters { x: u8 },
    /// `Fx65`: load `V0..=Vx` from `[I]`.
    LoadRegisters { x: u8 },
}

const fn nibble_x(word: u16) -> u8 {
    ((word >> 8) & 0x0F) as u8
}

const fn nibble_y(word: u16) -> u8 {
    ((word >> 4) & 0x0F) as u8
}

const fn low_byte(word: u16) -> u8 {
    (word & 0xFF) as u8
}

const fn address(word: u16) -> u16 {
    word & 0x0FFF
}

/// Stateless instruction decoder.
pub struct Decoder;

impl Decoder {
    /// Decodes a 16-bit opcode.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::IllegalInstruction`] for words outside the
    /// instruction set (for example `5xy1`, `8xy8`, `E000`, `F000`).
    pub const fn decode(word: u16) -> Result<Instruction, FaultCode> {
        let x = nibble_x(word);
        let y = nibble_y(word);
        let kk = low_byte(word);
        let nnn = address(word);
        let n = (word & 0x000F) as u8;

        let instruction = match word >> 12 {
            0x0 => match word {
                0x00E0 => Instruction::Cls,
                0x00EE => Instruction::Ret,
                _ => Instruction::Sys { nnn },
            },
            0x1 => Instruction::Jump { nnn },
            0x2 => Instruction::Call { nnn },
            0x3 => Instruction::SkipEqualImm { x, kk },
            0x4 => Instruction::SkipNotEqualImm { x, kk },
            0x5 if n == 0 => Instruction::SkipEqualReg { x, y },
            0x6 => Instruction::LoadImm { x, kk },
            0x7 => Instruction::AddImm { x, kk },
            0x8 => match n {
                0x0 => Instruction::LoadReg { x, y },
                0x1 => Instruction::Or { x, y },
                0x2 => Instruction::And { x, y },
                0x3 => Instruction::Xor { x, y },
                0x4 => Instruction::AddReg { x, y },
                0x5 => Instruction::Sub { x, y },
                0x6 => Instruction::ShiftRight { x, y },
                0x7 => Instruction::SubReverse { x, y },
                0xE => Instruction::ShiftLeft { x, y },
                _ => return Err(FaultCode::IllegalInstruction),
            },
            0x9 if n == 0 => Instruction::SkipNotEqualReg { x, y },
            0xA => Instruction::LoadIndex { nnn },
            0xB => Instruction::JumpOffset { nnn },
            0xC => Instruction::Random { x, kk },
            0xD => Instruction::Draw { x, y, n },
            0xE => match kk {
                0x9E => Instruction::SkipKeyPressed { x },
                0xA1 => Instruction::SkipKeyNotPressed { x },
                _ => return Err(FaultCode::IllegalInstruction),
            },
            0xF => match kk {
                0x07 => Instruction::LoadDelay { x },
                0x0A => Instruction::WaitKey { x },
                0x15 => Instruction::SetDelay { x },
                0x18 => Instruction::SetSound { x },
                0x1E => Instruction::AddIndex { x },
                0x29 => Instruction::LoadFont { x },
                0x33 => Instruction::StoreBcd { x },
                0x55 => Instruction::StoreRegisters { x },
                0x65 => Instruction::LoadRegisters { x },
                _ => return Err(FaultCode::IllegalInstruction),
            },
            _ => return Err(FaultCode::IllegalInstruction),
        };

        Ok(instruction)
    }
}

const fn xy(op: u16, x: u8, y: u8, n: u16) -> u16 {
    (op << 12) | ((x as u16 & 0xF) << 8) | ((y as u16 & 0xF) << 4) | n
}

const fn xkk(op: u16, x: u8, kk: u8) -> u16 {
    (op << 12) | ((x as u16 & 0xF) << 8) | kk as u16
}

const fn onnn(op: u16, nnn: u16) -> u16 {
    (op << 12) | (nnn & 0x0FFF)
}

impl Instruction {
    /// Re-encodes this instruction back to its 16-bit opcode.
    #[must_use]
    pub const fn encode(self) -> u16 {
        match self {
            Self::Sys { nnn } => onnn(0x0, nnn),
            Self::Cls => 0x00E0,
            Self::Ret => 0x00EE,
            Self::Jump { nnn } => onnn(0x1, nnn),
            Self::Call { nnn } => onnn(0x2, nnn),
            Self::SkipEqualImm { x, kk } => xkk(0x3, x, kk),
            Self::SkipNotEqualImm { x, kk } => xkk(0x4, x, kk),
            Self::SkipEqualReg { x, y } => xy(0x5, x, y, 0x0),
            Self::LoadImm { x, kk } => xkk(0x6, x, kk),
            Self::AddImm { x, kk } => xkk(0x7, x, kk),
            Self::LoadReg { x, y } => xy(0x8, x, y, 0x0),
            Self::Or { x, y } => xy(0x8, x, y, 0x1),
            Self::And { x, y } => xy(0x8, x, y, 0x2),
            Self::Xor { x, y } => xy(0x8, x, y, 0x3),
            Self::AddReg { x, y } => xy(0x8, x, y, 0x4),
            Self::Sub { x, y } => xy(0x8, x, y, 0x5),
            Self::ShiftRight { x, y } => xy(0x8, x, y, 0x6),
            Self::SubReverse { x, y } => xy(0x8, x, y, 0x7),
            Self::ShiftLeft { x, y } => xy(0x8, x, y, 0xE),
            Self::SkipNotEqualReg { x, y } => xy(0x9, x, y, 0x0),
            Self::LoadIndex { nnn } => onnn(0xA, nnn),
            Self::JumpOffset { nnn } => onnn(0xB, nnn),
            Self::Random { x, kk } => xkk(0xC, x, kk),
            Self::Draw { x, y, n } => xy(0xD, x, y, (n & 0xF) as u16),
            Self::SkipKeyPressed { x } => xkk(0xE, x, 0x9E),
            Self::SkipKeyNotPressed { x } => xkk(0xE, x, 0xA1),
            Self::LoadDelay { x } => xkk(0xF, x, 0x07),
            Self::WaitKey { x } => xkk(0xF, x, 0x0A),
            Self::SetDelay { x } => xkk(0xF, x, 0x15),
            Self::SetSound { x } => xkk(0xF, x, 0x18),
            Self::AddIndex { x } => xkk(0xF, x, 0x1E),
            Self::LoadFont { x } => xkk(0xF, x, 0x29),
            Self::StoreBcd { x } => xkk(0xF, x, 0x33),
            Self::StoreRegisters { x } => xkk(0xF, x, 0x55),
            Self::LoadRegisters { x } => xkk(0xF, x, 0x65),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Decoder, Instruction};
    use crate::fault::FaultCode;

    #[test]
    fn decode_system_words() {
        assert_eq!(Decoder::decode(0x00E0), Ok(Instruction::Cls));
        assert_eq!(Decoder::decode(0x00EE), Ok(Instruction::Ret));
        assert_eq!(
            Decoder::decode(0x0123),
            Ok(Instruction::Sys { nnn: 0x123 })
        );
    }

    #[test]
    fn decode_extracts_fields() {
        assert_eq!(
            Decoder::decode(0xD5A7),
            Ok(Instruction::Draw { x: 5, y: 0xA, n: 7 })
        );
        assert_eq!(
            Decoder::decode(0x3C42),
            Ok(Instruction::SkipEqualImm { x: 0xC, kk: 0x42 })
        );
        assert_eq!(
            Decoder::decode(0xBFFF),
            Ok(Instruction::JumpOffset { nnn: 0xFFF })
        );
    }

    #[test]
    fn holes_in_the_opcode_space_fault() {
        for word in [0x5121u16, 0x8128, 0x812F, 0x9121, 0xE19F, 0xE000, 0xF000, 0xF1FF] {
            assert_eq!(
                Decoder::decode(word),
                Err(FaultCode::IllegalInstruction),
                "{word:#06X} should fault"
            );
        }
    }

    #[test]
    fn every_decodable_word_reencodes_to_itself() {
        for word in 0u16..=u16::MAX {
            if let Ok(instruction) = Decoder::decode(word) {
                assert_eq!(instruction.encode(), word, "{word:#06X}");
            }
        }
    }
}
