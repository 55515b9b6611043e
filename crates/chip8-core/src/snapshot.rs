//! Fixed-size binary save states.
//!
//! The layout never depends on the loaded program, so the size reported to
//! the host stays stable for the life of a game:
//!
//! | offset | size | field |
//! |---|---|---|
//! | 0 | 4 | magic `C8SS` |
//! | 4 | 2 | version (big-endian) |
//! | 6 | 16 | `V0..VF` |
//! | 22 | 6 | `I`, `SP`, `PC` (big-endian) |
//! | 28 | 2 | delay timer, sound timer |
//! | 30 | 2 | keypad bitmask (big-endian) |
//! | 32 | 3 | run-state tag and payload |
//! | 35 | 4 | RNG state (big-endian) |
//! | 39 | 4096 | memory |

use thiserror::Error;

use crate::memory::MEMORY_SIZE;
use crate::{CoreState, FaultCode, Keypad, Registers, Rng, RunState, GENERAL_REGISTER_COUNT};

/// Leading bytes of every snapshot.
pub const SNAPSHOT_MAGIC: [u8; 4] = *b"C8SS";

const HEADER_LEN: usize = 4 + 2;
const REGISTERS_LEN: usize = GENERAL_REGISTER_COUNT + 6 + 2;
const KEYPAD_LEN: usize = 2;
const RUN_STATE_LEN: usize = 3;
const RNG_LEN: usize = 4;

/// Exact size in bytes of a serialized snapshot.
pub const SNAPSHOT_SIZE: usize =
    HEADER_LEN + REGISTERS_LEN + KEYPAD_LEN + RUN_STATE_LEN + RNG_LEN + MEMORY_SIZE;

const TAG_RUNNING: u8 = 0;
const TAG_WAITING: u8 = 1;
const TAG_FAULT: u8 = 2;
const NO_KEY: u8 = 0xFF;

/// Stable snapshot wire-version identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u16)]
pub enum SnapshotVersion {
    /// Initial layout.
    V1 = 1,
}

impl SnapshotVersion {
    /// Version written by [`write_snapshot`].
    pub const CURRENT: Self = Self::V1;

    /// Converts a wire value to a known snapshot version.
    #[must_use]
    pub const fn from_u16(version: u16) -> Option<Self> {
        match version {
            1 => Some(Self::V1),
            _ => None,
        }
    }

    /// Wire value of this version.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }
}

/// Reasons a snapshot cannot be written or read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum SnapshotError {
    /// Output buffer cannot hold [`SNAPSHOT_SIZE`] bytes.
    #[error("snapshot buffer holds {actual} bytes, {needed} needed")]
    BufferTooSmall {
        /// Required size.
        needed: usize,
        /// Size supplied.
        actual: usize,
    },
    /// Input is shorter than [`SNAPSHOT_SIZE`].
    #[error("snapshot is {actual} bytes, expected {expected}")]
    Truncated {
        /// Required size.
        expected: usize,
        /// Size supplied.
        actual: usize,
    },
    /// Input does not start with [`SNAPSHOT_MAGIC`].
    #[error("not a chip8 snapshot")]
    BadMagic,
    /// Input was written by an unknown layout version.
    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u16),
    /// Run-state record is not one this version writes.
    #[error("invalid run state record {tag:#04x} {a:#04x} {b:#04x}")]
    InvalidRunState {
        /// Tag byte.
        tag: u8,
        /// First payload byte.
        a: u8,
        /// Second payload byte.
        b: u8,
    },
}

struct Writer<'a> {
    out: &'a mut [u8],
    pos: usize,
}

impl Writer<'_> {
    fn bytes(&mut self, data: &[u8]) {
        self.out[self.pos..self.pos + data.len()].copy_from_slice(data);
        self.pos += data.len();
    }

    fn u16(&mut self, value: u16) {
        self.bytes(&value.to_be_bytes());
    }
}

struct Reader<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn bytes(&mut self, len: usize) -> &'a [u8] {
        let slice = &self.input[self.pos..self.pos + len];
        self.pos += len;
        slice
    }

    fn u8(&mut self) -> u8 {
        self.bytes(1)[0]
    }

    fn u16(&mut self) -> u16 {
        let bytes = self.bytes(2);
        u16::from_be_bytes([bytes[0], bytes[1]])
    }

    fn u32(&mut self) -> u32 {
        let bytes = self.bytes(4);
        u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}

const fn encode_run_state(run_state: RunState) -> [u8; RUN_STATE_LEN] {
    match run_state {
        RunState::Running => [TAG_RUNNING, 0, 0],
        RunState::WaitingForKey { register, pressed } => [
            TAG_WAITING,
            register,
            match pressed {
                Some(key) => key,
                None => NO_KEY,
            },
        ],
        RunState::FaultLatched(cause) => [TAG_FAULT, cause.as_u8(), 0],
    }
}

const fn decode_run_state(record: [u8; RUN_STATE_LEN]) -> Option<RunState> {
    match record {
        [TAG_RUNNING, 0, 0] => Some(RunState::Running),
        [TAG_WAITING, register, pressed] if register <= 0x0F => {
            let pressed = match pressed {
                NO_KEY => None,
                key if key <= 0x0F => Some(key),
                _ => return None,
            };
            Some(RunState::WaitingForKey { register, pressed })
        }
        [TAG_FAULT, code, 0] => match FaultCode::from_u8(code) {
            Some(cause) => Some(RunState::FaultLatched(cause)),
            None => None,
        },
        _ => None,
    }
}

/// Serializes `state` into the first [`SNAPSHOT_SIZE`] bytes of `out`.
///
/// # Errors
///
/// Returns [`SnapshotError::BufferTooSmall`] without writing anything when
/// `out` is too short.
pub fn write_snapshot(state: &CoreState, out: &mut [u8]) -> Result<(), SnapshotError> {
    if out.len() < SNAPSHOT_SIZE {
        return Err(SnapshotError::BufferTooSmall {
            needed: SNAPSHOT_SIZE,
            actual: out.len(),
        });
    }

    encode(state, out);
    Ok(())
}

/// Serializes `state` into a new [`SNAPSHOT_SIZE`]-byte buffer.
#[must_use]
pub fn snapshot_to_vec(state: &CoreState) -> Vec<u8> {
    let mut out = vec![0; SNAPSHOT_SIZE];
    encode(state, &mut out);
    out
}

// `out` holds at least SNAPSHOT_SIZE bytes.
fn encode(state: &CoreState, out: &mut [u8]) {
    let mut writer = Writer { out, pos: 0 };
    writer.bytes(&SNAPSHOT_MAGIC);
    writer.u16(SnapshotVersion::CURRENT.as_u16());
    writer.bytes(state.regs.v_all());
    writer.u16(state.regs.i());
    writer.u16(state.regs.sp());
    writer.u16(state.regs.pc());
    writer.bytes(&[state.regs.delay_timer(), state.regs.sound_timer()]);
    writer.u16(state.keypad.bits());
    writer.bytes(&encode_run_state(state.run_state));
    writer.bytes(&state.rng.state().to_be_bytes());
    writer.bytes(&state.memory[..MEMORY_SIZE]);
    debug_assert_eq!(writer.pos, SNAPSHOT_SIZE);
}

/// Parses a snapshot into a fresh [`CoreState`].
///
/// Trailing bytes past [`SNAPSHOT_SIZE`] are ignored.
///
/// # Errors
///
/// Returns a [`SnapshotError`] describing the first problem found.
pub fn read_snapshot(input: &[u8]) -> Result<CoreState, SnapshotError> {
    if input.len() < SNAPSHOT_SIZE {
        return Err(SnapshotError::Truncated {
            expected: SNAPSHOT_SIZE,
            actual: input.len(),
        });
    }

    let mut reader = Reader { input, pos: 0 };
    if reader.bytes(SNAPSHOT_MAGIC.len()) != SNAPSHOT_MAGIC {
        return Err(SnapshotError::BadMagic);
    }
    let version = reader.u16();
    if SnapshotVersion::from_u16(version).is_none() {
        return Err(SnapshotError::UnsupportedVersion(version));
    }

    let mut regs = Registers::default();
    for (index, value) in (0u8..).zip(reader.bytes(GENERAL_REGISTER_COUNT)) {
        regs.set_v(index, *value);
    }
    regs.set_i(reader.u16());
    regs.set_sp(reader.u16());
    regs.set_pc(reader.u16());
    regs.set_delay_timer(reader.u8());
    regs.set_sound_timer(reader.u8());
    let keypad = Keypad::from_bits(reader.u16());

    let record = [reader.u8(), reader.u8(), reader.u8()];
    let run_state = decode_run_state(record).ok_or(SnapshotError::InvalidRunState {
        tag: record[0],
        a: record[1],
        b: record[2],
    })?;
    let rng = Rng::new(reader.u32());
    let memory = reader.bytes(MEMORY_SIZE).to_vec().into_boxed_slice();

    Ok(CoreState {
        regs,
        memory,
        keypad,
        run_state,
        rng,
        display_dirty: true,
    })
}

#[cfg(test)]
mod tests {
    use super::{
        read_snapshot, snapshot_to_vec, write_snapshot, SnapshotError, SnapshotVersion,
        SNAPSHOT_MAGIC, SNAPSHOT_SIZE,
    };
    use crate::{CoreState, FaultCode, Key, RunState};

    #[test]
    fn snapshot_size_matches_documented_layout() {
        assert_eq!(SNAPSHOT_SIZE, 4135);
    }

    #[test]
    fn owned_encoding_matches_buffer_encoding() {
        let mut state = CoreState::default();
        state.regs.set_v(3, 0x99);
        let mut out = vec![0; SNAPSHOT_SIZE + 4];
        write_snapshot(&state, &mut out).expect("buffer is large enough");
        let owned = snapshot_to_vec(&state);
        assert_eq!(owned.len(), SNAPSHOT_SIZE);
        assert_eq!(owned[..], out[..SNAPSHOT_SIZE]);
    }

    #[test]
    fn version_lookup_is_stable() {
        assert_eq!(SnapshotVersion::from_u16(1), Some(SnapshotVersion::V1));
        assert_eq!(SnapshotVersion::from_u16(2), None);
    }

    #[test]
    fn short_output_buffer_is_rejected_untouched() {
        let state = CoreState::default();
        let mut out = vec![0xAB; SNAPSHOT_SIZE - 1];
        assert_eq!(
            write_snapshot(&state, &mut out),
            Err(SnapshotError::BufferTooSmall {
                needed: SNAPSHOT_SIZE,
                actual: SNAPSHOT_SIZE - 1
            })
        );
        assert!(out.iter().all(|b| *b == 0xAB));
    }

    #[test]
    fn restore_reproduces_waiting_state() {
        let mut state = CoreState::default();
        state.regs.set_v(0xA, 0x42);
        state.regs.set_i(0x345);
        state.keypad.press(Key::KC);
        state.run_state = RunState::WaitingForKey {
            register: 2,
            pressed: Some(0xC),
        };
        state.memory[0x600] = 0x99;

        let mut out = vec![0; SNAPSHOT_SIZE];
        write_snapshot(&state, &mut out).expect("buffer is large enough");
        assert_eq!(&out[..4], &SNAPSHOT_MAGIC);

        let restored = read_snapshot(&out).expect("snapshot should parse");
        assert_eq!(restored, state);
    }

    #[test]
    fn corrupt_headers_and_records_are_rejected() {
        let mut state = CoreState::default();
        state.run_state = RunState::FaultLatched(FaultCode::IllegalInstruction);
        let mut out = vec![0; SNAPSHOT_SIZE];
        write_snapshot(&state, &mut out).expect("buffer is large enough");
        assert!(read_snapshot(&out).is_ok());

        assert!(matches!(
            read_snapshot(&out[..100]),
            Err(SnapshotError::Truncated { .. })
        ));

        let mut bad_magic = out.clone();
        bad_magic[0] = b'X';
        assert_eq!(read_snapshot(&bad_magic), Err(SnapshotError::BadMagic));

        let mut bad_version = out.clone();
        bad_version[5] = 9;
        assert_eq!(
            read_snapshot(&bad_version),
            Err(SnapshotError::UnsupportedVersion(9))
        );

        let mut bad_fault = out;
        bad_fault[33] = 0x77;
        assert!(matches!(
            read_snapshot(&bad_fault),
            Err(SnapshotError::InvalidRunState { tag: 2, .. })
        ));
    }
}
