//! Architectural interpreter state primitives.

/// Register file and timers.
pub mod registers;
/// Deterministic random source for `RND`.
pub mod rng;
/// Execution state machine.
pub mod run_state;

pub use registers::{Registers, FLAG_REGISTER, GENERAL_REGISTER_COUNT};
pub use rng::{Rng, DEFAULT_RNG_SEED};
pub use run_state::RunState;
