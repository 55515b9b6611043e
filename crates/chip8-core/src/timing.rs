/// Video frames per second presented to the host.
pub const FRAME_RATE: u32 = 60;
/// Rate at which the delay and sound timers count down.
pub const TIMER_HZ: u32 = 60;
/// Timer decrements applied per video frame.
pub const TIMER_TICKS_PER_FRAME: u32 = TIMER_HZ / FRAME_RATE;
/// Default interpreter speed, roughly 660 instructions per second.
pub const DEFAULT_INSTRUCTIONS_PER_FRAME: u32 = 11;
/// Smallest accepted instructions-per-frame setting.
pub const MIN_INSTRUCTIONS_PER_FRAME: u32 = 1;
/// Largest accepted instructions-per-frame setting.
pub const MAX_INSTRUCTIONS_PER_FRAME: u32 = 1000;

const _: () = assert!(TIMER_HZ % FRAME_RATE == 0, "timers must tick whole steps per frame");

/// Clamps a requested speed into the accepted range.
#[must_use]
pub const fn clamp_instructions_per_frame(requested: u32) -> u32 {
    if requested < MIN_INSTRUCTIONS_PER_FRAME {
        MIN_INSTRUCTIONS_PER_FRAME
    } else if requested > MAX_INSTRUCTIONS_PER_FRAME {
        MAX_INSTRUCTIONS_PER_FRAME
    } else {
        requested
    }
}

#[cfg(test)]
mod tests {
    use super::{
        clamp_instructions_per_frame, DEFAULT_INSTRUCTIONS_PER_FRAME, MAX_INSTRUCTIONS_PER_FRAME,
        TIMER_TICKS_PER_FRAME,
    };

    #[test]
    fn one_timer_tick_per_frame() {
        assert_eq!(TIMER_TICKS_PER_FRAME, 1);
    }

    #[test]
    fn clamp_keeps_values_in_range() {
        assert_eq!(clamp_instructions_per_frame(0), 1);
        assert_eq!(
            clamp_instructions_per_frame(DEFAULT_INSTRUCTIONS_PER_FRAME),
            DEFAULT_INSTRUCTIONS_PER_FRAME
        );
        assert_eq!(
            clamp_instructions_per_frame(u32::MAX),
            MAX_INSTRUCTIONS_PER_FRAME
        );
    }
}
