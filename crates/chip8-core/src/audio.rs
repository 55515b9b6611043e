//! Square-wave beeper driven by the sound timer.

use crate::timing::FRAME_RATE;

/// Output sample rate in Hz.
pub const SAMPLE_RATE: u32 = 44_100;
/// Stereo frames produced per video frame.
pub const SAMPLES_PER_FRAME: usize = (SAMPLE_RATE / FRAME_RATE) as usize;
/// Beep pitch in Hz.
pub const TONE_HZ: u32 = 440;
/// Peak amplitude of the square wave (half of full scale).
pub const AMPLITUDE: i16 = i16::MAX / 2;

const _: () = assert!(SAMPLE_RATE % FRAME_RATE == 0);

/// Phase-continuous square-wave generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Beeper {
    phase: u32,
}

impl Beeper {
    /// Appends one video frame of interleaved stereo samples to `out`.
    ///
    /// Emits the tone while `active` and silence otherwise. Silence resets
    /// the phase so each beep starts on the same edge.
    pub fn fill_frame(&mut self, active: bool, out: &mut Vec<i16>) {
        out.reserve(SAMPLES_PER_FRAME * 2);
        if !active {
            self.phase = 0;
            out.resize(out.len() + SAMPLES_PER_FRAME * 2, 0);
            return;
        }

        for _ in 0..SAMPLES_PER_FRAME {
            // Phase counts in units of TONE_HZ / SAMPLE_RATE cycles.
            let high = self.phase < SAMPLE_RATE / 2;
            let sample = if high { AMPLITUDE } else { -AMPLITUDE };
            out.push(sample);
            out.push(sample);
            self.phase = (self.phase + TONE_HZ) % SAMPLE_RATE;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Beeper, AMPLITUDE, SAMPLES_PER_FRAME};

    #[test]
    fn silent_frame_is_all_zero() {
        let mut beeper = Beeper::default();
        let mut out = Vec::new();
        beeper.fill_frame(false, &mut out);
        assert_eq!(out.len(), SAMPLES_PER_FRAME * 2);
        assert!(out.iter().all(|s| *s == 0));
    }

    #[test]
    fn active_frame_is_a_square_wave() {
        let mut beeper = Beeper::default();
        let mut out = Vec::new();
        beeper.fill_frame(true, &mut out);
        assert_eq!(out.len(), SAMPLES_PER_FRAME * 2);
        assert!(out.iter().all(|s| *s == AMPLITUDE || *s == -AMPLITUDE));
        assert!(out.contains(&AMPLITUDE));
        assert!(out.contains(&-AMPLITUDE));
        for frame in out.chunks(2) {
            assert_eq!(frame[0], frame[1]);
        }
    }

    #[test]
    fn phase_continues_across_frames() {
        let mut split = Beeper::default();
        let mut first = Vec::new();
        split.fill_frame(true, &mut first);
        split.fill_frame(true, &mut first);

        let mut reference = Beeper::default();
        let mut second = Vec::new();
        reference.fill_frame(true, &mut second);
        reference.fill_frame(true, &mut second);

        assert_eq!(first, second);
        // 440 Hz over 1470 samples flips polarity many times.
        let flips = first.windows(4).filter(|w| w[0] != w[2]).count();
        assert!(flips > 20);
    }
}
