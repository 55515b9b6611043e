//! XRGB8888 frame buffer handed to the frontend.

use chip8_core::display::PIXEL_COUNT;
use chip8_core::{Machine, Palette, HEIGHT, WIDTH};

/// Bytes per output row.
pub const PITCH: usize = WIDTH * std::mem::size_of::<u32>();

#[derive(Debug, Clone)]
pub struct VideoFrame {
    pixels: Vec<u32>,
    palette: Palette,
}

impl Default for VideoFrame {
    fn default() -> Self {
        Self {
            pixels: vec![0; PIXEL_COUNT],
            palette: Palette::default(),
        }
    }
}

impl VideoFrame {
    /// Switches palette; takes effect on the next [`Self::update`].
    pub const fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    /// Repaints from the machine framebuffer.
    ///
    /// The framebuffer is plain memory that cheats, `LD [I], Vx` and the
    /// frontend can all write, so every frame is converted in full.
    pub fn update(&mut self, machine: &mut Machine) {
        machine.render(&self.palette, &mut self.pixels);
    }

    #[must_use]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    #[must_use]
    pub const fn width() -> usize {
        WIDTH
    }

    #[must_use]
    pub const fn height() -> usize {
        HEIGHT
    }
}

#[cfg(test)]
mod tests {
    use super::{VideoFrame, PITCH};
    use chip8_core::{Keypad, Machine, Palette, Rom};

    #[test]
    fn pitch_is_four_bytes_per_pixel() {
        assert_eq!(PITCH, 256);
    }

    #[test]
    fn palette_change_repaints_unchanged_display() {
        let mut machine = Machine::default();
        machine
            .load_rom(Rom::new("idle", vec![0x12, 0x00]))
            .expect("rom fits");
        let mut frame = VideoFrame::default();
        frame.update(&mut machine);
        assert!(frame.pixels().iter().all(|p| *p == Palette::WHITE.background));

        machine.run_frame(Keypad::default());
        frame.set_palette(Palette::GREEN);
        frame.update(&mut machine);
        assert!(frame.pixels().iter().all(|p| *p == Palette::GREEN.background));
    }

    #[test]
    fn direct_framebuffer_writes_are_presented() {
        let mut machine = Machine::default();
        machine
            .load_rom(Rom::new("idle", vec![0x12, 0x00]))
            .expect("rom fits");
        let mut frame = VideoFrame::default();
        machine.run_frame(Keypad::default());
        frame.update(&mut machine);

        machine.video_memory_mut()[0] = 0x80;
        frame.update(&mut machine);
        assert_eq!(frame.pixels()[0], Palette::WHITE.foreground);
        assert_eq!(frame.pixels()[1], Palette::WHITE.background);
    }
}
