//! 64x32 monochrome framebuffer helpers.
//!
//! The framebuffer lives in machine memory at
//! [`crate::VIDEO_BUFFER_ADDRESS`]: one bit per pixel, row major, most
//! significant bit leftmost, eight bytes per row.

use crate::memory::VIDEO_BUFFER_SIZE;

/// Display width in pixels.
pub const WIDTH: usize = 64;
/// Display height in pixels.
pub const HEIGHT: usize = 32;
/// Total pixel count.
pub const PIXEL_COUNT: usize = WIDTH * HEIGHT;
/// Bytes per framebuffer row.
pub const ROW_BYTES: usize = WIDTH / 8;

const _: () = assert!(ROW_BYTES * HEIGHT == VIDEO_BUFFER_SIZE);

/// Two-colour palette used when rendering to 32-bit pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Palette {
    /// XRGB8888 colour of lit pixels.
    pub foreground: u32,
    /// XRGB8888 colour of unlit pixels.
    pub background: u32,
}

impl Default for Palette {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Palette {
    /// White on black.
    pub const WHITE: Self = Self {
        foreground: 0x00FF_FFFF,
        background: 0x0000_0000,
    };
    /// Green phosphor.
    pub const GREEN: Self = Self {
        foreground: 0x0033_FF66,
        background: 0x0000_1A08,
    };
    /// Amber phosphor.
    pub const AMBER: Self = Self {
        foreground: 0x00FF_B000,
        background: 0x0020_1000,
    };
}

const fn bit_position(x: usize, y: usize) -> (usize, u8) {
    (y * ROW_BYTES + x / 8, 0x80 >> (x % 8))
}

/// Returns `true` if the pixel at `(x, y)` is lit. Coordinates wrap.
#[must_use]
pub fn pixel(video: &[u8], x: usize, y: usize) -> bool {
    let (index, mask) = bit_position(x % WIDTH, y % HEIGHT);
    video[index] & mask != 0
}

/// Turns every pixel off.
pub fn clear(video: &mut [u8]) {
    video[..VIDEO_BUFFER_SIZE].fill(0);
}

/// XORs `sprite` onto the framebuffer with its top-left corner at `(x, y)`.
///
/// The origin always wraps. Pixels that run past the right or bottom edge are
/// dropped when `clip` is set and wrap around otherwise. Returns `true` if any
/// lit pixel was turned off.
pub fn draw_sprite(video: &mut [u8], x: usize, y: usize, sprite: &[u8], clip: bool) -> bool {
    let origin_x = x % WIDTH;
    let origin_y = y % HEIGHT;
    let mut collision = false;

    for (row, bits) in sprite.iter().enumerate() {
        let py = origin_y + row;
        if clip && py >= HEIGHT {
            break;
        }
        for column in 0..8 {
            if bits & (0x80 >> column) == 0 {
                continue;
            }
            let px = origin_x + column;
            if clip && px >= WIDTH {
                break;
            }
            let (index, mask) = bit_position(px % WIDTH, py % HEIGHT);
            collision |= video[index] & mask != 0;
            video[index] ^= mask;
        }
    }

    collision
}

/// Expands the framebuffer into XRGB8888 pixels, row major.
///
/// `out` must hold at least [`PIXEL_COUNT`] entries.
pub fn render_xrgb8888(video: &[u8], palette: &Palette, out: &mut [u32]) {
    for (index, pixel_out) in out.iter_mut().take(PIXEL_COUNT).enumerate() {
        let lit = pixel(video, index % WIDTH, index / WIDTH);
        *pixel_out = if lit {
            palette.foreground
        } else {
            palette.background
        };
    }
}

/// Renders the framebuffer as text, `#` for lit pixels and `.` otherwise.
#[must_use]
pub fn to_text(video: &[u8]) -> String {
    let mut text = String::with_capacity((WIDTH + 1) * HEIGHT);
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            text.push(if pixel(video, x, y) { '#' } else { '.' });
        }
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::{
        clear, draw_sprite, pixel, render_xrgb8888, to_text, Palette, HEIGHT, PIXEL_COUNT, WIDTH,
    };
    use crate::memory::VIDEO_BUFFER_SIZE;

    fn blank() -> Vec<u8> {
        vec![0; VIDEO_BUFFER_SIZE]
    }

    #[test]
    fn drawing_twice_erases_and_reports_collision() {
        let mut video = blank();
        let sprite = [0xF0, 0x90];

        assert!(!draw_sprite(&mut video, 10, 5, &sprite, true));
        assert!(pixel(&video, 10, 5));
        assert!(pixel(&video, 13, 5));
        assert!(!pixel(&video, 14, 5));
        assert!(pixel(&video, 13, 6));
        assert!(!pixel(&video, 11, 6));

        assert!(draw_sprite(&mut video, 10, 5, &sprite, true));
        assert!(video.iter().all(|byte| *byte == 0));
    }

    #[test]
    fn origin_wraps_before_drawing() {
        let mut video = blank();
        draw_sprite(&mut video, WIDTH + 1, HEIGHT + 2, &[0x80], true);
        assert!(pixel(&video, 1, 2));
    }

    #[test]
    fn clipping_drops_pixels_past_the_edge() {
        let mut video = blank();
        draw_sprite(&mut video, WIDTH - 2, HEIGHT - 1, &[0xFF, 0xFF], true);
        assert!(pixel(&video, WIDTH - 1, HEIGHT - 1));
        assert!(!pixel(&video, 0, HEIGHT - 1));
        assert!(!pixel(&video, WIDTH - 2, 0));
    }

    #[test]
    fn wrapping_mode_continues_on_the_other_side() {
        let mut video = blank();
        draw_sprite(&mut video, WIDTH - 2, HEIGHT - 1, &[0xE0, 0x80], false);
        assert!(pixel(&video, WIDTH - 2, HEIGHT - 1));
        assert!(pixel(&video, 0, HEIGHT - 1));
        assert!(pixel(&video, WIDTH - 2, 0));
    }

    #[test]
    fn render_uses_palette_colours() {
        let mut video = blank();
        draw_sprite(&mut video, 0, 0, &[0x80], true);
        let mut out = vec![0u32; PIXEL_COUNT];
        render_xrgb8888(&video, &Palette::AMBER, &mut out);
        assert_eq!(out[0], Palette::AMBER.foreground);
        assert_eq!(out[1], Palette::AMBER.background);
    }

    #[test]
    fn text_rendering_has_one_line_per_row() {
        let mut video = blank();
        draw_sprite(&mut video, 0, 0, &[0xC0], true);
        let text = to_text(&video);
        assert_eq!(text.lines().count(), HEIGHT);
        assert!(text.starts_with("##.."));
        clear(&mut video);
        assert!(!to_text(&video).contains('#'));
    }
}
