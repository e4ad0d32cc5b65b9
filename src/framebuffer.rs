use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// The FrameBuffer is indexed as [y][x]; `true` is a lit pixel.
pub type FrameBuffer = [[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// A blank frame.
pub const BLANK: FrameBuffer = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// Turns every pixel off.
pub fn clear(frame_buffer: &mut FrameBuffer) {
    *frame_buffer = BLANK;
}

/// XORs `sprite` onto the frame with its top-left corner at `(x, y)`.
///
/// Each byte is one row, most significant bit leftmost. The origin and every
/// pixel wrap around the edges of the display. Only pixels under a set sprite
/// bit change.
///
/// Returns whether any lit pixel was turned off.
pub fn draw_sprite(frame_buffer: &mut FrameBuffer, x: u8, y: u8, sprite: &[u8]) -> bool {
    let mut erased = false;
    for (row, byte) in sprite.iter().enumerate() {
        let py = (usize::from(y) + row) % DISPLAY_HEIGHT;
        for bit in 0..8 {
            if byte & (0x80 >> bit) == 0 {
                continue;
            }
            let px = (usize::from(x) + bit) % DISPLAY_WIDTH;
            let pixel = &mut frame_buffer[py][px];
            erased |= *pixel;
            *pixel = !*pixel;
        }
    }
    erased
}

/// Renders the frame as text, one line per row; handy for debugging and assertions.
pub fn to_text(frame_buffer: &FrameBuffer) -> String {
    frame_buffer
        .iter()
        .map(|row| {
            row.iter()
                .map(|&lit| if lit { '#' } else { '.' })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SPRITE_SHEET;

    #[test]
    fn test_draws_zero_glyph() {
        let mut frame = BLANK;
        let erased = draw_sprite(&mut frame, 1, 1, &SPRITE_SHEET[0..5]);
        assert!(!erased);
        let mut expected = BLANK;
        expected[1][1..5].copy_from_slice(&[true, true, true, true]);
        expected[2][1..5].copy_from_slice(&[true, false, false, true]);
        expected[3][1..5].copy_from_slice(&[true, false, false, true]);
        expected[4][1..5].copy_from_slice(&[true, false, false, true]);
        expected[5][1..5].copy_from_slice(&[true, true, true, true]);
        assert_eq!(frame, expected);
    }

    #[test]
    fn test_xors_existing_pixels() {
        let mut frame = BLANK;
        frame[0][0..4].copy_from_slice(&[false, true, false, true]);
        let erased = draw_sprite(&mut frame, 0, 0, &[0b1100_0000]);
        assert!(erased);
        assert_eq!(frame[0][0..4], [true, false, false, true]);
    }

    #[test]
    fn test_leaves_untouched_pixels_alone() {
        let mut frame = BLANK;
        frame[20][40] = true;
        draw_sprite(&mut frame, 0, 0, &[0xFF]);
        assert!(frame[20][40]);
        assert!(frame[0][0..8].iter().all(|&p| p));
    }

    #[test]
    fn test_wraps_horizontally() {
        let mut frame = BLANK;
        draw_sprite(&mut frame, 62, 0, &[0xF0]);
        assert!(frame[0][62] && frame[0][63] && frame[0][0] && frame[0][1]);
        assert!(!frame[0][2]);
    }

    #[test]
    fn test_wraps_vertically() {
        let mut frame = BLANK;
        draw_sprite(&mut frame, 0, 31, &[0x80, 0x80]);
        assert!(frame[31][0]);
        assert!(frame[0][0]);
    }

    #[test]
    fn test_origin_wraps() {
        let mut frame = BLANK;
        draw_sprite(&mut frame, 64 + 3, 32 + 2, &[0x80]);
        assert!(frame[2][3]);
    }

    #[test]
    fn test_clear() {
        let mut frame = BLANK;
        frame[5][5] = true;
        clear(&mut frame);
        assert_eq!(frame, BLANK);
    }

    #[test]
    fn test_to_text() {
        let mut frame = BLANK;
        frame[0][1] = true;
        let text = to_text(&frame);
        assert!(text.starts_with(".#.."));
        assert_eq!(text.lines().count(), DISPLAY_HEIGHT);
    }
}
