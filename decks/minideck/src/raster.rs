//! Pixel re-encoding for key icons.
//!
//! The key panels are mounted rotated, so the device consumes icons as an
//! 80x80 BGR raster in BMP scan order: rows bottom-up relative to the panel
//! and columns mirrored relative to the source image. The 72x72 source sits
//! centered inside a 4 pixel black frame.

use crate::consts::{ICON_BYTES, ICON_SIZE, IMAGE_BYTES, IMAGE_SIZE};
use crate::types::{MinideckError, MinideckResult};

/// Width of the black frame around the icon, in pixels
pub const MARGIN: usize = (ICON_SIZE - IMAGE_SIZE) / 2;

/// Re-encode a 72x72 top-left-origin RGB raster into the 80x80 BGR stream
/// the device scans out.
///
/// Walking the source rows top to bottom while mirroring each row is what
/// the panel's native bottom-up scan expects; the framing rows above and
/// below the image are flat black padding.
pub fn key_pixels(rgb: &[u8]) -> MinideckResult<[u8; ICON_BYTES]> {
    if rgb.len() != IMAGE_BYTES {
        return Err(MinideckError::InvalidImageSize(rgb.len()));
    }

    let mut out = [0u8; ICON_BYTES];
    let mut cursor = MARGIN * ICON_SIZE * 3;
    for y in 0..IMAGE_SIZE {
        cursor += MARGIN * 3;
        for x in 0..IMAGE_SIZE {
            let src = 3 * (IMAGE_SIZE * y + (IMAGE_SIZE - 1 - x));
            out[cursor] = rgb[src + 2];
            out[cursor + 1] = rgb[src + 1];
            out[cursor + 2] = rgb[src];
            cursor += 3;
        }
        cursor += MARGIN * 3;
    }
    Ok(out)
}

/// Build a pixel stream filling the whole canvas with one color, frame
/// included.
pub fn solid_pixels(r: u8, g: u8, b: u8) -> [u8; ICON_BYTES] {
    let mut out = [0u8; ICON_BYTES];
    for pixel in out.chunks_exact_mut(3) {
        pixel.copy_from_slice(&[b, g, r]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_input_is_zero_canvas() {
        let out = key_pixels(&[0u8; IMAGE_BYTES]).unwrap();
        assert!(out.iter().all(|&b| b == 0));
    }

    #[test]
    fn solid_red_fills_interior_as_bgr() {
        let mut rgb = [0u8; IMAGE_BYTES];
        for pixel in rgb.chunks_exact_mut(3) {
            pixel.copy_from_slice(&[255, 0, 0]);
        }
        let out = key_pixels(&rgb).unwrap();
        for row in 0..ICON_SIZE {
            for col in 0..ICON_SIZE {
                let pixel = &out[3 * (ICON_SIZE * row + col)..][..3];
                let interior = (MARGIN..ICON_SIZE - MARGIN).contains(&row)
                    && (MARGIN..ICON_SIZE - MARGIN).contains(&col);
                if interior {
                    assert_eq!(pixel, [0, 0, 255], "row {row} col {col}");
                } else {
                    assert_eq!(pixel, [0, 0, 0], "row {row} col {col}");
                }
            }
        }
    }

    #[test]
    fn columns_are_mirrored() {
        // light up only the top-left source pixel
        let mut rgb = [0u8; IMAGE_BYTES];
        rgb[..3].copy_from_slice(&[1, 2, 3]);
        let out = key_pixels(&rgb).unwrap();
        // it lands in the first content row at the far right of the content
        // area, channels swapped to bgr
        let offset = 3 * (ICON_SIZE * MARGIN + ICON_SIZE - MARGIN - 1);
        assert_eq!(&out[offset..offset + 3], [3, 2, 1]);
        assert_eq!(out.iter().filter(|&&b| b != 0).count(), 3);
    }

    #[test]
    fn rejects_wrong_input_size() {
        assert!(matches!(
            key_pixels(&[0u8; 3]),
            Err(MinideckError::InvalidImageSize(3))
        ));
        assert!(matches!(
            key_pixels(&[0u8; IMAGE_BYTES + 1]),
            Err(MinideckError::InvalidImageSize(_))
        ));
    }

    #[test]
    fn solid_pixels_covers_the_frame() {
        let out = solid_pixels(10, 20, 30);
        assert!(out.chunks_exact(3).all(|pixel| pixel == [30, 20, 10]));
    }
}
