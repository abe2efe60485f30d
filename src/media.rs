//! Image re-encoding for key icons.

use std::io::{stdout, Write};

use image::imageops::FilterType;
use image::DynamicImage;
use minideck::consts::{IMAGE_BYTES, IMAGE_SIZE};

/// Re-encode an image as the raw 72x72 rgb buffer the deck expects
pub fn encode_image(image: DynamicImage, background: [u8; 3], nearest: bool) -> Vec<u8> {
    print!("resizing and encoding image ... ");
    stdout().flush().unwrap();
    let [br, bg, bb] = background;

    let buf = image
        .resize_to_fill(
            IMAGE_SIZE as u32,
            IMAGE_SIZE as u32,
            if nearest {
                FilterType::Nearest
            } else {
                FilterType::Gaussian
            },
        )
        .to_rgba8()
        .pixels()
        .flat_map(|p| {
            let [mut r, mut g, mut b, a] = p.0;

            // Mix alpha values against the background
            let a = a as f64 / 255.0;
            let ba = 1. - a;
            r = ((br as f64 * ba) + (r as f64 * a)) as u8;
            g = ((bg as f64 * ba) + (g as f64 * a)) as u8;
            b = ((bb as f64 * ba) + (b as f64 * a)) as u8;

            [r, g, b]
        })
        .collect::<Vec<_>>();
    debug_assert_eq!(buf.len(), IMAGE_BYTES);

    println!("done");
    buf
}
