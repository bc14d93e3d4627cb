use crate::{Color, Palette};
use crates_image::RgbImage;

/// Map every pixel to its nearest palette index, row-major.
pub fn quantize(image: &RgbImage, palette: &Palette) -> Vec<u8> {
    // pages are mostly flat color, so remember the last lookup
    let mut last: Option<([u8; 3], u8)> = None;
    image
        .pixels()
        .map(|px| match last {
            Some((rgb, index)) if rgb == px.0 => index,
            _ => {
                let index = palette.nearest(Color::from(px.0));
                last = Some((px.0, index));
                index
            }
        })
        .collect()
}

/// Floyd-Steinberg error diffusion onto the palette, left to right on every row.
///
/// Pixels that are already palette colors carry no error, so a frame made of
/// palette colors comes out the same as with plain `quantize`.
pub fn quantize_dithered(image: &RgbImage, palette: &Palette) -> Vec<u8> {
    let width = image.width() as usize;
    let mut indices = Vec::with_capacity(width * image.height() as usize);
    // error carried into the current and next row, one slot of padding each side
    let mut current = vec![[0i32; 3]; width + 2];
    let mut next = vec![[0i32; 3]; width + 2];

    for row in image.rows() {
        for (x, px) in row.enumerate() {
            let carried = current[x + 1];
            let wanted = [
                (px.0[0] as i32 + carried[0] / 16).clamp(0, 255),
                (px.0[1] as i32 + carried[1] / 16).clamp(0, 255),
                (px.0[2] as i32 + carried[2] / 16).clamp(0, 255),
            ];
            let index = palette.nearest(Color::new(wanted[0] as u8, wanted[1] as u8, wanted[2] as u8));
            indices.push(index);

            let chosen = palette.color(index).unwrap_or(Color::BLACK);
            let chosen = [chosen.r as i32, chosen.g as i32, chosen.b as i32];
            for c in 0..3 {
                let err = wanted[c] - chosen[c];
                current[x + 2][c] += err * 7;
                next[x][c] += err * 3;
                next[x + 1][c] += err * 5;
                next[x + 2][c] += err;
            }
        }
        std::mem::swap(&mut current, &mut next);
        next.iter_mut().for_each(|e| *e = [0; 3]);
    }

    indices
}
