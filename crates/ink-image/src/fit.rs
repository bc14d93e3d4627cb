use crate::Color;
use crates_image::{Rgb, RgbImage, imageops};
use ink_base::ViewportSpec;

/// Size of `(width, height)` scaled to fit inside `target` with its aspect
/// ratio kept. Never zero, never larger than `target`.
pub fn contain_size(width: u32, height: u32, target: ViewportSpec) -> (u32, u32) {
    let (w, h) = (width as u64, height as u64);
    let (tw, th) = (target.width as u64, target.height as u64);
    // compare w/h against tw/th without floats
    if w * th >= h * tw {
        let scaled = (h * tw + w / 2) / w;
        (target.width, scaled.clamp(1, th) as u32)
    } else {
        let scaled = (w * th + h / 2) / h;
        (scaled.clamp(1, tw) as u32, target.height)
    }
}

/// Letterbox `image` into exactly `target`, centered on `background`.
pub fn contain(image: RgbImage, target: ViewportSpec, background: Color) -> RgbImage {
    if image.dimensions() == (target.width, target.height) {
        return image;
    }
    let (w, h) = contain_size(image.width(), image.height(), target);
    let scaled = if (w, h) == image.dimensions() {
        image
    } else {
        imageops::resize(&image, w, h, imageops::FilterType::Triangle)
    };
    let mut canvas = RgbImage::from_pixel(
        target.width,
        target.height,
        Rgb([background.r, background.g, background.b]),
    );
    let x = (target.width - w) / 2;
    let y = (target.height - h) / 2;
    imageops::replace(&mut canvas, &scaled, x as i64, y as i64);
    canvas
}
