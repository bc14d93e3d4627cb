use crates_image::ImageEncoder;
use ink_image::{Color, ImageError, PixelFormat, RawFrame};

fn png_rgba(width: u32, height: u32, pixel: [u8; 4]) -> Vec<u8> {
    let img = crates_image::RgbaImage::from_pixel(width, height, crates_image::Rgba(pixel));
    let mut buffer = Vec::new();
    crates_image::codecs::png::PngEncoder::new(&mut buffer)
        .write_image(img.as_raw(), width, height, crates_image::ExtendedColorType::Rgba8)
        .unwrap();
    buffer
}

#[test]
fn test_decode_png_keeps_rgba() {
    let frame = RawFrame::decode(&png_rgba(4, 3, [10, 20, 30, 255])).unwrap();
    assert_eq!((frame.width, frame.height), (4, 3));
    assert_eq!(frame.format, PixelFormat::Rgba8);
    assert_eq!(frame.data.len(), 4 * 3 * 4);
    assert_eq!(&frame.data[..4], &[10, 20, 30, 255]);
}

#[test]
fn test_decode_garbage_fails() {
    assert!(RawFrame::decode(b"not an image").is_err());
}

#[test]
fn test_new_checks_length() {
    assert!(RawFrame::new(2, 2, PixelFormat::Rgb8, vec![0; 12]).is_ok());
    assert!(RawFrame::new(2, 2, PixelFormat::Rgb8, vec![0; 11]).is_err());
    assert!(RawFrame::new(2, 2, PixelFormat::Luma8, vec![0; 4]).is_ok());
}

#[test]
fn test_luma_expands_to_gray() {
    let frame = RawFrame::new(1, 1, PixelFormat::Luma8, vec![77]).unwrap();
    assert_eq!(frame.to_rgb(Color::WHITE).unwrap().get_pixel(0, 0).0, [77, 77, 77]);
}

#[test]
fn test_filled_rejects_sizes_that_cannot_be_allocated() {
    let result = RawFrame::filled(u32::MAX, u32::MAX, Color::WHITE);
    assert!(matches!(result, Err(ImageError::InvalidDimensions { .. })));

    let frame = RawFrame::filled(2, 3, Color::RED).unwrap();
    assert_eq!(frame.data.len(), 2 * 3 * 3);
    assert_eq!(&frame.data[..3], &[255, 0, 0]);
}
