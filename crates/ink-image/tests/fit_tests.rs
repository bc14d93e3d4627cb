use crates_image::{Rgb, RgbImage};
use ink_base::ViewportSpec;
use ink_image::{Color, fit};

#[test]
fn test_contain_size_keeps_aspect() {
    let target = ViewportSpec::new(640, 400).unwrap();
    assert_eq!(fit::contain_size(1280, 800, target), (640, 400));
    assert_eq!(fit::contain_size(800, 800, target), (400, 400));
    assert_eq!(fit::contain_size(1000, 100, target), (640, 64));
    assert_eq!(fit::contain_size(10000, 1, target), (640, 1));
}

#[test]
fn test_contain_never_crops_and_fills_target() {
    let target = ViewportSpec::new(40, 20).unwrap();
    let image = RgbImage::from_pixel(20, 20, Rgb([0, 0, 0]));
    let out = fit::contain(image, target, Color::WHITE);
    assert_eq!(out.dimensions(), (40, 20));
    assert_eq!(out.get_pixel(0, 10).0, [255, 255, 255]);
    assert_eq!(out.get_pixel(20, 10).0, [0, 0, 0]);
    assert_eq!(out.get_pixel(39, 10).0, [255, 255, 255]);
}

#[test]
fn test_contain_exact_size_is_untouched() {
    let target = ViewportSpec::new(3, 2).unwrap();
    let image = RgbImage::from_fn(3, 2, |x, y| Rgb([x as u8, y as u8, 9]));
    let out = fit::contain(image.clone(), target, Color::WHITE);
    assert_eq!(out, image);
}
