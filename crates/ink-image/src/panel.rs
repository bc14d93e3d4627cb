use crate::{Color, ImageError, Palette};
use crates_image::{ImageEncoder, RgbImage};

/// Bytes needed for `width * height` pixels at `bits_per_pixel`, packed
/// without row padding.
pub fn packed_len(width: u32, height: u32, bits_per_pixel: u8) -> usize {
    (width as usize * height as usize * bits_per_pixel as usize).div_ceil(8)
}

/// Pack palette indices MSB-first: the first pixel lands in the high bits.
pub fn pack(indices: &[u8], bits_per_pixel: u8) -> Vec<u8> {
    let bpp = bits_per_pixel as usize;
    let per_byte = 8 / bpp;
    let mask = ((1u16 << bpp) - 1) as u8;
    let mut packed = vec![0u8; (indices.len() * bpp).div_ceil(8)];
    for (i, &index) in indices.iter().enumerate() {
        let shift = 8 - bpp * (i % per_byte + 1);
        packed[i / per_byte] |= (index & mask) << shift;
    }
    packed
}

/// A frame in the panel's native layout, ready to hand to the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelFrame {
    width: u32,
    height: u32,
    bits_per_pixel: u8,
    data: Vec<u8>,
}

impl PanelFrame {
    pub fn new(width: u32, height: u32, bits_per_pixel: u8, data: Vec<u8>) -> Result<Self, ImageError> {
        if ![1, 2, 4, 8].contains(&bits_per_pixel) {
            return Err(ImageError::UnsupportedFormat(format!(
                "{bits_per_pixel} bits per pixel"
            )));
        }
        if width == 0 || height == 0 {
            return Err(ImageError::InvalidDimensions { width, height });
        }
        let expected = packed_len(width, height, bits_per_pixel);
        if data.len() != expected {
            return Err(ImageError::UnsupportedFormat(format!(
                "{} bytes for a {}x{} panel at {} bpp ({} expected)",
                data.len(),
                width,
                height,
                bits_per_pixel,
                expected
            )));
        }
        Ok(Self {
            width,
            height,
            bits_per_pixel,
            data,
        })
    }

    /// Every pixel set to palette `index`.
    pub fn filled(width: u32, height: u32, bits_per_pixel: u8, index: u8) -> Result<Self, ImageError> {
        let pixels = (width as usize)
            .checked_mul(height as usize)
            .ok_or(ImageError::InvalidDimensions { width, height })?;
        let indices = vec![index; pixels];
        Self::new(width, height, bits_per_pixel, pack(&indices, bits_per_pixel))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bits_per_pixel(&self) -> u8 {
        self.bits_per_pixel
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Palette index of the pixel at (x, y), `None` outside the frame.
    pub fn index_at(&self, x: u32, y: u32) -> Option<u8> {
        (x < self.width && y < self.height).then(|| self.index_unchecked(x, y))
    }

    fn index_unchecked(&self, x: u32, y: u32) -> u8 {
        let bpp = self.bits_per_pixel as usize;
        let i = y as usize * self.width as usize + x as usize;
        let per_byte = 8 / bpp;
        let shift = 8 - bpp * (i % per_byte + 1);
        let mask = ((1u16 << bpp) - 1) as u8;
        (self.data[i / per_byte] >> shift) & mask
    }

    /// All palette indices, row-major.
    pub fn indices(&self) -> Vec<u8> {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .map(|(x, y)| self.index_unchecked(x, y))
            .collect()
    }

    /// Expand back to RGB through `palette`. Indices outside the palette show black.
    pub fn to_rgb(&self, palette: &Palette) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let c = palette.color(self.index_unchecked(x, y)).unwrap_or(Color::BLACK);
            crates_image::Rgb([c.r, c.g, c.b])
        })
    }

    /// What the panel will look like, as PNG bytes.
    pub fn to_png(&self, palette: &Palette) -> Result<Vec<u8>, ImageError> {
        let rgb = self.to_rgb(palette);
        let mut buffer = Vec::new();
        crates_image::codecs::png::PngEncoder::new(&mut buffer)
            .write_image(
                rgb.as_raw(),
                self.width,
                self.height,
                crates_image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| ImageError::Encode(e.to_string()))?;
        Ok(buffer)
    }
}
