use crate::ImageError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const GREEN: Color = Color::new(0, 255, 0);
    pub const BLUE: Color = Color::new(0, 0, 255);
    pub const RED: Color = Color::new(255, 0, 0);
    pub const YELLOW: Color = Color::new(255, 255, 0);
    pub const ORANGE: Color = Color::new(255, 128, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Squared Euclidean distance in RGB space.
    pub fn distance_sq(&self, other: Color) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }
}

impl From<[u8; 3]> for Color {
    fn from(c: [u8; 3]) -> Self {
        Color::new(c[0], c[1], c[2])
    }
}

impl From<Color> for [u8; 3] {
    fn from(c: Color) -> Self {
        [c.r, c.g, c.b]
    }
}

pub const MIN_COLORS: usize = 2;
pub const MAX_COLORS: usize = 16;

/// ACeP 7-color panel inks, in controller index order.
pub const ACEP_7: [Color; 7] = [
    Color::BLACK,
    Color::WHITE,
    Color::GREEN,
    Color::BLUE,
    Color::RED,
    Color::YELLOW,
    Color::ORANGE,
];

/// The fixed set of colors a panel can show. A pixel's panel value is its
/// index in this list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    pub fn new(colors: Vec<Color>) -> Result<Self, ImageError> {
        if !(MIN_COLORS..=MAX_COLORS).contains(&colors.len()) {
            return Err(ImageError::InvalidPalette(format!(
                "{} colors, expected {}..={}",
                colors.len(),
                MIN_COLORS,
                MAX_COLORS
            )));
        }
        Ok(Self { colors })
    }

    pub fn acep7() -> Self {
        Self {
            colors: ACEP_7.to_vec(),
        }
    }

    /// The first `count` ACeP inks; 2 gives a black/white panel.
    pub fn builtin(count: usize) -> Result<Self, ImageError> {
        if !(MIN_COLORS..=ACEP_7.len()).contains(&count) {
            return Err(ImageError::InvalidPalette(format!(
                "no built-in palette with {count} colors, pass explicit colors"
            )));
        }
        Ok(Self {
            colors: ACEP_7[..count].to_vec(),
        })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn color(&self, index: u8) -> Option<Color> {
        self.colors.get(index as usize).copied()
    }

    /// Smallest packed pixel depth that can hold every index.
    pub fn bits_per_pixel(&self) -> u8 {
        match self.colors.len() {
            0..=2 => 1,
            3..=4 => 2,
            _ => 4,
        }
    }

    /// Index of the closest color. Equal distances resolve to the lower index.
    pub fn nearest(&self, color: Color) -> u8 {
        let mut best = 0;
        let mut best_dist = u32::MAX;
        for (i, candidate) in self.colors.iter().enumerate() {
            let dist = color.distance_sq(*candidate);
            if dist < best_dist {
                best = i;
                best_dist = dist;
                if dist == 0 {
                    break;
                }
            }
        }
        best as u8
    }
}
