use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A 2D point with floating-point coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn distance(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl std::ops::Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl std::ops::Mul<f32> for Point {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

/// The two eye positions of one detected face.
///
/// "Left" and "right" are whatever the detector reports; the eye-line angle
/// is measured from `left` to `right`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EyePair {
    pub left: Point,
    pub right: Point,
}

impl EyePair {
    pub const fn new(left: Point, right: Point) -> Self {
        Self { left, right }
    }

    /// The same pair with left and right exchanged.
    pub fn swapped(&self) -> Self {
        Self {
            left: self.right,
            right: self.left,
        }
    }

    /// Shift both eyes by the same offset.
    pub fn translated(&self, offset: Point) -> Self {
        Self {
            left: self.left + offset,
            right: self.right + offset,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.left.is_finite() && self.right.is_finite()
    }
}

/// Eye open/closed flags reported by detectors that classify eye state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EyeOpenness {
    pub left_open: bool,
    pub right_open: bool,
}

/// Pixel dimensions of the image drawn over the face.
///
/// Both dimensions are non-zero; this is checked once at construction so the
/// per-frame math never divides by a zero area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OverlayAsset {
    width: u32,
    height: u32,
}

impl OverlayAsset {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyOverlay { width, height });
        }
        Ok(Self { width, height })
    }

    /// Take the dimensions of an already decoded overlay image.
    pub fn from_image(image: &RgbaImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        Self::new(width, height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn area(&self) -> f32 {
        self.width as f32 * self.height as f32
    }

    /// Center of the asset in its own pixel space.
    pub fn center(&self) -> Point {
        Point::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }
}
