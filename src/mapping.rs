use serde::Serialize;

use crate::error::{Error, Result};
use crate::types::{EyePair, Point};

/// Maps detector coordinates (camera preview frame) into view coordinates.
///
/// Front-facing cameras are displayed mirrored, so their x axis is flipped
/// after scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewMapping {
    source_width: f32,
    source_height: f32,
    view_width: f32,
    view_height: f32,
    mirrored: bool,
}

impl ViewMapping {
    pub fn new(
        source_width: f32,
        source_height: f32,
        view_width: f32,
        view_height: f32,
        mirrored: bool,
    ) -> Result<Self> {
        let dims = [
            ("source width", source_width),
            ("source height", source_height),
            ("view width", view_width),
            ("view height", view_height),
        ];
        for (name, value) in dims {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidMapping(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        Ok(Self {
            source_width,
            source_height,
            view_width,
            view_height,
            mirrored,
        })
    }

    /// 1:1 mapping without mirroring, for coordinates already in view space.
    pub fn identity(width: f32, height: f32) -> Result<Self> {
        Self::new(width, height, width, height, false)
    }

    pub fn mirrored(&self) -> bool {
        self.mirrored
    }

    pub fn view_size(&self) -> (f32, f32) {
        (self.view_width, self.view_height)
    }

    pub fn scale_x(&self, x: f32) -> f32 {
        x * self.view_width / self.source_width
    }

    pub fn scale_y(&self, y: f32) -> f32 {
        y * self.view_height / self.source_height
    }

    pub fn translate_x(&self, x: f32) -> f32 {
        if self.mirrored {
            self.view_width - self.scale_x(x)
        } else {
            self.scale_x(x)
        }
    }

    pub fn translate_y(&self, y: f32) -> f32 {
        self.scale_y(y)
    }

    pub fn to_view(&self, p: Point) -> Point {
        Point::new(self.translate_x(p.x), self.translate_y(p.y))
    }

    pub fn eyes_to_view(&self, eyes: &EyePair) -> EyePair {
        EyePair::new(self.to_view(eyes.left), self.to_view(eyes.right))
    }
}
