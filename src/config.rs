//! Tunable constants for overlay placement.
//!
//! The defaults were tuned by eye against a mascot asset with some padding
//! around the figure. They are not anthropometric truths, so every value can
//! be overridden from a JSON file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Placement constants used by [`crate::FaceGeometry`] and the overlay transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Eye span as a fraction of face width.
    pub eye_width_to_face_width_ratio: f32,

    /// Face width divided by face height (golden ratio by default).
    pub face_width_to_height_ratio: f32,

    /// Multiplier applied on top of the area-matched scale.
    pub scale_factor: f32,

    /// Eye distances (in view pixels) below this are treated as no face.
    pub min_eye_distance: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            eye_width_to_face_width_ratio: 0.4,
            face_width_to_height_ratio: 1.0 / 1.61,
            scale_factor: 1.2,
            min_eye_distance: 1.0,
        }
    }
}

impl OverlayConfig {
    /// Parse a JSON config. Missing fields keep their defaults.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        if let Err(err) = config.validate() {
            tracing::warn!(%err, "rejecting overlay config");
            return Err(err);
        }
        Ok(config)
    }

    /// Load a JSON config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Eye distance below which a frame has no usable face.
    ///
    /// Falls back to the default when the configured value is not a positive
    /// number, so a config that skipped [`validate`](Self::validate) still
    /// cannot let a near-zero eye line through.
    pub fn eye_distance_threshold(&self) -> f32 {
        if self.min_eye_distance.is_finite() && self.min_eye_distance > 0.0 {
            self.min_eye_distance
        } else {
            Self::default().min_eye_distance
        }
    }

    pub fn validate(&self) -> Result<()> {
        let fields = [
            (
                "eye_width_to_face_width_ratio",
                self.eye_width_to_face_width_ratio,
            ),
            ("face_width_to_height_ratio", self.face_width_to_height_ratio),
            ("scale_factor", self.scale_factor),
            ("min_eye_distance", self.min_eye_distance),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidConfig(name));
            }
        }
        Ok(())
    }
}
