//! Face geometry and the overlay transform.
//!
//! The whole face estimate hangs off a single measurement, the distance
//! between the two eyes:
//!
//! 1. `eye_distance = |right - left|`
//! 2. `face_width = eye_distance / eye_width_to_face_width_ratio`
//! 3. `face_height = face_width / face_width_to_height_ratio`
//! 4. The overlay is anchored at the eye midpoint.
//! 5. The eye-line angle is `atan2(dy, -dx)`; rotating the overlay by
//!    `-degrees(angle)` lines it up with the eyes.
//! 6. The overlay is scaled uniformly so its area matches the estimated
//!    face area, times a cosmetic `scale_factor`.
//!
//! The resulting matrix is built in a fixed order: move the overlay center to
//! the origin, rotate, add the mirror half-turn, scale, then move to the face.

use serde::Serialize;
use tracing::{debug, trace};

use crate::config::OverlayConfig;
use crate::types::{EyePair, OverlayAsset, Point};

/// A 2x3 affine matrix mapping `(x, y)` to
/// `(a*x + b*y + tx, c*x + d*y + ty)`.
///
/// The `post_*` builders apply the new operation after the existing mapping
/// and return a fresh value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Affine2 {
    pub a: f32,
    pub b: f32,
    pub tx: f32,
    pub c: f32,
    pub d: f32,
    pub ty: f32,
}

impl Affine2 {
    pub const fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            tx: 0.0,
            c: 0.0,
            d: 1.0,
            ty: 0.0,
        }
    }

    pub fn post_translate(self, dx: f32, dy: f32) -> Self {
        Self {
            tx: self.tx + dx,
            ty: self.ty + dy,
            ..self
        }
    }

    /// Rotate about the origin. Positive degrees turn +x toward +y, which is
    /// clockwise on a y-down screen.
    pub fn post_rotate(self, degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self {
            a: cos * self.a - sin * self.c,
            b: cos * self.b - sin * self.d,
            tx: cos * self.tx - sin * self.ty,
            c: sin * self.a + cos * self.c,
            d: sin * self.b + cos * self.d,
            ty: sin * self.tx + cos * self.ty,
        }
    }

    pub fn post_scale(self, sx: f32, sy: f32) -> Self {
        Self {
            a: self.a * sx,
            b: self.b * sx,
            tx: self.tx * sx,
            c: self.c * sy,
            d: self.d * sy,
            ty: self.ty * sy,
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.b * p.y + self.tx,
            self.c * p.x + self.d * p.y + self.ty,
        )
    }

    pub fn determinant(&self) -> f32 {
        self.a * self.d - self.b * self.c
    }

    pub fn is_finite(&self) -> bool {
        [self.a, self.b, self.tx, self.c, self.d, self.ty]
            .iter()
            .all(|v| v.is_finite())
    }

    /// Row-major 3x3 homogeneous form.
    pub fn to_projective(&self) -> [f32; 9] {
        [
            self.a, self.b, self.tx, //
            self.c, self.d, self.ty, //
            0.0, 0.0, 1.0,
        ]
    }
}

impl Default for Affine2 {
    fn default() -> Self {
        Self::identity()
    }
}

/// Wrap an angle in degrees into `(-180, 180]`.
pub fn normalize_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Face measurements inferred from one eye pair, in view space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FaceGeometry {
    pub left: Point,
    pub right: Point,
    /// Eye midpoint, used as the overlay anchor.
    pub center: Point,
    pub eye_distance: f32,
    pub face_width: f32,
    pub face_height: f32,
    /// `atan2(dy, -dx)` in radians.
    pub eye_line_angle: f32,
}

impl FaceGeometry {
    /// Estimate face geometry from an eye pair.
    ///
    /// Returns `None` when the eyes are closer than
    /// [`OverlayConfig::eye_distance_threshold`]
    /// (including identical points) or any coordinate is not finite.
    pub fn from_eyes(eyes: &EyePair, config: &OverlayConfig) -> Option<Self> {
        if !eyes.is_finite() {
            trace!(?eyes, "skipping frame with non-finite eye position");
            return None;
        }

        let dx = eyes.right.x - eyes.left.x;
        let dy = eyes.right.y - eyes.left.y;
        let eye_distance = (dx * dx + dy * dy).sqrt();
        if !eye_distance.is_finite() || eye_distance < config.eye_distance_threshold() {
            trace!(eye_distance, "skipping frame with degenerate eye line");
            return None;
        }

        let face_width = eye_distance / config.eye_width_to_face_width_ratio;
        let face_height = face_width / config.face_width_to_height_ratio;

        Some(Self {
            left: eyes.left,
            right: eyes.right,
            center: eyes.left.midpoint(&eyes.right),
            eye_distance,
            face_width,
            face_height,
            eye_line_angle: dy.atan2(-dx),
        })
    }

    /// Uniform scale that makes the asset's area match the face area.
    pub fn overlay_scale(&self, asset: &OverlayAsset, config: &OverlayConfig) -> f32 {
        config.scale_factor * ((self.face_width * self.face_height) / asset.area()).sqrt()
    }

    /// Build the transform placing `asset` on this face.
    pub fn overlay_transform(
        &self,
        asset: &OverlayAsset,
        mirrored: bool,
        config: &OverlayConfig,
    ) -> Option<OverlayTransform> {
        let scale = self.overlay_scale(asset, config);
        if !scale.is_finite() || scale <= 0.0 {
            trace!(scale, "skipping frame with unusable overlay scale");
            return None;
        }

        let origin = asset.center();
        let eye_line_degrees = -self.eye_line_angle.to_degrees();
        let mirror_degrees = if mirrored { 180.0 } else { 0.0 };

        let matrix = Affine2::identity()
            .post_translate(-origin.x, -origin.y)
            .post_rotate(eye_line_degrees)
            .post_rotate(mirror_degrees)
            .post_scale(scale, scale)
            .post_translate(self.center.x, self.center.y);
        if !matrix.is_finite() {
            return None;
        }

        let transform = OverlayTransform {
            rotation_degrees: normalize_degrees(eye_line_degrees + mirror_degrees),
            scale,
            translate_x: self.center.x,
            translate_y: self.center.y,
            origin_x: origin.x,
            origin_y: origin.y,
            matrix,
        };
        debug!(
            rotation = transform.rotation_degrees,
            scale = transform.scale,
            x = transform.translate_x,
            y = transform.translate_y,
            "computed overlay transform"
        );
        Some(transform)
    }
}

/// Placement of an overlay asset on a face.
///
/// Recomputed from scratch for every frame; nothing carries over between
/// frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverlayTransform {
    /// Total rotation including the mirror half-turn, in `(-180, 180]`.
    pub rotation_degrees: f32,
    pub scale: f32,
    pub translate_x: f32,
    pub translate_y: f32,
    /// Asset point moved to the origin before rotating (its center).
    pub origin_x: f32,
    pub origin_y: f32,
    matrix: Affine2,
}

impl OverlayTransform {
    /// Matrix mapping asset pixel coordinates to view coordinates.
    pub fn matrix(&self) -> Affine2 {
        self.matrix
    }

    pub fn center(&self) -> Point {
        Point::new(self.translate_x, self.translate_y)
    }

    /// Map a point in asset pixel space into view space.
    pub fn apply(&self, p: Point) -> Point {
        self.matrix.apply(p)
    }
}

/// Compute where to draw `asset` for the given view-space eye pair.
///
/// `mirrored` adds a half-turn for front-facing cameras. Returns `None` for
/// degenerate geometry; that is a routine "no overlay this frame" outcome.
pub fn overlay_transform(
    eyes: &EyePair,
    asset: &OverlayAsset,
    mirrored: bool,
    config: &OverlayConfig,
) -> Option<OverlayTransform> {
    FaceGeometry::from_eyes(eyes, config)?.overlay_transform(asset, mirrored, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f32, expected: f32, tol: f32) {
        assert!(
            (actual - expected).abs() < tol,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn normalize_wraps_into_half_open_range() {
        assert_close(normalize_degrees(-180.0), 180.0, 1e-4);
        assert_close(normalize_degrees(360.0), 0.0, 1e-4);
        assert_close(normalize_degrees(270.0), -90.0, 1e-4);
        assert_close(normalize_degrees(-450.0), -90.0, 1e-4);
        assert_close(normalize_degrees(45.0), 45.0, 1e-4);
    }

    #[test]
    fn affine_composition_order() {
        // translate then rotate 90 then scale 2
        let m = Affine2::identity()
            .post_translate(1.0, 0.0)
            .post_rotate(90.0)
            .post_scale(2.0, 2.0);
        let p = m.apply(Point::zero());
        // (0,0) -> (1,0) -> (0,1) -> (0,2)
        assert_close(p.x, 0.0, 1e-5);
        assert_close(p.y, 2.0, 1e-5);
        assert_close(m.determinant(), 4.0, 1e-4);
    }

    #[test]
    fn projective_form_has_affine_last_row() {
        let m = Affine2::identity().post_translate(3.0, 4.0);
        assert_eq!(
            m.to_projective(),
            [1.0, 0.0, 3.0, 0.0, 1.0, 4.0, 0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn geometry_from_level_eyes() {
        let eyes = EyePair::new(Point::new(100.0, 200.0), Point::new(180.0, 200.0));
        let geometry = FaceGeometry::from_eyes(&eyes, &OverlayConfig::default()).unwrap();

        assert_close(geometry.eye_distance, 80.0, 1e-4);
        assert_close(geometry.face_width, 200.0, 1e-3);
        assert_close(geometry.face_height, 322.0, 1e-2);
        assert_eq!(geometry.center, Point::new(140.0, 200.0));
        assert_close(geometry.eye_line_angle, std::f32::consts::PI, 1e-5);
    }

    #[test]
    fn identical_eyes_have_no_geometry() {
        let config = OverlayConfig::default();
        let origin = EyePair::new(Point::zero(), Point::zero());
        assert!(FaceGeometry::from_eyes(&origin, &config).is_none());

        let near = EyePair::new(Point::new(10.0, 10.0), Point::new(10.5, 10.0));
        assert!(FaceGeometry::from_eyes(&near, &config).is_none());
    }

    #[test]
    fn unvalidated_config_cannot_admit_near_zero_eye_lines() {
        let eyes = EyePair::new(Point::new(5.0, 5.0), Point::new(5.00001, 5.0));
        let asset = OverlayAsset::new(64, 64).unwrap();
        for min_eye_distance in [0.0, f32::NAN] {
            let config = OverlayConfig {
                min_eye_distance,
                ..OverlayConfig::default()
            };
            assert!(FaceGeometry::from_eyes(&eyes, &config).is_none());
            assert!(overlay_transform(&eyes, &asset, false, &config).is_none());
        }
    }

    #[test]
    fn matrix_maps_asset_center_to_eye_midpoint() {
        let eyes = EyePair::new(Point::new(40.0, 90.0), Point::new(110.0, 60.0));
        let asset = OverlayAsset::new(128, 96).unwrap();
        let t = overlay_transform(&eyes, &asset, false, &OverlayConfig::default()).unwrap();

        let mapped = t.apply(asset.center());
        assert_close(mapped.x, 75.0, 1e-3);
        assert_close(mapped.y, 75.0, 1e-3);
        assert_close(t.matrix().determinant(), t.scale * t.scale, 1e-2);
    }

    #[test]
    fn matrix_agrees_with_normalized_rotation() {
        let eyes = EyePair::new(Point::new(12.0, 30.0), Point::new(70.0, 48.0));
        let asset = OverlayAsset::new(50, 80).unwrap();
        let config = OverlayConfig::default();

        for mirrored in [false, true] {
            let t = overlay_transform(&eyes, &asset, mirrored, &config).unwrap();
            let rebuilt = Affine2::identity()
                .post_translate(-t.origin_x, -t.origin_y)
                .post_rotate(t.rotation_degrees)
                .post_scale(t.scale, t.scale)
                .post_translate(t.translate_x, t.translate_y);
            let corner = Point::new(0.0, 0.0);
            let a = t.apply(corner);
            let b = rebuilt.apply(corner);
            assert_close(a.x, b.x, 1e-2);
            assert_close(a.y, b.y, 1e-2);
        }
    }

    #[test]
    fn non_finite_eyes_are_skipped() {
        let eyes = EyePair::new(Point::new(f32::INFINITY, 0.0), Point::new(5.0, 5.0));
        let asset = OverlayAsset::new(10, 10).unwrap();
        assert!(overlay_transform(&eyes, &asset, false, &OverlayConfig::default()).is_none());
    }
}
