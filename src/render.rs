//! Compositing the overlay onto a frame.

use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};

use crate::error::{Error, Result};
use crate::transform::{FaceGeometry, OverlayTransform};

const GUIDE_COLOR: Rgba<u8> = Rgba([0, 255, 0, 255]);
const CENTER_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);
const CENTER_MARKER_RADIUS: i32 = 3;

/// Draw `overlay` onto `canvas` with the given transform, alpha-blended.
///
/// Parts of the overlay falling outside the canvas are clipped. Fails with
/// [`Error::SingularTransform`] only when the matrix cannot be inverted.
pub fn draw_overlay(
    canvas: &mut RgbaImage,
    overlay: &RgbaImage,
    transform: &OverlayTransform,
) -> Result<()> {
    let projection = Projection::from_matrix(transform.matrix().to_projective())
        .ok_or(Error::SingularTransform)?;

    let (width, height) = canvas.dimensions();
    let mut layer = RgbaImage::new(width, height);
    warp_into(
        overlay,
        &projection,
        Interpolation::Bilinear,
        Rgba([0, 0, 0, 0]),
        &mut layer,
    );
    imageops::overlay(canvas, &layer, 0, 0);
    Ok(())
}

/// Draw placement guides for tuning the config: the estimated face outline,
/// the eye line and the overlay anchor.
pub fn draw_debug_guides(canvas: &mut RgbaImage, geometry: &FaceGeometry) {
    let center = (
        geometry.center.x.round() as i32,
        geometry.center.y.round() as i32,
    );

    draw_hollow_circle_mut(
        canvas,
        center,
        (geometry.face_width / 2.0).round() as i32,
        GUIDE_COLOR,
    );
    draw_line_segment_mut(
        canvas,
        (geometry.left.x, geometry.left.y),
        (geometry.right.x, geometry.right.y),
        GUIDE_COLOR,
    );
    draw_filled_circle_mut(canvas, center, CENTER_MARKER_RADIUS, CENTER_COLOR);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OverlayConfig;
    use crate::transform::overlay_transform;
    use crate::types::{EyePair, OverlayAsset, Point};

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn level_eyes() -> EyePair {
        EyePair::new(Point::new(40.0, 50.0), Point::new(60.0, 50.0))
    }

    #[test]
    fn overlay_lands_between_the_eyes() {
        let mut canvas = RgbaImage::from_pixel(100, 100, WHITE);
        let overlay = RgbaImage::from_pixel(10, 10, RED);
        let asset = OverlayAsset::from_image(&overlay).unwrap();
        let config = OverlayConfig {
            scale_factor: 0.5,
            ..OverlayConfig::default()
        };
        let transform = overlay_transform(&level_eyes(), &asset, false, &config).unwrap();

        draw_overlay(&mut canvas, &overlay, &transform).unwrap();

        assert_eq!(*canvas.get_pixel(50, 50), RED);
        assert_eq!(*canvas.get_pixel(5, 5), WHITE);
        assert_eq!(*canvas.get_pixel(95, 95), WHITE);
    }

    #[test]
    fn transparent_overlay_leaves_canvas_untouched() {
        let mut canvas = RgbaImage::from_pixel(40, 40, WHITE);
        let overlay = RgbaImage::new(8, 8);
        let asset = OverlayAsset::from_image(&overlay).unwrap();
        let eyes = EyePair::new(Point::new(10.0, 20.0), Point::new(30.0, 20.0));
        let transform =
            overlay_transform(&eyes, &asset, true, &OverlayConfig::default()).unwrap();

        draw_overlay(&mut canvas, &overlay, &transform).unwrap();

        assert!(canvas.pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn debug_guides_mark_center_and_outline() {
        let mut canvas = RgbaImage::new(100, 100);
        let geometry = FaceGeometry::from_eyes(&level_eyes(), &OverlayConfig::default()).unwrap();

        draw_debug_guides(&mut canvas, &geometry);

        assert_eq!(*canvas.get_pixel(50, 50), CENTER_COLOR);
        // eye line away from the center marker
        assert_eq!(*canvas.get_pixel(42, 50), GUIDE_COLOR);
        // face outline, radius face_width / 2 = 25
        assert!((73..=77).any(|x| *canvas.get_pixel(x, 50) == GUIDE_COLOR));
    }

    #[test]
    fn large_asset_on_distant_face_still_draws() {
        let asset = OverlayAsset::new(20_000, 20_000).unwrap();
        let eyes = EyePair::new(Point::new(10.0, 10.0), Point::new(11.5, 10.0));
        let transform = overlay_transform(&eyes, &asset, false, &OverlayConfig::default()).unwrap();
        assert!(transform.matrix().determinant() < f32::EPSILON);

        let mut canvas = RgbaImage::from_pixel(20, 20, WHITE);
        let overlay = RgbaImage::from_pixel(4, 4, RED);
        assert!(draw_overlay(&mut canvas, &overlay, &transform).is_ok());
    }
}
