use image::RgbaImage;
use parking_lot::RwLock;
use tracing::trace;

use crate::config::OverlayConfig;
use crate::error::{Error, Result};
use crate::mailbox::EyeMailbox;
use crate::mapping::ViewMapping;
use crate::render::draw_overlay;
use crate::transform::{FaceGeometry, OverlayTransform};
use crate::types::{EyeOpenness, EyePair, OverlayAsset, Point};

/// Redraw request sent to the host surface after every detection update.
///
/// Hosts may coalesce requests; the graphic always recomputes from the latest
/// detection when it is drawn.
pub trait Invalidate: Send + Sync {
    fn invalidate(&self);
}

/// For hosts that poll [`EyeMailbox::generation`] instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRedraw;

impl Invalidate for NoRedraw {
    fn invalidate(&self) {}
}

impl<F> Invalidate for F
where
    F: Fn() + Send + Sync,
{
    fn invalidate(&self) {
        self()
    }
}

/// An overlay that follows one tracked face.
///
/// The detector side calls [`update_eyes`](Self::update_eyes) or
/// [`clear`](Self::clear); the render side calls [`draw`](Self::draw) or
/// [`transform`](Self::transform). Both sides may run on different threads.
pub struct OverlayGraphic<I: Invalidate = NoRedraw> {
    asset: OverlayAsset,
    config: OverlayConfig,
    mapping: RwLock<ViewMapping>,
    mailbox: EyeMailbox,
    invalidate: I,
}

impl OverlayGraphic<NoRedraw> {
    pub fn new(asset: OverlayAsset, config: OverlayConfig, mapping: ViewMapping) -> Self {
        Self::with_invalidate(asset, config, mapping, NoRedraw)
    }
}

impl<I: Invalidate> OverlayGraphic<I> {
    pub fn with_invalidate(
        asset: OverlayAsset,
        config: OverlayConfig,
        mapping: ViewMapping,
        invalidate: I,
    ) -> Self {
        Self {
            asset,
            config,
            mapping: RwLock::new(mapping),
            mailbox: EyeMailbox::new(),
            invalidate,
        }
    }

    pub fn asset(&self) -> &OverlayAsset {
        &self.asset
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn mailbox(&self) -> &EyeMailbox {
        &self.mailbox
    }

    pub fn mapping(&self) -> ViewMapping {
        *self.mapping.read()
    }

    /// Swap the coordinate mapping, e.g. after a view resize or camera switch.
    pub fn set_mapping(&self, mapping: ViewMapping) {
        *self.mapping.write() = mapping;
        self.invalidate.invalidate();
    }

    /// Store the eye positions (detector coordinates) of the latest frame.
    pub fn update_eyes(&self, left: Point, right: Point) {
        self.mailbox.publish(EyePair::new(left, right), None);
        self.invalidate.invalidate();
    }

    pub fn update_eyes_with_openness(&self, left: Point, right: Point, openness: EyeOpenness) {
        self.mailbox
            .publish(EyePair::new(left, right), Some(openness));
        self.invalidate.invalidate();
    }

    /// The face left the frame.
    pub fn clear(&self) {
        self.mailbox.clear();
        self.invalidate.invalidate();
    }

    /// Face geometry of the latest detection in view coordinates.
    pub fn geometry(&self) -> Option<FaceGeometry> {
        let mapping = self.mapping();
        self.geometry_with(&mapping)
    }

    fn geometry_with(&self, mapping: &ViewMapping) -> Option<FaceGeometry> {
        let Some(snapshot) = self.mailbox.latest() else {
            trace!("no face to draw");
            return None;
        };
        let eyes = mapping.eyes_to_view(&snapshot.eyes);
        FaceGeometry::from_eyes(&eyes, &self.config)
    }

    /// Transform for the latest detection, or `None` when nothing should be
    /// drawn this frame.
    pub fn transform(&self) -> Option<OverlayTransform> {
        // one copy, so eye mirroring and the half-turn always agree
        let mapping = self.mapping();
        self.geometry_with(&mapping)?
            .overlay_transform(&self.asset, mapping.mirrored(), &self.config)
    }

    /// Composite `overlay` onto `canvas` for the latest detection.
    ///
    /// Returns `Ok(false)` when no face is available or the placement is too
    /// small to invert.
    pub fn draw(&self, canvas: &mut RgbaImage, overlay: &RgbaImage) -> Result<bool> {
        let (actual_width, actual_height) = overlay.dimensions();
        if (actual_width, actual_height) != (self.asset.width(), self.asset.height()) {
            return Err(Error::OverlayMismatch {
                width: self.asset.width(),
                height: self.asset.height(),
                actual_width,
                actual_height,
            });
        }

        let Some(transform) = self.transform() else {
            return Ok(false);
        };
        match draw_overlay(canvas, overlay, &transform) {
            Ok(()) => Ok(true),
            Err(Error::SingularTransform) => {
                trace!(scale = transform.scale, "skipping frame with non-invertible placement");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }
}
