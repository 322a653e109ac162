//! # face-overlay
//!
//! Place a mascot image over a face from nothing more than two eye positions.
//!
//! This crate provides:
//! - **Face geometry**: face width, height and eye-line angle inferred from an eye pair
//! - **Overlay transform**: the rotation, uniform scale and translation that draw an
//!   overlay centered between the eyes, following head tilt and distance
//! - **Detection hand-off**: a single-slot mailbox so a detector thread and a render
//!   thread always agree on one complete eye pair
//! - **Rendering**: compositing the overlay onto an RGBA frame, plus tuning guides
//!
//! Face detection and camera capture are left to the caller; eye positions come
//! in already detected.
//!
//! ## Quick Start
//!
//! ```rust
//! use face_overlay::{overlay_transform, EyePair, OverlayAsset, OverlayConfig, Point};
//!
//! let asset = OverlayAsset::new(64, 64).unwrap();
//! let eyes = EyePair::new(Point::new(100.0, 200.0), Point::new(180.0, 200.0));
//!
//! let transform = overlay_transform(&eyes, &asset, false, &OverlayConfig::default())
//!     .expect("eyes are distinct");
//! assert_eq!(transform.center(), Point::new(140.0, 200.0));
//!
//! // Identical eyes mean there is no usable face this frame.
//! let blink = EyePair::new(Point::zero(), Point::zero());
//! assert!(overlay_transform(&blink, &asset, false, &OverlayConfig::default()).is_none());
//! ```
//!
//! ## Live feeds
//!
//! [`OverlayGraphic`] ties the pieces together for a camera preview: the detector
//! callback publishes sensor-space eyes, the render callback maps them to view
//! space and draws.
//!
//! ```rust
//! use face_overlay::{OverlayAsset, OverlayConfig, OverlayGraphic, Point, ViewMapping};
//!
//! let mapping = ViewMapping::new(640.0, 480.0, 1280.0, 960.0, true).unwrap();
//! let graphic = OverlayGraphic::new(
//!     OverlayAsset::new(128, 128).unwrap(),
//!     OverlayConfig::default(),
//!     mapping,
//! );
//!
//! graphic.update_eyes(Point::new(300.0, 200.0), Point::new(360.0, 200.0));
//! let transform = graphic.transform().unwrap();
//! assert!(transform.scale > 0.0);
//! ```

mod config;
mod error;
mod graphic;
mod mailbox;
mod mapping;
pub mod render;
mod transform;
mod types;

pub use config::OverlayConfig;
pub use error::{Error, Result};
pub use graphic::{Invalidate, NoRedraw, OverlayGraphic};
pub use mailbox::{EyeMailbox, EyeSnapshot};
pub use mapping::ViewMapping;
pub use render::{draw_debug_guides, draw_overlay};
pub use transform::{normalize_degrees, overlay_transform, Affine2, FaceGeometry, OverlayTransform};
pub use types::{EyeOpenness, EyePair, OverlayAsset, Point};
