//! Single-slot hand-off of the latest eye detection.
//!
//! The detector thread publishes whole snapshots; the render thread reads the
//! most recent one. A snapshot is immutable once published, so a reader sees
//! either the old pair or the new pair, never one eye from each.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::types::{EyeOpenness, EyePair};

/// One published detection.
#[derive(Debug, Clone, PartialEq)]
pub struct EyeSnapshot {
    /// Eye positions in detector coordinates.
    pub eyes: EyePair,
    pub openness: Option<EyeOpenness>,
    /// Generation at which this snapshot was published.
    pub generation: u64,
}

/// Latest-value mailbox for eye detections. Last writer wins.
#[derive(Debug, Default)]
pub struct EyeMailbox {
    slot: RwLock<Option<Arc<EyeSnapshot>>>,
    generation: AtomicU64,
}

impl EyeMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current detection. Returns the new generation.
    pub fn publish(&self, eyes: EyePair, openness: Option<EyeOpenness>) -> u64 {
        let mut slot = self.slot.write();
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        *slot = Some(Arc::new(EyeSnapshot {
            eyes,
            openness,
            generation,
        }));
        debug!(generation, "published eye detection");
        generation
    }

    /// Record that no face is visible. Returns the new generation.
    pub fn clear(&self) -> u64 {
        let mut slot = self.slot.write();
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        *slot = None;
        debug!(generation, "cleared eye detection");
        generation
    }

    /// The most recent detection, if a face is currently visible.
    pub fn latest(&self) -> Option<Arc<EyeSnapshot>> {
        self.slot.read().clone()
    }

    /// Number of updates (publishes and clears) so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}
