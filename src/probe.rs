//! Boundary to the host's image decoder.
//!
//! The sheet needs each image's intrinsic dimensions exactly once, at
//! insertion time, to capture its aspect ratio. Decoding bytes is the host's
//! job, so the dependency points inward through [`DimensionProbe`]. A failed
//! probe is an expected condition, not a batch failure: callers substitute
//! [`crate::consts::FALLBACK_ASPECT_RATIO`] and carry on.

#[cfg(test)]
#[path = "probe_test.rs"]
mod probe_test;

use async_trait::async_trait;

/// Intrinsic pixel dimensions of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Width/height ratio, or `None` when either side is zero — the
    /// conventional marker for an image that decoded but reported no real
    /// geometry.
    #[must_use]
    pub fn aspect_ratio(self) -> Option<f64> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        Some(f64::from(self.width) / f64::from(self.height))
    }
}

/// Error returned by [`DimensionProbe::dimensions`].
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// The image bytes could not be fetched or decoded.
    #[error("failed to decode image {src}: {reason}")]
    Decode {
        /// Source reference of the image that failed.
        src: String,
        /// Host-provided diagnostic.
        reason: String,
    },
}

/// Async boundary to the host's image decoder. Enables mocking in tests.
#[async_trait]
pub trait DimensionProbe: Send + Sync {
    /// Measure the intrinsic dimensions of the image behind `src`.
    ///
    /// # Errors
    ///
    /// Returns a [`ProbeError`] when the image cannot be decoded. Callers
    /// absorb the error into a fallback aspect ratio; one bad image must
    /// never fail its siblings in the same batch.
    async fn dimensions(&self, src: &str) -> Result<Dimensions, ProbeError>;
}
