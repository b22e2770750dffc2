//! Pose landmarks and the head sampler seam
//!
//! The game core never touches a camera or a model directly: it consumes
//! scored landmarks through the [`HeadSampler`] trait and reduces them to
//! a single [`HeadPosition`] per sample.
//!
//! # Architecture
//!
//! - [`Landmark`] — fixed enumeration of named body landmarks
//! - [`ScoredLandmark`] — one estimate: landmark, confidence, coordinates
//! - [`HeadPosition`] — mean of the qualifying head landmarks
//! - [`HeadSampler`] — async capture + estimation seam

pub mod scripted;

use async_trait::async_trait;

use crate::error::SamplerError;

/// Named body landmarks produced by the pose estimator.
///
/// Only the head landmarks contribute to [`HeadPosition`]; the rest are
/// carried so a richer estimator can be plugged in without widening the
/// trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Landmark {
    /// Tip of the nose
    Nose,
    /// Left eye center
    LeftEye,
    /// Right eye center
    RightEye,
    /// Left ear
    LeftEar,
    /// Right ear
    RightEar,
    /// Left shoulder
    LeftShoulder,
    /// Right shoulder
    RightShoulder,
}

impl Landmark {
    /// Whether this landmark contributes to the head position.
    #[must_use]
    pub const fn is_head(self) -> bool {
        matches!(self, Self::Nose | Self::LeftEye | Self::RightEye)
    }
}

/// A single confidence-scored landmark estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredLandmark {
    /// Which landmark this estimate is for
    pub landmark: Landmark,
    /// Estimator confidence in `[0, 1]`
    pub score: f64,
    /// Horizontal coordinate, in estimator units
    pub x: f64,
    /// Vertical coordinate, in estimator units
    pub y: f64,
}

/// A 2D head position in estimator coordinate units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadPosition {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl HeadPosition {
    /// Reduces a set of scored landmarks to a head position.
    ///
    /// Takes the mean of the coordinates of nose, left eye, and right
    /// eye estimates whose score exceeds `confidence_floor`. Returns
    /// `None` if no landmark qualifies.
    #[must_use]
    pub fn from_landmarks(landmarks: &[ScoredLandmark], confidence_floor: f64) -> Option<Self> {
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut count = 0u32;

        for lm in landmarks {
            if lm.landmark.is_head() && lm.score > confidence_floor {
                sum_x += lm.x;
                sum_y += lm.y;
                count += 1;
            }
        }

        if count == 0 {
            return None;
        }

        Some(Self {
            x: sum_x / f64::from(count),
            y: sum_y / f64::from(count),
        })
    }

    /// Whether either axis moved more than `threshold` units since `prev`.
    #[must_use]
    pub fn displaced_from(&self, prev: Self, threshold: f64) -> bool {
        (self.x - prev.x).abs() > threshold || (self.y - prev.y).abs() > threshold
    }
}

/// Async head sampling seam.
///
/// Implementations own the camera and the pose model: one call captures
/// a frame, runs estimation, and returns every landmark scoring above
/// `confidence_floor`. The returned set may be empty. Latency is
/// variable and uncontrolled; callers must re-check session liveness
/// after awaiting.
#[async_trait]
pub trait HeadSampler: Send + Sync {
    /// Captures a frame and estimates landmark positions.
    ///
    /// # Errors
    ///
    /// Returns [`SamplerError`] if capture or inference fails outright.
    /// A frame with no detectable head is `Ok(vec![])`, not an error.
    async fn sample(&self, confidence_floor: f64) -> Result<Vec<ScoredLandmark>, SamplerError>;
}

#[async_trait]
impl<T: HeadSampler + ?Sized> HeadSampler for std::sync::Arc<T> {
    async fn sample(&self, confidence_floor: f64) -> Result<Vec<ScoredLandmark>, SamplerError> {
        (**self).sample(confidence_floor).await
    }
}
