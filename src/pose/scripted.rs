//! Scripted head sampler
//!
//! A [`HeadSampler`] fed from a queue of scripted frames instead of a
//! camera. Used by the `statues run` demo and by the integration tests:
//! it makes whole games deterministic without any capture hardware.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{GameError, SamplerError};
use crate::pose::{HeadSampler, Landmark, ScoredLandmark};

/// One scripted sample: a head position, or no detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScriptFrame {
    /// The head is visible at `(x, y)`
    At {
        /// Horizontal coordinate
        x: f64,
        /// Vertical coordinate
        y: f64,
    },
    /// No landmark qualifies this frame
    Missing,
}

impl ScriptFrame {
    /// Expands the frame into the landmark set a real estimator would
    /// produce: nose and both eyes at the scripted position, scored 0.99.
    #[must_use]
    pub fn to_landmarks(self) -> Vec<ScoredLandmark> {
        match self {
            Self::Missing => vec![],
            Self::At { x, y } => [Landmark::Nose, Landmark::LeftEye, Landmark::RightEye]
                .into_iter()
                .map(|landmark| ScoredLandmark {
                    landmark,
                    score: 0.99,
                    x,
                    y,
                })
                .collect(),
        }
    }
}

/// Replays scripted frames as head samples.
///
/// Frames are consumed in order. When the queue drains, the last frame
/// repeats indefinitely (a player holding still), so scripts only need
/// to describe the interesting motion. Frames can also be pushed while
/// a game is running.
#[derive(Debug)]
pub struct ScriptedSampler {
    frames: Mutex<ScriptState>,
}

#[derive(Debug)]
struct ScriptState {
    pending: VecDeque<ScriptFrame>,
    last: Option<ScriptFrame>,
}

impl ScriptedSampler {
    /// Creates a sampler from a sequence of frames.
    #[must_use]
    pub fn new(frames: impl IntoIterator<Item = ScriptFrame>) -> Self {
        Self {
            frames: Mutex::new(ScriptState {
                pending: frames.into_iter().collect(),
                last: None,
            }),
        }
    }

    /// Loads a script file: one frame per line, either `x,y` or `none`.
    ///
    /// Blank lines and lines starting with `#` are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Io`] if the file cannot be read and
    /// [`GameError::Script`] on malformed lines.
    pub fn from_path(path: &Path) -> Result<Self, GameError> {
        let raw = std::fs::read_to_string(path)?;
        let mut frames = Vec::new();

        for (index, line) in raw.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            frames.push(parse_frame(line).ok_or_else(|| {
                GameError::Script(format!(
                    "line {}: expected `x,y` or `none`, got `{line}`",
                    index + 1
                ))
            })?);
        }

        if frames.is_empty() {
            return Err(GameError::Script("script contains no frames".to_string()));
        }

        Ok(Self::new(frames))
    }

    /// Appends a frame to the pending queue.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn push(&self, frame: ScriptFrame) {
        self.frames.lock().expect("script lock poisoned").pending.push_back(frame);
    }

    fn next_frame(&self) -> Option<ScriptFrame> {
        let mut state = self.frames.lock().expect("script lock poisoned");
        if let Some(frame) = state.pending.pop_front() {
            state.last = Some(frame);
        }
        state.last
    }
}

fn parse_frame(line: &str) -> Option<ScriptFrame> {
    if line.eq_ignore_ascii_case("none") {
        return Some(ScriptFrame::Missing);
    }
    let (x, y) = line.split_once(',')?;
    Some(ScriptFrame::At {
        x: x.trim().parse().ok()?,
        y: y.trim().parse().ok()?,
    })
}

#[async_trait]
impl HeadSampler for ScriptedSampler {
    async fn sample(&self, _confidence_floor: f64) -> Result<Vec<ScoredLandmark>, SamplerError> {
        Ok(self.next_frame().map_or_else(Vec::new, ScriptFrame::to_landmarks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::HeadPosition;
    use std::io::Write;

    #[tokio::test]
    async fn test_frames_replay_in_order() {
        let sampler = ScriptedSampler::new([
            ScriptFrame::At { x: 1.0, y: 1.0 },
            ScriptFrame::At { x: 2.0, y: 2.0 },
        ]);

        let first = sampler.sample(0.2).await.unwrap();
        let pos = HeadPosition::from_landmarks(&first, 0.2).unwrap();
        assert!((pos.x - 1.0).abs() < f64::EPSILON);

        let second = sampler.sample(0.2).await.unwrap();
        let pos = HeadPosition::from_landmarks(&second, 0.2).unwrap();
        assert!((pos.x - 2.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_last_frame_repeats_when_drained() {
        let sampler = ScriptedSampler::new([ScriptFrame::At { x: 7.0, y: 7.0 }]);

        for _ in 0..3 {
            let landmarks = sampler.sample(0.2).await.unwrap();
            let pos = HeadPosition::from_landmarks(&landmarks, 0.2).unwrap();
            assert!((pos.x - 7.0).abs() < f64::EPSILON);
        }
    }

    #[tokio::test]
    async fn test_empty_script_yields_no_landmarks() {
        let sampler = ScriptedSampler::new([]);
        assert!(sampler.sample(0.2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_frame_yields_no_landmarks() {
        let sampler = ScriptedSampler::new([ScriptFrame::Missing]);
        assert!(sampler.sample(0.2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_push_appends_after_drain() {
        let sampler = ScriptedSampler::new([ScriptFrame::At { x: 0.0, y: 0.0 }]);
        let _ = sampler.sample(0.2).await.unwrap();

        sampler.push(ScriptFrame::At { x: 50.0, y: 0.0 });
        let landmarks = sampler.sample(0.2).await.unwrap();
        let pos = HeadPosition::from_landmarks(&landmarks, 0.2).unwrap();
        assert!((pos.x - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_frame_variants() {
        assert_eq!(
            parse_frame("12.5, -3"),
            Some(ScriptFrame::At { x: 12.5, y: -3.0 })
        );
        assert_eq!(parse_frame("none"), Some(ScriptFrame::Missing));
        assert_eq!(parse_frame("NONE"), Some(ScriptFrame::Missing));
        assert_eq!(parse_frame("not a frame"), None);
        assert_eq!(parse_frame("1;2"), None);
    }

    #[test]
    fn test_from_path_skips_comments_and_blanks() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# warmup\n\n0,0\n20,0\nnone").unwrap();

        let sampler = ScriptedSampler::from_path(file.path()).unwrap();
        let state = sampler.frames.lock().unwrap();
        assert_eq!(state.pending.len(), 3);
    }

    #[test]
    fn test_from_path_rejects_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0,0\nwat").unwrap();

        let err = ScriptedSampler::from_path(file.path()).unwrap_err();
        assert!(matches!(err, GameError::Script(_)));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_from_path_rejects_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# nothing but comments").unwrap();

        let err = ScriptedSampler::from_path(file.path()).unwrap_err();
        assert!(matches!(err, GameError::Script(_)));
    }
}
