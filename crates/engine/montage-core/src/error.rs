//! Errors raised at the editing and decoding boundary.
//!
//! Frame evaluation never returns these: the render path degrades to an empty or partial scene.

use crate::ids::TrackId;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum MontageError {
    /// Track durations must be at least one frame.
    #[error("Invalid duration {frames} for track {track:?}")]
    InvalidDuration { track: Option<TrackId>, frames: i64 },

    #[error("Track not found: {0:?}")]
    TrackNotFound(TrackId),

    /// A reorder list must name every track exactly once.
    #[error("Reorder list is not a permutation of the timeline: {reason}")]
    InvalidOrder { reason: String },

    #[error("Project parse error: {reason}")]
    Parse { reason: String },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl MontageError {
    /// Coarse category name, handy for host-side error reporting.
    pub fn category(&self) -> &'static str {
        match self {
            MontageError::InvalidDuration { .. }
            | MontageError::TrackNotFound(_)
            | MontageError::InvalidOrder { .. } => "timeline",
            MontageError::Parse { .. } => "parse",
            MontageError::InvalidConfig { .. } => "config",
        }
    }

    /// Editing errors leave the timeline untouched and can be retried with corrected input.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, MontageError::InvalidConfig { .. })
    }
}

impl From<serde_json::Error> for MontageError {
    fn from(err: serde_json::Error) -> Self {
        MontageError::Parse {
            reason: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MontageError>;
