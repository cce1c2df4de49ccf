//! Configuration error types
//!
//! The simulation itself has no failure surface; only loading and
//! validating a [`Tuning`](crate::tuning::Tuning) can fail.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum TuningError {
    /// The tuning file could not be read
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The document is not valid JSON for a tuning table
    Parse(serde_json::Error),

    /// A size or speed is zero, negative or not finite
    InvalidValue { field: &'static str, value: f32 },

    /// The grid has no blocks at all
    EmptyGrid,

    /// One row of blocks is wider than the arena
    GridTooWide { needed: f32, available: f32 },

    /// The lowest block row reaches down into the guard's lane
    GridOverlapsGuard { grid_bottom: f32, guard_top: f32 },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Io { path, source } => {
                write!(f, "failed to read tuning file {}: {}", path.display(), source)
            }
            TuningError::Parse(err) => write!(f, "invalid tuning document: {}", err),
            TuningError::InvalidValue { field, value } => {
                write!(f, "tuning value `{}` must be positive and finite, got {}", field, value)
            }
            TuningError::EmptyGrid => write!(f, "block grid must have at least one row and column"),
            TuningError::GridTooWide { needed, available } => write!(
                f,
                "block row needs {} px but the arena is only {} px wide",
                needed, available
            ),
            TuningError::GridOverlapsGuard {
                grid_bottom,
                guard_top,
            } => write!(
                f,
                "block grid bottom ({}) reaches the guard top ({})",
                grid_bottom, guard_top
            ),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Io { source, .. } => Some(source),
            TuningError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        TuningError::Parse(err)
    }
}
