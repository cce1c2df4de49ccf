//! Data-driven game balance
//!
//! [`Tuning`] mirrors every layout and speed constant in [`crate::consts`].
//! A JSON document only needs to name the keys it overrides; everything
//! else falls back to the compile-time defaults.
//!
//! ```json
//! { "block_rows": 3, "hard_speed": 10.0 }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;
use crate::settings::Difficulty;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // Arena
    pub arena_width: f32,
    pub arena_height: f32,

    // Block grid
    pub block_rows: usize,
    pub block_cols: usize,
    pub block_width: f32,
    pub block_height: f32,
    pub block_spacing: f32,

    // Guard
    pub guard_width: f32,
    pub guard_height: f32,
    pub guard_step: f32,

    // Ball
    pub ball_radius: f32,
    pub easy_speed: f32,
    pub normal_speed: f32,
    pub hard_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            block_rows: BLOCK_ROWS,
            block_cols: BLOCK_COLS,
            block_width: BLOCK_WIDTH,
            block_height: BLOCK_HEIGHT,
            block_spacing: BLOCK_SPACING,
            guard_width: GUARD_WIDTH,
            guard_height: GUARD_HEIGHT,
            guard_step: GUARD_STEP,
            ball_radius: BALL_RADIUS,
            easy_speed: Difficulty::Easy.default_axis_speed(),
            normal_speed: Difficulty::Normal.default_axis_speed(),
            hard_speed: Difficulty::Hard.default_axis_speed(),
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read, parse and validate a JSON tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Check that the layout is playable
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("block_width", self.block_width),
            ("block_height", self.block_height),
            ("guard_width", self.guard_width),
            ("guard_height", self.guard_height),
            ("guard_step", self.guard_step),
            ("ball_radius", self.ball_radius),
            ("easy_speed", self.easy_speed),
            ("normal_speed", self.normal_speed),
            ("hard_speed", self.hard_speed),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::InvalidValue { field, value });
            }
        }
        if !(self.block_spacing.is_finite() && self.block_spacing >= 0.0) {
            return Err(TuningError::InvalidValue {
                field: "block_spacing",
                value: self.block_spacing,
            });
        }

        if self.block_rows == 0 || self.block_cols == 0 {
            return Err(TuningError::EmptyGrid);
        }

        let needed = self.row_width();
        if needed > self.arena_width {
            return Err(TuningError::GridTooWide {
                needed,
                available: self.arena_width,
            });
        }

        if self.guard_width > self.arena_width {
            return Err(TuningError::InvalidValue {
                field: "guard_width",
                value: self.guard_width,
            });
        }

        let grid_bottom = self.block_row_y(self.block_rows - 1) + self.block_height;
        let guard_top = self.arena_height - self.guard_height;
        if grid_bottom >= guard_top {
            return Err(TuningError::GridOverlapsGuard {
                grid_bottom,
                guard_top,
            });
        }

        Ok(())
    }

    /// Per-axis launch speed for a difficulty
    pub fn axis_speed(&self, difficulty: Difficulty) -> f32 {
        match difficulty {
            Difficulty::Easy => self.easy_speed,
            Difficulty::Normal => self.normal_speed,
            Difficulty::Hard => self.hard_speed,
        }
    }

    /// Width of one full row of blocks including the gaps between them
    pub fn row_width(&self) -> f32 {
        let cols = self.block_cols as f32;
        self.block_width * cols + self.block_spacing * (cols - 1.0).max(0.0)
    }

    /// Left edge of the first column, centring the grid horizontally
    pub fn block_origin_x(&self) -> f32 {
        (self.arena_width - self.row_width()) / 2.0
    }

    /// Top edge of a block row
    pub fn block_row_y(&self, row: usize) -> f32 {
        self.block_spacing + row as f32 * (self.block_height + self.block_spacing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.block_origin_x(), 25.0);
        assert_eq!(tuning.axis_speed(Difficulty::Normal), 8.0);
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "block_rows": 3, "hard_speed": 10.0 }"#).unwrap();
        assert_eq!(tuning.block_rows, 3);
        assert_eq!(tuning.hard_speed, 10.0);
        assert_eq!(tuning.block_cols, BLOCK_COLS);
        assert_eq!(tuning.arena_width, ARENA_WIDTH);
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_rejects_non_positive_speed() {
        let err = Tuning::from_json(r#"{ "easy_speed": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::InvalidValue {
                field: "easy_speed",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_grid_wider_than_arena() {
        let err = Tuning::from_json(r#"{ "block_cols": 8 }"#).unwrap_err();
        assert!(matches!(err, TuningError::GridTooWide { .. }));
        assert!(err.to_string().contains("640"));
    }

    #[test]
    fn test_rejects_grid_reaching_guard() {
        let err = Tuning::from_json(r#"{ "block_rows": 11 }"#).unwrap_err();
        assert!(matches!(err, TuningError::GridOverlapsGuard { .. }));
    }

    #[test]
    fn test_rejects_empty_grid() {
        let err = Tuning::from_json(r#"{ "block_cols": 0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::EmptyGrid));
    }

    #[test]
    fn test_load_reports_missing_file() {
        let err = Tuning::load("/nonexistent/block-breaker/tuning.json").unwrap_err();
        assert!(matches!(err, TuningError::Io { .. }));
    }
}
