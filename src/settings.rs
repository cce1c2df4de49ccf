//! Difficulty presets
//!
//! The selected difficulty is persisted under [`DIFFICULTY_KEY`] and only
//! takes effect at the moment the ball is launched.

use serde::{Deserialize, Serialize};

use crate::consts::{EASY_AXIS_SPEED, HARD_AXIS_SPEED, NORMAL_AXIS_SPEED};

/// Storage key for the selected difficulty
pub const DIFFICULTY_KEY: &str = "game-level";

/// Ball speed preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Built-in per-axis launch speed (pixels per frame)
    pub fn default_axis_speed(&self) -> f32 {
        match self {
            Difficulty::Easy => EASY_AXIS_SPEED,
            Difficulty::Normal => NORMAL_AXIS_SPEED,
            Difficulty::Hard => HARD_AXIS_SPEED,
        }
    }

    /// Message shown after clearing every block at this difficulty
    pub fn win_message(&self) -> &'static str {
        match self {
            Difficulty::Easy => "you win! maybe you can try normal next.",
            Difficulty::Normal => "wow, you passed the normal, congratulation!",
            Difficulty::Hard => "unbelievable! you passed the hard! amazing!",
        }
    }
}

/// Message shown when the ball reaches the floor
pub const LOSS_MESSAGE: &str = "game over";
