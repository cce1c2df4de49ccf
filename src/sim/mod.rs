//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per frame, speeds in pixels per frame
//! - Stable iteration order (blocks row-major)
//! - No rendering, storage or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod state;
pub mod tick;

pub use autopilot::{Command, autopilot};
pub use collision::{Face, FaceSet, Rect, ball_rect_faces};
pub use state::{
    Ball, BallView, Block, BlockView, GamePhase, Guard, Outcome, RectView, Scene, World,
};
pub use tick::{Intents, step};
