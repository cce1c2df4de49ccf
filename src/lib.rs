//! Block Breaker - a single-screen ball and paddle arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (collision resolver, entity state, frame step)
//! - `session`: Frame-loop controller and collaborator interfaces
//! - `settings`: Difficulty presets
//! - `storage`: Persisted key/value store (file on native, LocalStorage on web)
//! - `tuning`: Data-driven arena, grid and speed configuration

pub mod error;
pub mod session;
pub mod settings;
pub mod sim;
pub mod storage;
pub mod tuning;

pub use error::TuningError;
pub use session::{
    FrameHandle, FrameScheduler, InputEvent, Key, ManualScheduler, OutcomeEvent,
    OutcomeNotifier, RenderTarget, Session,
};
pub use settings::Difficulty;
pub use tuning::Tuning;

/// Game configuration constants
///
/// All distances are in arena pixels, all speeds in pixels per frame.
pub mod consts {
    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 640.0;
    pub const ARENA_HEIGHT: f32 = 480.0;

    /// Block grid layout
    pub const BLOCK_WIDTH: f32 = 80.0;
    pub const BLOCK_HEIGHT: f32 = 22.0;
    pub const BLOCK_ROWS: usize = 5;
    pub const BLOCK_COLS: usize = 6;
    /// Gap between blocks, and between the top row and the arena ceiling
    pub const BLOCK_SPACING: f32 = 22.0;

    /// Guard (paddle) defaults - sits flush with the arena floor
    pub const GUARD_WIDTH: f32 = 100.0;
    pub const GUARD_HEIGHT: f32 = 10.0;
    pub const GUARD_STEP: f32 = 8.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 12.0;
    /// Per-axis launch speed for each difficulty
    pub const EASY_AXIS_SPEED: f32 = 6.0;
    pub const NORMAL_AXIS_SPEED: f32 = 8.0;
    pub const HARD_AXIS_SPEED: f32 = 9.0;

    /// Nominal frame rate of the presentation loop (native runner pacing)
    pub const FRAME_RATE_HZ: u32 = 60;
}
