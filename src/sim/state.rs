//! Game state and core simulation types
//!
//! The `World` owns every mutable entity of one session. It is passed by
//! reference into the frame step; nothing here touches storage or rendering.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::tuning::Tuning;

/// Terminal result of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Every block destroyed
    Won,
    /// Ball reached the floor
    Lost,
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball rides the guard, waiting for launch input
    Idle,
    /// Active gameplay
    Running,
    /// Session over; absorbing, no further steps mutate the world
    Terminal(Outcome),
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    /// Centre position
    pub pos: Vec2,
    /// Pixels per frame; only the signs change between launches
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn new(radius: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius,
        }
    }

    /// Pin the ball horizontally to the guard centre
    pub fn ride(&mut self, guard: &Guard) {
        self.pos.x = guard.center_x();
    }
}

/// The player's guard (paddle)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guard {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Distance moved per frame while a direction is held
    pub step: f32,
}

impl Guard {
    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    /// Move one step according to the held directions, then clamp
    ///
    /// Left wins when both are held.
    pub fn advance(&mut self, left: bool, right: bool, arena_width: f32) {
        if left && self.x > 0.0 {
            self.x -= self.step;
        } else if right && self.x + self.w < arena_width {
            self.x += self.step;
        }
        self.clamp(arena_width);
    }

    /// Keep the guard inside `[0, arena_width - w]`
    pub fn clamp(&mut self, arena_width: f32) {
        debug_assert!(self.w <= arena_width, "guard wider than arena");
        let max_x = (arena_width - self.w).max(0.0);
        self.x = self.x.clamp(0.0, max_x);
    }
}

/// A destructible block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub row: usize,
    pub col: usize,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub active: bool,
}

impl Block {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

/// Ball as seen by a render target
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BallView {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

/// Rectangle as seen by a render target
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RectView {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlockView {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub active: bool,
}

/// Renderable snapshot of the world, produced once per frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub ball: BallView,
    pub paddle: RectView,
    /// Every block in row-major order, inactive ones flagged
    pub blocks: Vec<BlockView>,
}

/// Complete simulation state of one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub arena_width: f32,
    pub arena_height: f32,
    pub phase: GamePhase,
    pub ball: Ball,
    pub guard: Guard,
    /// Row-major; private so a destroyed block can never come back
    blocks: Vec<Block>,
    /// Active block count, kept in step with `blocks`
    remaining: usize,
}

impl World {
    /// Build the initial layout: centred guard on the floor, ball resting on
    /// it, block grid horizontally centred below the ceiling
    pub fn new(tuning: &Tuning) -> Self {
        let guard = Guard {
            x: (tuning.arena_width - tuning.guard_width) / 2.0,
            y: tuning.arena_height - tuning.guard_height,
            w: tuning.guard_width,
            h: tuning.guard_height,
            step: tuning.guard_step,
        };

        let mut ball = Ball::new(tuning.ball_radius);
        ball.ride(&guard);
        ball.pos.y = guard.y - ball.radius;

        let origin_x = tuning.block_origin_x();
        let mut blocks = Vec::with_capacity(tuning.block_rows * tuning.block_cols);
        for row in 0..tuning.block_rows {
            let y = tuning.block_row_y(row);
            for col in 0..tuning.block_cols {
                blocks.push(Block {
                    row,
                    col,
                    x: origin_x + col as f32 * (tuning.block_width + tuning.block_spacing),
                    y,
                    w: tuning.block_width,
                    h: tuning.block_height,
                    active: true,
                });
            }
        }

        let remaining = blocks.len();
        Self {
            arena_width: tuning.arena_width,
            arena_height: tuning.arena_height,
            phase: GamePhase::Idle,
            ball,
            guard,
            blocks,
            remaining,
        }
    }

    /// All blocks in row-major order
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of blocks still standing
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Start the ball moving; only accepted while idle
    pub fn launch(&mut self, vel: Vec2) -> bool {
        if self.phase != GamePhase::Idle {
            return false;
        }
        self.ball.vel = vel;
        self.phase = GamePhase::Running;
        true
    }

    /// Deactivate the block at `index` and return the new remaining count
    ///
    /// Returns `None` if the block is already gone (or does not exist).
    pub fn destroy_block(&mut self, index: usize) -> Option<usize> {
        let block = self.blocks.get_mut(index).filter(|b| b.active)?;
        block.active = false;

        debug_assert!(self.remaining > 0, "remaining block count underflow");
        self.remaining = self.remaining.saturating_sub(1);
        Some(self.remaining)
    }

    /// Snapshot for the render target
    pub fn snapshot(&self) -> Scene {
        Scene {
            ball: BallView {
                x: self.ball.pos.x,
                y: self.ball.pos.y,
                radius: self.ball.radius,
            },
            paddle: RectView {
                x: self.guard.x,
                y: self.guard.y,
                w: self.guard.w,
                h: self.guard.h,
            },
            blocks: self
                .blocks
                .iter()
                .map(|b| BlockView {
                    x: b.x,
                    y: b.y,
                    w: b.w,
                    h: b.h,
                    active: b.active,
                })
                .collect(),
        }
    }
}
