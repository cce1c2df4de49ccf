//! Fixed-step frame simulation
//!
//! One call to [`step`] advances the world by exactly one frame. The check
//! order is fixed: guard movement, arena edges, guard bounce, blocks, then
//! position integration. Each check reads the velocity left by the previous
//! one, so a bounce takes effect in the same frame it is detected.

use super::collision::{Face, ball_rect_faces};
use super::state::{GamePhase, Outcome, World};

/// Held-direction intents for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Intents {
    pub left: bool,
    pub right: bool,
}

/// Advance the world by one frame
///
/// Returns the terminal outcome on the frame it happens; `None` otherwise,
/// including every call after the world has become terminal.
pub fn step(world: &mut World, intents: &Intents) -> Option<Outcome> {
    match world.phase {
        GamePhase::Terminal(_) => None,
        GamePhase::Idle => {
            world
                .guard
                .advance(intents.left, intents.right, world.arena_width);
            world.ball.ride(&world.guard);
            None
        }
        GamePhase::Running => {
            world
                .guard
                .advance(intents.left, intents.right, world.arena_width);
            let outcome = run_frame(world);
            if let Some(outcome) = outcome {
                world.phase = GamePhase::Terminal(outcome);
            }
            outcome
        }
    }
}

fn run_frame(world: &mut World) -> Option<Outcome> {
    if arena_collision(world) {
        log::trace!("ball reached the floor at x={:.1}", world.ball.pos.x);
        return Some(Outcome::Lost);
    }

    guard_collision(world);
    let cleared = block_collision(world);

    world.ball.pos += world.ball.vel;

    cleared.then_some(Outcome::Won)
}

/// Bounce off ceiling and side walls; returns true when the ball hit the floor
fn arena_collision(world: &mut World) -> bool {
    let ball = &mut world.ball;

    if ball.pos.y - ball.radius < 0.0 {
        ball.vel.y = -ball.vel.y;
    }

    if ball.pos.y + ball.radius > world.arena_height {
        ball.pos.y = world.arena_height - ball.radius;
        return true;
    }

    if ball.pos.x + ball.radius > world.arena_width || ball.pos.x - ball.radius < 0.0 {
        ball.vel.x = -ball.vel.x;
    }

    false
}

/// Only the guard's top face is modelled; side grazes pass through
fn guard_collision(world: &mut World) {
    let ball = &mut world.ball;
    let faces = ball_rect_faces(ball.pos, ball.vel, ball.radius, &world.guard.rect());
    if faces.contains(Face::Top) {
        ball.vel.y = -ball.vel.y;
    }
}

/// Resolve at most one block per frame, first in row-major order.
/// Returns true when that block was the last one standing.
fn block_collision(world: &mut World) -> bool {
    let ball = &world.ball;
    let hit = world
        .blocks()
        .iter()
        .enumerate()
        .filter(|(_, block)| block.active)
        .find_map(|(index, block)| {
            let faces = ball_rect_faces(ball.pos, ball.vel, ball.radius, &block.rect());
            (!faces.is_empty()).then_some((index, faces))
        });

    let Some((index, faces)) = hit else {
        return false;
    };

    if faces.hits_horizontal() {
        world.ball.vel.x = -world.ball.vel.x;
    }
    if faces.hits_vertical() {
        world.ball.vel.y = -world.ball.vel.y;
    }

    match world.destroy_block(index) {
        Some(remaining) => {
            let block = &world.blocks()[index];
            log::debug!(
                "block ({}, {}) destroyed via {:?}, {} remaining",
                block.row,
                block.col,
                faces,
                remaining
            );
            remaining == 0
        }
        None => false,
    }
}
