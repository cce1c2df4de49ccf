//! Demo mode: steer the guard without a player
//!
//! Pure function of the world; produces held keys and a launch press exactly
//! like a keyboard would, so it goes through the same input path as a human.

use super::state::{GamePhase, World};
use super::tick::Intents;

/// Where the ball will cross the guard's top edge, folding in side-wall
/// bounces. While the ball rises the guard just shadows it.
pub fn predict_landing_x(world: &World) -> f32 {
    let ball = &world.ball;
    if ball.vel.y <= 0.0 {
        return ball.pos.x;
    }

    let frames = ((world.guard.y - ball.radius - ball.pos.y) / ball.vel.y).max(0.0);
    let raw = ball.pos.x + ball.vel.x * frames;

    let span = world.arena_width - 2.0 * ball.radius;
    if span <= 0.0 {
        return world.arena_width / 2.0;
    }
    let t = (raw - ball.radius).rem_euclid(2.0 * span);
    ball.radius + if t > span { 2.0 * span - t } else { t }
}

/// What the autopilot wants pressed this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Command {
    /// Directions to hold
    pub intents: Intents,
    /// Press launch; only ever set while the ball is waiting on the guard
    pub launch: bool,
}

/// Launch while idle, then keep the guard centred under the predicted
/// landing point
pub fn autopilot(world: &World) -> Command {
    match world.phase {
        GamePhase::Idle => Command {
            intents: Intents::default(),
            launch: true,
        },
        GamePhase::Running => {
            let target = predict_landing_x(world);
            let center = world.guard.center_x();
            let dead_zone = world.guard.step / 2.0;

            Command {
                intents: Intents {
                    left: center > target + dead_zone,
                    right: center < target - dead_zone,
                },
                launch: false,
            }
        }
        GamePhase::Terminal(_) => Command::default(),
    }
}
