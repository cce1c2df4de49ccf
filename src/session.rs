//! Session controller
//!
//! Owns the world, the held intents and the difficulty selection, and runs
//! one simulation step per scheduled frame. Rendering, outcome presentation
//! and frame scheduling are collaborators passed in by the host, so the
//! whole lifecycle can be driven by hand with [`ManualScheduler`].
//!
//! Lifecycle:
//! 1. [`Session::start`] requests the first loop frame.
//! 2. Each loop frame accepts a pending launch, steps, renders and requests
//!    the next loop frame.
//! 3. The frame that produces an outcome additionally requests a one-shot
//!    outcome frame (queued ahead of the next loop frame).
//! 4. The outcome frame notifies exactly once, cancels the pending loop
//!    frame and halts the session for good.

use std::collections::VecDeque;

use glam::Vec2;
use serde::Serialize;

use crate::settings::{Difficulty, LOSS_MESSAGE};
use crate::sim::{GamePhase, Intents, Outcome, Scene, World, step};
use crate::storage::{KeyValueStore, load_difficulty, save_difficulty};
use crate::tuning::Tuning;

/// Opaque handle for a requested frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Steady frame clock, typically display-refresh synchronised
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

pub trait RenderTarget {
    fn render(&mut self, scene: &Scene);
}

/// Presents the terminal outcome to the player
pub trait OutcomeNotifier {
    fn notify(&mut self, event: &OutcomeEvent);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OutcomeEvent {
    pub outcome: Outcome,
    /// Difficulty the ball was launched at
    pub difficulty: Difficulty,
}

impl OutcomeEvent {
    pub fn message(&self) -> &'static str {
        match self.outcome {
            Outcome::Won => self.difficulty.win_message(),
            Outcome::Lost => LOSS_MESSAGE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Launch,
}

/// Raw input delivered by the host, asynchronously to the frame loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    DifficultyChanged(Difficulty),
}

/// FIFO scheduler drained by hand (headless hosts and tests)
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    queue: VecDeque<FrameHandle>,
    cancelled: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop the next due frame, in request order
    pub fn next_due(&mut self) -> Option<FrameHandle> {
        self.queue.pop_front()
    }

    /// Frames requested and not yet fired or cancelled
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Number of successful cancellations so far
    pub fn cancelled(&self) -> usize {
        self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.queue.push_back(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let before = self.queue.len();
        self.queue.retain(|h| *h != handle);
        if self.queue.len() < before {
            self.cancelled += 1;
        }
    }
}

/// One play-through, from idle to a single terminal outcome
pub struct Session<S: KeyValueStore> {
    tuning: Tuning,
    store: S,
    difficulty: Difficulty,
    world: World,
    intents: Intents,
    launch_requested: bool,
    launched_with: Option<Difficulty>,
    loop_frame: Option<FrameHandle>,
    outcome_frame: Option<(FrameHandle, Outcome)>,
    halted: bool,
}

impl<S: KeyValueStore> Session<S> {
    /// Create a session, reading the persisted difficulty once
    pub fn new(tuning: Tuning, store: S) -> Self {
        let difficulty = load_difficulty(&store);
        let world = World::new(&tuning);
        log::info!(
            "New session: {} blocks, difficulty {}",
            world.remaining(),
            difficulty.as_str()
        );
        Self {
            tuning,
            store,
            difficulty,
            world,
            intents: Intents::default(),
            launch_requested: false,
            launched_with: None,
            loop_frame: None,
            outcome_frame: None,
            halted: false,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn intents(&self) -> Intents {
        self.intents
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// True once the outcome has been delivered
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Request the first loop frame
    pub fn start(&mut self, scheduler: &mut impl FrameScheduler) {
        if self.halted || self.loop_frame.is_some() || self.outcome_frame.is_some() {
            return;
        }
        self.loop_frame = Some(scheduler.request_frame());
        log::info!("Frame loop started");
    }

    /// Apply an input event; only intents and the selection change here
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown(Key::Left) => self.intents.left = true,
            InputEvent::KeyDown(Key::Right) => self.intents.right = true,
            InputEvent::KeyUp(Key::Left) => self.intents.left = false,
            InputEvent::KeyUp(Key::Right) => self.intents.right = false,
            InputEvent::KeyDown(Key::Launch) => {
                if self.world.phase == GamePhase::Idle {
                    self.launch_requested = true;
                } else {
                    log::trace!("launch ignored in phase {:?}", self.world.phase);
                }
            }
            InputEvent::KeyUp(Key::Launch) => {}
            InputEvent::DifficultyChanged(difficulty) => {
                log::debug!("Difficulty set to {}", difficulty.as_str());
                self.difficulty = difficulty;
                save_difficulty(&mut self.store, difficulty);
            }
        }
    }

    /// Frame callback from the scheduler
    pub fn on_frame(
        &mut self,
        handle: FrameHandle,
        scheduler: &mut impl FrameScheduler,
        render: &mut impl RenderTarget,
        notifier: &mut impl OutcomeNotifier,
    ) {
        if self.halted {
            return;
        }

        if let Some((outcome_handle, outcome)) = self.outcome_frame {
            if outcome_handle == handle {
                self.deliver(outcome, scheduler, notifier);
                return;
            }
        }

        if self.loop_frame != Some(handle) {
            log::trace!("ignoring stale frame {:?}", handle);
            return;
        }
        self.loop_frame = None;

        self.accept_launch();
        let outcome = step(&mut self.world, &self.intents);
        render.render(&self.world.snapshot());

        if let Some(outcome) = outcome {
            log::info!(
                "Session over: {:?} with {} blocks left",
                outcome,
                self.world.remaining()
            );
            self.outcome_frame = Some((scheduler.request_frame(), outcome));
        }
        self.loop_frame = Some(scheduler.request_frame());
    }

    fn accept_launch(&mut self) {
        if !std::mem::take(&mut self.launch_requested) {
            return;
        }
        let axis = self.tuning.axis_speed(self.difficulty);
        if self.world.launch(Vec2::new(axis, -axis)) {
            self.launched_with = Some(self.difficulty);
            log::info!(
                "Ball launched on {} ({} px/frame per axis)",
                self.difficulty.as_str(),
                axis
            );
        }
    }

    fn deliver(
        &mut self,
        outcome: Outcome,
        scheduler: &mut impl FrameScheduler,
        notifier: &mut impl OutcomeNotifier,
    ) {
        self.outcome_frame = None;
        let event = OutcomeEvent {
            outcome,
            difficulty: self.launched_with.unwrap_or(self.difficulty),
        };
        notifier.notify(&event);

        if let Some(handle) = self.loop_frame.take() {
            scheduler.cancel_frame(handle);
        }
        self.halted = true;
        log::info!("Frame loop halted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::DIFFICULTY_KEY;
    use crate::storage::MemoryStore;

    #[derive(Default)]
    struct Frames {
        scenes: Vec<Scene>,
    }

    impl RenderTarget for Frames {
        fn render(&mut self, scene: &Scene) {
            self.scenes.push(scene.clone());
        }
    }

    #[derive(Default)]
    struct Alerts {
        events: Vec<OutcomeEvent>,
    }

    impl OutcomeNotifier for Alerts {
        fn notify(&mut self, event: &OutcomeEvent) {
            self.events.push(*event);
        }
    }

    struct Host {
        session: Session<MemoryStore>,
        scheduler: ManualScheduler,
        frames: Frames,
        alerts: Alerts,
    }

    impl Host {
        fn new(store: MemoryStore) -> Self {
            let mut host = Self {
                session: Session::new(Tuning::default(), store),
                scheduler: ManualScheduler::new(),
                frames: Frames::default(),
                alerts: Alerts::default(),
            };
            host.session.start(&mut host.scheduler);
            host
        }

        /// Fire the next due frame; false when nothing is scheduled
        fn tick(&mut self) -> bool {
            let Some(handle) = self.scheduler.next_due() else {
                return false;
            };
            self.session.on_frame(
                handle,
                &mut self.scheduler,
                &mut self.frames,
                &mut self.alerts,
            );
            true
        }

        fn run(&mut self, max_frames: usize) -> usize {
            let mut fired = 0;
            while fired < max_frames && self.tick() {
                fired += 1;
            }
            fired
        }
    }

    fn store_with(value: &str) -> MemoryStore {
        let mut store = MemoryStore::new();
        store.set(DIFFICULTY_KEY, value);
        store
    }

    #[test]
    fn test_start_requests_one_frame() {
        let mut host = Host::new(MemoryStore::new());
        assert_eq!(host.scheduler.pending(), 1);

        host.session.start(&mut host.scheduler);
        assert_eq!(host.scheduler.pending(), 1);
    }

    #[test]
    fn test_loop_reschedules_and_renders() {
        let mut host = Host::new(MemoryStore::new());
        assert_eq!(host.run(10), 10);
        assert_eq!(host.frames.scenes.len(), 10);
        assert_eq!(host.scheduler.pending(), 1);
        assert_eq!(host.session.world().phase, GamePhase::Idle);
    }

    #[test]
    fn test_idle_ball_follows_held_keys() {
        let mut host = Host::new(MemoryStore::new());
        host.session.handle_input(InputEvent::KeyDown(Key::Left));
        host.run(5);
        host.session.handle_input(InputEvent::KeyUp(Key::Left));
        host.run(5);

        let scene = host.frames.scenes.last().unwrap();
        assert_eq!(scene.paddle.x, 270.0 - 5.0 * 8.0);
        assert_eq!(scene.ball.x, scene.paddle.x + scene.paddle.w / 2.0);
    }

    #[test]
    fn test_key_events_update_held_intents() {
        let mut host = Host::new(MemoryStore::new());
        host.session.handle_input(InputEvent::KeyDown(Key::Left));
        host.session.handle_input(InputEvent::KeyDown(Key::Right));
        assert_eq!(
            host.session.intents(),
            Intents {
                left: true,
                right: true
            }
        );

        host.session.handle_input(InputEvent::KeyUp(Key::Left));
        // Launch is a press, never a held direction
        host.session.handle_input(InputEvent::KeyDown(Key::Launch));
        assert_eq!(
            host.session.intents(),
            Intents {
                left: false,
                right: true
            }
        );
    }

    #[test]
    fn test_autopilot_launch_goes_through_input() {
        let mut host = Host::new(store_with("normal"));
        let command = crate::sim::autopilot(host.session.world());
        assert!(command.launch);

        host.session.handle_input(InputEvent::KeyDown(Key::Launch));
        host.tick();
        assert_eq!(host.session.world().phase, GamePhase::Running);
        assert_eq!(host.session.world().ball.vel, Vec2::new(8.0, -8.0));
        assert!(!crate::sim::autopilot(host.session.world()).launch);
    }

    #[test]
    fn test_difficulty_read_from_store() {
        assert_eq!(Host::new(store_with("hard")).session.difficulty(), Difficulty::Hard);
        assert_eq!(Host::new(store_with("bogus")).session.difficulty(), Difficulty::Easy);
        assert_eq!(Host::new(MemoryStore::new()).session.difficulty(), Difficulty::Easy);
    }

    #[test]
    fn test_difficulty_change_is_persisted() {
        let mut host = Host::new(MemoryStore::new());
        host.session
            .handle_input(InputEvent::DifficultyChanged(Difficulty::Normal));
        assert_eq!(host.session.difficulty(), Difficulty::Normal);
        assert_eq!(
            host.session.store().get(DIFFICULTY_KEY).as_deref(),
            Some("normal")
        );
    }

    #[test]
    fn test_speed_taken_at_launch() {
        let mut host = Host::new(MemoryStore::new());
        host.run(3);
        // Changing before launch counts
        host.session
            .handle_input(InputEvent::DifficultyChanged(Difficulty::Hard));
        host.session.handle_input(InputEvent::KeyDown(Key::Launch));
        host.tick();

        assert_eq!(host.session.world().phase, GamePhase::Running);
        assert_eq!(host.session.world().ball.vel, Vec2::new(9.0, -9.0));

        // Changing after launch does not
        host.session
            .handle_input(InputEvent::DifficultyChanged(Difficulty::Easy));
        host.tick();
        assert_eq!(host.session.world().ball.vel.x.abs(), 9.0);
    }

    #[test]
    fn test_second_launch_is_a_no_op() {
        let mut host = Host::new(MemoryStore::new());
        host.session.handle_input(InputEvent::KeyDown(Key::Launch));
        host.tick();
        let vel = host.session.world().ball.vel;
        assert_eq!(vel, Vec2::new(6.0, -6.0));

        host.session
            .handle_input(InputEvent::DifficultyChanged(Difficulty::Hard));
        host.session.handle_input(InputEvent::KeyDown(Key::Launch));
        let before = host.session.world().ball.pos;
        host.tick();

        // Moved by the first launch velocity, not relaunched
        assert_eq!(host.session.world().ball.vel, vel);
        assert_eq!(host.session.world().ball.pos, before + vel);
    }

    #[test]
    fn test_loss_notifies_once_then_halts() {
        let mut host = Host::new(MemoryStore::new());
        host.session.handle_input(InputEvent::KeyDown(Key::Launch));
        host.tick();
        host.session.world.ball.pos = Vec2::new(100.0, 470.0);
        host.session.world.ball.vel = Vec2::new(6.0, 6.0);

        host.tick();
        assert_eq!(
            host.session.world().phase,
            GamePhase::Terminal(Outcome::Lost)
        );
        assert_eq!(host.session.world().ball.pos.y, 468.0);
        // Outcome frame queued ahead of the next loop frame
        assert_eq!(host.scheduler.pending(), 2);
        assert!(host.alerts.events.is_empty());

        host.tick();
        assert_eq!(
            host.alerts.events,
            vec![OutcomeEvent {
                outcome: Outcome::Lost,
                difficulty: Difficulty::Easy,
            }]
        );
        assert_eq!(host.alerts.events[0].message(), "game over");
        assert_eq!(host.scheduler.cancelled(), 1);
        assert_eq!(host.scheduler.pending(), 0);
        assert!(host.session.is_halted());

        // Nothing left to run, and restarting is refused
        assert_eq!(host.run(10), 0);
        host.session.start(&mut host.scheduler);
        assert_eq!(host.scheduler.pending(), 0);
        assert_eq!(host.alerts.events.len(), 1);
    }

    #[test]
    fn test_last_block_wins_once() {
        let mut host = Host::new(store_with("normal"));
        host.session.handle_input(InputEvent::KeyDown(Key::Launch));
        host.tick();

        let world = &mut host.session.world;
        for index in 1..world.blocks().len() {
            world.destroy_block(index);
        }
        // Just below block (0, 0), rising into it
        world.ball.pos = Vec2::new(60.0, 52.0);
        world.ball.vel = Vec2::new(8.0, -8.0);

        host.tick();
        assert_eq!(host.session.world().phase, GamePhase::Terminal(Outcome::Won));
        let frozen = host.session.world().ball.pos;
        let rendered = host.frames.scenes.len();

        host.session.handle_input(InputEvent::KeyDown(Key::Right));
        assert_eq!(host.run(100), 1);

        assert_eq!(host.alerts.events.len(), 1);
        let event = host.alerts.events[0];
        assert_eq!(event.outcome, Outcome::Won);
        assert_eq!(event.difficulty, Difficulty::Normal);
        assert_eq!(event.message(), "wow, you passed the normal, congratulation!");

        // No further steps or renders after the outcome
        assert_eq!(host.session.world().ball.pos, frozen);
        assert_eq!(host.frames.scenes.len(), rendered);
    }

    #[test]
    fn test_stale_frame_is_ignored() {
        let mut host = Host::new(MemoryStore::new());
        host.session.on_frame(
            FrameHandle(999),
            &mut host.scheduler,
            &mut host.frames,
            &mut host.alerts,
        );
        assert!(host.frames.scenes.is_empty());
        assert_eq!(host.scheduler.pending(), 1);
    }
}
