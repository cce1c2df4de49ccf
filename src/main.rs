//! Block Breaker entry point
//!
//! The native binary is a headless runner: the autopilot plays one session
//! through the same input path a keyboard would use, scenes are logged at
//! debug level and the outcome message is printed. In the browser the
//! library is driven by the page's own adapter instead.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;
    use std::time::Duration;

    use anyhow::{Context, Result};
    use block_breaker::consts::FRAME_RATE_HZ;
    use block_breaker::sim::{Scene, autopilot};
    use block_breaker::storage::{JsonFileStore, KeyValueStore};
    use block_breaker::{
        Difficulty, InputEvent, Key, ManualScheduler, OutcomeEvent, OutcomeNotifier,
        RenderTarget, Session, Tuning,
    };
    use clap::Parser;

    /// Default cap so a ball stuck in a block-free loop still terminates
    const DEFAULT_MAX_FRAMES: u64 = 60 * 60 * 10;

    #[derive(Parser, Debug)]
    #[command(name = "block-breaker")]
    #[command(about = "Block Breaker headless runner - the autopilot plays one session")]
    pub struct Args {
        /// Difficulty to select (and persist) before launch
        #[arg(value_parser = parse_difficulty)]
        pub difficulty: Option<Difficulty>,

        /// Tuning JSON overriding the built-in layout and speeds
        #[arg(long, value_name = "FILE")]
        pub tuning: Option<PathBuf>,

        /// Settings file holding the persisted difficulty
        #[arg(long, value_name = "FILE", default_value = "block-breaker-settings.json")]
        pub settings: PathBuf,

        /// Give up after this many frames without an outcome
        #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_FRAMES)]
        pub max_frames: u64,

        /// Sleep one frame period between frames
        #[arg(long)]
        pub realtime: bool,
    }

    fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
        Difficulty::parse(s).ok_or_else(|| {
            let names: Vec<_> = Difficulty::ALL.iter().map(|d| d.as_str()).collect();
            format!("expected one of {}", names.join(", "))
        })
    }

    /// Logs every Nth scene as JSON
    struct SceneLog {
        frame: u64,
        every: u64,
    }

    impl RenderTarget for SceneLog {
        fn render(&mut self, scene: &Scene) {
            self.frame += 1;
            if self.frame % self.every != 0 || !log::log_enabled!(log::Level::Debug) {
                return;
            }
            match serde_json::to_string(scene) {
                Ok(json) => log::debug!("frame {}: {}", self.frame, json),
                Err(e) => log::warn!("failed to encode scene: {}", e),
            }
        }
    }

    #[derive(Default)]
    struct Console {
        event: Option<OutcomeEvent>,
    }

    impl OutcomeNotifier for Console {
        fn notify(&mut self, event: &OutcomeEvent) {
            println!("{}", event.message());
            self.event = Some(*event);
        }
    }

    /// Turn a held-state change into the matching key event
    fn press<S: KeyValueStore>(
        session: &mut Session<S>,
        key: Key,
        was: bool,
        now: bool,
    ) {
        if was != now {
            session.handle_input(if now {
                InputEvent::KeyDown(key)
            } else {
                InputEvent::KeyUp(key)
            });
        }
    }

    pub fn run(args: Args) -> Result<()> {
        let tuning = match &args.tuning {
            Some(path) => Tuning::load(path)
                .with_context(|| format!("Failed to load tuning from {}", path.display()))?,
            None => Tuning::default(),
        };
        let store = JsonFileStore::open(&args.settings);
        log::debug!("Settings file: {}", store.path().display());

        let mut session = Session::new(tuning, store);
        if let Some(difficulty) = args.difficulty {
            session.handle_input(InputEvent::DifficultyChanged(difficulty));
        }

        let mut scheduler = ManualScheduler::new();
        let mut scenes = SceneLog {
            frame: 0,
            every: u64::from(FRAME_RATE_HZ),
        };
        let mut console = Console::default();
        let frame_time = Duration::from_secs_f64(1.0 / f64::from(FRAME_RATE_HZ));

        session.start(&mut scheduler);

        let mut frames = 0u64;
        while let Some(handle) = scheduler.next_due() {
            if frames >= args.max_frames {
                log::warn!("Stopping after {} frames without an outcome", frames);
                break;
            }

            let command = autopilot(session.world());
            let held = session.intents();
            press(&mut session, Key::Left, held.left, command.intents.left);
            press(&mut session, Key::Right, held.right, command.intents.right);
            if command.launch {
                session.handle_input(InputEvent::KeyDown(Key::Launch));
                session.handle_input(InputEvent::KeyUp(Key::Launch));
            }

            session.on_frame(handle, &mut scheduler, &mut scenes, &mut console);
            frames += 1;

            if args.realtime {
                std::thread::sleep(frame_time);
            }
        }

        match console.event {
            Some(event) => log::info!(
                "{:?} on {} after {} frames, {} blocks left",
                event.outcome,
                event.difficulty.as_str(),
                frames,
                session.world().remaining()
            ),
            None => println!("no outcome after {} frames", frames),
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    let args = headless::Args::parse();
    env_logger::init();
    log::info!("Block Breaker (headless) starting...");

    headless::run(args)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser adapter drives the library directly
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::headless::Args;
    use block_breaker::Difficulty;
    use clap::Parser;

    #[test]
    fn test_defaults_without_arguments() {
        let args = Args::try_parse_from(["block-breaker"]).unwrap();
        assert_eq!(args.difficulty, None);
        assert_eq!(args.tuning, None);
        assert_eq!(args.settings.to_str(), Some("block-breaker-settings.json"));
        assert_eq!(args.max_frames, 36_000);
        assert!(!args.realtime);
    }

    #[test]
    fn test_difficulty_and_flags() {
        let args = Args::try_parse_from([
            "block-breaker",
            "HARD",
            "--tuning",
            "tuning.json",
            "--max-frames",
            "120",
            "--realtime",
        ])
        .unwrap();
        assert_eq!(args.difficulty, Some(Difficulty::Hard));
        assert_eq!(args.tuning.as_deref().and_then(|p| p.to_str()), Some("tuning.json"));
        assert_eq!(args.max_frames, 120);
        assert!(args.realtime);
    }

    #[test]
    fn test_unknown_difficulty_is_rejected() {
        assert!(Args::try_parse_from(["block-breaker", "nightmare"]).is_err());
        assert!(Args::try_parse_from(["block-breaker", "--max-frames", "lots"]).is_err());
    }

    #[test]
    fn test_help_is_not_a_failure() {
        let err = Args::try_parse_from(["block-breaker", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        assert_eq!(err.exit_code(), 0);
    }
}
