//! Ice Game entry point
//!
//! Headless runner: plays every level with a scripted autopilot and logs how
//! each attempt ends. Usage: `ice-game [levels_dir] [tuning.json]`.
//! Without a levels directory a small built-in course is used.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::process::ExitCode;

    use ice_game::level::{
        BATTERIES_LAYER, END_FLAG_LAYER, LevelDirectory, LevelMap, LevelSource,
        START_MARKER_LAYER, StaticLevels, WALL_CONTACT_LAYER,
    };
    use ice_game::input::Key;
    use ice_game::render::RecordingSink;
    use ice_game::sim::{Rect, SessionEvent};
    use ice_game::{Game, Screen, Tuning};

    const FRAME: f32 = 1.0 / 60.0;
    const MAX_FRAMES: usize = 60 * 300;
    const MAX_ATTEMPTS_PER_LEVEL: u32 = 3;
    /// Frames of no horizontal progress before the autopilot jumps
    const STALL_FRAMES: u32 = 3;

    fn demo_level(length: f32) -> LevelMap {
        LevelMap::new()
            .with_layer(
                WALL_CONTACT_LAYER,
                [
                    Rect::new(0.0, 0.0, length, 128.0),
                    Rect::new(length / 2.0, 128.0, 128.0, 64.0),
                ],
            )
            .with_layer(START_MARKER_LAYER, [Rect::new(128.0, 128.0, 128.0, 128.0)])
            .with_layer(BATTERIES_LAYER, [Rect::new(480.0, 128.0, 64.0, 64.0)])
            .with_layer(END_FLAG_LAYER, [Rect::new(length - 256.0, 128.0, 64.0, 128.0)])
    }

    fn demo_levels(max_level: u32) -> StaticLevels {
        (1..=max_level).fold(StaticLevels::new(), |levels, level| {
            levels.with_level(level, demo_level(1600.0 + 400.0 * level as f32))
        })
    }

    /// Hold right; jump when standing still against something
    struct Autopilot {
        last_x: f32,
        stalled: u32,
    }

    impl Autopilot {
        fn new() -> Self {
            Self {
                last_x: f32::NEG_INFINITY,
                stalled: 0,
            }
        }

        fn drive(&mut self, game: &mut Game) {
            let session = game.session();
            let x = session.player().center().x;
            let grounded = session.is_grounded();
            let holding = session.motion().right_held();

            self.stalled = if (x - self.last_x).abs() < 0.01 { self.stalled + 1 } else { 0 };
            self.last_x = x;

            if !holding {
                game.key_press(Key::Right);
            }
            if grounded && self.stalled >= STALL_FRAMES {
                game.key_press(Key::Up);
                self.stalled = 0;
            }
        }
    }

    fn load_tuning(path: Option<PathBuf>) -> Result<Tuning, ice_game::TuningError> {
        match path {
            Some(path) => Tuning::load(&path),
            None => Ok(Tuning::default()),
        }
    }

    pub fn run() -> ExitCode {
        env_logger::init();
        log::info!("Ice Game (headless) starting...");

        let mut args = std::env::args().skip(1);
        let levels_dir = args.next().map(PathBuf::from);
        let tuning = match load_tuning(args.next().map(PathBuf::from)) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::error!("{err}");
                return ExitCode::FAILURE;
            }
        };
        log::info!(
            "Physics profile: {}, levels {}..={}",
            tuning.physics.profile.as_str(),
            tuning.levels.start_level,
            tuning.levels.max_level
        );

        let source: Box<dyn LevelSource> = match levels_dir {
            Some(dir) => {
                log::info!("Loading levels from {}", dir.display());
                Box::new(LevelDirectory::new(dir))
            }
            None => {
                log::info!("No levels directory given, using the built-in course");
                Box::new(demo_levels(tuning.levels.max_level))
            }
        };

        let mut game = Game::new(&tuning, source);
        if let Err(err) = game.click() {
            log::error!("{err}");
            return ExitCode::FAILURE;
        }

        let mut autopilot = Autopilot::new();
        let mut attempts = 1;
        let mut current_level = 0;
        for frame in 0..MAX_FRAMES {
            autopilot.drive(&mut game);
            for event in game.update(FRAME) {
                match event {
                    SessionEvent::LevelLoaded { level } if level != current_level => {
                        current_level = level;
                        attempts = 1;
                        log::info!("[{:.2}s] level {level} started", frame as f32 * FRAME);
                    }
                    SessionEvent::PickupCollected { granted, .. } => {
                        log::info!("picked up {granted:.2}s of power");
                    }
                    SessionEvent::NotEnoughPower => {
                        log::warn!("reached the flag without power");
                    }
                    SessionEvent::LoadFailed { level, message } => {
                        log::error!("level {level} failed to load: {message}");
                        return ExitCode::FAILURE;
                    }
                    _ => log::debug!("{event:?}"),
                }
            }

            match game.screen() {
                Screen::Victory(_) => {
                    let mut sink = RecordingSink::new();
                    game.draw(&mut sink);
                    log::info!("All levels completed after {frame} frames");
                    log::debug!("victory screen: {:?}", sink.texts());
                    return ExitCode::SUCCESS;
                }
                Screen::GameOver { level } if attempts < MAX_ATTEMPTS_PER_LEVEL => {
                    log::info!("died on level {level}, retrying");
                    attempts += 1;
                    autopilot = Autopilot::new();
                    if let Err(err) = game.click() {
                        log::error!("{err}");
                        return ExitCode::FAILURE;
                    }
                }
                Screen::GameOver { level } => {
                    log::info!("giving up on level {level} after {attempts} attempts");
                    return ExitCode::FAILURE;
                }
                Screen::LoadError { level, message } => {
                    log::error!("level {level} failed to load: {message}");
                    return ExitCode::FAILURE;
                }
                Screen::Instructions { .. } | Screen::Playing => {}
            }
        }

        log::warn!("Stopped after {MAX_FRAMES} frames without finishing");
        ExitCode::FAILURE
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No host loop on wasm; embedders drive `ice_game::Game` directly
}
