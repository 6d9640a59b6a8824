//! Phrase Rally entry point
//!
//! Native builds run a headless session on autopilot and print the result.
//! Pass a settings JSON path as the first argument to pick tier/difficulty/seed.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use phrase_rally::consts::*;
    use phrase_rally::persistence::JsonFileStore;
    use phrase_rally::sim::{FixedStep, GameEvent, Session, TickInput, tick};
    use phrase_rally::{Catalog, Settings, platform};

    /// Simulated display refresh; the sim still steps at SIM_DT
    const FRAME_DT: f32 = 1.0 / 50.0;
    /// Give up after five minutes of game time
    const MAX_FRAMES: u32 = 50 * 300;

    platform::init_logging();
    log::info!("Phrase Rally (native) starting...");

    let settings_path = std::env::args().nth(1).map(std::path::PathBuf::from);
    let settings = Settings::load(settings_path.as_deref());

    let catalog = match Catalog::builtin() {
        Ok(catalog) => catalog,
        Err(e) => {
            log::error!("Phrase catalog is unusable: {}", e);
            std::process::exit(1);
        }
    };

    let mut store = JsonFileStore::open(std::env::temp_dir().join("phrase-rally").join("scores.json"));
    log::info!("Best score file: {}", store.path().display());

    let mut session = Session::new(catalog, settings, &store);
    let mut clock = FixedStep::new();
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    println!("{}", session.snapshot().phrase);

    let mut outcome = None;
    for _ in 0..MAX_FRAMES {
        for _ in 0..clock.steps(FRAME_DT) {
            tick(&mut session, &input, SIM_DT, &mut store);
        }

        for event in session.drain_events() {
            match event {
                GameEvent::LevelLoaded { .. } => println!("{}", session.snapshot().phrase),
                GameEvent::Outcome(result) => outcome = Some(result),
                other => log::debug!("{:?}", other),
            }
        }

        if outcome.is_some() {
            break;
        }
    }

    if let Some(path) = settings_path.as_deref() {
        if let Err(e) = session.settings().save_to(path) {
            log::warn!("Could not save settings to {}: {}", path.display(), e);
        }
    }

    let snapshot = session.snapshot();
    match outcome {
        Some(result) => println!(
            "{} (time {}s, {} moves, {} lives left)",
            result.banner(),
            snapshot.timer_text(),
            snapshot.moves,
            snapshot.lives
        ),
        None => println!("No result after {}s", snapshot.timer_text()),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives `Session` through the library; nothing to run here
}
