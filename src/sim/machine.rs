//! Game state machine
//!
//! A [`Session`] owns one run: counters, the answer pool, the vehicle, the
//! animated scene and the effect queue. Collisions move it between
//! `Driving`, `Resolving`, `Won` and `Lost`; effect completions bring it back.
//!
//! Completions are tagged with the epoch they were scheduled in. A restart
//! starts a new epoch so anything queued by the previous run is discarded.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{self, Arena, CollisionEvent};
use super::effects::{
    Completion, Effect, EffectId, EffectScheduler, Fired, Scene, SceneObject, colors,
};
use super::level::{self, AnswerTargets, LevelSetup, LevelTier, TargetSlot};
use super::pool::AnswerPool;
use super::score;
use super::state::{GameEvent, GamePhase, GameState, Outcome, Snapshot};
use super::vehicle::{DriveKeys, Vehicle};
use crate::audio::{AudioMixer, SoundCue};
use crate::catalog::{Catalog, Difficulty};
use crate::consts::*;
use crate::error::GameError;
use crate::highscores::HighScore;
use crate::persistence::ScoreStore;
use crate::platform;
use crate::settings::Settings;

/// Player commands coming from menus and hotkeys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputCommand {
    /// Restart on level tier index 0-2
    SelectLevel(usize),
    /// Restart on difficulty index 0-2
    SelectDifficulty(usize),
    /// Restart with the current tier and difficulty
    Restart,
    ToggleMute,
}

pub struct Session {
    catalog: Catalog,
    settings: Settings,
    state: GameState,
    pool: AnswerPool,
    targets: AnswerTargets,
    phrase_id: u32,
    phrase: String,
    arena: Arena,
    vehicle: Vehicle,
    scene: Scene,
    effects: EffectScheduler,
    audio: AudioMixer,
    rng: Pcg32,
    events: Vec<GameEvent>,
    /// Effect whose completion ends the current `Resolving` period
    governing: Option<EffectId>,
    /// Most recent glitch; only it may re-enable driving
    active_glitch: Option<EffectId>,
    /// Portal reveal tween still in flight
    portal_reveal: Option<EffectId>,
    /// Portal leads somewhere (a correct answer is waiting to be cashed in)
    portal_armed: bool,
    /// Answers stay locked until the vehicle leaves this box
    rearm_on_exit: Option<TargetSlot>,
    high_score: Option<u64>,
}

impl Session {
    /// Start a run with the tier and difficulty from `settings`
    pub fn new(catalog: Catalog, settings: Settings, store: &dyn ScoreStore) -> Self {
        let seed = settings.seed.unwrap_or_else(platform::entropy_seed);
        let state = GameState::new(settings.level, settings.difficulty);
        let pool = AnswerPool::rebuild(&catalog, settings.difficulty);
        let audio = AudioMixer::new(settings.sfx_volume, settings.muted);

        let mut session = Self {
            catalog,
            settings,
            state,
            pool,
            targets: AnswerTargets::default(),
            phrase_id: 0,
            phrase: String::new(),
            arena: Arena::standard(),
            vehicle: Vehicle::default(),
            scene: Scene::default(),
            effects: EffectScheduler::new(),
            audio,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            governing: None,
            active_glitch: None,
            portal_reveal: None,
            portal_armed: false,
            rearm_on_exit: None,
            high_score: HighScore::load(store),
        };

        session.state.interaction_enabled = true;
        session.state.driving_enabled = true;
        session.begin_level();
        log::info!(
            "Session started: {:?} / {} (seed {})",
            session.state.level_tier,
            session.state.difficulty.as_str(),
            seed
        );
        session
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn vehicle_mut(&mut self) -> &mut Vehicle {
        &mut self.vehicle
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn targets(&self) -> &AnswerTargets {
        &self.targets
    }

    pub fn pool(&self) -> &AnswerPool {
        &self.pool
    }

    pub fn phrase_id(&self) -> u32 {
        self.phrase_id
    }

    pub fn epoch(&self) -> u64 {
        self.effects.epoch()
    }

    /// Preferences, updated by menu selections and the mute toggle
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn high_score(&self) -> Option<u64> {
        self.high_score
    }

    pub fn is_muted(&self) -> bool {
        self.audio.is_muted()
    }

    /// Events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.state.phase,
            lives: self.state.lives,
            elapsed_secs: self.state.elapsed_secs,
            score: self.state.score,
            high_score: self.high_score,
            phrase: self.phrase.clone(),
            left_label: self.targets.get(TargetSlot::Left).label.clone(),
            right_label: self.targets.get(TargetSlot::Right).label.clone(),
            muted: self.audio.is_muted(),
            moves: self.state.moves,
            matches: self.state.matches,
            level_tier: self.state.level_tier,
            difficulty: self.state.difficulty,
        }
    }

    /// One frame: move the vehicle, resolve at most one collision, run the clock
    /// and advance effects.
    pub fn on_frame_tick(&mut self, keys: &DriveKeys, dt: f32, store: &mut dyn ScoreStore) {
        if self.state.phase.is_active() && self.state.driving_enabled {
            if self.vehicle.drive(keys, dt) && !self.state.timer_running {
                self.state.timer_running = true;
                log::debug!("Run clock started");
            }

            let bounds = self.vehicle.collider();
            if let Some(slot) = self.rearm_on_exit {
                if !bounds.intersects(self.arena.target(slot)) {
                    self.rearm_on_exit = None;
                    self.state.interaction_enabled = true;
                    log::debug!("Left the {:?} box, answers re-armed", slot);
                }
            }
            let obstacles = self.arena.obstacles(&self.targets, self.scene.portal_height);
            let report = collision::evaluate(&bounds, &obstacles, self.state.interaction_enabled);
            if let Some(event) = report.most_urgent() {
                self.resolve(event, store);
            }
        }

        if self.state.timer_running {
            self.state.elapsed_secs += dt as f64;
        }

        self.advance_effects(dt);
    }

    pub fn on_input_command(&mut self, command: InputCommand) -> Result<(), GameError> {
        match command {
            InputCommand::SelectLevel(index) => {
                let tier = LevelTier::from_index(index)?;
                self.restart_with(tier, self.state.difficulty);
            }
            InputCommand::SelectDifficulty(index) => {
                let difficulty = Difficulty::from_index(index)?;
                self.restart_with(self.state.level_tier, difficulty);
            }
            InputCommand::Restart => self.restart(),
            InputCommand::ToggleMute => {
                self.settings.muted = self.audio.toggle_mute();
            }
        }
        Ok(())
    }

    /// Restart with the current tier and difficulty
    pub fn restart(&mut self) {
        self.restart_with(self.state.level_tier, self.state.difficulty);
    }

    /// Wipe the run and load a fresh level. Works from any phase.
    pub fn restart_with(&mut self, tier: LevelTier, difficulty: Difficulty) {
        let epoch = self.effects.next_epoch();
        self.state.reset(tier, difficulty);
        self.governing = None;
        self.active_glitch = None;
        self.portal_reveal = None;
        self.portal_armed = false;
        self.rearm_on_exit = None;
        self.settings.level = tier;
        self.settings.difficulty = difficulty;
        self.pool = AnswerPool::rebuild(&self.catalog, difficulty);
        self.events.push(GameEvent::LivesChanged(self.state.lives));

        self.start_glitch(true);
        self.reset_objects_and_teleport();
        self.begin_level();
        log::info!(
            "Restarted: {:?} / {} (epoch {})",
            tier,
            difficulty.as_str(),
            epoch
        );
    }

    /// Apply one collision. Returns false if the event was ignored (run over,
    /// answers locked, portal not armed).
    pub fn resolve(&mut self, event: CollisionEvent, store: &mut dyn ScoreStore) -> bool {
        if !self.state.phase.is_active() {
            return false;
        }
        let accepted = match event {
            CollisionEvent::CorrectAnswer(_) | CollisionEvent::IncorrectAnswer(_) => {
                self.state.interaction_enabled
            }
            CollisionEvent::Portal => self.portal_armed,
            CollisionEvent::Boundary => true,
        };
        if !accepted {
            return false;
        }

        self.state.moves += 1;
        log::debug!("Resolving {:?} (move {})", event, self.state.moves);

        match event {
            CollisionEvent::CorrectAnswer(slot) => self.on_correct(slot, store),
            CollisionEvent::IncorrectAnswer(slot) => self.on_incorrect(slot),
            CollisionEvent::Boundary => self.on_boundary(),
            CollisionEvent::Portal => self.on_portal(),
        }
        true
    }

    fn on_correct(&mut self, slot: TargetSlot, store: &mut dyn ScoreStore) {
        self.state.interaction_enabled = false;
        self.play(SoundCue::CorrectAnswer);
        self.raise_target(slot);
        self.effects.schedule(
            Effect::Color {
                slot,
                to: colors::GREEN,
            },
            ANSWER_COLOR_MS,
            None,
        );

        self.state.matches += 1;
        if self.state.matches >= self.state.matches_required() {
            self.finish_won(store);
            return;
        }

        self.state.phase = GamePhase::Resolving;
        self.portal_armed = true;
        let reveal = self.effects.schedule(
            Effect::Height {
                object: SceneObject::Portal,
                to: PORTAL_OPEN_Y,
            },
            RAISE_MS,
            Some(Completion::ResumeDriving),
        );
        self.portal_reveal = Some(reveal);
        self.governing = Some(reveal);
    }

    fn on_incorrect(&mut self, slot: TargetSlot) {
        self.state.interaction_enabled = false;
        self.play(SoundCue::IncorrectAnswer);
        self.raise_target(slot);

        self.state.lives = self.state.lives.saturating_sub(1);
        self.events.push(GameEvent::LivesChanged(self.state.lives));
        if self.state.lives == 0 {
            self.effects.schedule(
                Effect::Color {
                    slot,
                    to: colors::RED,
                },
                ANSWER_COLOR_MS,
                None,
            );
            self.finish_lost();
            return;
        }

        self.state.phase = GamePhase::Resolving;
        let flash = self.effects.schedule(
            Effect::Color {
                slot,
                to: colors::RED,
            },
            ANSWER_COLOR_MS,
            Some(Completion::RestoreTarget(slot)),
        );
        self.governing = Some(flash);
    }

    fn on_boundary(&mut self) {
        self.play(SoundCue::Teleport);
        self.vehicle.reset();
        self.state.phase = GamePhase::Resolving;
        let glitch = self.start_glitch(false);
        self.governing = Some(glitch);
    }

    fn on_portal(&mut self) {
        self.state.phase = GamePhase::Resolving;
        let glitch = self.start_glitch(true);
        self.governing = Some(glitch);
        self.reset_objects_and_teleport();
        self.begin_level();
    }

    fn finish_won(&mut self, store: &mut dyn ScoreStore) {
        self.end_run(GamePhase::Won);

        let s = &self.state;
        let points = score::score(s.lives, s.level_tier, s.difficulty, s.matches, s.elapsed_secs);
        self.state.score = points;
        let best = match HighScore::record(store, points) {
            Ok(best) => best,
            Err(e) => {
                log::warn!("Could not persist best score: {}", e);
                self.high_score.map_or(points, |b| b.max(points))
            }
        };
        self.high_score = Some(best);
        log::info!(
            "Run won: {} points in {:.2}s ({} moves, best {})",
            points,
            self.state.elapsed_secs,
            self.state.moves,
            best
        );
    }

    fn finish_lost(&mut self) {
        self.end_run(GamePhase::Lost);
        self.state.score = 0;
        log::info!(
            "Run lost after {:.2}s ({} matches)",
            self.state.elapsed_secs,
            self.state.matches
        );
    }

    fn end_run(&mut self, phase: GamePhase) {
        self.state.phase = phase;
        self.state.interaction_enabled = false;
        self.state.driving_enabled = false;
        self.state.stop_timer();
        self.governing = None;
        self.effects.schedule(
            Effect::Delay,
            OUTCOME_DELAY_MS,
            Some(Completion::RevealOutcome),
        );
    }

    fn advance_effects(&mut self, dt: f32) {
        for fired in self.effects.advance(dt, &mut self.scene) {
            self.apply_completion(fired);
        }
    }

    fn apply_completion(&mut self, fired: Fired) {
        let current = self.effects.epoch();
        if fired.epoch != current {
            let stale = GameError::StaleEffectCallback {
                id: fired.id,
                scheduled: fired.epoch,
                current,
            };
            log::debug!("Discarding {}", stale);
            return;
        }
        if self.portal_reveal == Some(fired.id) {
            self.portal_reveal = None;
        }

        match fired.on_complete {
            Some(Completion::EndGlitch { resume_interaction }) => {
                if self.active_glitch == Some(fired.id) {
                    self.active_glitch = None;
                    self.scene.glitch = false;
                    self.events.push(GameEvent::GlitchChanged(false));
                    if !self.state.phase.is_over() {
                        self.state.driving_enabled = true;
                        if resume_interaction {
                            self.state.interaction_enabled = true;
                        }
                    }
                }
            }
            Some(Completion::RestoreTarget(slot)) => {
                self.lower_target(slot);
                if !self.state.phase.is_over() {
                    // A contact that outlasts the flash must not cost another life
                    self.rearm_on_exit = Some(slot);
                }
            }
            Some(Completion::RevealOutcome) => {
                if self.state.phase.is_over() {
                    let won = self.state.phase == GamePhase::Won;
                    self.play(if won { SoundCue::Win } else { SoundCue::Loss });
                    self.events.push(GameEvent::Outcome(Outcome {
                        won,
                        score: self.state.score,
                        high_score: self.high_score,
                    }));
                }
            }
            Some(Completion::ResumeDriving) | None => {}
        }

        if self.governing == Some(fired.id) {
            self.governing = None;
            if self.state.phase == GamePhase::Resolving {
                self.state.phase = GamePhase::Driving;
            }
        }
    }

    /// Draw the next phrase and relabel the boxes; the portal drops out of reach.
    fn begin_level(&mut self) -> bool {
        let setup = level::load_level(
            self.state.level_tier,
            self.state.difficulty,
            &mut self.pool,
            &self.catalog,
            &mut self.rng,
        );
        match setup {
            Ok(setup) => {
                self.apply_setup(setup);
                if self.state.phase == GamePhase::Idle {
                    self.state.phase = GamePhase::Driving;
                }
                true
            }
            Err(e) => {
                log::error!("Level load failed, keeping current level: {}", e);
                false
            }
        }
    }

    fn apply_setup(&mut self, setup: LevelSetup) {
        if let Some(reveal) = self.portal_reveal.take() {
            self.effects.cancel(reveal);
        }
        self.portal_armed = false;
        self.scene.portal_height = PORTAL_HIDDEN_Y;
        self.targets = setup.targets;
        self.phrase_id = setup.phrase_id;
        self.phrase = setup.phrase_text;
        self.events.push(GameEvent::LevelLoaded {
            phrase_id: setup.phrase_id,
        });
    }

    /// Glitch overlay on, driving paused until the glitch completes
    fn start_glitch(&mut self, resume_interaction: bool) -> EffectId {
        self.state.driving_enabled = false;
        self.scene.glitch = self.settings.effective_glitch();
        self.events.push(GameEvent::GlitchChanged(true));
        let id = self.effects.schedule(
            Effect::Glitch,
            GLITCH_MS,
            Some(Completion::EndGlitch { resume_interaction }),
        );
        self.active_glitch = Some(id);
        id
    }

    fn reset_objects_and_teleport(&mut self) {
        self.play(SoundCue::Teleport);
        self.vehicle.reset();
        for slot in TargetSlot::BOTH {
            self.lower_target(slot);
        }
    }

    fn raise_target(&mut self, slot: TargetSlot) {
        self.effects.schedule(
            Effect::Height {
                object: SceneObject::Target(slot),
                to: TARGET_RAISED_Y,
            },
            RAISE_MS,
            None,
        );
    }

    fn lower_target(&mut self, slot: TargetSlot) {
        self.effects.schedule(
            Effect::Color {
                slot,
                to: colors::ORANGE,
            },
            RESET_MS,
            None,
        );
        self.effects.schedule(
            Effect::Height {
                object: SceneObject::Target(slot),
                to: TARGET_REST_Y,
            },
            RESET_MS,
            None,
        );
    }

    fn play(&mut self, cue: SoundCue) {
        if let Some(playback) = self.audio.play(cue) {
            self.events.push(GameEvent::Sound(playback));
        }
    }
}
