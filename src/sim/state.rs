//! Game state and the values shown to the player

use serde::{Deserialize, Serialize};

use super::level::LevelTier;
use crate::audio::Playback;
use crate::catalog::Difficulty;
use crate::consts::START_LIVES;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// No level loaded yet (or mid-restart)
    #[default]
    Idle,
    /// Free driving
    Driving,
    /// A collision was resolved and its effect is still running
    Resolving,
    /// All matches found
    Won,
    /// Out of lives
    Lost,
}

impl GamePhase {
    pub fn is_over(&self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }

    /// Phases in which the vehicle is simulated and collisions are checked
    pub fn is_active(&self) -> bool {
        matches!(self, GamePhase::Driving | GamePhase::Resolving)
    }
}

/// Counters and flags for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub lives: u8,
    pub score: u64,
    /// Collisions resolved this run
    pub moves: u32,
    /// Correct answers this run
    pub matches: u32,
    pub level_tier: LevelTier,
    pub difficulty: Difficulty,
    /// Answer boxes can be hit
    pub interaction_enabled: bool,
    /// Vehicle responds to keys
    pub driving_enabled: bool,
    /// Run clock; starts on first throttle
    pub elapsed_secs: f64,
    pub timer_running: bool,
}

impl GameState {
    pub fn new(level_tier: LevelTier, difficulty: Difficulty) -> Self {
        Self {
            phase: GamePhase::Idle,
            lives: START_LIVES,
            score: 0,
            moves: 0,
            matches: 0,
            level_tier,
            difficulty,
            interaction_enabled: false,
            driving_enabled: false,
            elapsed_secs: 0.0,
            timer_running: false,
        }
    }

    /// Wipe the run for a restart
    pub fn reset(&mut self, level_tier: LevelTier, difficulty: Difficulty) {
        *self = Self::new(level_tier, difficulty);
    }

    pub fn matches_required(&self) -> u32 {
        self.level_tier.matches_required()
    }

    pub fn stop_timer(&mut self) {
        self.timer_running = false;
    }
}

/// Result of a finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub won: bool,
    pub score: u64,
    pub high_score: Option<u64>,
}

impl Outcome {
    /// Text for the restart button
    pub fn banner(&self) -> String {
        if !self.won {
            return "Restart".to_string();
        }
        match self.high_score {
            Some(best) => format!("Score: {} | Highest score: {} | Restart", self.score, best),
            None => format!("Score: {} | Restart", self.score),
        }
    }
}

/// Notifications for the rendering/audio collaborator, drained every frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound(Playback),
    LevelLoaded { phrase_id: u32 },
    LivesChanged(u8),
    GlitchChanged(bool),
    Outcome(Outcome),
}

/// Read-only view for the HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub lives: u8,
    pub elapsed_secs: f64,
    pub score: u64,
    pub high_score: Option<u64>,
    pub phrase: String,
    pub left_label: String,
    pub right_label: String,
    pub muted: bool,
    pub moves: u32,
    pub matches: u32,
    pub level_tier: LevelTier,
    pub difficulty: Difficulty,
}

impl Snapshot {
    /// Timer as shown in the HUD
    pub fn timer_text(&self) -> String {
        format!("{:.2}", self.elapsed_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_has_full_lives() {
        let state = GameState::new(LevelTier::Medium, Difficulty::Advanced);
        assert_eq!(state.lives, START_LIVES);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.matches_required(), 10);
        assert!(!state.interaction_enabled);
    }

    #[test]
    fn test_banner_text() {
        let won = Outcome {
            won: true,
            score: 5400,
            high_score: Some(6000),
        };
        assert_eq!(won.banner(), "Score: 5400 | Highest score: 6000 | Restart");

        let first = Outcome {
            won: true,
            score: 10,
            high_score: None,
        };
        assert_eq!(first.banner(), "Score: 10 | Restart");

        let lost = Outcome {
            won: false,
            score: 0,
            high_score: Some(6000),
        };
        assert_eq!(lost.banner(), "Restart");
    }

    #[test]
    fn test_phase_predicates() {
        assert!(GamePhase::Won.is_over());
        assert!(GamePhase::Lost.is_over());
        assert!(GamePhase::Resolving.is_active());
        assert!(!GamePhase::Idle.is_active());
    }
}
