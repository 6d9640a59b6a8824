//! Phrase Rally - a driving quiz game
//!
//! Core modules:
//! - `catalog`: Static phrase content
//! - `sim`: Game logic (answer pool, levels, collisions, state machine, effects)
//! - `persistence`: Key-value storage for the best score
//! - `platform`: Browser/native platform abstraction
//! - `settings`: Player preferences

pub mod audio;
pub mod catalog;
pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use catalog::{Catalog, Difficulty, Phrase};
pub use error::GameError;
pub use highscores::HighScore;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matches the render loop)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Lives at the start of every run
    pub const START_LIVES: u8 = 3;

    /// Vehicle speed in units per second
    pub const DRIVE_SPEED: f32 = 10.0;
    /// Vehicle yaw rate in radians per second
    pub const TURN_RATE: f32 = std::f32::consts::FRAC_PI_2;
    /// Shift boost applied to both speed and yaw rate
    pub const BOOST_FACTOR: f32 = 1.3;
    /// Reverse is slower than forward
    pub const REVERSE_FACTOR: f32 = 0.6;

    /// Answer box rest height and raised height after contact
    pub const TARGET_REST_Y: f32 = -0.5;
    pub const TARGET_RAISED_Y: f32 = 2.0;
    /// Portal height while hidden under the floor and once revealed
    pub const PORTAL_HIDDEN_Y: f32 = -5.0;
    pub const PORTAL_OPEN_Y: f32 = 0.25;
    pub const PORTAL_RADIUS: f32 = 2.0;

    /// Effect durations (milliseconds)
    pub const GLITCH_MS: f32 = 500.0;
    pub const ANSWER_COLOR_MS: f32 = 500.0;
    pub const RAISE_MS: f32 = 200.0;
    pub const RESET_MS: f32 = 100.0;
    pub const OUTCOME_DELAY_MS: f32 = 1000.0;

    /// Storage key for the persisted best score
    pub const HIGH_SCORE_KEY: &str = "highestScoreRace";
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}
