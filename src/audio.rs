//! Sound cues
//!
//! The game decides which cue plays and at what volume; the platform layer
//! owns the actual audio files and playback.

use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    /// Run won
    Win,
    /// Run lost
    Loss,
    /// Hit the correct answer box
    CorrectAnswer,
    /// Hit the wrong answer box
    IncorrectAnswer,
    /// Vehicle teleported (wall, portal, restart)
    Teleport,
}

impl SoundCue {
    /// Asset path relative to the web root
    pub fn asset(&self) -> &'static str {
        match self {
            SoundCue::Win => "sounds/game_win_sound.ogg",
            SoundCue::Loss => "sounds/game_loss_sound.ogg",
            SoundCue::CorrectAnswer => "sounds/correct_answer_sound.ogg",
            SoundCue::IncorrectAnswer => "sounds/incorrect_answer_sound.ogg",
            SoundCue::Teleport => "sounds/teleport_sound.ogg",
        }
    }

    pub fn playback_rate(&self) -> f32 {
        match self {
            SoundCue::Teleport => 2.0,
            _ => 1.0,
        }
    }
}

/// A cue ready to hand to the platform (always restarts from the beginning)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playback {
    pub cue: SoundCue,
    pub volume: f32,
    pub rate: f32,
}

/// Volume and mute state
#[derive(Debug, Clone)]
pub struct AudioMixer {
    volume: f32,
    muted: bool,
}

impl Default for AudioMixer {
    fn default() -> Self {
        Self::new(0.05, false)
    }
}

impl AudioMixer {
    pub fn new(volume: f32, muted: bool) -> Self {
        Self {
            volume: volume.clamp(0.0, 1.0),
            muted,
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Flip mute, returning the new state
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        log::info!("Audio {}", if self.muted { "muted" } else { "unmuted" });
        self.muted
    }

    /// Resolve a cue to a playback request, or nothing while muted
    pub fn play(&self, cue: SoundCue) -> Option<Playback> {
        if self.muted || self.volume <= 0.0 {
            return None;
        }
        Some(Playback {
            cue,
            volume: self.volume,
            rate: cue.playback_rate(),
        })
    }
}
