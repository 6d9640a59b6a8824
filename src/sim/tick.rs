//! Fixed timestep simulation tick
//!
//! Routes one frame of input into the session and advances it by `dt`.

use super::machine::{InputCommand, Session};
use super::vehicle::DriveKeys;
use crate::consts::*;
use crate::normalize_angle;
use crate::persistence::ScoreStore;

/// Heading error (radians) the autopilot tolerates before steering
const AUTOPILOT_DEADBAND: f32 = 0.05;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held drive keys
    pub keys: DriveKeys,
    /// One-shot menu/hotkey command
    pub command: Option<InputCommand>,
    /// Idle/demo mode - the autopilot drives
    pub idle_mode: bool,
}

/// Advance the session by one fixed timestep
pub fn tick(session: &mut Session, input: &TickInput, dt: f32, store: &mut dyn ScoreStore) {
    if let Some(command) = input.command {
        if let Err(e) = session.on_input_command(command) {
            log::warn!("Ignoring {:?}: {}", command, e);
        }
    }

    let keys = if input.idle_mode {
        autopilot(session)
    } else {
        input.keys
    };
    session.on_frame_tick(&keys, dt, store);
}

/// Steer toward the correct answer box, or toward the portal once it is open.
/// While answers are locked it backs away from whatever it touched.
pub fn autopilot(session: &Session) -> DriveKeys {
    let state = session.state();
    if !state.phase.is_active() || !state.driving_enabled {
        return DriveKeys::default();
    }

    let goal = if session.scene().portal_height > PORTAL_HIDDEN_Y + PORTAL_RADIUS {
        session.arena().portal_at(PORTAL_OPEN_Y).center
    } else if state.interaction_enabled {
        match session.targets().correct_slot() {
            Some(slot) => session.arena().target(slot).center(),
            None => return DriveKeys::default(),
        }
    } else {
        return DriveKeys {
            backward: true,
            ..Default::default()
        };
    };

    let vehicle = session.vehicle();
    let to_goal = goal - vehicle.position;
    let desired = (-to_goal.x).atan2(-to_goal.z);
    let error = normalize_angle(desired - vehicle.yaw);

    DriveKeys {
        forward: true,
        left: error > AUTOPILOT_DEADBAND,
        right: error < -AUTOPILOT_DEADBAND,
        ..Default::default()
    }
}

/// Accumulates variable frame times into fixed simulation steps
#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `SIM_DT` steps to run for a frame that took `frame_dt` seconds
    pub fn steps(&mut self, frame_dt: f32) -> u32 {
        // Clamp long frames (tab switches, breakpoints)
        self.accumulator += frame_dt.clamp(0.0, 0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }
}
