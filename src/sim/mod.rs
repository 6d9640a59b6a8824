//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Effects complete in scheduling order
//! - No rendering or platform dependencies

pub mod collision;
pub mod effects;
pub mod level;
pub mod machine;
pub mod pool;
pub mod score;
pub mod state;
pub mod tick;
pub mod vehicle;

pub use collision::{Aabb, Arena, CollisionEvent, CollisionReport, Sphere, evaluate};
pub use effects::{Completion, Effect, EffectId, EffectScheduler, Scene, SceneObject};
pub use level::{AnswerTarget, AnswerTargets, LevelSetup, LevelTier, TargetSlot, load_level};
pub use machine::{InputCommand, Session};
pub use pool::AnswerPool;
pub use state::{GameEvent, GamePhase, GameState, Outcome, Snapshot};
pub use tick::{FixedStep, TickInput, autopilot, tick};
pub use vehicle::{DriveKeys, Vehicle};
