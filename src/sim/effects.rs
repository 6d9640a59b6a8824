//! Effect scheduler
//!
//! Timed cosmetic transitions (color and height tweens, the glitch overlay,
//! plain delays) that run alongside the frame loop. Each task is tagged with the
//! session epoch it was scheduled in; a restart moves to a new epoch and old
//! tasks stop touching the scene.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::level::TargetSlot;
use crate::consts::{PORTAL_HIDDEN_Y, TARGET_REST_Y};

pub type EffectId = u64;

/// Answer box colors
pub mod colors {
    use glam::Vec3;

    pub const ORANGE: Vec3 = Vec3::new(1.0, 0.647, 0.0);
    pub const GREEN: Vec3 = Vec3::new(0.0, 0.502, 0.0);
    pub const RED: Vec3 = Vec3::new(1.0, 0.0, 0.0);
}

/// Something in the scene whose height can be tweened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneObject {
    Target(TargetSlot),
    Portal,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Tween an answer box color
    Color { slot: TargetSlot, to: Vec3 },
    /// Tween an object's height
    Height { object: SceneObject, to: f32 },
    /// Glitch overlay; the session turns it on and the completion turns it off
    Glitch,
    /// Nothing animates, only the completion matters
    Delay,
}

/// What the session should do once an effect finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Completion {
    /// Glitch over: re-enable driving, and optionally answer interaction
    EndGlitch { resume_interaction: bool },
    /// Portal reveal finished
    ResumeDriving,
    /// Wrong-answer flash finished: put the box back and allow answers again
    /// once the vehicle is clear of it
    RestoreTarget(TargetSlot),
    /// Show the win/loss result
    RevealOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetVisual {
    pub color: Vec3,
    pub height: f32,
}

impl Default for TargetVisual {
    fn default() -> Self {
        Self {
            color: colors::ORANGE,
            height: TARGET_REST_Y,
        }
    }
}

/// Animated values read by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub left: TargetVisual,
    pub right: TargetVisual,
    pub portal_height: f32,
    pub glitch: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            left: TargetVisual::default(),
            right: TargetVisual::default(),
            portal_height: PORTAL_HIDDEN_Y,
            glitch: false,
        }
    }
}

impl Scene {
    pub fn target(&self, slot: TargetSlot) -> &TargetVisual {
        match slot {
            TargetSlot::Left => &self.left,
            TargetSlot::Right => &self.right,
        }
    }

    pub fn target_mut(&mut self, slot: TargetSlot) -> &mut TargetVisual {
        match slot {
            TargetSlot::Left => &mut self.left,
            TargetSlot::Right => &mut self.right,
        }
    }

    fn height_mut(&mut self, object: SceneObject) -> &mut f32 {
        match object {
            SceneObject::Target(slot) => &mut self.target_mut(slot).height,
            SceneObject::Portal => &mut self.portal_height,
        }
    }
}

/// Tween start value, captured on the task's first frame
#[derive(Debug, Clone, Copy, PartialEq)]
enum Start {
    Color(Vec3),
    Height(f32),
}

#[derive(Debug, Clone)]
struct Task {
    id: EffectId,
    epoch: u64,
    effect: Effect,
    elapsed_ms: f32,
    duration_ms: f32,
    start: Option<Start>,
    on_complete: Option<Completion>,
}

impl Task {
    fn progress(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            1.0
        } else {
            (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
        }
    }

    fn apply(&mut self, scene: &mut Scene) {
        let t = self.progress();
        match self.effect {
            Effect::Color { slot, to } => {
                let color = &mut scene.target_mut(slot).color;
                let from = match self.start {
                    Some(Start::Color(c)) => c,
                    _ => {
                        self.start = Some(Start::Color(*color));
                        *color
                    }
                };
                *color = from.lerp(to, t);
            }
            Effect::Height { object, to } => {
                let height = scene.height_mut(object);
                let from = match self.start {
                    Some(Start::Height(h)) => h,
                    _ => {
                        self.start = Some(Start::Height(*height));
                        *height
                    }
                };
                *height = from + (to - from) * t;
            }
            Effect::Glitch | Effect::Delay => {}
        }
    }
}

/// A task whose duration has elapsed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fired {
    pub id: EffectId,
    pub epoch: u64,
    pub effect: Effect,
    pub on_complete: Option<Completion>,
}

#[derive(Debug, Clone, Default)]
pub struct EffectScheduler {
    epoch: u64,
    next_id: EffectId,
    tasks: Vec<Task>,
}

impl EffectScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Start a new session epoch; tasks from earlier epochs become stale
    pub fn next_epoch(&mut self) -> u64 {
        self.epoch += 1;
        self.epoch
    }

    /// Queue an effect in the current epoch
    pub fn schedule(
        &mut self,
        effect: Effect,
        duration_ms: f32,
        on_complete: Option<Completion>,
    ) -> EffectId {
        self.next_id += 1;
        let id = self.next_id;
        self.tasks.push(Task {
            id,
            epoch: self.epoch,
            effect,
            elapsed_ms: 0.0,
            duration_ms: duration_ms.max(0.0),
            start: None,
            on_complete,
        });
        id
    }

    /// Drop a task without firing its completion. Returns false if it already finished.
    pub fn cancel(&mut self, id: EffectId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Advance all tasks by `dt` seconds, write current-epoch tweens into the
    /// scene, and return the tasks that finished (in scheduling order).
    pub fn advance(&mut self, dt: f32, scene: &mut Scene) -> Vec<Fired> {
        let dt_ms = dt * 1000.0;
        let epoch = self.epoch;
        for task in &mut self.tasks {
            task.elapsed_ms += dt_ms;
            if task.epoch == epoch {
                task.apply(scene);
            }
        }

        let mut fired = Vec::new();
        self.tasks.retain(|task| {
            if task.elapsed_ms >= task.duration_ms {
                fired.push(Fired {
                    id: task.id,
                    epoch: task.epoch,
                    effect: task.effect,
                    on_complete: task.on_complete,
                });
                false
            } else {
                true
            }
        });
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_fires_after_duration() {
        let mut scheduler = EffectScheduler::new();
        let mut scene = Scene::default();
        let id = scheduler.schedule(Effect::Delay, 500.0, Some(Completion::RevealOutcome));

        assert!(scheduler.advance(0.3, &mut scene).is_empty());

        let fired = scheduler.advance(0.25, &mut scene);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].id, id);
        assert_eq!(fired[0].on_complete, Some(Completion::RevealOutcome));
        assert!(scheduler.advance(1.0, &mut scene).is_empty());
    }

    #[test]
    fn test_height_tween_interpolates() {
        let mut scheduler = EffectScheduler::new();
        let mut scene = Scene::default();
        scheduler.schedule(
            Effect::Height {
                object: SceneObject::Portal,
                to: 0.0,
            },
            1000.0,
            None,
        );

        scheduler.advance(0.5, &mut scene);
        assert!((scene.portal_height - PORTAL_HIDDEN_Y * 0.5).abs() < 1e-4);

        scheduler.advance(0.5, &mut scene);
        assert!(scene.portal_height.abs() < 1e-4);
    }

    #[test]
    fn test_color_tween_reaches_target() {
        let mut scheduler = EffectScheduler::new();
        let mut scene = Scene::default();
        scheduler.schedule(
            Effect::Color {
                slot: TargetSlot::Right,
                to: colors::GREEN,
            },
            500.0,
            None,
        );
        for _ in 0..40 {
            scheduler.advance(1.0 / 60.0, &mut scene);
        }
        assert!(scene.right.color.distance(colors::GREEN) < 1e-4);
        assert_eq!(scene.left.color, colors::ORANGE);
    }

    #[test]
    fn test_stale_tasks_fire_but_do_not_animate() {
        let mut scheduler = EffectScheduler::new();
        let mut scene = Scene::default();
        scheduler.schedule(
            Effect::Color {
                slot: TargetSlot::Left,
                to: colors::RED,
            },
            100.0,
            Some(Completion::RestoreTarget(TargetSlot::Left)),
        );
        let old_epoch = scheduler.epoch();
        scheduler.next_epoch();

        let fired = scheduler.advance(0.2, &mut scene);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].epoch, old_epoch);
        assert_ne!(fired[0].epoch, scheduler.epoch());
        assert_eq!(scene.left.color, colors::ORANGE);
    }

    #[test]
    fn test_cancelled_task_never_fires() {
        let mut scheduler = EffectScheduler::new();
        let mut scene = Scene::default();
        let id = scheduler.schedule(Effect::Glitch, 100.0, Some(Completion::ResumeDriving));
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert!(scheduler.advance(0.5, &mut scene).is_empty());
    }

    #[test]
    fn test_zero_duration_fires_next_frame() {
        let mut scheduler = EffectScheduler::new();
        let mut scene = Scene::default();
        scheduler.schedule(
            Effect::Height {
                object: SceneObject::Target(TargetSlot::Left),
                to: 2.0,
            },
            0.0,
            None,
        );
        let fired = scheduler.advance(0.0, &mut scene);
        assert_eq!(fired.len(), 1);
        assert_eq!(scene.left.height, 2.0);
    }
}
