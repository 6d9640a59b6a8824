//! Collision detection for the arena
//!
//! Everything is an axis-aligned box except the portal, which is a sphere.
//! The evaluator is a pure function of the current bounds.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::level::{AnswerTargets, TargetSlot};
use crate::consts::{PORTAL_RADIUS, TARGET_REST_Y};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box of the given full `size` centered on `center`
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Smallest box containing all points
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for p in points {
            min = min.min(p);
            max = max.max(p);
        }
        Self { min, max }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Overlap test; touching faces count as contact
    pub fn intersects(&self, other: &Aabb) -> bool {
        !(other.max.x < self.min.x
            || other.min.x > self.max.x
            || other.max.y < self.min.y
            || other.min.y > self.max.y
            || other.max.z < self.min.z
            || other.min.z > self.max.z)
    }

    /// Distance from the sphere center to the closest point of the box
    pub fn intersects_sphere(&self, sphere: &Sphere) -> bool {
        let closest = sphere.center.clamp(self.min, self.max);
        closest.distance_squared(sphere.center) <= sphere.radius * sphere.radius
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

/// Discrete contact classified by the evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionEvent {
    Boundary,
    CorrectAnswer(TargetSlot),
    IncorrectAnswer(TargetSlot),
    Portal,
}

/// Contacts found in one frame, at most one per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub answer: Option<CollisionEvent>,
    pub portal: bool,
    pub boundary: bool,
}

impl CollisionReport {
    /// The event to resolve this frame: answer, then portal, then boundary.
    /// Contacts that lose out are still overlapping next frame.
    pub fn most_urgent(&self) -> Option<CollisionEvent> {
        if let Some(answer) = self.answer {
            return Some(answer);
        }
        if self.portal {
            return Some(CollisionEvent::Portal);
        }
        if self.boundary {
            return Some(CollisionEvent::Boundary);
        }
        None
    }
}

/// Fixed arena layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    /// Invisible walls: left, right, back, front
    pub walls: [Aabb; 4],
    pub left_target: Aabb,
    pub right_target: Aabb,
    /// Portal position on the floor plane; its height is animated
    pub portal_x: f32,
    pub portal_z: f32,
    pub portal_radius: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self::standard()
    }
}

impl Arena {
    pub fn standard() -> Self {
        let side = Vec3::new(1.0, 3.0, 60.0);
        let end = Vec3::new(40.0, 3.0, 1.0);
        let target = Vec3::ONE;
        Self {
            walls: [
                Aabb::from_center_size(Vec3::new(-20.5, 0.0, 0.0), side),
                Aabb::from_center_size(Vec3::new(20.5, 0.0, 0.0), side),
                Aabb::from_center_size(Vec3::new(0.0, 0.0, 30.5), end),
                Aabb::from_center_size(Vec3::new(0.0, 0.0, -30.5), end),
            ],
            left_target: Aabb::from_center_size(Vec3::new(-5.0, TARGET_REST_Y, -10.0), target),
            right_target: Aabb::from_center_size(Vec3::new(5.0, TARGET_REST_Y, -10.0), target),
            portal_x: 0.0,
            portal_z: -22.0,
            portal_radius: PORTAL_RADIUS,
        }
    }

    pub fn target(&self, slot: TargetSlot) -> &Aabb {
        match slot {
            TargetSlot::Left => &self.left_target,
            TargetSlot::Right => &self.right_target,
        }
    }

    pub fn portal_at(&self, height: f32) -> Sphere {
        Sphere {
            center: Vec3::new(self.portal_x, height, self.portal_z),
            radius: self.portal_radius,
        }
    }

    /// Snapshot the obstacles for this frame
    pub fn obstacles(&self, targets: &AnswerTargets, portal_height: f32) -> Obstacles<'_> {
        Obstacles {
            walls: &self.walls,
            targets: TargetSlot::BOTH.map(|slot| (slot, *self.target(slot), targets.is_correct(slot))),
            portal: self.portal_at(portal_height),
        }
    }
}

/// Obstacles for one evaluation, with the answer labels resolved
#[derive(Debug, Clone)]
pub struct Obstacles<'a> {
    pub walls: &'a [Aabb],
    pub targets: [(TargetSlot, Aabb, bool); 2],
    pub portal: Sphere,
}

/// Classify the vehicle's contacts.
///
/// Answer boxes are only tested while `interaction_enabled`; walls and the
/// portal are always tested.
pub fn evaluate(vehicle: &Aabb, obstacles: &Obstacles<'_>, interaction_enabled: bool) -> CollisionReport {
    let mut report = CollisionReport::default();

    if interaction_enabled {
        report.answer = obstacles
            .targets
            .iter()
            .find(|(_, bounds, _)| vehicle.intersects(bounds))
            .map(|&(slot, _, correct)| {
                if correct {
                    CollisionEvent::CorrectAnswer(slot)
                } else {
                    CollisionEvent::IncorrectAnswer(slot)
                }
            });
    }

    report.boundary = obstacles.walls.iter().any(|wall| vehicle.intersects(wall));
    report.portal = vehicle.intersects_sphere(&obstacles.portal);

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{PORTAL_HIDDEN_Y, PORTAL_OPEN_Y};

    fn vehicle_at(x: f32, z: f32) -> Aabb {
        Aabb::from_center_size(Vec3::new(x, -0.58, z), Vec3::new(1.2, 0.95, 3.21))
    }

    fn left_correct() -> AnswerTargets {
        AnswerTargets::assign(TargetSlot::Left, 1, "right", "wrong")
    }

    #[test]
    fn test_aabb_intersection() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::splat(0.5), Vec3::splat(2.0));
        let c = Aabb::new(Vec3::splat(1.5), Vec3::splat(2.0));
        let touching = Aabb::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert!(a.intersects(&touching));
    }

    #[test]
    fn test_sphere_intersection() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert!(a.intersects_sphere(&Sphere {
            center: Vec3::new(2.0, 0.5, 0.5),
            radius: 1.0
        }));
        assert!(!a.intersects_sphere(&Sphere {
            center: Vec3::new(3.0, 3.0, 3.0),
            radius: 1.0
        }));
    }

    #[test]
    fn test_start_position_is_clear() {
        let arena = Arena::standard();
        let obstacles = arena.obstacles(&left_correct(), PORTAL_HIDDEN_Y);
        let report = evaluate(&vehicle_at(0.0, 0.165), &obstacles, true);
        assert_eq!(report, CollisionReport::default());
    }

    #[test]
    fn test_answer_classification() {
        let arena = Arena::standard();
        let obstacles = arena.obstacles(&left_correct(), PORTAL_HIDDEN_Y);

        let left = evaluate(&vehicle_at(-5.0, -10.0), &obstacles, true);
        assert_eq!(left.answer, Some(CollisionEvent::CorrectAnswer(TargetSlot::Left)));

        let right = evaluate(&vehicle_at(5.0, -10.0), &obstacles, true);
        assert_eq!(right.answer, Some(CollisionEvent::IncorrectAnswer(TargetSlot::Right)));
    }

    #[test]
    fn test_answers_ignored_without_interaction() {
        let arena = Arena::standard();
        let obstacles = arena.obstacles(&left_correct(), PORTAL_HIDDEN_Y);
        let report = evaluate(&vehicle_at(-5.0, -10.0), &obstacles, false);
        assert_eq!(report.most_urgent(), None);
    }

    #[test]
    fn test_walls_are_boundaries() {
        let arena = Arena::standard();
        let obstacles = arena.obstacles(&left_correct(), PORTAL_HIDDEN_Y);
        for (x, z) in [(-19.8, 0.0), (19.8, 0.0), (0.0, 29.0), (0.0, -29.0)] {
            let report = evaluate(&vehicle_at(x, z), &obstacles, false);
            assert!(report.boundary, "({x}, {z})");
            assert_eq!(report.most_urgent(), Some(CollisionEvent::Boundary));
        }
    }

    #[test]
    fn test_portal_only_reachable_when_raised() {
        let arena = Arena::standard();
        let hidden = arena.obstacles(&left_correct(), PORTAL_HIDDEN_Y);
        assert!(!evaluate(&vehicle_at(0.0, -22.0), &hidden, true).portal);

        let open = arena.obstacles(&left_correct(), PORTAL_OPEN_Y);
        let report = evaluate(&vehicle_at(0.0, -22.0), &open, true);
        assert!(report.portal);
        assert_eq!(report.most_urgent(), Some(CollisionEvent::Portal));
    }

    #[test]
    fn test_answer_outranks_other_contacts() {
        let report = CollisionReport {
            answer: Some(CollisionEvent::IncorrectAnswer(TargetSlot::Right)),
            portal: true,
            boundary: true,
        };
        assert_eq!(
            report.most_urgent(),
            Some(CollisionEvent::IncorrectAnswer(TargetSlot::Right))
        );
    }
}
