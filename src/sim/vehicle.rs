//! Vehicle transform
//!
//! Arcade steering, not physics: constant speed while a throttle key is held
//! and yaw only while moving.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;
use crate::normalize_angle;

/// Collider box size and its offset inside the vehicle frame
const COLLIDER_SIZE: Vec3 = Vec3::new(1.2, 0.95, 3.21);
const COLLIDER_OFFSET: Vec3 = Vec3::new(0.0, -0.58, 0.165);

/// Held keys for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveKeys {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub boost: bool,
}

impl DriveKeys {
    pub fn throttle(&self) -> bool {
        self.forward || self.backward
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub position: Vec3,
    /// Rotation about +Y (radians); 0 faces -Z
    pub yaw: f32,
}

impl Default for Vehicle {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
        }
    }
}

impl Vehicle {
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    /// Unit vector the vehicle is facing
    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::NEG_Z
    }

    /// Teleport back to the start pose
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advance by one frame of held keys. Returns true if a throttle key was held.
    pub fn drive(&mut self, keys: &DriveKeys, dt: f32) -> bool {
        let mut distance = DRIVE_SPEED * dt;
        let mut angle = TURN_RATE * dt;
        if keys.boost {
            distance *= BOOST_FACTOR;
            angle *= BOOST_FACTOR;
        }

        if keys.forward {
            self.position += self.forward() * distance;
        }
        if keys.backward {
            self.position -= self.forward() * distance * REVERSE_FACTOR;
        }

        let mut yaw_delta = 0.0;
        if keys.forward && keys.left {
            yaw_delta += angle;
        }
        if keys.forward && keys.right {
            yaw_delta -= angle;
        }
        if keys.backward && keys.left {
            yaw_delta -= angle;
        }
        if keys.backward && keys.right {
            yaw_delta += angle;
        }
        self.yaw = normalize_angle(self.yaw + yaw_delta);

        keys.throttle()
    }

    /// World-space bounds of the rotated collider box
    pub fn collider(&self) -> Aabb {
        let rotation = self.rotation();
        let half = COLLIDER_SIZE * 0.5;
        let corners = (0..8).map(|i| {
            let sign = Vec3::new(
                if i & 1 == 0 { -1.0 } else { 1.0 },
                if i & 2 == 0 { -1.0 } else { 1.0 },
                if i & 4 == 0 { -1.0 } else { 1.0 },
            );
            self.position + rotation * (COLLIDER_OFFSET + half * sign)
        });
        Aabb::from_points(corners)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_moves_toward_negative_z() {
        let mut vehicle = Vehicle::default();
        let keys = DriveKeys {
            forward: true,
            ..Default::default()
        };
        assert!(vehicle.drive(&keys, 1.0));
        assert!((vehicle.position.z + DRIVE_SPEED).abs() < 1e-4);
        assert!(vehicle.position.x.abs() < 1e-4);
    }

    #[test]
    fn test_reverse_is_slower() {
        let mut vehicle = Vehicle::default();
        let keys = DriveKeys {
            backward: true,
            ..Default::default()
        };
        vehicle.drive(&keys, 1.0);
        assert!((vehicle.position.z - DRIVE_SPEED * REVERSE_FACTOR).abs() < 1e-4);
    }

    #[test]
    fn test_steering_requires_throttle() {
        let mut vehicle = Vehicle::default();
        let keys = DriveKeys {
            left: true,
            ..Default::default()
        };
        assert!(!vehicle.drive(&keys, 1.0));
        assert_eq!(vehicle.yaw, 0.0);
    }

    #[test]
    fn test_left_turn_heads_toward_negative_x() {
        let mut vehicle = Vehicle::default();
        let keys = DriveKeys {
            forward: true,
            left: true,
            ..Default::default()
        };
        for _ in 0..30 {
            vehicle.drive(&keys, SIM_DT);
        }
        assert!(vehicle.yaw > 0.0);
        assert!(vehicle.forward().x < 0.0);
    }

    #[test]
    fn test_boost_scales_distance() {
        let mut plain = Vehicle::default();
        let mut boosted = Vehicle::default();
        let keys = DriveKeys {
            forward: true,
            ..Default::default()
        };
        plain.drive(&keys, 0.5);
        boosted.drive(
            &DriveKeys {
                boost: true,
                ..keys
            },
            0.5,
        );
        assert!((boosted.position.z / plain.position.z - BOOST_FACTOR).abs() < 1e-4);
    }

    #[test]
    fn test_collider_rotates_with_vehicle() {
        let mut vehicle = Vehicle::default();
        let straight = vehicle.collider();
        assert!((straight.center().z - COLLIDER_OFFSET.z).abs() < 1e-4);
        assert!((straight.max.x - straight.min.x - COLLIDER_SIZE.x).abs() < 1e-4);

        vehicle.yaw = std::f32::consts::FRAC_PI_2;
        let sideways = vehicle.collider();
        // Long axis now lies along X
        assert!((sideways.max.x - sideways.min.x - COLLIDER_SIZE.z).abs() < 1e-3);
    }
}
