//! Math types for PetalSonic AL

pub use glam::{Quat, Vec3};

/// Position plus rotation, used to place the listener.
///
/// Uses a right-handed frame where an unrotated pose faces `-Z` with `+Y` up,
/// matching the driver's default listener orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Pose at `position` turned to face `target`.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let forward = (target - position).normalize_or_zero();
        let rotation = if forward == Vec3::ZERO {
            Quat::IDENTITY
        } else {
            Quat::from_rotation_arc(-Vec3::Z, forward)
        };
        Self { position, rotation }
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * (-Vec3::Z)
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// The six floats the driver expects for listener orientation:
    /// the forward ("at") vector followed by the up vector.
    pub fn orientation(&self) -> [f32; 6] {
        let f = self.forward();
        let u = self.up();
        [f.x, f.y, f.z, u.x, u.y, u.z]
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

pub(crate) fn vec3_from_slice(values: &[f32]) -> Vec3 {
    match values {
        [x, y, z, ..] => Vec3::new(*x, *y, *z),
        _ => Vec3::ZERO,
    }
}
