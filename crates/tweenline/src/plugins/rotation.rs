use glam::{EulerRot, Quat, Vec3};

use super::Plugin;
use crate::extensions::easing::Ease;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationOptions {
    /// Wrap each axis change into [-180, 180] so the rotation never spins
    /// more than half a turn per axis.
    pub shortest: bool,
}

impl Default for RotationOptions {
    fn default() -> Self {
        Self { shortest: true }
    }
}

/// Rotation interpolated as Euler angles in degrees (Y, then X, then Z),
/// written back as a quaternion. Allows multi-turn spins when `shortest`
/// is off.
#[derive(Debug, Clone, Copy, Default)]
pub struct RotationPlugin;

pub fn euler_degrees(q: Quat) -> Vec3 {
    let (y, x, z) = q.to_euler(EulerRot::YXZ);
    Vec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
}

pub fn quat_from_degrees(euler: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        euler.y.to_radians(),
        euler.x.to_radians(),
        euler.z.to_radians(),
    )
}

fn wrap_degrees(d: f32) -> f32 {
    let d = d % 360.0;
    if d > 180.0 {
        d - 360.0
    } else if d < -180.0 {
        d + 360.0
    } else {
        d
    }
}

impl Plugin for RotationPlugin {
    type Value = Quat;
    type Data = Vec3;
    type Options = RotationOptions;

    fn to_data(&self, _options: &RotationOptions, value: &Quat) -> Vec3 {
        euler_degrees(*value)
    }

    fn change_value(&self, options: &RotationOptions, start: &Vec3, end: &Vec3) -> Vec3 {
        let change = *end - *start;
        if options.shortest {
            Vec3::new(wrap_degrees(change.x), wrap_degrees(change.y), wrap_degrees(change.z))
        } else {
            change
        }
    }

    fn relative_end_value(&self, _options: &RotationOptions, start: &Vec3, change: &Vec3) -> Vec3 {
        *start + *change
    }

    fn incremental_start(&self, _options: &RotationOptions, start: &Vec3, change: &Vec3, loop_index: u32) -> Vec3 {
        *start + *change * loop_index as f32
    }

    fn calculate(
        &self,
        _options: &RotationOptions,
        _current: Option<&Quat>,
        elapsed: f32,
        start: &Vec3,
        change: &Vec3,
        duration: f32,
        ease: &Ease,
    ) -> Quat {
        quat_from_degrees(Vec3::new(
            ease.evaluate(elapsed, start.x, change.x, duration),
            ease.evaluate(elapsed, start.y, change.y, duration),
            ease.evaluate(elapsed, start.z, change.z, duration),
        ))
    }
}

/// Spherical interpolation between two orientations.
/// Always takes the shortest arc.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuatPlugin;

impl Plugin for QuatPlugin {
    type Value = Quat;
    type Data = Quat;
    type Options = ();

    fn to_data(&self, _options: &(), value: &Quat) -> Quat {
        *value
    }

    fn change_value(&self, _options: &(), start: &Quat, end: &Quat) -> Quat {
        (*end * start.inverse()).normalize()
    }

    fn relative_end_value(&self, _options: &(), start: &Quat, change: &Quat) -> Quat {
        (*change * *start).normalize()
    }

    fn calculate(
        &self,
        _options: &(),
        _current: Option<&Quat>,
        elapsed: f32,
        start: &Quat,
        change: &Quat,
        duration: f32,
        ease: &Ease,
    ) -> Quat {
        let end = (*change * *start).normalize();
        start.slerp(end, ease.factor(elapsed, duration))
    }
}
