use std::marker::PhantomData;
use std::ops::{Add, IndexMut, Mul, Sub};

use glam::{Vec2, Vec3, Vec4};

use super::Plugin;
use crate::extensions::easing::Ease;

/// Restricts a vector tween to a single component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AxisConstraint {
    #[default]
    None,
    X,
    Y,
    Z,
    W,
}

impl AxisConstraint {
    fn lane(self) -> Option<usize> {
        match self {
            AxisConstraint::None => None,
            AxisConstraint::X => Some(0),
            AxisConstraint::Y => Some(1),
            AxisConstraint::Z => Some(2),
            AxisConstraint::W => Some(3),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VectorOptions {
    pub axis: AxisConstraint,
    pub snapping: bool,
}

/// Fixed-size float vectors the vector plugin can animate lane by lane.
pub trait Lanes:
    Copy
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f32, Output = Self>
    + IndexMut<usize, Output = f32>
    + 'static
{
    const LANES: usize;
}

impl Lanes for Vec2 {
    const LANES: usize = 2;
}

impl Lanes for Vec3 {
    const LANES: usize = 3;
}

impl Lanes for Vec4 {
    const LANES: usize = 4;
}

/// Component-wise interpolation for glam vectors.
pub struct VectorPlugin<V>(PhantomData<V>);

pub type Vec2Plugin = VectorPlugin<Vec2>;
pub type Vec3Plugin = VectorPlugin<Vec3>;
pub type Vec4Plugin = VectorPlugin<Vec4>;

impl<V> VectorPlugin<V> {
    pub fn new() -> Self {
        VectorPlugin(PhantomData)
    }
}

impl<V> Default for VectorPlugin<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for VectorPlugin<V> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<V> Copy for VectorPlugin<V> {}

impl<V: Lanes> Plugin for VectorPlugin<V> {
    type Value = V;
    type Data = V;
    type Options = VectorOptions;

    fn to_data(&self, _options: &VectorOptions, value: &V) -> V {
        *value
    }

    fn change_value(&self, _options: &VectorOptions, start: &V, end: &V) -> V {
        *end - *start
    }

    fn relative_end_value(&self, _options: &VectorOptions, start: &V, change: &V) -> V {
        *start + *change
    }

    fn incremental_start(&self, _options: &VectorOptions, start: &V, change: &V, loop_index: u32) -> V {
        *start + *change * loop_index as f32
    }

    fn reads_current(&self, options: &VectorOptions) -> bool {
        options.axis != AxisConstraint::None
    }

    fn calculate(
        &self,
        options: &VectorOptions,
        current: Option<&V>,
        elapsed: f32,
        start: &V,
        change: &V,
        duration: f32,
        ease: &Ease,
    ) -> V {
        let snap = |v: f32| if options.snapping { v.round() } else { v };
        match (options.axis.lane().filter(|lane| *lane < V::LANES), current) {
            (Some(lane), Some(current)) => {
                let mut out = *current;
                out[lane] = snap(ease.evaluate(elapsed, start[lane], change[lane], duration));
                out
            }
            _ => {
                let mut out = *start;
                for lane in 0..V::LANES {
                    out[lane] = snap(ease.evaluate(elapsed, start[lane], change[lane], duration));
                }
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extensions::easing::Easing;

    #[test]
    fn interpolates_every_lane() {
        let ease = Ease::from(Easing::Linear);
        let opts = VectorOptions::default();
        let plugin = Vec3Plugin::new();
        let start = Vec3::ZERO;
        let change = plugin.change_value(&opts, &start, &Vec3::new(2.0, 4.0, 6.0));
        let v = plugin.calculate(&opts, None, 0.5, &start, &change, 1.0, &ease);
        assert_eq!(v, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn axis_constraint_keeps_other_lanes_live() {
        let ease = Ease::from(Easing::Linear);
        let opts = VectorOptions { axis: AxisConstraint::X, snapping: false };
        let plugin = Vec2Plugin::new();
        assert!(plugin.reads_current(&opts));
        let current = Vec2::new(0.0, 42.0);
        let v = plugin.calculate(&opts, Some(&current), 1.0, &Vec2::ZERO, &Vec2::new(10.0, 99.0), 2.0, &ease);
        assert_eq!(v, Vec2::new(5.0, 42.0));
    }

    #[test]
    fn snapping_rounds_each_lane() {
        let ease = Ease::from(Easing::Linear);
        let opts = VectorOptions { axis: AxisConstraint::None, snapping: true };
        let v = Vec2Plugin::new().calculate(&opts, None, 0.3, &Vec2::ZERO, &Vec2::new(10.0, 1.0), 1.0, &ease);
        assert_eq!(v, Vec2::new(3.0, 0.0));
    }
}
