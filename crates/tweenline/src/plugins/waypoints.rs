// plugins/waypoints.rs
//
// Punch and shake tweens: instead of a flat start→end change, the plugin
// walks a list of offsets from the start value, one eased segment each.
// The last offset is always zero so the property settles where it began.

use glam::{Quat, Vec3};

use super::vector::VectorOptions;
use super::Plugin;
use crate::extensions::easing::Ease;
use crate::extensions::rng::Rng;

/// Parameters for `Tween::shake`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShakeParams {
    /// Maximum distance of the first waypoint.
    pub strength: f32,
    /// Waypoints per second.
    pub vibrato: u32,
    /// Random spread in degrees (0 shakes along a single direction).
    pub randomness: f32,
    pub seed: u64,
}

impl Default for ShakeParams {
    fn default() -> Self {
        Self {
            strength: 1.0,
            vibrato: 10,
            randomness: 90.0,
            seed: 1,
        }
    }
}

/// Offset-path plugin behind punch and shake tweens.
#[derive(Debug, Clone, Default)]
pub struct WaypointPlugin {
    offsets: Vec<Vec3>,
    durations: Vec<f32>,
}

fn iteration_count(duration: f32, vibrato: u32) -> usize {
    ((vibrato as f32 * duration) as usize).max(2)
}

/// Segment lengths grow linearly and are normalized to sum to `duration`.
fn segment_durations(duration: f32, count: usize) -> Vec<f32> {
    let raw: Vec<f32> = (0..count)
        .map(|i| duration * (i + 1) as f32 / count as f32)
        .collect();
    let sum: f32 = raw.iter().sum();
    if sum <= 0.0 {
        return vec![0.0; count];
    }
    let k = duration / sum;
    raw.into_iter().map(|d| d * k).collect()
}

impl WaypointPlugin {
    pub fn new(offsets: Vec<Vec3>, durations: Vec<f32>) -> Self {
        debug_assert_eq!(offsets.len(), durations.len());
        Self { offsets, durations }
    }

    /// Elastic hit towards `punch` and back, overshooting past the start by
    /// up to `elasticity` (0..=1) of the punch on each rebound.
    pub fn punch(punch: Vec3, duration: f32, vibrato: u32, elasticity: f32) -> Self {
        let elasticity = elasticity.clamp(0.0, 1.0);
        let count = iteration_count(duration, vibrato);
        let mut strength = punch.length();
        let decay = strength / count as f32;

        let mut offsets = Vec::with_capacity(count);
        for i in 0..count {
            if i == count - 1 {
                offsets.push(Vec3::ZERO);
                break;
            }
            let offset = if i == 0 {
                punch
            } else if i % 2 != 0 {
                -punch.clamp_length_max(strength * elasticity)
            } else {
                punch.clamp_length_max(strength)
            };
            offsets.push(offset);
            strength -= decay;
        }
        Self::new(offsets, segment_durations(duration, count))
    }

    /// Decaying random jitter in the XY plane, tilted around Y by the
    /// randomness spread.
    pub fn shake(duration: f32, params: &ShakeParams) -> Self {
        let mut rng = Rng::new(params.seed);
        let count = iteration_count(duration, params.vibrato);
        let mut magnitude = params.strength;
        let decay = magnitude / count as f32;
        let mut angle = rng.range(0.0, 360.0);

        let mut offsets = Vec::with_capacity(count);
        for i in 0..count {
            if i == count - 1 {
                offsets.push(Vec3::ZERO);
                break;
            }
            if i > 0 {
                angle = angle - 180.0 + rng.range(-params.randomness, params.randomness);
            }
            let rad = angle.to_radians();
            let planar = Vec3::new(magnitude * rad.cos(), magnitude * rad.sin(), 0.0);
            let tilt = Quat::from_rotation_y(rng.range(-params.randomness, params.randomness).to_radians());
            offsets.push(tilt * planar);
            magnitude -= decay;
        }
        Self::new(offsets, segment_durations(duration, count))
    }

    pub fn waypoints(&self) -> &[Vec3] {
        &self.offsets
    }

    pub fn segment_lengths(&self) -> &[f32] {
        &self.durations
    }
}

impl Plugin for WaypointPlugin {
    type Value = Vec3;
    type Data = Vec3;
    type Options = VectorOptions;

    fn to_data(&self, _options: &VectorOptions, value: &Vec3) -> Vec3 {
        *value
    }

    fn change_value(&self, _options: &VectorOptions, _start: &Vec3, _end: &Vec3) -> Vec3 {
        Vec3::ZERO
    }

    fn relative_end_value(&self, _options: &VectorOptions, start: &Vec3, _change: &Vec3) -> Vec3 {
        *start
    }

    fn calculate(
        &self,
        options: &VectorOptions,
        _current: Option<&Vec3>,
        elapsed: f32,
        start: &Vec3,
        _change: &Vec3,
        duration: f32,
        ease: &Ease,
    ) -> Vec3 {
        let total: f32 = self.durations.iter().sum();
        if self.offsets.is_empty() || total <= 0.0 || duration <= 0.0 {
            return *start;
        }
        let t = (elapsed * total / duration).clamp(0.0, total);

        let last = self.offsets.len() - 1;
        let mut acc = 0.0;
        let mut segment = last;
        for (i, d) in self.durations.iter().enumerate() {
            if t <= acc + d || i == last {
                segment = i;
                break;
            }
            acc += d;
        }

        let from = if segment == 0 { *start } else { *start + self.offsets[segment - 1] };
        let to = *start + self.offsets[segment];
        let seg_elapsed = t - acc;
        let seg_duration = self.durations[segment];
        let mut out = from;
        for lane in 0..3 {
            let v = ease.evaluate(seg_elapsed, from[lane], to[lane] - from[lane], seg_duration);
            out[lane] = if options.snapping { v.round() } else { v };
        }
        out
    }
}
