// extensions/easing.rs
//
// Easing table plus the injectable `Ease` wrapper that plugins call.
// Plugins only ever see `Ease::evaluate(elapsed, start, change, duration)`,
// so a host can swap in its own curve without touching the core.

use std::f32::consts::PI;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Built-in easing curves. `In` eases the start, `Out` the end, `InOut` both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    #[default]
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    QuartIn,
    QuartOut,
    QuartInOut,
    QuintIn,
    QuintOut,
    QuintInOut,
    SineIn,
    SineOut,
    SineInOut,
    ExpoIn,
    ExpoOut,
    ExpoInOut,
    CircIn,
    CircOut,
    CircInOut,
    /// Pulls back before leaving (In) or overshoots the end (Out).
    BackIn,
    BackOut,
    BackInOut,
    ElasticIn,
    ElasticOut,
    ElasticInOut,
    BounceIn,
    BounceOut,
    BounceInOut,
}

#[derive(Clone, Copy)]
enum Curve {
    Power(i32),
    Sine,
    Expo,
    Circ,
    Back(f32),
    Elastic,
    Bounce,
}

#[derive(Clone, Copy)]
enum Shape {
    In,
    Out,
    InOut,
}

const BACK_OVERSHOOT: f32 = 1.70158;

impl Easing {
    fn parts(self) -> Option<(Curve, Shape)> {
        use Easing::*;
        let back = Curve::Back(BACK_OVERSHOOT);
        Some(match self {
            Linear => return None,
            QuadIn => (Curve::Power(2), Shape::In),
            QuadOut => (Curve::Power(2), Shape::Out),
            QuadInOut => (Curve::Power(2), Shape::InOut),
            CubicIn => (Curve::Power(3), Shape::In),
            CubicOut => (Curve::Power(3), Shape::Out),
            CubicInOut => (Curve::Power(3), Shape::InOut),
            QuartIn => (Curve::Power(4), Shape::In),
            QuartOut => (Curve::Power(4), Shape::Out),
            QuartInOut => (Curve::Power(4), Shape::InOut),
            QuintIn => (Curve::Power(5), Shape::In),
            QuintOut => (Curve::Power(5), Shape::Out),
            QuintInOut => (Curve::Power(5), Shape::InOut),
            SineIn => (Curve::Sine, Shape::In),
            SineOut => (Curve::Sine, Shape::Out),
            SineInOut => (Curve::Sine, Shape::InOut),
            ExpoIn => (Curve::Expo, Shape::In),
            ExpoOut => (Curve::Expo, Shape::Out),
            ExpoInOut => (Curve::Expo, Shape::InOut),
            CircIn => (Curve::Circ, Shape::In),
            CircOut => (Curve::Circ, Shape::Out),
            CircInOut => (Curve::Circ, Shape::InOut),
            BackIn => (back, Shape::In),
            BackOut => (back, Shape::Out),
            // the two halves each get a stronger pull
            BackInOut => (Curve::Back(BACK_OVERSHOOT * 1.525), Shape::InOut),
            ElasticIn => (Curve::Elastic, Shape::In),
            ElasticOut => (Curve::Elastic, Shape::Out),
            ElasticInOut => (Curve::Elastic, Shape::InOut),
            BounceIn => (Curve::Bounce, Shape::In),
            BounceOut => (Curve::Bounce, Shape::Out),
            BounceInOut => (Curve::Bounce, Shape::InOut),
        })
    }

    /// Eased progress for normalized time `t` (clamped to [0, 1]).
    /// Starts at 0 and ends at 1; Back and Elastic leave that range in between.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        let Some((curve, shape)) = self.parts() else {
            return t;
        };
        match shape {
            Shape::In => curve.ease_in(t),
            Shape::Out => 1.0 - curve.ease_in(1.0 - t),
            Shape::InOut if t < 0.5 => curve.ease_in(2.0 * t) / 2.0,
            Shape::InOut => 1.0 - curve.ease_in(2.0 - 2.0 * t) / 2.0,
        }
    }
}

impl Curve {
    /// The accelerating form; Out and InOut are mirrored from it.
    fn ease_in(self, t: f32) -> f32 {
        match self {
            Curve::Power(n) => t.powi(n),
            Curve::Sine => 1.0 - (t * PI / 2.0).cos(),
            Curve::Expo if t <= 0.0 => 0.0,
            Curve::Expo => 2.0_f32.powf(10.0 * t - 10.0),
            Curve::Circ => 1.0 - (1.0 - t * t).max(0.0).sqrt(),
            Curve::Back(s) => t * t * ((s + 1.0) * t - s),
            Curve::Elastic if t <= 0.0 || t >= 1.0 => t,
            Curve::Elastic => {
                const PERIOD: f32 = (2.0 * PI) / 3.0;
                -(2.0_f32.powf(10.0 * t - 10.0)) * ((t * 10.0 - 10.75) * PERIOD).sin()
            }
            Curve::Bounce => 1.0 - bounce_out(1.0 - t),
        }
    }
}

fn bounce_out(t: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;
    let (shift, floor) = if t < 1.0 / D1 {
        (0.0, 0.0)
    } else if t < 2.0 / D1 {
        (1.5 / D1, 0.75)
    } else if t < 2.5 / D1 {
        (2.25 / D1, 0.9375)
    } else {
        (2.625 / D1, 0.984375)
    };
    let t = t - shift;
    N1 * t * t + floor
}

// ── Injected ease function ───────────────────────────────────────────────

/// Custom ease signature: `(elapsed, start, change, duration) -> value`.
pub type EaseFn = Rc<dyn Fn(f32, f32, f32, f32) -> f32>;

/// The ease a node evaluates its plugin with.
#[derive(Clone)]
pub enum Ease {
    Preset(Easing),
    Custom(EaseFn),
}

impl Ease {
    /// Wrap a custom `(elapsed, start, change, duration)` function.
    pub fn custom(f: impl Fn(f32, f32, f32, f32) -> f32 + 'static) -> Self {
        Ease::Custom(Rc::new(f))
    }

    /// Value at `elapsed` for a single scalar channel.
    /// A non-positive duration evaluates to the end value.
    #[inline]
    pub fn evaluate(&self, elapsed: f32, start: f32, change: f32, duration: f32) -> f32 {
        match self {
            Ease::Preset(easing) => {
                if duration <= 0.0 {
                    return start + change;
                }
                start + change * easing.apply(elapsed / duration)
            }
            Ease::Custom(f) => f(elapsed, start, change, duration),
        }
    }

    /// Normalized factor in [0, 1] (may overshoot for Back/Elastic).
    /// Used by plugins that blend whole values (quaternion slerp).
    #[inline]
    pub fn factor(&self, elapsed: f32, duration: f32) -> f32 {
        self.evaluate(elapsed, 0.0, 1.0, duration)
    }
}

impl Default for Ease {
    fn default() -> Self {
        Ease::Preset(Easing::default())
    }
}

impl From<Easing> for Ease {
    fn from(easing: Easing) -> Self {
        Ease::Preset(easing)
    }
}

impl fmt::Debug for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ease::Preset(easing) => f.debug_tuple("Preset").field(easing).finish(),
            Ease::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_endpoints() {
        assert_eq!(Easing::Linear.apply(0.0), 0.0);
        assert_eq!(Easing::Linear.apply(1.0), 1.0);
        assert_eq!(Easing::Linear.apply(0.5), 0.5);
    }

    #[test]
    fn quad_out_faster_start() {
        // QuadOut should be > 0.5 at t=0.5 (faster start, slower end)
        let mid = Easing::QuadOut.apply(0.5);
        assert!(mid > 0.5, "QuadOut at 0.5 should be > 0.5, got {}", mid);
    }

    #[test]
    fn back_overshoots() {
        // BackOut should overshoot slightly
        let early = Easing::BackOut.apply(0.3);
        assert!(early > 0.3, "BackOut should overshoot");
    }

    #[test]
    fn every_curve_spans_zero_to_one() {
        use Easing::*;
        for easing in [
            QuadIn, QuadOut, QuadInOut, CubicIn, CubicOut, CubicInOut, QuartIn, QuartOut,
            QuartInOut, QuintIn, QuintOut, QuintInOut, SineIn, SineOut, SineInOut, ExpoIn,
            ExpoOut, ExpoInOut, CircIn, CircOut, CircInOut, BackIn, BackOut, BackInOut,
            ElasticIn, ElasticOut, ElasticInOut, BounceIn, BounceOut, BounceInOut,
        ] {
            assert!(easing.apply(0.0).abs() < 1e-4, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-4, "{easing:?} at 1");
        }
    }

    #[test]
    fn out_mirrors_in() {
        for t in [0.1, 0.35, 0.8] {
            let mirrored = 1.0 - Easing::CubicIn.apply(1.0 - t);
            assert!((Easing::CubicOut.apply(t) - mirrored).abs() < 1e-6);
        }
        assert!((Easing::SineInOut.apply(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn preset_evaluates_in_start_change_form() {
        let ease = Ease::from(Easing::Linear);
        let result = ease.evaluate(1.0, 100.0, 100.0, 2.0);
        assert!((result - 150.0).abs() < 0.001);
    }

    #[test]
    fn zero_duration_lands_on_end() {
        let ease = Ease::from(Easing::QuadIn);
        assert_eq!(ease.evaluate(0.0, 3.0, 4.0, 0.0), 7.0);
    }

    #[test]
    fn custom_ease_is_called_verbatim() {
        let step = Ease::custom(|t, b, c, d| if t < d { b } else { b + c });
        assert_eq!(step.evaluate(0.9, 0.0, 10.0, 1.0), 0.0);
        assert_eq!(step.evaluate(1.0, 0.0, 10.0, 1.0), 10.0);
        assert_eq!(step.factor(1.0, 1.0), 1.0);
    }
}
