use serde::{Deserialize, Serialize};

use crate::api::types::LoopType;
use crate::extensions::easing::Easing;

/// Scheduler-wide configuration and the defaults applied to newly
/// registered nodes that did not set the value themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TweenSettings {
    /// Ease for nodes created without one (default: QuadOut).
    pub default_ease: Easing,
    /// Loop type used when `with_loops` was not called.
    pub default_loop_type: LoopType,
    /// Remove nodes from the scheduler once they complete (default: true).
    pub default_auto_kill: bool,
    /// Start playing as soon as the node is registered (default: true).
    pub default_autoplay: bool,
    /// Global multiplier for `Normal` and `Fixed` update types.
    pub time_scale: f32,
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Cap on fixed steps run per `advance` call (default: 10).
    pub max_fixed_steps: u32,
    /// Initial arena capacity (default: 64).
    pub capacity: usize,
}

impl Default for TweenSettings {
    fn default() -> Self {
        Self {
            default_ease: Easing::QuadOut,
            default_loop_type: LoopType::Restart,
            default_auto_kill: true,
            default_autoplay: true,
            time_scale: 1.0,
            fixed_dt: 1.0 / 60.0,
            max_fixed_steps: 10,
            capacity: 64,
        }
    }
}

impl TweenSettings {
    /// Parse settings from a JSON string. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }

    pub fn with_default_ease(mut self, ease: Easing) -> Self {
        self.default_ease = ease;
        self
    }

    pub fn with_default_auto_kill(mut self, auto_kill: bool) -> Self {
        self.default_auto_kill = auto_kill;
        self
    }

    pub fn with_default_autoplay(mut self, autoplay: bool) -> Self {
        self.default_autoplay = autoplay;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{ "time_scale": 0.5, "default_loop_type": "Yoyo" }"#;
        let settings = TweenSettings::from_json(json).unwrap();
        assert_eq!(settings.time_scale, 0.5);
        assert_eq!(settings.default_loop_type, LoopType::Yoyo);
        assert_eq!(settings.default_ease, Easing::QuadOut);
        assert!(settings.default_auto_kill);
        assert_eq!(settings.max_fixed_steps, 10);
    }

    #[test]
    fn rejects_unknown_ease() {
        let json = r#"{ "default_ease": "Wobble" }"#;
        assert!(TweenSettings::from_json(json).is_err());
    }
}
