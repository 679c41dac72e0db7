pub mod api;
pub mod core;
pub mod extensions;
pub mod plugins;

// Re-export key types at crate root for convenience
pub use api::error::TweenError;
pub use api::settings::TweenSettings;
pub use api::types::{LoopType, Loops, TargetKey, TweenFilter, TweenId, TweenTag, UpdateType};
pub use core::{FixedTimestep, Tween, TweenCallback, TweenScheduler, TweenStatus};
pub use extensions::{Ease, EaseFn, Easing, Rng};
pub use plugins::{
    Accessor, AxisConstraint, Color, ColorOptions, ColorPlugin, FloatOptions, FloatPlugin, Plugin,
    Property, QuatPlugin, RotationOptions, RotationPlugin, ShakeParams, Vec2Plugin, Vec3Plugin,
    Vec4Plugin, VectorOptions, VectorPlugin, WaypointPlugin,
};
