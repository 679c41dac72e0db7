// plugins/mod.rs
//
// Per-value-type interpolation strategies.
//
// A plugin knows three things about its value type: how to compute a change
// from start/end, how to rebuild an end value from a relative change, and how
// to evaluate the value at a given elapsed time with an injected ease. The
// core never looks inside the values; it only hands them back to the plugin.
//
// Usage:
//   let prop = Property::new(move || cell.get(), move |v| cell2.set(v));
//   let tween = Tween::to(prop, FloatPlugin, 10.0, 2.0);

pub mod color;
pub mod float;
pub mod rotation;
pub mod vector;
pub mod waypoints;

use crate::extensions::easing::Ease;

pub use color::{Color, ColorOptions, ColorPlugin};
pub use float::{FloatOptions, FloatPlugin};
pub use rotation::{QuatPlugin, RotationOptions, RotationPlugin};
pub use vector::{AxisConstraint, Lanes, Vec2Plugin, Vec3Plugin, Vec4Plugin, VectorOptions, VectorPlugin};
pub use waypoints::{ShakeParams, WaypointPlugin};

/// Read/write capability over one animated property.
pub trait Accessor<T> {
    fn read(&self) -> T;
    fn write(&mut self, value: T);
}

/// `Accessor` built from a getter and a setter closure.
pub struct Property<G, S> {
    get: G,
    set: S,
}

impl<G, S> Property<G, S> {
    pub fn new(get: G, set: S) -> Self {
        Self { get, set }
    }
}

impl<T, G, S> Accessor<T> for Property<G, S>
where
    G: Fn() -> T,
    S: FnMut(T),
{
    fn read(&self) -> T {
        (self.get)()
    }

    fn write(&mut self, value: T) {
        (self.set)(value)
    }
}

/// Interpolation strategy for one value type.
pub trait Plugin: 'static {
    /// Type read from and written to the property.
    type Value: Clone + 'static;
    /// Space start, end and change values live in.
    type Data: Clone + 'static;
    type Options: Clone + Default + 'static;

    /// Convert a property value into interpolation space.
    fn to_data(&self, options: &Self::Options, value: &Self::Value) -> Self::Data;

    fn change_value(&self, options: &Self::Options, start: &Self::Data, end: &Self::Data) -> Self::Data;

    fn relative_end_value(&self, options: &Self::Options, start: &Self::Data, change: &Self::Data) -> Self::Data;

    /// Start value for loop `loop_index` of an incremental tween.
    /// Types without a meaningful accumulation keep the original start.
    fn incremental_start(
        &self,
        _options: &Self::Options,
        start: &Self::Data,
        _change: &Self::Data,
        _loop_index: u32,
    ) -> Self::Data {
        start.clone()
    }

    /// Whether `calculate` needs the live property value
    /// (axis constraints, alpha-only fades).
    fn reads_current(&self, _options: &Self::Options) -> bool {
        false
    }

    #[allow(clippy::too_many_arguments)]
    fn calculate(
        &self,
        options: &Self::Options,
        current: Option<&Self::Value>,
        elapsed: f32,
        start: &Self::Data,
        change: &Self::Data,
        duration: f32,
        ease: &Ease,
    ) -> Self::Value;
}
