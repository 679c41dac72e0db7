// core/tween.rs
//
// Builder for tweens and sequences. Nothing runs until the builder is handed
// to `TweenScheduler::add`, which fills unset options from `TweenSettings`
// and returns the handle.
//
// Usage:
//   let id = scheduler.add(
//       Tween::to(prop, FloatPlugin, 10.0, 2.0)
//           .with_ease(Easing::CubicOut)
//           .with_loops(3, LoopType::Yoyo)
//           .on_complete(|_| log::info!("done")),
//   )?;

use glam::Vec3;

use super::dispatch::{callback, Hook};
use super::node::{Node, NodeKind, NodeRef};
use super::scheduler::TweenScheduler;
use super::sequence::{self, SequenceData};
use super::tweener::TweenerCore;
use crate::api::error::TweenError;
use crate::api::types::{LoopType, Loops, TargetKey, TweenTag, UpdateType};
use crate::extensions::easing::{Ease, Easing};
use crate::plugins::{Accessor, Plugin, ShakeParams, VectorOptions, WaypointPlugin};

/// A tween or sequence under construction.
pub struct Tween {
    pub(crate) node: Node,
    pub(crate) autoplay: Option<bool>,
    pub(crate) auto_kill: Option<bool>,
    /// First configuration error; reported by `TweenScheduler::add`.
    pub(crate) error: Option<TweenError>,
}

fn leaf_duration(duration: f32) -> Result<f32, TweenError> {
    if !duration.is_finite() {
        return Err(TweenError::InvalidConfiguration(format!(
            "duration must be finite, got {duration}"
        )));
    }
    if duration < 0.0 {
        log::warn!("negative tween duration {duration} clamped to 0");
        return Ok(0.0);
    }
    Ok(duration)
}

impl Tween {
    fn leaf(kind: NodeKind, duration: f32) -> Self {
        let (duration, error) = match leaf_duration(duration) {
            Ok(d) => (d, None),
            Err(e) => (0.0, Some(e)),
        };
        Self {
            node: Node::new(kind, duration),
            autoplay: None,
            auto_kill: None,
            error,
        }
    }

    /// Animate the property from its value at first render to `end`.
    pub fn to<P, A>(accessor: A, plugin: P, end: P::Data, duration: f32) -> Self
    where
        P: Plugin,
        A: Accessor<P::Value> + 'static,
    {
        Self::to_with(accessor, plugin, P::Options::default(), end, duration)
    }

    pub fn to_with<P, A>(accessor: A, plugin: P, options: P::Options, end: P::Data, duration: f32) -> Self
    where
        P: Plugin,
        A: Accessor<P::Value> + 'static,
    {
        let core = TweenerCore::to(accessor, plugin, options, end);
        Self::leaf(NodeKind::Leaf(Box::new(core)), duration)
    }

    /// Animate from `from` back to the property's current value.
    /// `from` is written to the property immediately.
    pub fn from<P, A>(accessor: A, plugin: P, from: P::Data, duration: f32) -> Self
    where
        P: Plugin,
        A: Accessor<P::Value> + 'static,
    {
        Self::from_with(accessor, plugin, P::Options::default(), from, duration)
    }

    pub fn from_with<P, A>(accessor: A, plugin: P, options: P::Options, from: P::Data, duration: f32) -> Self
    where
        P: Plugin,
        A: Accessor<P::Value> + 'static,
    {
        let core = TweenerCore::from(accessor, plugin, options, from);
        Self::leaf(NodeKind::Leaf(Box::new(core)), duration)
    }

    /// Elastic punch towards `punch` and back to the starting value.
    /// `vibrato` is oscillations per second, `elasticity` (0..=1) how far
    /// each rebound overshoots the start.
    pub fn punch<A>(accessor: A, punch: Vec3, duration: f32, vibrato: u32, elasticity: f32) -> Self
    where
        A: Accessor<Vec3> + 'static,
    {
        let plugin = WaypointPlugin::punch(punch, duration.max(0.0), vibrato, elasticity);
        let core = TweenerCore::path(accessor, plugin, VectorOptions::default());
        Self::leaf(NodeKind::Leaf(Box::new(core)), duration).with_ease(Easing::QuadOut)
    }

    /// Decaying random shake around the starting value.
    pub fn shake<A>(accessor: A, duration: f32, params: ShakeParams) -> Self
    where
        A: Accessor<Vec3> + 'static,
    {
        let plugin = WaypointPlugin::shake(duration.max(0.0), &params);
        let core = TweenerCore::path(accessor, plugin, VectorOptions::default());
        Self::leaf(NodeKind::Leaf(Box::new(core)), duration).with_ease(Easing::QuadOut)
    }

    /// Empty sequence. Children are added with `append`, `insert` and friends.
    pub fn sequence() -> Self {
        Self {
            node: Node::new(NodeKind::Sequence(SequenceData::default()), 0.0),
            autoplay: None,
            auto_kill: None,
            error: None,
        }
    }

    /// Seconds per loop (for a sequence, its current timeline length).
    pub fn duration(&self) -> f32 {
        self.node.duration
    }

    pub fn is_sequence(&self) -> bool {
        self.node.is_sequence()
    }

    fn fail(mut self, error: TweenError) -> Self {
        if self.error.is_none() {
            self.error = Some(error);
        }
        self
    }

    // -- Builder methods --

    /// Tag used by the scheduler's group operations.
    pub fn with_id(mut self, id: impl Into<TweenTag>) -> Self {
        self.node.tag = Some(id.into());
        self
    }

    /// Associate the node with a target object for `*_by(TargetKey)` filters.
    pub fn with_target(mut self, target: impl Into<TargetKey>) -> Self {
        self.node.target = Some(target.into());
        self
    }

    /// Loop count (zero plays once) and how loops repeat.
    pub fn with_loops(mut self, loops: impl Into<Loops>, loop_type: LoopType) -> Self {
        self.node.loops = match loops.into() {
            Loops::Finite(0) => Loops::Finite(1),
            loops => loops,
        };
        self.node.loop_type = Some(loop_type);
        self
    }

    pub fn with_ease(mut self, ease: impl Into<Ease>) -> Self {
        self.node.ease = Some(ease.into());
        self
    }

    /// Remove from the scheduler once complete (default from settings).
    pub fn with_auto_kill(mut self, auto_kill: bool) -> Self {
        self.auto_kill = Some(auto_kill);
        self
    }

    /// Seconds to wait before the first forward step.
    pub fn with_delay(mut self, delay: f32) -> Self {
        if !delay.is_finite() || delay < 0.0 {
            return self.fail(TweenError::InvalidConfiguration(format!(
                "delay must be finite and non-negative, got {delay}"
            )));
        }
        self.node.delay = delay;
        self
    }

    /// Per-node time multiplier, applied on top of the global scale.
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        if !time_scale.is_finite() || time_scale < 0.0 {
            return self.fail(TweenError::InvalidConfiguration(format!(
                "time scale must be finite and non-negative, got {time_scale}"
            )));
        }
        self.node.time_scale = time_scale;
        self
    }

    pub fn with_update_type(mut self, update_type: UpdateType) -> Self {
        self.node.update_type = update_type;
        self
    }

    /// Treat the end value (or the from value) as an offset from the
    /// property's value. No effect on sequences.
    pub fn with_relative(mut self, relative: bool) -> Self {
        if let NodeKind::Leaf(tweener) = &mut self.node.kind {
            tweener.set_relative(relative);
        }
        self
    }

    /// Register paused; start it later with `TweenScheduler::play`.
    pub fn paused(mut self) -> Self {
        self.autoplay = Some(false);
        self
    }

    // -- Callbacks --

    fn hook(mut self, hook: Hook, f: impl FnMut(&mut TweenScheduler) + 'static) -> Self {
        self.node.callbacks.set(hook, callback(f));
        self
    }

    /// First movement after creation or a rewind.
    pub fn on_start(self, f: impl FnMut(&mut TweenScheduler) + 'static) -> Self {
        self.hook(Hook::Start, f)
    }

    /// Every step that left the node mid-flight.
    pub fn on_update(self, f: impl FnMut(&mut TweenScheduler) + 'static) -> Self {
        self.hook(Hook::Update, f)
    }

    /// Each loop boundary crossed, in either direction.
    pub fn on_step_complete(self, f: impl FnMut(&mut TweenScheduler) + 'static) -> Self {
        self.hook(Hook::StepComplete, f)
    }

    pub fn on_complete(self, f: impl FnMut(&mut TweenScheduler) + 'static) -> Self {
        self.hook(Hook::Complete, f)
    }

    /// Reaching the start by playing backwards, or an explicit rewind/restart.
    pub fn on_rewind(self, f: impl FnMut(&mut TweenScheduler) + 'static) -> Self {
        self.hook(Hook::Rewind, f)
    }

    // -- Sequence building --

    fn edit(
        mut self,
        f: impl FnOnce(&mut Node) -> Result<(), TweenError>,
    ) -> Result<Self, TweenError> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        f(&mut self.node)?;
        Ok(self)
    }

    fn child(tween: Tween) -> Result<NodeRef, TweenError> {
        match tween.error {
            Some(error) => Err(error),
            None => Ok(tween.node.into_ref()),
        }
    }

    /// Add `child` at the end of the timeline.
    pub fn append(self, child: Tween) -> Result<Self, TweenError> {
        let child = Self::child(child)?;
        self.edit(|seq| sequence::append(seq, child))
    }

    /// Add `child` at `at` seconds, overlapping whatever is there.
    pub fn insert(self, at: f32, child: Tween) -> Result<Self, TweenError> {
        let child = Self::child(child)?;
        self.edit(|seq| sequence::insert(seq, at, child))
    }

    /// Add `child` at the start, pushing everything else back.
    pub fn prepend(self, child: Tween) -> Result<Self, TweenError> {
        let child = Self::child(child)?;
        self.edit(|seq| sequence::prepend(seq, child))
    }

    pub fn append_interval(self, duration: f32) -> Result<Self, TweenError> {
        self.edit(|seq| sequence::append_interval(seq, duration))
    }

    pub fn prepend_interval(self, duration: f32) -> Result<Self, TweenError> {
        self.edit(|seq| sequence::prepend_interval(seq, duration))
    }

    /// Callback at the current end of the timeline.
    pub fn append_callback(self, f: impl FnMut(&mut TweenScheduler) + 'static) -> Result<Self, TweenError> {
        let at = self.node.duration;
        self.insert_callback(at, f)
    }

    /// Callback fired whenever playback passes `at`, in either direction.
    pub fn insert_callback(
        self,
        at: f32,
        f: impl FnMut(&mut TweenScheduler) + 'static,
    ) -> Result<Self, TweenError> {
        let cb = callback(f);
        self.edit(|seq| sequence::insert_callback(seq, at, cb))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::{FloatPlugin, Property};
    use std::cell::Cell;
    use std::rc::Rc;

    fn prop(cell: &Rc<Cell<f32>>) -> impl Accessor<f32> {
        let (r, w) = (cell.clone(), cell.clone());
        Property::new(move || r.get(), move |v| w.set(v))
    }

    #[test]
    fn negative_duration_clamps_to_zero() {
        let cell = Rc::new(Cell::new(0.0));
        let t = Tween::to(prop(&cell), FloatPlugin, 1.0, -3.0);
        assert_eq!(t.duration(), 0.0);
        assert!(t.error.is_none());
    }

    #[test]
    fn non_finite_duration_is_an_error() {
        let cell = Rc::new(Cell::new(0.0));
        let t = Tween::to(prop(&cell), FloatPlugin, 1.0, f32::NAN);
        assert!(matches!(t.error, Some(TweenError::InvalidConfiguration(_))));
    }

    #[test]
    fn from_writes_start_value_on_creation() {
        let cell = Rc::new(Cell::new(5.0));
        let _t = Tween::from(prop(&cell), FloatPlugin, 1.0, 1.0);
        assert_eq!(cell.get(), 1.0);
    }

    #[test]
    fn zero_loops_plays_once() {
        let cell = Rc::new(Cell::new(0.0));
        let t = Tween::to(prop(&cell), FloatPlugin, 1.0, 1.0).with_loops(0, LoopType::Yoyo);
        assert_eq!(t.node.loops, Loops::Finite(1));
    }

    #[test]
    fn sequence_duration_tracks_children() {
        let cell = Rc::new(Cell::new(0.0));
        let seq = Tween::sequence()
            .append(Tween::to(prop(&cell), FloatPlugin, 1.0, 1.0))
            .and_then(|s| s.append_interval(0.5))
            .and_then(|s| s.insert(0.25, Tween::to(prop(&cell), FloatPlugin, 2.0, 2.0)))
            .unwrap();
        assert!(seq.is_sequence());
        assert_eq!(seq.duration(), 2.25);
    }

    #[test]
    fn invalid_child_surfaces_its_error() {
        let cell = Rc::new(Cell::new(0.0));
        let bad = Tween::to(prop(&cell), FloatPlugin, 1.0, f32::INFINITY);
        assert!(Tween::sequence().append(bad).is_err());
        let infinite = Tween::to(prop(&cell), FloatPlugin, 1.0, 1.0).with_loops(Loops::Infinite, LoopType::Restart);
        assert!(matches!(
            Tween::sequence().append(infinite),
            Err(TweenError::InvalidConfiguration(_))
        ));
    }
}
