// core/scheduler.rs
//
// Owns every active root node and drives them from the host's frame delta.
//
// Usage:
//   let mut tweens = TweenScheduler::new();
//   let id = tweens.add(Tween::to(prop, FloatPlugin, 10.0, 1.0))?;
//   tweens.advance(dt);          // once per frame
//   tweens.pause(id)?;
//   tweens.kill_by("enemy", false);
//
// Handles are generational: once a node is killed, completed with auto-kill,
// or nested into a sequence, its handle reports `TweenError::NotFound`.
//
// Each `advance` walks a snapshot of the roots in registration order. Nodes
// added by callbacks wait for the next advance; nodes killed by callbacks
// are skipped for the rest of the batch.

use std::rc::Rc;

use slotmap::SlotMap;

use super::advance::{self, StepContext};
use super::dispatch::{self, Hook};
use super::node::{Node, NodeRef};
use super::sequence;
use super::time::FixedTimestep;
use super::tween::Tween;
use crate::api::error::TweenError;
use crate::api::settings::TweenSettings;
use crate::api::types::{Loops, TweenFilter, TweenId, UpdateType};
use crate::extensions::easing::Ease;

/// Point-in-time view of a node's playback state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenStatus {
    /// Seconds per loop.
    pub duration: f32,
    pub loops: Loops,
    pub completed_loops: u32,
    /// Seconds into the current loop.
    pub position: f32,
    /// Seconds across all loops.
    pub elapsed: f32,
    pub elapsed_delay: f32,
    pub is_playing: bool,
    pub is_backwards: bool,
    pub is_complete: bool,
    pub is_sequence: bool,
}

impl TweenStatus {
    fn of(n: &Node) -> Self {
        Self {
            duration: n.duration,
            loops: n.loops,
            completed_loops: n.completed_loops,
            position: n.position,
            elapsed: n.full_position(),
            elapsed_delay: n.elapsed_delay,
            is_playing: n.is_playing,
            is_backwards: n.is_backwards,
            is_complete: n.is_complete,
            is_sequence: n.is_sequence(),
        }
    }

    pub fn is_paused(&self) -> bool {
        !self.is_playing
    }

    /// Normalized progress across all loops [0, 1]; 0 while looping forever.
    pub fn progress(&self) -> f32 {
        match self.loops.count() {
            _ if self.is_complete => 1.0,
            Some(n) if self.duration > 0.0 && n > 0 => {
                (self.elapsed / (self.duration * n as f32)).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }
}

/// Registry and clock for all active tweens and sequences.
pub struct TweenScheduler {
    nodes: SlotMap<TweenId, NodeRef>,
    /// Registration order; may hold dead ids until the next compaction.
    order: Vec<TweenId>,
    settings: TweenSettings,
    fixed: FixedTimestep,
    updating: bool,
    completed: Vec<TweenId>,
}

impl Default for TweenScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TweenScheduler {
    pub fn new() -> Self {
        Self::with_settings(TweenSettings::default())
    }

    pub fn with_settings(settings: TweenSettings) -> Self {
        Self {
            nodes: SlotMap::with_capacity_and_key(settings.capacity),
            order: Vec::with_capacity(settings.capacity),
            fixed: FixedTimestep::new(settings.fixed_dt, settings.max_fixed_steps),
            settings,
            updating: false,
            completed: Vec::new(),
        }
    }

    pub fn settings(&self) -> &TweenSettings {
        &self.settings
    }

    pub fn time_scale(&self) -> f32 {
        self.settings.time_scale
    }

    /// Global multiplier for `Normal` and `Fixed` nodes. Negative or
    /// non-finite values are ignored.
    pub fn set_time_scale(&mut self, time_scale: f32) {
        if time_scale.is_finite() && time_scale >= 0.0 {
            self.settings.time_scale = time_scale;
        } else {
            log::warn!("ignoring invalid global time scale {time_scale}");
        }
    }

    /// Register a tween or sequence. Options it left unset come from the
    /// scheduler's settings. Plays on the next `advance` unless paused.
    pub fn add(&mut self, tween: Tween) -> Result<TweenId, TweenError> {
        let Tween {
            mut node,
            autoplay,
            auto_kill,
            error,
        } = tween;
        if let Some(error) = error {
            return Err(error);
        }
        let ease = Ease::from(self.settings.default_ease);
        node.resolve_defaults(&ease, self.settings.default_loop_type);
        node.auto_kill = auto_kill.unwrap_or(self.settings.default_auto_kill);
        node.is_playing = autoplay.unwrap_or(self.settings.default_autoplay);
        let id = self.nodes.insert(node.into_ref());
        self.order.push(id);
        log::debug!("tween {:?} registered ({} active)", id, self.nodes.len());
        Ok(id)
    }

    /// Advance every playing root by `dt` seconds (negative plays time
    /// backwards). Returns how many roots completed during this call.
    /// Calls made from inside a callback are ignored.
    pub fn advance(&mut self, dt: f32) -> usize {
        if self.updating {
            log::warn!("advance called from a tween callback; ignored");
            return 0;
        }
        if !dt.is_finite() {
            log::warn!("advance called with non-finite dt {dt}; ignored");
            return 0;
        }
        self.updating = true;
        let scaled = dt * self.settings.time_scale;
        let fixed_steps = self.fixed.accumulate(scaled);
        let fixed_dt = self.fixed.dt();

        let batch = self.order.clone();
        let mut finished = 0;
        for id in batch {
            let Some(node) = self.nodes.get(id).cloned() else {
                continue;
            };
            let update_type = node.borrow().update_type;
            match update_type {
                UpdateType::Normal => finished += self.advance_one(id, &node, scaled),
                UpdateType::TimeScaleIndependent => finished += self.advance_one(id, &node, dt),
                UpdateType::Fixed => {
                    for _ in 0..fixed_steps {
                        if !self.nodes.contains_key(id) {
                            break;
                        }
                        finished += self.advance_one(id, &node, fixed_dt);
                    }
                }
            }
        }
        self.updating = false;
        self.compact();
        if finished > 0 {
            log::trace!("advance({dt}): {finished} completed, {} active", self.nodes.len());
        }
        finished
    }

    fn advance_one(&mut self, id: TweenId, node: &NodeRef, dt: f32) -> usize {
        let was_complete = node.borrow().is_complete;
        {
            let mut cx = StepContext::new(self, node.clone());
            advance::advance_root(node, dt, &mut cx);
        }
        if !self.nodes.contains_key(id) {
            return 0;
        }
        let (complete, auto_kill) = {
            let n = node.borrow();
            (n.is_complete, n.auto_kill)
        };
        let newly = complete && !was_complete;
        // `complete()` from a callback may already have reported it
        if newly && self.completed.last() != Some(&id) {
            self.completed.push(id);
        }
        if complete && auto_kill {
            self.remove(id);
        }
        usize::from(newly)
    }

    /// Handles of roots that completed since the last drain, in order.
    pub fn drain_completed(&mut self) -> impl Iterator<Item = TweenId> + '_ {
        self.completed.drain(..)
    }

    fn compact(&mut self) {
        let nodes = &self.nodes;
        self.order.retain(|id| nodes.contains_key(*id));
    }

    fn node(&self, id: TweenId) -> Result<NodeRef, TweenError> {
        self.nodes.get(id).cloned().ok_or(TweenError::NotFound(id))
    }

    fn remove(&mut self, id: TweenId) -> bool {
        match self.nodes.remove(id) {
            Some(node) => {
                let mut n = node.borrow_mut();
                n.killed = true;
                n.generation = n.generation.wrapping_add(1);
                log::debug!("tween {:?} removed ({} active)", id, self.nodes.len());
                true
            }
            None => false,
        }
    }

    fn fire(&mut self, node: &NodeRef, hook: Hook) {
        let cb = node.borrow().callbacks.get(hook);
        if let Some(cb) = cb {
            dispatch::invoke(&cb, hook, self);
        }
    }

    // -- Per-node control --
    //
    // Each returns whether the call changed anything, or `NotFound` for a
    // stale handle.

    pub fn play(&mut self, id: TweenId) -> Result<bool, TweenError> {
        let node = self.node(id)?;
        let mut n = node.borrow_mut();
        if n.is_playing || !n.can_play() {
            return Ok(false);
        }
        n.is_playing = true;
        Ok(true)
    }

    pub fn pause(&mut self, id: TweenId) -> Result<bool, TweenError> {
        let node = self.node(id)?;
        let mut n = node.borrow_mut();
        let was_playing = n.is_playing;
        n.is_playing = false;
        Ok(was_playing)
    }

    pub fn toggle_pause(&mut self, id: TweenId) -> Result<bool, TweenError> {
        let playing = self.node(id)?.borrow().is_playing;
        if playing {
            self.pause(id)
        } else {
            self.play(id)
        }
    }

    /// Play in the forward direction, turning around if needed.
    pub fn play_forward(&mut self, id: TweenId) -> Result<bool, TweenError> {
        self.play_towards(id, false)
    }

    /// Play towards the start, turning around if needed.
    pub fn play_backwards(&mut self, id: TweenId) -> Result<bool, TweenError> {
        self.play_towards(id, true)
    }

    fn play_towards(&mut self, id: TweenId, backwards: bool) -> Result<bool, TweenError> {
        let turned = {
            let node = self.node(id)?;
            let mut n = node.borrow_mut();
            let turned = n.is_backwards != backwards;
            n.is_backwards = backwards;
            turned
        };
        Ok(self.play(id)? || turned)
    }

    /// Reverse the playing direction without changing play state.
    pub fn flip(&mut self, id: TweenId) -> Result<bool, TweenError> {
        let node = self.node(id)?;
        let mut n = node.borrow_mut();
        n.is_backwards = !n.is_backwards;
        Ok(true)
    }

    /// Silently jump back to the start (delay included) and pause.
    /// Fires `on_rewind` if the node had moved.
    pub fn rewind(&mut self, id: TweenId) -> Result<bool, TweenError> {
        self.reset(id, false)
    }

    /// Rewind and play from the start, delay included.
    pub fn restart(&mut self, id: TweenId) -> Result<bool, TweenError> {
        self.reset(id, true)
    }

    fn reset(&mut self, id: TweenId, and_play: bool) -> Result<bool, TweenError> {
        let node = self.node(id)?;
        let (moved, was_playing) = {
            let mut n = node.borrow_mut();
            let moved = n.started || !n.at_start() || n.elapsed_delay > 0.0;
            let was_playing = n.is_playing;
            n.generation = n.generation.wrapping_add(1);
            n.elapsed_delay = 0.0;
            n.is_backwards = false;
            n.is_playing = and_play;
            (moved, was_playing)
        };
        if moved {
            advance::seek_silent(&node, 0.0);
            self.fire(&node, Hook::Rewind);
        }
        Ok(moved || was_playing != and_play)
    }

    /// Jump to the end. With `with_callbacks`, fires `on_step_complete`
    /// then `on_complete`. Auto-kill nodes are removed right away.
    /// Infinite loops cannot complete.
    pub fn complete(&mut self, id: TweenId, with_callbacks: bool) -> Result<bool, TweenError> {
        let node = self.node(id)?;
        let total = {
            let mut n = node.borrow_mut();
            let Some(total) = n.total_duration() else {
                return Err(TweenError::InvalidOperation("cannot complete an infinite loop"));
            };
            if n.is_complete {
                return Ok(false);
            }
            n.generation = n.generation.wrapping_add(1);
            n.elapsed_delay = n.delay;
            n.started = true;
            total
        };
        advance::seek_silent(&node, total.max(f32::MIN_POSITIVE));
        let generation = {
            let mut n = node.borrow_mut();
            n.is_playing = false;
            n.generation
        };
        if with_callbacks {
            self.fire(&node, Hook::StepComplete);
            let untouched = {
                let n = node.borrow();
                !n.killed && n.generation == generation
            };
            if untouched {
                self.fire(&node, Hook::Complete);
            }
        }
        let (complete, auto_kill) = {
            let n = node.borrow();
            (n.is_complete && !n.killed, n.auto_kill)
        };
        if complete {
            self.completed.push(id);
            if auto_kill {
                self.remove(id);
            }
        }
        Ok(true)
    }

    /// Silently jump to `to` seconds across all loops (delay skipped),
    /// then play if `and_play`, otherwise pause.
    pub fn goto(&mut self, id: TweenId, to: f32, and_play: bool) -> Result<bool, TweenError> {
        if !to.is_finite() {
            return Err(TweenError::InvalidConfiguration(format!("goto position must be finite, got {to}")));
        }
        let node = self.node(id)?;
        {
            let mut n = node.borrow_mut();
            n.generation = n.generation.wrapping_add(1);
            n.elapsed_delay = n.delay;
        }
        advance::seek_silent(&node, to);
        let mut n = node.borrow_mut();
        n.is_playing = and_play && n.can_play();
        Ok(true)
    }

    /// Remove the node. With `complete`, a finite node is first completed
    /// with callbacks.
    pub fn kill(&mut self, id: TweenId, complete: bool) -> Result<bool, TweenError> {
        let node = self.node(id)?;
        let finite = !node.borrow().loops.is_infinite();
        if complete && finite {
            self.complete(id, true)?;
        }
        self.remove(id);
        Ok(true)
    }

    /// Change a node's own time multiplier while it runs.
    pub fn set_node_time_scale(&mut self, id: TweenId, time_scale: f32) -> Result<bool, TweenError> {
        if !time_scale.is_finite() || time_scale < 0.0 {
            return Err(TweenError::InvalidConfiguration(format!(
                "time scale must be finite and non-negative, got {time_scale}"
            )));
        }
        let node = self.node(id)?;
        node.borrow_mut().time_scale = time_scale;
        Ok(true)
    }

    // -- Group control --
    //
    // Each applies the per-node operation to every active root the filter
    // matches and returns how many were actually affected.

    fn matching(&self, filter: &TweenFilter) -> Vec<TweenId> {
        self.order
            .iter()
            .copied()
            .filter(|id| {
                self.nodes.get(*id).is_some_and(|node| {
                    let n = node.borrow();
                    filter.matches(n.tag.as_ref(), n.target)
                })
            })
            .collect()
    }

    fn for_each(
        &mut self,
        filter: impl Into<TweenFilter>,
        mut op: impl FnMut(&mut Self, TweenId) -> Result<bool, TweenError>,
    ) -> usize {
        let mut affected = 0;
        for id in self.matching(&filter.into()) {
            if let Ok(true) = op(self, id) {
                affected += 1;
            }
        }
        affected
    }

    /// Handles of the active roots matching `filter`, in registration order.
    pub fn ids_by(&self, filter: impl Into<TweenFilter>) -> Vec<TweenId> {
        self.matching(&filter.into())
    }

    pub fn play_by(&mut self, filter: impl Into<TweenFilter>) -> usize {
        self.for_each(filter, Self::play)
    }

    pub fn pause_by(&mut self, filter: impl Into<TweenFilter>) -> usize {
        self.for_each(filter, Self::pause)
    }

    pub fn toggle_pause_by(&mut self, filter: impl Into<TweenFilter>) -> usize {
        self.for_each(filter, Self::toggle_pause)
    }

    pub fn play_forward_by(&mut self, filter: impl Into<TweenFilter>) -> usize {
        self.for_each(filter, Self::play_forward)
    }

    pub fn play_backwards_by(&mut self, filter: impl Into<TweenFilter>) -> usize {
        self.for_each(filter, Self::play_backwards)
    }

    pub fn flip_by(&mut self, filter: impl Into<TweenFilter>) -> usize {
        self.for_each(filter, Self::flip)
    }

    pub fn rewind_by(&mut self, filter: impl Into<TweenFilter>) -> usize {
        self.for_each(filter, Self::rewind)
    }

    pub fn restart_by(&mut self, filter: impl Into<TweenFilter>) -> usize {
        self.for_each(filter, Self::restart)
    }

    /// Infinite loops are skipped.
    pub fn complete_by(&mut self, filter: impl Into<TweenFilter>, with_callbacks: bool) -> usize {
        self.for_each(filter, |s, id| s.complete(id, with_callbacks))
    }

    pub fn goto_by(&mut self, filter: impl Into<TweenFilter>, to: f32, and_play: bool) -> usize {
        self.for_each(filter, |s, id| s.goto(id, to, and_play))
    }

    pub fn kill_by(&mut self, filter: impl Into<TweenFilter>, complete: bool) -> usize {
        self.for_each(filter, |s, id| s.kill(id, complete))
    }

    /// Remove every node without firing callbacks.
    pub fn kill_all(&mut self) -> usize {
        let ids: Vec<TweenId> = self.nodes.keys().collect();
        let killed = ids.into_iter().filter(|id| self.remove(*id)).count();
        if !self.updating {
            self.compact();
        }
        killed
    }

    // -- Nesting registered nodes --

    /// Move the registered node `child` to the end of `sequence`.
    /// The child's handle is no longer valid afterwards.
    pub fn append(&mut self, sequence: TweenId, child: TweenId) -> Result<(), TweenError> {
        self.nest(sequence, child, sequence::append)
    }

    pub fn insert(&mut self, sequence: TweenId, at: f32, child: TweenId) -> Result<(), TweenError> {
        self.nest(sequence, child, |seq, c| sequence::insert(seq, at, c))
    }

    pub fn prepend(&mut self, sequence: TweenId, child: TweenId) -> Result<(), TweenError> {
        self.nest(sequence, child, sequence::prepend)
    }

    fn nest(
        &mut self,
        sequence: TweenId,
        child: TweenId,
        place: impl FnOnce(&mut Node, NodeRef) -> Result<(), TweenError>,
    ) -> Result<(), TweenError> {
        let seq = self.node(sequence)?;
        let node = self.node(child)?;
        if Rc::ptr_eq(&seq, &node) {
            return Err(TweenError::InvalidOperation("cannot nest a sequence in itself"));
        }
        {
            let mut s = seq.borrow_mut();
            place(&mut s, node)?;
        }
        self.nodes.remove(child);
        log::debug!("tween {:?} nested into {:?}", child, sequence);
        Ok(())
    }

    // -- Queries --

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// True while the handle refers to a registered root.
    pub fn is_active(&self, id: TweenId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn status(&self, id: TweenId) -> Option<TweenStatus> {
        self.nodes.get(id).map(|node| TweenStatus::of(&node.borrow()))
    }

    pub fn is_playing(&self, id: TweenId) -> bool {
        self.status(id).is_some_and(|s| s.is_playing)
    }

    pub fn is_complete(&self, id: TweenId) -> bool {
        self.status(id).is_some_and(|s| s.is_complete)
    }

    /// Number of active roots currently playing.
    pub fn playing_count(&self) -> usize {
        self.nodes.values().filter(|node| node.borrow().is_playing).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::LoopType;
    use crate::extensions::easing::Easing;
    use crate::plugins::{Accessor, FloatPlugin, Property};
    use std::cell::{Cell, RefCell};

    fn prop(cell: &Rc<Cell<f32>>) -> impl Accessor<f32> {
        let (r, w) = (cell.clone(), cell.clone());
        Property::new(move || r.get(), move |v| w.set(v))
    }

    fn linear(cell: &Rc<Cell<f32>>, end: f32, duration: f32) -> Tween {
        Tween::to(prop(cell), FloatPlugin, end, duration).with_ease(Easing::Linear)
    }

    #[test]
    fn add_and_advance() {
        let cell = Rc::new(Cell::new(0.0));
        let mut tweens = TweenScheduler::new();
        let id = tweens.add(linear(&cell, 10.0, 1.0)).unwrap();

        assert_eq!(tweens.advance(0.5), 0);
        assert!((cell.get() - 5.0).abs() < 1e-5);
        assert_eq!(tweens.advance(0.5), 1);
        assert_eq!(cell.get(), 10.0);
        assert!(!tweens.is_active(id));
        assert_eq!(tweens.drain_completed().collect::<Vec<_>>(), vec![id]);
    }

    #[test]
    fn settings_fill_unset_options() {
        let cell = Rc::new(Cell::new(0.0));
        let settings = TweenSettings::default()
            .with_default_auto_kill(false)
            .with_default_autoplay(false)
            .with_default_ease(Easing::Linear);
        let mut tweens = TweenScheduler::with_settings(settings);
        let id = tweens.add(Tween::to(prop(&cell), FloatPlugin, 4.0, 1.0)).unwrap();
        tweens.advance(0.5);
        assert_eq!(cell.get(), 0.0);

        tweens.play(id).unwrap();
        tweens.advance(0.5);
        assert_eq!(cell.get(), 2.0);
        tweens.advance(1.0);
        assert!(tweens.is_complete(id));
    }

    #[test]
    fn stale_handle_reports_not_found() {
        let cell = Rc::new(Cell::new(0.0));
        let mut tweens = TweenScheduler::new();
        let id = tweens.add(linear(&cell, 1.0, 1.0)).unwrap();
        assert_eq!(tweens.kill(id, false), Ok(true));
        assert_eq!(tweens.pause(id), Err(TweenError::NotFound(id)));
        assert!(tweens.status(id).is_none());
    }

    #[test]
    fn invalid_builder_is_rejected_on_add() {
        let cell = Rc::new(Cell::new(0.0));
        let mut tweens = TweenScheduler::new();
        let result = tweens.add(linear(&cell, 1.0, f32::NAN));
        assert!(matches!(result, Err(TweenError::InvalidConfiguration(_))));
        assert!(tweens.is_empty());
    }

    #[test]
    fn delay_is_consumed_first() {
        let cell = Rc::new(Cell::new(0.0));
        let mut tweens = TweenScheduler::new();
        let id = tweens.add(linear(&cell, 1.0, 1.0).with_delay(0.5)).unwrap();
        tweens.advance(0.75);
        assert!((cell.get() - 0.25).abs() < 1e-5);
        assert_eq!(tweens.status(id).unwrap().elapsed_delay, 0.5);
    }

    #[test]
    fn time_scales_multiply() {
        let cell = Rc::new(Cell::new(0.0));
        let free = Rc::new(Cell::new(0.0));
        let mut tweens = TweenScheduler::new();
        tweens.set_time_scale(0.5);
        tweens.add(linear(&cell, 1.0, 1.0).with_time_scale(2.0).with_auto_kill(false)).unwrap();
        tweens
            .add(linear(&free, 1.0, 1.0).with_update_type(UpdateType::TimeScaleIndependent))
            .unwrap();
        tweens.advance(0.25);
        assert!((cell.get() - 0.25).abs() < 1e-5);
        assert!((free.get() - 0.25).abs() < 1e-5);
    }

    #[test]
    fn fixed_update_runs_whole_steps() {
        let cell = Rc::new(Cell::new(0.0));
        let mut tweens = TweenScheduler::with_settings(TweenSettings {
            fixed_dt: 0.1,
            ..TweenSettings::default()
        });
        tweens
            .add(linear(&cell, 1.0, 1.0).with_update_type(UpdateType::Fixed))
            .unwrap();
        tweens.advance(0.05);
        assert_eq!(cell.get(), 0.0);
        tweens.advance(0.21);
        assert!((cell.get() - 0.2).abs() < 1e-4);
    }

    #[test]
    fn complete_fires_step_then_complete() {
        let cell = Rc::new(Cell::new(0.0));
        let log = Rc::new(RefCell::new(Vec::new()));
        let (a, b) = (log.clone(), log.clone());
        let mut tweens = TweenScheduler::new();
        let id = tweens
            .add(
                linear(&cell, 3.0, 1.0)
                    .with_loops(2, LoopType::Restart)
                    .on_step_complete(move |_| a.borrow_mut().push("step"))
                    .on_complete(move |_| b.borrow_mut().push("complete")),
            )
            .unwrap();
        assert_eq!(tweens.complete(id, true), Ok(true));
        assert_eq!(cell.get(), 3.0);
        assert_eq!(*log.borrow(), vec!["step", "complete"]);
        assert!(!tweens.is_active(id));
    }

    #[test]
    fn complete_rejects_infinite_loops() {
        let cell = Rc::new(Cell::new(0.0));
        let mut tweens = TweenScheduler::new();
        let id = tweens
            .add(linear(&cell, 1.0, 1.0).with_loops(-1, LoopType::Restart))
            .unwrap();
        assert!(matches!(tweens.complete(id, true), Err(TweenError::InvalidOperation(_))));
    }

    #[test]
    fn rewind_and_restart() {
        let cell = Rc::new(Cell::new(0.0));
        let rewinds = Rc::new(Cell::new(0));
        let r = rewinds.clone();
        let mut tweens = TweenScheduler::new();
        let id = tweens
            .add(linear(&cell, 2.0, 1.0).on_rewind(move |_| r.set(r.get() + 1)))
            .unwrap();
        tweens.advance(0.5);
        assert_eq!(tweens.rewind(id), Ok(true));
        assert_eq!(cell.get(), 0.0);
        assert!(!tweens.is_playing(id));
        assert_eq!(rewinds.get(), 1);
        // already rewound
        assert_eq!(tweens.rewind(id), Ok(false));
        assert_eq!(rewinds.get(), 1);

        tweens.restart(id).unwrap();
        assert!(tweens.is_playing(id));
        tweens.advance(0.25);
        assert!((cell.get() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn play_backwards_returns_to_start() {
        let cell = Rc::new(Cell::new(0.0));
        let mut tweens = TweenScheduler::new();
        let id = tweens.add(linear(&cell, 1.0, 1.0)).unwrap();
        tweens.advance(0.5);
        tweens.play_backwards(id).unwrap();
        tweens.advance(0.25);
        assert!((cell.get() - 0.25).abs() < 1e-5);
        tweens.advance(1.0);
        assert_eq!(cell.get(), 0.0);
        assert!(!tweens.is_playing(id));
        assert!(tweens.is_active(id));
        assert_eq!(tweens.play(id), Ok(false));
    }

    #[test]
    fn goto_is_silent_and_pauses() {
        let cell = Rc::new(Cell::new(0.0));
        let fired = Rc::new(Cell::new(0));
        let f = fired.clone();
        let mut tweens = TweenScheduler::new();
        let id = tweens
            .add(linear(&cell, 1.0, 1.0).with_loops(3, LoopType::Restart).on_step_complete(move |_| f.set(f.get() + 1)))
            .unwrap();
        tweens.goto(id, 2.5, false).unwrap();
        let status = tweens.status(id).unwrap();
        assert_eq!(status.completed_loops, 2);
        assert!((status.position - 0.5).abs() < 1e-5);
        assert!((cell.get() - 0.5).abs() < 1e-5);
        assert!(!status.is_playing);
        assert_eq!(fired.get(), 0);
    }

    #[test]
    fn group_ops_count_affected() {
        let cell = Rc::new(Cell::new(0.0));
        let mut tweens = TweenScheduler::new();
        tweens.add(linear(&cell, 1.0, 1.0).with_id("ui")).unwrap();
        tweens.add(linear(&cell, 1.0, 1.0).with_id("ui")).unwrap();
        let other = tweens.add(linear(&cell, 1.0, 1.0).with_id(7)).unwrap();

        assert_eq!(tweens.pause_by("ui"), 2);
        assert_eq!(tweens.pause_by("ui"), 0);
        assert_eq!(tweens.play_by(TweenFilter::All), 2);
        assert_eq!(tweens.ids_by(7), vec![other]);
        assert_eq!(tweens.kill_all(), 3);
        assert!(tweens.is_empty());
    }

    #[test]
    fn nesting_registered_nodes_invalidates_child_handle() {
        let cell = Rc::new(Cell::new(0.0));
        let mut tweens = TweenScheduler::new();
        let seq = tweens.add(Tween::sequence().paused()).unwrap();
        let child = tweens.add(linear(&cell, 2.0, 1.0).paused()).unwrap();
        tweens.append(seq, child).unwrap();
        assert!(!tweens.is_active(child));
        assert_eq!(tweens.status(seq).unwrap().duration, 1.0);
        assert!(tweens.append(seq, seq).is_err());

        tweens.play(seq).unwrap();
        tweens.advance(0.5);
        assert!((cell.get() - 1.0).abs() < 1e-5);
        assert!(matches!(tweens.append(seq, child), Err(TweenError::NotFound(_))));
    }

    #[test]
    fn reentrant_advance_is_ignored() {
        let cell = Rc::new(Cell::new(0.0));
        let mut tweens = TweenScheduler::new();
        tweens
            .add(linear(&cell, 1.0, 1.0).on_update(|s| {
                assert_eq!(s.advance(1.0), 0);
            }))
            .unwrap();
        tweens.advance(0.5);
        assert!((cell.get() - 0.5).abs() < 1e-5);
    }
}
