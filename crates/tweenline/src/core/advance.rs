// core/advance.rs
//
// Moving nodes through time.
//
// Two ways to move a node:
//   step()        dispatch mode: walks every loop boundary in between,
//                 renders, and fires lifecycle callbacks in order.
//   seek_silent() jumps straight to an absolute position, renders the
//                 result, fires nothing.
//
// Callbacks run with no node borrowed and get the scheduler, so they may
// kill or reposition the very root being stepped. After each callback the
// step checks the root's liveness and generation and bails out if either
// changed; whatever the callback did wins.

use super::dispatch::{self, Hook};
use super::node::{Crossing, Move, Node, NodeKind, NodeRef};
use super::scheduler::TweenScheduler;
use crate::api::types::LoopType;
use crate::extensions::easing::Ease;

/// Positions closer than this count as the same instant.
const EPSILON: f32 = 1e-6;

/// Loop boundaries a single step dispatches one by one. Whole loops past
/// this are skipped arithmetically without per-loop callbacks.
const MAX_DISPATCHED_CROSSINGS: u32 = 1024;

/// State for one root's step: the scheduler callbacks get, plus what the
/// root looked like when the step began.
pub(crate) struct StepContext<'a> {
    pub scheduler: &'a mut TweenScheduler,
    root: NodeRef,
    generation: u32,
}

impl<'a> StepContext<'a> {
    pub fn new(scheduler: &'a mut TweenScheduler, root: NodeRef) -> Self {
        let generation = root.borrow().generation;
        Self {
            scheduler,
            root,
            generation,
        }
    }

    /// False once the root was killed or repositioned from a callback.
    pub fn alive(&self) -> bool {
        let root = self.root.borrow();
        !root.killed && root.generation == self.generation
    }

    fn fire(&mut self, node: &NodeRef, hook: Hook) -> bool {
        let cb = node.borrow().callbacks.get(hook);
        if let Some(cb) = cb {
            dispatch::invoke(&cb, hook, self.scheduler);
            return self.alive();
        }
        true
    }
}

/// Advance a playing root by one frame delta (already scaled), consuming
/// its start delay first. Returns false if a callback took over the root.
pub(crate) fn advance_root(root: &NodeRef, dt: f32, cx: &mut StepContext<'_>) -> bool {
    let delta = {
        let mut n = root.borrow_mut();
        if !n.is_playing || n.killed {
            return true;
        }
        let dt = dt * n.time_scale;
        if n.is_backwards {
            -dt
        } else if dt > 0.0 && n.elapsed_delay < n.delay {
            let used = (n.delay - n.elapsed_delay).min(dt);
            n.elapsed_delay += used;
            dt - used
        } else {
            dt
        }
    };
    step(root, delta, cx)
}

/// Move `node` by `delta` seconds of its own time (negative moves it back),
/// crossing loop boundaries one at a time.
pub(crate) fn step(node: &NodeRef, delta: f32, cx: &mut StepContext<'_>) -> bool {
    if delta == 0.0 || !delta.is_finite() {
        return true;
    }
    let forward = delta > 0.0;
    let first_move = {
        let mut n = node.borrow_mut();
        if (forward && n.is_complete) || (!forward && n.at_start()) {
            return true;
        }
        let first = !n.started;
        n.started = true;
        first
    };
    if first_move {
        startup(node);
        if !cx.fire(node, Hook::Start) {
            return false;
        }
    }
    if node.borrow().duration <= 0.0 {
        return step_instant(node, forward, cx);
    }

    let mut remaining = delta.abs();
    let mut crossings = 0u32;
    loop {
        let reached = {
            let mut n = node.borrow_mut();
            if forward {
                n.move_forward(&mut remaining)
            } else {
                n.move_backward(&mut remaining)
            }
        };
        if !render(node, forward, cx) {
            return false;
        }
        if reached == Move::Within {
            break;
        }

        let (crossing, before) = {
            let mut n = node.borrow_mut();
            let before = n.eval_position();
            (n.cross(forward), before)
        };
        match crossing {
            Crossing::Finished => {
                return cx.fire(node, Hook::StepComplete) && cx.fire(node, Hook::Complete);
            }
            Crossing::Rewound => return cx.fire(node, Hook::Rewind),
            Crossing::NextLoop => {
                if !cx.fire(node, Hook::StepComplete) {
                    return false;
                }
                crossings += 1;
                let skipped = if crossings >= MAX_DISPATCHED_CROSSINGS {
                    node.borrow_mut().skip_loops(&mut remaining, forward)
                } else {
                    0
                };
                let jumped = (node.borrow().eval_position() - before).abs() > EPSILON;
                if jumped || skipped > 0 {
                    render_silent(node);
                }
                if skipped > 0 {
                    log::debug!("skipped {skipped} loops after {crossings} dispatched crossings");
                }
                if remaining <= 0.0 {
                    break;
                }
            }
        }
    }
    cx.fire(node, Hook::Update)
}

/// Zero-length nodes have no inside: forward motion completes every loop
/// at once (one loop per step when infinite), backward motion rewinds.
fn step_instant(node: &NodeRef, forward: bool, cx: &mut StepContext<'_>) -> bool {
    if !forward {
        {
            let mut n = node.borrow_mut();
            n.set_full_position(0.0);
            n.is_playing = false;
        }
        return render(node, false, cx) && cx.fire(node, Hook::Rewind);
    }
    let finished = {
        let mut n = node.borrow_mut();
        match n.loops.count() {
            Some(count) => {
                n.completed_loops = count;
                n.is_complete = true;
                n.is_playing = false;
                true
            }
            None => {
                n.completed_loops += 1;
                false
            }
        }
    };
    if !render(node, true, cx) || !cx.fire(node, Hook::StepComplete) {
        return false;
    }
    if finished {
        cx.fire(node, Hook::Complete)
    } else {
        cx.fire(node, Hook::Update)
    }
}

/// Jump to `full` seconds across loops and render it without callbacks.
pub(crate) fn seek_silent(node: &NodeRef, full: f32) {
    node.borrow_mut().set_full_position(full);
    render_silent(node);
}

fn startup(node: &NodeRef) {
    if let NodeKind::Leaf(tweener) = &mut node.borrow_mut().kind {
        tweener.startup();
    }
}

/// Write a leaf's value for its current position.
fn render_leaf(n: &mut Node) {
    let incremental = n.loop_type() == LoopType::Incremental;
    let loop_index = n.loop_index();
    let (elapsed, duration) = if n.duration <= 0.0 {
        (if n.completed_loops > 0 { 1.0 } else { 0.0 }, 1.0)
    } else {
        (n.eval_position(), n.duration)
    };
    let Node { kind, ease, .. } = n;
    if let NodeKind::Leaf(tweener) = kind {
        let fallback;
        let ease = match ease {
            Some(ease) => &*ease,
            None => {
                fallback = Ease::default();
                &fallback
            }
        };
        tweener.apply(elapsed, duration, loop_index, incremental, ease);
    }
}

/// Render in dispatch mode: leaves write their value, sequences step their
/// children (firing the children's callbacks).
fn render(node: &NodeRef, forward: bool, cx: &mut StepContext<'_>) -> bool {
    let (eval, eval_forward, children) = {
        let mut n = node.borrow_mut();
        let children = match &n.kind {
            NodeKind::Marker => return true,
            NodeKind::Leaf(_) => None,
            NodeKind::Sequence(seq) => Some(seq.snapshot()),
        };
        let Some(children) = children else {
            render_leaf(&mut n);
            return true;
        };
        (n.eval_position(), forward != n.inverted(), children)
    };

    let ordered: Box<dyn Iterator<Item = &(f32, NodeRef)>> = if eval_forward {
        Box::new(children.iter())
    } else {
        Box::new(children.iter().rev())
    };
    for (offset, child) in ordered {
        if !cx.alive() {
            return false;
        }
        let (span, complete, position, pristine) = {
            let c = child.borrow();
            (
                c.total_duration().unwrap_or(0.0),
                c.is_complete,
                c.full_position(),
                !c.started && c.at_start(),
            )
        };
        let moved = if span <= 0.0 {
            // Zero-length children flip between rewound and complete as
            // the timeline passes their offset.
            let reached = if eval_forward { eval >= *offset } else { eval > *offset };
            if reached && !complete {
                step(child, 1.0, cx)
            } else if !reached && complete {
                step(child, -1.0, cx)
            } else {
                true
            }
        } else {
            let target = (eval - offset).clamp(0.0, span);
            if (pristine && target <= 0.0) || (complete && target >= span) {
                true
            } else {
                step(child, target - position, cx)
            }
        };
        if !moved {
            return false;
        }
    }
    true
}

/// Render without callbacks. Sequences seek every child to the state
/// matching the sequence's own position.
pub(crate) fn render_silent(node: &NodeRef) {
    let (eval, settled, children) = {
        let mut n = node.borrow_mut();
        let children = match &n.kind {
            NodeKind::Marker => return,
            NodeKind::Leaf(_) => None,
            NodeKind::Sequence(seq) => Some(seq.snapshot()),
        };
        let Some(children) = children else {
            render_leaf(&mut n);
            return;
        };
        let settled = n.duration <= 0.0 && n.completed_loops > 0;
        (n.eval_position(), settled, children)
    };
    for (offset, child) in &children {
        let (span, pristine) = {
            let c = child.borrow();
            (c.total_duration().unwrap_or(0.0), !c.started && c.at_start())
        };
        if span <= 0.0 {
            let reached = eval > *offset || (eval == *offset && (*offset > 0.0 || settled));
            seek_silent(child, if reached { 1.0 } else { 0.0 });
        } else {
            let target = (eval - offset).clamp(0.0, span);
            if pristine && target <= 0.0 {
                continue;
            }
            seek_silent(child, target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Loops;
    use crate::core::dispatch::callback;
    use crate::core::tweener::TweenerCore;
    use crate::extensions::easing::Easing;
    use crate::plugins::{FloatOptions, FloatPlugin, Property};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn leaf(cell: &Rc<Cell<f32>>, end: f32, duration: f32) -> Node {
        let (r, w) = (cell.clone(), cell.clone());
        let prop = Property::new(move || r.get(), move |v| w.set(v));
        let core = TweenerCore::to(prop, FloatPlugin, FloatOptions::default(), end);
        let mut n = Node::new(NodeKind::Leaf(Box::new(core)), duration);
        n.ease = Some(Ease::from(Easing::Linear));
        n.is_playing = true;
        n
    }

    fn log_hooks(n: &mut Node, log: &Rc<RefCell<Vec<&'static str>>>) {
        for (hook, name) in [
            (Hook::Start, "start"),
            (Hook::StepComplete, "step"),
            (Hook::Complete, "complete"),
            (Hook::Rewind, "rewind"),
        ] {
            let log = log.clone();
            n.callbacks.set(hook, callback(move |_| log.borrow_mut().push(name)));
        }
    }

    fn run(node: &NodeRef, delta: f32) -> bool {
        let mut sched = TweenScheduler::new();
        let mut cx = StepContext::new(&mut sched, node.clone());
        step(node, delta, &mut cx)
    }

    #[test]
    fn overshoot_completes_once() {
        let cell = Rc::new(Cell::new(0.0));
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut n = leaf(&cell, 10.0, 1.0);
        log_hooks(&mut n, &log);
        let node = n.into_ref();

        run(&node, 0.5);
        assert_eq!(cell.get(), 5.0);
        run(&node, 0.7);
        assert_eq!(cell.get(), 10.0);
        assert!(node.borrow().is_complete);
        run(&node, 1.0);
        assert_eq!(*log.borrow(), vec!["start", "step", "complete"]);
    }

    #[test]
    fn restart_loops_fire_step_per_boundary() {
        let cell = Rc::new(Cell::new(0.0));
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut n = leaf(&cell, 1.0, 1.0);
        n.loops = Loops::Finite(3);
        log_hooks(&mut n, &log);
        let node = n.into_ref();

        run(&node, 2.5);
        assert_eq!(node.borrow().completed_loops, 2);
        assert!((cell.get() - 0.5).abs() < 1e-5);
        assert_eq!(*log.borrow(), vec!["start", "step", "step"]);
    }

    #[test]
    fn backward_to_start_rewinds() {
        let cell = Rc::new(Cell::new(0.0));
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut n = leaf(&cell, 4.0, 1.0);
        log_hooks(&mut n, &log);
        let node = n.into_ref();

        run(&node, 0.5);
        run(&node, -2.0);
        assert_eq!(cell.get(), 0.0);
        assert!(node.borrow().at_start());
        assert!(!node.borrow().is_playing);
        assert_eq!(*log.borrow(), vec!["start", "rewind"]);
    }

    #[test]
    fn zero_delta_is_a_no_op() {
        let cell = Rc::new(Cell::new(3.0));
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut n = leaf(&cell, 4.0, 1.0);
        log_hooks(&mut n, &log);
        let node = n.into_ref();
        run(&node, 0.0);
        assert!(log.borrow().is_empty());
        assert_eq!(cell.get(), 3.0);
    }

    #[test]
    fn zero_duration_completes_on_first_step() {
        let cell = Rc::new(Cell::new(0.0));
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut n = leaf(&cell, 2.0, 0.0);
        log_hooks(&mut n, &log);
        let node = n.into_ref();
        run(&node, 0.01);
        assert_eq!(cell.get(), 2.0);
        assert_eq!(*log.borrow(), vec!["start", "step", "complete"]);
    }

    #[test]
    fn yoyo_mirrors_second_loop() {
        let cell = Rc::new(Cell::new(0.0));
        let mut n = leaf(&cell, 1.0, 1.0);
        n.loops = Loops::Finite(2);
        n.loop_type = Some(LoopType::Yoyo);
        let node = n.into_ref();
        run(&node, 1.25);
        assert!((cell.get() - 0.75).abs() < 1e-5);
        run(&node, 0.75);
        assert_eq!(cell.get(), 0.0);
        assert!(node.borrow().is_complete);
    }

    #[test]
    fn silent_seek_fires_nothing() {
        let cell = Rc::new(Cell::new(0.0));
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut n = leaf(&cell, 8.0, 2.0);
        log_hooks(&mut n, &log);
        let node = n.into_ref();
        seek_silent(&node, 1.0);
        assert_eq!(cell.get(), 4.0);
        seek_silent(&node, 5.0);
        assert_eq!(cell.get(), 8.0);
        assert!(node.borrow().is_complete);
        assert!(log.borrow().is_empty());
    }
}
