// core/node.rs
//
// Playback state shared by every node of the tween tree, leaf or sequence.
//
// Position model: `position` is time within the current loop (0..=duration),
// `completed_loops` counts finished loops. `position == duration` only while
// the node is complete. The rendered ("eval") position is `position`, or
// `duration - position` on loops a Yoyo plays backwards.

use std::cell::RefCell;
use std::rc::Rc;

use super::dispatch::Callbacks;
use super::sequence::SequenceData;
use super::tweener::Tweener;
use crate::api::types::{LoopType, Loops, TargetKey, TweenTag, UpdateType};
use crate::extensions::easing::Ease;

pub(crate) type NodeRef = Rc<RefCell<Node>>;

pub(crate) enum NodeKind {
    Leaf(Box<dyn Tweener>),
    Sequence(SequenceData),
    /// Zero-length sequence child that only fires callbacks.
    Marker,
}

/// Result of moving towards a loop boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Move {
    /// All remaining time was consumed inside the current loop.
    Within,
    /// Stopped on the loop boundary with time possibly left over.
    Boundary,
}

/// What crossing a loop boundary did to the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Crossing {
    /// Forward past the final loop.
    Finished,
    /// Backward onto the very start.
    Rewound,
    /// Into the next loop (in whichever direction).
    NextLoop,
}

pub(crate) struct Node {
    pub kind: NodeKind,
    pub tag: Option<TweenTag>,
    pub target: Option<TargetKey>,
    /// Seconds per loop.
    pub duration: f32,
    pub loops: Loops,
    pub loop_type: Option<LoopType>,
    pub ease: Option<Ease>,
    pub delay: f32,
    pub elapsed_delay: f32,
    pub time_scale: f32,
    pub update_type: UpdateType,
    pub auto_kill: bool,

    pub completed_loops: u32,
    pub position: f32,
    pub is_backwards: bool,
    pub is_playing: bool,
    pub is_complete: bool,
    /// Has moved since creation or the last rewind.
    pub started: bool,
    /// Bumped whenever the node is repositioned or killed outside of a step.
    pub generation: u32,
    pub killed: bool,

    pub callbacks: Callbacks,
}

impl Node {
    pub fn new(kind: NodeKind, duration: f32) -> Self {
        Self {
            kind,
            tag: None,
            target: None,
            duration,
            loops: Loops::default(),
            loop_type: None,
            ease: None,
            delay: 0.0,
            elapsed_delay: 0.0,
            time_scale: 1.0,
            update_type: UpdateType::Normal,
            auto_kill: true,
            completed_loops: 0,
            position: 0.0,
            is_backwards: false,
            is_playing: false,
            is_complete: false,
            started: false,
            generation: 0,
            killed: false,
            callbacks: Callbacks::default(),
        }
    }

    pub fn into_ref(self) -> NodeRef {
        Rc::new(RefCell::new(self))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self.kind, NodeKind::Sequence(_))
    }

    pub fn loop_type(&self) -> LoopType {
        self.loop_type.unwrap_or_default()
    }

    /// Index of the loop the current position belongs to.
    pub fn loop_index(&self) -> u32 {
        if self.is_complete {
            self.completed_loops.saturating_sub(1)
        } else {
            self.completed_loops
        }
    }

    /// Whether the current loop renders back to front.
    pub fn inverted(&self) -> bool {
        self.loop_type() == LoopType::Yoyo && self.loop_index() % 2 == 1
    }

    pub fn eval_position(&self) -> f32 {
        if self.inverted() {
            self.duration - self.position
        } else {
            self.position
        }
    }

    /// Elapsed time across all loops.
    pub fn full_position(&self) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        self.loop_index() as f32 * self.duration + self.position
    }

    /// Duration across all loops, `None` when looping forever.
    pub fn total_duration(&self) -> Option<f32> {
        self.loops.count().map(|n| n as f32 * self.duration)
    }

    pub fn at_start(&self) -> bool {
        !self.is_complete && self.completed_loops == 0 && self.position <= 0.0
    }

    /// Whether a play request in the current direction would move anything.
    pub fn can_play(&self) -> bool {
        if self.is_backwards {
            !self.at_start()
        } else {
            !self.is_complete
        }
    }

    /// Advance within the current loop, stopping at its end.
    pub fn move_forward(&mut self, remaining: &mut f32) -> Move {
        let room = self.duration - self.position;
        if *remaining < room {
            self.position += *remaining;
            *remaining = 0.0;
            Move::Within
        } else {
            *remaining -= room;
            self.position = self.duration;
            Move::Boundary
        }
    }

    /// Retreat within the current loop, stopping at its start.
    /// Landing exactly on the start of a later loop stays inside it.
    pub fn move_backward(&mut self, remaining: &mut f32) -> Move {
        if self.is_complete {
            // re-enter the last loop at its end
            self.is_complete = false;
            self.completed_loops = self.completed_loops.saturating_sub(1);
        }
        if *remaining < self.position || (*remaining == self.position && self.completed_loops > 0) {
            self.position -= *remaining;
            *remaining = 0.0;
            Move::Within
        } else {
            *remaining -= self.position;
            self.position = 0.0;
            Move::Boundary
        }
    }

    /// Step over the boundary `move_*` stopped on.
    pub fn cross(&mut self, forward: bool) -> Crossing {
        if forward {
            self.completed_loops = self.completed_loops.saturating_add(1);
            match self.loops.count() {
                Some(n) if self.completed_loops >= n => {
                    self.completed_loops = n;
                    self.position = self.duration;
                    self.is_complete = true;
                    self.is_playing = false;
                    Crossing::Finished
                }
                _ => {
                    self.position = 0.0;
                    Crossing::NextLoop
                }
            }
        } else if self.completed_loops == 0 {
            self.position = 0.0;
            self.started = false;
            self.is_playing = false;
            Crossing::Rewound
        } else {
            self.completed_loops -= 1;
            self.position = self.duration;
            Crossing::NextLoop
        }
    }

    /// Consume whole loops of `remaining` at once, right after a
    /// `NextLoop` crossing. Finite nodes stop one loop short of the final
    /// crossing so `Finished`/`Rewound` still go through `cross`; infinite
    /// nodes drop whatever a saturated loop counter cannot record.
    /// Returns how many loops were skipped.
    pub fn skip_loops(&mut self, remaining: &mut f32, forward: bool) -> u32 {
        if self.duration <= 0.0 || *remaining < self.duration {
            return 0;
        }
        let duration = self.duration as f64;
        let whole = (*remaining as f64 / duration).floor();
        let residual = (*remaining as f64 - whole * duration).clamp(0.0, duration) as f32;
        let residual = if residual >= self.duration { 0.0 } else { residual };

        if forward && self.loops.is_infinite() {
            // leave room for the crossing that follows
            let room = (u32::MAX - 1).saturating_sub(self.completed_loops);
            let skip = whole.min(room as f64) as u32;
            self.completed_loops += skip;
            *remaining = residual;
            return skip.max(1);
        }

        let room = match (forward, self.loops.count()) {
            (true, Some(n)) => n.saturating_sub(self.completed_loops).saturating_sub(1),
            _ => self.completed_loops,
        };
        let skip = whole.min(room as f64) as u32;
        if skip == 0 {
            return 0;
        }
        *remaining = if skip as f64 == whole {
            residual
        } else {
            (*remaining as f64 - skip as f64 * duration).max(0.0) as f32
        };
        if forward {
            self.completed_loops += skip;
        } else {
            self.completed_loops -= skip;
        }
        skip
    }

    /// Jump to `full` seconds across all loops. State only; nothing renders.
    pub fn set_full_position(&mut self, full: f32) {
        let full = if full.is_finite() { full.max(0.0) } else { 0.0 };
        if self.duration <= 0.0 {
            let reached = full > 0.0;
            self.position = 0.0;
            self.completed_loops = if reached { self.loops.count().unwrap_or(1) } else { 0 };
            self.is_complete = reached && !self.loops.is_infinite();
        } else if self.total_duration().is_some_and(|total| full >= total) {
            self.completed_loops = self.loops.count().unwrap_or(0);
            self.position = self.duration;
            self.is_complete = true;
        } else {
            let mut loops = (full / self.duration).floor();
            let mut position = full - loops * self.duration;
            if position >= self.duration {
                loops += 1.0;
                position = 0.0;
            }
            self.completed_loops = loops as u32;
            self.position = position.max(0.0);
            self.is_complete = false;
        }
        if full <= 0.0 {
            self.started = false;
        }
    }

    /// Fill options the builder left unset. Recurses into sequence children.
    pub fn resolve_defaults(&mut self, ease: &Ease, loop_type: LoopType) {
        if self.ease.is_none() {
            self.ease = Some(ease.clone());
        }
        if self.loop_type.is_none() {
            self.loop_type = Some(loop_type);
        }
        if let NodeKind::Sequence(seq) = &self.kind {
            for child in seq.nodes() {
                child.borrow_mut().resolve_defaults(ease, loop_type);
            }
        }
    }
}
