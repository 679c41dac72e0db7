// core/sequence.rs
//
// A sequence owns a timeline of child nodes, each placed at a start offset.
// Children are kept sorted by offset (stable for equal offsets), which is the
// order they are rendered in when the sequence moves forward. Moving
// backward walks the list in reverse.
//
// Usage:
//   let seq = Tween::sequence()
//       .append(Tween::to(a, FloatPlugin, 1.0, 1.0))?
//       .insert(0.5, Tween::to(b, FloatPlugin, 1.0, 1.0))?
//       .append_callback(|_| log::info!("done"))?;

use super::dispatch::{Hook, TweenCallback};
use super::node::{Node, NodeKind, NodeRef};
use crate::api::error::TweenError;

pub(crate) struct Child {
    pub offset: f32,
    pub node: NodeRef,
}

#[derive(Default)]
pub(crate) struct SequenceData {
    children: Vec<Child>,
}

impl SequenceData {
    #[cfg(test)]
    pub fn children(&self) -> &[Child] {
        &self.children
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeRef> {
        self.children.iter().map(|c| &c.node)
    }

    /// (offset, node) pairs in timeline order, detached from the sequence
    /// so children can be stepped without holding its borrow.
    pub fn snapshot(&self) -> Vec<(f32, NodeRef)> {
        self.children.iter().map(|c| (c.offset, c.node.clone())).collect()
    }

    fn place(&mut self, offset: f32, node: NodeRef) {
        let at = self.children.partition_point(|c| c.offset <= offset);
        self.children.insert(at, Child { offset, node });
    }

    fn shift(&mut self, by: f32) {
        for child in &mut self.children {
            child.offset += by;
        }
    }
}

/// Duration a child occupies on its parent's timeline.
fn span(child: &Node) -> f32 {
    child.total_duration().unwrap_or(0.0)
}

fn check_offset(at: f32) -> Result<f32, TweenError> {
    if !at.is_finite() || at < 0.0 {
        return Err(TweenError::InvalidConfiguration(format!(
            "sequence offset must be finite and non-negative, got {at}"
        )));
    }
    Ok(at)
}

fn check_interval(duration: f32) -> Result<f32, TweenError> {
    if !duration.is_finite() || duration < 0.0 {
        return Err(TweenError::InvalidConfiguration(format!(
            "interval must be finite and non-negative, got {duration}"
        )));
    }
    Ok(duration)
}

fn check_editable(seq: &Node) -> Result<(), TweenError> {
    if !seq.is_sequence() {
        return Err(TweenError::InvalidOperation("not a sequence"));
    }
    if seq.started || !seq.at_start() {
        return Err(TweenError::InvalidOperation("sequence already started"));
    }
    Ok(())
}

fn check_child(child: &Node) -> Result<(), TweenError> {
    if child.loops.is_infinite() {
        return Err(TweenError::InvalidConfiguration(
            "infinite-loop nodes cannot be nested".into(),
        ));
    }
    if child.started || !child.at_start() {
        return Err(TweenError::InvalidOperation("cannot nest a node that already started"));
    }
    Ok(())
}

/// Place `child` at `at` seconds on `seq`'s timeline. The child's delay is
/// folded into its offset; its own play state is ignored from now on.
pub(crate) fn insert(seq: &mut Node, at: f32, child: NodeRef) -> Result<(), TweenError> {
    check_editable(seq)?;
    check_offset(at)?;
    check_child(&child.borrow())?;
    insert_unchecked(seq, at, child);
    Ok(())
}

fn insert_unchecked(seq: &mut Node, at: f32, child: NodeRef) {
    let (offset, end) = {
        let mut c = child.borrow_mut();
        let offset = at + c.delay;
        c.delay = 0.0;
        c.elapsed_delay = 0.0;
        c.is_playing = true;
        c.is_backwards = false;
        (offset, offset + span(&c))
    };
    if let NodeKind::Sequence(data) = &mut seq.kind {
        data.place(offset, child);
        seq.duration = seq.duration.max(end);
    }
}

pub(crate) fn append(seq: &mut Node, child: NodeRef) -> Result<(), TweenError> {
    let at = seq.duration;
    insert(seq, at, child)
}

/// Insert at 0 and push every existing child back by the child's span.
pub(crate) fn prepend(seq: &mut Node, child: NodeRef) -> Result<(), TweenError> {
    check_editable(seq)?;
    let by = {
        let c = child.borrow();
        check_child(&c)?;
        c.delay + span(&c)
    };
    shift(seq, by);
    insert_unchecked(seq, 0.0, child);
    Ok(())
}

pub(crate) fn append_interval(seq: &mut Node, duration: f32) -> Result<(), TweenError> {
    check_editable(seq)?;
    seq.duration += check_interval(duration)?;
    Ok(())
}

pub(crate) fn prepend_interval(seq: &mut Node, duration: f32) -> Result<(), TweenError> {
    check_editable(seq)?;
    let by = check_interval(duration)?;
    shift(seq, by);
    Ok(())
}

/// Callback child: fires once each time the timeline passes `at`,
/// in either direction.
pub(crate) fn insert_callback(seq: &mut Node, at: f32, cb: TweenCallback) -> Result<(), TweenError> {
    check_editable(seq)?;
    check_offset(at)?;
    let mut marker = Node::new(NodeKind::Marker, 0.0);
    marker.callbacks.set(Hook::StepComplete, cb.clone());
    marker.callbacks.set(Hook::Rewind, cb);
    insert_unchecked(seq, at, marker.into_ref());
    Ok(())
}

fn shift(seq: &mut Node, by: f32) {
    if let NodeKind::Sequence(data) = &mut seq.kind {
        data.shift(by);
    }
    seq.duration += by;
}
