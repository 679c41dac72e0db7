use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Handle to a node registered with a `TweenScheduler`.
    ///
    /// Handles are generational: once the node is killed, reaped or nested
    /// into a sequence, every operation on the old handle reports `NotFound`.
    pub struct TweenId;
}

/// User tag attached to a node for group operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TweenTag {
    Int(i64),
    Name(Rc<str>),
}

impl From<i64> for TweenTag {
    fn from(value: i64) -> Self {
        TweenTag::Int(value)
    }
}

impl From<i32> for TweenTag {
    fn from(value: i32) -> Self {
        TweenTag::Int(value as i64)
    }
}

impl From<&str> for TweenTag {
    fn from(value: &str) -> Self {
        TweenTag::Name(Rc::from(value))
    }
}

impl From<String> for TweenTag {
    fn from(value: String) -> Self {
        TweenTag::Name(Rc::from(value))
    }
}

impl fmt::Display for TweenTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TweenTag::Int(v) => write!(f, "{}", v),
            TweenTag::Name(v) => f.write_str(v),
        }
    }
}

/// Opaque reference to whatever object a node animates.
/// The core only compares it for equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetKey(pub u64);

impl TargetKey {
    /// Key derived from the address of `value`.
    pub fn of<T: ?Sized>(value: &T) -> Self {
        TargetKey(value as *const T as *const () as usize as u64)
    }
}

impl From<u64> for TargetKey {
    fn from(value: u64) -> Self {
        TargetKey(value)
    }
}

/// How values are evaluated across repeated loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoopType {
    /// Every loop plays start to end.
    #[default]
    Restart,
    /// Odd loops play end to start (ping-pong).
    Yoyo,
    /// Every loop continues from where the previous one ended.
    Incremental,
}

/// Number of loops a node plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loops {
    Finite(u32),
    Infinite,
}

impl Loops {
    /// Negative counts mean infinite.
    pub fn from_count(count: i32) -> Self {
        if count < 0 {
            Loops::Infinite
        } else {
            Loops::Finite(count as u32)
        }
    }

    pub fn is_infinite(self) -> bool {
        matches!(self, Loops::Infinite)
    }

    pub fn count(self) -> Option<u32> {
        match self {
            Loops::Finite(n) => Some(n),
            Loops::Infinite => None,
        }
    }
}

impl Default for Loops {
    fn default() -> Self {
        Loops::Finite(1)
    }
}

impl From<u32> for Loops {
    fn from(count: u32) -> Self {
        Loops::Finite(count)
    }
}

/// `-1` (any negative count) loops forever.
impl From<i32> for Loops {
    fn from(count: i32) -> Self {
        Loops::from_count(count)
    }
}

/// Which per-tick delta drives a root node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UpdateType {
    /// Frame delta scaled by the global time scale.
    #[default]
    Normal,
    /// Whole fixed steps from the scheduler's fixed-timestep accumulator.
    Fixed,
    /// Raw frame delta, ignoring the global time scale.
    TimeScaleIndependent,
}

/// Selects the active root nodes a group operation applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TweenFilter {
    All,
    Id(TweenTag),
    Target(TargetKey),
}

impl TweenFilter {
    pub fn matches(&self, id: Option<&TweenTag>, target: Option<TargetKey>) -> bool {
        match self {
            TweenFilter::All => true,
            TweenFilter::Id(tag) => id == Some(tag),
            TweenFilter::Target(key) => target == Some(*key),
        }
    }
}

impl From<TweenTag> for TweenFilter {
    fn from(tag: TweenTag) -> Self {
        TweenFilter::Id(tag)
    }
}

impl From<&str> for TweenFilter {
    fn from(tag: &str) -> Self {
        TweenFilter::Id(tag.into())
    }
}

impl From<i64> for TweenFilter {
    fn from(tag: i64) -> Self {
        TweenFilter::Id(tag.into())
    }
}

impl From<i32> for TweenFilter {
    fn from(tag: i32) -> Self {
        TweenFilter::Id(tag.into())
    }
}

impl From<TargetKey> for TweenFilter {
    fn from(key: TargetKey) -> Self {
        TweenFilter::Target(key)
    }
}
