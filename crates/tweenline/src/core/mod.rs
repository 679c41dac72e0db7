// core/mod.rs
//
// The node tree and the scheduler that drives it.

pub(crate) mod advance;
pub mod dispatch;
pub(crate) mod node;
pub mod scheduler;
pub(crate) mod sequence;
pub mod time;
pub mod tween;
pub(crate) mod tweener;

pub use dispatch::TweenCallback;
pub use scheduler::{TweenScheduler, TweenStatus};
pub use time::FixedTimestep;
pub use tween::Tween;
