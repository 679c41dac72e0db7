// extensions/mod.rs
//
// Support code the core consumes but does not own: the easing table and
// the deterministic RNG behind shake tweens.

pub mod easing;
pub mod rng;

pub use easing::{Ease, EaseFn, Easing};
pub use rng::Rng;
