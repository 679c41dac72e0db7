pub mod error;
pub mod settings;
pub mod types;

pub use error::TweenError;
pub use settings::TweenSettings;
pub use types::{LoopType, Loops, TargetKey, TweenFilter, TweenId, TweenTag, UpdateType};
