// Activity definitions grouped by category

pub mod sample;
pub mod text;
pub mod timing;

// Re-export common activities
pub use sample::*;
pub use text::*;
pub use timing::*;
