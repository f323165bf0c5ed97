//! Result types, shaping and merging
//!
//! Turns raw store documents into the uniform items returned to callers.

mod container;
mod shaper;
mod types;

pub use container::ResultContainer;
pub use shaper::*;
pub use types::*;
