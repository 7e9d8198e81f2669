//! Scroll-synchronized soundscape engine.
//!
//! Platform-neutral: playback, asset resolution, and geometry are traits the
//! embedding driver implements. The engine itself is a deterministic state
//! machine advanced one tick per scroll notification.

pub mod ambient;
pub mod backend;
pub mod cache;
pub mod constants;
pub mod content;
pub mod engine;
pub mod geometry;
pub mod resolver;
pub mod sequencer;
pub mod volume;

pub use ambient::*;
pub use backend::*;
pub use cache::*;
pub use constants::*;
pub use content::*;
pub use engine::*;
pub use geometry::*;
pub use resolver::*;
pub use sequencer::*;
pub use volume::*;
