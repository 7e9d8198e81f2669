//! Asset-resolver seam.
//!
//! Resolution is fire-and-forget from the engine's point of view: the tick
//! claims the cache key, asks the resolver to start looking, and returns.
//! Whoever drives the engine delivers the outcome later through
//! `SoundscapeEngine::ambient_settled` / `entity_settled`, after the tick
//! has returned and never during it. A `None` outcome means "no sound
//! available" and is treated exactly like a resolver failure.

use crate::content::{AmbientTag, EntityKey};

pub trait AssetResolver {
    /// Start resolving the ambient bed for one paragraph's tag pair.
    fn resolve_ambient(&self, paragraph: usize, tag: &AmbientTag);

    /// Start resolving the one-shot sound for one entity's type.
    fn resolve_entity(&self, key: EntityKey, kind: &str);
}
