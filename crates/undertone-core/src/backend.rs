//! Playback-primitive seam.
//!
//! The engine never touches an audio API directly; it asks an injected
//! `AudioBackend` to build players and then drives them through the
//! `PlayerHandle` contract. The browser driver implements these over
//! web-sys; tests implement them with recording fakes.

use thiserror::Error;

use crate::content::EntityKey;

/// Errors from building a player. The engine maps any of these to a sticky
/// `Failed` cache state and keeps going; nothing propagates further.
#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("audio output unavailable: {0}")]
    OutputUnavailable(String),
    #[error("failed to load {url}: {reason}")]
    LoadFailed { url: String, reason: String },
}

/// Which cache slot a player belongs to. Backends use this to label logs and
/// to route one-shot completion notifications back to the engine owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerRole {
    /// Looping ambient bed for a paragraph.
    Ambient { paragraph: usize },
    /// One-shot entity effect.
    Entity { key: EntityKey },
}

/// Construction parameters for a player, mirroring the playback primitive's
/// `create(url, {loop, fadeIn, fadeOut})` contract.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSpec {
    pub looping: bool,
    pub fade_in_secs: f64,
    pub fade_out_secs: f64,
}

impl PlayerSpec {
    /// Looping bed with the ambient crossfade envelope.
    pub fn ambient(fade_secs: f64) -> Self {
        Self {
            looping: true,
            fade_in_secs: fade_secs,
            fade_out_secs: fade_secs,
        }
    }

    /// One-shot effect with a fast attack and a soft tail.
    pub fn one_shot(fade_in_secs: f64, fade_out_secs: f64) -> Self {
        Self {
            looping: false,
            fade_in_secs,
            fade_out_secs,
        }
    }
}

/// Factory for players.
pub trait AudioBackend {
    type Handle: PlayerHandle;

    /// Build a player for `url`. Loading may continue in the background;
    /// `start()` on the returned handle must be safe to call immediately.
    fn create(
        &self,
        role: PlayerRole,
        url: &str,
        spec: PlayerSpec,
    ) -> Result<Self::Handle, PlayerError>;
}

/// A live player owned by the engine's caches.
///
/// For non-looping players the backend must deliver exactly one completion
/// notification to the engine (`one_shot_finished` with the role's key) when
/// playback ends naturally, not when it is stopped or disposed.
pub trait PlayerHandle {
    fn start(&self);
    fn stop(&self);
    /// Ramp the output level to `db` over `ramp_secs`. `-inf` is silence.
    fn set_volume(&self, db: f32, ramp_secs: f64);
    /// Release the underlying resources. Best-effort; errors are swallowed.
    fn dispose(self);
}
