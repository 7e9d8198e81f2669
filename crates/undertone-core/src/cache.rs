//! Per-key playback asset cache shared by both sound managers.
//!
//! Every key moves `absent -> Pending -> Ready | Failed` exactly once.
//! `Ready` and `Failed` are sticky for the engine's lifetime: there is no
//! retry policy, a failed resolution stays failed for the session.

use std::hash::Hash;

use fnv::FnvHashMap;

use crate::backend::PlayerHandle;

/// Fetch/playback state for one cache key.
#[derive(Debug)]
pub enum PlayerState<H> {
    /// Resolver request in flight; no second request may be issued.
    Pending,
    /// Playable handle, plus whether `start()` has been called on it.
    Ready { handle: H, started: bool },
    /// Resolution or construction failed; terminal for the session.
    Failed,
}

impl<H> PlayerState<H> {
    pub fn is_pending(&self) -> bool {
        matches!(self, PlayerState::Pending)
    }
}

/// Map from cache key to player state.
#[derive(Debug)]
pub struct PlayerCache<K, H> {
    entries: FnvHashMap<K, PlayerState<H>>,
}

impl<K, H> Default for PlayerCache<K, H> {
    fn default() -> Self {
        Self {
            entries: FnvHashMap::default(),
        }
    }
}

impl<K: Eq + Hash + Copy, H: PlayerHandle> PlayerCache<K, H> {
    /// Claim a key for fetching. Returns true iff the key was absent and is
    /// now `Pending`, i.e. iff the caller must issue the resolver request.
    /// Any later call for the same key returns false, which is what keeps
    /// overlapping ticks from double-fetching.
    pub fn begin_fetch(&mut self, key: K) -> bool {
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, PlayerState::Pending);
        true
    }

    /// Settle a pending fetch with a playable handle. Settling a key that is
    /// not `Pending` (already settled, or never claimed) is ignored.
    pub fn settle_ready(&mut self, key: K, handle: H) -> bool {
        match self.entries.get_mut(&key) {
            Some(state @ PlayerState::Pending) => {
                *state = PlayerState::Ready {
                    handle,
                    started: false,
                };
                true
            }
            _ => false,
        }
    }

    /// Settle a pending fetch as failed. Sticky; same guard as `settle_ready`.
    pub fn settle_failed(&mut self, key: K) -> bool {
        match self.entries.get_mut(&key) {
            Some(state @ PlayerState::Pending) => {
                *state = PlayerState::Failed;
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, key: &K) -> Option<&PlayerState<H>> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut PlayerState<H>> {
        self.entries.get_mut(key)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&K, &mut PlayerState<H>)> {
        self.entries.iter_mut()
    }

    /// Stop every started handle, leaving states in place. Used by mute.
    pub fn stop_started(&mut self) {
        for state in self.entries.values_mut() {
            if let PlayerState::Ready { handle, started } = state {
                if *started {
                    handle.stop();
                    *started = false;
                }
            }
        }
    }

    /// Dispose every live handle and drop all entries. Teardown only.
    pub fn dispose_all(&mut self) {
        for (_, state) in self.entries.drain() {
            if let PlayerState::Ready { handle, .. } = state {
                handle.dispose();
            }
        }
    }
}
