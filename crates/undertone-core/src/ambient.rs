//! Ambient bed manager: at most one bed audibly rising at a time.
//!
//! Each paragraph with a non-neutral tag owns at most one looping player for
//! the session. On every tick the bed closest to the reading line tracks the
//! reader's proximity while every other started bed ramps toward silence.

use crate::backend::{AudioBackend, PlayerHandle, PlayerRole, PlayerSpec};
use crate::cache::{PlayerCache, PlayerState};
use crate::constants::{EngineTuning, SILENCE_DB};
use crate::content::Paragraph;
use crate::geometry::Candidate;
use crate::resolver::AssetResolver;
use crate::volume::proximity_db;

pub struct AmbientBed<H> {
    players: PlayerCache<usize, H>,
}

impl<H: PlayerHandle> Default for AmbientBed<H> {
    fn default() -> Self {
        Self {
            players: PlayerCache::default(),
        }
    }
}

impl<H: PlayerHandle> AmbientBed<H> {
    /// One evaluation step against the tick's closest candidate.
    pub fn update<R: AssetResolver>(
        &mut self,
        resolver: &R,
        closest: Option<Candidate>,
        audible: f64,
        paragraphs: &[Paragraph],
        tuning: &EngineTuning,
    ) {
        // Everything started that is no longer closest fades down. Not
        // stopped: the ramp reaches silence within the fade window and
        // re-issuing it on later ticks is harmless.
        for (&index, state) in self.players.iter_mut() {
            if Some(index) == closest.map(|c| c.index) {
                continue;
            }
            if let PlayerState::Ready { handle, started } = state {
                if *started {
                    handle.set_volume(SILENCE_DB, tuning.ambient_fade_secs);
                }
            }
        }

        let Some(Candidate { index, distance }) = closest else {
            return;
        };
        let Some(paragraph) = paragraphs.get(index) else {
            return;
        };
        if paragraph.ambient_tag.is_neutral() {
            return;
        }

        if self.players.begin_fetch(index) {
            log::debug!(
                "[ambient] fetching bed for paragraph {} ({}/{})",
                index,
                paragraph.ambient_tag.age,
                paragraph.ambient_tag.sense
            );
            resolver.resolve_ambient(index, &paragraph.ambient_tag);
            return;
        }

        // Pending and Failed take no further action; Ready tracks proximity.
        if let Some(PlayerState::Ready { handle, started }) = self.players.get_mut(&index) {
            if !*started {
                handle.start();
                *started = true;
            }
            handle.set_volume(proximity_db(distance, audible), tuning.ambient_ramp_secs);
        }
    }

    /// Deliver a resolver outcome for one paragraph's bed.
    ///
    /// `still_closest` carries the last tick's closest candidate and audible
    /// radius when the settled paragraph is still the one being read; the
    /// fresh bed then starts immediately at that tick's proximity volume
    /// instead of waiting for the next scroll notification.
    pub fn settle<A: AudioBackend<Handle = H>>(
        &mut self,
        audio: &A,
        index: usize,
        outcome: Option<String>,
        still_closest: Option<(Candidate, f64)>,
        tuning: &EngineTuning,
    ) {
        let Some(url) = outcome else {
            if self.players.settle_failed(index) {
                log::debug!("[ambient] no bed available for paragraph {}", index);
            }
            return;
        };

        // Late or duplicate settlements for a non-pending key are dropped.
        if !self.players.get(&index).is_some_and(PlayerState::is_pending) {
            return;
        }

        let role = PlayerRole::Ambient { paragraph: index };
        let spec = PlayerSpec::ambient(tuning.ambient_fade_secs);
        match audio.create(role, &url, spec) {
            Ok(handle) => {
                self.players.settle_ready(index, handle);
                if let Some((closest, audible)) = still_closest {
                    if closest.index == index {
                        if let Some(PlayerState::Ready { handle, started }) =
                            self.players.get_mut(&index)
                        {
                            handle.start();
                            *started = true;
                            handle.set_volume(
                                proximity_db(closest.distance, audible),
                                tuning.ambient_ramp_secs,
                            );
                        }
                    }
                }
            }
            Err(e) => {
                log::warn!("[ambient] player for paragraph {} failed: {}", index, e);
                self.players.settle_failed(index);
            }
        }
    }

    /// Stop every started bed immediately (mute path). States stay cached.
    pub fn stop_all(&mut self) {
        self.players.stop_started();
    }

    /// Dispose every player. Teardown only.
    pub fn dispose(&mut self) {
        self.players.dispose_all();
    }
}
