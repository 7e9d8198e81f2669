//! One-shot entity sequencer.
//!
//! Two jobs, independent of each other: prefetch players for every entity
//! near the reading position, and, behind a single engine-wide lock, play
//! one triggered paragraph's entities in reading order. A draining sequence
//! is never cancelled; it skips entries that are not ready and releases the
//! lock when its queue is exhausted.

use std::collections::VecDeque;

use fnv::FnvHashSet;

use crate::backend::{AudioBackend, PlayerHandle, PlayerRole, PlayerSpec};
use crate::cache::{PlayerCache, PlayerState};
use crate::constants::EngineTuning;
use crate::content::{EntityKey, Paragraph};
use crate::geometry::Candidate;
use crate::resolver::AssetResolver;

pub struct EntitySequencer<H> {
    players: PlayerCache<EntityKey, H>,
    triggered: FnvHashSet<usize>,
    /// True while a queue is draining. At most one sequence drains at any
    /// instant across the whole engine.
    draining: bool,
    queue: VecDeque<EntityKey>,
    /// The one-shot we are waiting on, if any.
    sounding: Option<EntityKey>,
}

impl<H: PlayerHandle> Default for EntitySequencer<H> {
    fn default() -> Self {
        Self {
            players: PlayerCache::default(),
            triggered: FnvHashSet::default(),
            draining: false,
            queue: VecDeque::new(),
            sounding: None,
        }
    }
}

impl<H: PlayerHandle> EntitySequencer<H> {
    /// Request players for every entity in the prefetch window (the closest
    /// paragraph and the `prefetch_ahead` after it). Runs regardless of the
    /// lock so sounds are ready before their paragraph triggers.
    pub fn prefetch<R: AssetResolver>(
        &mut self,
        resolver: &R,
        closest: Option<Candidate>,
        paragraphs: &[Paragraph],
        tuning: &EngineTuning,
    ) {
        let Some(Candidate { index, .. }) = closest else {
            return;
        };
        for i in index..=index.saturating_add(tuning.prefetch_ahead) {
            let Some(paragraph) = paragraphs.get(i) else {
                break;
            };
            for entity in &paragraph.entities {
                let key = EntityKey::new(i, entity.start_offset);
                if self.players.begin_fetch(key) {
                    log::debug!("[sequence] prefetching {} ({})", key, entity.kind);
                    resolver.resolve_entity(key, &entity.kind);
                }
            }
        }
    }

    /// Deliver a resolver outcome for one entity. Settlement only writes the
    /// cache; a sequence that already skipped this key never revisits it.
    pub fn settle<A: AudioBackend<Handle = H>>(
        &mut self,
        audio: &A,
        key: EntityKey,
        outcome: Option<String>,
        tuning: &EngineTuning,
    ) {
        let Some(url) = outcome else {
            if self.players.settle_failed(key) {
                log::debug!("[sequence] no sound available for {}", key);
            }
            return;
        };
        if !self.players.get(&key).is_some_and(PlayerState::is_pending) {
            return;
        }

        let role = PlayerRole::Entity { key };
        let spec = PlayerSpec::one_shot(tuning.entity_fade_in_secs, tuning.entity_fade_out_secs);
        match audio.create(role, &url, spec) {
            Ok(handle) => {
                self.players.settle_ready(key, handle);
            }
            Err(e) => {
                log::warn!("[sequence] player for {} failed: {}", key, e);
                self.players.settle_failed(key);
            }
        }
    }

    /// Trigger the closest paragraph's sequence if it is inside the trigger
    /// radius, has not triggered on this window entry, and the lock is free.
    pub fn maybe_trigger(
        &mut self,
        closest: Option<Candidate>,
        paragraphs: &[Paragraph],
        tuning: &EngineTuning,
    ) {
        let Some(Candidate { index, distance }) = closest else {
            return;
        };
        if distance >= tuning.trigger_distance || self.draining {
            return;
        }
        if !self.triggered.insert(index) {
            return;
        }

        let Some(paragraph) = paragraphs.get(index) else {
            return;
        };
        if paragraph.entities.is_empty() {
            return;
        }

        self.queue = paragraph
            .sorted_entities()
            .into_iter()
            .map(|e| EntityKey::new(index, e.start_offset))
            .collect();
        self.draining = true;
        log::debug!(
            "[sequence] paragraph {} triggered, {} entities queued",
            index,
            self.queue.len()
        );
        self.advance();
    }

    /// Completion notification for a natural one-shot end. Ignored unless it
    /// matches the key we are waiting on (a stop or a mute can leave stale
    /// notifications behind).
    pub fn one_shot_finished(&mut self, key: EntityKey) {
        if self.sounding != Some(key) {
            return;
        }
        self.sounding = None;
        self.advance();
    }

    /// Drop triggered marks for paragraphs that left the audible window, so
    /// scrolling back in can trigger them again.
    pub fn evict_triggered(&mut self, candidates: &[Candidate]) {
        if self.triggered.is_empty() {
            return;
        }
        let alive: FnvHashSet<usize> = candidates.iter().map(|c| c.index).collect();
        self.triggered.retain(|index| alive.contains(index));
    }

    /// Mute: stop the sounding one-shot, abandon the queue, release the lock.
    /// Triggered marks and cached players stay untouched.
    pub fn silence(&mut self) {
        if let Some(key) = self.sounding.take() {
            if let Some(PlayerState::Ready { handle, started }) = self.players.get_mut(&key) {
                handle.stop();
                *started = false;
            }
        }
        self.queue.clear();
        self.draining = false;
    }

    /// Dispose every player and forget all sequencing state. Teardown only.
    pub fn dispose(&mut self) {
        self.players.dispose_all();
        self.triggered.clear();
        self.queue.clear();
        self.sounding = None;
        self.draining = false;
    }

    pub fn is_draining(&self) -> bool {
        self.draining
    }

    /// Start the next ready player in the queue, skipping entries that are
    /// pending or failed without waiting on them. Releases the lock when the
    /// queue runs out.
    fn advance(&mut self) {
        while let Some(key) = self.queue.pop_front() {
            match self.players.get_mut(&key) {
                Some(PlayerState::Ready { handle, started }) => {
                    handle.start();
                    *started = true;
                    self.sounding = Some(key);
                    return;
                }
                // Pending, failed, or never fetched: skip immediately.
                _ => continue,
            }
        }
        self.draining = false;
        log::debug!("[sequence] queue drained, lock released");
    }
}
