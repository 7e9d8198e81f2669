//! The soundscape engine: one object owning all audio state, advanced by
//! explicit ticks.
//!
//! A tick is synchronous and cheap: measure, rank, then tell the ambient bed
//! and the entity sequencer what the reader is closest to. Asset resolution
//! is fire-and-forget; outcomes come back later through the `*_settled`
//! entry points, never during a tick.

use std::collections::BTreeMap;

use crate::ambient::AmbientBed;
use crate::backend::AudioBackend;
use crate::constants::EngineTuning;
use crate::content::{EntityKey, Paragraph};
use crate::geometry::{audible_distance, rank_candidates, Candidate, GeometryProvider, Rect};
use crate::resolver::AssetResolver;
use crate::sequencer::EntitySequencer;

pub struct SoundscapeEngine<A: AudioBackend, R: AssetResolver, G: GeometryProvider> {
    audio: A,
    resolver: R,
    geometry: G,
    paragraphs: Vec<Paragraph>,
    tuning: EngineTuning,
    elements: BTreeMap<usize, G::Element>,
    ambient: AmbientBed<A::Handle>,
    sequencer: EntitySequencer<A::Handle>,
    /// Closest candidate and audible radius of the last unmuted tick, kept
    /// for settlement decisions that arrive between ticks.
    last_closest: Option<Candidate>,
    last_audible: f64,
    last_muted: bool,
    detached: bool,
}

impl<A, R, G> SoundscapeEngine<A, R, G>
where
    A: AudioBackend,
    R: AssetResolver,
    G: GeometryProvider,
{
    pub fn new(
        audio: A,
        resolver: R,
        geometry: G,
        paragraphs: Vec<Paragraph>,
        tuning: EngineTuning,
    ) -> Self {
        log::info!("[engine] created for {} paragraphs", paragraphs.len());
        Self {
            audio,
            resolver,
            geometry,
            paragraphs,
            tuning,
            elements: BTreeMap::new(),
            ambient: AmbientBed::default(),
            sequencer: EntitySequencer::default(),
            last_closest: None,
            last_audible: 0.0,
            last_muted: true,
            detached: false,
        }
    }

    /// Associate a paragraph index with its on-screen element. Re-registering
    /// replaces the previous element.
    pub fn register_element(&mut self, index: usize, element: G::Element) {
        self.elements.insert(index, element);
    }

    pub fn unregister_element(&mut self, index: usize) {
        self.elements.remove(&index);
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// One evaluation tick. Call on every scroll notification and whenever
    /// the mute flag changes.
    pub fn evaluate(&mut self, muted: bool) {
        if self.detached {
            return;
        }
        self.last_muted = muted;
        if muted {
            self.ambient.stop_all();
            self.sequencer.silence();
            return;
        }

        let Some(viewport) = self.geometry.viewport() else {
            return;
        };
        let samples: Vec<(usize, Rect)> = self
            .elements
            .iter()
            .filter_map(|(&index, element)| {
                self.geometry.bounding_box(element).map(|rect| (index, rect))
            })
            .collect();

        let candidates = rank_candidates(viewport, &samples, &self.tuning);
        let closest = candidates.first().copied();
        self.last_closest = closest;
        self.last_audible = audible_distance(viewport, &self.tuning);

        self.ambient.update(
            &self.resolver,
            closest,
            self.last_audible,
            &self.paragraphs,
            &self.tuning,
        );
        self.sequencer
            .prefetch(&self.resolver, closest, &self.paragraphs, &self.tuning);
        self.sequencer
            .maybe_trigger(closest, &self.paragraphs, &self.tuning);
        self.sequencer.evict_triggered(&candidates);
    }

    /// Resolver outcome for an ambient bed. `None` means no sound exists for
    /// the paragraph's tag.
    pub fn ambient_settled(&mut self, index: usize, outcome: Option<String>) {
        if self.detached {
            return;
        }
        let still_closest = self
            .last_closest
            .filter(|c| !self.last_muted && c.index == index)
            .map(|c| (c, self.last_audible));
        self.ambient
            .settle(&self.audio, index, outcome, still_closest, &self.tuning);
    }

    /// Resolver outcome for an entity one-shot. A sequence that already
    /// skipped past this key does not come back for it.
    pub fn entity_settled(&mut self, key: EntityKey, outcome: Option<String>) {
        if self.detached {
            return;
        }
        self.sequencer.settle(&self.audio, key, outcome, &self.tuning);
    }

    /// Natural end of a one-shot player. Stale keys are ignored.
    pub fn one_shot_finished(&mut self, key: EntityKey) {
        if self.detached {
            return;
        }
        self.sequencer.one_shot_finished(key);
    }

    /// Tear down every player in both managers and forget all state.
    /// Idempotent; also runs on drop.
    pub fn detach(&mut self) {
        if self.detached {
            return;
        }
        self.detached = true;
        self.ambient.dispose();
        self.sequencer.dispose();
        self.elements.clear();
        log::info!("[engine] detached, all players disposed");
    }
}

impl<A, R, G> Drop for SoundscapeEngine<A, R, G>
where
    A: AudioBackend,
    R: AssetResolver,
    G: GeometryProvider,
{
    fn drop(&mut self) {
        self.detach();
    }
}
