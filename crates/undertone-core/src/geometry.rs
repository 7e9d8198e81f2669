//! Scroll geometry: viewport/paragraph rectangles and proximity ranking.
//!
//! The ranking is pure and synchronous; the engine feeds it one geometry
//! snapshot per tick and acts on the result. Everything here is measured in
//! the viewport's own pixel space.

use smallvec::SmallVec;

use crate::constants::EngineTuning;

/// Vertical slice of an on-screen box; all the engine needs of a bounding
/// rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Maps registered elements to their current bounding boxes.
///
/// `viewport` is the scroll viewport's rectangle in the same pixel space the
/// element boxes are reported in; `None` makes the whole tick a no-op.
/// `bounding_box` returns `None` when an element has no measurable geometry
/// this tick (detached from layout, zero-sized container, ...); the engine
/// then excludes that paragraph for this tick only.
pub trait GeometryProvider {
    type Element;

    fn viewport(&self) -> Option<Rect>;

    fn bounding_box(&self, element: &Self::Element) -> Option<Rect>;
}

/// A paragraph within audible range on the current tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub index: usize,
    pub distance: f64,
}

/// Reference line the reader's eyes are assumed to sit on: a quarter of the
/// way down the viewport.
pub fn reference_line(viewport: Rect, tuning: &EngineTuning) -> f64 {
    viewport.top + viewport.height * tuning.reference_line_ratio
}

/// Radius around the reference line within which paragraphs are audible.
pub fn audible_distance(viewport: Rect, tuning: &EngineTuning) -> f64 {
    viewport.height * tuning.audible_distance_ratio
}

/// Rank paragraphs by distance from the reading line.
///
/// Takes `(index, rect)` samples in registration order and returns every
/// paragraph strictly closer than the audible distance, sorted ascending by
/// distance. The sort is stable, so ties keep the input order. The head of
/// the returned list is the closest candidate.
pub fn rank_candidates(
    viewport: Rect,
    samples: &[(usize, Rect)],
    tuning: &EngineTuning,
) -> SmallVec<[Candidate; 16]> {
    let ref_line = reference_line(viewport, tuning);
    let audible = audible_distance(viewport, tuning);

    let mut candidates: SmallVec<[Candidate; 16]> = samples
        .iter()
        .filter_map(|&(index, rect)| {
            let distance = (rect.center_y() - ref_line).abs();
            (distance < audible).then_some(Candidate { index, distance })
        })
        .collect();
    candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    candidates
}
