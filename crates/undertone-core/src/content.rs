//! Content data model: paragraphs, mood tags, and tagged entities.
//!
//! These types mirror the content service's JSON (`audioTags`, `start_pos`,
//! `type`) and are otherwise plain data. A paragraph's index is its position
//! in the content slice and is stable for the reading session.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Mood tag pair driving ambient sound selection.
///
/// Either half being `"neutral"` means the paragraph has no ambient bed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbientTag {
    pub age: String,
    pub sense: String,
}

impl AmbientTag {
    pub fn new(age: impl Into<String>, sense: impl Into<String>) -> Self {
        Self {
            age: age.into(),
            sense: sense.into(),
        }
    }

    /// True when no ambient sound should ever be fetched for this tag.
    pub fn is_neutral(&self) -> bool {
        self.age == "neutral" || self.sense == "neutral"
    }
}

/// A tagged word or phrase that triggers a one-shot sound effect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Sound category, e.g. "vehicle", "weather", "animal_sound".
    #[serde(rename = "type")]
    pub kind: String,
    /// The surface text the tag covers, as shown to the reader.
    pub sample: String,
    /// Character offset of `sample` within the paragraph text. Unique per
    /// paragraph, not globally.
    #[serde(rename = "start_pos")]
    pub start_offset: usize,
}

/// One paragraph of a work, as returned by the content provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub text: String,
    #[serde(rename = "audioTags")]
    pub ambient_tag: AmbientTag,
    #[serde(default)]
    pub entities: Vec<Entity>,
}

impl Paragraph {
    /// Entities in reading order (ascending start offset). This is the
    /// canonical order both for inline highlighting and for one-shot
    /// sequencing.
    pub fn sorted_entities(&self) -> Vec<&Entity> {
        let mut sorted: Vec<&Entity> = self.entities.iter().collect();
        sorted.sort_by_key(|e| e.start_offset);
        sorted
    }

    /// Byte ranges of each entity's sample within `text`, in reading order,
    /// for renderers that highlight tagged phrases. Both ends are clamped to
    /// the text and snapped to character boundaries, so every span is safe
    /// to slice even when an offset overshoots the paragraph (shipped
    /// content has such rows) or lands inside a multi-byte character.
    pub fn entity_spans(&self) -> Vec<(Range<usize>, &Entity)> {
        self.sorted_entities()
            .into_iter()
            .map(|e| {
                let start = floor_char_boundary(&self.text, e.start_offset);
                let end = floor_char_boundary(
                    &self.text,
                    e.start_offset.saturating_add(e.sample.len()),
                );
                (start..end, e)
            })
            .collect()
    }
}

fn floor_char_boundary(text: &str, offset: usize) -> usize {
    let mut i = offset.min(text.len());
    while !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Cache key for one entity's player: paragraph index plus start offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey {
    pub paragraph: usize,
    pub offset: usize,
}

impl EntityKey {
    pub fn new(paragraph: usize, offset: usize) -> Self {
        Self { paragraph, offset }
    }
}

impl std::fmt::Display for EntityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.paragraph, self.offset)
    }
}
