//! Engine tuning constants.
//!
//! These express intended behavior (fade windows, trigger radii, ramp rates)
//! and keep magic numbers out of the evaluation path. `EngineTuning` bundles
//! them so a host (or a test) can tighten individual values without touching
//! the rest.

/// Fraction of viewport height below the top edge where the "reading line"
/// sits. Paragraph distances are measured against this line.
pub const REFERENCE_LINE_RATIO: f64 = 0.25;

/// Fraction of viewport height within which a paragraph is audible at all.
pub const AUDIBLE_DISTANCE_RATIO: f64 = 0.75;

/// Distance (px) under which a paragraph's entity sequence may trigger.
pub const TRIGGER_DISTANCE_PX: f64 = 50.0;

// Ambient bed timing: a bed that loses closest status fades out over half a
// second, while the closest bed's volume tracks proximity with a 0.1s ramp.
pub const AMBIENT_FADE_SECS: f64 = 0.5;
pub const AMBIENT_RAMP_SECS: f64 = 0.1;

// One-shot entity envelope
pub const ENTITY_FADE_IN_SECS: f64 = 0.2;
pub const ENTITY_FADE_OUT_SECS: f64 = 0.5;

/// How many paragraphs past the closest candidate get their entities
/// prefetched (closest, +1, .., +PREFETCH_AHEAD).
pub const PREFETCH_AHEAD: usize = 2;

/// Volume floor; ramping here silences a track without stopping it.
pub const SILENCE_DB: f32 = f32::NEG_INFINITY;

/// Per-engine tuning, defaulting to the constants above.
#[derive(Clone, Debug)]
pub struct EngineTuning {
    pub reference_line_ratio: f64,
    pub audible_distance_ratio: f64,
    pub trigger_distance: f64,
    pub ambient_fade_secs: f64,
    pub ambient_ramp_secs: f64,
    pub entity_fade_in_secs: f64,
    pub entity_fade_out_secs: f64,
    pub prefetch_ahead: usize,
}

impl Default for EngineTuning {
    fn default() -> Self {
        Self {
            reference_line_ratio: REFERENCE_LINE_RATIO,
            audible_distance_ratio: AUDIBLE_DISTANCE_RATIO,
            trigger_distance: TRIGGER_DISTANCE_PX,
            ambient_fade_secs: AMBIENT_FADE_SECS,
            ambient_ramp_secs: AMBIENT_RAMP_SECS,
            entity_fade_in_secs: ENTITY_FADE_IN_SECS,
            entity_fade_out_secs: ENTITY_FADE_OUT_SECS,
            prefetch_ahead: PREFETCH_AHEAD,
        }
    }
}
