//! Card tunables
//!
//! Every hand-picked number the card relies on, in one serializable record.
//! The page can override any subset through a JSON `data-tuning` attribute.

use serde::Deserialize;

use crate::consts::*;

/// Upper bounds on per-frame work a page can ask for
const MAX_SEGMENTS: usize = 100;
const MAX_SOLVER_ITERATIONS: u32 = 64;

/// Cord, pull, and dodge tunables
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Cord ===
    /// Number of cord segments
    pub segments: usize,
    /// Total resting cord length (px)
    pub cord_length: f32,
    /// Constraint stiffness per solver pass (0-1)
    pub stiffness: f32,
    /// Velocity damping per step (0-1)
    pub damping: f32,
    /// Relaxation passes per step
    pub solver_iterations: u32,
    /// Downward acceleration on free points (px/s²)
    pub gravity: f32,

    // === Pull ===
    pub pull_threshold: f32,
    pub pull_threshold_short: f32,
    pub short_viewport_height: f32,

    // === Dodge ===
    pub max_dodges: u32,
    pub narrow_viewport_width: f32,
    pub dodge_min: f32,
    pub dodge_max: f32,
    pub dodge_min_narrow: f32,
    pub dodge_max_narrow: f32,
    pub dodge_margin: f32,

    // === Answer ===
    pub answer_card_width: f32,
    pub answer_card_height: f32,
    pub compact_viewport_width: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            segments: CORD_SEGMENTS,
            cord_length: CORD_LENGTH,
            stiffness: CORD_STIFFNESS,
            damping: CORD_DAMPING,
            solver_iterations: SOLVER_ITERATIONS,
            gravity: CORD_GRAVITY,

            pull_threshold: PULL_THRESHOLD,
            pull_threshold_short: PULL_THRESHOLD_SHORT,
            short_viewport_height: SHORT_VIEWPORT_HEIGHT,

            max_dodges: MAX_DODGES,
            narrow_viewport_width: NARROW_VIEWPORT_WIDTH,
            dodge_min: DODGE_MIN,
            dodge_max: DODGE_MAX,
            dodge_min_narrow: DODGE_MIN_NARROW,
            dodge_max_narrow: DODGE_MAX_NARROW,
            dodge_margin: DODGE_MARGIN,

            answer_card_width: ANSWER_CARD_WIDTH,
            answer_card_height: ANSWER_CARD_HEIGHT,
            compact_viewport_width: COMPACT_VIEWPORT_WIDTH,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override; missing keys keep defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Pull distance below the card top needed to open the card.
    ///
    /// Short viewports get the smaller value so the cord can still be
    /// pulled far enough without leaving the screen.
    pub fn pull_threshold(&self, viewport_height: f32) -> f32 {
        if viewport_height < self.short_viewport_height {
            self.pull_threshold_short
        } else {
            self.pull_threshold
        }
    }

    /// Dodge displacement range `(min, max)` for a viewport width
    pub fn dodge_range(&self, viewport_width: f32) -> (f32, f32) {
        if viewport_width < self.narrow_viewport_width {
            (self.dodge_min_narrow, self.dodge_max_narrow)
        } else {
            (self.dodge_min, self.dodge_max)
        }
    }

    /// Size the card grows to once answered
    pub fn answer_card_size(&self, viewport_width: f32) -> (f32, f32) {
        if viewport_width < self.compact_viewport_width {
            (viewport_width * COMPACT_CARD_FRACTION, self.answer_card_height)
        } else {
            (self.answer_card_width, self.answer_card_height)
        }
    }

    /// Rest length of one cord segment
    pub fn segment_length(&self) -> f32 {
        self.cord_length / self.segments as f32
    }

    /// Pull values back into ranges the simulation can use.
    ///
    /// Non-finite numbers fall back to their defaults.
    fn sanitized(mut self) -> Self {
        let d = Tuning::default();

        self.segments = self.segments.clamp(1, MAX_SEGMENTS);
        self.cord_length = positive_or(self.cord_length, d.cord_length);
        self.stiffness = finite_or(self.stiffness, d.stiffness).clamp(0.0, 1.0);
        self.damping = finite_or(self.damping, d.damping).clamp(0.0, 1.0);
        self.solver_iterations = self.solver_iterations.clamp(1, MAX_SOLVER_ITERATIONS);
        self.gravity = finite_or(self.gravity, d.gravity);

        self.pull_threshold = positive_or(self.pull_threshold, d.pull_threshold);
        self.pull_threshold_short = positive_or(self.pull_threshold_short, d.pull_threshold_short);
        self.short_viewport_height = finite_or(self.short_viewport_height, d.short_viewport_height);

        self.narrow_viewport_width = finite_or(self.narrow_viewport_width, d.narrow_viewport_width);
        self.dodge_min = finite_or(self.dodge_min, d.dodge_min).max(0.0);
        self.dodge_max = finite_or(self.dodge_max, d.dodge_max).max(0.0);
        self.dodge_min_narrow = finite_or(self.dodge_min_narrow, d.dodge_min_narrow).max(0.0);
        self.dodge_max_narrow = finite_or(self.dodge_max_narrow, d.dodge_max_narrow).max(0.0);
        if self.dodge_min > self.dodge_max {
            std::mem::swap(&mut self.dodge_min, &mut self.dodge_max);
        }
        if self.dodge_min_narrow > self.dodge_max_narrow {
            std::mem::swap(&mut self.dodge_min_narrow, &mut self.dodge_max_narrow);
        }
        self.dodge_margin = finite_or(self.dodge_margin, d.dodge_margin).max(0.0);

        self.answer_card_width = positive_or(self.answer_card_width, d.answer_card_width);
        self.answer_card_height = positive_or(self.answer_card_height, d.answer_card_height);
        self.compact_viewport_width =
            finite_or(self.compact_viewport_width, d.compact_viewport_width);
        self
    }
}

fn finite_or(v: f32, fallback: f32) -> f32 {
    if v.is_finite() { v } else { fallback }
}

fn positive_or(v: f32, fallback: f32) -> f32 {
    if v.is_finite() && v > 0.0 { v } else { fallback }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pull_threshold_by_height() {
        let t = Tuning::default();
        assert_eq!(t.pull_threshold(768.0), 300.0);
        assert_eq!(t.pull_threshold(599.0), 200.0);
        assert_eq!(t.pull_threshold(600.0), 300.0);
    }

    #[test]
    fn test_dodge_range_by_width() {
        let t = Tuning::default();
        assert_eq!(t.dodge_range(375.0), (70.0, 200.0));
        assert_eq!(t.dodge_range(1024.0), (100.0, 350.0));
    }

    #[test]
    fn test_answer_card_size() {
        let t = Tuning::default();
        let (w, h) = t.answer_card_size(400.0);
        assert!((w - 380.0).abs() < 1e-3);
        assert_eq!(h, 540.0);
        assert_eq!(t.answer_card_size(1024.0), (800.0, 540.0));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let t = Tuning::from_json(r#"{"max_dodges": 3, "segments": 0}"#).unwrap();
        assert_eq!(t.max_dodges, 3);
        assert_eq!(t.segments, 1);
        assert_eq!(t.cord_length, CORD_LENGTH);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Tuning::from_json("{not json").is_err());
    }

    #[test]
    fn test_inverted_dodge_range_is_swapped() {
        let t = Tuning::from_json(r#"{"dodge_min": 400.0, "dodge_max": 50.0}"#).unwrap();
        assert_eq!(t.dodge_range(1024.0), (50.0, 400.0));
    }

    #[test]
    fn test_overflowing_dodge_range_falls_back() {
        // 1e40 overflows f32 to infinity
        let t = Tuning::from_json(r#"{"dodge_max": 1e40, "dodge_min_narrow": -1e40}"#).unwrap();
        assert_eq!(t.dodge_max, DODGE_MAX);
        assert_eq!(t.dodge_min_narrow, DODGE_MIN_NARROW);
        let (min, max) = t.dodge_range(1024.0);
        assert!(min.is_finite() && max.is_finite() && min <= max);
    }

    #[test]
    fn test_every_tunable_is_finite_after_loading() {
        let json = r#"{
            "cord_length": 1e40, "gravity": 1e40, "pull_threshold": -5.0,
            "pull_threshold_short": 1e40, "dodge_margin": -1e40,
            "answer_card_width": 0.0, "answer_card_height": 1e40,
            "short_viewport_height": 1e40, "narrow_viewport_width": -1e40,
            "compact_viewport_width": 1e40
        }"#;
        let t = Tuning::from_json(json).unwrap();
        let d = Tuning::default();
        assert_eq!(t.cord_length, d.cord_length);
        assert_eq!(t.gravity, d.gravity);
        assert_eq!(t.pull_threshold, d.pull_threshold);
        assert_eq!(t.pull_threshold_short, d.pull_threshold_short);
        assert_eq!(t.dodge_margin, d.dodge_margin);
        assert_eq!(t.answer_card_size(1024.0), (d.answer_card_width, d.answer_card_height));
        assert_eq!(t.short_viewport_height, d.short_viewport_height);
        assert_eq!(t.narrow_viewport_width, d.narrow_viewport_width);
        assert_eq!(t.compact_viewport_width, d.compact_viewport_width);
    }

    #[test]
    fn test_work_per_frame_is_capped() {
        let t = Tuning::from_json(r#"{"segments": 1000000, "solver_iterations": 4000000}"#).unwrap();
        assert_eq!(t.segments, MAX_SEGMENTS);
        assert_eq!(t.solver_iterations, MAX_SOLVER_ITERATIONS);
    }
}
