//! Pull Card - an interactive greeting card with a pull cord
//!
//! Core modules:
//! - `sim`: Platform-free simulation (cord physics, card state, dodging button)
//! - `layout`: Viewport and card geometry, debounced resize
//! - `tuning`: Data-driven tunables
//! - `renderer`: Canvas/DOM output (wasm only)
//! - `platform`: Browser haptics and confetti collaborators (wasm only)

pub mod layout;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod platform;
#[cfg(target_arch = "wasm32")]
pub mod renderer;

pub use layout::{Layout, Rect, ResizeDebounce, Viewport};
pub use tuning::Tuning;

use glam::Vec2;

/// Card configuration constants
pub mod consts {
    /// Number of cord segments (points = segments + 1)
    pub const CORD_SEGMENTS: usize = 10;
    /// Total resting cord length in pixels
    pub const CORD_LENGTH: f32 = 150.0;
    /// Draw radius of each cord point
    pub const POINT_RADIUS: f32 = 2.0;

    /// Constraint stiffness per solver iteration (0-1)
    pub const CORD_STIFFNESS: f32 = 0.1;
    /// Velocity damping per step (0-1, fraction removed)
    pub const CORD_DAMPING: f32 = 0.05;
    /// Constraint relaxation passes per step
    pub const SOLVER_ITERATIONS: u32 = 8;
    /// Downward acceleration applied to free points (pixels/s²)
    pub const CORD_GRAVITY: f32 = 400.0;
    /// Free end never strays further than this from the anchor
    pub const MAX_REACH: f32 = 10_000.0;

    /// Largest accepted frame delta (seconds)
    pub const MAX_DT: f32 = 0.1;

    /// Pull distance below the card top that opens the card
    pub const PULL_THRESHOLD: f32 = 300.0;
    /// Pull distance for short viewports
    pub const PULL_THRESHOLD_SHORT: f32 = 200.0;
    /// Viewports shorter than this use the short threshold
    pub const SHORT_VIEWPORT_HEIGHT: f32 = 600.0;

    /// Dodges before the decline button gives up
    pub const MAX_DODGES: u32 = 20;
    /// Viewports narrower than this use the narrow dodge range
    pub const NARROW_VIEWPORT_WIDTH: f32 = 480.0;
    pub const DODGE_MIN: f32 = 100.0;
    pub const DODGE_MAX: f32 = 350.0;
    pub const DODGE_MIN_NARROW: f32 = 70.0;
    pub const DODGE_MAX_NARROW: f32 = 200.0;
    /// Gap kept between the dodging button and the viewport edge
    pub const DODGE_MARGIN: f32 = 10.0;

    /// Plug sits this far back along the final cord segment
    pub const PLUG_OFFSET: f32 = 20.0;

    /// Resize events settle for this long before re-layout (ms)
    pub const RESIZE_SETTLE_MS: f64 = 250.0;

    /// Answer card size
    pub const ANSWER_CARD_WIDTH: f32 = 800.0;
    pub const ANSWER_CARD_HEIGHT: f32 = 540.0;
    /// Viewports narrower than this size the answer card relative to the viewport
    pub const COMPACT_VIEWPORT_WIDTH: f32 = 420.0;
    pub const COMPACT_CARD_FRACTION: f32 = 0.95;

    /// Repeating celebration on "yes"
    pub const CELEBRATION_INTERVAL: f32 = 5.0;
    pub const CELEBRATION_DURATION: f32 = 30.0;
}

/// Replace non-finite components with the fallback's
#[inline]
pub fn sanitize(v: Vec2, fallback: Vec2) -> Vec2 {
    Vec2::new(
        if v.x.is_finite() { v.x } else { fallback.x },
        if v.y.is_finite() { v.y } else { fallback.y },
    )
}

/// Angle of the vector from `a` to `b` in radians
#[inline]
pub fn angle_between(a: Vec2, b: Vec2) -> f32 {
    let d = b - a;
    d.y.atan2(d.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_sanitize_replaces_nan() {
        let v = sanitize(Vec2::new(f32::NAN, 3.0), Vec2::new(1.0, 2.0));
        assert_eq!(v, Vec2::new(1.0, 3.0));
        let v = sanitize(Vec2::new(4.0, f32::INFINITY), Vec2::ZERO);
        assert_eq!(v, Vec2::new(4.0, 0.0));
    }

    #[test]
    fn test_angle_between_straight_down() {
        // Screen y grows downward, so hanging straight down is +90°
        let a = angle_between(Vec2::ZERO, Vec2::new(0.0, 10.0));
        assert!((a - FRAC_PI_2).abs() < 1e-6);
    }
}
