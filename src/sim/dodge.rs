//! The decline button that runs away
//!
//! Each approach spends one unit of a bounded budget and moves the button by
//! a random offset. Once the budget is spent the button stays put and can be
//! clicked.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::layout::{Rect, Viewport};
use crate::tuning::Tuning;

/// Bounded dodge counter. Only ever counts up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DodgeBudget {
    used: u32,
    max: u32,
}

impl DodgeBudget {
    pub fn new(max: u32) -> Self {
        Self { used: 0, max }
    }

    pub fn used(&self) -> u32 {
        self.used
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Once exhausted the button accepts clicks for good
    pub fn is_exhausted(&self) -> bool {
        self.used >= self.max
    }

    /// Spend one dodge; false when nothing is left
    fn spend(&mut self) -> bool {
        if self.is_exhausted() {
            return false;
        }
        self.used += 1;
        true
    }
}

/// Result of one dodge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dodge {
    /// Random offset as drawn, before any edge handling
    pub drawn: Vec2,
    /// Offset actually applied to the button
    pub applied: Vec2,
    /// Button box after the move
    pub rect: Rect,
}

/// Picks where the decline button jumps to
#[derive(Debug, Clone)]
pub struct DodgeController {
    rng: Pcg32,
}

impl DodgeController {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Pointer reached the button at `button`.
    ///
    /// Returns `None` once the budget is exhausted.
    pub fn on_approach(
        &mut self,
        budget: &mut DodgeBudget,
        button: Rect,
        viewport: Viewport,
        tuning: &Tuning,
    ) -> Option<Dodge> {
        if !budget.spend() {
            return None;
        }

        let (min, max) = tuning.dodge_range(viewport.width);
        let margin = tuning.dodge_margin;
        let drawn = Vec2::new(self.draw(min, max), self.draw(min, max));

        let x = place_axis(button.left(), drawn.x, viewport.width - button.width - margin, margin);
        let y = place_axis(button.top(), drawn.y, viewport.height - button.height - margin, margin);
        let rect = Rect::new(x, y, button.width, button.height);
        let applied = rect.origin() - button.origin();

        log::debug!(
            "Dodge {}/{}: drawn ({:.0}, {:.0}) applied ({:.0}, {:.0})",
            budget.used(),
            budget.max(),
            drawn.x,
            drawn.y,
            applied.x,
            applied.y
        );

        Some(Dodge {
            drawn,
            applied,
            rect,
        })
    }

    /// Uniform magnitude in `[min, max]` with a random sign
    fn draw(&mut self, min: f32, max: f32) -> f32 {
        let magnitude = self.rng.random_range(min..=max);
        if self.rng.random_bool(0.5) {
            -magnitude
        } else {
            magnitude
        }
    }
}

/// New coordinate along one axis: turn the offset back inside if it would
/// cross an edge, then clamp into `[margin, limit]`.
fn place_axis(current: f32, offset: f32, limit: f32, margin: f32) -> f32 {
    let mut offset = offset;
    if current + offset < margin {
        offset = offset.abs();
    }
    if current + offset > limit {
        offset = -offset.abs();
    }
    if limit < margin {
        return margin;
    }
    (current + offset).clamp(margin, limit)
}
