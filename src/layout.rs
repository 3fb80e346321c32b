//! Viewport and card geometry
//!
//! All coordinates are viewport pixels with y growing downward.

use glam::Vec2;

use crate::consts::RESIZE_SETTLE_MS;

/// Visible page area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Axis-aligned box (a DOM bounding client rect)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Same box moved by `offset`
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            x: self.x + offset.x,
            y: self.y + offset.y,
            ..*self
        }
    }

    /// Whether this box lies inside the viewport with `margin` to spare
    pub fn within(&self, viewport: Viewport, margin: f32) -> bool {
        self.left() >= margin
            && self.top() >= margin
            && self.left() <= viewport.width - self.width - margin
            && self.top() <= viewport.height - self.height - margin
    }
}

/// Page geometry the simulation depends on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub viewport: Viewport,
    /// Card bounding box
    pub card: Rect,
}

impl Layout {
    pub fn new(viewport: Viewport, card: Rect) -> Self {
        Self { viewport, card }
    }

    /// Cord anchor: horizontally centred on the viewport, at the card's top edge
    pub fn anchor(&self) -> Vec2 {
        Vec2::new(self.viewport.width / 2.0, self.card.top())
    }

    pub fn card_top(&self) -> f32 {
        self.card.top()
    }
}

/// Collapses bursts of resize events into one re-layout.
///
/// Each `notify` restarts the settle window; `poll` yields the last viewport
/// once no new event arrived for the settle delay.
#[derive(Debug, Clone)]
pub struct ResizeDebounce {
    settle_ms: f64,
    pending: Option<(f64, Viewport)>,
}

impl Default for ResizeDebounce {
    fn default() -> Self {
        Self::new(RESIZE_SETTLE_MS)
    }
}

impl ResizeDebounce {
    pub fn new(settle_ms: f64) -> Self {
        Self {
            settle_ms,
            pending: None,
        }
    }

    /// Record a resize event at `now_ms`
    pub fn notify(&mut self, now_ms: f64, viewport: Viewport) {
        self.pending = Some((now_ms, viewport));
    }

    /// Settled viewport, if the settle delay has elapsed since the last event
    pub fn poll(&mut self, now_ms: f64) -> Option<Viewport> {
        match self.pending {
            Some((at, viewport)) if now_ms - at >= self.settle_ms => {
                self.pending = None;
                Some(viewport)
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_centered_on_card_top() {
        let layout = Layout::new(
            Viewport::new(1024.0, 768.0),
            Rect::new(312.0, 200.0, 400.0, 300.0),
        );
        assert_eq!(layout.anchor(), Vec2::new(512.0, 200.0));
    }

    #[test]
    fn test_rect_within_margin() {
        let vp = Viewport::new(375.0, 667.0);
        assert!(Rect::new(10.0, 10.0, 80.0, 40.0).within(vp, 10.0));
        assert!(!Rect::new(9.0, 10.0, 80.0, 40.0).within(vp, 10.0));
        assert!(!Rect::new(286.0, 10.0, 80.0, 40.0).within(vp, 10.0));
        assert!(Rect::new(285.0, 617.0, 80.0, 40.0).within(vp, 10.0));
    }

    #[test]
    fn test_debounce_waits_for_settle() {
        let mut d = ResizeDebounce::new(250.0);
        d.notify(0.0, Viewport::new(800.0, 600.0));
        assert_eq!(d.poll(100.0), None);
        // A newer event restarts the window
        d.notify(200.0, Viewport::new(900.0, 600.0));
        assert_eq!(d.poll(300.0), None);
        assert_eq!(d.poll(450.0), Some(Viewport::new(900.0, 600.0)));
        assert!(!d.is_pending());
        assert_eq!(d.poll(1000.0), None);
    }
}
