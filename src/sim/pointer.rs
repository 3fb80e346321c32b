//! Pointer tracking
//!
//! Mouse and touch events arrive in different shapes; this folds them into a
//! single stream of viewport positions with at most one active gesture.

use glam::Vec2;

/// Raw input as delivered by the host
#[derive(Debug, Clone, PartialEq)]
pub enum PointerInput {
    /// Mouse event with client coordinates
    Mouse { x: f32, y: f32 },
    /// Touch event with the client coordinates of every active touch
    Touch { touches: Vec<(f32, f32)> },
}

impl PointerInput {
    /// Single viewport position for this input, if it carries a usable one.
    ///
    /// Touch input uses the first active touch.
    pub fn sample(&self) -> Option<PointerSample> {
        let (x, y) = match self {
            PointerInput::Mouse { x, y } => (*x, *y),
            PointerInput::Touch { touches } => *touches.first()?,
        };
        PointerSample::new(x, y)
    }
}

/// A validated pointer position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub pos: Vec2,
}

impl PointerSample {
    pub fn new(x: f32, y: f32) -> Option<Self> {
        let pos = Vec2::new(x, y);
        pos.is_finite().then_some(Self { pos })
    }
}

/// What a drag event did to the tracker
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragUpdate {
    /// Event had no effect (no gesture, duplicate start, bad coordinates)
    Ignored,
    Started,
    Moved(PointerSample),
    Ended,
}

/// Tracks the single active drag gesture
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    active: bool,
    last: Option<PointerSample>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.active
    }

    /// Latest sample of the active gesture
    pub fn sample(&self) -> Option<PointerSample> {
        if self.active { self.last } else { None }
    }

    /// Begin a gesture. A second start while one is active is ignored.
    pub fn on_drag_start(&mut self, sample: Option<PointerSample>) -> DragUpdate {
        if self.active {
            return DragUpdate::Ignored;
        }
        self.active = true;
        self.last = sample;
        DragUpdate::Started
    }

    pub fn on_drag_move(&mut self, x: f32, y: f32) -> DragUpdate {
        if !self.active {
            return DragUpdate::Ignored;
        }
        match PointerSample::new(x, y) {
            Some(sample) => {
                self.last = Some(sample);
                DragUpdate::Moved(sample)
            }
            None => DragUpdate::Ignored,
        }
    }

    pub fn on_drag_end(&mut self) -> DragUpdate {
        if !self.active {
            return DragUpdate::Ignored;
        }
        self.active = false;
        self.last = None;
        DragUpdate::Ended
    }

    /// Whether the host should suppress native scrolling for the current event
    pub fn should_prevent_default(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_uses_first_touch() {
        let input = PointerInput::Touch {
            touches: vec![(10.0, 20.0), (99.0, 99.0)],
        };
        assert_eq!(input.sample().map(|s| s.pos), Some(Vec2::new(10.0, 20.0)));
    }

    #[test]
    fn test_empty_touch_list_has_no_sample() {
        let input = PointerInput::Touch { touches: vec![] };
        assert_eq!(input.sample(), None);
    }

    #[test]
    fn test_mouse_nan_has_no_sample() {
        let input = PointerInput::Mouse {
            x: f32::NAN,
            y: 3.0,
        };
        assert_eq!(input.sample(), None);
    }

    #[test]
    fn test_second_start_is_ignored() {
        let mut tracker = PointerTracker::new();
        assert_eq!(tracker.on_drag_start(None), DragUpdate::Started);
        tracker.on_drag_move(5.0, 6.0);
        assert_eq!(
            tracker.on_drag_start(PointerSample::new(0.0, 0.0)),
            DragUpdate::Ignored
        );
        assert_eq!(tracker.sample().map(|s| s.pos), Some(Vec2::new(5.0, 6.0)));
    }

    #[test]
    fn test_move_without_gesture_is_ignored() {
        let mut tracker = PointerTracker::new();
        assert_eq!(tracker.on_drag_move(1.0, 2.0), DragUpdate::Ignored);
        assert_eq!(tracker.sample(), None);
        assert!(!tracker.should_prevent_default());
    }

    #[test]
    fn test_end_clears_sample() {
        let mut tracker = PointerTracker::new();
        tracker.on_drag_start(PointerSample::new(1.0, 1.0));
        assert!(tracker.should_prevent_default());
        assert_eq!(tracker.on_drag_end(), DragUpdate::Ended);
        assert_eq!(tracker.sample(), None);
        assert_eq!(tracker.on_drag_end(), DragUpdate::Ignored);
    }

    #[test]
    fn test_bad_move_keeps_previous_sample() {
        let mut tracker = PointerTracker::new();
        tracker.on_drag_start(None);
        tracker.on_drag_move(4.0, 4.0);
        assert_eq!(tracker.on_drag_move(f32::INFINITY, 0.0), DragUpdate::Ignored);
        assert_eq!(tracker.sample().map(|s| s.pos), Some(Vec2::new(4.0, 4.0)));
    }
}
