//! Celebration and haptic side effects
//!
//! The simulation only decides *when* to fire; an [`EffectSink`] supplied by
//! the host decides how (or whether) to actually vibrate or throw confetti.

use crate::consts::{CELEBRATION_DURATION, CELEBRATION_INTERVAL};

/// Vibration patterns (ms on, ms off, ...)
pub const VIBRATE_OPEN: &[u32] = &[50, 30, 50, 30, 50];
pub const VIBRATE_YES: &[u32] = &[200];
pub const VIBRATE_SAD: &[u32] = &[100, 50, 100];

/// One confetti burst
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfettiBurst {
    pub count: u32,
    /// Spread angle (degrees)
    pub spread: f32,
    /// Vertical origin as a fraction of the viewport height
    pub origin_y: f32,
}

pub const CONFETTI_OPEN: ConfettiBurst = ConfettiBurst {
    count: 200,
    spread: 100.0,
    origin_y: 0.6,
};

pub const CONFETTI_YES: ConfettiBurst = ConfettiBurst {
    count: 300,
    spread: 150.0,
    origin_y: 0.6,
};

/// A fire-and-forget side effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SideEffect {
    Vibrate(&'static [u32]),
    Confetti(ConfettiBurst),
}

/// Host collaborator that carries out side effects. Unsupported
/// capabilities should be silent no-ops.
pub trait EffectSink {
    fn vibrate(&mut self, pattern: &'static [u32]);
    fn confetti(&mut self, burst: ConfettiBurst);

    fn fire(&mut self, effect: SideEffect) {
        match effect {
            SideEffect::Vibrate(pattern) => self.vibrate(pattern),
            SideEffect::Confetti(burst) => self.confetti(burst),
        }
    }
}

/// Collects effects instead of performing them
impl EffectSink for Vec<SideEffect> {
    fn vibrate(&mut self, pattern: &'static [u32]) {
        self.push(SideEffect::Vibrate(pattern));
    }

    fn confetti(&mut self, burst: ConfettiBurst) {
        self.push(SideEffect::Confetti(burst));
    }
}

/// A burst repeated on an interval until a fixed duration has passed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Celebration {
    burst: ConfettiBurst,
    interval: f32,
    remaining: f32,
    until_next: f32,
}

impl Celebration {
    pub fn new(burst: ConfettiBurst, interval: f32, duration: f32) -> Self {
        Self {
            burst,
            interval,
            remaining: duration,
            until_next: interval,
        }
    }

    /// The "yes" celebration: a burst every 5 s for 30 s
    pub fn yes() -> Self {
        Self::new(CONFETTI_YES, CELEBRATION_INTERVAL, CELEBRATION_DURATION)
    }

    pub fn is_done(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Advance by `dt` seconds, returning the bursts that came due
    pub fn advance(&mut self, dt: f32) -> Vec<ConfettiBurst> {
        let mut due = Vec::new();
        if self.is_done() || !dt.is_finite() || dt <= 0.0 || self.interval <= 0.0 {
            return due;
        }
        let mut dt = dt.min(self.remaining);
        self.remaining -= dt;
        while dt >= self.until_next {
            dt -= self.until_next;
            self.until_next = self.interval;
            due.push(self.burst);
        }
        self.until_next -= dt;
        due
    }
}
