//! Cord simulation: a chain of point masses joined by distance constraints
//!
//! Verlet integration followed by iterative constraint relaxation. The first
//! point is the anchor and never moves on its own; the last point is the
//! free end, pinned to the pointer while a drag is active and otherwise held
//! where it was left.

use glam::Vec2;

use crate::consts::{MAX_DT, MAX_REACH, POINT_RADIUS};
use crate::sanitize;
use crate::tuning::Tuning;

/// Distances below this are treated as coincident points
const MIN_SEPARATION: f32 = 1e-4;

/// A single point of the cord
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainPoint {
    pub pos: Vec2,
    /// Position at the previous step (Verlet velocity = pos - prev)
    pub prev: Vec2,
    /// Fixed points are never moved by integration or relaxation
    pub fixed: bool,
    pub radius: f32,
}

impl ChainPoint {
    fn new(pos: Vec2, fixed: bool) -> Self {
        Self {
            pos,
            prev: pos,
            fixed,
            radius: POINT_RADIUS,
        }
    }

    /// Teleport without injecting velocity
    fn place(&mut self, pos: Vec2) {
        self.pos = pos;
        self.prev = pos;
    }
}

/// Distance constraint between two adjacent points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraint {
    pub a: usize,
    pub b: usize,
    pub rest_length: f32,
}

/// Solver parameters taken from tuning
#[derive(Debug, Clone, Copy)]
pub struct ChainParams {
    pub stiffness: f32,
    pub damping: f32,
    pub iterations: u32,
    pub gravity: f32,
}

impl From<&Tuning> for ChainParams {
    fn from(t: &Tuning) -> Self {
        Self {
            stiffness: t.stiffness,
            damping: t.damping,
            iterations: t.solver_iterations,
            gravity: t.gravity,
        }
    }
}

/// The cord
#[derive(Debug, Clone)]
pub struct Chain {
    points: Vec<ChainPoint>,
    constraints: Vec<Constraint>,
    params: ChainParams,
    /// Latest pointer position while dragging
    pinned: Option<Vec2>,
    visible: bool,
}

impl Chain {
    /// Build a cord hanging straight down from `anchor`
    pub fn new(anchor: Vec2, tuning: &Tuning) -> Self {
        let segments = tuning.segments.max(1);
        let rest = tuning.segment_length();

        let points = (0..=segments)
            .map(|i| ChainPoint::new(anchor + Vec2::new(0.0, i as f32 * rest), i == 0))
            .collect();
        let constraints = (0..segments)
            .map(|i| Constraint {
                a: i,
                b: i + 1,
                rest_length: rest,
            })
            .collect();

        Self {
            points,
            constraints,
            params: ChainParams::from(tuning),
            pinned: None,
            visible: true,
        }
    }

    pub fn points(&self) -> &[ChainPoint] {
        &self.points
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn anchor(&self) -> Vec2 {
        self.points[0].pos
    }

    pub fn free_end(&self) -> Vec2 {
        self.points[self.points.len() - 1].pos
    }

    pub fn segments(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned.is_some()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Bind the free end to a pointer position. Non-finite samples are ignored.
    pub fn pin(&mut self, target: Vec2) {
        if !target.is_finite() {
            return;
        }
        let target = self.clamp_reach(target);
        self.pinned = Some(target);
        let last = self.points.len() - 1;
        self.points[last].place(target);
    }

    /// Let go of the free end; it stays where it is
    pub fn release(&mut self) {
        self.pinned = None;
    }

    /// Move the anchor and recompute rest lengths after a layout change.
    ///
    /// Only the anchor is moved; the rest of the cord settles over later steps.
    pub fn relayout(&mut self, anchor: Vec2, cord_length: f32) {
        if !anchor.is_finite() || !cord_length.is_finite() || cord_length <= 0.0 {
            return;
        }
        let rest = cord_length / self.constraints.len() as f32;
        for c in &mut self.constraints {
            c.rest_length = rest;
        }
        self.points[0].place(anchor);
    }

    /// Advance the cord by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_DT) } else { 0.0 };
        let last = self.points.len() - 1;

        // Pinned end follows the pointer; otherwise it holds still
        if let Some(target) = self.pinned {
            self.points[last].place(target);
        }

        let retain = 1.0 - self.params.damping;
        let gravity = Vec2::new(0.0, self.params.gravity * dt * dt);
        for (i, p) in self.points.iter_mut().enumerate() {
            if p.fixed || i == last {
                continue;
            }
            let velocity = (p.pos - p.prev) * retain;
            p.prev = p.pos;
            p.pos += velocity + gravity;
        }

        for _ in 0..self.params.iterations {
            self.relax();
        }

        self.repair();
    }

    /// One relaxation pass over all constraints
    fn relax(&mut self) {
        let last = self.points.len() - 1;
        let stiffness = self.params.stiffness;

        for c in &self.constraints {
            let (pa, pb) = (self.points[c.a], self.points[c.b]);
            let wa = if pa.fixed || c.a == last { 0.0 } else { 1.0 };
            let wb = if pb.fixed || c.b == last { 0.0 } else { 1.0 };
            let total = wa + wb;
            if total == 0.0 {
                continue;
            }

            let delta = pb.pos - pa.pos;
            let dist = delta.length();
            let (dir, dist) = if dist < MIN_SEPARATION {
                // Coincident points: push apart along the hanging direction
                (Vec2::Y, 0.0)
            } else {
                (delta / dist, dist)
            };

            let correction = dir * (dist - c.rest_length) * stiffness;
            self.points[c.a].pos += correction * (wa / total);
            self.points[c.b].pos -= correction * (wb / total);
        }
    }

    /// Keep every point finite and within reach of the anchor
    fn repair(&mut self) {
        let anchor = self.anchor();
        let rest = self
            .constraints
            .first()
            .map(|c| c.rest_length)
            .unwrap_or_default();

        for i in 1..self.points.len() {
            let hang = anchor + Vec2::new(0.0, i as f32 * rest);
            let p = self.points[i];
            if !p.pos.is_finite() || !p.prev.is_finite() {
                let pos = sanitize(p.pos, hang);
                self.points[i].place(pos);
            }
            let clamped = self.clamp_reach(self.points[i].pos);
            if clamped != self.points[i].pos {
                self.points[i].place(clamped);
            }
        }
    }

    fn clamp_reach(&self, target: Vec2) -> Vec2 {
        let anchor = self.anchor();
        let offset = target - anchor;
        if offset.length() > MAX_REACH {
            anchor + offset.normalize_or_zero() * MAX_REACH
        } else {
            target
        }
    }
}
