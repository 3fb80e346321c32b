//! Ribbon and plug transforms derived from cord positions
//!
//! Pure functions only: the same points always produce the same frame.

use glam::Vec2;

use super::chain::ChainPoint;
use crate::angle_between;
use crate::consts::PLUG_OFFSET;

/// Placement of one ribbon segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentTransform {
    /// Segment start relative to the ribbon origin
    pub translate: Vec2,
    /// Segment length (the ribbon's drawn height)
    pub length: f32,
    /// Direction from start to end, radians
    pub angle: f32,
}

impl SegmentTransform {
    pub fn rotation_deg(&self) -> f32 {
        self.angle.to_degrees()
    }
}

/// Placement of the plug at the end of the cord
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlugTransform {
    /// Relative to the ribbon origin
    pub translate: Vec2,
    /// Rotation in degrees, with the plug's top-centre as the pivot
    pub rotation_deg: f32,
}

/// Everything needed to paint one frame of the cord
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RibbonFrame {
    pub segments: Vec<SegmentTransform>,
    pub plug: Option<PlugTransform>,
}

impl RibbonFrame {
    /// The segment the single ribbon element follows
    pub fn last_segment(&self) -> Option<&SegmentTransform> {
        self.segments.last()
    }
}

/// Compute the ribbon frame for `points`, relative to `origin`.
///
/// The plug is rigidly attached to the final segment: pulled back by
/// `PLUG_OFFSET` along its direction and rotated so it hangs along it.
pub fn ribbon_frame(points: &[ChainPoint], origin: Vec2) -> RibbonFrame {
    let segments: Vec<SegmentTransform> = points
        .windows(2)
        .map(|pair| {
            let (a, b) = (pair[0].pos, pair[1].pos);
            SegmentTransform {
                translate: a - origin,
                length: a.distance(b),
                angle: angle_between(a, b),
            }
        })
        .collect();

    let plug = segments.last().map(|seg| {
        let end = points[points.len() - 1].pos;
        let dir = Vec2::from_angle(seg.angle);
        PlugTransform {
            translate: end - origin - dir * PLUG_OFFSET,
            rotation_deg: seg.rotation_deg() - 90.0,
        }
    });

    RibbonFrame { segments, plug }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Chain;
    use crate::tuning::Tuning;

    #[test]
    fn test_hanging_cord_frame() {
        let chain = Chain::new(Vec2::new(100.0, 50.0), &Tuning::default());
        let frame = ribbon_frame(chain.points(), Vec2::new(100.0, 50.0));
        assert_eq!(frame.segments.len(), 10);
        let seg = frame.segments[3];
        assert!((seg.length - 15.0).abs() < 1e-4);
        assert!((seg.rotation_deg() - 90.0).abs() < 1e-3);
        assert!((seg.translate - Vec2::new(0.0, 45.0)).length() < 1e-4);

        // Hanging straight down: plug sits 20px above the end, unrotated
        let plug = frame.plug.unwrap();
        assert!((plug.translate - Vec2::new(0.0, 130.0)).length() < 1e-3);
        assert!(plug.rotation_deg.abs() < 1e-3);
    }

    #[test]
    fn test_frame_is_idempotent() {
        let mut chain = Chain::new(Vec2::ZERO, &Tuning::default());
        chain.pin(Vec2::new(70.0, 80.0));
        chain.step(1.0 / 60.0);
        let a = ribbon_frame(chain.points(), Vec2::ZERO);
        let b = ribbon_frame(chain.points(), Vec2::ZERO);
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_point_has_no_plug() {
        let chain = Chain::new(Vec2::ZERO, &Tuning::default());
        let frame = ribbon_frame(&chain.points()[..1], Vec2::ZERO);
        assert!(frame.segments.is_empty());
        assert!(frame.plug.is_none());
    }

    #[test]
    fn test_horizontal_segment_plug_rotation() {
        let chain = Chain::new(Vec2::ZERO, &Tuning::default());
        let mut points = chain.points()[..2].to_vec();
        points[1].pos = Vec2::new(15.0, 0.0);
        let frame = ribbon_frame(&points, Vec2::ZERO);
        // The ribbon element takes the segment angle as is; only the plug is offset
        let seg = frame.last_segment().unwrap();
        assert!(seg.rotation_deg().abs() < 1e-3);
        let plug = frame.plug.unwrap();
        assert!((plug.rotation_deg + 90.0).abs() < 1e-3);
        assert!((plug.translate - Vec2::new(-5.0, 0.0)).length() < 1e-4);
    }
}
