// Edge segment geometry between a parent glyph and a child glyph.

use super::{EdgeAnchoring, Point};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SegmentGeometry {
    pub start: Point,
    pub end: Point,
    /// The glyphs overlap, so there was no gap to draw in.
    pub collapsed: bool,
}

/// Segment from `parent` to `child`, trimmed to the glyph circles when
/// anchoring at the boundary.
pub fn segment_between(
    parent: Point,
    parent_radius: f64,
    child: Point,
    child_radius: f64,
    anchoring: EdgeAnchoring,
) -> SegmentGeometry {
    if anchoring == EdgeAnchoring::Center {
        return SegmentGeometry { start: parent, end: child, collapsed: false };
    }

    let dist = child.distance(parent);
    if dist <= parent_radius + child_radius {
        let dir = if dist > 0.0 { (child - parent) * (1.0 / dist) } else { Point::ORIGIN };
        let a = parent + dir * parent_radius;
        let b = child - dir * child_radius;
        let mid = (a + b) * 0.5;
        return SegmentGeometry { start: mid, end: mid, collapsed: true };
    }

    let dir = Point::polar(child.angle_from(parent), 1.0);
    SegmentGeometry {
        start: parent + dir * parent_radius,
        end: child - dir * child_radius,
        collapsed: false,
    }
}
