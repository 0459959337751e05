use serde::Serialize;

use crate::ir::Point;

use super::Region;

/// Axis-aligned box. Coordinates are whatever frame the caller works in.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn at(origin: Point, width: f32, height: f32) -> Self {
        Self::new(origin.x, origin.y, width, height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Overlap on each axis after growing `self` by `gap`. Both values are
    /// positive only when the boxes intersect.
    pub fn penetration(&self, other: &Rect, gap: f32) -> (f32, f32) {
        let overlap_x = (self.right() + gap).min(other.right()) - (self.x - gap).max(other.x);
        let overlap_y = (self.bottom() + gap).min(other.bottom()) - (self.y - gap).max(other.y);
        (overlap_x, overlap_y)
    }

    pub fn intersects(&self, other: &Rect, gap: f32) -> bool {
        let (overlap_x, overlap_y) = self.penetration(other, gap);
        overlap_x > 0.0 && overlap_y > 0.0
    }

    pub fn contains(&self, inner: &Rect) -> bool {
        const EPS: f32 = 1e-3;
        inner.x >= self.x - EPS
            && inner.y >= self.y - EPS
            && inner.right() <= self.right() + EPS
            && inner.bottom() <= self.bottom() + EPS
    }

    /// Moves `inner` (keeping its size) so it lies within `self`. When
    /// `inner` is larger than `self` on an axis it is pinned to the start.
    pub fn clamp_inside(&self, inner: Rect) -> Rect {
        let max_x = (self.right() - inner.width).max(self.x);
        let max_y = (self.bottom() - inner.height).max(self.y);
        Rect {
            x: inner.x.clamp(self.x, max_x),
            y: inner.y.clamp(self.y, max_y),
            ..inner
        }
    }
}

/// One of the nine region containers, placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionLayout {
    pub region: Region,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Members in graph insertion order.
    pub node_ids: Vec<String>,
}

impl RegionLayout {
    pub fn frame(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Area nodes may occupy, relative to the region's top-left corner.
    pub fn interior(&self, padding: f32) -> Rect {
        Rect::new(
            padding,
            padding,
            (self.width - padding * 2.0).max(0.0),
            (self.height - padding * 2.0).max(0.0),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    /// Always nine entries, in `Region::ALL` order.
    pub regions: Vec<RegionLayout>,
    pub width: f32,
    pub height: f32,
}

impl Layout {
    pub fn region(&self, region: Region) -> &RegionLayout {
        &self.regions[region.index()]
    }

    /// Canvas coordinates of a region-relative position.
    pub fn to_absolute(&self, region: Region, position: Point) -> Point {
        let frame = self.region(region);
        Point::new(frame.x + position.x, frame.y + position.y)
    }
}
