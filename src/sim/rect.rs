//! Axis-aligned integer rectangles
//!
//! The universal physical representation for every positioned entity
//! (player, enemies, projectiles, pickups) and for all static geometry
//! (walls, entrances, obstacles, tiles).

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box with integer pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Center point, rounded down
    #[inline]
    pub fn center(&self) -> (i32, i32) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }

    /// Strict AABB overlap: touching edges do not count as an intersection.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Extents of the intersection on each axis. Only meaningful when the
    /// rects actually intersect; both components are then positive.
    #[inline]
    pub fn overlap_extents(&self, other: &Rect) -> (i32, i32) {
        let ox = self.right().min(other.right()) - self.x.max(other.x);
        let oy = self.bottom().min(other.bottom()) - self.y.max(other.y);
        (ox, oy)
    }

    /// This rect grown by `margin` on every side
    pub fn inflate(&self, margin: i32) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.w + 2 * margin,
            self.h + 2 * margin,
        )
    }
}
