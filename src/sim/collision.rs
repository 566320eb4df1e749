//! Collision detection and positional correction
//!
//! Two contact strategies live here, matching two kinds of movers:
//!
//! - The player gets sliding correction: pushed out of each contacted rect
//!   along the axis of smaller overlap. Applied once per rect in list
//!   order, so simultaneous contacts resolve last-rect-wins rather than as
//!   a converged solve. Good enough at player speeds.
//! - Enemies use reattempt-and-revert (in `enemy.rs`): the full diagonal
//!   step is reverted on contact, then each axis is retried alone.
//!
//! Projectile bounce reflection also lives here since it shares the
//! overlap-extent math.

use super::arena::Arena;
use super::rect::Rect;

/// Does `rect` overlap any wall or obstacle?
pub fn collides_static(rect: &Rect, arena: &Arena) -> bool {
    arena.obstacles().iter().any(|o| rect.intersects(o))
        || arena.walls().iter().any(|w| rect.intersects(w))
}

/// Push `body` out of `other` along the axis of smaller overlap, by exactly
/// the overlap amount, away from `other`. No-op when they do not intersect.
pub fn slide_out(body: Rect, other: &Rect) -> Rect {
    if !body.intersects(other) {
        return body;
    }

    let (overlap_x, overlap_y) = body.overlap_extents(other);
    let mut corrected = body;

    if overlap_x < overlap_y {
        if body.x < other.x {
            corrected.x -= overlap_x;
        } else {
            corrected.x += overlap_x;
        }
    } else if body.y < other.y {
        corrected.y -= overlap_y;
    } else {
        corrected.y += overlap_y;
    }

    corrected
}

/// Sliding correction of `body` against every wall and obstacle, in list
/// order. Returns the corrected rect.
pub fn resolve_against_statics(body: Rect, arena: &Arena) -> Rect {
    let mut corrected = body;
    for wall in arena.walls() {
        corrected = slide_out(corrected, wall);
    }
    for obstacle in arena.obstacles() {
        corrected = slide_out(corrected, obstacle);
    }
    corrected
}

/// Which velocity components a bouncing projectile flips when reflecting
/// off `other`: `(flip_x, flip_y)`. Both flip on an exact corner hit.
pub fn bounce_axes(body: &Rect, other: &Rect) -> (bool, bool) {
    let (overlap_x, overlap_y) = body.overlap_extents(other);
    (overlap_x <= overlap_y, overlap_y <= overlap_x)
}
