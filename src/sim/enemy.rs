//! Per-kind enemy movement policies
//!
//! Both policies are re-evaluated from scratch every tick; an enemy keeps
//! no intention beyond the current frame.
//!
//! - Funnel-then-chase: enemies spawn outside the panel. While outside they
//!   steer one axis at a time into the corridor band leading to their
//!   entrance, walk through it, then switch to direct pursuit with the
//!   reattempt-and-revert collision fallback.
//! - Grid pursuit (bosses): A* over tiles toward the player each tick,
//!   steering at the center of the next path tile. Reverts fully on
//!   collision, no axis-split fallback.

use glam::Vec2;

use super::arena::Arena;
use super::collision::collides_static;
use super::path::find_path;
use super::rect::Rect;
use super::state::{Direction, Enemy, MovementPolicy, Player};

/// Advance one enemy by one tick
pub fn drive(enemy: &mut Enemy, player: &Player, arena: &Arena) {
    if funnel_step(enemy, arena) {
        return;
    }
    match enemy.policy {
        MovementPolicy::FunnelThenChase => direct_pursuit(enemy, player, arena, true),
        MovementPolicy::GridPursuit => grid_pursuit(enemy, player, arena),
    }
}

/// Corridor band an enemy box must sit in to fit through a wall gap
fn corridor_band(gap_start: i32, gap_len: i32, dim: i32) -> (i32, i32) {
    (gap_start, gap_start + gap_len - dim)
}

/// Steering for enemies still outside the panel. Returns true when it
/// handled this tick's movement.
fn funnel_step(enemy: &mut Enemy, arena: &Arena) -> bool {
    let (w, h) = arena.panel_size();
    let t = arena.tile_size();
    let rect = enemy.pos.rect();

    let outside_x = rect.x < 0 || rect.right() > w;
    let outside_y = rect.y < 0 || rect.bottom() > h;
    if !outside_x && !outside_y {
        return false;
    }

    // Wall gaps are two tiles wide, centered on each edge
    let gap_x = (arena.cols() as i32 / 2 - 1) * t;
    let gap_y = (arena.rows() as i32 / 2 - 1) * t;
    let (band_x_lo, band_x_hi) = corridor_band(gap_x, 2 * t, rect.w);
    let (band_y_lo, band_y_hi) = corridor_band(gap_y, 2 * t, rect.h);
    let aligned_x = rect.x >= band_x_lo && rect.x <= band_x_hi;
    let aligned_y = rect.y >= band_y_lo && rect.y <= band_y_hi;

    let orig = rect;
    if outside_x && !aligned_y {
        // Left/right spawns slide along the wall toward the side corridor
        let dy = if rect.y < band_y_lo { enemy.speed } else { -enemy.speed };
        enemy.pos.translate(Vec2::new(0.0, dy));
    } else if outside_y && !aligned_x {
        let dx = if rect.x < band_x_lo { enemy.speed } else { -enemy.speed };
        enemy.pos.translate(Vec2::new(dx, 0.0));
    } else if outside_y {
        // Aligned with the top/bottom corridor: walk through it
        let dy = if rect.y < 0 { enemy.speed } else { -enemy.speed };
        enemy.pos.translate(Vec2::new(0.0, dy));
    } else {
        let dx = if rect.x < 0 { enemy.speed } else { -enemy.speed };
        enemy.pos.translate(Vec2::new(dx, 0.0));
    }

    update_facing(enemy, orig);
    true
}

/// Normalized chase toward the player's center. With `axis_fallback`, a
/// blocked diagonal step is reverted and each axis retried alone, which
/// produces wall sliding; without it the whole step is reverted.
fn direct_pursuit(enemy: &mut Enemy, player: &Player, arena: &Arena, axis_fallback: bool) {
    let to_player = player.pos.center() - enemy.pos.center();
    if to_player == Vec2::ZERO {
        return;
    }
    let step = to_player.normalize() * enemy.speed;
    let orig = enemy.pos.rect();

    enemy.pos.translate(step);
    if collides_static(&enemy.pos.rect(), arena) {
        enemy.pos.set_top_left(orig.x, orig.y);

        if axis_fallback {
            // Horizontal-only reattempt
            if to_player.x != 0.0 {
                enemy
                    .pos
                    .translate(Vec2::new(enemy.speed.copysign(to_player.x), 0.0));
                if collides_static(&enemy.pos.rect(), arena) {
                    let y = enemy.pos.rect().y;
                    enemy.pos.set_top_left(orig.x, y);
                }
            }
            // Vertical-only reattempt
            if to_player.y != 0.0 {
                enemy
                    .pos
                    .translate(Vec2::new(0.0, enemy.speed.copysign(to_player.y)));
                if collides_static(&enemy.pos.rect(), arena) {
                    let x = enemy.pos.rect().x;
                    enemy.pos.set_top_left(x, orig.y);
                }
            }
        }
    }

    update_facing(enemy, orig);
}

/// Pathfinding pursuit for bosses: head for the center of the second tile
/// on the A* path. Falls back to plain pursuit when no useful path exists
/// (e.g. the player stands on an unwalkable tile).
fn grid_pursuit(enemy: &mut Enemy, player: &Player, arena: &Arena) {
    let my_center = enemy.pos.center();
    let player_center = player.pos.center();

    let (Some(my_tile), Some(player_tile)) = (
        arena.tile_at(my_center.x as i32, my_center.y as i32),
        arena.tile_at(player_center.x as i32, player_center.y as i32),
    ) else {
        direct_pursuit(enemy, player, arena, false);
        return;
    };

    let path = find_path(arena, my_tile, player_tile);
    if path.len() < 2 {
        direct_pursuit(enemy, player, arena, false);
        return;
    }

    let next = arena.tile_rect(path[1]);
    let target = Vec2::new(
        next.x as f32 + next.w as f32 / 2.0,
        next.y as f32 + next.h as f32 / 2.0,
    );
    let to_next = target - my_center;
    if to_next == Vec2::ZERO {
        return;
    }

    let orig = enemy.pos.rect();
    enemy.pos.translate(to_next.normalize() * enemy.speed);
    if collides_static(&enemy.pos.rect(), arena) {
        enemy.pos.set_top_left(orig.x, orig.y);
    }

    update_facing(enemy, orig);
}

/// Facing from net displacement: horizontal wins when |dx| > |dy|, zero
/// displacement forces Down and clears the moving flag. Cosmetic only.
fn update_facing(enemy: &mut Enemy, orig: Rect) {
    let rect = enemy.pos.rect();
    let (dx, dy) = (rect.x - orig.x, rect.y - orig.y);

    if dx == 0 && dy == 0 {
        enemy.facing = Direction::Down;
        enemy.moving = false;
        return;
    }

    enemy.moving = true;
    if dx.abs() > dy.abs() {
        enemy.facing = if dx > 0 { Direction::Right } else { Direction::Left };
    } else {
        // dy must be nonzero here: |dx| <= |dy| with both zero was
        // handled above
        enemy.facing = if dy > 0 { Direction::Down } else { Direction::Up };
    }
}
