//! Projectile spawning and flight
//!
//! Projectiles move in integer pixel steps, advance first and resolve
//! collisions second, so a shot can die on the same tick it leaves the
//! panel or enters a wall. Removal is mark-then-compact: every projectile
//! advances and resolves against the same pre-tick world, then the dead
//! ones are swept in one pass.

use super::arena::Arena;
use super::collision::bounce_axes;
use super::rect::Rect;
use super::state::{Enemy, Player, Projectile, ProjectileKind};
use crate::consts::PROJECTILE_SIZE;
use crate::tuning::Tuning;

/// Spread half-angles for a shotgun volley, in degrees
const SPREAD_DEGREES: [f32; 5] = [-20.0, -10.0, 0.0, 10.0, 20.0];

/// Projectiles produced by one fire press: a single straight shot, or a
/// five-shot bouncing spread around the facing axis while the shotgun
/// power-up is running.
pub fn spawn_for_fire(player: &Player, tuning: &Tuning, panel: (i32, i32)) -> Vec<Projectile> {
    let center = player.pos.center();
    let rect = Rect::new(
        center.x as i32 - PROJECTILE_SIZE / 2,
        center.y as i32 - PROJECTILE_SIZE / 2,
        PROJECTILE_SIZE,
        PROJECTILE_SIZE,
    );

    if !player.shotgun {
        let unit = player.facing.unit();
        let (vx, vy) = (
            unit.x as i32 * tuning.projectile_speed,
            unit.y as i32 * tuning.projectile_speed,
        );
        return vec![Projectile::new(rect, vx, vy, ProjectileKind::Straight, panel)];
    }

    let base = player.facing.angle();
    SPREAD_DEGREES
        .iter()
        .map(|spread| {
            let angle = base + spread.to_radians();
            let vx = (angle.cos() * tuning.projectile_speed as f32).round() as i32;
            let vy = (angle.sin() * tuning.projectile_speed as f32).round() as i32;
            Projectile::new(
                rect,
                vx,
                vy,
                ProjectileKind::Bouncing {
                    bounces_remaining: tuning.bounce_budget,
                },
                panel,
            )
        })
        .collect()
}

/// One flight tick for every projectile: advance, then resolve against
/// obstacles, walls, and enemies in that order. Enemies hit here lose
/// health but are not removed; the corpse sweep happens later in the tick.
pub fn step(
    projectiles: &mut Vec<Projectile>,
    enemies: &mut [Enemy],
    arena: &Arena,
    tuning: &Tuning,
) {
    projectiles.retain_mut(|p| {
        p.advance();
        if p.is_out_of_bounds() {
            return false;
        }

        for block in arena.obstacles().iter().chain(arena.walls()) {
            if p.rect.intersects(block) {
                match &mut p.kind {
                    ProjectileKind::Straight => return false,
                    ProjectileKind::Bouncing { bounces_remaining } => {
                        if *bounces_remaining == 0 {
                            return false;
                        }
                        *bounces_remaining -= 1;
                        let (flip_x, flip_y) = bounce_axes(&p.rect, block);
                        if flip_x {
                            p.vx = -p.vx;
                        }
                        if flip_y {
                            p.vy = -p.vy;
                        }
                        break;
                    }
                }
            }
        }

        for enemy in enemies.iter_mut() {
            if enemy.is_alive() && p.rect.intersects(&enemy.pos.rect()) {
                enemy.take_damage(tuning.projectile_damage);
                return false;
            }
        }

        true
    });
}
