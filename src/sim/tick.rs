//! The fixed-timestep simulation step
//!
//! [`tick`] advances the whole game by exactly one frame. Phase order
//! inside a tick is fixed:
//!
//! 1. wave scheduler (start trigger, one spawn per tick while spawning)
//! 2. player movement and enemy steering
//! 3. player sliding correction against static geometry
//! 4. fire input and projectile flight
//! 5. corpse sweep (score, events, boss drops)
//! 6. contact damage with per-enemy cooldowns
//! 7. pickup collection and power-up/heal inputs
//! 8. animation frames, wave completion, death check
//!
//! All randomness flows through `state.rng`, so two runs with the same
//! seed and the same input sequence stay identical.

use rand::Rng;

use super::collision::resolve_against_statics;
use super::enemy;
use super::projectile;
use super::rect::Rect;
use super::state::{
    Direction, Enemy, EnemyKind, GameEvent, GameState, InventoryPowerUp, Pickup, PickupKind,
    WavePhase, WaveState,
};
use crate::consts::{ENEMY_SIZE, FRAME_REFRESH_RATE};

/// Player intent for one tick, sampled by the shell. `fire`,
/// `activate_power_up`, `use_heal` and `start_wave` are edge-triggered:
/// the shell sets them for one tick per press.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub move_up: bool,
    pub move_down: bool,
    pub fire: bool,
    pub activate_power_up: bool,
    pub use_heal: bool,
    pub start_wave: bool,
}

/// Advance the simulation by one frame. No-op once the run is over.
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.game_over {
        return;
    }
    state.time_ticks += 1;

    run_wave_scheduler(state, input);
    move_player(state, input);
    let GameState {
        enemies,
        player,
        arena,
        ..
    } = state;
    for e in enemies.iter_mut() {
        enemy::drive(e, player, arena);
    }
    correct_player(state);

    if input.fire {
        let panel = state.arena.panel_size();
        let shots = projectile::spawn_for_fire(&state.player, &state.tuning, panel);
        state.projectiles.extend(shots);
    }
    projectile::step(
        &mut state.projectiles,
        &mut state.enemies,
        &state.arena,
        &state.tuning,
    );

    sweep_corpses(state);
    apply_contact_damage(state);
    collect_pickups(state);

    if input.activate_power_up {
        state.player.activate_next_power_up(&state.tuning);
    }
    if input.use_heal {
        state.player.use_heal(&state.tuning);
    }
    state.player.update_power_ups(&state.tuning);

    advance_animation(state);
    complete_wave(state);

    if !state.player.is_alive() {
        state.game_over = true;
        state.push_event(GameEvent::PlayerDied);
    }
}

/// Start trigger plus one spawn per tick while the wave is filling
fn run_wave_scheduler(state: &mut GameState, input: &TickInput) {
    if input.start_wave && state.wave.phase == WavePhase::Idle {
        state.wave.phase = WavePhase::Spawning;
        state.push_event(GameEvent::WaveStarted {
            wave: state.wave.wave,
        });
    }
    if state.wave.phase != WavePhase::Spawning {
        return;
    }

    let entrance = (state.next_enemy_id % 4) as usize;
    let mut rect = state.arena.clear_spawn_point(entrance, ENEMY_SIZE);
    // Enemies queued at the same entrance stack outward along its
    // tangential axis; the funnel walks them back to the corridor.
    let offset = state.wave.entrance_counts[entrance] as i32 * state.tuning.spawn_spacing;
    match entrance {
        0 | 1 => rect.x += offset,
        _ => rect.y += offset,
    }

    let id = state.next_enemy_id;
    let spawned = if state.wave.is_boss_wave() {
        Enemy::boss(id, rect, state.wave.wave, &state.tuning)
    } else {
        Enemy::basic(id, rect, &state.tuning)
    };
    state.enemies.push(spawned);
    state.next_enemy_id += 1;
    state.wave.entrance_counts[entrance] += 1;
    state.wave.spawned += 1;
    if state.wave.spawned >= state.wave.quota {
        state.wave.phase = WavePhase::Draining;
    }
}

fn move_player(state: &mut GameState, input: &TickInput) {
    let bounds = state.arena.panel_size();
    let mut moving = false;
    if input.move_left {
        state.player.move_dir(Direction::Left, bounds);
        moving = true;
    }
    if input.move_right {
        state.player.move_dir(Direction::Right, bounds);
        moving = true;
    }
    if input.move_up {
        state.player.move_dir(Direction::Up, bounds);
        moving = true;
    }
    if input.move_down {
        state.player.move_dir(Direction::Down, bounds);
        moving = true;
    }
    state.player.moving = moving;
}

/// Sliding correction after movement, one pass over walls and obstacles
fn correct_player(state: &mut GameState) {
    let body = state.player.pos.rect();
    let corrected = resolve_against_statics(body, &state.arena);
    if corrected != body {
        state.player.pos.set_top_left(corrected.x, corrected.y);
    }
}

/// Remove dead enemies, award score, emit events, drop boss loot
fn sweep_corpses(state: &mut GameState) {
    let enemies = std::mem::take(&mut state.enemies);
    for enemy in enemies {
        if enemy.is_alive() {
            state.enemies.push(enemy);
            continue;
        }
        state.score += state.tuning.kill_score;
        state.damage_cooldowns.remove(&enemy.id);
        if enemy.kind == EnemyKind::Boss {
            state.pickups.push(heal_drop(&enemy, state.arena.tile_size()));
        }
        state.push_event(GameEvent::EnemyDestroyed { id: enemy.id });
    }
}

/// Bosses leave a heal charge behind where they fell
fn heal_drop(enemy: &Enemy, tile_size: i32) -> Pickup {
    let size = tile_size / 2;
    let (cx, cy) = enemy.pos.rect().center();
    Pickup {
        rect: Rect::new(cx - size / 2, cy - size / 2, size, size),
        kind: PickupKind::Heal,
    }
}

/// Contact damage with a per-enemy cooldown, checked before it counts
/// down: damage lands when the counter reads 0, otherwise the counter
/// drops by one, so hits are a full cooldown-plus-one ticks apart.
/// Separation clears the entry, so re-contact hurts immediately.
fn apply_contact_damage(state: &mut GameState) {
    let player_rect = state.player.pos.rect();
    let touching: Vec<u32> = state
        .enemies
        .iter()
        .filter(|e| e.pos.rect().intersects(&player_rect))
        .map(|e| e.id)
        .collect();

    state.damage_cooldowns.retain(|id, _| touching.contains(id));

    for id in touching {
        let remaining = state.damage_cooldowns.entry(id).or_insert(0);
        if *remaining == 0 {
            *remaining = state.tuning.damage_cooldown_ticks;
            state.player.apply_damage(state.tuning.contact_damage);
        } else {
            *remaining -= 1;
        }
    }
}

fn collect_pickups(state: &mut GameState) {
    let player_rect = state.player.pos.rect();
    let pickups = std::mem::take(&mut state.pickups);
    for pickup in pickups {
        if !pickup.rect.intersects(&player_rect) {
            state.pickups.push(pickup);
            continue;
        }
        match pickup.kind {
            PickupKind::Heal => state.player.heal_charges += 1,
            kind => state.player.inventory.push(InventoryPowerUp {
                kind,
                remaining: 0,
                active: false,
            }),
        }
        state.push_event(GameEvent::PickupCollected { kind: pickup.kind });
    }
}

/// Two-frame walk cycle, flipped on a fixed cadence
fn advance_animation(state: &mut GameState) {
    if state.time_ticks % FRAME_REFRESH_RATE != 0 {
        return;
    }
    if state.player.moving {
        state.player.frame = (state.player.frame + 1) % 2;
    }
    for enemy in &mut state.enemies {
        if enemy.moving {
            enemy.frame = (enemy.frame + 1) % 2;
        }
    }
}

/// Once a draining wave runs dry: advance the wave counter, reset spawn
/// bookkeeping, clear leftover shots, and apply the periodic side effects
/// (arena reroll every fifth wave, pickup drops every third).
fn complete_wave(state: &mut GameState) {
    if state.wave.phase != WavePhase::Draining || !state.enemies.is_empty() {
        return;
    }
    let finished = state.wave.wave;
    log::info!("wave {finished} drained after {} ticks", state.time_ticks);
    state.push_event(GameEvent::WaveCompleted { wave: finished });
    state.projectiles.clear();

    let next = finished + 1;
    state.wave.wave = next;
    state.wave.quota = WaveState::quota_for(next);
    state.wave.spawned = 0;
    state.wave.entrance_counts = [0; 4];
    state.wave.phase = WavePhase::Idle;

    if next > 1 && next % 5 == 1 {
        let level = next / 5 + 1;
        if let Err(err) = state.arena.regenerate_obstacles(level, &mut state.rng) {
            log::warn!("arena reroll for level {level} fell short: {err}");
        }
        // The fresh layout may drop an obstacle where the player stood or
        // where loot lay, so the player restarts from the spawn tile and
        // stale pickups are discarded.
        let start = GameState::player_start_rect(&state.arena);
        state.player.pos.set_top_left(start.x, start.y);
        state.pickups.clear();
        state.push_event(GameEvent::ArenaRegenerated { level });
    }
    if next >= 3 && next % 3 == 0 {
        place_pickups(state);
    }
}

/// Drop one shotgun and one speed boost on random open tiles, each a
/// half-tile box centered in its tile
fn place_pickups(state: &mut GameState) {
    let tiles = state.arena.walkable_tiles();
    if tiles.is_empty() {
        return;
    }
    for kind in [PickupKind::Shotgun, PickupKind::SpeedBoost] {
        let tile = tiles[state.rng.random_range(0..tiles.len())];
        let size = tile.w / 2;
        state.pickups.push(Pickup {
            rect: Rect::new(
                tile.x + (tile.w - size) / 2,
                tile.y + (tile.h - size) / 2,
                size,
                size,
            ),
            kind,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::{Projectile, ProjectileKind};
    use crate::tuning::Tuning;

    fn new_state() -> GameState {
        GameState::new(42, Tuning::default())
    }

    fn idle_input() -> TickInput {
        TickInput::default()
    }

    /// A stationary basic enemy parked at the given spot
    fn parked_enemy(id: u32, x: i32, y: i32) -> Enemy {
        let mut e = Enemy::basic(id, Rect::new(x, y, ENEMY_SIZE, ENEMY_SIZE), &Tuning::default());
        e.speed = 0.0;
        e
    }

    #[test]
    fn test_idle_until_wave_started() {
        let mut state = new_state();
        for _ in 0..10 {
            tick(&mut state, &idle_input());
        }
        assert!(state.enemies.is_empty());
        assert_eq!(state.wave.phase, WavePhase::Idle);
        assert_eq!(state.wave.wave, 1);
    }

    #[test]
    fn test_start_wave_spawns_to_quota() {
        let mut state = new_state();
        let input = TickInput {
            start_wave: true,
            ..TickInput::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.wave.phase, WavePhase::Spawning);
        assert!(state
            .drain_events()
            .contains(&GameEvent::WaveStarted { wave: 1 }));
        assert_eq!(state.enemies.len(), 1);

        // Wave 1 quota is 2: one more spawn, then draining
        tick(&mut state, &idle_input());
        assert_eq!(state.enemies.len(), 2);
        assert_eq!(state.wave.phase, WavePhase::Draining);
        tick(&mut state, &idle_input());
        assert_eq!(state.enemies.len(), 2, "no spawns past quota");
    }

    #[test]
    fn test_spawns_rotate_entrances() {
        let mut state = new_state();
        state.wave.wave = 4; // quota 5
        state.wave.quota = WaveState::quota_for(4);
        let input = TickInput {
            start_wave: true,
            ..TickInput::default()
        };
        tick(&mut state, &input);
        for _ in 0..4 {
            tick(&mut state, &idle_input());
        }
        assert_eq!(state.enemies.len(), 5);
        let (w, h) = state.arena.panel_size();
        // Top, bottom, left, right, top again. Spawned enemies start
        // funneling in at once, so only coarse positions are checked.
        assert!(state.enemies[0].pos.rect().y < 0);
        assert!(state.enemies[1].pos.rect().bottom() > h);
        assert!(state.enemies[2].pos.rect().x < 0);
        assert!(state.enemies[3].pos.rect().right() > w);
        assert!(state.enemies[4].pos.rect().y < 0);
        // Fifth spawn is offset from the first along the top edge
        assert_ne!(state.enemies[4].pos.rect().x, state.enemies[0].pos.rect().x);
    }

    #[test]
    fn test_boss_wave_spawns_bosses() {
        let mut state = new_state();
        state.wave.wave = 5;
        state.wave.quota = WaveState::quota_for(5);
        assert_eq!(state.wave.quota, 1);
        let input = TickInput {
            start_wave: true,
            ..TickInput::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].kind, EnemyKind::Boss);
        assert_eq!(state.enemies[0].health, 25);
    }

    #[test]
    fn test_movement_input_moves_player() {
        let mut state = new_state();
        let x0 = state.player.pos.rect().x;
        let input = TickInput {
            move_right: true,
            ..TickInput::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.player.pos.rect().x, x0 + PLAYER_SPEED as i32);
        assert_eq!(state.player.facing, Direction::Right);
        assert!(state.player.moving);

        tick(&mut state, &idle_input());
        assert!(!state.player.moving);
        assert_eq!(state.player.facing, Direction::Right, "facing persists");
    }

    #[test]
    fn test_kill_awards_score_and_event() {
        let mut state = new_state();
        let mut enemy = parked_enemy(7, 390, 390);
        enemy.health = 1;
        state.enemies.push(enemy);
        state.projectiles.push(Projectile::new(
            Rect::new(470, 400, 20, 20),
            -8,
            0,
            ProjectileKind::Straight,
            state.arena.panel_size(),
        ));

        tick(&mut state, &idle_input());
        assert!(state.enemies.is_empty());
        assert_eq!(state.score, KILL_SCORE);
        assert!(state
            .drain_events()
            .contains(&GameEvent::EnemyDestroyed { id: 7 }));
    }

    #[test]
    fn test_enemy_survives_four_hits_dies_on_fifth() {
        let mut state = new_state();
        state.enemies.push(parked_enemy(0, 390, 390));
        let panel = state.arena.panel_size();
        let shot =
            || Projectile::new(Rect::new(470, 400, 20, 20), -8, 0, ProjectileKind::Straight, panel);

        for hit in 1..=4 {
            state.projectiles.push(shot());
            tick(&mut state, &idle_input());
            assert_eq!(state.enemies[0].health, BASIC_ENEMY_HEALTH - hit);
            assert!(state.enemies[0].is_alive());
        }
        state.projectiles.push(shot());
        tick(&mut state, &idle_input());
        assert!(state.enemies.is_empty());
        assert_eq!(state.score, KILL_SCORE);
    }

    #[test]
    fn test_contact_damage_respects_cooldown() {
        let mut state = new_state();
        let player_rect = state.player.pos.rect();
        state
            .enemies
            .push(parked_enemy(0, player_rect.x, player_rect.y));
        let total = state.player.health + state.player.shield;

        tick(&mut state, &idle_input());
        assert_eq!(state.player.health + state.player.shield, total - 1);

        // No further damage while the cooldown counts down
        for _ in 0..DAMAGE_COOLDOWN_TICKS {
            tick(&mut state, &idle_input());
        }
        assert_eq!(state.player.health + state.player.shield, total - 1);

        // With the counter back at 0 the next tick of held contact hurts,
        // a full cooldown-plus-one ticks after the first hit
        tick(&mut state, &idle_input());
        assert_eq!(state.player.health + state.player.shield, total - 2);
    }

    #[test]
    fn test_zero_cooldown_damages_every_tick() {
        let tuning = Tuning {
            damage_cooldown_ticks: 0,
            ..Tuning::default()
        };
        let mut state = GameState::new(42, tuning);
        let player_rect = state.player.pos.rect();
        state
            .enemies
            .push(parked_enemy(0, player_rect.x, player_rect.y));
        let total = state.player.health + state.player.shield;

        tick(&mut state, &idle_input());
        tick(&mut state, &idle_input());
        assert_eq!(state.player.health + state.player.shield, total - 2);
    }

    #[test]
    fn test_separation_resets_contact_cooldown() {
        let mut state = new_state();
        let player_rect = state.player.pos.rect();
        state
            .enemies
            .push(parked_enemy(0, player_rect.x, player_rect.y));

        tick(&mut state, &idle_input());
        let total = state.player.health + state.player.shield;

        // Pull the enemy away, then put it back; damage lands immediately
        let parked = state.enemies[0].pos.rect();
        state.enemies[0].pos.set_top_left(100, 100);
        tick(&mut state, &idle_input());
        state.enemies[0].pos.set_top_left(parked.x, parked.y);
        tick(&mut state, &idle_input());
        assert_eq!(state.player.health + state.player.shield, total - 1);
    }

    #[test]
    fn test_player_death_ends_run() {
        let mut state = new_state();
        state.player.shield = 0;
        state.player.health = 1;
        let player_rect = state.player.pos.rect();
        state
            .enemies
            .push(parked_enemy(0, player_rect.x, player_rect.y));

        tick(&mut state, &idle_input());
        assert!(state.game_over);
        assert!(state.drain_events().contains(&GameEvent::PlayerDied));

        // Further ticks are inert
        let ticks = state.time_ticks;
        tick(&mut state, &idle_input());
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_boss_corpse_drops_heal() {
        let mut state = new_state();
        let mut boss = Enemy::boss(
            3,
            Rect::new(390, 390, ENEMY_SIZE, ENEMY_SIZE),
            5,
            &Tuning::default(),
        );
        boss.speed = 0.0;
        boss.health = 1;
        state.enemies.push(boss);
        state.projectiles.push(Projectile::new(
            Rect::new(470, 400, 20, 20),
            -8,
            0,
            ProjectileKind::Straight,
            state.arena.panel_size(),
        ));

        tick(&mut state, &idle_input());
        assert!(state.enemies.is_empty());
        // The drop lands on the adjacent player and is scooped up in the
        // same tick's collection pass
        assert!(state.pickups.is_empty());
        assert_eq!(state.player.heal_charges, 1);
        assert!(state
            .drain_events()
            .contains(&GameEvent::PickupCollected {
                kind: PickupKind::Heal
            }));
    }

    #[test]
    fn test_pickup_collection_and_heal_use() {
        let mut state = new_state();
        let player_rect = state.player.pos.rect();
        state.pickups.push(Pickup {
            rect: Rect::new(player_rect.x, player_rect.y, 37, 37),
            kind: PickupKind::Heal,
        });

        tick(&mut state, &idle_input());
        assert!(state.pickups.is_empty());
        assert_eq!(state.player.heal_charges, 1);
        assert!(state
            .drain_events()
            .contains(&GameEvent::PickupCollected {
                kind: PickupKind::Heal
            }));

        state.player.health = 2;
        let input = TickInput {
            use_heal: true,
            ..TickInput::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.player.health, 2 + HEAL_AMOUNT);
        assert_eq!(state.player.heal_charges, 0);
    }

    #[test]
    fn test_shotgun_pickup_activation_changes_fire() {
        let mut state = new_state();
        let player_rect = state.player.pos.rect();
        state.pickups.push(Pickup {
            rect: Rect::new(player_rect.x, player_rect.y, 37, 37),
            kind: PickupKind::Shotgun,
        });
        tick(&mut state, &idle_input());
        assert_eq!(state.player.inventory.len(), 1);
        assert!(!state.player.shotgun);

        let input = TickInput {
            activate_power_up: true,
            ..TickInput::default()
        };
        tick(&mut state, &input);
        assert!(state.player.shotgun);

        let input = TickInput {
            fire: true,
            ..TickInput::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.projectiles.len(), 5);
    }

    #[test]
    fn test_wave_completion_advances_and_clears_shots() {
        let mut state = new_state();
        state.wave.phase = WavePhase::Draining;
        state.projectiles.push(Projectile::new(
            Rect::new(400, 400, 20, 20),
            0,
            0,
            ProjectileKind::Straight,
            state.arena.panel_size(),
        ));

        tick(&mut state, &idle_input());
        assert_eq!(state.wave.wave, 2);
        assert_eq!(state.wave.quota, 3);
        assert_eq!(state.wave.phase, WavePhase::Idle);
        assert!(state.projectiles.is_empty());
        assert!(state
            .drain_events()
            .contains(&GameEvent::WaveCompleted { wave: 1 }));
    }

    #[test]
    fn test_every_third_wave_places_pickups() {
        let mut state = new_state();
        state.wave.wave = 2;
        state.wave.phase = WavePhase::Draining;
        tick(&mut state, &idle_input());
        assert_eq!(state.wave.wave, 3);
        assert_eq!(state.pickups.len(), 2);
        let kinds: Vec<_> = state.pickups.iter().map(|p| p.kind).collect();
        assert!(kinds.contains(&PickupKind::Shotgun));
        assert!(kinds.contains(&PickupKind::SpeedBoost));
    }

    #[test]
    fn test_arena_rerolls_after_boss_wave() {
        let mut state = new_state();
        state.wave.wave = 5;
        state.wave.phase = WavePhase::Draining;
        tick(&mut state, &idle_input());
        assert_eq!(state.wave.wave, 6);
        assert_eq!(state.arena.level(), 2);
        assert_eq!(state.arena.obstacles().len(), 10);
        assert!(state
            .drain_events()
            .contains(&GameEvent::ArenaRegenerated { level: 2 }));
    }

    #[test]
    fn test_animation_flips_on_cadence() {
        let mut state = new_state();
        let input = TickInput {
            move_down: true,
            ..TickInput::default()
        };
        let frame0 = state.player.frame;
        for _ in 0..FRAME_REFRESH_RATE {
            tick(&mut state, &input);
        }
        assert_ne!(state.player.frame, frame0);
    }

    #[test]
    fn test_same_seed_same_run() {
        let script = |state: &mut GameState| {
            let start = TickInput {
                start_wave: true,
                fire: true,
                move_up: true,
                ..TickInput::default()
            };
            tick(state, &start);
            for i in 0..200u32 {
                let input = TickInput {
                    move_left: i % 3 == 0,
                    move_down: i % 7 == 0,
                    fire: i % 11 == 0,
                    ..TickInput::default()
                };
                tick(state, &input);
            }
        };

        let mut a = GameState::new(1234, Tuning::default());
        let mut b = GameState::new(1234, Tuning::default());
        script(&mut a);
        script(&mut b);

        assert_eq!(a.player.pos.rect(), b.player.pos.rect());
        assert_eq!(a.score, b.score);
        assert_eq!(a.enemies.len(), b.enemies.len());
        for (ea, eb) in a.enemies.iter().zip(&b.enemies) {
            assert_eq!(ea.pos.rect(), eb.pos.rect());
            assert_eq!(ea.health, eb.health);
        }
        assert_eq!(a.drain_events(), b.drain_events());
    }
}
