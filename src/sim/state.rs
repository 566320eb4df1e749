//! Game state and core simulation types
//!
//! Every entity carries a [`Position`]: a precise fractional coordinate
//! pair plus the rounded integer box used for collision. All mutation goes
//! through `Position` methods so the two representations cannot drift
//! apart.

use std::collections::HashMap;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::rect::Rect;
use crate::consts::*;
use crate::tuning::Tuning;

/// Facing direction of a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    #[default]
    Down,
}

impl Direction {
    /// Unit vector for this direction (screen coordinates, +y is down)
    pub fn unit(&self) -> Vec2 {
        match self {
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
        }
    }

    /// Angle along the facing axis, in radians
    pub fn angle(&self) -> f32 {
        use std::f32::consts::{FRAC_PI_2, PI};
        match self {
            Direction::Right => 0.0,
            Direction::Left => PI,
            Direction::Up => -FRAC_PI_2,
            Direction::Down => FRAC_PI_2,
        }
    }
}

/// Dual-representation position: precise fractional coordinates plus the
/// derived rounded collision box. The rect is never written directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    precise: Vec2,
    rect: Rect,
}

impl Position {
    pub fn new(rect: Rect) -> Self {
        Self {
            precise: Vec2::new(rect.x as f32, rect.y as f32),
            rect,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    #[inline]
    pub fn precise(&self) -> Vec2 {
        self.precise
    }

    /// Center of the collision box
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.precise.x + self.rect.w as f32 / 2.0,
            self.precise.y + self.rect.h as f32 / 2.0,
        )
    }

    /// Add `delta`, clamping each axis to `[0, bounds - dim]`, then refresh
    /// the rounded box.
    pub fn move_vector(&mut self, delta: Vec2, bounds: (i32, i32)) {
        self.precise.x = (self.precise.x + delta.x).clamp(0.0, (bounds.0 - self.rect.w) as f32);
        self.precise.y = (self.precise.y + delta.y).clamp(0.0, (bounds.1 - self.rect.h) as f32);
        self.round();
    }

    /// Add `delta` without bounds clamping. Enemies staged outside the
    /// panel use this while funneling in.
    pub fn translate(&mut self, delta: Vec2) {
        self.precise += delta;
        self.round();
    }

    /// Place the box at integer coordinates, re-seeding the precise pair.
    /// This is the only way to "write the rect", so a collision rollback
    /// can never desynchronize the two representations.
    pub fn set_top_left(&mut self, x: i32, y: i32) {
        self.rect.x = x;
        self.rect.y = y;
        self.precise = Vec2::new(x as f32, y as f32);
    }

    fn round(&mut self) {
        self.rect.x = self.precise.x.round() as i32;
        self.rect.y = self.precise.y.round() as i32;
    }
}

/// Power-up kinds that live in the player's inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    Shotgun,
    SpeedBoost,
    Heal,
}

/// A pickup item resting on a walkable tile
#[derive(Debug, Clone, Copy)]
pub struct Pickup {
    pub rect: Rect,
    pub kind: PickupKind,
}

/// A collected power-up waiting in (or running from) the inventory
#[derive(Debug, Clone, Copy)]
pub struct InventoryPowerUp {
    pub kind: PickupKind,
    pub remaining: u32,
    pub active: bool,
}

/// The player-controlled character
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Position,
    pub health: i32,
    pub shield: i32,
    pub speed: f32,
    pub facing: Direction,
    pub moving: bool,
    pub frame: u8,
    pub shotgun: bool,
    pub inventory: Vec<InventoryPowerUp>,
    pub heal_charges: u32,
    max_health: i32,
    max_shield: i32,
}

impl Player {
    pub fn new(rect: Rect, tuning: &Tuning) -> Self {
        Self {
            pos: Position::new(rect),
            health: tuning.player_max_health,
            shield: tuning.player_max_shield,
            speed: tuning.player_speed,
            facing: Direction::Down,
            moving: false,
            frame: 0,
            shotgun: false,
            inventory: Vec::new(),
            heal_charges: 0,
            max_health: tuning.player_max_health,
            max_shield: tuning.player_max_shield,
        }
    }

    /// Move one step along a cardinal direction, setting facing
    pub fn move_dir(&mut self, direction: Direction, bounds: (i32, i32)) {
        self.facing = direction;
        self.pos.move_vector(direction.unit() * self.speed, bounds);
    }

    /// Shield absorbs first; overflow carries into health
    pub fn apply_damage(&mut self, damage: i32) {
        if self.shield > 0 {
            self.shield -= damage;
            if self.shield < 0 {
                self.health += self.shield;
                self.shield = 0;
            }
        } else {
            self.health -= damage;
        }
        self.health = self.health.clamp(0, self.max_health);
    }

    pub fn add_health(&mut self, amount: i32) {
        self.health = (self.health + amount).clamp(0, self.max_health);
    }

    pub fn add_shield(&mut self, amount: i32) {
        self.shield = (self.shield + amount).clamp(0, self.max_shield);
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Activate the first inactive power-up, but only when none is running.
    /// Prevents stacking two effects at once.
    pub fn activate_next_power_up(&mut self, tuning: &Tuning) {
        if self.inventory.iter().any(|p| p.active) {
            return;
        }
        if let Some(entry) = self.inventory.iter_mut().find(|p| !p.active) {
            entry.active = true;
            entry.remaining = tuning.powerup_duration_ticks;
            match entry.kind {
                PickupKind::Shotgun => self.shotgun = true,
                PickupKind::SpeedBoost => self.speed += tuning.speed_boost_amount,
                PickupKind::Heal => {}
            }
        }
    }

    /// Count down active power-ups, reverting their effects on expiry
    pub fn update_power_ups(&mut self, tuning: &Tuning) {
        let mut expired = Vec::new();
        for (i, entry) in self.inventory.iter_mut().enumerate() {
            if entry.active {
                entry.remaining = entry.remaining.saturating_sub(1);
                if entry.remaining == 0 {
                    expired.push(i);
                }
            }
        }
        for &i in expired.iter().rev() {
            match self.inventory[i].kind {
                PickupKind::Shotgun => self.shotgun = false,
                PickupKind::SpeedBoost => self.speed -= tuning.speed_boost_amount,
                PickupKind::Heal => {}
            }
            self.inventory.remove(i);
        }
    }

    /// Spend one heal charge if available
    pub fn use_heal(&mut self, tuning: &Tuning) -> bool {
        if self.heal_charges == 0 {
            return false;
        }
        self.heal_charges -= 1;
        self.add_health(tuning.heal_amount);
        true
    }
}

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Basic,
    Boss,
}

/// Movement policy, fixed at construction from the enemy kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementPolicy {
    /// Funnel toward an entrance corridor, then chase the player directly
    FunnelThenChase,
    /// Tile-level A* toward the player each tick
    GridPursuit,
}

impl EnemyKind {
    pub fn policy(&self) -> MovementPolicy {
        match self {
            EnemyKind::Basic => MovementPolicy::FunnelThenChase,
            EnemyKind::Boss => MovementPolicy::GridPursuit,
        }
    }
}

/// A pursuing enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    /// Spawn-order identifier, used for damage-cooldown bookkeeping
    pub id: u32,
    pub kind: EnemyKind,
    pub policy: MovementPolicy,
    pub pos: Position,
    pub health: i32,
    pub speed: f32,
    pub facing: Direction,
    pub moving: bool,
    pub frame: u8,
}

impl Enemy {
    pub fn basic(id: u32, rect: Rect, tuning: &Tuning) -> Self {
        Self::new(id, EnemyKind::Basic, rect, tuning.basic_enemy_health, tuning.basic_enemy_speed)
    }

    pub fn boss(id: u32, rect: Rect, wave: u32, tuning: &Tuning) -> Self {
        Self::new(id, EnemyKind::Boss, rect, tuning.boss_health(wave), tuning.boss_speed(wave))
    }

    fn new(id: u32, kind: EnemyKind, rect: Rect, health: i32, speed: f32) -> Self {
        Self {
            id,
            kind,
            policy: kind.policy(),
            pos: Position::new(rect),
            health,
            speed,
            facing: Direction::Down,
            moving: true,
            frame: 0,
        }
    }

    pub fn take_damage(&mut self, damage: i32) {
        self.health -= damage;
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

/// Projectile variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileKind {
    Straight,
    /// Reflects off walls/obstacles until the budget runs out
    Bouncing { bounces_remaining: u32 },
}

/// A fired projectile. Velocity is integer px per tick.
#[derive(Debug, Clone, Copy)]
pub struct Projectile {
    pub rect: Rect,
    pub vx: i32,
    pub vy: i32,
    pub kind: ProjectileKind,
    panel: (i32, i32),
}

impl Projectile {
    pub fn new(rect: Rect, vx: i32, vy: i32, kind: ProjectileKind, panel: (i32, i32)) -> Self {
        Self {
            rect,
            vx,
            vy,
            kind,
            panel,
        }
    }

    /// Add the velocity to the position
    pub fn advance(&mut self) {
        self.rect.x += self.vx;
        self.rect.y += self.vy;
    }

    /// True once any coordinate leaves `[0, panel]`
    pub fn is_out_of_bounds(&self) -> bool {
        self.rect.x < 0 || self.rect.x > self.panel.0 || self.rect.y < 0 || self.rect.y > self.panel.1
    }
}

/// Wave lifecycle. `Idle -> Spawning` is externally triggered;
/// `Spawning -> Draining` happens at quota; `Draining -> Idle` (with the
/// wave number incremented) once no enemies remain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavePhase {
    Idle,
    Spawning,
    Draining,
}

/// Wave scheduling state
#[derive(Debug, Clone)]
pub struct WaveState {
    /// Current wave number; strictly increasing across a run
    pub wave: u32,
    /// Enemies to spawn this wave
    pub quota: u32,
    /// Enemies spawned so far this wave
    pub spawned: u32,
    /// Per-entrance spawn counts, reset each wave
    pub entrance_counts: [u32; 4],
    pub phase: WavePhase,
}

impl WaveState {
    pub fn new() -> Self {
        Self {
            wave: 1,
            quota: Self::quota_for(1),
            spawned: 0,
            entrance_counts: [0; 4],
            phase: WavePhase::Idle,
        }
    }

    /// Boss waves spawn `wave/5` bosses, others `wave+1` basics
    pub fn quota_for(wave: u32) -> u32 {
        if wave % 5 == 0 {
            wave / 5
        } else {
            wave + 1
        }
    }

    pub fn is_boss_wave(&self) -> bool {
        self.wave % 5 == 0
    }
}

impl Default for WaveState {
    fn default() -> Self {
        Self::new()
    }
}

/// Externally observable simulation events, drained by the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// An enemy died; the score collaborator awards points
    EnemyDestroyed { id: u32 },
    PlayerDied,
    WaveStarted { wave: u32 },
    WaveCompleted { wave: u32 },
    /// The arena was rebuilt at a new difficulty level
    ArenaRegenerated { level: u32 },
    PickupCollected { kind: PickupKind },
}

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub rng: Pcg32,
    pub arena: Arena,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub pickups: Vec<Pickup>,
    pub wave: WaveState,
    /// Enemy id -> remaining contact-damage cooldown ticks
    pub damage_cooldowns: HashMap<u32, u32>,
    /// Global spawn counter; also selects the next entrance
    pub next_enemy_id: u32,
    pub score: u32,
    pub time_ticks: u64,
    pub game_over: bool,
    pub tuning: Tuning,
    events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let arena = Arena::generate(GRID_ROWS, GRID_COLS, TILE_SIZE, 1, &mut rng);
        let player = Player::new(Self::player_start_rect(&arena), &tuning);

        Self {
            seed,
            rng,
            arena,
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            wave: WaveState::new(),
            damage_cooldowns: HashMap::new(),
            next_enemy_id: 0,
            score: 0,
            time_ticks: 0,
            game_over: false,
            tuning,
            events: Vec::new(),
        }
    }

    /// Player box centered on the panel
    pub fn player_start_rect(arena: &Arena) -> Rect {
        let (w, h) = arena.panel_size();
        Rect::new(
            (w - PLAYER_SIZE) / 2,
            (h - PLAYER_SIZE) / 2,
            PLAYER_SIZE,
            PLAYER_SIZE,
        )
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Hand the accumulated events to the shell
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
