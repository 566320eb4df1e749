//! Tilestorm - a top-down arena survival simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (arena generation, movement, collisions,
//!   pathfinding, projectiles, wave scheduling)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, audio, menus and high-score persistence are external
//! collaborators: they drive [`sim::tick`] once per frame, read the
//! state snapshots and consume the [`sim::GameEvent`] stream.

pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Grid dimensions in tiles. 12 x 12 tiles of 75 px = a 900 x 900 panel,
    /// which keeps the wall gaps, entrance rects and funnel corridors aligned.
    pub const GRID_ROWS: usize = 12;
    pub const GRID_COLS: usize = 12;
    /// Tile edge length in pixels
    pub const TILE_SIZE: i32 = 75;

    /// Panel dimensions (grid extent)
    pub const PANEL_WIDTH: i32 = GRID_COLS as i32 * TILE_SIZE;
    pub const PANEL_HEIGHT: i32 = GRID_ROWS as i32 * TILE_SIZE;

    /// Player defaults
    pub const PLAYER_SIZE: i32 = 70;
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Health and shield are both clamped to this
    pub const MAX_HEALTH: i32 = 5;
    pub const MAX_SHIELD: i32 = 5;

    /// Enemy defaults
    pub const ENEMY_SIZE: i32 = 75;
    pub const BASIC_ENEMY_HEALTH: i32 = 5;
    pub const BASIC_ENEMY_SPEED: f32 = 2.5;
    /// Per-enemy contact-damage cooldown; a hit lands when the counter
    /// reads zero, so held contact hurts every cooldown-plus-one ticks
    pub const DAMAGE_COOLDOWN_TICKS: u32 = 30;
    /// Damage dealt to the player on contact
    pub const CONTACT_DAMAGE: i32 = 1;

    /// Projectile defaults
    pub const PROJECTILE_SIZE: i32 = 20;
    pub const PROJECTILE_SPEED: i32 = 8;
    pub const PROJECTILE_DAMAGE: i32 = 1;
    /// Wall/obstacle reflections before a bouncing projectile is spent
    pub const BOUNCE_BUDGET: u32 = 2;

    /// Wave scheduling
    /// Pixel offset between enemies queued at the same entrance
    pub const SPAWN_SPACING: i32 = 80;
    /// Score awarded per destroyed enemy
    pub const KILL_SCORE: u32 = 10;

    /// Power-ups
    pub const POWERUP_DURATION_TICKS: u32 = 1000;
    pub const SPEED_BOOST_AMOUNT: f32 = 3.0;
    /// Health restored per heal charge
    pub const HEAL_AMOUNT: i32 = 2;

    /// Animation frame flips every this many ticks (cosmetic)
    pub const FRAME_REFRESH_RATE: u64 = 8;
}
