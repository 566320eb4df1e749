//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per external callback, run to completion
//! - Seeded RNG only
//! - Stable iteration order (entity lists in spawn order)
//! - No rendering or platform dependencies

pub mod arena;
pub mod collision;
pub mod enemy;
pub mod path;
pub mod projectile;
pub mod rect;
pub mod state;
pub mod tick;

pub use arena::{Arena, ArenaError};
pub use path::{find_path, Tile};
pub use rect::Rect;
pub use state::{
    Direction, Enemy, EnemyKind, GameEvent, GameState, InventoryPowerUp, MovementPolicy, Pickup,
    PickupKind, Player, Position, Projectile, ProjectileKind, WavePhase, WaveState,
};
pub use tick::{tick, TickInput};
