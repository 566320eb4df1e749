//! Arena grid and procedural obstacle generation
//!
//! The arena is a `rows x cols` tile grid ringed by eight boundary wall
//! segments with four two-tile corridor gaps, one entrance rect per edge
//! sitting in each gap, a centered one-tile player spawn, and a
//! level-dependent set of randomly placed obstacle tiles.
//!
//! Obstacle placement is rejection sampling over interior tiles. Placement
//! never touches the spawn, the 2x2 center block, an entrance, the one-tile
//! buffer around an entrance, or another obstacle.

use rand::Rng;
use thiserror::Error;

use super::path::Tile;
use super::rect::Rect;

/// Rejection-sampling cap. On a dense or small grid the requested count
/// can be unsatisfiable, so placement gives up after this many draws and
/// keeps whatever fit.
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 10_000;

/// Obstacle generation failure. The arena remains usable with the
/// obstacles placed so far.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArenaError {
    #[error("could not satisfy obstacle density: placed {placed} of {requested} after {attempts} attempts")]
    DensityUnsatisfied {
        requested: usize,
        placed: usize,
        attempts: u32,
    },
}

/// Static arena geometry plus the current obstacle layout
#[derive(Debug, Clone)]
pub struct Arena {
    rows: usize,
    cols: usize,
    tile_size: i32,
    level: u32,
    player_spawn: Rect,
    walls: Vec<Rect>,
    entrances: Vec<Rect>,
    obstacles: Vec<Rect>,
}

impl Arena {
    /// Build an arena for the given grid dimensions and difficulty level.
    ///
    /// Walls, entrances and the spawn are fixed by the grid; obstacles are
    /// drawn from `rng`. If the requested obstacle density cannot be
    /// satisfied the shortfall is logged and the arena keeps fewer
    /// obstacles.
    pub fn generate(
        rows: usize,
        cols: usize,
        tile_size: i32,
        level: u32,
        rng: &mut impl Rng,
    ) -> Self {
        let spawn_tile = Tile::new(rows / 2, cols / 2);
        let player_spawn = Rect::new(
            spawn_tile.col as i32 * tile_size,
            spawn_tile.row as i32 * tile_size,
            tile_size,
            tile_size,
        );

        let mut arena = Self {
            rows,
            cols,
            tile_size,
            level,
            player_spawn,
            walls: boundary_walls(rows, cols, tile_size),
            entrances: edge_entrances(rows, cols, tile_size),
            obstacles: Vec::new(),
        };

        if let Err(err) = arena.regenerate_obstacles(level, rng) {
            log::warn!("arena generation fell short: {err}");
        }
        arena
    }

    /// Obstacle count for a difficulty level: 5, 10, .. 25, cycling every
    /// five levels.
    pub fn obstacle_count_for_level(level: u32) -> usize {
        (5 * (((level.max(1) - 1) % 5) + 1)) as usize
    }

    /// Re-roll the obstacle layout for a new difficulty level.
    ///
    /// Returns the number of obstacles placed, or
    /// [`ArenaError::DensityUnsatisfied`] when the attempt cap ran out
    /// first (the partial layout is kept).
    pub fn regenerate_obstacles(
        &mut self,
        level: u32,
        rng: &mut impl Rng,
    ) -> Result<usize, ArenaError> {
        self.level = level;
        self.obstacles.clear();
        let requested = Self::obstacle_count_for_level(level);

        // The 2x2 tile block around the spawn stays clear so the player
        // is never boxed in at wave start.
        let center_rows = (self.rows / 2 - 1, self.rows / 2);
        let center_cols = (self.cols / 2 - 1, self.cols / 2);

        let mut attempts = 0;
        while self.obstacles.len() < requested {
            if attempts >= MAX_PLACEMENT_ATTEMPTS {
                return Err(ArenaError::DensityUnsatisfied {
                    requested,
                    placed: self.obstacles.len(),
                    attempts,
                });
            }
            attempts += 1;

            // Interior tiles only; the outermost ring belongs to the walls.
            let r = rng.random_range(1..self.rows - 1);
            let c = rng.random_range(1..self.cols - 1);
            let rect = self.tile_rect(Tile::new(r, c));

            let is_center_tile = (r == center_rows.0 || r == center_rows.1)
                && (c == center_cols.0 || c == center_cols.1);
            if is_center_tile || rect.intersects(&self.player_spawn) {
                continue;
            }
            if self.is_entrance(&rect) || self.near_entrance(&rect) {
                continue;
            }
            if self.obstacles.iter().any(|o| o.intersects(&rect)) {
                continue;
            }

            self.obstacles.push(rect);
        }

        Ok(self.obstacles.len())
    }

    /// One-tile buffer check so obstacles never choke an entrance corridor
    fn near_entrance(&self, rect: &Rect) -> bool {
        self.entrances
            .iter()
            .any(|e| e.inflate(self.tile_size).intersects(rect))
    }

    /// Does `rect` overlap any entrance?
    pub fn is_entrance(&self, rect: &Rect) -> bool {
        self.entrances.iter().any(|e| e.intersects(rect))
    }

    /// Pixel rect of a tile
    pub fn tile_rect(&self, tile: Tile) -> Rect {
        Rect::new(
            tile.col as i32 * self.tile_size,
            tile.row as i32 * self.tile_size,
            self.tile_size,
            self.tile_size,
        )
    }

    /// Tile containing a pixel point, if inside the grid
    pub fn tile_at(&self, x: i32, y: i32) -> Option<Tile> {
        if x < 0 || y < 0 {
            return None;
        }
        let (row, col) = ((y / self.tile_size) as usize, (x / self.tile_size) as usize);
        (row < self.rows && col < self.cols).then_some(Tile::new(row, col))
    }

    /// Walkability for pursuit pathfinding: not the spawn, not an obstacle,
    /// not a wall. Entrances ARE walkable here - enemies path through them.
    pub fn is_walkable(&self, tile: Tile) -> bool {
        if tile.row >= self.rows || tile.col >= self.cols {
            return false;
        }
        let rect = self.tile_rect(tile);
        !rect.intersects(&self.player_spawn)
            && !self.obstacles.iter().any(|o| o.intersects(&rect))
            && !self.walls.iter().any(|w| w.intersects(&rect))
    }

    /// Every tile free of spawn, obstacles, entrances and walls.
    /// Used for pickup placement, so entrances are excluded here,
    /// unlike [`Arena::is_walkable`].
    pub fn walkable_tiles(&self) -> Vec<Rect> {
        let mut tiles = Vec::new();
        for r in 0..self.rows {
            for c in 0..self.cols {
                let tile = self.tile_rect(Tile::new(r, c));
                let blocked = tile.intersects(&self.player_spawn)
                    || self.obstacles.iter().any(|o| o.intersects(&tile))
                    || self.entrances.iter().any(|e| e.intersects(&tile))
                    || self.walls.iter().any(|w| w.intersects(&tile));
                if !blocked {
                    tiles.push(tile);
                }
            }
        }
        tiles
    }

    /// Spawn box just outside the given entrance, centered on the
    /// entrance's tangential axis.
    pub fn clear_spawn_point(&self, entrance_index: usize, size: i32) -> Rect {
        let entrance = &self.entrances[entrance_index];
        let (mut x, mut y) = (entrance.x, entrance.y);

        match entrance_index {
            0 => {
                // Top: just above the panel
                y = entrance.y - size;
                x = entrance.x + (entrance.w - size) / 2;
            }
            1 => {
                // Bottom
                y = entrance.bottom();
                x = entrance.x + (entrance.w - size) / 2;
            }
            2 => {
                // Left
                x = entrance.x - size;
                y = entrance.y + (entrance.h - size) / 2;
            }
            _ => {
                // Right
                x = entrance.right();
                y = entrance.y + (entrance.h - size) / 2;
            }
        }

        Rect::new(x, y, size, size)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn player_spawn(&self) -> Rect {
        self.player_spawn
    }

    pub fn walls(&self) -> &[Rect] {
        &self.walls
    }

    pub fn entrances(&self) -> &[Rect] {
        &self.entrances
    }

    pub fn obstacles(&self) -> &[Rect] {
        &self.obstacles
    }

    /// Panel extent in pixels (width, height)
    pub fn panel_size(&self) -> (i32, i32) {
        (
            self.cols as i32 * self.tile_size,
            self.rows as i32 * self.tile_size,
        )
    }
}

/// Eight boundary wall segments, leaving a two-tile gap centered on each
/// edge for the entrances.
fn boundary_walls(rows: usize, cols: usize, t: i32) -> Vec<Rect> {
    let (w, h) = (cols as i32 * t, rows as i32 * t);
    // Gap extents on each axis, aligned with the entrance rects
    let gx0 = (cols as i32 / 2 - 1) * t;
    let gx1 = (cols as i32 / 2 + 1) * t;
    let gy0 = (rows as i32 / 2 - 1) * t;
    let gy1 = (rows as i32 / 2 + 1) * t;

    vec![
        Rect::new(0, 0, gx0, t),          // top left
        Rect::new(gx1, 0, w - gx1, t),    // top right
        Rect::new(0, h - t, gx0, t),      // bottom left
        Rect::new(gx1, h - t, w - gx1, t), // bottom right
        Rect::new(0, 0, t, gy0),          // left upper
        Rect::new(0, gy1, t, h - gy1),    // left lower
        Rect::new(w - t, 0, t, gy0),      // right upper
        Rect::new(w - t, gy1, t, h - gy1), // right lower
    ]
}

/// Four entrances: top, bottom, left, right - in spawn rotation order.
/// Each is two tiles wide and sits exactly in its wall gap.
fn edge_entrances(rows: usize, cols: usize, t: i32) -> Vec<Rect> {
    vec![
        Rect::new((cols as i32 / 2 - 1) * t, 0, 2 * t, t),
        Rect::new((cols as i32 / 2 - 1) * t, (rows as i32 - 1) * t, 2 * t, t),
        Rect::new(0, (rows as i32 / 2 - 1) * t, t, 2 * t),
        Rect::new((cols as i32 - 1) * t, (rows as i32 / 2 - 1) * t, t, 2 * t),
    ]
}
