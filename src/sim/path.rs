//! Uniform-cost grid pathfinding for pursuit AI
//!
//! A* with a Manhattan heuristic over 4-directional neighbors. Edge cost is
//! uniform, so returned paths are shortest in tile count. Tie-breaks go by
//! insertion order into the frontier, which keeps expansion deterministic
//! within a run.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use super::arena::Arena;

/// A grid cell address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tile {
    pub row: usize,
    pub col: usize,
}

impl Tile {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    fn manhattan(&self, other: &Tile) -> u32 {
        (self.row.abs_diff(other.row) + self.col.abs_diff(other.col)) as u32
    }
}

/// Shortest walkable path from `start` to `goal`, inclusive of both.
///
/// Returns `[start]` when start == goal, and an empty vec when either tile
/// lies outside the grid or no path exists. Never an error: unreachable is
/// a normal answer here.
pub fn find_path(arena: &Arena, start: Tile, goal: Tile) -> Vec<Tile> {
    let (rows, cols) = (arena.rows(), arena.cols());
    if start.row >= rows || start.col >= cols || goal.row >= rows || goal.col >= cols {
        return Vec::new();
    }
    if start == goal {
        return vec![start];
    }

    let index = |t: Tile| t.row * cols + t.col;

    // Dense per-tile bookkeeping; the grid is small
    let mut g_score = vec![u32::MAX; rows * cols];
    let mut came_from: Vec<Option<Tile>> = vec![None; rows * cols];

    // Frontier keyed by (f, sequence); the sequence number makes tie-breaks
    // deterministic.
    let mut open: BinaryHeap<Reverse<(u32, u64, Tile)>> = BinaryHeap::new();
    let mut seq = 0u64;

    g_score[index(start)] = 0;
    open.push(Reverse((start.manhattan(&goal), seq, start)));

    while let Some(Reverse((_, _, current))) = open.pop() {
        if current == goal {
            return reconstruct(&came_from, cols, current);
        }

        let g = g_score[index(current)];
        for neighbor in neighbors(current, rows, cols) {
            if !arena.is_walkable(neighbor) {
                continue;
            }
            let tentative = g + 1;
            if tentative < g_score[index(neighbor)] {
                g_score[index(neighbor)] = tentative;
                came_from[index(neighbor)] = Some(current);
                seq += 1;
                open.push(Reverse((tentative + neighbor.manhattan(&goal), seq, neighbor)));
            }
        }
    }

    Vec::new()
}

fn neighbors(tile: Tile, rows: usize, cols: usize) -> impl Iterator<Item = Tile> {
    let mut out = [None; 4];
    if tile.row > 0 {
        out[0] = Some(Tile::new(tile.row - 1, tile.col));
    }
    if tile.row + 1 < rows {
        out[1] = Some(Tile::new(tile.row + 1, tile.col));
    }
    if tile.col > 0 {
        out[2] = Some(Tile::new(tile.row, tile.col - 1));
    }
    if tile.col + 1 < cols {
        out[3] = Some(Tile::new(tile.row, tile.col + 1));
    }
    out.into_iter().flatten()
}

fn reconstruct(came_from: &[Option<Tile>], cols: usize, mut current: Tile) -> Vec<Tile> {
    let mut path = vec![current];
    while let Some(prev) = came_from[current.row * cols + current.col] {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}
