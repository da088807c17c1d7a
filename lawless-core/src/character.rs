//! The active character
//!
//! The session only needs a narrow interface from whatever plays on the
//! board: construction from a roster entry, a position and move budget
//! the resolver can act on, a turn reset, and stats for display.

use crate::board::{Board, Hex, HexDirection};
use crate::movement::{self, MoveOutcome};
use crate::roster::RosterEntry;
use crate::terrain::TerrainStore;

pub trait Character {
    /// Instantiate from a roster entry
    fn from_entry(entry: &RosterEntry) -> Self
    where
        Self: Sized;

    fn key(&self) -> &str;
    fn name(&self) -> &str;

    fn position(&self) -> Hex;
    fn relocate(&mut self, hex: Hex);

    /// Move points left this turn
    fn moves(&self) -> u32;
    fn max_moves(&self) -> u32;
    fn spend_moves(&mut self, cost: u32);

    /// Restore the move budget for a new turn
    fn new_turn(&mut self);

    fn health(&self) -> u32;
    fn max_health(&self) -> u32;
    fn damage(&self) -> u32;
    fn range(&self) -> u32;
    fn abilities(&self) -> &[String];

    /// Step one hex in `direction` if terrain, walls and budget allow
    fn step(&mut self, direction: HexDirection, board: &Board, terrain: &TerrainStore) -> MoveOutcome
    where
        Self: Sized,
    {
        movement::try_move(self, direction, board, terrain)
    }
}

/// Bundled character: starts at the origin with full health and moves
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Champion {
    key: String,
    name: String,
    position: Hex,
    health: u32,
    max_health: u32,
    damage: u32,
    moves: u32,
    max_moves: u32,
    range: u32,
    abilities: Vec<String>,
}

impl Champion {
    pub fn at(mut self, hex: Hex) -> Self {
        self.position = hex;
        self
    }
}

impl Character for Champion {
    fn from_entry(entry: &RosterEntry) -> Self {
        let stats = entry.stats();
        Self {
            key: entry.key().to_string(),
            name: entry.name().to_string(),
            position: Hex::ORIGIN,
            health: stats.health,
            max_health: stats.health,
            damage: stats.damage,
            moves: stats.moves,
            max_moves: stats.moves,
            range: stats.range,
            abilities: entry.abilities().to_vec(),
        }
    }

    fn key(&self) -> &str {
        &self.key
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn position(&self) -> Hex {
        self.position
    }

    fn relocate(&mut self, hex: Hex) {
        self.position = hex;
    }

    fn moves(&self) -> u32 {
        self.moves
    }

    fn max_moves(&self) -> u32 {
        self.max_moves
    }

    fn spend_moves(&mut self, cost: u32) {
        self.moves = self.moves.saturating_sub(cost);
    }

    fn new_turn(&mut self) {
        self.moves = self.max_moves;
    }

    fn health(&self) -> u32 {
        self.health
    }

    fn max_health(&self) -> u32 {
        self.max_health
    }

    fn damage(&self) -> u32 {
        self.damage
    }

    fn range(&self) -> u32 {
        self.range
    }

    fn abilities(&self) -> &[String] {
        &self.abilities
    }
}
