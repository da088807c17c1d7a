//! Difficult terrain and walls
//!
//! Terrain is persisted as a JSON document:
//!
//! ```json
//! {
//!   "difficult_terrain": { "1,-2": true, "(0, 3)": "rough" },
//!   "walls": [ [[0, 0], [1, 0]] ]
//! }
//! ```
//!
//! Any value marks a difficult cell. Loading never fails the session: a
//! missing or malformed document yields empty sets and a warning.

use crate::board::{Board, Hex, Terrain};
use crate::error::LoadError;
use rand::Rng;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Move-point cost of entering a cell, per classification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCosts {
    pub simple: u32,
    pub difficult: u32,
}

impl MoveCosts {
    pub fn for_terrain(&self, terrain: Terrain) -> u32 {
        match terrain {
            Terrain::Simple => self.simple,
            Terrain::Difficult => self.difficult,
        }
    }
}

impl Default for MoveCosts {
    fn default() -> Self {
        Self {
            simple: 1,
            difficult: 2,
        }
    }
}

// ============================================================================
// WALLS
// ============================================================================

/// A blocked edge between two adjacent cells. Endpoints are stored in
/// sorted order so `{a, b}` and `{b, a}` are the same wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Wall {
    a: Hex,
    b: Hex,
}

impl Wall {
    /// Build a wall between two adjacent hexes
    pub fn new(a: Hex, b: Hex) -> Option<Self> {
        a.is_adjacent(b).then(|| Self::normalized(a, b))
    }

    fn normalized(a: Hex, b: Hex) -> Self {
        if a <= b {
            Self { a, b }
        } else {
            Self { a: b, b: a }
        }
    }

    pub fn endpoints(&self) -> (Hex, Hex) {
        (self.a, self.b)
    }
}

/// Set of walls; lookups are order-independent
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WallSet {
    walls: FxHashSet<Wall>,
}

impl WallSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a wall. Returns false if it was already present.
    pub fn insert(&mut self, wall: Wall) -> bool {
        self.walls.insert(wall)
    }

    pub fn is_blocked(&self, a: Hex, b: Hex) -> bool {
        self.walls.contains(&Wall::normalized(a, b))
    }

    pub fn len(&self) -> usize {
        self.walls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Wall> + '_ {
        self.walls.iter()
    }
}

// ============================================================================
// PERSISTED FORMAT
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct TerrainRecord {
    #[serde(default)]
    difficult_terrain: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    walls: Vec<[[i32; 2]; 2]>,
}

/// Parse a coordinate key: "q,r", "q, r" or "(q, r)"
fn parse_coord_key(key: &str) -> Result<Hex, LoadError> {
    let invalid = || LoadError::InvalidCoordinate(key.to_string());
    let inner = key
        .trim()
        .trim_start_matches(['(', '['])
        .trim_end_matches([')', ']']);
    let (q, r) = inner.split_once(',').ok_or_else(invalid)?;
    let q = q.trim().parse::<i32>().map_err(|_| invalid())?;
    let r = r.trim().parse::<i32>().map_err(|_| invalid())?;
    Ok(Hex::new(q, r))
}

// ============================================================================
// TERRAIN STORE
// ============================================================================

/// Counts for reporting
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TerrainSummary {
    pub difficult: usize,
    pub walls: usize,
}

/// Difficult-terrain set plus wall set
#[derive(Clone, Debug, Default)]
pub struct TerrainStore {
    difficult: FxHashSet<Hex>,
    walls: WallSet,
    costs: MoveCosts,
}

impl TerrainStore {
    pub fn new(costs: MoveCosts) -> Self {
        Self {
            costs,
            ..Default::default()
        }
    }

    /// Load terrain from a file, falling back to empty sets on any failure
    pub fn load(path: &Path, board: &Board, costs: MoveCosts) -> Self {
        match Self::try_load(path, board, costs) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!("Terrain unavailable, using empty terrain: {}", e);
                Self::new(costs)
            }
        }
    }

    /// Load terrain from a reader, falling back to empty sets on any failure
    pub fn load_from_reader<R: Read>(reader: R, board: &Board, costs: MoveCosts) -> Self {
        match Self::try_from_reader(reader, board, costs) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!("Terrain unavailable, using empty terrain: {}", e);
                Self::new(costs)
            }
        }
    }

    pub fn try_load(path: &Path, board: &Board, costs: MoveCosts) -> Result<Self, LoadError> {
        let file = std::fs::File::open(path).map_err(|e| LoadError::io(path, e))?;
        let store = Self::try_from_reader(std::io::BufReader::new(file), board, costs)?;
        tracing::info!(
            "Loaded terrain from {}: {} difficult cells, {} walls",
            path.display(),
            store.difficult.len(),
            store.walls.len()
        );
        Ok(store)
    }

    /// Parse a terrain document. Off-board cells and invalid walls are
    /// skipped with a warning; an unreadable document is an error.
    pub fn try_from_reader<R: Read>(
        reader: R,
        board: &Board,
        costs: MoveCosts,
    ) -> Result<Self, LoadError> {
        let record: TerrainRecord = serde_json::from_reader(reader)?;

        // Parse every key first so a bad key rejects the whole document
        let coords = record
            .difficult_terrain
            .keys()
            .map(|key| parse_coord_key(key))
            .collect::<Result<Vec<_>, _>>()?;

        let mut store = Self::new(costs);
        for hex in coords {
            if !store.mark_difficult(board, hex) {
                tracing::warn!("Skipping difficult terrain off the board at {:?}", hex);
            }
        }
        for [[q1, r1], [q2, r2]] in record.walls {
            if let Err(e) = store.add_wall(board, Hex::new(q1, r1), Hex::new(q2, r2)) {
                tracing::warn!("Skipping wall: {}", e);
            }
        }
        Ok(store)
    }

    /// Flag a cell as difficult. Returns false if the cell is off the board.
    pub fn mark_difficult(&mut self, board: &Board, hex: Hex) -> bool {
        if !board.contains(hex) {
            return false;
        }
        self.difficult.insert(hex);
        true
    }

    /// Add a wall between two adjacent on-board cells. Returns false if
    /// the wall was already present.
    pub fn add_wall(&mut self, board: &Board, a: Hex, b: Hex) -> Result<bool, LoadError> {
        let wall = Wall::new(a, b)
            .filter(|_| board.contains(a) && board.contains(b))
            .ok_or(LoadError::InvalidWall { a, b })?;
        Ok(self.walls.insert(wall))
    }

    /// Randomly flag cells as difficult, leaving the origin clear. A
    /// non-finite density scatters nothing.
    pub fn scatter<R: Rng>(board: &Board, density: f64, costs: MoveCosts, rng: &mut R) -> Self {
        let density = if density.is_finite() { density.clamp(0.0, 1.0) } else { 0.0 };
        let mut store = Self::new(costs);
        for cell in board.cells() {
            if cell.coord != Hex::ORIGIN && rng.gen_bool(density) {
                store.difficult.insert(cell.coord);
            }
        }
        store
    }

    /// Mark matching board cells as difficult. Other cells are untouched.
    pub fn apply_to_board(&self, board: &mut Board) {
        for &hex in &self.difficult {
            if let Some(cell) = board.get_mut(hex) {
                cell.terrain = Terrain::Difficult;
            }
        }
    }

    pub fn is_difficult(&self, hex: Hex) -> bool {
        self.difficult.contains(&hex)
    }

    pub fn is_blocked(&self, a: Hex, b: Hex) -> bool {
        self.walls.is_blocked(a, b)
    }

    pub fn classify(&self, hex: Hex) -> Terrain {
        if self.is_difficult(hex) {
            Terrain::Difficult
        } else {
            Terrain::Simple
        }
    }

    /// Move-point cost of entering a cell
    pub fn cost(&self, hex: Hex) -> u32 {
        self.costs.for_terrain(self.classify(hex))
    }

    pub fn costs(&self) -> MoveCosts {
        self.costs
    }

    pub fn difficult(&self) -> &FxHashSet<Hex> {
        &self.difficult
    }

    pub fn walls(&self) -> &WallSet {
        &self.walls
    }

    pub fn summary(&self) -> TerrainSummary {
        TerrainSummary {
            difficult: self.difficult.len(),
            walls: self.walls.len(),
        }
    }
}
