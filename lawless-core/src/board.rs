//! Hex board geometry with axial coordinates
//!
//! The board is the classic hexagon-of-hexagons: every cell whose cube
//! distance from the origin is at most `radius`. Pixel mapping uses the
//! flat-top layout, so direction 0 (N) points straight up on screen.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Default board radius (distance from center to edge)
pub const DEFAULT_BOARD_RADIUS: i32 = 6;

/// Axial hex coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hex {
    pub q: i32,
    pub r: i32,
}

impl Hex {
    pub const ORIGIN: Hex = Hex::new(0, 0);

    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Implicit third cube coordinate
    pub fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Distance from center (0,0)
    pub fn distance_to_center(&self) -> i32 {
        self.distance_to(Hex::ORIGIN)
    }

    /// Distance between two hexes
    pub fn distance_to(&self, other: Hex) -> i32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = ((self.q + self.r) - (other.q + other.r)).abs();
        (dq + dr + ds) / 2
    }

    /// Check if this hex lies on a board of the given radius
    pub fn within(&self, radius: i32) -> bool {
        self.distance_to_center() <= radius.max(0)
    }

    /// Get neighbor in a direction
    pub fn neighbor(&self, direction: HexDirection) -> Hex {
        let (dq, dr) = direction.offset();
        Hex::new(self.q + dq, self.r + dr)
    }

    /// All six neighbors, in direction order. Callers filter off-board cells.
    pub fn neighbors(&self) -> [Hex; 6] {
        HexDirection::ALL.map(|dir| self.neighbor(dir))
    }

    pub fn is_adjacent(&self, other: Hex) -> bool {
        self.distance_to(other) == 1
    }

    /// Hexes at exactly `radius` steps from this one
    pub fn ring(&self, radius: i32) -> Vec<Hex> {
        if radius <= 0 {
            return vec![*self];
        }
        let mut out = Vec::with_capacity(6 * radius as usize);
        // Start at the SW corner and walk the six sides
        let mut current = Hex::new(self.q - radius, self.r + radius);
        for dir in HexDirection::ALL {
            for _ in 0..radius {
                out.push(current);
                current = current.neighbor(dir);
            }
        }
        out
    }
}

/// Distance between two hexes
pub fn distance(a: Hex, b: Hex) -> i32 {
    a.distance_to(b)
}

/// Neighbors of a hex (may fall outside the board)
pub fn neighbors(hex: Hex) -> [Hex; 6] {
    hex.neighbors()
}

/// Direction vectors in axial coordinates (dq, dr)
/// Index: 0=N, 1=NE, 2=SE, 3=S, 4=SW, 5=NW
pub const DIRECTIONS: [(i32, i32); 6] = [
    (0, -1),  // N
    (1, -1),  // NE
    (1, 0),   // SE
    (0, 1),   // S
    (-1, 1),  // SW
    (-1, 0),  // NW
];

/// The six flat-top hex directions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HexDirection {
    N,
    NE,
    SE,
    S,
    SW,
    NW,
}

impl HexDirection {
    pub const ALL: [HexDirection; 6] = [
        HexDirection::N,
        HexDirection::NE,
        HexDirection::SE,
        HexDirection::S,
        HexDirection::SW,
        HexDirection::NW,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn offset(self) -> (i32, i32) {
        DIRECTIONS[self.index()]
    }

    pub fn opposite(self) -> Self {
        Self::ALL[(self.index() + 3) % 6]
    }

    pub fn name(self) -> &'static str {
        match self {
            HexDirection::N => "N",
            HexDirection::NE => "NE",
            HexDirection::SE => "SE",
            HexDirection::S => "S",
            HexDirection::SW => "SW",
            HexDirection::NW => "NW",
        }
    }

    /// Parse a direction name, case-insensitive
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|dir| dir.name().eq_ignore_ascii_case(s.trim()))
    }
}

// ============================================================================
// PIXEL LAYOUT
// ============================================================================

/// Flat-top axial <-> pixel transform
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Hex edge length in pixels (center to corner)
    pub size: f64,
    /// Pixel position of the origin cell's center
    pub origin: (f64, f64),
}

impl Layout {
    pub fn new(size: f64, origin: (f64, f64)) -> Self {
        Self { size, origin }
    }

    /// Pixel center of a hex
    pub fn axial_to_pixel(&self, hex: Hex) -> (f64, f64) {
        let q = hex.q as f64;
        let r = hex.r as f64;
        let x = self.size * 1.5 * q;
        let y = self.size * 3f64.sqrt() * (r + q / 2.0);
        (self.origin.0 + x, self.origin.1 + y)
    }

    /// Hex containing a pixel (hit-testing)
    pub fn pixel_to_axial(&self, x: f64, y: f64) -> Hex {
        let px = (x - self.origin.0) / self.size;
        let py = (y - self.origin.1) / self.size;
        let q = px * 2.0 / 3.0;
        let r = -px / 3.0 + py / 3f64.sqrt();
        cube_round(q, r)
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            size: 40.0,
            origin: (600.0, 400.0),
        }
    }
}

fn cube_round(q: f64, r: f64) -> Hex {
    let s = -q - r;
    let mut rq = q.round();
    let mut rr = r.round();
    let rs = s.round();

    let dq = (rq - q).abs();
    let dr = (rr - r).abs();
    let ds = (rs - s).abs();

    if dq > dr && dq > ds {
        rq = -rr - rs;
    } else if dr > ds {
        rr = -rq - rs;
    }
    Hex::new(rq as i32, rr as i32)
}

// ============================================================================
// BOARD
// ============================================================================

/// Terrain classification of a cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    #[default]
    Simple,
    Difficult,
}

/// One board cell
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hexagon {
    pub coord: Hex,
    pub terrain: Terrain,
    /// Pixel center, fixed at generation time
    pub center: (f64, f64),
}

/// The generated board: every hex within `radius` of the origin
#[derive(Clone, Debug)]
pub struct Board {
    radius: i32,
    layout: Layout,
    cells: Vec<Hexagon>,
    index: FxHashMap<Hex, usize>,
}

impl Board {
    /// Generate a board. A radius <= 0 yields the origin cell only.
    pub fn generate(radius: i32, layout: Layout) -> Self {
        let radius = radius.max(0);
        let mut cells = Vec::with_capacity(cell_count(radius));
        let mut index = FxHashMap::default();

        for q in -radius..=radius {
            for r in -radius..=radius {
                let hex = Hex::new(q, r);
                if !hex.within(radius) {
                    continue;
                }
                index.insert(hex, cells.len());
                cells.push(Hexagon {
                    coord: hex,
                    terrain: Terrain::Simple,
                    center: layout.axial_to_pixel(hex),
                });
            }
        }

        Self {
            radius,
            layout,
            cells,
            index,
        }
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, hex: Hex) -> bool {
        self.index.contains_key(&hex)
    }

    pub fn get(&self, hex: Hex) -> Option<&Hexagon> {
        self.index.get(&hex).map(|&i| &self.cells[i])
    }

    pub fn get_mut(&mut self, hex: Hex) -> Option<&mut Hexagon> {
        self.index.get(&hex).map(|&i| &mut self.cells[i])
    }

    /// Cells in generation order (q ascending, then r ascending)
    pub fn cells(&self) -> &[Hexagon] {
        &self.cells
    }

    pub fn terrain(&self, hex: Hex) -> Option<Terrain> {
        self.get(hex).map(|cell| cell.terrain)
    }

    /// On-board neighbors of a hex
    pub fn neighbors_on_board(&self, hex: Hex) -> impl Iterator<Item = Hex> + '_ {
        hex.neighbors().into_iter().filter(|n| self.contains(*n))
    }

    /// Hit-test a pixel against the board
    pub fn hex_at_pixel(&self, x: f64, y: f64) -> Option<Hex> {
        let hex = self.layout.pixel_to_axial(x, y);
        self.contains(hex).then_some(hex)
    }
}

/// Number of cells on a board of the given radius: 3R^2 + 3R + 1
pub fn cell_count(radius: i32) -> usize {
    let r = radius.max(0) as usize;
    3 * r * r + 3 * r + 1
}

/// Generate the cells of a board with the default layout
pub fn generate_board(radius: i32) -> Board {
    Board::generate(radius, Layout::default())
}

/// Board geometry export for external renderers
#[derive(Clone, Debug, Serialize)]
pub struct BoardInfo {
    pub radius: i32,
    pub hex_size: f64,
    pub cells: Vec<Hexagon>,
    pub directions: Vec<[i32; 2]>,
    pub direction_names: Vec<&'static str>,
}

impl From<&Board> for BoardInfo {
    fn from(board: &Board) -> Self {
        Self {
            radius: board.radius,
            hex_size: board.layout.size,
            cells: board.cells.clone(),
            directions: DIRECTIONS.iter().map(|&(q, r)| [q, r]).collect(),
            direction_names: HexDirection::ALL.iter().map(|d| d.name()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_hex_validity() {
        assert!(Hex::new(0, 0).within(4));
        assert!(Hex::new(4, 0).within(4));
        assert!(Hex::new(0, 4).within(4));
        assert!(Hex::new(-4, 0).within(4));
        assert!(!Hex::new(5, 0).within(4));
        assert!(!Hex::new(3, 3).within(4)); // q + r = 6 > 4
    }

    #[test]
    fn test_distance() {
        assert_eq!(Hex::new(0, 0).distance_to_center(), 0);
        assert_eq!(Hex::new(1, 0).distance_to_center(), 1);
        assert_eq!(Hex::new(2, 2).distance_to_center(), 4);
        assert_eq!(distance(Hex::new(-2, 1), Hex::new(1, -1)), 3);
    }

    #[test]
    fn test_board_cell_counts() {
        for radius in 0..=10 {
            let board = generate_board(radius);
            assert_eq!(board.len(), cell_count(radius));
            assert_eq!(board.len(), (3 * radius * radius + 3 * radius + 1) as usize);
            for cell in board.cells() {
                assert!(cell.coord.distance_to_center() <= radius);
            }
            let unique: std::collections::HashSet<_> =
                board.cells().iter().map(|c| c.coord).collect();
            assert_eq!(unique.len(), board.len());
        }
    }

    #[test]
    fn test_non_positive_radius_is_single_cell() {
        for radius in [0, -1, -7] {
            let board = generate_board(radius);
            assert_eq!(board.len(), 1);
            assert!(board.contains(Hex::ORIGIN));
            assert_eq!(board.radius(), 0);
        }
    }

    #[test]
    fn test_neighbors() {
        let hex = Hex::new(2, -1);
        let ns = hex.neighbors();
        assert_eq!(ns.len(), 6);
        for n in ns {
            assert_eq!(hex.distance_to(n), 1);
        }
        assert_eq!(hex.neighbor(HexDirection::N), Hex::new(2, -2));
        assert_eq!(hex.neighbor(HexDirection::SW), Hex::new(1, 0));
    }

    #[test]
    fn test_edge_neighbors_filtered() {
        let board = generate_board(2);
        let corner = Hex::new(2, 0);
        assert_eq!(board.neighbors_on_board(corner).count(), 3);
        assert_eq!(board.neighbors_on_board(Hex::ORIGIN).count(), 6);
    }

    #[test]
    fn test_direction_opposites() {
        for dir in HexDirection::ALL {
            let there = Hex::ORIGIN.neighbor(dir);
            assert_eq!(there.neighbor(dir.opposite()), Hex::ORIGIN);
        }
        assert_eq!(HexDirection::parse("ne"), Some(HexDirection::NE));
        assert_eq!(HexDirection::parse("up"), None);
    }

    #[test]
    fn test_hex_ring() {
        let center = Hex::new(1, 1);
        let ring = center.ring(1);
        assert_eq!(ring.len(), 6);
        let ring3 = center.ring(3);
        assert_eq!(ring3.len(), 18);
        assert!(ring3.iter().all(|h| h.distance_to(center) == 3));
    }

    #[test]
    fn test_pixel_mapping() {
        let layout = Layout::new(40.0, (600.0, 400.0));
        assert_eq!(layout.axial_to_pixel(Hex::ORIGIN), (600.0, 400.0));

        // N is straight up in the flat-top layout
        let (x, y) = layout.axial_to_pixel(Hex::ORIGIN.neighbor(HexDirection::N));
        assert!((x - 600.0).abs() < 1e-9);
        assert!(y < 400.0);
    }

    #[test]
    fn test_pixel_round_trip_with_jitter() {
        let layout = Layout::new(40.0, (600.0, 400.0));
        let board = Board::generate(6, layout);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for cell in board.cells() {
            let (x, y) = cell.center;
            assert_eq!(layout.pixel_to_axial(x, y), cell.coord);

            // Anywhere inside the inscribed circle maps back to the same cell
            let inner = 40.0 * 3f64.sqrt() / 2.0 * 0.95;
            let angle = rng.gen_range(0.0..std::f64::consts::TAU);
            let dist = rng.gen_range(0.0..inner);
            let hit = board.hex_at_pixel(x + dist * angle.cos(), y + dist * angle.sin());
            assert_eq!(hit, Some(cell.coord));
        }

        assert_eq!(board.hex_at_pixel(-5000.0, -5000.0), None);
    }

    #[test]
    fn test_board_info_export() {
        let board = generate_board(1);
        let info = BoardInfo::from(&board);
        assert_eq!(info.cells.len(), 7);
        assert_eq!(info.direction_names, vec!["N", "NE", "SE", "S", "SW", "NW"]);
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["radius"], 1);
    }
}
