//! Game configuration
//!
//! Everything location- or layout-dependent is injected through here so
//! the core never reaches for a hard-coded path.

use crate::board::{Layout, DEFAULT_BOARD_RADIUS};
use crate::roster::Alignment;
use crate::terrain::MoveCosts;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Session configuration. Every field is optional in the JSON form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board radius in hexes
    pub board_radius: i32,
    /// Hex edge length in pixels
    pub hex_size: f64,
    /// Render surface size; the board is centered on it
    pub screen_width: u32,
    pub screen_height: u32,
    /// Terrain document (absent = no terrain)
    pub terrain_path: Option<PathBuf>,
    /// Roster document (absent = empty roster)
    pub roster_path: Option<PathBuf>,
    /// Candidates per row on the character-select screen
    pub grid_columns: usize,
    /// Index step for up/down on the character-select screen
    pub grid_row_stride: usize,
    pub move_costs: MoveCosts,
    /// Portrait edge length in pixels
    pub portrait_size: u32,
    /// Alignments offered on the first screen, in display order
    pub alignments: Vec<Alignment>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_radius: DEFAULT_BOARD_RADIUS,
            hex_size: 40.0,
            screen_width: 1200,
            screen_height: 800,
            terrain_path: None,
            roster_path: None,
            grid_columns: 4,
            grid_row_stride: 3,
            move_costs: MoveCosts::default(),
            portrait_size: 120,
            alignments: Alignment::SELECTABLE.to_vec(),
        }
    }
}

impl GameConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the session cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.hex_size > 0.0, "hex_size must be positive");
        anyhow::ensure!(self.grid_columns > 0, "grid_columns must be at least 1");
        anyhow::ensure!(self.grid_row_stride > 0, "grid_row_stride must be at least 1");
        anyhow::ensure!(!self.alignments.is_empty(), "at least one alignment is required");
        anyhow::ensure!(
            !self.alignments.contains(&Alignment::Neutral),
            "Neutral is not a selectable alignment"
        );
        anyhow::ensure!(self.move_costs.simple > 0, "move_costs.simple must be at least 1");
        anyhow::ensure!(
            self.move_costs.difficult > self.move_costs.simple,
            "move_costs.difficult must exceed move_costs.simple"
        );
        Ok(())
    }

    /// Pixel layout with the board centered on the screen
    pub fn layout(&self) -> Layout {
        Layout::new(
            self.hex_size,
            (
                f64::from(self.screen_width) / 2.0,
                f64::from(self.screen_height) / 2.0,
            ),
        )
    }

    pub fn with_board_radius(mut self, radius: i32) -> Self {
        self.board_radius = radius;
        self
    }

    pub fn with_terrain_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.terrain_path = Some(path.into());
        self
    }

    pub fn with_roster_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.roster_path = Some(path.into());
        self
    }

    pub fn with_move_costs(mut self, costs: MoveCosts) -> Self {
        self.move_costs = costs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.board_radius, 6);
        assert_eq!(config.grid_columns, 4);
        assert_eq!(config.grid_row_stride, 3);
        assert_eq!(config.alignments, vec![Alignment::Loyal, Alignment::Lawless]);
        assert!(config.validate().is_ok());
        assert_eq!(config.layout().origin, (600.0, 400.0));
    }

    #[test]
    fn test_partial_json() {
        let config: GameConfig =
            serde_json::from_str(r#"{"board_radius": 3, "move_costs": {"simple": 1, "difficult": 3}}"#)
                .unwrap();
        assert_eq!(config.board_radius, 3);
        assert_eq!(config.move_costs.difficult, 3);
        assert_eq!(config.hex_size, 40.0);
        assert!(config.terrain_path.is_none());
    }

    #[test]
    fn test_validation() {
        let mut config = GameConfig::default();
        config.alignments.push(Alignment::Neutral);
        assert!(config.validate().is_err());

        let config = GameConfig {
            alignments: vec![],
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GameConfig {
            grid_row_stride: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let inverted = GameConfig::default().with_move_costs(MoveCosts { simple: 2, difficult: 1 });
        assert!(inverted.validate().is_err());
        let free = GameConfig::default().with_move_costs(MoveCosts { simple: 0, difficult: 1 });
        assert!(free.validate().is_err());
        let equal = GameConfig::default().with_move_costs(MoveCosts { simple: 2, difficult: 2 });
        assert!(equal.validate().is_err());
        let steep = GameConfig::default().with_move_costs(MoveCosts { simple: 1, difficult: 3 });
        assert!(steep.validate().is_ok());
    }

    #[test]
    fn test_load_rejects_cheaper_difficult_terrain() {
        let path = std::env::temp_dir().join(format!("lawless-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"move_costs": {"simple": 2, "difficult": 1}}"#).unwrap();
        let result = GameConfig::load(&path);
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(GameConfig::load(Path::new("/nonexistent/config.json")).is_err());
    }

    #[test]
    fn test_builders() {
        let config = GameConfig::default()
            .with_board_radius(2)
            .with_terrain_path("terrain.json")
            .with_roster_path("player.json");
        assert_eq!(config.board_radius, 2);
        assert_eq!(config.terrain_path, Some(PathBuf::from("terrain.json")));
        assert_eq!(config.roster_path, Some(PathBuf::from("player.json")));
    }
}
