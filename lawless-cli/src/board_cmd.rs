//! Board command - print board geometry as JSON
//!
//! Level 1: run() loads terrain onto a generated board and prints it for
//! external renderers.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use lawless_core::{Board, BoardInfo, GameConfig, TerrainStore};

#[derive(Args)]
pub struct BoardArgs {
    /// Board radius
    #[arg(long, default_value = "6")]
    pub radius: i32,

    /// Hex edge length in pixels
    #[arg(long, default_value = "40")]
    pub hex_size: f64,

    /// Terrain JSON file to overlay
    #[arg(long, value_name = "FILE")]
    pub terrain: Option<PathBuf>,
}

#[derive(Serialize)]
struct BoardOutput {
    board: BoardInfo,
    walls: Vec<[[i32; 2]; 2]>,
}

/// Run board command
pub fn run(args: BoardArgs) -> Result<()> {
    let output = build_output(&args)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn build_output(args: &BoardArgs) -> Result<BoardOutput> {
    let config = GameConfig {
        board_radius: args.radius,
        hex_size: args.hex_size,
        ..Default::default()
    };
    config.validate()?;

    let mut board = Board::generate(config.board_radius, config.layout());
    let terrain = match &args.terrain {
        Some(path) => TerrainStore::load(path, &board, config.move_costs),
        None => TerrainStore::new(config.move_costs),
    };
    terrain.apply_to_board(&mut board);

    let mut walls: Vec<[[i32; 2]; 2]> = terrain
        .walls()
        .iter()
        .map(|wall| {
            let (a, b) = wall.endpoints();
            [[a.q, a.r], [b.q, b.r]]
        })
        .collect();
    walls.sort_unstable();

    Ok(BoardOutput {
        board: BoardInfo::from(&board),
        walls,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_output() {
        let args = BoardArgs {
            radius: 2,
            hex_size: 40.0,
            terrain: None,
        };
        let output = build_output(&args).unwrap();
        assert_eq!(output.board.cells.len(), 19);
        assert!(output.walls.is_empty());

        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["board"]["radius"], 2);
    }

    #[test]
    fn test_missing_terrain_is_not_fatal() {
        let args = BoardArgs {
            radius: 1,
            hex_size: 40.0,
            terrain: Some(PathBuf::from("/nonexistent/terrain.json")),
        };
        assert!(build_output(&args).is_ok());
    }

    #[test]
    fn test_rejects_bad_hex_size() {
        let args = BoardArgs {
            radius: 1,
            hex_size: 0.0,
            terrain: None,
        };
        assert!(build_output(&args).is_err());
    }
}
