//! Loyal and the Lawless core - board, data and selection flow
//!
//! This crate provides the runtime core of the tactics game:
//! - Board geometry (hex grid with axial coordinates, flat-top pixel layout)
//! - Difficult terrain and walls, loaded from persisted documents
//! - The character roster and portraits
//! - The alignment -> character -> play state machine
//! - Single-step movement legality
//!
//! Drawing and input devices live outside; see [`render::Renderer`] and
//! [`session::InputEvent`].

pub mod board;
pub mod character;
pub mod config;
pub mod error;
pub mod movement;
pub mod render;
pub mod roster;
pub mod session;
pub mod terrain;

// Re-exports for convenient access
pub use board::{generate_board, Board, BoardInfo, Hex, HexDirection, Hexagon, Layout, Terrain};
pub use character::{Champion, Character};
pub use config::GameConfig;
pub use error::{AssetError, LoadError};
pub use movement::{try_move, MoveOutcome};
pub use render::{Frame, Renderer};
pub use roster::{Alignment, ImagePortraitLoader, PortraitLoader, Portraits, Roster, RosterEntry, Stats};
pub use session::{Flow, InputEvent, PlayMode, SelectionGrid, Session, Stage, StageKind};
pub use terrain::{MoveCosts, TerrainStore, Wall, WallSet};
