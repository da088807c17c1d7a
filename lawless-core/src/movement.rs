//! Single-step movement legality

use crate::board::{Board, Hex, HexDirection};
use crate::character::Character;
use crate::terrain::TerrainStore;
use serde::Serialize;

/// Result of a movement request. None of these are errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MoveOutcome {
    Moved { to: Hex, cost: u32 },
    BlockedByWall,
    InsufficientMoves { cost: u32, remaining: u32 },
    OutOfBounds,
}

impl MoveOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, MoveOutcome::Moved { .. })
    }
}

/// Try to step the character one hex in `direction`.
///
/// Checks run in order: board bounds, walls, then move budget. Only a
/// `Moved` outcome changes the character.
pub fn try_move<C: Character>(
    character: &mut C,
    direction: HexDirection,
    board: &Board,
    terrain: &TerrainStore,
) -> MoveOutcome {
    let from = character.position();
    let to = from.neighbor(direction);

    if !board.contains(to) {
        return MoveOutcome::OutOfBounds;
    }

    if terrain.is_blocked(from, to) {
        return MoveOutcome::BlockedByWall;
    }

    let cost = terrain.cost(to);
    let remaining = character.moves();
    if remaining < cost {
        return MoveOutcome::InsufficientMoves { cost, remaining };
    }

    character.spend_moves(cost);
    character.relocate(to);
    MoveOutcome::Moved { to, cost }
}
