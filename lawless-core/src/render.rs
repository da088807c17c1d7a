//! Rendering seam
//!
//! The core never draws. Each frame it hands a borrowed view of its state
//! to a `Renderer`, which owns whatever surface it draws on.

use crate::board::Board;
use crate::character::Character;
use crate::movement::MoveOutcome;
use crate::roster::{Alignment, Portraits, RosterEntry};
use crate::session::{PlayMode, SelectionGrid, Stage, StageKind};
use crate::terrain::TerrainStore;

/// Read-only view of one frame
pub struct Frame<'a, C, P> {
    pub stage: &'a Stage<C>,
    pub alignments: &'a [Alignment],
    pub grid: SelectionGrid,
    pub board: &'a Board,
    pub terrain: &'a TerrainStore,
    pub portraits: &'a Portraits<P>,
    pub last_outcome: Option<MoveOutcome>,
}

impl<'a, C: Character, P> Frame<'a, C, P> {
    pub fn kind(&self) -> StageKind {
        self.stage.kind()
    }

    /// Highlighted (or chosen) alignment, outside of play
    pub fn alignment(&self) -> Option<Alignment> {
        match self.stage {
            Stage::AlignmentSelect { alignment } | Stage::CharacterSelect { alignment, .. } => {
                self.alignments.get(*alignment).copied()
            }
            Stage::Playing { .. } => None,
        }
    }

    /// Candidates and the highlighted index on the character-select screen
    pub fn candidates(&self) -> Option<(&'a [RosterEntry], usize)> {
        match self.stage {
            Stage::CharacterSelect {
                candidates,
                selected,
                ..
            } => Some((candidates.as_slice(), *selected)),
            _ => None,
        }
    }

    pub fn character(&self) -> Option<&'a C> {
        match self.stage {
            Stage::Playing { character, .. } => Some(character),
            _ => None,
        }
    }

    pub fn play_mode(&self) -> Option<PlayMode> {
        match self.stage {
            Stage::Playing { mode, .. } => Some(*mode),
            _ => None,
        }
    }

    pub fn portrait(&self, key: &str) -> Option<&'a P> {
        self.portraits.get(key)
    }
}

/// Draws frames. `begin` and `finish` bracket a whole session.
pub trait Renderer<C, P> {
    fn begin(&mut self) {}

    fn render(&mut self, frame: &Frame<'_, C, P>);

    fn finish(&mut self) {}
}
