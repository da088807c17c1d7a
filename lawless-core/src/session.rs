//! Selection and play state machine
//!
//! Stages run `AlignmentSelect -> CharacterSelect -> Playing`, with cancel
//! stepping back from character select. Input routing is a total function
//! of the current stage: every event is handled by exactly one stage
//! handler and nothing outside `Stage` changes what a key does.

use crate::board::{Board, HexDirection};
use crate::character::{Champion, Character};
use crate::config::GameConfig;
use crate::movement::MoveOutcome;
use crate::render::{Frame, Renderer};
use crate::roster::{Alignment, Portraits, Roster, RosterEntry};
use crate::terrain::TerrainStore;
use serde::Serialize;

// ============================================================================
// TYPES
// ============================================================================

/// Logical input, independent of the physical device
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputEvent {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Cancel,
    NewTurn,
    /// Open or close the ability menu
    Toggle,
    Move(HexDirection),
    /// Window closed
    Quit,
}

/// Whether the frame loop keeps going
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Sub-state of `Playing`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum PlayMode {
    #[default]
    Normal,
    AbilityMenu { selected: usize },
}

/// Stage tag, for logging and renderers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum StageKind {
    AlignmentSelect,
    CharacterSelect,
    Playing,
}

/// Current stage with the state that only exists in it
#[derive(Clone, Debug)]
pub enum Stage<C> {
    AlignmentSelect {
        alignment: usize,
    },
    CharacterSelect {
        alignment: usize,
        candidates: Vec<RosterEntry>,
        selected: usize,
    },
    Playing {
        character: C,
        mode: PlayMode,
    },
}

impl<C> Stage<C> {
    pub fn kind(&self) -> StageKind {
        match self {
            Stage::AlignmentSelect { .. } => StageKind::AlignmentSelect,
            Stage::CharacterSelect { .. } => StageKind::CharacterSelect,
            Stage::Playing { .. } => StageKind::Playing,
        }
    }
}

/// Candidate grid shape on the character-select screen
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionGrid {
    /// Candidates drawn per row
    pub columns: usize,
    /// Index step for up/down
    pub row_stride: usize,
}

impl SelectionGrid {
    /// Next index for a directional key, clamped to `[0, len - 1]`
    pub fn step(&self, index: usize, len: usize, event: InputEvent) -> usize {
        let last = len.saturating_sub(1);
        let next = match event {
            InputEvent::Left => index.saturating_sub(1),
            InputEvent::Right => index.saturating_add(1),
            InputEvent::Up => index.saturating_sub(self.row_stride),
            InputEvent::Down => index.saturating_add(self.row_stride),
            _ => index,
        };
        next.min(last)
    }
}

impl Default for SelectionGrid {
    fn default() -> Self {
        Self {
            columns: 4,
            row_stride: 3,
        }
    }
}

// ============================================================================
// SESSION
// ============================================================================

/// One local player's session
pub struct Session<C = Champion, P = image::RgbaImage> {
    alignments: Vec<Alignment>,
    grid: SelectionGrid,
    board: Board,
    terrain: TerrainStore,
    roster: Roster,
    portraits: Portraits<P>,
    stage: Stage<C>,
    last_outcome: Option<MoveOutcome>,
}

impl<C: Character, P> Session<C, P> {
    /// Start a session at alignment select. Terrain is applied to the board.
    pub fn new(
        config: &GameConfig,
        mut board: Board,
        terrain: TerrainStore,
        roster: Roster,
        portraits: Portraits<P>,
    ) -> Self {
        terrain.apply_to_board(&mut board);

        let alignments = if config.alignments.is_empty() {
            Alignment::SELECTABLE.to_vec()
        } else {
            config.alignments.clone()
        };

        Self {
            alignments,
            grid: SelectionGrid {
                columns: config.grid_columns.max(1),
                row_stride: config.grid_row_stride.max(1),
            },
            board,
            terrain,
            roster,
            portraits,
            stage: Stage::AlignmentSelect { alignment: 0 },
            last_outcome: None,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn stage(&self) -> &Stage<C> {
        &self.stage
    }

    pub fn kind(&self) -> StageKind {
        self.stage.kind()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn terrain(&self) -> &TerrainStore {
        &self.terrain
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn alignments(&self) -> &[Alignment] {
        &self.alignments
    }

    pub fn character(&self) -> Option<&C> {
        match &self.stage {
            Stage::Playing { character, .. } => Some(character),
            _ => None,
        }
    }

    pub fn last_outcome(&self) -> Option<MoveOutcome> {
        self.last_outcome
    }

    pub fn frame(&self) -> Frame<'_, C, P> {
        Frame {
            stage: &self.stage,
            alignments: &self.alignments,
            grid: self.grid,
            board: &self.board,
            terrain: &self.terrain,
            portraits: &self.portraits,
            last_outcome: self.last_outcome,
        }
    }

    // ========================================================================
    // INPUT
    // ========================================================================

    /// Handle one input event
    pub fn handle(&mut self, event: InputEvent) -> Flow {
        tracing::debug!("{:?} in {:?}", event, self.kind());

        if event == InputEvent::Quit {
            return Flow::Exit;
        }

        match self.stage.kind() {
            StageKind::AlignmentSelect => self.handle_alignment(event),
            StageKind::CharacterSelect => self.handle_character_select(event),
            StageKind::Playing => self.handle_playing(event),
        }
    }

    fn handle_alignment(&mut self, event: InputEvent) -> Flow {
        let Stage::AlignmentSelect { alignment } = &mut self.stage else {
            return Flow::Continue;
        };
        let count = self.alignments.len();

        match event {
            InputEvent::Up => *alignment = (*alignment + count - 1) % count,
            InputEvent::Down => *alignment = (*alignment + 1) % count,
            InputEvent::Confirm => {
                let index = *alignment;
                let side = self.alignments[index];
                let candidates = self.roster.filter(side);
                tracing::info!("Alignment {} chosen, {} candidates", side, candidates.len());
                self.stage = Stage::CharacterSelect {
                    alignment: index,
                    candidates,
                    selected: 0,
                };
            }
            InputEvent::Cancel => return Flow::Exit,
            _ => {}
        }
        Flow::Continue
    }

    fn handle_character_select(&mut self, event: InputEvent) -> Flow {
        let Stage::CharacterSelect {
            alignment,
            candidates,
            selected,
        } = &mut self.stage
        else {
            return Flow::Continue;
        };

        match event {
            InputEvent::Left | InputEvent::Right | InputEvent::Up | InputEvent::Down => {
                *selected = self.grid.step(*selected, candidates.len(), event);
            }
            InputEvent::Confirm => {
                let Some(entry) = candidates.get(*selected) else {
                    tracing::debug!("Confirm with no candidate ignored");
                    return Flow::Continue;
                };
                let character = C::from_entry(entry);
                tracing::info!("Playing as {} ({})", entry.name(), entry.key());
                self.stage = Stage::Playing {
                    character,
                    mode: PlayMode::Normal,
                };
                self.last_outcome = None;
            }
            InputEvent::Cancel => {
                let alignment = *alignment;
                self.stage = Stage::AlignmentSelect { alignment };
            }
            _ => {}
        }
        Flow::Continue
    }

    fn handle_playing(&mut self, event: InputEvent) -> Flow {
        let Stage::Playing { character, mode } = &mut self.stage else {
            return Flow::Continue;
        };

        match *mode {
            PlayMode::AbilityMenu { selected } => {
                let last = character.abilities().len().saturating_sub(1);
                match event {
                    InputEvent::Toggle | InputEvent::Cancel => *mode = PlayMode::Normal,
                    InputEvent::Up => {
                        *mode = PlayMode::AbilityMenu {
                            selected: selected.saturating_sub(1),
                        }
                    }
                    InputEvent::Down => {
                        *mode = PlayMode::AbilityMenu {
                            selected: (selected + 1).min(last),
                        }
                    }
                    _ => {}
                }
            }
            PlayMode::Normal => match event {
                InputEvent::Cancel => return Flow::Exit,
                InputEvent::NewTurn => {
                    character.new_turn();
                    self.last_outcome = None;
                    tracing::debug!("New turn, {} moves", character.moves());
                }
                InputEvent::Toggle => *mode = PlayMode::AbilityMenu { selected: 0 },
                InputEvent::Move(direction) => {
                    let outcome = character.step(direction, &self.board, &self.terrain);
                    tracing::debug!("Move {} -> {:?}", direction.name(), outcome);
                    self.last_outcome = Some(outcome);
                }
                _ => {}
            },
        }
        Flow::Continue
    }

    // ========================================================================
    // FRAME LOOP
    // ========================================================================

    /// Run the frame loop: render, then one event per frame until an exit
    /// or the input runs dry.
    pub fn run<I, R>(&mut self, events: I, renderer: &mut R) -> Flow
    where
        I: IntoIterator<Item = InputEvent>,
        R: Renderer<C, P>,
    {
        renderer.begin();
        renderer.render(&self.frame());

        let mut flow = Flow::Continue;
        for event in events {
            flow = self.handle(event);
            if flow == Flow::Exit {
                tracing::info!("Session exit from {:?}", self.kind());
                break;
            }
            renderer.render(&self.frame());
        }

        renderer.finish();
        flow
    }
}
