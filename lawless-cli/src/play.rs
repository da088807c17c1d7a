//! Play command - run an interactive session in the terminal
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: resolve_config(), build_session(), open_input()
//! - Level 3: load_terrain(), parse_event()
//! - Level 4: TextRenderer and formatting utilities

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use lawless_core::{
    Board, Character, Flow, Frame, GameConfig, HexDirection, ImagePortraitLoader, InputEvent,
    MoveOutcome, PlayMode, Portraits, Renderer, Roster, Session, Stage, TerrainStore,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Game config JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Terrain JSON file (overrides config)
    #[arg(long, value_name = "FILE")]
    pub terrain: Option<PathBuf>,

    /// Roster JSON file (overrides config)
    #[arg(long, value_name = "FILE")]
    pub roster: Option<PathBuf>,

    /// Board radius (overrides config)
    #[arg(long)]
    pub radius: Option<i32>,

    /// Scatter random difficult terrain when no terrain file is given (0.0-1.0)
    #[arg(long)]
    pub scatter: Option<f64>,

    /// Random seed for scattered terrain
    #[arg(long)]
    pub seed: Option<u64>,

    /// Read input tokens from a file instead of stdin
    #[arg(long, value_name = "FILE")]
    pub script: Option<PathBuf>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Resolve configuration (file, then flag overrides)
/// 2. Build the board, terrain, roster and session
/// 3. Run the frame loop over the input tokens
pub fn run(args: PlayArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    let mut session = build_session(&config, &args);

    let input = open_input(&args)?;
    let mut renderer = TextRenderer::new(io::stdout().lock());

    let flow = session.run(input, &mut renderer);
    renderer.into_result()?;

    if flow == Flow::Continue {
        tracing::info!("Input exhausted, ending session");
    }
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Load the config file (if any) and apply flag overrides
pub(crate) fn resolve_config(args: &PlayArgs) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    if let Some(radius) = args.radius {
        config = config.with_board_radius(radius);
    }
    if let Some(path) = &args.terrain {
        config = config.with_terrain_path(path);
    }
    if let Some(path) = &args.roster {
        config = config.with_roster_path(path);
    }
    config.validate()?;
    Ok(config)
}

/// Build a session from configuration. Data problems degrade to empty
/// data; they never stop the game from starting.
fn build_session(config: &GameConfig, args: &PlayArgs) -> Session {
    let board = Board::generate(config.board_radius, config.layout());
    let terrain = load_terrain(config, args, &board);

    let roster = match &config.roster_path {
        Some(path) => Roster::load(path),
        None => {
            tracing::warn!("No roster file configured, roster is empty");
            Roster::default()
        }
    };

    let mut loader = ImagePortraitLoader::new(config.portrait_size);
    let portraits = Portraits::load_all(&roster, &mut loader);

    tracing::info!(
        "Board radius {} ({} cells), {} difficult, {} walls, {} characters ({} portraits)",
        board.radius(),
        board.len(),
        terrain.summary().difficult,
        terrain.summary().walls,
        roster.len(),
        portraits.loaded_count()
    );

    Session::new(config, board, terrain, roster, portraits)
}

/// Input tokens from the script file or stdin, one per line
fn open_input(args: &PlayArgs) -> Result<Box<dyn Iterator<Item = InputEvent>>> {
    let reader: Box<dyn BufRead> = match &args.script {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("Failed to open script: {}", path.display()))?;
            Box::new(io::BufReader::new(file))
        }
        None => Box::new(io::BufReader::new(io::stdin())),
    };

    Ok(Box::new(reader.lines().map_while(|line| line.ok()).filter_map(
        |line| {
            let event = parse_event(&line);
            if event.is_none() && !line.trim().is_empty() {
                tracing::warn!("Unknown input: {:?}", line.trim());
            }
            event
        },
    )))
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Terrain file if configured, else scattered terrain if requested, else none
fn load_terrain(config: &GameConfig, args: &PlayArgs, board: &Board) -> TerrainStore {
    if let Some(path) = &config.terrain_path {
        return TerrainStore::load(path, board, config.move_costs);
    }
    match args.scatter {
        Some(density) => {
            let mut rng = create_rng(args.seed);
            TerrainStore::scatter(board, density, config.move_costs, &mut rng)
        }
        None => TerrainStore::new(config.move_costs),
    }
}

/// Parse one input token. Tokens follow the desktop key layout:
/// arrows, enter, escape, `n` for a new turn and `s` for the ability menu.
pub(crate) fn parse_event(line: &str) -> Option<InputEvent> {
    let token = line.trim().to_ascii_lowercase();
    let mut words = token.split_whitespace();
    let head = words.next()?;

    let event = match head {
        "up" => InputEvent::Up,
        "down" => InputEvent::Down,
        "left" => InputEvent::Left,
        "right" => InputEvent::Right,
        "enter" | "return" | "confirm" => InputEvent::Confirm,
        "esc" | "escape" | "cancel" | "back" => InputEvent::Cancel,
        "n" | "new-turn" | "turn" => InputEvent::NewTurn,
        "s" | "toggle" | "abilities" => InputEvent::Toggle,
        "q" | "quit" => InputEvent::Quit,
        "move" | "m" => InputEvent::Move(HexDirection::parse(words.next()?)?),
        _ => return None,
    };

    // Trailing words make the token ambiguous
    if words.next().is_some() {
        return None;
    }
    Some(event)
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Capitalise each word, for display names
fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders frames as plain text
pub(crate) struct TextRenderer<W: Write> {
    out: W,
    frames: usize,
    error: Option<io::Error>,
}

impl<W: Write> TextRenderer<W> {
    pub(crate) fn new(out: W) -> Self {
        Self {
            out,
            frames: 0,
            error: None,
        }
    }

    /// First write error, if any frame failed to print
    pub(crate) fn into_result(self) -> io::Result<()> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }

    fn draw<C: Character, P>(&mut self, frame: &Frame<'_, C, P>) -> io::Result<()> {
        writeln!(self.out, "--- frame {} ---", self.frames)?;
        match frame.stage {
            Stage::AlignmentSelect { .. } => self.draw_alignment_select(frame),
            Stage::CharacterSelect { .. } => self.draw_character_select(frame),
            Stage::Playing { .. } => self.draw_playing(frame),
        }
    }

    fn draw_alignment_select<C: Character, P>(&mut self, frame: &Frame<'_, C, P>) -> io::Result<()> {
        writeln!(self.out, "Choose Your Alignment")?;
        let current = frame.alignment();
        for alignment in frame.alignments {
            let marker = if Some(*alignment) == current { ">" } else { " " };
            writeln!(self.out, " {} {}", marker, alignment)?;
        }
        writeln!(self.out, "UP/DOWN to select, ENTER to continue, ESC to quit")
    }

    fn draw_character_select<C: Character, P>(&mut self, frame: &Frame<'_, C, P>) -> io::Result<()> {
        let side = frame.alignment().map(|a| a.name()).unwrap_or("?");
        writeln!(self.out, "Choose Your Player ({} + Neutral)", side)?;

        let Some((candidates, selected)) = frame.candidates() else {
            return Ok(());
        };
        if candidates.is_empty() {
            writeln!(self.out, "No players available for this alignment")?;
            return Ok(());
        }

        for (row, chunk) in candidates.chunks(frame.grid.columns).enumerate() {
            let cells: Vec<String> = chunk
                .iter()
                .enumerate()
                .map(|(col, entry)| {
                    let index = row * frame.grid.columns + col;
                    let name = title_case(entry.name());
                    let image = if frame.portrait(entry.key()).is_some() { "" } else { " (No Image)" };
                    if index == selected {
                        format!("[{}{}]", name, image)
                    } else {
                        format!(" {}{} ", name, image)
                    }
                })
                .collect();
            writeln!(self.out, "  {}", cells.join("  "))?;
        }
        writeln!(self.out, "ARROW KEYS to navigate, ENTER to select, ESC to go back")
    }

    fn draw_playing<C: Character, P>(&mut self, frame: &Frame<'_, C, P>) -> io::Result<()> {
        let Some(character) = frame.character() else {
            return Ok(());
        };

        let pos = character.position();
        let terrain = frame.board.terrain(pos).map(|t| format!("{:?}", t)).unwrap_or_default();
        writeln!(self.out, "{}", character.name())?;
        writeln!(self.out, "  Health: {}/{}", character.health(), character.max_health())?;
        writeln!(self.out, "  Damage: {}", character.damage())?;
        writeln!(self.out, "  Moves: {}/{}", character.moves(), character.max_moves())?;
        writeln!(self.out, "  Range: {}", character.range())?;
        writeln!(self.out, "  Position: ({}, {}) {}", pos.q, pos.r, terrain)?;

        if let Some(outcome) = frame.last_outcome {
            writeln!(self.out, "  Last move: {}", describe_outcome(outcome))?;
        }

        if let Some(PlayMode::AbilityMenu { selected }) = frame.play_mode() {
            writeln!(self.out, "Abilities")?;
            if character.abilities().is_empty() {
                writeln!(self.out, "  (none)")?;
            }
            for (i, ability) in character.abilities().iter().enumerate() {
                let marker = if i == selected { ">" } else { " " };
                writeln!(self.out, " {} {}", marker, ability)?;
            }
            writeln!(self.out, "S or ESC to close")
        } else {
            writeln!(self.out, "Press N for new turn, S for abilities, ESC to quit")
        }
    }
}

impl<W: Write, C: Character, P> Renderer<C, P> for TextRenderer<W> {
    fn render(&mut self, frame: &Frame<'_, C, P>) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.draw(frame) {
            self.error = Some(e);
        }
        self.frames += 1;
    }

    fn finish(&mut self) {
        if let Err(e) = self.out.flush() {
            self.error.get_or_insert(e);
        }
    }
}

fn describe_outcome(outcome: MoveOutcome) -> String {
    match outcome {
        MoveOutcome::Moved { to, cost } => format!("moved to ({}, {}) for {}", to.q, to.r, cost),
        MoveOutcome::BlockedByWall => "blocked by a wall".to_string(),
        MoveOutcome::InsufficientMoves { cost, remaining } => {
            format!("needs {} moves, {} left", cost, remaining)
        }
        MoveOutcome::OutOfBounds => "edge of the board".to_string(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use lawless_core::{generate_board, Alignment, Champion, RosterEntry};

    fn args() -> PlayArgs {
        PlayArgs {
            config: None,
            terrain: None,
            roster: None,
            radius: None,
            scatter: None,
            seed: None,
            script: None,
        }
    }

    #[test]
    fn test_parse_event() {
        assert_eq!(parse_event("up"), Some(InputEvent::Up));
        assert_eq!(parse_event("  ENTER "), Some(InputEvent::Confirm));
        assert_eq!(parse_event("esc"), Some(InputEvent::Cancel));
        assert_eq!(parse_event("n"), Some(InputEvent::NewTurn));
        assert_eq!(parse_event("s"), Some(InputEvent::Toggle));
        assert_eq!(parse_event("q"), Some(InputEvent::Quit));
        assert_eq!(parse_event("move ne"), Some(InputEvent::Move(HexDirection::NE)));
        assert_eq!(parse_event("m S"), Some(InputEvent::Move(HexDirection::S)));
        assert_eq!(parse_event("move"), None);
        assert_eq!(parse_event("move up"), None);
        assert_eq!(parse_event("up up"), None);
        assert_eq!(parse_event(""), None);
        assert_eq!(parse_event("jump"), None);
    }

    #[test]
    fn test_resolve_config_overrides() {
        let mut a = args();
        a.radius = Some(3);
        a.terrain = Some(PathBuf::from("t.json"));
        let config = resolve_config(&a).unwrap();
        assert_eq!(config.board_radius, 3);
        assert_eq!(config.terrain_path, Some(PathBuf::from("t.json")));
        assert!(config.roster_path.is_none());
    }

    #[test]
    fn test_scatter_when_no_terrain_file() {
        let mut a = args();
        a.scatter = Some(1.0);
        a.seed = Some(5);
        let config = resolve_config(&a).unwrap();
        let board = generate_board(2);
        let terrain = load_terrain(&config, &a, &board);
        assert_eq!(terrain.summary().difficult, board.len() - 1);

        a.scatter = None;
        assert_eq!(load_terrain(&config, &a, &board).summary().difficult, 0);

        a.scatter = Some(f64::NAN);
        assert_eq!(load_terrain(&config, &a, &board).summary().difficult, 0);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("the marshal"), "The Marshal");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_text_renderer_frames() {
        let roster = Roster::from_entries([
            RosterEntry::new("marshal", "the marshal", Alignment::Loyal),
            RosterEntry::new("drifter", "drifter", Alignment::Neutral),
        ]);
        let mut session: Session<Champion, ()> = Session::new(
            &GameConfig::default(),
            generate_board(2),
            TerrainStore::default(),
            roster,
            Portraits::default(),
        );
        let mut renderer = TextRenderer::new(Vec::new());
        let events = ["enter", "right", "enter", "move n", "move n", "move n", "s"]
            .iter()
            .filter_map(|t| parse_event(t));
        let flow = session.run(events, &mut renderer);
        assert_eq!(flow, Flow::Continue);

        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(text.contains("Choose Your Alignment"));
        assert!(text.contains(" > Loyal"));
        assert!(text.contains("Choose Your Player (Loyal + Neutral)"));
        assert!(text.contains("[Drifter (No Image)]"));
        assert!(text.contains("Moves: 1/3"));
        assert!(text.contains("Last move: edge of the board"));
        assert!(text.contains("Abilities"));
    }

    #[test]
    fn test_text_renderer_empty_candidates() {
        let mut session: Session<Champion, ()> = Session::new(
            &GameConfig::default(),
            generate_board(1),
            TerrainStore::default(),
            Roster::default(),
            Portraits::default(),
        );
        let mut renderer = TextRenderer::new(Vec::new());
        session.run([InputEvent::Confirm, InputEvent::Confirm], &mut renderer);
        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(text.contains("No players available for this alignment"));
    }
}
