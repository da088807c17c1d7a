//! Roster command - list characters, optionally filtered by alignment
//!
//! Unlike a game session, listing reports a broken roster file as an
//! error instead of quietly showing nothing.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use lawless_core::{Alignment, Roster, RosterEntry};

#[derive(Args)]
pub struct RosterArgs {
    /// Roster JSON file
    #[arg(long, value_name = "FILE")]
    pub roster: PathBuf,

    /// Only show characters playable for this alignment (plus Neutral)
    #[arg(long)]
    pub alignment: Option<Alignment>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run roster command
pub fn run(args: RosterArgs) -> Result<()> {
    let roster = Roster::try_load(&args.roster)
        .with_context(|| format!("Failed to load roster: {}", args.roster.display()))?;

    let entries = select(&roster, args.alignment);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for line in format_entries(&entries) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn select(roster: &Roster, alignment: Option<Alignment>) -> Vec<RosterEntry> {
    match alignment {
        Some(side) => roster.filter(side),
        None => roster.entries().to_vec(),
    }
}

fn format_entries(entries: &[RosterEntry]) -> Vec<String> {
    if entries.is_empty() {
        return vec!["(no characters)".to_string()];
    }
    entries
        .iter()
        .map(|e| {
            let stats = e.stats();
            format!(
                "{:<12} {:<20} {:<8} hp {:>3}  dmg {:>2}  mv {:>2}  rng {:>2}",
                e.key(),
                e.name(),
                e.alignment(),
                stats.health,
                stats.damage,
                stats.moves,
                stats.range
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Roster {
        Roster::from_entries([
            RosterEntry::new("A", "a", Alignment::Loyal),
            RosterEntry::new("B", "b", Alignment::Lawless),
            RosterEntry::new("C", "c", Alignment::Neutral),
        ])
    }

    #[test]
    fn test_select() {
        let keys = |entries: Vec<RosterEntry>| -> Vec<String> {
            entries.iter().map(|e| e.key().to_string()).collect()
        };
        assert_eq!(keys(select(&roster(), None)), vec!["A", "B", "C"]);
        assert_eq!(keys(select(&roster(), Some(Alignment::Loyal))), vec!["A", "C"]);
    }

    #[test]
    fn test_format_entries() {
        let lines = format_entries(&roster().filter(Alignment::Lawless));
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("B "));
        assert!(lines[0].contains("Lawless"));
        assert_eq!(format_entries(&[]), vec!["(no characters)"]);
    }

    #[test]
    fn test_missing_roster_is_an_error() {
        let args = RosterArgs {
            roster: PathBuf::from("/nonexistent/player.json"),
            alignment: None,
            json: false,
        };
        assert!(run(args).is_err());
    }
}
