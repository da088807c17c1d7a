//! Character roster and portraits
//!
//! The roster is a JSON object keyed by character identity:
//!
//! ```json
//! {
//!   "marshal": { "name": "the marshal", "alignment": "Loyal", "Photo": "img/marshal.png",
//!                "health": 12, "damage": 3, "moves": 4, "range": 1 },
//!   "drifter": { "name": "drifter", "alignment": "neutral" }
//! }
//! ```
//!
//! Entries keep file order. Portraits are keyed by identity, not display
//! name, so two characters sharing a name never share a picture.

use crate::error::{AssetError, LoadError};
use rustc_hash::FxHashMap;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

// ============================================================================
// ALIGNMENT
// ============================================================================

/// Faction tag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    Loyal,
    Lawless,
    Neutral,
}

impl Alignment {
    /// Alignments a player can pick; Neutral characters join either side
    pub const SELECTABLE: [Alignment; 2] = [Alignment::Loyal, Alignment::Lawless];

    pub fn name(self) -> &'static str {
        match self {
            Alignment::Loyal => "Loyal",
            Alignment::Lawless => "Lawless",
            Alignment::Neutral => "Neutral",
        }
    }

    /// Whether a character of this alignment may play for `side`
    pub fn serves(self, side: Alignment) -> bool {
        self == side || self == Alignment::Neutral
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Alignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "loyal" => Ok(Alignment::Loyal),
            "lawless" => Ok(Alignment::Lawless),
            "neutral" => Ok(Alignment::Neutral),
            other => Err(format!("unknown alignment: {other}")),
        }
    }
}

// ============================================================================
// ROSTER ENTRY
// ============================================================================

/// Base stats a character starts with
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub health: u32,
    pub damage: u32,
    pub moves: u32,
    pub range: u32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            health: 10,
            damage: 1,
            moves: 3,
            range: 1,
        }
    }
}

/// One playable character, immutable once loaded
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    key: String,
    name: String,
    alignment: Alignment,
    image: Option<PathBuf>,
    stats: Stats,
    abilities: Vec<String>,
}

impl RosterEntry {
    pub fn new(key: impl Into<String>, name: impl Into<String>, alignment: Alignment) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            alignment,
            image: None,
            stats: Stats::default(),
            abilities: Vec::new(),
        }
    }

    pub fn with_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.image = Some(path.into());
        self
    }

    pub fn with_stats(mut self, stats: Stats) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_abilities(mut self, abilities: Vec<String>) -> Self {
        self.abilities = abilities;
        self
    }

    /// Identity key (unique within a roster)
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn image(&self) -> Option<&Path> {
        self.image.as_deref()
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn abilities(&self) -> &[String] {
        &self.abilities
    }
}

/// Persisted form of an entry
#[derive(Debug, Deserialize)]
struct RosterRecord {
    name: String,
    alignment: String,
    #[serde(default, alias = "Photo", alias = "photo")]
    image: Option<PathBuf>,
    #[serde(default)]
    health: Option<u32>,
    #[serde(default)]
    damage: Option<u32>,
    #[serde(default)]
    moves: Option<u32>,
    #[serde(default)]
    range: Option<u32>,
    #[serde(default)]
    abilities: Vec<String>,
}

impl RosterRecord {
    fn into_entry(self, key: String) -> Result<RosterEntry, String> {
        let alignment = self.alignment.parse::<Alignment>()?;
        let defaults = Stats::default();
        let stats = Stats {
            health: self.health.unwrap_or(defaults.health),
            damage: self.damage.unwrap_or(defaults.damage),
            moves: self.moves.unwrap_or(defaults.moves),
            range: self.range.unwrap_or(defaults.range),
        };
        Ok(RosterEntry {
            key,
            name: self.name,
            alignment,
            // An empty path means "no portrait"
            image: self.image.filter(|p| !p.as_os_str().is_empty()),
            stats,
            abilities: self.abilities,
        })
    }
}

/// Top-level roster object as written, in file order and with repeated
/// keys intact. A plain map would let a later record overwrite an earlier one.
struct RosterDocument(Vec<(String, serde_json::Value)>);

impl<'de> Deserialize<'de> for RosterDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DocumentVisitor;

        impl<'de> Visitor<'de> for DocumentVisitor {
            type Value = RosterDocument;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of character records keyed by identity")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RosterDocument, A::Error> {
                let mut records = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(record) = map.next_entry()? {
                    records.push(record);
                }
                Ok(RosterDocument(records))
            }
        }

        deserializer.deserialize_map(DocumentVisitor)
    }
}

// ============================================================================
// ROSTER
// ============================================================================

/// Ordered list of playable characters
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    /// Build a roster from entries. Later duplicates of a key are dropped.
    pub fn from_entries(entries: impl IntoIterator<Item = RosterEntry>) -> Self {
        let mut roster = Self::default();
        for entry in entries {
            if roster.get(entry.key()).is_some() {
                tracing::warn!("Duplicate roster key {:?}, keeping the first", entry.key());
                continue;
            }
            roster.entries.push(entry);
        }
        roster
    }

    /// Load a roster file, falling back to an empty roster on any failure
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(roster) => roster,
            Err(e) => {
                tracing::warn!("Roster unavailable, using empty roster: {}", e);
                Self::default()
            }
        }
    }

    /// Load from a reader, falling back to an empty roster on any failure
    pub fn load_from_reader<R: Read>(reader: R) -> Self {
        match Self::try_from_reader(reader) {
            Ok(roster) => roster,
            Err(e) => {
                tracing::warn!("Roster unavailable, using empty roster: {}", e);
                Self::default()
            }
        }
    }

    /// Load a roster file. Relative image paths resolve against the
    /// file's directory.
    pub fn try_load(path: &Path) -> Result<Self, LoadError> {
        let file = std::fs::File::open(path).map_err(|e| LoadError::io(path, e))?;
        let mut roster = Self::try_from_reader(std::io::BufReader::new(file))?;

        if let Some(base) = path.parent() {
            for entry in &mut roster.entries {
                if let Some(image) = entry.image.as_mut() {
                    if image.is_relative() {
                        *image = base.join(&*image);
                    }
                }
            }
        }

        tracing::info!("Loaded {} characters from {}", roster.len(), path.display());
        Ok(roster)
    }

    /// Parse a roster document. Individual malformed records are skipped
    /// with a warning; a malformed document is an error.
    pub fn try_from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let RosterDocument(records) = serde_json::from_reader(reader)?;

        let mut entries = Vec::with_capacity(records.len());
        for (key, value) in records {
            let entry = serde_json::from_value::<RosterRecord>(value)
                .map_err(|e| e.to_string())
                .and_then(|record| record.into_entry(key.clone()));
            match entry {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::warn!("Skipping roster entry {:?}: {}", key, e),
            }
        }
        Ok(Self::from_entries(entries))
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&RosterEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries playable for `alignment` (that side plus Neutral), in order
    pub fn filter(&self, alignment: Alignment) -> Vec<RosterEntry> {
        filter(&self.entries, alignment)
    }
}

/// Entries whose alignment matches or is Neutral, preserving order
pub fn filter(entries: &[RosterEntry], alignment: Alignment) -> Vec<RosterEntry> {
    entries
        .iter()
        .filter(|e| e.alignment.serves(alignment))
        .cloned()
        .collect()
}

// ============================================================================
// PORTRAITS
// ============================================================================

/// Loads one image asset
pub trait PortraitLoader {
    type Portrait;

    fn load(&mut self, path: &Path) -> Result<Self::Portrait, AssetError>;
}

/// Decodes portraits with the `image` crate and scales them to a square
#[derive(Clone, Copy, Debug)]
pub struct ImagePortraitLoader {
    pub edge: u32,
}

impl ImagePortraitLoader {
    pub fn new(edge: u32) -> Self {
        Self { edge: edge.max(1) }
    }
}

impl Default for ImagePortraitLoader {
    fn default() -> Self {
        Self::new(120)
    }
}

impl PortraitLoader for ImagePortraitLoader {
    type Portrait = image::RgbaImage;

    fn load(&mut self, path: &Path) -> Result<Self::Portrait, AssetError> {
        let img = image::open(path).map_err(|e| AssetError::Load {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(img
            .resize_exact(self.edge, self.edge, image::imageops::FilterType::Triangle)
            .to_rgba8())
    }
}

/// Loaded portraits by identity key. A key maps to `None` when the entry
/// had no image or its image failed to load.
#[derive(Clone, Debug)]
pub struct Portraits<P> {
    by_key: FxHashMap<String, Option<P>>,
}

impl<P> Default for Portraits<P> {
    fn default() -> Self {
        Self {
            by_key: FxHashMap::default(),
        }
    }
}

impl<P> Portraits<P> {
    /// Load every entry's portrait. Failures leave a `None` placeholder.
    pub fn load_all<L>(roster: &Roster, loader: &mut L) -> Self
    where
        L: PortraitLoader<Portrait = P>,
    {
        let mut by_key = FxHashMap::default();
        for entry in roster.entries() {
            let portrait = match entry.image() {
                None => Err(AssetError::MissingPath),
                Some(path) => loader.load(path),
            };
            let portrait = match portrait {
                Ok(p) => Some(p),
                Err(AssetError::MissingPath) => {
                    tracing::debug!("No portrait for {}", entry.key());
                    None
                }
                Err(e) => {
                    tracing::warn!("Could not load portrait for {}: {}", entry.key(), e);
                    None
                }
            };
            by_key.insert(entry.key().to_string(), portrait);
        }
        Self { by_key }
    }

    /// Portrait for a key, if one loaded
    pub fn get(&self, key: &str) -> Option<&P> {
        self.by_key.get(key).and_then(Option::as_ref)
    }

    pub fn loaded_count(&self) -> usize {
        self.by_key.values().filter(|p| p.is_some()).count()
    }
}
