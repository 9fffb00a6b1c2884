use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use crate::cards::number::{
    Face, MAX_CARD, extract_card_number, is_treasure_card, series_key, split_card_file_name,
};

/// Backs needed for one random draw (three stacked plus the cropped panel).
pub const MIN_BACKS: usize = 4;
/// Fronts needed for one random draw.
pub const MIN_FRONTS: usize = 1;

/// A card image on disk together with the number parsed from its name.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct CardFile {
    /// Number parsed from the file name.
    pub number: u32,
    /// Location on disk.
    pub path: PathBuf,
}

impl CardFile {
    /// Face implied by the number's parity.
    pub fn face(&self) -> Face {
        Face::of(self.number)
    }

    /// Final path component, lossily decoded.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Result of one walk over a folder, before any deck/browse filtering.
#[derive(Clone, Debug, Default)]
pub struct FolderScan {
    /// Card number -> winning file for numbers 1..=220.
    numbered: BTreeMap<u32, PathBuf>,
    /// Card images whose name carries no recognizable number, in name order.
    unnumbered: Vec<PathBuf>,
}

impl FolderScan {
    /// Walk `dir` (non-recursively) and classify every card image.
    ///
    /// Never fails: an unreadable folder is logged and scans as empty.
    #[tracing::instrument]
    pub fn walk(dir: &Path) -> Self {
        let entries = match std::fs::read_dir(dir) {
            Ok(rd) => rd,
            Err(err) => {
                tracing::warn!(error = %err, "cannot read card folder");
                return Self::default();
            }
        };

        let mut candidates = Vec::<(String, PathBuf)>::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                tracing::debug!(path = %path.display(), "skipping non-utf8 file name");
                continue;
            };
            if split_card_file_name(name).is_none() {
                continue;
            }
            candidates.push((name.to_string(), path));
        }
        Self::classify(candidates)
    }

    /// Classify `(file name, path)` pairs. Collisions keep the file whose name
    /// sorts first case-insensitively.
    pub fn classify(mut candidates: Vec<(String, PathBuf)>) -> Self {
        candidates.sort_by(|(a, _), (b, _)| {
            a.to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b))
        });

        let mut out = Self::default();
        for (name, path) in candidates {
            match extract_card_number(&name) {
                Some(n) if (1..=MAX_CARD).contains(&n) => {
                    if let Some(kept) = out.numbered.get(&n) {
                        tracing::debug!(
                            card = n,
                            kept = %kept.display(),
                            skipped = %name,
                            "duplicate card number"
                        );
                        continue;
                    }
                    tracing::debug!(card = n, file = %name, "indexed card");
                    out.numbered.insert(n, path);
                }
                Some(n) => tracing::debug!(card = n, file = %name, "card number out of range"),
                None => out.unnumbered.push(path),
            }
        }
        out
    }

    /// Split the treasure range (21..=220) into fronts and backs.
    pub fn deck(&self) -> Deck {
        let mut deck = Deck::default();
        for (&number, path) in &self.numbered {
            if !is_treasure_card(number) {
                continue;
            }
            let file = CardFile {
                number,
                path: path.clone(),
            };
            match Face::of(number) {
                Face::Front => deck.fronts.push(file),
                Face::Back => deck.backs.push(file),
            }
        }
        deck
    }

    /// Browse index over 1..=220, including the card #1 fallback.
    ///
    /// Quirk: some decks ship their first card without a number. When #1 is
    /// absent and #2 exists, an unnumbered file whose name equals #2's name minus
    /// its trailing number is taken as #1. Nothing else is guessed.
    pub fn index(&self) -> CardIndex {
        let mut cards = self.numbered.clone();
        let mut inferred_first = false;

        if !cards.contains_key(&1)
            && let Some(second) = cards.get(&2)
            && let Some(key) = file_name_str(second).and_then(series_key)
        {
            let first = self
                .unnumbered
                .iter()
                .find(|p| file_name_str(p).and_then(series_key) == Some(key));
            if let Some(first) = first {
                tracing::debug!(file = %first.display(), "inferred card #1 from unnumbered file");
                cards.insert(1, first.clone());
                inferred_first = true;
            }
        }

        CardIndex {
            cards,
            inferred_first,
        }
    }
}

fn file_name_str(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

/// Fronts and backs available for random draws, one file per number, ascending.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Deck {
    /// Odd-numbered cards.
    pub fronts: Vec<CardFile>,
    /// Even-numbered cards.
    pub backs: Vec<CardFile>,
}

impl Deck {
    /// `true` with at least four backs and one front.
    pub fn is_drawable(&self) -> bool {
        self.backs.len() >= MIN_BACKS && self.fronts.len() >= MIN_FRONTS
    }

    /// Counts for reporting.
    pub fn summary(&self) -> DeckSummary {
        DeckSummary {
            fronts: self.fronts.len(),
            backs: self.backs.len(),
            drawable: self.is_drawable(),
        }
    }
}

/// Counts reported to the user after a scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct DeckSummary {
    /// Fronts in the deck.
    pub fronts: usize,
    /// Backs in the deck.
    pub backs: usize,
    /// Whether a random draw is possible.
    pub drawable: bool,
}

/// Card number -> file for every indexed card in 1..=220.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CardIndex {
    cards: BTreeMap<u32, PathBuf>,
    inferred_first: bool,
}

impl CardIndex {
    /// File for `card`, if indexed.
    pub fn get(&self, card: u32) -> Option<&Path> {
        self.cards.get(&card).map(PathBuf::as_path)
    }

    /// Number of indexed cards.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// `true` when nothing was indexed.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// `true` when card #1 came from the unnumbered-file fallback.
    pub fn first_was_inferred(&self) -> bool {
        self.inferred_first
    }

    /// Indexed cards in ascending number order.
    pub fn iter(&self) -> impl Iterator<Item = CardFile> + '_ {
        self.cards.iter().map(|(&number, path)| CardFile {
            number,
            path: path.clone(),
        })
    }
}

/// One walk over `dir`, feeding both the deck and the browse index.
pub fn scan_folder(dir: &Path) -> FolderScan {
    FolderScan::walk(dir)
}

/// Scan `dir` for the random-draw deck.
pub fn scan_deck(dir: &Path) -> Deck {
    scan_folder(dir).deck()
}

/// Scan `dir` for the browse index.
pub fn scan_index(dir: &Path) -> CardIndex {
    scan_folder(dir).index()
}

#[cfg(test)]
#[path = "../../tests/unit/cards/scan.rs"]
mod tests;
