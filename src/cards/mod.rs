//! Card indexing: numbers parsed from file names, faces, items, and folder scans.

/// Card numbers, faces and item arithmetic.
pub mod number;
/// Folder scanning into decks and browse indexes.
pub mod scan;

pub use number::{
    Face, FIRST_TREASURE_CARD, MAX_CARD, MAX_ITEM, back_card_for_item, card_for_item,
    extract_card_number, front_card_for_item, is_treasure_card, is_valid_item, item_for_card,
};
pub use scan::{
    CardFile, CardIndex, Deck, DeckSummary, FolderScan, MIN_BACKS, MIN_FRONTS, scan_deck,
    scan_folder, scan_index,
};
