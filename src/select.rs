//! Choosing which card files feed a treasure layout.
//!
//! Two policies produce the same [`Selection`]:
//!
//! - [`pick_random`] draws four distinct backs and one front from a [`Deck`]
//! - [`resolve_items`] maps five user-chosen item numbers through a [`CardIndex`]
//!
//! Both only read the snapshot they are given, so they can be re-run freely.

use std::{fmt, path::Path};

use rand::Rng;

use crate::{
    cards::{
        CardFile, CardIndex, Deck, Face, MAX_ITEM, MIN_BACKS, MIN_FRONTS, card_for_item,
        number::saturating_digits,
    },
    foundation::error::{MissingFace, TreasureError, TreasureResult},
};

/// The slot a card occupies in a treasure layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Role {
    /// Anchor card at the top of the stacked cluster.
    Back1,
    /// Card below the anchor.
    Back2,
    /// Card shifted left of the anchor.
    Back3,
    /// Card cut down for the side panel.
    CropBack,
    /// Revealed card laid over the cluster.
    Front,
}

impl Role {
    /// Every role, in status-line order.
    pub const ALL: [Role; 5] = [
        Role::Back1,
        Role::Back2,
        Role::Back3,
        Role::Front,
        Role::CropBack,
    ];

    /// Label used in status lines and errors.
    pub fn name(self) -> &'static str {
        match self {
            Role::Back1 => "Back #1",
            Role::Back2 => "Back #2",
            Role::Back3 => "Back #3",
            Role::CropBack => "Cropped Back",
            Role::Front => "Front",
        }
    }

    /// Face tried first when resolving an item for this role.
    pub fn preferred_face(self) -> Face {
        match self {
            Role::Front => Face::Front,
            _ => Face::Back,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Five resolved card files, one per [`Role`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Selection {
    /// Anchor of the cluster.
    pub back1: CardFile,
    /// Below the anchor.
    pub back2: CardFile,
    /// Left of the anchor.
    pub back3: CardFile,
    /// Source of the side panel.
    pub crop_back: CardFile,
    /// Revealed card.
    pub front: CardFile,
}

impl Selection {
    /// Card in `role`.
    pub fn card(&self, role: Role) -> &CardFile {
        match role {
            Role::Back1 => &self.back1,
            Role::Back2 => &self.back2,
            Role::Back3 => &self.back3,
            Role::CropBack => &self.crop_back,
            Role::Front => &self.front,
        }
    }

    /// File of the card in `role`.
    pub fn path(&self, role: Role) -> &Path {
        &self.card(role).path
    }

    /// `Back #1: 22 | Back #2: 24 | ... | Cropped Back: 28`
    pub fn status_line(&self) -> String {
        Role::ALL
            .iter()
            .map(|&role| format!("{}: {}", role, self.card(role).number))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Draw four distinct backs (without replacement) and one front.
#[tracing::instrument(skip_all, fields(fronts = deck.fronts.len(), backs = deck.backs.len()))]
pub fn pick_random<R: Rng>(deck: &Deck, rng: &mut R) -> TreasureResult<Selection> {
    if deck.backs.len() < MIN_BACKS || deck.fronts.len() < MIN_FRONTS {
        return Err(TreasureError::InsufficientCards {
            backs: deck.backs.len(),
            fronts: deck.fronts.len(),
        });
    }

    let picks = rand::seq::index::sample(rng, deck.backs.len(), MIN_BACKS);
    let mut backs = picks.iter().map(|i| deck.backs[i].clone());
    let front = deck.fronts[rng.gen_range(0..deck.fronts.len())].clone();

    let (Some(back1), Some(back2), Some(back3), Some(crop_back)) =
        (backs.next(), backs.next(), backs.next(), backs.next())
    else {
        return Err(TreasureError::InsufficientCards {
            backs: deck.backs.len(),
            fronts: deck.fronts.len(),
        });
    };

    let selection = Selection {
        back1,
        back2,
        back3,
        crop_back,
        front,
    };
    tracing::debug!(status = %selection.status_line(), "random selection");
    Ok(selection)
}

/// Item numbers requested for each role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ItemRequest {
    /// Item for back #1.
    pub back1: u32,
    /// Item for back #2.
    pub back2: u32,
    /// Item for back #3.
    pub back3: u32,
    /// Item for the cropped panel.
    pub crop_back: u32,
    /// Item for the front.
    pub front: u32,
}

impl ItemRequest {
    /// Item requested for `role`.
    pub fn item(&self, role: Role) -> u32 {
        match role {
            Role::Back1 => self.back1,
            Role::Back2 => self.back2,
            Role::Back3 => self.back3,
            Role::CropBack => self.crop_back,
            Role::Front => self.front,
        }
    }

    /// Build from five items given in the order back #1, back #2, back #3, crop, front.
    pub fn from_slice(items: &[u32]) -> TreasureResult<Self> {
        let [back1, back2, back3, crop_back, front] = items else {
            return Err(TreasureError::invalid_input(format!(
                "expected 5 item numbers, got {}",
                items.len()
            )));
        };
        Ok(Self {
            back1: *back1,
            back2: *back2,
            back3: *back3,
            crop_back: *crop_back,
            front: *front,
        })
    }
}

/// Resolve each requested item to a file, preferring the role's face and falling
/// back to the other one. Reports every unresolvable item at once.
#[tracing::instrument(skip(index))]
pub fn resolve_items(index: &CardIndex, request: ItemRequest) -> TreasureResult<Selection> {
    let mut missing = Vec::<MissingFace>::new();
    let mut resolve = |role: Role| -> Option<CardFile> {
        let item = request.item(role);
        let face = role.preferred_face();
        let found = [face, face.opposite()].into_iter().find_map(|f| {
            let number = card_for_item(item, f)?;
            index.get(number).map(|path| CardFile {
                number,
                path: path.to_path_buf(),
            })
        });
        if found.is_none() {
            missing.push(MissingFace { item, face, role });
        }
        found
    };

    let back1 = resolve(Role::Back1);
    let back2 = resolve(Role::Back2);
    let back3 = resolve(Role::Back3);
    let front = resolve(Role::Front);
    let crop_back = resolve(Role::CropBack);

    match (back1, back2, back3, crop_back, front) {
        (Some(back1), Some(back2), Some(back3), Some(crop_back), Some(front)) => Ok(Selection {
            back1,
            back2,
            back3,
            crop_back,
            front,
        }),
        _ => Err(TreasureError::MissingCard(missing)),
    }
}

/// Interpret one typed item entry. Non-numbers are ignored; numbers are clamped
/// into 1..=100.
pub fn parse_item_entry(text: &str) -> Option<u32> {
    let text = text.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if negative {
        return Some(1);
    }
    Some(saturating_digits(digits).clamp(1, MAX_ITEM))
}

/// Parse five item entries separated by commas or whitespace. Entries that are
/// not numbers are skipped.
pub fn parse_item_list(text: &str) -> TreasureResult<ItemRequest> {
    let items: Vec<u32> = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter_map(parse_item_entry)
        .collect();
    ItemRequest::from_slice(&items)
}

#[cfg(test)]
#[path = "../tests/unit/select.rs"]
mod tests;
