use std::fmt;

/// Highest card number any index keeps.
pub const MAX_CARD: u32 = 220;
/// First card number that belongs to an item.
pub const FIRST_TREASURE_CARD: u32 = 21;
/// Highest item number.
pub const MAX_ITEM: u32 = 100;

/// Extensions recognized as card images (compared case-insensitively).
pub const CARD_EXTENSIONS: [&str; 2] = ["jpg", "jpeg"];

const MAX_SUFFIX_LETTERS: usize = 6;
const MAX_SEPARATORS: usize = 3;

/// Which side of a treasure card a file shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Face {
    /// Odd card numbers.
    Front,
    /// Even card numbers.
    Back,
}

impl Face {
    /// Face implied by a card number's parity.
    pub fn of(card: u32) -> Self {
        if card % 2 == 1 { Face::Front } else { Face::Back }
    }

    /// `Front` or `Back`.
    pub fn name(self) -> &'static str {
        match self {
            Face::Front => "Front",
            Face::Back => "Back",
        }
    }

    /// The other side of the same card.
    pub fn opposite(self) -> Self {
        match self {
            Face::Front => Face::Back,
            Face::Back => Face::Front,
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `true` for numbers that belong to an item (21..=220).
pub fn is_treasure_card(card: u32) -> bool {
    (FIRST_TREASURE_CARD..=MAX_CARD).contains(&card)
}

/// `true` for item numbers 1..=100.
pub fn is_valid_item(item: u32) -> bool {
    (1..=MAX_ITEM).contains(&item)
}

/// Card number of an item's front face.
pub fn front_card_for_item(item: u32) -> Option<u32> {
    is_valid_item(item).then(|| FIRST_TREASURE_CARD + (item - 1) * 2)
}

/// Card number of an item's back face.
pub fn back_card_for_item(item: u32) -> Option<u32> {
    front_card_for_item(item).map(|front| front + 1)
}

/// Card number showing `face` of `item`.
pub fn card_for_item(item: u32, face: Face) -> Option<u32> {
    match face {
        Face::Front => front_card_for_item(item),
        Face::Back => back_card_for_item(item),
    }
}

/// Item a treasure card belongs to. Both faces map to the same item.
pub fn item_for_card(card: u32) -> Option<u32> {
    is_treasure_card(card).then(|| (card - FIRST_TREASURE_CARD) / 2 + 1)
}

/// Split `name` into stem and extension when the extension is a card image one.
pub fn split_card_file_name(name: &str) -> Option<(&str, &str)> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    CARD_EXTENSIONS
        .iter()
        .any(|known| ext.eq_ignore_ascii_case(known))
        .then_some((stem, ext))
}

/// Parse the card number encoded at the end of a file name.
///
/// The strict pass wants digits right before the extension (`deck_219.jpg`). The
/// relaxed pass accepts a short alphabetic suffix after the digits
/// (`deck_219_front.jpg`, `deck219b.JPEG`) but never reaches past it, so numbers
/// elsewhere in the name are ignored.
pub fn extract_card_number(file_name: &str) -> Option<u32> {
    let (stem, _) = split_card_file_name(file_name)?;
    strict_trailing_number(stem).or_else(|| relaxed_trailing_number(stem))
}

fn strict_trailing_number(stem: &str) -> Option<u32> {
    let digits = trailing_run(stem, |c| c.is_ascii_digit());
    if digits.is_empty() {
        return None;
    }
    Some(saturating_digits(digits))
}

/// Value of an ASCII digit run, saturating at `u32::MAX` so that huge numbers
/// still count as numbers (out of range) rather than as no number at all.
pub fn saturating_digits(digits: &str) -> u32 {
    digits
        .bytes()
        .filter(u8::is_ascii_digit)
        .fold(0u32, |acc, d| {
            acc.saturating_mul(10).saturating_add(u32::from(d - b'0'))
        })
}

fn relaxed_trailing_number(stem: &str) -> Option<u32> {
    let rest = trim_separators(stem)?;
    let letters = trailing_run(rest, |c| c.is_ascii_alphabetic());
    if letters.is_empty() || letters.len() > MAX_SUFFIX_LETTERS {
        return None;
    }
    let rest = trim_separators(&rest[..rest.len() - letters.len()])?;
    strict_trailing_number(rest)
}

fn trim_separators(s: &str) -> Option<&str> {
    let seps = trailing_run(s, is_separator);
    (seps.len() <= MAX_SEPARATORS).then(|| &s[..s.len() - seps.len()])
}

fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '_' | '-' | '.')
}

fn trailing_run(s: &str, pred: impl Fn(char) -> bool) -> &str {
    let start = s
        .char_indices()
        .rev()
        .take_while(|&(_, c)| pred(c))
        .last()
        .map_or(s.len(), |(i, _)| i);
    &s[start..]
}

/// Stem with any trailing number and separators removed, case preserved.
///
/// Two files of one deck share this key, e.g. `Treasure 2.jpg` and `Treasure.jpg`.
pub fn series_key(file_name: &str) -> Option<&str> {
    let (stem, _) = split_card_file_name(file_name)?;
    let digits = trailing_run(stem, |c| c.is_ascii_digit());
    let base = &stem[..stem.len() - digits.len()];
    let seps = trailing_run(base, is_separator);
    let base = &base[..base.len() - seps.len()];
    (!base.is_empty()).then_some(base)
}

#[cfg(test)]
#[path = "../../tests/unit/cards/number.rs"]
mod tests;
