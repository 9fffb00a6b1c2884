use std::path::PathBuf;

use super::*;

fn pairs(names: &[&str]) -> Vec<(String, PathBuf)> {
    names
        .iter()
        .map(|n| (n.to_string(), PathBuf::from("deck").join(n)))
        .collect()
}

#[test]
fn deck_splits_fronts_and_backs_in_range() {
    let scan = FolderScan::classify(pairs(&[
        "t_20.jpg", "t_21.jpg", "t_22.jpg", "t_23.jpg", "t_220.jpg", "t_221.jpg", "t_1.jpg",
    ]));
    let deck = scan.deck();
    let fronts: Vec<u32> = deck.fronts.iter().map(|c| c.number).collect();
    let backs: Vec<u32> = deck.backs.iter().map(|c| c.number).collect();
    assert_eq!(fronts, vec![21, 23]);
    assert_eq!(backs, vec![22, 220]);
    assert!(deck.fronts.iter().all(|c| c.face() == Face::Front));
}

#[test]
fn browse_index_keeps_low_numbers_without_parity_filter() {
    let index =
        FolderScan::classify(pairs(&["t_1.jpg", "t_2.jpg", "t_21.jpg", "t_300.jpg"])).index();
    let numbers: Vec<u32> = index.iter().map(|c| c.number).collect();
    assert_eq!(numbers, vec![1, 2, 21]);
    assert!(!index.first_was_inferred());
}

#[test]
fn collisions_keep_case_insensitive_first_name() {
    let names = ["b_card_40.jpg", "A_card_40.jpg", "c_card_40.jpeg"];
    for order in [[0, 1, 2], [2, 1, 0], [1, 2, 0]] {
        let shuffled: Vec<&str> = order.iter().map(|&i| names[i]).collect();
        let index = FolderScan::classify(pairs(&shuffled)).index();
        let expected = PathBuf::from("deck").join("A_card_40.jpg");
        assert_eq!(index.get(40), Some(expected.as_path()));
    }
}

#[test]
fn unnumbered_file_becomes_card_one_when_stem_matches_card_two() {
    let index =
        FolderScan::classify(pairs(&["Treasure.jpg", "Treasure 2.jpg", "Other.jpg"])).index();
    assert!(index.first_was_inferred());
    let expected = PathBuf::from("deck").join("Treasure.jpg");
    assert_eq!(index.get(1), Some(expected.as_path()));
}

#[test]
fn card_one_stays_absent_without_matching_unnumbered_file() {
    let index = FolderScan::classify(pairs(&["Cover.jpg", "Treasure 2.jpg"])).index();
    assert!(index.get(1).is_none());
    assert!(!index.first_was_inferred());

    let index = FolderScan::classify(pairs(&["Treasure.jpg", "Treasure 3.jpg"])).index();
    assert!(index.get(1).is_none());
}

#[test]
fn card_one_match_is_case_sensitive() {
    let index = FolderScan::classify(pairs(&["treasure.jpg", "TREASURE 2.jpg"])).index();
    assert!(index.get(1).is_none());
    assert!(!index.first_was_inferred());
}

#[test]
fn oversized_number_is_out_of_range_not_unnumbered() {
    let index =
        FolderScan::classify(pairs(&["Treasure 99999999999.jpg", "Treasure 2.jpg"])).index();
    assert!(index.get(1).is_none());
    assert!(!index.first_was_inferred());
    assert_eq!(index.len(), 1);
}

#[test]
fn empty_scan_is_not_drawable() {
    let deck = FolderScan::default().deck();
    assert!(deck.fronts.is_empty() && deck.backs.is_empty());
    assert_eq!(
        deck.summary(),
        DeckSummary {
            fronts: 0,
            backs: 0,
            drawable: false
        }
    );
}

#[test]
fn minimal_deck_is_drawable() {
    let deck = FolderScan::classify(pairs(&[
        "c21.jpg", "c22.jpg", "c24.jpg", "c26.jpg", "c28.jpg",
    ]))
    .deck();
    assert!(deck.is_drawable());
}
