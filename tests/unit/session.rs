use std::path::{Path, PathBuf};

use image::Rgb;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::*;
use crate::{
    foundation::core::{PxPoint, PxRect, PxSize},
    render::layout::{LayoutSpec, ShadowStyle},
};

fn small_spec() -> LayoutSpec {
    LayoutSpec {
        card: PxSize::new(16, 22),
        back2_offset: PxPoint::new(0, 8),
        back3_offset: PxPoint::new(-5, 3),
        front_offset: PxPoint::new(0, 3),
        crop: PxRect::new(2, 2, 10, 8),
        outer_margin: 3,
        right_gap: 3,
        shadow: ShadowStyle {
            offset: PxPoint::new(1, 1),
            blur: 1,
            alpha: 90,
        },
        card_corner_radius: 2,
        matte_pad: 2,
        matte_corner_radius: 2,
        ..LayoutSpec::STANDARD
    }
}

fn deck_dir(name: &str, numbers: &[u32]) -> PathBuf {
    let dir = PathBuf::from("target").join("session_unit").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    for &n in numbers {
        let shade = (n % 200) as u8 + 30;
        image::RgbImage::from_pixel(8, 11, Rgb([shade, 40, 90]))
            .save(dir.join(format!("treasure_{n}.jpg")))
            .unwrap();
    }
    dir
}

fn session(dir: &Path) -> TreasureSession {
    TreasureSession::with_compositor(dir, Compositor::new(small_spec()))
}

#[test]
fn open_scans_deck_and_index() {
    let dir = deck_dir("open", &[1, 2, 21, 22, 24, 26, 28]);
    let s = session(&dir);
    assert_eq!(s.folder(), dir.as_path());
    assert_eq!(
        s.summary(),
        DeckSummary {
            fronts: 1,
            backs: 4,
            drawable: true
        }
    );
    assert_eq!(s.index().len(), 7);
    assert!(s.last().is_none());
}

#[test]
fn random_draw_records_last_render() {
    let dir = deck_dir("random", &[21, 22, 24, 26, 28]);
    let mut s = session(&dir);
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let plan = small_spec().plan();

    let rendered = s.draw_random(&mut rng, DrawOpts::default()).unwrap();
    assert_eq!(rendered.selection.front.number, 21);
    assert_eq!(
        rendered.canvas.dimensions(),
        (plan.canvas.width, plan.canvas.height)
    );
    assert!(s.last().is_some());
}

#[test]
fn failed_draw_keeps_previous_render() {
    let dir = deck_dir("keep_last", &[1, 2, 21, 22, 24, 26, 28]);
    let mut s = session(&dir);
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let first = s
        .draw_random(&mut rng, DrawOpts::default())
        .unwrap()
        .selection
        .clone();

    // Item 50 has neither card 119 nor 120 on disk.
    let request = ItemRequest {
        back1: 1,
        back2: 2,
        back3: 3,
        crop_back: 4,
        front: 50,
    };
    let err = s.draw_items(request, DrawOpts::default()).unwrap_err();
    assert!(matches!(err, TreasureError::MissingCard(_)));
    assert_eq!(s.last().map(|r| &r.selection), Some(&first));
}

#[test]
fn item_draw_uses_browse_index() {
    let dir = deck_dir("items", &[21, 22, 23, 24, 26, 28]);
    let mut s = session(&dir);
    let request = ItemRequest {
        back1: 1,
        back2: 2,
        back3: 3,
        crop_back: 4,
        front: 2,
    };
    let rendered = s.draw_items(request, DrawOpts::default()).unwrap();
    assert_eq!(rendered.selection.back1.number, 22);
    assert_eq!(rendered.selection.back2.number, 24);
    assert_eq!(rendered.selection.back3.number, 26);
    assert_eq!(rendered.selection.crop_back.number, 28);
    assert_eq!(rendered.selection.front.number, 23);
}

#[test]
fn undrawable_folder_is_rejected_and_state_kept() {
    let good = deck_dir("change_good", &[21, 22, 24, 26, 28]);
    let bad = deck_dir("change_bad", &[21, 22, 24, 26]);
    let mut s = session(&good);

    let err = s.change_folder(&bad).unwrap_err();
    assert!(matches!(
        err,
        TreasureError::InsufficientCards {
            backs: 3,
            fronts: 1
        }
    ));
    assert_eq!(s.folder(), good.as_path());
    assert!(s.deck().is_drawable());
}

#[test]
fn drawable_folder_is_adopted() {
    let first = deck_dir("adopt_first", &[21, 22, 24, 26, 28]);
    let second = deck_dir("adopt_second", &[31, 33, 40, 42, 44, 46, 48]);
    let mut s = session(&first);

    let summary = s.change_folder(&second).unwrap();
    assert_eq!(summary.fronts, 2);
    assert_eq!(summary.backs, 5);
    assert_eq!(s.folder(), second.as_path());
    assert!(s.index().get(40).is_some());
    assert!(s.index().get(21).is_none());
}

#[test]
fn rescan_picks_up_new_files() {
    let dir = deck_dir("rescan", &[21, 22, 24, 26]);
    let mut s = session(&dir);
    assert!(!s.summary().drawable);

    image::RgbImage::from_pixel(8, 11, Rgb([1, 2, 3]))
        .save(dir.join("treasure_28.jpg"))
        .unwrap();
    let summary = s.rescan();
    assert!(summary.drawable);
    assert_eq!(summary.backs, 4);
}
