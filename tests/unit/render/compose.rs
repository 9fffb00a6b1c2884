use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use image::Rgba;

use super::*;
use crate::{
    cards::CardFile,
    foundation::core::{PxRect, PxSize},
    render::layout::{LabelStyle, ShadowStyle},
};

const BACK1: [u8; 4] = [200, 0, 0, 255];
const BACK2: [u8; 4] = [0, 200, 0, 255];
const BACK3: [u8; 4] = [0, 0, 200, 255];
const FRONT: [u8; 4] = [220, 220, 0, 255];
const CROP: [u8; 4] = [0, 180, 180, 255];

fn tiny_spec() -> LayoutSpec {
    LayoutSpec {
        card: PxSize::new(20, 28),
        back2_offset: PxPoint::new(0, 10),
        back3_offset: PxPoint::new(-6, 4),
        front_offset: PxPoint::new(0, 4),
        crop: PxRect::new(2, 2, 12, 10),
        outer_margin: 4,
        right_gap: 3,
        shadow: ShadowStyle {
            offset: PxPoint::new(2, 2),
            blur: 1,
            alpha: 90,
        },
        card_corner_radius: 3,
        matte_pad: 2,
        matte_corner_radius: 2,
        ..LayoutSpec::STANDARD
    }
}

fn fixture_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("compose_unit").join(name);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_card(dir: &Path, number: u32, size: (u32, u32), px: [u8; 4]) -> CardFile {
    let path = dir.join(format!("card_{number}.png"));
    image::RgbaImage::from_pixel(size.0, size.1, Rgba(px))
        .save(&path)
        .unwrap();
    CardFile { number, path }
}

fn selection(dir: &Path, card: (u32, u32)) -> Selection {
    Selection {
        back1: write_card(dir, 22, card, BACK1),
        back2: write_card(dir, 24, card, BACK2),
        back3: write_card(dir, 26, card, BACK3),
        crop_back: write_card(dir, 28, card, CROP),
        front: write_card(dir, 21, card, FRONT),
    }
}

#[test]
fn canvas_has_planned_size_and_paints_in_z_order() {
    let spec = tiny_spec();
    let sel = selection(&fixture_dir("z_order"), (20, 28));
    let out = Compositor::new(spec).compose(&sel, &ComposeOpts::default()).unwrap();

    let plan = spec.plan();
    assert_eq!(out.dimensions(), (plan.canvas.width, plan.canvas.height));
    assert_eq!(out.dimensions(), (47, 46));

    let bg = spec.background;
    assert_eq!(out.get_pixel(1, 1).0, [bg.r, bg.g, bg.b, 255]);
    // Front covers back #1 and back #3 where they overlap.
    assert_eq!(out.get_pixel(20, 20).0, FRONT);
    // Back #2 shows below the front.
    assert_eq!(out.get_pixel(20, 41).0, BACK2);
    // Back #3 shows left of the front.
    assert_eq!(out.get_pixel(5, 20).0, BACK3);
    // Back #1 shows above the front.
    assert_eq!(out.get_pixel(20, 5).0, BACK1);
}

#[test]
fn panel_sits_on_matte_right_of_cluster() {
    let spec = tiny_spec();
    let sel = selection(&fixture_dir("panel"), (20, 28));
    let out = Compositor::new(spec).compose(&sel, &ComposeOpts::default()).unwrap();

    let plan = spec.plan();
    let m = spec.matte_color;
    assert_eq!(
        out.get_pixel(plan.matte.left as u32, plan.matte.top as u32).0,
        [m.r, m.g, m.b, 255]
    );
    assert_eq!(
        out.get_pixel(plan.crop_origin.x as u32, plan.crop_origin.y as u32).0,
        CROP
    );
    let last = plan.crop_origin.offset(9, 7);
    assert_eq!(out.get_pixel(last.x as u32, last.y as u32).0, CROP);
}

#[test]
fn shadows_darken_background_next_to_cards() {
    let spec = tiny_spec();
    let sel = selection(&fixture_dir("shadow"), (20, 28));
    let out = Compositor::new(spec).compose(&sel, &ComposeOpts::default()).unwrap();

    let bg = spec.background;
    let px = out.get_pixel(31, 20).0;
    assert_eq!(px[3], 255);
    assert!(px[1] < bg.g, "expected shadow, got {px:?}");
}

#[test]
fn identical_inputs_render_identical_pixels() {
    let spec = tiny_spec();
    let sel = selection(&fixture_dir("determinism"), (20, 28));
    let compositor = Compositor::new(spec);
    let a = compositor.compose(&sel, &ComposeOpts::default()).unwrap();
    let b = compositor.compose(&sel, &ComposeOpts::default()).unwrap();
    assert_eq!(a.as_raw(), b.as_raw());
}

#[test]
fn odd_sized_scans_are_resampled_to_reference() {
    let spec = tiny_spec();
    let sel = selection(&fixture_dir("resample"), (10, 14));
    let out = Compositor::new(spec).compose(&sel, &ComposeOpts::default()).unwrap();
    let plan = spec.plan();
    assert_eq!(out.dimensions(), (plan.canvas.width, plan.canvas.height));
    assert_eq!(out.get_pixel(20, 20).0, FRONT);
}

#[test]
fn unreadable_card_fails_without_canvas() {
    let spec = tiny_spec();
    let dir = fixture_dir("broken");
    let mut sel = selection(&dir, (20, 28));
    let broken = dir.join("card_30.png");
    std::fs::write(&broken, b"not an image").unwrap();
    sel.crop_back = CardFile {
        number: 30,
        path: broken.clone(),
    };

    let err = Compositor::new(spec)
        .compose(&sel, &ComposeOpts::default())
        .unwrap_err();
    match err {
        TreasureError::ImageLoad { path, .. } => assert_eq!(path, broken),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn crop_box_outside_card_is_rejected() {
    let spec = LayoutSpec {
        crop: PxRect::new(15, 0, 25, 5),
        ..tiny_spec()
    };
    let sel = selection(&fixture_dir("bad_crop"), (20, 28));
    assert!(matches!(
        Compositor::new(spec).compose(&sel, &ComposeOpts::default()),
        Err(TreasureError::Render(_))
    ));
}

#[test]
fn label_without_fonts_is_skipped() {
    let spec = tiny_spec();
    let sel = selection(&fixture_dir("label_skip"), (20, 28));
    let empty = LabelRenderer::from_fontdb(Arc::new(usvg::fontdb::Database::new()));
    let compositor = Compositor::with_label_renderer(spec, empty);

    let plain = compositor.compose(&sel, &ComposeOpts::default()).unwrap();
    let labeled = compositor
        .compose(&sel, &ComposeOpts::labeled(&sel))
        .unwrap();
    assert_eq!(plain.as_raw(), labeled.as_raw());
}

#[test]
fn label_sits_in_front_card_lower_right_corner() {
    let spec = LayoutSpec {
        card: PxSize::new(120, 90),
        label: LabelStyle {
            font_size: 14,
            pad_x: 4,
            pad_y: 3,
            inset: 6,
            corner_radius: 3,
            ..LayoutSpec::STANDARD.label
        },
        ..tiny_spec()
    };
    let renderer = LabelRenderer::with_system_fonts();
    if !renderer.has_fonts() {
        return;
    }
    let sel = selection(&fixture_dir("label_corner"), (120, 90));
    let label = CardLabel::for_card(&sel.front);
    let Some(badge) = renderer.render(&label.text(), &spec.label).unwrap() else {
        return;
    };

    let compositor = Compositor::with_label_renderer(spec, renderer);
    let plain = compositor.compose(&sel, &ComposeOpts::default()).unwrap();
    let labeled = compositor
        .compose(&sel, &ComposeOpts::labeled(&sel))
        .unwrap();

    let (mut min_x, mut min_y, mut max_x, mut max_y) = (u32::MAX, u32::MAX, 0, 0);
    for (x, y, px) in labeled.enumerate_pixels() {
        if px != plain.get_pixel(x, y) {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }
    assert!(min_x <= max_x, "label left no trace");

    let front = spec.plan().front;
    let inset = spec.label.inset as i32;
    let right = front.x + spec.card.width as i32 - inset;
    let bottom = front.y + spec.card.height as i32 - inset;
    let left = right - badge.size().width as i32;
    let top = bottom - badge.size().height as i32;

    assert!(min_x as i32 >= left && min_y as i32 >= top);
    assert!(max_x as i32 + 1 <= right && max_y as i32 + 1 <= bottom);
    assert!(max_x as i32 + 1 >= right - 1 && max_y as i32 + 1 >= bottom - 1);
    assert!(left >= front.x && top >= front.y);
}
