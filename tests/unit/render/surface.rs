use super::*;

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    assert_eq!(over(dst, [255, 255, 255, 0]), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    assert_eq!(over([0, 0, 0, 255], [255, 0, 0, 255]), [255, 0, 0, 255]);
}

#[test]
fn over_half_black_darkens_opaque_dst() {
    let out = over([200, 100, 50, 255], [0, 0, 0, 128]);
    assert_eq!(out[3], 255);
    assert_eq!(out[0], 100);
    assert_eq!(out[1], 50);
    assert_eq!(out[2], 25);
}

#[test]
fn filled_surface_round_trips_opaque_color() {
    let color = Rgba8::opaque(16, 59, 44);
    let s = Surface::filled(PxSize::new(3, 2), color).unwrap();
    let img = s.into_rgba_image().unwrap();
    assert_eq!(img.dimensions(), (3, 2));
    assert!(img.pixels().all(|p| p.0 == [16, 59, 44, 255]));
}

#[test]
fn empty_surface_is_rejected() {
    assert!(Surface::new(PxSize::new(0, 10)).is_err());
}

#[test]
fn draw_over_clips_at_every_edge() {
    let mut dst = Surface::filled(PxSize::new(4, 4), Rgba8::opaque(0, 0, 0)).unwrap();
    let src = Surface::filled(PxSize::new(3, 3), Rgba8::opaque(255, 255, 255)).unwrap();

    dst.draw_over(&src, PxPoint::new(-2, -2));
    assert_eq!(dst.pixel(0, 0), Some([255, 255, 255, 255]));
    assert_eq!(dst.pixel(1, 0), Some([0, 0, 0, 255]));

    dst.draw_over(&src, PxPoint::new(3, 3));
    assert_eq!(dst.pixel(3, 3), Some([255, 255, 255, 255]));
    assert_eq!(dst.pixel(2, 3), Some([0, 0, 0, 255]));

    // Entirely outside: nothing happens.
    let before = dst.clone();
    dst.draw_over(&src, PxPoint::new(10, 0));
    dst.draw_over(&src, PxPoint::new(0, -3));
    assert_eq!(dst, before);
}

#[test]
fn draw_mask_scales_color_by_coverage() {
    let mut dst = Surface::filled(PxSize::new(2, 1), Rgba8::opaque(255, 255, 255)).unwrap();
    let mask = AlphaMask {
        size: PxSize::new(2, 1),
        data: vec![0, 255],
    };
    let black_half = Rgba8 {
        r: 0,
        g: 0,
        b: 0,
        a: 128,
    };
    dst.draw_mask(&mask, PxPoint::new(0, 0), black_half);
    assert_eq!(dst.pixel(0, 0), Some([255, 255, 255, 255]));
    assert_eq!(dst.pixel(1, 0), Some([127, 127, 127, 255]));
}

#[test]
fn fill_rect_covers_only_its_area() {
    let mut dst = Surface::new(PxSize::new(4, 4)).unwrap();
    dst.fill_rect(PxRect::new(1, 1, 3, 2), Rgba8::opaque(9, 8, 7));
    assert_eq!(dst.pixel(1, 1), Some([9, 8, 7, 255]));
    assert_eq!(dst.pixel(2, 1), Some([9, 8, 7, 255]));
    assert_eq!(dst.pixel(1, 2), Some([0, 0, 0, 0]));
    assert_eq!(dst.pixel(3, 1), Some([0, 0, 0, 0]));
}

#[test]
fn premultiply_then_unpremultiply_is_close() {
    let mut img = RgbaImage::new(1, 1);
    img.put_pixel(0, 0, image::Rgba([200, 100, 50, 128]));
    let back = Surface::from_rgba_image(&img).into_rgba_image().unwrap();
    let p = back.get_pixel(0, 0).0;
    assert_eq!(p[3], 128);
    for (a, b) in p[..3].iter().zip([200u8, 100, 50]) {
        assert!((i16::from(*a) - i16::from(b)).abs() <= 1);
    }
}
