use super::*;
use crate::style::config::{StyleConfig, StyleLimits};

fn style(fg: &str, bg: &str, size: i64, padding: i64, radius: i64, text: Option<&str>) -> Style {
    StyleConfig {
        foreground: fg.to_owned(),
        background: bg.to_owned(),
        size,
        padding,
        border_radius: radius,
        overlay_text: text.map(str::to_owned),
    }
    .validate(&StyleLimits::default())
    .unwrap()
}

fn render(matrix: &ModuleMatrix, style: &Style) -> RgbaImage {
    let geom = Geometry::resolve(matrix, style);
    render_raster(matrix, style, &geom, &OverlayFace::Bitmap, 12).unwrap()
}

#[test]
fn checkerboard_cells_take_module_colors() {
    let matrix = ModuleMatrix::from_fn(5, |x, y| (x + y) % 2 == 0).unwrap();
    let img = render(&matrix, &style("#102030", "#f0f0f0", 100, 10, 0, None));

    assert_eq!(img.dimensions(), (120, 120));
    assert_eq!(img.get_pixel(0, 0).0, [0xf0, 0xf0, 0xf0, 255]);
    assert_eq!(img.get_pixel(10, 10).0, [0x10, 0x20, 0x30, 255]);
    assert_eq!(img.get_pixel(29, 29).0, [0x10, 0x20, 0x30, 255]);
    assert_eq!(img.get_pixel(30, 10).0, [0xf0, 0xf0, 0xf0, 255]);
    assert_eq!(img.get_pixel(30, 30).0, [0x10, 0x20, 0x30, 255]);
    assert_eq!(img.get_pixel(110, 110).0, [0xf0, 0xf0, 0xf0, 255]);
}

#[test]
fn fractional_modules_tile_the_module_area_exactly() {
    let matrix = ModuleMatrix::from_fn(21, |_, _| true).unwrap();
    let img = render(&matrix, &style("#000000", "#ffffff", 100, 7, 0, None));

    for (x, y, px) in img.enumerate_pixels() {
        let inside = (7..107).contains(&x) && (7..107).contains(&y);
        let expect = if inside { [0, 0, 0, 255] } else { [255, 255, 255, 255] };
        assert_eq!(px.0, expect, "pixel ({x}, {y})");
    }
}

#[test]
fn rounded_corners_are_fully_transparent() {
    let matrix = ModuleMatrix::from_fn(5, |_, _| true).unwrap();
    let img = render(&matrix, &style("#000000", "#ffffff", 100, 0, 30, None));

    for (x, y) in [(0, 0), (99, 0), (0, 99), (99, 99)] {
        assert_eq!(img.get_pixel(x, y).0, [0, 0, 0, 0]);
    }
    assert_eq!(img.get_pixel(50, 50).0, [0, 0, 0, 255]);
}

#[test]
fn transparent_background_leaves_light_modules_clear() {
    let matrix = ModuleMatrix::from_fn(4, |x, _| x == 0).unwrap();
    let img = render(&matrix, &style("#000000", "transparent", 100, 0, 0, None));

    assert_eq!(img.get_pixel(10, 10).0, [0, 0, 0, 255]);
    assert_eq!(img.get_pixel(60, 10).0[3], 0);
}

#[test]
fn overlay_on_white_foreground_is_black() {
    let matrix = ModuleMatrix::from_fn(3, |_, _| false).unwrap();
    let img = render(&matrix, &style("#ffffff", "#336699", 96, 0, 0, Some("I")));

    // Font size 16, scale 2: the 'I' stem crosses the center.
    assert_eq!(img.get_pixel(47, 47).0, [0, 0, 0, 255]);
    assert_eq!(img.get_pixel(5, 5).0, [0x33, 0x66, 0x99, 255]);
}

#[test]
fn overlay_never_reaches_masked_corners() {
    let matrix = ModuleMatrix::from_fn(3, |_, _| false).unwrap();
    let img = render(&matrix, &style("#ff0000", "#ffffff", 64, 0, 32, Some("WWWW")));

    assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 0]);
    assert_eq!(img.get_pixel(63, 63).0, [0, 0, 0, 0]);
    assert!(img.pixels().any(|p| p.0 == [255, 0, 0, 255]));
}

#[test]
fn mismatched_geometry_is_a_render_error() {
    let matrix = ModuleMatrix::from_fn(5, |_, _| true).unwrap();
    let style = style("#000000", "#ffffff", 100, 0, 0, None);
    let geom = Geometry::from_parts(7, 100, 0, 0);
    let err = render_raster(&matrix, &style, &geom, &OverlayFace::Bitmap, 12).unwrap_err();
    assert!(matches!(err, QrError::Render(_)));
}
