use super::*;
use crate::assets::font::OverlayFace;
use crate::render::raster::render_raster;
use crate::render::svg::render_svg;
use crate::style::config::{StyleConfig, StyleLimits};

fn style(bg: &str, size: i64, padding: i64, radius: i64) -> Style {
    StyleConfig {
        foreground: "#1a2b3c".to_owned(),
        background: bg.to_owned(),
        size,
        padding,
        border_radius: radius,
        overlay_text: None,
    }
    .validate(&StyleLimits::default())
    .unwrap()
}

fn both(matrix: &ModuleMatrix, style: &Style) -> (Geometry, RgbaImage, RgbaImage) {
    let geom = Geometry::resolve(matrix, style);
    let svg = render_svg(matrix, style, &geom).unwrap();
    let vector = rasterize_svg(&svg).unwrap();
    let raster = render_raster(matrix, style, &geom, &OverlayFace::Bitmap, 12).unwrap();
    (geom, vector, raster)
}

#[test]
fn rasterized_svg_has_module_colors() {
    let matrix = ModuleMatrix::from_fn(5, |x, y| (x + y) % 2 == 0).unwrap();
    let style = style("#ffffff", 100, 10, 0);
    let (_, vector, _) = both(&matrix, &style);

    assert_eq!(vector.dimensions(), (120, 120));
    assert_eq!(vector.get_pixel(15, 15).0, [0x1a, 0x2b, 0x3c, 255]);
    assert_eq!(vector.get_pixel(35, 15).0, [255, 255, 255, 255]);
    assert_eq!(vector.get_pixel(2, 2).0, [255, 255, 255, 255]);
}

#[test]
fn checkerboard_renderings_agree() {
    let matrix = ModuleMatrix::from_fn(5, |x, y| (x + y) % 2 == 0).unwrap();
    let style = style("#ffffff", 100, 10, 0);
    let (geom, vector, raster) = both(&matrix, &style);

    let report = module_parity(&matrix, &style, &geom, &vector, &raster).unwrap();
    assert_eq!(report.checked, 25);
    assert_eq!(report.masked, 0);
    assert!(report.is_consistent(), "{report:?}");
}

#[test]
fn fractional_modules_agree_on_transparent_background() {
    let matrix = ModuleMatrix::from_fn(21, |x, y| (x * 7 + y * 3) % 5 < 2).unwrap();
    let style = style("transparent", 100, 3, 0);
    let (geom, vector, raster) = both(&matrix, &style);

    let report = module_parity(&matrix, &style, &geom, &vector, &raster).unwrap();
    assert_eq!(report.checked, 21 * 21);
    assert!(report.is_consistent(), "{report:?}");
}

#[test]
fn masked_corners_are_skipped() {
    let matrix = ModuleMatrix::from_fn(5, |_, _| true).unwrap();
    let style = style("#ffffff", 100, 0, 50);
    let (geom, vector, raster) = both(&matrix, &style);

    let report = module_parity(&matrix, &style, &geom, &vector, &raster).unwrap();
    assert!(report.masked >= 4);
    assert_eq!(report.checked + report.masked, 25);
    assert!(report.is_consistent(), "{report:?}");
}

#[test]
fn flipped_module_is_reported() {
    let matrix = ModuleMatrix::from_fn(5, |x, y| (x + y) % 2 == 0).unwrap();
    let style = style("#ffffff", 100, 10, 0);
    let (geom, vector, mut raster) = both(&matrix, &style);

    // Module (1, 0) is light; paint its center dark in the raster only.
    raster.put_pixel(40, 20, image::Rgba([0x1a, 0x2b, 0x3c, 255]));
    let report = module_parity(&matrix, &style, &geom, &vector, &raster).unwrap();
    assert_eq!(report.mismatched, vec![(1, 0)]);
}

#[test]
fn tiny_modules_are_rejected() {
    let matrix = ModuleMatrix::from_fn(41, |_, _| false).unwrap();
    let style = style("#ffffff", 64, 0, 0);
    let geom = Geometry::resolve(&matrix, &style);
    let img = RgbaImage::new(geom.canvas, geom.canvas);
    let err = module_parity(&matrix, &style, &geom, &img, &img).unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn invalid_svg_is_a_render_error() {
    let err = rasterize_svg("<svg").unwrap_err();
    assert!(matches!(err, QrError::Render(_)));
}
