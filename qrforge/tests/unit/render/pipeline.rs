use super::*;
use crate::assets::font::FontFile;

fn matrix() -> ModuleMatrix {
    ModuleMatrix::from_fn(7, |x, y| (x * y + x) % 3 == 0).unwrap()
}

fn config() -> StyleConfig {
    StyleConfig {
        size: 70,
        padding: 5,
        border_radius: 10,
        overlay_text: Some("OK".to_owned()),
        ..StyleConfig::default()
    }
}

#[test]
fn renderer_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Renderer>();
    assert_send_sync::<RenderOpts>();
}

#[test]
fn default_opts_use_embedded_font() {
    let opts = RenderOpts::default();
    assert_eq!(opts.min_font_px, 12);
    assert!(opts.threads.is_none());
    let r = Renderer::new(opts).unwrap();
    assert!(matches!(r.face, OverlayFace::Bitmap));
}

#[test]
fn zero_min_font_and_zero_threads_are_rejected() {
    let err = Renderer::new(RenderOpts::default().with_min_font_px(0)).unwrap_err();
    assert!(err.is_validation());
    let err = Renderer::new(RenderOpts::default().with_threads(0)).unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn garbage_font_bytes_fail_at_construction() {
    let opts = RenderOpts::default().with_font(FontFile::from_bytes(b"not a font".to_vec()));
    let err = Renderer::new(opts).unwrap_err();
    assert!(matches!(err, QrError::Render(_)));
}

#[test]
fn render_produces_matching_svg_and_png() {
    let r = Renderer::new(RenderOpts::default()).unwrap();
    let out = r.render(&matrix(), &config()).unwrap();

    assert_eq!(out.canvas, 80);
    assert!(out.svg_text.starts_with("<svg "));
    assert!(out.svg_text.contains(r#"width="80""#));
    let png = image::load_from_memory(&out.png_bytes).unwrap().to_rgba8();
    assert_eq!(png.dimensions(), (80, 80));

    let style = r.validate(&config()).unwrap();
    assert_eq!(png, r.render_image(&matrix(), &style).unwrap());
    assert_eq!(out, r.render_style(&matrix(), &style).unwrap());
}

#[test]
fn invalid_config_fails_before_rendering() {
    let r = Renderer::new(RenderOpts::default()).unwrap();
    let bad = StyleConfig {
        padding: -1,
        ..config()
    };
    assert!(r.render(&matrix(), &bad).unwrap_err().is_validation());
    assert!(r.preview(&matrix(), &bad).unwrap_err().is_validation());
}

#[test]
fn custom_limits_apply() {
    let r = Renderer::new(
        RenderOpts::default().with_limits(StyleLimits::default().with_size_range(8, 32)),
    )
    .unwrap();
    assert!(r.render(&matrix(), &config()).unwrap_err().is_validation());
    let small = StyleConfig {
        size: 14,
        padding: 0,
        border_radius: 0,
        overlay_text: None,
        ..StyleConfig::default()
    };
    assert_eq!(r.render(&matrix(), &small).unwrap().canvas, 14);
}

#[test]
fn render_many_matches_sequential_renders_in_order() {
    let r = Renderer::new(RenderOpts::default().with_threads(2)).unwrap();
    let jobs: Vec<_> = (0..6)
        .map(|i| {
            let cfg = StyleConfig {
                size: 64 + i * 8,
                foreground: format!("#0{i}0{i}0{i}"),
                ..config()
            };
            (matrix(), cfg)
        })
        .chain(std::iter::once((
            matrix(),
            StyleConfig {
                foreground: "#12".to_owned(),
                ..config()
            },
        )))
        .collect();

    let out = r.render_many(&jobs);
    assert_eq!(out.len(), jobs.len());
    for ((m, cfg), got) in jobs.iter().zip(&out) {
        match r.render(m, cfg) {
            Ok(want) => assert_eq!(got.as_ref().unwrap(), &want),
            Err(_) => assert!(got.as_ref().unwrap_err().is_validation()),
        }
    }
}

#[test]
fn parity_ignores_the_overlay_label() {
    let r = Renderer::new(RenderOpts::default()).unwrap();
    let cfg = StyleConfig {
        size: 140,
        ..config()
    };
    let report = r.check_parity(&matrix(), &cfg).unwrap();
    assert_eq!(report.checked + report.masked, 49);
    assert!(report.is_consistent(), "{report:?}");
}
