// Watermark pattern rendering unit tests
// End-to-end checks through the public API with the CPU pixmap surface

use rstest::rstest;

use sukashi::watermark::{
    discover_system_font, parse_hex_color, render_pattern, Color, PixmapSurface, RenderMode,
    WatermarkError, WatermarkSettings,
};

fn settings(width: u32, height: u32) -> WatermarkSettings {
    WatermarkSettings {
        text: String::new(),
        canvas_width: width,
        canvas_height: height,
        ..Default::default()
    }
}

fn decode(bytes: &[u8]) -> image::RgbaImage {
    image::load_from_memory(bytes)
        .expect("output is not a decodable image")
        .to_rgba8()
}

#[rstest]
#[case("#000000", Color::rgb(0, 0, 0))]
#[case("#ffffff", Color::rgb(255, 255, 255))]
#[case("#f3f4f6", Color::rgb(0xf3, 0xf4, 0xf6))]
#[case("#abc", Color::rgb(0xaa, 0xbb, 0xcc))]
#[case("#11223344", Color::rgba(0x11, 0x22, 0x33, 0x44))]
fn test_parse_hex_color_accepts(#[case] input: &str, #[case] expected: Color) {
    assert_eq!(parse_hex_color(input).unwrap(), expected);
}

#[rstest]
#[case("")]
#[case("000000")]
#[case("#12345")]
#[case("#gggggg")]
#[case("rgb(0,0,0)")]
fn test_parse_hex_color_rejects(#[case] input: &str) {
    assert!(matches!(
        parse_hex_color(input),
        Err(WatermarkError::InvalidSettings(_))
    ));
}

#[test]
fn test_empty_text_renders_solid_background() {
    let mut surface = PixmapSurface::new(40, 30);
    let image = render_pattern(&settings(40, 30), RenderMode::Solid, &mut surface)
        .expect("render failed");

    let pixels = decode(image.as_bytes());
    assert_eq!(pixels.dimensions(), (40, 30));
    // Every pixel carries the solid preview background.
    for pixel in pixels.pixels() {
        assert_eq!(pixel.0, [0xf3, 0xf4, 0xf6, 0xff]);
    }
}

#[test]
fn test_checkerboard_background_alternates_in_10px_blocks() {
    let mut surface = PixmapSurface::new(40, 30);
    let image = render_pattern(&settings(40, 30), RenderMode::Checkerboard, &mut surface)
        .expect("render failed");

    let pixels = decode(image.as_bytes());
    let light = [0xff, 0xff, 0xff, 0xff];
    let dark = [0xe0, 0xe0, 0xe0, 0xff];

    assert_eq!(pixels.get_pixel(0, 0).0, light);
    assert_eq!(pixels.get_pixel(9, 9).0, light);
    assert_eq!(pixels.get_pixel(10, 0).0, dark);
    assert_eq!(pixels.get_pixel(0, 10).0, dark);
    assert_eq!(pixels.get_pixel(10, 10).0, light);
    assert_eq!(pixels.get_pixel(39, 29).0, dark);
}

#[test]
fn test_output_is_deterministic_across_renders() {
    let mut first = PixmapSurface::new(60, 40);
    let mut second = PixmapSurface::new(60, 40);

    let a = render_pattern(&settings(60, 40), RenderMode::Checkerboard, &mut first)
        .expect("render failed");
    let b = render_pattern(&settings(60, 40), RenderMode::Checkerboard, &mut second)
        .expect("render failed");

    assert_eq!(a.as_bytes(), b.as_bytes());
}

#[test]
fn test_data_url_has_png_prefix() {
    let mut surface = PixmapSurface::new(20, 20);
    let image =
        render_pattern(&settings(20, 20), RenderMode::Solid, &mut surface).expect("render failed");

    let url = image.to_data_url();
    assert!(url.starts_with("data:image/png;base64,"));
    assert!(url.len() > "data:image/png;base64,".len());
}

#[test]
fn test_surface_dimension_mismatch_is_rejected() {
    let mut surface = PixmapSurface::new(100, 100);
    let result = render_pattern(&settings(200, 100), RenderMode::Solid, &mut surface);
    assert!(matches!(result, Err(WatermarkError::InvalidSettings(_))));
}

#[rstest]
#[case(0)]
#[case(1)]
fn test_invalid_canvas_dimensions_are_rejected(#[case] zero_axis: usize) {
    let mut s = settings(100, 100);
    if zero_axis == 0 {
        s.canvas_width = 0;
    } else {
        s.canvas_height = 0;
    }
    let mut surface = PixmapSurface::new(100, 100);
    assert!(matches!(
        render_pattern(&s, RenderMode::Solid, &mut surface),
        Err(WatermarkError::InvalidSettings(_))
    ));
}

#[test]
fn test_negative_density_is_rejected_before_drawing() {
    let mut s = settings(100, 100);
    s.text = "DRAFT".to_string();
    s.horizontal_density = -2;

    let mut surface = PixmapSurface::new(100, 100);
    assert!(matches!(
        render_pattern(&s, RenderMode::Solid, &mut surface),
        Err(WatermarkError::InvalidSettings(_))
    ));
}

#[test]
fn test_text_without_a_font_is_a_render_error() {
    let mut s = settings(100, 100);
    s.text = "DRAFT".to_string();

    let mut surface = PixmapSurface::new(100, 100);
    assert!(matches!(
        render_pattern(&s, RenderMode::Solid, &mut surface),
        Err(WatermarkError::Render(_))
    ));
}

#[test]
fn test_text_pattern_marks_the_background() {
    let Some(font) = discover_system_font() else {
        return;
    };

    let mut s = settings(200, 150);
    s.text = "DRAFT".to_string();
    s.opacity = 1.0;
    s.color = "#000000".to_string();

    let mut surface =
        PixmapSurface::with_font_bytes(200, 150, font).expect("font failed to parse");
    let image = render_pattern(&s, RenderMode::Solid, &mut surface).expect("render failed");

    let pixels = decode(image.as_bytes());
    let background = [0xf3, 0xf4, 0xf6, 0xff];
    let inked = pixels.pixels().filter(|p| p.0 != background).count();
    assert!(inked > 0, "text left no visible pixels");
}

#[test]
fn test_rotated_pattern_differs_from_unrotated() {
    let Some(font) = discover_system_font() else {
        return;
    };

    let mut s = settings(200, 150);
    s.text = "DRAFT".to_string();
    s.opacity = 1.0;

    let mut flat = PixmapSurface::with_font_bytes(200, 150, font.clone())
        .expect("font failed to parse");
    let unrotated = render_pattern(&s, RenderMode::Solid, &mut flat).expect("render failed");

    s.angle = 45.0;
    let mut tilted =
        PixmapSurface::with_font_bytes(200, 150, font).expect("font failed to parse");
    let rotated = render_pattern(&s, RenderMode::Solid, &mut tilted).expect("render failed");

    assert_ne!(unrotated.as_bytes(), rotated.as_bytes());
}
