use canvas_solver::surface::{CanvasSurface, EXPORT_BACKGROUND, SurfaceState};
use canvas_solver::{EncodedImage, StrokeStyle};
use egui::{Color32, Pos2};

const GOLD: [u8; 4] = [0xFF, 0xD7, 0x00, 0xFF];

fn background() -> [u8; 4] {
    EXPORT_BACKGROUND.to_srgba_unmultiplied()
}

fn gold_diagonal() -> CanvasSurface {
    let mut surface = CanvasSurface::with_style(200, 200, StrokeStyle::new(Color32::from_rgb(0xFF, 0xD7, 0x00), 8.0));
    surface.begin_stroke(Pos2::new(50.0, 50.0));
    surface.extend_stroke(Pos2::new(150.0, 150.0));
    surface.end_stroke();
    surface
}

fn decode(image: &EncodedImage) -> image::RgbaImage {
    let bytes = image.decode_bytes().unwrap();
    image::load_from_memory(&bytes).unwrap().to_rgba8()
}

#[test]
fn test_exported_stroke_over_background() {
    let surface = gold_diagonal();
    assert_eq!(surface.state(), SurfaceState::Idle);

    let exported = surface.export_image().unwrap().expect("stroke was drawn");
    assert!(exported.to_data_uri().starts_with("data:image/png;base64,"));

    let pixels = decode(&exported);
    assert_eq!(pixels.dimensions(), (200, 200));

    // On the stroke
    assert_eq!(pixels.get_pixel(100, 100).0, GOLD);
    // Far from it
    assert_eq!(pixels.get_pixel(0, 0).0, background());
    assert_eq!(pixels.get_pixel(199, 0).0, background());
    assert_eq!(pixels.get_pixel(10, 190).0, background());
}

#[test]
fn test_horizontal_gold_stroke_export() {
    let mut surface = CanvasSurface::with_style(200, 200, StrokeStyle::new(Color32::from_rgb(0xFF, 0xD7, 0x00), 8.0));
    surface.begin_stroke(Pos2::new(10.0, 10.0));
    surface.extend_stroke(Pos2::new(100.0, 10.0));
    surface.end_stroke();

    let pixels = decode(&surface.export_image().unwrap().expect("stroke was drawn"));
    assert_eq!(pixels.dimensions(), (200, 200));

    for x in 10..=100 {
        assert_eq!(pixels.get_pixel(x, 10).0, GOLD, "x = {x}");
    }
    for (x, y) in [(10, 30), (150, 10), (199, 199)] {
        assert_eq!(pixels.get_pixel(x, y).0, background(), "({x}, {y})");
    }
}

#[test]
fn test_export_is_opaque_everywhere() {
    let pixels = decode(&gold_diagonal().export_image().unwrap().unwrap());
    assert!(pixels.pixels().all(|p| p.0[3] == 255));
}

#[test]
fn test_untouched_canvas_exports_nothing() {
    let surface = CanvasSurface::new(64, 64);
    assert!(surface.export_image().unwrap().is_none());
}

#[test]
fn test_cleared_canvas_exports_nothing() {
    let mut surface = gold_diagonal();
    surface.clear();
    assert!(!surface.has_content());
    assert!(surface.export_image().unwrap().is_none());
}

#[test]
fn test_grow_keeps_pixels_in_place() {
    let mut surface = gold_diagonal();
    let before = surface.buffer().get_pixel(100, 100).0;

    assert!(surface.resize(300, 250));
    assert_eq!(surface.size(), [300, 250]);
    assert_eq!(surface.buffer().get_pixel(100, 100).0, before);

    // The new area is empty
    assert_eq!(surface.buffer().get_pixel(280, 240).0[3], 0);
}

#[test]
fn test_shrink_crops_without_scaling() {
    let mut surface = gold_diagonal();
    surface.resize(120, 120);

    let pixels = decode(&surface.export_image().unwrap().unwrap());
    assert_eq!(pixels.dimensions(), (120, 120));
    assert_eq!(pixels.get_pixel(100, 100).0, GOLD);
}

#[test]
fn test_resize_to_same_size_is_noop() {
    let mut surface = gold_diagonal();
    let version = surface.version();
    assert!(!surface.resize(200, 200));
    assert_eq!(surface.version(), version);
}

#[test]
fn test_moves_while_idle_draw_nothing() {
    let mut surface = CanvasSurface::new(50, 50);
    assert!(!surface.extend_stroke(Pos2::new(10.0, 10.0)));
    assert!(!surface.has_content());
    assert!(surface.buffer().pixels().all(|p| p.0[3] == 0));
}

#[test]
fn test_color_change_applies_to_next_stroke() {
    let mut surface = CanvasSurface::with_style(100, 100, StrokeStyle::new(Color32::WHITE, 8.0));
    surface.begin_stroke(Pos2::new(10.0, 20.0));
    surface.set_color(Color32::from_rgb(0x00, 0xFF, 0xFF));
    surface.extend_stroke(Pos2::new(90.0, 20.0));
    surface.end_stroke();

    // The stroke in progress kept white
    assert_eq!(surface.buffer().get_pixel(50, 20).0, [255, 255, 255, 255]);

    surface.begin_stroke(Pos2::new(10.0, 70.0));
    surface.extend_stroke(Pos2::new(90.0, 70.0));
    surface.end_stroke();
    assert_eq!(surface.buffer().get_pixel(50, 70).0, [0x00, 0xFF, 0xFF, 0xFF]);
}
