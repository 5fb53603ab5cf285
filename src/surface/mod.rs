//! The drawing surface: records freehand strokes straight into a pixel buffer
//! and exports that buffer as an encoded still image.

use std::io::Cursor;

use egui::{Color32, Pos2};
use image::{ImageFormat, Rgba, RgbaImage};
use log::{debug, info};

use crate::encoded_image::EncodedImage;
use crate::error::{SurfaceError, SurfaceResult};
use crate::stroke::{StrokePath, StrokeStyle};

pub(crate) mod raster;

/// Opaque colour the buffer is flattened onto when exported
pub const EXPORT_BACKGROUND: Color32 = Color32::from_rgb(0x1a, 0x1b, 0x1e);

/// Whether a stroke is in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    Idle,
    Drawing,
}

pub struct CanvasSurface {
    buffer: RgbaImage,
    style: StrokeStyle,
    // Some while a stroke is in progress
    path: Option<StrokePath>,
    has_content: bool,
    // Bumped on every pixel change
    version: u64,
}

impl std::fmt::Debug for CanvasSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasSurface")
            .field("size", &self.buffer.dimensions())
            .field("style", &self.style)
            .field("state", &self.state())
            .field("has_content", &self.has_content)
            .field("version", &self.version)
            .finish()
    }
}

impl CanvasSurface {
    /// Create an empty, fully transparent surface
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_style(width, height, StrokeStyle::default())
    }

    pub fn with_style(width: u32, height: u32, style: StrokeStyle) -> Self {
        Self {
            buffer: RgbaImage::new(width, height),
            style,
            path: None,
            has_content: false,
            version: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn size(&self) -> [u32; 2] {
        [self.buffer.width(), self.buffer.height()]
    }

    pub fn state(&self) -> SurfaceState {
        if self.path.is_some() {
            SurfaceState::Drawing
        } else {
            SurfaceState::Idle
        }
    }

    pub fn is_drawing(&self) -> bool {
        self.path.is_some()
    }

    /// True once a stroke has been started since the last clear
    pub fn has_content(&self) -> bool {
        self.has_content
    }

    /// The raw, unflattened pixels
    pub fn buffer(&self) -> &RgbaImage {
        &self.buffer
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    /// Change the attributes used by future strokes.
    ///
    /// A stroke already in progress keeps the style it started with.
    pub fn set_style(&mut self, style: StrokeStyle) {
        self.style = style;
    }

    pub fn set_color(&mut self, color: Color32) {
        self.style.color = color;
    }

    pub fn set_width(&mut self, width: f32) {
        self.style.width = width;
    }

    /// Start a new stroke at `point`.
    ///
    /// Ignored (returns `false`) while another stroke is in progress.
    pub fn begin_stroke(&mut self, point: Pos2) -> bool {
        if self.is_drawing() {
            debug!("begin_stroke at {:?} ignored: already drawing", point);
            return false;
        }
        self.path = Some(StrokePath::begin(point, self.style));
        self.has_content = true;
        true
    }

    /// Draw a segment from the last recorded point to `point`.
    ///
    /// No-op when idle.
    pub fn extend_stroke(&mut self, point: Pos2) -> bool {
        let Some(path) = self.path.as_mut() else {
            return false;
        };
        let style = path.style();
        if let Some((from, to)) = path.line_to(point) {
            if raster::stroke_segment(&mut self.buffer, from, to, &style) {
                self.version += 1;
            }
        }
        true
    }

    /// Finish the current stroke. Safe to call when idle.
    pub fn end_stroke(&mut self) -> bool {
        match self.path.take() {
            Some(path) => {
                debug!("Stroke finished with {} points", path.points().len());
                true
            }
            None => false,
        }
    }

    /// Resize the buffer, keeping existing pixels at their coordinates.
    ///
    /// Content is copied to the top-left of the new buffer without scaling;
    /// anything outside the new bounds is cropped. Returns `false` without
    /// touching the buffer when the size is unchanged.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if self.size() == [width, height] {
            return false;
        }
        info!(
            "Resizing canvas {}x{} -> {}x{}",
            self.width(),
            self.height(),
            width,
            height
        );

        let old = std::mem::replace(&mut self.buffer, RgbaImage::new(width, height));
        if self.has_content {
            image::imageops::replace(&mut self.buffer, &old, 0, 0);
        }
        self.version += 1;
        true
    }

    /// Wipe every pixel to transparent and forget that anything was drawn
    pub fn clear(&mut self) {
        self.buffer.pixels_mut().for_each(|p| *p = Rgba([0, 0, 0, 0]));
        self.has_content = false;
        self.version += 1;
        info!("Canvas cleared");
    }

    /// The buffer flattened onto [`EXPORT_BACKGROUND`]
    pub fn composite(&self) -> RgbaImage {
        let [r, g, b, a] = EXPORT_BACKGROUND.to_srgba_unmultiplied();
        let mut flattened = RgbaImage::from_pixel(self.width(), self.height(), Rgba([r, g, b, a]));
        for (dst, src) in flattened.pixels_mut().zip(self.buffer.pixels()) {
            let [sr, sg, sb, sa] = src.0;
            raster::blend_over(dst, Color32::from_rgba_unmultiplied(sr, sg, sb, sa));
        }
        flattened
    }

    /// Export the canvas as a PNG data URI.
    ///
    /// Returns `Ok(None)` when nothing has been drawn since creation or the
    /// last [`clear`](Self::clear).
    pub fn export_image(&self) -> SurfaceResult<Option<EncodedImage>> {
        if !self.has_content {
            return Ok(None);
        }
        let [width, height] = self.size();
        if width == 0 || height == 0 {
            return Err(SurfaceError::ZeroSized { width, height });
        }

        let mut bytes = Vec::new();
        self.composite()
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        info!("Exported {}x{} canvas ({} bytes PNG)", width, height, bytes.len());

        Ok(Some(EncodedImage::from_png_bytes(&bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gold_surface() -> CanvasSurface {
        CanvasSurface::with_style(200, 200, StrokeStyle::new(Color32::from_rgb(0xFF, 0xD7, 0x00), 8.0))
    }

    #[test]
    fn test_new_surface_is_idle_and_empty() {
        let surface = CanvasSurface::new(20, 10);
        assert_eq!(surface.size(), [20, 10]);
        assert_eq!(surface.state(), SurfaceState::Idle);
        assert!(!surface.has_content());
        assert!(surface.buffer().pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn test_extend_when_idle_draws_nothing() {
        let mut surface = gold_surface();
        assert!(!surface.extend_stroke(Pos2::new(10.0, 10.0)));
        assert!(!surface.extend_stroke(Pos2::new(100.0, 10.0)));
        assert_eq!(surface.version(), 0);
        assert!(!surface.has_content());
    }

    #[test]
    fn test_begin_marks_content_and_rejects_reentry() {
        let mut surface = gold_surface();
        assert!(surface.begin_stroke(Pos2::new(5.0, 5.0)));
        assert!(surface.has_content());
        assert_eq!(surface.state(), SurfaceState::Drawing);
        assert!(!surface.begin_stroke(Pos2::new(50.0, 50.0)));

        assert!(surface.end_stroke());
        assert!(!surface.end_stroke());
        assert_eq!(surface.state(), SurfaceState::Idle);
    }

    #[test]
    fn test_style_change_mid_stroke_applies_to_next_stroke() {
        let mut surface = gold_surface();
        surface.begin_stroke(Pos2::new(10.0, 10.0));
        surface.set_color(Color32::from_rgb(0x00, 0xFF, 0xFF));
        surface.extend_stroke(Pos2::new(40.0, 10.0));
        surface.end_stroke();
        assert_eq!(surface.buffer().get_pixel(25, 10).0, [0xFF, 0xD7, 0x00, 0xFF]);

        surface.begin_stroke(Pos2::new(10.0, 50.0));
        surface.extend_stroke(Pos2::new(40.0, 50.0));
        surface.end_stroke();
        assert_eq!(surface.buffer().get_pixel(25, 50).0, [0x00, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_resize_same_size_is_noop() {
        let mut surface = gold_surface();
        surface.begin_stroke(Pos2::new(10.0, 10.0));
        surface.extend_stroke(Pos2::new(100.0, 10.0));
        surface.end_stroke();
        let before = surface.buffer().clone();
        let version = surface.version();

        assert!(!surface.resize(200, 200));
        assert_eq!(surface.version(), version);
        assert_eq!(surface.buffer(), &before);
    }

    #[test]
    fn test_resize_preserves_pixels_at_origin() {
        let mut surface = gold_surface();
        surface.begin_stroke(Pos2::new(10.0, 10.0));
        surface.extend_stroke(Pos2::new(100.0, 10.0));
        surface.end_stroke();
        let before = surface.buffer().clone();

        assert!(surface.resize(320, 240));
        assert_eq!(surface.size(), [320, 240]);
        for (x, y, pixel) in before.enumerate_pixels() {
            assert_eq!(surface.buffer().get_pixel(x, y), pixel);
        }
        assert_eq!(surface.buffer().get_pixel(300, 10).0, [0, 0, 0, 0]);
        assert_eq!(surface.style().width, 8.0);

        // Shrinking crops, growing back does not resurrect the cropped part
        surface.resize(50, 50);
        surface.resize(200, 200);
        assert_eq!(surface.buffer().get_pixel(30, 10).0, [0xFF, 0xD7, 0x00, 0xFF]);
        assert_eq!(surface.buffer().get_pixel(90, 10).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_clear_then_export_is_none() {
        let mut surface = gold_surface();
        surface.begin_stroke(Pos2::new(10.0, 10.0));
        surface.extend_stroke(Pos2::new(100.0, 10.0));
        surface.end_stroke();
        assert!(surface.export_image().unwrap().is_some());

        surface.clear();
        assert!(!surface.has_content());
        assert!(surface.export_image().unwrap().is_none());
        assert!(surface.buffer().pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn test_export_zero_sized_with_content_fails() {
        let mut surface = CanvasSurface::new(0, 0);
        surface.begin_stroke(Pos2::new(0.0, 0.0));
        surface.end_stroke();
        assert!(matches!(
            surface.export_image(),
            Err(SurfaceError::ZeroSized { width: 0, height: 0 })
        ));
    }

    #[test]
    fn test_composite_uses_background_where_empty() {
        let mut surface = CanvasSurface::new(4, 4);
        surface.begin_stroke(Pos2::new(0.5, 0.5));
        surface.extend_stroke(Pos2::new(0.5, 0.5));
        surface.end_stroke();

        let flat = surface.composite();
        assert_eq!(flat.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(flat.get_pixel(3, 3).0, [0x1a, 0x1b, 0x1e, 0xff]);
    }
}
