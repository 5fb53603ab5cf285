use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};

use crate::surface::CanvasSurface;

/// GPU copy of the surface buffer, re-uploaded only when the surface changed
#[derive(Default)]
pub struct CanvasTexture {
    handle: Option<TextureHandle>,
    uploaded_version: Option<u64>,
    uploaded_size: [u32; 2],
    uploads: u64,
}

impl std::fmt::Debug for CanvasTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasTexture")
            .field("has_handle", &self.handle.is_some())
            .field("uploaded_version", &self.uploaded_version)
            .field("uploaded_size", &self.uploaded_size)
            .field("uploads", &self.uploads)
            .finish()
    }
}

impl CanvasTexture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Texture for the surface's current pixels.
    ///
    /// Returns `None` for a zero-sized surface.
    pub fn texture_id(&mut self, ctx: &Context, surface: &CanvasSurface) -> Option<TextureId> {
        let [width, height] = surface.size();
        if width == 0 || height == 0 {
            return None;
        }

        let stale = self.uploaded_version != Some(surface.version()) || self.uploaded_size != surface.size();
        if stale || self.handle.is_none() {
            let image = ColorImage::from_rgba_unmultiplied(
                [width as usize, height as usize],
                surface.buffer().as_raw(),
            );
            match &mut self.handle {
                Some(handle) => handle.set(image, TextureOptions::NEAREST),
                None => {
                    self.handle = Some(ctx.load_texture("canvas_surface", image, TextureOptions::NEAREST));
                }
            }
            self.uploaded_version = Some(surface.version());
            self.uploaded_size = surface.size();
            self.uploads += 1;
        }

        self.handle.as_ref().map(TextureHandle::id)
    }

    /// Number of uploads so far
    pub fn uploads(&self) -> u64 {
        self.uploads
    }
}
