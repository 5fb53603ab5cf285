use crate::SolverApp;
use crate::surface::EXPORT_BACKGROUND;

/// The drawing area: fills whatever space the other panels leave
pub fn central_panel(app: &mut SolverApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(EXPORT_BACKGROUND))
        .show(ctx, |ui| {
            let (mut response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::drag());
            let canvas_rect = response.rect;

            app.layout_surface(canvas_rect);
            if app.handle_input(ctx, ui.layer_id()) {
                response.mark_changed();
                ctx.request_repaint();
            }

            if let Some(texture_id) = app.canvas_texture(ctx) {
                let [width, height] = app.surface().size();
                let image_rect =
                    egui::Rect::from_min_size(canvas_rect.min, egui::vec2(width as f32, height as f32));
                painter.image(
                    texture_id,
                    image_rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }

            if response.hovered() {
                ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
            }
        });
}
