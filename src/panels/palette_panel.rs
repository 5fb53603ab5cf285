use crate::SolverApp;
use crate::components::swatch_button::SwatchButton;

const SWATCH_SPACING: f32 = 12.0;

pub fn palette_panel(app: &mut SolverApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("palette_panel")
        .resizable(false)
        .show(ctx, |ui| {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = SWATCH_SPACING;

                let count = app.palette().swatches().len() as f32;
                let row_width = count * 36.0 + (count - 1.0).max(0.0) * SWATCH_SPACING;
                ui.add_space(((ui.available_width() - row_width) / 2.0).max(0.0));

                // Collect first to avoid borrowing the app while selecting
                let buttons: Vec<SwatchButton> = app
                    .palette()
                    .swatches()
                    .iter()
                    .enumerate()
                    .map(|(i, swatch)| {
                        SwatchButton::new(swatch.color, swatch.label.clone(), i == app.palette().selected_index())
                    })
                    .collect();

                for (index, button) in buttons.iter().enumerate() {
                    if button.show(ui).clicked() {
                        app.select_color(index);
                    }
                }
            });
            ui.add_space(8.0);
        });
}
