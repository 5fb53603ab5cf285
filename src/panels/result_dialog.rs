use crate::SolverApp;

/// Modal showing the latest answer until the user dismisses it
pub fn result_dialog(app: &mut SolverApp, ctx: &egui::Context) {
    let Some(result) = app.session().result().map(str::to_owned) else {
        return;
    };

    let mut close = ctx.input(|i| i.key_pressed(egui::Key::Escape));
    egui::Window::new("Solution Found!")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.label("The result of your question is:");
                ui.add_space(12.0);
                ui.label(egui::RichText::new(result).size(48.0).strong());
                ui.add_space(12.0);
                if ui.button("Awesome!").clicked() {
                    close = true;
                }
            });
        });

    if close {
        app.session_mut().dismiss_result();
    }
}
