use crate::SolverApp;

pub fn controls_panel(app: &mut SolverApp, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("controls_panel")
        .resizable(false)
        .show(ctx, |ui| {
            ui.add_space(8.0);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let busy = app.session().is_busy();
                let label = if busy { "Solving" } else { "Run" };
                let run = ui.add_enabled(
                    !busy,
                    egui::Button::new(egui::RichText::new(label).size(20.0)).min_size(egui::vec2(128.0, 48.0)),
                );
                if busy {
                    ui.spinner();
                }
                if run.clicked() {
                    app.run(ctx);
                }

                let clear = ui
                    .add(egui::Button::new(egui::RichText::new("⌫").size(24.0)).min_size(egui::vec2(48.0, 48.0)))
                    .on_hover_text("Clear Canvas");
                if clear.clicked() {
                    app.clear();
                }
            });
            ui.add_space(8.0);
        });
}
