use crate::SolverApp;
use crate::notices::NoticeKind;

pub fn notices_panel(app: &mut SolverApp, ctx: &egui::Context) {
    if app.session().notices().is_empty() {
        return;
    }

    let mut dismissed = None;
    egui::Area::new(egui::Id::new("notices"))
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -80.0))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            for (index, notice) in app.session().notices().iter().enumerate() {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_max_width(320.0);
                    ui.horizontal(|ui| {
                        let title = egui::RichText::new(&notice.title).strong();
                        let title = match notice.kind {
                            NoticeKind::Destructive => title.color(ui.visuals().error_fg_color),
                            NoticeKind::Info => title,
                        };
                        ui.label(title);
                        if ui.small_button("✕").clicked() {
                            dismissed = Some(index);
                        }
                    });
                    ui.label(&notice.description);
                });
            }
        });

    if let Some(index) = dismissed {
        app.session_mut().notices_mut().dismiss(index);
    }

    // Keep repainting so expired notices disappear
    ctx.request_repaint_after(std::time::Duration::from_millis(500));
}
