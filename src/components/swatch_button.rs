use eframe::egui;

/// Round colour button used by the palette
pub struct SwatchButton {
    pub color: egui::Color32,
    pub label: String,
    pub selected: bool,
}

impl SwatchButton {
    pub fn new(color: egui::Color32, label: impl Into<String>, selected: bool) -> Self {
        Self {
            color,
            label: label.into(),
            selected,
        }
    }

    pub fn show(&self, ui: &mut egui::Ui) -> egui::Response {
        let button_size = egui::vec2(36.0, 36.0);
        let (rect, response) = ui.allocate_exact_size(button_size, egui::Sense::click());
        let response = response.on_hover_text(format!("Select color {}", self.label));

        if ui.is_rect_visible(rect) {
            let radius = if self.selected {
                rect.width() / 2.0
            } else if response.hovered() {
                rect.width() / 2.0 - 1.0
            } else {
                rect.width() / 2.0 - 4.0
            };

            ui.painter().circle_filled(rect.center(), radius, self.color);

            // Ring when selected
            if self.selected {
                ui.painter().circle_stroke(
                    rect.center(),
                    radius + 3.0,
                    egui::Stroke::new(2.0, ui.visuals().selection.stroke.color),
                );
            }
        }

        response
    }
}
