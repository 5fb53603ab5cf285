mod central_panel;
mod controls_panel;
mod notices_panel;
mod palette_panel;
mod result_dialog;

pub use central_panel::central_panel;
pub use controls_panel::controls_panel;
pub use notices_panel::notices_panel;
pub use palette_panel::palette_panel;
pub use result_dialog::result_dialog;
