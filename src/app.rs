use std::sync::Arc;

use futures::channel::oneshot;
use log::{debug, error, info};

use crate::canvas_texture::CanvasTexture;
use crate::input::{EventDisposition, InputHandler, InputRouter};
use crate::palette::ColorPalette;
use crate::panels;
use crate::session::{RequestId, SolveSession};
use crate::solver::{GeminiModel, SolveError, SolveRequest, SolveResponse, SolverClient};
use crate::stroke::StrokeStyle;
use crate::surface::CanvasSurface;

/// Stroke width used by the app
pub const APP_STROKE_WIDTH: f32 = 8.0;

type SolveOutcome = Result<SolveResponse, SolveError>;

/// Runs solve requests off the UI thread and hands the outcome back
pub struct Dispatcher {
    client: Arc<SolverClient<GeminiModel>>,
    #[cfg(not(target_arch = "wasm32"))]
    runtime: tokio::runtime::Runtime,
}

impl Dispatcher {
    /// # Errors
    ///
    /// Fails if the async runtime cannot be started.
    pub fn new(client: SolverClient<GeminiModel>) -> std::io::Result<Self> {
        Ok(Self {
            client: Arc::new(client),
            #[cfg(not(target_arch = "wasm32"))]
            runtime: tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .enable_all()
                .build()?,
        })
    }

    /// Send the request; the receiver resolves once the model answers or fails.
    pub fn dispatch(&self, ctx: egui::Context, request: SolveRequest) -> oneshot::Receiver<SolveOutcome> {
        let (tx, rx) = oneshot::channel();
        let client = Arc::clone(&self.client);
        let task = async move {
            let outcome = client.solve(&request).await;
            // The app may have shut down in the meantime
            let _ = tx.send(outcome);
            ctx.request_repaint();
        };

        #[cfg(not(target_arch = "wasm32"))]
        self.runtime.spawn(task);
        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(task);

        rx
    }
}

pub struct SolverApp {
    surface: CanvasSurface,
    input: InputHandler,
    router: InputRouter,
    texture: CanvasTexture,
    palette: ColorPalette,
    session: SolveSession,
    dispatcher: Option<Dispatcher>,
    pending: Option<(RequestId, oneshot::Receiver<SolveOutcome>)>,
}

impl SolverApp {
    /// Called once before the first frame.
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let dispatcher = match SolverClient::from_env() {
            Ok(client) => match Dispatcher::new(client) {
                Ok(dispatcher) => Some(dispatcher),
                Err(e) => {
                    error!("Failed to start the request runtime: {}", e);
                    None
                }
            },
            Err(e) => {
                error!("Answer client unavailable: {}", e);
                None
            }
        };
        Self::with_dispatcher(dispatcher)
    }

    pub fn with_dispatcher(dispatcher: Option<Dispatcher>) -> Self {
        let palette = ColorPalette::default();
        let style = StrokeStyle::new(palette.selected_color(), APP_STROKE_WIDTH);
        Self {
            surface: CanvasSurface::with_style(0, 0, style),
            input: InputHandler::new(egui::Rect::NOTHING),
            router: InputRouter::default(),
            texture: CanvasTexture::new(),
            palette,
            session: SolveSession::new(dispatcher.is_some()),
            dispatcher,
            pending: None,
        }
    }

    pub fn surface(&self) -> &CanvasSurface {
        &self.surface
    }

    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    pub fn session(&self) -> &SolveSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SolveSession {
        &mut self.session
    }

    /// Fit the surface to the on-screen rectangle it occupies
    pub fn layout_surface(&mut self, rect: egui::Rect) {
        let width = rect.width().max(0.0).floor() as u32;
        let height = rect.height().max(0.0).floor() as u32;
        self.surface.resize(width, height);
        self.input.set_surface_rect(rect);
        self.router.set_origin(rect.min);
    }

    /// Feed this frame's input to the surface painted on `layer`. Returns
    /// true if any event took part in a stroke.
    pub fn handle_input(&mut self, ctx: &egui::Context, layer: egui::LayerId) -> bool {
        self.input.set_accepting(self.session.result().is_none());
        let mut handled = false;
        for event in self.input.process_input(ctx, layer) {
            if self.router.route(&event, &mut self.surface) == EventDisposition::Handled {
                handled = true;
            }
        }
        handled
    }

    pub fn canvas_texture(&mut self, ctx: &egui::Context) -> Option<egui::TextureId> {
        self.texture.texture_id(ctx, &self.surface)
    }

    pub fn select_color(&mut self, index: usize) {
        if let Some(color) = self.palette.select(index) {
            self.surface.set_color(color);
        }
    }

    pub fn clear(&mut self) {
        self.surface.clear();
    }

    /// Start a solve for what is on the canvas
    pub fn run(&mut self, ctx: &egui::Context) {
        let now = ctx.input(|i| i.time);
        let pending = match self.session.start(&self.surface, now) {
            Ok(pending) => pending,
            Err(e) => {
                debug!("Run rejected: {}", e);
                return;
            }
        };

        match &self.dispatcher {
            Some(dispatcher) => {
                info!("Dispatching request {} to {}", pending.id, dispatcher.client.model().model());
                let rx = dispatcher.dispatch(ctx.clone(), pending.request);
                self.pending = Some((pending.id, rx));
            }
            None => {
                let outcome = Err(SolveError::ConfigParse("no request dispatcher".into()));
                self.session.complete(pending.id, outcome, now);
            }
        }
    }

    /// Apply a finished request, if one is ready
    fn poll_pending(&mut self, now: f64) {
        let Some((id, rx)) = self.pending.as_mut() else {
            return;
        };
        let outcome = match rx.try_recv() {
            Ok(None) => return,
            Ok(Some(outcome)) => outcome,
            Err(oneshot::Canceled) => Err(SolveError::ApiRequest("request task ended without a response".into())),
        };
        let id = *id;
        self.pending = None;
        if self.session.complete(id, outcome, now) {
            info!("Request {} settled", id);
        }
    }
}

impl eframe::App for SolverApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = ctx.input(|i| i.time);
        self.poll_pending(now);
        self.session.notices_mut().prune(now);

        panels::palette_panel(self, ctx);
        panels::controls_panel(self, ctx);
        panels::central_panel(self, ctx);
        panels::result_dialog(self, ctx);
        panels::notices_panel(self, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press_and_drag() -> egui::RawInput {
        let press = egui::Event::PointerButton {
            pos: egui::pos2(50.0, 50.0),
            button: egui::PointerButton::Primary,
            pressed: true,
            modifiers: egui::Modifiers::default(),
        };
        egui::RawInput {
            events: vec![press, egui::Event::PointerMoved(egui::pos2(120.0, 50.0))],
            ..Default::default()
        }
    }

    #[test]
    fn test_handle_input_reports_stroke_activity() {
        let ctx = egui::Context::default();
        let mut app = SolverApp::with_dispatcher(None);
        let mut handled = false;

        let _ = ctx.run(press_and_drag(), |ctx| {
            app.layout_surface(egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(200.0, 200.0)));
            handled = app.handle_input(ctx, egui::LayerId::background());
        });

        assert!(handled);
        assert!(app.surface().is_drawing());
        assert!(app.surface().has_content());
    }

    #[test]
    fn test_handle_input_without_events_reports_nothing() {
        let ctx = egui::Context::default();
        let mut app = SolverApp::with_dispatcher(None);
        let mut handled = true;

        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            app.layout_surface(egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(200.0, 200.0)));
            handled = app.handle_input(ctx, egui::LayerId::background());
        });

        assert!(!handled);
        assert!(!app.surface().has_content());
    }
}
