use egui::Pos2;
use log::debug;

use super::{EventDisposition, InputEvent, InputSource};
use crate::surface::CanvasSurface;

/// Routes input events into stroke operations on a [`CanvasSurface`].
///
/// Positions arrive in screen coordinates and are made relative to the
/// surface's top-left corner. A stroke belongs to the source that started
/// it; events from the other source are ignored until it ends.
#[derive(Debug, Default)]
pub struct InputRouter {
    origin: Pos2,
    active_source: Option<InputSource>,
}

impl InputRouter {
    pub fn new(origin: Pos2) -> Self {
        Self {
            origin,
            active_source: None,
        }
    }

    /// Update the surface's screen offset (e.g. after a layout change)
    pub fn set_origin(&mut self, origin: Pos2) {
        self.origin = origin;
    }

    pub fn origin(&self) -> Pos2 {
        self.origin
    }

    /// The source owning the stroke in progress, if any
    pub fn active_source(&self) -> Option<InputSource> {
        self.active_source
    }

    /// Convert a screen position into surface coordinates
    pub fn to_surface(&self, screen: Pos2) -> Pos2 {
        Pos2::new(screen.x - self.origin.x, screen.y - self.origin.y)
    }

    pub fn route(&mut self, event: &InputEvent, surface: &mut CanvasSurface) -> EventDisposition {
        let source = event.source();

        // The surface may have been ended behind our back
        if !surface.is_drawing() {
            self.active_source = None;
        }

        if event.is_start() {
            let Some(position) = event.primary_position() else {
                return EventDisposition::Ignored;
            };
            if surface.is_drawing() {
                debug!("Ignoring {:?} start while a stroke is in progress", source);
                return EventDisposition::Ignored;
            }
            surface.begin_stroke(self.to_surface(position));
            self.active_source = Some(source);
            return EventDisposition::Handled;
        }

        if !surface.is_drawing() {
            return EventDisposition::Ignored;
        }
        if !self.owns(source) {
            debug!("Ignoring {:?} input during a {:?} stroke", source, self.active_source);
            return EventDisposition::Ignored;
        }

        if event.is_stop() {
            surface.end_stroke();
            self.active_source = None;
            return EventDisposition::Handled;
        }

        match event.primary_position() {
            Some(position) => {
                surface.extend_stroke(self.to_surface(position));
                EventDisposition::Handled
            }
            None => EventDisposition::Ignored,
        }
    }

    fn owns(&self, source: InputSource) -> bool {
        self.active_source.is_none_or(|active| active == source)
    }
}
