use egui::{Context, LayerId, PointerButton, Pos2, Rect, TouchPhase};
use log::trace;

mod router;
pub use router::InputRouter;

/// Which device produced an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Pointer,
    Touch,
}

/// A single active touch contact, in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub id: u64,
    pub position: Pos2,
}

/// Input events understood by the drawing surface.
///
/// Touch events carry every active contact in the order they went down;
/// only the first one draws.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Primary button pressed over the surface
    PointerDown { position: Pos2 },
    /// Pointer moved over the surface
    PointerMove { position: Pos2 },
    /// Primary button released
    PointerUp,
    /// Pointer left the surface
    PointerLeave,
    TouchStart { touches: Vec<TouchPoint> },
    TouchMove { touches: Vec<TouchPoint> },
    TouchEnd,
    TouchCancel,
}

impl InputEvent {
    pub fn source(&self) -> InputSource {
        match self {
            Self::PointerDown { .. } | Self::PointerMove { .. } | Self::PointerUp | Self::PointerLeave => {
                InputSource::Pointer
            }
            Self::TouchStart { .. } | Self::TouchMove { .. } | Self::TouchEnd | Self::TouchCancel => {
                InputSource::Touch
            }
        }
    }

    /// The single position this event contributes to a stroke
    pub fn primary_position(&self) -> Option<Pos2> {
        match self {
            Self::PointerDown { position } | Self::PointerMove { position } => Some(*position),
            Self::TouchStart { touches } | Self::TouchMove { touches } => {
                touches.first().map(|touch| touch.position)
            }
            _ => None,
        }
    }

    pub fn is_start(&self) -> bool {
        matches!(self, Self::PointerDown { .. } | Self::TouchStart { .. })
    }

    /// Events that must end any stroke owned by their source
    pub fn is_stop(&self) -> bool {
        matches!(
            self,
            Self::PointerUp | Self::PointerLeave | Self::TouchEnd | Self::TouchCancel
        )
    }
}

/// Result of routing an event.
///
/// `Handled` means the event began, continued or ended a stroke and its
/// default action (scrolling, text selection) must be suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDisposition {
    Handled,
    Ignored,
}

/// Converts raw egui events into surface [`InputEvent`]s
#[derive(Debug)]
pub struct InputHandler {
    surface_rect: Rect,
    pointer_inside: bool,
    touches: Vec<TouchPoint>,
    accepting: bool,
}

impl InputHandler {
    pub fn new(surface_rect: Rect) -> Self {
        Self {
            surface_rect,
            pointer_inside: false,
            touches: Vec::new(),
            accepting: true,
        }
    }

    /// Update the surface rectangle (e.g. if the window is resized)
    pub fn set_surface_rect(&mut self, rect: Rect) {
        self.surface_rect = rect;
    }

    /// While not accepting, no new strokes are started.
    ///
    /// Used when a dialog covers the surface. Strokes already in progress
    /// still receive their move and end events.
    pub fn set_accepting(&mut self, accepting: bool) {
        self.accepting = accepting;
    }

    /// Process this frame's egui input.
    ///
    /// `layer` is the layer the surface is painted on. Presses and touches
    /// that land on any other layer above it (windows, notices, tooltips)
    /// do not start strokes.
    pub fn process_input(&mut self, ctx: &Context, layer: LayerId) -> Vec<InputEvent> {
        let events = ctx.input(|input| input.events.clone());
        self.translate_with(&events, |pos| ctx.layer_id_at(pos).is_some_and(|top| top != layer))
    }

    /// Translate events for a surface nothing is drawn over
    pub fn translate(&mut self, events: &[egui::Event]) -> Vec<InputEvent> {
        self.translate_with(events, |_| false)
    }

    /// Translate events; `covered` reports positions hidden behind another layer
    pub fn translate_with(&mut self, events: &[egui::Event], covered: impl Fn(Pos2) -> bool) -> Vec<InputEvent> {
        let mut out = Vec::new();
        for event in events {
            match event {
                egui::Event::PointerMoved(pos) => {
                    let inside = self.surface_rect.contains(*pos);
                    if inside {
                        out.push(InputEvent::PointerMove { position: *pos });
                    } else if self.pointer_inside {
                        out.push(InputEvent::PointerLeave);
                    }
                    self.pointer_inside = inside;
                }
                egui::Event::PointerGone => {
                    if self.pointer_inside {
                        out.push(InputEvent::PointerLeave);
                    }
                    self.pointer_inside = false;
                }
                egui::Event::PointerButton {
                    pos,
                    button: PointerButton::Primary,
                    pressed,
                    ..
                } => {
                    if *pressed {
                        if self.accepting && self.surface_rect.contains(*pos) && !covered(*pos) {
                            self.pointer_inside = true;
                            out.push(InputEvent::PointerDown { position: *pos });
                        }
                    } else {
                        out.push(InputEvent::PointerUp);
                    }
                }
                egui::Event::Touch { id, phase, pos, .. } => {
                    if *phase == TouchPhase::Start && covered(*pos) {
                        continue;
                    }
                    if let Some(event) = self.translate_touch(id.0, *phase, *pos) {
                        out.push(event);
                    }
                }
                _ => {}
            }
        }
        if !out.is_empty() {
            trace!("Translated {} surface input events", out.len());
        }
        out
    }

    fn translate_touch(&mut self, id: u64, phase: TouchPhase, pos: Pos2) -> Option<InputEvent> {
        let tracked = self.touches.iter().position(|touch| touch.id == id);
        match phase {
            TouchPhase::Start => {
                // Contacts that go down off the surface never belong to it
                if tracked.is_some() || !self.accepting || !self.surface_rect.contains(pos) {
                    return None;
                }
                self.touches.push(TouchPoint { id, position: pos });
                Some(InputEvent::TouchStart {
                    touches: self.touches.clone(),
                })
            }
            TouchPhase::Move => {
                let index = tracked?;
                self.touches[index].position = pos;
                Some(InputEvent::TouchMove {
                    touches: self.touches.clone(),
                })
            }
            TouchPhase::End => {
                self.touches.remove(tracked?);
                Some(InputEvent::TouchEnd)
            }
            TouchPhase::Cancel => {
                self.touches.remove(tracked?);
                Some(InputEvent::TouchCancel)
            }
        }
    }
}
