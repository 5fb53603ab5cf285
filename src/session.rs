//! The Run button's logic: one solve request at a time, result and notices.
//!
//! A run exports the surface, refuses to send an empty canvas, and marks a
//! request id as in flight. Completions are matched against that id, so a
//! response that is not the outstanding one can never overwrite the answer.

use log::{debug, info, warn};
use thiserror::Error;
use uuid::Uuid;

use crate::error::SurfaceError;
use crate::notices::{NoticeBoard, NoticeKind};
use crate::solver::{SolveError, SolveRequest, SolveResponse};
use crate::surface::CanvasSurface;

pub type RequestId = Uuid;

pub const EMPTY_CANVAS_TITLE: &str = "Canvas is empty";
pub const EMPTY_CANVAS_DESCRIPTION: &str = "Please draw a question before running.";
pub const FAILURE_TITLE: &str = "An error occurred";
pub const FAILURE_DESCRIPTION: &str = "Could not solve the question. Please try again.";
pub const NOT_CONFIGURED_TITLE: &str = "Solver not configured";
pub const NOT_CONFIGURED_DESCRIPTION: &str = "Set an API key for the answer service and restart.";

/// Why a run did not produce a request
#[derive(Debug, Error)]
pub enum RunRejected {
    #[error("nothing has been drawn")]
    EmptyCanvas,

    #[error("a request is already in flight")]
    Busy,

    #[error("the answer client is not configured")]
    NotConfigured,

    #[error("failed to export the canvas: {0}")]
    Export(#[from] SurfaceError),
}

/// A request that was accepted and must be sent by the caller
#[derive(Debug, Clone)]
pub struct PendingSolve {
    pub id: RequestId,
    pub request: SolveRequest,
}

#[derive(Debug, Default)]
pub struct SolveSession {
    configured: bool,
    in_flight: Option<RequestId>,
    result: Option<String>,
    notices: NoticeBoard,
}

impl SolveSession {
    pub fn new(configured: bool) -> Self {
        Self {
            configured,
            ..Self::default()
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<RequestId> {
        self.in_flight
    }

    /// The answer being shown, if any
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn dismiss_result(&mut self) {
        self.result = None;
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut NoticeBoard {
        &mut self.notices
    }

    /// Try to start a solve for the surface's current contents.
    ///
    /// # Errors
    ///
    /// [`RunRejected::Busy`] while a request is outstanding (nothing else
    /// happens); otherwise the rejection is also posted as a notice.
    pub fn start(&mut self, surface: &CanvasSurface, now: f64) -> Result<PendingSolve, RunRejected> {
        if let Some(id) = self.in_flight {
            debug!("Run ignored: request {} still in flight", id);
            return Err(RunRejected::Busy);
        }

        let image = match surface.export_image() {
            Ok(Some(image)) => image,
            Ok(None) => {
                self.notices
                    .push(NoticeKind::Destructive, EMPTY_CANVAS_TITLE, EMPTY_CANVAS_DESCRIPTION, now);
                return Err(RunRejected::EmptyCanvas);
            }
            Err(e) => {
                warn!("Canvas export failed: {}", e);
                self.notices.push(NoticeKind::Destructive, FAILURE_TITLE, FAILURE_DESCRIPTION, now);
                return Err(e.into());
            }
        };

        if !self.configured {
            self.notices
                .push(NoticeKind::Destructive, NOT_CONFIGURED_TITLE, NOT_CONFIGURED_DESCRIPTION, now);
            return Err(RunRejected::NotConfigured);
        }

        let id = Uuid::new_v4();
        self.in_flight = Some(id);
        info!("Solve request {} started", id);
        Ok(PendingSolve {
            id,
            request: SolveRequest::from(&image),
        })
    }

    /// Apply the outcome of request `id`.
    ///
    /// Returns `false` (and changes nothing) when `id` is not the request in
    /// flight.
    pub fn complete(&mut self, id: RequestId, outcome: Result<SolveResponse, SolveError>, now: f64) -> bool {
        if self.in_flight != Some(id) {
            warn!("Discarding stale completion for request {}", id);
            return false;
        }
        self.in_flight = None;

        match outcome {
            Ok(response) => {
                info!("Solve request {} succeeded", id);
                self.result = Some(response.result);
            }
            Err(e) => {
                log::error!("Solve request {} failed: {}", id, e);
                self.notices.push(NoticeKind::Destructive, FAILURE_TITLE, FAILURE_DESCRIPTION, now);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Pos2;

    fn drawn_surface() -> CanvasSurface {
        let mut surface = CanvasSurface::new(32, 32);
        surface.begin_stroke(Pos2::new(4.0, 4.0));
        surface.extend_stroke(Pos2::new(20.0, 4.0));
        surface.end_stroke();
        surface
    }

    #[test]
    fn test_empty_canvas_is_rejected_with_notice() {
        let mut session = SolveSession::new(true);
        let surface = CanvasSurface::new(32, 32);

        let err = session.start(&surface, 1.0).unwrap_err();
        assert!(matches!(err, RunRejected::EmptyCanvas));
        assert!(!session.is_busy());
        let notice = session.notices().iter().next().unwrap();
        assert_eq!(notice.title, EMPTY_CANVAS_TITLE);
        assert_eq!(notice.kind, NoticeKind::Destructive);
    }

    #[test]
    fn test_second_run_while_in_flight_is_busy() {
        let mut session = SolveSession::new(true);
        let surface = drawn_surface();

        let pending = session.start(&surface, 0.0).unwrap();
        assert!(pending.request.photo_data_uri.starts_with("data:image/png;base64,"));
        assert!(session.is_busy());

        assert!(matches!(session.start(&surface, 0.0), Err(RunRejected::Busy)));
        assert!(session.notices().is_empty());
    }

    #[test]
    fn test_success_replaces_previous_answer() {
        let mut session = SolveSession::new(true);
        let surface = drawn_surface();

        let first = session.start(&surface, 0.0).unwrap();
        assert!(session.complete(first.id, Ok(SolveResponse { result: "4".into() }), 0.0));
        assert_eq!(session.result(), Some("4"));
        assert!(!session.is_busy());

        let second = session.start(&surface, 0.0).unwrap();
        assert!(session.complete(second.id, Ok(SolveResponse { result: "".into() }), 0.0));
        assert_eq!(session.result(), Some(""));

        session.dismiss_result();
        assert_eq!(session.result(), None);
    }

    #[test]
    fn test_failure_posts_notice_and_keeps_answer() {
        let mut session = SolveSession::new(true);
        let surface = drawn_surface();

        let first = session.start(&surface, 0.0).unwrap();
        session.complete(first.id, Ok(SolveResponse { result: "7".into() }), 0.0);

        let second = session.start(&surface, 0.0).unwrap();
        session.complete(second.id, Err(SolveError::ApiRequest("timed out".into())), 2.0);

        assert!(!session.is_busy());
        assert_eq!(session.result(), Some("7"));
        assert_eq!(session.notices().iter().next().unwrap().title, FAILURE_TITLE);
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut session = SolveSession::new(true);
        let surface = drawn_surface();
        let pending = session.start(&surface, 0.0).unwrap();

        assert!(!session.complete(Uuid::new_v4(), Ok(SolveResponse { result: "old".into() }), 0.0));
        assert_eq!(session.result(), None);
        assert_eq!(session.in_flight(), Some(pending.id));
    }

    #[test]
    fn test_unconfigured_session_never_sends() {
        let mut session = SolveSession::new(false);
        let err = session.start(&drawn_surface(), 0.0).unwrap_err();
        assert!(matches!(err, RunRejected::NotConfigured));
        assert!(!session.is_busy());
        assert_eq!(session.notices().len(), 1);
    }
}
