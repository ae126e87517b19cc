//! Session controller for the analysis page.
//!
//! Owns the per-session state (active mode, typed message, pending image)
//! and turns user actions into view updates and webhook calls. Each
//! submission carries its own [`CancellationToken`]; starting a new one
//! cancels the previous, and a cancelled submission never touches the
//! result panel. View updates that depend on which submission is current
//! are made while the session lock is held.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use guardinia_client::{Analyzer, ClientError};
use guardinia_core::{AnalysisRequest, AnalysisResult, ImageFile, ImagePreview, InputError, InputMode};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::render::{connection_error_panel, pending_panel, result_panel};
use crate::{Notice, View};

/// How a submission that passed validation ended.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Result rendered.
    Completed(AnalysisResult),
    /// Connection-error panel rendered. The error is kept for logging only.
    Failed(ClientError),
    /// A newer submission or a mode switch took over; nothing was rendered.
    Superseded,
}

/// Session-scoped controller. Cloning yields another handle to the same session.
pub struct Controller<A, V> {
    inner: Arc<Inner<A, V>>,
}

impl<A, V> Clone for Controller<A, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<A, V> {
    analyzer: A,
    view: V,
    session: Mutex<Session>,
}

#[derive(Default)]
struct Session {
    mode: InputMode,
    message: String,
    upload: Option<Upload>,
    in_flight: Option<InFlight>,
    next_submission: u64,
}

struct Upload {
    file: ImageFile,
    preview: ImagePreview,
}

struct InFlight {
    id: u64,
    token: CancellationToken,
}

impl<A: Analyzer, V: View> Controller<A, V> {
    /// Start a session in text mode.
    pub fn new(analyzer: A, view: V) -> Self {
        view.show_mode(InputMode::Text);
        Self {
            inner: Arc::new(Inner {
                analyzer,
                view,
                session: Mutex::new(Session::default()),
            }),
        }
    }

    pub fn view(&self) -> &V {
        &self.inner.view
    }

    pub fn mode(&self) -> InputMode {
        self.session().mode
    }

    pub fn message(&self) -> String {
        self.session().message.clone()
    }

    pub fn preview(&self) -> Option<ImagePreview> {
        self.session().upload.as_ref().map(|u| u.preview.clone())
    }

    pub fn is_pending(&self) -> bool {
        self.session().in_flight.is_some()
    }

    /// Switch the active input and clear the result panel.
    ///
    /// The other mode's input is left as it was. A submission still in
    /// flight is cancelled so its late result cannot land under the new tab.
    pub fn select_mode(&self, mode: InputMode) {
        let mut session = self.session();
        session.mode = mode;
        if let Some(in_flight) = session.in_flight.take() {
            debug!(submission = in_flight.id, "mode switch cancels pending submission");
            in_flight.token.cancel();
            self.inner.view.set_busy(false, mode);
        }
        debug!(mode = mode.as_str(), "mode selected");
        self.inner.view.show_mode(mode);
        self.inner.view.hide_panel();
    }

    pub fn set_message(&self, text: &str) {
        let count = text.chars().count();
        self.session().message = text.to_string();
        self.inner.view.show_char_count(count);
    }

    /// Validate and store an image, replacing any previous one.
    pub fn attach_image(&self, file: ImageFile) -> Result<ImagePreview, InputError> {
        if let Err(err) = file.validate() {
            warn!(name = %file.name, mime = %file.mime_type, size = file.size(), error = %err, "image rejected");
            self.inner
                .view
                .notify(&Notice::for_input_error(&err, InputMode::Image));
            return Err(err);
        }

        let preview = file.preview();
        debug!(name = %file.name, size = file.size(), "image attached");
        self.session().upload = Some(Upload {
            file,
            preview: preview.clone(),
        });
        self.inner.view.show_preview(&preview);
        Ok(preview)
    }

    pub fn remove_image(&self) {
        self.session().upload = None;
        self.inner.view.clear_preview();
        self.inner.view.notify(&Notice::info("Imagem removida"));
    }

    /// Submit the active mode's input.
    ///
    /// Invalid input fails right away with no request sent. Otherwise the
    /// view goes pending, exactly one request is made, and the view ends up
    /// showing either the result or the connection-error panel.
    pub async fn submit(&self) -> Result<SubmitOutcome, InputError> {
        let (request, id, token) = match self.begin_submission() {
            Ok(started) => started,
            Err((err, mode)) => {
                debug!(mode = mode.as_str(), error = %err, "submission rejected");
                self.inner
                    .view
                    .notify(&Notice::for_input_error(&err, mode));
                return Err(err);
            }
        };
        let mode = request.mode();

        let response = tokio::select! {
            _ = token.cancelled() => None,
            response = self.inner.analyzer.analyze(&request) => Some(response),
        };

        // A newer submission may have replaced this one after the response
        // arrived. The guard is held until the view is updated so no other
        // submission or mode switch can interleave.
        let mut session = self.session();
        let still_current = session.in_flight.as_ref().is_some_and(|f| f.id == id);
        let Some(response) = response.filter(|_| still_current) else {
            drop(session);
            info!(submission = id, "submission superseded");
            return Ok(SubmitOutcome::Superseded);
        };
        session.in_flight = None;

        self.inner.view.set_busy(false, mode);
        match response {
            Ok(result) => {
                info!(submission = id, verdict = result.verdict.as_str(), "showing result");
                self.inner.view.show_panel(&result_panel(&result, mode));
                Ok(SubmitOutcome::Completed(result))
            }
            Err(err) => {
                warn!(submission = id, error = %err, "analysis failed");
                self.inner.view.show_panel(&connection_error_panel(mode));
                Ok(SubmitOutcome::Failed(err))
            }
        }
    }

    /// Build the request, register it as the in-flight submission, and show it pending.
    fn begin_submission(
        &self,
    ) -> Result<(AnalysisRequest, u64, CancellationToken), (InputError, InputMode)> {
        let mut session = self.session();
        let mode = session.mode;
        let request = match mode {
            InputMode::Text => AnalysisRequest::text(&session.message),
            InputMode::Image => match &session.upload {
                Some(upload) => AnalysisRequest::image(&upload.file),
                None => Err(InputError::EmptyInput),
            },
        }
        .map_err(|err| (err, mode))?;

        if let Some(previous) = session.in_flight.take() {
            debug!(submission = previous.id, "superseding pending submission");
            previous.token.cancel();
        }

        session.next_submission += 1;
        let id = session.next_submission;
        let token = CancellationToken::new();
        session.in_flight = Some(InFlight {
            id,
            token: token.clone(),
        });
        self.inner.view.set_busy(true, mode);
        self.inner.view.show_panel(&pending_panel(mode));
        Ok((request, id, token))
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.inner
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
