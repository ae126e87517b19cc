use guardinia_core::{ImagePreview, InputMode};

use crate::{Notice, Panel};

/// Typed bindings to whatever displays the session.
///
/// Handed to [`Controller::new`](crate::Controller::new). Calls may arrive
/// while the controller holds its session lock, so implementations must not
/// call back into the controller.
pub trait View: Send + Sync {
    /// Activate the tab for `mode` and relabel the submit button.
    fn show_mode(&self, mode: InputMode);

    fn show_char_count(&self, count: usize);

    fn show_preview(&self, preview: &ImagePreview);

    /// Return the upload area to its empty placeholder.
    fn clear_preview(&self);

    /// Disable the submit button while a request is pending.
    fn set_busy(&self, busy: bool, mode: InputMode);

    fn show_panel(&self, panel: &Panel);

    fn hide_panel(&self);

    fn notify(&self, notice: &Notice);
}
