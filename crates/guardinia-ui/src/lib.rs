//! Presentation layer: the session controller, its view bindings, and HTML rendering.

pub mod controller;
pub mod notice;
pub mod render;
pub mod view;

pub use controller::{Controller, SubmitOutcome};
pub use notice::{Notice, NoticeLevel};
pub use render::Panel;
pub use view::View;
