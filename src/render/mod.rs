//! Pure mapping from viewer state to render models and HTML fragments.
//!
//! Nothing in here performs I/O; the [`crate::surface`] layer decides where output goes.

pub mod diff;
pub mod front_matter;
pub mod html;
pub mod markdown;
pub mod overlay;
pub mod timeline;

pub use overlay::{DiffView, Overlay, OverlayBody, RevisionView};
pub use timeline::Timeline;
