//! Live HTML/CSS sandbox preview.

mod debounce;
mod engine;
mod render;
mod surface;

pub use debounce::{DEFAULT_QUIET_PERIOD, DebounceScheduler, PreviewState};
pub use engine::{CLEAR_PROMPT, ConfirmationGate, LivePreviewEngine, PreviewConfig};
pub use render::{HEAD_CLOSE_MARKER, RenderedArtifact, compose_document};
pub use surface::{BlobSurface, DisplaySurface, SurfaceError, SurfaceHandle};
