//! Display surfaces that receive rendered previews.

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex},
};

use thiserror::Error;
use uuid::Uuid;

use super::render::RenderedArtifact;
use crate::util::lock::mutex_lock;

const SOURCE: &str = "application::preview::surface";

/// URL under which a published artifact can be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SurfaceHandle {
    url: String,
}

impl SurfaceHandle {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for SurfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("failed to store preview artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("preview surface rejected artifact: {message}")]
    Rejected { message: String },
}

impl SurfaceError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}

/// Isolated rendering target for preview documents.
///
/// Every publish yields a fresh handle. The owner releases a handle once the
/// artifact behind it has been superseded.
///
/// Both calls run synchronously while the engine's state lock is held, from
/// whichever task triggered the render, so implementations must return quickly
/// and must not call back into the engine.
pub trait DisplaySurface: Send + 'static {
    fn publish(&mut self, artifact: &RenderedArtifact) -> Result<SurfaceHandle, SurfaceError>;

    fn release(&mut self, handle: &SurfaceHandle);
}

impl DisplaySurface for Box<dyn DisplaySurface> {
    fn publish(&mut self, artifact: &RenderedArtifact) -> Result<SurfaceHandle, SurfaceError> {
        (**self).publish(artifact)
    }

    fn release(&mut self, handle: &SurfaceHandle) {
        (**self).release(handle)
    }
}

/// In-memory object URL store (`blob:devguide/<uuid>`).
///
/// Clones share the same store so a caller can keep inspecting documents after
/// handing the surface to an engine.
#[derive(Debug, Clone, Default)]
pub struct BlobSurface {
    blobs: Arc<Mutex<HashMap<String, RenderedArtifact>>>,
}

impl BlobSurface {
    pub const URL_PREFIX: &'static str = "blob:devguide/";

    pub fn new() -> Self {
        Self::default()
    }

    /// Document currently stored under `url`, if it has not been released.
    pub fn resolve(&self, url: &str) -> Option<String> {
        mutex_lock(&self.blobs, SOURCE, "resolve")
            .get(url)
            .map(|artifact| artifact.document().to_string())
    }

    /// Number of artifacts that have been published and not yet released.
    pub fn live_count(&self) -> usize {
        mutex_lock(&self.blobs, SOURCE, "live_count").len()
    }
}

impl DisplaySurface for BlobSurface {
    fn publish(&mut self, artifact: &RenderedArtifact) -> Result<SurfaceHandle, SurfaceError> {
        let url = format!("{}{}", Self::URL_PREFIX, Uuid::new_v4());
        mutex_lock(&self.blobs, SOURCE, "publish").insert(url.clone(), artifact.clone());
        Ok(SurfaceHandle::new(url))
    }

    fn release(&mut self, handle: &SurfaceHandle) {
        mutex_lock(&self.blobs, SOURCE, "release").remove(handle.url());
    }
}
