//! Filesystem-backed preview surface.
//!
//! Each artifact is written to its own `preview-<uuid>.html` file under the
//! configured directory and addressed by a `file://` URL that a browser can
//! open. Released artifacts are deleted.

use std::path::{Component, Path, PathBuf};

use tracing::warn;
use uuid::Uuid;

use crate::application::preview::{DisplaySurface, RenderedArtifact, SurfaceError, SurfaceHandle};

const URL_SCHEME: &str = "file://";

/// Writes and deletes use blocking `std::fs` calls under the engine lock; keep
/// the directory on a local filesystem.
#[derive(Debug)]
pub struct FileSurface {
    root: PathBuf,
}

impl FileSurface {
    /// Initialise the surface rooted at `root`, creating the directory if necessary.
    pub fn new(root: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&root)?;
        let root = std::fs::canonicalize(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a handle back to the file it names, refusing paths outside the root.
    pub fn path_for(&self, handle: &SurfaceHandle) -> Option<PathBuf> {
        let path = Path::new(handle.url().strip_prefix(URL_SCHEME)?);
        let file_name = path.file_name()?;
        let escapes = path
            .components()
            .any(|component| matches!(component, Component::ParentDir));
        if escapes || path.parent() != Some(self.root.as_path()) {
            return None;
        }
        Some(self.root.join(file_name))
    }
}

impl DisplaySurface for FileSurface {
    fn publish(&mut self, artifact: &RenderedArtifact) -> Result<SurfaceHandle, SurfaceError> {
        let path = self.root.join(format!("preview-{}.html", Uuid::new_v4()));
        std::fs::write(&path, artifact.document())?;
        Ok(SurfaceHandle::new(format!("{URL_SCHEME}{}", path.display())))
    }

    fn release(&mut self, handle: &SurfaceHandle) {
        let Some(path) = self.path_for(handle) else {
            warn!(
                target: "devguide::preview",
                url = %handle,
                "Refusing to release artifact outside preview directory"
            );
            return;
        };

        match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => warn!(
                target: "devguide::preview",
                path = %path.display(),
                error = %err,
                "Failed to remove superseded preview"
            ),
        }
    }
}
