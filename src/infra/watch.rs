//! Polls the sandbox source files and feeds changes into the preview engine.

use std::{path::PathBuf, time::Duration};

use tokio::{fs, task::JoinHandle, time::MissedTickBehavior};
use tracing::{debug, warn};

use crate::application::preview::LivePreviewEngine;

/// Files backing the HTML and CSS editors.
#[derive(Debug, Clone, Default)]
pub struct SourcePaths {
    pub markup: Option<PathBuf>,
    pub style: Option<PathBuf>,
}

impl SourcePaths {
    pub fn is_empty(&self) -> bool {
        self.markup.is_none() && self.style.is_none()
    }
}

struct WatchedFile {
    path: PathBuf,
    last_seen: String,
}

impl WatchedFile {
    /// Read the file and return its contents when they differ from the last read.
    async fn poll(&mut self) -> Option<String> {
        match fs::read_to_string(&self.path).await {
            Ok(text) if text != self.last_seen => {
                self.last_seen.clone_from(&text);
                Some(text)
            }
            Ok(_) => None,
            Err(err) => {
                warn!(
                    target: "devguide::watch",
                    path = %self.path.display(),
                    error = %err,
                    "Failed to read sandbox source"
                );
                None
            }
        }
    }
}

/// Spawn a task that checks both files every `interval`.
///
/// The engine's current buffers count as already seen, so only later file
/// changes produce edits. Each change goes through the debounced path.
pub fn spawn_source_watcher(
    engine: LivePreviewEngine,
    paths: SourcePaths,
    interval: Duration,
) -> JoinHandle<()> {
    let mut markup = paths.markup.map(|path| WatchedFile {
        path,
        last_seen: engine.markup(),
    });
    let mut style = paths.style.map(|path| WatchedFile {
        path,
        last_seen: engine.style(),
    });

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await; // Skip the first immediate tick

        loop {
            ticker.tick().await;

            if let Some(file) = markup.as_mut()
                && let Some(text) = file.poll().await
            {
                debug!(target: "devguide::watch", path = %file.path.display(), "Markup changed");
                engine.set_markup(text);
            }

            if let Some(file) = style.as_mut()
                && let Some(text) = file.poll().await
            {
                debug!(target: "devguide::watch", path = %file.path.display(), "Style changed");
                engine.set_style(text);
            }
        }
    })
}
