use std::{
    sync::{Arc, Mutex, MutexGuard, Weak},
    time::Duration,
};

use metrics::counter;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use super::debounce::{DEFAULT_QUIET_PERIOD, DebounceScheduler, PreviewState};
use super::render::compose_document;
use super::surface::{DisplaySurface, SurfaceHandle};
use crate::domain::sources::{MarkupSource, SandboxSources, StyleSource};
use crate::util::lock::mutex_lock;

const SOURCE: &str = "application::preview::engine";

/// Question asked before the sandbox is cleared.
pub const CLEAR_PROMPT: &str = "Are you sure you want to clear all code?";

/// Yes/no decision gate consulted by destructive actions.
pub trait ConfirmationGate {
    fn confirm(&self, prompt: &str) -> bool;
}

impl ConfirmationGate for bool {
    fn confirm(&self, _prompt: &str) -> bool {
        *self
    }
}

impl<F> ConfirmationGate for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PreviewConfig {
    pub quiet_period: Duration,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            quiet_period: DEFAULT_QUIET_PERIOD,
        }
    }
}

impl From<&crate::config::PreviewSettings> for PreviewConfig {
    fn from(settings: &crate::config::PreviewSettings) -> Self {
        Self {
            quiet_period: settings.debounce,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RenderTrigger {
    Explicit,
    Debounced,
}

impl RenderTrigger {
    fn as_str(self) -> &'static str {
        match self {
            RenderTrigger::Explicit => "explicit",
            RenderTrigger::Debounced => "debounced",
        }
    }
}

/// Keeps a preview surface in sync with the markup and style editors.
///
/// Edits are coalesced by a [`DebounceScheduler`]; explicit triggers render
/// immediately and cancel whatever was pending. Each render publishes a new
/// artifact and releases the one it replaces. Clones share the same state.
#[derive(Clone)]
pub struct LivePreviewEngine {
    inner: Arc<Mutex<EngineInner>>,
}

struct EngineInner {
    sources: SandboxSources,
    scheduler: DebounceScheduler,
    surface: Box<dyn DisplaySurface>,
    current: Option<SurfaceHandle>,
    render_count: u64,
}

impl LivePreviewEngine {
    /// Build an engine seeded with the editors' initial contents.
    ///
    /// Nothing is rendered until the first edit or explicit trigger. Timers
    /// are spawned on `runtime`.
    pub fn new<S>(seed: SandboxSources, surface: S, config: PreviewConfig, runtime: Handle) -> Self
    where
        S: DisplaySurface,
    {
        let inner = EngineInner {
            sources: seed,
            scheduler: DebounceScheduler::new(config.quiet_period, runtime),
            surface: Box::new(surface),
            current: None,
            render_count: 0,
        };

        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    /// Replace the markup buffer and schedule a debounced render.
    pub fn set_markup(&self, text: impl Into<String>) {
        let mut inner = self.lock("set_markup");
        inner.sources.markup = MarkupSource::new(text);
        self.schedule_locked(&mut inner);
    }

    /// Replace the style buffer and schedule a debounced render.
    pub fn set_style(&self, text: impl Into<String>) {
        let mut inner = self.lock("set_style");
        inner.sources.style = StyleSource::new(text);
        self.schedule_locked(&mut inner);
    }

    /// Arm the quiet-period timer, cancelling any timer already armed.
    pub fn schedule_render(&self) {
        let mut inner = self.lock("schedule_render");
        self.schedule_locked(&mut inner);
    }

    /// Render the current buffers immediately.
    ///
    /// Cancels a pending debounced render. Returns the new handle, or `None`
    /// when the surface refused the artifact and the previous one stays live.
    pub fn render_now(&self) -> Option<SurfaceHandle> {
        let mut inner = self.lock("render_now");
        if inner.scheduler.cancel() {
            counter!("devguide_preview_debounce_cancel_total").increment(1);
            debug!(target: "devguide::preview", "pending render superseded by explicit render");
        }
        inner.render(RenderTrigger::Explicit)
    }

    /// Restore the blank template after the gate confirms.
    ///
    /// Returns `false`, leaving the buffers untouched and rendering nothing,
    /// when the gate declines.
    pub fn reset_to_default(&self, gate: &dyn ConfirmationGate) -> bool {
        if !gate.confirm(CLEAR_PROMPT) {
            debug!(target: "devguide::preview", "clear declined");
            return false;
        }

        self.replace_sources(SandboxSources::default_template(), "reset_to_default");
        true
    }

    /// Load the bundled card example and render it.
    pub fn load_example(&self) -> Option<SurfaceHandle> {
        self.replace_sources(SandboxSources::example(), "load_example")
    }

    pub fn state(&self) -> PreviewState {
        self.lock("state").scheduler.state()
    }

    pub fn sources(&self) -> SandboxSources {
        self.lock("sources").sources.clone()
    }

    pub fn markup(&self) -> String {
        self.lock("markup").sources.markup.as_str().to_string()
    }

    pub fn style(&self) -> String {
        self.lock("style").sources.style.as_str().to_string()
    }

    /// Handle of the artifact currently shown, if any render succeeded.
    pub fn current_handle(&self) -> Option<SurfaceHandle> {
        self.lock("current_handle").current.clone()
    }

    /// Number of artifacts published so far.
    pub fn render_count(&self) -> u64 {
        self.lock("render_count").render_count
    }

    fn replace_sources(&self, sources: SandboxSources, op: &'static str) -> Option<SurfaceHandle> {
        let mut inner = self.lock(op);
        inner.sources = sources;
        inner.scheduler.cancel();
        inner.render(RenderTrigger::Explicit)
    }

    fn schedule_locked(&self, inner: &mut EngineInner) {
        let weak = Arc::downgrade(&self.inner);
        let cancelled = inner
            .scheduler
            .arm(move |generation| render_if_current(&weak, generation));

        if cancelled {
            counter!("devguide_preview_debounce_cancel_total").increment(1);
        }
    }

    fn lock(&self, op: &'static str) -> MutexGuard<'_, EngineInner> {
        mutex_lock(&self.inner, SOURCE, op)
    }
}

fn render_if_current(engine: &Weak<Mutex<EngineInner>>, generation: u64) {
    let Some(inner) = engine.upgrade() else {
        return;
    };

    let mut inner = mutex_lock(&inner, SOURCE, "debounce_elapsed");
    if inner.scheduler.complete(generation) {
        inner.render(RenderTrigger::Debounced);
    }
}

impl EngineInner {
    fn render(&mut self, trigger: RenderTrigger) -> Option<SurfaceHandle> {
        let artifact = compose_document(self.sources.markup.as_str(), self.sources.style.as_str());

        let handle = match self.surface.publish(&artifact) {
            Ok(handle) => handle,
            Err(err) => {
                warn!(
                    target: "devguide::preview",
                    trigger = trigger.as_str(),
                    error = %err,
                    "Preview publish failed; keeping previous artifact"
                );
                return None;
            }
        };

        if let Some(previous) = self.current.replace(handle.clone()) {
            self.surface.release(&previous);
        }
        self.render_count += 1;

        counter!("devguide_preview_render_total", "trigger" => trigger.as_str()).increment(1);
        info!(
            target: "devguide::preview",
            trigger = trigger.as_str(),
            url = %handle,
            bytes = artifact.len(),
            render = self.render_count,
            "Preview published"
        );

        Some(handle)
    }
}

impl Drop for EngineInner {
    fn drop(&mut self) {
        self.scheduler.cancel();
        if let Some(handle) = self.current.take() {
            self.surface.release(&handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::preview::surface::{BlobSurface, SurfaceError};
    use crate::application::preview::render::RenderedArtifact;

    fn engine_with(seed: SandboxSources) -> (LivePreviewEngine, BlobSurface) {
        let surface = BlobSurface::new();
        let engine = LivePreviewEngine::new(
            seed,
            surface.clone(),
            PreviewConfig::default(),
            Handle::current(),
        );
        (engine, surface)
    }

    #[tokio::test]
    async fn repeated_renders_produce_identical_documents() {
        let (engine, surface) = engine_with(SandboxSources::new("<head></head>", "p{}"));

        let first = engine.render_now().expect("first render");
        let first_doc = surface.resolve(first.url()).expect("first document");
        let second = engine.render_now().expect("second render");
        let second_doc = surface.resolve(second.url()).expect("second document");

        assert_ne!(first, second);
        assert_eq!(first_doc, second_doc);
    }

    #[tokio::test]
    async fn superseded_artifacts_are_released() {
        let (engine, surface) = engine_with(SandboxSources::default_template());

        let mut previous = None;
        for _ in 0..25 {
            let handle = engine.render_now().expect("render");
            if let Some(old) = previous.replace(handle.clone()) {
                assert_eq!(surface.resolve(old.url()), None);
            }
            assert_eq!(surface.live_count(), 1);
        }
        assert_eq!(engine.render_count(), 25);
    }

    #[tokio::test]
    async fn dropping_engine_releases_current_artifact() {
        let (engine, surface) = engine_with(SandboxSources::default_template());
        engine.render_now().expect("render");
        assert_eq!(surface.live_count(), 1);

        drop(engine);
        assert_eq!(surface.live_count(), 0);
    }

    #[tokio::test]
    async fn declined_reset_changes_nothing() {
        let (engine, surface) = engine_with(SandboxSources::new("<head></head>", "h1{}"));

        assert!(!engine.reset_to_default(&false));
        assert_eq!(engine.markup(), "<head></head>");
        assert_eq!(engine.style(), "h1{}");
        assert_eq!(engine.render_count(), 0);
        assert_eq!(surface.live_count(), 0);
    }

    #[tokio::test]
    async fn confirmed_reset_installs_template_and_renders() {
        let (engine, surface) = engine_with(SandboxSources::example());
        let asked = std::cell::Cell::new(None);
        let gate = |prompt: &str| {
            asked.set(Some(prompt.to_string()));
            true
        };

        assert!(engine.reset_to_default(&gate));
        assert_eq!(asked.take().as_deref(), Some(CLEAR_PROMPT));
        assert_eq!(engine.sources(), SandboxSources::default_template());

        let handle = engine.current_handle().expect("rendered");
        let document = surface.resolve(handle.url()).expect("document");
        assert!(document.contains("<style></style></head>"));
    }

    #[tokio::test]
    async fn load_example_renders_card() {
        let (engine, surface) = engine_with(SandboxSources::default());

        let handle = engine.load_example().expect("rendered");
        let document = surface.resolve(handle.url()).expect("document");
        assert!(document.contains("<style>body {"));
        assert!(document.contains(r#"<div class="card">"#));
        assert_eq!(engine.state(), PreviewState::Idle);
    }

    struct FailingSurface;

    impl DisplaySurface for FailingSurface {
        fn publish(&mut self, _: &RenderedArtifact) -> Result<SurfaceHandle, SurfaceError> {
            Err(SurfaceError::rejected("surface offline"))
        }

        fn release(&mut self, _: &SurfaceHandle) {}
    }

    #[tokio::test]
    async fn publish_failure_keeps_engine_usable() {
        let engine = LivePreviewEngine::new(
            SandboxSources::default_template(),
            FailingSurface,
            PreviewConfig::default(),
            Handle::current(),
        );

        assert_eq!(engine.render_now(), None);
        assert_eq!(engine.render_count(), 0);
        engine.set_style("p{}");
        assert_eq!(engine.state(), PreviewState::PendingRender);
    }
}
