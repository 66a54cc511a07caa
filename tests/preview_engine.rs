use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use devguide::application::preview::{
    DisplaySurface, HEAD_CLOSE_MARKER, LivePreviewEngine, PreviewConfig, PreviewState,
    RenderedArtifact, SurfaceError, SurfaceHandle, compose_document,
};
use devguide::application::site::{PageElements, SiteApp, SiteConfig};
use devguide::domain::navigation::LinkAction;
use devguide::domain::sources::SandboxSources;
use tokio::{runtime::Handle, time::Instant};

#[derive(Clone, Default)]
struct RecordingSurface {
    published: Arc<Mutex<Vec<(Instant, String)>>>,
    released: Arc<Mutex<Vec<String>>>,
}

impl RecordingSurface {
    fn published(&self) -> Vec<(Instant, String)> {
        self.published.lock().expect("published lock").clone()
    }

    fn released(&self) -> Vec<String> {
        self.released.lock().expect("released lock").clone()
    }
}

impl DisplaySurface for RecordingSurface {
    fn publish(&mut self, artifact: &RenderedArtifact) -> Result<SurfaceHandle, SurfaceError> {
        let mut published = self.published.lock().expect("published lock");
        published.push((Instant::now(), artifact.document().to_string()));
        Ok(SurfaceHandle::new(format!("recording://{}", published.len())))
    }

    fn release(&mut self, handle: &SurfaceHandle) {
        self.released
            .lock()
            .expect("released lock")
            .push(handle.url().to_string());
    }
}

fn engine(seed: SandboxSources) -> (LivePreviewEngine, RecordingSurface) {
    let surface = RecordingSurface::default();
    let engine = LivePreviewEngine::new(
        seed,
        surface.clone(),
        PreviewConfig::default(),
        Handle::current(),
    );
    (engine, surface)
}

async fn sleep_ms(millis: u64) {
    tokio::time::sleep(Duration::from_millis(millis)).await;
}

#[tokio::test(start_paused = true)]
async fn edit_burst_renders_once_after_quiet_period() {
    let (engine, surface) = engine(SandboxSources::new("<head></head>", ""));
    let start = Instant::now();

    engine.set_markup("<head></head><p>a</p>");
    sleep_ms(100).await;
    engine.set_markup("<head></head><p>ab</p>");
    sleep_ms(100).await;
    engine.set_style("p{color:red}");
    sleep_ms(250).await;
    engine.set_markup("<head></head><p>abc</p>");
    assert_eq!(engine.state(), PreviewState::PendingRender);

    sleep_ms(499).await;
    assert!(surface.published().is_empty());

    sleep_ms(2).await;
    let published = surface.published();
    assert_eq!(published.len(), 1);

    let (rendered_at, document) = &published[0];
    assert_eq!(rendered_at.duration_since(start), Duration::from_millis(950));
    assert_eq!(
        document,
        compose_document("<head></head><p>abc</p>", "p{color:red}").document()
    );
    assert_eq!(engine.state(), PreviewState::Idle);
}

#[tokio::test(start_paused = true)]
async fn rescheduling_without_edits_restarts_quiet_period() {
    let (engine, surface) = engine(SandboxSources::new("<head></head>", "p{}"));
    let start = Instant::now();

    engine.schedule_render();
    sleep_ms(300).await;
    engine.schedule_render();
    assert_eq!(engine.state(), PreviewState::PendingRender);

    sleep_ms(499).await;
    assert!(surface.published().is_empty());

    sleep_ms(2).await;
    let published = surface.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].0.duration_since(start), Duration::from_millis(800));
    assert_eq!(published[0].1, "<head><style>p{}</style></head>");
    assert_eq!(engine.state(), PreviewState::Idle);

    sleep_ms(1_000).await;
    assert_eq!(surface.published().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn explicit_render_cancels_pending_timer() {
    let (engine, surface) = engine(SandboxSources::new("<head></head>", ""));

    engine.set_style("h1{}");
    assert_eq!(engine.state(), PreviewState::PendingRender);

    engine.render_now().expect("explicit render");
    assert_eq!(engine.state(), PreviewState::Idle);

    sleep_ms(2_000).await;
    let published = surface.published();
    assert_eq!(published.len(), 1);
    assert_eq!(
        published[0].1,
        "<head><style>h1{}</style></head>".to_string()
    );
}

#[tokio::test(start_paused = true)]
async fn debounced_render_releases_previous_artifact() {
    let (engine, surface) = engine(SandboxSources::default_template());

    let first = engine.render_now().expect("first render");
    engine.set_style("body{margin:0}");
    sleep_ms(600).await;

    let current = engine.current_handle().expect("current handle");
    assert_ne!(current, first);
    assert_eq!(surface.released(), vec![first.url().to_string()]);
    assert_eq!(engine.render_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn dropped_engine_never_renders_pending_edit() {
    let (engine, surface) = engine(SandboxSources::default_template());

    engine.set_markup("<head></head>");
    drop(engine);

    sleep_ms(1_000).await;
    assert!(surface.published().is_empty());
}

#[test]
fn style_lands_before_first_head_close() {
    let markup = "<html><head><title>x</title></head><body></head></body></html>";
    let document = compose_document(markup, "a{}");

    let marker = markup.find(HEAD_CLOSE_MARKER).expect("marker");
    let expected = format!(
        "{}<style>a{{}}</style>{}",
        &markup[..marker],
        &markup[marker..]
    );
    assert_eq!(document.document(), expected);
    assert_eq!(document.document().matches("<style>").count(), 1);
}

#[test]
fn markup_without_head_close_is_unchanged() {
    for markup in ["", "<p>hi</p>", "<HTML><HEAD></HEAD></HTML>", "</head"] {
        let document = compose_document(markup, "p{color:blue}");
        assert_eq!(document.document(), markup);
    }
}

#[test]
fn style_text_is_inserted_verbatim() {
    let style = "a::after{content:\"$& </style>\"}";
    let document = compose_document("<head></head>", style);

    assert_eq!(
        document.document(),
        format!("<head><style>{style}</style></head>")
    );
    assert_eq!(document.content_type(), "text/html");
}

#[tokio::test]
async fn declined_clear_issues_no_render() {
    let surface = RecordingSurface::default();
    let site = SiteApp::build(
        PageElements {
            sandbox: Some(SandboxSources::example()),
            ..PageElements::default()
        },
        surface.clone(),
        SiteConfig::default(),
        Handle::current(),
    );
    assert_eq!(surface.published().len(), 1);

    assert!(!site.clear_code(&false));

    let engine = site.sandbox().expect("sandbox");
    assert_eq!(engine.sources(), SandboxSources::example());
    assert_eq!(surface.published().len(), 1);
}

#[tokio::test]
async fn confirmed_clear_renders_blank_template() {
    let surface = RecordingSurface::default();
    let site = SiteApp::build(
        PageElements {
            sandbox: Some(SandboxSources::example()),
            ..PageElements::default()
        },
        surface.clone(),
        SiteConfig::default(),
        Handle::current(),
    );

    assert!(site.clear_code(&true));

    let published = surface.published();
    assert_eq!(published.len(), 2);
    assert!(published[1].1.contains("<title>My Website</title>"));
    assert!(published[1].1.contains("<style></style></head>"));
}

#[tokio::test]
async fn page_without_sandbox_ignores_editor_actions() {
    let surface = RecordingSurface::default();
    let site = SiteApp::build(
        PageElements {
            menu: true,
            ..PageElements::default()
        },
        surface.clone(),
        SiteConfig::default(),
        Handle::current(),
    );

    site.run_code();
    site.load_example();
    site.markup_edited("<head></head>");
    site.style_edited("p{}");
    assert!(!site.clear_code(&true));

    assert!(site.sandbox().is_none());
    assert!(surface.published().is_empty());
}

#[tokio::test]
async fn navigation_state_follows_page_events() {
    let mut site = SiteApp::build(
        PageElements {
            menu: true,
            header: true,
            anchors: vec!["about".to_string(), "contact".to_string()],
            ..PageElements::default()
        },
        RecordingSurface::default(),
        SiteConfig::default(),
        Handle::current(),
    );

    assert!(site.toggle_menu());
    site.nav_link_clicked();
    assert!(!site.menu_open());

    site.on_scroll(100.0);
    assert!(!site.header_scrolled());
    site.on_scroll(100.5);
    assert!(site.header_scrolled());
    site.on_scroll(0.0);
    assert!(!site.header_scrolled());

    assert_eq!(
        site.link_clicked("#about"),
        LinkAction::SmoothScroll {
            target: "about".to_string()
        }
    );
    assert_eq!(site.link_clicked("#missing"), LinkAction::Suppressed);
    assert_eq!(site.link_clicked("blog.html"), LinkAction::PassThrough);
}
