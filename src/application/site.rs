//! Composition root for one page of the guide.
//!
//! Each component exists only when the page carries the elements it drives.
//! Operations aimed at an absent component do nothing.

use tokio::runtime::Handle;
use tracing::{debug, info};

use super::contact::{ContactConfig, ContactFormHandler, SubmitOutcome};
use super::preview::{ConfirmationGate, DisplaySurface, LivePreviewEngine, PreviewConfig};
use super::status::StatusBoard;
use crate::domain::contact::{ContactFields, ValidationError};
use crate::domain::navigation::{
    AnchorScroller, DEFAULT_SCROLL_THRESHOLD, LinkAction, NavigationMenu, ScrollStyler,
};
use crate::domain::sources::SandboxSources;

/// Elements found on the page at startup.
#[derive(Debug, Clone, Default)]
pub struct PageElements {
    /// Hamburger button and navigation list.
    pub menu: bool,
    /// Banner header restyled on scroll.
    pub header: bool,
    /// Ids of sections reachable through `#id` links.
    pub anchors: Vec<String>,
    /// Initial contents of the HTML and CSS editors on the sandbox page.
    pub sandbox: Option<SandboxSources>,
    /// Contact form with its status area.
    pub contact_form: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct SiteConfig {
    pub preview: PreviewConfig,
    pub contact: ContactConfig,
    pub scroll_threshold: f64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            preview: PreviewConfig::default(),
            contact: ContactConfig::default(),
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
        }
    }
}

impl From<&crate::config::Settings> for SiteConfig {
    fn from(settings: &crate::config::Settings) -> Self {
        Self {
            preview: PreviewConfig::from(&settings.preview),
            contact: ContactConfig::from(&settings.contact),
            scroll_threshold: settings.navigation.scroll_threshold,
        }
    }
}

pub struct SiteApp {
    menu: Option<NavigationMenu>,
    header: Option<ScrollStyler>,
    anchors: AnchorScroller,
    sandbox: Option<LivePreviewEngine>,
    contact: Option<ContactFormHandler>,
}

impl SiteApp {
    /// Wire the components present in `elements`.
    ///
    /// A sandbox page renders its seeded sources once during startup.
    pub fn build<S>(elements: PageElements, surface: S, config: SiteConfig, runtime: Handle) -> Self
    where
        S: DisplaySurface,
    {
        let PageElements {
            menu,
            header,
            anchors,
            sandbox,
            contact_form,
        } = elements;

        let sandbox = sandbox.map(|seed| {
            let engine = LivePreviewEngine::new(seed, surface, config.preview, runtime.clone());
            engine.render_now();
            engine
        });

        let contact = contact_form.then(|| {
            ContactFormHandler::new(config.contact, StatusBoard::new(runtime.clone()))
        });

        info!(
            target: "devguide::site",
            menu,
            header,
            anchors = anchors.len(),
            sandbox = sandbox.is_some(),
            contact = contact.is_some(),
            "Page components wired"
        );

        Self {
            menu: menu.then(NavigationMenu::new),
            header: header.then(|| ScrollStyler::new(config.scroll_threshold)),
            anchors: AnchorScroller::new(anchors),
            sandbox,
            contact,
        }
    }

    /// "Run" button.
    pub fn run_code(&self) {
        if let Some(engine) = &self.sandbox {
            engine.render_now();
        }
    }

    /// "Clear" button. Returns whether the sandbox was reset.
    pub fn clear_code(&self, gate: &dyn ConfirmationGate) -> bool {
        self.sandbox
            .as_ref()
            .is_some_and(|engine| engine.reset_to_default(gate))
    }

    /// "Load example" button.
    pub fn load_example(&self) {
        if let Some(engine) = &self.sandbox {
            engine.load_example();
        }
    }

    /// Input event from the HTML editor.
    pub fn markup_edited(&self, text: impl Into<String>) {
        if let Some(engine) = &self.sandbox {
            engine.set_markup(text);
        }
    }

    /// Input event from the CSS editor.
    pub fn style_edited(&self, text: impl Into<String>) {
        if let Some(engine) = &self.sandbox {
            engine.set_style(text);
        }
    }

    /// Hamburger click. Returns whether the menu is now open.
    pub fn toggle_menu(&mut self) -> bool {
        self.menu.as_mut().is_some_and(NavigationMenu::toggle_open)
    }

    /// Click on a navigation link: the mobile menu collapses.
    pub fn nav_link_clicked(&mut self) {
        if let Some(menu) = self.menu.as_mut() {
            menu.close();
        }
    }

    pub fn on_scroll(&mut self, scroll_y: f64) {
        let Some(header) = self.header.as_mut() else {
            return;
        };
        if header.observe(scroll_y) {
            debug!(target: "devguide::site", scrolled = header.is_scrolled(), "Header style changed");
        }
    }

    pub fn link_clicked(&self, href: &str) -> LinkAction {
        self.anchors.resolve(href)
    }

    /// Submit the contact form; `None` when the page has no form.
    pub async fn submit_contact(
        &self,
        fields: ContactFields,
    ) -> Option<Result<SubmitOutcome, ValidationError>> {
        match &self.contact {
            Some(contact) => Some(contact.submit(fields).await),
            None => None,
        }
    }

    pub fn sandbox(&self) -> Option<&LivePreviewEngine> {
        self.sandbox.as_ref()
    }

    pub fn contact(&self) -> Option<&ContactFormHandler> {
        self.contact.as_ref()
    }

    pub fn menu_open(&self) -> bool {
        self.menu.as_ref().is_some_and(NavigationMenu::is_open)
    }

    pub fn header_scrolled(&self) -> bool {
        self.header.as_ref().is_some_and(ScrollStyler::is_scrolled)
    }
}
