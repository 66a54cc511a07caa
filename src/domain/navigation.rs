//! Page chrome state: mobile menu, header scroll styling and in-page anchors.

use std::collections::BTreeSet;

/// Scroll offset (in CSS pixels) past which the header is styled as scrolled.
pub const DEFAULT_SCROLL_THRESHOLD: f64 = 100.0;

/// Open/closed state of the hamburger menu.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationMenu {
    open: bool,
}

impl NavigationMenu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the menu and return the new state.
    pub fn toggle_open(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Collapse the menu, e.g. after a navigation link was followed.
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Class toggled on both the hamburger button and the menu list.
    pub fn active_class(&self) -> Option<&'static str> {
        self.open.then_some("active")
    }
}

/// Tracks whether the header carries the `scrolled` class.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollStyler {
    threshold: f64,
    scrolled: bool,
}

impl ScrollStyler {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            scrolled: false,
        }
    }

    /// Record a scroll position; returns `true` when the header class changed.
    pub fn observe(&mut self, scroll_y: f64) -> bool {
        let scrolled = scroll_y > self.threshold;
        let changed = scrolled != self.scrolled;
        self.scrolled = scrolled;
        changed
    }

    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    pub fn header_class(&self) -> Option<&'static str> {
        self.scrolled.then_some("scrolled")
    }
}

impl Default for ScrollStyler {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLL_THRESHOLD)
    }
}

/// What happens when a link is clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkAction {
    /// Not an in-page anchor; the browser follows it normally.
    PassThrough,
    /// Default navigation is suppressed and the target section is scrolled into view.
    SmoothScroll { target: String },
    /// In-page anchor whose target does not exist; default navigation is suppressed.
    Suppressed,
}

/// Resolves `#id` links against the sections present on the page.
#[derive(Debug, Clone, Default)]
pub struct AnchorScroller {
    targets: BTreeSet<String>,
}

impl AnchorScroller {
    pub fn new<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
        }
    }

    pub fn resolve(&self, href: &str) -> LinkAction {
        let Some(id) = href.strip_prefix('#') else {
            return LinkAction::PassThrough;
        };

        if self.targets.contains(id) {
            LinkAction::SmoothScroll {
                target: id.to_string(),
            }
        } else {
            LinkAction::Suppressed
        }
    }
}
