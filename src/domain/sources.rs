//! Editable sandbox sources.

use super::templates::{DEFAULT_MARKUP, DEFAULT_STYLE, EXAMPLE_MARKUP, EXAMPLE_STYLE};

/// Document markup typed into the HTML editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkupSource(String);

impl MarkupSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Style rules typed into the CSS editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSource(String);

impl StyleSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Both editor buffers of the sandbox page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SandboxSources {
    pub markup: MarkupSource,
    pub style: StyleSource,
}

impl SandboxSources {
    pub fn new(markup: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            markup: MarkupSource::new(markup),
            style: StyleSource::new(style),
        }
    }

    /// Blank document with no style rules.
    pub fn default_template() -> Self {
        Self::new(DEFAULT_MARKUP, DEFAULT_STYLE)
    }

    /// The "card" example shipped with the guide.
    pub fn example() -> Self {
        Self::new(EXAMPLE_MARKUP, EXAMPLE_STYLE)
    }
}
