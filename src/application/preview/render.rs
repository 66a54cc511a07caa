//! Composition of the preview document.

/// Marker in front of which the style block is injected.
pub const HEAD_CLOSE_MARKER: &str = "</head>";

const STYLE_OPEN: &str = "<style>";
const STYLE_CLOSE: &str = "</style>";

/// Self-contained document handed to a display surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    document: String,
}

impl RenderedArtifact {
    pub const CONTENT_TYPE: &'static str = "text/html";

    pub fn new(document: String) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn content_type(&self) -> &'static str {
        Self::CONTENT_TYPE
    }

    pub fn len(&self) -> usize {
        self.document.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document.is_empty()
    }
}

/// Inject `style` as a `<style>` block right before the first `</head>`.
///
/// Markup without a `</head>` marker is returned untouched and the style is
/// dropped. Neither input is inspected or escaped.
pub fn compose_document(markup: &str, style: &str) -> RenderedArtifact {
    let Some(index) = markup.find(HEAD_CLOSE_MARKER) else {
        return RenderedArtifact::new(markup.to_string());
    };

    let mut document =
        String::with_capacity(markup.len() + style.len() + STYLE_OPEN.len() + STYLE_CLOSE.len());
    document.push_str(&markup[..index]);
    document.push_str(STYLE_OPEN);
    document.push_str(style);
    document.push_str(STYLE_CLOSE);
    document.push_str(&markup[index..]);

    RenderedArtifact::new(document)
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;
    use crate::domain::sources::SandboxSources;

    #[test]
    fn style_lands_before_head_close() {
        let artifact = compose_document(
            "<html><head><title>t</title></head><body></body></html>",
            "p{color:red}",
        );
        assert_snapshot!(
            artifact.document(),
            @"<html><head><title>t</title><style>p{color:red}</style></head><body></body></html>"
        );
    }

    #[test]
    fn only_first_marker_receives_style() {
        let markup = "<head></head><template><head></head></template>";
        let artifact = compose_document(markup, "a{}");
        assert_eq!(
            artifact.document(),
            "<head><style>a{}</style></head><template><head></head></template>"
        );
    }

    #[test]
    fn markup_without_marker_is_unchanged() {
        for markup in ["", "<p>hello</p>", "<HEAD></HEAD><body>", "<head>"] {
            let artifact = compose_document(markup, "body { margin: 0 }");
            assert_eq!(artifact.document(), markup);
        }
    }

    #[test]
    fn empty_sources_render_empty_document() {
        let artifact = compose_document("", "");
        assert!(artifact.is_empty());
        assert_eq!(artifact.content_type(), "text/html");
    }

    #[test]
    fn style_text_is_inserted_verbatim() {
        let artifact = compose_document("<head></head>", "a::after{content:'$&'}");
        assert_eq!(
            artifact.document(),
            "<head><style>a::after{content:'$&'}</style></head>"
        );
    }

    #[test]
    fn example_document_embeds_card_style() {
        let sources = SandboxSources::example();
        let artifact = compose_document(sources.markup.as_str(), sources.style.as_str());

        let style_at = artifact
            .document()
            .find(sources.style.as_str())
            .expect("style present");
        let head_close_at = artifact
            .document()
            .find(HEAD_CLOSE_MARKER)
            .expect("marker present");
        assert!(style_at < head_close_at);
        assert_eq!(
            artifact.len(),
            sources.markup.as_str().len() + sources.style.as_str().len() + 15
        );
    }
}
