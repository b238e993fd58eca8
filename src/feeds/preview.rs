//! Live preview shown while building a new feed.

use serde::{Deserialize, Serialize};

use crate::context::ClientContext;
use crate::query::{generate_query_key, QueryKey, RequestKey};

/// Tag filters of a feed being edited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedSettings {
    #[serde(default)]
    pub include_tags: Vec<String>,
    #[serde(default)]
    pub block_tags: Vec<String>,
    #[serde(default)]
    pub include_sources: Vec<String>,
    #[serde(default)]
    pub exclude_sources: Vec<String>,
}

/// Preview needs at least one followed tag.
pub fn is_preview_feed_enabled(settings: Option<&FeedSettings>) -> bool {
    settings.is_some_and(|settings| !settings.include_tags.is_empty())
}

/// Cache key of the preview feed for the context's user.
pub fn feed_preview_key(ctx: &ClientContext) -> QueryKey {
    generate_query_key(RequestKey::FeedPreview, ctx.user(), &[])
}

/// Show/hide state of the preview panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedPreview {
    visible: bool,
}

impl FeedPreview {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    /// The preview feed renders only when enabled and toggled on.
    pub fn is_shown(&self, enabled: bool) -> bool {
        enabled && self.visible
    }

    /// Text of the toggle button.
    pub fn button_label(&self, enabled: bool) -> &'static str {
        match (enabled, self.visible) {
            (false, _) => "Select tags to show feed preview",
            (true, true) => "Hide feed preview",
            (true, false) => "Show feed preview",
        }
    }

    /// Leaving the page with tags picked but unsaved asks for confirmation.
    pub fn needs_exit_confirmation(enabled: bool) -> bool {
        enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(tags: &[&str]) -> FeedSettings {
        FeedSettings {
            include_tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_preview_requires_a_tag() {
        assert!(!is_preview_feed_enabled(None));
        assert!(!is_preview_feed_enabled(Some(&settings(&[]))));
        assert!(is_preview_feed_enabled(Some(&settings(&["rust"]))));
    }

    #[test]
    fn test_toggle_and_labels() {
        let mut preview = FeedPreview::new();
        assert_eq!(preview.button_label(false), "Select tags to show feed preview");
        assert_eq!(preview.button_label(true), "Show feed preview");
        assert!(!preview.is_shown(true));

        preview.toggle();
        assert_eq!(preview.button_label(true), "Hide feed preview");
        assert!(preview.is_shown(true));
        assert!(!preview.is_shown(false));
    }

    #[test]
    fn test_exit_confirmation_only_with_tags() {
        assert!(FeedPreview::needs_exit_confirmation(true));
        assert!(!FeedPreview::needs_exit_confirmation(false));
    }
}
