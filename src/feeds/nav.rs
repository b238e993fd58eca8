//! Feed navigation tabs.
//!
//! The active tab is whichever tab URL equals the current path.

use super::list::Feed;
use crate::graphql::Connection;

/// Built-in feed tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedNavTab {
    ForYou,
    Popular,
    Bookmarks,
    History,
    MostUpvoted,
    Discussions,
    NewFeed,
}

impl FeedNavTab {
    pub fn label(&self) -> &'static str {
        match self {
            FeedNavTab::ForYou => "For you",
            FeedNavTab::Popular => "Popular",
            FeedNavTab::Bookmarks => "Bookmarks",
            FeedNavTab::History => "History",
            FeedNavTab::MostUpvoted => "Most Upvoted",
            FeedNavTab::Discussions => "Discussions",
            FeedNavTab::NewFeed => "New feed",
        }
    }
}

/// Current router location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    /// Route pattern, e.g. `/feeds/[slugOrId]/edit`.
    pub pathname: String,
    /// Path as shown in the browser, e.g. `/feeds/rust/edit`.
    pub as_path: String,
    /// `slug` route parameter, if any.
    pub slug: Option<String>,
}

/// One navigation tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavTab {
    pub url: String,
    pub label: String,
}

/// Ordered tab list: one entry per URL. A later entry for an existing URL
/// replaces its label but keeps its position.
fn insert_tab(tabs: &mut Vec<NavTab>, url: String, label: String) {
    match tabs.iter_mut().find(|tab| tab.url == url) {
        Some(tab) => tab.label = label,
        None => tabs.push(NavTab { url, label }),
    }
}

/// Tabs in display order: new feed, for you, the user's custom feeds, then
/// the remaining built-in feeds.
///
/// A custom feed being edited links to its edit page so it stays selected.
pub fn url_to_tab(webapp_url: &str, feeds: Option<&Connection<Feed>>, route: &Route) -> Vec<NavTab> {
    let mut tabs = Vec::new();
    let builtin = |tabs: &mut Vec<NavTab>, path: &str, tab: FeedNavTab| {
        insert_tab(tabs, format!("{webapp_url}{path}"), tab.label().to_string());
    };

    builtin(&mut tabs, "feeds/new", FeedNavTab::NewFeed);
    builtin(&mut tabs, "", FeedNavTab::ForYou);

    for feed in feeds.into_iter().flat_map(|feeds| feeds.nodes()) {
        let is_editing_feed =
            route.slug.as_deref() == Some(feed.slug.as_str()) && route.pathname.ends_with("/edit");
        let url = format!(
            "{webapp_url}feeds/{}{}",
            feed.slug,
            if is_editing_feed { "/edit" } else { "" }
        );
        insert_tab(&mut tabs, url, feed.display_name());
    }

    builtin(&mut tabs, "popular", FeedNavTab::Popular);
    builtin(&mut tabs, "upvoted", FeedNavTab::MostUpvoted);
    builtin(&mut tabs, "discussed", FeedNavTab::Discussions);
    builtin(&mut tabs, "bookmarks", FeedNavTab::Bookmarks);
    builtin(&mut tabs, "history", FeedNavTab::History);

    tabs
}

/// Label of the tab whose URL is `as_path`.
pub fn selected_tab<'a>(tabs: &'a [NavTab], as_path: &str) -> Option<&'a str> {
    tabs.iter()
        .find(|tab| tab.url == as_path)
        .map(|tab| tab.label.as_str())
}

/// The feed nav is shown on home-like pages, never on a post page.
pub fn should_render_nav(pathname: &str, home_nav_enabled: bool) -> bool {
    home_nav_enabled && !pathname.starts_with("/posts/[id]")
}

/// Route pattern of a custom feed page.
const CUSTOM_FEED_PATHNAME: &str = "/feeds/[slugOrId]";

/// What the feed filters button does on the mobile header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedFiltersAction {
    /// Replace the current route with this path.
    EditFeed(String),
    /// Open the feed filters modal, kept across route changes.
    OpenFiltersModal,
}

/// A custom feed with a known slug is edited in place; every other feed
/// opens the filters modal.
pub fn feed_filters_action(route: &Route) -> FeedFiltersAction {
    let is_custom_feed = route.pathname.starts_with(CUSTOM_FEED_PATHNAME);
    match route.slug.as_deref() {
        Some(slug) if is_custom_feed && !slug.is_empty() => {
            FeedFiltersAction::EditFeed(format!("/feeds/{slug}/edit"))
        }
        _ => FeedFiltersAction::OpenFiltersModal,
    }
}
