//! Custom feeds: list, creation, navigation and preview.

mod list;
pub mod nav;
pub mod preview;

pub use list::{
    create_feed, feed_list_key, Feed, FeedFlags, FeedList, CREATE_FEED_MUTATION, FEED_LIST_QUERY,
};
pub use nav::{
    feed_filters_action, selected_tab, should_render_nav, url_to_tab, FeedFiltersAction, FeedNavTab,
    NavTab, Route,
};
pub use preview::{feed_preview_key, is_preview_feed_enabled, FeedPreview, FeedSettings};
