//! Feedline - cached GraphQL data layer for feed clients
//!
//! Paginated, cached queries over the feed API with the derived UI state
//! built on top of them: squad public access status, moderation queues,
//! custom feed navigation, Plus checkout routing.

pub mod config;
pub mod context;
pub mod feeds;
pub mod func;
pub mod graphql;
pub mod labels;
pub mod layout;
pub mod notify;
pub mod number_format;
pub mod plus;
pub mod query;
pub mod squads;
pub mod utils;

pub use context::{ClientContext, LoggedUser};
