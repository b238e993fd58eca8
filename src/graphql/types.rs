//! Relay-style connection types returned by the GraphQL API.

use serde::{Deserialize, Serialize};

/// A single edge in a connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

/// Pagination flags for a connection page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

/// One page of a paginated list, in server order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
    #[serde(default)]
    pub page_info: PageInfo,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self {
            edges: Vec::new(),
            page_info: PageInfo::default(),
        }
    }
}

impl<T> Connection<T> {
    /// Build a connection from nodes and page flags.
    pub fn new(nodes: Vec<T>, page_info: PageInfo) -> Self {
        Self {
            edges: nodes.into_iter().map(|node| Edge { node }).collect(),
            page_info,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|edge| &edge.node)
    }

    /// Last node of this page.
    pub fn last_node(&self) -> Option<&T> {
        self.edges.last().map(|edge| &edge.node)
    }
}

/// Cursor for the page after `page_info`, if the server reports one.
pub fn get_next_page_param(page_info: Option<&PageInfo>) -> Option<String> {
    let page_info = page_info?;
    if page_info.has_next_page {
        page_info.end_cursor.clone()
    } else {
        None
    }
}
