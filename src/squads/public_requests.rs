//! Public access requests of a squad.
//!
//! A squad becomes public by submitting a request that moderators approve
//! or reject. The request history is paginated; the squad's
//! [`SquadStatus`] is derived from the most recent request.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::context::ClientContext;
use crate::func::{parse_or_default, ParsedOr};
use crate::graphql::{self, request, Connection, GraphqlClient, GraphqlError, Operation};
use crate::labels::{GENERIC_ERROR, SQUAD_REVIEW_SUBMITTED};
use crate::query::{
    generate_query_key, InfiniteData, InfiniteQuery, InfiniteQueryOptions, PageFetcher,
    QueryResult, RequestKey, Result, StaleTime,
};

pub const PUBLIC_SQUAD_REQUESTS_QUERY: &str = r#"
query PublicSquadRequests($sourceId: String!, $after: String, $first: Int) {
  publicSquadRequests(sourceId: $sourceId, after: $after, first: $first) {
    pageInfo { hasNextPage endCursor }
    edges { node { id sourceId requestorId status createdAt updatedAt } }
  }
}"#;

pub const SUBMIT_SQUAD_FOR_REVIEW_MUTATION: &str = r#"
mutation SubmitSquadForReview($sourceId: String!) {
  submitSquadForReview(sourceId: $sourceId) {
    id sourceId requestorId status createdAt updatedAt
  }
}"#;

/// A rejected squad may resubmit once its latest rejection is this old.
pub const REJECTION_COOL_DOWN_DAYS: i64 = 14;

/// Server-side state of a public access request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicSquadRequestStatus {
    Pending,
    Approved,
    Rejected,
}

/// A public access request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicSquadRequest {
    pub id: String,
    #[serde(default)]
    pub source_id: String,
    #[serde(default)]
    pub requestor_id: Option<String>,
    pub status: PublicSquadRequestStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Client-side public access status of a squad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SquadStatus {
    /// Never submitted, or the last rejection has cooled down.
    InProgress,
    Pending,
    Approved,
    Rejected,
}

impl From<PublicSquadRequestStatus> for SquadStatus {
    fn from(status: PublicSquadRequestStatus) -> Self {
        match status {
            PublicSquadRequestStatus::Pending => SquadStatus::Pending,
            PublicSquadRequestStatus::Approved => SquadStatus::Approved,
            PublicSquadRequestStatus::Rejected => SquadStatus::Rejected,
        }
    }
}

/// Most recent request: the last node of the last non-empty page.
pub fn latest_request(
    requests: Option<&InfiniteData<Connection<PublicSquadRequest>>>,
) -> Option<&PublicSquadRequest> {
    requests?
        .pages
        .iter()
        .rev()
        .find_map(|page| page.last_node())
}

/// Derive the squad status from its latest request as seen at `now`.
///
/// A rejection only counts for [`REJECTION_COOL_DOWN_DAYS`]; after that the
/// squad is back in progress and may resubmit.
pub fn squad_status(latest: Option<&PublicSquadRequest>, now: DateTime<Utc>) -> SquadStatus {
    let Some(request) = latest else {
        return SquadStatus::InProgress;
    };

    match request.status {
        PublicSquadRequestStatus::Rejected => {
            if now - request.created_at < Duration::days(REJECTION_COOL_DOWN_DAYS) {
                SquadStatus::Rejected
            } else {
                SquadStatus::InProgress
            }
        }
        status => status.into(),
    }
}

/// Error payload the API encodes into its error message.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SubmitErrorPayload {
    Message(String),
    Fields(HashMap<String, String>),
}

/// Text to show for a failed submission.
fn submit_error_message(error: &GraphqlError) -> String {
    let parsed = error
        .first_api_message()
        .map(parse_or_default::<SubmitErrorPayload>);

    match parsed {
        Some(ParsedOr::Parsed(SubmitErrorPayload::Message(message))) => message,
        Some(ParsedOr::Parsed(SubmitErrorPayload::Fields(_))) | Some(ParsedOr::Raw(_)) | None => {
            GENERIC_ERROR.to_string()
        }
    }
}

struct RequestsPage {
    graphql: Arc<dyn GraphqlClient>,
    source_id: String,
}

#[async_trait]
impl PageFetcher<PublicSquadRequest> for RequestsPage {
    async fn fetch_page(
        &self,
        cursor: Option<String>,
    ) -> graphql::Result<Connection<PublicSquadRequest>> {
        let operation = Operation::query(
            PUBLIC_SQUAD_REQUESTS_QUERY,
            json!({ "sourceId": self.source_id, "after": cursor }),
        );
        request(self.graphql.as_ref(), operation, "publicSquadRequests").await
    }
}

/// Inputs of [`PublicSquadRequests`].
#[derive(Debug, Clone)]
pub struct PublicSquadRequestsProps {
    pub source_id: String,
    pub is_query_enabled: bool,
}

impl PublicSquadRequestsProps {
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            is_query_enabled: true,
        }
    }

    pub fn with_query_enabled(mut self, enabled: bool) -> Self {
        self.is_query_enabled = enabled;
        self
    }
}

/// Counts one submission in flight for as long as it lives.
struct SubmitGuard<'a>(&'a AtomicUsize);

impl<'a> SubmitGuard<'a> {
    fn start(in_flight: &'a AtomicUsize) -> Self {
        in_flight.fetch_add(1, Ordering::SeqCst);
        Self(in_flight)
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Request history, derived status and review submission for one squad.
pub struct PublicSquadRequests {
    ctx: ClientContext,
    source_id: String,
    query: InfiniteQuery<PublicSquadRequest>,
    submitting: AtomicUsize,
}

impl PublicSquadRequests {
    pub fn new(ctx: &ClientContext, props: PublicSquadRequestsProps) -> Self {
        let key = generate_query_key(
            RequestKey::PublicSquadRequests,
            ctx.user(),
            &[props.source_id.as_str()],
        );
        let fetcher = Arc::new(RequestsPage {
            graphql: ctx.graphql.clone(),
            source_id: props.source_id.clone(),
        });
        let options = InfiniteQueryOptions {
            enabled: props.is_query_enabled && !props.source_id.is_empty(),
            stale_time: StaleTime::Default,
            initial_page_param: None,
        };

        Self {
            ctx: ctx.clone(),
            query: InfiniteQuery::new(ctx.queries.clone(), key, fetcher, options),
            source_id: props.source_id,
            submitting: AtomicUsize::new(0),
        }
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Load the request history (first page, or cached pages).
    pub async fn fetch(&self) -> Result<QueryResult<InfiniteData<Connection<PublicSquadRequest>>>> {
        self.query.fetch().await
    }

    /// Load one more page of history.
    pub async fn fetch_next_page(
        &self,
    ) -> Result<QueryResult<InfiniteData<Connection<PublicSquadRequest>>>> {
        self.query.fetch_next_page().await
    }

    pub async fn has_next_page(&self) -> Result<bool> {
        self.query.has_next_page().await
    }

    /// Load history page by page, at most `max_pages` pages in total.
    ///
    /// Stops early when the server reports no further page or returns an
    /// empty one. Returns the number of cached pages.
    pub async fn fetch_all(&self, max_pages: usize) -> Result<usize> {
        let Some(mut data) = self.fetch().await?.data else {
            return Ok(0);
        };

        while data.pages.len() < max_pages
            && data.has_next_page()
            && data.last_page().is_some_and(|page| !page.is_empty())
        {
            let loaded = data.pages.len();
            match self.fetch_next_page().await?.data {
                Some(next) if next.pages.len() > loaded => data = next,
                _ => break,
            }
        }

        debug!(source_id = %self.source_id, pages = data.pages.len(), "Loaded request history");
        Ok(data.pages.len())
    }

    /// Cached request history.
    pub async fn requests(&self) -> Result<Option<InfiniteData<Connection<PublicSquadRequest>>>> {
        self.query.data().await
    }

    /// True once history has been fetched into the cache.
    pub async fn is_fetched(&self) -> Result<bool> {
        self.query.is_fetched().await
    }

    /// Most recent cached request.
    pub async fn latest_request(&self) -> Result<Option<PublicSquadRequest>> {
        let requests = self.requests().await?;
        Ok(latest_request(requests.as_ref()).cloned())
    }

    /// Squad status as of `now`, from cached history.
    pub async fn status_at(&self, now: DateTime<Utc>) -> Result<SquadStatus> {
        let latest = self.latest_request().await?;
        Ok(squad_status(latest.as_ref(), now))
    }

    /// Squad status as of the current time, from cached history.
    pub async fn status(&self) -> Result<SquadStatus> {
        self.status_at(Utc::now()).await
    }

    /// True while any submission is in flight.
    pub fn is_submit_loading(&self) -> bool {
        self.submitting.load(Ordering::SeqCst) > 0
    }

    /// Submit the squad for public access review.
    ///
    /// The outcome is reported to the user through the toaster. Failures
    /// yield `None`. The new request is not added to the cached history;
    /// invalidate the query to see it.
    pub async fn submit_for_review(&self) -> Option<PublicSquadRequest> {
        let _guard = SubmitGuard::start(&self.submitting);

        let operation = Operation::mutation(
            SUBMIT_SQUAD_FOR_REVIEW_MUTATION,
            json!({ "sourceId": self.source_id }),
        );

        match request::<PublicSquadRequest>(
            self.ctx.graphql.as_ref(),
            operation,
            "submitSquadForReview",
        )
        .await
        {
            Ok(created) => {
                info!(
                    source_id = %self.source_id,
                    request_id = %created.id,
                    "Squad submitted for review"
                );
                self.ctx.toaster.display_toast(SQUAD_REVIEW_SUBMITTED);
                Some(created)
            }
            Err(e) => {
                warn!(source_id = %self.source_id, error = %e, "Squad review submission failed");
                self.ctx.toaster.display_toast(&submit_error_message(&e));
                None
            }
        }
    }
}
