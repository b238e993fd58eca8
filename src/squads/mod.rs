//! Squad (community) moderation hooks.

mod pending_posts;
mod public_requests;

pub use pending_posts::{
    select_non_empty_pages, SourcePostModeration, SourcePostModerationStatus, SquadPendingPosts,
    SQUAD_PENDING_POSTS_QUERY,
};
pub use public_requests::{
    latest_request, squad_status, PublicSquadRequest, PublicSquadRequestStatus,
    PublicSquadRequests, PublicSquadRequestsProps, SquadStatus, PUBLIC_SQUAD_REQUESTS_QUERY,
    REJECTION_COOL_DOWN_DAYS, SUBMIT_SQUAD_FOR_REVIEW_MUTATION,
};
