//! User-facing message strings.

/// Fallback shown when an action fails without a displayable reason.
pub const GENERIC_ERROR: &str = "Oops! That didn't seem to work. Let's try again!";

/// Shown after a squad is submitted for public access review.
pub const SQUAD_REVIEW_SUBMITTED: &str =
    "Your Squad's public access request is in review. You'll hear back from us shortly.";
