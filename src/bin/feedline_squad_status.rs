//! feedline-squad-status: Squad public access status
//!
//! Loads a squad's public access request history, pages through it and
//! prints the derived status.
//!
//! ## Configuration
//! - SOURCE_ID: Squad id (required)
//! - FEEDLINE_USER_ID: Acting user id (optional, anonymous otherwise)
//! - MAX_PAGES: Upper bound on history pages loaded (default: 100)
//! - FEEDLINE_CONFIG / FEEDLINE__*: see `feedline::config`
//!
//! Pass `--submit` to submit the squad for review before reporting.

use tracing::info;

use feedline::config::Config;
use feedline::squads::{PublicSquadRequests, PublicSquadRequestsProps};
use feedline::utils::bootstrap::{build_context, init_tracing};
use feedline::LoggedUser;

const DEFAULT_MAX_PAGES: usize = 100;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = Config::load(None)?;
    let source_id = std::env::var("SOURCE_ID").map_err(|_| "SOURCE_ID not set")?;
    let submit = std::env::args().any(|arg| arg == "--submit");
    let max_pages = match std::env::var("MAX_PAGES") {
        Ok(value) => value.parse()?,
        Err(_) => DEFAULT_MAX_PAGES,
    };

    let mut ctx = build_context(&config)?;
    if let Ok(user_id) = std::env::var("FEEDLINE_USER_ID") {
        ctx = ctx.with_user(LoggedUser::new(user_id));
    }

    let requests = PublicSquadRequests::new(&ctx, PublicSquadRequestsProps::new(source_id));

    if submit {
        if let Some(created) = requests.submit_for_review().await {
            info!(request_id = %created.id, "Submitted");
        }
    }

    let pages = requests.fetch_all(max_pages).await?;

    let history = requests.requests().await?;
    let count = history.as_ref().map(|h| h.nodes().count()).unwrap_or(0);
    let status = requests.status().await?;

    info!(
        source_id = %requests.source_id(),
        pages,
        requests = count,
        status = ?status,
        "Squad status"
    );
    println!("{status:?}");

    Ok(())
}
