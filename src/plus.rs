//! Plus subscription checkout page.

/// What the checkout page does once the router is ready.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutAction {
    /// Leave for this URL.
    Redirect(String),
    /// Open the embedded checkout for this price.
    OpenCheckout { price_id: String },
}

/// Route decision for the checkout page.
///
/// The embedded checkout is mobile only and needs a price id (`pid`); anything
/// else goes back to the Plus landing page. Returns `None` until the router
/// is ready.
pub fn checkout_action(
    webapp_url: &str,
    pid: Option<&str>,
    is_laptop: bool,
    router_ready: bool,
) -> Option<CheckoutAction> {
    if !router_ready {
        return None;
    }

    match pid.filter(|pid| !pid.is_empty()) {
        Some(pid) if !is_laptop => Some(CheckoutAction::OpenCheckout {
            price_id: pid.to_string(),
        }),
        _ => Some(CheckoutAction::Redirect(format!("{webapp_url}plus"))),
    }
}
