//! User notifications.

use std::sync::{Mutex, PoisonError};

use tracing::info;

/// Shows a short message to the user. Fire and forget.
pub trait Toaster: Send + Sync {
    fn display_toast(&self, message: &str);
}

/// Toaster that writes messages to the log.
#[derive(Debug, Default)]
pub struct TracingToaster;

impl Toaster for TracingToaster {
    fn display_toast(&self, message: &str) {
        info!(toast = %message, "Notification");
    }
}

/// Toaster that records every message, for tests.
#[derive(Debug, Default)]
pub struct RecordingToaster {
    messages: Mutex<Vec<String>>,
}

impl RecordingToaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<String> {
        self.messages().pop()
    }
}

impl Toaster for RecordingToaster {
    fn display_toast(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_toaster_keeps_order() {
        let toaster = RecordingToaster::new();
        toaster.display_toast("one");
        toaster.display_toast("two");

        assert_eq!(toaster.messages(), vec!["one", "two"]);
        assert_eq!(toaster.last().as_deref(), Some("two"));
    }
}
