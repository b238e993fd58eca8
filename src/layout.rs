//! Viewport-dependent layout switches.

/// The new mobile layout applies below laptop width when its feature flag is on.
pub fn is_new_mobile_layout(is_laptop: bool, feature_enabled: bool) -> bool {
    !is_laptop && feature_enabled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_mobile_layout() {
        assert!(is_new_mobile_layout(false, true));
        assert!(!is_new_mobile_layout(false, false));
        assert!(!is_new_mobile_layout(true, true));
        assert!(!is_new_mobile_layout(true, false));
    }
}
