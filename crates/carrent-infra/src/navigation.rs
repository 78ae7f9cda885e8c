//! Navigator that remembers where the client was sent.

use std::sync::Mutex;

use carrent_core::ports::Navigator;

/// Records every navigation and logs it.
///
/// A terminal client cannot change pages; the owner checks
/// [`RecordingNavigator::last`] to tell the user to sign in again.
#[derive(Default)]
pub struct RecordingNavigator {
    history: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn last(&self) -> Option<String> {
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, location: &str) {
        tracing::info!(%location, "Navigating");
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(location.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let nav = RecordingNavigator::new();
        assert!(nav.last().is_none());

        nav.navigate("/pages/login/login.html");
        nav.navigate("/pages/cars/cars.html");

        assert_eq!(nav.history().len(), 2);
        assert_eq!(nav.last().as_deref(), Some("/pages/cars/cars.html"));
    }
}
