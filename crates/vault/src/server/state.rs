//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::crypto::{KeyCache, KeySecret};

/// Application state shared across all request handlers.
///
/// All fields are cheaply cloneable so that Axum can clone the state for each
/// request without re-deriving keys.
#[derive(Clone)]
pub struct AppState {
    /// Key used for every new encryption.
    pub current_key: Arc<KeyCache>,
    /// Key being rotated out; `None` disables `/fields/rotate`.
    pub previous_key: Option<Arc<KeyCache>>,
    /// Minimum age for birth-date validation.
    pub minimum_age_years: u32,
}

impl AppState {
    /// Create a new [`AppState`] from the configured key secrets.
    pub fn new(current: KeySecret, previous: Option<KeySecret>, minimum_age_years: u32) -> Self {
        Self {
            current_key: Arc::new(KeyCache::new(current)),
            previous_key: previous.map(|s| Arc::new(KeyCache::new(s))),
            minimum_age_years,
        }
    }
}

impl Default for AppState {
    /// Creates a default [`AppState`] with a fixed test secret, suitable for tests.
    fn default() -> Self {
        Self::new(KeySecret::configured("test-only-secret"), None, 18)
    }
}
