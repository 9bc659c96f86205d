use std::sync::Arc;

use hearthware_core::{AppError, AppResult};
use hearthware_domain::{CollectionKey, DisplayPreferences};
use tracing::{debug, warn};

use crate::KeyValueStore;

/// Persists visitor display settings next to the local collections.
///
/// The dark mode flag is stored as a bare JSON boolean under `darkMode`.
#[derive(Clone)]
pub struct PreferencesStore {
    store: Arc<dyn KeyValueStore>,
}

impl PreferencesStore {
    /// Creates a store over the shared key/value backend.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Reads the settings, falling back to defaults on any failure.
    #[must_use]
    pub fn load(&self) -> DisplayPreferences {
        let key = CollectionKey::DarkMode;
        let raw = match self.store.get_item(key.as_str()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return DisplayPreferences::default(),
            Err(error) => {
                warn!(key = %key, error = %error, "failed to read display preferences");
                return DisplayPreferences::default();
            }
        };

        match serde_json::from_str::<bool>(&raw) {
            Ok(dark_mode) => DisplayPreferences { dark_mode },
            Err(error) => {
                warn!(key = %key, error = %error, "malformed display preference; using default");
                DisplayPreferences::default()
            }
        }
    }

    /// Writes the settings.
    pub fn save(&self, preferences: DisplayPreferences) -> AppResult<()> {
        let raw = serde_json::to_string(&preferences.dark_mode).map_err(|error| {
            AppError::Internal(format!("failed to encode display preferences: {error}"))
        })?;
        self.store.set_item(CollectionKey::DarkMode.as_str(), &raw)?;
        debug!(dark_mode = preferences.dark_mode, "display preferences saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use hearthware_domain::DisplayPreferences;

    use crate::KeyValueStore;
    use crate::test_support::FakeKeyValueStore;

    use super::PreferencesStore;

    #[test]
    fn defaults_to_light_mode() {
        let store = PreferencesStore::new(Arc::new(FakeKeyValueStore::default()));
        assert_eq!(store.load(), DisplayPreferences::default());
    }

    #[test]
    fn saved_flag_is_a_bare_boolean() {
        let backend = Arc::new(FakeKeyValueStore::default());
        let store = PreferencesStore::new(backend.clone());

        assert!(store.save(DisplayPreferences { dark_mode: true }).is_ok());
        assert_eq!(
            backend.get_item("darkMode").ok().flatten().as_deref(),
            Some("true")
        );
        assert!(store.load().dark_mode);
    }

    #[test]
    fn garbage_and_read_failures_fall_back() {
        let backend = Arc::new(FakeKeyValueStore::default());
        assert!(backend.set_item("darkMode", "\"yes\"").is_ok());
        let store = PreferencesStore::new(backend.clone());
        assert!(!store.load().dark_mode);

        backend.fail_reads(true);
        assert!(!store.load().dark_mode);
    }
}
