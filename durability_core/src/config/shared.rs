//! Reloadable settings handle

use super::{ConfigError, KeywordLookup, Settings};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Holder for the active settings
///
/// Readers take a cheap `Arc` snapshot per hit, so a reload never changes
/// settings halfway through a hit. A reload builds a fresh [`Settings`]
/// and swaps it in.
#[derive(Debug, Default)]
pub struct SharedSettings {
    current: RwLock<Arc<Settings>>,
}

impl SharedSettings {
    pub fn new(settings: Settings) -> Self {
        SharedSettings {
            current: RwLock::new(Arc::new(settings)),
        }
    }

    /// Snapshot of the active settings
    pub fn current(&self) -> Arc<Settings> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Install new settings, returning the previous ones
    pub fn replace(&self, settings: Settings) -> Arc<Settings> {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        std::mem::replace(&mut *guard, Arc::new(settings))
    }

    /// Reload from a file; the active settings stay in place on error
    pub fn reload(&self, path: &Path, keywords: &impl KeywordLookup) -> Result<(), ConfigError> {
        let settings = Settings::load(path, keywords)?;
        self.replace(settings);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KeywordId;

    fn no_keywords(_: &str) -> Option<KeywordId> {
        None
    }

    #[test]
    fn test_replace_keeps_old_snapshot() {
        let shared = SharedSettings::new(Settings::default());
        let before = shared.current();

        let updated = Settings {
            destroy_message: 5,
            ..Settings::default()
        };
        shared.replace(updated);

        assert_eq!(before.destroy_message, 100);
        assert_eq!(shared.current().destroy_message, 5);
    }

    #[test]
    fn test_failed_reload_keeps_current() {
        let shared = SharedSettings::new(Settings {
            destroy_message: 7,
            ..Settings::default()
        });
        let result = shared.reload(Path::new("/nonexistent/durability.toml"), &no_keywords);
        assert!(result.is_err());
        assert_eq!(shared.current().destroy_message, 7);
    }
}
