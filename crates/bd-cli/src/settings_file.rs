use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bd_core::store::{SettingsStore, StoreError};
use bd_core::{Settings, StoredSettings};

/// Settings record kept in a JSON file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonFileStore {
    fn load(&self) -> Result<StoredSettings, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StoredSettings::default()),
            Err(e) => {
                return Err(StoreError::Read(format!("'{}': {}", self.path.display(), e)));
            }
        };
        let value: serde_json::Value = serde_json::from_str(&text)?;
        Ok(StoredSettings::from_json(&value))
    }

    fn save(&mut self, settings: &Settings) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| StoreError::Write(format!("'{}': {}", parent.display(), e)))?;
        }
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, json)
            .map_err(|e| StoreError::Write(format!("'{}': {}", self.path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bd_core::{HighlightStyle, SettingsHub};

    #[test]
    fn test_missing_file_is_backfilled_and_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let hub = SettingsHub::open(JsonFileStore::new(&path)).unwrap();
        assert_eq!(hub.current(), &Settings::default());

        let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, Settings::default().to_json());
    }

    #[test]
    fn test_partial_file_keeps_explicit_redirect_false() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"highlightStyle":"outline","autoRedirectEnabled":false}"#).unwrap();

        let hub = SettingsHub::open(JsonFileStore::new(&path)).unwrap();
        assert_eq!(hub.current().highlight_style, HighlightStyle::Outline);
        assert!(!hub.current().auto_redirect_enabled);
        assert_eq!(hub.current().highlight_color, "#ff4444");
    }

    #[test]
    fn test_update_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut hub = SettingsHub::open(JsonFileStore::new(&path)).unwrap();
        hub.update(|s| s.auto_redirect_enabled = true).unwrap();

        let reopened = JsonFileStore::new(&path).load().unwrap();
        assert_eq!(reopened.auto_redirect_enabled, Some(true));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();

        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Parse(_)));
    }
}
