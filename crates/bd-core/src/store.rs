//! Settings persistence and change broadcast

use crate::settings::{Settings, SettingsChanges, StoredSettings};

/// Error type for settings storage.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to read settings: {0}")]
    Read(String),
    #[error("Failed to write settings: {0}")]
    Write(String),
    #[error("Invalid settings record: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Backend holding the persisted settings record.
pub trait SettingsStore {
    /// Read the raw record. A missing record reads as empty.
    fn load(&self) -> Result<StoredSettings, StoreError>;

    /// Overwrite the record with all four keys.
    fn save(&mut self, settings: &Settings) -> Result<(), StoreError>;
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    record: StoredSettings,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new(record: StoredSettings) -> Self {
        Self {
            record,
            fail_writes: false,
        }
    }

    /// Make every subsequent `save` fail.
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn record(&self) -> &StoredSettings {
        &self.record
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Result<StoredSettings, StoreError> {
        Ok(self.record.clone())
    }

    fn save(&mut self, settings: &Settings) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Write("store is read-only".to_string()));
        }
        self.record = StoredSettings::from(settings);
        Ok(())
    }
}

pub type Subscriber = Box<dyn FnMut(&Settings, &SettingsChanges)>;

/// Current settings plus the subscribers that want to hear about writes.
pub struct SettingsHub<S: SettingsStore> {
    store: S,
    current: Settings,
    subscribers: Vec<Subscriber>,
}

impl<S: SettingsStore> SettingsHub<S> {
    /// Load and backfill the record, writing it back so every key is present.
    pub fn open(mut store: S) -> Result<Self, StoreError> {
        let stored = store.load()?;
        let (current, filled) = Settings::backfill(&stored);
        if filled {
            log::debug!("settings backfilled with defaults");
            store.save(&current)?;
        }
        Ok(Self {
            store,
            current,
            subscribers: Vec::new(),
        })
    }

    pub fn current(&self) -> &Settings {
        &self.current
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&Settings, &SettingsChanges) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Persist `settings` and notify subscribers of the keys that changed.
    ///
    /// On a failed write the current snapshot is left as it was and nobody
    /// is notified.
    pub fn write(&mut self, settings: Settings) -> Result<SettingsChanges, StoreError> {
        self.store.save(&settings)?;
        let changes = self.current.diff(&settings);
        self.current = settings;
        if !changes.is_empty() {
            for subscriber in &mut self.subscribers {
                subscriber(&self.current, &changes);
            }
        }
        Ok(changes)
    }

    /// Edit a copy of the current settings and write it.
    pub fn update(&mut self, edit: impl FnOnce(&mut Settings)) -> Result<SettingsChanges, StoreError> {
        let mut next = self.current.clone();
        edit(&mut next);
        self.write(next)
    }

    /// Overwrite with defaults.
    pub fn reset(&mut self) -> Result<SettingsChanges, StoreError> {
        self.write(Settings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SettingsKeys;
    use crate::types::HighlightStyle;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_open_backfills_and_persists() {
        let hub = SettingsHub::open(MemoryStore::default()).unwrap();
        assert_eq!(hub.current(), &Settings::default());
        assert_eq!(hub.store().record(), &StoredSettings::from(&Settings::default()));
    }

    #[test]
    fn test_write_notifies_changed_keys() {
        let mut hub = SettingsHub::open(MemoryStore::default()).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        hub.subscribe(move |settings, changes| {
            sink.borrow_mut().push((settings.clone(), changes.keys));
        });

        let changes = hub
            .update(|s| {
                s.highlight_style = HighlightStyle::Underline;
                s.highlight_color = "#00ff00".to_string();
            })
            .unwrap();
        assert_eq!(changes.keys, SettingsKeys::HIGHLIGHT_STYLE | SettingsKeys::HIGHLIGHT_COLOR);

        // Writing the same values again notifies nobody.
        hub.write(hub.current().clone()).unwrap();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0.highlight_style, HighlightStyle::Underline);
    }

    #[test]
    fn test_failed_write_keeps_snapshot() {
        let mut hub = SettingsHub::open(MemoryStore::default()).unwrap();
        let notified = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&notified);
        hub.subscribe(move |_, _| *counter.borrow_mut() += 1);

        hub.store.fail_writes(true);
        let err = hub.update(|s| s.auto_redirect_enabled = true).unwrap_err();
        assert!(matches!(err, StoreError::Write(_)));
        assert!(!hub.current().auto_redirect_enabled);
        assert_eq!(*notified.borrow(), 0);
    }

    #[test]
    fn test_reset() {
        let mut hub = SettingsHub::open(MemoryStore::default()).unwrap();
        hub.update(|s| s.auto_redirect_enabled = true).unwrap();
        let changes = hub.reset().unwrap();
        assert_eq!(changes.keys, SettingsKeys::AUTO_REDIRECT_ENABLED);
        assert_eq!(hub.current(), &Settings::default());
    }
}
