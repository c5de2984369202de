use serde::{Deserialize, Serialize};

use crate::storage::{load_record, save_record, KeyValueStore};

pub const IDENTITY_KEY: &str = "user-storage";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct IdentityRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    avatar: Option<String>,
}

/// Display name and avatar remembered between visits to prefill forms.
#[derive(Debug)]
pub struct IdentityStore<S> {
    store: S,
    record: IdentityRecord,
}

impl<S: KeyValueStore> IdentityStore<S> {
    pub fn load(store: S) -> Self {
        let record = load_record(&store, IDENTITY_KEY);
        Self { store, record }
    }

    pub fn name(&self) -> Option<&str> {
        self.record.name.as_deref()
    }

    pub fn avatar(&self) -> Option<&str> {
        self.record.avatar.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.record.name = Some(name.into());
        self.persist();
    }

    pub fn set_avatar(&mut self, avatar: impl Into<String>) {
        self.record.avatar = Some(avatar.into());
        self.persist();
    }

    /// Keep what a create form was submitted with, but only a complete pair.
    pub fn remember(&mut self, name: &str, avatar: &str) {
        if name.is_empty() || avatar.is_empty() {
            return;
        }
        self.record = IdentityRecord {
            name: Some(name.to_owned()),
            avatar: Some(avatar.to_owned()),
        };
        self.persist();
    }

    /// Author to submit with a form. A complete remembered identity wins over
    /// whatever the form's own fields hold, since those are hidden while it
    /// is shown.
    pub fn author_or(&self, name: &str, avatar: &str) -> (String, String) {
        match (self.name(), self.avatar()) {
            (Some(n), Some(a)) if self.has_identity() => (n.to_owned(), a.to_owned()),
            _ => (name.to_owned(), avatar.to_owned()),
        }
    }

    pub fn clear(&mut self) {
        self.record = IdentityRecord::default();
        self.persist();
    }

    /// Both fields set and non-empty.
    pub fn has_identity(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        present(&self.record.name) && present(&self.record.avatar)
    }

    fn persist(&self) {
        save_record(&self.store, IDENTITY_KEY, &self.record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn identity_requires_both_non_empty() {
        let mut id = IdentityStore::load(MemoryStore::new());
        assert!(!id.has_identity());

        id.set_name("Ada");
        assert!(!id.has_identity());

        id.set_avatar("");
        assert!(!id.has_identity());

        id.set_avatar("https://example.com/ada.png");
        assert!(id.has_identity());

        id.set_name("");
        assert!(!id.has_identity());
    }

    #[test]
    fn clear_resets_both() {
        let store = MemoryStore::new();
        let mut id = IdentityStore::load(&store);
        id.set_name("Ada");
        id.set_avatar("https://example.com/ada.png");
        id.clear();
        assert_eq!(id.name(), None);
        assert_eq!(id.avatar(), None);

        let reloaded = IdentityStore::load(&store);
        assert_eq!(reloaded.name(), None);
    }

    #[test]
    fn survives_reload() {
        let store = MemoryStore::new();
        IdentityStore::load(&store).remember("Ada", "https://example.com/ada.png");

        let id = IdentityStore::load(&store);
        assert_eq!(id.name(), Some("Ada"));
        assert_eq!(id.avatar(), Some("https://example.com/ada.png"));
        assert!(id.has_identity());
    }

    #[test]
    fn remember_ignores_incomplete_pair() {
        let mut id = IdentityStore::load(MemoryStore::new());
        id.remember("Ada", "");
        assert_eq!(id.name(), None);
    }

    #[test]
    fn remembered_author_replaces_stale_form_fields() {
        let store = MemoryStore::new();
        let mut id = IdentityStore::load(&store);
        assert_eq!(
            id.author_or("typed", "https://example.com/t.png"),
            ("typed".to_string(), "https://example.com/t.png".to_string())
        );

        // Another form remembers an identity while this one still holds
        // the empty fields it was opened with.
        id.remember("Ada", "https://example.com/ada.png");
        assert_eq!(
            id.author_or("", ""),
            ("Ada".to_string(), "https://example.com/ada.png".to_string())
        );

        id.set_avatar("");
        assert_eq!(id.author_or("Bob", ""), ("Bob".to_string(), String::new()));
    }

    #[test]
    fn stored_shape() {
        let store = MemoryStore::new();
        IdentityStore::load(&store).set_name("Ada");
        let raw: serde_json::Value =
            serde_json::from_str(&store.raw(IDENTITY_KEY).unwrap()).unwrap();
        assert_eq!(
            raw["state"],
            serde_json::json!({"name": "Ada", "avatar": null})
        );
    }
}
