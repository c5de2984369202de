//! Which posts and comments this browser created.
//!
//! This is a UI affordance only: it decides whether edit/delete controls are
//! shown. The backend remains the only authority on who may change what.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::storage::{load_record, save_record, KeyValueStore};

pub const OWNERSHIP_KEY: &str = "ownership-storage";

/// Stored form: plain lists, since the storage only holds JSON text.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OwnershipRecord {
    #[serde(default)]
    owned_post_ids: Vec<String>,
    #[serde(default)]
    owned_comment_ids: Vec<String>,
}

#[derive(Debug)]
pub struct OwnershipTracker<S> {
    store: S,
    owned_post_ids: HashSet<String>,
    owned_comment_ids: HashSet<String>,
}

impl<S: KeyValueStore> OwnershipTracker<S> {
    /// Restore the sets persisted in `store`, or start empty.
    pub fn load(store: S) -> Self {
        let record: OwnershipRecord = load_record(&store, OWNERSHIP_KEY);
        Self {
            store,
            owned_post_ids: record.owned_post_ids.into_iter().collect(),
            owned_comment_ids: record.owned_comment_ids.into_iter().collect(),
        }
    }

    pub fn add_owned_post(&mut self, id: &str) {
        if self.owned_post_ids.insert(id.to_owned()) {
            self.persist();
        }
    }

    pub fn remove_owned_post(&mut self, id: &str) {
        if self.owned_post_ids.remove(id) {
            self.persist();
        }
    }

    pub fn is_post_owner(&self, id: &str) -> bool {
        self.owned_post_ids.contains(id)
    }

    pub fn add_owned_comment(&mut self, id: &str) {
        if self.owned_comment_ids.insert(id.to_owned()) {
            self.persist();
        }
    }

    pub fn remove_owned_comment(&mut self, id: &str) {
        if self.owned_comment_ids.remove(id) {
            self.persist();
        }
    }

    pub fn is_comment_owner(&self, id: &str) -> bool {
        self.owned_comment_ids.contains(id)
    }

    pub fn owned_posts(&self) -> &HashSet<String> {
        &self.owned_post_ids
    }

    pub fn owned_comments(&self) -> &HashSet<String> {
        &self.owned_comment_ids
    }

    pub fn clear(&mut self) {
        self.owned_post_ids.clear();
        self.owned_comment_ids.clear();
        self.persist();
    }

    fn persist(&self) {
        let record = OwnershipRecord {
            owned_post_ids: self.owned_post_ids.iter().cloned().collect(),
            owned_comment_ids: self.owned_comment_ids.iter().cloned().collect(),
        };
        save_record(&self.store, OWNERSHIP_KEY, &record);
    }
}

/// The ownership side effects a use case may trigger.
///
/// Takes `&self` so a shared handle (a `RefCell`, a reactive signal) can be passed around while requests are in flight.
pub trait OwnershipRecorder {
    fn add_owned_post(&self, id: &str);
    fn remove_owned_post(&self, id: &str);
    fn add_owned_comment(&self, id: &str);
    fn remove_owned_comment(&self, id: &str);
}

impl<S: KeyValueStore> OwnershipRecorder for RefCell<OwnershipTracker<S>> {
    fn add_owned_post(&self, id: &str) {
        self.borrow_mut().add_owned_post(id);
    }
    fn remove_owned_post(&self, id: &str) {
        self.borrow_mut().remove_owned_post(id);
    }
    fn add_owned_comment(&self, id: &str) {
        self.borrow_mut().add_owned_comment(id);
    }
    fn remove_owned_comment(&self, id: &str) {
        self.borrow_mut().remove_owned_comment(id);
    }
}

impl<T: OwnershipRecorder + ?Sized> OwnershipRecorder for &T {
    fn add_owned_post(&self, id: &str) {
        (**self).add_owned_post(id)
    }
    fn remove_owned_post(&self, id: &str) {
        (**self).remove_owned_post(id)
    }
    fn add_owned_comment(&self, id: &str) {
        (**self).add_owned_comment(id)
    }
    fn remove_owned_comment(&self, id: &str) {
        (**self).remove_owned_comment(id)
    }
}

impl<T: OwnershipRecorder + ?Sized> OwnershipRecorder for Rc<T> {
    fn add_owned_post(&self, id: &str) {
        (**self).add_owned_post(id)
    }
    fn remove_owned_post(&self, id: &str) {
        (**self).remove_owned_post(id)
    }
    fn add_owned_comment(&self, id: &str) {
        (**self).add_owned_comment(id)
    }
    fn remove_owned_comment(&self, id: &str) {
        (**self).remove_owned_comment(id)
    }
}
