use leptos::prelude::*;
use quillpost_shared::{
    ApiConfig, CommentUseCases, IdentityStore, Notice, OwnershipRecorder, OwnershipTracker,
    PostUseCases,
};

use crate::repositories::{ApiCommentRepository, ApiPostRepository};
use crate::storage::BrowserStorage;

const MAX_TOASTS: usize = 3;

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub notice: Notice,
}

/// Client-wide state shared via context.
#[derive(Clone, Copy)]
pub struct AppState {
    pub ownership: RwSignal<OwnershipTracker<BrowserStorage>>,
    pub identity: RwSignal<IdentityStore<BrowserStorage>>,
    pub toasts: RwSignal<Vec<Toast>>,
    next_toast: RwSignal<u64>,
    config: StoredValue<ApiConfig>,
}

impl AppState {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            ownership: RwSignal::new(OwnershipTracker::load(BrowserStorage)),
            identity: RwSignal::new(IdentityStore::load(BrowserStorage)),
            toasts: RwSignal::new(Vec::new()),
            next_toast: RwSignal::new(0),
            config: StoredValue::new(config),
        }
    }

    pub fn posts(&self) -> PostUseCases<ApiPostRepository, OwnershipSignal> {
        let repo = self.config.with_value(ApiPostRepository::new);
        PostUseCases::new(repo, OwnershipSignal(self.ownership))
    }

    pub fn comments(&self) -> CommentUseCases<ApiCommentRepository, OwnershipSignal> {
        let repo = self.config.with_value(ApiCommentRepository::new);
        CommentUseCases::new(repo, OwnershipSignal(self.ownership))
    }

    /// Tracked: views re-render when ownership changes.
    pub fn is_post_owner(&self, post_id: &str) -> bool {
        self.ownership.with(|t| t.is_post_owner(post_id))
    }

    pub fn is_comment_owner(&self, comment_id: &str) -> bool {
        self.ownership.with(|t| t.is_comment_owner(comment_id))
    }

    pub fn notify(&self, notice: Notice) {
        let id = self.next_toast.get_untracked();
        self.next_toast.set(id + 1);
        self.toasts.update(|list| {
            list.push(Toast { id, notice });
            if list.len() > MAX_TOASTS {
                list.remove(0);
            }
        });
    }

    pub fn dismiss(&self, toast_id: u64) {
        self.toasts.update(|list| list.retain(|t| t.id != toast_id));
    }
}

/// Routes use-case ownership updates through the reactive tracker.
#[derive(Clone, Copy)]
pub struct OwnershipSignal(pub RwSignal<OwnershipTracker<BrowserStorage>>);

impl OwnershipRecorder for OwnershipSignal {
    fn add_owned_post(&self, id: &str) {
        self.0.update(|t| t.add_owned_post(id));
    }
    fn remove_owned_post(&self, id: &str) {
        self.0.update(|t| t.remove_owned_post(id));
    }
    fn add_owned_comment(&self, id: &str) {
        self.0.update(|t| t.add_owned_comment(id));
    }
    fn remove_owned_comment(&self, id: &str) {
        self.0.update(|t| t.remove_owned_comment(id));
    }
}
