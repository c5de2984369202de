//! Repository calls paired with their ownership side effects.
//!
//! Ownership changes only after the remote call succeeded; a failed call
//! returns its error and leaves the tracker as it was.

use crate::entity::{Comment, Post};
use crate::error::{RepositoryError, Result};
use crate::form::{CommentForm, PostForm};
use crate::ownership::OwnershipRecorder;
use crate::repository::{CommentRepository, PostRepository};
use crate::tree::CommentTree;

// ── Posts ──

pub struct PostUseCases<R, O> {
    repo: R,
    ownership: O,
}

impl<R: PostRepository, O: OwnershipRecorder> PostUseCases<R, O> {
    pub fn new(repo: R, ownership: O) -> Self {
        Self { repo, ownership }
    }

    pub async fn get_posts(&self) -> Result<Vec<Post>> {
        self.repo.list_posts().await
    }

    pub async fn get_post(&self, post_id: &str) -> Result<Post> {
        self.repo.get_post(post_id).await
    }

    pub async fn create_post(&self, post: &PostForm) -> Result<Post> {
        let created = self.repo.create_post(post).await?;
        self.ownership.add_owned_post(&created.id);
        tracing::info!(post_id = %created.id, "post created");
        Ok(created)
    }

    pub async fn update_post(&self, post_id: &str, post: &PostForm) -> Result<Post> {
        let updated = self.repo.update_post(post_id, post).await?;
        tracing::info!(post_id, "post updated");
        Ok(updated)
    }

    pub async fn delete_post(&self, post_id: &str) -> Result<()> {
        self.repo.delete_post(post_id).await?;
        self.ownership.remove_owned_post(post_id);
        tracing::info!(post_id, "post deleted");
        Ok(())
    }
}

// ── Comments ──

pub struct CommentUseCases<R, O> {
    repo: R,
    ownership: O,
}

impl<R: CommentRepository, O: OwnershipRecorder> CommentUseCases<R, O> {
    pub fn new(repo: R, ownership: O) -> Self {
        Self { repo, ownership }
    }

    pub async fn get_comments(&self, post_id: &str) -> Result<Vec<Comment>> {
        self.repo.list_comments(post_id).await
    }

    pub async fn get_comment_tree(&self, post_id: &str) -> Result<CommentTree> {
        let comments = self.repo.list_comments(post_id).await?;
        Ok(CommentTree::build(&comments))
    }

    pub async fn create_comment(&self, post_id: &str, comment: &CommentForm) -> Result<Comment> {
        let created = self.repo.create_comment(post_id, comment).await?;
        self.ownership.add_owned_comment(&created.id);
        tracing::info!(post_id, comment_id = %created.id, "comment created");
        Ok(created)
    }

    pub async fn update_comment(
        &self,
        post_id: &str,
        comment_id: &str,
        comment: &CommentForm,
    ) -> Result<Comment> {
        let updated = self
            .repo
            .update_comment(post_id, comment_id, comment)
            .await?;
        tracing::info!(post_id, comment_id, "comment updated");
        Ok(updated)
    }

    pub async fn delete_comment(&self, post_id: &str, comment_id: &str) -> Result<()> {
        self.repo.delete_comment(post_id, comment_id).await?;
        self.ownership.remove_owned_comment(comment_id);
        tracing::info!(post_id, comment_id, "comment deleted");
        Ok(())
    }
}

// ── Notifications ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Non-fatal message shown after a create, update or delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Turn the outcome of `action` (e.g. "Comment created") into a notice.
    /// Errors are logged here so callers only have to display the result.
    pub fn from_outcome<T>(action: &str, outcome: &std::result::Result<T, RepositoryError>) -> Self {
        match outcome {
            Ok(_) => Self::success(format!("{action} successfully")),
            Err(e) => {
                tracing::warn!(action, error = %e, "operation failed");
                Self::error(e.user_message())
            }
        }
    }
}
