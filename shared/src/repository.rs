//! Ports to the REST backend.
//!
//! Implementations return entities that already passed the validators in
//! [`crate::validate`]. Futures are not `Send`: the client runs on a single
//! event-loop thread.

use async_trait::async_trait;

use crate::entity::{Comment, Post};
use crate::error::Result;
use crate::form::{CommentForm, PostForm};

#[async_trait(?Send)]
pub trait PostRepository {
    /// Newest first, as sorted by the backend.
    async fn list_posts(&self) -> Result<Vec<Post>>;
    async fn get_post(&self, post_id: &str) -> Result<Post>;
    async fn create_post(&self, post: &PostForm) -> Result<Post>;
    async fn update_post(&self, post_id: &str, post: &PostForm) -> Result<Post>;
    async fn delete_post(&self, post_id: &str) -> Result<()>;
}

#[async_trait(?Send)]
pub trait CommentRepository {
    /// In backend order, usually creation order.
    async fn list_comments(&self, post_id: &str) -> Result<Vec<Comment>>;
    async fn create_comment(&self, post_id: &str, comment: &CommentForm) -> Result<Comment>;
    async fn update_comment(
        &self,
        post_id: &str,
        comment_id: &str,
        comment: &CommentForm,
    ) -> Result<Comment>;
    async fn delete_comment(&self, post_id: &str, comment_id: &str) -> Result<()>;
}

#[async_trait(?Send)]
impl<R: PostRepository + ?Sized> PostRepository for &R {
    async fn list_posts(&self) -> Result<Vec<Post>> {
        (**self).list_posts().await
    }
    async fn get_post(&self, post_id: &str) -> Result<Post> {
        (**self).get_post(post_id).await
    }
    async fn create_post(&self, post: &PostForm) -> Result<Post> {
        (**self).create_post(post).await
    }
    async fn update_post(&self, post_id: &str, post: &PostForm) -> Result<Post> {
        (**self).update_post(post_id, post).await
    }
    async fn delete_post(&self, post_id: &str) -> Result<()> {
        (**self).delete_post(post_id).await
    }
}

#[async_trait(?Send)]
impl<R: CommentRepository + ?Sized> CommentRepository for &R {
    async fn list_comments(&self, post_id: &str) -> Result<Vec<Comment>> {
        (**self).list_comments(post_id).await
    }
    async fn create_comment(&self, post_id: &str, comment: &CommentForm) -> Result<Comment> {
        (**self).create_comment(post_id, comment).await
    }
    async fn update_comment(
        &self,
        post_id: &str,
        comment_id: &str,
        comment: &CommentForm,
    ) -> Result<Comment> {
        (**self).update_comment(post_id, comment_id, comment).await
    }
    async fn delete_comment(&self, post_id: &str, comment_id: &str) -> Result<()> {
        (**self).delete_comment(post_id, comment_id).await
    }
}
