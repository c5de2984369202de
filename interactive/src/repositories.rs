use async_trait::async_trait;
use quillpost_shared::error::Result;
use quillpost_shared::{
    validate, ApiConfig, Comment, CommentForm, CommentRepository, Endpoints, Post, PostForm,
    PostRepository, RepositoryError,
};

use crate::api;

/// A 404 from the backend means the entity is gone, not that the call broke.
fn not_found(resource: &'static str, id: &str) -> impl FnOnce(RepositoryError) -> RepositoryError {
    let id = id.to_owned();
    move |e| match e {
        RepositoryError::Status { status: 404, .. } => RepositoryError::NotFound { resource, id },
        other => other,
    }
}

#[derive(Debug, Clone)]
pub struct ApiPostRepository {
    endpoints: Endpoints,
}

impl ApiPostRepository {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            endpoints: config.endpoints(),
        }
    }
}

#[async_trait(?Send)]
impl PostRepository for ApiPostRepository {
    async fn list_posts(&self) -> Result<Vec<Post>> {
        let body = api::get(&self.endpoints.posts_listing()).await?;
        Ok(validate::posts(&body)?)
    }

    async fn get_post(&self, post_id: &str) -> Result<Post> {
        let body = api::get(&self.endpoints.post(post_id))
            .await
            .map_err(not_found("Post", post_id))?;
        Ok(validate::post(&body)?)
    }

    async fn create_post(&self, post: &PostForm) -> Result<Post> {
        let body = api::post(&self.endpoints.posts(), post).await?;
        Ok(validate::post(&body)?)
    }

    async fn update_post(&self, post_id: &str, post: &PostForm) -> Result<Post> {
        let body = api::put(&self.endpoints.post(post_id), post)
            .await
            .map_err(not_found("Post", post_id))?;
        Ok(validate::post(&body)?)
    }

    async fn delete_post(&self, post_id: &str) -> Result<()> {
        api::delete(&self.endpoints.post(post_id))
            .await
            .map_err(not_found("Post", post_id))
    }
}

#[derive(Debug, Clone)]
pub struct ApiCommentRepository {
    endpoints: Endpoints,
}

impl ApiCommentRepository {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            endpoints: config.endpoints(),
        }
    }
}

#[async_trait(?Send)]
impl CommentRepository for ApiCommentRepository {
    async fn list_comments(&self, post_id: &str) -> Result<Vec<Comment>> {
        let body = api::get(&self.endpoints.comments(post_id))
            .await
            .map_err(not_found("Post", post_id))?;
        Ok(validate::comments(&body)?)
    }

    async fn create_comment(&self, post_id: &str, comment: &CommentForm) -> Result<Comment> {
        let body = api::post(&self.endpoints.comments(post_id), comment)
            .await
            .map_err(not_found("Post", post_id))?;
        Ok(validate::comment(&body)?)
    }

    async fn update_comment(
        &self,
        post_id: &str,
        comment_id: &str,
        comment: &CommentForm,
    ) -> Result<Comment> {
        let body = api::put(&self.endpoints.comment(post_id, comment_id), comment)
            .await
            .map_err(not_found("Comment", comment_id))?;
        Ok(validate::comment(&body)?)
    }

    async fn delete_comment(&self, post_id: &str, comment_id: &str) -> Result<()> {
        api::delete(&self.endpoints.comment(post_id, comment_id))
            .await
            .map_err(not_found("Comment", comment_id))
    }
}
