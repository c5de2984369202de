//! Repositories backed by process memory.
//!
//! They stand in for the REST backend in tests and offline demos: IDs are
//! handed out sequentially, unknown IDs give `NotFound`, and
//! [`set_failing`](MemoryPostRepository::set_failing) makes every call fail
//! as if the network were down.

use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entity::{Comment, Post};
use crate::error::{RepositoryError, Result};
use crate::form::{CommentForm, PostForm};
use crate::repository::{CommentRepository, PostRepository};
use crate::validate::parse_date;

#[derive(Debug)]
struct Switches {
    next_id: Cell<u64>,
    failing: Cell<bool>,
}

impl Switches {
    fn new(first_id: u64) -> Self {
        Self {
            next_id: Cell::new(first_id),
            failing: Cell::new(false),
        }
    }

    fn check(&self) -> Result<()> {
        if self.failing.get() {
            Err(RepositoryError::Network("backend unreachable".into()))
        } else {
            Ok(())
        }
    }

    fn next_id(&self) -> String {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id.to_string()
    }
}

fn created_at(stamp: Option<&str>) -> DateTime<Utc> {
    stamp.and_then(parse_date).unwrap_or_else(Utc::now)
}

fn by_id_desc(a: &Post, b: &Post) -> Ordering {
    match (a.id.parse::<u64>(), b.id.parse::<u64>()) {
        (Ok(x), Ok(y)) => y.cmp(&x),
        _ => b.id.cmp(&a.id),
    }
}

// ── Posts ──

#[derive(Debug)]
pub struct MemoryPostRepository {
    posts: RefCell<Vec<Post>>,
    switches: Switches,
}

impl Default for MemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPostRepository {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// IDs handed out by `create_post` start at `first_id`.
    pub fn starting_at(first_id: u64) -> Self {
        Self {
            posts: RefCell::new(Vec::new()),
            switches: Switches::new(first_id),
        }
    }

    pub fn seed(&self, post: Post) {
        self.posts.borrow_mut().push(post);
    }

    pub fn set_failing(&self, failing: bool) {
        self.switches.failing.set(failing);
    }

    pub fn len(&self) -> usize {
        self.posts.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn not_found(post_id: &str) -> RepositoryError {
        RepositoryError::NotFound {
            resource: "Post",
            id: post_id.to_owned(),
        }
    }
}

#[async_trait(?Send)]
impl PostRepository for MemoryPostRepository {
    async fn list_posts(&self) -> Result<Vec<Post>> {
        self.switches.check()?;
        let mut posts = self.posts.borrow().clone();
        posts.sort_by(by_id_desc);
        Ok(posts)
    }

    async fn get_post(&self, post_id: &str) -> Result<Post> {
        self.switches.check()?;
        self.posts
            .borrow()
            .iter()
            .find(|p| p.id == post_id)
            .cloned()
            .ok_or_else(|| Self::not_found(post_id))
    }

    async fn create_post(&self, post: &PostForm) -> Result<Post> {
        self.switches.check()?;
        let created = Post {
            id: self.switches.next_id(),
            title: post.title.clone(),
            content: post.content.clone(),
            name: post.name.clone(),
            avatar: post.avatar.clone(),
            created_at: created_at(post.created_at.as_deref()),
        };
        self.posts.borrow_mut().push(created.clone());
        Ok(created)
    }

    async fn update_post(&self, post_id: &str, post: &PostForm) -> Result<Post> {
        self.switches.check()?;
        let mut posts = self.posts.borrow_mut();
        let existing = posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or_else(|| Self::not_found(post_id))?;
        existing.title = post.title.clone();
        existing.content = post.content.clone();
        existing.name = post.name.clone();
        existing.avatar = post.avatar.clone();
        Ok(existing.clone())
    }

    async fn delete_post(&self, post_id: &str) -> Result<()> {
        self.switches.check()?;
        let mut posts = self.posts.borrow_mut();
        let before = posts.len();
        posts.retain(|p| p.id != post_id);
        if posts.len() == before {
            return Err(Self::not_found(post_id));
        }
        Ok(())
    }
}

// ── Comments ──

#[derive(Debug)]
pub struct MemoryCommentRepository {
    comments: RefCell<HashMap<String, Vec<Comment>>>,
    switches: Switches,
}

impl Default for MemoryCommentRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCommentRepository {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first_id: u64) -> Self {
        Self {
            comments: RefCell::new(HashMap::new()),
            switches: Switches::new(first_id),
        }
    }

    pub fn seed(&self, post_id: &str, comment: Comment) {
        self.comments
            .borrow_mut()
            .entry(post_id.to_owned())
            .or_default()
            .push(comment);
    }

    pub fn set_failing(&self, failing: bool) {
        self.switches.failing.set(failing);
    }

    pub fn count(&self, post_id: &str) -> usize {
        self.comments.borrow().get(post_id).map_or(0, Vec::len)
    }

    fn not_found(comment_id: &str) -> RepositoryError {
        RepositoryError::NotFound {
            resource: "Comment",
            id: comment_id.to_owned(),
        }
    }
}

#[async_trait(?Send)]
impl CommentRepository for MemoryCommentRepository {
    async fn list_comments(&self, post_id: &str) -> Result<Vec<Comment>> {
        self.switches.check()?;
        Ok(self
            .comments
            .borrow()
            .get(post_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_comment(&self, post_id: &str, comment: &CommentForm) -> Result<Comment> {
        self.switches.check()?;
        let created = Comment {
            id: self.switches.next_id(),
            content: comment.content.clone(),
            name: comment.name.clone(),
            avatar: comment.avatar.clone(),
            parent_id: comment.parent_id.clone(),
            created_at: created_at(comment.created_at.as_deref()),
        };
        self.seed(post_id, created.clone());
        Ok(created)
    }

    async fn update_comment(
        &self,
        post_id: &str,
        comment_id: &str,
        comment: &CommentForm,
    ) -> Result<Comment> {
        self.switches.check()?;
        let mut comments = self.comments.borrow_mut();
        let existing = comments
            .get_mut(post_id)
            .and_then(|list| list.iter_mut().find(|c| c.id == comment_id))
            .ok_or_else(|| Self::not_found(comment_id))?;
        existing.content = comment.content.clone();
        existing.name = comment.name.clone();
        existing.avatar = comment.avatar.clone();
        Ok(existing.clone())
    }

    async fn delete_comment(&self, post_id: &str, comment_id: &str) -> Result<()> {
        self.switches.check()?;
        let mut comments = self.comments.borrow_mut();
        let list = comments
            .get_mut(post_id)
            .ok_or_else(|| Self::not_found(comment_id))?;
        let before = list.len();
        list.retain(|c| c.id != comment_id);
        if list.len() == before {
            return Err(Self::not_found(comment_id));
        }
        Ok(())
    }
}
