//! Client-side core of Quillpost: entities, payload validation, the comment
//! tree, locally persisted ownership and identity, and the use cases that
//! tie repository calls to them. Nothing here touches the browser, so it is
//! all testable natively.

pub mod config;
pub mod entity;
pub mod error;
pub mod form;
pub mod identity;
pub mod memory;
pub mod ownership;
pub mod repository;
pub mod routes;
pub mod storage;
pub mod tree;
pub mod usecases;
pub mod validate;

pub use config::ApiConfig;
pub use entity::{Comment, Post};
pub use error::{FieldError, FormErrors, RepositoryError, StorageError, ValidationError};
pub use form::{CommentForm, PostForm};
pub use identity::IdentityStore;
pub use memory::{MemoryCommentRepository, MemoryPostRepository};
pub use ownership::{OwnershipRecorder, OwnershipTracker};
pub use repository::{CommentRepository, PostRepository};
pub use routes::Endpoints;
pub use storage::{KeyValueStore, MemoryStore};
pub use tree::{CommentNode, CommentTree};
pub use usecases::{CommentUseCases, Notice, NoticeLevel, PostUseCases};
