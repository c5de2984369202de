use std::cell::RefCell;

use chrono::{TimeZone, Utc};
use quillpost_shared::ownership::OWNERSHIP_KEY;
use quillpost_shared::{
    Comment, CommentForm, CommentUseCases, MemoryCommentRepository, MemoryPostRepository,
    MemoryStore, OwnershipTracker, PostForm, PostUseCases, RepositoryError,
};

fn post_form(title: &str) -> PostForm {
    PostForm {
        title: title.into(),
        content: "Body".into(),
        name: "Ada".into(),
        avatar: "https://example.com/ada.png".into(),
        created_at: None,
    }
    .stamped()
}

fn comment_form(parent: Option<&str>) -> CommentForm {
    CommentForm {
        content: "Nice".into(),
        name: "Bo".into(),
        avatar: String::new(),
        parent_id: parent.map(String::from),
        created_at: None,
    }
}

fn seeded_comment(id: &str) -> Comment {
    Comment {
        id: id.into(),
        content: "from someone else".into(),
        name: "Cy".into(),
        avatar: String::new(),
        parent_id: None,
        created_at: Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap(),
    }
}

#[tokio::test]
async fn created_post_is_owned() {
    let store = MemoryStore::new();
    let tracker = RefCell::new(OwnershipTracker::load(&store));
    let posts = PostUseCases::new(MemoryPostRepository::starting_at(101), &tracker);

    let created = posts.create_post(&post_form("Hello")).await.unwrap();

    assert_eq!(created.id, "101");
    assert!(tracker.borrow().is_post_owner("101"));
}

#[tokio::test]
async fn failed_create_leaves_ownership_untouched() {
    let store = MemoryStore::new();
    let tracker = RefCell::new(OwnershipTracker::load(&store));
    tracker.borrow_mut().add_owned_post("7");
    let before = store.raw(OWNERSHIP_KEY);

    let repo = MemoryPostRepository::new();
    repo.set_failing(true);
    let posts = PostUseCases::new(&repo, &tracker);

    let err = posts.create_post(&post_form("Hello")).await.unwrap_err();

    assert!(matches!(err, RepositoryError::Network(_)));
    assert_eq!(tracker.borrow().owned_posts().len(), 1);
    assert!(tracker.borrow().is_post_owner("7"));
    assert_eq!(store.raw(OWNERSHIP_KEY), before);
    assert!(repo.is_empty());
}

#[tokio::test]
async fn deleted_post_is_no_longer_owned() {
    let store = MemoryStore::new();
    let tracker = RefCell::new(OwnershipTracker::load(&store));
    let repo = MemoryPostRepository::new();
    let posts = PostUseCases::new(&repo, &tracker);

    let created = posts.create_post(&post_form("Short lived")).await.unwrap();
    posts.delete_post(&created.id).await.unwrap();

    assert!(!tracker.borrow().is_post_owner(&created.id));
    assert!(posts.get_post(&created.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn failed_delete_keeps_ownership() {
    let tracker = RefCell::new(OwnershipTracker::load(MemoryStore::new()));
    let repo = MemoryPostRepository::new();
    let posts = PostUseCases::new(&repo, &tracker);
    let created = posts.create_post(&post_form("Sticky")).await.unwrap();

    repo.set_failing(true);
    assert!(posts.delete_post(&created.id).await.is_err());
    assert!(tracker.borrow().is_post_owner(&created.id));
}

#[tokio::test]
async fn update_does_not_change_ownership() {
    let tracker = RefCell::new(OwnershipTracker::load(MemoryStore::new()));
    let repo = MemoryPostRepository::new();
    let posts = PostUseCases::new(&repo, &tracker);
    let created = posts.create_post(&post_form("Draft")).await.unwrap();

    let mut edit = PostForm::from_post(&created);
    edit.title = "Final".into();
    let updated = posts.update_post(&created.id, &edit).await.unwrap();

    assert_eq!(updated.title, "Final");
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(tracker.borrow().owned_posts().len(), 1);
}

#[tokio::test]
async fn posts_are_listed_newest_first() {
    let tracker = RefCell::new(OwnershipTracker::load(MemoryStore::new()));
    let posts = PostUseCases::new(MemoryPostRepository::starting_at(9), &tracker);
    for title in ["a", "b", "c"] {
        posts.create_post(&post_form(title)).await.unwrap();
    }

    let ids: Vec<String> = posts
        .get_posts()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, ["11", "10", "9"]);
}

#[tokio::test]
async fn ownership_survives_reload() {
    let store = MemoryStore::new();
    {
        let tracker = RefCell::new(OwnershipTracker::load(&store));
        let comments = CommentUseCases::new(MemoryCommentRepository::new(), &tracker);
        comments.create_comment("1", &comment_form(None)).await.unwrap();
        comments.create_comment("1", &comment_form(Some("1"))).await.unwrap();
    }

    let reloaded = OwnershipTracker::load(&store);
    assert!(reloaded.is_comment_owner("1"));
    assert!(reloaded.is_comment_owner("2"));
    assert!(reloaded.owned_posts().is_empty());
}

#[tokio::test]
async fn deleting_unowned_comment_succeeds() {
    let tracker = RefCell::new(OwnershipTracker::load(MemoryStore::new()));
    let repo = MemoryCommentRepository::new();
    repo.seed("1", seeded_comment("42"));
    let comments = CommentUseCases::new(&repo, &tracker);

    assert!(!tracker.borrow().is_comment_owner("42"));
    comments.delete_comment("1", "42").await.unwrap();

    assert!(!tracker.borrow().is_comment_owner("42"));
    assert_eq!(repo.count("1"), 0);
}

#[tokio::test]
async fn failed_comment_create_adds_nothing() {
    let tracker = RefCell::new(OwnershipTracker::load(MemoryStore::new()));
    let repo = MemoryCommentRepository::new();
    repo.set_failing(true);
    let comments = CommentUseCases::new(&repo, &tracker);

    assert!(comments.create_comment("1", &comment_form(None)).await.is_err());
    assert!(tracker.borrow().owned_comments().is_empty());
}

#[tokio::test]
async fn comment_tree_from_repository() {
    let tracker = RefCell::new(OwnershipTracker::load(MemoryStore::new()));
    let comments = CommentUseCases::new(MemoryCommentRepository::new(), &tracker);

    let root = comments.create_comment("5", &comment_form(None)).await.unwrap();
    let reply = comments
        .create_comment("5", &comment_form(Some(&root.id)))
        .await
        .unwrap();
    comments
        .create_comment("5", &comment_form(Some("deleted-parent")))
        .await
        .unwrap();
    comments.create_comment("6", &comment_form(None)).await.unwrap();

    let tree = comments.get_comment_tree("5").await.unwrap();
    assert_eq!(tree.roots().len(), 1);
    assert_eq!(tree.roots()[0].children[0].comment.id, reply.id);
    assert_eq!(tree.len(), 2);
    assert_eq!(tree.excluded(), 1);
}

#[tokio::test]
async fn edited_comment_keeps_parent() {
    let tracker = RefCell::new(OwnershipTracker::load(MemoryStore::new()));
    let comments = CommentUseCases::new(MemoryCommentRepository::new(), &tracker);
    let root = comments.create_comment("5", &comment_form(None)).await.unwrap();
    let reply = comments
        .create_comment("5", &comment_form(Some(&root.id)))
        .await
        .unwrap();

    let mut edit = CommentForm::from_comment(&reply);
    edit.content = "Edited".into();
    let updated = comments
        .update_comment("5", &reply.id, &edit)
        .await
        .unwrap();

    assert_eq!(updated.content, "Edited");
    assert_eq!(updated.parent_id.as_deref(), Some(root.id.as_str()));
    assert!(tracker.borrow().is_comment_owner(&reply.id));
}
