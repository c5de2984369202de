use leptos::prelude::*;
use quillpost_shared::{Comment, CommentForm, CommentTree, FormErrors, Notice};
use wasm_bindgen_futures::spawn_local;

use crate::state::AppState;
use crate::widgets::{
    avatar_or_placeholder, format_comment_date, AuthorFields, ConfirmDialog, EmptyState,
    SkeletonList,
};

/// Indentation per reply level, in rem.
const INDENT_REM: usize = 2;

/// Comment thread of one post.
#[component]
pub fn CommentSection(post_id: String) -> impl IntoView {
    let state = expect_context::<AppState>();
    let comments: RwSignal<Vec<Comment>> = RwSignal::new(Vec::new());
    let loading = RwSignal::new(true);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let composer_open = RwSignal::new(true);
    let post_id = StoredValue::new(post_id);

    spawn_local(async move {
        let id = post_id.get_value();
        match state.comments().get_comments(&id).await {
            Ok(c) => comments.set(c),
            Err(e) => {
                tracing::warn!(post_id = %id, error = %e, "could not load comments");
                error.set(Some(e.user_message()));
            }
        }
        loading.set(false);
    });

    let tree = Memo::new(move |_| comments.with(|c| CommentTree::build(c)));
    let rows = move || {
        tree.with(|t| {
            t.iter()
                .map(|(depth, c)| (depth, c.clone()))
                .collect::<Vec<_>>()
        })
    };
    let is_empty =
        move || !loading.get() && error.get().is_none() && tree.with(CommentTree::is_empty);

    view! {
        <section class="quillpost-comments">
            <h3>{move || format!("Comments ({})", tree.with(CommentTree::len))}</h3>
            <CommentComposer post_id=post_id parent_id=None comments=comments open=composer_open />
            <Show when=move || loading.get()>
                <SkeletonList count=2 comments=true />
            </Show>
            <Show when=move || error.get().is_some()>
                <p class="quillpost-error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <Show when=is_empty>
                <EmptyState message="No comments yet. Start the conversation!" />
            </Show>
            <div class="quillpost-comment-list">
                <For
                    each=rows
                    key=|(depth, c)| (c.id.clone(), *depth, c.content.clone())
                    let:row
                >
                    <CommentItem comment=row.1 depth=row.0 post_id=post_id comments=comments />
                </For>
            </div>
        </section>
    }
}

/// Single comment with reply, and edit/delete when this browser wrote it.
#[component]
fn CommentItem(
    comment: Comment,
    depth: usize,
    post_id: StoredValue<String>,
    comments: RwSignal<Vec<Comment>>,
) -> impl IntoView {
    let state = expect_context::<AppState>();
    let replying = RwSignal::new(false);
    let editing = RwSignal::new(false);
    let confirming = RwSignal::new(false);
    let deleting = RwSignal::new(false);
    let comment_id = StoredValue::new(comment.id.clone());

    let is_owner = move || comment_id.with_value(|id| state.is_comment_owner(id));

    let on_confirm_delete = move |_| {
        deleting.set(true);
        spawn_local(async move {
            let id = comment_id.get_value();
            let outcome = state
                .comments()
                .delete_comment(&post_id.get_value(), &id)
                .await;
            state.notify(Notice::from_outcome("Comment deleted", &outcome));
            deleting.set(false);
            confirming.set(false);
            if outcome.is_ok() {
                comments.update(|list| list.retain(|c| c.id != id));
            }
        });
    };

    let edit_target = comment.clone();

    view! {
        <div
            class="quillpost-comment"
            class:quillpost-comment-reply={depth > 0}
            style=format!("margin-left: {}rem", depth * INDENT_REM)
        >
            <div class="quillpost-comment-header">
                <img
                    src=avatar_or_placeholder(&comment.avatar)
                    alt=comment.name.clone()
                    class="quillpost-avatar"
                    width="24"
                    height="24"
                />
                <strong>{comment.name.clone()}</strong>
                <time>{format_comment_date(&comment.created_at)}</time>
                <button
                    class="quillpost-btn quillpost-btn-sm"
                    on:click=move |_| replying.update(|v| *v = !*v)
                >
                    {move || if replying.get() { "Cancel reply" } else { "Reply" }}
                </button>
                <Show when=is_owner>
                    <button
                        class="quillpost-btn quillpost-btn-sm"
                        on:click=move |_| editing.update(|v| *v = !*v)
                    >
                        {move || if editing.get() { "Cancel edit" } else { "Edit" }}
                    </button>
                    <button
                        class="quillpost-btn quillpost-btn-sm quillpost-btn-danger"
                        disabled=move || deleting.get()
                        on:click=move |_| confirming.set(true)
                    >
                        "Delete"
                    </button>
                </Show>
            </div>
            <Show
                when=move || editing.get()
                fallback={
                    let content = comment.content.clone();
                    move || view! { <p class="quillpost-comment-body">{content.clone()}</p> }
                }
            >
                <CommentEditor
                    comment=edit_target.clone()
                    post_id=post_id
                    comments=comments
                    editing=editing
                />
            </Show>
            <Show when=move || replying.get()>
                <CommentComposer
                    post_id=post_id
                    parent_id=Some(comment_id.get_value())
                    comments=comments
                    open=replying
                />
            </Show>
            <ConfirmDialog
                open=confirming
                title="Delete comment"
                message="Are you sure you want to delete this comment? This action cannot be undone."
            >
                <button
                    class="quillpost-btn quillpost-btn-danger"
                    type="button"
                    disabled=move || deleting.get()
                    on:click=on_confirm_delete
                >
                    {move || if deleting.get() { "Deleting..." } else { "Delete" }}
                </button>
            </ConfirmDialog>
        </div>
    }
}

/// Form for a new top-level comment (`parent_id` = `None`) or a reply.
#[component]
fn CommentComposer(
    post_id: StoredValue<String>,
    parent_id: Option<String>,
    comments: RwSignal<Vec<Comment>>,
    open: RwSignal<bool>,
) -> impl IntoView {
    let state = expect_context::<AppState>();
    let (initial_name, initial_avatar) = state.identity.with_untracked(|id| {
        (
            id.name().unwrap_or_default().to_owned(),
            id.avatar().unwrap_or_default().to_owned(),
        )
    });
    let name = RwSignal::new(initial_name);
    let avatar = RwSignal::new(initial_avatar);
    let content = RwSignal::new(String::new());
    let errors = RwSignal::new(FormErrors::default());
    let submitting = RwSignal::new(false);
    let is_reply = parent_id.is_some();
    let parent_id = StoredValue::new(parent_id);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let (author, author_avatar) = state
            .identity
            .with_untracked(|id| id.author_or(&name.get_untracked(), &avatar.get_untracked()));
        let form = CommentForm {
            content: content.get_untracked(),
            name: author,
            avatar: author_avatar,
            ..CommentForm::reply_to(parent_id.get_value())
        };
        if let Err(e) = form.validate() {
            errors.set(e);
            return;
        }
        errors.set(FormErrors::default());
        state
            .identity
            .update(|id| id.remember(&form.name, &form.avatar));
        submitting.set(true);
        let form = form.stamped();
        spawn_local(async move {
            let outcome = state
                .comments()
                .create_comment(&post_id.get_value(), &form)
                .await;
            state.notify(Notice::from_outcome("Comment created", &outcome));
            if let Ok(created) = outcome {
                comments.update(|list| list.push(created));
                content.set(String::new());
                if is_reply {
                    open.set(false);
                }
            }
            submitting.set(false);
        });
    };

    let field_error =
        move |field: &'static str| Signal::derive(move || errors.with(|e| e.get(field)));

    view! {
        <form class="quillpost-comment-form" on:submit=on_submit>
            <AuthorFields
                name=name
                avatar=avatar
                name_error=field_error("name")
                avatar_error=field_error("avatar")
            />
            <textarea
                class="quillpost-textarea"
                placeholder="Write your comment here..."
                prop:value=move || content.get()
                on:input=move |ev| content.set(event_target_value(&ev))
            />
            <span class="quillpost-field-error">{move || errors.with(|e| e.get("content"))}</span>
            <button class="quillpost-btn" type="submit" disabled=move || submitting.get()>
                {move || match (submitting.get(), is_reply) {
                    (true, _) => "Posting...",
                    (false, true) => "Reply",
                    (false, false) => "Comment",
                }}
            </button>
        </form>
    }
}

/// Edit form for an owned comment. Only the text changes.
#[component]
fn CommentEditor(
    comment: Comment,
    post_id: StoredValue<String>,
    comments: RwSignal<Vec<Comment>>,
    editing: RwSignal<bool>,
) -> impl IntoView {
    let state = expect_context::<AppState>();
    let content = RwSignal::new(comment.content.clone());
    let errors = RwSignal::new(FormErrors::default());
    let submitting = RwSignal::new(false);
    let original = StoredValue::new(comment);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let (comment_id, mut form) =
            original.with_value(|c| (c.id.clone(), CommentForm::from_comment(c)));
        form.content = content.get_untracked();
        if let Err(e) = form.validate() {
            errors.set(e);
            return;
        }
        errors.set(FormErrors::default());
        submitting.set(true);
        spawn_local(async move {
            let outcome = state
                .comments()
                .update_comment(&post_id.get_value(), &comment_id, &form)
                .await;
            state.notify(Notice::from_outcome("Comment updated", &outcome));
            if let Ok(updated) = outcome {
                comments.update(|list| {
                    if let Some(slot) = list.iter_mut().find(|c| c.id == updated.id) {
                        *slot = updated;
                    }
                });
                editing.set(false);
            }
            submitting.set(false);
        });
    };

    view! {
        <form class="quillpost-comment-form" on:submit=on_submit>
            <textarea
                class="quillpost-textarea"
                prop:value=move || content.get()
                on:input=move |ev| content.set(event_target_value(&ev))
            />
            <span class="quillpost-field-error">{move || errors.with(|e| e.get("content"))}</span>
            <button class="quillpost-btn" type="submit" disabled=move || submitting.get()>
                {move || if submitting.get() { "Saving..." } else { "Update" }}
            </button>
        </form>
    }
}
