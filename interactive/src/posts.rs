use leptos::prelude::*;
use leptos_router::components::Redirect;
use leptos_router::hooks::use_params_map;
use quillpost_shared::{FormErrors, Notice, Post, PostForm};
use wasm_bindgen_futures::spawn_local;

use crate::comments::CommentSection;
use crate::state::AppState;
use crate::widgets::{
    avatar_or_placeholder, format_post_date, AuthorFields, ConfirmDialog, EmptyState, LoadState,
    NotFound, PostSkeleton, SkeletonList,
};

const EXCERPT_CHARS: usize = 160;

fn excerpt(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        format!("{}…", head.trim_end())
    } else {
        head
    }
}

// ── List ──

#[component]
pub fn HomePage() -> impl IntoView {
    let state = expect_context::<AppState>();
    let posts: RwSignal<Vec<Post>> = RwSignal::new(Vec::new());
    let loading = RwSignal::new(true);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let show_form = RwSignal::new(false);

    spawn_local(async move {
        match state.posts().get_posts().await {
            Ok(p) => posts.set(p),
            Err(e) => {
                tracing::warn!(error = %e, "could not load posts");
                error.set(Some(e.user_message()));
            }
        }
        loading.set(false);
    });

    let is_empty = move || !loading.get() && error.get().is_none() && posts.with(Vec::is_empty);

    view! {
        <section class="quillpost-home">
            <div class="quillpost-toolbar">
                <h2>"Posts"</h2>
                <button class="quillpost-btn" on:click=move |_| show_form.update(|v| *v = !*v)>
                    {move || if show_form.get() { "Cancel" } else { "New Post" }}
                </button>
            </div>
            <Show when=move || show_form.get()>
                <CreatePostForm posts=posts show_form=show_form />
            </Show>
            <Show when=move || loading.get()>
                <SkeletonList count=3 comments=false />
            </Show>
            <Show when=move || error.get().is_some()>
                <p class="quillpost-error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <Show when=is_empty>
                <EmptyState message="No posts yet. Be the first to write one!" />
            </Show>
            <div class="quillpost-post-list">
                <For
                    each=move || posts.get()
                    key=|p| p.id.clone()
                    let:post
                >
                    <PostCard post=post />
                </For>
            </div>
        </section>
    }
}

#[component]
fn PostCard(post: Post) -> impl IntoView {
    let state = expect_context::<AppState>();
    let id = post.id.clone();
    let owned = move || state.is_post_owner(&id);

    view! {
        <a class="quillpost-post-card" href=format!("/post/{}", post.id)>
            <div class="quillpost-post-title">{post.title.clone()}</div>
            <p class="quillpost-post-excerpt">{excerpt(&post.content)}</p>
            <div class="quillpost-post-meta">
                <img
                    src=avatar_or_placeholder(&post.avatar)
                    alt=post.name.clone()
                    class="quillpost-avatar"
                    width="24"
                    height="24"
                />
                <span>{post.name.clone()}</span>
                <time>{format_post_date(&post.created_at)}</time>
                <Show when=owned>
                    <span class="quillpost-badge">"Yours"</span>
                </Show>
            </div>
        </a>
    }
}

/// New post form.
#[component]
fn CreatePostForm(posts: RwSignal<Vec<Post>>, show_form: RwSignal<bool>) -> impl IntoView {
    let state = expect_context::<AppState>();
    let (initial_name, initial_avatar) = state.identity.with_untracked(|id| {
        (
            id.name().unwrap_or_default().to_owned(),
            id.avatar().unwrap_or_default().to_owned(),
        )
    });
    let title = RwSignal::new(String::new());
    let content = RwSignal::new(String::new());
    let name = RwSignal::new(initial_name);
    let avatar = RwSignal::new(initial_avatar);
    let errors = RwSignal::new(FormErrors::default());
    let submitting = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let (author, author_avatar) = state
            .identity
            .with_untracked(|id| id.author_or(&name.get_untracked(), &avatar.get_untracked()));
        let form = PostForm {
            title: title.get_untracked(),
            content: content.get_untracked(),
            name: author,
            avatar: author_avatar,
            created_at: None,
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
            let outcome = state.posts().create_post(&form).await;
            state.notify(Notice::from_outcome("Post created", &outcome));
            if let Ok(created) = outcome {
                posts.update(|list| list.insert(0, created));
                title.set(String::new());
                content.set(String::new());
                show_form.set(false);
            }
            submitting.set(false);
        });
    };

    let field_error =
        move |field: &'static str| Signal::derive(move || errors.with(|e| e.get(field)));

    view! {
        <form class="quillpost-post-form" on:submit=on_submit>
            <AuthorFields
                name=name
                avatar=avatar
                name_error=field_error("name")
                avatar_error=field_error("avatar")
            />
            <input
                class="quillpost-input"
                type="text"
                placeholder="Post title"
                prop:value=move || title.get()
                on:input=move |ev| title.set(event_target_value(&ev))
            />
            <span class="quillpost-field-error">{move || errors.with(|e| e.get("title"))}</span>
            <textarea
                class="quillpost-textarea"
                placeholder="Write your post..."
                prop:value=move || content.get()
                on:input=move |ev| content.set(event_target_value(&ev))
            />
            <span class="quillpost-field-error">{move || errors.with(|e| e.get("content"))}</span>
            <button class="quillpost-btn" type="submit" disabled=move || submitting.get()>
                {move || if submitting.get() { "Publishing..." } else { "Publish" }}
            </button>
        </form>
    }
}

// ── Detail ──

#[component]
pub fn PostDetailPage() -> impl IntoView {
    let state = expect_context::<AppState>();
    let params = use_params_map();
    let post: RwSignal<Option<Post>> = RwSignal::new(None);
    let status = RwSignal::new(LoadState::Loading);

    let post_id = Memo::new(move |_| params.get().get("id").unwrap_or_default());

    Effect::new(move |_| {
        let id = post_id.get();
        status.set(LoadState::Loading);
        spawn_local(async move {
            match state.posts().get_post(&id).await {
                Ok(p) => {
                    post.set(Some(p));
                    status.set(LoadState::Ready);
                }
                Err(e) if e.is_not_found() => status.set(LoadState::NotFound),
                Err(e) => {
                    tracing::warn!(post_id = %id, error = %e, "could not load post");
                    status.set(LoadState::Failed(e.user_message()));
                }
            }
        });
    });

    move || match status.get() {
        LoadState::Loading => view! { <PostSkeleton /> }.into_any(),
        LoadState::NotFound => view! { <NotFound what="post" /> }.into_any(),
        LoadState::Failed(message) => view! { <p class="quillpost-error">{message}</p> }.into_any(),
        LoadState::Deleted => view! { <Redirect path="/" /> }.into_any(),
        LoadState::Ready => view! {
            <div class="quillpost-post-page">
                <PostDetail post=post status=status />
                <CommentSection post_id=post_id.get_untracked() />
            </div>
        }
        .into_any(),
    }
}

#[component]
fn PostDetail(post: RwSignal<Option<Post>>, status: RwSignal<LoadState>) -> impl IntoView {
    let state = expect_context::<AppState>();
    let editing = RwSignal::new(false);
    let confirming = RwSignal::new(false);
    let deleting = RwSignal::new(false);

    let is_owner = move || post.with(|p| p.as_ref().is_some_and(|p| state.is_post_owner(&p.id)));

    let on_confirm_delete = move |_| {
        let Some(id) = post.with_untracked(|p| p.as_ref().map(|p| p.id.clone())) else {
            return;
        };
        deleting.set(true);
        spawn_local(async move {
            let outcome = state.posts().delete_post(&id).await;
            state.notify(Notice::from_outcome("Post deleted", &outcome));
            deleting.set(false);
            confirming.set(false);
            if outcome.is_ok() {
                status.set(LoadState::Deleted);
            }
        });
    };

    move || {
        post.get().map(|p| {
            view! {
                <article class="quillpost-post-detail">
                    <h2>{p.title.clone()}</h2>
                    <div class="quillpost-post-meta">
                        <img
                            src=avatar_or_placeholder(&p.avatar)
                            alt=p.name.clone()
                            class="quillpost-avatar"
                            width="32"
                            height="32"
                        />
                        <strong>{p.name.clone()}</strong>
                        <time>{format_post_date(&p.created_at)}</time>
                    </div>
                    <Show when=is_owner>
                        <div class="quillpost-owner-actions">
                            <button
                                class="quillpost-btn quillpost-btn-sm"
                                on:click=move |_| editing.update(|v| *v = !*v)
                            >
                                {move || if editing.get() { "Cancel edit" } else { "Edit" }}
                            </button>
                            <button
                                class="quillpost-btn quillpost-btn-sm quillpost-btn-danger"
                                on:click=move |_| confirming.set(true)
                            >
                                "Delete"
                            </button>
                        </div>
                    </Show>
                    <Show
                        when=move || editing.get()
                        fallback=move || view! {
                            <div class="quillpost-post-body">
                                {move || post.with(|p| p.as_ref().map(|p| p.content.clone()))}
                            </div>
                        }
                    >
                        <EditPostForm post=post editing=editing />
                    </Show>
                    <ConfirmDialog
                        open=confirming
                        title="Delete post"
                        message="Are you sure you want to delete this post? This action cannot be undone."
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
                </article>
            }
        })
    }
}

/// Edit form for an owned post. Author fields stay as they were.
#[component]
fn EditPostForm(post: RwSignal<Option<Post>>, editing: RwSignal<bool>) -> impl IntoView {
    let state = expect_context::<AppState>();
    let original = post.get_untracked();
    let title = RwSignal::new(original.as_ref().map(|p| p.title.clone()).unwrap_or_default());
    let content = RwSignal::new(original.as_ref().map(|p| p.content.clone()).unwrap_or_default());
    let errors = RwSignal::new(FormErrors::default());
    let submitting = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(current) = post.get_untracked() else {
            return;
        };
        let mut form = PostForm::from_post(&current);
        form.title = title.get_untracked();
        form.content = content.get_untracked();
        if let Err(e) = form.validate() {
            errors.set(e);
            return;
        }
        errors.set(FormErrors::default());
        submitting.set(true);
        spawn_local(async move {
            let outcome = state.posts().update_post(&current.id, &form).await;
            state.notify(Notice::from_outcome("Post updated", &outcome));
            if let Ok(updated) = outcome {
                post.set(Some(updated));
                editing.set(false);
            }
            submitting.set(false);
        });
    };

    view! {
        <form class="quillpost-post-form" on:submit=on_submit>
            <input
                class="quillpost-input"
                type="text"
                prop:value=move || title.get()
                on:input=move |ev| title.set(event_target_value(&ev))
            />
            <span class="quillpost-field-error">{move || errors.with(|e| e.get("title"))}</span>
            <textarea
                class="quillpost-textarea"
                prop:value=move || content.get()
                on:input=move |ev| content.set(event_target_value(&ev))
            />
            <span class="quillpost-field-error">{move || errors.with(|e| e.get("content"))}</span>
            <button class="quillpost-btn" type="submit" disabled=move || submitting.get()>
                {move || if submitting.get() { "Saving..." } else { "Save" }}
            </button>
        </form>
    }
}
