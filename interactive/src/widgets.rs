use chrono::{DateTime, Local, Utc};
use leptos::prelude::*;
use quillpost_shared::NoticeLevel;

use crate::state::AppState;

/// Where a page fetch stands.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadState {
    Loading,
    Ready,
    NotFound,
    Failed(String),
    Deleted,
}

pub fn format_post_date(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%-d %B %Y, %H:%M").to_string()
}

pub fn format_comment_date(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%-d %b %Y, %H:%M").to_string()
}

pub fn avatar_or_placeholder(avatar: &str) -> String {
    if avatar.is_empty() {
        "https://via.placeholder.com/32".to_string()
    } else {
        avatar.to_string()
    }
}

// ── Placeholders ──

#[component]
pub fn EmptyState(message: &'static str) -> impl IntoView {
    view! { <p class="quillpost-empty">{message}</p> }
}

#[component]
pub fn NotFound(what: &'static str) -> impl IntoView {
    view! {
        <div class="quillpost-not-found">
            <h3>{format!("This {what} does not exist")}</h3>
            <a class="quillpost-btn" href="/">"Back to posts"</a>
        </div>
    }
}

#[component]
pub fn PostSkeleton() -> impl IntoView {
    view! {
        <div class="quillpost-skeleton quillpost-skeleton-post">
            <div class="quillpost-skeleton-line quillpost-skeleton-title"></div>
            <div class="quillpost-skeleton-line"></div>
            <div class="quillpost-skeleton-line quillpost-skeleton-short"></div>
        </div>
    }
}

#[component]
pub fn SkeletonList(count: usize, comments: bool) -> impl IntoView {
    let class = if comments {
        "quillpost-skeleton quillpost-skeleton-comment"
    } else {
        "quillpost-skeleton quillpost-skeleton-post"
    };
    (0..count)
        .map(|_| {
            view! {
                <div class=class>
                    <div class="quillpost-skeleton-avatar"></div>
                    <div class="quillpost-skeleton-line"></div>
                    <div class="quillpost-skeleton-line quillpost-skeleton-short"></div>
                </div>
            }
        })
        .collect_view()
}

// ── Dialogs ──

/// Confirmation dialog. `children` is the confirming button.
#[component]
pub fn ConfirmDialog(
    open: RwSignal<bool>,
    title: &'static str,
    message: &'static str,
    children: ChildrenFn,
) -> impl IntoView {
    view! {
        <Show when=move || open.get()>
            <div class="quillpost-modal-backdrop">
                <div class="quillpost-modal" role="dialog">
                    <h4>{title}</h4>
                    <p>{message}</p>
                    <div class="quillpost-modal-actions">
                        <button
                            class="quillpost-btn quillpost-btn-secondary"
                            type="button"
                            on:click=move |_| open.set(false)
                        >
                            "Cancel"
                        </button>
                        {children()}
                    </div>
                </div>
            </div>
        </Show>
    }
}

// ── Identity ──

/// Remembered author with a "not you?" reset. Clearing also empties the
/// form fields bound to `name` and `avatar`, which are not shown here.
#[component]
pub fn IdentityBadge(name: RwSignal<String>, avatar: RwSignal<String>) -> impl IntoView {
    let state = expect_context::<AppState>();

    let on_clear = move |_| {
        state.identity.update(|id| id.clear());
        name.set(String::new());
        avatar.set(String::new());
    };

    view! {
        <div class="quillpost-identity">
            <img
                src=move || {
                    state
                        .identity
                        .with(|id| avatar_or_placeholder(id.avatar().unwrap_or_default()))
                }
                alt=""
                class="quillpost-avatar"
                width="24"
                height="24"
            />
            <span class="quillpost-username">
                {move || state.identity.with(|id| id.name().unwrap_or_default().to_owned())}
            </span>
            <button class="quillpost-btn quillpost-btn-sm" type="button" on:click=on_clear>
                "Not you?"
            </button>
        </div>
    }
}

/// Name and avatar inputs, or the badge when an identity is remembered.
#[component]
pub fn AuthorFields(
    name: RwSignal<String>,
    avatar: RwSignal<String>,
    name_error: Signal<Option<&'static str>>,
    avatar_error: Signal<Option<&'static str>>,
) -> impl IntoView {
    let state = expect_context::<AppState>();
    let remembered = move || state.identity.with(|id| id.has_identity());

    view! {
        <Show
            when=remembered
            fallback=move || view! {
                <div class="quillpost-author-fields">
                    <label>
                        "Name"
                        <input
                            class="quillpost-input"
                            type="text"
                            placeholder="Your name"
                            prop:value=move || name.get()
                            on:input=move |ev| name.set(event_target_value(&ev))
                        />
                        <span class="quillpost-field-error">{move || name_error.get()}</span>
                    </label>
                    <label>
                        "Avatar (URL)"
                        <input
                            class="quillpost-input"
                            type="url"
                            placeholder="https://example.com/avatar.jpg"
                            prop:value=move || avatar.get()
                            on:input=move |ev| avatar.set(event_target_value(&ev))
                        />
                        <span class="quillpost-field-error">{move || avatar_error.get()}</span>
                    </label>
                </div>
            }
        >
            <IdentityBadge name=name avatar=avatar />
        </Show>
    }
}

// ── Toasts ──

#[component]
pub fn Toasts() -> impl IntoView {
    let state = expect_context::<AppState>();

    view! {
        <div class="quillpost-toasts">
            <For
                each=move || state.toasts.get()
                key=|t| t.id
                let:toast
            >
                <div
                    class="quillpost-toast"
                    class:quillpost-toast-error={toast.notice.level == NoticeLevel::Error}
                    on:click=move |_| state.dismiss(toast.id)
                >
                    {toast.notice.message.clone()}
                </div>
            </For>
        </div>
    }
}
