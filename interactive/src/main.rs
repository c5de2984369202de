mod api;
mod comments;
mod logging;
mod posts;
mod repositories;
mod state;
mod storage;
mod widgets;

use chrono::{Datelike, Local};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;
use wasm_bindgen::JsCast;

use crate::posts::{HomePage, PostDetailPage};
use crate::state::AppState;
use crate::widgets::{NotFound, Toasts};

const MOUNT_ID: &str = "quillpost";

#[component]
fn App() -> impl IntoView {
    provide_context(AppState::new(api::config()));

    view! {
        <Router>
            <header class="quillpost-header">
                <a href="/" class="quillpost-brand">"Quillpost"</a>
            </header>
            <main class="quillpost-main">
                <Routes fallback=|| view! { <NotFound what="page" /> }>
                    <Route path=path!("/") view=HomePage />
                    <Route path=path!("/post/:id") view=PostDetailPage />
                </Routes>
            </main>
            <footer class="quillpost-footer">
                {format!("© {} Quillpost", Local::now().year())}
            </footer>
            <Toasts />
        </Router>
    }
}

fn main() {
    console_error_panic_hook::set_once();
    logging::init();

    let mount_point = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(MOUNT_ID));

    match mount_point {
        Some(el) => {
            let html_el: web_sys::HtmlElement = el.unchecked_into();
            leptos::mount::mount_to(html_el, App).forget();
        }
        None => {
            tracing::debug!(id = MOUNT_ID, "mount point missing, mounting to body");
            leptos::mount::mount_to_body(App);
        }
    }
}
