use crate::components::thread::config::{load_client_config, ClientConfig};
use crate::components::thread::error::ThreadError;
use crate::components::thread::intents::{
    delete_message_with_toast, DeleteDoubleCheck, DeleteMessage, Dispatch, History, Intent,
    ModalPayload,
};
use crate::components::thread::links::{get_thread_link, thread_id_from_slug};
use crate::components::thread::message::MessageServices;
use crate::components::thread::message_view::{
    ClickTracker, DomClick, MessageView, ViewportWidth, CLICK_CAPTURE_SCRIPT,
};
use crate::components::thread::modals::{DeleteDoubleCheckModal, GalleryModal, ToastStack};
use crate::components::thread::models::{
    can_moderate_message, show_author_context, MessageBody, MessageId, RouteLocation,
    ThreadRecord, ThreadState, ThreadType,
};
use crate::components::thread::storage::{load_state, save_state};
use crate::views::Home;
use dioxus::prelude::*;
use dioxus::router::Navigator;
#[cfg(target_arch = "wasm32")]
use gloo_timers::future::TimeoutFuture;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
use std::rc::Rc;
#[cfg(not(target_arch = "wasm32"))]
use tokio::time::sleep;

#[derive(Routable, Clone, PartialEq, Debug)]
#[rustfmt::skip]
pub enum Route {
    #[layout(ThreadShell)]
        #[route("/")]
        Home {},
        #[route("/thread/:thread_id?:..query")]
        ThreadPage { thread_id: String, query: String },
        #[route("/messages/:thread_id?:..query")]
        DirectMessagePage { thread_id: String, query: String },
        #[route("/:community/:channel/:slug?:..query")]
        StoryPage { community: String, channel: String, slug: String, query: String },
}

#[cfg(target_arch = "wasm32")]
async fn sleep_ms(ms: u64) {
    TimeoutFuture::new(ms.min(u32::MAX as u64) as u32).await;
}

#[cfg(not(target_arch = "wasm32"))]
async fn sleep_ms(ms: u64) {
    sleep(Duration::from_millis(ms)).await;
}

/// Store handle shared by every message view on the page.
#[derive(Clone, Copy)]
pub struct StoreDispatch {
    state: Signal<ThreadState>,
    toast_timeout_ms: u64,
}

impl StoreDispatch {
    fn schedule_toast_removal(&self, toast_id: String) {
        let store = *self;
        spawn(async move {
            sleep_ms(store.toast_timeout_ms).await;
            store.dispatch(Intent::RemoveToast(toast_id));
        });
    }
}

impl Dispatch for StoreDispatch {
    fn dispatch(&self, intent: Intent) {
        let mut state = self.state;
        let is_toast = matches!(intent, Intent::AddToast { .. });
        state.write().apply(intent);
        if is_toast {
            let toast_id = state.peek().toasts.last().map(|t| t.id.clone());
            if let Some(toast_id) = toast_id {
                self.schedule_toast_removal(toast_id);
            }
        }
    }
}

impl DeleteMessage for StoreDispatch {
    fn delete_message(&self, id: &MessageId) -> Result<bool, ThreadError> {
        let mut state = self.state;
        let mut state = state.write();
        state.remove_message(id)
    }
}

pub struct RouterHistory(Navigator);

impl History for RouterHistory {
    fn push(&self, location: RouteLocation) {
        if let Some(failure) = self.0.push(location.to_string()) {
            tracing::warn!(%location, "navigation failed: {}", failure.0);
        }
    }
}

fn search_from_query(query: &str) -> String {
    let query = query.trim_start_matches('?');
    if query.is_empty() {
        String::new()
    } else {
        format!("?{query}")
    }
}

#[component]
fn ThreadShell() -> Element {
    let config = use_hook(load_client_config);
    let app_state = use_signal(load_state);
    use_context_provider(|| app_state);

    // Persist state on change
    use_effect(move || {
        save_state(&app_state.read());
    });

    let tracker = use_context_provider(ClickTracker::new);
    use_future(move || async move {
        let mut eval = document::eval(CLICK_CAPTURE_SCRIPT);
        while let Ok(click) = eval.recv::<DomClick>().await {
            tracker.publish(click.into_interaction());
        }
    });
    let mut viewport_width = use_signal(|| f64::MAX);
    use_context_provider(|| ViewportWidth(viewport_width));

    use_future(move || async move {
        let mut eval = document::eval(
            r#"
            dioxus.send(window.innerWidth);
            window.addEventListener('resize', () => dioxus.send(window.innerWidth));
        "#,
        );
        while let Ok(width) = eval.recv::<f64>().await {
            viewport_width.set(width);
        }
    });

    let store = StoreDispatch {
        state: app_state,
        toast_timeout_ms: config.toast_timeout_ms,
    };
    let navigator = use_navigator();
    let services = use_hook(|| build_services(store, navigator, &config));
    use_context_provider(|| services.clone());

    let modal = app_state.read().modal.clone();
    let gallery_url = app_state.read().gallery.as_ref().and_then(|gallery| {
        app_state
            .read()
            .find_message(&gallery.message_id)
            .and_then(|(_, message)| match &message.body {
                MessageBody::Media { url } => Some(url.clone()),
                MessageBody::Text(_) => None,
            })
    });
    let toasts = app_state.read().toasts.clone();

    rsx! {
        div { class: "thread-shell",
            Outlet::<Route> {}

            if let Some(ModalPayload::DeleteDoubleCheck(payload)) = modal {
                DeleteDoubleCheckModal {
                    payload,
                    on_close: move |_| store.dispatch(Intent::CloseModal),
                    on_confirm: move |payload: DeleteDoubleCheck| {
                        delete_message_with_toast(&store, &store, &payload.id);
                    },
                }
            }
            if let Some(url) = gallery_url {
                GalleryModal {
                    url,
                    on_close: move |_| store.dispatch(Intent::CloseGallery),
                }
            }
            ToastStack {
                toasts,
                on_dismiss: move |id| store.dispatch(Intent::RemoveToast(id)),
            }
        }
    }
}

fn build_services(store: StoreDispatch, navigator: Navigator, config: &ClientConfig) -> MessageServices {
    MessageServices::new(
        Rc::new(store),
        Rc::new(store),
        Rc::new(RouterHistory(navigator)),
        config,
    )
}

#[component]
fn ThreadPage(thread_id: String, query: String) -> Element {
    rsx! {
        ThreadTimeline { thread_id, search: search_from_query(&query) }
    }
}

#[component]
fn DirectMessagePage(thread_id: String, query: String) -> Element {
    rsx! {
        ThreadTimeline { thread_id, search: search_from_query(&query) }
    }
}

#[component]
fn StoryPage(community: String, channel: String, slug: String, query: String) -> Element {
    let thread_id = thread_id_from_slug(&slug).to_string();
    tracing::debug!(%community, %channel, %thread_id, "opening story");
    rsx! {
        ThreadTimeline { thread_id, search: search_from_query(&query) }
    }
}

#[component]
fn ThreadTimeline(thread_id: String, search: String) -> Element {
    let app_state = use_context::<Signal<ThreadState>>();
    let services = use_context::<MessageServices>();
    let route = use_route::<Route>();
    let location = RouteLocation::new(
        RouteLocation::from_path(&route.to_string()).pathname,
        search,
    );

    let state = app_state.read();
    let Some(record) = state.thread(&thread_id) else {
        return rsx! {
            div { class: "thread-missing",
                "This conversation does not exist."
                Link { to: Route::Home {}, "Back to threads" }
            }
        };
    };
    let current_user = state.current_user.clone();
    let focused = state.focused_message.clone();
    let thread = record.thread.clone();
    let thread_type = record.thread_type;
    let messages = record.messages.clone();
    drop(state);

    let heading = match thread_type {
        ThreadType::Story => thread.title.clone(),
        ThreadType::DirectMessageThread => format!("Messages · {}", thread.title),
    };

    rsx! {
        div { class: "thread",
            header { class: "thread-header",
                Link { to: Route::Home {}, class: "thread-back", "←" }
                h1 { "{heading}" }
            }
            div { class: "thread-messages",
                for (idx, message) in messages.iter().enumerate() {
                    div {
                        key: "{message.id}",
                        class: if focused.as_ref() == Some(&message.id) { "message-row message-focused" } else { "message-row" },
                        MessageView {
                            me: current_user.as_ref().is_some_and(|user| user.is_author_of(message)),
                            show_author_context: show_author_context(
                                idx.checked_sub(1).and_then(|prev| messages.get(prev)),
                                message,
                            ),
                            message: message.clone(),
                            can_moderate_message: can_moderate_message(current_user.as_ref(), message),
                            thread: Some(thread.clone()),
                            thread_type,
                            location: location.clone(),
                            current_user: current_user.clone(),
                            services: services.clone(),
                        }
                    }
                }
            }
        }
    }
}

/// Path of a thread page given its type.
pub fn thread_path(record: &ThreadRecord) -> String {
    match record.thread_type {
        ThreadType::Story => get_thread_link(&record.thread),
        ThreadType::DirectMessageThread => format!("/messages/{}", record.thread.id),
    }
}
