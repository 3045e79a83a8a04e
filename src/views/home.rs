use crate::components::thread::layout::thread_path;
use crate::components::thread::models::{ThreadState, ThreadType};
use dioxus::prelude::*;

fn thread_kind(thread_type: ThreadType) -> &'static str {
    match thread_type {
        ThreadType::Story => "story",
        ThreadType::DirectMessageThread => "direct message",
    }
}

/// Thread index rendered when the current route is `[Route::Home]`
#[component]
pub fn Home() -> Element {
    let app_state = use_context::<Signal<ThreadState>>();
    let threads = app_state.read().threads.clone();

    rsx! {
        div { class: "thread-index",
            h1 { "Threads" }
            ul {
                for record in threads {
                    li { key: "{record.thread.id}",
                        Link { to: thread_path(&record),
                            span { class: "thread-index-title", "{record.thread.title}" }
                            span { class: "thread-index-meta",
                                "{thread_kind(record.thread_type)} · {record.messages.len()} messages"
                            }
                        }
                    }
                }
            }
        }
    }
}
