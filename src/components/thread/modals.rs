use crate::components::thread::intents::DeleteDoubleCheck;
use crate::components::thread::models::{Toast, ToastKind};
use dioxus::prelude::*;

#[component]
fn Modal(
    title: &'static str,
    content_confirmation_button: &'static str,
    children: Element,
    on_close: EventHandler,
    on_confirm: EventHandler,
) -> Element {
    rsx! {
        div {
            class: "modal-backdrop",
            onmousedown: move |_| on_close.call(()),
            onclick: |e| e.stop_propagation(),

            div {
                class: "modal-panel",
                onclick: |e| e.stop_propagation(),
                onmousedown: |e| e.stop_propagation(),

                div { class: "modal-header",
                    h2 { class: "modal-title", {title} }
                    button {
                        class: "modal-close",
                        onclick: move |_| on_close.call(()),
                        "✕"
                    }
                }

                div { class: "modal-body",
                    {children}

                    div { class: "modal-buttons",
                        button {
                            class: "button-text",
                            onclick: move |_| on_close.call(()),
                            "Cancel"
                        }
                        button {
                            class: "button-danger",
                            "data-cy": "delete-button",
                            onclick: move |_| {
                                on_confirm.call(());
                                on_close.call(());
                            },
                            {content_confirmation_button}
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn DeleteDoubleCheckModal(
    payload: DeleteDoubleCheck,
    on_close: EventHandler,
    on_confirm: EventHandler<DeleteDoubleCheck>,
) -> Element {
    let confirm_payload = payload.clone();
    rsx! {
        Modal {
            title: "Are you sure?",
            content_confirmation_button: "Delete",
            on_close,
            on_confirm: move |_| on_confirm.call(confirm_payload.clone()),
            p { class: "modal-message", "{payload.message}" }
        }
    }
}

#[component]
pub fn GalleryModal(url: String, on_close: EventHandler) -> Element {
    rsx! {
        div {
            class: "gallery-backdrop",
            onclick: move |e| {
                e.stop_propagation();
                on_close.call(());
            },
            img { class: "gallery-image", src: "{url}" }
        }
    }
}

#[component]
pub fn ToastStack(toasts: Vec<Toast>, on_dismiss: EventHandler<String>) -> Element {
    rsx! {
        div { class: "toast-stack",
            for toast in toasts {
                div {
                    key: "{toast.id}",
                    class: match toast.kind {
                        ToastKind::Success => "toast toast-success",
                        ToastKind::Neutral => "toast toast-neutral",
                        ToastKind::Error => "toast toast-error",
                    },
                    onclick: {
                        let id = toast.id.clone();
                        move |e: MouseEvent| {
                            e.stop_propagation();
                            on_dismiss.call(id.clone());
                        }
                    },
                    "{toast.message}"
                }
            }
        }
    }
}
