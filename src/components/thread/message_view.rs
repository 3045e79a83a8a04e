use crate::components::thread::message::{
    should_update, Interaction, MessageController, MessageMarkers, MessageServices,
    PointerRegion, RenderedMessage, Viewport,
};
use crate::components::thread::models::{
    CurrentUser, Message, MessageBody, MessageId, RouteLocation, Thread, ThreadType, User,
};
use crate::components::thread::time_format::convert_timestamp_to_time;
use dioxus::prelude::*;
use serde::Deserialize;
use std::rc::Rc;

/// Width of the host window, kept current by the layout.
#[derive(Clone, Copy)]
pub struct ViewportWidth(pub Signal<f64>);

impl Viewport for ViewportWidth {
    fn width(&self) -> f64 {
        *self.0.peek()
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct ClickRecord {
    pub seq: u64,
    pub interaction: Interaction,
}

/// Installs a capture-phase listener on the document, so clicks are reported
/// even when a handler further down stops their propagation.
pub const CLICK_CAPTURE_SCRIPT: &str = r#"
    document.addEventListener('click', (event) => {
        const owner = event.target instanceof Element
            ? event.target.closest('[data-message-key]')
            : null;
        dioxus.send({
            shift_key: event.shiftKey,
            target: owner ? owner.getAttribute('data-message-key') : null,
        });
    }, true);
"#;

/// A click as reported by [`CLICK_CAPTURE_SCRIPT`].
#[derive(Clone, PartialEq, Debug, Default, Deserialize)]
pub struct DomClick {
    #[serde(default)]
    pub shift_key: bool,
    #[serde(default)]
    pub target: Option<String>,
}

impl DomClick {
    pub fn into_interaction(self) -> Interaction {
        let target = self.target.as_deref().and_then(MessageId::from_dom_key);
        Interaction::new(self.shift_key, target)
    }
}

/// Document-level click bookkeeping. Every click on the page is published
/// here with a rising sequence number; selected messages compare it against
/// their own region.
#[derive(Clone, Copy)]
pub struct ClickTracker {
    last_click: Signal<Option<ClickRecord>>,
}

impl ClickTracker {
    pub fn new() -> Self {
        Self {
            last_click: Signal::new(None),
        }
    }

    pub fn publish(&self, interaction: Interaction) {
        let mut last_click = self.last_click;
        let seq = self.seq() + 1;
        last_click.set(Some(ClickRecord { seq, interaction }));
    }

    pub fn seq(&self) -> u64 {
        self.last_click.peek().as_ref().map(|c| c.seq).unwrap_or(0)
    }
}

#[component]
pub fn OutsideClickHandler(
    region: RenderedMessage,
    on_outside_click: EventHandler<Interaction>,
    children: Element,
) -> Element {
    let tracker = try_consume_context::<ClickTracker>();
    let mounted_seq = use_hook(|| tracker.map(|t| t.seq()).unwrap_or(0));

    use_effect(move || {
        let Some(tracker) = tracker else {
            return;
        };
        let Some(record) = tracker.last_click.read().clone() else {
            return;
        };
        if record.seq <= mounted_seq {
            return;
        }
        if !region.contains(&record.interaction) {
            on_outside_click.call(record.interaction);
        }
    });

    rsx! {
        div { style: "width: 100%;", {children} }
    }
}

#[derive(Props, Clone)]
pub struct MessageViewProps {
    pub me: bool,
    pub show_author_context: bool,
    pub message: Message,
    pub can_moderate_message: bool,
    #[props(!optional)]
    pub thread: Option<Thread>,
    pub thread_type: ThreadType,
    pub location: RouteLocation,
    #[props(!optional)]
    pub current_user: Option<CurrentUser>,
    pub services: MessageServices,
}

impl PartialEq for MessageViewProps {
    fn eq(&self, other: &Self) -> bool {
        !should_update(&self.message, &other.message)
    }
}

/// Owned copy of the props so event handlers can rebuild a controller.
struct MessageScope {
    message: Message,
    thread: Option<Thread>,
    thread_type: ThreadType,
    location: RouteLocation,
    services: MessageServices,
}

impl MessageScope {
    fn controller(&self) -> MessageController<'_> {
        MessageController {
            message: &self.message,
            thread: self.thread.as_ref(),
            thread_type: self.thread_type,
            location: &self.location,
            services: &self.services,
        }
    }
}

#[allow(non_snake_case)]
pub fn MessageView(props: MessageViewProps) -> Element {
    let MessageViewProps {
        me,
        show_author_context,
        message,
        can_moderate_message,
        thread,
        thread_type,
        location,
        current_user,
        services,
    } = props;

    let viewport = try_consume_context::<ViewportWidth>();

    let scope = Rc::new(MessageScope {
        message: message.clone(),
        thread,
        thread_type,
        location,
        services,
    });
    let controller = scope.controller();
    let message_url = controller.message_url();
    let is_selected = controller.is_selected();
    let markers = controller.markers(can_moderate_message);
    let region = controller.region();
    let can_react = current_user.is_some() && !me;

    let select_scope = scope.clone();
    let select_region = region.clone();
    let on_root_click = move |evt: MouseEvent| {
        let controller = select_scope.controller();
        let mut interaction = Interaction::new(
            evt.modifiers().shift(),
            Some(controller.message.id.clone()),
        );
        let width = viewport.map(|v| v.width()).unwrap_or(f64::MAX);
        controller.handle_select_message(&mut interaction, &width, &select_region);
        if interaction.propagation_stopped() {
            evt.stop_propagation();
        }
    };

    let outside_scope = scope.clone();
    let on_outside_click = move |interaction: Interaction| {
        let controller = outside_scope.controller();
        let region = controller.region();
        controller.handle_outside_click(&interaction, &region);
    };

    let gallery_scope = scope.clone();
    let on_open_gallery = move |evt: MouseEvent| {
        let mut interaction = Interaction::new(evt.modifiers().shift(), None);
        gallery_scope.controller().toggle_open_gallery(&mut interaction);
        if interaction.propagation_stopped() {
            evt.stop_propagation();
        }
    };

    let reaction_scope = scope.clone();
    let on_toggle_reaction = move |evt: MouseEvent| {
        if !can_react {
            return;
        }
        let mut interaction = Interaction::new(evt.modifiers().shift(), None);
        reaction_scope.controller().toggle_reaction(me, &mut interaction);
        if interaction.propagation_stopped() {
            evt.stop_propagation();
        }
    };

    let delete_scope = scope.clone();
    let on_delete = move |evt: MouseEvent| {
        let mut interaction = Interaction::new(evt.modifiers().shift(), None);
        delete_scope.controller().handle_delete(&mut interaction);
        if interaction.propagation_stopped() {
            evt.stop_propagation();
        }
    };

    let copy_scope = scope.clone();
    let on_copy_link = move |_: MouseEvent| {
        let scope = copy_scope.clone();
        let Some(text) = scope.controller().copy_link_text() else {
            return;
        };
        spawn(async move {
            let text_json = serde_json::to_string(&text).unwrap_or_else(|_| "\"\"".to_string());
            let script = format!(
                r#"
                await navigator.clipboard.writeText({text_json});
                return true;
            "#
            );
            match document::eval(&script).await {
                Ok(serde_json::Value::Bool(true)) => scope.controller().on_copy_success(),
                Ok(_) => {}
                Err(err) => tracing::warn!("clipboard write failed: {err:?}"),
            }
        });
    };

    let MessageMarkers {
        container_class,
        data_cy,
        dom_key,
        edited_tooltip,
        action_row,
    } = markers;
    let author = message.author.clone();
    let timestamp = message.timestamp;
    let reactions = message.reactions;

    let body = rsx! {
        div {
            class: "{container_class}",
            "data-cy": "{data_cy}",
            "data-message-key": "{dom_key}",
            tabindex: 0,
            onclick: on_root_click,

            div { class: "message-gutter",
                if show_author_context {
                    div {
                        class: "message-avatar",
                        onclick: |e| e.stop_propagation(),
                        UserAvatar { user: author.user.clone(), size: 40 }
                    }
                } else {
                    Link { class: "message-gutter-timestamp", to: message_url.clone(),
                        "{convert_timestamp_to_time(timestamp)}"
                    }
                }
            }

            div { class: "message-inner",
                if show_author_context {
                    AuthorByline {
                        timestamp,
                        user: author.user.clone(),
                        roles: author.roles.clone(),
                        bot: message.bot,
                        message_url: message_url.clone(),
                    }
                }

                MessageBodyView { me, body: message.body.clone(), on_open_gallery }

                if let Some(content) = edited_tooltip {
                    Tooltip { content,
                        span {
                            class: "message-edited",
                            "data-cy": "edited-message-indicator",
                            "Edited"
                        }
                    }
                }

                if reactions.count > 0 {
                    button {
                        class: if reactions.has_reacted { "reaction reaction-active" } else { "reaction" },
                        class: if me { "reaction-own" } else { "" },
                        disabled: !can_react,
                        onclick: on_toggle_reaction,
                        span {
                            class: "icon icon-like-fill",
                            "data-cy": if reactions.has_reacted { "inline-unlike-action" } else { "inline-like-action" },
                            "♥"
                        }
                        span { "{reactions.count}" }
                    }
                }

                if let Some(actions) = action_row {
                    div { class: "message-actions",
                        if actions.delete {
                            Tooltip { content: "Delete".to_string(),
                                button {
                                    class: "message-action",
                                    "data-cy": "delete-message",
                                    onclick: on_delete,
                                    "🗑"
                                }
                            }
                        }
                        if actions.copy_link {
                            Tooltip { content: "Link to message".to_string(),
                                button {
                                    class: "message-action",
                                    "data-cy": "link-to-message",
                                    onclick: on_copy_link,
                                    "🔗"
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    if is_selected {
        rsx! {
            OutsideClickHandler { region, on_outside_click, {body} }
        }
    } else {
        body
    }
}

#[component]
fn Tooltip(content: String, children: Element) -> Element {
    rsx! {
        span { class: "tooltip", title: "{content}", "data-tooltip": "{content}", {children} }
    }
}

#[component]
fn UserAvatar(user: User, size: u32) -> Element {
    let initial = user.name.chars().next().unwrap_or('?');
    rsx! {
        div {
            class: "avatar",
            style: "width: {size}px; height: {size}px;",
            if !user.profile_photo.is_empty() {
                img { src: "{user.profile_photo}", alt: "{user.name}" }
            } else {
                span { class: "avatar-initial", "{initial}" }
            }
        }
    }
}

#[component]
fn AuthorByline(
    timestamp: i64,
    user: User,
    roles: Vec<String>,
    bot: bool,
    message_url: String,
) -> Element {
    rsx! {
        div { class: "byline",
            span { class: "byline-name", "{user.name}" }
            if !user.username.is_empty() {
                span { class: "byline-username", "@{user.username}" }
            }
            for role in roles {
                span { class: "badge", key: "{role}", "{role}" }
            }
            if bot {
                span { class: "badge badge-bot", "Bot" }
            }
            Link { class: "byline-timestamp", to: message_url,
                "{convert_timestamp_to_time(timestamp)}"
            }
        }
    }
}

#[component]
fn MessageBodyView(me: bool, body: MessageBody, on_open_gallery: EventHandler<MouseEvent>) -> Element {
    let bubble_class = if me { "body body-me" } else { "body" };
    match body {
        MessageBody::Text(text) => rsx! {
            div { class: "{bubble_class}",
                for (idx, line) in text.lines().map(str::to_string).enumerate() {
                    p { key: "{idx}", "{line}" }
                }
            }
        },
        MessageBody::Media { url } => rsx! {
            div { class: "{bubble_class} body-media",
                img {
                    src: "{url}",
                    class: "body-image",
                    onclick: move |evt| on_open_gallery.call(evt),
                }
            }
        },
    }
}
