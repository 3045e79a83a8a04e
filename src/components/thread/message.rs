//! Presentation logic of a single thread message, free of any rendering host.
//!
//! [`MessageController`] derives the per-render state (selection, optimistic
//! flag, links) and runs the interaction handlers against the injected
//! collaborators in [`MessageServices`]. The Dioxus component in
//! `message_view` only translates DOM events into [`Interaction`]s.

use crate::components::thread::config::{ClientConfig, MOBILE_BREAKPOINT};
use crate::components::thread::intents::{
    delete_message_with_toast, DeleteDoubleCheck, DeleteMessage, Dispatch, History, Intent,
    ModalPayload, DELETE_MESSAGE_PROMPT,
};
use crate::components::thread::links::{SlugThreadLink, ThreadLinkResolver};
use crate::components::thread::models::{
    Message, MessageId, RouteLocation, Thread, ThreadType, ToastKind,
};
use crate::components::thread::selection::{
    is_optimistic, is_selected, message_permalink, message_url, selection_id, without_selection,
};
use crate::components::thread::time_format::convert_timestamp_to_date;
use std::rc::Rc;

pub const COPIED_TO_CLIPBOARD: &str = "Copied to clipboard";

/// Only the message identity and its reaction state trigger a re-render.
pub fn should_update(prev: &Message, next: &Message) -> bool {
    prev.id != next.id
        || prev.reactions.count != next.reactions.count
        || prev.reactions.has_reacted != next.reactions.has_reacted
}

pub trait Viewport {
    fn width(&self) -> f64;
}

impl Viewport for f64 {
    fn width(&self) -> f64 {
        *self
    }
}

pub trait PointerRegion {
    fn contains(&self, interaction: &Interaction) -> bool;
}

/// The subtree rendered for one message.
#[derive(Clone, PartialEq, Debug)]
pub struct RenderedMessage {
    pub message_id: MessageId,
}

impl PointerRegion for RenderedMessage {
    fn contains(&self, interaction: &Interaction) -> bool {
        interaction.target.as_ref() == Some(&self.message_id)
    }
}

/// A click or tap, reduced to what the handlers need.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Interaction {
    pub shift_key: bool,
    /// Message whose rendered subtree the pointer landed in, if any.
    pub target: Option<MessageId>,
    propagation_stopped: bool,
}

impl Interaction {
    pub fn new(shift_key: bool, target: Option<MessageId>) -> Self {
        Self {
            shift_key,
            target,
            propagation_stopped: false,
        }
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Collaborators a message view calls into.
#[derive(Clone)]
pub struct MessageServices {
    pub dispatch: Rc<dyn Dispatch>,
    pub deleter: Rc<dyn DeleteMessage>,
    pub history: Rc<dyn History>,
    pub links: Rc<dyn ThreadLinkResolver>,
    pub select_message: Rc<dyn Fn(MessageId)>,
    pub client_url: String,
}

impl MessageServices {
    pub fn new(
        dispatch: Rc<dyn Dispatch>,
        deleter: Rc<dyn DeleteMessage>,
        history: Rc<dyn History>,
        config: &ClientConfig,
    ) -> Self {
        let select_dispatch = dispatch.clone();
        Self {
            dispatch,
            deleter,
            history,
            links: Rc::new(SlugThreadLink),
            select_message: Rc::new(move |id: MessageId| {
                select_dispatch.dispatch(Intent::SelectMessage(id))
            }),
            client_url: config.client_url.clone(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ActionRow {
    pub delete: bool,
    pub copy_link: bool,
}

/// Classes and test markers of the rendered message root.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MessageMarkers {
    pub container_class: &'static str,
    pub data_cy: &'static str,
    pub dom_key: String,
    /// Present once the message has been edited.
    pub edited_tooltip: Option<String>,
    pub action_row: Option<ActionRow>,
}

pub struct MessageController<'a> {
    pub message: &'a Message,
    pub thread: Option<&'a Thread>,
    pub thread_type: ThreadType,
    pub location: &'a RouteLocation,
    pub services: &'a MessageServices,
}

impl MessageController<'_> {
    pub fn selection_id(&self) -> String {
        selection_id(self.message.timestamp)
    }

    pub fn message_url(&self) -> String {
        message_url(
            self.thread_type,
            self.thread,
            self.services.links.as_ref(),
            &self.selection_id(),
        )
    }

    pub fn is_selected(&self) -> bool {
        is_selected(self.location, &self.selection_id())
    }

    pub fn is_optimistic(&self) -> bool {
        is_optimistic(self.message)
    }

    pub fn region(&self) -> RenderedMessage {
        RenderedMessage {
            message_id: self.message.id.clone(),
        }
    }

    fn thread_id(&self) -> String {
        self.thread.map(|t| t.id.clone()).unwrap_or_default()
    }

    /// `None` while the message is optimistic: the whole row is hidden.
    pub fn action_row(&self, can_moderate_message: bool) -> Option<ActionRow> {
        if self.is_optimistic() {
            return None;
        }
        Some(ActionRow {
            delete: can_moderate_message,
            copy_link: self.thread_type == ThreadType::Story,
        })
    }

    pub fn markers(&self, can_moderate_message: bool) -> MessageMarkers {
        let selected = self.is_selected();
        MessageMarkers {
            container_class: if selected {
                "message message-selected"
            } else {
                "message"
            },
            data_cy: if selected { "message-selected" } else { "message" },
            dom_key: self.message.id.dom_key(),
            edited_tooltip: self
                .message
                .modified_at
                .map(|at| format!("Edited {}", convert_timestamp_to_date(at))),
            action_row: self.action_row(can_moderate_message),
        }
    }

    pub fn copy_link_text(&self) -> Option<String> {
        if self.thread_type != ThreadType::Story {
            return None;
        }
        Some(message_permalink(
            &self.services.client_url,
            self.thread,
            self.services.links.as_ref(),
            &self.selection_id(),
        ))
    }

    pub fn on_copy_success(&self) {
        self.services
            .dispatch
            .dispatch(Intent::toast(ToastKind::Success, COPIED_TO_CLIPBOARD));
    }

    pub fn handle_delete(&self, interaction: &mut Interaction) {
        interaction.stop_propagation();

        if interaction.shift_key {
            delete_message_with_toast(
                self.services.dispatch.as_ref(),
                self.services.deleter.as_ref(),
                &self.message.id,
            );
            return;
        }

        self.services
            .dispatch
            .dispatch(Intent::OpenModal(ModalPayload::DeleteDoubleCheck(
                DeleteDoubleCheck {
                    id: self.message.id.clone(),
                    entity: "message".to_string(),
                    message: DELETE_MESSAGE_PROMPT.to_string(),
                    thread_type: self.thread_type,
                    thread_id: self.thread_id(),
                },
            )));
    }

    /// Narrow viewports hide the action row until the message is tapped.
    pub fn handle_select_message(
        &self,
        interaction: &mut Interaction,
        viewport: &dyn Viewport,
        region: &dyn PointerRegion,
    ) -> bool {
        if viewport.width() < MOBILE_BREAKPOINT && region.contains(interaction) {
            interaction.stop_propagation();
            (self.services.select_message)(self.message.id.clone());
            return true;
        }
        false
    }

    pub fn clear_selected_message(&self) {
        self.services.history.push(without_selection(self.location));
    }

    /// Clears the selection when a click lands outside this message while it
    /// is the selected one.
    pub fn handle_outside_click(&self, interaction: &Interaction, region: &dyn PointerRegion) -> bool {
        if self.is_selected() && !region.contains(interaction) {
            self.clear_selected_message();
            return true;
        }
        false
    }

    pub fn toggle_open_gallery(&self, interaction: &mut Interaction) {
        interaction.stop_propagation();
        self.services.dispatch.dispatch(Intent::OpenGallery {
            thread_id: self.thread_id(),
            message_id: self.message.id.clone(),
        });
    }

    /// Authors cannot react to their own messages.
    pub fn toggle_reaction(&self, me: bool, interaction: &mut Interaction) {
        interaction.stop_propagation();
        if me || self.is_optimistic() {
            return;
        }
        self.services.dispatch.dispatch(Intent::ToggleReaction {
            message_id: self.message.id.clone(),
        });
    }
}
