use crate::components::thread::error::ThreadError;
use crate::components::thread::models::{
    GalleryState, MessageId, RouteLocation, ThreadState, ThreadType, Toast, ToastKind,
};
use crate::components::thread::selection::is_optimistic;
use uuid::Uuid;

pub const DELETE_MESSAGE_PROMPT: &str = "Are you sure you want to delete this message?";

#[derive(Clone, PartialEq, Debug)]
pub struct DeleteDoubleCheck {
    pub id: MessageId,
    pub entity: String,
    pub message: String,
    pub thread_type: ThreadType,
    pub thread_id: String,
}

#[derive(Clone, PartialEq, Debug)]
pub enum ModalPayload {
    DeleteDoubleCheck(DeleteDoubleCheck),
}

impl ModalPayload {
    pub fn name(&self) -> &'static str {
        match self {
            ModalPayload::DeleteDoubleCheck(_) => "DELETE_DOUBLE_CHECK_MODAL",
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub enum Intent {
    OpenGallery {
        thread_id: String,
        message_id: MessageId,
    },
    CloseGallery,
    OpenModal(ModalPayload),
    CloseModal,
    AddToast {
        kind: ToastKind,
        message: String,
    },
    RemoveToast(String),
    SelectMessage(MessageId),
    ToggleReaction {
        message_id: MessageId,
    },
}

impl Intent {
    pub fn toast(kind: ToastKind, message: impl Into<String>) -> Self {
        Intent::AddToast {
            kind,
            message: message.into(),
        }
    }
}

/// Fire-and-forget sink for UI intents.
pub trait Dispatch {
    fn dispatch(&self, intent: Intent);
}

pub trait DeleteMessage {
    /// `Ok(false)` means the backend refused without an error.
    fn delete_message(&self, id: &MessageId) -> Result<bool, ThreadError>;
}

pub trait History {
    fn push(&self, location: RouteLocation);
}

/// Deletes right away and reports the outcome as a toast.
pub fn delete_message_with_toast(
    dispatch: &dyn Dispatch,
    delete: &dyn DeleteMessage,
    id: &MessageId,
) {
    match delete.delete_message(id) {
        Ok(true) => {
            tracing::info!(message_id = %id, "message deleted");
            dispatch.dispatch(Intent::toast(ToastKind::Neutral, "Message deleted."));
        }
        Ok(false) => {
            dispatch.dispatch(Intent::toast(ToastKind::Error, "Could not delete message."));
        }
        Err(err) => {
            tracing::warn!(message_id = %id, "delete failed: {err}");
            dispatch.dispatch(Intent::toast(ToastKind::Error, err.to_string()));
        }
    }
}

impl ThreadState {
    pub fn apply(&mut self, intent: Intent) {
        tracing::debug!(?intent, "applying intent");
        match intent {
            Intent::OpenGallery {
                thread_id,
                message_id,
            } => {
                self.gallery = Some(GalleryState {
                    thread_id,
                    message_id,
                });
            }
            Intent::CloseGallery => self.gallery = None,
            Intent::OpenModal(payload) => self.modal = Some(payload),
            Intent::CloseModal => self.modal = None,
            Intent::AddToast { kind, message } => self.toasts.push(Toast {
                id: Uuid::new_v4().to_string(),
                kind,
                message,
            }),
            Intent::RemoveToast(id) => self.toasts.retain(|t| t.id != id),
            Intent::SelectMessage(id) => {
                if self.focused_message.as_ref() == Some(&id) {
                    self.focused_message = None;
                } else {
                    self.focused_message = Some(id);
                }
            }
            Intent::ToggleReaction { message_id } => {
                if let Some(message) = self.find_message_mut(&message_id) {
                    let reactions = &mut message.reactions;
                    if reactions.has_reacted {
                        reactions.count = reactions.count.saturating_sub(1);
                    } else {
                        reactions.count += 1;
                    }
                    reactions.has_reacted = !reactions.has_reacted;
                }
            }
        }
    }

    pub fn remove_message(&mut self, id: &MessageId) -> Result<bool, ThreadError> {
        let record = self
            .threads
            .iter_mut()
            .find(|record| record.messages.iter().any(|m| &m.id == id))
            .ok_or_else(|| ThreadError::MessageNotFound(id.clone()))?;
        if record
            .messages
            .iter()
            .any(|m| &m.id == id && is_optimistic(m))
        {
            return Err(ThreadError::Unconfirmed(id.clone()));
        }
        record.messages.retain(|m| &m.id != id);
        if self.focused_message.as_ref() == Some(id) {
            self.focused_message = None;
        }
        Ok(true)
    }
}
