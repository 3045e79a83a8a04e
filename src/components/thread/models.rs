use serde::{Deserialize, Serialize};
use std::fmt;

/// Server ids are strings. Locally created messages carry a negative number
/// until the backend confirms them.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageId {
    Number(i64),
    Text(String),
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageId::Number(n) => write!(f, "{n}"),
            MessageId::Text(s) => f.write_str(s),
        }
    }
}

impl MessageId {
    /// Attribute value identifying the rendered message in the DOM. The prefix
    /// keeps `Number(-1)` and `Text("-1")` apart.
    pub fn dom_key(&self) -> String {
        match self {
            MessageId::Number(n) => format!("n:{n}"),
            MessageId::Text(s) => format!("s:{s}"),
        }
    }

    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key.split_once(':')? {
            ("n", n) => n.parse().ok().map(MessageId::Number),
            ("s", s) => Some(MessageId::Text(s.to_string())),
            _ => None,
        }
    }
}

impl From<&str> for MessageId {
    fn from(value: &str) -> Self {
        MessageId::Text(value.to_string())
    }
}

impl From<i64> for MessageId {
    fn from(value: i64) -> Self {
        MessageId::Number(value)
    }
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize, Default)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub profile_photo: String,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize, Default)]
pub struct Author {
    pub user: User,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize, Default)]
pub struct Reactions {
    pub count: u32,
    #[serde(default)]
    pub has_reacted: bool,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum MessageBody {
    Text(String),
    Media { url: String },
}

impl Default for MessageBody {
    fn default() -> Self {
        MessageBody::Text(String::new())
    }
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    #[serde(default)]
    pub modified_at: Option<i64>,
    pub author: Author,
    #[serde(default)]
    pub bot: bool,
    #[serde(default)]
    pub reactions: Reactions,
    #[serde(default)]
    pub body: MessageBody,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize, Default)]
pub struct Thread {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub community_slug: String,
    #[serde(default)]
    pub channel_slug: String,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ThreadType {
    #[default]
    Story,
    DirectMessageThread,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize, Default)]
pub struct CurrentUser {
    pub user: User,
    #[serde(default)]
    pub is_owner: bool,
    #[serde(default)]
    pub is_moderator: bool,
}

impl CurrentUser {
    pub fn is_author_of(&self, message: &Message) -> bool {
        self.user.id == message.author.user.id
    }
}

/// Authors can always remove their own messages; owners and moderators can
/// remove anyone's.
pub fn can_moderate_message(current_user: Option<&CurrentUser>, message: &Message) -> bool {
    match current_user {
        Some(user) => user.is_author_of(message) || user.is_owner || user.is_moderator,
        None => false,
    }
}

/// Gap after which a message from the same author starts a new group.
pub const AUTHOR_CONTEXT_GAP_MS: i64 = 10 * 60 * 1000;

pub fn show_author_context(previous: Option<&Message>, message: &Message) -> bool {
    match previous {
        Some(prev) => {
            prev.author.user.id != message.author.user.id
                || message.timestamp - prev.timestamp > AUTHOR_CONTEXT_GAP_MS
        }
        None => true,
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct RouteLocation {
    pub pathname: String,
    /// Either empty or starting with `?`.
    pub search: String,
}

impl RouteLocation {
    pub fn new(pathname: impl Into<String>, search: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
            search: search.into(),
        }
    }

    /// Splits a router path such as `/thread/abc?m=OTk5` into its parts.
    pub fn from_path(path: &str) -> Self {
        match path.find('?') {
            Some(idx) => Self::new(&path[..idx], &path[idx..]),
            None => Self::new(path, ""),
        }
    }
}

impl fmt::Display for RouteLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pathname, self.search)
    }
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ThreadRecord {
    pub thread: Thread,
    #[serde(default)]
    pub thread_type: ThreadType,
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum ToastKind {
    Success,
    Neutral,
    Error,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Toast {
    pub id: String,
    pub kind: ToastKind,
    pub message: String,
}

#[derive(Clone, PartialEq, Debug)]
pub struct GalleryState {
    pub thread_id: String,
    pub message_id: MessageId,
}

/// Everything the app persists plus the transient UI state that intents drive.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize, Default)]
pub struct ThreadState {
    pub current_user: Option<CurrentUser>,
    pub threads: Vec<ThreadRecord>,
    #[serde(skip)]
    pub toasts: Vec<Toast>,
    #[serde(skip)]
    pub modal: Option<super::intents::ModalPayload>,
    #[serde(skip)]
    pub gallery: Option<GalleryState>,
    #[serde(skip)]
    pub focused_message: Option<MessageId>,
}

impl ThreadState {
    pub fn thread(&self, thread_id: &str) -> Option<&ThreadRecord> {
        self.threads.iter().find(|t| t.thread.id == thread_id)
    }

    pub fn find_message(&self, message_id: &MessageId) -> Option<(&ThreadRecord, &Message)> {
        self.threads.iter().find_map(|record| {
            record
                .messages
                .iter()
                .find(|m| &m.id == message_id)
                .map(|m| (record, m))
        })
    }

    pub(super) fn find_message_mut(&mut self, message_id: &MessageId) -> Option<&mut Message> {
        self.threads
            .iter_mut()
            .flat_map(|record| record.messages.iter_mut())
            .find(|m| &m.id == message_id)
    }
}
