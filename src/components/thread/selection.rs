//! Deep-link addressing of messages through the `m` query parameter.

use crate::components::thread::links::ThreadLinkResolver;
use crate::components::thread::models::{Message, MessageId, RouteLocation, Thread, ThreadType};
use base64::Engine;

pub const SELECTION_QUERY_KEY: &str = "m";

/// Base64 of the decimal string of `timestamp - 1`. Two messages sharing a
/// timestamp share an id. Saturates at `i64::MIN`.
pub fn selection_id(timestamp: i64) -> String {
    base64::engine::general_purpose::STANDARD.encode(timestamp.saturating_sub(1).to_string())
}

pub fn is_optimistic(message: &Message) -> bool {
    matches!(message.id, MessageId::Number(n) if n < 0)
}

/// Reads the single `m` value from a search string. Absent, empty and
/// repeated keys all yield `None`.
pub fn selected_param(search: &str) -> Option<String> {
    let query = search.strip_prefix('?').unwrap_or(search);
    let mut values = url::form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| key == SELECTION_QUERY_KEY)
        .map(|(_, value)| value.into_owned());
    let first = values.next()?;
    if values.next().is_some() || first.is_empty() {
        return None;
    }
    Some(first)
}

pub fn is_selected(location: &RouteLocation, selection_id: &str) -> bool {
    selected_param(&location.search).as_deref() == Some(selection_id)
}

/// Same pathname with the query dropped entirely.
pub fn without_selection(location: &RouteLocation) -> RouteLocation {
    RouteLocation::new(location.pathname.clone(), "")
}

fn thread_id(thread: Option<&Thread>) -> &str {
    thread.map(|t| t.id.as_str()).unwrap_or_default()
}

pub fn message_url(
    thread_type: ThreadType,
    thread: Option<&Thread>,
    resolver: &dyn ThreadLinkResolver,
    selection_id: &str,
) -> String {
    match (thread_type, thread) {
        (ThreadType::Story, Some(thread)) => {
            format!("{}?m={selection_id}", resolver.thread_link(thread))
        }
        (ThreadType::DirectMessageThread, _) => {
            format!("/messages/{}?m={selection_id}", thread_id(thread))
        }
        _ => format!("/thread/{}?m={selection_id}", thread_id(thread)),
    }
}

/// Absolute link used by the copy-link action.
pub fn message_permalink(
    client_url: &str,
    thread: Option<&Thread>,
    resolver: &dyn ThreadLinkResolver,
    selection_id: &str,
) -> String {
    let path = match thread {
        Some(thread) => resolver.thread_link(thread),
        None => format!("/thread/{}", thread_id(thread)),
    };
    format!("{client_url}{path}?m={selection_id}")
}
