use crate::components::thread::models::MessageId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThreadError {
    #[error("invalid client config: {0}")]
    Config(#[source] serde_json::Error),
    #[error("invalid thread state: {0}")]
    State(#[source] serde_json::Error),
    #[error("message {0} not found")]
    MessageNotFound(MessageId),
    #[error("optimistic message {0} cannot be deleted before it is confirmed")]
    Unconfirmed(MessageId),
}
