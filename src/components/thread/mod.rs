pub mod config;
pub mod error;
pub mod intents;
pub mod layout;
pub mod links;
pub mod message;
pub mod message_view;
pub mod modals;
pub mod models;
pub mod selection;
pub mod storage;
pub mod time_format;

pub use layout::Route;
