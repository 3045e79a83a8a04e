use crate::components::thread::error::ThreadError;
use crate::components::thread::models::ThreadState;

#[cfg(target_arch = "wasm32")]
use gloo_storage::{LocalStorage, Storage};

#[cfg(not(target_arch = "wasm32"))]
use std::fs;

const DEFAULT_STATE_JSON: &str = include_str!("../../../thread_dx_state_default.json");

#[cfg(target_arch = "wasm32")]
const STORAGE_KEY: &str = "thread_dx_state";

#[cfg(not(target_arch = "wasm32"))]
const STATE_FILE: &str = "thread_dx_state.json";

pub fn parse_state_from_str(raw: &str) -> Result<ThreadState, ThreadError> {
    serde_json::from_str(raw).map_err(ThreadError::State)
}

fn default_state() -> ThreadState {
    match parse_state_from_str(DEFAULT_STATE_JSON) {
        Ok(state) => state,
        Err(err) => {
            tracing::warn!("bundled thread state is unusable: {err}");
            ThreadState::default()
        }
    }
}

pub fn load_state() -> ThreadState {
    #[cfg(target_arch = "wasm32")]
    {
        if let Ok(state) = LocalStorage::get::<ThreadState>(STORAGE_KEY) {
            return state;
        }
        default_state()
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Ok(content) = fs::read_to_string(STATE_FILE) {
            match parse_state_from_str(&content) {
                Ok(state) => return state,
                Err(err) => tracing::warn!("ignoring {STATE_FILE}: {err}"),
            }
        }
        default_state()
    }
}

pub fn save_state(state: &ThreadState) {
    #[cfg(target_arch = "wasm32")]
    {
        if let Err(err) = LocalStorage::set(STORAGE_KEY, state) {
            tracing::warn!("failed to persist thread state: {err}");
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        match serde_json::to_string_pretty(state) {
            Ok(content) => {
                if let Err(err) = fs::write(STATE_FILE, content) {
                    tracing::warn!("failed to write {STATE_FILE}: {err}");
                }
            }
            Err(err) => tracing::warn!("failed to serialize thread state: {err}"),
        }
    }
}
