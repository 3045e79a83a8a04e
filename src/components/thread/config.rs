use crate::components::thread::error::ThreadError;
use serde::Deserialize;

const CLIENT_CONFIG_JSON: &str = include_str!("../../../client_config.json");

#[cfg(not(target_arch = "wasm32"))]
const CLIENT_URL_ENV: &str = "THREAD_DX_CLIENT_URL";

/// Viewports narrower than this hide the action row until a message is tapped.
pub const MOBILE_BREAKPOINT: f64 = 768.0;

#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct ClientConfig {
    pub client_url: String,
    #[serde(default = "default_toast_timeout")]
    pub toast_timeout_ms: u64,
}

fn default_toast_timeout() -> u64 {
    4000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            client_url: "http://localhost:8080".to_string(),
            toast_timeout_ms: default_toast_timeout(),
        }
    }
}

impl ClientConfig {
    pub fn from_json(raw: &str) -> Result<Self, ThreadError> {
        let mut config: ClientConfig = serde_json::from_str(raw).map_err(ThreadError::Config)?;
        config.client_url = config.client_url.trim_end_matches('/').to_string();
        Ok(config)
    }
}

pub fn load_client_config() -> ClientConfig {
    #[allow(unused_mut)]
    let mut config = match ClientConfig::from_json(CLIENT_CONFIG_JSON) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("falling back to default client config: {err}");
            ClientConfig::default()
        }
    };

    #[cfg(not(target_arch = "wasm32"))]
    if let Ok(url) = std::env::var(CLIENT_URL_ENV) {
        if !url.trim().is_empty() {
            config.client_url = url.trim().trim_end_matches('/').to_string();
        }
    }

    config
}
