//! Strava API credentials, read from a local JSON file.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::UploadError;

pub const DEFAULT_CONFIG_PATH: &str = "api_info.json";

/// Strava shows the client id as a number; accept it quoted or not.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ClientId {
    Number(u64),
    Text(String),
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientId::Number(id) => write!(f, "{id}"),
            ClientId::Text(id) => f.write_str(id),
        }
    }
}

/// Contents of `api_info.json`.
#[derive(Clone, Deserialize)]
pub struct ApiInfo {
    pub client_id: ClientId,
    pub client_secret: String,
}

impl fmt::Debug for ApiInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiInfo")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl ApiInfo {
    pub fn load(path: &Path) -> Result<Self, UploadError> {
        let config_error = |reason: String| UploadError::Config {
            path: path.to_path_buf(),
            reason,
        };
        let text = fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        let info: ApiInfo = serde_json::from_str(&text).map_err(|e| config_error(e.to_string()))?;
        if info.client_secret.trim().is_empty() {
            return Err(config_error("client_secret is empty".to_string()));
        }
        tracing::debug!(client_id = %info.client_id, "loaded API config");
        Ok(info)
    }
}
