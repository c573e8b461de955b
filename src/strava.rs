//! Strava API client for the one-shot authorization and GPX uploads.
//!
//! Handles:
//! - Building the authorization URL the operator opens in a browser
//! - Exchanging the pasted authorization code for an access token
//! - Multipart GPX uploads with the bearer token
//!
//! The token only lives as long as the [`StravaSession`]; it is never
//! refreshed or stored.

use std::fmt;
use std::fs;
use std::io::BufRead;
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::{multipart, Client, Response};
use reqwest::header::ACCEPT;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{ApiInfo, ClientId};
use crate::error::UploadError;

pub const STRAVA_BASE_URL: &str = "https://www.strava.com";
pub const REDIRECT_URI: &str = "http://localhost/exchange_token";
pub const SCOPE: &str = "activity:write";
pub const GPX_CONTENT_TYPE: &str = "application/gpx+xml";

/// Strava client before authorization.
pub struct StravaClient {
    http: Client,
    base_url: String,
    api_info: ApiInfo,
}

impl StravaClient {
    /// Every request made through this client is bounded by `timeout`.
    pub fn new(api_info: ApiInfo, timeout: Duration) -> Result<Self, UploadError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: STRAVA_BASE_URL.to_string(),
            api_info,
        })
    }

    /// Point the client at another server, e.g. a local mock.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// URL granting `activity:write`; Strava redirects to
    /// `http://localhost/exchange_token?code=...` afterwards.
    pub fn authorization_url(&self) -> String {
        format!(
            "{}/oauth/authorize?\
             client_id={}&\
             response_type=code&\
             redirect_uri={}&\
             approval_prompt=force&\
             scope={}",
            self.base_url, self.api_info.client_id, REDIRECT_URI, SCOPE
        )
    }

    /// Exchange an authorization code for an access token.
    ///
    /// POST {base}/oauth/token with a JSON body.
    pub fn exchange_code(self, code: &str) -> Result<StravaSession, UploadError> {
        let request = TokenRequest {
            client_id: &self.api_info.client_id,
            client_secret: &self.api_info.client_secret,
            code,
            grant_type: "authorization_code",
        };

        let response = self
            .http
            .post(format!("{}/oauth/token", self.base_url))
            .json(&request)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(UploadError::Authentication(format!(
                "token exchange returned HTTP {status}: {body}"
            )));
        }

        let token = parse_access_token(&body)?;
        tracing::info!("Strava authorization successful");
        Ok(StravaSession {
            client: self,
            token,
        })
    }
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    client_id: &'a ClientId,
    client_secret: &'a str,
    code: &'a str,
    grant_type: &'static str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Bearer token; never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

fn parse_access_token(body: &str) -> Result<AccessToken, UploadError> {
    let response: TokenResponse = serde_json::from_str(body)
        .map_err(|e| UploadError::Authentication(format!("unreadable token response: {e}")))?;
    match response.access_token {
        Some(token) if !token.trim().is_empty() => Ok(AccessToken(token)),
        _ => Err(UploadError::Authentication(
            "token response has no access_token".to_string(),
        )),
    }
}

/// Read the authorization code typed by the operator.
///
/// Accepts the bare code, or the whole redirect URL it was copied from.
pub fn read_authorization_code<R: BufRead>(mut input: R) -> Result<String, UploadError> {
    let mut line = String::new();
    input
        .read_line(&mut line)
        .map_err(|e| UploadError::Authentication(format!("failed to read code: {e}")))?;
    extract_code(line.trim())
}

fn extract_code(input: &str) -> Result<String, UploadError> {
    let code = if let Ok(url) = Url::parse(input) {
        url.query_pairs()
            .find(|(key, _)| key == "code")
            .map(|(_, value)| value.into_owned())
    } else if let Some((_, rest)) = input.split_once("code=") {
        rest.split('&').next().map(str::to_string)
    } else {
        Some(input.to_string())
    };

    match code {
        Some(code) if !code.is_empty() => Ok(code),
        _ => Err(UploadError::Authentication(
            "no authorization code entered".to_string(),
        )),
    }
}

/// Authorized Strava client.
pub struct StravaSession {
    client: StravaClient,
    token: AccessToken,
}

impl StravaSession {
    /// Upload one GPX file, named after the file, and return Strava's JSON reply.
    ///
    /// POST {base}/api/v3/uploads
    pub fn upload_gpx(&self, path: &Path) -> Result<Value, UploadError> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let contents = fs::read(path).map_err(|source| UploadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let file = multipart::Part::bytes(contents)
            .file_name(name.clone())
            .mime_str(GPX_CONTENT_TYPE)?;
        let form = multipart::Form::new()
            .part("file", file)
            .text("name", name)
            .text("data_type", "gpx");

        let response = self
            .client
            .http
            .post(format!("{}/api/v3/uploads", self.client.base_url))
            .bearer_auth(&self.token.0)
            .header(ACCEPT, "application/json")
            .multipart(form)
            .send()?;

        check_response_json(response)
    }
}

/// Check response status and parse the JSON body.
fn check_response_json(response: Response) -> Result<Value, UploadError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        if status.as_u16() == 429 {
            tracing::warn!("Strava rate limit hit (429)");
        }
        return Err(UploadError::Api {
            status: status.as_u16(),
            body,
        });
    }
    let body = response.text()?;
    parse_json_body(status.as_u16(), &body)
}

/// A 2xx reply that is not JSON is Strava's fault, not the network's.
fn parse_json_body(status: u16, body: &str) -> Result<Value, UploadError> {
    serde_json::from_str(body).map_err(|e| UploadError::InvalidResponse {
        status,
        reason: e.to_string(),
    })
}
