use log::debug;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::auth::Token;
use crate::error::{BuddyError, Result};

pub const DEFAULT_API_URL: &str = "https://api.buddy.works";

/// HTTP client bound to one workspace and one access token.
pub struct BuddyClient {
    client: Client,
    workspace_url: Url,
    token: Token,
}

impl BuddyClient {
    pub fn new(base_url: &str, workspace: &str, token: Token) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("buddyctl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BuddyError::Config(format!("Failed to create HTTP client: {e}")))?;

        let mut workspace_url = Url::parse(base_url)
            .map_err(|e| BuddyError::Config(format!("Invalid base URL: {e}")))?;
        workspace_url
            .path_segments_mut()
            .map_err(|()| BuddyError::Config(format!("Invalid base URL: {base_url}")))?
            .pop_if_empty()
            .extend(["workspaces", workspace]);

        Ok(Self {
            client,
            workspace_url,
            token,
        })
    }

    /// Builds `{base}/workspaces/{workspace}/{segments...}`, percent-encoding each segment.
    pub(super) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.workspace_url.clone();
        url.path_segments_mut()
            .map_err(|()| BuddyError::Config("Invalid workspace URL".to_string()))?
            .extend(segments);
        Ok(url)
    }

    pub(super) fn get(&self, url: Url) -> RequestBuilder {
        debug!("GET {url}");
        self.client.get(url)
    }

    pub(super) fn post(&self, url: Url) -> RequestBuilder {
        debug!("POST {url}");
        self.client.post(url)
    }

    /// Sends the request with the bearer token attached.
    pub(super) async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.bearer_auth(self.token.as_str()).send().await?;
        debug!("-> {}", response.status());
        Ok(response)
    }

    /// Reads the whole body and decodes it as JSON.
    pub(super) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| BuddyError::Decode(e.to_string()))
    }

    /// Turns a non-success response into [`BuddyError::Api`], keeping Buddy's error messages.
    pub(super) async fn api_error(response: Response) -> BuddyError {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());

        BuddyError::Api {
            status: status.as_u16(),
            message: error_message(status, &body),
        }
    }
}

#[derive(Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

fn error_message(status: StatusCode, body: &str) -> String {
    let messages = serde_json::from_str::<ErrorResponse>(body)
        .map(|parsed| {
            parsed
                .errors
                .into_iter()
                .map(|e| e.message)
                .filter(|m| !m.is_empty())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    if !messages.is_empty() {
        messages.join(", ")
    } else if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        body.trim().to_string()
    }
}
