//! Application service client for the Matrix client-server API.

use std::sync::Arc;

use async_trait::async_trait;
use marionette_core::error::{ErrorCode, MarionetteError, MarionetteResult};
use marionette_core::{AppServiceConfig, ClientProvider, EventType, RemoteClient};
use reqwest::{Client, Method};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use url::Url;

const API_PREFIX: [&str; 3] = ["_matrix", "client", "v3"];

/// Client acting as one user through the application service token.
#[derive(Clone)]
pub struct HttpRemoteClient {
    http: Client,
    base_url: Url,
    as_token: String,
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    errcode: String,
    #[serde(default)]
    error: String,
}

#[derive(Debug, Deserialize)]
struct JoinResponse {
    room_id: String,
}

#[derive(Debug, Deserialize)]
struct EventResponse {
    event_id: String,
}

impl HttpRemoteClient {
    /// Create a client for `user_id` with its own connection pool.
    pub fn new(homeserver_url: &str, as_token: &str, user_id: &str) -> MarionetteResult<Self> {
        Self::with_http(Client::new(), homeserver_url, as_token, user_id)
    }

    /// Create a client for `user_id` sharing an existing connection pool.
    pub fn with_http(
        http: Client,
        homeserver_url: &str,
        as_token: &str,
        user_id: &str,
    ) -> MarionetteResult<Self> {
        let base_url = Url::parse(homeserver_url).map_err(|e| {
            MarionetteError::Configuration(format!("invalid homeserver URL {}: {}", homeserver_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(MarionetteError::Configuration(format!(
                "homeserver URL {} cannot be a base URL",
                homeserver_url
            )));
        }

        Ok(Self {
            http,
            base_url,
            as_token: as_token.to_string(),
            user_id: user_id.to_string(),
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// API URL for the given path segments, without impersonation.
    fn api_url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(API_PREFIX).extend(segments);
        }
        url
    }

    /// API URL acting as this client's user.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_url(segments);
        url.query_pairs_mut().append_pair("user_id", &self.user_id);
        url
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> MarionetteResult<T> {
        debug!(user_id = %self.user_id, %method, path = url.path(), "Homeserver request");

        let mut request = self
            .http
            .request(method, url)
            .bearer_auth(&self.as_token);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| MarionetteError::Network {
            message: format!("request failed: {}", e),
            source: Some(Box::new(e)),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(decode_error(status.as_u16(), &body));
        }

        response.json().await.map_err(|e| MarionetteError::Network {
            message: format!("failed to parse response: {}", e),
            source: Some(Box::new(e)),
        })
    }
}

/// Turn an error response into a [`MarionetteError::Remote`].
pub(crate) fn decode_error(status: u16, body: &str) -> MarionetteError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(err) => MarionetteError::remote(status, ErrorCode::from_errcode(&err.errcode), err.error),
        Err(_) => MarionetteError::remote(status, ErrorCode::Unknown, body),
    }
}

fn txn_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[async_trait]
impl RemoteClient for HttpRemoteClient {
    async fn register(&self, localpart: &str) -> MarionetteResult<()> {
        let body = json!({
            "type": "m.login.application_service",
            "username": localpart,
        });
        self.request::<IgnoredAny>(Method::POST, self.api_url(&["register"]), Some(body))
            .await?;
        Ok(())
    }

    async fn join_room(&self, room_id_or_alias: &str) -> MarionetteResult<String> {
        let resp: JoinResponse = self
            .request(
                Method::POST,
                self.endpoint(&["join", room_id_or_alias]),
                Some(json!({})),
            )
            .await?;
        Ok(resp.room_id)
    }

    async fn invite_user(&self, room_id: &str, user_id: &str) -> MarionetteResult<()> {
        self.request::<IgnoredAny>(
            Method::POST,
            self.endpoint(&["rooms", room_id, "invite"]),
            Some(json!({ "user_id": user_id })),
        )
        .await?;
        Ok(())
    }

    async fn send_message_event(
        &self,
        room_id: &str,
        event_type: &EventType,
        content: &serde_json::Value,
        timestamp: Option<i64>,
    ) -> MarionetteResult<String> {
        let txn = txn_id();
        let mut url = self.endpoint(&["rooms", room_id, "send", event_type.as_str(), txn.as_str()]);
        if let Some(ts) = timestamp {
            url.query_pairs_mut().append_pair("ts", &ts.to_string());
        }
        let resp: EventResponse = self.request(Method::PUT, url, Some(content.clone())).await?;
        Ok(resp.event_id)
    }

    async fn send_state_event(
        &self,
        room_id: &str,
        event_type: &EventType,
        state_key: &str,
        content: &serde_json::Value,
        timestamp: Option<i64>,
    ) -> MarionetteResult<String> {
        let mut url = self.endpoint(&["rooms", room_id, "state", event_type.as_str(), state_key]);
        if let Some(ts) = timestamp {
            url.query_pairs_mut().append_pair("ts", &ts.to_string());
        }
        let resp: EventResponse = self.request(Method::PUT, url, Some(content.clone())).await?;
        Ok(resp.event_id)
    }

    async fn state_event(
        &self,
        room_id: &str,
        event_type: &EventType,
        state_key: &str,
    ) -> MarionetteResult<serde_json::Value> {
        self.request(
            Method::GET,
            self.endpoint(&["rooms", room_id, "state", event_type.as_str(), state_key]),
            None,
        )
        .await
    }

    async fn redact_event(
        &self,
        room_id: &str,
        event_id: &str,
        reason: Option<String>,
    ) -> MarionetteResult<String> {
        let txn = txn_id();
        let body = match reason {
            Some(reason) => json!({ "reason": reason }),
            None => json!({}),
        };
        let resp: EventResponse = self
            .request(
                Method::PUT,
                self.endpoint(&["rooms", room_id, "redact", event_id, txn.as_str()]),
                Some(body),
            )
            .await?;
        Ok(resp.event_id)
    }

    async fn user_typing(
        &self,
        room_id: &str,
        typing: bool,
        timeout_ms: i64,
    ) -> MarionetteResult<()> {
        let body = if typing {
            json!({ "typing": true, "timeout": timeout_ms })
        } else {
            json!({ "typing": false })
        };
        self.request::<IgnoredAny>(
            Method::PUT,
            self.endpoint(&["rooms", room_id, "typing", self.user_id.as_str()]),
            Some(body),
        )
        .await?;
        Ok(())
    }

    async fn set_display_name(&self, display_name: &str) -> MarionetteResult<()> {
        self.request::<IgnoredAny>(
            Method::PUT,
            self.endpoint(&["profile", self.user_id.as_str(), "displayname"]),
            Some(json!({ "displayname": display_name })),
        )
        .await?;
        Ok(())
    }

    async fn set_avatar_url(&self, avatar_url: &str) -> MarionetteResult<()> {
        self.request::<IgnoredAny>(
            Method::PUT,
            self.endpoint(&["profile", self.user_id.as_str(), "avatar_url"]),
            Some(json!({ "avatar_url": avatar_url })),
        )
        .await?;
        Ok(())
    }
}

/// Hands out [`HttpRemoteClient`]s that share one connection pool.
#[derive(Clone)]
pub struct HttpClientProvider {
    template: HttpRemoteClient,
}

impl HttpClientProvider {
    pub fn new(homeserver_url: &str, as_token: &str) -> MarionetteResult<Self> {
        Ok(Self {
            template: HttpRemoteClient::new(homeserver_url, as_token, "")?,
        })
    }

    pub fn from_config(config: &AppServiceConfig) -> MarionetteResult<Self> {
        Self::new(&config.homeserver_url, &config.as_token)
    }

    /// Concrete client for `user_id`.
    pub fn http_client(&self, user_id: &str) -> HttpRemoteClient {
        HttpRemoteClient {
            user_id: user_id.to_string(),
            ..self.template.clone()
        }
    }
}

impl ClientProvider for HttpClientProvider {
    fn client(&self, user_id: &str) -> Arc<dyn RemoteClient> {
        Arc::new(self.http_client(user_id))
    }
}
