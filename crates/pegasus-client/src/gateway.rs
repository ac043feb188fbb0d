//! Authenticated fetch gateway.
//!
//! Every API call goes through [`Gateway`]. It attaches the stored bearer
//! token, turns a 401 into a cleared session plus
//! [`ClientError::Unauthenticated`], and refuses to parse non-JSON bodies.

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::credentials::CredentialStore;
use crate::error::{ClientError, Result};
use crate::session::{SessionEvent, SessionEventBus};

/// A request relative to the API base.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path).with_body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }
}

/// A JSON response. Non-2xx statuses are kept; see [`ApiResponse::into_success`].
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    /// `Value::Null` for empty bodies.
    pub body: Value,
}

impl ApiResponse {
    #[inline]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// `error` (or `message`) field of a JSON error body.
    pub fn error_message(&self) -> Option<String> {
        ["error", "message"]
            .iter()
            .find_map(|key| self.body.get(key).and_then(Value::as_str))
            .map(str::to_string)
    }

    /// The body of a 2xx response, or the API error it carries.
    pub fn into_success(self) -> Result<Value> {
        if self.is_success() {
            return Ok(self.body);
        }
        let message = self.error_message().unwrap_or_else(|| {
            self.status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
        Err(match self.status {
            StatusCode::FORBIDDEN => ClientError::Forbidden(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            status => ClientError::Api {
                status: status.as_u16(),
                message,
            },
        })
    }

    /// Deserialize the body of a 2xx response.
    pub fn json<T: DeserializeOwned>(self) -> Result<T> {
        let body = self.into_success()?;
        Ok(serde_json::from_value(body)?)
    }
}

/// The single chokepoint for API traffic.
#[derive(Clone, Debug)]
pub struct Gateway {
    http: Client,
    base: Url,
    store: CredentialStore,
    events: SessionEventBus,
}

impl Gateway {
    pub fn new(http: Client, base: Url, store: CredentialStore, events: SessionEventBus) -> Self {
        Self {
            http,
            base,
            store,
            events,
        }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Resolve an API path against the base URL.
    pub fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    /// Send a request with the stored bearer token attached.
    ///
    /// A 401 clears the credential store, publishes
    /// [`SessionEvent::Invalidated`] when a token had been sent, and yields
    /// [`ClientError::Unauthenticated`].
    pub async fn request(&self, request: ApiRequest) -> Result<ApiResponse> {
        let token = self.store.token();
        let sent_token = token.is_some();
        let response = self.execute(&request, token.as_deref()).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            self.store.clear();
            if sent_token {
                warn!(path = %request.path, "API rejected the session token, signing out");
                self.events.publish(SessionEvent::Invalidated);
            }
            return Err(ClientError::Unauthenticated);
        }

        Self::read_json(response).await
    }

    /// Send a request without a bearer token and without 401 side effects.
    ///
    /// Used for the sign-in and sign-up endpoints, where a 401 means
    /// "wrong password" rather than "stale session".
    pub async fn request_anonymous(&self, request: ApiRequest) -> Result<ApiResponse> {
        let response = self.execute(&request, None).await?;
        Self::read_json(response).await
    }

    async fn execute(&self, request: &ApiRequest, token: Option<&str>) -> Result<reqwest::Response> {
        let url = self.url(&request.path)?;
        debug!(
            method = %request.method,
            url = %url,
            authenticated = token.is_some(),
            "Sending API request"
        );

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .header(ACCEPT, "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        debug!(status = %response.status(), "Received API response");
        Ok(response)
    }

    async fn read_json(response: reqwest::Response) -> Result<ApiResponse> {
        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("json"));
        let text = response.text().await?;

        if text.trim().is_empty() && (is_json || status.is_success()) {
            return Ok(ApiResponse {
                status,
                body: Value::Null,
            });
        }
        if !is_json {
            return Err(ClientError::Server {
                status: status.as_u16(),
                body: text,
            });
        }

        match serde_json::from_str(&text) {
            Ok(body) => Ok(ApiResponse { status, body }),
            Err(e) if status.is_success() => Err(e.into()),
            Err(_) => Err(ClientError::Server {
                status: status.as_u16(),
                body: text,
            }),
        }
    }
}
