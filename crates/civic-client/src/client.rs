//! Session-aware request client
//!
//! Every call carries the held access token and the session cookie. A 401
//! triggers exactly one refresh; if it succeeds the request is sent once more
//! and that second response is returned whatever it is. If it fails the token
//! slot is emptied and the original 401 is handed back.

use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use civic_session::{AccessToken, TokenStore};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::request::ApiRequest;
use crate::Result;

pub(crate) const REFRESH_PATH: &str = "/auth/refresh";

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    #[serde(rename = "accessToken", default)]
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    tokens: TokenStore,
}

impl ApiClient {
    pub fn new(config: ClientConfig, tokens: TokenStore) -> Result<Self> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            config,
            tokens,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Exchange the session cookie for a new access token.
    ///
    /// Returns true iff a new token was stored. Failures leave the slot
    /// untouched.
    pub async fn refresh(&self) -> bool {
        let url = match self.config.endpoint(REFRESH_PATH) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(error = %e, "Cannot build refresh URL");
                return false;
            }
        };

        let response = match self
            .http
            .post(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh request failed");
                return false;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(status = response.status().as_u16(), "Token refresh rejected");
            return false;
        }

        let body: RefreshResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed token refresh response");
                return false;
            }
        };

        match body.access_token.filter(|t| !t.is_empty()) {
            Some(token) => {
                self.tokens.set(AccessToken::new(token));
                tracing::info!("Access token refreshed");
                true
            }
            None => {
                tracing::warn!("Token refresh response carried no access token");
                false
            }
        }
    }

    /// Send a request, recovering once from an expired token.
    ///
    /// Only transport failures are returned as `Err`; authorization failures
    /// come back as the response the backend gave.
    pub async fn request(&self, request: &ApiRequest) -> Result<Response> {
        let response = self.send(request).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        tracing::debug!(path = %request.path, "Access token rejected, refreshing");

        if self.refresh().await {
            return self.send(request).await;
        }

        self.tokens.clear();
        tracing::warn!(path = %request.path, "Session expired and could not be refreshed");
        Ok(response)
    }

    /// `request` plus status checking: non-success maps onto `ClientError`
    pub async fn execute(&self, request: &ApiRequest) -> Result<Response> {
        let response = self.request(request).await?;
        ensure_success(response, verb_for(request)).await
    }

    /// `execute` plus JSON decoding of the body
    pub async fn execute_json<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T> {
        let response = self.execute(request).await?;
        decode_json(response).await
    }

    /// One attempt, no refresh on 401
    pub(crate) async fn send(&self, request: &ApiRequest) -> Result<Response> {
        let url = self.config.endpoint(&request.path)?;

        let mut headers = request.headers.clone();
        if !headers.contains_key(ACCEPT) {
            headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        }
        if let Some(token) = self.tokens.get() {
            let value = HeaderValue::from_str(&token.bearer()).map_err(|_| {
                ClientError::Validation("access token is not a valid header value".to_string())
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = self.http.request(request.method.clone(), url).headers(headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = request.body.apply(builder)?;

        let response = builder.send().await?;

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            status = response.status().as_u16(),
            "API response"
        );

        Ok(response)
    }
}

fn verb_for(request: &ApiRequest) -> &'static str {
    match request.method.as_str() {
        "GET" => "Load",
        "POST" => "Create",
        "PATCH" | "PUT" => "Update",
        "DELETE" => "Delete",
        _ => "Request",
    }
}

/// Turn a non-success response into the matching error, preferring the
/// backend's `error` message.
pub(crate) async fn ensure_success(response: Response, verb: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("{verb} failed ({})", status.as_u16()));

    Err(ClientError::from_status(status.as_u16(), message))
}

pub(crate) async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    response.json::<T>().await.map_err(|e| {
        if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Network(e)
        }
    })
}
