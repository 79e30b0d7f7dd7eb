//! HTTP access to the analytics backend.
//!
//! Every call goes through [`Gateway::send`]: JSON content type on every
//! request, bearer token when one is set, and any status outside 200-299
//! surfaced as [`GatewayError::Http`]. The gateway never retries and never
//! classifies statuses; callers decide what a status means to the user.

use std::{path::PathBuf, time::Duration};

use api_types::{
    account::Account,
    analytics::{MonthlyAnalytics, YearlyAnalytics},
    auth::{Credentials, LoginResponse, RegisteredUser},
    post::Post,
    setup::{TokenRefreshRequest, TokenRefreshResponse},
};
use engine::FilterCriteria;
use reqwest::{Method, Url, header::CONTENT_TYPE};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::local_state::{self, LocalState, LocalStateError, TOKEN_KEY};

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request never produced a response (offline, DNS, refused).
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    #[error("HTTP error! status: {status}")]
    Http { status: u16 },
    /// 2xx response whose body does not match the expected schema.
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("invalid request: {0}")]
    Encode(String),
    #[error("invalid gateway configuration: {0}")]
    Config(String),
}

impl GatewayError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct GatewayBuilder {
    base_url: Option<String>,
    state_path: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl GatewayBuilder {
    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = Some(base_url.to_string());
        self
    }

    /// Durable storage for the token. Without it the token lives in memory
    /// only.
    pub fn state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_path = Some(path.into());
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validates the base URL and restores a persisted token, if any.
    pub fn build(self) -> Result<Gateway, GatewayError> {
        let raw = self
            .base_url
            .ok_or_else(|| GatewayError::Config("missing base_url".to_string()))?;
        let base_url =
            Url::parse(&raw).map_err(|err| GatewayError::Config(format!("invalid base_url: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::Config(format!("invalid base_url: {raw}")));
        }

        let mut http = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }
        let http = http
            .build()
            .map_err(|err| GatewayError::Config(format!("http client: {err}")))?;

        let token = match &self.state_path {
            Some(path) => match LocalState::load(path) {
                Ok(state) => state.get(TOKEN_KEY).map(str::to_string),
                Err(err) => {
                    tracing::warn!("ignoring unreadable local state {}: {err}", path.display());
                    None
                }
            },
            None => None,
        };

        Ok(Gateway {
            base_url,
            http,
            token,
            state_path: self.state_path,
        })
    }
}

/// Backend client plus the session token.
///
/// The token is the only shared mutable state of the client. Clones carry a
/// snapshot of it, which is what spawned fetches use.
#[derive(Debug, Clone)]
pub struct Gateway {
    base_url: Url,
    http: reqwest::Client,
    token: Option<String>,
    state_path: Option<PathBuf>,
}

impl Gateway {
    pub fn builder() -> GatewayBuilder {
        GatewayBuilder::default()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Writes durable storage, then the in-memory token. A failed write
    /// leaves the token unchanged.
    pub fn set_token(&mut self, token: &str) -> Result<(), LocalStateError> {
        if let Some(path) = &self.state_path {
            local_state::update(path, |state| state.set(TOKEN_KEY, token))?;
        }
        self.token = Some(token.to_string());
        Ok(())
    }

    /// Drops the in-memory token first; it is gone even when storage cannot
    /// be updated.
    pub fn clear_token(&mut self) -> Result<(), LocalStateError> {
        self.token = None;
        match &self.state_path {
            Some(path) => local_state::update(path, |state| {
                state.remove(TOKEN_KEY);
            }),
            None => Ok(()),
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::Config(format!("invalid base_url: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends `method` to a path relative to the base URL, e.g. `/accounts/`
    /// or `/analytics/yearly/42?year=2025`.
    pub async fn request<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let raw = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );
        let url = Url::parse(&raw).map_err(|err| GatewayError::Config(format!("{raw}: {err}")))?;
        self.send(method, url, body).await
    }

    async fn send<T, B>(&self, method: Method, url: Url, body: Option<&B>) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        tracing::debug!(%method, path = url.path(), "backend request");

        let mut req = self
            .http
            .request(method.clone(), url.clone())
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            let payload =
                serde_json::to_vec(body).map_err(|err| GatewayError::Encode(err.to_string()))?;
            req = req.body(payload);
        }

        let res = req.send().await.map_err(|err| {
            tracing::warn!(%method, path = url.path(), "backend unreachable: {err}");
            GatewayError::Network(err)
        })?;

        let status = res.status();
        if !status.is_success() {
            tracing::warn!(%method, path = url.path(), status = status.as_u16(), "backend error");
            return Err(GatewayError::Http {
                status: status.as_u16(),
            });
        }

        let bytes = res.bytes().await.map_err(GatewayError::Network)?;
        serde_json::from_slice(&bytes).map_err(|err| GatewayError::Decode(err.to_string()))
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, GatewayError> {
        let body = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.send(Method::POST, self.endpoint(&["auth", "login"])?, Some(&body))
            .await
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<RegisteredUser, GatewayError> {
        let body = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.send(Method::POST, self.endpoint(&["auth", "register"])?, Some(&body))
            .await
    }

    pub async fn accounts(&self) -> Result<Vec<Account>, GatewayError> {
        self.send(Method::GET, self.endpoint(&["accounts", ""])?, None::<&()>)
            .await
    }

    pub async fn account(&self, account_id: &str) -> Result<Account, GatewayError> {
        self.send(Method::GET, self.endpoint(&["accounts", account_id])?, None::<&()>)
            .await
    }

    pub async fn yearly_analytics(
        &self,
        account_id: &str,
        year: Option<i32>,
    ) -> Result<YearlyAnalytics, GatewayError> {
        let mut url = self.endpoint(&["analytics", "yearly", account_id])?;
        if let Some(year) = year {
            url.query_pairs_mut().append_pair("year", &year.to_string());
        }
        self.send(Method::GET, url, None::<&()>).await
    }

    pub async fn monthly_analytics(
        &self,
        account_id: &str,
        year: i32,
        month: u32,
    ) -> Result<MonthlyAnalytics, GatewayError> {
        let mut url = self.endpoint(&["analytics", "monthly", account_id])?;
        url.query_pairs_mut()
            .append_pair("year", &year.to_string())
            .append_pair("month", &month.to_string());
        self.send(Method::GET, url, None::<&()>).await
    }

    /// Posts of an account, filtered server-side by `criteria`.
    pub async fn posts_analytics(
        &self,
        account_id: &str,
        criteria: &FilterCriteria,
    ) -> Result<Vec<Post>, GatewayError> {
        let mut url = self.endpoint(&["analytics", "posts", account_id])?;
        let pairs = criteria.query_pairs();
        if !pairs.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in &pairs {
                query.append_pair(key, value);
            }
        }
        self.send(Method::GET, url, None::<&()>).await
    }

    pub async fn refresh_tokens(
        &self,
        request: &TokenRefreshRequest,
    ) -> Result<TokenRefreshResponse, GatewayError> {
        self.send(
            Method::POST,
            self.endpoint(&["setup", "refresh-tokens"])?,
            Some(request),
        )
        .await
    }
}
