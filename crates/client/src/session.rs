//! Authentication session.
//!
//! The store restores a session from a persisted token without asking the
//! backend who the token belongs to: a stale or forged token still yields an
//! authenticated session, with no known username.

use api_types::auth::RegisteredUser;
use thiserror::Error;

use crate::{
    gateway::{Gateway, GatewayError},
    local_state::LocalStateError,
    route::{HOME_ROUTE, Navigator},
};

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("username must be at least 3 characters")]
    UsernameTooShort,
    #[error("password must be at least 6 characters")]
    PasswordTooShort,
    #[error("{0} is required")]
    MissingField(&'static str),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    /// The backend refused the credentials.
    #[error("login rejected (status {status})")]
    Rejected { status: u16 },
    #[error(transparent)]
    Gateway(GatewayError),
    #[error(transparent)]
    Storage(#[from] LocalStateError),
}

impl From<GatewayError> for AuthError {
    fn from(value: GatewayError) -> Self {
        match value {
            GatewayError::Http { status } => Self::Rejected { status },
            other => Self::Gateway(other),
        }
    }
}

/// Client-side form check run before any credentials leave the process.
pub fn validate_login(username: &str, password: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::MissingField("username"));
    }
    if password.is_empty() {
        return Err(ValidationError::MissingField("password"));
    }
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(ValidationError::UsernameTooShort);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    /// Known only after an interactive login.
    pub username: Option<String>,
    pub token: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    Loading,
    Unauthenticated,
    Authenticated(Session),
}

#[derive(Debug)]
pub struct SessionStore {
    state: SessionState,
    /// Bumped on every state transition.
    revision: u64,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            state: SessionState::Loading,
            revision: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state == SessionState::Loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn transition(&mut self, state: SessionState) {
        if self.state != state {
            self.state = state;
            self.revision += 1;
        }
    }

    /// Resolves the initial `Loading` state from the gateway's persisted
    /// token.
    pub fn restore(&mut self, gateway: &Gateway) {
        match gateway.token() {
            Some(token) => {
                tracing::debug!("restored persisted session token");
                self.transition(SessionState::Authenticated(Session {
                    username: None,
                    token: token.to_string(),
                }));
            }
            None => self.transition(SessionState::Unauthenticated),
        }
    }

    /// Exchanges credentials for a token, then replaces the location with
    /// the landing route.
    pub async fn login<N: Navigator>(
        &mut self,
        gateway: &mut Gateway,
        navigator: &mut N,
        username: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        validate_login(username, password)?;

        let response = gateway.login(username, password).await.map_err(|err| {
            tracing::warn!(username, "login failed: {err}");
            AuthError::from(err)
        })?;
        gateway.set_token(&response.access_token)?;

        tracing::info!(username, "logged in");
        self.transition(SessionState::Authenticated(Session {
            username: Some(username.to_string()),
            token: response.access_token,
        }));
        navigator.replace(HOME_ROUTE);
        Ok(())
    }

    /// Creates a backend user; does not sign in.
    pub async fn register(
        &self,
        gateway: &Gateway,
        username: &str,
        password: &str,
    ) -> Result<RegisteredUser, AuthError> {
        validate_login(username, password)?;
        let user = gateway.register(username, password).await?;
        tracing::info!(username, "registered user");
        Ok(user)
    }

    /// Drops the session locally. No backend call is made.
    pub fn logout(&mut self, gateway: &mut Gateway) {
        if let Err(err) = gateway.clear_token() {
            tracing::warn!("failed to clear persisted token: {err}");
        }
        tracing::info!("logged out");
        self.transition(SessionState::Unauthenticated);
    }
}
