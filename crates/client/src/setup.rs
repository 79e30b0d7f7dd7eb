use api_types::setup::{TokenRefreshRequest, TokenRefreshResponse};
use thiserror::Error;

use crate::gateway::{Gateway, GatewayError};

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("app id, app secret and access token are required")]
    Incomplete,
    #[error("a refresh is already in progress")]
    InProgress,
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    Refreshed {
        new_accounts: u32,
        updated_accounts: u32,
        total_processed: u32,
        message: String,
    },
    /// The backend answered but could not refresh; fields are kept so the
    /// user can correct them.
    Failed { message: String, errors: Vec<String> },
}

impl From<TokenRefreshResponse> for RefreshOutcome {
    fn from(value: TokenRefreshResponse) -> Self {
        if value.success {
            Self::Refreshed {
                new_accounts: value.new_accounts,
                updated_accounts: value.updated_accounts,
                total_processed: value.total_processed,
                message: value.message,
            }
        } else {
            Self::Failed {
                message: value.message,
                errors: value.errors,
            }
        }
    }
}

/// Credential-entry form for `/setup/refresh-tokens`.
#[derive(Debug, Default)]
pub struct TokenRefreshForm {
    pub app_id: String,
    pub app_secret: String,
    pub access_token: String,
    submitting: bool,
}

impl TokenRefreshForm {
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_submittable(&self) -> bool {
        !self.submitting
            && !self.app_id.trim().is_empty()
            && !self.app_secret.trim().is_empty()
            && !self.access_token.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.app_id.clear();
        self.app_secret.clear();
        self.access_token.clear();
    }

    pub async fn submit(&mut self, gateway: &Gateway) -> Result<RefreshOutcome, SetupError> {
        if self.submitting {
            return Err(SetupError::InProgress);
        }
        if !self.is_submittable() {
            return Err(SetupError::Incomplete);
        }

        let request = TokenRefreshRequest {
            app_id: self.app_id.trim().to_string(),
            app_secret: self.app_secret.trim().to_string(),
            access_token: self.access_token.trim().to_string(),
        };
        self.submitting = true;
        let result = gateway.refresh_tokens(&request).await;
        self.submitting = false;

        let outcome = RefreshOutcome::from(result?);
        match &outcome {
            RefreshOutcome::Refreshed {
                total_processed, ..
            } => {
                tracing::info!(total_processed, "account tokens refreshed");
                self.clear();
            }
            RefreshOutcome::Failed { errors, .. } => {
                tracing::warn!(errors = errors.len(), "token refresh failed");
            }
        }
        Ok(outcome)
    }
}
