//! Account selection.
//!
//! The current account always follows the URL: `switch_account` only
//! navigates, and the next `sync_route` call picks the new account up.

use api_types::account::Account;

use crate::{
    analytics::fetch_error_message,
    gateway::{Gateway, GatewayError},
    route::{Navigator, Route, with_account},
};

#[derive(Debug)]
pub struct AccountStore {
    accounts: Vec<Account>,
    current: Option<usize>,
    loading: bool,
    error: Option<String>,
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountStore {
    pub fn new() -> Self {
        Self {
            accounts: Vec::new(),
            current: None,
            loading: true,
            error: None,
        }
    }

    /// Backend order, never re-sorted.
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn current_account(&self) -> Option<&Account> {
        self.current.and_then(|index| self.accounts.get(index))
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn position(&self, ig_user_id: &str) -> Option<usize> {
        self.accounts
            .iter()
            .position(|account| account.ig_user_id == ig_user_id)
    }

    pub async fn load(&mut self, gateway: &Gateway, route: &Route) {
        self.loading = true;
        self.error = None;
        let result = gateway.accounts().await;
        self.apply_accounts(result, route);
    }

    pub async fn refresh_accounts(&mut self, gateway: &Gateway, route: &Route) {
        self.load(gateway, route).await;
    }

    /// Stores a fetched collection and re-derives the current account from
    /// the route, falling back to the first account.
    pub fn apply_accounts(&mut self, result: Result<Vec<Account>, GatewayError>, route: &Route) {
        match result {
            Ok(accounts) => {
                tracing::debug!(count = accounts.len(), "accounts loaded");
                self.accounts = accounts;
                self.current = route
                    .account_id
                    .as_deref()
                    .and_then(|id| self.position(id))
                    .or_else(|| (!self.accounts.is_empty()).then_some(0));
            }
            Err(err) => {
                tracing::warn!("failed to load accounts: {err}");
                self.error = Some(fetch_error_message(&err, true).to_string());
            }
        }
        self.loading = false;
    }

    /// URL watcher: follows the route's account segment when it names a
    /// known account. Returns `true` when the current account changed.
    pub fn sync_route(&mut self, route: &Route) -> bool {
        let Some(index) = route.account_id.as_deref().and_then(|id| self.position(id)) else {
            return false;
        };
        if self.current == Some(index) {
            return false;
        }
        self.current = Some(index);
        true
    }

    /// Navigates to the same page for another account. Unknown ids are
    /// ignored.
    pub fn switch_account<N: Navigator>(&self, ig_user_id: &str, navigator: &mut N) -> bool {
        if self.position(ig_user_id).is_none() {
            return false;
        }
        let target = with_account(navigator.location(), ig_user_id);
        navigator.push(&target);
        true
    }
}
