//! Page-level controller.
//!
//! Owns the gateway and every store and composes them the way the pages
//! do: guard first, then the account store follows the URL, then the page's
//! own data. The filter feed and the account store never talk to each
//! other; this controller wires them.

use api_types::auth::RegisteredUser;
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use engine::{MonthSelection, YearSelection};

use crate::{
    accounts::AccountStore,
    analytics::{MonthlyReport, YearlyReport},
    config::AppConfig,
    error::Result,
    gateway::Gateway,
    guard::{AuthGuard, GuardView},
    posts::{PostsFeed, PostsMode},
    route::{History, LOGIN_ROUTE, Navigator, Route},
    session::{AuthError, SessionStore},
};

#[derive(Debug)]
pub struct Dashboard {
    gateway: Gateway,
    session: SessionStore,
    accounts: AccountStore,
    accounts_loaded: bool,
    history: History,
    posts: PostsFeed,
    tz: Tz,
}

impl Dashboard {
    pub fn new(gateway: Gateway, mode: PostsMode, tz: Tz) -> Self {
        let posts = PostsFeed::new(gateway.clone(), mode, tz);
        Self {
            gateway,
            session: SessionStore::new(),
            accounts: AccountStore::new(),
            accounts_loaded: false,
            history: History::default(),
            posts,
            tz,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self::new(config.gateway()?, config.posts_mode, config.tz()?))
    }

    /// Resolves the session from persisted state.
    pub fn start(&mut self) {
        self.session.restore(&self.gateway);
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn accounts(&self) -> &AccountStore {
        &self.accounts
    }

    pub fn posts(&self) -> &PostsFeed {
        &self.posts
    }

    pub fn posts_mut(&mut self) -> &mut PostsFeed {
        &mut self.posts
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn route(&self) -> Route {
        Route::parse(self.history.location())
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Calendar date in the configured zone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz).date_naive()
    }

    /// Navigates to `path` and runs the page guard.
    ///
    /// When the page renders and names an account, the account collection
    /// is fetched on first use and the current account follows the URL.
    pub async fn open(&mut self, path: &str) -> GuardView {
        self.history.push(path);
        let mut guard = if Route::parse(path).path == LOGIN_ROUTE {
            AuthGuard::guest_only()
        } else {
            AuthGuard::authenticated()
        };
        let view = guard.evaluate(&self.session, &mut self.history);
        if view != GuardView::Render {
            return view;
        }

        let route = self.route();
        if route.account_id.is_some() {
            if !self.accounts_loaded {
                self.refresh_accounts().await;
            }
            self.accounts.sync_route(&route);
        }
        view
    }

    pub async fn refresh_accounts(&mut self) {
        let route = self.route();
        self.accounts.refresh_accounts(&self.gateway, &route).await;
        self.accounts_loaded = self.accounts.error().is_none();
    }

    pub async fn login(&mut self, username: &str, password: &str) -> std::result::Result<(), AuthError> {
        self.session
            .login(&mut self.gateway, &mut self.history, username, password)
            .await?;
        self.posts.set_gateway(self.gateway.clone());
        Ok(())
    }

    pub async fn register(&self, username: &str, password: &str) -> std::result::Result<RegisteredUser, AuthError> {
        self.session.register(&self.gateway, username, password).await
    }

    pub fn logout(&mut self) {
        self.session.logout(&mut self.gateway);
        self.posts.detach();
        self.posts.set_gateway(self.gateway.clone());
        self.accounts = AccountStore::new();
        self.accounts_loaded = false;
    }

    /// Moves the current page to another account and lets the URL watcher
    /// pick it up. The posts feed follows only on the posts page, and only
    /// once that page has attached it.
    pub fn switch_account(&mut self, ig_user_id: &str) -> bool {
        if !self.accounts.switch_account(ig_user_id, &mut self.history) {
            return false;
        }
        let route = self.route();
        self.accounts.sync_route(&route);
        if route.is_posts_page() && self.posts.is_attached() {
            if let Some(account_id) = &route.account_id {
                self.posts.mount(account_id);
            }
        }
        true
    }

    pub fn yearly_report(&self) -> Option<YearlyReport> {
        let route = self.route();
        let account_id = route.account_id.as_deref()?;
        let selection = YearSelection::from_query(&route.query, self.today());
        Some(YearlyReport::new(account_id, selection))
    }

    pub fn monthly_report(&self) -> Option<MonthlyReport> {
        let route = self.route();
        let account_id = route.account_id.as_deref()?;
        let selection = MonthSelection::from_query(&route.query, self.today());
        Some(MonthlyReport::new(account_id, selection))
    }

    /// Attaches the posts feed to the account in the URL.
    pub fn mount_posts(&mut self) -> bool {
        let route = self.route();
        match route.account_id {
            Some(account_id) => {
                self.posts.mount(&account_id);
                true
            }
            None => false,
        }
    }
}
