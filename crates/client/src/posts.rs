//! Posts page state: filter criteria plus the fetched posts.
//!
//! In [`PostsMode::Remote`] every criteria change issues a request with the
//! criteria as query parameters. Requests run concurrently and may complete
//! out of order, so each one is tagged with the `(account, criteria)` that
//! produced it and a completion is applied only if its tag still matches.
//! Dropping the feed aborts whatever is still in flight.
//!
//! [`PostsMode::Local`] fetches the unfiltered collection once per account
//! and derives every view in memory.

use api_types::post::{MediaType, Post};
use chrono_tz::Tz;
use clap::ValueEnum;
use engine::{DateRange, FilterCriteria, FilteredView, PostsView, filter_posts};
use serde::Deserialize;
use tokio::task::JoinSet;

use crate::{
    analytics::fetch_error_message,
    gateway::{Gateway, GatewayError},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PostsMode {
    #[default]
    Remote,
    Local,
}

/// Snapshot identifying which state a request was issued for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTag {
    pub account_id: String,
    pub criteria: FilterCriteria,
}

type Completion = (FetchTag, Result<Vec<Post>, GatewayError>);

#[derive(Debug)]
pub struct PostsFeed {
    gateway: Gateway,
    mode: PostsMode,
    tz: Tz,
    account_id: Option<String>,
    criteria: FilterCriteria,
    posts: Vec<Post>,
    loading: bool,
    error: Option<String>,
    in_flight: JoinSet<Completion>,
}

impl PostsFeed {
    pub fn new(gateway: Gateway, mode: PostsMode, tz: Tz) -> Self {
        Self {
            gateway,
            mode,
            tz,
            account_id: None,
            criteria: FilterCriteria::new(),
            posts: Vec::new(),
            loading: false,
            error: None,
            in_flight: JoinSet::new(),
        }
    }

    pub fn mode(&self) -> PostsMode {
        self.mode
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn has_active_filters(&self) -> bool {
        self.criteria.has_active_filters()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Replaces the gateway used for later requests, e.g. after login.
    pub fn set_gateway(&mut self, gateway: Gateway) {
        self.gateway = gateway;
    }

    /// Tag a completion must carry to be applied.
    pub fn current_tag(&self) -> Option<FetchTag> {
        let account_id = self.account_id.clone()?;
        let criteria = match self.mode {
            PostsMode::Remote => self.criteria.clone(),
            PostsMode::Local => FilterCriteria::new(),
        };
        Some(FetchTag {
            account_id,
            criteria,
        })
    }

    /// Attaches the feed to an account and issues the initial fetch.
    pub fn mount(&mut self, account_id: &str) {
        if self.account_id.as_deref() == Some(account_id) {
            return;
        }
        self.account_id = Some(account_id.to_string());
        self.posts.clear();
        self.issue();
    }

    pub fn is_attached(&self) -> bool {
        self.account_id.is_some()
    }

    /// Leaves the account: drops posts and criteria and aborts every
    /// outstanding fetch. The next `mount` always fetches.
    pub fn detach(&mut self) {
        // Dropping the previous set aborts its tasks.
        self.in_flight = JoinSet::new();
        self.account_id = None;
        self.criteria = FilterCriteria::new();
        self.posts.clear();
        self.loading = false;
        self.error = None;
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        if self.criteria.set_date_range(range) {
            self.criteria_changed();
        }
    }

    pub fn set_categories<I>(&mut self, categories: I)
    where
        I: IntoIterator<Item = MediaType>,
    {
        if self.criteria.set_categories(categories) {
            self.criteria_changed();
        }
    }

    pub fn toggle_category(&mut self, category: MediaType) {
        self.criteria.toggle_category(category);
        self.criteria_changed();
    }

    /// Clears both filters. Remote mode always refetches once.
    pub fn reset_filters(&mut self) {
        self.criteria.reset();
        if self.mode == PostsMode::Remote {
            self.issue();
        }
    }

    /// Explicit retry after a failure.
    pub fn refetch(&mut self) {
        self.issue();
    }

    fn criteria_changed(&mut self) {
        if self.mode == PostsMode::Remote {
            self.issue();
        }
    }

    fn issue(&mut self) {
        let Some(tag) = self.current_tag() else {
            return;
        };
        self.loading = true;
        self.error = None;

        tracing::debug!(account = %tag.account_id, query = ?tag.criteria.query_pairs(), "fetching posts");
        let gateway = self.gateway.clone();
        self.in_flight.spawn(async move {
            let result = gateway.posts_analytics(&tag.account_id, &tag.criteria).await;
            (tag, result)
        });
    }

    /// Applies one completion. Returns `false` when it was stale.
    pub fn apply(&mut self, tag: FetchTag, result: Result<Vec<Post>, GatewayError>) -> bool {
        if self.current_tag().as_ref() != Some(&tag) {
            tracing::debug!(account = %tag.account_id, "discarding stale posts response");
            return false;
        }
        match result {
            Ok(posts) => {
                self.posts = posts;
                self.error = None;
            }
            Err(err) => {
                tracing::warn!(account = %tag.account_id, "failed to fetch posts: {err}");
                self.posts.clear();
                self.error = Some(fetch_error_message(&err, true).to_string());
            }
        }
        self.loading = false;
        true
    }

    fn on_joined(&mut self, joined: Result<Completion, tokio::task::JoinError>) {
        match joined {
            Ok((tag, result)) => {
                self.apply(tag, result);
            }
            Err(err) if err.is_cancelled() => {}
            Err(err) => tracing::error!("posts fetch task failed: {err}"),
        }
    }

    /// Waits for every outstanding request and applies the results.
    pub async fn settle(&mut self) {
        while let Some(joined) = self.in_flight.join_next().await {
            self.on_joined(joined);
        }
    }

    /// Applies requests that already completed without waiting.
    pub fn poll_completed(&mut self) -> usize {
        let mut applied = 0;
        while let Some(joined) = self.in_flight.try_join_next() {
            self.on_joined(joined);
            applied += 1;
        }
        applied
    }

    /// The filtered view for the current criteria.
    pub fn view(&self) -> FilteredView<'_> {
        self.filtered_view(&self.criteria)
    }
}

impl PostsView for PostsFeed {
    fn filtered_view(&self, criteria: &FilterCriteria) -> FilteredView<'_> {
        match self.mode {
            // The server already applied the criteria.
            PostsMode::Remote => FilteredView::unfiltered(&self.posts),
            PostsMode::Local => filter_posts(&self.posts, criteria, &self.tz),
        }
    }
}
