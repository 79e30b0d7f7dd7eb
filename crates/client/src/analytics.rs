//! Data-fetching resources for the yearly and monthly report pages.
//!
//! A failed fetch leaves `data == None` and a user-facing message in
//! `error`. Nothing retries on its own; `refetch` is the retry action.

use api_types::analytics::{MonthlyAnalytics, YearlyAnalytics};
use engine::{MonthSelection, YearSelection};

use crate::gateway::{Gateway, GatewayError};

pub const INVALID_PARAMETERS: &str = "invalid parameters";
pub const ACCOUNT_NOT_FOUND: &str = "account not found";
pub const SERVER_FAILURE: &str = "server failure";
pub const NETWORK_ERROR: &str = "network error";

/// Maps a gateway failure to the message shown in place of the data.
///
/// `maps_bad_request` is off for endpoints whose parameters are never user
/// supplied; a 400 there is reported like any other unexpected status.
pub fn fetch_error_message(err: &GatewayError, maps_bad_request: bool) -> &'static str {
    match err.status() {
        Some(400) if maps_bad_request => INVALID_PARAMETERS,
        Some(404) => ACCOUNT_NOT_FOUND,
        Some(500) => SERVER_FAILURE,
        _ => NETWORK_ERROR,
    }
}

#[derive(Debug)]
pub struct Resource<T> {
    data: Option<T>,
    loading: bool,
    error: Option<String>,
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: true,
            error: None,
        }
    }
}

impl<T> Resource<T> {
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn finish(&mut self, result: Result<T, GatewayError>, maps_bad_request: bool) {
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            Err(err) => {
                tracing::warn!("analytics fetch failed: {err}");
                self.data = None;
                self.error = Some(fetch_error_message(&err, maps_bad_request).to_string());
            }
        }
        self.loading = false;
    }
}

#[derive(Debug)]
pub struct YearlyReport {
    account_id: String,
    selection: YearSelection,
    resource: Resource<YearlyAnalytics>,
}

impl YearlyReport {
    pub fn new(account_id: &str, selection: YearSelection) -> Self {
        Self {
            account_id: account_id.to_string(),
            selection,
            resource: Resource::default(),
        }
    }

    pub fn selection(&self) -> YearSelection {
        self.selection
    }

    pub fn resource(&self) -> &Resource<YearlyAnalytics> {
        &self.resource
    }

    pub async fn load(&mut self, gateway: &Gateway) {
        if self.account_id.is_empty() {
            return;
        }
        self.resource.begin();
        let result = gateway
            .yearly_analytics(&self.account_id, Some(self.selection.year()))
            .await;
        self.resource.finish(result, false);
    }

    pub async fn refetch(&mut self, gateway: &Gateway) {
        self.load(gateway).await;
    }

    /// Changes the year and reloads; out-of-range years are ignored.
    pub async fn select_year(&mut self, gateway: &Gateway, year: i32) -> bool {
        if !self.selection.set_year(year) {
            return false;
        }
        self.load(gateway).await;
        true
    }
}

#[derive(Debug)]
pub struct MonthlyReport {
    account_id: String,
    selection: MonthSelection,
    resource: Resource<MonthlyAnalytics>,
}

impl MonthlyReport {
    pub fn new(account_id: &str, selection: MonthSelection) -> Self {
        Self {
            account_id: account_id.to_string(),
            selection,
            resource: Resource::default(),
        }
    }

    pub fn selection(&self) -> MonthSelection {
        self.selection
    }

    pub fn resource(&self) -> &Resource<MonthlyAnalytics> {
        &self.resource
    }

    pub async fn load(&mut self, gateway: &Gateway) {
        if self.account_id.is_empty() {
            return;
        }
        self.resource.begin();
        let result = gateway
            .monthly_analytics(&self.account_id, self.selection.year(), self.selection.month())
            .await;
        self.resource.finish(result, true);
    }

    pub async fn refetch(&mut self, gateway: &Gateway) {
        self.load(gateway).await;
    }

    pub async fn select_year(&mut self, gateway: &Gateway, year: i32) -> bool {
        if !self.selection.set_year(year) {
            return false;
        }
        self.load(gateway).await;
        true
    }

    pub async fn select_month(&mut self, gateway: &Gateway, month: u32) -> bool {
        if !self.selection.set_month(month) {
            return false;
        }
        self.load(gateway).await;
        true
    }
}
