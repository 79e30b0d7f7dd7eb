//! Page routes and navigation.
//!
//! Analytics pages live under `/analytics/account/<ig_user_id>/...`; the
//! account segment is what the account store watches.

pub const LOGIN_ROUTE: &str = "/login";
pub const HOME_ROUTE: &str = "/";
pub const SETUP_ROUTE: &str = "/setup";

/// Where the user currently is, and how to move.
pub trait Navigator {
    fn location(&self) -> &str;
    /// Adds a history entry.
    fn push(&mut self, path: &str);
    /// Navigates without keeping the current entry.
    fn replace(&mut self, path: &str);
}

/// In-memory history stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct History {
    entries: Vec<String>,
}

impl History {
    pub fn new(initial: &str) -> Self {
        Self {
            entries: vec![initial.to_string()],
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Returns to the previous entry; the first entry is never popped.
    pub fn back(&mut self) -> bool {
        if self.entries.len() > 1 {
            self.entries.pop();
            return true;
        }
        false
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(HOME_ROUTE)
    }
}

impl Navigator for History {
    fn location(&self) -> &str {
        self.entries.last().map(String::as_str).unwrap_or(HOME_ROUTE)
    }

    fn push(&mut self, path: &str) {
        tracing::debug!(path, "navigate");
        self.entries.push(path.to_string());
    }

    fn replace(&mut self, path: &str) {
        tracing::debug!(path, "navigate (replace)");
        match self.entries.last_mut() {
            Some(last) => *last = path.to_string(),
            None => self.entries.push(path.to_string()),
        }
    }
}

/// A parsed location.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Route {
    pub path: String,
    pub query: String,
    pub account_id: Option<String>,
}

impl Route {
    pub fn parse(location: &str) -> Self {
        let (path, query) = location.split_once('?').unwrap_or((location, ""));
        let segments: Vec<&str> = path.split('/').collect();
        let account_id = segments
            .windows(2)
            .find(|pair| pair[0] == "account")
            .map(|pair| pair[1])
            .filter(|id| !id.is_empty())
            .map(str::to_string);
        Self {
            path: path.to_string(),
            query: query.to_string(),
            account_id,
        }
    }

    /// Whether this is an account's posts page.
    pub fn is_posts_page(&self) -> bool {
        self.account_id.is_some() && self.path.trim_end_matches('/').ends_with("/posts")
    }
}

/// Replaces the first `/account/<id>` segment of `location`.
///
/// Locations without an account segment are returned unchanged.
pub fn with_account(location: &str, account_id: &str) -> String {
    let (path, query) = match location.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (location, None),
    };

    let mut parts: Vec<&str> = path.split('/').collect();
    let Some(index) = parts
        .windows(2)
        .position(|pair| pair[0] == "account" && !pair[1].is_empty())
    else {
        return location.to_string();
    };
    parts[index + 1] = account_id;

    let mut rewritten = parts.join("/");
    if let Some(query) = query {
        rewritten.push('?');
        rewritten.push_str(query);
    }
    rewritten
}

pub fn yearly_route(account_id: &str, year: Option<i32>) -> String {
    match year {
        Some(year) => format!("/analytics/account/{account_id}/yearly?year={year}"),
        None => format!("/analytics/account/{account_id}/yearly"),
    }
}

pub fn monthly_route(account_id: &str, year: i32, month: u32) -> String {
    format!("/analytics/account/{account_id}/monthly?year={year}&month={month}")
}

pub fn posts_route(account_id: &str) -> String {
    format!("/analytics/account/{account_id}/posts")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_extracts_account_and_query() {
        let route = Route::parse("/analytics/account/17841/monthly?year=2025&month=2");
        assert_eq!(route.account_id.as_deref(), Some("17841"));
        assert_eq!(route.path, "/analytics/account/17841/monthly");
        assert_eq!(route.query, "year=2025&month=2");
    }

    #[test]
    fn parse_without_account_segment() {
        assert_eq!(Route::parse("/setup").account_id, None);
        assert_eq!(Route::parse("/accounts/17841").account_id, None);
        assert_eq!(Route::parse("/analytics/account/").account_id, None);
    }

    #[test]
    fn empty_account_segment_is_not_an_account() {
        let route = Route::parse("/analytics/account//yearly");
        assert_eq!(route.account_id, None);
        assert_eq!(route.path, "/analytics/account//yearly");
    }

    #[test]
    fn posts_page_detection() {
        assert!(Route::parse(&posts_route("A")).is_posts_page());
        assert!(!Route::parse(&yearly_route("A", Some(2024))).is_posts_page());
        assert!(!Route::parse("/posts").is_posts_page());
    }

    #[test]
    fn with_account_rewrites_segment_and_keeps_rest() {
        assert_eq!(
            with_account("/analytics/account/A/yearly?year=2024", "B"),
            "/analytics/account/B/yearly?year=2024"
        );
        assert_eq!(with_account("/analytics/account/A", "B"), "/analytics/account/B");
    }

    #[test]
    fn with_account_leaves_other_paths_alone() {
        assert_eq!(with_account("/setup", "B"), "/setup");
        assert_eq!(with_account("/accounts/A", "B"), "/accounts/A");
    }

    #[test]
    fn history_push_replace_back() {
        let mut history = History::default();
        history.push("/login");
        history.replace("/");
        assert_eq!(history.entries(), ["/", "/"]);
        assert!(history.back());
        assert!(!history.back());
        assert_eq!(history.location(), "/");
    }
}
