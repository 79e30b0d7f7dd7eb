//! Filter state engine for post collections.
//!
//! [`FilterCriteria`] is the value owned by the page controller. Deriving the
//! visible subset is a pure function of `(criteria, posts)`: see
//! [`LocalPosts`] for the in-memory derivation and [`PostsView`] for the
//! contract shared with server-delegated sources.
//!
//! Calendar dates are interpreted in a configured time zone: `from` starts at
//! local midnight and `to` ends at `23:59:59.999` local time.

use std::collections::BTreeSet;

use api_types::post::{MediaType, Post};
use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Optional `[from, to]` pair of calendar dates, both inclusive.
///
/// `from <= to` is not enforced; an inverted range matches nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// First instant included by `from`, i.e. local midnight.
    pub fn start_instant(&self, tz: &Tz) -> Option<DateTime<Utc>> {
        self.from
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| resolve_local(tz, naive, Bias::Earliest))
    }

    /// Last instant included by `to`, i.e. `23:59:59.999` local.
    pub fn end_instant(&self, tz: &Tz) -> Option<DateTime<Utc>> {
        self.to
            .and_then(|date| date.and_hms_milli_opt(23, 59, 59, 999))
            .map(|naive| resolve_local(tz, naive, Bias::Latest))
    }
}

#[derive(Clone, Copy)]
enum Bias {
    Earliest,
    Latest,
}

/// Maps a local wall-clock time to UTC.
///
/// Folds pick the side that widens the range; a time inside a DST gap is
/// moved past the gap.
fn resolve_local(tz: &Tz, naive: NaiveDateTime, bias: Bias) -> DateTime<Utc> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(value) => value.with_timezone(&Utc),
        LocalResult::Ambiguous(early, late) => match bias {
            Bias::Earliest => early.with_timezone(&Utc),
            Bias::Latest => late.with_timezone(&Utc),
        },
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .map(|value| value.with_timezone(&Utc))
            .unwrap_or_else(|| naive.and_utc()),
    }
}

/// Date range plus category allow-list.
///
/// An empty category set means "every category".
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FilterCriteria {
    pub date_range: DateRange,
    pub categories: BTreeSet<MediaType>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_active_filters(&self) -> bool {
        !self.date_range.is_unbounded() || !self.categories.is_empty()
    }

    /// Restores both filters to their empty sentinels.
    ///
    /// Returns `true` when something was cleared.
    pub fn reset(&mut self) -> bool {
        let changed = self.has_active_filters();
        self.date_range = DateRange::default();
        self.categories.clear();
        changed
    }

    /// Returns `true` when the range differs from the current one.
    pub fn set_date_range(&mut self, range: DateRange) -> bool {
        if self.date_range == range {
            return false;
        }
        self.date_range = range;
        true
    }

    pub fn set_categories<I>(&mut self, categories: I) -> bool
    where
        I: IntoIterator<Item = MediaType>,
    {
        let categories: BTreeSet<MediaType> = categories.into_iter().collect();
        if self.categories == categories {
            return false;
        }
        self.categories = categories;
        true
    }

    /// Adds the category when absent, removes it otherwise.
    pub fn toggle_category(&mut self, category: MediaType) {
        if !self.categories.remove(&category) {
            self.categories.insert(category);
        }
    }

    /// Precomputes the instants so a collection is scanned without
    /// re-resolving the time zone per item.
    pub fn matcher(&self, tz: &Tz) -> Matcher<'_> {
        Matcher {
            start: self.date_range.start_instant(tz),
            end: self.date_range.end_instant(tz),
            categories: &self.categories,
        }
    }

    pub fn matches(&self, post: &Post, tz: &Tz) -> bool {
        self.matcher(tz).matches(post)
    }

    /// Query parameters for `/analytics/posts/{account}`.
    ///
    /// Dates are `YYYY-MM-DD`; categories are comma-joined in set order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(from) = self.date_range.from {
            pairs.push(("start_date", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.date_range.to {
            pairs.push(("end_date", to.format("%Y-%m-%d").to_string()));
        }
        if !self.categories.is_empty() {
            let joined = self
                .categories
                .iter()
                .map(MediaType::as_str)
                .collect::<Vec<_>>()
                .join(",");
            pairs.push(("media_type", joined));
        }
        pairs
    }
}

/// Criteria resolved against a time zone.
#[derive(Debug)]
pub struct Matcher<'a> {
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    categories: &'a BTreeSet<MediaType>,
}

impl Matcher<'_> {
    pub fn matches(&self, post: &Post) -> bool {
        if self.start.is_some_and(|start| post.timestamp < start) {
            return false;
        }
        if self.end.is_some_and(|end| post.timestamp > end) {
            return false;
        }
        self.categories.is_empty() || self.categories.contains(&post.media_type)
    }
}

/// Result of applying criteria to a collection.
///
/// `filtered_count + hidden_count == total` always holds.
#[derive(Debug, PartialEq)]
pub struct FilteredView<'a> {
    pub items: Vec<&'a Post>,
    pub total: usize,
    pub filtered_count: usize,
    pub hidden_count: usize,
}

impl<'a> FilteredView<'a> {
    /// View over items that are already filtered (server-side).
    pub fn unfiltered(items: &'a [Post]) -> Self {
        Self {
            items: items.iter().collect(),
            total: items.len(),
            filtered_count: items.len(),
            hidden_count: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Anything that can present a filtered view of posts.
pub trait PostsView {
    fn filtered_view(&self, criteria: &FilterCriteria) -> FilteredView<'_>;
}

/// Stable in-memory filter over a fully loaded collection.
pub fn filter_posts<'a>(posts: &'a [Post], criteria: &FilterCriteria, tz: &Tz) -> FilteredView<'a> {
    let matcher = criteria.matcher(tz);
    let items: Vec<&Post> = posts.iter().filter(|post| matcher.matches(post)).collect();
    let filtered_count = items.len();
    FilteredView {
        items,
        total: posts.len(),
        filtered_count,
        hidden_count: posts.len() - filtered_count,
    }
}

/// Local-derivation mode: the whole collection is held and filtered on
/// demand.
#[derive(Clone, Debug)]
pub struct LocalPosts {
    posts: Vec<Post>,
    tz: Tz,
}

impl LocalPosts {
    pub fn new(posts: Vec<Post>, tz: Tz) -> Self {
        Self { posts, tz }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn replace(&mut self, posts: Vec<Post>) {
        self.posts = posts;
    }
}

impl PostsView for LocalPosts {
    fn filtered_view(&self, criteria: &FilterCriteria) -> FilteredView<'_> {
        filter_posts(&self.posts, criteria, &self.tz)
    }
}
