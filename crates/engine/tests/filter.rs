use api_types::post::{MediaType, Post};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

use engine::{DateRange, FilterCriteria, LocalPosts, PostsView, filter_posts};

fn at(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn post(id: &str, timestamp: DateTime<Utc>, media_type: MediaType) -> Post {
    Post {
        ig_media_id: id.to_string(),
        ig_user_id: Some("17841400000000001".to_string()),
        timestamp,
        media_type,
        caption: None,
        media_url: None,
        thumbnail_url: None,
        permalink: None,
        like_count: 10,
        comments_count: 2,
        reach: Some(100),
        views: None,
        shares: None,
        saved: None,
        engagement_rate: None,
    }
}

fn sample() -> Vec<Post> {
    vec![
        post("p1", at("2025-01-01T09:00:00Z"), MediaType::Image),
        post("p2", at("2025-01-10T12:00:00Z"), MediaType::Video),
        post("p3", at("2025-01-20T18:30:00Z"), MediaType::CarouselAlbum),
        post("p4", at("2025-02-02T00:00:00Z"), MediaType::Image),
        post("p5", at("2025-02-15T23:00:00Z"), MediaType::Other("REELS".to_string())),
    ]
}

fn ids(view: &engine::FilteredView<'_>) -> Vec<String> {
    view.items.iter().map(|p| p.ig_media_id.clone()).collect()
}

#[test]
fn counts_always_add_up() {
    let posts = sample();
    let criteria_list = [
        FilterCriteria::new(),
        {
            let mut c = FilterCriteria::new();
            c.set_categories([MediaType::Image]);
            c
        },
        {
            let mut c = FilterCriteria::new();
            c.set_date_range(DateRange::new(Some(date(2025, 1, 10)), Some(date(2025, 1, 31))));
            c
        },
        {
            let mut c = FilterCriteria::new();
            c.set_date_range(DateRange::new(Some(date(2026, 1, 1)), None));
            c.set_categories([MediaType::Video, MediaType::Image]);
            c
        },
    ];

    for criteria in &criteria_list {
        let view = filter_posts(&posts, criteria, &Tz::UTC);
        assert_eq!(view.total, posts.len());
        assert_eq!(view.filtered_count, view.items.len());
        assert_eq!(view.filtered_count + view.hidden_count, view.total);
    }
}

#[test]
fn empty_category_set_matches_every_category() {
    let posts = sample();
    let view = filter_posts(&posts, &FilterCriteria::new(), &Tz::UTC);
    assert_eq!(ids(&view), vec!["p1", "p2", "p3", "p4", "p5"]);
    assert_eq!(view.hidden_count, 0);
}

#[test]
fn category_set_is_an_allow_list_and_keeps_order() {
    let posts = sample();
    let mut criteria = FilterCriteria::new();
    criteria.set_categories([MediaType::Image, MediaType::Other("REELS".to_string())]);

    let view = filter_posts(&posts, &criteria, &Tz::UTC);
    assert_eq!(ids(&view), vec!["p1", "p4", "p5"]);
    assert_eq!(view.hidden_count, 2);
}

#[test]
fn date_and_category_predicates_combine() {
    let posts = sample();
    let mut criteria = FilterCriteria::new();
    criteria.set_date_range(DateRange::new(Some(date(2025, 1, 2)), Some(date(2025, 2, 2))));
    criteria.set_categories([MediaType::Image, MediaType::Video]);

    let view = filter_posts(&posts, &criteria, &Tz::UTC);
    assert_eq!(ids(&view), vec!["p2", "p4"]);
}

#[test]
fn to_bound_includes_last_millisecond_only() {
    let end = at("2025-01-31T23:59:59.999Z");
    let posts = vec![
        post("edge", end, MediaType::Image),
        post("after", end + Duration::milliseconds(1), MediaType::Image),
    ];
    let mut criteria = FilterCriteria::new();
    criteria.set_date_range(DateRange::new(None, Some(date(2025, 1, 31))));

    let view = filter_posts(&posts, &criteria, &Tz::UTC);
    assert_eq!(ids(&view), vec!["edge"]);
}

#[test]
fn from_bound_starts_at_local_midnight() {
    let tokyo: Tz = "Asia/Tokyo".parse().unwrap();
    // 2025-01-09T15:00Z is midnight of 2025-01-10 in Tokyo.
    let posts = vec![
        post("before", at("2025-01-09T14:59:59.999Z"), MediaType::Image),
        post("midnight", at("2025-01-09T15:00:00Z"), MediaType::Image),
    ];
    let mut criteria = FilterCriteria::new();
    criteria.set_date_range(DateRange::new(Some(date(2025, 1, 10)), None));

    let view = filter_posts(&posts, &criteria, &tokyo);
    assert_eq!(ids(&view), vec!["midnight"]);
}

#[test]
fn inverted_range_matches_nothing() {
    let posts = sample();
    let mut criteria = FilterCriteria::new();
    criteria.set_date_range(DateRange::new(Some(date(2025, 2, 1)), Some(date(2025, 1, 1))));

    let view = filter_posts(&posts, &criteria, &Tz::UTC);
    assert!(view.is_empty());
    assert_eq!(view.hidden_count, posts.len());
}

#[test]
fn reset_restores_full_view() {
    let local = LocalPosts::new(sample(), Tz::UTC);
    let mut criteria = FilterCriteria::new();
    criteria.set_categories([MediaType::Video]);
    criteria.set_date_range(DateRange::new(Some(date(2025, 1, 5)), None));
    assert_eq!(local.filtered_view(&criteria).filtered_count, 1);

    criteria.reset();
    let view = local.filtered_view(&criteria);
    assert_eq!(view.filtered_count, view.total);
    assert_eq!(view.hidden_count, 0);
}

#[test]
fn has_active_filters_truth_table() {
    let mut criteria = FilterCriteria::new();
    assert!(!criteria.has_active_filters());

    criteria.set_date_range(DateRange::new(Some(date(2025, 1, 1)), None));
    assert!(criteria.has_active_filters());
    criteria.set_date_range(DateRange::default());
    assert!(!criteria.has_active_filters());

    criteria.set_categories([MediaType::CarouselAlbum]);
    assert!(criteria.has_active_filters());
    criteria.set_categories([]);
    assert!(!criteria.has_active_filters());
}
