#![allow(dead_code)]

use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Duration,
};

use api_types::{
    account::Account,
    analytics::{DailyStats, MonthlyAnalytics, MonthlyStats, YearlyAnalytics},
    auth::{Credentials, LoginResponse, RegisteredUser},
    post::{MediaType, Post},
    setup::{TokenRefreshRequest, TokenRefreshResponse},
};
use axum::{
    Json, Router,
    extract::{Path, Query, RawQuery, State},
    http::{HeaderMap, StatusCode, header},
    routing::{get, post},
};
use chrono::{NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use engine::{DateRange, FilterCriteria, filter_posts};
use gramstats::Gateway;
use serde::{Deserialize, Serialize};

pub const TOKEN: &str = "tok-alice";
pub const USERNAME: &str = "alice";
pub const PASSWORD: &str = "secret123";

/// Requests observed by the stub backend.
#[derive(Clone, Default)]
pub struct Recorded {
    pub post_queries: Arc<Mutex<Vec<String>>>,
}

impl Recorded {
    pub fn post_queries(&self) -> Vec<String> {
        self.post_queries.lock().unwrap().clone()
    }
}

pub struct StubBackend {
    pub base_url: String,
    pub recorded: Recorded,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EchoedHeaders {
    pub authorization: Option<String>,
    pub content_type: Option<String>,
}

pub fn account(id: &str) -> Account {
    Account {
        id: None,
        name: format!("Account {id}"),
        ig_user_id: id.to_string(),
        username: format!("handle_{}", id.to_lowercase()),
        profile_picture_url: None,
    }
}

pub fn post_at(id: &str, media_type: MediaType, y: i32, m: u32, d: u32) -> Post {
    Post {
        ig_media_id: id.to_string(),
        ig_user_id: Some("A".to_string()),
        timestamp: Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap(),
        media_type,
        caption: None,
        media_url: None,
        thumbnail_url: None,
        permalink: None,
        like_count: 10,
        comments_count: 2,
        reach: Some(100),
        views: None,
        shares: Some(1),
        saved: Some(1),
        engagement_rate: None,
    }
}

pub fn fixture_posts() -> Vec<Post> {
    vec![
        post_at("img-jan", MediaType::Image, 2025, 1, 10),
        post_at("vid-feb", MediaType::Video, 2025, 2, 5),
        post_at("car-mar", MediaType::CarouselAlbum, 2025, 3, 1),
        post_at("img-mar", MediaType::Image, 2025, 3, 20),
    ]
}

fn is_known(id: &str) -> bool {
    matches!(id, "A" | "B")
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        == Some(format!("Bearer {TOKEN}").as_str())
}

async fn login(Json(credentials): Json<Credentials>) -> Result<Json<LoginResponse>, StatusCode> {
    if credentials.username == USERNAME && credentials.password == PASSWORD {
        Ok(Json(LoginResponse {
            access_token: TOKEN.to_string(),
            token_type: "bearer".to_string(),
        }))
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

async fn register(
    Json(credentials): Json<Credentials>,
) -> Result<Json<RegisteredUser>, StatusCode> {
    if credentials.username == "taken" {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(Json(RegisteredUser {
        id: 7,
        username: credentials.username,
        created_at: None,
    }))
}

async fn accounts(headers: HeaderMap) -> Result<Json<Vec<Account>>, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(Json(vec![account("A"), account("B")]))
}

async fn account_by_id(Path(id): Path<String>) -> Result<Json<Account>, StatusCode> {
    if is_known(&id) {
        Ok(Json(account(&id)))
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

async fn yearly(
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<YearlyAnalytics>, StatusCode> {
    if id == "broken" {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    if !is_known(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let year = query.get("year").cloned().unwrap_or_else(|| "2025".to_string());
    Ok(Json(YearlyAnalytics {
        account_id: id,
        monthly_stats: vec![MonthlyStats {
            month: format!("{year}-01"),
            followers_count: 1200,
            follows_count: 300,
            media_count: 4,
            profile_views: 90,
            website_clicks: 5,
            total_likes: 40,
            total_comments: 8,
            total_shares: 4,
            total_saved: 4,
        }],
        total_posts: 4,
        avg_engagement_rate: 5.6,
    }))
}

async fn monthly(
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<MonthlyAnalytics>, StatusCode> {
    let year: i32 = query
        .get("year")
        .and_then(|raw| raw.parse().ok())
        .ok_or(StatusCode::BAD_REQUEST)?;
    let month: u32 = query
        .get("month")
        .and_then(|raw| raw.parse().ok())
        .ok_or(StatusCode::BAD_REQUEST)?;
    if !(1..=12).contains(&month) {
        return Err(StatusCode::BAD_REQUEST);
    }
    if !is_known(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let date = NaiveDate::from_ymd_opt(year, month, 1).ok_or(StatusCode::BAD_REQUEST)?;
    Ok(Json(MonthlyAnalytics {
        account_id: id,
        month: format!("{year}-{month:02}"),
        daily_stats: vec![DailyStats {
            date,
            posts_count: 1,
            new_followers: 3,
            reach: 250,
            profile_views: 12,
            website_clicks: 1,
        }],
    }))
}

async fn posts(
    State(recorded): State<Recorded>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    RawQuery(raw): RawQuery,
) -> Result<Json<Vec<Post>>, StatusCode> {
    recorded
        .post_queries
        .lock()
        .unwrap()
        .push(raw.unwrap_or_default());
    if !is_known(&id) {
        return Err(StatusCode::NOT_FOUND);
    }

    let parse_date = |key: &str| -> Result<Option<NaiveDate>, StatusCode> {
        query
            .get(key)
            .map(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
            .transpose()
            .map_err(|_| StatusCode::BAD_REQUEST)
    };
    let mut criteria = FilterCriteria::new();
    criteria.set_date_range(DateRange::new(parse_date("start_date")?, parse_date("end_date")?));
    let media_types = query.get("media_type").cloned().unwrap_or_default();
    criteria.set_categories(
        media_types
            .split(',')
            .filter(|tag| !tag.is_empty())
            .map(MediaType::from),
    );

    // Slow down one query so responses can arrive out of order.
    if media_types.contains("VIDEO") {
        tokio::time::sleep(Duration::from_millis(150)).await;
    }

    let all = fixture_posts();
    let view = filter_posts(&all, &criteria, &Tz::UTC);
    Ok(Json(view.items.into_iter().cloned().collect()))
}

async fn refresh_tokens(Json(request): Json<TokenRefreshRequest>) -> Json<TokenRefreshResponse> {
    if request.app_id == "bad" {
        return Json(TokenRefreshResponse {
            success: false,
            message: "token refresh failed".to_string(),
            updated_accounts: 0,
            new_accounts: 0,
            total_processed: 0,
            errors: vec!["invalid app id".to_string()],
        });
    }
    Json(TokenRefreshResponse {
        success: true,
        message: "tokens refreshed".to_string(),
        updated_accounts: 1,
        new_accounts: 1,
        total_processed: 2,
        errors: Vec::new(),
    })
}

async fn echo(headers: HeaderMap) -> Json<EchoedHeaders> {
    let value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    Json(EchoedHeaders {
        authorization: value(header::AUTHORIZATION),
        content_type: value(header::CONTENT_TYPE),
    })
}

pub async fn spawn_backend() -> StubBackend {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/accounts/", get(accounts))
        .route("/accounts/{id}", get(account_by_id))
        .route("/analytics/yearly/{id}", get(yearly))
        .route("/analytics/monthly/{id}", get(monthly))
        .route("/analytics/posts/{id}", get(posts))
        .route("/setup/refresh-tokens", post(refresh_tokens))
        .route("/echo", get(echo))
        .with_state(recorded.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    StubBackend {
        base_url: format!("http://{addr}"),
        recorded,
    }
}

/// Fresh state file path under the system temp dir.
pub fn unique_state_path(label: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!(
        "gramstats_{label}_{}_{nanos}.json",
        std::process::id()
    ))
}

pub fn gateway(backend: &StubBackend, state_path: &std::path::Path) -> Gateway {
    Gateway::builder()
        .base_url(&backend.base_url)
        .state_path(state_path)
        .build()
        .unwrap()
}

pub fn signed_in_gateway(backend: &StubBackend) -> Gateway {
    let mut gateway = gateway(backend, &unique_state_path("signed_in"));
    gateway.set_token(TOKEN).unwrap();
    gateway
}
