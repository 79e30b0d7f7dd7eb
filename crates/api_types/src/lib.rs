use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Deserializes backend timestamps into UTC.
///
/// The analytics backend emits RFC3339 with an offset for most rows, but
/// naive `YYYY-MM-DDTHH:MM:SS[.fff]` values also occur; those are UTC.
pub mod timestamp {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
    }

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, String> {
        if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
            return Ok(value.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|err| format!("invalid timestamp {raw:?}: {err}"))
    }
}

pub mod auth {
    use super::*;

    /// Body of `/auth/login` and `/auth/register`.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct Credentials {
        pub username: String,
        pub password: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct LoginResponse {
        pub access_token: String,
        pub token_type: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct RegisteredUser {
        pub id: i64,
        pub username: String,
        #[serde(default)]
        pub created_at: Option<String>,
    }
}

pub mod account {
    use super::*;

    /// A managed Instagram profile.
    ///
    /// `ig_user_id` is the identifier used in page routes
    /// (`/analytics/account/<ig_user_id>/...`).
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Account {
        #[serde(default)]
        pub id: Option<i64>,
        pub name: String,
        pub ig_user_id: String,
        pub username: String,
        #[serde(default)]
        pub profile_picture_url: Option<String>,
    }
}

pub mod post {
    use super::*;

    /// Category of a post.
    ///
    /// Unknown tags coming from the backend are kept verbatim in `Other`.
    #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    #[serde(from = "String", into = "String")]
    pub enum MediaType {
        Image,
        Video,
        CarouselAlbum,
        Other(String),
    }

    impl MediaType {
        /// Returns the canonical tag used on the wire and in query strings.
        pub fn as_str(&self) -> &str {
            match self {
                Self::Image => "IMAGE",
                Self::Video => "VIDEO",
                Self::CarouselAlbum => "CAROUSEL_ALBUM",
                Self::Other(tag) => tag,
            }
        }

        pub fn known() -> [MediaType; 3] {
            [Self::Image, Self::Video, Self::CarouselAlbum]
        }
    }

    impl From<String> for MediaType {
        fn from(value: String) -> Self {
            match value.to_ascii_uppercase().as_str() {
                "IMAGE" => Self::Image,
                "VIDEO" => Self::Video,
                "CAROUSEL_ALBUM" | "CAROUSEL" => Self::CarouselAlbum,
                _ => Self::Other(value),
            }
        }
    }

    impl From<&str> for MediaType {
        fn from(value: &str) -> Self {
            Self::from(value.to_string())
        }
    }

    impl From<MediaType> for String {
        fn from(value: MediaType) -> Self {
            value.as_str().to_string()
        }
    }

    impl std::fmt::Display for MediaType {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.as_str())
        }
    }

    /// A published content item with its engagement metrics.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Post {
        pub ig_media_id: String,
        /// Owning account. Omitted by `/analytics/posts`.
        #[serde(default)]
        pub ig_user_id: Option<String>,
        #[serde(with = "crate::timestamp")]
        pub timestamp: DateTime<Utc>,
        pub media_type: MediaType,
        #[serde(default)]
        pub caption: Option<String>,
        #[serde(default)]
        pub media_url: Option<String>,
        #[serde(default)]
        pub thumbnail_url: Option<String>,
        #[serde(default)]
        pub permalink: Option<String>,
        pub like_count: u64,
        pub comments_count: u64,
        #[serde(default)]
        pub reach: Option<u64>,
        #[serde(default)]
        pub views: Option<u64>,
        #[serde(default)]
        pub shares: Option<u64>,
        #[serde(default)]
        pub saved: Option<u64>,
        /// Server-side rate, when the backend precomputed it.
        #[serde(default)]
        pub engagement_rate: Option<f64>,
    }
}

pub mod analytics {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct MonthlyStats {
        /// `YYYY-MM`.
        pub month: String,
        pub followers_count: i64,
        pub follows_count: i64,
        pub media_count: i64,
        pub profile_views: i64,
        pub website_clicks: i64,
        pub total_likes: i64,
        pub total_comments: i64,
        pub total_shares: i64,
        pub total_saved: i64,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct YearlyAnalytics {
        pub account_id: String,
        pub monthly_stats: Vec<MonthlyStats>,
        pub total_posts: i64,
        pub avg_engagement_rate: f64,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct DailyStats {
        pub date: NaiveDate,
        pub posts_count: i64,
        pub new_followers: i64,
        pub reach: i64,
        pub profile_views: i64,
        pub website_clicks: i64,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct MonthlyAnalytics {
        pub account_id: String,
        /// `YYYY-MM`.
        pub month: String,
        pub daily_stats: Vec<DailyStats>,
    }
}

pub mod setup {
    use super::*;

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct TokenRefreshRequest {
        pub app_id: String,
        pub app_secret: String,
        pub access_token: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TokenRefreshResponse {
        pub success: bool,
        pub message: String,
        pub updated_accounts: u32,
        pub new_accounts: u32,
        pub total_processed: u32,
        #[serde(default)]
        pub errors: Vec<String>,
    }
}
