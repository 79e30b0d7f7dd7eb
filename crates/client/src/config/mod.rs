use std::{path::PathBuf, time::Duration};

use chrono_tz::Tz;
use clap::Args;
use serde::Deserialize;

use crate::{
    error::{AppError, Result},
    gateway::Gateway,
    posts::PostsMode,
};

const DEFAULT_CONFIG_PATH: &str = "config/gramstats.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    /// IANA zone used to interpret filter dates.
    pub timezone: String,
    pub state_path: String,
    pub posts_mode: PostsMode,
    /// Unset means requests never time out.
    pub request_timeout_secs: Option<u64>,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timezone: "UTC".to_string(),
            state_path: crate::local_state::default_state_path()
                .to_string_lossy()
                .into_owned(),
            posts_mode: PostsMode::Remote,
            request_timeout_secs: None,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|err| AppError::Timezone(format!("{}: {err}", self.timezone)))
    }

    pub fn gateway(&self) -> Result<Gateway> {
        let gateway = Gateway::builder()
            .base_url(&self.base_url)
            .state_path(PathBuf::from(&self.state_path))
            .timeout(self.request_timeout_secs.map(Duration::from_secs))
            .build()?;
        Ok(gateway)
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Override base URL (e.g. http://localhost:8000).
    #[arg(long, global = true)]
    pub base_url: Option<String>,
    /// Override timezone (IANA name).
    #[arg(long, global = true)]
    pub timezone: Option<String>,
    /// Override where the session token is persisted.
    #[arg(long, global = true)]
    pub state_path: Option<String>,
}

pub fn load(args: &ConfigArgs) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("GRAMSTATS"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = &args.base_url {
        settings.base_url = base_url.clone();
    }
    if let Some(timezone) = &args.timezone {
        settings.timezone = timezone.clone();
    }
    if let Some(state_path) = &args.state_path {
        settings.state_path = state_path.clone();
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let config = AppConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.posts_mode, PostsMode::Remote);
        assert_eq!(config.tz().unwrap(), Tz::UTC);
    }

    #[test]
    fn cli_overrides_win() {
        let args = ConfigArgs {
            config: Some("does/not/exist".to_string()),
            base_url: Some("http://analytics.internal:9000".to_string()),
            timezone: Some("Asia/Tokyo".to_string()),
            state_path: None,
        };
        let config = load(&args).unwrap();
        assert_eq!(config.base_url, "http://analytics.internal:9000");
        assert_eq!(config.tz().unwrap(), chrono_tz::Asia::Tokyo);
    }

    #[test]
    fn unknown_timezone_is_reported() {
        let config = AppConfig {
            timezone: "Mars/Olympus".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(config.tz(), Err(AppError::Timezone(_))));
    }
}
