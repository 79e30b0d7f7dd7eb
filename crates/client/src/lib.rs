pub mod accounts;
pub mod analytics;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod local_state;
pub mod posts;
pub mod route;
pub mod session;
pub mod setup;

pub use accounts::AccountStore;
pub use analytics::{MonthlyReport, Resource, YearlyReport, fetch_error_message};
pub use config::{AppConfig, ConfigArgs};
pub use dashboard::Dashboard;
pub use error::{AppError, Result};
pub use gateway::{Gateway, GatewayBuilder, GatewayError};
pub use guard::{AuthGuard, GuardView};
pub use posts::{FetchTag, PostsFeed, PostsMode};
pub use route::{History, Navigator, Route};
pub use session::{AuthError, Session, SessionState, SessionStore, ValidationError};
pub use setup::{RefreshOutcome, SetupError, TokenRefreshForm};
