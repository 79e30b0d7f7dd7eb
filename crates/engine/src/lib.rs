//! Pure analytics logic: post filtering, engagement metrics and report
//! periods. Nothing in this crate performs I/O.

pub use engagement::{PostSummary, engagement_rate};
pub use error::EngineError;
pub use filter::{DateRange, FilterCriteria, FilteredView, LocalPosts, Matcher, PostsView, filter_posts};
pub use period::{MAX_YEAR, MIN_YEAR, MonthSelection, YearSelection};

mod engagement;
mod error;
mod filter;
mod period;

type ResultEngine<T> = Result<T, EngineError>;
