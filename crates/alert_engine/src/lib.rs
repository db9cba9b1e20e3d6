//! Alert engine: scraping, parsing, persistence and notification IO.
mod fetch;
mod notify;
mod parse;
mod pipeline;
mod store;
mod types;

pub use fetch::{FetchSettings, FirecrawlFetcher, JobSource};
pub use notify::{Notifier, NotifySettings, ResendNotifier};
pub use parse::parse_postings;
pub use pipeline::AlertPipeline;
pub use store::{PersistError, SeenStore};
pub use types::{AttemptError, CycleReport, FailureKind};
