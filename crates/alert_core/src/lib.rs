//! Alert core: pure domain types, identifier derivation and deduplication.
mod dedup;
mod identity;
mod record;
mod seen;

pub use dedup::filter_new;
pub use identity::{job_identifier, synthesize_record_id};
pub use record::{JobRecord, MIN_TITLE_LEN, UNKNOWN_COMPANY, UNSPECIFIED_LOCATION};
pub use seen::SeenSet;
