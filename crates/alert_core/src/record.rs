use serde::{Deserialize, Serialize};

/// Placeholder company when the source markup or API omits one.
pub const UNKNOWN_COMPANY: &str = "Unknown";
/// Placeholder location when the source markup or API omits one.
pub const UNSPECIFIED_LOCATION: &str = "Location not specified";
/// Minimum trimmed title length for a record to be kept.
pub const MIN_TITLE_LEN: usize = 5;

/// One job posting as produced by a single scrape cycle.
///
/// Records are transient: they are never persisted, only the identifiers
/// derived from them are (see [`crate::job_identifier`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Source-assigned identifier, if the extraction API returned one.
    /// Not used for deduplication; see [`crate::job_identifier`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_company")]
    pub company: String,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default)]
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_company() -> String {
    UNKNOWN_COMPANY.to_string()
}

fn default_location() -> String {
    UNSPECIFIED_LOCATION.to_string()
}

impl JobRecord {
    /// Whether the trimmed title meets the minimum length requirement.
    /// Records failing this are discarded by whichever component produced them.
    pub fn has_usable_title(&self) -> bool {
        self.title.trim().chars().count() >= MIN_TITLE_LEN
    }
}
