use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEFAULT_CHECK_INTERVAL_MINUTES: u64 = 180;
const DEFAULT_STATE_FILE: &str = "jobs_db.json";

/// Runtime configuration, sourced from the environment (a `.env` file is
/// honoured when present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub firecrawl_api_key: String,
    pub resend_api_key: String,
    /// Single notification recipient.
    pub recipient: String,
    /// The job-board page to monitor.
    pub board_url: String,
    pub check_interval: Duration,
    pub state_file: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            firecrawl_api_key: require("FIRECRAWL_API_KEY")?,
            resend_api_key: require("RESEND_API_KEY")?,
            recipient: require("EMAIL")?,
            board_url: require("SITE_URL")?,
            check_interval: parse_check_interval(
                std::env::var("CHECK_INTERVAL_MINUTES").ok().as_deref(),
            ),
            state_file: std::env::var("JOBS_DB_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATE_FILE)),
        })
    }

    pub fn check_interval_minutes(&self) -> u64 {
        self.check_interval.as_secs() / 60
    }
}

fn require(name: &str) -> Result<String> {
    let value =
        std::env::var(name).with_context(|| format!("{name} not set in environment"))?;
    if value.trim().is_empty() {
        bail!("{name} is set but empty");
    }
    Ok(value)
}

/// The variable may be absent or not a number; both fall back to the default.
fn parse_check_interval(raw: Option<&str>) -> Duration {
    let minutes = raw
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|minutes| *minutes > 0)
        .unwrap_or(DEFAULT_CHECK_INTERVAL_MINUTES);
    Duration::from_secs(minutes * 60)
}
