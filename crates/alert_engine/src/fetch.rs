use std::time::Duration;

use alert_core::{synthesize_record_id, JobRecord};
use alert_logging::{alert_debug, alert_info, alert_warn};
use serde_json::{json, Value};

use crate::parse::parse_postings;
use crate::types::{AttemptError, FailureKind};

const DEFAULT_EXTRACT_ENDPOINTS: [&str; 2] = [
    "https://api.firecrawl.dev/v2/extract",
    "https://api.firecrawl.dev/v1/extract",
];
const DEFAULT_SCRAPE_ENDPOINTS: [&str; 2] = [
    "https://api.firecrawl.dev/v2/scrape",
    "https://api.firecrawl.dev/v1/scrape",
];

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub api_key: String,
    /// The job-board page to monitor.
    pub board_url: String,
    /// Structured-extraction endpoints, tried in order.
    pub extract_endpoints: Vec<String>,
    /// Raw-scrape endpoints, tried in order.
    pub scrape_endpoints: Vec<String>,
    pub extract_timeout: Duration,
    pub scrape_timeout: Duration,
}

impl FetchSettings {
    pub fn new(api_key: impl Into<String>, board_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            board_url: board_url.into(),
            extract_endpoints: DEFAULT_EXTRACT_ENDPOINTS
                .iter()
                .map(ToString::to_string)
                .collect(),
            scrape_endpoints: DEFAULT_SCRAPE_ENDPOINTS
                .iter()
                .map(ToString::to_string)
                .collect(),
            extract_timeout: Duration::from_secs(60),
            scrape_timeout: Duration::from_secs(30),
        }
    }
}

/// Source of job records for one cycle.
///
/// An empty result means "no jobs found this cycle", not necessarily an
/// error; failures are logged internally and never propagated.
#[async_trait::async_trait]
pub trait JobSource: Send + Sync {
    async fn fetch_jobs(&self) -> Vec<JobRecord>;
}

/// Firecrawl-backed [`JobSource`].
///
/// Tries the structured extract endpoints first, then falls back to raw
/// scraping plus local HTML parsing. Within each mode the endpoint list is
/// the outer loop and the payload-shape list the inner loop; the first
/// combination that yields usable records wins and no further calls are made.
#[derive(Debug, Clone)]
pub struct FirecrawlFetcher {
    settings: FetchSettings,
    client: reqwest::Client,
}

impl FirecrawlFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { settings, client })
    }

    async fn extract_jobs(&self) -> Vec<JobRecord> {
        let schema = jobs_schema();
        // Single-URL key first, then the URL-array variant some API
        // versions expect.
        let payloads = [
            json!({
                "url": self.settings.board_url,
                "extractorOptions": { "mode": "llm-extract", "schema": schema },
            }),
            json!({
                "urls": [self.settings.board_url],
                "extractorOptions": { "mode": "llm-extract", "schema": schema },
            }),
        ];

        for endpoint in &self.settings.extract_endpoints {
            for payload in &payloads {
                alert_info!("Extracting jobs from {}", self.settings.board_url);
                match self
                    .post_json(endpoint, payload, self.settings.extract_timeout)
                    .await
                {
                    Ok(envelope) => {
                        let jobs = jobs_from_envelope(envelope);
                        if !jobs.is_empty() {
                            return jobs;
                        }
                        alert_debug!("No jobs in extract response from {endpoint}");
                    }
                    Err(err) => {
                        alert_warn!("Extract attempt against {endpoint} failed: {err}");
                    }
                }
            }
        }
        Vec::new()
    }

    async fn scrape_jobs(&self) -> Vec<JobRecord> {
        // Selector-scoped request first; servers that ignore or reject the
        // hint get the plainer shapes.
        let payloads = [
            json!({
                "url": self.settings.board_url,
                "formats": ["html", "markdown"],
                "selectors": ["#offers-list"],
            }),
            json!({
                "url": self.settings.board_url,
                "formats": ["html", "markdown"],
            }),
            json!({
                "url": self.settings.board_url,
                "pageOptions": { "onlyMainContent": false },
            }),
        ];

        for endpoint in &self.settings.scrape_endpoints {
            for payload in &payloads {
                alert_info!("Scraping jobs from {}", self.settings.board_url);
                match self
                    .post_json(endpoint, payload, self.settings.scrape_timeout)
                    .await
                {
                    Ok(envelope) => {
                        if let Some(html) = content_from_envelope(&envelope) {
                            let jobs = parse_postings(&html);
                            if !jobs.is_empty() {
                                return jobs;
                            }
                        }
                        alert_debug!("No usable content in scrape response from {endpoint}");
                    }
                    Err(err) => {
                        alert_warn!("Scrape attempt against {endpoint} failed: {err}");
                    }
                }
            }
        }
        Vec::new()
    }

    async fn post_json(
        &self,
        endpoint: &str,
        payload: &Value,
        timeout: Duration,
    ) -> Result<Value, AttemptError> {
        let response = self
            .client
            .post(endpoint)
            .bearer_auth(&self.settings.api_key)
            .timeout(timeout)
            .json(payload)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let detail = response.text().await.unwrap_or_default();
            return Err(AttemptError::new(
                FailureKind::HttpStatus(status.as_u16()),
                detail,
            ));
        }

        let envelope: Value = response
            .json()
            .await
            .map_err(|err| AttemptError::new(FailureKind::MalformedBody, err.to_string()))?;

        // Older API versions report failure through a `success` flag.
        if envelope.get("success").and_then(Value::as_bool) == Some(false) {
            let detail = envelope
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(AttemptError::new(FailureKind::ApiRejected, detail));
        }

        Ok(envelope)
    }
}

#[async_trait::async_trait]
impl JobSource for FirecrawlFetcher {
    async fn fetch_jobs(&self) -> Vec<JobRecord> {
        let jobs = self.extract_jobs().await;
        if !jobs.is_empty() {
            alert_info!("Found {} job listings via extract", jobs.len());
            return jobs;
        }

        let jobs = self.scrape_jobs().await;
        if !jobs.is_empty() {
            alert_info!("Found {} job listings via scrape", jobs.len());
        }
        jobs
    }
}

/// JSON schema handed to the extraction API describing the desired shape.
fn jobs_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "jobs": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "company": { "type": "string" },
                        "location": { "type": "string" },
                        "link": { "type": "string" },
                        "description": { "type": "string" },
                    },
                },
            },
        },
    })
}

/// Pulls job records out of an extract-mode response envelope.
///
/// The payload may live under `data` or at the top level, and some API
/// versions wrap it in a one-element array. Records with too-short titles
/// are dropped; records without a source id get one synthesized.
fn jobs_from_envelope(envelope: Value) -> Vec<JobRecord> {
    let data = match envelope {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) => data,
            None => Value::Object(map),
        },
        other => other,
    };
    let data = match data {
        Value::Array(items) => match items.into_iter().next() {
            Some(first) => first,
            None => return Vec::new(),
        },
        other => other,
    };

    let Some(jobs) = data.get("jobs") else {
        return Vec::new();
    };
    let records: Vec<JobRecord> = match serde_json::from_value(jobs.clone()) {
        Ok(records) => records,
        Err(err) => {
            alert_warn!("Jobs array did not match the expected shape: {err}");
            return Vec::new();
        }
    };

    records
        .into_iter()
        .filter(JobRecord::has_usable_title)
        .map(|mut record| {
            if record.id.is_none() {
                record.id = Some(synthesize_record_id(&record));
            }
            record
        })
        .collect()
}

/// Pulls raw page content out of a scrape-mode response envelope, trying the
/// `html`, `markdown` and `content` keys in that order.
fn content_from_envelope(envelope: &Value) -> Option<String> {
    let data = envelope.get("data").unwrap_or(envelope);
    for key in ["html", "markdown", "content"] {
        if let Some(content) = data.get(key).and_then(Value::as_str) {
            if !content.is_empty() {
                return Some(content.to_string());
            }
        }
    }
    None
}

fn map_reqwest_error(err: reqwest::Error) -> AttemptError {
    if err.is_timeout() {
        return AttemptError::new(FailureKind::Timeout, err.to_string());
    }
    AttemptError::new(FailureKind::Network, err.to_string())
}
