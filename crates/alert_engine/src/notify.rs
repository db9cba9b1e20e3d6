use std::time::Duration;

use alert_core::JobRecord;
use alert_logging::{alert_error, alert_info};
use chrono::Local;
use serde_json::{json, Value};

const DEFAULT_ENDPOINT: &str = "https://api.resend.com/emails";
// The sender domain must be verified with the email provider beforehand.
const DEFAULT_SENDER: &str = "Job Alert <onboarding@resend.dev>";

#[derive(Debug, Clone)]
pub struct NotifySettings {
    pub api_key: String,
    pub recipient: String,
    /// The monitored page, shown in the email intro.
    pub board_url: String,
    pub endpoint: String,
    pub sender: String,
    pub timeout: Duration,
}

impl NotifySettings {
    pub fn new(
        api_key: impl Into<String>,
        recipient: impl Into<String>,
        board_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            recipient: recipient.into(),
            board_url: board_url.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            sender: DEFAULT_SENDER.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Sends the new-postings digest. Implementations must not contact the
/// email API when the slice is empty, and must swallow delivery failures
/// (logged, not retried, never propagated).
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, new_jobs: &[JobRecord]);
}

/// [`Notifier`] backed by the Resend transactional-email API.
pub struct ResendNotifier {
    settings: NotifySettings,
    client: reqwest::Client,
}

impl ResendNotifier {
    pub fn new(settings: NotifySettings) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { settings, client })
    }
}

#[async_trait::async_trait]
impl Notifier for ResendNotifier {
    async fn notify(&self, new_jobs: &[JobRecord]) {
        if new_jobs.is_empty() {
            return;
        }

        let subject = format!("New Job Postings Found ({} new)", new_jobs.len());
        let payload = json!({
            "from": self.settings.sender,
            "to": [self.settings.recipient],
            "subject": subject,
            "html": render_html(new_jobs, &self.settings.board_url),
            "text": render_text(new_jobs),
        });

        let result = self
            .client
            .post(&self.settings.endpoint)
            .bearer_auth(&self.settings.api_key)
            .timeout(self.settings.timeout)
            .json(&payload)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                let id = response
                    .json::<Value>()
                    .await
                    .ok()
                    .and_then(|body| body.get("id").and_then(Value::as_str).map(String::from))
                    .unwrap_or_else(|| "<unknown>".to_string());
                alert_info!("Email sent successfully, id {id}");
            }
            Ok(response) => {
                let status = response.status();
                let detail = response.text().await.unwrap_or_default();
                alert_error!("Email API returned {status}: {detail}");
            }
            Err(err) => {
                alert_error!("Error sending email: {err}");
            }
        }
    }
}

fn render_html(jobs: &[JobRecord], board_url: &str) -> String {
    let mut body = format!(
        "<html>\n<head>\n<style>\n\
         body {{ font-family: Arial, sans-serif; }}\n\
         .job {{ margin: 20px 0; padding: 15px; border-left: 4px solid #007bff; background-color: #f8f9fa; }}\n\
         .job-title {{ font-size: 18px; font-weight: bold; color: #007bff; }}\n\
         .job-company {{ font-size: 14px; color: #666; margin: 5px 0; }}\n\
         .job-location {{ font-size: 14px; color: #666; }}\n\
         .job-link {{ margin-top: 10px; }}\n\
         .job-link a {{ color: #007bff; text-decoration: none; }}\n\
         </style>\n</head>\n<body>\n\
         <h2>New Job Postings Found</h2>\n\
         <p>Found {count} new job posting(s) on {url}</p>\n",
        count = jobs.len(),
        url = escape_html(board_url),
    );

    for job in jobs {
        let link = if job.link.is_empty() { board_url } else { &job.link };
        body.push_str(&format!(
            "<div class=\"job\">\n\
             <div class=\"job-title\">{title}</div>\n\
             <div class=\"job-company\">{company}</div>\n\
             <div class=\"job-location\">{location}</div>\n\
             <div class=\"job-link\"><a href=\"{link}\">View Job &rarr;</a></div>\n\
             </div>\n",
            title = escape_html(&job.title),
            company = escape_html(&job.company),
            location = escape_html(&job.location),
            link = escape_html(link),
        ));
    }

    body.push_str(&format!(
        "<hr>\n<p style=\"color: #666; font-size: 12px;\">\n\
         This is an automated job alert. Checked at: {}\n</p>\n</body>\n</html>\n",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
    ));
    body
}

fn render_text(jobs: &[JobRecord]) -> String {
    let mut text = format!(
        "New Job Postings Found\n\nFound {} new job posting(s):\n\n",
        jobs.len()
    );
    for job in jobs {
        text.push_str(&format!("- {} at {}\n", job.title, job.company));
        if !job.link.is_empty() {
            text.push_str(&format!("  Link: {}\n", job.link));
        }
        text.push('\n');
    }
    text
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
