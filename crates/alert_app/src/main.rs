//! Job alert binary: polls a job-board page and emails a digest of new
//! postings.

mod config;
mod logging;

use alert_engine::{
    AlertPipeline, FetchSettings, FirecrawlFetcher, NotifySettings, ResendNotifier, SeenStore,
};
use alert_logging::alert_info;
use config::AppConfig;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::initialize(logging::LogDestination::Terminal);

    let config = AppConfig::from_env()?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(config))
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    let fetcher = FirecrawlFetcher::new(FetchSettings::new(
        config.firecrawl_api_key.clone(),
        config.board_url.clone(),
    ))?;
    let notifier = ResendNotifier::new(NotifySettings::new(
        config.resend_api_key.clone(),
        config.recipient.clone(),
        config.board_url.clone(),
    ))?;
    let store = SeenStore::new(&config.state_file);
    let mut pipeline = AlertPipeline::new(fetcher, notifier, store);

    alert_info!("Starting job alert system");
    alert_info!("Checking every {} minutes", config.check_interval_minutes());
    alert_info!("Target URL: {}", config.board_url);
    alert_info!("Email notifications to: {}", config.recipient);
    alert_info!("Already tracking {} jobs", pipeline.tracked());

    // One cycle at a time: run immediately, then sleep the configured
    // interval between cycles, forever.
    let mut cycle: u64 = 0;
    loop {
        cycle += 1;
        alert_logging::set_cycle(cycle);
        let report = pipeline.run_cycle().await;
        alert_info!(
            "Cycle {} finished: {} fetched, {} new",
            alert_logging::get_cycle(),
            report.fetched,
            report.new
        );
        tokio::time::sleep(config.check_interval).await;
    }
}
