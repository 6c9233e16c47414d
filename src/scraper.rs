use std::{future::Future, panic::AssertUnwindSafe};

use chrono::Utc;
use futures::FutureExt;
use tokio::time::Instant;

use crate::{
    browser::{Browser, Launcher},
    error::ScrapeError,
    options::ScraperOptions,
    pipeline::{CategoryPipeline, CategoryTarget},
    product::Product,
    sink::RecordSink,
};

pub mod report;
pub mod statistics;

use report::{CategoryOutcome, RunReport};
use statistics::Statistics;

/// Runs every category of the table, one after the other, in a single browser session.
pub struct Scraper {
    options: ScraperOptions,
    targets: Vec<CategoryTarget>,
}

impl Scraper {
    /// A scraper over [`CategoryTarget::catalog`].
    pub fn new(options: ScraperOptions) -> Self {
        Self {
            options,
            targets: CategoryTarget::catalog(),
        }
    }

    pub fn with_targets(mut self, targets: Vec<CategoryTarget>) -> Self {
        self.targets = targets;
        self
    }

    pub fn options(&self) -> &ScraperOptions {
        &self.options
    }

    pub fn targets(&self) -> &[CategoryTarget] {
        &self.targets
    }

    /// Launches a browser, scrapes every category into `sink` and closes the browser.
    ///
    /// A failing category is recorded in the report and the run moves on. The
    /// browser is closed once the categories are done, when `shutdown`
    /// resolves first, and before a panic in a category is resumed.
    pub async fn run<L, S, F>(
        &self,
        launcher: &L,
        sink: &mut S,
        shutdown: F,
    ) -> Result<RunReport, ScrapeError>
    where
        L: Launcher,
        S: RecordSink<Product>,
        F: Future,
    {
        tracing::info!(categories = self.targets.len(), "scraper: starting run");
        let starting_time = Instant::now();
        let browser = launcher.launch().await.map_err(ScrapeError::Launch)?;
        let mut report = RunReport::start();

        let outcome = {
            let categories =
                AssertUnwindSafe(self.run_categories(&browser, sink, &mut report)).catch_unwind();
            tokio::select! {
                biased;
                _ = shutdown => None,
                result = categories => Some(result),
            }
        };

        if let Err(err) = browser.close().await {
            tracing::error!(error = %err, "scraper: failed to close browser");
        }
        match outcome {
            Some(Ok(())) => {}
            Some(Err(panic)) => std::panic::resume_unwind(panic),
            None => {
                tracing::warn!("scraper: interrupted, remaining categories skipped");
                report.interrupted = true;
            }
        }

        report.finish();
        tracing::info!("scraper: run finished");
        Statistics::from_report(&report).write_to_log(starting_time.elapsed());
        Ok(report)
    }

    async fn run_categories<B, S>(&self, browser: &B, sink: &mut S, report: &mut RunReport)
    where
        B: Browser,
        S: RecordSink<Product>,
    {
        let pipeline = CategoryPipeline::new(&self.options);
        for target in &self.targets {
            let started_at = Utc::now();
            match pipeline.run(browser, target, sink).await {
                Ok(category) => report
                    .categories
                    .push(CategoryOutcome::succeeded(category, started_at)),
                Err(err) => {
                    tracing::error!(
                        sink = %target.sink_name,
                        error = %err,
                        "scraper: category failed"
                    );
                    // An unresolvable path is reported as written in the table.
                    let url = pipeline
                        .url_of(target)
                        .map(String::from)
                        .unwrap_or_else(|_| target.path.clone());
                    report.categories.push(CategoryOutcome::failed(
                        target.sink_name.as_str(),
                        url,
                        &err,
                        started_at,
                    ));
                }
            }
        }
    }
}
