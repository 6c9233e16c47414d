use std::{io, process::ExitCode};

use productscraper::{
    browser::webdriver::WebDriverLauncher, CsvSink, Scraper, ScraperOptions,
};
use tokio::signal;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new("info"))
                .expect("telemetry: Creating EnvFilter"),
        )
        .init();

    let scraper = Scraper::new(ScraperOptions::default());
    let launcher = WebDriverLauncher::default();
    let mut sink = CsvSink::new(".");

    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for event: {:?}", error);
            std::future::pending::<()>().await;
        }
    };

    match scraper.run(&launcher, &mut sink, ctrl_c).await {
        Ok(report) => {
            if let Err(err) = report.write_json(io::stdout().lock()) {
                tracing::error!("failed to write report, error '{:?}'", err);
            }
            println!();
            if report.interrupted || report.failed().next().is_some() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(err) => {
            tracing::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
