//! A library for scraping the product catalog of the webscraper.io e-commerce
//! test site into one CSV file per category.

pub mod accumulator;
pub mod browser;
pub mod error;
pub mod extractor;
pub mod options;
pub mod pipeline;
pub mod product;
pub mod scraper;
pub mod sink;

pub use accumulator::{Accumulator, ExpansionLimit, SettleStrategy, StopPolicy};
pub use browser::{Browser, Element, Launcher, Lookup};
pub use error::{
    AccumulateError, CategoryError, DriverError, ExtractError, Field, ScrapeError, SinkError,
};
pub use extractor::CardExtractor;
pub use options::{ScraperOptions, SiteLayout};
pub use pipeline::{CategoryPipeline, CategoryReport, CategoryTarget, SkippedCard};
pub use product::{CardText, Product};
pub use scraper::Scraper;
pub use sink::{CsvSink, Record, RecordSink};
