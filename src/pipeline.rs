//! Scrapes one category page into one sink.

use std::{num::NonZeroUsize, path::PathBuf};

use serde::Serialize;
use url::Url;

use crate::{
    accumulator::{Accumulator, StopPolicy},
    browser::Browser,
    error::CategoryError,
    extractor::CardExtractor,
    options::ScraperOptions,
    product::Product,
    sink::RecordSink,
};

/// Cards read from a category that is only previewed.
const PREVIEW_CARDS: NonZeroUsize = match NonZeroUsize::new(3) {
    Some(n) => n,
    None => panic!("preview size must be non-zero"),
};

/// One row of the run's category table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTarget {
    pub sink_name: String,
    /// Relative to the base URL.
    pub path: String,
    pub stop_policy: StopPolicy,
}

impl CategoryTarget {
    pub fn new<S: Into<String>, P: Into<String>>(
        sink_name: S,
        path: P,
        stop_policy: StopPolicy,
    ) -> Self {
        Self {
            sink_name: sink_name.into(),
            path: path.into(),
            stop_policy,
        }
    }

    /// The categories of the e-commerce test site.
    pub fn catalog() -> Vec<CategoryTarget> {
        let first_three = StopPolicy::Exactly(PREVIEW_CARDS);
        vec![
            Self::new("home", "", first_three),
            Self::new("computers", "computers", first_three),
            Self::new("laptops", "computers/laptops", StopPolicy::Exhaustive),
            Self::new("tablets", "computers/tablets", StopPolicy::Exhaustive),
            Self::new("phones", "phones", first_three),
            Self::new("touch", "phones/touch", StopPolicy::Exhaustive),
        ]
    }
}

/// A card that could not be extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedCard {
    /// Position of the card in document order.
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryReport {
    pub sink_name: String,
    pub url: String,
    pub location: PathBuf,
    pub cards_seen: usize,
    pub written: usize,
    pub skipped: Vec<SkippedCard>,
}

pub struct CategoryPipeline<'a> {
    options: &'a ScraperOptions,
}

impl<'a> CategoryPipeline<'a> {
    pub fn new(options: &'a ScraperOptions) -> Self {
        Self { options }
    }

    pub fn url_of(&self, target: &CategoryTarget) -> Result<Url, CategoryError> {
        let invalid = |source| CategoryError::InvalidPath {
            path: target.path.clone(),
            source,
        };
        Url::parse(&self.options.base_url)
            .and_then(|base| base.join(&target.path))
            .map_err(invalid)
    }

    pub async fn run<B, S>(
        &self,
        browser: &B,
        target: &CategoryTarget,
        sink: &mut S,
    ) -> Result<CategoryReport, CategoryError>
    where
        B: Browser,
        S: RecordSink<Product>,
    {
        let url = self.url_of(target)?;
        tracing::info!(sink = %target.sink_name, url = %url, "pipeline: scraping category");
        browser
            .navigate(&url)
            .await
            .map_err(|source| CategoryError::Navigation {
                url: url.to_string(),
                source,
            })?;

        let cards = Accumulator::new(self.options)
            .accumulate(browser, target.stop_policy)
            .await?;
        tracing::info!(sink = %target.sink_name, cards = cards.len(), "pipeline: cards collected");

        let extractor = CardExtractor::new(&self.options.layout);
        let mut products = Vec::with_capacity(cards.len());
        let mut skipped = Vec::new();
        for (index, card) in cards.iter().enumerate() {
            match extractor.extract(card).await {
                Ok(product) => products.push(product),
                Err(err) => {
                    tracing::warn!(
                        sink = %target.sink_name,
                        index,
                        error = %err,
                        "pipeline: skipping card"
                    );
                    skipped.push(SkippedCard {
                        index,
                        reason: err.to_string(),
                    });
                }
            }
        }

        let location = sink.write(&target.sink_name, &products)?;
        tracing::info!(
            sink = %target.sink_name,
            written = products.len(),
            skipped = skipped.len(),
            location = %location.display(),
            "pipeline: category written"
        );

        Ok(CategoryReport {
            sink_name: target.sink_name.clone(),
            url: url.to_string(),
            location,
            cards_seen: cards.len(),
            written: products.len(),
            skipped,
        })
    }
}
