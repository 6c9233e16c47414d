//! Error types for every layer of a scrape run.

use std::{fmt, time::Duration};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A browser command failed.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("browser command '{command}' failed: {source}")]
    Command {
        command: &'static str,
        #[source]
        source: BoxError,
    },
}

impl DriverError {
    pub fn command<E: Into<BoxError>>(command: &'static str, source: E) -> Self {
        Self::Command {
            command,
            source: source.into(),
        }
    }
}

/// The product card fields that are located by their own element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Description,
    Price,
    Reviews,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Description => "description",
            Field::Price => "price",
            Field::Reviews => "num_of_reviews",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure to turn one product card into a [`crate::Product`].
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("required field '{0}' not found")]
    MissingField(Field),

    #[error("malformed price '{text}'")]
    MalformedPrice { text: String },

    #[error("malformed review count '{text}'")]
    MalformedReviewCount { text: String },

    #[error("found {count} rating stars, at most 5 expected")]
    RatingOutOfRange { count: usize },

    #[error(transparent)]
    Driver(#[from] DriverError),
}

#[derive(Debug, thiserror::Error)]
pub enum AccumulateError {
    #[error("failed to read product cards: {0}")]
    Driver(#[from] DriverError),

    /// The expansion bound was reached while the load-more control was still present.
    #[error("load-more expansion still active after {rounds} rounds ({elapsed:?})")]
    ExpandTimeout { rounds: usize, elapsed: Duration },
}

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("sink io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// A failure that loses the output of one category.
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    #[error("invalid category path '{path}': {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to navigate to '{url}': {source}")]
    Navigation {
        url: String,
        #[source]
        source: DriverError,
    },

    #[error(transparent)]
    Accumulate(#[from] AccumulateError),

    #[error("failed to write sink: {0}")]
    Sink(#[from] SinkError),
}

/// A failure that prevents the run from starting.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("failed to launch browser: {0}")]
    Launch(#[source] DriverError),
}
