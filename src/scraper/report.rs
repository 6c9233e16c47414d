use std::io;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::pipeline::CategoryReport;

/// What happened during one run, in category order.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// The run was stopped before every category was attempted.
    pub interrupted: bool,
    pub categories: Vec<CategoryOutcome>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryOutcome {
    pub sink_name: String,
    pub url: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub result: StateOutcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", content = "outcome")]
pub enum StateOutcome {
    Ok(CategoryReport),
    Error(String),
}

impl RunReport {
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            interrupted: false,
            categories: Vec::new(),
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &CategoryReport> {
        self.categories
            .iter()
            .filter_map(|category| match &category.result {
                StateOutcome::Ok(report) => Some(report),
                StateOutcome::Error(_) => None,
            })
    }

    pub fn failed(&self) -> impl Iterator<Item = &CategoryOutcome> {
        self.categories
            .iter()
            .filter(|category| matches!(category.result, StateOutcome::Error(_)))
    }

    pub fn write_json<W: io::Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, self)
    }
}

impl CategoryOutcome {
    pub fn succeeded(report: CategoryReport, started_at: DateTime<Utc>) -> Self {
        Self {
            sink_name: report.sink_name.clone(),
            url: report.url.clone(),
            started_at,
            finished_at: Utc::now(),
            result: StateOutcome::Ok(report),
        }
    }

    pub fn failed<S: Into<String>, U: Into<String>, E: ToString>(
        sink_name: S,
        url: U,
        error: &E,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sink_name: sink_name.into(),
            url: url.into(),
            started_at,
            finished_at: Utc::now(),
            result: StateOutcome::Error(error.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.result, StateOutcome::Ok(_))
    }
}
