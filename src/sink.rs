//! Named tabular destinations for scraped records.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Serialize;

use crate::error::SinkError;

/// A row type with a fixed, ordered column schema.
///
/// The serialized field order must match `COLUMNS`.
pub trait Record: Serialize {
    const COLUMNS: &'static [&'static str];
}

pub trait RecordSink<T: Record> {
    /// Replaces the content of sink `name` with a header row and `records`,
    /// returning where the rows were written.
    fn write(&mut self, name: &str, records: &[T]) -> Result<PathBuf, SinkError>;
}

/// Writes each sink as `<dir>/<name>.csv`.
#[derive(Debug, Clone)]
pub struct CsvSink {
    dir: PathBuf,
}

impl CsvSink {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl<T: Record> RecordSink<T> for CsvSink {
    fn write(&mut self, name: &str, records: &[T]) -> Result<PathBuf, SinkError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("{name}.csv"));
        tracing::debug!(path = %path.display(), records = records.len(), "writing csv");

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)?;
        // written explicitly so that an empty category still gets a header
        writer.write_record(T::COLUMNS)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(path)
    }
}
