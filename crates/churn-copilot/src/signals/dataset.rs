use super::parser::parse_signals;
use super::{CustomerSignal, SignalLoadError};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

/// Immutable collection of weekly signal rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalDataset {
    rows: Vec<CustomerSignal>,
}

impl SignalDataset {
    pub fn new(rows: Vec<CustomerSignal>) -> Self {
        Self { rows }
    }

    /// Load a dataset from disk. Rows with unreadable dates fall back to `today`.
    pub fn from_path<P: AsRef<Path>>(path: P, today: NaiveDate) -> Result<Self, SignalLoadError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => SignalLoadError::MissingDataSource {
                path: path.to_path_buf(),
            },
            _ => SignalLoadError::Io(err),
        })?;
        Self::from_reader(file, today)
    }

    pub fn from_reader<R: Read>(reader: R, today: NaiveDate) -> Result<Self, SignalLoadError> {
        parse_signals(reader, today).map(Self::new)
    }

    pub fn rows(&self) -> &[CustomerSignal] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn latest_week(&self) -> Option<NaiveDate> {
        self.rows.iter().map(|row| row.week).max()
    }

    /// Rows for one week, in dataset order, optionally narrowed to a region.
    pub fn week_rows(&self, week: NaiveDate, region: Option<&str>) -> Vec<&CustomerSignal> {
        self.rows
            .iter()
            .filter(|row| row.week == week)
            .filter(|row| region.map_or(true, |region| row.region == region))
            .collect()
    }

    /// Rows for the most recent week present in the dataset.
    pub fn latest_week_rows(&self, region: Option<&str>) -> Vec<&CustomerSignal> {
        match self.latest_week() {
            Some(week) => self.week_rows(week, region),
            None => Vec::new(),
        }
    }

    pub fn regions(&self) -> BTreeSet<&str> {
        self.rows.iter().map(|row| row.region.as_str()).collect()
    }
}
