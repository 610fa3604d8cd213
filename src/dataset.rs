//! Labeled dataset loading.
//!
//! The corpus is a headerless CSV with one row per page:
//! `<id>, <html_path>, <label>, <url>`. Paths are relative to the CSV's own
//! directory. A zero label means "not an article", any other integer means
//! "article"; extra columns are ignored.

use std::fs;
use std::path::{Path, PathBuf};

use url::Url;

use crate::error::{DetectError, Result};

/// One row of the corpus CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRecord {
    pub id: u32,
    pub html_path: PathBuf,
    pub label: bool,
    pub url: String,
}

/// The loaded corpus: records in file order plus the directory page paths
/// resolve against.
#[derive(Debug, Clone)]
pub struct Dataset {
    root: PathBuf,
    records: Vec<DatasetRecord>,
}

impl Dataset {
    /// Reads every row of a corpus CSV. Blank lines are skipped; anything
    /// else that does not parse is an error naming the row.
    pub fn from_csv_file<P: AsRef<Path>>(path: P) -> Result<Dataset> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| DetectError::Io(path.display().to_string(), e))?;
        let root = path.parent().unwrap_or(Path::new("")).to_path_buf();
        let mut records = Vec::new();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            records.push(parse_row(line, index + 1)?);
        }
        Ok(Dataset { root, records })
    }

    pub fn records(&self) -> &[DatasetRecord] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&DatasetRecord> {
        self.records.get(index)
    }

    /// All labels in row order.
    pub fn labels(&self) -> Vec<bool> {
        self.records.iter().map(|r| r.label).collect()
    }

    /// Where a record's page lives on disk.
    pub fn page_path(&self, record: &DatasetRecord) -> PathBuf {
        self.root.join(&record.html_path)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn parse_row(line: &str, row: usize) -> Result<DatasetRecord> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() < 4 {
        return Err(DetectError::Dataset(format!(
            "row {row} has {} columns, expected at least 4",
            fields.len()
        )));
    }
    let id = fields[0].trim().parse::<u32>().map_err(|_| {
        DetectError::Dataset(format!("row {row} id {:?} is not an integer", fields[0]))
    })?;
    let html_path = PathBuf::from(fields[1].trim());
    if html_path.as_os_str().is_empty() {
        return Err(DetectError::Dataset(format!("row {row} has an empty path")));
    }
    let label = fields[2].trim().parse::<i64>().map_err(|_| {
        DetectError::Dataset(format!("row {row} label {:?} is not an integer", fields[2]))
    })? != 0;
    let url = fields[3].trim().to_string();
    // corpus URLs are stored without a scheme; only complain when the row
    // is unusable even with one assumed
    if Url::parse(&url).is_err() && Url::parse(&format!("http://{url}")).is_err() {
        log::warn!("dataset row {}: unparseable url {:?}", row, url);
    }
    Ok(DatasetRecord {
        id,
        html_path,
        label,
        url,
    })
}
