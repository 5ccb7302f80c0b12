//! Run history written to `model_history_log.csv`.
//!
//! One row per epoch:
//!
//! ```text
//! epoch,loss,val_loss
//! 1,0.693100,0.702400
//! 2,0.512000,0.530100
//! ```
//!
//! Metric columns are sorted by name and fixed by the first row written.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SettingsError};

const EPOCH_COLUMN: &str = "epoch";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub epoch: u32,
    pub metrics: BTreeMap<String, f64>,
}

impl HistoryRecord {
    pub fn new(epoch: u32) -> Self {
        Self {
            epoch,
            metrics: BTreeMap::new(),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(name.into(), value);
        self
    }

    fn columns(&self) -> Vec<String> {
        self.metrics.keys().cloned().collect()
    }
}

pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    /// Prepares the parent directory. The file itself is created on the first
    /// append.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let log = Self::at(path);
        if let Some(parent) = log.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(log)
    }

    /// A log at `path` without touching the file system. Enough for `read`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &HistoryRecord) -> Result<()> {
        let columns = record.columns();
        if let Some(name) = columns
            .iter()
            .find(|c| c.is_empty() || c.trim() != c.as_str() || c.contains([',', '\n', '\r']))
        {
            return Err(SettingsError::InvalidColumn(name.clone()));
        }

        let existing = self.header()?;
        if let Some(header) = &existing {
            if *header != columns {
                return Err(SettingsError::ColumnMismatch {
                    expected: header.clone(),
                    found: columns,
                });
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        if existing.is_none() {
            let mut header = vec![EPOCH_COLUMN.to_string()];
            header.extend(columns);
            writeln!(file, "{}", header.join(","))?;
            log::debug!("Created history log {:?}", self.path);
        }

        let mut row = vec![record.epoch.to_string()];
        row.extend(record.metrics.values().map(|v| format!("{:.6}", v)));
        writeln!(file, "{}", row.join(","))?;

        log::debug!("Logged epoch {} to {:?}", record.epoch, self.path);
        Ok(())
    }

    pub fn read(&self) -> Result<Vec<HistoryRecord>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut lines = content.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());
        let Some((_, header)) = lines.next() else {
            return Ok(Vec::new());
        };
        let columns = parse_header(header)?;

        let mut records = Vec::new();
        for (idx, line) in lines {
            let line_no = idx + 1;
            let malformed = |reason: String| SettingsError::MalformedHistory {
                line: line_no,
                reason,
            };

            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() != columns.len() + 1 {
                return Err(malformed(format!(
                    "expected {} fields, found {}",
                    columns.len() + 1,
                    fields.len()
                )));
            }

            let epoch = fields[0]
                .parse::<u32>()
                .map_err(|e| malformed(format!("bad epoch {:?}: {}", fields[0], e)))?;
            let mut record = HistoryRecord::new(epoch);
            for (name, raw) in columns.iter().zip(&fields[1..]) {
                let value = raw
                    .parse::<f64>()
                    .map_err(|e| malformed(format!("bad value {:?} for {}: {}", raw, name, e)))?;
                record.metrics.insert(name.clone(), value);
            }
            records.push(record);
        }
        Ok(records)
    }

    /// Metric columns of an existing, non-empty log.
    fn header(&self) -> Result<Option<Vec<String>>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match content.lines().find(|l| !l.trim().is_empty()) {
            Some(header) => parse_header(header).map(Some),
            None => Ok(None),
        }
    }
}

fn parse_header(line: &str) -> Result<Vec<String>> {
    let mut fields = line.split(',').map(|f| f.trim().to_string());
    match fields.next() {
        Some(first) if first == EPOCH_COLUMN => Ok(fields.collect()),
        _ => Err(SettingsError::MalformedHistory {
            line: 1,
            reason: format!("header must start with '{}'", EPOCH_COLUMN),
        }),
    }
}
