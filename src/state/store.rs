use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;

/// The persisted unit: one week of plan state, keyed by its Monday.
///
/// Each category is an opaque JSON blob so that a corrupt category can be
/// dropped without losing the others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanWeekRecord {
    pub week_start: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selections: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasons: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_meals: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned_meals: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_to_use_up: Option<String>,
}

impl PlanWeekRecord {
    /// An empty record for the week starting `week_start`.
    pub fn new(week_start: NaiveDate) -> Self {
        Self {
            week_start,
            selections: None,
            reasons: None,
            quick_meals: None,
            pinned_meals: None,
            food_to_use_up: None,
        }
    }
}

/// Durable storage for plan weeks.
pub trait PlanStore {
    /// The record for `week_start`, created empty if none exists yet.
    fn find_or_create(&mut self, week_start: NaiveDate) -> Result<PlanWeekRecord>;

    /// Replace the stored record for `record.week_start`.
    fn write(&mut self, record: PlanWeekRecord) -> Result<()>;
}

/// Store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: BTreeMap<NaiveDate, PlanWeekRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, week_start: NaiveDate) -> Option<&PlanWeekRecord> {
        self.records.get(&week_start)
    }

    /// Insert or replace a record directly.
    pub fn insert(&mut self, record: PlanWeekRecord) {
        self.records.insert(record.week_start, record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl PlanStore for MemoryStore {
    fn find_or_create(&mut self, week_start: NaiveDate) -> Result<PlanWeekRecord> {
        Ok(self
            .records
            .entry(week_start)
            .or_insert_with(|| PlanWeekRecord::new(week_start))
            .clone())
    }

    fn write(&mut self, record: PlanWeekRecord) -> Result<()> {
        self.insert(record);
        Ok(())
    }
}

/// Store backed by a single JSON file holding every week.
///
/// Records created by [`PlanStore::find_or_create`] only reach the file on
/// the next [`PlanStore::write`].
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    records: BTreeMap<NaiveDate, PlanWeekRecord>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut records = BTreeMap::new();

        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let stored: Vec<PlanWeekRecord> = serde_json::from_str(&content)?;
            // Last occurrence wins
            for record in stored {
                records.insert(record.week_start, record);
            }
            debug!(path = %path.display(), weeks = records.len(), "opened plan store");
        } else {
            debug!(path = %path.display(), "plan store not found, starting empty");
        }

        Ok(Self { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn flush(&self) -> Result<()> {
        let records: Vec<&PlanWeekRecord> = self.records.values().collect();
        let json = serde_json::to_string_pretty(&records)?;
        fs::write(&self.path, json)?;
        info!(path = %self.path.display(), weeks = records.len(), "wrote plan store");
        Ok(())
    }
}

impl PlanStore for JsonFileStore {
    fn find_or_create(&mut self, week_start: NaiveDate) -> Result<PlanWeekRecord> {
        Ok(self
            .records
            .entry(week_start)
            .or_insert_with(|| PlanWeekRecord::new(week_start))
            .clone())
    }

    fn write(&mut self, record: PlanWeekRecord) -> Result<()> {
        self.records.insert(record.week_start, record);
        self.flush()
    }
}
