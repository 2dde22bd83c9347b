use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use super::domain::{EmployeeId, NewWorkPlan, PlanType};
use super::scoring::KpiMeasurement;

/// Failures while reading a KPI sheet.
#[derive(Debug, thiserror::Error)]
pub enum KpiImportError {
    #[error("failed to read KPI sheet: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid KPI sheet data: {0}")]
    Csv(#[from] csv::Error),
    #[error("KPI '{title}' has a zero or non-finite target")]
    InvalidTarget { title: String },
}

/// One KPI line of a spreadsheet export.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KpiSheetEntry {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Type")]
    pub plan_type: PlanType,
    #[serde(rename = "Target")]
    pub target_value: f64,
    #[serde(rename = "Achieved", default, deserialize_with = "empty_as_zero")]
    pub achieved_value: f64,
    #[serde(rename = "Metric", default)]
    pub metric: String,
}

impl KpiSheetEntry {
    pub fn to_new_plan(
        &self,
        employee_id: EmployeeId,
        start_date: NaiveDate,
        due_date: NaiveDate,
    ) -> NewWorkPlan {
        NewWorkPlan {
            employee_id: Some(employee_id),
            title: self.title.clone(),
            plan_type: self.plan_type,
            target_value: self.target_value,
            metric: self.metric.clone(),
            start_date,
            due_date,
        }
    }
}

impl KpiMeasurement for KpiSheetEntry {
    fn target_value(&self) -> f64 {
        self.target_value
    }

    fn achieved_value(&self) -> f64 {
        self.achieved_value
    }
}

pub struct KpiSheetImporter;

impl KpiSheetImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<KpiSheetEntry>, KpiImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<KpiSheetEntry>, KpiImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut entries = Vec::new();
        for row in csv_reader.deserialize::<KpiSheetEntry>() {
            let entry = row?;
            if entry.target_value == 0.0 || !entry.target_value.is_finite() {
                return Err(KpiImportError::InvalidTarget { title: entry.title });
            }
            entries.push(entry);
        }

        Ok(entries)
    }
}

fn empty_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(0.0),
        Some(value) => value.parse::<f64>().map_err(serde::de::Error::custom),
    }
}
