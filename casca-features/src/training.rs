//! Persisted training table: one row per entity, indicator columns plus a label.
//!
//! On disk:
//!   Entity,<indicator columns...>,Loan Approved
//!   Business1,1520.5,...,1
//!
//! Undefined indicator values are written as empty cells.

use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::aggregator::FinancialFeatures;
use crate::error::{FeatureError, Result};
use crate::vector::{FeatureVector, INDICATORS};

pub const ENTITY_COLUMN: &str = "Entity";
pub const LABEL_COLUMN: &str = "Loan Approved";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingRow {
    pub entity: String,
    /// Aligned with [`TrainingTable::columns`]
    pub values: Vec<Option<f64>>,
    /// `true` = approved
    pub label: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingTable {
    columns: Vec<String>,
    rows: Vec<TrainingRow>,
}

impl Default for TrainingTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainingTable {
    /// Empty table over the twelve standard indicators.
    pub fn new() -> Self {
        Self::with_columns(INDICATORS.iter().map(|s| s.to_string()).collect())
    }

    pub fn with_columns(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[TrainingRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, entity: &str) -> Option<&TrainingRow> {
        self.rows.iter().find(|r| r.entity == entity)
    }

    /// Add an entity; values are looked up by column name, absent ones are undefined.
    pub fn insert_vector(&mut self, entity: impl Into<String>, vector: &FeatureVector) -> Result<()> {
        let entity = entity.into();
        if self.get(&entity).is_some() {
            return Err(FeatureError::DuplicateEntity(entity));
        }
        let values = self.columns.iter().map(|c| vector.value(c)).collect();
        self.rows.push(TrainingRow {
            entity,
            values,
            label: None,
        });
        Ok(())
    }

    pub fn insert(&mut self, entity: impl Into<String>, features: &FinancialFeatures) -> Result<()> {
        self.insert_vector(entity, &features.to_vector())
    }

    /// Set labels from an external mapping. Every entity must have one.
    pub fn attach_labels(&mut self, labels: &HashMap<String, bool>) -> Result<()> {
        for row in &mut self.rows {
            let label = labels
                .get(&row.entity)
                .ok_or_else(|| FeatureError::MissingLabel(row.entity.clone()))?;
            row.label = Some(*label);
        }
        Ok(())
    }

    /// Row values as a named vector.
    pub fn row_vector(&self, row: &TrainingRow) -> FeatureVector {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(row.values.iter().copied())
            .collect()
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);

        let mut header = vec![ENTITY_COLUMN.to_string()];
        header.extend(self.columns.iter().cloned());
        header.push(LABEL_COLUMN.to_string());
        wtr.write_record(&header)?;

        for row in &self.rows {
            let mut record = vec![row.entity.clone()];
            record.extend(row.values.iter().map(|v| v.map(|x| x.to_string()).unwrap_or_default()));
            record.push(match row.label {
                Some(true) => "1".to_string(),
                Some(false) => "0".to_string(),
                None => String::new(),
            });
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn write_csv_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path.as_ref())?;
        self.write_csv(file)?;
        info!(path = %path.as_ref().display(), rows = self.rows.len(), "wrote training table");
        Ok(())
    }

    /// Read a training table. The first column is the entity id; a
    /// `Loan Approved` column, when present, holds the labels. Unreadable
    /// or non-finite numeric cells are undefined.
    pub fn read_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path.as_ref())?;

        let headers = rdr.headers()?.clone();
        if headers.is_empty() {
            return Err(FeatureError::MissingColumn(ENTITY_COLUMN));
        }
        let label_idx = headers.iter().position(|h| h.trim() == LABEL_COLUMN);
        let feature_idx: Vec<usize> = (1..headers.len()).filter(|i| Some(*i) != label_idx).collect();

        let mut table = Self::with_columns(
            feature_idx.iter().map(|i| headers[*i].trim().to_string()).collect(),
        );

        for record in rdr.records() {
            let record = record?;
            let entity = record.get(0).unwrap_or("").trim().to_string();
            let values = feature_idx
                .iter()
                .map(|i| {
                    record
                        .get(*i)
                        .and_then(|s| s.trim().parse::<f64>().ok())
                        .filter(|v| v.is_finite())
                })
                .collect();
            let label = match label_idx.and_then(|i| record.get(i)).map(str::trim) {
                None | Some("") => None,
                Some(raw) => Some(parse_label(&entity, raw)?),
            };
            table.rows.push(TrainingRow {
                entity,
                values,
                label,
            });
        }
        Ok(table)
    }
}

fn parse_label(entity: &str, raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" | "approved" => Ok(true),
        "0" | "0.0" | "false" | "denied" => Ok(false),
        _ => Err(FeatureError::BadLabel {
            entity: entity.to_string(),
            value: raw.to_string(),
        }),
    }
}
