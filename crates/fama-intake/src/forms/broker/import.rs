//! Reads a CSV export of stored questionnaire submissions so rankings can be rebuilt offline.
//!
//! Headers may use the form field names (`prefereTrabalho`) or the storage column names
//! (`prefere_trabalho`). Rows are trusted as stored and are not re-validated.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::forms::rules::{parse_birth_date, FieldValue, ValidatedRecord};
use crate::forms::store::{in_submission_order, SubmissionId, SubmissionMeta, SubmissionStatus};

use super::schema::questionnaire_schema;
use super::CandidateRecord;

const BIRTH_DATE_FIELD: &str = "nascimento";

#[derive(Debug, thiserror::Error)]
pub enum CandidateImportError {
    #[error("failed to read candidate export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid candidate CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },
}

pub struct CandidateCsvImporter;

impl CandidateCsvImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<CandidateRecord>, CandidateImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Records come back in submission order.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<CandidateRecord>, CandidateImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for (index, row) in csv_reader.deserialize::<HashMap<String, String>>().enumerate() {
            let row = row?;
            let normalized: HashMap<String, String> = row
                .into_iter()
                .map(|(column, value)| (field_name_for_column(&column), value))
                .collect();
            records.push(candidate_from_row(index + 1, normalized)?);
        }

        in_submission_order(&mut records);
        Ok(records)
    }
}

fn candidate_from_row(
    row: usize,
    mut columns: HashMap<String, String>,
) -> Result<CandidateRecord, CandidateImportError> {
    let invalid = |reason: String| CandidateImportError::InvalidRow { row, reason };

    let id = columns
        .get("id")
        .and_then(|raw| SubmissionId::parse(raw))
        .ok_or_else(|| invalid("missing or invalid id".to_string()))?;
    let created_at = columns
        .get("createdAt")
        .and_then(|raw| parse_timestamp(raw))
        .ok_or_else(|| invalid("missing or invalid created_at".to_string()))?;
    let status = match columns.get("status").map(String::as_str) {
        None | Some("") => SubmissionStatus::Active,
        Some(raw) => SubmissionStatus::from_label(raw)
            .ok_or_else(|| invalid(format!("unknown status '{raw}'")))?,
    };

    let meta = SubmissionMeta {
        ip_address: columns.remove("ipAddress").filter(|value| !value.is_empty()),
        user_agent: columns.remove("userAgent").filter(|value| !value.is_empty()),
    };

    let mut answers = ValidatedRecord::default();
    for rule in questionnaire_schema().rules() {
        let value = match columns.remove(rule.name()) {
            Some(raw) if raw.is_empty() => FieldValue::Absent,
            Some(raw) if rule.name() == BIRTH_DATE_FIELD => match parse_birth_date(&raw) {
                Some(date) => FieldValue::Date(date),
                None => FieldValue::Text(raw),
            },
            Some(raw) => FieldValue::Text(raw),
            None => FieldValue::Absent,
        };
        answers.insert(rule.name(), value);
    }

    Ok(CandidateRecord {
        id,
        created_at,
        status,
        payload: answers,
        meta,
    })
}

/// `prefere_trabalho` → `prefereTrabalho`; camelCase headers pass through.
fn field_name_for_column(column: &str) -> String {
    let mut name = String::with_capacity(column.len());
    let mut upper_next = false;
    for ch in column.trim().chars() {
        if ch == '_' {
            upper_next = !name.is_empty();
            continue;
        }
        if upper_next {
            name.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            name.push(ch);
        }
    }
    name
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(timestamp.with_timezone(&Utc));
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(timestamp.and_utc());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|timestamp| timestamp.and_utc())
}
