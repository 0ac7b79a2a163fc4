//! Persistence boundary shared by both forms. The store owns identifiers and timestamps.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Numeric identifier assigned by the store on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(pub u64);

impl SubmissionId {
    /// Parses a path segment; only positive integers are valid ids.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim()
            .parse::<u64>()
            .ok()
            .filter(|id| *id > 0)
            .map(SubmissionId)
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle flag kept by the store. Only active submissions take part in the duplicate guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionStatus {
    #[serde(rename = "ativo")]
    Active,
    #[serde(rename = "inativo")]
    Inactive,
}

impl SubmissionStatus {
    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ativo" => Some(Self::Active),
            "inativo" => Some(Self::Inactive),
            _ => None,
        }
    }
}

/// Request audit data captured alongside a submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Contact details every stored payload exposes, used by the duplicate guard and summaries.
pub trait Contact {
    fn name(&self) -> &str;
    fn whatsapp(&self) -> &str;
}

/// Record as returned by the store.
#[derive(Debug, Clone, Serialize)]
pub struct Stored<T> {
    pub id: SubmissionId,
    pub created_at: DateTime<Utc>,
    pub status: SubmissionStatus,
    #[serde(flatten)]
    pub payload: T,
    #[serde(flatten)]
    pub meta: SubmissionMeta,
}

impl<T> Stored<T> {
    /// Submission order: creation time, then id.
    pub fn submission_key(&self) -> (DateTime<Utc>, SubmissionId) {
        (self.created_at, self.id)
    }
}

/// Sorts records oldest first so ranking ties go to the earlier submission.
pub fn in_submission_order<T>(records: &mut [Stored<T>]) {
    records.sort_by_key(Stored::submission_key);
}

/// Storage abstraction so services can be exercised in isolation.
pub trait SubmissionRepository<T>: Send + Sync {
    /// Must fail with [`RepositoryError::Conflict`] when an active record already holds the
    /// payload's phone. The check and the write happen atomically.
    fn insert(&self, payload: T, meta: SubmissionMeta) -> Result<Stored<T>, RepositoryError>;
    fn find_active_by_phone(&self, phone: &str) -> Result<Option<SubmissionId>, RepositoryError>;
    /// Every stored record, in submission order.
    fn list(&self) -> Result<Vec<Stored<T>>, RepositoryError>;
    fn delete(&self, id: SubmissionId) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
