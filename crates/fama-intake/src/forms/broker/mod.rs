//! Broker recruitment questionnaire: validation schema, behavioural scoring, candidate ranking,
//! CSV export import, and the admin/intake HTTP surface.

mod import;
mod ranking;
mod router;
mod schema;
pub mod scoring;
mod service;

#[cfg(test)]
mod tests;

use crate::forms::rules::ValidatedRecord;
use crate::forms::store::Stored;

pub use import::{CandidateCsvImporter, CandidateImportError};
pub use ranking::{
    CandidateRanker, ClassificationHistogram, RankedCandidate, Ranking, RankingStatistics,
    TopCandidate, DEFAULT_TOP_N,
};
pub use router::broker_router;
pub use schema::{questionnaire_schema, EDUCATION_LEVELS, RELATIONSHIP_OPTIONS};
pub use scoring::{AnswerPointsTable, Classification, ScoreResult, ScoringEngine};
pub use service::{BrokerApplicationService, BrokerServiceError};

/// Stored questionnaire answers as the store hands them back.
pub type CandidateRecord = Stored<ValidatedRecord>;
