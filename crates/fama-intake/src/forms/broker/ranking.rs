use serde::Serialize;

use crate::forms::store::Contact;

use super::scoring::{Classification, ScoreResult, ScoringEngine};
use super::CandidateRecord;

pub const DEFAULT_TOP_N: usize = 3;

/// Stored candidate with its score and 1-based position.
#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate {
    pub rank_position: usize,
    #[serde(flatten)]
    pub candidate: CandidateRecord,
    pub score: ScoreResult,
    /// Portuguese name of `score.classification` for the recruitment team.
    pub classification_label: &'static str,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationHistogram {
    pub excellent: usize,
    pub good: usize,
    pub regular: usize,
    pub insufficient: usize,
}

impl ClassificationHistogram {
    fn record(&mut self, classification: Classification) {
        match classification {
            Classification::Excellent => self.excellent += 1,
            Classification::Good => self.good += 1,
            Classification::Regular => self.regular += 1,
            Classification::Insufficient => self.insufficient += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopCandidate {
    pub rank: usize,
    pub name: String,
    pub score: u32,
    pub percentage: f64,
    pub classification_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingStatistics {
    pub total_candidates: usize,
    pub average_score: f64,
    pub max_possible_score: u32,
    pub classification_distribution: ClassificationHistogram,
    pub top: Vec<TopCandidate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Ranking {
    pub candidates: Vec<RankedCandidate>,
    pub stats: RankingStatistics,
}

/// Scores a candidate collection and orders it by total score.
#[derive(Debug, Clone, Copy)]
pub struct CandidateRanker {
    engine: ScoringEngine,
    top_n: usize,
}

impl Default for CandidateRanker {
    fn default() -> Self {
        Self::new(ScoringEngine::default(), DEFAULT_TOP_N)
    }
}

impl CandidateRanker {
    pub fn new(engine: ScoringEngine, top_n: usize) -> Self {
        Self { engine, top_n }
    }

    /// Sorting is stable: equal totals keep their input order.
    pub fn rank(&self, records: Vec<CandidateRecord>) -> Ranking {
        let mut scored: Vec<(CandidateRecord, ScoreResult)> = records
            .into_iter()
            .map(|record| {
                let score = self.engine.score(&record.payload);
                (record, score)
            })
            .collect();
        scored.sort_by(|(_, left), (_, right)| right.total_score.cmp(&left.total_score));

        let candidates: Vec<RankedCandidate> = scored
            .into_iter()
            .enumerate()
            .map(|(index, (candidate, score))| RankedCandidate {
                rank_position: index + 1,
                classification_label: score.classification.label(),
                candidate,
                score,
            })
            .collect();

        let stats = self.statistics(&candidates);
        Ranking { candidates, stats }
    }

    fn statistics(&self, candidates: &[RankedCandidate]) -> RankingStatistics {
        let mut distribution = ClassificationHistogram::default();
        for candidate in candidates {
            distribution.record(candidate.score.classification);
        }

        let total: u64 = candidates
            .iter()
            .map(|candidate| u64::from(candidate.score.total_score))
            .sum();

        let top = candidates
            .iter()
            .take(self.top_n)
            .map(|candidate| TopCandidate {
                rank: candidate.rank_position,
                name: candidate.candidate.payload.name().to_string(),
                score: candidate.score.total_score,
                percentage: candidate.score.percentage,
                classification_label: candidate.classification_label,
            })
            .collect();

        RankingStatistics {
            total_candidates: candidates.len(),
            average_score: mean_one_decimal(total, candidates.len()),
            max_possible_score: self.engine.max_possible_score(),
            classification_distribution: distribution,
            top,
        }
    }
}

/// Arithmetic mean rounded half-up to one decimal; zero for an empty set.
fn mean_one_decimal(total: u64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let count = count as u64;
    let tenths = (total * 20 + count) / (2 * count);
    tenths as f64 / 10.0
}
