mod classification;
mod table;

pub use classification::Classification;
pub use table::{AnswerPointsTable, QuestionPoints};

use std::collections::BTreeMap;

use serde::Serialize;

use crate::forms::rules::ValidatedRecord;

/// Points earned on a single question, kept for transparent audits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionDetail {
    pub answer: Option<String>,
    pub points: u32,
    pub max_points: u32,
}

/// Weighted score of one candidate's behavioural profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub total_score: u32,
    pub max_score: u32,
    pub percentage: f64,
    pub classification: Classification,
    pub details: BTreeMap<String, QuestionDetail>,
}

/// Stateless scorer over a read-only points table.
#[derive(Debug, Clone, Copy)]
pub struct ScoringEngine {
    table: &'static AnswerPointsTable,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(AnswerPointsTable::standard())
    }
}

impl ScoringEngine {
    pub fn new(table: &'static AnswerPointsTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'static AnswerPointsTable {
        self.table
    }

    pub fn max_possible_score(&self) -> u32 {
        self.table.max_possible_score()
    }

    pub fn score(&self, answers: &ValidatedRecord) -> ScoreResult {
        let mut details = BTreeMap::new();
        let mut total_score = 0;

        for question in self.table.questions() {
            let answer = answers.text(question.key());
            let points = answer.map(|text| question.points_for(text)).unwrap_or(0);
            total_score += points;
            details.insert(
                question.key().to_string(),
                QuestionDetail {
                    answer: answer.map(str::to_string),
                    points,
                    max_points: question.max_points(),
                },
            );
        }

        let max_score = self.table.max_possible_score();
        let tenths = percentage_tenths(total_score, max_score);

        ScoreResult {
            total_score,
            max_score,
            percentage: f64::from(tenths) / 10.0,
            classification: Classification::from_tenths(tenths),
            details,
        }
    }
}

/// `total / max * 100` rounded half-up to one decimal, in integer tenths. Zero when `max` is zero.
fn percentage_tenths(total: u32, max: u32) -> u32 {
    if max == 0 {
        return 0;
    }
    let total = u64::from(total);
    let max = u64::from(max);
    ((total * 2000 + max) / (2 * max)) as u32
}
