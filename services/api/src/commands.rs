use chrono::{Local, NaiveDate};
use clap::{Args, ValueEnum};
use fama_intake::config::AppConfig;
use fama_intake::error::AppError;
use fama_intake::forms::broker::{
    questionnaire_schema, CandidateCsvImporter, CandidateRanker, Ranking, ScoringEngine,
};
use fama_intake::forms::event::registration_schema;
use fama_intake::forms::rules::{FormSchema, SubmissionRaw};
use serde_json::{json, Value};
use std::io::Read;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// CSV export of stored questionnaire submissions
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Size of the top-N summary (defaults to RANKING_TOP_N)
    #[arg(long)]
    pub(crate) top: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum FormKind {
    Broker,
    Event,
}

impl FormKind {
    fn schema(self) -> &'static FormSchema {
        match self {
            FormKind::Broker => questionnaire_schema(),
            FormKind::Event => registration_schema(),
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// Which form the submission belongs to
    #[arg(long, value_enum)]
    pub(crate) form: FormKind,
    /// JSON object with the submitted fields
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Reference date for age checks (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let top_n = match args.top {
        Some(top) => top,
        None => AppConfig::load()?.ranking.top_n,
    };
    let file = std::fs::File::open(&args.input)?;
    let ranking = rank_export(file, top_n)?;
    println!("{}", serde_json::to_string_pretty(&ranking)?);
    Ok(())
}

pub(crate) fn rank_export<R: Read>(reader: R, top_n: usize) -> Result<Ranking, AppError> {
    let candidates = CandidateCsvImporter::from_reader(reader)?;
    Ok(CandidateRanker::new(ScoringEngine::default(), top_n).rank(candidates))
}

pub(crate) fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let file = std::fs::File::open(&args.input)?;
    let raw: SubmissionRaw = serde_json::from_reader(file)?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let report = validation_report(args.form, &raw, today);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub(crate) fn validation_report(form: FormKind, raw: &SubmissionRaw, today: NaiveDate) -> Value {
    match form.schema().validate(raw, today) {
        Ok(record) => json!({ "valid": true, "record": record }),
        Err(errors) => json!({ "valid": false, "errors": errors }),
    }
}
