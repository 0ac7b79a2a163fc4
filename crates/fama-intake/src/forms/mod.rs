//! Lead-capture forms: the shared rule engine plus the questionnaire and event pipelines.

pub mod broker;
pub mod event;
pub(crate) mod http;
pub mod rules;
pub mod store;
