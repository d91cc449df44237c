//! Surveys, member answers and survey participation

pub mod service;
pub mod types;

pub use service::SurveyService;
pub use types::*;
