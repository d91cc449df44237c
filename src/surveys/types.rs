use serde::{Deserialize, Serialize};

use crate::database::models::{Survey, SurveyQuestion};

#[derive(Debug, Clone, Deserialize)]
pub struct NewSurvey {
    pub officer_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SurveyDetail {
    #[serde(flatten)]
    pub survey: Survey,
    pub questions: Vec<SurveyQuestion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerInput {
    pub question_id: i64,
    pub answer: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerSubmission {
    pub member_id: i64,
    pub answers: Vec<AnswerInput>,
}

/// Outcome of an answer submission. `first_submission` is false when the
/// member had already answered this survey and only their answers changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub survey_id: i64,
    pub member_id: i64,
    pub first_submission: bool,
    pub score: i64,
}
