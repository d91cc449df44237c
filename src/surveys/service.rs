use chrono::Utc;
use sqlx::SqlitePool;
use std::collections::HashSet;
use tracing::{debug, info};

use super::types::*;
use crate::activity::ActivityEngine;
use crate::database::models::{Survey, SurveyQuestion};
use crate::database::queries::Queries;
use crate::error::UnionError;

pub struct SurveyService {
    pool: SqlitePool,
}

impl SurveyService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: &NewSurvey) -> Result<SurveyDetail, UnionError> {
        if new.title.trim().is_empty() {
            return Err(UnionError::required_field("title"));
        }
        let prompts: Vec<&str> = new
            .questions
            .iter()
            .map(|q| q.trim())
            .filter(|q| !q.is_empty())
            .collect();
        if prompts.is_empty() {
            return Err(UnionError::ValidationError(
                "A survey needs at least one question".to_string(),
            ));
        }

        Queries::get_officer(&self.pool, new.officer_id).await?;

        let mut tx = self.pool.begin().await?;

        let survey_id = sqlx::query(
            "INSERT INTO surveys (title, description, created_by, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(new.title.trim())
        .bind(new.description.trim())
        .bind(new.officer_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        for (position, prompt) in prompts.iter().enumerate() {
            sqlx::query("INSERT INTO survey_questions (survey_id, position, prompt) VALUES (?, ?, ?)")
                .bind(survey_id)
                .bind(position as i64 + 1)
                .bind(*prompt)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        info!(
            "Survey {} created by officer {} with {} questions",
            survey_id,
            new.officer_id,
            prompts.len()
        );
        self.get(survey_id).await
    }

    pub async fn list(&self) -> Result<Vec<Survey>, UnionError> {
        let surveys = sqlx::query_as::<_, Survey>(
            "SELECT id, title, description, created_by, created_at FROM surveys ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(surveys)
    }

    pub async fn get(&self, survey_id: i64) -> Result<SurveyDetail, UnionError> {
        let survey = sqlx::query_as::<_, Survey>(
            "SELECT id, title, description, created_by, created_at FROM surveys WHERE id = ?",
        )
        .bind(survey_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| UnionError::NotFound(format!("Survey {} not found", survey_id)))?;

        let questions = sqlx::query_as::<_, SurveyQuestion>(
            "SELECT id, survey_id, position, prompt FROM survey_questions WHERE survey_id = ? ORDER BY position",
        )
        .bind(survey_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(SurveyDetail { survey, questions })
    }

    /// Save a member's answers. Re-submitting replaces earlier answers; only
    /// the first submission records participation and rescores the member.
    pub async fn submit_answers(
        &self,
        survey_id: i64,
        submission: &AnswerSubmission,
    ) -> Result<SubmissionReceipt, UnionError> {
        let member_id = submission.member_id;
        if submission.answers.is_empty() {
            return Err(UnionError::required_field("answers"));
        }

        let detail = self.get(survey_id).await?;
        Queries::get_member(&self.pool, member_id).await?;

        let question_ids: HashSet<i64> = detail.questions.iter().map(|q| q.id).collect();
        if let Some(stray) = submission
            .answers
            .iter()
            .find(|a| !question_ids.contains(&a.question_id))
        {
            return Err(UnionError::ValidationError(format!(
                "Question {} does not belong to survey {}",
                stray.question_id, survey_id
            )));
        }

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        for answer in &submission.answers {
            sqlx::query(
                r#"
                INSERT INTO survey_answers (survey_id, question_id, member_id, answer, answered_at)
                VALUES (?, ?, ?, ?, ?)
                ON CONFLICT (question_id, member_id) DO UPDATE SET
                    answer = excluded.answer,
                    answered_at = excluded.answered_at
                "#,
            )
            .bind(survey_id)
            .bind(answer.question_id)
            .bind(member_id)
            .bind(answer.answer.trim())
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        let first_submission = sqlx::query(
            r#"
            INSERT INTO survey_participations (survey_id, member_id, participated_at)
            VALUES (?, ?, ?)
            ON CONFLICT (member_id, survey_id) DO NOTHING
            "#,
        )
        .bind(survey_id)
        .bind(member_id)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .rows_affected()
            == 1;

        let score = if first_submission {
            ActivityEngine::recompute_in(&mut tx, member_id).await?
        } else {
            debug!(
                "Member {} re-submitted survey {}, participation unchanged",
                member_id, survey_id
            );
            Queries::stored_score(&mut *tx, member_id)
                .await?
                .map(|s| s.score)
                .unwrap_or(0)
        };

        tx.commit().await?;

        info!(
            "Member {} submitted {} answers to survey {} (first: {})",
            member_id,
            submission.answers.len(),
            survey_id,
            first_submission
        );
        Ok(SubmissionReceipt {
            survey_id,
            member_id,
            first_submission,
            score,
        })
    }
}
