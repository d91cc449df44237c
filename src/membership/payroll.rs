use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::info;

use crate::database::models::Payroll;
use crate::database::queries::Queries;
use crate::error::UnionError;

#[derive(Debug, Clone, Deserialize)]
pub struct NewPayroll {
    pub member_id: i64,
    pub pay_date: NaiveDate,
    /// Monthly gross amount.
    pub amount: f64,
    /// Opaque reference to the uploaded PDF, if any.
    pub document_path: Option<String>,
}

pub struct PayrollLedger {
    pool: SqlitePool,
}

impl PayrollLedger {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn record(&self, new: &NewPayroll) -> Result<Payroll, UnionError> {
        if !new.amount.is_finite() || new.amount < 0.0 {
            return Err(UnionError::ValidationError(format!(
                "Payroll amount must be a non-negative number, got {}",
                new.amount
            )));
        }
        Queries::get_member(&self.pool, new.member_id).await?;

        let payroll_id = sqlx::query(
            r#"
            INSERT INTO payrolls (member_id, pay_date, amount, document_path, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.member_id)
        .bind(new.pay_date)
        .bind(new.amount)
        .bind(new.document_path.as_deref())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        info!(
            "Payroll {} recorded for member {} ({})",
            payroll_id, new.member_id, new.pay_date
        );

        let payroll = sqlx::query_as::<_, Payroll>(
            "SELECT id, member_id, pay_date, amount, document_path, created_at FROM payrolls WHERE id = ?",
        )
        .bind(payroll_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(payroll)
    }

    /// Latest first, using the same ordering the fee quote relies on.
    pub async fn list_for_member(&self, member_id: i64) -> Result<Vec<Payroll>, UnionError> {
        Queries::get_member(&self.pool, member_id).await?;

        let payrolls = sqlx::query_as::<_, Payroll>(
            r#"
            SELECT id, member_id, pay_date, amount, document_path, created_at
            FROM payrolls
            WHERE member_id = ?
            ORDER BY pay_date DESC, id DESC
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payrolls)
    }
}
