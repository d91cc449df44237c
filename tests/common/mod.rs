#![allow(dead_code)]

use chrono::NaiveDate;
use tempfile::TempDir;
use union_app::config::AppConfig;
use union_app::database::models::Role;
use union_app::database::Database;
use union_app::membership::{MemberDirectory, NewMember, NewPayroll, PayrollLedger};
use union_app::strike::{NewStrikeDecision, StrikeRegistry};
use union_app::surveys::{NewSurvey, SurveyDetail, SurveyService};

/// Setup an in-memory SQLite database for testing
pub async fn setup_test_db() -> Database {
    Database::new_in_memory()
        .await
        .expect("Failed to create test database")
}

/// File-backed WAL database with a multi-connection pool, for tests that
/// race writers against each other. Keep the `TempDir` alive for the test.
pub async fn setup_file_db() -> (Database, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = AppConfig {
        database_url: format!("sqlite://{}", dir.path().join("union-test.db").display()),
        max_connections: 16,
        ..AppConfig::default()
    };

    let database = Database::new(&config)
        .await
        .expect("Failed to open file database");
    database
        .run_migrations()
        .await
        .expect("Failed to run migrations");
    (database, dir)
}

pub async fn register(db: &Database, name: &str, role: Role) -> i64 {
    MemberDirectory::new(db.pool().clone())
        .register(&NewMember {
            full_name: name.to_string(),
            email: format!("{}@union.test", name.to_lowercase().replace(' ', ".")),
            role,
        })
        .await
        .expect("Failed to register member")
        .id
}

pub async fn create_worker(db: &Database, name: &str) -> i64 {
    register(db, name, Role::Worker).await
}

pub async fn create_officer(db: &Database, name: &str) -> i64 {
    register(db, name, Role::Representative).await
}

/// Registers `count` workers named worker0..workerN and returns their IDs.
pub async fn create_workers(db: &Database, count: usize) -> Vec<i64> {
    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        ids.push(create_worker(db, &format!("worker{}", i)).await);
    }
    ids
}

pub async fn record_payroll(db: &Database, member_id: i64, pay_date: NaiveDate, amount: f64) {
    PayrollLedger::new(db.pool().clone())
        .record(&NewPayroll {
            member_id,
            pay_date,
            amount,
            document_path: None,
        })
        .await
        .expect("Failed to record payroll");
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn strike_proposal(title: &str) -> NewStrikeDecision {
    NewStrikeDecision {
        title: title.to_string(),
        reason: "Wage negotiations stalled".to_string(),
        decision_date: Some(date(2026, 3, 1)),
        start_date: date(2026, 3, 15),
        end_date: date(2026, 3, 20),
    }
}

pub async fn open_strike(db: &Database, officer_id: i64, title: &str) -> i64 {
    StrikeRegistry::new(db.pool().clone())
        .create(officer_id, &strike_proposal(title))
        .await
        .expect("Failed to open strike decision")
        .decision
        .id
}

pub async fn create_survey(db: &Database, officer_id: i64, questions: &[&str]) -> SurveyDetail {
    SurveyService::new(db.pool().clone())
        .create(&NewSurvey {
            officer_id,
            title: "Workplace conditions".to_string(),
            description: "Quarterly check-in".to_string(),
            questions: questions.iter().map(|q| q.to_string()).collect(),
        })
        .await
        .expect("Failed to create survey")
}
