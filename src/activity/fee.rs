//! Union fee quote

use serde::{Deserialize, Serialize};

use super::score::MAX_SCORE;

/// Share of the monthly gross owed by a member with no activity.
pub const NOMINAL_FEE_RATE: f64 = 0.005;
pub const DAYS_PER_MONTH: f64 = 30.0;
pub const HOURS_PER_DAY: f64 = 8.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeQuote {
    pub fee: f64,
    pub score: i64,
    pub hourly_wage: f64,
    pub monthly_amount: f64,
}

/// fee = hourly wage × 30 × 8 × 0.005 × (1 − score/100), which is the monthly
/// amount × 0.005 scaled down by the activity discount.
pub fn quote(monthly_amount: f64, score: i64) -> FeeQuote {
    let score = score.clamp(0, MAX_SCORE);
    let hourly_wage = monthly_amount / DAYS_PER_MONTH / HOURS_PER_DAY;
    let discount = 1.0 - score as f64 / MAX_SCORE as f64;
    let fee = hourly_wage * DAYS_PER_MONTH * HOURS_PER_DAY * NOMINAL_FEE_RATE * discount;

    FeeQuote {
        fee: round_to(fee, 2),
        score,
        hourly_wage: round_to(hourly_wage, 2),
        monthly_amount,
    }
}

/// Rounds half away from zero, which is half-up for the non-negative amounts
/// and percentages this service deals in.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
