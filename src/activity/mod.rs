//! Activity & Fee Engine
//!
//! Keeps each member's cached activity score in step with their feedback and
//! survey participation, and quotes the union fee discounted by that score.

pub mod fee;
pub mod score;

pub use fee::FeeQuote;
pub use score::ActivityEngine;
