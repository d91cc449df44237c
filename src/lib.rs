pub mod activity;
pub mod api;
pub mod community;
pub mod config;
pub mod database;
pub mod error;
pub mod membership;
pub mod strike;
pub mod surveys;

pub use error::{UnionError, UnionResult};
