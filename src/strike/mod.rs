//! Strike Decisions and Voting
//!
//! Officers open strike decisions, rank-and-file members vote on them, and
//! officers approve or reject once voting has closed.

pub mod registry;
pub mod types;
pub mod voting;

pub use registry::StrikeRegistry;
pub use types::*;
pub use voting::VoteManager;
