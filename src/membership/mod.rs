//! Members, their feedback and their payrolls

pub mod directory;
pub mod feedback;
pub mod payroll;

pub use directory::{MemberDirectory, NewMember};
pub use feedback::FeedbackService;
pub use payroll::{NewPayroll, PayrollLedger};
