pub mod core;
pub mod performance;
pub mod reports;
pub mod students;
