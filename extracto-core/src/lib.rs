//! extracto-core: bank catalogue, statement summary types and field helpers

pub mod bank;
pub mod error;
pub mod statement;
pub mod text;

pub use bank::Bank;
pub use error::ParseError;
pub use statement::{file_name, StatementPeriod, StatementSummary, Totals};
pub use text::{extract_total, initials, spanish_month};
