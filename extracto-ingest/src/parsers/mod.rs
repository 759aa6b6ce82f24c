//! Bank-specific statement text parsers.

pub mod daviplata;
pub mod nequi;

use extracto_core::{Bank, ParseError, StatementSummary};

pub use daviplata::parse_daviplata_text;
pub use nequi::parse_nequi_text;

/// Parse first-page statement text with the layout of `bank`.
pub fn parse_statement_text(bank: Bank, text: &str) -> Result<StatementSummary, ParseError> {
    match bank {
        Bank::Nequi => parse_nequi_text(text),
        Bank::Daviplata => parse_daviplata_text(text),
    }
}
