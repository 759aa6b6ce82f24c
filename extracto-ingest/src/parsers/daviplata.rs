//! DAVIPLATA statement parser (text)
//!
//! Expected first-page text after PDF-to-text:
//!   Nombre del cliente: MARIA ALEJANDRA RUIZ Informe del mes: Marzo / 2024
//!   Más créditos $350,000.00
//!   Menos débitos $120,450.75

use extracto_core::{Bank, ParseError, StatementPeriod, StatementSummary, Totals};
use extracto_core::{extract_total, initials, spanish_month};
use regex::Regex;

/// Parse DAVIPLATA first-page text into a statement summary.
///
/// The report month is written as a Spanish month name.
pub fn parse_daviplata_text(text: &str) -> Result<StatementSummary, ParseError> {
    let name_re = Regex::new(r"cliente:\s*(.+)Informe")?;
    let period_re = Regex::new(r"Informe del mes:\s*(\w+)\s*/\s*(\d{4})")?;

    let full_name = name_re
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_default();

    let caps = period_re.captures(text).ok_or(ParseError::MissingPeriod)?;
    let month =
        spanish_month(&caps[1]).ok_or_else(|| ParseError::UnknownMonth(caps[1].to_string()))?;
    let year: i32 = caps[2]
        .parse()
        .map_err(|_| ParseError::InvalidDate(caps[2].to_string()))?;
    let period = StatementPeriod::new(year, month)?;

    Ok(StatementSummary {
        bank: Bank::Daviplata,
        initials: initials(&full_name),
        period,
        totals: Totals {
            credits: extract_total(text, "Más créditos")?,
            debits: extract_total(text, "Menos débitos")?,
        },
    })
}
