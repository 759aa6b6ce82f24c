//! NEQUI statement parser (text)
//!
//! Expected first-page text after PDF-to-text:
//!   Extracto de: JUAN PABLO RESTREPO
//!   Periodo: 2024/03/01 a 2024/03/31
//!   Total abonos $1,250,000.00
//!   Total cargos $980,500.50

use extracto_core::{Bank, ParseError, StatementPeriod, StatementSummary, Totals};
use extracto_core::{extract_total, initials};
use regex::Regex;

/// Parse NEQUI first-page text into a statement summary.
///
/// The period start date decides year and month.
pub fn parse_nequi_text(text: &str) -> Result<StatementSummary, ParseError> {
    let name_re = Regex::new(r"de:\s*([^\n\r]+)")?;
    let period_re = Regex::new(r"(\d{4}/\d{2}/\d{2})\s*a\s*(\d{4}/\d{2}/\d{2})")?;

    let full_name = name_re
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_default();

    let start = period_re
        .captures(text)
        .map(|caps| caps[1].to_string())
        .ok_or(ParseError::MissingPeriod)?;
    let period = StatementPeriod::from_ymd_slashed(&start)?;

    Ok(StatementSummary {
        bank: Bank::Nequi,
        initials: initials(&full_name),
        period,
        totals: Totals {
            credits: extract_total(text, "Total abonos")?,
            debits: extract_total(text, "Total cargos")?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
Extracto de: Juan Pablo Restrepo
Número de cuenta 3001234567
Periodo 2024/03/01 a 2024/03/31
Saldo anterior $100,000.00
Total abonos $1,250,000.00
Total cargos $980,500.50
Saldo actual $369,499.50
"#;

    #[test]
    fn test_parse_nequi_sample() {
        let s = parse_nequi_text(SAMPLE).unwrap();
        assert_eq!(s.bank, Bank::Nequi);
        assert_eq!(s.initials, "JPR");
        assert_eq!(s.period, StatementPeriod { year: 2024, month: 3 });
        assert_eq!(s.totals.credits, "1250000,00");
        assert_eq!(s.totals.debits, "980500,50");
        assert_eq!(s.file_name(), "NEQUI_JPR_2024_03.pdf");
    }

    #[test]
    fn test_period_uses_start_date() {
        let text = "Extracto de: ana gil\n2023/12/16 a 2024/01/15\n";
        let s = parse_nequi_text(text).unwrap();
        assert_eq!(s.period, StatementPeriod { year: 2023, month: 12 });
        assert_eq!(s.initials, "AG");
    }

    #[test]
    fn test_name_on_next_line() {
        let text = "Extracto de:\nCarlos Mario\n2024/05/01 a 2024/05/31";
        let s = parse_nequi_text(text).unwrap();
        assert_eq!(s.initials, "CM");
    }

    #[test]
    fn test_missing_fields() {
        // No name, no totals: empty initials and zero totals
        let s = parse_nequi_text("2024/07/01 a 2024/07/31").unwrap();
        assert_eq!(s.initials, "");
        assert_eq!(s.totals.credits, "0");
        assert_eq!(s.totals.debits, "0");

        // No period is an error
        let err = parse_nequi_text("Extracto de: Juan Pablo").unwrap_err();
        assert!(matches!(err, ParseError::MissingPeriod));
    }
}
