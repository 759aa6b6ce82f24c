//! Statement summary types and the file name derived from them.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::bank::Bank;
use crate::error::ParseError;

/// Year and month a statement covers
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct StatementPeriod {
    pub year: i32,
    pub month: u32,
}

impl StatementPeriod {
    /// Build a period, rejecting months outside 1..=12.
    pub fn new(year: i32, month: u32) -> Result<Self, ParseError> {
        let date = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| ParseError::InvalidDate(format!("{year}/{month}")))?;
        Ok(Self::from(date))
    }

    /// Parse a `YYYY/MM/DD` date; only year and month are kept.
    pub fn from_ymd_slashed(s: &str) -> Result<Self, ParseError> {
        let date = NaiveDate::parse_from_str(s.trim(), "%Y/%m/%d")
            .map_err(|_| ParseError::InvalidDate(s.trim().to_string()))?;
        Ok(Self::from(date))
    }
}

impl From<NaiveDate> for StatementPeriod {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

/// Credit and debit totals as printed on the statement, normalized
/// (see [`crate::text::extract_total`]).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Totals {
    pub credits: String,
    pub debits: String,
}

/// Everything we pull out of one statement
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StatementSummary {
    pub bank: Bank,
    pub initials: String,
    pub period: StatementPeriod,
    pub totals: Totals,
}

impl StatementSummary {
    pub fn file_name(&self) -> String {
        file_name(self.bank, &self.initials, self.period)
    }
}

/// `{BANK}_{initials}_{year}_{month:02}.pdf`
pub fn file_name(bank: Bank, initials: &str, period: StatementPeriod) -> String {
    format!(
        "{}_{}_{}_{:02}.pdf",
        bank.name(),
        initials,
        period.year,
        period.month
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_pads_month() {
        let period = StatementPeriod::new(2024, 3).unwrap();
        assert_eq!(file_name(Bank::Nequi, "JP", period), "NEQUI_JP_2024_03.pdf");

        let period = StatementPeriod::new(2023, 11).unwrap();
        assert_eq!(
            file_name(Bank::Daviplata, "MAR", period),
            "DAVIPLATA_MAR_2023_11.pdf"
        );
    }

    #[test]
    fn test_file_name_with_empty_initials() {
        let period = StatementPeriod::new(2024, 1).unwrap();
        assert_eq!(file_name(Bank::Nequi, "", period), "NEQUI__2024_01.pdf");
    }

    #[test]
    fn test_period_from_slashed_date() {
        let p = StatementPeriod::from_ymd_slashed("2024/02/01").unwrap();
        assert_eq!(p, StatementPeriod { year: 2024, month: 2 });

        assert!(matches!(
            StatementPeriod::from_ymd_slashed("2024/13/01"),
            Err(ParseError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_period_rejects_bad_month() {
        assert!(StatementPeriod::new(2024, 0).is_err());
        assert!(StatementPeriod::new(2024, 13).is_err());
    }
}
