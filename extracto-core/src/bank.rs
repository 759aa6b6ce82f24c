//! Supported banks and their selection codes.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Banks whose statement layout we know how to read
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum Bank {
    #[serde(rename = "NEQUI")]
    Nequi,
    #[serde(rename = "DAVIPLATA")]
    Daviplata,
}

impl Bank {
    pub const ALL: [Bank; 2] = [Bank::Nequi, Bank::Daviplata];

    /// Numeric code shown in the selection prompt
    pub fn code(&self) -> u32 {
        match self {
            Bank::Nequi => 1,
            Bank::Daviplata => 2,
        }
    }

    /// Tag used in generated file names
    pub fn name(&self) -> &'static str {
        match self {
            Bank::Nequi => "NEQUI",
            Bank::Daviplata => "DAVIPLATA",
        }
    }

    pub fn from_code(code: u32) -> Option<Bank> {
        Bank::ALL.into_iter().find(|b| b.code() == code)
    }

    pub fn from_name(name: &str) -> Option<Bank> {
        let name = name.trim();
        Bank::ALL
            .into_iter()
            .find(|b| b.name().eq_ignore_ascii_case(name))
    }

    /// Catalogue lines, e.g. `1: NEQUI`
    pub fn catalogue() -> Vec<String> {
        Bank::ALL
            .iter()
            .map(|b| format!("{}: {}", b.code(), b.name()))
            .collect()
    }
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts either the numeric code or the bank name.
impl FromStr for Bank {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let found = match s.parse::<u32>() {
            Ok(code) => Bank::from_code(code),
            Err(_) => Bank::from_name(s),
        };
        found.ok_or_else(|| ParseError::UnsupportedBank(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_prompt() {
        assert_eq!(Bank::from_code(1), Some(Bank::Nequi));
        assert_eq!(Bank::from_code(2), Some(Bank::Daviplata));
        assert_eq!(Bank::from_code(3), None);
        assert_eq!(Bank::from_code(0), None);
    }

    #[test]
    fn test_from_str_accepts_code_or_name() {
        assert_eq!("1".parse::<Bank>().unwrap(), Bank::Nequi);
        assert_eq!(" daviplata ".parse::<Bank>().unwrap(), Bank::Daviplata);
        assert_eq!("Nequi".parse::<Bank>().unwrap(), Bank::Nequi);

        let err = "7".parse::<Bank>().unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedBank(ref s) if s == "7"));
        assert!("BANCOLOMBIA".parse::<Bank>().is_err());
    }

    #[test]
    fn test_catalogue_and_serde_name() {
        assert_eq!(Bank::catalogue(), vec!["1: NEQUI", "2: DAVIPLATA"]);
        assert_eq!(serde_json::to_string(&Bank::Daviplata).unwrap(), "\"DAVIPLATA\"");
        assert_eq!(Bank::Nequi.to_string(), "NEQUI");
    }
}
