use anyhow::{Context, Result};
use extracto_core::Bank;
use std::io::{self, Write};

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

/// Show the bank catalogue and read a numeric code from stdin.
///
/// `Ok(None)` means the code is not a supported bank.
pub fn select_bank() -> Result<Option<Bank>> {
    for line in Bank::catalogue() {
        println!("{line}");
    }
    let answer = prompt("Select the bank")?;
    parse_selection(&answer)
}

pub fn parse_selection(answer: &str) -> Result<Option<Bank>> {
    let code: u32 = answer
        .trim()
        .parse()
        .with_context(|| format!("invalid bank code '{}'", answer.trim()))?;
    Ok(Bank::from_code(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("1").unwrap(), Some(Bank::Nequi));
        assert_eq!(parse_selection(" 2 ").unwrap(), Some(Bank::Daviplata));
        assert_eq!(parse_selection("3").unwrap(), None);
        assert!(parse_selection("nequi").is_err());
        assert!(parse_selection("").is_err());
    }
}
