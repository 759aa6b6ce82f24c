//! Field helpers shared by the bank parsers.

use regex::Regex;

use crate::error::ParseError;

/// First letter of every word, uppercased.
///
/// "juan pérez gómez" -> "JPG"
pub fn initials(full_name: &str) -> String {
    full_name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Amount printed after `label`, normalized to the comma-decimal form.
///
/// Matches `label`, optional spaces, any number of `$`, then the run of
/// digits, commas and dots. Commas are dropped and dots become commas, so
/// `1,234.56` is returned as `1234,56`. Returns `"0"` when the label is absent.
pub fn extract_total(text: &str, label: &str) -> Result<String, ParseError> {
    let re = Regex::new(&format!(r"{}\s*\$*([\d,.]+)", regex::escape(label)))?;

    Ok(re
        .captures(text)
        .map(|caps| normalize_amount(&caps[1]))
        .unwrap_or_else(|| "0".to_string()))
}

fn normalize_amount(raw: &str) -> String {
    raw.replace(',', "").replace('.', ",")
}

/// Month number for a Spanish month name (case-insensitive).
pub fn spanish_month(name: &str) -> Option<u32> {
    let month = match name.trim().to_lowercase().as_str() {
        "enero" => 1,
        "febrero" => 2,
        "marzo" => 3,
        "abril" => 4,
        "mayo" => 5,
        "junio" => 6,
        "julio" => 7,
        "agosto" => 8,
        "septiembre" | "setiembre" => 9,
        "octubre" => 10,
        "noviembre" => 11,
        "diciembre" => 12,
        _ => return None,
    };
    Some(month)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials() {
        assert_eq!(initials("Juan Pablo Restrepo"), "JPR");
        assert_eq!(initials("  maria   del  carmen "), "MDC");
        assert_eq!(initials("ángela ñuñez"), "ÁÑ");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn test_extract_total_normalizes() {
        let text = "Saldo anterior $120.00\nTotal abonos $1,234,567.89\nTotal cargos $ 50.00";
        assert_eq!(extract_total(text, "Total abonos").unwrap(), "1234567,89");
        // `\s*` sits before the dollar signs, so a space after `$` stops the match.
        assert_eq!(extract_total(text, "Total cargos").unwrap(), "0");
    }

    #[test]
    fn test_extract_total_multiple_dollar_signs_and_missing_label() {
        let text = "Más créditos $$2,500.10";
        assert_eq!(extract_total(text, "Más créditos").unwrap(), "2500,10");
        assert_eq!(extract_total(text, "Menos débitos").unwrap(), "0");
    }

    #[test]
    fn test_extract_total_label_is_literal() {
        // Regex metacharacters in labels must not change the match.
        let text = "Total (COP) 10.5";
        assert_eq!(extract_total(text, "Total (COP)").unwrap(), "10,5");
    }

    #[test]
    fn test_spanish_month() {
        assert_eq!(spanish_month("Enero"), Some(1));
        assert_eq!(spanish_month("SEPTIEMBRE"), Some(9));
        assert_eq!(spanish_month("setiembre"), Some(9));
        assert_eq!(spanish_month(" diciembre "), Some(12));
        assert_eq!(spanish_month("January"), None);
    }
}
