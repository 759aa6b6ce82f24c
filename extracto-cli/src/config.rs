use anyhow::{bail, Result};
use std::path::PathBuf;

pub const FOLDER_VAR: &str = "PDF_FOLDER";
pub const PASSWORD_VAR: &str = "PDF_PASSWORD";

/// Load `.env` from the working directory if there is one.
/// Variables already set in the environment win.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenv::dotenv().ok()
}

/// Resolved settings for a folder run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub folder: PathBuf,
    pub password: String,
}

impl Settings {
    /// Both values are required; empty strings count as unset.
    pub fn resolve(folder: Option<PathBuf>, password: Option<String>) -> Result<Self> {
        let folder = folder.filter(|f| !f.as_os_str().is_empty());
        let password = password.filter(|p| !p.is_empty());

        let (folder, password) = match (folder, password) {
            (Some(folder), Some(password)) => (folder, password),
            (folder, password) => {
                let mut missing = Vec::new();
                if folder.is_none() {
                    missing.push(FOLDER_VAR);
                }
                if password.is_none() {
                    missing.push(PASSWORD_VAR);
                }
                bail!(
                    "configuration incomplete: set {} (environment, .env or flags)",
                    missing.join(" and ")
                );
            }
        };

        if !folder.is_dir() {
            bail!("{} is not a directory", folder.display());
        }

        Ok(Self { folder, password })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_requires_both_values() {
        let err = Settings::resolve(None, None).unwrap_err().to_string();
        assert!(err.contains("PDF_FOLDER and PDF_PASSWORD"), "{err}");

        let err = Settings::resolve(Some(PathBuf::from(".")), Some(String::new()))
            .unwrap_err()
            .to_string();
        assert!(err.contains("PDF_PASSWORD") && !err.contains("PDF_FOLDER"), "{err}");
    }

    #[test]
    fn test_resolve_checks_folder() {
        let dir = std::env::temp_dir();
        let s = Settings::resolve(Some(dir.clone()), Some("1234".to_string())).unwrap();
        assert_eq!(s.folder, dir);
        assert_eq!(s.password, "1234");

        let missing = dir.join("extracto-does-not-exist-7f3a");
        let err = Settings::resolve(Some(missing), Some("1234".to_string()))
            .unwrap_err()
            .to_string();
        assert!(err.contains("not a directory"), "{err}");
    }
}
