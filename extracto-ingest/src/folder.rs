//! Folder runner: decrypt, extract and rename every statement PDF in a folder.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use extracto_core::{Bank, StatementSummary};
use log::{info, warn};
use serde::Serialize;

use crate::error::IngestError;
use crate::parsers::parse_statement_text;
use crate::pdf::{DecryptOutcome, PdfBackend};

/// What happened to one file of a folder run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum FileOutcome {
    Renamed {
        from: PathBuf,
        to: PathBuf,
        summary: StatementSummary,
    },
    /// File already carries the generated name
    AlreadyNamed {
        file: PathBuf,
        summary: StatementSummary,
    },
    Skipped {
        file: PathBuf,
        reason: String,
    },
    Failed {
        file: PathBuf,
        error: String,
    },
}

impl FileOutcome {
    pub fn summary(&self) -> Option<&StatementSummary> {
        match self {
            FileOutcome::Renamed { summary, .. } | FileOutcome::AlreadyNamed { summary, .. } => {
                Some(summary)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn renamed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Renamed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Skipped { .. } | FileOutcome::AlreadyNamed { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}

/// PDF files directly inside `folder`, sorted by name.
pub fn list_pdfs(folder: &Path) -> Result<Vec<PathBuf>, IngestError> {
    let entries = fs::read_dir(folder).map_err(|e| IngestError::io(folder, e))?;

    let mut out = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| IngestError::io(folder, e))?.path();
        let is_pdf = path
            .extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

/// Process every PDF in `folder` for `bank`, one at a time.
///
/// The listing is taken once up front, so renamed files are not revisited.
/// Per-file problems are recorded in the report; only an unreadable folder
/// is an error.
pub fn process_folder(
    backend: &dyn PdfBackend,
    bank: Bank,
    folder: &Path,
    password: Option<&str>,
) -> Result<BatchReport, IngestError> {
    let files = list_pdfs(folder)?;
    info!("{} PDF file(s) in {}", files.len(), folder.display());

    let mut report = BatchReport::default();
    for path in files {
        let outcome = match process_file(backend, bank, &path, password) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("{}: {e}", path.display());
                FileOutcome::Failed {
                    file: path,
                    error: e.to_string(),
                }
            }
        };
        report.outcomes.push(outcome);
    }
    Ok(report)
}

/// Decrypt, extract and rename a single statement.
pub fn process_file(
    backend: &dyn PdfBackend,
    bank: Bank,
    path: &Path,
    password: Option<&str>,
) -> Result<FileOutcome, IngestError> {
    // A failed decryption is not fatal: extraction gets its own chance.
    match backend.decrypt_in_place(path, password) {
        Ok(DecryptOutcome::Decrypted) => info!("{}: decrypted", path.display()),
        Ok(DecryptOutcome::NotEncrypted) => info!("{}: not encrypted", path.display()),
        Err(e) => warn!("{}: decryption failed: {e}", path.display()),
    }

    let text = backend.first_page_text(path, password)?;
    let summary = parse_statement_text(bank, &text)?;

    let new_name = summary.file_name();
    if path.file_name() == Some(OsStr::new(&new_name)) {
        return Ok(FileOutcome::AlreadyNamed {
            file: path.to_path_buf(),
            summary,
        });
    }

    let target = path.with_file_name(&new_name);
    if target.exists() {
        warn!("{}: {} already exists, not overwriting", path.display(), new_name);
        return Ok(FileOutcome::Skipped {
            file: path.to_path_buf(),
            reason: format!("{new_name} already exists"),
        });
    }

    fs::rename(path, &target).map_err(|e| IngestError::io(path, e))?;
    info!("{} -> {}", path.display(), new_name);

    Ok(FileOutcome::Renamed {
        from: path.to_path_buf(),
        to: target,
        summary,
    })
}
