//! PDF access: in-place decryption and first-page text.
//!
//! Everything that touches the PDF format goes through [`PdfBackend`] so the
//! folder runner can be driven by other implementations in tests.

use std::path::Path;

use lopdf::Document;
use log::debug;

use crate::error::IngestError;
use crate::security;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecryptOutcome {
    /// File was left untouched
    NotEncrypted,
    /// File was rewritten without encryption
    Decrypted,
}

pub trait PdfBackend {
    /// Decrypt `path` with `password`, overwriting the file.
    /// Unencrypted files are not rewritten.
    fn decrypt_in_place(
        &self,
        path: &Path,
        password: Option<&str>,
    ) -> Result<DecryptOutcome, IngestError>;

    /// Text of the first page. Encrypted files are decrypted in memory.
    fn first_page_text(&self, path: &Path, password: Option<&str>) -> Result<String, IngestError>;
}

/// [`PdfBackend`] backed by `lopdf`
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfBackend;

impl LopdfBackend {
    pub fn new() -> Self {
        Self
    }

    fn load(path: &Path) -> Result<Document, IngestError> {
        Document::load(path).map_err(|e| IngestError::pdf(path, e))
    }

    fn decrypt(doc: &mut Document, path: &Path, password: Option<&str>) -> Result<(), IngestError> {
        let password = password.ok_or_else(|| IngestError::PasswordRequired(path.to_path_buf()))?;

        let scheme = security::decrypt_document(doc, password).map_err(|e| IngestError::Decrypt {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        debug!("{} decrypted ({:?})", path.display(), scheme);
        Ok(())
    }
}

impl PdfBackend for LopdfBackend {
    fn decrypt_in_place(
        &self,
        path: &Path,
        password: Option<&str>,
    ) -> Result<DecryptOutcome, IngestError> {
        let mut doc = Self::load(path)?;

        if !doc.is_encrypted() {
            debug!("{} is not encrypted", path.display());
            return Ok(DecryptOutcome::NotEncrypted);
        }

        Self::decrypt(&mut doc, path, password)?;
        doc.save(path).map_err(|e| IngestError::pdf(path, e))?;

        debug!("{} rewritten without encryption", path.display());
        Ok(DecryptOutcome::Decrypted)
    }

    fn first_page_text(&self, path: &Path, password: Option<&str>) -> Result<String, IngestError> {
        let mut doc = Self::load(path)?;

        if doc.is_encrypted() {
            Self::decrypt(&mut doc, path, password)?;
        }

        let first = doc
            .get_pages()
            .keys()
            .next()
            .copied()
            .ok_or_else(|| IngestError::NoPages(path.to_path_buf()))?;

        doc.extract_text(&[first])
            .map_err(|e| IngestError::pdf(path, e))
    }
}
