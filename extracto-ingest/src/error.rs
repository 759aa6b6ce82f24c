use std::path::PathBuf;

use extracto_core::ParseError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("PDF error on {path}: {message}")]
    Pdf { path: PathBuf, message: String },

    #[error("{0} is encrypted and no password was given")]
    PasswordRequired(PathBuf),

    #[error("cannot decrypt {path}: {message}")]
    Decrypt { path: PathBuf, message: String },

    #[error("{0} has no pages")]
    NoPages(PathBuf),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl IngestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IngestError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn pdf(path: impl Into<PathBuf>, err: impl ToString) -> Self {
        IngestError::Pdf {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
