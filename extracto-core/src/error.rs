use thiserror::Error;

/// Failures while turning statement text into a summary
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("unsupported bank: {0}")]
    UnsupportedBank(String),

    #[error("statement period not found")]
    MissingPeriod,

    #[error("invalid statement date '{0}'")]
    InvalidDate(String),

    #[error("unknown month name '{0}'")]
    UnknownMonth(String),

    #[error(transparent)]
    Regex(#[from] regex::Error),
}
