//! extracto-ingest: PDF decryption/text access, bank-specific statement parsers
//! and the folder runner.

pub mod error;
pub mod folder;
pub mod parsers;
pub mod pdf;
pub mod security;

pub use error::IngestError;
pub use folder::{list_pdfs, process_file, process_folder, BatchReport, FileOutcome};
pub use parsers::{parse_daviplata_text, parse_nequi_text, parse_statement_text};
pub use pdf::{DecryptOutcome, LopdfBackend, PdfBackend};
pub use security::{Scheme, SecurityError};
