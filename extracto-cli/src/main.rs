use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use extracto_core::{Bank, StatementSummary};
use extracto_ingest::{
    parse_statement_text, process_folder, BatchReport, FileOutcome, LopdfBackend, PdfBackend,
};
use log::{debug, warn};
use std::path::{Path, PathBuf};

mod config;
mod logger;
mod prompt;

use config::Settings;

#[derive(Parser, Debug)]
#[command(
    name = "extracto",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("EXTRACTO_BUILD_SHA"), ")"),
    about = "Decrypt, read and rename NEQUI / DAVIPLATA statement PDFs"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decrypt, extract and rename every statement PDF in a folder
    Rename {
        /// Bank code or name (asked interactively when omitted)
        #[arg(long)]
        bank: Option<String>,

        /// Folder holding the statement PDFs
        #[arg(long, env = "PDF_FOLDER")]
        folder: Option<PathBuf>,

        /// Password for encrypted statements
        #[arg(long, env = "PDF_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Print the run report as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print what would be extracted from one statement, without touching it
    Inspect {
        /// Statement PDF
        file: PathBuf,

        /// Bank code or name
        #[arg(long)]
        bank: Bank,

        /// Password, if the statement is encrypted
        #[arg(long, env = "PDF_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// List supported banks and their codes
    Banks,
}

fn main() -> Result<()> {
    // .env has to be in the environment before clap reads `env` defaults
    let dotenv_path = config::load_dotenv();
    logger::init_logger();
    if let Some(p) = dotenv_path {
        debug!("loaded {}", p.display());
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Rename {
            bank,
            folder,
            password,
            json,
        } => {
            rename(bank, folder, password, json)?;
        }

        Command::Inspect {
            file,
            bank,
            password,
            json,
        } => {
            inspect(&file, bank, password.as_deref(), json)?;
        }

        Command::Banks => {
            for line in Bank::catalogue() {
                println!("{line}");
            }
        }
    }

    Ok(())
}

fn rename(
    bank: Option<String>,
    folder: Option<PathBuf>,
    password: Option<String>,
    json: bool,
) -> Result<()> {
    let settings = Settings::resolve(folder, password)?;

    let selected = match bank {
        Some(b) => b.parse::<Bank>().ok(),
        None => prompt::select_bank()?,
    };
    let Some(bank) = selected else {
        warn!("unsupported bank selected, nothing processed");
        println!("Unsupported bank. No files were processed.");
        return Ok(());
    };

    let report = process_folder(
        &LopdfBackend::new(),
        bank,
        &settings.folder,
        Some(&settings.password),
    )
    .with_context(|| format!("processing {}", settings.folder.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn inspect(file: &Path, bank: Bank, password: Option<&str>, json: bool) -> Result<()> {
    let text = LopdfBackend::new()
        .first_page_text(file, password)
        .with_context(|| format!("reading {}", file.display()))?;
    let summary = parse_statement_text(bank, &text)
        .with_context(|| format!("parsing {} as {}", file.display(), bank))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Bank:      {}", summary.bank);
    println!("Initials:  {}", summary.initials);
    println!(
        "Period:    {}-{:02}",
        summary.period.year, summary.period.month
    );
    print_totals(&summary);
    println!("File name: {}", summary.file_name());
    Ok(())
}

fn print_report(report: &BatchReport) {
    for outcome in &report.outcomes {
        match outcome {
            FileOutcome::Renamed { to, summary, .. } => {
                println!("Renamed to: {}", display_name(to));
                print_totals(summary);
            }
            FileOutcome::AlreadyNamed { file, summary } => {
                println!("Already named: {}", display_name(file));
                print_totals(summary);
            }
            FileOutcome::Skipped { file, reason } => {
                println!("Skipped {}: {}", display_name(file), reason);
            }
            FileOutcome::Failed { file, error } => {
                println!("Failed {}: {}", display_name(file), error);
            }
        }
    }

    println!(
        "\n{} renamed, {} skipped, {} failed",
        report.renamed(),
        report.skipped(),
        report.failed()
    );
}

fn print_totals(summary: &StatementSummary) {
    println!("Total credits: {}", summary.totals.credits);
    println!("Total debits:  {}", summary.totals.debits);
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
