//! CLI entry point for the gradebook tool.
//!
//! Provides subcommands for grading a student, listing the persisted
//! history, and evaluating arithmetic expressions.

use std::ffi::OsStr;
use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};
use gradebook::{
    expr::{evaluate, normalize_spoken},
    export::CsvExport,
    history::HistoryStore,
    ledger::Ledger,
    record::{GradeRecord, RawMarks},
    report::format_report,
};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "gradebook")]
#[command(about = "Student grade evaluator with CSV and SQLite ledgers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate marks, print a grade report, and append it to the ledger
    Grade {
        /// Student name
        #[arg(short, long)]
        name: String,

        /// English mark (0-100)
        #[arg(long)]
        english: String,

        /// Mathematics mark (0-100)
        #[arg(long)]
        mathematics: String,

        /// Science mark (0-100)
        #[arg(long)]
        science: String,

        /// Hindi mark (0-100)
        #[arg(long)]
        hindi: String,

        /// SST mark (0-100)
        #[arg(long)]
        sst: String,

        /// CSV file to append results to
        #[arg(short, long, default_value = "export.csv")]
        export: String,

        /// SQLite history database
        #[arg(short, long, default_value = "history.db")]
        db: String,
    },
    /// List persisted records, most recent first
    History {
        /// SQLite history database
        #[arg(short, long, default_value = "history.db")]
        db: String,

        /// Maximum number of rows to show
        #[arg(short, long, default_value_t = 20)]
        limit: u32,

        /// Show logged calculations instead of grade records
        #[arg(long, default_value_t = false)]
        calculations: bool,
    },
    /// Evaluate an arithmetic expression and log it
    Calc {
        /// Expression, e.g. "2+3*4"
        expression: String,

        /// Treat the input as a spoken phrase ("five plus three")
        #[arg(short, long, default_value_t = false)]
        spoken: bool,

        /// SQLite history database
        #[arg(short, long, default_value = "history.db")]
        db: String,

        /// Skip writing the calculation to the history store
        #[arg(long, default_value_t = false)]
        no_log: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/gradebook.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("gradebook.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Grade {
            name,
            english,
            mathematics,
            science,
            hindi,
            sst,
            export,
            db,
        } => {
            let raw = RawMarks {
                english,
                mathematics,
                science,
                hindi,
                sst,
            };
            let record = GradeRecord::build(&name, &raw)?;
            info!(
                student = %record.student_name,
                total = record.total,
                average = record.average,
                grade = %record.grade,
                "Grade record built"
            );

            // Show the report before persisting: a ledger failure must not
            // discard the computed result.
            println!("{}", format_report(&record));

            let ledger = Ledger::new(CsvExport::new(&export), HistoryStore::open(&db).await?);
            if let Err(e) = ledger.persist(&record).await {
                error!(error = %e, "Failed to persist grade record");
                anyhow::bail!("the report above was computed but could not be saved: {e}");
            }
            println!("Results have been saved to {export}");
        }
        Commands::History {
            db,
            limit,
            calculations,
        } => {
            let store = HistoryStore::open(&db).await?;
            if calculations {
                let rows = store.calculations(i64::from(limit)).await?;
                if rows.is_empty() {
                    println!("No history found.");
                }
                for row in &rows {
                    println!("{} - {} = {}", row.timestamp, row.operation, row.result);
                }
            } else {
                let rows = store.recent(i64::from(limit)).await?;
                if rows.is_empty() {
                    println!("No history found.");
                }
                for row in &rows {
                    println!(
                        "{} - {} | total {} | average {} | grade {}",
                        row.timestamp, row.student_name, row.total, row.average, row.final_grade
                    );
                }
            }
        }
        Commands::Calc {
            expression,
            spoken,
            db,
            no_log,
        } => {
            let expr = if spoken {
                let normalized = normalize_spoken(&expression);
                info!(raw = %expression, normalized = %normalized, "Normalized spoken input");
                normalized
            } else {
                expression
            };

            let value = evaluate(&expr)?;
            println!("{expr} = {value}");

            if !no_log {
                let store = HistoryStore::open(&db).await?;
                store.log_calculation(&expr, value).await?;
            }
        }
    }

    Ok(())
}
