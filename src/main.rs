use anyhow::Result;
use chrono::Local;
use clap::Parser;
use pescan::cli::{self, prompt_export_choice, ExportChoice};
use pescan::record::AnalysisRecord;
use pescan::run_log::RunLog;
use pescan::scanner::ScanOrchestrator;
use pescan::store::RecordStore;
use pescan::{export, summarize, summary, GoblinHeaders};
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = cli::Args::parse();
    init_tracing(args.verbose);

    eprintln!("\nPESCAN v{}\n", env!("CARGO_PKG_VERSION"));

    // Every run artifact shares one tag__timestamp prefix.
    let stamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let prefix = format!("{}__{stamp}", args.analysis_tag);
    let log_path = PathBuf::from(format!("{prefix}.log"));
    let db_path = PathBuf::from(format!("{prefix}.db"));
    let mut log = RunLog::create(&log_path);

    let store = match RecordStore::open(&db_path) {
        Ok(store) => store,
        Err(e) => {
            log.record(&format!(
                "Failed to open record store: {}\n\tError info: {e}",
                db_path.display()
            ));
            anyhow::bail!("unable to open record store {}: {e}", db_path.display());
        }
    };

    let orchestrator = ScanOrchestrator::new(GoblinHeaders);
    let outcome = orchestrator.run(&args.directory, &args.analysis_tag, &store, &mut log);

    match store.all_records() {
        Ok(records) => {
            let summary = summarize(&records);
            if args.json {
                let report = serde_json::json!({ "summary": summary, "scan": outcome });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", summary::render(&summary, &outcome));
            }
            eprintln!("\nErrors exported to {}", log.path().display());

            let choice = if args.json {
                ExportChoice::None
            } else {
                prompt_export_choice(&mut std::io::stdin().lock())
            };
            export_records(&records, &prefix, choice, &mut log);
        }
        Err(e) => {
            log.record(&format!(
                "Failed to retrieve statistics from DB\n\tError info: {e}"
            ));
            eprintln!("Error: Failed to retrieve statistics from DB\n\tError info: {e}");
            eprintln!("\nErrors exported to {}", log.path().display());
        }
    }

    // The store only exists for the run. Close it, then delete it.
    drop(store);
    if let Err(e) = std::fs::remove_file(&db_path) {
        log.record(&format!(
            "Error. Unable to remove database: {}\n\tError info: {e}",
            db_path.display()
        ));
    }

    Ok(())
}

fn export_records(
    records: &[AnalysisRecord],
    prefix: &str,
    choice: ExportChoice,
    log: &mut RunLog,
) {
    let (extension, label) = match choice {
        ExportChoice::None => return,
        ExportChoice::Sql => ("sql", "SQL"),
        ExportChoice::Csv => ("csv", "CSV"),
    };
    println!("Exporting to {label}");
    let path = PathBuf::from(format!("{prefix}.{extension}"));
    let result = File::create(&path).and_then(|mut file| match choice {
        ExportChoice::Sql => export::write_sql(&mut file, records),
        _ => export::write_csv(&mut file, records),
    });
    match result {
        Ok(()) => eprintln!("Exported to {}", path.display()),
        Err(e) => log.record(&format!("Error in data export\n\tError info: {e}")),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("pescan=debug")
    } else {
        EnvFilter::new("pescan=info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
