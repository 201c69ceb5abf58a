//! Command-line surface and the end-of-run export prompt.

use clap::Parser;
use std::io::BufRead;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pescan",
    about = "Audit Windows PE binaries for missing exploit mitigations",
    version
)]
pub struct Args {
    /// Directory to analyze.
    pub directory: PathBuf,

    /// Any name, used to tag this run's artifacts.
    pub analysis_tag: String,

    /// Print the report as JSON on stdout and skip the export prompt.
    #[arg(long)]
    pub json: bool,

    /// Verbose diagnostics on stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportChoice {
    None,
    Sql,
    Csv,
}

/// Interactive export menu. Re-prompts on anything but `n`/`s`/`c`;
/// closed stdin counts as declining.
pub fn prompt_export_choice<R: BufRead>(input: &mut R) -> ExportChoice {
    println!("\nExport data? Press:");
    println!("\t n -- Don't export");
    println!("\t s -- Export to SQL script");
    println!("\t c -- Export to CSV file");

    loop {
        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) | Err(_) => return ExportChoice::None,
            Ok(_) => {}
        }
        match line.trim().to_lowercase().as_str() {
            "n" => return ExportChoice::None,
            "s" => return ExportChoice::Sql,
            "c" => return ExportChoice::Csv,
            _ => println!("Please, enter a valid option [[n]/[s]/[c]]"),
        }
    }
}
