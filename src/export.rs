//! Record-set exports: flat CSV and a replayable SQL script.
//!
//! Both forms carry all eighteen columns in [`COLUMNS`] order. The SQL
//! script is a self-contained transaction that rebuilds `file_info` from
//! scratch when fed to any SQLite client.

use crate::record::{AnalysisRecord, COLUMNS, SCHEMA_COLUMNS};
use std::io::{self, Write};

pub fn write_csv<W: Write>(out: &mut W, records: &[AnalysisRecord]) -> io::Result<()> {
    let header: Vec<String> = COLUMNS.iter().map(|c| format!("\"{c}\"")).collect();
    writeln!(out, "{}", header.join(","))?;
    for record in records {
        let mut fields: Vec<String> = text_fields(record).iter().map(|v| csv_quote(v)).collect();
        fields.extend(record.flag_values().iter().map(|&b| u8::from(b).to_string()));
        writeln!(out, "{}", fields.join(","))?;
    }
    Ok(())
}

pub fn write_sql<W: Write>(out: &mut W, records: &[AnalysisRecord]) -> io::Result<()> {
    writeln!(out, "BEGIN TRANSACTION;\n")?;
    writeln!(out, "CREATE TABLE \"file_info\" (\n{SCHEMA_COLUMNS}\n);")?;
    let columns: Vec<String> = COLUMNS.iter().map(|c| format!("`{c}`")).collect();
    let columns = columns.join(",");
    for record in records {
        let mut values: Vec<String> = text_fields(record).iter().map(|v| sql_quote(v)).collect();
        values.extend(record.flag_values().iter().map(|&b| u8::from(b).to_string()));
        writeln!(
            out,
            "INSERT INTO `file_info` ({columns}) VALUES ({});",
            values.join(",")
        )?;
    }
    writeln!(out, "\nCOMMIT;")?;
    Ok(())
}

/// The seven text columns in persisted order.
fn text_fields(record: &AnalysisRecord) -> [&str; 7] {
    [
        &record.analysis_tag,
        &record.root_folder,
        &record.file_path,
        &record.file_name,
        &record.file_extension,
        record.architecture.as_str(),
        &record.file_hash,
    ]
}

fn csv_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn sql_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
