//! Fleet-wide report over the full record set.
//!
//! The summary is derived fresh from an immutable snapshot on every
//! request, never accumulated while scanning. A single fold produces all
//! counts, so the architecture buckets always sum to the record total.

use crate::record::AnalysisRecord;
use crate::scanner::ScanOutcome;
use colored::Colorize;
use serde::Serialize;
use std::fmt::Write;

const RULE: &str =
    "------------------------------------------------------------------------------";

/// How many records have each mitigation disabled (flag clear).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnprotectedCounts {
    pub aslr: usize,
    pub dep: usize,
    pub no_seh: usize,
    pub cfg: usize,
    pub high_entropy: usize,
    pub force_integrity: usize,
    pub no_isolation: usize,
    pub no_bind: usize,
    pub app_container: usize,
    pub wdm_driver: usize,
    pub terminal_server_aware: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total_records: usize,
    pub exe_count: usize,
    pub dll_count: usize,
    pub i386_count: usize,
    pub amd64_count: usize,
    pub ia64_count: usize,
    pub unknown_arch_count: usize,
    pub unprotected: UnprotectedCounts,
    /// Paths with none of CFG, ASLR, DEP, NO_SEH active, in record order.
    pub risk_files: Vec<String>,
}

impl RunSummary {
    /// `count` as a percentage of the record total, 0.0 for an empty run.
    pub fn percent(&self, count: usize) -> f64 {
        if self.total_records == 0 {
            0.0
        } else {
            count as f64 / self.total_records as f64 * 100.0
        }
    }
}

/// Single read-only pass over the snapshot.
pub fn summarize(records: &[AnalysisRecord]) -> RunSummary {
    let mut summary = RunSummary {
        total_records: records.len(),
        ..RunSummary::default()
    };
    for record in records {
        match record.file_extension.as_str() {
            ".exe" => summary.exe_count += 1,
            ".dll" => summary.dll_count += 1,
            _ => {}
        }
        match record.architecture {
            crate::arch::Architecture::I386 => summary.i386_count += 1,
            crate::arch::Architecture::Amd64 => summary.amd64_count += 1,
            crate::arch::Architecture::Ia64 => summary.ia64_count += 1,
            crate::arch::Architecture::Unknown => summary.unknown_arch_count += 1,
        }
        let f = &record.flags;
        let u = &mut summary.unprotected;
        u.aslr += usize::from(!f.aslr);
        u.dep += usize::from(!f.dep);
        u.no_seh += usize::from(!f.no_seh);
        u.cfg += usize::from(!f.cfg);
        u.high_entropy += usize::from(!f.high_entropy_aslr);
        u.force_integrity += usize::from(!f.force_integrity);
        u.no_isolation += usize::from(!f.no_isolation);
        u.no_bind += usize::from(!f.no_bind);
        u.app_container += usize::from(!f.app_container);
        u.wdm_driver += usize::from(!f.wdm_driver);
        u.terminal_server_aware += usize::from(!f.terminal_server_aware);
        if !f.core_guard_active() {
            summary.risk_files.push(record.file_path.clone());
        }
    }
    summary
}

/// Terminal report. Pure String so the caller decides where it goes.
pub fn render(summary: &RunSummary, outcome: &ScanOutcome) -> String {
    let mut out = String::new();
    let total = summary.total_records;

    let _ = writeln!(out, "\n\n{}", "RESULTS:".bold());
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "Total files analyzed : {total}");

    let _ = writeln!(out, "\n{}", "File types:".bold());
    let _ = writeln!(
        out,
        "\n\t\tEXE: {}/{} ({:.1}%)",
        summary.exe_count,
        total,
        summary.percent(summary.exe_count)
    );
    let _ = writeln!(
        out,
        "\t\tDLL: {}/{} ({:.1}%)",
        summary.dll_count,
        total,
        summary.percent(summary.dll_count)
    );
    let failed_percent = if outcome.processed == 0 {
        0.0
    } else {
        outcome.errors as f64 / outcome.processed as f64 * 100.0
    };
    let _ = writeln!(
        out,
        "\t\tFailed: {}/{} ({failed_percent:.1}%)",
        outcome.errors, outcome.processed
    );

    let _ = writeln!(out, "\n{}", "Architecture:".bold());
    let _ = writeln!(
        out,
        "\n\t\tI386: {}/{} ({:.1}%)",
        summary.i386_count,
        total,
        summary.percent(summary.i386_count)
    );
    let _ = writeln!(
        out,
        "\t\tAMD64: {}/{} ({:.1}%)",
        summary.amd64_count,
        total,
        summary.percent(summary.amd64_count)
    );
    let _ = writeln!(
        out,
        "\t\tIA64: {}/{} ({:.1}%)",
        summary.ia64_count,
        total,
        summary.percent(summary.ia64_count)
    );
    let _ = writeln!(
        out,
        "\t\tOther: {}/{} ({:.1}%)",
        summary.unknown_arch_count,
        total,
        summary.percent(summary.unknown_arch_count)
    );

    let _ = writeln!(out, "\n{}", "Guards:".bold());
    let u = &summary.unprotected;
    let guards: [(&str, usize); 11] = [
        ("ASLR", u.aslr),
        ("DEP", u.dep),
        ("NO_SEH", u.no_seh),
        ("CFG", u.cfg),
        ("HIGH_ENTROPY", u.high_entropy),
        ("FORCE_INTEGRITY", u.force_integrity),
        ("NO_ISOLATION", u.no_isolation),
        ("NO_BIND", u.no_bind),
        ("APP_CONTAINER", u.app_container),
        ("WDM_DRIVER", u.wdm_driver),
        ("TERMINAL_SERVER_AWARE", u.terminal_server_aware),
    ];
    let mut first = true;
    for (label, count) in guards {
        let lead = if first { "\n" } else { "" };
        first = false;
        let _ = writeln!(
            out,
            "{lead}\t\t{label} (disabled): {count}/{total} ({:.1}%)",
            summary.percent(count)
        );
    }

    let _ = writeln!(out, "\n{}\n", "Files without any active guard:".bold());
    if summary.risk_files.is_empty() {
        let _ = writeln!(out, "\t\t{}", "No files found.".green());
    } else {
        for path in &summary.risk_files {
            let _ = writeln!(out, "\t\t{}", path.red());
        }
    }

    let _ = writeln!(out, "\n{RULE}");
    out
}
