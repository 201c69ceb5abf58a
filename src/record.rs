//! The durable per-binary analysis record.

use crate::arch::Architecture;
use crate::mitigations::MitigationFlags;
use serde::{Deserialize, Serialize};

/// Column names of the `file_info` schema, in persisted order. The store,
/// the CSV header, and the SQL-script export all follow this order.
pub const COLUMNS: [&str; 18] = [
    "id_analysis",
    "root_folder",
    "file_path",
    "file_name",
    "file_extension",
    "architecture",
    "file_hash",
    "ASLR",
    "DEP",
    "SEH",
    "CFG",
    "HIGH_ENTROPY",
    "FORCE_INTEGRITY",
    "NO_ISOLATION",
    "NO_BIND",
    "APPCONTAINER",
    "WDM_DRIVER",
    "TERMINAL_SERVER_AWARE",
];

/// Column definitions for `CREATE TABLE`, shared by the live store and the
/// replayable SQL export.
pub const SCHEMA_COLUMNS: &str = "\
`id_analysis`\tTEXT NOT NULL,\n\
`root_folder`\tTEXT NOT NULL,\n\
`file_path`\tTEXT NOT NULL,\n\
`file_name`\tTEXT NOT NULL,\n\
`file_extension`\tTEXT NOT NULL,\n\
`architecture`\tTEXT NOT NULL,\n\
`file_hash`\tTEXT NOT NULL,\n\
`ASLR`\tINTEGER,\n\
`DEP`\tINTEGER,\n\
`SEH`\tINTEGER,\n\
`CFG`\tINTEGER,\n\
`HIGH_ENTROPY`\tINTEGER,\n\
`FORCE_INTEGRITY`\tINTEGER,\n\
`NO_ISOLATION`\tINTEGER,\n\
`NO_BIND`\tINTEGER,\n\
`APPCONTAINER`\tINTEGER,\n\
`WDM_DRIVER`\tINTEGER,\n\
`TERMINAL_SERVER_AWARE`\tINTEGER";

/// One record per unique content digest per analysis run.
///
/// Created once when the orchestrator first sees a digest; never mutated
/// afterwards. A byte-identical file at a different path never produces a
/// second record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub analysis_tag: String,
    pub root_folder: String,
    pub file_path: String,
    pub file_name: String,
    pub file_extension: String,
    pub architecture: Architecture,
    pub file_hash: String,
    pub flags: MitigationFlags,
}

impl AnalysisRecord {
    /// The eleven flag values in persisted column order (`ASLR` first,
    /// `TERMINAL_SERVER_AWARE` last). Note this differs from bit order.
    pub fn flag_values(&self) -> [bool; 11] {
        let f = &self.flags;
        [
            f.aslr,
            f.dep,
            f.no_seh,
            f.cfg,
            f.high_entropy_aslr,
            f.force_integrity,
            f.no_isolation,
            f.no_bind,
            f.app_container,
            f.wdm_driver,
            f.terminal_server_aware,
        ]
    }
}
