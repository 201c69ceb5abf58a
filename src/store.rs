//! Append-only record store, one SQLite file per analysis run.
//!
//! The store file itself is the run's namespace: it is created at run
//! start, owns the record set for the run's lifetime, and is deleted after
//! any requested export. All statements are parameterized.

use crate::arch::Architecture;
use crate::error::StoreError;
use crate::mitigations::MitigationFlags;
use crate::record::{AnalysisRecord, SCHEMA_COLUMNS};
use rusqlite::{params, Connection};
use std::path::Path;

const INSERT_SQL: &str = "INSERT INTO `file_info` (\
     `id_analysis`,`root_folder`,`file_path`,`file_name`,`file_extension`,\
     `architecture`,`file_hash`,`ASLR`,`DEP`,`SEH`,`CFG`,`HIGH_ENTROPY`,\
     `FORCE_INTEGRITY`,`NO_ISOLATION`,`NO_BIND`,`APPCONTAINER`,`WDM_DRIVER`,\
     `TERMINAL_SERVER_AWARE`) \
     VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17,?18)";

const SELECT_SQL: &str = "SELECT `id_analysis`,`root_folder`,`file_path`,\
     `file_name`,`file_extension`,`architecture`,`file_hash`,`ASLR`,`DEP`,\
     `SEH`,`CFG`,`HIGH_ENTROPY`,`FORCE_INTEGRITY`,`NO_ISOLATION`,`NO_BIND`,\
     `APPCONTAINER`,`WDM_DRIVER`,`TERMINAL_SERVER_AWARE` \
     FROM `file_info` ORDER BY rowid";

pub struct RecordStore {
    conn: Connection,
}

impl RecordStore {
    /// Open (creating if absent) the backing store and its schema. This is
    /// the only failure that aborts a run.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(StoreError::Open)?;
        Self::init(conn)
    }

    /// In-memory store, used by tests and the SQL-export round trip.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(StoreError::Open)?;
        Self::init(conn)
    }

    /// In-memory connection with no schema. The SQL export carries its own
    /// `CREATE TABLE`, so replaying it needs a blank database.
    pub fn open_in_memory_without_schema() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(StoreError::Open)?;
        Ok(Self { conn })
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        let create = format!("CREATE TABLE IF NOT EXISTS \"file_info\" (\n{SCHEMA_COLUMNS}\n);");
        conn.execute(&create, []).map_err(StoreError::Open)?;
        Ok(Self { conn })
    }

    /// Whether a record with this content digest already exists. The store
    /// file is per-run, so the digest alone scopes the check to the run.
    pub fn contains_digest(&self, digest: &str) -> Result<bool, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT 1 FROM `file_info` WHERE `file_hash` = ?1 LIMIT 1")?;
        Ok(stmt.exists(params![digest])?)
    }

    /// Append one record. SQLite autocommits the insert, so the record is
    /// durable before the next file is processed.
    pub fn append(&self, record: &AnalysisRecord) -> Result<(), StoreError> {
        let flags = record.flag_values();
        self.conn.execute(
            INSERT_SQL,
            params![
                record.analysis_tag,
                record.root_folder,
                record.file_path,
                record.file_name,
                record.file_extension,
                record.architecture.as_str(),
                record.file_hash,
                flags[0],
                flags[1],
                flags[2],
                flags[3],
                flags[4],
                flags[5],
                flags[6],
                flags[7],
                flags[8],
                flags[9],
                flags[10],
            ],
        )?;
        Ok(())
    }

    /// Full snapshot of the record set, in insertion order.
    pub fn all_records(&self) -> Result<Vec<AnalysisRecord>, StoreError> {
        let mut stmt = self.conn.prepare(SELECT_SQL)?;
        let rows = stmt.query_map([], |row| {
            Ok(AnalysisRecord {
                analysis_tag: row.get(0)?,
                root_folder: row.get(1)?,
                file_path: row.get(2)?,
                file_name: row.get(3)?,
                file_extension: row.get(4)?,
                architecture: Architecture::from_label(&row.get::<_, String>(5)?),
                file_hash: row.get(6)?,
                flags: MitigationFlags {
                    aslr: row.get(7)?,
                    dep: row.get(8)?,
                    no_seh: row.get(9)?,
                    cfg: row.get(10)?,
                    high_entropy_aslr: row.get(11)?,
                    force_integrity: row.get(12)?,
                    no_isolation: row.get(13)?,
                    no_bind: row.get(14)?,
                    app_container: row.get(15)?,
                    wdm_driver: row.get(16)?,
                    terminal_server_aware: row.get(17)?,
                },
            })
        })?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Replay a batch of SQL statements into this store. Used to validate
    /// the replayable export against a fresh database.
    pub fn execute_script(&self, script: &str) -> Result<(), StoreError> {
        self.conn.execute_batch(script)?;
        Ok(())
    }
}
