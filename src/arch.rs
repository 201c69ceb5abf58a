//! Machine-type resolution for the PE COFF header.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const IMAGE_FILE_MACHINE_I386: u16 = 0x014c;
pub const IMAGE_FILE_MACHINE_IA64: u16 = 0x0200;
pub const IMAGE_FILE_MACHINE_AMD64: u16 = 0x8664;

/// Canonical architecture label derived from the COFF machine field.
///
/// Total over all machine codes: anything outside the three known codes
/// resolves to `Unknown`, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Architecture {
    I386,
    Ia64,
    Amd64,
    Unknown,
}

impl Architecture {
    pub fn from_machine(code: u16) -> Self {
        match code {
            IMAGE_FILE_MACHINE_I386 => Architecture::I386,
            IMAGE_FILE_MACHINE_IA64 => Architecture::Ia64,
            IMAGE_FILE_MACHINE_AMD64 => Architecture::Amd64,
            _ => Architecture::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Architecture::I386 => "I386",
            Architecture::Ia64 => "IA64",
            Architecture::Amd64 => "AMD64",
            Architecture::Unknown => "Unknown",
        }
    }

    /// Parse a persisted label back into the enum. Unrecognized labels fold
    /// into `Unknown` so stale store rows can never fail a read.
    pub fn from_label(label: &str) -> Self {
        match label {
            "I386" => Architecture::I386,
            "IA64" => Architecture::Ia64,
            "AMD64" => Architecture::Amd64,
            _ => Architecture::Unknown,
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
