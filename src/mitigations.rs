//! Mitigation-flag decoding for the PE optional header.
//!
//! `DllCharacteristics` is a 16-bit field in the optional header where each
//! bit advertises one loader-visible hardening feature. Decoding is a fixed
//! bit-field contract: every recognized bit maps to exactly one flag, every
//! unrecognized bit is ignored.

use serde::{Deserialize, Serialize};

pub const IMAGE_DLLCHARACTERISTICS_HIGH_ENTROPY_VA: u16 = 0x0020;
pub const IMAGE_DLLCHARACTERISTICS_DYNAMIC_BASE: u16 = 0x0040;
pub const IMAGE_DLLCHARACTERISTICS_FORCE_INTEGRITY: u16 = 0x0080;
pub const IMAGE_DLLCHARACTERISTICS_NX_COMPAT: u16 = 0x0100;
pub const IMAGE_DLLCHARACTERISTICS_NO_ISOLATION: u16 = 0x0200;
pub const IMAGE_DLLCHARACTERISTICS_NO_SEH: u16 = 0x0400;
pub const IMAGE_DLLCHARACTERISTICS_NO_BIND: u16 = 0x0800;
pub const IMAGE_DLLCHARACTERISTICS_APPCONTAINER: u16 = 0x1000;
pub const IMAGE_DLLCHARACTERISTICS_WDM_DRIVER: u16 = 0x2000;
pub const IMAGE_DLLCHARACTERISTICS_GUARD_CF: u16 = 0x4000;
pub const IMAGE_DLLCHARACTERISTICS_TERMINAL_SERVER_AWARE: u16 = 0x8000;

/// The eleven mitigation flags advertised in `DllCharacteristics`.
///
/// Each field is `true` iff its designated bit is set. `no_seh` set means
/// the image declares it contains no SEH handlers, which removes the SEH
/// attack surface entirely; the bit being *clear* is the risk signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MitigationFlags {
    pub high_entropy_aslr: bool,
    pub aslr: bool,
    pub force_integrity: bool,
    pub dep: bool,
    pub no_isolation: bool,
    pub no_seh: bool,
    pub no_bind: bool,
    pub app_container: bool,
    pub wdm_driver: bool,
    pub cfg: bool,
    pub terminal_server_aware: bool,
}

impl MitigationFlags {
    /// Decode the `DllCharacteristics` field. Total over all 16-bit inputs.
    pub fn decode(characteristics: u16) -> Self {
        let bit = |mask: u16| characteristics & mask != 0;
        Self {
            high_entropy_aslr: bit(IMAGE_DLLCHARACTERISTICS_HIGH_ENTROPY_VA),
            aslr: bit(IMAGE_DLLCHARACTERISTICS_DYNAMIC_BASE),
            force_integrity: bit(IMAGE_DLLCHARACTERISTICS_FORCE_INTEGRITY),
            dep: bit(IMAGE_DLLCHARACTERISTICS_NX_COMPAT),
            no_isolation: bit(IMAGE_DLLCHARACTERISTICS_NO_ISOLATION),
            no_seh: bit(IMAGE_DLLCHARACTERISTICS_NO_SEH),
            no_bind: bit(IMAGE_DLLCHARACTERISTICS_NO_BIND),
            app_container: bit(IMAGE_DLLCHARACTERISTICS_APPCONTAINER),
            wdm_driver: bit(IMAGE_DLLCHARACTERISTICS_WDM_DRIVER),
            cfg: bit(IMAGE_DLLCHARACTERISTICS_GUARD_CF),
            terminal_server_aware: bit(IMAGE_DLLCHARACTERISTICS_TERMINAL_SERVER_AWARE),
        }
    }

    /// Whether any of the core guards {CFG, ASLR, DEP, no-SEH marker} is
    /// active. A file where none is active goes on the risk list.
    pub fn core_guard_active(&self) -> bool {
        self.cfg || self.aslr || self.dep || self.no_seh
    }
}
