//! Header-fields provider: the seam between the scan pipeline and the PE
//! container format.
//!
//! The pipeline only needs two fields out of the whole image: the COFF
//! machine type and the optional header's `DllCharacteristics`. Everything
//! about locating them inside the container is delegated to goblin behind
//! the [`HeaderSource`] trait so tests can substitute a fake provider.

use crate::error::HeaderError;
use goblin::pe::PE;

/// The two header fields the audit consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderFields {
    pub machine: u16,
    pub dll_characteristics: u16,
}

/// Anything that can produce [`HeaderFields`] from raw file bytes.
pub trait HeaderSource {
    fn read(&self, data: &[u8]) -> Result<HeaderFields, HeaderError>;
}

/// Production provider backed by goblin's PE parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoblinHeaders;

impl HeaderSource for GoblinHeaders {
    fn read(&self, data: &[u8]) -> Result<HeaderFields, HeaderError> {
        let pe = PE::parse(data).map_err(|e| HeaderError::Malformed(e.to_string()))?;
        let optional = pe
            .header
            .optional_header
            .ok_or(HeaderError::MissingOptionalHeader)?;
        Ok(HeaderFields {
            machine: pe.header.coff_header.machine,
            dll_characteristics: optional.windows_fields.dll_characteristics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_malformed() {
        let result = GoblinHeaders.read(b"");
        assert!(matches!(result, Err(HeaderError::Malformed(_))));
    }

    #[test]
    fn test_non_pe_bytes_are_malformed() {
        // ELF magic, then garbage: a misnamed .dll must fail parsing, not
        // panic and not produce fields.
        let mut data = vec![0x7f, b'E', b'L', b'F'];
        data.extend_from_slice(&[0u8; 128]);
        assert!(GoblinHeaders.read(&data).is_err());
    }

    #[test]
    fn test_truncated_dos_stub_is_malformed() {
        // Valid MZ magic but nothing after it.
        let data = b"MZ".to_vec();
        assert!(matches!(
            GoblinHeaders.read(&data),
            Err(HeaderError::Malformed(_))
        ));
    }
}
