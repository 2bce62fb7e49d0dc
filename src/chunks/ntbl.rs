//! NTBL - string table chunk.
//!
//! ## Layout
//! ```text
//! [0x00] Length      (u32 LE)
//! [0x04] Raw bytes   (Length bytes)
//! ```
//!
//! The blob is kept opaque: no string extraction is performed, but the chunk
//! must be present for a document to be valid.

use std::io::{Read, Seek};

use crate::Result;
use crate::utils::{bytesv, le_u32};

/// Opaque string-table blob.
#[derive(Debug, Clone)]
pub struct StringTable {
    /// Raw table bytes, exactly as stored.
    pub bytes: Vec<u8>,
}

impl StringTable {
    /// Parse an NTBL chunk body from `r`.
    pub fn parse<R: Read + Seek>(r: &mut R) -> Result<Self> {
        let length = le_u32(r)?;
        let bytes = bytesv(r, length as usize)?;
        Ok(Self { bytes })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::Error;

    #[test]
    fn reads_declared_length() {
        let mut body = 5u32.to_le_bytes().to_vec();
        body.extend_from_slice(b"abcde\xff\xff");
        let table = StringTable::parse(&mut Cursor::new(body)).unwrap();
        assert_eq!(table.bytes, b"abcde");
    }

    #[test]
    fn truncated_blob_errors() {
        let mut body = 9u32.to_le_bytes().to_vec();
        body.extend_from_slice(b"abc");
        assert!(matches!(
            StringTable::parse(&mut Cursor::new(body)),
            Err(Error::UnexpectedEof)
        ));
    }
}
