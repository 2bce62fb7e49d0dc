//! Parsers for the chunks of a NUP/NU20 container.
//!
//! Each submodule targets one chunk. All parsers follow the same
//! conventions:
//!
//! * **Generic over** [`std::io::Read`] + [`std::io::Seek`] - pass a
//!   [`std::fs::File`], a [`std::io::Cursor`], a memory-mapped region, or
//!   anything else that implements both traits.
//! * **One pass, exact spans** - each record parser consumes exactly its own
//!   byte span with no look-ahead across records.
//! * **Read-only** - nothing here writes or re-encodes the format.
//!
//! ## Container layout
//! ```text
//! [0x00] File header (0x10 bytes)
//! [0x10] Chunk stream: repeated { char[4] tag, u32 total_size } + body of
//!        total_size - 8 bytes, concatenated with no gaps, until EOF
//! ```
//!
//! ## File header (0x10 bytes)
//! ```text
//! [0x00] Magic "NU20"              (4 bytes)
//! [0x04] Size, stored negated      (i32 LE)
//! [0x08] Version                   (u32 LE)
//! [0x0C] Reserved                  (u32 LE)
//! ```
//!
//! ## Chunk overview
//!
//! | Module   | Tag    | Description |
//! |----------|--------|-------------|
//! | [`ntbl`] | `NTBL` | String table; opaque blob, presence required |
//! | [`obj0`] | `OBJ0` | Geometry containers: model or particle entries |
//! | [`ms00`] | `MS00` | Material table; fixed 532-byte records |
//! | [`vbib`] | `VBIB` | Vertex and index buffers, offset-located |
//! | [`inst`] | `INST` | Placed instances: transform + mesh reference |

pub mod inst;
pub mod ms00;
pub mod ntbl;
pub mod obj0;
pub mod vbib;

use std::io::{Read, Seek, SeekFrom};

use crate::utils::{le_i32, le_u32, magic, tag};
use crate::{Error, Result};

/// Tag of the string-table chunk.
pub const NTBL: [u8; 4] = *b"NTBL";
/// Tag of the geometry-container chunk.
pub const OBJ0: [u8; 4] = *b"OBJ0";
/// Tag of the material-table chunk.
pub const MS00: [u8; 4] = *b"MS00";
/// Tag of the vertex/index-buffer chunk.
pub const VBIB: [u8; 4] = *b"VBIB";
/// Tag of the instance-table chunk.
pub const INST: [u8; 4] = *b"INST";

/// Size of the file header preceding the chunk stream.
pub const FILE_HEADER_SIZE: u64 = 0x10;

/// Size of the `{tag, total_size}` header preceding every chunk body.
pub const CHUNK_HEADER_SIZE: u64 = 8;

/// Parsed NU20 file header.
#[derive(Debug, Clone, Copy)]
pub struct FileHeader {
    /// Declared size. Stored negated on disk; exposed here as the positive
    /// arithmetic negation.
    pub size: i32,
    /// Format version.
    pub version: u32,
    /// Reserved word.
    pub reserved: u32,
}

impl FileHeader {
    /// Parse the header at the very start of `r`.
    ///
    /// Returns [`Error::BadMagic`] if the first four bytes are not `"NU20"`;
    /// callers must abort before constructing a document in that case.
    pub fn parse<R: Read + Seek>(r: &mut R) -> Result<Self> {
        r.seek(SeekFrom::Start(0))?;
        magic(r, b"NU20")?;
        let size = le_i32(r)?;
        let version = le_u32(r)?;
        let reserved = le_u32(r)?;
        Ok(Self {
            size: -size,
            version,
            reserved,
        })
    }
}

/// Locate a chunk by tag.
///
/// Scans the chunk stream starting right after the file header, hopping from
/// header to header. On a match, returns `Ok(Some(offset))` where `offset`
/// is the absolute position of the chunk *body* (past the 8-byte chunk
/// header). Returns `Ok(None)` when the stream is exhausted without a match;
/// an absent chunk is an expected condition here and fatality is decided by
/// the caller.
///
/// `len` is the total stream length (see `utils::stream_len`).
pub fn find_chunk<R: Read + Seek>(r: &mut R, len: u64, wanted: [u8; 4]) -> Result<Option<u64>> {
    let mut pos = FILE_HEADER_SIZE;
    while pos + CHUNK_HEADER_SIZE <= len {
        r.seek(SeekFrom::Start(pos))?;
        let name = tag(r)?;
        let total_size = le_u32(r)? as u64;
        if name == wanted {
            return Ok(Some(pos + CHUNK_HEADER_SIZE));
        }
        if total_size < CHUNK_HEADER_SIZE {
            // A size below the header's own span would loop forever.
            return Err(Error::Parse("chunk size below header size"));
        }
        pos += total_size;
    }
    Ok(None)
}
