//! VBIB - vertex and index buffer chunk.
//!
//! ## Layout
//! ```text
//! [0x00] Header                    (0x28 bytes)
//! [VertexTableOffset]
//!        Vertex BufferHeaders      (VertexBufferCount × 0x0C bytes)
//! [IndexTableOffset]
//!        Index BufferHeaders       (IndexBufferCount × 0x0C bytes)
//! [...]  Payloads, located per buffer (see below)
//! ```
//!
//! ## Header (0x28 bytes, offsets relative to the chunk body start)
//! ```text
//! [0x00] VertexBufferCount         (u32 LE)
//! [0x04] VertexTableOffset         (u32 LE)
//! [0x08] VertexDataBase            (u32 LE)
//! [0x0C] IndexBufferCount          (u32 LE)
//! [0x10] IndexTableOffset          (u32 LE)
//! [0x14] IndexDataBase             (u32 LE)
//! [0x18] Reserved                  (u32 LE × 4)
//! ```
//!
//! ## BufferHeader (0x0C bytes)
//! ```text
//! [0x00] Size                      (u32 LE)  payload bytes
//! [0x04] Id                        (u32 LE)  referenced by vertex-block ids
//! [0x08] Offset                    (u32 LE)  relative to the region base
//! ```
//!
//! Payload location is `chunk_body_start + region_base + Offset`, where the
//! region base is `VertexDataBase` or `IndexDataBase` per buffer type.
//! Payloads are not guaranteed contiguous or in table order, so each one is
//! seeked to individually - never read sequentially.

use std::io::{Read, Seek, SeekFrom};

use crate::Result;
use crate::utils::{bytesv, le_u16, le_u32, skip};

/// Parsed VBIB chunk.
#[derive(Debug, Clone)]
pub struct Vbib {
    /// Vertex buffers in table order.
    pub vertex_buffers: Vec<VBuffer>,
    /// Index buffers in table order.
    pub index_buffers: Vec<IBuffer>,
}

/// Fixed per-buffer header record.
#[derive(Debug, Clone, Copy)]
pub struct BufferHeader {
    /// Payload size in bytes.
    pub size: u32,
    /// Buffer id.
    pub id: u32,
    /// Payload offset relative to the buffer-type region base.
    pub offset: u32,
}

/// A vertex buffer: header plus raw payload bytes. Interpretation of the
/// payload (stride, attribute layout) belongs to the model entry using it.
#[derive(Debug, Clone)]
pub struct VBuffer {
    /// Table record for this buffer.
    pub header: BufferHeader,
    /// Raw payload.
    pub data: Vec<u8>,
}

/// An index buffer: header plus `size / 2` decoded 16-bit indices.
#[derive(Debug, Clone)]
pub struct IBuffer {
    /// Table record for this buffer.
    pub header: BufferHeader,
    /// Decoded indices.
    pub indices: Vec<u16>,
}

impl BufferHeader {
    fn parse<R: Read>(r: &mut R) -> Result<Self> {
        Ok(Self {
            size: le_u32(r)?,
            id: le_u32(r)?,
            offset: le_u32(r)?,
        })
    }
}

impl Vbib {
    /// Parse a VBIB chunk body from `r`.
    ///
    /// `chunk_start` is the absolute offset of the chunk body (every offset
    /// in the chunk is relative to it); `r` must be positioned there.
    pub fn parse<R: Read + Seek>(r: &mut R, chunk_start: u64) -> Result<Self> {
        let vertex_count = le_u32(r)?;
        let vertex_table = le_u32(r)? as u64;
        let vertex_base = le_u32(r)? as u64;
        let index_count = le_u32(r)?;
        let index_table = le_u32(r)? as u64;
        let index_base = le_u32(r)? as u64;
        skip(r, 16)?;

        r.seek(SeekFrom::Start(chunk_start + vertex_table))?;
        let mut vertex_headers = Vec::with_capacity(vertex_count as usize);
        for _ in 0..vertex_count {
            vertex_headers.push(BufferHeader::parse(r)?);
        }

        r.seek(SeekFrom::Start(chunk_start + index_table))?;
        let mut index_headers = Vec::with_capacity(index_count as usize);
        for _ in 0..index_count {
            index_headers.push(BufferHeader::parse(r)?);
        }

        let mut vertex_buffers = Vec::with_capacity(vertex_headers.len());
        for header in vertex_headers {
            r.seek(SeekFrom::Start(chunk_start + vertex_base + header.offset as u64))?;
            let data = bytesv(r, header.size as usize)?;
            vertex_buffers.push(VBuffer { header, data });
        }

        let mut index_buffers = Vec::with_capacity(index_headers.len());
        for header in index_headers {
            r.seek(SeekFrom::Start(chunk_start + index_base + header.offset as u64))?;
            let count = header.size as usize / 2;
            let mut indices = Vec::with_capacity(count);
            for _ in 0..count {
                indices.push(le_u16(r)?);
            }
            index_buffers.push(IBuffer { header, indices });
        }

        Ok(Self {
            vertex_buffers,
            index_buffers,
        })
    }
}
