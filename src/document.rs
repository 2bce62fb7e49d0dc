//! The parsed NUP document: chunk orchestration and ownership.

use std::io::{Read, Seek, SeekFrom};

use crate::chunks::inst::{Inst, Instance};
use crate::chunks::ms00::{Material, Ms00};
use crate::chunks::ntbl::StringTable;
use crate::chunks::obj0::{Container, ModelEntry, Obj0};
use crate::chunks::vbib::{IBuffer, VBuffer, Vbib};
use crate::chunks::{FileHeader, INST, MS00, NTBL, OBJ0, VBIB, find_chunk};
use crate::geometry::mesh::{MeshData, assemble_mesh};
use crate::sink::{FacadeSink, LogSink};
use crate::utils::stream_len;
use crate::{Error, Result};

/// A fully parsed NUP/NU20 file.
///
/// Built in one pass over the stream and immutable afterwards. Chunks are
/// parsed in strict order `NTBL -> OBJ0 -> MS00 -> VBIB -> INST`; the first
/// missing chunk stops parsing and leaves the document invalid. Callers must
/// check [`is_valid`](Self::is_valid) before using accessors - accessors
/// assume a valid document and do not re-check.
#[derive(Debug)]
pub struct NupFile {
    /// File header (magic already verified).
    pub header: FileHeader,
    /// String table blob; `None` when parsing stopped before NTBL completed.
    pub string_table: Option<StringTable>,
    /// Geometry containers from OBJ0.
    pub containers: Vec<Container>,
    /// Material table from MS00.
    pub materials: Vec<Material>,
    /// Vertex buffers from VBIB.
    pub vertex_buffers: Vec<VBuffer>,
    /// Index buffers from VBIB.
    pub index_buffers: Vec<IBuffer>,
    /// Placed instances from INST.
    pub instances: Vec<Instance>,
    valid: bool,
}

impl NupFile {
    /// Parse a document, logging through the [`log`] crate facade.
    ///
    /// Returns [`Error::BadMagic`] if the stream is not a NU20 file at all;
    /// a structurally sound file with missing chunks parses to an *invalid*
    /// document instead (historically some files omit sections).
    pub fn parse<R: Read + Seek>(r: &mut R) -> Result<Self> {
        Self::parse_with(r, &FacadeSink)
    }

    /// Parse a document with an explicit logging sink.
    ///
    /// The reader may be positioned anywhere; parsing seeks to 0 and
    /// re-derives everything.
    pub fn parse_with<R: Read + Seek>(r: &mut R, sink: &dyn LogSink) -> Result<Self> {
        let len = stream_len(r)?;
        let header = FileHeader::parse(r)?;

        let mut doc = Self {
            header,
            string_table: None,
            containers: Vec::new(),
            materials: Vec::new(),
            vertex_buffers: Vec::new(),
            index_buffers: Vec::new(),
            instances: Vec::new(),
            valid: false,
        };

        let Some(at) = find_chunk(r, len, NTBL)? else {
            return Ok(doc.missing("NTBL", sink));
        };
        r.seek(SeekFrom::Start(at))?;
        let table = StringTable::parse(r)?;
        sink.info(format_args!("NTBL: {} bytes", table.bytes.len()));
        doc.string_table = Some(table);

        let Some(at) = find_chunk(r, len, OBJ0)? else {
            return Ok(doc.missing("OBJ0", sink));
        };
        r.seek(SeekFrom::Start(at))?;
        doc.containers = Obj0::parse(r, len)?.containers;
        sink.info(format_args!("OBJ0: {} containers", doc.containers.len()));

        let Some(at) = find_chunk(r, len, MS00)? else {
            return Ok(doc.missing("MS00", sink));
        };
        r.seek(SeekFrom::Start(at))?;
        doc.materials = Ms00::parse(r)?.materials;
        sink.info(format_args!("MS00: {} materials", doc.materials.len()));

        let Some(at) = find_chunk(r, len, VBIB)? else {
            return Ok(doc.missing("VBIB", sink));
        };
        r.seek(SeekFrom::Start(at))?;
        let vbib = Vbib::parse(r, at)?;
        sink.info(format_args!(
            "VBIB: {} vertex buffers, {} index buffers",
            vbib.vertex_buffers.len(),
            vbib.index_buffers.len()
        ));
        doc.vertex_buffers = vbib.vertex_buffers;
        doc.index_buffers = vbib.index_buffers;

        let Some(at) = find_chunk(r, len, INST)? else {
            return Ok(doc.missing("INST", sink));
        };
        r.seek(SeekFrom::Start(at))?;
        doc.instances = Inst::parse(r)?.instances;
        sink.info(format_args!("INST: {} instances", doc.instances.len()));

        doc.valid = true;
        Ok(doc)
    }

    fn missing(self, tag: &str, sink: &dyn LogSink) -> Self {
        sink.warn(format_args!("{tag} chunk not found; document is invalid"));
        self
    }

    /// Whether every required chunk was present and parsed.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Number of containers, as referenced by instance mesh ids.
    pub fn container_count(&self) -> u32 {
        self.containers.len() as u32
    }

    /// Look up a vertex buffer by its id.
    pub fn vertex_buffer(&self, id: u32) -> Option<&VBuffer> {
        self.vertex_buffers.iter().find(|b| b.header.id == id)
    }

    /// Look up an index buffer by its id.
    pub fn index_buffer(&self, id: u32) -> Option<&IBuffer> {
        self.index_buffers.iter().find(|b| b.header.id == id)
    }

    /// Assemble renderable geometry for one model entry.
    ///
    /// Resolves the entry's vertex block against the vertex-buffer table and
    /// pairs it with the file's shared index buffer, then hands both to
    /// [`assemble_mesh`]. Strips address the shared buffer by element
    /// offset, so the first index buffer serves every entry.
    pub fn mesh(&self, entry: &ModelEntry) -> Result<MeshData> {
        if entry.strips.len() != 1 || entry.vertex_blocks.len() != 1 {
            return Err(Error::UnsupportedTopology {
                strips: entry.strips.len(),
                blocks: entry.vertex_blocks.len(),
            });
        }
        let vbuffer = self
            .vertex_buffer(entry.vertex_blocks[0])
            .ok_or(Error::Parse("vertex block id not in buffer table"))?;
        let ibuffer = self
            .index_buffers
            .first()
            .ok_or(Error::Parse("no index buffer in document"))?;
        assemble_mesh(entry, vbuffer, ibuffer)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::fmt;
    use std::io::Cursor;

    use super::*;
    use crate::sink::NopSink;

    /// Sink that records messages for assertions.
    #[derive(Default)]
    struct RecordingSink {
        infos: RefCell<Vec<String>>,
        warns: RefCell<Vec<String>>,
    }

    impl LogSink for RecordingSink {
        fn info(&self, args: fmt::Arguments<'_>) {
            self.infos.borrow_mut().push(args.to_string());
        }

        fn warn(&self, args: fmt::Arguments<'_>) {
            self.warns.borrow_mut().push(args.to_string());
        }
    }

    fn put_chunk(out: &mut Vec<u8>, name: [u8; 4], body: &[u8]) {
        out.extend_from_slice(&name);
        out.extend_from_slice(&((body.len() as u32 + 8).to_le_bytes()));
        out.extend_from_slice(body);
    }

    fn empty_table() -> Vec<u8> {
        let mut b = 0u32.to_le_bytes().to_vec();
        b.extend_from_slice(&0u32.to_le_bytes());
        b
    }

    fn minimal_file(tags: &[[u8; 4]]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"NU20");
        out.extend_from_slice(&(-100i32).to_le_bytes());
        out.extend_from_slice(&1u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        for &tag in tags {
            let body = match tag {
                NTBL => 0u32.to_le_bytes().to_vec(),
                VBIB => vec![0u8; 0x28],
                _ => empty_table(),
            };
            put_chunk(&mut out, tag, &body);
        }
        out
    }

    #[test]
    fn all_chunks_present_is_valid() {
        let data = minimal_file(&[NTBL, OBJ0, MS00, VBIB, INST]);
        let sink = RecordingSink::default();
        let doc = NupFile::parse_with(&mut Cursor::new(data), &sink).unwrap();
        assert!(doc.is_valid());
        assert_eq!(doc.header.size, 100);
        assert!(doc.string_table.is_some());
        assert_eq!(sink.infos.borrow().len(), 5);
        assert!(sink.warns.borrow().is_empty());
    }

    #[test]
    fn chunk_order_in_file_does_not_matter() {
        let data = minimal_file(&[INST, VBIB, MS00, OBJ0, NTBL]);
        let doc = NupFile::parse_with(&mut Cursor::new(data), &NopSink).unwrap();
        assert!(doc.is_valid());
    }

    #[test]
    fn missing_vbib_marks_invalid_and_skips_inst() {
        // INST is present but must not be parsed once VBIB is missing.
        let data = minimal_file(&[NTBL, OBJ0, MS00, INST]);
        let sink = RecordingSink::default();
        let doc = NupFile::parse_with(&mut Cursor::new(data), &sink).unwrap();
        assert!(!doc.is_valid());
        assert!(doc.instances.is_empty());
        assert_eq!(sink.warns.borrow().len(), 1);
        assert!(sink.warns.borrow()[0].contains("VBIB"));
        // Earlier sections were still parsed.
        assert!(doc.string_table.is_some());
    }

    #[test]
    fn wrong_magic_aborts() {
        let mut data = minimal_file(&[NTBL, OBJ0, MS00, VBIB, INST]);
        data[0] = b'X';
        assert!(matches!(
            NupFile::parse_with(&mut Cursor::new(data), &NopSink),
            Err(Error::BadMagic)
        ));
    }

    #[test]
    fn reader_position_is_irrelevant() {
        let data = minimal_file(&[NTBL, OBJ0, MS00, VBIB, INST]);
        let mut c = Cursor::new(data);
        c.set_position(23);
        assert!(NupFile::parse_with(&mut c, &NopSink).unwrap().is_valid());
    }
}
