//! OBJ0 - geometry container chunk.
//!
//! Holds the top-level groupings the format draws from: each container is
//! either a list of model (mesh) entries or a list of particle entries,
//! selected by a flag field, plus a bounding box.
//!
//! ## Layout
//! ```text
//! [0x00] ContainerCount            (u32 LE)
//! [0x04] Padding                   (4 bytes)
//! [0x08] Containers                (variable, back to back)
//! ```
//!
//! ## Container
//! ```text
//! [0x00] Type                      (u32 LE)
//! [0x04] Unused                    (u32 LE × 3)
//! [0x10] Flags                     (u32 LE)  0 = models, 1..=2 = particles
//! [0x14] EntryCount                (u32 LE)
//! [0x18] BBox min                  (f32 LE × 3)
//! [0x24] BBox max                  (f32 LE × 3)
//! [0x30] Entries                   (variable)
//! ```
//! A flags value outside `0..=2` is a real, silent case in shipped files:
//! no entries are consumed and the container is exposed as
//! [`ContainerContents::Unknown`].
//!
//! ## ParticleEntry
//! ```text
//! [0x00] Material id               (u32 LE)
//! [0x04] ParticleCount             (u32 LE)
//! [0x08] Particles                 (ParticleCount × 0x18 bytes)
//!        { pos f32×3, scale f32×2, color u8×4 stored B,G,R,A }
//! ```
//!
//! ## ModelEntry
//! ```text
//! [0x00] Material id               (u32 LE)
//! [0x04] VertexCount               (u32 LE)
//! [0x08] VertexSize (stride)       (u32 LE)
//! [0x0C] BlockCount                (u32 LE)  at most 9 are meaningful
//! [0x10] VertexBlock ids           (u32 LE × 9, fixed slots)
//! [0x34] First Strip record        (0x50 bytes, inline)
//! ```
//!
//! ## Strip record (0x50 bytes)
//! ```text
//! [0x00] NextOffset                (u32 LE)  absolute; 0 terminates chain
//! [0x04] Unknown                   (u32 LE)
//! [0x08] IndicesCount              (u16 LE)
//! [0x0A] IndicesCount (duplicate)  (u16 LE)
//! [0x0C] Unknown                   (44 bytes)
//! [0x38] Unknown                   (u32 LE × 4)
//! [0x48] IndicesOffset             (u32 LE)  element offset into the
//!                                            shared index buffer
//! [0x4C] Unknown                   (u32 LE)
//! ```
//! Strips after the first are reached by chasing `NextOffset`. The walk is
//! bounded and every target is range-checked; the cursor is restored to just
//! past the inline record so the next container parses from the right spot.

use std::io::{Read, Seek, SeekFrom};

use glam::{Vec2, Vec3};

use crate::utils::{bytesa, le_f32, le_u16, le_u32, skip};
use crate::{Error, Result};

/// Number of fixed vertex-block id slots in a model entry.
pub const MAX_VERTEX_BLOCKS: usize = 9;

/// Upper bound on strip-chain hops. Corrupt files with cyclic `NextOffset`
/// chains would otherwise loop forever.
pub const MAX_STRIP_CHAIN: usize = 1024;

/// Axis-aligned bounding box carried by every container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

/// Parsed OBJ0 chunk.
#[derive(Debug, Clone)]
pub struct Obj0 {
    /// All containers in declaration order.
    pub containers: Vec<Container>,
}

/// One geometry/particle grouping.
#[derive(Debug, Clone)]
pub struct Container {
    /// Type word from the container header.
    pub type_id: u32,
    /// Raw flags word (also encoded in `contents`).
    pub flags: u32,
    /// Bounding box over the container's geometry.
    pub bounds: Aabb,
    /// Entries, tagged by the flags branch that produced them.
    pub contents: ContainerContents,
}

/// Contents of a container, selected by its flags word.
#[derive(Debug, Clone)]
pub enum ContainerContents {
    /// `flags == 0`: mesh entries.
    Models(Vec<ModelEntry>),
    /// `flags` in `1..=2`: particle entries.
    Particles(Vec<ParticleEntry>),
    /// Any other flags value: no entries are consumed. Whether this is a
    /// third container kind or a gap in the format is unresolved; the raw
    /// flags value is preserved for inspection.
    Unknown(u32),
}

/// A particle emitter entry.
#[derive(Debug, Clone)]
pub struct ParticleEntry {
    /// Material reference id.
    pub material: u32,
    /// Particles in declaration order.
    pub particles: Vec<Particle>,
}

/// A single particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// World position.
    pub position: Vec3,
    /// Billboard scale.
    pub scale: Vec2,
    /// Color, exposed as R,G,B,A (stored on disk as B,G,R,A).
    pub color: [u8; 4],
}

/// A mesh entry.
#[derive(Debug, Clone)]
pub struct ModelEntry {
    /// Material reference id.
    pub material: u32,
    /// Number of vertices in the entry's vertex block.
    pub vertex_count: u32,
    /// Byte stride between vertices.
    pub vertex_size: u32,
    /// Vertex-block ids, truncated to [`MAX_VERTEX_BLOCKS`].
    pub vertex_blocks: Vec<u32>,
    /// Strip records, inline first then chain order.
    pub strips: Vec<Strip>,
}

/// A triangle-strip draw range referencing the shared index buffer.
#[derive(Debug, Clone, Copy)]
pub struct Strip {
    /// Number of strip entries (not triangles).
    pub indices_count: u16,
    /// Element offset into the shared index buffer.
    pub indices_offset: u32,
}

impl Strip {
    /// On-disk record size including the `NextOffset` link.
    pub const RECORD_SIZE: u64 = 0x50;

    /// Read one strip record; returns the strip and its `NextOffset` link.
    fn parse<R: Read + Seek>(r: &mut R) -> Result<(Self, u32)> {
        let next_offset = le_u32(r)?;
        let _unk0 = le_u32(r)?;
        let indices_count = le_u16(r)?;
        let _indices_count_dup = le_u16(r)?;
        let _unk2 = bytesa::<44>(r)?;
        for _ in 0..4 {
            let _unk = le_u32(r)?;
        }
        let indices_offset = le_u32(r)?;
        let _unk7 = le_u32(r)?;
        Ok((
            Self {
                indices_count,
                indices_offset,
            },
            next_offset,
        ))
    }
}

impl Obj0 {
    /// Parse an OBJ0 chunk body from `r`.
    ///
    /// `stream_len` bounds the strip-chain offsets (they are absolute file
    /// offsets and may point anywhere in the stream).
    pub fn parse<R: Read + Seek>(r: &mut R, stream_len: u64) -> Result<Self> {
        let count = le_u32(r)?;
        skip(r, 4)?;
        let mut containers = Vec::with_capacity(count as usize);
        for _ in 0..count {
            containers.push(Container::parse(r, stream_len)?);
        }
        Ok(Self { containers })
    }
}

impl Container {
    fn parse<R: Read + Seek>(r: &mut R, stream_len: u64) -> Result<Self> {
        let type_id = le_u32(r)?;
        skip(r, 12)?;
        let flags = le_u32(r)?;
        let entry_count = le_u32(r)?;
        let bounds = Aabb {
            min: read_vec3(r)?,
            max: read_vec3(r)?,
        };

        let contents = match flags {
            0 => {
                let mut models = Vec::with_capacity(entry_count as usize);
                for _ in 0..entry_count {
                    models.push(ModelEntry::parse(r, stream_len)?);
                }
                ContainerContents::Models(models)
            }
            1..=2 => {
                let mut entries = Vec::with_capacity(entry_count as usize);
                for _ in 0..entry_count {
                    entries.push(ParticleEntry::parse(r)?);
                }
                ContainerContents::Particles(entries)
            }
            other => ContainerContents::Unknown(other),
        };

        Ok(Self {
            type_id,
            flags,
            bounds,
            contents,
        })
    }

    /// Model entries, or an empty slice for particle/unknown containers.
    pub fn models(&self) -> &[ModelEntry] {
        match &self.contents {
            ContainerContents::Models(m) => m,
            _ => &[],
        }
    }

    /// Particle entries, or an empty slice for model/unknown containers.
    pub fn particle_entries(&self) -> &[ParticleEntry] {
        match &self.contents {
            ContainerContents::Particles(p) => p,
            _ => &[],
        }
    }
}

impl ParticleEntry {
    fn parse<R: Read + Seek>(r: &mut R) -> Result<Self> {
        let material = le_u32(r)?;
        let count = le_u32(r)?;
        let mut particles = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let position = read_vec3(r)?;
            let scale = Vec2::new(le_f32(r)?, le_f32(r)?);
            let [b, g, r_, a] = bytesa::<4>(r)?;
            particles.push(Particle {
                position,
                scale,
                color: [r_, g, b, a],
            });
        }
        Ok(Self {
            material,
            particles,
        })
    }
}

impl ModelEntry {
    fn parse<R: Read + Seek>(r: &mut R, stream_len: u64) -> Result<Self> {
        let material = le_u32(r)?;
        let vertex_count = le_u32(r)?;
        let vertex_size = le_u32(r)?;
        let block_count = le_u32(r)?;

        // The file always stores 9 id slots; a larger declared count is
        // truncated and the surplus slots are skipped with the rest.
        let keep = (block_count as usize).min(MAX_VERTEX_BLOCKS);
        let mut vertex_blocks = Vec::with_capacity(keep);
        for _ in 0..keep {
            vertex_blocks.push(le_u32(r)?);
        }
        skip(r, ((MAX_VERTEX_BLOCKS - keep) * 4) as u64)?;

        let (first, mut next) = Strip::parse(r)?;
        let resume = r.stream_position()?;
        let mut strips = vec![first];

        let mut hops = 0usize;
        while next != 0 {
            hops += 1;
            if hops > MAX_STRIP_CHAIN {
                return Err(Error::Parse("strip chain exceeds hop limit"));
            }
            let target = next as u64;
            if target + Strip::RECORD_SIZE > stream_len {
                return Err(Error::OutOfBounds);
            }
            r.seek(SeekFrom::Start(target))?;
            let (strip, link) = Strip::parse(r)?;
            strips.push(strip);
            next = link;
        }

        r.seek(SeekFrom::Start(resume))?;
        Ok(Self {
            material,
            vertex_count,
            vertex_size,
            vertex_blocks,
            strips,
        })
    }
}

fn read_vec3<R: Read>(r: &mut R) -> Result<Vec3> {
    Ok(Vec3::new(le_f32(r)?, le_f32(r)?, le_f32(r)?))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn put_u32(out: &mut Vec<u8>, v: u32) {
        out.extend_from_slice(&v.to_le_bytes());
    }

    fn put_f32(out: &mut Vec<u8>, v: f32) {
        out.extend_from_slice(&v.to_le_bytes());
    }

    fn put_container_header(out: &mut Vec<u8>, flags: u32, entry_count: u32) {
        put_u32(out, 7); // type
        for _ in 0..3 {
            put_u32(out, 0);
        }
        put_u32(out, flags);
        put_u32(out, entry_count);
        for v in [-1.0f32, -2.0, -3.0, 1.0, 2.0, 3.0] {
            put_f32(out, v);
        }
    }

    fn put_strip(out: &mut Vec<u8>, next: u32, count: u16, offset: u32) {
        put_u32(out, next);
        put_u32(out, 0); // unk0
        out.extend_from_slice(&count.to_le_bytes());
        out.extend_from_slice(&count.to_le_bytes());
        out.extend_from_slice(&[0u8; 44]);
        for _ in 0..4 {
            put_u32(out, 0);
        }
        put_u32(out, offset);
        put_u32(out, 0); // unk7
    }

    fn put_model_entry(out: &mut Vec<u8>, blocks: &[u32], declared: u32) {
        put_u32(out, 3); // material
        put_u32(out, 4); // vertex_count
        put_u32(out, 16); // vertex_size
        put_u32(out, declared);
        for i in 0..MAX_VERTEX_BLOCKS {
            put_u32(out, blocks.get(i).copied().unwrap_or(0xDEAD));
        }
        put_strip(out, 0, 5, 0);
    }

    #[test]
    fn unknown_flags_consume_no_entries() {
        let mut body = Vec::new();
        put_u32(&mut body, 1);
        put_u32(&mut body, 0); // padding
        put_container_header(&mut body, 5, 3);
        let obj0 = Obj0::parse(&mut Cursor::new(&body), body.len() as u64).unwrap();
        let c = &obj0.containers[0];
        assert!(matches!(c.contents, ContainerContents::Unknown(5)));
        assert!(c.models().is_empty());
        assert!(c.particle_entries().is_empty());
        assert_eq!(c.bounds.min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(c.bounds.max, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn particle_colors_are_swapped_to_rgba() {
        let mut body = Vec::new();
        put_u32(&mut body, 1);
        put_u32(&mut body, 0);
        put_container_header(&mut body, 2, 1);
        put_u32(&mut body, 11); // material
        put_u32(&mut body, 1); // particle count
        for v in [1.0f32, 2.0, 3.0, 0.5, 0.25] {
            put_f32(&mut body, v);
        }
        body.extend_from_slice(&[10, 20, 30, 40]); // B,G,R,A on disk

        let obj0 = Obj0::parse(&mut Cursor::new(&body), body.len() as u64).unwrap();
        let entries = obj0.containers[0].particle_entries();
        assert_eq!(entries[0].material, 11);
        let p = entries[0].particles[0];
        assert_eq!(p.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(p.scale, Vec2::new(0.5, 0.25));
        assert_eq!(p.color, [30, 20, 10, 40]);
    }

    #[test]
    fn block_count_truncates_to_nine_slots() {
        let mut body = Vec::new();
        put_u32(&mut body, 1);
        put_u32(&mut body, 0);
        put_container_header(&mut body, 0, 1);
        let entry_start = body.len();
        put_model_entry(&mut body, &[1, 2, 3, 4, 5, 6, 7, 8, 9], 12);
        let entry_end = body.len();

        let mut c = Cursor::new(&body);
        let obj0 = Obj0::parse(&mut c, body.len() as u64).unwrap();
        let model = &obj0.containers[0].models()[0];
        assert_eq!(model.vertex_blocks, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
        // Cursor landed exactly past the entry despite the oversized count.
        assert_eq!(c.position() as usize, entry_end);
        assert_eq!(entry_end - entry_start, 0x34 + 0x50);
    }

    #[test]
    fn strip_chain_is_followed_and_cursor_restored() {
        let mut body = Vec::new();
        put_u32(&mut body, 1);
        put_u32(&mut body, 0);
        put_container_header(&mut body, 0, 1);

        // Inline record links to a second record appended past the entry.
        put_u32(&mut body, 2); // material
        put_u32(&mut body, 8); // vertex_count
        put_u32(&mut body, 12); // vertex_size
        put_u32(&mut body, 1); // block count
        for i in 0..MAX_VERTEX_BLOCKS as u32 {
            put_u32(&mut body, i);
        }
        let link_patch = body.len();
        put_strip(&mut body, 0, 10, 100);
        let entry_end = body.len();
        let second_at = body.len() as u32;
        put_strip(&mut body, 0, 20, 200);
        body[link_patch..link_patch + 4].copy_from_slice(&second_at.to_le_bytes());

        let mut c = Cursor::new(&body);
        let obj0 = Obj0::parse(&mut c, body.len() as u64).unwrap();
        let model = &obj0.containers[0].models()[0];
        assert_eq!(model.strips.len(), 2);
        assert_eq!(model.strips[0].indices_count, 10);
        assert_eq!(model.strips[0].indices_offset, 100);
        assert_eq!(model.strips[1].indices_count, 20);
        assert_eq!(model.strips[1].indices_offset, 200);
        assert_eq!(c.position() as usize, entry_end);
    }

    #[test]
    fn nonsense_chain_offset_is_out_of_bounds() {
        let mut body = Vec::new();
        put_u32(&mut body, 1);
        put_u32(&mut body, 0);
        put_container_header(&mut body, 0, 1);
        put_u32(&mut body, 2);
        put_u32(&mut body, 8);
        put_u32(&mut body, 12);
        put_u32(&mut body, 1);
        for _ in 0..MAX_VERTEX_BLOCKS {
            put_u32(&mut body, 0);
        }
        put_strip(&mut body, 0x00FF_FFFF, 10, 100); // link far past EOF

        let err = Obj0::parse(&mut Cursor::new(&body), body.len() as u64).unwrap_err();
        assert!(matches!(err, crate::Error::OutOfBounds));
    }
}
