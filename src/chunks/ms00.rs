//! MS00 - material table chunk.
//!
//! ## Layout
//! ```text
//! [0x00] MaterialCount     (u32 LE)
//! [0x04] Padding           (4 bytes)
//! [0x08] Materials         (MaterialCount × 0x214 bytes)
//! ```
//!
//! ## Material record (0x214 = 532 bytes)
//! ```text
//! [0x000] Flags            (u32 LE)
//! [0x004] Color RGBA       (f32 LE × 4)
//! [0x014] Flags2           (u32 LE)
//! [0x018] Texture ids      (i32 LE × 4)
//! [0x028] Vertex format    (u32 LE)
//! [0x02C] Reserved         (488 bytes, undecoded)
//! ```
//! Most of the record is undecoded placeholder space; the parser still
//! consumes exactly [`Material::RECORD_SIZE`] bytes per record so the table
//! walk never drifts.

use std::io::{Read, Seek};

use crate::Result;
use crate::utils::{le_f32, le_i32, le_u32, skip};

/// Parsed MS00 chunk.
#[derive(Debug, Clone)]
pub struct Ms00 {
    /// Materials in table order; referenced by id (= index) from model and
    /// particle entries.
    pub materials: Vec<Material>,
}

/// A single material record. Only raw ids are exposed; interpretation is the
/// renderer's business.
#[derive(Debug, Clone, Copy)]
pub struct Material {
    /// Primary flags word.
    pub flags: u32,
    /// Base color, R,G,B,A.
    pub color: [f32; 4],
    /// Secondary flags word.
    pub flags2: u32,
    /// Texture ids; negative means unset.
    pub textures: [i32; 4],
    /// Vertex-format word.
    pub vertex_format: u32,
}

impl Material {
    /// Fixed on-disk record size.
    pub const RECORD_SIZE: u64 = 532;

    /// Bytes consumed by the named fields above.
    const DECODED_SIZE: u64 = 4 + 16 + 4 + 16 + 4;

    fn parse<R: Read + Seek>(r: &mut R) -> Result<Self> {
        let flags = le_u32(r)?;
        let mut color = [0.0f32; 4];
        for c in &mut color {
            *c = le_f32(r)?;
        }
        let flags2 = le_u32(r)?;
        let mut textures = [0i32; 4];
        for t in &mut textures {
            *t = le_i32(r)?;
        }
        let vertex_format = le_u32(r)?;
        skip(r, Self::RECORD_SIZE - Self::DECODED_SIZE)?;
        Ok(Self {
            flags,
            color,
            flags2,
            textures,
            vertex_format,
        })
    }
}

impl Ms00 {
    /// Parse an MS00 chunk body from `r`.
    pub fn parse<R: Read + Seek>(r: &mut R) -> Result<Self> {
        let count = le_u32(r)?;
        skip(r, 4)?;
        let mut materials = Vec::with_capacity(count as usize);
        for _ in 0..count {
            materials.push(Material::parse(r)?);
        }
        Ok(Self { materials })
    }
}
