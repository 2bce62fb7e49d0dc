//! Mesh assembly: one model entry + resolved buffers -> renderable geometry.

use glam::Vec3;

use crate::chunks::obj0::ModelEntry;
use crate::chunks::vbib::{IBuffer, VBuffer};
use crate::geometry::strip::unstrip;
use crate::{Error, Result};

/// CPU-side geometry produced from one model entry.
///
/// Positions plus triangle indices plus the material id, nothing more.
/// Normals are not stored in the source format; computing them is left to
/// whatever consumes this.
#[derive(Debug, Clone)]
pub struct MeshData {
    /// Material reference id, passed through untouched.
    pub material: u32,
    /// Vertex positions in entry order.
    pub positions: Vec<Vec3>,
    /// Triangle list of indices into `positions`.
    pub triangles: Vec<[u16; 3]>,
}

/// Build a [`MeshData`] from one model entry and its resolved buffers.
///
/// Only single-strip, single-block entries are supported; anything else is
/// [`Error::UnsupportedTopology`] rather than a silent mis-render.
///
/// Positions are decoded by walking `vbuffer.data` in `vertex_size`-byte
/// strides and reading the first 12 bytes of each stride as three
/// little-endian f32. The Y axis is negated on read; the consuming renderer
/// is right-handed Y-up while the format stores Y-down. This is a fixed
/// convention of the format, not a heuristic.
pub fn assemble_mesh(entry: &ModelEntry, vbuffer: &VBuffer, ibuffer: &IBuffer) -> Result<MeshData> {
    if entry.strips.len() != 1 || entry.vertex_blocks.len() != 1 {
        return Err(Error::UnsupportedTopology {
            strips: entry.strips.len(),
            blocks: entry.vertex_blocks.len(),
        });
    }

    let stride = entry.vertex_size as usize;
    if stride < 12 {
        return Err(Error::Parse("vertex stride below position size"));
    }

    let mut positions = Vec::with_capacity(entry.vertex_count as usize);
    for i in 0..entry.vertex_count as usize {
        let at = i * stride;
        let bytes = vbuffer
            .data
            .get(at..at + 12)
            .ok_or(Error::UnexpectedEof)?;
        let x = f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let y = f32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        let z = f32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
        positions.push(Vec3::new(x, -y, z));
    }

    let strip = &entry.strips[0];
    let triangles = unstrip(
        &ibuffer.indices,
        strip.indices_offset as usize,
        strip.indices_count as usize,
    )?;

    Ok(MeshData {
        material: entry.material,
        positions,
        triangles,
    })
}
