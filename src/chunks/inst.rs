//! INST - instance table chunk.
//!
//! ## Layout
//! ```text
//! [0x00] InstanceCount     (u32 LE)
//! [0x04] Padding           (4 bytes)
//! [0x08] Instances         (InstanceCount × 0x50 bytes)
//! ```
//!
//! ## Instance record (0x50 bytes)
//! ```text
//! [0x00] Transform         (f32 LE × 16, column-major 4x4)
//! [0x40] MeshId            (u32 LE)  container reference, see below
//! [0x44] Flags             (u32 LE)
//! [0x48] Reserved          (u32 LE × 2)
//! ```
//!
//! Some shipped files carry mesh ids beyond the container count; those ids
//! decode to a valid container once masked down to their low 20 bits. See
//! [`Instance::MESH_ID_MASK`].

use std::io::{Read, Seek};

use glam::Mat4;

use crate::Result;
use crate::utils::{le_f32, le_u32, skip};

/// Parsed INST chunk.
#[derive(Debug, Clone)]
pub struct Inst {
    /// Instances in table order.
    pub instances: Vec<Instance>,
}

/// A placed reference to a container with a world transform.
#[derive(Debug, Clone, Copy)]
pub struct Instance {
    /// World transform.
    pub transform: Mat4,
    /// Raw container reference id; resolve with
    /// [`resolved_mesh_id`](Self::resolved_mesh_id).
    pub mesh_id: u32,
    /// Instance flags.
    pub flags: u32,
}

impl Instance {
    /// Mask applied to out-of-range mesh ids.
    ///
    /// The 20-bit width is empirical: files with overflowed id fields decode
    /// to in-range containers under it, but it has not been verified against
    /// the format's authoring tools. Kept as a named constant so a future
    /// correction stays local.
    pub const MESH_ID_MASK: u32 = 0x000F_FFFF;

    fn parse<R: Read>(r: &mut R) -> Result<Self> {
        let mut m = [0.0f32; 16];
        for v in &mut m {
            *v = le_f32(r)?;
        }
        let transform = Mat4::from_cols_array(&m);
        let mesh_id = le_u32(r)?;
        let flags = le_u32(r)?;
        let _reserved0 = le_u32(r)?;
        let _reserved1 = le_u32(r)?;
        Ok(Self {
            transform,
            mesh_id,
            flags,
        })
    }

    /// Container id this instance references.
    ///
    /// Ids greater than `container_count` are a known malformation; the
    /// documented fallback masks them down with [`Self::MESH_ID_MASK`].
    /// In-range ids pass through untouched.
    pub fn resolved_mesh_id(&self, container_count: u32) -> u32 {
        if self.mesh_id > container_count {
            self.mesh_id & Self::MESH_ID_MASK
        } else {
            self.mesh_id
        }
    }
}

impl Inst {
    /// Parse an INST chunk body from `r`.
    pub fn parse<R: Read + Seek>(r: &mut R) -> Result<Self> {
        let count = le_u32(r)?;
        skip(r, 4)?;
        let mut instances = Vec::with_capacity(count as usize);
        for _ in 0..count {
            instances.push(Instance::parse(r)?);
        }
        Ok(Self { instances })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn put_instance(out: &mut Vec<u8>, mesh_id: u32) {
        for i in 0..16 {
            out.extend_from_slice(&(i as f32).to_le_bytes());
        }
        out.extend_from_slice(&mesh_id.to_le_bytes());
        out.extend_from_slice(&1u32.to_le_bytes()); // flags
        out.extend_from_slice(&[0u8; 8]); // reserved
    }

    #[test]
    fn parses_transform_and_ids() {
        let mut body = Vec::new();
        body.extend_from_slice(&2u32.to_le_bytes());
        body.extend_from_slice(&0u32.to_le_bytes());
        put_instance(&mut body, 3);
        put_instance(&mut body, 0x0030_0001);

        let mut c = Cursor::new(&body);
        let inst = Inst::parse(&mut c).unwrap();
        assert_eq!(inst.instances.len(), 2);
        assert_eq!(inst.instances[0].mesh_id, 3);
        assert_eq!(inst.instances[0].flags, 1);
        let m = inst.instances[0].transform.to_cols_array();
        assert_eq!(m[0], 0.0);
        assert_eq!(m[15], 15.0);
        assert_eq!(c.position() as usize, body.len());
    }

    #[test]
    fn out_of_range_mesh_id_is_masked() {
        let mut body = Vec::new();
        body.extend_from_slice(&1u32.to_le_bytes());
        body.extend_from_slice(&0u32.to_le_bytes());
        put_instance(&mut body, 0x0030_0001);
        let inst = Inst::parse(&mut Cursor::new(&body)).unwrap();
        let i = &inst.instances[0];
        // Beyond the container count: masked to the low 20 bits.
        assert_eq!(i.resolved_mesh_id(4), 0x0000_0001);
        // Within range: untouched.
        assert_eq!(i.resolved_mesh_id(0x0040_0000), 0x0030_0001);
    }
}
