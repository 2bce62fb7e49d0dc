//! Geometry reconstruction: triangle-strip decoding and mesh assembly.
//!
//! Everything here is pure computation over already-parsed data; no I/O.

pub mod mesh;
pub mod strip;

pub use mesh::{MeshData, assemble_mesh};
pub use strip::unstrip;
