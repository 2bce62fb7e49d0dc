//! **nup20** - a reader for the proprietary NUP/NU20 chunk-based geometry
//! container format.
//!
//! The format is a flat stream of named, length-prefixed chunks behind a
//! fixed header. [`NupFile`] locates and parses the five known chunks and
//! owns the result as an immutable snapshot; the [`geometry`] module turns
//! the raw buffers into renderable triangle meshes (triangle-strip decoding
//! with alternating winding, stride-walked vertex positions).
//!
//! # Chunks
//! | Module             | Tag    | Contents |
//! |--------------------|--------|----------|
//! | [`chunks::ntbl`]   | `NTBL` | String table (opaque) |
//! | [`chunks::obj0`]   | `OBJ0` | Geometry containers: models or particles |
//! | [`chunks::ms00`]   | `MS00` | Material table |
//! | [`chunks::vbib`]   | `VBIB` | Vertex and index buffers |
//! | [`chunks::inst`]   | `INST` | Placed instances |
//!
//! # Example
//! ```no_run
//! use std::fs::File;
//! use nup20::NupFile;
//!
//! # fn main() -> nup20::Result<()> {
//! let mut file = File::open("level.nup")?;
//! let doc = NupFile::parse(&mut file)?;
//! if !doc.is_valid() {
//!     return Ok(()); // a required chunk was missing
//! }
//! for container in &doc.containers {
//!     for entry in container.models() {
//!         let mesh = doc.mesh(entry)?;
//!         println!("{} vertices, {} triangles", mesh.positions.len(), mesh.triangles.len());
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Reading is the only supported direction; nothing here writes or
//! re-encodes the format.

pub mod chunks;
pub mod document;
pub mod error;
pub mod geometry;
pub mod sink;
pub mod utils;

pub use document::NupFile;
pub use error::{Error, Result};
pub use sink::{FacadeSink, LogSink, NopSink};
