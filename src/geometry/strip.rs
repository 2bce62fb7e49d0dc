//! Triangle-strip decoding.
//!
//! This is the only place strip topology is interpreted; everything else
//! treats index runs as opaque.

use crate::{Error, Result};

/// Convert a triangle-strip index run into an explicit triangle list.
///
/// `offset` and `count` select the run `tristrip[offset..offset + count]`;
/// `count` is the number of strip entries, not triangles. For each `i` in
/// `offset + 2 .. offset + count` one triangle is emitted, with the winding
/// flipped on odd `i` so facing stays consistent:
///
/// * `i` even: `(tristrip[i-2], tristrip[i-1], tristrip[i])`
/// * `i` odd:  `(tristrip[i],   tristrip[i-1], tristrip[i-2])`
///
/// The parity is that of the absolute index `i`, not of `i - offset`.
/// Triangles whose first/second or second/third vertices coincide are
/// strip-restart markers and are dropped. A run with `count < 2` yields an
/// empty list; a run extending past the slice is [`Error::OutOfBounds`].
pub fn unstrip(tristrip: &[u16], offset: usize, count: usize) -> Result<Vec<[u16; 3]>> {
    let end = offset
        .checked_add(count)
        .filter(|&e| e <= tristrip.len())
        .ok_or(Error::OutOfBounds)?;
    if count < 2 {
        return Ok(Vec::new());
    }

    let mut triangles = Vec::with_capacity(count.saturating_sub(2));
    for i in offset + 2..end {
        let tri = if i % 2 == 0 {
            [tristrip[i - 2], tristrip[i - 1], tristrip[i]]
        } else {
            [tristrip[i], tristrip[i - 1], tristrip[i - 2]]
        };
        // Adjacent duplicates mark a strip restart, not a real triangle.
        if tri[0] == tri[1] || tri[1] == tri[2] {
            continue;
        }
        triangles.push(tri);
    }
    Ok(triangles)
}
