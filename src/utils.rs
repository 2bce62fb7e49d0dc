//! Low-level I/O primitives shared by all parsers.
//!
//! Each function reads exactly the bytes it promises or returns an error -
//! there is no partial-read ambiguity. The NU20 container is little-endian
//! by definition (it was produced on a little-endian platform); these
//! helpers fix that rather than inferring it from the data.

use std::io::{Read, Seek, SeekFrom};

use crate::{Error, Result};

/// Read a little-endian `u16`.
#[inline]
pub(crate) fn le_u16<R: Read>(r: &mut R) -> Result<u16> {
    let mut b = [0u8; 2];
    r.read_exact(&mut b)?;
    Ok(u16::from_le_bytes(b))
}

/// Read a little-endian `u32`.
#[inline]
pub(crate) fn le_u32<R: Read>(r: &mut R) -> Result<u32> {
    let mut b = [0u8; 4];
    r.read_exact(&mut b)?;
    Ok(u32::from_le_bytes(b))
}

/// Read a little-endian `i32`.
#[inline]
pub(crate) fn le_i32<R: Read>(r: &mut R) -> Result<i32> {
    let mut b = [0u8; 4];
    r.read_exact(&mut b)?;
    Ok(i32::from_le_bytes(b))
}

/// Read a little-endian `f32`.
#[inline]
pub(crate) fn le_f32<R: Read>(r: &mut R) -> Result<f32> {
    let mut b = [0u8; 4];
    r.read_exact(&mut b)?;
    Ok(f32::from_le_bytes(b))
}

/// Read exactly `N` bytes into a fixed-size array.
#[inline]
pub(crate) fn bytesa<const N: usize>(r: &mut impl Read) -> Result<[u8; N]> {
    let mut b = [0u8; N];
    r.read_exact(&mut b)?;
    Ok(b)
}

/// Read exactly `len` bytes into a `Vec`.
#[inline]
pub(crate) fn bytesv<R: Read>(r: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut b = vec![0u8; len];
    r.read_exact(&mut b)?;
    Ok(b)
}

/// Read a 4-byte chunk tag.
#[inline]
pub(crate) fn tag<R: Read>(r: &mut R) -> Result<[u8; 4]> {
    bytesa::<4>(r)
}

/// Verify that the next `N` bytes in the stream match `expected`.
///
/// Returns [`Error::BadMagic`] on mismatch.
#[inline]
pub(crate) fn magic<R: Read, const N: usize>(r: &mut R, expected: &[u8; N]) -> Result<()> {
    let got = bytesa::<N>(r)?;
    if &got != expected {
        return Err(Error::BadMagic);
    }
    Ok(())
}

/// Advance the cursor by `n` bytes without reading them.
#[inline]
pub(crate) fn skip<R: Seek>(r: &mut R, n: u64) -> Result<()> {
    r.seek(SeekFrom::Current(n as i64))?;
    Ok(())
}

/// Total stream length in bytes; the cursor position is preserved.
pub(crate) fn stream_len<R: Seek>(r: &mut R) -> Result<u64> {
    let pos = r.stream_position()?;
    let len = r.seek(SeekFrom::End(0))?;
    r.seek(SeekFrom::Start(pos))?;
    Ok(len)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn typed_reads_advance_exactly() {
        let mut c = Cursor::new(vec![0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07]);
        assert_eq!(le_u32(&mut c).unwrap(), 0x0403_0201);
        assert_eq!(le_u16(&mut c).unwrap(), 0x0605);
        // One byte left: any wider read is a truncated record.
        assert!(matches!(le_u16(&mut c), Err(Error::UnexpectedEof)));
    }

    #[test]
    fn stream_len_preserves_position() {
        let mut c = Cursor::new(vec![0u8; 32]);
        c.set_position(10);
        assert_eq!(stream_len(&mut c).unwrap(), 32);
        assert_eq!(c.position(), 10);
    }
}
