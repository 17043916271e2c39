//! The byte orders used on disk.
//!
//! ICO directory fields are little-endian and PNG header fields are
//! big-endian, whatever the host order.  Both are read and written through
//! `byteorder`, which picks the swapping strategy for the host at compile
//! time.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

//===========================================================================//

/// The byte order of every multi-byte field in an ICO directory.
pub type IcoOrder = LittleEndian;

/// The byte order of every multi-byte field in a PNG chunk.
pub type PngOrder = BigEndian;

//===========================================================================//

/// Reads the big-endian 32-bit value stored at `offset` in `bytes`, or
/// returns `None` if the slice is too short.
pub fn read_be32(bytes: &[u8], offset: usize) -> Option<u32> {
    let end = offset.checked_add(4)?;
    bytes.get(offset..end).map(PngOrder::read_u32)
}

//===========================================================================//


//===========================================================================//
