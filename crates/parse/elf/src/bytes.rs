//! Endian-aware byte-to-integer conversion.
//!
//! Reads a run of 1 to 4 (or 1 to 8) bytes at an arbitrary offset as an
//! unsigned integer in either byte order, rejecting widths the destination
//! cannot hold. Every read is bounds-checked against the slice.

use crate::DecodeError;

/// Byte order for multi-byte field reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Least significant byte first.
    Little,
    /// Most significant byte first.
    Big,
}

/// Decode `width` bytes of `data` starting at `offset` as a `u32`.
///
/// Bytes `[0xFE, 0xFF]` decode to `0xFEFF` big-endian and `0xFFFE`
/// little-endian. On any error no value is produced; there is no partial
/// accumulation observable to the caller.
///
/// # Errors
///
/// - [`DecodeError::EmptyInput`] if `data` is empty.
/// - [`DecodeError::BadArgument`] if `width` is zero or the read would run
///   past the end of `data`.
/// - [`DecodeError::Overflow`] if `width` exceeds 4 bytes.
pub fn read_u32(
    data: &[u8],
    offset: usize,
    width: usize,
    order: ByteOrder,
) -> Result<u32, DecodeError> {
    if data.is_empty() {
        return Err(DecodeError::EmptyInput);
    }
    if width == 0 {
        return Err(DecodeError::BadArgument);
    }
    if width > size_of::<u32>() {
        return Err(DecodeError::Overflow);
    }
    let end = offset.checked_add(width).ok_or(DecodeError::BadArgument)?;
    if end > data.len() {
        return Err(DecodeError::BadArgument);
    }

    let mut value: u32 = 0;
    match order {
        ByteOrder::Big => {
            for &byte in &data[offset..end] {
                value = (value << 8) | u32::from(byte);
            }
        }
        ByteOrder::Little => {
            for &byte in data[offset..end].iter().rev() {
                value = (value << 8) | u32::from(byte);
            }
        }
    }
    Ok(value)
}

/// Decode `width` bytes of `data` starting at `offset` as a `u64`.
///
/// Same contract as [`read_u32`] widened to an 8-byte destination. The value
/// is accumulated one byte at a time through [`read_u32`], which keeps the
/// two entry points byte-for-byte identical on shared widths.
///
/// # Errors
///
/// As [`read_u32`], with [`DecodeError::Overflow`] raised when `width`
/// exceeds 8 bytes.
pub fn read_u64(
    data: &[u8],
    offset: usize,
    width: usize,
    order: ByteOrder,
) -> Result<u64, DecodeError> {
    if data.is_empty() {
        return Err(DecodeError::EmptyInput);
    }
    if width == 0 {
        return Err(DecodeError::BadArgument);
    }
    if width > size_of::<u64>() {
        return Err(DecodeError::Overflow);
    }
    let end = offset.checked_add(width).ok_or(DecodeError::BadArgument)?;
    if end > data.len() {
        return Err(DecodeError::BadArgument);
    }

    let mut value: u64 = 0;
    match order {
        ByteOrder::Big => {
            for i in offset..end {
                value = (value << 8) | u64::from(read_u32(data, i, 1, order)?);
            }
        }
        ByteOrder::Little => {
            for i in (offset..end).rev() {
                value = (value << 8) | u64::from(read_u32(data, i, 1, order)?);
            }
        }
    }
    Ok(value)
}

/// Narrow a `u64` to a `u32`.
///
/// Used for rendering address fields of 32-bit-class files, where the field
/// was decoded from a 4-byte read and the narrowing can only fail on values
/// that never came from such a read.
///
/// # Errors
///
/// Returns [`DecodeError::Overflow`] if `value` exceeds `u32::MAX`.
pub fn narrow_u32(value: u64) -> Result<u32, DecodeError> {
    u32::try_from(value).map_err(|_| DecodeError::Overflow)
}

/// Best-effort variant of [`read_u32`]: decode failures default the field to
/// zero and are reported through the log facade.
pub(crate) fn read_u32_or_zero(
    data: &[u8],
    offset: usize,
    width: usize,
    order: ByteOrder,
    field: &str,
) -> u32 {
    read_u32(data, offset, width, order).unwrap_or_else(|err| {
        log::warn!("{field} at offset {offset:#x}: {err}, defaulting to 0");
        0
    })
}

/// Best-effort variant of [`read_u64`].
pub(crate) fn read_u64_or_zero(
    data: &[u8],
    offset: usize,
    width: usize,
    order: ByteOrder,
    field: &str,
) -> u64 {
    read_u64(data, offset, width, order).unwrap_or_else(|err| {
        log::warn!("{field} at offset {offset:#x}: {err}, defaulting to 0");
        0
    })
}
