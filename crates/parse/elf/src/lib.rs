//! ELF file header and program header decoding.
//!
//! Decodes the ELF identification block, the class-dependent (32-bit or
//! 64-bit) file header layout, and the program header table from a raw byte
//! slice, in either byte order. Decoding is best-effort: structural problems
//! (no magic, empty input) fail hard, while unrecognized enum codes or
//! truncated trailing fields leave the affected output field at its default
//! and are reported through the `log` facade.
//!
//! The decoders never retain a reference to the input buffer; all output
//! records are owned.
//!
//! # Usage
//!
//! ```
//! use baryon_elf::ElfImage;
//!
//! fn inspect(data: &[u8]) {
//!     let image = ElfImage::parse(data).expect("valid ELF");
//!     let entry = image.header.entry_point;
//!     for seg in image.segments.segments() {
//!         // seg.virtual_address, seg.flags, seg.type_name...
//!     }
//! }
//! ```

#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod bytes;
pub mod header;
pub mod names;
pub mod segment;

use core::fmt;

pub use bytes::ByteOrder;
pub use header::{DataEncoding, ElfClass, ElfHeader};
pub use names::NameTable;
pub use segment::{Segment, SegmentFlags, SegmentTable};

/// Errors that can occur while decoding an ELF file image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The input buffer is empty.
    EmptyInput,
    /// An argument is out of range, or a read would run past the end of the
    /// buffer, or a header in an unresolved state was passed to a decoder
    /// that requires a definite class and byte order.
    BadArgument,
    /// The buffer does not start with the ELF magic bytes.
    NotElf,
    /// A value does not fit the destination integer width.
    Overflow,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "empty input buffer"),
            Self::BadArgument => write!(f, "invalid argument or out-of-bounds read"),
            Self::NotElf => write!(f, "not an ELF file"),
            Self::Overflow => write!(f, "value exceeds destination width"),
        }
    }
}

/// A fully decoded ELF file image: the file header plus the program header
/// table.
///
/// Produced by a single [`parse`](Self::parse) call; both records are owned
/// and carry no reference to the input buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElfImage {
    /// The decoded file header.
    pub header: ElfHeader,
    /// The decoded program header table.
    pub segments: SegmentTable,
}

impl ElfImage {
    /// Decode the file header and, when the header resolved to a definite
    /// class and byte order, the program header table.
    ///
    /// A header whose class or data encoding is unrecognized still decodes
    /// (best-effort, see [`ElfHeader::parse`]); the segment pass is then
    /// skipped with a warning and the table comes back empty, rather than
    /// failing the whole decode.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] on an empty buffer or a magic mismatch.
    pub fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        let header = ElfHeader::parse(data)?;

        let segments = if header.class.profile().is_some()
            && header.data_encoding.byte_order().is_some()
        {
            SegmentTable::parse(data, &header)?
        } else {
            log::warn!("class or data encoding unresolved, skipping program header table");
            SegmentTable::empty()
        };

        Ok(Self { header, segments })
    }
}
