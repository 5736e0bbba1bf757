//! Program header table decoding.
//!
//! Walks `program_header_entry_count` entries starting at
//! `program_header_offset`, using the width profile and byte order resolved
//! by the file header. The 32-bit and 64-bit layouts order their fields
//! differently: the 64-bit entry places `p_flags` right after `p_type`,
//! the 32-bit entry places it right before `p_align`.

use alloc::vec::Vec;

use bitflags::bitflags;

use crate::bytes::{read_u32_or_zero, read_u64_or_zero};
use crate::header::ElfHeader;
use crate::names;
use crate::DecodeError;

bitflags! {
    /// Segment permission bits from `p_flags`.
    ///
    /// Checked with bitwise masks; unknown bits are retained.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SegmentFlags: u32 {
        /// Executable segment.
        const EXECUTE = 0x1;
        /// Writable segment.
        const WRITE = 0x2;
        /// Readable segment.
        const READ = 0x4;
    }
}

/// One decoded program header entry.
///
/// Address and size fields are widened to `u64`; for a 32-bit file they came
/// from 4-byte reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Segment type code.
    pub segment_type: u32,
    /// Display name for the segment type.
    pub type_name: Option<&'static str>,
    /// Permission flags.
    pub flags: SegmentFlags,
    /// File offset of the segment data.
    pub file_offset: u64,
    /// Virtual address of the segment.
    pub virtual_address: u64,
    /// Physical address of the segment.
    pub physical_address: u64,
    /// Size of the segment data in the file.
    pub file_size: u64,
    /// Size of the segment in memory.
    pub memory_size: u64,
    /// Required alignment.
    pub alignment: u64,
}

/// The decoded program header table, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentTable {
    segments: Vec<Segment>,
    declared_entry_size: u16,
    computed_entry_size: u16,
}

impl SegmentTable {
    /// Decode the program header table described by `header`.
    ///
    /// The cursor advances by the sum of the per-class field widths for each
    /// entry, not by the header's declared entry size; a disagreement
    /// between the two is surfaced through
    /// [`entry_size_mismatch`](Self::entry_size_mismatch) instead of
    /// misaligning subsequent entries. Per-field read failures inside an
    /// entry (a truncated table, say) zero the field and are logged, like
    /// the header decoder's.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::BadArgument`] when `header` did not resolve to
    /// a definite class and byte order, or [`DecodeError::EmptyInput`] on an
    /// empty buffer.
    pub fn parse(data: &[u8], header: &ElfHeader) -> Result<Self, DecodeError> {
        if data.is_empty() {
            return Err(DecodeError::EmptyInput);
        }
        let profile = header.class.profile().ok_or(DecodeError::BadArgument)?;
        let order = header
            .data_encoding
            .byte_order()
            .ok_or(DecodeError::BadArgument)?;

        let width = profile.addr_width;
        // p_type + p_flags + six class-width fields.
        let entry_size = 4 + 4 + 6 * width;
        let count = usize::from(header.program_header_entry_count);

        let declared_entry_size = header.program_header_entry_size;
        #[expect(
            clippy::cast_possible_truncation,
            reason = "entry size is at most 56"
        )]
        let computed_entry_size = entry_size as u16;
        if count > 0 && declared_entry_size != computed_entry_size {
            log::warn!(
                "declared program header entry size {declared_entry_size} does not match \
                 the {computed_entry_size} bytes of the {:?} layout",
                header.class
            );
        }

        let mut segments = Vec::with_capacity(count);
        // A table offset past the address space saturates; the per-field
        // bounds checks then zero-fill every entry.
        let mut cursor = usize::try_from(header.program_header_offset).unwrap_or(usize::MAX);

        for _ in 0..count {
            segments.push(decode_entry(data, cursor, width, profile.flags_after_type, order));
            cursor = cursor.saturating_add(entry_size);
        }

        Ok(Self {
            segments,
            declared_entry_size,
            computed_entry_size,
        })
    }

    /// An empty table, for decodes that skip the segment pass.
    #[must_use]
    pub(crate) fn empty() -> Self {
        Self {
            segments: Vec::new(),
            declared_entry_size: 0,
            computed_entry_size: 0,
        }
    }

    /// The decoded entries, index 0 first, preserving file order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns `(declared, computed)` when the header's declared entry size
    /// disagrees with the per-class layout and the table is non-empty.
    #[must_use]
    pub fn entry_size_mismatch(&self) -> Option<(u16, u16)> {
        if !self.segments.is_empty() && self.declared_entry_size != self.computed_entry_size {
            Some((self.declared_entry_size, self.computed_entry_size))
        } else {
            None
        }
    }
}

/// Decode one entry at `base`, honoring the per-class flag placement.
fn decode_entry(
    data: &[u8],
    base: usize,
    width: usize,
    flags_after_type: bool,
    order: crate::ByteOrder,
) -> Segment {
    let segment_type = read_u32_or_zero(data, base, 4, order, "segment_type");
    let type_name = names::SEGMENT_TYPE.lookup(segment_type);
    if type_name.is_none() {
        log::warn!("segment_type {segment_type:#x} at offset {base:#x} is not a registered type");
    }
    let mut cursor = base.saturating_add(4);

    let mut raw_flags = 0;
    if flags_after_type {
        raw_flags = read_u32_or_zero(data, cursor, 4, order, "flags");
        cursor = cursor.saturating_add(4);
    }

    let file_offset = read_u64_or_zero(data, cursor, width, order, "file_offset");
    cursor = cursor.saturating_add(width);
    let virtual_address = read_u64_or_zero(data, cursor, width, order, "virtual_address");
    cursor = cursor.saturating_add(width);
    let physical_address = read_u64_or_zero(data, cursor, width, order, "physical_address");
    cursor = cursor.saturating_add(width);
    let file_size = read_u64_or_zero(data, cursor, width, order, "file_size");
    cursor = cursor.saturating_add(width);
    let memory_size = read_u64_or_zero(data, cursor, width, order, "memory_size");
    cursor = cursor.saturating_add(width);

    if !flags_after_type {
        raw_flags = read_u32_or_zero(data, cursor, 4, order, "flags");
        cursor = cursor.saturating_add(4);
    }

    let alignment = read_u64_or_zero(data, cursor, width, order, "alignment");

    Segment {
        segment_type,
        type_name,
        flags: SegmentFlags::from_bits_retain(raw_flags),
        file_offset,
        virtual_address,
        physical_address,
        file_size,
        memory_size,
        alignment,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::header::tests::{
        make_elf32_be_header, make_elf64_header, ELF32_PHDR_SIZE, ELF64_PHDR_SIZE,
    };
    use crate::bytes::read_u32;
    use crate::ByteOrder;

    /// Append a 64-bit little-endian program header entry and bump `e_phnum`.
    pub(crate) fn append_phdr64(
        buf: &mut Vec<u8>,
        p_type: u32,
        p_flags: u32,
        p_offset: u64,
        p_vaddr: u64,
        p_filesz: u64,
        p_memsz: u64,
    ) {
        let start = buf.len();
        buf.resize(start + ELF64_PHDR_SIZE, 0);
        let b = &mut buf[start..];

        b[0..4].copy_from_slice(&p_type.to_le_bytes());
        b[4..8].copy_from_slice(&p_flags.to_le_bytes());
        b[8..16].copy_from_slice(&p_offset.to_le_bytes());
        b[16..24].copy_from_slice(&p_vaddr.to_le_bytes());
        b[24..32].copy_from_slice(&(p_vaddr + 0x1000).to_le_bytes()); // p_paddr
        b[32..40].copy_from_slice(&p_filesz.to_le_bytes());
        b[40..48].copy_from_slice(&p_memsz.to_le_bytes());
        b[48..56].copy_from_slice(&0x1000u64.to_le_bytes()); // p_align

        let phnum = read_u32(buf, 56, 2, ByteOrder::Little).unwrap() + 1;
        let phnum = u16::try_from(phnum).unwrap();
        buf[56..58].copy_from_slice(&phnum.to_le_bytes());
    }

    /// Append a 32-bit big-endian program header entry and bump `e_phnum`.
    pub(crate) fn append_phdr32_be(
        buf: &mut Vec<u8>,
        p_type: u32,
        p_flags: u32,
        p_offset: u32,
        p_vaddr: u32,
        p_filesz: u32,
        p_memsz: u32,
    ) {
        let start = buf.len();
        buf.resize(start + ELF32_PHDR_SIZE, 0);
        let b = &mut buf[start..];

        b[0..4].copy_from_slice(&p_type.to_be_bytes());
        b[4..8].copy_from_slice(&p_offset.to_be_bytes());
        b[8..12].copy_from_slice(&p_vaddr.to_be_bytes());
        b[12..16].copy_from_slice(&(p_vaddr + 0x1000).to_be_bytes()); // p_paddr
        b[16..20].copy_from_slice(&p_filesz.to_be_bytes());
        b[20..24].copy_from_slice(&p_memsz.to_be_bytes());
        b[24..28].copy_from_slice(&p_flags.to_be_bytes());
        b[28..32].copy_from_slice(&0x1000u32.to_be_bytes()); // p_align

        let phnum = read_u32(buf, 44, 2, ByteOrder::Big).unwrap() + 1;
        let phnum = u16::try_from(phnum).unwrap();
        buf[44..46].copy_from_slice(&phnum.to_be_bytes());
    }

    #[test]
    fn zero_entry_count_yields_empty_table() {
        let buf = make_elf64_header();
        let header = ElfHeader::parse(&buf).expect("valid header");
        let table = SegmentTable::parse(&buf, &header).expect("empty table");
        assert!(table.segments().is_empty());
        assert_eq!(table.entry_size_mismatch(), None);
    }

    #[test]
    fn decode_elf64_entries_in_order() {
        let mut buf = make_elf64_header();
        append_phdr64(&mut buf, 1, 0x5, 0x1000, 0x40_0000, 0x200, 0x300);
        append_phdr64(&mut buf, 2, 0x6, 0x2000, 0x60_0000, 0x80, 0x80);

        let header = ElfHeader::parse(&buf).expect("valid header");
        let table = SegmentTable::parse(&buf, &header).expect("valid table");
        let segs = table.segments();

        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].segment_type, 1);
        assert_eq!(segs[0].type_name, Some("Loadable segment"));
        assert_eq!(segs[0].flags, SegmentFlags::READ | SegmentFlags::EXECUTE);
        assert_eq!(segs[0].file_offset, 0x1000);
        assert_eq!(segs[0].virtual_address, 0x40_0000);
        assert_eq!(segs[0].physical_address, 0x40_1000);
        assert_eq!(segs[0].file_size, 0x200);
        assert_eq!(segs[0].memory_size, 0x300);
        assert_eq!(segs[0].alignment, 0x1000);
        assert_eq!(segs[1].segment_type, 2);
        assert_eq!(segs[1].type_name, Some("Dynamic linking information"));
        assert_eq!(segs[1].flags, SegmentFlags::READ | SegmentFlags::WRITE);
        assert_eq!(table.entry_size_mismatch(), None);
    }

    #[test]
    fn decode_elf32_big_endian_entries() {
        let mut buf = make_elf32_be_header();
        append_phdr32_be(&mut buf, 3, 0x4, 0x100, 0x8000, 0x20, 0x20);

        let header = ElfHeader::parse(&buf).expect("valid header");
        let table = SegmentTable::parse(&buf, &header).expect("valid table");
        let segs = table.segments();

        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].segment_type, 3);
        assert_eq!(segs[0].type_name, Some("Interpreter path name"));
        assert_eq!(segs[0].flags, SegmentFlags::READ);
        assert_eq!(segs[0].file_offset, 0x100);
        assert_eq!(segs[0].virtual_address, 0x8000);
        assert_eq!(segs[0].alignment, 0x1000);
    }

    #[test]
    fn flag_placement_differs_between_classes() {
        // Identical raw entry bytes: p_type, then eight 4-byte words
        // counting up. The 64-bit layout reads word 1 as p_flags; the
        // 32-bit layout reads it as p_offset.
        let mut entry = Vec::new();
        entry.extend_from_slice(&1u32.to_le_bytes());
        for word in 1u32..=13 {
            entry.extend_from_slice(&word.to_le_bytes());
        }

        let mut buf64 = make_elf64_header();
        buf64[56..58].copy_from_slice(&1u16.to_le_bytes()); // e_phnum
        buf64.extend_from_slice(&entry);
        let header64 = ElfHeader::parse(&buf64).expect("valid header");
        let table64 = SegmentTable::parse(&buf64, &header64).expect("valid table");

        let mut buf32 = make_elf64_header();
        buf32[4] = 1; // 32-bit, still little-endian
        buf32.truncate(52);
        buf32[28..32].copy_from_slice(&64u32.to_le_bytes()); // e_phoff
        buf32[42..44].copy_from_slice(&32u16.to_le_bytes()); // e_phentsize
        buf32[44..46].copy_from_slice(&1u16.to_le_bytes()); // e_phnum
        buf32.extend_from_slice(&[0u8; 12]); // pad out to offset 64
        buf32.extend_from_slice(&entry);
        let header32 = ElfHeader::parse(&buf32).expect("valid header");
        assert_eq!(header32.program_header_offset, 64);
        let table32 = SegmentTable::parse(&buf32, &header32).expect("valid table");

        let seg64 = &table64.segments()[0];
        let seg32 = &table32.segments()[0];
        assert_eq!(seg64.flags.bits(), 1); // word right after p_type
        assert_eq!(seg64.file_offset, 0x0000_0003_0000_0002);
        assert_eq!(seg32.file_offset, 1); // same word, read as p_offset
        assert_eq!(seg32.flags.bits(), 6); // word right before p_align
        assert_eq!(seg32.alignment, 7);
    }

    #[test]
    fn entry_size_mismatch_is_surfaced() {
        let mut buf = make_elf64_header();
        append_phdr64(&mut buf, 1, 0x7, 0, 0, 0, 0);
        buf[54..56].copy_from_slice(&64u16.to_le_bytes()); // bogus e_phentsize

        let header = ElfHeader::parse(&buf).expect("valid header");
        let table = SegmentTable::parse(&buf, &header).expect("valid table");
        assert_eq!(table.entry_size_mismatch(), Some((64, 56)));
        // The entry itself still decoded at the computed offset.
        assert_eq!(table.segments()[0].segment_type, 1);
    }

    #[test]
    fn unresolved_header_is_rejected() {
        let mut buf = make_elf64_header();
        buf[4] = 0; // invalid class
        let header = ElfHeader::parse(&buf).expect("best-effort decode");
        assert_eq!(
            SegmentTable::parse(&buf, &header),
            Err(DecodeError::BadArgument)
        );

        let mut buf = make_elf64_header();
        buf[5] = 0; // invalid encoding
        let header = ElfHeader::parse(&buf).expect("best-effort decode");
        assert_eq!(
            SegmentTable::parse(&buf, &header),
            Err(DecodeError::BadArgument)
        );
    }

    #[test]
    fn truncated_table_zero_fills_missing_fields() {
        let mut buf = make_elf64_header();
        append_phdr64(&mut buf, 1, 0x5, 0x1000, 0x40_0000, 0x200, 0x300);
        buf.truncate(64 + 20); // cut inside the first entry

        let header = ElfHeader::parse(&buf).expect("valid header");
        let table = SegmentTable::parse(&buf, &header).expect("best-effort table");
        let seg = &table.segments()[0];
        assert_eq!(seg.segment_type, 1);
        assert_eq!(seg.file_offset, 0x1000);
        // Fields past the cut default to zero.
        assert_eq!(seg.file_size, 0);
        assert_eq!(seg.alignment, 0);
    }

    #[test]
    fn huge_table_offset_zero_fills_entries() {
        let mut buf = make_elf64_header();
        buf[32..40].copy_from_slice(&u64::MAX.to_le_bytes()); // e_phoff
        buf[56..58].copy_from_slice(&1u16.to_le_bytes()); // e_phnum

        let header = ElfHeader::parse(&buf).expect("valid header");
        assert_eq!(header.program_header_offset, u64::MAX);
        let table = SegmentTable::parse(&buf, &header).expect("best-effort table");

        // Every read lands past the buffer, so the entry is all defaults.
        let seg = &table.segments()[0];
        assert_eq!(seg.segment_type, 0);
        assert_eq!(seg.flags, SegmentFlags::empty());
        assert_eq!(seg.file_offset, 0);
        assert_eq!(seg.alignment, 0);
    }

    #[test]
    fn permission_bits_are_bitwise() {
        let mut buf = make_elf64_header();
        append_phdr64(&mut buf, 1, 0x1, 0, 0, 0, 0); // execute only

        let header = ElfHeader::parse(&buf).expect("valid header");
        let table = SegmentTable::parse(&buf, &header).expect("valid table");
        let flags = table.segments()[0].flags;

        // A nonzero flag word is not "all flags set": the execute bit alone
        // must not read as readable or writable.
        assert!(flags.contains(SegmentFlags::EXECUTE));
        assert!(!flags.contains(SegmentFlags::READ));
        assert!(!flags.contains(SegmentFlags::WRITE));
    }

    #[test]
    fn unknown_flag_bits_are_retained() {
        let mut buf = make_elf64_header();
        append_phdr64(&mut buf, 1, 0xF000_0005, 0, 0, 0, 0);

        let header = ElfHeader::parse(&buf).expect("valid header");
        let table = SegmentTable::parse(&buf, &header).expect("valid table");
        assert_eq!(table.segments()[0].flags.bits(), 0xF000_0005);
    }

    #[test]
    fn unknown_segment_type_is_non_fatal() {
        let mut buf = make_elf64_header();
        append_phdr64(&mut buf, 0x8000_0001, 0x4, 0, 0, 0, 0);

        let header = ElfHeader::parse(&buf).expect("valid header");
        let table = SegmentTable::parse(&buf, &header).expect("valid table");
        assert_eq!(table.segments()[0].segment_type, 0x8000_0001);
        assert_eq!(table.segments()[0].type_name, None);
    }
}
