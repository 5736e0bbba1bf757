//! Report rendering for decoded ELF records.
//!
//! Purely a consumer of the parser's data model: every string-valued field
//! may be absent and renders as a placeholder, numeric fields always have a
//! value. Performs no decoding of its own.

use std::io::{self, Write};

use baryon_elf::{bytes, ElfClass, ElfHeader, ElfImage, Segment, SegmentFlags};
use bitflags::bitflags;

/// Placeholder for string-valued fields the decoder could not resolve.
const NOT_CONFIGURED: &str = "not configured";

bitflags! {
    /// Report sections to render.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Sections: u8 {
        /// The ELF header section.
        const HEADER = 1 << 0;
        /// The program header table section.
        const SEGMENTS = 1 << 1;
        /// The section header view (placeholder only).
        const SECTION_HEADERS = 1 << 2;
        /// The section data view (placeholder only).
        const SECTION_DATA = 1 << 3;
    }
}

/// Render the selected sections of `image` to `out`.
///
/// # Errors
///
/// Returns any I/O error from the destination stream.
pub fn render(out: &mut impl Write, image: &ElfImage, sections: Sections) -> io::Result<()> {
    if sections.contains(Sections::HEADER) {
        banner(out, "ELF HEADER")?;
        render_header(out, &image.header)?;
        writeln!(out)?;
    }

    if sections.contains(Sections::SEGMENTS) {
        banner(out, "PROGRAM HEADER")?;
        render_segments(out, image)?;
        writeln!(out)?;
    }

    if sections.contains(Sections::SECTION_HEADERS) {
        banner(out, "SECTION HEADER")?;
        writeln!(out, "Section header decoding is not implemented.")?;
        writeln!(out)?;
    }

    if sections.contains(Sections::SECTION_DATA) {
        banner(out, "PROGRAM DATA")?;
        writeln!(out, "Program data rendering is not implemented.")?;
        writeln!(out)?;
    }

    Ok(())
}

/// Write a three-line `### title ###` banner, sized to the title.
fn banner(out: &mut impl Write, title: &str) -> io::Result<()> {
    let border = "#".repeat(title.len() + 8);
    writeln!(out, "{border}")?;
    writeln!(out, "### {title} ###")?;
    writeln!(out, "{border}")
}

fn render_header(out: &mut impl Write, header: &ElfHeader) -> io::Result<()> {
    let name = |resolved: Option<&'static str>| resolved.unwrap_or(NOT_CONFIGURED);

    writeln!(out, "Class:          {}", name(header.class_name))?;
    writeln!(out, "Endianness:     {}", name(header.data_encoding_name))?;
    writeln!(out, "ELF Version:    {}", header.version)?;
    writeln!(out, "Target OS ABI:  {}", name(header.os_abi_name))?;
    writeln!(out, "ABI Version:    {}", header.abi_version)?;

    write!(out, "Pad:           ")?;
    for byte in header.pad {
        write!(out, " {byte:02x}")?;
    }
    writeln!(out)?;

    writeln!(out, "ELF Type:       {}", name(header.object_type_name))?;
    writeln!(out, "Target ISA:     {}", name(header.isa_name))?;
    writeln!(out, "Object File:    {}", name(header.object_file_version_name))?;

    writeln!(out, "Entry Point:    {}", address(header.class, header.entry_point))?;
    writeln!(
        out,
        "PH Offset:      {} ({})",
        address(header.class, header.program_header_offset),
        header.program_header_offset
    )?;
    writeln!(out, "SH Offset:      {}", address(header.class, header.section_header_offset))?;

    if header.class == ElfClass::None {
        writeln!(out, "Flags:          {NOT_CONFIGURED}")?;
    } else {
        writeln!(out, "Flags:          {}", binary_word(header.flags))?;
    }

    writeln!(out, "EHeader Size:   {}", header.header_size)?;
    writeln!(out, "PHeader Size:   {}", header.program_header_entry_size)?;
    writeln!(out, "# PH Entries:   {}", header.program_header_entry_count)?;
    writeln!(out, "SHeader Size:   {}", header.section_header_entry_size)?;
    writeln!(out, "# SH Entries:   {}", header.section_header_entry_count)?;
    writeln!(out, "SH Name Index:  {}", header.section_header_name_index)
}

fn render_segments(out: &mut impl Write, image: &ElfImage) -> io::Result<()> {
    let header = &image.header;
    writeln!(out, "Class:          {}", header.class_name.unwrap_or(NOT_CONFIGURED))?;
    writeln!(
        out,
        "Endianness:     {}",
        header.data_encoding_name.unwrap_or(NOT_CONFIGURED)
    )?;
    writeln!(out, "PH Offset:      {}", address(header.class, header.program_header_offset))?;
    writeln!(out, "PHeader Size:   {}", header.program_header_entry_size)?;
    writeln!(out, "# PH Entries:   {}", header.program_header_entry_count)?;

    if let Some((declared, computed)) = image.segments.entry_size_mismatch() {
        writeln!(
            out,
            "WARNING: declared entry size {declared} does not match the {computed}-byte layout"
        )?;
    }

    for (index, segment) in image.segments.segments().iter().enumerate() {
        writeln!(out)?;
        writeln!(out, "Segment #{}", index + 1)?;
        render_segment(out, header.class, segment)?;
    }

    Ok(())
}

/// Render one segment, listing the fields in the order the class lays them
/// out on disk (the 64-bit entry carries its flags right after the type).
fn render_segment(out: &mut impl Write, class: ElfClass, segment: &Segment) -> io::Result<()> {
    writeln!(out, "  Type:           {}", segment.type_name.unwrap_or(NOT_CONFIGURED))?;
    if class == ElfClass::Elf64 {
        render_segment_flags(out, segment.flags)?;
    }
    writeln!(
        out,
        "  Offset:         {} ({})",
        address(class, segment.file_offset),
        segment.file_offset
    )?;
    writeln!(out, "  Virtual Addr:   {}", address(class, segment.virtual_address))?;
    writeln!(out, "  Physical Addr:  {}", address(class, segment.physical_address))?;
    writeln!(out, "  File Size:      {}", segment.file_size)?;
    writeln!(out, "  Mem Size:       {}", segment.memory_size)?;
    if class != ElfClass::Elf64 {
        render_segment_flags(out, segment.flags)?;
    }
    writeln!(out, "  Alignment:      {}", segment.alignment)
}

fn render_segment_flags(out: &mut impl Write, flags: SegmentFlags) -> io::Result<()> {
    writeln!(out, "  Flags:          {}", binary_word(flags.bits()))?;
    let decoded = permissions(flags);
    if !decoded.is_empty() {
        writeln!(out, "                  {decoded}")?;
    }
    Ok(())
}

/// Format an address or offset as hex in the width of the file's class:
/// 8 digits for 32-bit, 16 for 64-bit, placeholder when the class is
/// unresolved.
fn address(class: ElfClass, value: u64) -> String {
    match class {
        ElfClass::Elf32 => match bytes::narrow_u32(value) {
            Ok(narrow) => format!("{narrow:#010x}"),
            Err(_) => NOT_CONFIGURED.into(),
        },
        ElfClass::Elf64 => format!("{value:#018x}"),
        ElfClass::None => NOT_CONFIGURED.into(),
    }
}

/// Format a 32-bit flag word as nibble-grouped binary, most significant
/// byte first.
fn binary_word(value: u32) -> String {
    let mut rendered = String::with_capacity(39);
    for (i, byte) in value.to_be_bytes().iter().enumerate() {
        if i > 0 {
            rendered.push(' ');
        }
        rendered.push_str(&format!("{:04b} {:04b}", byte >> 4, byte & 0xF));
    }
    rendered
}

/// Decode the permission bits into a space-separated word list.
fn permissions(flags: SegmentFlags) -> String {
    let mut words = Vec::new();
    if flags.contains(SegmentFlags::READ) {
        words.push("Read");
    }
    if flags.contains(SegmentFlags::WRITE) {
        words.push("Write");
    }
    if flags.contains(SegmentFlags::EXECUTE) {
        words.push("Execute");
    }
    words.join(" ")
}
