//! Code-to-name lookup tables for enumerated ELF fields.
//!
//! One table per enumerated field category. Each entry covers an inclusive
//! code range (point entries have `first == last`), which keeps the large
//! reserved spans of the object-type and segment-type categories to a single
//! entry each. A missed lookup is not an error; callers render their own
//! placeholder.

/// A code-to-name lookup table for one field category.
///
/// Entries are `(first, last, name)` with `first..=last` inclusive. Tables
/// are static data, so concurrent decodes share them freely.
#[derive(Debug, Clone, Copy)]
pub struct NameTable {
    entries: &'static [(u32, u32, &'static str)],
}

impl NameTable {
    /// Returns the display name registered for `code`, if any.
    #[must_use]
    pub fn lookup(&self, code: u32) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|&&(first, last, _)| code >= first && code <= last)
            .map(|&(_, _, name)| name)
    }
}

/// File class (`e_ident[4]`).
pub static CLASS: NameTable = NameTable {
    entries: &[
        (0, 0, "Invalid class"),
        (1, 1, "32-bit format"),
        (2, 2, "64-bit format"),
    ],
};

/// Data encoding (`e_ident[5]`).
pub static DATA_ENCODING: NameTable = NameTable {
    entries: &[
        (0, 0, "Invalid data encoding"),
        (1, 1, "Little endian"),
        (2, 2, "Big endian"),
    ],
};

/// Target OS ABI (`e_ident[7]`). There is no code 5.
pub static OS_ABI: NameTable = NameTable {
    entries: &[
        (0, 0, "System V"),
        (1, 1, "HP-UX"),
        (2, 2, "NetBSD"),
        (3, 3, "Linux"),
        (4, 4, "GNU Hurd"),
        (6, 6, "Solaris"),
        (7, 7, "AIX"),
        (8, 8, "IRIX"),
        (9, 9, "FreeBSD"),
        (10, 10, "Tru64"),
        (11, 11, "Novell Modesto"),
        (12, 12, "OpenBSD"),
        (13, 13, "OpenVMS"),
        (14, 14, "NonStop Kernel"),
        (15, 15, "AROS"),
        (16, 16, "Fenix OS"),
        (17, 17, "CloudABI"),
        (0x53, 0x53, "Sortix"),
    ],
};

/// Object file type (`e_type`).
pub static OBJECT_TYPE: NameTable = NameTable {
    entries: &[
        (0, 0, "No file type"),
        (1, 1, "Relocatable file"),
        (2, 2, "Executable file"),
        (3, 3, "Shared object file"),
        (4, 4, "Core file"),
        (0xFE00, 0xFEFF, "Operating system-specific"),
        (0xFF00, 0xFFFF, "Processor-specific"),
    ],
};

/// Instruction set architecture (`e_machine`), per the published gABI
/// machine list through code 82.
pub static ISA: NameTable = NameTable {
    entries: &[
        (0, 0, "No machine"),
        (1, 1, "AT&T WE 32100"),
        (2, 2, "SPARC"),
        (3, 3, "Intel 80386"),
        (4, 4, "Motorola 68000"),
        (5, 5, "Motorola 88000"),
        (6, 6, "Intel MCU"),
        (7, 7, "Intel 80860"),
        (8, 8, "MIPS I Architecture"),
        (9, 9, "IBM System/370 Processor"),
        (10, 10, "MIPS RS3000 Little-endian"),
        (11, 14, "Reserved for future use"),
        (15, 15, "Hewlett-Packard PA-RISC"),
        (16, 16, "Reserved for future use"),
        (17, 17, "Fujitsu VPP500"),
        (18, 18, "Enhanced instruction set SPARC"),
        (19, 19, "Intel 80960"),
        (20, 20, "PowerPC"),
        (21, 21, "64-bit PowerPC"),
        (22, 22, "IBM System/390 Processor"),
        (23, 23, "IBM SPU/SPC"),
        (24, 35, "Reserved for future use"),
        (36, 36, "NEC V800"),
        (37, 37, "Fujitsu FR20"),
        (38, 38, "TRW RH-32"),
        (39, 39, "Motorola RCE"),
        (40, 40, "Advanced RISC Machines ARM"),
        (41, 41, "Digital Alpha"),
        (42, 42, "Hitachi SH"),
        (43, 43, "SPARC Version 9"),
        (44, 44, "Siemens Tricore embedded processor"),
        (45, 45, "Argonaut RISC Core, Argonaut Technologies Inc."),
        (46, 46, "Hitachi H8/300"),
        (47, 47, "Hitachi H8/300H"),
        (48, 48, "Hitachi H8S"),
        (49, 49, "Hitachi H8/500"),
        (50, 50, "Intel IA-64 processor architecture"),
        (51, 51, "Stanford MIPS-X"),
        (52, 52, "Motorola ColdFire"),
        (53, 53, "Motorola M68HC12"),
        (54, 54, "Fujitsu MMA Multimedia Accelerator"),
        (55, 55, "Siemens PCP"),
        (56, 56, "Sony nCPU embedded RISC processor"),
        (57, 57, "Denso NDR1 microprocessor"),
        (58, 58, "Motorola Star*Core processor"),
        (59, 59, "Toyota ME16 processor"),
        (60, 60, "STMicroelectronics ST100 processor"),
        (61, 61, "Advanced Logic Corp. TinyJ embedded processor family"),
        (62, 62, "AMD x86-64 architecture"),
        (63, 63, "Sony DSP Processor"),
        (64, 64, "Digital Equipment Corp. PDP-10"),
        (65, 65, "Digital Equipment Corp. PDP-11"),
        (66, 66, "Siemens FX66 microcontroller"),
        (67, 67, "STMicroelectronics ST9+ 8/16 bit microcontroller"),
        (68, 68, "STMicroelectronics ST7 8-bit microcontroller"),
        (69, 69, "Motorola MC68HC16 Microcontroller"),
        (70, 70, "Motorola MC68HC11 Microcontroller"),
        (71, 71, "Motorola MC68HC08 Microcontroller"),
        (72, 72, "Motorola MC68HC05 Microcontroller"),
        (73, 73, "Silicon Graphics SVx"),
        (74, 74, "STMicroelectronics ST19 8-bit microcontroller"),
        (75, 75, "Digital VAX"),
        (76, 76, "Axis Communications 32-bit embedded processor"),
        (77, 77, "Infineon Technologies 32-bit embedded processor"),
        (78, 78, "Element 14 64-bit DSP Processor"),
        (79, 79, "LSI Logic 16-bit DSP Processor"),
        (80, 80, "Donald Knuth's educational 64-bit processor"),
        (81, 81, "Harvard University machine-independent object files"),
        (82, 82, "SiTera Prism"),
    ],
};

/// Object file version (`e_version`).
pub static OBJECT_FILE_VERSION: NameTable = NameTable {
    entries: &[(0, 0, "Invalid version"), (1, 1, "Current version")],
};

/// Segment type (`p_type`).
pub static SEGMENT_TYPE: NameTable = NameTable {
    entries: &[
        (0, 0, "Unused entry"),
        (1, 1, "Loadable segment"),
        (2, 2, "Dynamic linking information"),
        (3, 3, "Interpreter path name"),
        (4, 4, "Auxiliary information"),
        (5, 5, "Reserved"),
        (6, 6, "Program header table"),
        (7, 7, "Thread-local storage template"),
        (0x6000_0000, 0x6FFF_FFFF, "Operating system-specific"),
        (0x7000_0000, 0x7FFF_FFFF, "Processor-specific"),
    ],
};
