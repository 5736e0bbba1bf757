//! ELF file header decoding.
//!
//! Walks the fixed identification block, then the class-dependent address
//! block, then the trailing fixed-width fields. Only a missing magic or an
//! empty buffer fail the decode; everything else is extracted best-effort
//! with per-field warnings.

use crate::bytes::{self, ByteOrder};
use crate::names;
use crate::DecodeError;

/// ELF magic bytes: `\x7fELF`.
pub(crate) const ELF_MAGIC: [u8; 4] = [0x7F, b'E', b'L', b'F'];

/// Byte offset of the class-dependent address block (`e_entry`).
const ADDR_BLOCK_OFFSET: usize = 0x18;

/// File class: 32-bit or 64-bit address and offset widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElfClass {
    /// Invalid or unrecognized class; width-dependent fields are undefined.
    #[default]
    None,
    /// 32-bit format: 4-byte addresses and offsets.
    Elf32,
    /// 64-bit format: 8-byte addresses and offsets.
    Elf64,
}

impl ElfClass {
    /// Decode the class byte (`e_ident[4]`).
    #[must_use]
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            1 => Self::Elf32,
            2 => Self::Elf64,
            _ => Self::None,
        }
    }

    /// Returns the width profile for this class, or `None` when the class
    /// does not define field widths.
    #[must_use]
    pub(crate) fn profile(self) -> Option<ClassProfile> {
        match self {
            Self::None => None,
            Self::Elf32 => Some(ClassProfile {
                addr_width: 4,
                flags_after_type: false,
            }),
            Self::Elf64 => Some(ClassProfile {
                addr_width: 8,
                flags_after_type: true,
            }),
        }
    }
}

/// Data encoding: the byte order of every multi-byte field in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataEncoding {
    /// Invalid or unrecognized encoding; multi-byte fields are undefined.
    #[default]
    None,
    /// Least significant byte first.
    Little,
    /// Most significant byte first.
    Big,
}

impl DataEncoding {
    /// Decode the data encoding byte (`e_ident[5]`).
    #[must_use]
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            1 => Self::Little,
            2 => Self::Big,
            _ => Self::None,
        }
    }

    /// Returns the byte order for multi-byte reads, or `None` when the
    /// encoding is unresolved.
    #[must_use]
    pub fn byte_order(self) -> Option<ByteOrder> {
        match self {
            Self::None => None,
            Self::Little => Some(ByteOrder::Little),
            Self::Big => Some(ByteOrder::Big),
        }
    }
}

/// Field widths and per-entry layout selected once from the file class and
/// threaded through the decoders.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ClassProfile {
    /// Width in bytes of every address, offset, and size field.
    pub(crate) addr_width: usize,
    /// Whether `p_flags` sits right after `p_type` (64-bit layout) instead
    /// of right before `p_align` (32-bit layout).
    pub(crate) flags_after_type: bool,
}

/// A decoded ELF file header.
///
/// Address and offset fields are stored widened to `u64` regardless of
/// class; for a 32-bit file they were decoded from 4-byte reads and always
/// fit [`bytes::narrow_u32`]. String-valued fields are registry lookups and
/// are `None` for codes the registry does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElfHeader {
    /// The four magic bytes.
    pub magic: [u8; 4],
    /// File class.
    pub class: ElfClass,
    /// Display name for the class byte.
    pub class_name: Option<&'static str>,
    /// Data encoding.
    pub data_encoding: DataEncoding,
    /// Display name for the data encoding byte.
    pub data_encoding_name: Option<&'static str>,
    /// Identification version byte (informational).
    pub version: u8,
    /// Target OS ABI code.
    pub os_abi: u8,
    /// Display name for the OS ABI code.
    pub os_abi_name: Option<&'static str>,
    /// ABI version byte.
    pub abi_version: u8,
    /// The seven pad bytes, preserved verbatim.
    pub pad: [u8; 7],
    /// Object file type code.
    pub object_type: u16,
    /// Display name for the object file type.
    pub object_type_name: Option<&'static str>,
    /// Instruction set architecture code.
    pub isa: u16,
    /// Display name for the ISA code.
    pub isa_name: Option<&'static str>,
    /// Object file version.
    pub object_file_version: u32,
    /// Display name for the object file version.
    pub object_file_version_name: Option<&'static str>,
    /// Entry point virtual address.
    pub entry_point: u64,
    /// File offset of the program header table.
    pub program_header_offset: u64,
    /// File offset of the section header table.
    pub section_header_offset: u64,
    /// Processor-specific flags.
    pub flags: u32,
    /// Size of this header.
    pub header_size: u16,
    /// Size of one program header entry.
    pub program_header_entry_size: u16,
    /// Number of program header entries.
    pub program_header_entry_count: u16,
    /// Size of one section header entry.
    pub section_header_entry_size: u16,
    /// Number of section header entries.
    pub section_header_entry_count: u16,
    /// Index of the section holding section names.
    pub section_header_name_index: u16,
}

impl ElfHeader {
    /// Decode the file header from the start of `data`.
    ///
    /// Hard failures are limited to an empty buffer and a magic mismatch.
    /// Unrecognized enum codes and truncated trailing fields leave the
    /// affected output field at its default, log a warning, and decoding
    /// continues with the next field. An unrecognized class skips the whole
    /// width-dependent block (the trailing fields have no defined position
    /// without a class); an unrecognized data encoding zeroes every
    /// multi-byte field.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::EmptyInput`] on an empty buffer and
    /// [`DecodeError::NotElf`] when the buffer does not start with the ELF
    /// magic.
    pub fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        if data.is_empty() {
            return Err(DecodeError::EmptyInput);
        }
        if data.len() < ELF_MAGIC.len() || data[..4] != ELF_MAGIC {
            return Err(DecodeError::NotElf);
        }
        let magic = ELF_MAGIC;

        let class_byte = field_byte(data, 0x04, "class");
        let class = ElfClass::from_byte(class_byte);
        let class_name = names::CLASS.lookup(u32::from(class_byte));
        if class == ElfClass::None {
            log::warn!("class byte {class_byte} is not 32-bit or 64-bit, decoding degraded");
        }

        // The byte order must be pinned down before any multi-byte field.
        let encoding_byte = field_byte(data, 0x05, "data encoding");
        let data_encoding = DataEncoding::from_byte(encoding_byte);
        let data_encoding_name = names::DATA_ENCODING.lookup(u32::from(encoding_byte));
        let order = data_encoding.byte_order();

        let version = field_byte(data, 0x06, "version");
        let os_abi = field_byte(data, 0x07, "os_abi");
        let os_abi_name = names::OS_ABI.lookup(u32::from(os_abi));
        let abi_version = field_byte(data, 0x08, "abi_version");

        let mut pad = [0u8; 7];
        let avail = data.len().saturating_sub(0x09).min(pad.len());
        // get() rather than indexing: 0x09 is past the end of a short buffer.
        let src = data.get(0x09..0x09 + avail).unwrap_or(&[]);
        pad[..src.len()].copy_from_slice(src);
        if avail < pad.len() {
            log::warn!("pad at offset 0x9: input truncated, remainder defaults to 0");
        }

        let object_type = field_u16(data, 0x10, order, "object_type");
        let object_type_name = names::OBJECT_TYPE.lookup(u32::from(object_type));
        let isa = field_u16(data, 0x12, order, "isa");
        let isa_name = names::ISA.lookup(u32::from(isa));
        let object_file_version = field_u32(data, 0x14, order, "object_file_version");
        let object_file_version_name = names::OBJECT_FILE_VERSION.lookup(object_file_version);

        let mut entry_point = 0;
        let mut program_header_offset = 0;
        let mut section_header_offset = 0;
        let mut flags = 0;
        let mut header_size = 0;
        let mut program_header_entry_size = 0;
        let mut program_header_entry_count = 0;
        let mut section_header_entry_size = 0;
        let mut section_header_entry_count = 0;
        let mut section_header_name_index = 0;

        if let Some(profile) = class.profile() {
            let width = profile.addr_width;
            let mut cursor = ADDR_BLOCK_OFFSET;

            entry_point = field_addr(data, cursor, width, order, "entry_point");
            cursor += width;
            program_header_offset = field_addr(data, cursor, width, order, "program_header_offset");
            cursor += width;
            section_header_offset = field_addr(data, cursor, width, order, "section_header_offset");
            cursor += width;

            flags = field_u32(data, cursor, order, "flags");
            cursor += 4;
            header_size = field_u16(data, cursor, order, "header_size");
            cursor += 2;
            program_header_entry_size = field_u16(data, cursor, order, "program_header_entry_size");
            cursor += 2;
            program_header_entry_count =
                field_u16(data, cursor, order, "program_header_entry_count");
            cursor += 2;
            section_header_entry_size = field_u16(data, cursor, order, "section_header_entry_size");
            cursor += 2;
            section_header_entry_count =
                field_u16(data, cursor, order, "section_header_entry_count");
            cursor += 2;
            section_header_name_index = field_u16(data, cursor, order, "section_header_name_index");
        } else {
            log::warn!("class unresolved, width-dependent fields default to 0");
        }

        Ok(Self {
            magic,
            class,
            class_name,
            data_encoding,
            data_encoding_name,
            version,
            os_abi,
            os_abi_name,
            abi_version,
            pad,
            object_type,
            object_type_name,
            isa,
            isa_name,
            object_file_version,
            object_file_version_name,
            entry_point,
            program_header_offset,
            section_header_offset,
            flags,
            header_size,
            program_header_entry_size,
            program_header_entry_count,
            section_header_entry_size,
            section_header_entry_count,
            section_header_name_index,
        })
    }
}

/// Read a single identification byte, defaulting to zero past the end of a
/// truncated buffer.
fn field_byte(data: &[u8], offset: usize, field: &str) -> u8 {
    data.get(offset).copied().unwrap_or_else(|| {
        log::warn!("{field} at offset {offset:#x}: input truncated, defaulting to 0");
        0
    })
}

/// Best-effort 2-byte field read.
#[expect(
    clippy::cast_possible_truncation,
    reason = "a 2-byte read always fits u16"
)]
fn field_u16(data: &[u8], offset: usize, order: Option<ByteOrder>, field: &str) -> u16 {
    match order {
        Some(order) => bytes::read_u32_or_zero(data, offset, 2, order, field) as u16,
        None => {
            log::warn!("{field}: data encoding unresolved, defaulting to 0");
            0
        }
    }
}

/// Best-effort 4-byte field read.
fn field_u32(data: &[u8], offset: usize, order: Option<ByteOrder>, field: &str) -> u32 {
    match order {
        Some(order) => bytes::read_u32_or_zero(data, offset, 4, order, field),
        None => {
            log::warn!("{field}: data encoding unresolved, defaulting to 0");
            0
        }
    }
}

/// Best-effort class-width (4- or 8-byte) field read, widened to `u64`.
fn field_addr(
    data: &[u8],
    offset: usize,
    width: usize,
    order: Option<ByteOrder>,
    field: &str,
) -> u64 {
    match order {
        Some(order) => bytes::read_u64_or_zero(data, offset, width, order, field),
        None => {
            log::warn!("{field}: data encoding unresolved, defaulting to 0");
            0
        }
    }
}
