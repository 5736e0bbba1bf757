//! Raw hex dump of a file image.

use std::io::{self, Write};

/// Write `data` as hex, sixteen bytes per line, each line prefixed with its
/// offset.
///
/// # Errors
///
/// Returns any I/O error from the destination stream.
pub fn hex_dump(out: &mut impl Write, data: &[u8]) -> io::Result<()> {
    for (line, chunk) in data.chunks(16).enumerate() {
        write!(out, "{:08x}:", line * 16)?;
        for byte in chunk {
            write!(out, " {byte:02x}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}
