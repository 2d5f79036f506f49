//! Hex dump rendering
//!
//! ```text
//! 00001000  4D 5A 90 00 03 00 00 00 04 00 00 00 FF FF 00 00  MZ..............
//! ```
//!
//! Each line holds the absolute address (at least 8 hex digits), the bytes
//! as uppercase hex pairs and their printable ASCII form. A short last line
//! is padded so the ASCII column stays aligned.

use crate::core::types::Address;

/// Default number of bytes per line
pub const DEFAULT_BYTES_PER_LINE: usize = 16;

/// Renders byte buffers as a fixed-width hex + ASCII table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexDumpRenderer {
    bytes_per_line: usize,
    show_ascii: bool,
}

impl Default for HexDumpRenderer {
    fn default() -> Self {
        HexDumpRenderer {
            bytes_per_line: DEFAULT_BYTES_PER_LINE,
            show_ascii: true,
        }
    }
}

impl HexDumpRenderer {
    /// A `bytes_per_line` of zero is treated as one
    pub fn new(bytes_per_line: usize, show_ascii: bool) -> Self {
        HexDumpRenderer {
            bytes_per_line: bytes_per_line.max(1),
            show_ascii,
        }
    }

    pub fn bytes_per_line(&self) -> usize {
        self.bytes_per_line
    }

    /// Render `data` as if it were read from `base`
    pub fn render(&self, base: Address, data: &[u8]) -> String {
        let mut out = String::new();

        for (index, line) in data.chunks(self.bytes_per_line).enumerate() {
            let address = base.add((index * self.bytes_per_line) as u64);
            out.push_str(&format!("{:08X}  ", address.as_u64()));

            for column in 0..self.bytes_per_line {
                if column > 0 {
                    out.push(' ');
                }
                match line.get(column) {
                    Some(byte) => out.push_str(&format!("{:02X}", byte)),
                    None => out.push_str("  "),
                }
            }

            if self.show_ascii {
                out.push_str("  ");
                out.extend(line.iter().map(|&b| printable(b)));
            }
            out.push('\n');
        }

        out
    }
}

fn printable(byte: u8) -> char {
    if (0x20..=0x7E).contains(&byte) {
        byte as char
    } else {
        '.'
    }
}

/// Render with `bytes_per_line` columns and the ASCII column shown
pub fn render(base: Address, data: &[u8], bytes_per_line: usize) -> String {
    HexDumpRenderer::new(bytes_per_line, true).render(base, data)
}
