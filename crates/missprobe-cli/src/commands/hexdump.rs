//! Hexdump command implementation.
//!
//! Displays raw replay container bytes in traditional hexdump format, useful
//! for investigating header fields and the compressed blob boundaries.
//!
//! # Output Format
//!
//! ```text
//! 0x000: 00 14 34 33 01 0B 20 36  63 31 62 64 65 30 66 34  |..43.. 6c1bde0f4|
//! ```

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result, bail};

/// Parse a hex offset string (with or without 0x prefix).
pub fn parse_hex_offset(s: &str) -> Result<usize> {
    let digits = s.trim_start_matches("0x").trim_start_matches("0X");
    usize::from_str_radix(digits, 16).with_context(|| format!("Invalid hex offset: {}", s))
}

/// Render `bytes` 16 per line, offsets relative to `base`
pub fn format_hexdump(bytes: &[u8], base: usize, ascii: bool) -> String {
    let mut output = String::new();

    for (i, chunk) in bytes.chunks(16).enumerate() {
        let _ = write!(output, "0x{:03X}: ", base + i * 16);

        for j in 0..16 {
            if j == 8 {
                output.push(' ');
            }
            match chunk.get(j) {
                Some(byte) => {
                    let _ = write!(output, "{:02X} ", byte);
                }
                None => output.push_str("   "),
            }
        }

        if ascii {
            output.push_str(" |");
            for &byte in chunk {
                output.push(if (0x20..0x7F).contains(&byte) {
                    byte as char
                } else {
                    '.'
                });
            }
            output.push_str(&" ".repeat(16 - chunk.len()));
            output.push('|');
        }

        output.push('\n');
    }

    output
}

/// Run the hexdump command
pub fn run(replay_path: &Path, offset: &str, size: usize, ascii: bool) -> Result<()> {
    let start = parse_hex_offset(offset)?;
    let bytes = std::fs::read(replay_path)
        .with_context(|| format!("Failed to read {}", replay_path.display()))?;

    if start >= bytes.len() {
        bail!(
            "Offset 0x{:X} is past the end of the file ({} bytes)",
            start,
            bytes.len()
        );
    }
    let end = start.saturating_add(size).min(bytes.len());

    println!("Hexdump at 0x{:X} ({} bytes):", start, end - start);
    println!();
    print!("{}", format_hexdump(&bytes[start..end], start, ascii));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_offset_with_prefix() {
        assert_eq!(parse_hex_offset("0x1000").unwrap(), 0x1000);
        assert_eq!(parse_hex_offset("0X1F").unwrap(), 0x1F);
    }

    #[test]
    fn test_parse_hex_offset_without_prefix() {
        assert_eq!(parse_hex_offset("0").unwrap(), 0);
        assert_eq!(parse_hex_offset("DEAD").unwrap(), 0xDEAD);
    }

    #[test]
    fn test_parse_hex_offset_invalid() {
        assert!(parse_hex_offset("GHIJK").is_err());
        assert!(parse_hex_offset("0xZZZ").is_err());
    }

    #[test]
    fn test_format_full_line_with_ascii() {
        let bytes = b"Hello World\0\0\0\0\0";
        assert_eq!(
            format_hexdump(bytes, 0, true),
            "0x000: 48 65 6C 6C 6F 20 57 6F  72 6C 64 00 00 00 00 00  |Hello World.....|\n"
        );
    }

    #[test]
    fn test_format_partial_line_is_padded() {
        let dump = format_hexdump(&[0x0B, 0x03], 0x20, true);
        let expected = format!("0x020: 0B 03 {}  |..{}|\n", "   ".repeat(14), " ".repeat(14));
        assert_eq!(dump, expected);
    }
}
