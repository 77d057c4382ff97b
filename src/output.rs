//! Object/entry/extern file serialization (spec.md §6).
//!
//! Grounded in the teacher's disassembler text-format writers, generalized
//! from CHIP-8 opcode dumps to the base-4 glyph format this machine's
//! object files use.

use std::io;
use std::path::Path;

use crate::translation_unit::TranslationUnit;

const GLYPHS: [char; 4] = ['*', '#', '%', '!'];

/// Mask a raw data value down to the machine's 14-bit word width. Code
/// words are already masked by the second pass; this exists for
/// `data_image`, which keeps values un-truncated until output time.
pub fn mask_to_word(value: i32) -> u16 {
    (value & 0x3FFF) as u16
}

/// Render a 14-bit word as 7 base-4 glyphs, most-significant digit first.
pub fn word_to_base4(word: u16) -> String {
    let mut glyphs = String::with_capacity(7);
    for shift in (0..7).rev() {
        let digit = (word >> (shift * 2)) & 0b11;
        glyphs.push(GLYPHS[digit as usize]);
    }
    glyphs
}

/// `B.ob`: header line, then one `<addr4d> <glyphs>` line per code word,
/// then one per data word, addresses starting at 100 and running
/// contiguously across both images.
pub fn write_object_file(path: &Path, unit: &TranslationUnit) -> io::Result<()> {
    let mut body = String::new();
    body.push_str(&format!(
        "  {} {}\n",
        unit.code_image.len(),
        unit.data_image.len()
    ));

    let mut address = 100;
    for word in &unit.code_image {
        body.push_str(&format!("{address:04} {}\n", word_to_base4(*word)));
        address += 1;
    }
    for value in &unit.data_image {
        body.push_str(&format!("{address:04} {}\n", word_to_base4(mask_to_word(*value))));
        address += 1;
    }

    std::fs::write(path, body)
}

/// `B.ent`: one `<name>\t<addr4d>` line per entry, sorted by address.
/// Not written at all if there are no entries.
pub fn write_entries_file(path: &Path, unit: &TranslationUnit) -> io::Result<()> {
    let entries = unit.symbols.entries();
    if entries.is_empty() {
        return Ok(());
    }
    let mut body = String::new();
    for symbol in entries {
        body.push_str(&format!("{}\t{:04}\n", symbol.name, symbol.address));
    }
    std::fs::write(path, body)
}

/// `B.ext`: one `<name>\t<addr4d>` line per extern *use site*, sorted by
/// address. Not written at all if no extern was referenced.
pub fn write_externs_file(path: &Path, unit: &TranslationUnit) -> io::Result<()> {
    if unit.externs.is_empty() {
        return Ok(());
    }
    let mut uses = unit.externs.clone();
    uses.sort_by_key(|use_record| use_record.address);
    let mut body = String::new();
    for use_record in uses {
        body.push_str(&format!("{}\t{:04}\n", use_record.name, use_record.address));
    }
    std::fs::write(path, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hlt_word_renders_to_scenario_s1_glyphs() {
        assert_eq!(word_to_base4(0x3C0), "**!!***");
    }

    #[test]
    fn mask_wraps_negative_values_into_14_bits() {
        assert_eq!(mask_to_word(-1), 0x3FFF);
    }

    #[test]
    fn object_header_counts_words_not_the_ic_counter() {
        let mut unit = TranslationUnit::new();
        unit.code_image.push(0x3C0);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.ob");
        write_object_file(&path, &unit).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("  1 0\n"));
        assert!(contents.contains("0100 **!!***\n"));
    }
}
