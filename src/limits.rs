//! Fixed numeric limits the assembler's encoding is built around.
//!
//! None of these are user-configurable: they fall out of the machine's
//! 14-bit word width and the source-format conventions of the assembled
//! language, so they live here as plain constants rather than behind a
//! config layer.

/// Maximum length of a single source line, excluding the line terminator.
pub const MAX_LINE_LENGTH: usize = 80;

/// Maximum length of a symbol name (label or constant).
pub const MAX_SYMBOL_LEN: usize = 31;

/// Starting value of the instruction counter.
pub const IC_INIT: i32 = 100;

/// Starting value of the data counter.
pub const DC_INIT: i32 = 0;

/// Width in bits of a machine word.
pub const WORD_BITS: u32 = 14;

/// Width in bits of an immediate/index value once sign-extended into a word.
pub const IMMEDIATE_BITS: u32 = 12;

pub const IMMEDIATE_MIN: i32 = -2048;
pub const IMMEDIATE_MAX: i32 = 2047;

/// Initial capacity for the translation unit's growable containers. Not
/// load-bearing: `Vec` already doubles on its own, this just documents the
/// contract inherited from the source's hand-rolled arrays.
pub const INITIAL_CAPACITY: usize = 10;
