//! Bit-layout and word-count helpers shared by both passes, so the first
//! pass's IC bookkeeping always agrees with what the second pass actually
//! emits (spec.md §4.3/§4.4, properties P2 and P5).

use crate::limits::{IMMEDIATE_MAX, IMMEDIATE_MIN};
use crate::parser::{AddressingMode, CommandLine, Operand};

pub const ARE_ABSOLUTE: u16 = 0b00;
pub const ARE_EXTERNAL: u16 = 0b01;
pub const ARE_RELOCATABLE: u16 = 0b10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Source,
    Target,
}

/// Number of additional words an instruction's operands contribute,
/// applying the double-register optimization (spec.md §4.3 step 3, P5).
pub fn instruction_word_count(cmd: &CommandLine) -> i32 {
    if let (Some(Operand::DirectRegister(_)), Some(Operand::DirectRegister(_))) =
        (&cmd.source, &cmd.target)
    {
        return 2; // opcode word + one shared register word
    }
    let mut count = 1;
    if let Some(op) = &cmd.source {
        count += operand_word_count(op);
    }
    if let Some(op) = &cmd.target {
        count += operand_word_count(op);
    }
    count
}

pub fn operand_word_count(op: &Operand) -> i32 {
    match op {
        Operand::FixedIndex { .. } => 2,
        _ => 1,
    }
}

/// The opcode word: `[13..10] zeros, [9..6] opcode, [5..4] source mode,
/// [3..2] target mode, [1..0] ARE (always absolute)`.
pub fn opcode_word(
    opcode_code: u8,
    source_mode: Option<AddressingMode>,
    target_mode: Option<AddressingMode>,
) -> u16 {
    let src = source_mode.map(|m| m as u16).unwrap_or(0);
    let tgt = target_mode.map(|m| m as u16).unwrap_or(0);
    ((opcode_code as u16) << 6) | (src << 4) | (tgt << 2) | ARE_ABSOLUTE
}

/// An immediate or fixed-index-literal word: `[13..2] = 12-bit two's
/// complement value, [1..0] = 00`. Rejects anything outside
/// `[-2048, 2047]`; additionally rejects negative values when
/// `allow_negative` is false (fixed-index indices, spec.md §4.4).
pub fn encode_scalar_word(value: i32, allow_negative: bool) -> Result<u16, String> {
    if !allow_negative && value < 0 {
        return Err(format!("Negative Index::{value}"));
    }
    if value < IMMEDIATE_MIN || value > IMMEDIATE_MAX {
        return Err(format!("Binary Overflow::{value}"));
    }
    let masked = (value & 0xFFF) as u16;
    Ok((masked << 2) | ARE_ABSOLUTE)
}

/// A direct-addressing word for a symbol already known to exist:
/// `[13..2] = address, [1..0] = 10` for a relocatable (locally-defined)
/// symbol. External symbols are handled separately by the caller, since
/// they also need to emit an extern-use record.
pub fn direct_word(address: i32) -> u16 {
    let masked = (address & 0xFFF) as u16;
    (masked << 2) | ARE_RELOCATABLE
}

/// A direct-addressing word referencing an extern symbol: address field
/// is always zero, ARE = external.
pub fn extern_word() -> u16 {
    ARE_EXTERNAL
}

/// A direct-register word. Both passes place the register in the nibble
/// matching its operand role; the absent side is zero.
pub fn register_word(role: Role, register: u8) -> u16 {
    match role {
        Role::Source => (register as u16) << 5,
        Role::Target => (register as u16) << 2,
    }
}

/// The shared word for an instruction whose source *and* target are both
/// direct-register operands (spec.md §4.4, P5).
pub fn shared_register_word(source: u8, target: u8) -> u16 {
    ((source as u16) << 5) | ((target as u16) << 2)
}
