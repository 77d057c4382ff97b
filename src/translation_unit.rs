//! The per-file aggregate state shared by both passes (spec.md §3, §5):
//! symbol table, constants, code/data images, externs and entries. One
//! instance lives for exactly one input file and is discarded at the end
//! of processing — no state survives across files.

use crate::constants::ConstantsTable;
use crate::limits::{DC_INIT, IC_INIT, INITIAL_CAPACITY};
use crate::symbol::SymbolTable;

/// One occurrence of an extern symbol inside an encoded operand word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternUse {
    pub name: String,
    pub address: i32,
}

#[derive(Debug)]
pub struct TranslationUnit {
    pub symbols: SymbolTable,
    pub constants: ConstantsTable,
    pub code_image: Vec<u16>,
    /// Raw integer values, not yet truncated to 14 bits — masking happens
    /// once, at output time (`output::word_to_base4`).
    pub data_image: Vec<i32>,
    pub externs: Vec<ExternUse>,
    pub ic: i32,
    pub dc: i32,
}

impl TranslationUnit {
    pub fn new() -> Self {
        TranslationUnit {
            symbols: SymbolTable::new(),
            constants: ConstantsTable::new(),
            code_image: Vec::with_capacity(INITIAL_CAPACITY),
            data_image: Vec::with_capacity(INITIAL_CAPACITY),
            externs: Vec::with_capacity(INITIAL_CAPACITY),
            ic: IC_INIT,
            dc: DC_INIT,
        }
    }

    /// Address the next instruction's opcode word would land at.
    pub fn current_instruction_address(&self) -> i32 {
        self.ic
    }

    /// Address the next data datum would land at (pre-offset; see
    /// `SymbolTable::offset_data_labels`).
    pub fn current_data_address(&self) -> i32 {
        self.dc
    }
}

impl Default for TranslationUnit {
    fn default() -> Self {
        Self::new()
    }
}
