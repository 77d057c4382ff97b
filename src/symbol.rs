//! The symbol table: labels, entry/extern markers and defined constants
//! share one namespace (spec.md §3).

use std::collections::HashMap;

use crate::limits::INITIAL_CAPACITY;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    CodeLabel,
    DataLabel,
    /// An `.entry` seen before its defining line; promoted once the label
    /// is actually defined.
    TempEntryLabel,
    ExternLabel,
    EntryCodeLabel,
    EntryDataLabel,
    DefinedConstant,
}

impl SymbolKind {
    pub fn is_data(self) -> bool {
        matches!(self, SymbolKind::DataLabel | SymbolKind::EntryDataLabel)
    }

    pub fn is_entry(self) -> bool {
        matches!(self, SymbolKind::EntryCodeLabel | SymbolKind::EntryDataLabel)
    }
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub address: i32,
}

/// Name-unique table of every label, temp-entry, extern and constant seen
/// during the first pass. Append-only except for the single permitted
/// mutation: promoting a `TempEntryLabel` once its definition is reached.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: HashMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            symbols: HashMap::with_capacity(INITIAL_CAPACITY),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    /// Insert a brand-new symbol. Callers are responsible for checking
    /// `contains` first; this never overwrites.
    pub fn insert(&mut self, symbol: Symbol) {
        self.symbols.insert(symbol.name.clone(), symbol);
    }

    /// Promote a `TempEntryLabel` (or any existing symbol) to a new kind and
    /// address, the one mutation the data model allows after insertion.
    pub fn promote(&mut self, name: &str, kind: SymbolKind, address: i32) {
        if let Some(symbol) = self.symbols.get_mut(name) {
            symbol.kind = kind;
            symbol.address = address;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Symbol> {
        self.symbols.values_mut()
    }

    /// Post-increment every data-label address by the final instruction
    /// count so code and data share one flat address space (spec.md §3).
    pub fn offset_data_labels(&mut self, final_ic: i32) {
        for symbol in self.symbols.values_mut() {
            if symbol.kind.is_data() {
                symbol.address += final_ic;
            }
        }
    }

    pub fn entries(&self) -> Vec<&Symbol> {
        let mut entries: Vec<&Symbol> = self.symbols.values().filter(|s| s.kind.is_entry()).collect();
        entries.sort_by_key(|s| s.address);
        entries
    }
}
