//! The `.define` constants table: a flat name-to-value map consulted during
//! both passes (spec.md §3, §9 "Constants as compile-time substitution").

use std::collections::HashMap;

use crate::limits::INITIAL_CAPACITY;

#[derive(Debug, Clone)]
pub struct Constant {
    pub name: String,
    pub value: i32,
}

#[derive(Debug, Default)]
pub struct ConstantsTable {
    constants: HashMap<String, i32>,
}

impl ConstantsTable {
    pub fn new() -> Self {
        ConstantsTable {
            constants: HashMap::with_capacity(INITIAL_CAPACITY),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constants.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<i32> {
        self.constants.get(name).copied()
    }

    pub fn insert(&mut self, name: String, value: i32) {
        self.constants.insert(name, value);
    }
}
