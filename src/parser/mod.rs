//! Lexical/syntactic/semantic analysis of a single line (spec.md §4.2).

pub mod ald;
pub mod operand;

use std::collections::HashSet;

pub use ald::{Ald, AldKind, CommandLine, DirectiveKind};
pub use operand::{AddressingMode, Operand, ScalarValue};

use crate::lexicon::{self, Opcode};
use crate::limits::MAX_SYMBOL_LEN;

/// Names claimed so far while scanning a file top-to-bottom: constants
/// seen on earlier lines, plus the macro names the preprocessor already
/// resolved. Used only to enforce the identifier rule's "not already
/// defined" clauses at parse time for names that can't be forward-
/// referenced (macros, constants). Label redefinition is deliberately
/// left unchecked here: a label may legally appear as a `.entry`/`.extern`
/// forward reference before its defining line, so only the first pass,
/// which builds the real address-bearing symbol table, can tell a
/// redefinition from a promotion — it is authoritative for that error.
pub struct NameRegistry<'a> {
    macro_names: &'a HashSet<String>,
    constants: HashSet<String>,
}

impl<'a> NameRegistry<'a> {
    pub fn new(macro_names: &'a HashSet<String>) -> Self {
        NameRegistry {
            macro_names,
            constants: HashSet::new(),
        }
    }

    fn is_macro(&self, name: &str) -> bool {
        self.macro_names.contains(name)
    }

    fn is_constant(&self, name: &str) -> bool {
        self.constants.contains(name)
    }

    fn observe(&mut self, ald: &Ald) {
        if ald.error.is_some() {
            return;
        }
        if let AldKind::ConstantDef { name, .. } = &ald.kind {
            self.constants.insert(name.clone());
        }
    }
}

/// Parse an entire (already macro-expanded) source into one [`Ald`] per
/// line, threading a [`NameRegistry`] through in source order.
pub fn parse_program(expanded_source: &str, macro_names: &HashSet<String>) -> Vec<Ald> {
    let mut registry = NameRegistry::new(macro_names);
    let mut alds = Vec::with_capacity(crate::limits::INITIAL_CAPACITY);
    for (index, line) in expanded_source.lines().enumerate() {
        let ald = ald::parse_line(index + 1, line, &registry);
        registry.observe(&ald);
        alds.push(ald);
    }
    alds
}

/// Validate that a token could be an identifier: 1-31 characters, first
/// alphabetic, remainder alphanumeric. Does not check reservation or
/// uniqueness — used for names that are *referenced* rather than newly
/// declared (operand labels, `.entry`/`.extern` targets, `.data` constant
/// references).
pub fn validate_identifier_shape(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Empty identifier".to_string());
    }
    if name.len() > MAX_SYMBOL_LEN {
        return Err(format!("Identifier longer than {MAX_SYMBOL_LEN} characters"));
    }
    let mut chars = name.chars();
    let first = chars.next().unwrap();
    if !first.is_ascii_alphabetic() {
        return Err("Identifier must start with a letter".to_string());
    }
    if !chars.all(|c| c.is_ascii_alphanumeric()) {
        return Err("Identifier must be alphanumeric".to_string());
    }
    Ok(())
}

/// Full identifier rule for a name being freshly *declared* (a label or a
/// `.define`d constant): shape, plus none of reserved/opcode/register/
/// directive/macro/already-defined.
pub fn validate_new_identifier(name: &str, registry: &NameRegistry) -> Result<(), String> {
    validate_identifier_shape(name)?;
    if lexicon::is_reserved_word(name) {
        return Err("Reserved word".to_string());
    }
    if Opcode::from_mnemonic(name).is_some() {
        return Err("Opcode name".to_string());
    }
    if lexicon::is_register(name).is_some() {
        return Err("Register name".to_string());
    }
    if lexicon::is_directive(name) {
        return Err("Directive name".to_string());
    }
    if registry.is_macro(name) {
        return Err("Already defined as a macro".to_string());
    }
    if registry.is_constant(name) {
        return Err("Already defined as a constant".to_string());
    }
    Ok(())
}

/// Parse a decimal integer with an optional leading sign. Rejects a bare
/// `0` and any leading-zero form (e.g. `007`) since the source format
/// treats those as possibly-octal — preserved from the original assembler
/// verbatim (spec.md §9 Open Question; not our call to silently fix).
pub fn parse_signed_int(token: &str) -> Option<i32> {
    let (sign, digits) = if let Some(rest) = token.strip_prefix('-') {
        (-1i32, rest)
    } else if let Some(rest) = token.strip_prefix('+') {
        (1i32, rest)
    } else {
        (1i32, token)
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits == "0" || digits.starts_with('0') {
        return None;
    }
    digits.parse::<i32>().ok().map(|value| value * sign)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bare_zero() {
        assert_eq!(parse_signed_int("0"), None);
    }

    #[test]
    fn rejects_leading_zero() {
        assert_eq!(parse_signed_int("007"), None);
    }

    #[test]
    fn accepts_signed_values() {
        assert_eq!(parse_signed_int("42"), Some(42));
        assert_eq!(parse_signed_int("-42"), Some(-42));
        assert_eq!(parse_signed_int("+7"), Some(7));
    }

    #[test]
    fn identifier_shape_enforces_length_and_charset() {
        assert!(validate_identifier_shape("LOOP1").is_ok());
        assert!(validate_identifier_shape("1LOOP").is_err());
        assert!(validate_identifier_shape(&"a".repeat(32)).is_err());
    }

    #[test]
    fn empty_and_comment_lines() {
        let macros = HashSet::new();
        let alds = parse_program("\n; just a comment\n   \n", &macros);
        assert!(matches!(alds[0].kind, AldKind::Empty));
        assert!(matches!(alds[1].kind, AldKind::Comment));
        assert!(matches!(alds[2].kind, AldKind::Empty));
    }

    #[test]
    fn parses_constant_definition() {
        let macros = HashSet::new();
        let alds = parse_program(".define sz = 3", &macros);
        assert!(alds[0].error.is_none());
        match &alds[0].kind {
            AldKind::ConstantDef { name, value } => {
                assert_eq!(name, "sz");
                assert_eq!(*value, 3);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicate_constant_name() {
        let macros = HashSet::new();
        let alds = parse_program(".define sz = 3\n.define sz = 4", &macros);
        assert!(alds[1].error.is_some());
    }

    #[test]
    fn parses_labeled_command_with_two_operands() {
        let macros = HashSet::new();
        let alds = parse_program("LOOP: mov #sz, r1", &macros);
        let ald = &alds[0];
        assert_eq!(ald.label.as_deref(), Some("LOOP"));
        assert!(matches!(&ald.kind, AldKind::Command(_)));
    }

    #[test]
    fn drops_label_on_entry_with_warning() {
        let macros = HashSet::new();
        let alds = parse_program("FOO: .entry BAR", &macros);
        assert!(alds[0].label.is_none());
        assert!(alds[0].warning.is_some());
    }

    #[test]
    fn rejects_one_operand_opcode_with_comma() {
        let macros = HashSet::new();
        let alds = parse_program("inc r1, r2", &macros);
        assert!(alds[0].error.is_some());
    }

    #[test]
    fn rejects_two_operand_opcode_missing_comma() {
        let macros = HashSet::new();
        let alds = parse_program("mov r1 r2", &macros);
        assert!(alds[0].error.is_some());
    }
}
