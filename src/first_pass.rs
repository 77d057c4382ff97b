//! First pass: symbol table and IC/DC construction (spec.md §4.3).

use crate::encoding;
use crate::error::AssemblerError;
use crate::parser::{Ald, AldKind, DirectiveKind, ScalarValue};
use crate::symbol::{Symbol, SymbolKind};
use crate::translation_unit::TranslationUnit;

/// Walk every ALD once, building the symbol table, constants table, data
/// image and IC/DC. Returns the accumulated errors; the caller decides
/// whether to proceed to the second pass (it should not, on any error —
/// mirrors the source's `process_file`, which never runs the second pass
/// over a file whose first pass failed).
pub fn first_pass(alds: &[Ald], file_stem: &str, unit: &mut TranslationUnit) -> Vec<AssemblerError> {
    let mut errors = Vec::new();

    for ald in alds {
        if let Some(message) = &ald.error {
            errors.push(AssemblerError::Syntax {
                file: file_stem.to_string(),
                line: ald.line_number,
                message: message.clone(),
            });
            continue;
        }

        if let Some(label) = &ald.label {
            handle_label(unit, label, &ald.kind, file_stem, ald.line_number, &mut errors);
        }

        match &ald.kind {
            AldKind::Empty | AldKind::Comment => {}
            AldKind::ConstantDef { name, value } => {
                handle_constant_def(unit, name, *value, file_stem, ald.line_number, &mut errors);
            }
            AldKind::Directive(DirectiveKind::Data(elements)) => {
                handle_data(unit, elements, file_stem, ald.line_number, &mut errors);
            }
            AldKind::Directive(DirectiveKind::StringLit(text)) => {
                handle_string(unit, text);
            }
            AldKind::Directive(DirectiveKind::Entry(name)) => {
                handle_entry(unit, name, file_stem, ald.line_number, &mut errors);
            }
            AldKind::Directive(DirectiveKind::Extern(name)) => {
                handle_extern(unit, name, file_stem, ald.line_number, &mut errors);
            }
            AldKind::Command(cmd) => {
                handle_command(unit, cmd, file_stem, ald.line_number, &mut errors);
            }
        }
    }

    finalize(unit, file_stem, &mut errors);
    errors
}

fn handle_label(
    unit: &mut TranslationUnit,
    label: &str,
    kind: &AldKind,
    file_stem: &str,
    line: usize,
    errors: &mut Vec<AssemblerError>,
) {
    let is_data_line = matches!(
        kind,
        AldKind::Directive(DirectiveKind::Data(_)) | AldKind::Directive(DirectiveKind::StringLit(_))
    );
    let address = if is_data_line { unit.dc } else { unit.ic };

    match unit.symbols.get(label).map(|s| s.kind) {
        Some(SymbolKind::TempEntryLabel) => {
            let promoted = if is_data_line {
                SymbolKind::EntryDataLabel
            } else {
                SymbolKind::EntryCodeLabel
            };
            unit.symbols.promote(label, promoted, address);
        }
        Some(_) => {
            errors.push(AssemblerError::Semantic {
                file: file_stem.to_string(),
                line,
                message: format!("Symbol Redefinition::{label} already declared"),
            });
        }
        None => {
            let new_kind = if is_data_line {
                SymbolKind::DataLabel
            } else {
                SymbolKind::CodeLabel
            };
            unit.symbols.insert(Symbol {
                name: label.to_string(),
                kind: new_kind,
                address,
            });
        }
    }
}

fn handle_constant_def(
    unit: &mut TranslationUnit,
    name: &str,
    value: i32,
    file_stem: &str,
    line: usize,
    errors: &mut Vec<AssemblerError>,
) {
    if unit.symbols.contains(name) {
        errors.push(AssemblerError::Semantic {
            file: file_stem.to_string(),
            line,
            message: format!("Symbol Redefinition::{name} already declared"),
        });
        return;
    }
    unit.symbols.insert(Symbol {
        name: name.to_string(),
        kind: SymbolKind::DefinedConstant,
        address: value,
    });
    unit.constants.insert(name.to_string(), value);
}

fn handle_data(
    unit: &mut TranslationUnit,
    elements: &[ScalarValue],
    file_stem: &str,
    line: usize,
    errors: &mut Vec<AssemblerError>,
) {
    for element in elements {
        match resolve_scalar(element, unit) {
            Some(value) => {
                unit.data_image.push(value);
                unit.dc += 1;
            }
            None => errors.push(AssemblerError::Semantic {
                file: file_stem.to_string(),
                line,
                message: format!("Undefined Constant::{}", scalar_name(element)),
            }),
        }
    }
}

fn handle_string(unit: &mut TranslationUnit, text: &str) {
    for ch in text.chars() {
        unit.data_image.push(ch as i32);
    }
    unit.data_image.push(0);
    unit.dc += text.chars().count() as i32 + 1;
}

fn handle_entry(
    unit: &mut TranslationUnit,
    name: &str,
    file_stem: &str,
    line: usize,
    errors: &mut Vec<AssemblerError>,
) {
    match unit.symbols.get(name).map(|s| (s.kind, s.address)) {
        Some((SymbolKind::CodeLabel, address)) => {
            unit.symbols.promote(name, SymbolKind::EntryCodeLabel, address);
        }
        Some((SymbolKind::DataLabel, address)) => {
            unit.symbols.promote(name, SymbolKind::EntryDataLabel, address);
        }
        Some((_, _)) => {
            errors.push(AssemblerError::Semantic {
                file: file_stem.to_string(),
                line,
                message: format!("Invalid Entry Declaration::{name} already declared with incompatible kind"),
            });
        }
        None => {
            unit.symbols.insert(Symbol {
                name: name.to_string(),
                kind: SymbolKind::TempEntryLabel,
                address: -1,
            });
        }
    }
}

fn handle_extern(
    unit: &mut TranslationUnit,
    name: &str,
    file_stem: &str,
    line: usize,
    errors: &mut Vec<AssemblerError>,
) {
    if unit.symbols.contains(name) {
        errors.push(AssemblerError::Semantic {
            file: file_stem.to_string(),
            line,
            message: format!("Symbol Redefinition::{name} already declared"),
        });
        return;
    }
    unit.symbols.insert(Symbol {
        name: name.to_string(),
        kind: SymbolKind::ExternLabel,
        address: 0,
    });
}

fn handle_command(
    unit: &mut TranslationUnit,
    cmd: &crate::parser::CommandLine,
    file_stem: &str,
    line: usize,
    errors: &mut Vec<AssemblerError>,
) {
    if let Some(source) = &cmd.source {
        if !cmd.opcode.allowed_source().contains(&source.mode()) {
            errors.push(AssemblerError::Semantic {
                file: file_stem.to_string(),
                line,
                message: format!(
                    "Illegal Addressing Mode::{} is not a legal source for {}",
                    mode_name(source.mode()),
                    cmd.opcode.mnemonic()
                ),
            });
        }
    }
    if let Some(target) = &cmd.target {
        if !cmd.opcode.allowed_target().contains(&target.mode()) {
            errors.push(AssemblerError::Semantic {
                file: file_stem.to_string(),
                line,
                message: format!(
                    "Illegal Addressing Mode::{} is not a legal target for {}",
                    mode_name(target.mode()),
                    cmd.opcode.mnemonic()
                ),
            });
        }
    }

    unit.ic += encoding::instruction_word_count(cmd);
}

fn finalize(unit: &mut TranslationUnit, file_stem: &str, errors: &mut Vec<AssemblerError>) {
    let unresolved: Vec<String> = unit
        .symbols
        .iter()
        .filter(|s| s.kind == SymbolKind::TempEntryLabel)
        .map(|s| s.name.clone())
        .collect();
    for name in unresolved {
        errors.push(AssemblerError::UnresolvedEntry {
            file: file_stem.to_string(),
            name,
        });
    }
    unit.symbols.offset_data_labels(unit.ic);
}

fn resolve_scalar(value: &ScalarValue, unit: &TranslationUnit) -> Option<i32> {
    match value {
        ScalarValue::Int(v) => Some(*v),
        ScalarValue::Constant(name) => unit.constants.get(name),
    }
}

fn scalar_name(value: &ScalarValue) -> &str {
    match value {
        ScalarValue::Int(_) => "",
        ScalarValue::Constant(name) => name,
    }
}

fn mode_name(mode: crate::parser::AddressingMode) -> &'static str {
    use crate::parser::AddressingMode::*;
    match mode {
        Immediate => "immediate",
        Direct => "direct",
        FixedIndex => "fixed-index",
        DirectRegister => "direct-register",
    }
}
