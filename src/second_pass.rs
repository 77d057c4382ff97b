//! Second pass: operand-word encoding with ARE bits (spec.md §4.4).
//!
//! Runs only over files whose first pass produced zero errors — mirrors
//! the source's `process_file`, which never reaches the second pass
//! otherwise. Errors found here (undefined label/constant, bit-overflow,
//! negative index) are collected in full before the caller decides
//! whether to write an object file.

use crate::encoding::{self, Role};
use crate::error::AssemblerError;
use crate::limits::IC_INIT;
use crate::parser::{Ald, AldKind, Operand, ScalarValue};
use crate::symbol::SymbolKind;
use crate::translation_unit::{ExternUse, TranslationUnit};

pub fn second_pass(alds: &[Ald], unit: &mut TranslationUnit, file_stem: &str) -> Vec<AssemblerError> {
    let mut errors = Vec::new();
    let mut ic = IC_INIT;

    for ald in alds {
        let AldKind::Command(cmd) = &ald.kind else {
            continue;
        };

        let opcode_word = encoding::opcode_word(
            cmd.opcode.code(),
            cmd.source.as_ref().map(Operand::mode),
            cmd.target.as_ref().map(Operand::mode),
        );
        unit.code_image.push(opcode_word);
        ic += 1;

        if let (Some(Operand::DirectRegister(source)), Some(Operand::DirectRegister(target))) =
            (&cmd.source, &cmd.target)
        {
            unit.code_image.push(encoding::shared_register_word(*source, *target));
            ic += 1;
            continue;
        }

        if let Some(op) = &cmd.source {
            encode_operand(op, Role::Source, unit, &mut ic, file_stem, ald.line_number, &mut errors);
        }
        if let Some(op) = &cmd.target {
            encode_operand(op, Role::Target, unit, &mut ic, file_stem, ald.line_number, &mut errors);
        }
    }

    errors
}

fn encode_operand(
    op: &Operand,
    role: Role,
    unit: &mut TranslationUnit,
    ic: &mut i32,
    file_stem: &str,
    line: usize,
    errors: &mut Vec<AssemblerError>,
) {
    let expected_words = encoding::operand_word_count(op);
    let word_address = *ic;

    match op {
        Operand::Immediate(value) => match resolve_scalar(value, unit, file_stem, line) {
            Ok(resolved) => match encoding::encode_scalar_word(resolved, true) {
                Ok(word) => unit.code_image.push(word),
                Err(message) => push_encoding_error(errors, file_stem, line, message),
            },
            Err(error) => errors.push(error),
        },
        Operand::Direct(name) => match encode_direct(name, unit, word_address, file_stem, line) {
            Ok((word, extern_use)) => {
                unit.code_image.push(word);
                if let Some(use_record) = extern_use {
                    unit.externs.push(use_record);
                }
            }
            Err(error) => errors.push(error),
        },
        Operand::FixedIndex { label, index } => {
            match encode_direct(label, unit, word_address, file_stem, line) {
                Ok((word, extern_use)) => {
                    unit.code_image.push(word);
                    if let Some(use_record) = extern_use {
                        unit.externs.push(use_record);
                    }
                }
                Err(error) => errors.push(error),
            }
            match resolve_scalar(index, unit, file_stem, line) {
                Ok(resolved) => match encoding::encode_scalar_word(resolved, false) {
                    Ok(word) => unit.code_image.push(word),
                    Err(message) => push_encoding_error(errors, file_stem, line, message),
                },
                Err(error) => errors.push(error),
            }
        }
        Operand::DirectRegister(register) => {
            unit.code_image.push(encoding::register_word(role, *register));
        }
    }

    *ic += expected_words;
}

fn encode_direct(
    name: &str,
    unit: &TranslationUnit,
    word_address: i32,
    file_stem: &str,
    line: usize,
) -> Result<(u16, Option<ExternUse>), AssemblerError> {
    match unit.symbols.get(name) {
        Some(symbol) if symbol.kind == SymbolKind::ExternLabel => Ok((
            encoding::extern_word(),
            Some(ExternUse {
                name: name.to_string(),
                address: word_address,
            }),
        )),
        Some(symbol) => Ok((encoding::direct_word(symbol.address), None)),
        None => Err(AssemblerError::Encoding {
            file: file_stem.to_string(),
            line,
            message: format!("Undefined Label::{name}"),
        }),
    }
}

fn resolve_scalar(
    value: &ScalarValue,
    unit: &TranslationUnit,
    file_stem: &str,
    line: usize,
) -> Result<i32, AssemblerError> {
    match value {
        ScalarValue::Int(v) => Ok(*v),
        ScalarValue::Constant(name) => unit.constants.get(name).ok_or_else(|| AssemblerError::Encoding {
            file: file_stem.to_string(),
            line,
            message: format!("Undefined Constant::{name}"),
        }),
    }
}

fn push_encoding_error(errors: &mut Vec<AssemblerError>, file_stem: &str, line: usize, message: String) {
    errors.push(AssemblerError::Encoding {
        file: file_stem.to_string(),
        line,
        message,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::first_pass::first_pass;
    use crate::parser::parse_program;
    use std::collections::HashSet;

    fn run(source: &str) -> (TranslationUnit, Vec<AssemblerError>) {
        let macros = HashSet::new();
        let alds = parse_program(source, &macros);
        let mut unit = TranslationUnit::new();
        let mut errors = first_pass(&alds, "f", &mut unit);
        assert!(errors.is_empty(), "first pass errors: {errors:?}");
        errors.extend(second_pass(&alds, &mut unit, "f"));
        (unit, errors)
    }

    #[test]
    fn scenario_s1_hlt_word() {
        let (unit, errors) = run("hlt\n");
        assert!(errors.is_empty());
        assert_eq!(unit.code_image, vec![0x3C0]);
    }

    #[test]
    fn scenario_s3_extern_use_recorded() {
        let (unit, errors) = run(".extern X\nmov X, r1\nhlt\n");
        assert!(errors.is_empty());
        // mov opcode + direct(extern) word + target register word + hlt opcode.
        assert_eq!(unit.code_image.len(), 4);
        assert_eq!(unit.externs.len(), 1);
        assert_eq!(unit.externs[0], ExternUse { name: "X".to_string(), address: 101 });
        // ARE bits of the second code word are External (01).
        assert_eq!(unit.code_image[1] & 0b11, 0b01);
    }

    #[test]
    fn scenario_s6_overflow_errors() {
        let (_, errors) = run("mov #5000, r1\n");
        assert!(!errors.is_empty());
    }

    #[test]
    fn fixed_index_negative_literal_index_errors() {
        let (_, errors) = run("ARR: .data 1, 2, 3\nmov ARR[-1], r1\n");
        assert!(!errors.is_empty());
    }

    #[test]
    fn double_register_instruction_emits_two_words() {
        let (unit, errors) = run("mov r1, r2\n");
        assert!(errors.is_empty());
        assert_eq!(unit.code_image.len(), 2);
    }
}
