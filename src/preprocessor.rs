//! Macro preprocessing (spec.md §4.1).
//!
//! Grounded in the teacher's own `preprocess()` (a single pass over
//! `source.lines()` building a new `String`), generalized from
//! comment-stripping to macro definition/expansion. Definitions always
//! precede use, are never nested, and a call emits the body once verbatim.

use std::collections::HashSet;

use crate::error::AssemblerError;
use crate::lexicon::{self, Opcode};
use crate::parser::validate_identifier_shape;

pub struct PreprocessOutput {
    pub expanded_source: String,
    pub macro_names: HashSet<String>,
}

/// Expand every `mcr NAME ... endmcr` definition and `NAME` invocation in
/// `source`, in source order. Any invalid macro name aborts the whole file
/// (spec.md §4.1: "Invalid macro name fails the whole file with a
/// 'preprocessor terminated' error").
pub fn preprocess(file_stem: &str, source: &str) -> Result<PreprocessOutput, AssemblerError> {
    let lines: Vec<&str> = source.lines().collect();
    let mut macros: std::collections::HashMap<String, Vec<String>> = std::collections::HashMap::new();
    let mut output = Vec::with_capacity(lines.len());

    let mut i = 0;
    while i < lines.len() {
        let trimmed = lines[i].trim();

        let mut mcr_tokens = trimmed.split_whitespace();
        if mcr_tokens.next() == Some("mcr") {
            let name = mcr_tokens.next().unwrap_or("");
            if mcr_tokens.next().is_some() || !is_valid_macro_name(name, &macros) {
                return Err(AssemblerError::PreprocessorMacroName {
                    file: file_stem.to_string(),
                });
            }
            let mut body = Vec::new();
            i += 1;
            while i < lines.len() && lines[i].trim() != "endmcr" {
                body.push(lines[i].to_string());
                i += 1;
            }
            // Unterminated definitions run to end of file; spec.md is
            // silent on this malformed case, so the body is whatever
            // preceded it rather than a hard parser error.
            macros.insert(name.to_string(), body);
            i += 1;
            continue;
        }

        if let Some(body) = macros.get(trimmed) {
            output.extend(body.iter().cloned());
        } else {
            output.push(lines[i].to_string());
        }
        i += 1;
    }

    Ok(PreprocessOutput {
        expanded_source: output.join("\n"),
        macro_names: macros.into_keys().collect(),
    })
}

fn is_valid_macro_name(name: &str, macros: &std::collections::HashMap<String, Vec<String>>) -> bool {
    validate_identifier_shape(name).is_ok()
        && !lexicon::is_reserved_word(name)
        && Opcode::from_mnemonic(name).is_none()
        && lexicon::is_register(name).is_none()
        && !lexicon::is_directive(name)
        && !macros.contains_key(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_a_macro_call() {
        let source = "mcr greet\nmov #1, r1\nendmcr\ngreet\nhlt";
        let out = preprocess("f", source).unwrap();
        assert_eq!(out.expanded_source, "mov #1, r1\nhlt");
        assert!(out.macro_names.contains("greet"));
    }

    #[test]
    fn leaves_non_macro_lines_untouched() {
        let source = "hlt";
        let out = preprocess("f", source).unwrap();
        assert_eq!(out.expanded_source, "hlt");
    }

    #[test]
    fn rejects_macro_named_after_an_opcode() {
        let source = "mcr mov\nhlt\nendmcr\nmov";
        assert!(preprocess("f", source).is_err());
    }

    #[test]
    fn rejects_macro_named_after_a_register() {
        let source = "mcr r1\nhlt\nendmcr";
        assert!(preprocess("f", source).is_err());
    }

    #[test]
    fn expands_macro_call_repeated_at_multiple_sites() {
        let source = "mcr m\nhlt\nendmcr\nm\nm";
        let out = preprocess("f", source).unwrap();
        assert_eq!(out.expanded_source, "hlt\nhlt");
    }
}
