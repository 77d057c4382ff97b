//! Two-pass assembler for a small 14-bit word machine (spec.md §1-§2).
//!
//! [`assemble_file`] ties the pipeline together: preprocessor -> line
//! parser -> first pass -> second pass -> object/entry/extern writers.
//! Each stage's failure short-circuits the rest, mirroring the source's
//! `process_file`: a first-pass error never reaches the second pass, and a
//! second-pass error never reaches the writers.

pub mod cli;
pub mod constants;
pub mod encoding;
pub mod error;
pub mod first_pass;
pub mod lexicon;
pub mod limits;
pub mod logging;
pub mod output;
pub mod parser;
pub mod preprocessor;
pub mod second_pass;
pub mod symbol;
pub mod translation_unit;

use std::path::Path;

use error::AssemblerError;
use translation_unit::TranslationUnit;

/// Assemble a single file given its extensionless basename, writing
/// `B.am`/`B.ob`/`B.ent`/`B.ext` as appropriate. Returns whatever errors
/// stopped it; an empty list means the object file (and, where relevant,
/// `.ent`/`.ext`) was written successfully.
pub fn assemble_file(file_stem: &str) -> Vec<AssemblerError> {
    let source_path = format!("{file_stem}.as");
    let source = match std::fs::read_to_string(&source_path) {
        Ok(source) => source,
        Err(_) => return vec![AssemblerError::ReadFile { path: source_path }],
    };

    let preprocessed = match preprocessor::preprocess(file_stem, &source) {
        Ok(output) => output,
        Err(error) => return vec![error],
    };

    let am_path = format!("{file_stem}.am");
    if std::fs::write(&am_path, &preprocessed.expanded_source).is_err() {
        return vec![AssemblerError::WriteFile { path: am_path }];
    }

    let alds = parser::parse_program(&preprocessed.expanded_source, &preprocessed.macro_names);
    for ald in &alds {
        if let Some(message) = &ald.warning {
            logging::warning(file_stem, ald.line_number, message);
        }
    }

    let mut unit = TranslationUnit::new();
    let first_pass_errors = first_pass::first_pass(&alds, file_stem, &mut unit);
    if !first_pass_errors.is_empty() {
        return first_pass_errors;
    }

    let second_pass_errors = second_pass::second_pass(&alds, &mut unit, file_stem);
    if !second_pass_errors.is_empty() {
        return second_pass_errors;
    }

    write_outputs(file_stem, &unit)
}

type Writer = fn(&Path, &TranslationUnit) -> std::io::Result<()>;

fn write_outputs(file_stem: &str, unit: &TranslationUnit) -> Vec<AssemblerError> {
    let steps: [(&str, Writer); 3] = [
        (".ob", output::write_object_file),
        (".ent", output::write_entries_file),
        (".ext", output::write_externs_file),
    ];
    for (extension, writer) in steps {
        let path = format!("{file_stem}{extension}");
        if writer(Path::new(&path), unit).is_err() {
            return vec![AssemblerError::WriteFile { path }];
        }
    }
    Vec::new()
}
