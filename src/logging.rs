//! Pretty-printing diagnostics to the console.
//!
//! Grounded in the teacher's `src/logging.rs` (`colored`-based `error`/
//! `warning` printers), generalized to spec.md §6's fixed diagnostic shape:
//! `[Compilation Error] [File: "B.as", Line: N] <message>.`

use colored::Colorize;

use crate::error::AssemblerError;

/// Print one compilation error in the wire format spec.md §6/§7 mandate.
pub fn compilation_error(error: &AssemblerError) {
    let prefix = "[Compilation Error]".red().bold();
    match error {
        AssemblerError::ReadFile { path } | AssemblerError::WriteFile { path } => {
            eprintln!("{prefix} [File: \"{path}\"] {error}.");
        }
        AssemblerError::PreprocessorMacroName { file } => {
            eprintln!("{prefix} [File: \"{file}.as\"] {error}.");
        }
        AssemblerError::UnresolvedEntry { file, .. } => {
            eprintln!("{prefix} [File: \"{file}.as\"] {error}.");
        }
        _ => {
            let file = error.file().unwrap_or("?");
            let line = error.line().unwrap_or(0);
            eprintln!("{prefix} [File: \"{file}.as\", Line: {line}] {error}.");
        }
    }
}

/// Print every accumulated error for a file, in source order.
pub fn compilation_errors(errors: &[AssemblerError]) {
    for error in errors {
        compilation_error(error);
    }
}

/// Print a non-fatal diagnostic, e.g. a label dropped on `.entry`/`.extern`.
pub fn warning(file: &str, line: usize, message: &str) {
    let prefix = "[Warning]".yellow().bold();
    eprintln!("{prefix} [File: \"{file}.as\", Line: {line}] {message}.");
}
