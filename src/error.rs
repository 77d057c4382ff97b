//! The assembler's unified error type.
//!
//! Grounded in the teacher's `assembler::Error` (a flat enum, one variant
//! per failure shape, each carrying exactly the context needed to render a
//! one-line diagnostic) but expressed with `thiserror` rather than a
//! hand-written `Display` impl, matching `cnolan3-Cicada-16`'s
//! `AssemblyError`.

use thiserror::Error;

/// An error produced while assembling a single file.
///
/// Every variant except [`AssemblerError::ReadFile`] and
/// [`AssemblerError::WriteFile`] carries the file stem and, where
/// applicable, the source line it was found on, so that callers can render
/// spec.md §6/§7's fixed diagnostic shape:
/// `[Compilation Error] [File: "B.as", Line: N] <message>.`
#[derive(Debug, Error)]
pub enum AssemblerError {
    #[error("failed to read file {path}")]
    ReadFile { path: String },

    #[error("failed to write file {path}")]
    WriteFile { path: String },

    /// The preprocessor hit an invalid macro name and the whole file is
    /// abandoned; there is no single offending line by the time this is
    /// raised (mirrors `original_source`'s `pre_assembler_error`, whose
    /// diagnostic has no `Line:` field).
    #[error("Preprocessor terminated: Invalid macro name")]
    PreprocessorMacroName { file: String },

    #[error("{message}")]
    Syntax {
        file: String,
        line: usize,
        message: String,
    },

    #[error("{message}")]
    Semantic {
        file: String,
        line: usize,
        message: String,
    },

    #[error("{message}")]
    Encoding {
        file: String,
        line: usize,
        message: String,
    },

    #[error("Entry declared but never defined: {name}")]
    UnresolvedEntry { file: String, name: String },
}

impl AssemblerError {
    /// The file stem this error belongs to, for diagnostics that aren't
    /// file-access errors (those print their own path).
    pub fn file(&self) -> Option<&str> {
        match self {
            AssemblerError::ReadFile { .. } | AssemblerError::WriteFile { .. } => None,
            AssemblerError::PreprocessorMacroName { file } => Some(file),
            AssemblerError::Syntax { file, .. } => Some(file),
            AssemblerError::Semantic { file, .. } => Some(file),
            AssemblerError::Encoding { file, .. } => Some(file),
            AssemblerError::UnresolvedEntry { file, .. } => Some(file),
        }
    }

    /// The source line this error was found on, if it has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            AssemblerError::Syntax { line, .. }
            | AssemblerError::Semantic { line, .. }
            | AssemblerError::Encoding { line, .. } => Some(*line),
            _ => None,
        }
    }
}
