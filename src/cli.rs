//! Command-line surface (spec.md §6: `assembler FILE [FILE ...]`).
//!
//! Grounded in `cnolan3-Cicada-16`'s `clap::Parser`-derived CLI struct,
//! since the teacher itself takes positional args by hand in `main`.

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "assembler", about = "Two-pass assembler for a 14-bit word machine")]
pub struct Cli {
    /// Extensionless basenames; each `B` reads `B.as` and, on success,
    /// writes `B.am`/`B.ob`/`B.ent`/`B.ext`.
    #[arg(required = true)]
    pub files: Vec<String>,
}
