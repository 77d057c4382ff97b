use clap::Parser;

use assembler14::cli::Cli;
use assembler14::{assemble_file, logging};

fn main() {
    let cli = Cli::parse();

    for file_stem in &cli.files {
        let errors = assemble_file(file_stem);
        logging::compilation_errors(&errors);
    }

    // Exit code is always 0 regardless of per-file errors (spec.md §6 and
    // §9's first Open Question); left unchanged rather than guessed at.
    std::process::exit(0);
}
