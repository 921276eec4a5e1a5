// ABOUTME: Command-line front end: argument parsing, file resolution, and error reporting

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const VERSION: &str = "0.0.1";

const ABOUT_TEXT: &str = "\
Nyx Language
------------
Nyx is a lightweight, dynamically-typed scripting language designed for ease of use.
It supports procedural programming with features including:
  - Variables (dynamic typing with 'auto')
  - Basic arithmetic and logical operations
  - Control flow (if/else, for loops, break, continue)
  - Lists (creation, indexing, len, concatenation, repetition)
  - Functions (definition, call, return, closures, imports)
  - String interpolation with #{expression}
  - Simple console output (output, put)

Developed as a learning and experimentation project.";

/// Tree-walking interpreter for the Nyx scripting language.
#[derive(Parser, Debug)]
#[command(name = "nyx", disable_version_flag = true)]
struct Cli {
    /// Nyx script to execute (must end in `.nyx`)
    script: Option<PathBuf>,

    /// Arguments passed through to the script as SCRIPT_ARGS
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    script_args: Vec<String>,

    /// Show version information and exit
    #[arg(short = 'v', long = "version")]
    version: bool,

    /// Show information about the Nyx language and exit
    #[arg(long = "about")]
    about: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        println!("Nyx Interpreter version {VERSION}.");
        return ExitCode::SUCCESS;
    }
    if cli.about {
        println!("{ABOUT_TEXT}");
        return ExitCode::SUCCESS;
    }

    let Some(script_path) = cli.script else {
        eprintln!("Usage: nyx <file.nyx> [script_args...] or nyx [option]");
        eprintln!("Try 'nyx --help' for more information.");
        return ExitCode::FAILURE;
    };

    if !has_nyx_extension(&script_path) {
        eprintln!(
            "Error: Input file must have the .nyx extension. Provided: {}",
            script_path.display()
        );
        return ExitCode::FAILURE;
    }

    let canonical = match std::fs::canonicalize(&script_path) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: Cannot access script file '{}': {e}", script_path.display());
            return ExitCode::FAILURE;
        }
    };

    let source = match std::fs::read_to_string(&canonical) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: Could not open file '{}': {e}", canonical.display());
            return ExitCode::FAILURE;
        }
    };

    let script_dir = script_directory(&canonical);

    match nyx_lang::run_source(&source, script_dir, cli.script_args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.display_for_cli());
            ExitCode::FAILURE
        }
    }
}

fn has_nyx_extension(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("nyx")
}

/// Relative imports in the script resolve against the canonical script's
/// parent directory, not the process's current working directory.
fn script_directory(canonical_script_path: &Path) -> PathBuf {
    canonical_script_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nyx_extension_is_required() {
        assert!(has_nyx_extension(Path::new("script.nyx")));
        assert!(!has_nyx_extension(Path::new("script.txt")));
        assert!(!has_nyx_extension(Path::new("script")));
    }

    #[test]
    fn script_directory_is_the_canonical_paths_parent() {
        let dir = script_directory(Path::new("/a/b/c.nyx"));
        assert_eq!(dir, PathBuf::from("/a/b"));
    }
}
