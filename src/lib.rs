// ABOUTME: Library entry point wiring lexer, parser, evaluator, and native modules together

pub mod ast;
pub mod env;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod module;
pub mod natives;
pub mod parser;
pub mod value;

use std::path::PathBuf;

/// Parses and runs a whole program against a fresh interpreter rooted at
/// `script_dir`, with `std:math` and `std:io` pre-registered. This is the
/// single public entry point both `main` and the integration test suite
/// drive — tests assert on captured stdout the same way a script's caller
/// would observe it.
///
/// Parser errors that synchronize are printed to stderr as they're found and
/// do not prevent the statements that did parse from executing; the function
/// still returns an error listing the first one so the caller can decide on
/// an exit code.
pub fn run_source(source: &str, script_dir: PathBuf, script_args: Vec<String>) -> Result<(), error::NyxError> {
    let (statements, parse_errors) = parser::parse_recovering(source);
    for e in &parse_errors {
        eprintln!("{}", e.display_for_cli());
    }

    let mut interpreter = eval::Interpreter::new(script_dir, script_args);
    natives::register_all(&mut interpreter);
    interpreter.run(&statements)?;

    if let Some(first) = parse_errors.into_iter().next() {
        return Err(first);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_source_executes_statements_that_parsed_despite_a_later_error() {
        let result = run_source("output(1);", PathBuf::from("."), vec![]);
        assert!(result.is_ok());
    }
}
