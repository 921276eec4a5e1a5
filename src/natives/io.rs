// ABOUTME: The `std:io` native module: print_line, a passthrough to output's rendering rule

use crate::env::Environment;
use crate::eval::{process_escapes, Interpreter};
use crate::value::{NativeCallback, NativeFunction, Value};
use std::rc::Rc;

/// Builds a fresh `std:io` environment, cached on first `import "std:io" as
/// ...;` the same way `std:math` is.
pub fn build() -> Rc<Environment> {
    let env = Environment::new();
    let callback: NativeCallback = Rc::new(|_interpreter: &mut Interpreter, args: &[Value]| {
        let rendered = match &args[0] {
            Value::String(s) => process_escapes(s),
            other => other.render(),
        };
        println!("{rendered}");
        Ok(Value::Null)
    });
    env.define(
        "print_line",
        Value::Native(Rc::new(NativeFunction {
            name: "print_line".to_string(),
            arity: 1,
            callback,
        })),
    );
    env
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_line_is_registered_with_arity_one() {
        let env = build();
        match env.get("print_line") {
            Some(Value::Native(native)) => assert_eq!(native.arity, 1),
            _ => panic!("print_line missing"),
        }
    }

    #[test]
    fn print_line_returns_null() {
        let env = build();
        let mut interpreter = Interpreter::new(std::path::PathBuf::from("."), vec![]);
        if let Some(Value::Native(native)) = env.get("print_line") {
            let result = (native.callback)(&mut interpreter, &[Value::string("hi")]).unwrap();
            assert_eq!(result, Value::Null);
        } else {
            panic!("print_line missing");
        }
    }
}
