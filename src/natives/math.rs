// ABOUTME: The `std:math` native module: pi constant plus sqrt/abs/floor/ceil

use crate::env::Environment;
use crate::error::NyxError;
use crate::eval::Interpreter;
use crate::value::{NativeCallback, NativeFunction, Value};
use std::rc::Rc;

/// Builds a fresh `std:math` environment. Called once by the module
/// registry on first `import "std:math" as ...;`; the result is cached
/// against the literal module name.
pub fn build() -> Rc<Environment> {
    let env = Environment::new();
    env.define("pi", Value::Number(std::f64::consts::PI));
    define_unary(&env, "sqrt", f64::sqrt);
    define_unary(&env, "abs", f64::abs);
    define_unary(&env, "floor", f64::floor);
    define_unary(&env, "ceil", f64::ceil);
    env
}

fn define_unary(env: &Rc<Environment>, name: &'static str, f: fn(f64) -> f64) {
    let callback: NativeCallback = Rc::new(move |_interpreter: &mut Interpreter, args: &[Value]| match &args[0] {
        Value::Number(n) => Ok(Value::Number(f(*n))),
        other => Err(NyxError::runtime(
            format!("'{name}' expects a number argument, got {}.", other.type_name()),
            0,
        )),
    });
    env.define(
        name,
        Value::Native(Rc::new(NativeFunction {
            name: name.to_string(),
            arity: 1,
            callback,
        })),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, arg: Value) -> Result<Value, NyxError> {
        let env = build();
        let mut interpreter = Interpreter::new(std::path::PathBuf::from("."), vec![]);
        match env.get(name).unwrap() {
            Value::Native(native) => (native.callback)(&mut interpreter, &[arg]),
            _ => panic!("{name} is not native"),
        }
    }

    #[test]
    fn pi_is_the_usual_constant() {
        let env = build();
        assert_eq!(env.get("pi"), Some(Value::Number(std::f64::consts::PI)));
    }

    #[test]
    fn sqrt_of_nine_is_three() {
        assert_eq!(call("sqrt", Value::Number(9.0)), Ok(Value::Number(3.0)));
    }

    #[test]
    fn abs_of_negative_is_positive() {
        assert_eq!(call("abs", Value::Number(-4.0)), Ok(Value::Number(4.0)));
    }

    #[test]
    fn floor_and_ceil_round_toward_their_named_direction() {
        assert_eq!(call("floor", Value::Number(1.8)), Ok(Value::Number(1.0)));
        assert_eq!(call("ceil", Value::Number(1.2)), Ok(Value::Number(2.0)));
    }

    #[test]
    fn non_number_argument_is_a_runtime_error() {
        let err = call("sqrt", Value::string("x")).unwrap_err();
        assert!(err.message().contains("expects a number argument"));
    }
}
