// ABOUTME: Native-module registration surface — the `std:` builders this crate ships

pub mod io;
pub mod math;

use crate::eval::Interpreter;
use std::rc::Rc;

/// Registers every native module builder this crate ships. A host embedding
/// the engine registers its own modules through the exact same
/// `register_native_module` call; `std:math` and `std:io` here are the
/// illustrative pair shipped with the core engine.
pub fn register_all(interpreter: &mut Interpreter) {
    interpreter.register_native_module("std:math", Rc::new(math::build));
    interpreter.register_native_module("std:io", Rc::new(io::build));
}
