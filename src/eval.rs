// ABOUTME: Tree-walking evaluator: statement/expression execution, scoping, and control flow

use crate::ast::{Expression, Statement, TokenKind};
use crate::env::Environment;
use crate::error::NyxError;
use crate::module::ModuleRegistry;
use crate::value::{Function, Module, Value};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Internal control channel for the evaluator. `Error` is a genuine runtime
/// failure; `Return`/`Break`/`Continue` are the control-flow signals that
/// unwind through statement execution without being runtime errors in their
/// own right. Kept separate from [`NyxError`], which only ever carries the
/// two user-visible error kinds.
pub enum Unwind {
    Error(NyxError),
    Return(Value),
    Break,
    Continue,
}

impl From<NyxError> for Unwind {
    fn from(e: NyxError) -> Self {
        Unwind::Error(e)
    }
}

pub type EvalResult<T> = Result<T, Unwind>;

pub struct Interpreter {
    pub globals: Rc<Environment>,
    environment: Rc<Environment>,
    pub modules: ModuleRegistry,
    script_dir: PathBuf,
}

impl Interpreter {
    pub fn new(script_dir: PathBuf, script_args: Vec<String>) -> Self {
        let globals = Environment::new();
        globals.define("nyx_null", Value::Null);
        globals.define(
            "SCRIPT_ARGS",
            Value::list(script_args.into_iter().map(Value::string).collect()),
        );
        Interpreter {
            environment: globals.clone(),
            globals,
            modules: ModuleRegistry::new(),
            script_dir,
        }
    }

    pub fn register_native_module(&mut self, name: impl Into<String>, builder: crate::module::NativeModuleBuilder) {
        self.modules.register_native(name, builder);
    }

    /// Executes a whole program. Escaped control-flow signals (a `return`,
    /// `break`, or `continue` that unwinds all the way to the top level) are
    /// logged to stderr and swallowed rather than treated as fatal; a
    /// genuine runtime or parser error is fatal and returned to the caller.
    pub fn run(&mut self, statements: &[Statement]) -> Result<(), NyxError> {
        for stmt in statements {
            match self.execute(stmt) {
                Ok(()) => {}
                Err(Unwind::Error(e)) => return Err(e),
                Err(Unwind::Return(_)) => {
                    eprintln!("Runtime Error: 'return' signal used outside of a function call context.");
                }
                Err(Unwind::Break) => {
                    eprintln!("Runtime Error: 'break' signal used outside of a loop context.");
                }
                Err(Unwind::Continue) => {
                    eprintln!("Runtime Error: 'continue' signal used outside of a loop context.");
                }
            }
        }
        Ok(())
    }

    fn execute(&mut self, stmt: &Statement) -> EvalResult<()> {
        match stmt {
            Statement::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(())
            }
            Statement::Block(statements) => {
                let block_env = Environment::with_parent(self.environment.clone());
                self.execute_block(statements, block_env)
            }
            Statement::VarDecl { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Null,
                };
                self.environment.define(name.lexeme.clone(), value);
                Ok(())
            }
            Statement::Output(expr) => {
                let value = self.evaluate(expr)?;
                println!("{}", output_projection(&value));
                Ok(())
            }
            Statement::Put(expr) => {
                use std::io::Write;
                let value = self.evaluate(expr)?;
                print!("{}", output_projection(&value));
                let _ = std::io::stdout().flush();
                Ok(())
            }
            Statement::FuncDecl(decl) => {
                let function = Value::Function(Rc::new(Function {
                    declaration: decl.clone(),
                    closure: self.environment.clone(),
                }));
                self.environment.define(decl.name.clone(), function);
                Ok(())
            }
            Statement::Return { value } => {
                let v = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Null,
                };
                Err(Unwind::Return(v))
            }
            Statement::Import { path, alias } => {
                let value = if path.lexeme.starts_with("std:") {
                    self.modules.load_native(&path.lexeme).ok_or_else(|| {
                        Unwind::Error(NyxError::runtime(
                            format!("Unknown native module '{}'.", path.lexeme),
                            path.line,
                        ))
                    })?
                } else {
                    self.load_source_module(&path.lexeme, path.line)?
                };
                self.environment.define(alias.lexeme.clone(), value);
                Ok(())
            }
            Statement::Typedef(expr) => {
                let value = self.evaluate(expr)?;
                println!("{}", value.type_name());
                Ok(())
            }
            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(())
                }
            }
            Statement::For {
                initializer,
                condition,
                increment,
                body,
            } => self.execute_for(initializer.as_deref(), condition, increment, body),
            Statement::Break => Err(Unwind::Break),
            Statement::Continue => Err(Unwind::Continue),
        }
    }

    /// Saves and restores the current environment around `statements`,
    /// running them under `block_env`. Restoration happens on every exit
    /// path — normal completion, a runtime error, or an escaping signal —
    /// matching the original interpreter's save/restore-in-a-finally
    /// discipline around block execution.
    fn execute_block(&mut self, statements: &[Statement], block_env: Rc<Environment>) -> EvalResult<()> {
        let previous = std::mem::replace(&mut self.environment, block_env);
        let result = (|| {
            for stmt in statements {
                self.execute(stmt)?;
            }
            Ok(())
        })();
        self.environment = previous;
        result
    }

    /// One environment spans the whole loop (header plus every iteration),
    /// not a fresh one per pass. `continue` is swallowed and proceeds to the
    /// increment clause; `break` restores the environment and returns;
    /// `return` or a genuine error also restores the environment on its way
    /// out. Mirrors the original `visitForStatement`.
    fn execute_for(
        &mut self,
        initializer: Option<&Statement>,
        condition: &Option<Expression>,
        increment: &Option<Expression>,
        body: &Statement,
    ) -> EvalResult<()> {
        let loop_env = Environment::with_parent(self.environment.clone());
        let previous = std::mem::replace(&mut self.environment, loop_env);
        let result = (|| {
            if let Some(init) = initializer {
                self.execute(init)?;
            }
            loop {
                if let Some(cond) = condition {
                    if !self.evaluate(cond)?.truthy() {
                        break;
                    }
                }
                match self.execute(body) {
                    Ok(()) => {}
                    Err(Unwind::Continue) => {}
                    Err(Unwind::Break) => break,
                    Err(other) => return Err(other),
                }
                if let Some(inc) = increment {
                    self.evaluate(inc)?;
                }
            }
            Ok(())
        })();
        self.environment = previous;
        result
    }

    fn load_source_module(&mut self, relative_path: &str, line: usize) -> EvalResult<Value> {
        let candidate = self.script_dir.join(relative_path);
        let canonical = std::fs::canonicalize(&candidate).map_err(|e| {
            Unwind::Error(NyxError::runtime(
                format!("Cannot resolve module '{relative_path}': {e}."),
                line,
            ))
        })?;
        let key = canonical.to_string_lossy().into_owned();

        if let Some(cached) = self.modules.cached(&key) {
            return Ok(cached);
        }

        let source = std::fs::read_to_string(&canonical).map_err(|e| {
            Unwind::Error(NyxError::runtime(
                format!("Cannot read module '{relative_path}': {e}."),
                line,
            ))
        })?;
        let statements = crate::parser::parse(&source).map_err(|errors| {
            Unwind::Error(errors.into_iter().next().unwrap_or_else(|| {
                NyxError::runtime(format!("Failed to parse module '{relative_path}'."), line)
            }))
        })?;

        let module_env = Environment::with_parent(self.globals.clone());
        let module_value = Value::Module(Rc::new(Module {
            environment: module_env.clone(),
            origin: key.clone(),
        }));
        // Cache before executing: a cyclic import sees this placeholder
        // rather than re-entering interpretation.
        self.modules.reserve(key, module_value.clone());

        let module_dir = canonical
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let previous_dir = std::mem::replace(&mut self.script_dir, module_dir);
        let previous_env = std::mem::replace(&mut self.environment, module_env);
        let result = (|| {
            for stmt in &statements {
                self.execute(stmt)?;
            }
            Ok(())
        })();
        self.environment = previous_env;
        self.script_dir = previous_dir;
        result?;

        Ok(module_value)
    }

    fn evaluate(&mut self, expr: &Expression) -> EvalResult<Value> {
        match expr {
            Expression::Literal { value, .. } => Ok(value.clone()),
            Expression::Identifier { name, token } => self.environment.get(name).ok_or_else(|| {
                Unwind::Error(NyxError::runtime(format!("Undefined variable '{name}'."), token.line))
            }),
            Expression::Assignment {
                target,
                value,
                equals_line,
            } => {
                let new_value = self.evaluate(value)?;
                self.assign(target, new_value, *equals_line)
            }
            Expression::Unary { operator, right } => {
                let value = self.evaluate(right)?;
                match operator.kind {
                    TokenKind::Minus => {
                        let n = require_number(&value, "unary '-'", operator.line)?;
                        Ok(Value::Number(-n))
                    }
                    TokenKind::Not | TokenKind::Bang => Ok(Value::Bool(!value.truthy())),
                    _ => unreachable!("not a unary operator: {:?}", operator.kind),
                }
            }
            Expression::Binary { left, operator, right } => {
                if operator.kind == TokenKind::And {
                    let l = self.evaluate(left)?;
                    return if !l.truthy() { Ok(l) } else { self.evaluate(right) };
                }
                if operator.kind == TokenKind::Or {
                    let l = self.evaluate(left)?;
                    return if l.truthy() { Ok(l) } else { self.evaluate(right) };
                }
                let l = self.evaluate(left)?;
                let r = self.evaluate(right)?;
                apply_binary(l, operator.kind.clone(), r, operator.line)
            }
            Expression::PostfixUpdate { operand, operator } => self.postfix_update(operand, operator.kind.clone(), operator.line),
            Expression::ListLiteral { elements, .. } => {
                let mut items = Vec::with_capacity(elements.len());
                for element in elements {
                    items.push(self.evaluate(element)?);
                }
                Ok(Value::list(items))
            }
            Expression::Len { argument, token } => {
                let value = self.evaluate(argument)?;
                match &value {
                    Value::String(s) => Ok(Value::Number(s.len() as f64)),
                    Value::List(items) => Ok(Value::Number(items.borrow().len() as f64)),
                    other => Err(Unwind::Error(NyxError::runtime(
                        format!("len() expects a string or list argument, got {}.", other.type_name()),
                        token.line,
                    ))),
                }
            }
            Expression::Subscript {
                object,
                index,
                closing_bracket_line,
            } => {
                let collection = self.evaluate(object)?;
                let index_value = self.evaluate(index)?;
                let idx = require_number(&index_value, "subscript index", *closing_bracket_line)?;
                read_subscript(&collection, idx, *closing_bracket_line)
            }
            Expression::InterpolatedString { segments, .. } => {
                let mut result = String::new();
                for segment in segments {
                    match segment {
                        crate::ast::StringSegment::Text(text) => result.push_str(text),
                        crate::ast::StringSegment::Expr(expr) => {
                            let value = self.evaluate(expr)?;
                            result.push_str(&value.render());
                        }
                    }
                }
                Ok(Value::string(result))
            }
            Expression::Call {
                callee,
                arguments,
                paren_line,
            } => {
                let callee_value = self.evaluate(callee)?;
                let mut argument_values = Vec::with_capacity(arguments.len());
                for arg in arguments {
                    argument_values.push(self.evaluate(arg)?);
                }
                self.call(callee_value, argument_values, *paren_line)
            }
            Expression::MemberAccess { object, name } => {
                let value = self.evaluate(object)?;
                read_member(&value, &name.lexeme, name.line)
            }
        }
    }

    fn assign(&mut self, target: &Expression, value: Value, equals_line: usize) -> EvalResult<Value> {
        match target {
            Expression::Identifier { name, token } => {
                if self.environment.assign(name, value.clone()) {
                    Ok(value)
                } else {
                    Err(Unwind::Error(NyxError::runtime(
                        format!("Undefined variable '{name}'."),
                        token.line,
                    )))
                }
            }
            Expression::Subscript {
                object,
                index,
                closing_bracket_line,
            } => {
                if !matches!(object.as_ref(), Expression::Identifier { .. }) {
                    return Err(Unwind::Error(NyxError::runtime(
                        "Cannot assign to subscript of a temporary list or complex expression.",
                        *closing_bracket_line,
                    )));
                }
                let collection = self.evaluate(object)?;
                let index_value = self.evaluate(index)?;
                let idx = require_number(&index_value, "subscript index", *closing_bracket_line)?;
                write_subscript(&collection, idx, value.clone(), *closing_bracket_line)?;
                Ok(value)
            }
            Expression::MemberAccess { object, name } => {
                let target_value = self.evaluate(object)?;
                match &target_value {
                    Value::Module(module) => {
                        if module.environment.assign(&name.lexeme, value.clone()) {
                            Ok(value)
                        } else {
                            Err(Unwind::Error(NyxError::runtime(
                                format!("Undefined member '{}' on module '{}'.", name.lexeme, module.origin),
                                name.line,
                            )))
                        }
                    }
                    Value::StructInst(inst) => {
                        let idx = inst.def.field_index(&name.lexeme).ok_or_else(|| {
                            Unwind::Error(NyxError::runtime(
                                format!("Undefined field '{}' on struct '{}'.", name.lexeme, inst.def.name),
                                name.line,
                            ))
                        })?;
                        inst.fields.borrow_mut()[idx] = value.clone();
                        Ok(value)
                    }
                    other => Err(Unwind::Error(NyxError::runtime(
                        format!("Cannot assign a member on a value of type {}.", other.type_name()),
                        name.line,
                    ))),
                }
            }
            _ => Err(Unwind::Error(NyxError::parser("Invalid assignment target.", equals_line))),
        }
    }

    fn postfix_update(&mut self, operand: &Expression, operator: TokenKind, line: usize) -> EvalResult<Value> {
        let delta = match operator {
            TokenKind::PlusPlus => 1.0,
            TokenKind::MinusMinus => -1.0,
            _ => unreachable!("not a postfix operator: {operator:?}"),
        };
        match operand {
            Expression::Identifier { name, token } => {
                let old = self.environment.get(name).ok_or_else(|| {
                    Unwind::Error(NyxError::runtime(format!("Undefined variable '{name}'."), token.line))
                })?;
                let n = require_number(&old, "'++'/'--'", token.line)?;
                self.environment.assign(name, Value::Number(n + delta));
                Ok(old)
            }
            Expression::Subscript {
                object,
                index,
                closing_bracket_line,
            } => {
                if !matches!(object.as_ref(), Expression::Identifier { .. }) {
                    return Err(Unwind::Error(NyxError::runtime(
                        "Cannot apply '++/--' to subscript of a temporary list.",
                        *closing_bracket_line,
                    )));
                }
                let collection = self.evaluate(object)?;
                let index_value = self.evaluate(index)?;
                let idx = require_number(&index_value, "subscript index", *closing_bracket_line)?;
                let old = read_subscript(&collection, idx, *closing_bracket_line)?;
                let n = require_number(&old, "'++'/'--'", *closing_bracket_line)?;
                write_subscript(&collection, idx, Value::Number(n + delta), *closing_bracket_line)?;
                Ok(old)
            }
            _ => Err(Unwind::Error(NyxError::runtime(
                "Invalid operand for '++'/'--'.",
                line,
            ))),
        }
    }

    fn call(&mut self, callee: Value, arguments: Vec<Value>, line: usize) -> EvalResult<Value> {
        match callee {
            Value::Function(function) => {
                let params = &function.declaration.params;
                if params.len() != arguments.len() {
                    return Err(Unwind::Error(NyxError::runtime(
                        format!("Expected {} arguments but got {}.", params.len(), arguments.len()),
                        line,
                    )));
                }
                let call_env = Environment::with_parent(function.closure.clone());
                for (param, arg) in params.iter().zip(arguments.into_iter()) {
                    call_env.define(param.lexeme.clone(), arg);
                }
                let previous = std::mem::replace(&mut self.environment, call_env);
                let result = (|| {
                    for stmt in &function.declaration.body {
                        self.execute(stmt)?;
                    }
                    Ok(Value::Null)
                })();
                self.environment = previous;
                match result {
                    Ok(v) => Ok(v),
                    Err(Unwind::Return(v)) => Ok(v),
                    Err(other) => Err(other),
                }
            }
            Value::Native(native) => {
                if native.arity >= 0 && native.arity as usize != arguments.len() {
                    return Err(Unwind::Error(NyxError::runtime(
                        format!(
                            "'{}' expected {} arguments but got {}.",
                            native.name,
                            native.arity,
                            arguments.len()
                        ),
                        line,
                    )));
                }
                (native.callback)(self, &arguments).map_err(Unwind::Error)
            }
            other => Err(Unwind::Error(NyxError::runtime(
                format!("Cannot call a value of type {}.", other.type_name()),
                line,
            ))),
        }
    }
}

fn require_number(value: &Value, context: &str, line: usize) -> EvalResult<f64> {
    match value {
        Value::Number(n) => Ok(*n),
        other => Err(Unwind::Error(NyxError::runtime(
            format!("Operand of {context} must be a number, got {}.", other.type_name()),
            line,
        ))),
    }
}

fn apply_binary(left: Value, operator: TokenKind, right: Value, line: usize) -> EvalResult<Value> {
    match operator {
        TokenKind::Plus => match (&left, &right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::String(a), Value::String(b)) => Ok(Value::string(format!("{a}{b}"))),
            (Value::List(a), Value::List(b)) => {
                let mut items = a.borrow().clone();
                items.extend(b.borrow().iter().cloned());
                Ok(Value::list(items))
            }
            _ => Err(type_mismatch("+", &left, &right, line)),
        },
        TokenKind::Minus => {
            let a = require_number(&left, "'-'", line)?;
            let b = require_number(&right, "'-'", line)?;
            Ok(Value::Number(a - b))
        }
        TokenKind::Slash => {
            let a = require_number(&left, "'/'", line)?;
            let b = require_number(&right, "'/'", line)?;
            if b == 0.0 {
                return Err(Unwind::Error(NyxError::runtime("Division by zero.", line)));
            }
            Ok(Value::Number(a / b))
        }
        TokenKind::Percent => {
            let a = require_number(&left, "'%'", line)?;
            let b = require_number(&right, "'%'", line)?;
            if b == 0.0 {
                return Err(Unwind::Error(NyxError::runtime("Modulo by zero.", line)));
            }
            Ok(Value::Number(a % b))
        }
        TokenKind::Star => match (&left, &right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a * b)),
            (Value::List(items), Value::Number(n)) | (Value::Number(n), Value::List(items)) => {
                repeat_list(items, *n, line)
            }
            _ => Err(type_mismatch("*", &left, &right, line)),
        },
        TokenKind::Less | TokenKind::LessEqual | TokenKind::Greater | TokenKind::GreaterEqual => {
            let a = require_number(&left, "comparison", line)?;
            let b = require_number(&right, "comparison", line)?;
            let result = match operator {
                TokenKind::Less => a < b,
                TokenKind::LessEqual => a <= b,
                TokenKind::Greater => a > b,
                TokenKind::GreaterEqual => a >= b,
                _ => unreachable!(),
            };
            Ok(Value::Bool(result))
        }
        TokenKind::EqualEqual => Ok(Value::Bool(left.equals(&right))),
        TokenKind::BangEqual => Ok(Value::Bool(!left.equals(&right))),
        other => unreachable!("not a binary operator token: {other:?}"),
    }
}

fn type_mismatch(op: &str, left: &Value, right: &Value, line: usize) -> Unwind {
    Unwind::Error(NyxError::runtime(
        format!(
            "Operator '{op}' cannot be applied to {} and {}.",
            left.type_name(),
            right.type_name()
        ),
        line,
    ))
}

fn repeat_list(items: &Rc<std::cell::RefCell<Vec<Value>>>, n: f64, line: usize) -> EvalResult<Value> {
    if n < 0.0 || n.fract() != 0.0 {
        return Err(Unwind::Error(NyxError::runtime(
            "List repetition count for '*' must be a non-negative integer.",
            line,
        )));
    }
    let source = items.borrow();
    let mut result = Vec::with_capacity(source.len() * n as usize);
    for _ in 0..(n as usize) {
        result.extend(source.iter().cloned());
    }
    Ok(Value::list(result))
}

/// Resolves a (possibly negative) index against `size`, wrapping negative
/// indices from the end. Returns the effective index if in bounds.
fn effective_index(requested: f64, size: usize, line: usize) -> EvalResult<usize> {
    if requested.fract() != 0.0 {
        return Err(Unwind::Error(NyxError::runtime(
            format!("Index must be an integer, got {requested}."),
            line,
        )));
    }
    let requested = requested as i64;
    let effective = if requested < 0 {
        requested + size as i64
    } else {
        requested
    };
    if effective < 0 || effective as usize >= size {
        return Err(Unwind::Error(NyxError::runtime(
            format!("Index out of bounds. Requested: {requested}, Effective: {effective}, Size: {size}."),
            line,
        )));
    }
    Ok(effective as usize)
}

fn read_subscript(collection: &Value, index: f64, line: usize) -> EvalResult<Value> {
    match collection {
        Value::List(items) => {
            let items = items.borrow();
            let idx = effective_index(index, items.len(), line)?;
            Ok(items[idx].clone())
        }
        Value::String(s) => {
            let bytes = s.as_bytes();
            let idx = effective_index(index, bytes.len(), line)?;
            Ok(Value::string(String::from_utf8_lossy(&bytes[idx..idx + 1]).into_owned()))
        }
        other => Err(Unwind::Error(NyxError::runtime(
            format!("Cannot index into a value of type {}.", other.type_name()),
            line,
        ))),
    }
}

fn write_subscript(collection: &Value, index: f64, value: Value, line: usize) -> EvalResult<()> {
    match collection {
        Value::List(items) => {
            let idx = effective_index(index, items.borrow().len(), line)?;
            items.borrow_mut()[idx] = value;
            Ok(())
        }
        Value::String(_) => Err(Unwind::Error(NyxError::runtime(
            "Cannot assign to an index of a string; strings are immutable.",
            line,
        ))),
        other => Err(Unwind::Error(NyxError::runtime(
            format!("Cannot assign to an index of a value of type {}.", other.type_name()),
            line,
        ))),
    }
}

fn read_member(value: &Value, name: &str, line: usize) -> EvalResult<Value> {
    match value {
        Value::Module(module) => module.environment.get(name).ok_or_else(|| {
            Unwind::Error(NyxError::runtime(
                format!("Undefined member '{name}' on module '{}'.", module.origin),
                line,
            ))
        }),
        Value::StructInst(inst) => {
            let idx = inst.def.field_index(name).ok_or_else(|| {
                Unwind::Error(NyxError::runtime(
                    format!("Undefined field '{name}' on struct '{}'.", inst.def.name),
                    line,
                ))
            })?;
            Ok(inst.fields.borrow()[idx].clone())
        }
        other => Err(Unwind::Error(NyxError::runtime(
            format!("Cannot access member '{name}' on a value of type {}.", other.type_name()),
            line,
        ))),
    }
}

/// `output`/`put`'s display rule: a top-level String gets its escape
/// sequences resolved; every other Value (including a list that happens to
/// contain strings) is rendered as-is, with no recursive escape resolution
/// of nested string elements. Mirrors the original interpreter's
/// `visitOutputStatement`/`visitPutStatement`, which branch on the
/// evaluated value's variant before deciding whether to call
/// `process_escapes` at all.
fn output_projection(value: &Value) -> String {
    match value {
        Value::String(s) => process_escapes(s),
        other => other.render(),
    }
}

/// Resolves the backslash escapes the lexer deliberately left unresolved in
/// string lexemes (everything except `\"`/`\\`, which it must resolve itself
/// to find the terminating quote). Runs only at `output`/`put` emission time;
/// equality, concatenation, `len`, subscripting, and interpolation all see
/// the raw bytes. Any unrecognized `\X` sequence passes through both
/// characters unchanged, matching the original `process_escapes`.
pub fn process_escapes(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.peek() {
            Some('n') => {
                result.push('\n');
                chars.next();
            }
            Some('r') => {
                result.push('\r');
                chars.next();
            }
            Some('t') => {
                result.push('\t');
                chars.next();
            }
            Some('e') => {
                result.push('\u{1b}');
                chars.next();
            }
            Some('\\') => {
                result.push('\\');
                chars.next();
            }
            Some('"') => {
                result.push('"');
                chars.next();
            }
            Some(other) => {
                result.push('\\');
                result.push(*other);
                chars.next();
            }
            None => result.push('\\'),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str) -> Result<(), NyxError> {
        let statements = crate::parser::parse(source).map_err(|errs| errs.into_iter().next().unwrap())?;
        let mut interpreter = Interpreter::new(PathBuf::from("."), vec![]);
        interpreter.run(&statements)
    }

    fn eval_global(source: &str, name: &str) -> Value {
        let statements = crate::parser::parse(source).unwrap();
        let mut interpreter = Interpreter::new(PathBuf::from("."), vec![]);
        interpreter.run(&statements).unwrap();
        interpreter.globals.get(name).unwrap()
    }

    #[test]
    fn arithmetic_and_precedence() {
        let v = eval_global("auto x = 1 + 2 * 3;", "x");
        assert_eq!(v, Value::Number(7.0));
    }

    #[test]
    fn division_by_zero_is_a_runtime_error() {
        let err = run("auto x = 1 / 0;").unwrap_err();
        assert_eq!(err.message(), "Division by zero.");
    }

    #[test]
    fn closures_capture_their_defining_environment() {
        let v = eval_global(
            r#"
            func make_counter() = {
                auto count = 0;
                func increment() = {
                    count = count + 1;
                    return count;
                }
                return increment;
            }
            auto counter = make_counter();
            counter();
            counter();
            auto result = counter();
            "#,
            "result",
        );
        assert_eq!(v, Value::Number(3.0));
    }

    #[test]
    fn list_mutation_through_one_alias_is_visible_through_another() {
        let v = eval_global(
            r#"
            auto a = [1, 2, 3];
            auto b = a;
            b[0] = 99;
            auto result = a[0];
            "#,
            "result",
        );
        assert_eq!(v, Value::Number(99.0));
    }

    #[test]
    fn subscript_assignment_to_a_temporary_list_is_a_runtime_error() {
        let err = run("[1, 2, 3][0] = 99;").unwrap_err();
        assert_eq!(
            err.message(),
            "Cannot assign to subscript of a temporary list or complex expression."
        );
    }

    #[test]
    fn postfix_increment_of_a_temporary_list_subscript_is_a_runtime_error() {
        let err = run(
            r#"
            func make() = { return [1, 2, 3]; }
            make()[0]++;
            "#,
        )
        .unwrap_err();
        assert_eq!(err.message(), "Cannot apply '++/--' to subscript of a temporary list.");
    }

    #[test]
    fn negative_index_wraps_from_the_end() {
        let v = eval_global(r#"auto result = [10, 20, 30][-1];"#, "result");
        assert_eq!(v, Value::Number(30.0));
    }

    #[test]
    fn list_repetition_with_non_integer_count_errors() {
        let err = run("auto x = [1, 2] * 1.5;").unwrap_err();
        assert_eq!(
            err.message(),
            "List repetition count for '*' must be a non-negative integer."
        );
    }

    #[test]
    fn short_circuit_or_does_not_evaluate_right_operand() {
        let v = eval_global(
            r#"
            func boom() = { return 1 / 0; }
            auto result = true or boom();
            "#,
            "result",
        );
        assert_eq!(v, Value::Bool(true));
    }

    #[test]
    fn string_interpolation_substitutes_expressions() {
        let v = eval_global(r#"auto result = "sum=#{2 + 3}";"#, "result");
        assert_eq!(v, Value::string("sum=5"));
    }

    #[test]
    fn for_loop_break_exits_immediately() {
        let v = eval_global(
            r#"
            auto total = 0;
            for (auto i = 0; i < 10; i++) {
                if (i == 3) { break; }
                total = total + i;
            }
            "#,
            "total",
        );
        assert_eq!(v, Value::Number(3.0));
    }

    #[test]
    fn for_loop_continue_skips_remaining_body() {
        let v = eval_global(
            r#"
            auto total = 0;
            for (auto i = 0; i < 5; i++) {
                if (i == 2) { continue; }
                total = total + 1;
            }
            "#,
            "total",
        );
        assert_eq!(v, Value::Number(4.0));
    }

    #[test]
    fn escaped_break_at_top_level_is_logged_not_fatal() {
        assert!(run("break;").is_ok());
    }

    #[test]
    fn assigning_a_module_member_updates_the_modules_environment() {
        let statements = crate::parser::parse(
            r#"
            import "std:math" as math;
            math.pi = 7;
            auto result = math.pi;
            "#,
        )
        .unwrap();
        let mut interpreter = Interpreter::new(PathBuf::from("."), vec![]);
        crate::natives::register_all(&mut interpreter);
        interpreter.run(&statements).unwrap();
        assert_eq!(interpreter.globals.get("result"), Some(Value::Number(7.0)));
    }

    #[test]
    fn assigning_an_undefined_module_member_is_a_runtime_error() {
        let statements = crate::parser::parse(
            r#"
            import "std:math" as math;
            math.nope = 1;
            "#,
        )
        .unwrap();
        let mut interpreter = Interpreter::new(PathBuf::from("."), vec![]);
        crate::natives::register_all(&mut interpreter);
        let err = interpreter.run(&statements).unwrap_err();
        assert!(err.message().contains("Undefined member 'nope'"));
    }

    #[test]
    fn output_projection_resolves_escapes_only_for_a_top_level_string() {
        assert_eq!(output_projection(&Value::string(r"a\nb")), "a\nb");
        // A list containing a string with a raw escape sequence is rendered
        // as-is; the nested string's `\n` is not resolved into a newline.
        let list = Value::list(vec![Value::string(r"a\nb")]);
        assert_eq!(output_projection(&list), r#"["a\nb"]"#);
    }

    #[test]
    fn process_escapes_resolves_known_sequences_and_passes_through_unknown() {
        assert_eq!(process_escapes(r"a\nb"), "a\nb");
        assert_eq!(process_escapes(r"a\qb"), "a\\qb");
    }
}
