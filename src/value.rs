// ABOUTME: Value types representing Nyx's dynamically-typed data domain

use crate::ast::FunctionDecl;
use crate::env::Environment;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A user-defined function: its declaration node plus the environment
/// active when the `func` statement executed (its closure).
#[derive(Debug, Clone)]
pub struct Function {
    pub declaration: Rc<FunctionDecl>,
    pub closure: Rc<Environment>,
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.declaration, &other.declaration)
            && Rc::ptr_eq(&self.closure, &other.closure)
    }
}

/// A host-implemented function's callback, taking the interpreter that is
/// calling it (the `interpreter_ref` spec §6's registration surface
/// describes) plus the already-evaluated argument list.
pub type NativeCallback =
    Rc<dyn Fn(&mut crate::eval::Interpreter, &[Value]) -> Result<Value, crate::error::NyxError>>;

/// A host-implemented function exposed to Nyx code.
#[derive(Clone)]
pub struct NativeFunction {
    pub name: String,
    /// -1 marks a variadic native function that accepts any argument count.
    pub arity: i32,
    pub callback: NativeCallback,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

impl PartialEq for NativeFunction {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.callback, &other.callback)
    }
}

/// A loaded module: the environment holding its exported bindings, and the
/// path or `std:` name it was imported under (used for display and error
/// messages, and as part of the module cache key).
#[derive(Debug, Clone)]
pub struct Module {
    pub environment: Rc<Environment>,
    pub origin: String,
}

impl PartialEq for Module {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.environment, &other.environment)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDef {
    pub name: String,
    pub field_names: Vec<String>,
}

impl StructDef {
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.field_names.iter().position(|f| f == name)
    }
}

#[derive(Debug, Clone)]
pub struct StructInstance {
    pub def: Rc<StructDef>,
    pub fields: Rc<RefCell<Vec<Value>>>,
}

impl PartialEq for StructInstance {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.fields, &other.fields)
    }
}

/// An owning wrapper around a host resource. The core never constructs these
/// itself; native modules do, and release the resource when the last
/// reference drops (ordinary `Rc` refcounting).
#[derive(Debug, Clone)]
pub struct OpaqueHandle {
    pub kind: &'static str,
    pub resource: Rc<dyn std::any::Any>,
}

impl PartialEq for OpaqueHandle {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && Rc::ptr_eq(&self.resource, &other.resource)
    }
}

/// The dynamically-typed value domain. Primitives copy by value; aggregates,
/// callables, modules, structs, and handles share a reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(Rc<String>),
    List(Rc<RefCell<Vec<Value>>>),
    Function(Rc<Function>),
    Native(Rc<NativeFunction>),
    Module(Rc<Module>),
    StructDef(Rc<StructDef>),
    StructInst(StructInstance),
    Handle(OpaqueHandle),
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(Rc::new(s.into()))
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items)))
    }

    /// Uppercase domain tag, per spec's `type_name`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Bool(_) => "BOOL",
            Value::Number(_) => "NUMBER",
            Value::String(_) => "STRING",
            Value::List(_) => "LIST",
            Value::Function(_) => "FUNCTION",
            Value::Native(_) => "NATIVE",
            Value::Module(_) => "MODULE",
            Value::StructDef(_) => "STRUCTDEF",
            Value::StructInst(_) => "STRUCTINST",
            Value::Handle(_) => "HANDLE",
        }
    }

    pub fn truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::List(l) => !l.borrow().is_empty(),
            Value::Function(_) | Value::Module(_) | Value::Native(_) => true,
            Value::StructDef(_) | Value::StructInst(_) => true,
            Value::Handle(_) => true,
        }
    }

    /// Structural equality for primitives and lists, reference identity for
    /// everything else.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => {
                let a = a.borrow();
                let b = b.borrow();
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.equals(y))
            }
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => Rc::ptr_eq(a, b),
            (Value::Module(a), Value::Module(b)) => Rc::ptr_eq(a, b),
            (Value::StructDef(a), Value::StructDef(b)) => Rc::ptr_eq(a, b),
            (Value::StructInst(a), Value::StructInst(b)) => a == b,
            (Value::Handle(a), Value::Handle(b)) => a == b,
            _ => false,
        }
    }

    /// Display form. Strings render with raw, un-escaped bytes (escape
    /// resolution is an `output`/`put` emission concern, not a rendering one).
    pub fn render(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => render_number(*n),
            Value::String(s) => s.as_str().to_string(),
            Value::List(items) => {
                let items = items.borrow();
                let rendered: Vec<String> = items.iter().map(render_list_element).collect();
                format!("[{}]", rendered.join(", "))
            }
            Value::Function(f) => format!("<func {}>", f.declaration.name),
            Value::Native(n) => format!("<native_func {}>", n.name),
            Value::Module(m) => format!("<module '{}'>", m.origin),
            Value::StructDef(d) => format!("<struct {}>", d.name),
            Value::StructInst(inst) => {
                let fields = inst.fields.borrow();
                let parts: Vec<String> = inst
                    .def
                    .field_names
                    .iter()
                    .zip(fields.iter())
                    .map(|(name, v)| format!("{}: {}", name, render_list_element(v)))
                    .collect();
                format!("{}{{{}}}", inst.def.name, parts.join(", "))
            }
            Value::Handle(h) => format!("<{}_HANDLE>", h.kind.to_uppercase()),
        }
    }
}

fn render_list_element(v: &Value) -> String {
    match v {
        Value::String(s) => format!("\"{}\"", s.as_str()),
        other => other.render(),
    }
}

fn render_number(n: f64) -> String {
    if n == n.trunc() && n.is_finite() {
        format!("{}", n as i64)
    } else {
        let mut s = format!("{}", n);
        if s.contains('.') {
            while s.ends_with('0') {
                s.pop();
            }
            if s.ends_with('.') {
                s.pop();
            }
        }
        s
    }
}
