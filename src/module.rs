// ABOUTME: Per-interpreter module registry: native builder lookup plus the source-module cache

use crate::env::Environment;
use crate::value::{Module, Value};
use std::collections::HashMap;
use std::rc::Rc;

/// Builds the environment backing one `std:`-prefixed native module. Called
/// once per distinct module name; the resulting environment is cached.
pub type NativeModuleBuilder = Rc<dyn Fn() -> Rc<Environment>>;

/// Owned by one [`crate::eval::Interpreter`] (spec's resolved Open Question:
/// registries are per-interpreter, not process-wide statics). Caches source
/// modules by canonicalized path and native modules by their literal `std:`
/// name, so re-importing the same module returns the same `Module` value
/// (and the same backing `Environment`) rather than re-executing it.
pub struct ModuleRegistry {
    native_builders: HashMap<String, NativeModuleBuilder>,
    cache: HashMap<String, Value>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        ModuleRegistry {
            native_builders: HashMap::new(),
            cache: HashMap::new(),
        }
    }

    pub fn register_native(&mut self, name: impl Into<String>, builder: NativeModuleBuilder) {
        self.native_builders.insert(name.into(), builder);
    }

    pub fn cached(&self, key: &str) -> Option<Value> {
        self.cache.get(key).cloned()
    }

    /// Builds and caches a native module under its literal `std:` name.
    /// Returns `None` if no builder is registered under that name.
    pub fn load_native(&mut self, name: &str) -> Option<Value> {
        if let Some(cached) = self.cached(name) {
            return Some(cached);
        }
        let builder = self.native_builders.get(name)?.clone();
        let environment = builder();
        let value = Value::Module(Rc::new(Module {
            environment,
            origin: name.to_string(),
        }));
        self.cache.insert(name.to_string(), value.clone());
        Some(value)
    }

    /// Reserves `key` with a partially-populated module value *before* the
    /// caller executes the module body, so a cyclic `import` sees this
    /// placeholder instead of recursing back into interpretation (spec
    /// §4.7's resolved open question: cache-before-execute).
    pub fn reserve(&mut self, key: String, value: Value) {
        self.cache.insert(key, value);
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_module_is_built_once_and_cached() {
        use std::cell::Cell;
        use std::rc::Rc as StdRc;

        let build_count = StdRc::new(Cell::new(0));
        let counted = build_count.clone();
        let mut registry = ModuleRegistry::new();
        registry.register_native(
            "std:math",
            Rc::new(move || {
                counted.set(counted.get() + 1);
                Environment::new()
            }),
        );

        let first = registry.load_native("std:math").unwrap();
        let second = registry.load_native("std:math").unwrap();
        assert_eq!(build_count.get(), 1);
        if let (Value::Module(a), Value::Module(b)) = (&first, &second) {
            assert!(Rc::ptr_eq(&a.environment, &b.environment));
        } else {
            panic!("expected module values");
        }
    }

    #[test]
    fn unregistered_native_name_returns_none() {
        let mut registry = ModuleRegistry::new();
        assert!(registry.load_native("std:nope").is_none());
    }

    #[test]
    fn reserve_makes_a_value_visible_before_execution_completes() {
        let mut registry = ModuleRegistry::new();
        let placeholder = Value::Module(Rc::new(Module {
            environment: Environment::new(),
            origin: "/tmp/cycle.nyx".to_string(),
        }));
        registry.reserve("/tmp/cycle.nyx".to_string(), placeholder.clone());
        assert!(registry.cached("/tmp/cycle.nyx").is_some());
    }
}
