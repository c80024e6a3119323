//! Runtime environment managing variable bindings

mod prelude;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::value::{BuiltinFn, Value};

struct Scope {
    bindings: IndexMap<String, Value>,
    parent: Option<Environment>,
}

/// A chain of scopes implementing lexical closures.
///
/// An `Environment` is a cheap handle to a shared scope: cloning it yields
/// another handle to the *same* scope, which is how closures capture their
/// defining environment by reference. A scope lives as long as its longest
/// holder (a nested scope, a closure, a class record).
///
/// # Example
///
/// ```
/// use quickbeam::{Environment, Value};
///
/// let global = Environment::new();
/// global.define("x", Value::Int(1));
///
/// let inner = global.new_child();
/// inner.define("y", Value::Int(2));
/// inner.set("x", Value::Int(10)); // rebinds the outer x
///
/// assert_eq!(global.get("x"), Some(Value::Int(10)));
/// assert_eq!(inner.get("y"), Some(Value::Int(2)));
/// assert_eq!(global.get("y"), None);
/// ```
///
/// A handle made by [`Environment::capture`] is a bounded view: it sees the
/// bindings that existed when it was taken (and their later values), but not
/// names added to those scopes afterwards.
#[derive(Clone)]
pub struct Environment {
    scope: Rc<RefCell<Scope>>,
    /// Visible binding count per scope, innermost first. `None` sees all.
    bounds: Option<Rc<[usize]>>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Create a new root environment with no bindings.
    pub fn new() -> Self {
        Self {
            scope: Rc::new(RefCell::new(Scope {
                bindings: IndexMap::new(),
                parent: None,
            })),
            bounds: None,
        }
    }

    /// Create a fresh scope whose parent is `self`.
    pub fn new_child(&self) -> Self {
        Self {
            scope: Rc::new(RefCell::new(Scope {
                bindings: IndexMap::new(),
                parent: Some(self.clone()),
            })),
            bounds: None,
        }
    }

    /// A view of this chain frozen at its current set of names.
    ///
    /// Values of existing bindings stay live in both directions; bindings
    /// added to any of these scopes later are invisible through the view.
    pub fn capture(&self) -> Self {
        let mut bounds = Vec::new();
        let mut current = Some(self.clone());
        while let Some(env) = current {
            if let Some(outer) = &env.bounds {
                bounds.extend_from_slice(outer);
                break;
            }
            bounds.push(env.len());
            current = env.parent();
        }
        Self {
            scope: Rc::clone(&self.scope),
            bounds: Some(bounds.into()),
        }
    }

    /// The enclosing environment, if any.
    pub fn parent(&self) -> Option<Environment> {
        self.scope.borrow().parent.clone()
    }

    /// Number of scopes from here to the root (the root has depth 1).
    pub fn depth(&self) -> usize {
        1 + self.parent().map_or(0, |p| p.depth())
    }

    /// Whether two handles refer to the same scope.
    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.scope, &other.scope)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Binding Lookup
    // ═══════════════════════════════════════════════════════════════════

    /// Look up a binding, walking outward through enclosing scopes.
    ///
    /// `None` is not an error by itself; callers decide how to report it.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.get_within(name, self.bounds.as_deref().unwrap_or(&[]))
    }

    fn get_within(&self, name: &str, bounds: &[usize]) -> Option<Value> {
        let (limit, outer) = split_bounds(bounds);
        let scope = self.scope.borrow();
        if let Some((index, _, value)) = scope.bindings.get_full(name) {
            if limit.map_or(true, |limit| index < limit) {
                return Some(value.clone());
            }
        }
        match &scope.parent {
            Some(parent) if outer.is_empty() => parent.get(name),
            Some(parent) => parent.get_within(name, outer),
            None => None,
        }
    }

    /// Check if a binding exists anywhere in the chain.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Check if a binding exists in this scope only.
    pub fn contains_local(&self, name: &str) -> bool {
        let (limit, _) = split_bounds(self.bounds.as_deref().unwrap_or(&[]));
        match self.scope.borrow().bindings.get_index_of(name) {
            Some(index) => limit.map_or(true, |limit| index < limit),
            None => false,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Binding Definition and Mutation
    // ═══════════════════════════════════════════════════════════════════

    /// Bind `name` in this scope, shadowing any outer binding.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        debug_assert!(!value.is_signal(), "signals must never be stored");
        self.scope.borrow_mut().bindings.insert(name.into(), value);
    }

    /// Rebind `name` where it already lives, or create it in this scope.
    ///
    /// Never creates a duplicate: an existing binding in this or any outer
    /// scope is updated in place.
    pub fn set(&self, name: &str, value: Value) {
        debug_assert!(!value.is_signal(), "signals must never be stored");
        if let Err(value) = self.rebind(name, value) {
            self.define(name, value);
        }
    }

    /// Update an existing binding, handing the value back if none exists.
    fn rebind(&self, name: &str, value: Value) -> Result<(), Value> {
        self.rebind_within(name, value, self.bounds.as_deref().unwrap_or(&[]))
    }

    fn rebind_within(&self, name: &str, value: Value, bounds: &[usize]) -> Result<(), Value> {
        let (limit, outer) = split_bounds(bounds);
        let parent = {
            let mut scope = self.scope.borrow_mut();
            if let Some((index, _, slot)) = scope.bindings.get_full_mut(name) {
                if limit.map_or(true, |limit| index < limit) {
                    *slot = value;
                    return Ok(());
                }
            }
            scope.parent.clone()
        };
        match parent {
            Some(parent) if outer.is_empty() => parent.rebind(name, value),
            Some(parent) => parent.rebind_within(name, value, outer),
            None => Err(value),
        }
    }

    /// Register a built-in function.
    pub fn define_builtin(&self, builtin: BuiltinFn) {
        let name = builtin.name.clone();
        self.define(name, Value::Builtin(builtin));
    }

    // ═══════════════════════════════════════════════════════════════════
    // Iteration and Inspection
    // ═══════════════════════════════════════════════════════════════════

    /// Get all binding names in this scope, in definition order.
    pub fn names_in_current_scope(&self) -> Vec<String> {
        self.scope.borrow().bindings.keys().cloned().collect()
    }

    /// Get the values bound in this scope, in definition order.
    pub fn values_in_current_scope(&self) -> Vec<Value> {
        self.scope.borrow().bindings.values().cloned().collect()
    }

    /// Number of bindings in this scope.
    pub fn len(&self) -> usize {
        self.scope.borrow().bindings.len()
    }

    /// Check if this scope has no bindings.
    pub fn is_empty(&self) -> bool {
        self.scope.borrow().bindings.is_empty()
    }
}

fn split_bounds(bounds: &[usize]) -> (Option<usize>, &[usize]) {
    match bounds.split_first() {
        Some((limit, outer)) => (Some(*limit), outer),
        None => (None, &[]),
    }
}

impl fmt::Debug for Environment {
    // Names only: values may close over this very scope
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("depth", &self.depth())
            .field("names", &self.names_in_current_scope())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_sees_parent() {
        let root = Environment::new();
        root.define("x", Value::Int(1));
        let child = root.new_child();
        assert_eq!(child.get("x"), Some(Value::Int(1)));
        assert_eq!(child.depth(), 2);
        assert!(child.parent().unwrap().ptr_eq(&root));
    }

    #[test]
    fn test_set_rebinds_outer() {
        let root = Environment::new();
        root.define("x", Value::Int(1));
        let child = root.new_child();
        child.set("x", Value::Int(2));
        assert_eq!(root.get("x"), Some(Value::Int(2)));
        assert!(!child.contains_local("x"));
    }

    #[test]
    fn test_set_creates_local_when_missing() {
        let root = Environment::new();
        let child = root.new_child();
        child.set("y", Value::Int(5));
        assert!(child.contains_local("y"));
        assert!(!root.contains("y"));
    }

    #[test]
    fn test_define_shadows() {
        let root = Environment::new();
        root.define("x", Value::Int(1));
        let child = root.new_child();
        child.define("x", Value::Int(2));
        assert_eq!(child.get("x"), Some(Value::Int(2)));
        assert_eq!(root.get("x"), Some(Value::Int(1)));
    }

    #[test]
    fn test_clones_share_scope() {
        let env = Environment::new();
        let handle = env.clone();
        handle.define("z", Value::Bool(true));
        assert_eq!(env.get("z"), Some(Value::Bool(true)));
        assert!(env.ptr_eq(&handle));
    }

    #[test]
    fn test_names_in_definition_order() {
        let env = Environment::new();
        env.define("b", Value::Null);
        env.define("a", Value::Null);
        assert_eq!(env.names_in_current_scope(), vec!["b", "a"]);
        assert_eq!(env.len(), 2);
    }

    #[test]
    fn test_capture_hides_later_names() {
        let root = Environment::new();
        root.define("x", Value::Int(1));
        let view = root.capture();
        root.define("y", Value::Int(2));
        root.set("x", Value::Int(3));

        assert_eq!(view.get("x"), Some(Value::Int(3)));
        assert_eq!(view.get("y"), None);
        assert!(!view.contains_local("y"));
        assert_eq!(root.get("y"), Some(Value::Int(2)));
    }

    #[test]
    fn test_capture_bounds_every_enclosing_scope() {
        let root = Environment::new();
        root.define("a", Value::Int(1));
        let inner = root.new_child();
        let view = inner.capture();
        root.define("b", Value::Int(2));
        inner.define("c", Value::Int(3));

        let call = view.new_child();
        assert_eq!(call.get("a"), Some(Value::Int(1)));
        assert_eq!(call.get("b"), None);
        assert_eq!(call.get("c"), None);

        // Hidden names are not rebound through the view
        call.set("b", Value::Int(20));
        assert!(call.contains_local("b"));
        assert_eq!(root.get("b"), Some(Value::Int(2)));

        call.set("a", Value::Int(10));
        assert_eq!(root.get("a"), Some(Value::Int(10)));
    }

    #[test]
    fn test_capture_of_a_scope_under_a_view_keeps_the_outer_bounds() {
        let root = Environment::new();
        root.define("a", Value::Int(1));
        let view = root.capture();
        root.define("late", Value::Int(2));

        let call = view.new_child();
        call.define("local", Value::Int(3));
        let nested = call.capture();
        assert_eq!(nested.get("local"), Some(Value::Int(3)));
        assert_eq!(nested.get("a"), Some(Value::Int(1)));
        assert_eq!(nested.get("late"), None);
    }
}
