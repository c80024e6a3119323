//! Namespace registry
//!
//! One [`NamespaceManager`] lives in each interpreter session. It only ever
//! grows: namespaces are created on first declaration or first successful
//! file load, and classes and interfaces are added, never removed.

use std::rc::Rc;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::EvalError;
use crate::value::{Class, Interface, Value};

/// A named collection of classes and interfaces.
#[derive(Debug, Default)]
pub struct Namespace {
    /// Fully-qualified dotted name
    pub name: String,

    /// Classes by unqualified name
    pub classes: IndexMap<String, Rc<Class>>,

    /// Interfaces by unqualified name
    pub interfaces: IndexMap<String, Rc<Interface>>,
}

impl Namespace {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Look up a class or interface by unqualified name.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.classes
            .get(name)
            .map(|c| Value::Class(Rc::clone(c)))
            .or_else(|| {
                self.interfaces
                    .get(name)
                    .map(|i| Value::Interface(Rc::clone(i)))
            })
    }

    fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name) || self.interfaces.contains_key(name)
    }
}

/// Every namespace known to the session, keyed by qualified name.
#[derive(Debug, Default)]
pub struct NamespaceManager {
    namespaces: IndexMap<String, Namespace>,
}

impl NamespaceManager {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create a namespace.
    pub fn ensure(&mut self, name: &str) -> &mut Namespace {
        self.namespaces
            .entry(name.to_string())
            .or_insert_with(|| Namespace::new(name))
    }

    /// Look up a namespace.
    pub fn get(&self, name: &str) -> Option<&Namespace> {
        self.namespaces.get(name)
    }

    /// Whether a namespace exists.
    pub fn contains(&self, name: &str) -> bool {
        self.namespaces.contains_key(name)
    }

    /// Look up `name` inside namespace `namespace`.
    pub fn lookup(&self, namespace: &str, name: &str) -> Option<Value> {
        self.namespaces.get(namespace).and_then(|ns| ns.get(name))
    }

    /// Resolve a dotted `Namespace.Name` path.
    pub fn lookup_qualified(&self, path: &str) -> Option<Value> {
        let (namespace, name) = path.rsplit_once('.')?;
        self.lookup(namespace, name)
    }

    /// Last-resort search of every namespace for a class named `name`.
    ///
    /// Namespaces are searched in creation order; the first match wins.
    pub fn find_class_anywhere(&self, name: &str) -> Option<Rc<Class>> {
        self.namespaces
            .values()
            .find_map(|ns| ns.classes.get(name).cloned())
    }

    /// Like [`find_class_anywhere`](Self::find_class_anywhere), but also
    /// matches interfaces.
    pub fn find_anywhere(&self, name: &str) -> Option<Value> {
        self.namespaces.values().find_map(|ns| ns.get(name))
    }

    /// Register a class in its namespace.
    ///
    /// Registering the same name twice in one namespace is an error.
    pub fn register_class(&mut self, namespace: &str, class: Rc<Class>) -> Result<(), EvalError> {
        let ns = self.ensure(namespace);
        if ns.contains(&class.name) {
            return Err(EvalError::runtime(format!(
                "{} is already defined in namespace {}",
                class.name, namespace
            )));
        }
        debug!(namespace, class = %class.name, "registered class");
        ns.classes.insert(class.name.clone(), class);
        Ok(())
    }

    /// Register an interface in its namespace.
    pub fn register_interface(
        &mut self,
        namespace: &str,
        interface: Rc<Interface>,
    ) -> Result<(), EvalError> {
        let ns = self.ensure(namespace);
        if ns.contains(&interface.name) {
            return Err(EvalError::runtime(format!(
                "{} is already defined in namespace {}",
                interface.name, namespace
            )));
        }
        debug!(namespace, interface = %interface.name, "registered interface");
        ns.interfaces.insert(interface.name.clone(), interface);
        Ok(())
    }

    /// Every registered class across all namespaces.
    pub fn all_classes(&self) -> impl Iterator<Item = &Rc<Class>> {
        self.namespaces.values().flat_map(|ns| ns.classes.values())
    }

    /// Names of every namespace, in creation order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.namespaces.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::environment::Environment;

    fn class(name: &str, namespace: &str) -> Rc<Class> {
        Rc::new(Class {
            name: name.to_string(),
            namespace: Some(namespace.to_string()),
            parent: None,
            interfaces: vec![],
            constants: RefCell::new(IndexMap::new()),
            fields: IndexMap::new(),
            static_fields: IndexMap::new(),
            static_values: RefCell::new(IndexMap::new()),
            methods: IndexMap::new(),
            static_methods: IndexMap::new(),
            env: Environment::new(),
        })
    }

    #[test]
    fn test_register_and_lookup() {
        let mut manager = NamespaceManager::new();
        manager
            .register_class("App.Models", class("User", "App.Models"))
            .unwrap();
        assert!(manager.contains("App.Models"));
        assert!(matches!(
            manager.lookup_qualified("App.Models.User"),
            Some(Value::Class(_))
        ));
        assert!(manager.lookup("App.Models", "Post").is_none());
        assert!(manager.lookup_qualified("User").is_none());
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut manager = NamespaceManager::new();
        manager.register_class("A", class("X", "A")).unwrap();
        assert!(manager.register_class("A", class("X", "A")).is_err());
        assert!(manager.register_class("B", class("X", "B")).is_ok());
    }

    #[test]
    fn test_find_class_anywhere_uses_creation_order() {
        let mut manager = NamespaceManager::new();
        manager.register_class("First", class("Shared", "First")).unwrap();
        manager.register_class("Second", class("Shared", "Second")).unwrap();
        let found = manager.find_class_anywhere("Shared").unwrap();
        assert_eq!(found.qualified_name(), "First.Shared");
        assert_eq!(manager.all_classes().count(), 2);
    }

    #[test]
    fn test_find_anywhere_matches_interfaces() {
        let mut manager = NamespaceManager::new();
        let interface = Rc::new(Interface {
            name: "Shape".to_string(),
            namespace: Some("Geo".to_string()),
            parents: vec![],
            methods: IndexMap::new(),
        });
        manager.register_interface("Geo", interface).unwrap();
        assert!(matches!(
            manager.find_anywhere("Shape"),
            Some(Value::Interface(_))
        ));
        assert!(manager.find_class_anywhere("Shape").is_none());
        assert_eq!(manager.names().collect::<Vec<_>>(), vec!["Geo"]);
    }
}
