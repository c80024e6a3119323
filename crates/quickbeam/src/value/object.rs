//! Object model: classes, interfaces and instances

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use super::Value;
use crate::ast::{Expr, FunctionDecl, MethodSignature, TypeRef, Visibility};
use crate::environment::Environment;

/// A declared field (instance or static): its type and default expression.
#[derive(Debug, Clone)]
pub struct FieldDecl {
    /// Declared type
    pub ty: Option<TypeRef>,

    /// Default value expression (null when absent)
    pub default: Option<Expr>,

    /// Visibility
    pub visibility: Visibility,
}

/// A method declared directly on a class.
#[derive(Debug, Clone)]
pub struct Method {
    /// Definition
    pub decl: Rc<FunctionDecl>,

    /// Visibility
    pub visibility: Visibility,

    /// Whether the method is `static`
    pub is_static: bool,
}

impl Method {
    /// Method name.
    pub fn name(&self) -> &str {
        self.decl.name.as_deref().unwrap_or("<anonymous>")
    }

    /// Number of declared parameters.
    pub fn arity(&self) -> usize {
        self.decl.params.len()
    }
}

/// A class record.
///
/// Member maps hold only what the class declares directly. Inherited members
/// are found by walking `parent` at lookup time, never copied down.
/// Constants and static values are written once while the class is being
/// defined; static values may be reassigned afterwards.
#[derive(Debug)]
pub struct Class {
    /// Unqualified name
    pub name: String,

    /// Namespace the class was registered in, if any
    pub namespace: Option<String>,

    /// Parent class
    pub parent: Option<Rc<Class>>,

    /// Implemented interfaces
    pub interfaces: Vec<Rc<Interface>>,

    /// Constants (name → value)
    pub constants: RefCell<IndexMap<String, Value>>,

    /// Instance field declarations in declaration order
    pub fields: IndexMap<String, FieldDecl>,

    /// Static field declarations
    pub static_fields: IndexMap<String, FieldDecl>,

    /// Current static field values
    pub static_values: RefCell<IndexMap<String, Value>>,

    /// Instance methods
    pub methods: IndexMap<String, Rc<Method>>,

    /// Static methods
    pub static_methods: IndexMap<String, Rc<Method>>,

    /// Environment the class was declared in; method bodies run in children of it
    pub env: Environment,
}

impl Class {
    /// Namespace-qualified name (`App.Models.User`), or the bare name.
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}.{}", self.name),
            None => self.name.clone(),
        }
    }

    /// This class followed by its ancestors, closest first.
    pub fn lineage(self: &Rc<Self>) -> Vec<Rc<Class>> {
        let mut chain = vec![Rc::clone(self)];
        let mut current = self.parent.clone();
        while let Some(class) = current {
            current = class.parent.clone();
            chain.push(class);
        }
        chain
    }

    /// Find an instance method, closest ancestor first.
    ///
    /// Returns the defining class alongside the method.
    pub fn find_method(self: &Rc<Self>, name: &str) -> Option<(Rc<Class>, Rc<Method>)> {
        self.lineage()
            .into_iter()
            .find_map(|class| class.methods.get(name).cloned().map(|m| (class, m)))
    }

    /// Find a static method, closest ancestor first.
    pub fn find_static_method(self: &Rc<Self>, name: &str) -> Option<(Rc<Class>, Rc<Method>)> {
        self.lineage().into_iter().find_map(|class| {
            class
                .static_methods
                .get(name)
                .cloned()
                .map(|m| (class, m))
        })
    }

    /// Find a constant, closest ancestor first.
    pub fn find_constant(self: &Rc<Self>, name: &str) -> Option<Value> {
        self.lineage()
            .into_iter()
            .find_map(|class| class.constants.borrow().get(name).cloned())
    }

    /// Find the class that declares static field `name`.
    pub fn find_static_field_owner(self: &Rc<Self>, name: &str) -> Option<Rc<Class>> {
        self.lineage()
            .into_iter()
            .find(|class| class.static_fields.contains_key(name))
    }

    /// Find the closest declaration of instance field `name`.
    pub fn find_field_decl(self: &Rc<Self>, name: &str) -> Option<(Rc<Class>, FieldDecl)> {
        self.lineage()
            .into_iter()
            .find_map(|class| class.fields.get(name).cloned().map(|d| (class, d)))
    }

    /// Whether `self` is `other` or one of its descendants.
    pub fn is_subclass_of(self: &Rc<Self>, other: &Rc<Class>) -> bool {
        self.lineage().iter().any(|class| Rc::ptr_eq(class, other))
    }

    /// Whether `self` or an ancestor implements `interface` (directly or through
    /// interface inheritance).
    pub fn implements(self: &Rc<Self>, interface: &Rc<Interface>) -> bool {
        self.lineage().iter().any(|class| {
            class
                .interfaces
                .iter()
                .any(|i| Rc::ptr_eq(i, interface) || i.extends(interface))
        })
    }
}

/// A method an interface requires, tagged with the interface declaring it.
#[derive(Debug, Clone)]
pub struct RequiredMethod {
    /// Qualified name of the declaring interface
    pub interface: String,

    /// The signature
    pub signature: MethodSignature,
}

/// An interface record.
#[derive(Debug)]
pub struct Interface {
    /// Unqualified name
    pub name: String,

    /// Namespace the interface was registered in, if any
    pub namespace: Option<String>,

    /// Extended interfaces
    pub parents: Vec<Rc<Interface>>,

    /// Methods declared directly on this interface
    pub methods: IndexMap<String, MethodSignature>,
}

impl Interface {
    /// Namespace-qualified name.
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}.{}", self.name),
            None => self.name.clone(),
        }
    }

    /// Every required method, including those of extended interfaces.
    pub fn required_methods(&self) -> Vec<RequiredMethod> {
        let mut required: Vec<RequiredMethod> = self
            .methods
            .values()
            .map(|sig| RequiredMethod {
                interface: self.qualified_name(),
                signature: sig.clone(),
            })
            .collect();
        for parent in &self.parents {
            required.extend(parent.required_methods());
        }
        required
    }

    /// Whether this interface extends `other`, directly or transitively.
    pub fn extends(&self, other: &Rc<Interface>) -> bool {
        self.parents
            .iter()
            .any(|p| Rc::ptr_eq(p, other) || p.extends(other))
    }
}

/// A class instance.
///
/// Instances have reference semantics: every holder of the `Rc` sees the
/// same field table.
#[derive(Debug)]
pub struct Instance {
    /// The instantiated class
    pub class: Rc<Class>,

    /// Field values
    pub fields: RefCell<IndexMap<String, Value>>,
}

impl Instance {
    /// Create an instance with the given field table.
    pub fn new(class: Rc<Class>, fields: IndexMap<String, Value>) -> Self {
        Self {
            class,
            fields: RefCell::new(fields),
        }
    }

    /// Read a field.
    pub fn get_field(&self, name: &str) -> Option<Value> {
        self.fields.borrow().get(name).cloned()
    }

    /// Write a field, creating it if absent.
    pub fn set_field(&self, name: impl Into<String>, value: Value) {
        debug_assert!(!value.is_signal(), "signals must never be stored");
        self.fields.borrow_mut().insert(name.into(), value);
    }

    /// Whether the field exists.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.borrow().contains_key(name)
    }
}
