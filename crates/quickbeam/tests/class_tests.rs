//! Classes, inheritance, interfaces and visibility

use pretty_assertions::assert_eq;
use quickbeam::*;

fn eval(src: &str) -> Value {
    Interpreter::new().eval_source(src)
}

fn eval_err(src: &str) -> EvalError {
    match eval(src) {
        Value::Error(err) => *err,
        other => panic!("expected an error, got {other:?}"),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Instances
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_constructor_and_methods() {
    let src = r#"
        class Point {
            x = 0
            y = 0
            func __construct(x, y) {
                this.x = x
                this.y = y
            }
            func sum() {
                return this.x + this.y
            }
        }
        p := new Point(3, 4)
        p.sum()
    "#;
    assert_eq!(eval(src), Value::Int(7));
}

#[test]
fn test_field_defaults_without_constructor() {
    let src = r#"
        class Config {
            name = "app"
            port: int = 8000 + 80
            debug
        }
        c := new Config
        c.name + ":" + c.port + ":" + c.debug
    "#;
    assert_eq!(eval(src), Value::string("app:8080:null"));
}

#[test]
fn test_instances_are_shared_by_reference() {
    let src = r#"
        class Box { value = 1 }
        a := new Box()
        b := a
        b.value = 99
        a.value
    "#;
    assert_eq!(eval(src), Value::Int(99));
}

#[test]
fn test_undeclared_field_is_created_on_assignment() {
    let src = r#"
        class Bag {}
        bag := new Bag()
        bag.extra = "yes"
        bag.extra
    "#;
    assert_eq!(eval(src), Value::string("yes"));
}

#[test]
fn test_undefined_member() {
    assert_eq!(
        eval_err("class Empty {}\nnew Empty().missing"),
        EvalError::UndefinedMember {
            owner: "Empty".to_string(),
            member: "missing".to_string(),
        }
    );
}

#[test]
fn test_arguments_without_constructor() {
    assert_eq!(
        eval_err("class Plain {}\nnew Plain(1, 2)"),
        EvalError::ArityMismatch {
            name: "Plain::__construct".to_string(),
            expected: 0,
            got: 2,
        }
    );
}

#[test]
fn test_constructor_arity_is_checked() {
    let src = r#"
        class Pair {
            func __construct(a, b) {}
        }
        new Pair(1)
    "#;
    assert!(matches!(
        eval_err(src),
        EvalError::ArityMismatch { expected: 2, got: 1, .. }
    ));
}

#[test]
fn test_instance_display_and_type() {
    assert_eq!(
        eval("class Thing {}\nstr(new Thing())"),
        Value::string("<Thing instance>")
    );
    assert_eq!(
        eval("namespace Shop\nclass Item {}\ntype_of(new Item())"),
        Value::string("Shop.Item")
    );
}

#[test]
fn test_bound_method_remembers_its_receiver() {
    let src = r#"
        class Greeter {
            name = ""
            func __construct(name) { this.name = name }
            func greet() { return "hi " + this.name }
        }
        f := new Greeter("ada").greet
        f()
    "#;
    assert_eq!(eval(src), Value::string("hi ada"));
}

// ═══════════════════════════════════════════════════════════════════════
// Inheritance
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_overriding_dispatches_on_the_runtime_class() {
    let src = r#"
        class Animal {
            func sound() { return "..." }
            func speak() { return "says " + this.sound() }
        }
        class Dog extends Animal {
            func sound() { return "woof" }
        }
        new Animal().speak() + " / " + new Dog().speak()
    "#;
    assert_eq!(eval(src), Value::string("says ... / says woof"));
}

#[test]
fn test_redeclared_field_replaces_inherited_default() {
    let src = r#"
        class Base {
            label = "base"
            size = 1
        }
        class Derived extends Base {
            label = "derived"
        }
        d := new Derived()
        d.label + ":" + d.size
    "#;
    assert_eq!(eval(src), Value::string("derived:1"));
}

#[test]
fn test_super_constructor_and_super_method() {
    let src = r#"
        class Animal {
            name = ""
            func __construct(name) { this.name = name }
            func describe() { return "animal " + this.name }
        }
        class Dog extends Animal {
            func __construct(name) {
                super::__construct(name + " the dog")
            }
            func describe() {
                return super::describe() + " (good)"
            }
        }
        new Dog("Rex").describe()
    "#;
    assert_eq!(eval(src), Value::string("animal Rex the dog (good)"));
}

#[test]
fn test_inherited_constructor() {
    let src = r#"
        class Named {
            name = ""
            func __construct(name) { this.name = name }
        }
        class User extends Named {}
        new User("kim").name
    "#;
    assert_eq!(eval(src), Value::string("kim"));
}

#[test]
fn test_extending_a_non_class() {
    assert_eq!(
        eval_err("base := 5\nclass Broken extends base {}"),
        EvalError::NotAClass {
            name: "base".to_string(),
            found: "int".to_string(),
        }
    );
    assert_eq!(
        eval_err("class Broken extends Nowhere {}"),
        EvalError::UndefinedClass {
            name: "Nowhere".to_string(),
        }
    );
}

// ═══════════════════════════════════════════════════════════════════════
// Static members and late static binding
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_self_and_static_binding() {
    let src = r#"
        class Model {
            static func kind() { return "model" }
            static func describe() {
                return self::kind() + "/" + static::kind()
            }
        }
        class User extends Model {
            static func kind() { return "user" }
        }
        Model::describe() + " " + User::describe()
    "#;
    assert_eq!(eval(src), Value::string("model/model model/user"));
}

#[test]
fn test_constants() {
    let src = r#"
        class Limits {
            const MAX = 10
            const DOUBLE = self::MAX * 2
        }
        class Strict extends Limits {}
        Limits::DOUBLE + Strict::MAX + Limits.MAX
    "#;
    assert_eq!(eval(src), Value::Int(40));
}

#[test]
fn test_assigning_a_constant_fails() {
    let src = r#"
        class Limits { const MAX = 10 }
        Limits::MAX = 11
    "#;
    assert!(matches!(eval_err(src), EvalError::Runtime { .. }));
}

#[test]
fn test_static_fields_are_shared_with_subclasses() {
    let src = r#"
        class Counter {
            static created = 0
            func __construct() { self::created++ }
        }
        class Special extends Counter {}
        new Counter()
        new Special()
        new Special()
        Counter::created * 10 + Special::created
    "#;
    assert_eq!(eval(src), Value::Int(33));
}

#[test]
fn test_static_method_through_member_access() {
    let src = r#"
        class MathUtil {
            static func square(n) { return n * n }
        }
        MathUtil.square(9)
    "#;
    assert_eq!(eval(src), Value::Int(81));
}

#[test]
fn test_instance_method_via_double_colon_outside_class() {
    let src = r#"
        class Tool {
            func use_it() { return 1 }
        }
        Tool::use_it()
    "#;
    assert_eq!(
        eval_err(src),
        EvalError::UndefinedMember {
            owner: "Tool".to_string(),
            member: "use_it".to_string(),
        }
    );
}

#[test]
fn test_self_outside_class() {
    assert!(matches!(eval_err("self::thing"), EvalError::Runtime { .. }));
}

// ═══════════════════════════════════════════════════════════════════════
// Visibility
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_private_field_is_hidden_outside_the_class() {
    let src = r#"
        class Account {
            private balance = 0
            func deposit(n) {
                this.balance += n
                return this.balance
            }
        }
        a := new Account()
        a.deposit(5)
        a.balance
    "#;
    assert_eq!(
        eval_err(src),
        EvalError::AccessViolation {
            class: "Account".to_string(),
            member: "balance".to_string(),
            visibility: "private".to_string(),
        }
    );
}

#[test]
fn test_private_members_work_inside_the_class() {
    let src = r#"
        class Account {
            private balance = 0
            func deposit(n) {
                this.balance += n
                return this.check()
            }
            private func check() { return this.balance }
        }
        new Account().deposit(12)
    "#;
    assert_eq!(eval(src), Value::Int(12));
}

#[test]
fn test_private_is_not_visible_to_subclasses() {
    let src = r#"
        class Vault {
            private func code() { return 1234 }
        }
        class Thief extends Vault {
            func steal() { return this.code() }
        }
        new Thief().steal()
    "#;
    assert!(matches!(
        eval_err(src),
        EvalError::AccessViolation { visibility, .. } if visibility == "private"
    ));
}

#[test]
fn test_protected_reaches_subclasses_only() {
    let base = r#"
        class Base {
            protected secret = 7
        }
        class Child extends Base {
            func reveal() { return this.secret }
        }
    "#;
    assert_eq!(eval(&format!("{base}\nnew Child().reveal()")), Value::Int(7));
    assert!(matches!(
        eval_err(&format!("{base}\nnew Child().secret")),
        EvalError::AccessViolation { visibility, .. } if visibility == "protected"
    ));
}

#[test]
fn test_private_constructor() {
    let src = r#"
        class Singleton {
            private func __construct() {}
            static func make() { return new Singleton() }
        }
        type_of(Singleton::make())
    "#;
    assert_eq!(eval(src), Value::string("Singleton"));
    assert!(matches!(
        eval_err("class Singleton { private func __construct() {} }\nnew Singleton()"),
        EvalError::AccessViolation { .. }
    ));
}

// ═══════════════════════════════════════════════════════════════════════
// Interfaces
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_interface_conformance() {
    let src = r#"
        interface Shape {
            func area(): float
        }
        class Square implements Shape {
            side = 2
            func area() { return this.side * this.side }
        }
        new Square().area()
    "#;
    assert_eq!(eval(src), Value::Int(4));
}

#[test]
fn test_missing_interface_method_fails_at_definition() {
    let mut interp = Interpreter::new();
    let output = interp.capture_output();
    let result = interp.eval_source(
        r#"
        interface Shape {
            func area(): float
        }
        class Square implements Shape {
            func perimeter() { return 4 }
        }
        println("unreachable")
        "#,
    );
    assert_eq!(
        result.as_error(),
        Some(&EvalError::InterfaceNotImplemented {
            class: "Square".to_string(),
            interface: "Shape".to_string(),
            method: "area".to_string(),
        })
    );
    assert_eq!(output.contents(), "");
}

#[test]
fn test_interface_method_arity_must_match() {
    let src = r#"
        interface Comparable {
            func compare(other): int
        }
        class Num implements Comparable {
            func compare() { return 0 }
        }
    "#;
    assert!(matches!(
        eval_err(src),
        EvalError::InterfaceNotImplemented { method, .. } if method == "compare"
    ));
}

#[test]
fn test_extended_interface_requirements() {
    let src = r#"
        interface Named {
            func name(): string
        }
        interface Pet extends Named {
            func sound(): string
        }
        class Cat implements Pet {
            func sound() { return "meow" }
        }
    "#;
    assert_eq!(
        eval_err(src),
        EvalError::InterfaceNotImplemented {
            class: "Cat".to_string(),
            interface: "Named".to_string(),
            method: "name".to_string(),
        }
    );
}

#[test]
fn test_inherited_method_satisfies_interface() {
    let src = r#"
        interface Runnable {
            func run()
        }
        class Task {
            func run() { return "ran" }
        }
        class Job extends Task implements Runnable {}
        new Job().run()
    "#;
    assert_eq!(eval(src), Value::string("ran"));
}

#[test]
fn test_implementing_a_class_is_an_error() {
    let src = r#"
        class Concrete {}
        class Other implements Concrete {}
    "#;
    assert_eq!(
        eval_err(src),
        EvalError::NotAnInterface {
            name: "Concrete".to_string(),
            found: "class".to_string(),
        }
    );
}

// ═══════════════════════════════════════════════════════════════════════
// Namespaces
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_classes_register_in_the_current_namespace() {
    let mut interp = Interpreter::new();
    let result = interp.eval_source(
        r#"
        namespace App.Models
        class User {}
        "#,
    );
    assert_eq!(result, Value::Null);
    assert_eq!(interp.current_namespace(), Some("App.Models"));
    assert!(matches!(
        interp.namespaces().lookup_qualified("App.Models.User"),
        Some(Value::Class(_))
    ));
    assert!(!interp.globals().contains("User"));
}

#[test]
fn test_qualified_and_short_names() {
    let src = r#"
        namespace Geo
        class Circle {
            r = 2
        }
        new Geo.Circle().r + new Circle().r
    "#;
    assert_eq!(eval(src), Value::Int(4));
}

#[test]
fn test_duplicate_class_in_namespace() {
    let src = r#"
        namespace Dup
        class Thing {}
        class Thing {}
    "#;
    assert!(matches!(eval_err(src), EvalError::Runtime { .. }));
}

#[test]
fn test_same_name_in_different_namespaces() {
    let src = r#"
        namespace Left
        class Side { const NAME = "left" }
        namespace Right
        class Side { const NAME = "right" }
        Left.Side::NAME + Right.Side::NAME + Side::NAME
    "#;
    assert_eq!(eval(src), Value::string("leftrightright"));
}
