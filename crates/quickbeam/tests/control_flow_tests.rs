//! Loops, signals, functions and closures

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
// Loops
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_three_clause_for() {
    let src = r#"
        sum := 0
        for i := 0; i < 5; i++ {
            sum += i
        }
        sum
    "#;
    assert_eq!(eval(src), Value::Int(10));
}

#[test]
fn test_condition_only_for() {
    let src = r#"
        n := 1
        for n < 100 {
            n *= 2
        }
        n
    "#;
    assert_eq!(eval(src), Value::Int(128));
}

#[test]
fn test_infinite_for_with_break() {
    let src = r#"
        n := 0
        for {
            n++
            if n == 7 {
                break
            }
        }
        n
    "#;
    assert_eq!(eval(src), Value::Int(7));
}

#[test]
fn test_continue_still_runs_post() {
    let src = r#"
        odd := []
        for i := 0; i < 6; i++ {
            if i % 2 == 0 {
                continue
            }
            push(odd, i)
        }
        odd
    "#;
    assert_eq!(
        eval(src),
        Value::array(vec![Value::Int(1), Value::Int(3), Value::Int(5)])
    );
}

#[test]
fn test_loop_variable_is_scoped_to_the_loop() {
    let src = r#"
        for i := 0; i < 2; i++ {}
        i
    "#;
    assert!(matches!(
        eval_err(src),
        EvalError::UndefinedIdentifier { .. }
    ));
}

#[test]
fn test_break_only_exits_the_innermost_loop() {
    let src = r#"
        count := 0
        for i := 0; i < 3; i++ {
            for j := 0; j < 10; j++ {
                if j == 2 {
                    break
                }
                count++
            }
        }
        count
    "#;
    assert_eq!(eval(src), Value::Int(6));
}

#[test]
fn test_error_inside_loop_stops_it() {
    let mut interp = Interpreter::new();
    let output = interp.capture_output();
    let result = interp.eval_source(
        r#"
        for i := 3; i >= 0; i-- {
            println(6 / i)
        }
        "#,
    );
    assert_eq!(result.as_error(), Some(&EvalError::DivisionByZero));
    assert_eq!(output.contents(), "2\n3\n6\n");
}

#[test]
fn test_interrupted_loop() {
    let ctx = EvalContext::new();
    ctx.interrupt();
    let mut interp = Interpreter::new().with_context(ctx);
    let result = interp.eval_source("for {}");
    assert_eq!(result.as_error(), Some(&EvalError::Interrupted));
}

// ═══════════════════════════════════════════════════════════════════════
// Return and stray signals
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_return_from_inside_nested_loop() {
    let src = r#"
        func find(items, wanted) {
            for i := 0; i < len(items); i++ {
                if items[i] == wanted {
                    return i
                }
            }
            return -1
        }
        find([4, 8, 15], 8) * 10 + find([], 1)
    "#;
    assert_eq!(eval(src), Value::Int(9));
}

#[test]
fn test_return_skips_the_rest_of_the_body() {
    let mut interp = Interpreter::new();
    let output = interp.capture_output();
    let result = interp.eval_source(
        r#"
        func f() {
            println("before")
            if true {
                return 1
            }
            println("after")
        }
        f()
        "#,
    );
    assert_eq!(result, Value::Int(1));
    assert_eq!(output.contents(), "before\n");
}

#[test]
fn test_function_without_return_yields_null() {
    assert_eq!(eval("func f() { x := 1 }\nf()"), Value::Null);
    assert_eq!(eval("func f() { return }\nf()"), Value::Null);
}

#[test]
fn test_stray_break_in_function_is_an_error() {
    assert_eq!(
        eval_err("func f() { break }\nf()"),
        EvalError::BreakOutsideLoop
    );
    assert_eq!(
        eval_err("func f() { continue }\nf()"),
        EvalError::ContinueOutsideLoop
    );
}

#[test]
fn test_top_level_signals_are_errors() {
    assert_eq!(eval_err("return 5"), EvalError::ReturnOutsideFunction);
    assert_eq!(eval_err("continue"), EvalError::ContinueOutsideLoop);
}

#[test]
fn test_go_statement_is_unsupported() {
    assert!(matches!(
        eval_err("func f() {}\ngo f()"),
        EvalError::Unsupported { .. }
    ));
}

// ═══════════════════════════════════════════════════════════════════════
// Conditionals
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_else_if_chain() {
    let src = r#"
        func grade(n) {
            if n >= 90 {
                return "A"
            } else if n >= 80 {
                return "B"
            } else {
                return "C"
            }
        }
        grade(95) + grade(85) + grade(10)
    "#;
    assert_eq!(eval(src), Value::string("ABC"));
}

#[test]
fn test_block_scoping() {
    let src = r#"
        x := 1
        {
            x := 2
            x = 3
        }
        x
    "#;
    assert_eq!(eval(src), Value::Int(1));
}

// ═══════════════════════════════════════════════════════════════════════
// Functions and closures
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_recursion() {
    let src = r#"
        func fib(n) {
            if n < 2 {
                return n
            }
            return fib(n - 1) + fib(n - 2)
        }
        fib(15)
    "#;
    assert_eq!(eval(src), Value::Int(610));
}

#[test]
fn test_closure_counter_keeps_its_state() {
    let src = r#"
        func counter() {
            n := 0
            return func () {
                n++
                return n
            }
        }
        a := counter()
        b := counter()
        a()
        a()
        b()
        a() * 10 + b()
    "#;
    assert_eq!(eval(src), Value::Int(32));
}

#[test]
fn test_closure_sees_later_mutation() {
    let src = r#"
        x := 1
        get := func () { return x }
        x = 42
        get()
    "#;
    assert_eq!(eval(src), Value::Int(42));
}

#[test]
fn test_closure_does_not_see_names_defined_after_it() {
    let src = r#"
        get := func () { return y }
        y := 5
        get()
    "#;
    assert_eq!(
        eval_err(src),
        EvalError::UndefinedIdentifier {
            name: "y".to_string(),
        }
    );
}

#[test]
fn test_closure_assignment_to_a_later_name_stays_local() {
    let src = r#"
        set := func () {
            z = 1
            return z
        }
        z := 9
        set() * 10 + z
    "#;
    assert_eq!(eval(src), Value::Int(19));
}

#[test]
fn test_closure_can_mutate_captured_variable() {
    let src = r#"
        total := 0
        add := func (n) { total += n }
        add(3)
        add(4)
        total
    "#;
    assert_eq!(eval(src), Value::Int(7));
}

#[test]
fn test_default_parameters() {
    let src = r#"
        func greet(name, greeting = "hello", mark = greeting + "!") {
            return mark + " " + name
        }
        greet("ann") + "|" + greet("bob", "hi")
    "#;
    assert_eq!(eval(src), Value::string("hello! ann|hi! bob"));
}

#[test]
fn test_function_arity_mismatch() {
    assert_eq!(
        eval_err("func add(a, b) { return a + b }\nadd(1)"),
        EvalError::ArityMismatch {
            name: "add".to_string(),
            expected: 2,
            got: 1,
        }
    );
    assert!(matches!(
        eval_err("func one(a) {}\none(1, 2)"),
        EvalError::ArityMismatch { got: 2, .. }
    ));
}

#[test]
fn test_higher_order_functions() {
    let src = r#"
        func map(items, f) {
            out := []
            for i := 0; i < len(items); i++ {
                push(out, f(items[i]))
            }
            return out
        }
        map([1, 2, 3], func (x) { return x * x })
    "#;
    assert_eq!(
        eval(src),
        Value::array(vec![Value::Int(1), Value::Int(4), Value::Int(9)])
    );
}

#[test]
fn test_unbounded_recursion_overflows() {
    let mut interp = Interpreter::new().with_context(EvalContext::with_max_call_depth(50));
    let result = interp.eval_source("func down(n) { return down(n + 1) }\ndown(0)");
    assert!(matches!(
        result.as_error(),
        Some(EvalError::StackOverflow { max: 50, .. })
    ));
}

#[test]
fn test_default_call_depth_is_reached_without_exhausting_the_host_stack() {
    let result = eval("func down(n) { return down(n + 1) }\ndown(0)");
    assert!(matches!(
        result.as_error(),
        Some(EvalError::StackOverflow { max: 1000, .. })
    ));
}

#[test]
fn test_deep_method_recursion_within_the_default_limit() {
    let src = r#"
        class Walker {
            static func walk(n) {
                if n == 0 {
                    return 0
                }
                return 1 + self::walk(n - 1)
            }
        }
        Walker::walk(900)
    "#;
    assert_eq!(eval(src), Value::Int(900));
}

#[test]
fn test_call_depth_is_released_after_overflow() {
    let mut interp = Interpreter::new().with_context(EvalContext::with_max_call_depth(20));
    let overflow = interp.eval_source("func down(n) { return down(n + 1) }\ndown(0)");
    assert!(overflow.is_error());
    assert_eq!(interp.context().call_depth(), 0);
    assert_eq!(interp.eval_source("func id(x) { return x }\nid(5)"), Value::Int(5));
}
