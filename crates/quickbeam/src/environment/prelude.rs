//! Standard prelude with built-in functions

use std::io::Write;

use super::Environment;
use crate::error::type_name;
use crate::value::{BuiltinFn, Value};

impl Environment {
    /// Create an environment with standard built-in functions.
    pub fn with_prelude() -> Self {
        let env = Self::new();
        env.load_prelude();
        env
    }

    /// Load the standard prelude into this environment.
    pub fn load_prelude(&self) {
        // Printing
        self.define_builtin(BuiltinFn::new("print", -1, builtin_print));
        self.define_builtin(BuiltinFn::new("println", -1, builtin_println));

        // Inspection and conversion
        self.define_builtin(BuiltinFn::new("type_of", 1, builtin_type_of));
        self.define_builtin(BuiltinFn::new("str", 1, builtin_str));

        // Arrays and strings
        self.define_builtin(BuiltinFn::new("len", 1, builtin_len));
        self.define_builtin(BuiltinFn::new("push", 2, builtin_push));

        // Assertions
        self.define_builtin(BuiltinFn::new("assert", 1, builtin_assert));
        self.define_builtin(BuiltinFn::new("assert_eq", 2, builtin_assert_eq));

        // Panic
        self.define_builtin(BuiltinFn::new("panic", -1, builtin_panic));
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Built-in Function Implementations
// ═══════════════════════════════════════════════════════════════════════

fn builtin_print(args: &[Value], out: &mut dyn Write) -> Result<Value, String> {
    let line = args
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    write!(out, "{line}").map_err(|e| e.to_string())?;
    Ok(Value::Null)
}

fn builtin_println(args: &[Value], out: &mut dyn Write) -> Result<Value, String> {
    builtin_print(args, out)?;
    writeln!(out).map_err(|e| e.to_string())?;
    Ok(Value::Null)
}

fn builtin_type_of(args: &[Value], _out: &mut dyn Write) -> Result<Value, String> {
    match &args[0] {
        Value::Instance(inst) => Ok(Value::string(inst.class.qualified_name())),
        other => Ok(Value::string(type_name(other))),
    }
}

fn builtin_str(args: &[Value], _out: &mut dyn Write) -> Result<Value, String> {
    Ok(Value::string(args[0].to_string()))
}

fn builtin_len(args: &[Value], _out: &mut dyn Write) -> Result<Value, String> {
    let len = match &args[0] {
        Value::Str(s) => s.chars().count(),
        Value::Array(items) => items.borrow().len(),
        other => return Err(format!("expected string or array, got {}", type_name(other))),
    };
    i64::try_from(len)
        .map(Value::Int)
        .map_err(|_| "length does not fit in int".to_string())
}

fn builtin_push(args: &[Value], _out: &mut dyn Write) -> Result<Value, String> {
    match &args[0] {
        Value::Array(items) => {
            items.borrow_mut().push(args[1].clone());
            Ok(args[0].clone())
        }
        other => Err(format!("expected array, got {}", type_name(other))),
    }
}

fn builtin_assert(args: &[Value], _out: &mut dyn Write) -> Result<Value, String> {
    if args[0].is_truthy() {
        Ok(Value::Null)
    } else {
        Err("assertion failed".to_string())
    }
}

fn builtin_assert_eq(args: &[Value], _out: &mut dyn Write) -> Result<Value, String> {
    if args[0] == args[1] {
        Ok(Value::Null)
    } else {
        Err(format!(
            "assertion failed: `{:?}` != `{:?}`",
            args[0], args[1]
        ))
    }
}

fn builtin_panic(args: &[Value], _out: &mut dyn Write) -> Result<Value, String> {
    let message = if args.is_empty() {
        "explicit panic".to_string()
    } else {
        args.iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    };

    Err(message)
}
