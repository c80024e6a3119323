//! Member visibility

use std::rc::Rc;

use crate::ast::Visibility;
use crate::environment::Environment;
use crate::error::EvalError;
use crate::value::{Class, Value};

/// Check that code running in `env` may touch `member` declared on
/// `declaring` with the given visibility.
///
/// The accessing class is whatever `self` is bound to in `env`; top-level
/// code has none and only reaches public members.
pub(crate) fn check_access(
    declaring: &Rc<Class>,
    member: &str,
    visibility: Visibility,
    env: &Environment,
) -> Result<(), EvalError> {
    let caller = match env.get("self") {
        Some(Value::Class(class)) => Some(class),
        _ => None,
    };
    let allowed = match visibility {
        Visibility::Public => true,
        Visibility::Private => caller.is_some_and(|c| Rc::ptr_eq(&c, declaring)),
        Visibility::Protected => {
            caller.is_some_and(|c| c.is_subclass_of(declaring) || declaring.is_subclass_of(&c))
        }
    };
    if allowed {
        Ok(())
    } else {
        Err(EvalError::AccessViolation {
            class: declaring.qualified_name(),
            member: member.to_string(),
            visibility: match visibility {
                Visibility::Private => "private",
                _ => "protected",
            }
            .to_string(),
        })
    }
}
