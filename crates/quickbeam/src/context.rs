//! Evaluation context configuration

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::EvalError;

/// Configuration and bookkeeping for one interpreter session.
///
/// Controls recursion limits, import nesting and interruption. The
/// interpreter owns exactly one of these.
#[derive(Debug, Clone)]
pub struct EvalContext {
    /// Maximum call depth (stack overflow protection)
    pub max_call_depth: usize,

    /// Maximum nesting of `use`-triggered file loads
    pub max_import_depth: usize,

    /// Interrupt flag - set to true to abort evaluation
    pub interrupt: Arc<AtomicBool>,

    call_depth: usize,
}

impl Default for EvalContext {
    fn default() -> Self {
        Self {
            max_call_depth: 1000,
            max_import_depth: 10,
            interrupt: Arc::new(AtomicBool::new(false)),
            call_depth: 0,
        }
    }
}

impl EvalContext {
    /// Create a new context with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context with a custom call depth limit.
    pub fn with_max_call_depth(max_depth: usize) -> Self {
        Self {
            max_call_depth: max_depth,
            ..Default::default()
        }
    }

    /// Check if evaluation has been interrupted.
    pub fn is_interrupted(&self) -> bool {
        self.interrupt.load(Ordering::Relaxed)
    }

    /// Request interruption of evaluation.
    pub fn interrupt(&self) {
        self.interrupt.store(true, Ordering::Relaxed);
    }

    /// Reset the interrupt flag.
    pub fn reset_interrupt(&self) {
        self.interrupt.store(false, Ordering::Relaxed);
    }

    // ═══════════════════════════════════════════════════════════════════
    // Call Depth Tracking (Stack Overflow Protection)
    // ═══════════════════════════════════════════════════════════════════

    /// Enter a call. Returns an error if the maximum depth is exceeded.
    pub fn enter_call(&mut self) -> Result<(), EvalError> {
        if self.call_depth >= self.max_call_depth {
            return Err(EvalError::StackOverflow {
                depth: self.call_depth,
                max: self.max_call_depth,
            });
        }
        self.call_depth += 1;
        Ok(())
    }

    /// Exit a call.
    pub fn exit_call(&mut self) {
        self.call_depth = self.call_depth.saturating_sub(1);
    }

    /// Current call depth.
    pub fn call_depth(&self) -> usize {
        self.call_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let ctx = EvalContext::new();
        assert_eq!(ctx.max_call_depth, 1000);
        assert_eq!(ctx.max_import_depth, 10);
        assert!(!ctx.is_interrupted());
    }

    #[test]
    fn test_interrupt_roundtrip() {
        let ctx = EvalContext::new();
        ctx.interrupt();
        assert!(ctx.is_interrupted());
        ctx.reset_interrupt();
        assert!(!ctx.is_interrupted());
    }

    #[test]
    fn test_call_depth_limit() {
        let mut ctx = EvalContext::with_max_call_depth(2);
        ctx.enter_call().unwrap();
        ctx.enter_call().unwrap();
        assert!(matches!(
            ctx.enter_call(),
            Err(EvalError::StackOverflow { depth: 2, max: 2 })
        ));
        ctx.exit_call();
        assert_eq!(ctx.call_depth(), 1);
        ctx.enter_call().unwrap();
    }

    #[test]
    fn test_exit_call_saturates() {
        let mut ctx = EvalContext::new();
        ctx.exit_call();
        assert_eq!(ctx.call_depth(), 0);
    }
}
