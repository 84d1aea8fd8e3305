//! Lexically nested scopes (component C4).
//!
//! An [`Environment`] is a cheap-to-clone handle (`Rc<RefCell<Frame>>`) onto
//! a single stack frame; cloning an `Environment` shares the frame, it does
//! not copy it. A child environment holds its own frame plus a reference to
//! the parent, forming the linked chain described in the specification.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{EvalError, EvalResult};
use crate::value::Value;

#[derive(Debug, Clone)]
struct Binding {
    value: Value,
    is_const: bool,
}

#[derive(Debug)]
struct Frame {
    bindings: HashMap<String, Binding>,
    parent: Option<Environment>,
}

/// A lexically nested scope mapping names to `(Value, is_const)` bindings.
///
/// Cloning is shallow: clones refer to the same underlying frame, which is
/// what lets a `Function` value capture "the environment it was defined in"
/// by storing a clone of it.
#[derive(Debug, Clone)]
pub struct Environment {
    frame: Rc<RefCell<Frame>>,
}

impl Environment {
    /// Creates a fresh top-level environment with no parent.
    pub fn new() -> Self {
        Environment {
            frame: Rc::new(RefCell::new(Frame {
                bindings: HashMap::new(),
                parent: None,
            })),
        }
    }

    /// Creates a new environment parented to `self`, as used for nested
    /// blocks and function invocations.
    pub fn child(&self) -> Self {
        Environment {
            frame: Rc::new(RefCell::new(Frame {
                bindings: HashMap::new(),
                parent: Some(self.clone()),
            })),
        }
    }

    /// Resolves `name` through the parent chain.
    pub fn lookup(&self, name: &str) -> EvalResult<Value> {
        let frame = self.frame.borrow();
        if let Some(binding) = frame.bindings.get(name) {
            return Ok(binding.value.clone());
        }
        match &frame.parent {
            Some(parent) => {
                let parent = parent.clone();
                drop(frame);
                parent.lookup(name)
            }
            None => Err(EvalError::unbound_name(name)),
        }
    }

    /// Assigns `value` to the frame that declared `name`, walking up the
    /// parent chain. Errors if `name` is const anywhere it's found, or
    /// unbound all the way to the root.
    pub fn assign(&self, name: &str, value: Value) -> EvalResult<()> {
        let mut frame = self.frame.borrow_mut();
        if let Some(binding) = frame.bindings.get_mut(name) {
            if binding.is_const {
                return Err(EvalError::const_reassign_binding(name));
            }
            binding.value = value;
            return Ok(());
        }
        match &frame.parent {
            Some(parent) => {
                let parent = parent.clone();
                drop(frame);
                parent.assign(name, value)
            }
            None => Err(EvalError::unbound_name(name)),
        }
    }

    /// Declares `name` as a const binding in the *current* frame. Errors if
    /// `name` already exists in this frame; shadowing a parent binding is
    /// allowed.
    pub fn declare_const(&self, name: &str, value: Value) -> EvalResult<()> {
        self.declare(name, value, true)
    }

    /// Declares `name` as a var binding in the *current* frame.
    pub fn declare_var(&self, name: &str, value: Value) -> EvalResult<()> {
        self.declare(name, value, false)
    }

    fn declare(&self, name: &str, value: Value, is_const: bool) -> EvalResult<()> {
        let mut frame = self.frame.borrow_mut();
        if frame.bindings.contains_key(name) {
            return Err(EvalError::already_bound(name));
        }
        frame
            .bindings
            .insert(name.to_string(), Binding { value, is_const });
        Ok(())
    }

    /// Whether `name` is const, resolved through the parent chain like
    /// [`Environment::lookup`]. Used by object literal inference pairs,
    /// which inherit constness from whatever binding `name` already refers
    /// to. Returns `false` for an unbound name rather than erroring, since
    /// callers (`InferPair`) only care about the binding's constness, not
    /// its presence.
    pub fn is_const(&self, name: &str) -> bool {
        let frame = self.frame.borrow();
        if let Some(binding) = frame.bindings.get(name) {
            return binding.is_const;
        }
        match &frame.parent {
            Some(parent) => {
                let parent = parent.clone();
                drop(frame);
                parent.is_const(name)
            }
            None => false,
        }
    }

}

impl Default for Environment {
    fn default() -> Self {
        Environment::new()
    }
}
