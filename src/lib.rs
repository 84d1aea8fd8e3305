//! `xb` — the evaluator core of a small expression-oriented scripting
//! language.
//!
//! This crate is a tree-walking evaluator: it turns an already-parsed
//! [`Block`] of [`Expr`] nodes plus an [`Environment`] into a [`Value`],
//! or an [`EvalError`] describing why it couldn't. It does not parse
//! source text, run a REPL, or perform any I/O — those are the job of a
//! parser crate and a host driver built on top of this one.
//!
//! ## Quickstart
//!
//! There is no parser here, so building a tree means constructing `Expr`
//! nodes directly — this is the shape an external parser would produce:
//!
//! ```rust
//! use xb::{Block, Environment, Expr, Value, evaluate};
//!
//! let env = Environment::new();
//! let block = Block::new(vec![
//!     Expr::ConstDecl {
//!         name: "x".to_string(),
//!         value: Box::new(Expr::NumberLiteral("2".to_string())),
//!     },
//!     Expr::Add(
//!         Box::new(Expr::Identifier("x".to_string())),
//!         Box::new(Expr::NumberLiteral("3".to_string())),
//!     ),
//! ]);
//!
//! assert_eq!(evaluate(&block, &env), Ok(Value::from(5i64)));
//! ```
//!
//! ## Layout
//!
//! - [`value`] — the closed value model (`Value`, `Number`, object/array
//!   storage) and the per-variant operations defined on it.
//! - [`op`] — the operator façade: decides whether two operand types may
//!   interact, then delegates to `value`'s per-variant methods.
//! - [`environment`] — lexically nested scopes.
//! - [`ast`] — syntax tree nodes (`Block`, `Expr`, `Function`, `Pair`) and
//!   their evaluation, including the `Assigner` continuation used for
//!   assignment targets.
//! - [`error`] — the crate-wide error type and result alias.
//!
//! ## Serde
//!
//! With the `serde` feature enabled, [`Number`] implements
//! `Serialize`/`Deserialize`, for a host that wants to snapshot numeric
//! values (e.g. a parser caching constant-folded literals). The rest of
//! the value model is intentionally left out of that: `Value`'s
//! `Array`/`Object` variants are `Rc<RefCell<_>>` aliases, and `Function`
//! closes over a live `Environment` — serializing either would lose the
//! aliasing/capture semantics that make them useful, so this crate does
//! not pretend to support it.

mod ast;
mod environment;
mod error;
mod op;
mod value;

pub use ast::{Assigner, Block, Expr, Function, Pair};
pub use environment::Environment;
pub use error::{EvalError, EvalResult};
pub use value::{ArrayRef, Number, ObjectEntry, ObjectRef, Value};

/// Evaluates `block` under `env`, returning its final value.
///
/// This is the crate's only entry point: everything else (constructing a
/// tree, pre-populating an environment with host-provided bindings) is the
/// caller's responsibility.
pub fn evaluate(block: &Block, env: &Environment) -> EvalResult<Value> {
    block.evaluate(env)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluate_runs_a_block_to_its_last_statement() {
        let env = Environment::new();
        let block = Block::new(vec![
            Expr::ConstDecl {
                name: "x".to_string(),
                value: Box::new(Expr::NumberLiteral("2".to_string())),
            },
            Expr::Add(
                Box::new(Expr::Identifier("x".to_string())),
                Box::new(Expr::NumberLiteral("3".to_string())),
            ),
        ]);

        assert_eq!(evaluate(&block, &env).unwrap(), Value::from(5i64));
    }

    #[test]
    fn evaluate_empty_block_is_empty_value() {
        let env = Environment::new();
        assert_eq!(evaluate(&Block::default(), &env).unwrap(), Value::Empty);
    }
}
