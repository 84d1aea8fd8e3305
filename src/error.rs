//! Error kinds (component C1).
//!
//! `xb` distinguishes two error *scopes*: `syntax` (produced by an external
//! parser, never by this crate) and `runtime` (produced by the evaluator,
//! the value model, and the environment). Both render as
//! `error(<scope>): <message>`, matching the convention the rest of the
//! host toolchain (REPL, file driver) expects when printing a caught error.

/// The result type used throughout the evaluator core.
pub type EvalResult<T> = Result<T, EvalError>;

/// An error produced while evaluating an `xb` program, or received from an
/// external collaborator (the parser) that shares this crate's display
/// convention.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EvalError {
    /// A runtime error raised by the evaluator, the value model, or the
    /// environment. The message fragments produced by the constructors
    /// below are normative per the evaluator's error-kind table.
    #[error("error(runtime): {0}")]
    Runtime(String),

    /// A syntax error. This crate never constructs this variant itself —
    /// it exists so that a parser crate built against `xb` can share this
    /// error type instead of inventing its own, and so host code can match
    /// on `EvalError` uniformly regardless of which side produced it.
    #[error("error(syntax): {0}")]
    Syntax(String),
}

impl EvalError {
    pub fn runtime(message: impl Into<String>) -> Self {
        EvalError::Runtime(message.into())
    }

    pub fn unbound_name(name: &str) -> Self {
        Self::runtime(format!("name '{name}' not recognized in this scope"))
    }

    pub fn const_reassign_binding(name: &str) -> Self {
        Self::runtime(format!("name '{name}' is constant"))
    }

    pub fn const_reassign_field(key: &str) -> Self {
        Self::runtime(format!("field \"{key}\" is constant"))
    }

    pub fn already_bound(name: &str) -> Self {
        Self::runtime(format!("name '{name}' is already bound"))
    }

    pub fn type_mismatch(verb: &str, a: &str, b: &str) -> Self {
        Self::runtime(format!("cannot {verb} types '{a}' and '{b}'"))
    }

    pub fn unsupported_op(type_name: &str, op: &str) -> Self {
        Self::runtime(format!("type '{type_name}' does not support {op}"))
    }

    pub fn unrecognized_key(key: &str) -> Self {
        Self::runtime(format!("unrecognized key \"{key}\""))
    }

    pub fn bad_index_type(type_name: &str) -> Self {
        Self::runtime(format!("{type_name} index must be a positive integer"))
    }

    pub fn index_out_of_range(type_name: &str) -> Self {
        Self::runtime(format!("{type_name} index out of range"))
    }

    pub fn division_by_zero() -> Self {
        Self::runtime("division by 0")
    }

    pub fn invalid_assignment_target() -> Self {
        Self::runtime("invalid assignment target")
    }

    pub fn bad_cast(from: &str, to: &str) -> Self {
        Self::runtime(format!("cannot cast type '{from}' to '{to}'"))
    }

    pub fn arity_mismatch(expected: usize, got: usize) -> Self {
        Self::runtime(format!(
            "function expects {expected} argument(s), got {got}"
        ))
    }

    pub fn not_callable(type_name: &str) -> Self {
        Self::runtime(format!("type '{type_name}' is not callable"))
    }

    pub fn invalid_escape(ch: char) -> Self {
        Self::runtime(format!("invalid escape sequence '\\{ch}'"))
    }
}
