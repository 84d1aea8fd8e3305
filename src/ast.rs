//! Syntax tree nodes and evaluation (components C5 and C6).
//!
//! A tree built by an external parser is a [`Block`] of [`Expr`] nodes.
//! `Expr::evaluate` is the single recursion point for the whole evaluator:
//! every node reduces to a [`Value`] (or an [`EvalError`]) by evaluating its
//! children and delegating the actual computation to [`crate::op`].
//!
//! Assignment targets (the left side of `=`, and anything nested inside a
//! `ConstDecl`/`VarDecl` is not a target — only `Assign` needs one) are
//! handled by [`Expr::evaluate_as_target`], which returns an [`Assigner`]: a
//! one-shot continuation capturing wherever the value needs to land
//! (a name, an array slot, an object field) without re-walking the target
//! expression a second time.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::environment::Environment;
use crate::error::{EvalError, EvalResult};
use crate::op;
use crate::value::{Number, ObjectEntry, Value};

/// A sequence of statements sharing one environment. The value of a block
/// is the value of its last statement, or `Empty` for an empty block.
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub statements: Vec<Expr>,
}

impl Block {
    pub fn new(statements: Vec<Expr>) -> Self {
        Block { statements }
    }

    pub fn evaluate(&self, env: &Environment) -> EvalResult<Value> {
        let mut result = Value::Empty;
        for statement in &self.statements {
            result = statement.evaluate(env)?;
        }
        Ok(result)
    }
}

/// One field of an object literal (§4.1's `Pair` family).
#[derive(Debug, Clone)]
pub enum Pair {
    /// `key: expr` — a const field.
    Const(String, Expr),
    /// `key = expr` — a var field.
    Var(String, Expr),
    /// `key` shorthand — looks `key` up in the enclosing environment and
    /// inherits its constness, per `environment.py`'s `InferPair` rule.
    Infer(String),
}

/// A closure: captured parameter list, body, and defining environment.
#[derive(Debug, Clone)]
pub struct Function {
    pub params: Vec<String>,
    pub body: Block,
    pub closure: Environment,
}

/// A one-shot continuation capturing an assignment target, produced by
/// [`Expr::evaluate_as_target`] and consumed exactly once by
/// [`Expr::Assign`]'s evaluation.
pub struct Assigner(Box<dyn FnOnce(Value) -> EvalResult<()>>);

impl Assigner {
    fn new(f: impl FnOnce(Value) -> EvalResult<()> + 'static) -> Self {
        Assigner(Box::new(f))
    }

    pub fn assign(self, value: Value) -> EvalResult<()> {
        (self.0)(value)
    }
}

impl std::fmt::Debug for Assigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Assigner(..)")
    }
}

/// Every evaluatable syntax tree node (component C5).
#[derive(Debug, Clone)]
pub enum Expr {
    ConstDecl {
        name: String,
        value: Box<Expr>,
    },
    VarDecl {
        name: String,
        value: Box<Expr>,
    },
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    If {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Option<Box<Expr>>,
    },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Coalesce(Box<Expr>, Box<Expr>),
    Equal(Box<Expr>, Box<Expr>),
    NotEqual(Box<Expr>, Box<Expr>),
    LessThan(Box<Expr>, Box<Expr>),
    GreaterThan(Box<Expr>, Box<Expr>),
    LessThanOrEqual(Box<Expr>, Box<Expr>),
    GreaterThanOrEqual(Box<Expr>, Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Subtract(Box<Expr>, Box<Expr>),
    Multiply(Box<Expr>, Box<Expr>),
    Divide(Box<Expr>, Box<Expr>),
    IntegerDivide(Box<Expr>, Box<Expr>),
    Mod(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Negate(Box<Expr>),
    Not(Box<Expr>),
    KeyAccess {
        object: Box<Expr>,
        key: String,
    },
    IndexAccess {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Identifier(String),
    NestedBlock(Block),
    NumberLiteral(String),
    StringLiteral(String),
    BoolLiteral(bool),
    EmptyLiteral,
    ArrayLiteral(Vec<Expr>),
    ObjectLiteral(Vec<Pair>),
    FunctionLiteral {
        params: Vec<String>,
        body: Block,
    },
}

impl Expr {
    pub fn evaluate(&self, env: &Environment) -> EvalResult<Value> {
        match self {
            Expr::ConstDecl { name, value } => {
                let value = value.evaluate(env)?;
                env.declare_const(name, value.clone())?;
                Ok(value)
            }
            Expr::VarDecl { name, value } => {
                let value = value.evaluate(env)?;
                env.declare_var(name, value.clone())?;
                Ok(value)
            }
            Expr::Assign { target, value } => {
                let assigner = target.evaluate_as_target(env)?;
                let value = value.evaluate(env)?;
                assigner.assign(value.clone())?;
                Ok(value)
            }
            Expr::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let cond_env = env.child();
                let cond = condition.evaluate(&cond_env)?;
                if cond.is_truthy() {
                    then_branch.evaluate(env)
                } else if let Some(else_branch) = else_branch {
                    else_branch.evaluate(env)
                } else {
                    Ok(Value::Empty)
                }
            }
            Expr::And(left, right) => {
                let left = left.evaluate(env)?;
                if !left.is_truthy() {
                    Ok(left)
                } else {
                    right.evaluate(env)
                }
            }
            Expr::Or(left, right) => {
                let left = left.evaluate(env)?;
                if left.is_truthy() {
                    Ok(left)
                } else {
                    right.evaluate(env)
                }
            }
            Expr::Coalesce(left, right) => {
                let left = left.evaluate(env)?;
                if matches!(op::eq(&left, &Value::Empty), Value::Boolean(true)) {
                    right.evaluate(env)
                } else {
                    Ok(left)
                }
            }
            Expr::Equal(a, b) => Ok(op::eq(&a.evaluate(env)?, &b.evaluate(env)?)),
            Expr::NotEqual(a, b) => Ok(op::neq(&a.evaluate(env)?, &b.evaluate(env)?)),
            Expr::LessThan(a, b) => op::lt(&a.evaluate(env)?, &b.evaluate(env)?),
            Expr::GreaterThan(a, b) => op::gt(&a.evaluate(env)?, &b.evaluate(env)?),
            Expr::LessThanOrEqual(a, b) => op::lte(&a.evaluate(env)?, &b.evaluate(env)?),
            Expr::GreaterThanOrEqual(a, b) => op::gte(&a.evaluate(env)?, &b.evaluate(env)?),
            Expr::Add(a, b) => op::add(&a.evaluate(env)?, &b.evaluate(env)?),
            Expr::Subtract(a, b) => op::sub(&a.evaluate(env)?, &b.evaluate(env)?),
            Expr::Multiply(a, b) => op::mul(&a.evaluate(env)?, &b.evaluate(env)?),
            Expr::Divide(a, b) => op::div(&a.evaluate(env)?, &b.evaluate(env)?),
            Expr::IntegerDivide(a, b) => op::int_div(&a.evaluate(env)?, &b.evaluate(env)?),
            Expr::Mod(a, b) => op::modulo(&a.evaluate(env)?, &b.evaluate(env)?),
            Expr::Pow(a, b) => op::pow(&a.evaluate(env)?, &b.evaluate(env)?),
            Expr::Negate(a) => op::neg(&a.evaluate(env)?),
            Expr::Not(a) => Ok(op::not(&a.evaluate(env)?)),
            Expr::KeyAccess { object, key } => op::key_get(&object.evaluate(env)?, key),
            Expr::IndexAccess { object, index } => {
                let object = object.evaluate(env)?;
                let index = index.evaluate(env)?;
                op::index_get(&object, &index)
            }
            Expr::Call { callee, args } => {
                let callee = callee.evaluate(env)?;
                let args = args
                    .iter()
                    .map(|a| a.evaluate(env))
                    .collect::<EvalResult<Vec<_>>>()?;
                call(&callee, args)
            }
            Expr::Identifier(name) => env.lookup(name),
            Expr::NestedBlock(block) => block.evaluate(&env.child()),
            Expr::NumberLiteral(text) => Ok(Value::Number(Number::parse(text)?)),
            Expr::StringLiteral(text) => Ok(Value::String(Rc::from(
                crate::value::unescape(text)?.as_str(),
            ))),
            Expr::BoolLiteral(b) => Ok(Value::Boolean(*b)),
            Expr::EmptyLiteral => Ok(Value::Empty),
            Expr::ArrayLiteral(items) => {
                let items = items
                    .iter()
                    .map(|e| e.evaluate(env))
                    .collect::<EvalResult<Vec<_>>>()?;
                Ok(Value::array(items))
            }
            Expr::ObjectLiteral(pairs) => {
                let mut map = IndexMap::new();
                for pair in pairs {
                    let (key, entry) = match pair {
                        Pair::Const(key, value) => (
                            key.clone(),
                            ObjectEntry {
                                value: value.evaluate(env)?,
                                is_const: true,
                            },
                        ),
                        Pair::Var(key, value) => (
                            key.clone(),
                            ObjectEntry {
                                value: value.evaluate(env)?,
                                is_const: false,
                            },
                        ),
                        Pair::Infer(name) => (
                            name.clone(),
                            ObjectEntry {
                                value: env.lookup(name)?,
                                is_const: env.is_const(name),
                            },
                        ),
                    };
                    map.insert(key, entry);
                }
                Ok(Value::object(map))
            }
            Expr::FunctionLiteral { params, body } => Ok(Value::Function(Rc::new(Function {
                params: params.clone(),
                body: body.clone(),
                closure: env.clone(),
            }))),
        }
    }

    /// Resolves `self` as an assignment target, returning a continuation
    /// that performs the write when invoked. Only identifiers, key access,
    /// and index access are valid targets.
    pub fn evaluate_as_target(&self, env: &Environment) -> EvalResult<Assigner> {
        match self {
            Expr::Identifier(name) => {
                let env = env.clone();
                let name = name.clone();
                Ok(Assigner::new(move |value| env.assign(&name, value)))
            }
            Expr::KeyAccess { object, key } => {
                let object = object.evaluate(env)?;
                let key = key.clone();
                Ok(Assigner::new(move |value| op::key_set(&object, &key, value)))
            }
            Expr::IndexAccess { object, index } => {
                let object = object.evaluate(env)?;
                let index = index.evaluate(env)?;
                Ok(Assigner::new(move |value| {
                    op::index_set(&object, &index, value)
                }))
            }
            _ => Err(EvalError::invalid_assignment_target()),
        }
    }
}

fn call(callee: &Value, args: Vec<Value>) -> EvalResult<Value> {
    let Value::Function(function) = callee else {
        return Err(EvalError::not_callable(callee.type_name()));
    };
    if function.params.len() != args.len() {
        return Err(EvalError::arity_mismatch(function.params.len(), args.len()));
    }
    let call_env = function.closure.child();
    for (param, arg) in function.params.iter().zip(args) {
        call_env.declare_const(param, arg)?;
    }
    function.body.evaluate(&call_env)
}
