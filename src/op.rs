//! The operator façade (component C3).
//!
//! Every binary/unary operator in the language goes through one of these
//! free functions. Their job is narrow: decide whether the two operand
//! types may interact at all, and produce the "cannot `<verb>` types 'a'
//! and 'b'" diagnostic when they may not. What the interaction actually
//! computes is [`Value`]'s job (`value.rs`) — this module never reaches
//! into a variant's payload itself.
//!
//! `eq`/`neq` are the one exception to "guard then delegate": per §8's
//! universal laws, comparing values of differing types is always `false`,
//! never an error, so there is no guard to fail.

use crate::error::EvalResult;
use crate::value::Value;

fn same_variant(a: &Value, b: &Value) -> bool {
    std::mem::discriminant(a) == std::mem::discriminant(b)
}

/// `==`. Never errors: differing variants are simply unequal.
pub fn eq(a: &Value, b: &Value) -> Value {
    if !same_variant(a, b) {
        return Value::Boolean(false);
    }
    a.eq(b)
}

/// `!=`, defined as `not eq`.
pub fn neq(a: &Value, b: &Value) -> Value {
    match eq(a, b) {
        Value::Boolean(b) => Value::Boolean(!b),
        _ => unreachable!("Value::eq always returns Boolean"),
    }
}

/// `<`. Errors if the operands are different types or the shared type has
/// no ordering (Boolean, Array, Object, Function, Empty).
pub fn lt(a: &Value, b: &Value) -> EvalResult<Value> {
    guarded(a, b, "compare", |a, b| a.lt(b))
}

/// `>`.
pub fn gt(a: &Value, b: &Value) -> EvalResult<Value> {
    guarded(a, b, "compare", |a, b| a.gt(b))
}

/// `<=`, defined as `not (a > b)`.
pub fn lte(a: &Value, b: &Value) -> EvalResult<Value> {
    negate(gt(a, b))
}

/// `>=`, defined as `not (a < b)`.
pub fn gte(a: &Value, b: &Value) -> EvalResult<Value> {
    negate(lt(a, b))
}

fn negate(result: EvalResult<Value>) -> EvalResult<Value> {
    result.map(|v| match v {
        Value::Boolean(b) => Value::Boolean(!b),
        _ => unreachable!("ordering operators always return Boolean"),
    })
}

/// `+`.
pub fn add(a: &Value, b: &Value) -> EvalResult<Value> {
    guarded(a, b, "add", |a, b| a.add(b))
}

/// `-`.
pub fn sub(a: &Value, b: &Value) -> EvalResult<Value> {
    guarded(a, b, "subtract", |a, b| a.sub(b))
}

/// `*`.
pub fn mul(a: &Value, b: &Value) -> EvalResult<Value> {
    guarded(a, b, "multiply", |a, b| a.mul(b))
}

/// `/`.
pub fn div(a: &Value, b: &Value) -> EvalResult<Value> {
    guarded(a, b, "divide", |a, b| a.div(b))
}

/// `//`.
pub fn int_div(a: &Value, b: &Value) -> EvalResult<Value> {
    guarded(a, b, "divide", |a, b| a.int_div(b))
}

/// `%`.
pub fn modulo(a: &Value, b: &Value) -> EvalResult<Value> {
    guarded(a, b, "divide", |a, b| a.modulo(b))
}

/// `**`.
pub fn pow(a: &Value, b: &Value) -> EvalResult<Value> {
    guarded(a, b, "raise", |a, b| a.pow(b))
}

/// Unary `-`.
pub fn neg(a: &Value) -> EvalResult<Value> {
    a.neg()
}

/// Unary `!`. Coerces to Boolean first (never errors), matching §4.2's
/// "logical not always succeeds" rule.
pub fn not(a: &Value) -> Value {
    match a.cast_boolean() {
        Value::Boolean(b) => Value::Boolean(!b),
        _ => unreachable!("cast_boolean always returns Boolean"),
    }
}

/// `a[i]` read.
pub fn index_get(a: &Value, index: &Value) -> EvalResult<Value> {
    a.index_get(index)
}

/// `a[i] = v` write.
pub fn index_set(a: &Value, index: &Value, item: Value) -> EvalResult<()> {
    a.index_set(index, item)
}

/// `a.k` read.
pub fn key_get(a: &Value, key: &str) -> EvalResult<Value> {
    a.key_get(key)
}

/// `a.k = v` write.
pub fn key_set(a: &Value, key: &str, item: Value) -> EvalResult<()> {
    a.key_set(key, item)
}

/// Applies `op` only once `a` and `b` share a variant, otherwise produces
/// the "cannot `<verb>` types 'a' and 'b'" diagnostic.
fn guarded(
    a: &Value,
    b: &Value,
    verb: &str,
    op: impl FnOnce(&Value, &Value) -> EvalResult<Value>,
) -> EvalResult<Value> {
    if !same_variant(a, b) {
        return Err(crate::error::EvalError::type_mismatch(
            verb,
            a.type_name(),
            b.type_name(),
        ));
    }
    op(a, b)
}
