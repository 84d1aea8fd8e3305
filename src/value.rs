//! The value model (component C2): the closed set of runtime values and the
//! operations defined on them, including coercion and display.
//!
//! Individual `Value` methods assume their `other` argument already has a
//! matching variant — that check is the [`crate::op`] façade's job, not
//! this module's. A method that has no meaningful implementation for its
//! variant returns [`EvalError::unsupported_op`] so that callers get a
//! precise "type X does not support Y" diagnostic instead of a panic.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::ast::Function;
use crate::error::{EvalError, EvalResult};

/// A number, stored as an integer whenever its mathematical value is whole.
///
/// This demotion happens on *every* construction (via [`Number::from_f64`]),
/// not only when parsing literals — it's what lets index operations assume
/// "a Number used as an index is an integer" without a separate check.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Builds a `Number` from a float, demoting to `Int` when the value is
    /// whole and representable as an `i64`.
    pub fn from_f64(val: f64) -> Self {
        if val.is_finite() && val.fract() == 0.0 && val >= i64::MIN as f64 && val <= i64::MAX as f64
        {
            Number::Int(val as i64)
        } else {
            Number::Float(val)
        }
    }

    pub fn to_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Number::Int(i) => i == 0,
            Number::Float(f) => f == 0.0,
        }
    }

    /// Parses a literal token's text per §4.1's number-parsing rules:
    /// `0x`/`0X`-prefixed text is hex, text containing `.`/`e`/`E` is a
    /// float (demoted if whole), otherwise it's a decimal integer.
    pub fn parse(text: &str) -> EvalResult<Number> {
        let raw = text.trim();
        let lower = raw.to_ascii_lowercase();

        if lower.len() > 2 && &lower[..2] == "0x" {
            let parsed = i64::from_str_radix(&lower[2..], 16)
                .map_err(|_| EvalError::runtime(format!("invalid number literal '{text}'")))?;
            return Ok(Number::Int(parsed));
        }

        if lower.contains('.') || lower.contains('e') {
            let f: f64 = lower
                .parse()
                .map_err(|_| EvalError::runtime(format!("invalid number literal '{text}'")))?;
            return Ok(Number::from_f64(f));
        }

        let i: i64 = lower
            .parse()
            .map_err(|_| EvalError::runtime(format!("invalid number literal '{text}'")))?;
        Ok(Number::Int(i))
    }

    /// The non-negative integer index this Number represents, or an error
    /// naming `type_name` as the type being indexed.
    pub fn as_index(self, type_name: &str) -> EvalResult<usize> {
        match self {
            Number::Int(i) if i >= 0 => Ok(i as usize),
            _ => Err(EvalError::bad_index_type(type_name)),
        }
    }
}

impl From<i64> for Number {
    fn from(val: i64) -> Self {
        Number::Int(val)
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.to_f64() == other.to_f64()
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{i}"),
            Number::Float(x) => write!(f, "{x}"),
        }
    }
}

fn floor_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

fn floor_mod(a: i64, b: i64) -> i64 {
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        r + b
    } else {
        r
    }
}

/// One entry in an [`Value::Object`]'s backing map: a value and whether
/// that field rejects reassignment.
#[derive(Debug, Clone)]
pub struct ObjectEntry {
    pub value: Value,
    pub is_const: bool,
}

/// Shared handle to an Array's backing storage. Cloning a `Value::Array`
/// clones this handle, not the elements — aliasing two bindings of the same
/// array makes mutations through either visible through both, per §5.
pub type ArrayRef = Rc<RefCell<Vec<Value>>>;

/// Shared handle to an Object's backing storage, insertion-ordered so that
/// display order matches construction order (§4.1, testable property 5).
pub type ObjectRef = Rc<RefCell<IndexMap<String, ObjectEntry>>>;

/// The closed set of runtime values (component C2).
#[derive(Debug, Clone)]
pub enum Value {
    Empty,
    Boolean(bool),
    Number(Number),
    String(Rc<str>),
    Array(ArrayRef),
    Object(ObjectRef),
    Function(Rc<Function>),
}

impl Value {
    pub fn array(items: Vec<Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    pub fn object(entries: IndexMap<String, ObjectEntry>) -> Value {
        Value::Object(Rc::new(RefCell::new(entries)))
    }

    /// The variant name used throughout diagnostics, matching §4.1's table.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Empty => "()",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
        }
    }

    /// Convenience used by tests and by `Op::not`: truthiness under the
    /// Boolean coercion rules.
    pub fn is_truthy(&self) -> bool {
        matches!(self.cast_boolean(), Value::Boolean(true))
    }

    // -- coercion (`cast`) ----------------------------------------------

    /// Casts to Boolean: Empty and `false` are falsy, everything else is
    /// truthy. Never fails.
    pub fn cast_boolean(&self) -> Value {
        match self {
            Value::Empty => Value::Boolean(false),
            Value::Boolean(b) => Value::Boolean(*b),
            _ => Value::Boolean(true),
        }
    }

    /// Casts to String via `display()`. Never fails.
    pub fn cast_string(&self) -> Value {
        match self {
            Value::String(_) => self.clone(),
            _ => Value::String(Rc::from(self.display().as_str())),
        }
    }

    /// Casts to Number. Strings are parsed; Empty and Boolean may not cast.
    pub fn cast_number(&self) -> EvalResult<Value> {
        match self {
            Value::Number(n) => Ok(Value::Number(*n)),
            Value::String(s) => Ok(Value::Number(Number::parse(s)?)),
            other => Err(EvalError::bad_cast(other.type_name(), "number")),
        }
    }

    /// Casts to Array: identity only. Errors for every other variant.
    pub fn cast_array(&self) -> EvalResult<Value> {
        match self {
            Value::Array(_) => Ok(self.clone()),
            other => Err(EvalError::bad_cast(other.type_name(), "array")),
        }
    }

    /// Casts to Object: identity only. Errors for every other variant.
    pub fn cast_object(&self) -> EvalResult<Value> {
        match self {
            Value::Object(_) => Ok(self.clone()),
            other => Err(EvalError::bad_cast(other.type_name(), "object")),
        }
    }

    // -- display -----------------------------------------------------------

    pub fn display(&self) -> String {
        match self {
            Value::Empty => "()".to_string(),
            Value::Boolean(b) => if *b { "true" } else { "false" }.to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => format!("\"{}\"", escape_for_display(s)),
            Value::Array(items) => {
                let items = items.borrow();
                let rendered: Vec<String> = items.iter().map(Value::display).collect();
                format!("[{}]", rendered.join(", "))
            }
            Value::Object(entries) => {
                let entries = entries.borrow();
                let rendered: Vec<String> = entries
                    .iter()
                    .map(|(k, e)| {
                        let sep = if e.is_const { ":" } else { "=" };
                        format!("{k} {sep} {}", e.value.display())
                    })
                    .collect();
                format!("{{{}}}", rendered.join(", "))
            }
            Value::Function(_) => "<function>".to_string(),
        }
    }

    // -- operations (C2, delegated to by the C3 façade) ---------------------

    pub fn eq(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Empty, Value::Empty) => Value::Boolean(true),
            (Value::Boolean(a), Value::Boolean(b)) => Value::Boolean(a == b),
            (Value::Number(a), Value::Number(b)) => Value::Boolean(a == b),
            (Value::String(a), Value::String(b)) => Value::Boolean(a == b),
            (Value::Array(a), Value::Array(b)) => {
                if Rc::ptr_eq(a, b) {
                    return Value::Boolean(true);
                }
                let (a, b) = (a.borrow(), b.borrow());
                let eq = a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|(x, y)| matches!(x.eq(y), Value::Boolean(true)));
                Value::Boolean(eq)
            }
            (Value::Object(a), Value::Object(b)) => {
                if Rc::ptr_eq(a, b) {
                    return Value::Boolean(true);
                }
                let (a, b) = (a.borrow(), b.borrow());
                let eq = a.len() == b.len()
                    && a.iter().all(|(k, entry)| {
                        b.get(k).is_some_and(|other_entry| {
                            entry.is_const == other_entry.is_const
                                && matches!(entry.value.eq(&other_entry.value), Value::Boolean(true))
                        })
                    });
                Value::Boolean(eq)
            }
            (Value::Function(a), Value::Function(b)) => Value::Boolean(Rc::ptr_eq(a, b)),
            _ => unreachable!("Op guards against cross-variant calls into Value::eq"),
        }
    }

    pub fn lt(&self, other: &Value) -> EvalResult<Value> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Boolean(a.to_f64() < b.to_f64())),
            (Value::String(a), Value::String(b)) => Ok(Value::Boolean(a < b)),
            _ => Err(EvalError::unsupported_op(self.type_name(), "ordering")),
        }
    }

    pub fn gt(&self, other: &Value) -> EvalResult<Value> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Boolean(a.to_f64() > b.to_f64())),
            (Value::String(a), Value::String(b)) => Ok(Value::Boolean(a > b)),
            _ => Err(EvalError::unsupported_op(self.type_name(), "ordering")),
        }
    }

    pub fn add(&self, other: &Value) -> EvalResult<Value> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(numeric_add(*a, *b))),
            (Value::String(a), Value::String(b)) => {
                Ok(Value::String(Rc::from(format!("{a}{b}").as_str())))
            }
            _ => Err(EvalError::unsupported_op(self.type_name(), "addition")),
        }
    }

    pub fn sub(&self, other: &Value) -> EvalResult<Value> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(numeric_sub(*a, *b))),
            _ => Err(EvalError::unsupported_op(self.type_name(), "subtraction")),
        }
    }

    pub fn mul(&self, other: &Value) -> EvalResult<Value> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(numeric_mul(*a, *b))),
            _ => Err(EvalError::unsupported_op(self.type_name(), "multiplication")),
        }
    }

    pub fn div(&self, other: &Value) -> EvalResult<Value> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => {
                if b.is_zero() {
                    return Err(EvalError::division_by_zero());
                }
                Ok(Value::Number(Number::from_f64(a.to_f64() / b.to_f64())))
            }
            _ => Err(EvalError::unsupported_op(self.type_name(), "division")),
        }
    }

    pub fn int_div(&self, other: &Value) -> EvalResult<Value> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => {
                if b.is_zero() {
                    return Err(EvalError::division_by_zero());
                }
                let result = match (a, b) {
                    (Number::Int(x), Number::Int(y)) => Number::Int(floor_div(*x, *y)),
                    _ => Number::from_f64((a.to_f64() / b.to_f64()).floor()),
                };
                Ok(Value::Number(result))
            }
            _ => Err(EvalError::unsupported_op(
                self.type_name(),
                "integer division",
            )),
        }
    }

    pub fn modulo(&self, other: &Value) -> EvalResult<Value> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => {
                if b.is_zero() {
                    return Err(EvalError::division_by_zero());
                }
                let result = match (a, b) {
                    (Number::Int(x), Number::Int(y)) => Number::Int(floor_mod(*x, *y)),
                    _ => {
                        let (x, y) = (a.to_f64(), b.to_f64());
                        Number::from_f64(x - y * (x / y).floor())
                    }
                };
                Ok(Value::Number(result))
            }
            _ => Err(EvalError::unsupported_op(self.type_name(), "modulo")),
        }
    }

    pub fn pow(&self, other: &Value) -> EvalResult<Value> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => {
                Ok(Value::Number(Number::from_f64(a.to_f64().powf(b.to_f64()))))
            }
            _ => Err(EvalError::unsupported_op(self.type_name(), "exponentiation")),
        }
    }

    pub fn neg(&self) -> EvalResult<Value> {
        match self {
            Value::Number(Number::Int(i)) => Ok(Value::Number(Number::Int(-i))),
            Value::Number(Number::Float(f)) => Ok(Value::Number(Number::Float(-f))),
            _ => Err(EvalError::unsupported_op(self.type_name(), "negation")),
        }
    }

    pub fn index_get(&self, index: &Value) -> EvalResult<Value> {
        match self {
            Value::Array(items) => {
                let items = items.borrow();
                let i = self.validate_array_index(index, items.len())?;
                Ok(items[i].clone())
            }
            _ => Err(EvalError::unsupported_op(self.type_name(), "index access")),
        }
    }

    pub fn index_set(&self, index: &Value, item: Value) -> EvalResult<()> {
        match self {
            Value::Array(items) => {
                let mut items = items.borrow_mut();
                let len = items.len();
                let i = self.validate_array_index(index, len)?;
                items[i] = item;
                Ok(())
            }
            _ => Err(EvalError::unsupported_op(
                self.type_name(),
                "index assignment",
            )),
        }
    }

    fn validate_array_index(&self, index: &Value, len: usize) -> EvalResult<usize> {
        let Value::Number(n) = index else {
            return Err(EvalError::runtime(format!(
                "cannot index type '{}' with type '{}'",
                self.type_name(),
                index.type_name()
            )));
        };
        let i = n.as_index(self.type_name())?;
        if i >= len {
            return Err(EvalError::index_out_of_range(self.type_name()));
        }
        Ok(i)
    }

    pub fn key_get(&self, key: &str) -> EvalResult<Value> {
        match self {
            Value::Object(entries) => {
                let entries = entries.borrow();
                entries
                    .get(key)
                    .map(|e| e.value.clone())
                    .ok_or_else(|| EvalError::unrecognized_key(key))
            }
            _ => Err(EvalError::unsupported_op(self.type_name(), "key access")),
        }
    }

    pub fn key_set(&self, key: &str, item: Value) -> EvalResult<()> {
        match self {
            Value::Object(entries) => {
                let mut entries = entries.borrow_mut();
                let entry = entries
                    .get_mut(key)
                    .ok_or_else(|| EvalError::unrecognized_key(key))?;
                if entry.is_const {
                    return Err(EvalError::const_reassign_field(key));
                }
                entry.value = item;
                Ok(())
            }
            _ => Err(EvalError::unsupported_op(self.type_name(), "key assignment")),
        }
    }
}

fn numeric_add(a: Number, b: Number) -> Number {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => match x.checked_add(y) {
            Some(r) => Number::Int(r),
            None => Number::from_f64(x as f64 + y as f64),
        },
        _ => Number::from_f64(a.to_f64() + b.to_f64()),
    }
}

fn numeric_sub(a: Number, b: Number) -> Number {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => match x.checked_sub(y) {
            Some(r) => Number::Int(r),
            None => Number::from_f64(x as f64 - y as f64),
        },
        _ => Number::from_f64(a.to_f64() - b.to_f64()),
    }
}

fn numeric_mul(a: Number, b: Number) -> Number {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => match x.checked_mul(y) {
            Some(r) => Number::Int(r),
            None => Number::from_f64(x as f64 * y as f64),
        },
        _ => Number::from_f64(a.to_f64() * b.to_f64()),
    }
}

/// Resolves the minimal escape set spec.md §9 demands be decided explicitly:
/// `\n`, `\t`, `\"`, `\\`. Anything else is an error rather than a guess.
pub fn unescape(raw: &str) -> EvalResult<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => return Err(EvalError::invalid_escape(other)),
            None => return Err(EvalError::runtime("unterminated escape sequence")),
        }
    }
    Ok(out)
}

fn escape_for_display(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            other => out.push(other),
        }
    }
    out
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Number(Number::Int(i))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

/// Structural equality for Rust-side convenience (tests, `HashMap` keys
/// elsewhere in the host). This is *not* the runtime `==` operator — that's
/// [`crate::op::eq`], which never errors and returns `false` across
/// differing variants. `Value::partial_eq` additionally lets Function
/// compare by identity, since the language itself never defines function
/// equality.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => matches!(self.eq(other), Value::Boolean(true)) && same_variant(self, other),
        }
    }
}

fn same_variant(a: &Value, b: &Value) -> bool {
    std::mem::discriminant(a) == std::mem::discriminant(b)
}
