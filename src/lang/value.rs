use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use crate::lang::ast::BinaryOperator;
use crate::lang::interpreter::RuntimeError;


#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Builtin {
    Say,
    Spill,
}

impl Builtin {
    pub const ALL: [Builtin; 2] = [Builtin::Say, Builtin::Spill];

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Say => "say",
            Builtin::Spill => "spill",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Builtin(Builtin),
    /// What a call evaluates to; functions don't return values.
    Unit,
}

#[derive(Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn to_f64(self) -> f64 {
        match self {
            Number::Int(value) => value as f64,
            Number::Float(value) => value,
        }
    }
}

impl Value {
    /// Interprets raw literal text: digit-only text becomes an `Int`, anything
    /// else that parses as a float becomes a `Float`, the rest stays a `Str`.
    pub fn from_literal(text: &str) -> Value {
        if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(value) = text.parse::<i64>() {
                return Value::Int(value);
            }
        }

        match text.parse::<f64>() {
            Ok(value) => Value::Float(value),
            Err(_) => Value::Str(text.to_owned()),
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(value) => *value != 0,
            Value::Float(value) => *value != 0.0,
            Value::Str(value) => !value.is_empty(),
            Value::Bool(value) => *value,
            Value::Builtin(_) => true,
            Value::Unit => false,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Bool(_) => "bool",
            Value::Builtin(_) => "builtin",
            Value::Unit => "none",
        }
    }

    fn as_number(&self) -> Option<Number> {
        match self {
            Value::Int(value) => Some(Number::Int(*value)),
            Value::Float(value) => Some(Number::Float(*value)),
            Value::Bool(value) => Some(Number::Int(*value as i64)),
            _ => None,
        }
    }

    pub fn apply(operator: BinaryOperator, left: Value, right: Value) -> Result<Value, RuntimeError> {
        match operator {
            BinaryOperator::Add => match (left, right) {
                (Value::Str(mut left), Value::Str(right)) => {
                    left.push_str(&right);
                    Ok(Value::Str(left))
                },
                (left, right) => Self::arithmetic(operator, &left, &right),
            },
            BinaryOperator::Subtract | BinaryOperator::Multiply | BinaryOperator::Divide =>
                Self::arithmetic(operator, &left, &right),

            BinaryOperator::Equal => Ok(Value::Bool(left.loosely_equals(&right))),
            BinaryOperator::NotEqual => Ok(Value::Bool(!left.loosely_equals(&right))),

            BinaryOperator::Greater | BinaryOperator::GreaterEqual | BinaryOperator::Less | BinaryOperator::LessEqual => {
                let ordering = left.compare(&right)
                    .ok_or_else(|| RuntimeError::type_mismatch(operator, &left, &right))?;

                // An unordered pair (NaN) makes every comparison false
                Ok(Value::Bool(match (operator, ordering) {
                    (_, None) => false,
                    (BinaryOperator::Greater, Some(ordering)) => ordering == Ordering::Greater,
                    (BinaryOperator::GreaterEqual, Some(ordering)) => ordering != Ordering::Less,
                    (BinaryOperator::Less, Some(ordering)) => ordering == Ordering::Less,
                    (_, Some(ordering)) => ordering != Ordering::Greater,
                }))
            },
        }
    }

    fn arithmetic(operator: BinaryOperator, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
        let (a, b) = match (left.as_number(), right.as_number()) {
            (Some(a), Some(b)) => (a, b),
            _ => return Err(RuntimeError::type_mismatch(operator, left, right)),
        };

        if let (Number::Int(a), Number::Int(b)) = (a, b) {
            let result = match operator {
                BinaryOperator::Add => a.checked_add(b),
                BinaryOperator::Subtract => a.checked_sub(b),
                BinaryOperator::Multiply => a.checked_mul(b),
                BinaryOperator::Divide if b == 0 => return Err(RuntimeError::DivisionByZero),
                BinaryOperator::Divide => a.checked_div(b),
                _ => return Err(RuntimeError::type_mismatch(operator, left, right)),
            };

            return result.map(Value::Int).ok_or(RuntimeError::Overflow(operator.symbol()));
        }

        let (a, b) = (a.to_f64(), b.to_f64());

        Ok(Value::Float(match operator {
            BinaryOperator::Add => a + b,
            BinaryOperator::Subtract => a - b,
            BinaryOperator::Multiply => a * b,
            BinaryOperator::Divide => a / b,
            _ => return Err(RuntimeError::type_mismatch(operator, left, right)),
        }))
    }

    /// `==` semantics: numbers compare by value across kinds, unrelated kinds are never equal.
    pub fn loosely_equals(&self, other: &Value) -> bool {
        if let (Some(a), Some(b)) = (self.as_number(), other.as_number()) {
            return match (a, b) {
                (Number::Int(a), Number::Int(b)) => a == b,
                (a, b) => a.to_f64() == b.to_f64(),
            };
        }

        match (self, other) {
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Builtin(a), Value::Builtin(b)) => a == b,
            (Value::Unit, Value::Unit) => true,
            _ => false,
        }
    }

    /// `None` when the kinds can't be ordered; `Some(None)` for unordered floats.
    fn compare(&self, other: &Value) -> Option<Option<Ordering>> {
        if let (Some(a), Some(b)) = (self.as_number(), other.as_number()) {
            return Some(match (a, b) {
                (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
                (a, b) => a.to_f64().partial_cmp(&b.to_f64()),
            });
        }

        match (self, other) {
            (Value::Str(a), Value::Str(b)) => Some(Some(a.cmp(b))),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{}", value),
            Value::Float(value) if value.is_finite() && value.fract() == 0.0 => write!(f, "{}.0", value),
            Value::Float(value) => write!(f, "{}", value),
            Value::Str(value) => f.write_str(value),
            Value::Bool(value) => write!(f, "{}", value),
            Value::Builtin(builtin) => write!(f, "<builtin {}>", builtin.name()),
            Value::Unit => f.write_str("none"),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_owned())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}
