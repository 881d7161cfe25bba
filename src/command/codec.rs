//! Parameter decoding
//!
//! Turns a raw token into a value of the parameter's declared type.
//! Pure, no state.

use alloc::string::String;
use core::fmt;

/// Declared type of a Write command parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterType {
    Integer,
    String,
    Float,
}

impl ParameterType {
    /// Name used in command syntax dumps
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::String => "STRING",
            Self::Float => "FLOAT",
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Returns `"INTEGER"`, `"STRING"` or `"FLOAT"`.
pub fn type_name(ty: ParameterType) -> &'static str {
    ty.type_name()
}

/// Decoded parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Integer(i32),
    String(String),
    Float(f32),
}

impl TypedValue {
    /// Type tag of the value
    pub fn parameter_type(&self) -> ParameterType {
        match self {
            Self::Integer(_) => ParameterType::Integer,
            Self::String(_) => ParameterType::String,
            Self::Float(_) => ParameterType::Float,
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }
}

/// Token does not match the declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMismatch {
    pub expected: ParameterType,
}

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {}", self.expected)
    }
}

/// Decode `token` as a value of type `ty`
///
/// - Integer: `[+-]?[0-9]+`, must fit `i32`
/// - Float: `[+-]?[0-9]+(\.[0-9]+)?`, must be finite as `f32`
/// - String: verbatim
pub fn decode(token: &str, ty: ParameterType) -> Result<TypedValue, TypeMismatch> {
    let mismatch = TypeMismatch { expected: ty };

    match ty {
        ParameterType::String => Ok(TypedValue::String(String::from(token))),
        ParameterType::Integer => {
            if !is_digits(strip_sign(token)) {
                return Err(mismatch);
            }
            token.parse::<i32>().map(TypedValue::Integer).map_err(|_| mismatch)
        }
        ParameterType::Float => {
            let unsigned = strip_sign(token);
            let well_formed = match unsigned.split_once('.') {
                Some((whole, frac)) => is_digits(whole) && is_digits(frac),
                None => is_digits(unsigned),
            };
            if !well_formed {
                return Err(mismatch);
            }
            token
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .map(TypedValue::Float)
                .ok_or(mismatch)
        }
    }
}

fn strip_sign(token: &str) -> &str {
    token
        .strip_prefix('-')
        .or_else(|| token.strip_prefix('+'))
        .unwrap_or(token)
}

/// One or more ASCII digits
fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
