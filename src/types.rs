use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum Type {
    Nil,
    String,
    Int,
    /// Named fields, in declaration order.
    Record(Vec<(String, Type)>),
}

impl Type {
    pub fn record<'a>(fields: impl IntoIterator<Item = (&'a str, Type)>) -> Self {
        Type::Record(
            fields
                .into_iter()
                .map(|(name, typ)| (name.to_owned(), typ))
                .collect(),
        )
    }

    /// Checks that `val` has this type.
    pub fn check(&self, val: &Value) -> Result<(), TypeMismatchError> {
        let matches = match (self, val) {
            (Type::Nil, Value::Nil) | (Type::String, Value::String(_)) | (Type::Int, Value::Int(_)) => {
                true
            }
            (Type::Record(types), Value::Record(values)) => {
                types.len() == values.len()
                    && types
                        .iter()
                        .zip(values)
                        .all(|((tname, typ), (vname, val))| {
                            tname == vname && typ.check(val).is_ok()
                        })
            }
            _ => false,
        };

        if matches {
            Ok(())
        } else {
            Err(TypeMismatchError::new(val.clone(), self.clone()))
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Type::Nil => f.write_str("Nil"),
            Type::String => f.write_str("String"),
            Type::Int => f.write_str("Int"),
            Type::Record(fields) => {
                f.write_str("{")?;
                for (i, (name, typ)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {typ}")?;
                }
                f.write_str("}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum Value {
    Nil,
    String(String),
    Int(i64),
    Record(Vec<(String, Value)>),
}

impl Value {
    /// Removes the field called `name` from a record value.
    pub fn take_field(&mut self, name: &str) -> Option<Value> {
        match self {
            Value::Record(fields) => {
                let idx = fields.iter().position(|(n, _)| n == name)?;
                Some(fields.remove(idx).1)
            }
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Nil
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Signature {
    pub domain: Type,
    pub range: Type,
}

pub trait InferType {
    fn infer_type() -> Type;
}

pub trait Encode {
    fn encode(self) -> Value;
}

pub trait Decode: Sized {
    fn decode(val: Value) -> Result<Self, TypeMismatchError>;
}

pub trait EncodeTypeCheck: Encode + Sized {
    fn encode_typeck(typ: &Type, val: Self) -> Result<Value, TypeMismatchError> {
        let val = val.encode();
        typ.check(&val)?;
        Ok(val)
    }
}

impl<T: Encode> EncodeTypeCheck for T {}

pub trait DecodeTypeCheck: Decode {
    fn decode_typeck(typ: &Type, val: Value) -> Result<Self, TypeMismatchError> {
        typ.check(&val)?;
        Self::decode(val)
    }
}

impl<T: Decode> DecodeTypeCheck for T {}

macro_rules! impl_encode_decode {
    ($rust_type:ty, $rpc_type:expr, $encode_name:pat => $encode_expr:expr, $($from_rpc_arm:tt)*) => {
        impl InferType for $rust_type {
            fn infer_type() -> Type {
                $rpc_type
            }
        }

        impl Encode for $rust_type {
            fn encode(self) -> Value {
                let $encode_name = self;
                $encode_expr
            }
        }

        impl Decode for $rust_type {
            fn decode(val: Value) -> Result<Self, TypeMismatchError> {
                Ok(match val {
                    $($from_rpc_arm)*,
                    _ => return Err(TypeMismatchError::new(val, <Self as InferType>::infer_type()))
                })
            }
        }
    };
}

impl_encode_decode!((), Type::Nil, () => Value::Nil, Value::Nil => ());
impl_encode_decode!(String, Type::String, s => Value::String(s), Value::String(s) => s);
impl_encode_decode!(i64, Type::Int, n => Value::Int(n), Value::Int(n) => n);

impl Encode for &str {
    fn encode(self) -> Value {
        Value::String(self.to_owned())
    }
}

impl Encode for Value {
    fn encode(self) -> Value {
        self
    }
}

impl Decode for Value {
    fn decode(val: Value) -> Result<Self, TypeMismatchError> {
        Ok(val)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Error)]
#[error("type error: {value:?} is not {expected_type}")]
pub struct TypeMismatchError {
    value: Value,
    expected_type: Type,
}

impl TypeMismatchError {
    pub fn new(value: Value, expected_type: Type) -> Self {
        Self {
            value,
            expected_type,
        }
    }

    pub fn expected_type(&self) -> &Type {
        &self.expected_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> Type {
        Type::record([("name", Type::String), ("age", Type::Int)])
    }

    #[test]
    fn record_check_requires_field_names_in_order() {
        let ok = Value::Record(vec![
            ("name".into(), "ann".into()),
            ("age".into(), 3.into()),
        ]);
        assert!(person().check(&ok).is_ok());

        let swapped = Value::Record(vec![
            ("age".into(), 3.into()),
            ("name".into(), "ann".into()),
        ]);
        assert!(person().check(&swapped).is_err());

        let short = Value::Record(vec![("name".into(), "ann".into())]);
        assert!(person().check(&short).is_err());
    }

    #[test]
    fn nested_field_mismatch_is_reported_against_outer_type() {
        let bad = Value::Record(vec![
            ("name".into(), 7.into()),
            ("age".into(), 3.into()),
        ]);
        let err = person().check(&bad).unwrap_err();
        assert_eq!(err.expected_type(), &person());
    }

    #[test]
    fn decode_typeck_rejects_wrong_scalar() {
        let err = String::decode_typeck(&Type::String, Value::Int(1)).unwrap_err();
        assert_eq!(err.to_string(), "type error: Int(1) is not String");
        assert_eq!(i64::decode_typeck(&Type::Int, Value::Int(5)).unwrap(), 5);
    }

    #[test]
    fn take_field_removes_by_name() {
        let mut val = Value::Record(vec![("message".into(), "hi".into())]);
        assert_eq!(val.take_field("message"), Some(Value::from("hi")));
        assert_eq!(val.take_field("message"), None);
        assert_eq!(Value::Nil.take_field("message"), None);
    }

    #[test]
    fn record_type_display() {
        assert_eq!(person().to_string(), "{name: String, age: Int}");
    }
}
