use std::any::{Any, type_name};
use std::fmt;

use anyhow::{anyhow, bail};

use super::TypeRef;

// ── Value ─────────────────────────────────────────────────────────────────

/// A converted argument or property value.
pub enum Value {
    /// A named parameter written without a value (`Key=`).
    Null,
    /// Passthrough for string- and object-typed targets.
    Str(String),
    /// A resolved type reference.
    Type(TypeRef),
    /// Anything produced by a registered converter.
    Boxed(Box<dyn Any>),
}

impl Value {
    pub fn boxed<T: Any>(value: T) -> Self {
        Self::Boxed(Box::new(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn into_string(self) -> anyhow::Result<String> {
        match self {
            Self::Str(s) => Ok(s),
            other => bail!("expected a string, got {other:?}"),
        }
    }

    /// Like [`into_string`](Self::into_string), but `Null` becomes `None`.
    pub fn into_opt_string(self) -> anyhow::Result<Option<String>> {
        match self {
            Self::Null => Ok(None),
            other => other.into_string().map(Some),
        }
    }

    pub fn into_type(self) -> anyhow::Result<TypeRef> {
        match self {
            Self::Type(ty) => Ok(ty),
            other => bail!("expected a type reference, got {other:?}"),
        }
    }

    /// Take the value as `T`, whichever variant carries it.
    pub fn downcast<T: Any>(self) -> anyhow::Result<T> {
        let any: Box<dyn Any> = match self {
            Self::Null => bail!("expected {}, got null", type_name::<T>()),
            Self::Str(s) => Box::new(s),
            Self::Type(ty) => Box::new(ty),
            Self::Boxed(b) => b,
        };
        any.downcast::<T>()
            .map(|b| *b)
            .map_err(|_| anyhow!("value is not a {}", type_name::<T>()))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Self::Type(ty) => f.debug_tuple("Type").field(&ty.name()).finish(),
            Self::Boxed(_) => f.write_str("Boxed(..)"),
        }
    }
}

// ── Args ──────────────────────────────────────────────────────────────────

/// Converted constructor arguments, consumed in declaration order.
#[derive(Debug)]
pub struct Args {
    values: std::vec::IntoIter<Value>,
}

impl Args {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values: values.into_iter() }
    }

    /// Arguments not yet taken.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }

    pub fn next_value(&mut self) -> anyhow::Result<Value> {
        self.values.next().ok_or_else(|| anyhow!("constructor argument missing"))
    }

    pub fn string(&mut self) -> anyhow::Result<String> {
        self.next_value()?.into_string()
    }

    pub fn type_ref(&mut self) -> anyhow::Result<TypeRef> {
        self.next_value()?.into_type()
    }

    pub fn take<T: Any>(&mut self) -> anyhow::Result<T> {
        self.next_value()?.downcast()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downcast_any_variant() {
        assert_eq!(Value::boxed(5_i32).downcast::<i32>().unwrap(), 5);
        assert_eq!(Value::Str("a".into()).downcast::<String>().unwrap(), "a");
        assert!(Value::boxed(5_i32).downcast::<i64>().is_err());
        assert!(Value::Null.downcast::<String>().is_err());
    }

    #[test]
    fn args_in_order() {
        let mut args = Args::new(vec![Value::Str("a".into()), Value::boxed(2_u8)]);
        assert_eq!(args.remaining(), 2);
        assert_eq!(args.string().unwrap(), "a");
        assert_eq!(args.take::<u8>().unwrap(), 2);
        assert!(args.next_value().is_err());
    }

    #[test]
    fn null_as_optional_string() {
        assert_eq!(Value::Null.into_opt_string().unwrap(), None);
        assert!(Value::boxed(1_i32).into_opt_string().is_err());
    }
}
