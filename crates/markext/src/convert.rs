//! String-to-value conversion registry.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ConversionError;
use crate::types::{TypeDescriptor, TypeKey, TypeKind, TypeRef, TypeRegistry, Value};

type Converter = Box<dyn Fn(&str) -> anyhow::Result<Value> + Send + Sync>;

/// Converters keyed by target type identity.
///
/// `String` and `Object` targets pass through without a converter. `Type`
/// targets are resolved as qualified names by the binder, not here.
#[derive(Default)]
pub struct ConversionRegistry {
    converters: HashMap<TypeKey, Converter>,
}

impl ConversionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Converters for the `Boolean`, `Int32`, `Int64` and `Double` types of
    /// `types`. Types missing from `types` are skipped.
    pub fn with_system_converters(types: &TypeRegistry) -> Self {
        let mut registry = Self::new();
        if let Some(ty) = types.system("Boolean") {
            registry.register(&ty, |s| parse_bool(s).map(Value::boxed));
        }
        if let Some(ty) = types.system("Int32") {
            registry.register_from_str::<i32>(&ty);
        }
        if let Some(ty) = types.system("Int64") {
            registry.register_from_str::<i64>(&ty);
        }
        if let Some(ty) = types.system("Double") {
            registry.register_from_str::<f64>(&ty);
        }
        registry
    }

    /// Register (or replace) the converter for `target`.
    pub fn register<F>(&mut self, target: &TypeRef, convert: F) -> &mut Self
    where
        F: Fn(&str) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.converters.insert(target.key().clone(), Box::new(convert));
        self
    }

    /// Register a converter that parses trimmed input with `T::from_str`.
    pub fn register_from_str<T>(&mut self, target: &TypeRef) -> &mut Self
    where
        T: FromStr + Any,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.register(target, |s| Ok(Value::boxed(s.trim().parse::<T>()?)))
    }

    pub fn contains(&self, target: &TypeDescriptor) -> bool {
        self.converters.contains_key(target.key())
    }

    /// Convert `input` to a value of `target`.
    ///
    /// `None` (a `Key=` with no value) passes through to string and object
    /// targets as [`Value::Null`] and fails for everything else.
    pub fn convert(&self, target: &TypeDescriptor, input: Option<&str>) -> Result<Value, ConversionError> {
        match (target.kind(), input) {
            (TypeKind::String | TypeKind::Object, None) => Ok(Value::Null),
            (TypeKind::String | TypeKind::Object, Some(s)) => Ok(Value::Str(s.to_string())),
            (_, None) => Err(ConversionError::NullValue { target: target.name().to_string() }),
            (_, Some(s)) => {
                let convert = self.converters.get(target.key()).ok_or_else(|| {
                    ConversionError::NoConverter { target: target.name().to_string() }
                })?;
                convert(s).map_err(|source| ConversionError::Rejected {
                    target: target.name().to_string(),
                    input: s.to_string(),
                    source,
                })
            }
        }
    }
}

impl fmt::Debug for ConversionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut targets: Vec<&str> = self.converters.keys().map(|k| k.name.as_str()).collect();
        targets.sort_unstable();
        f.debug_struct("ConversionRegistry").field("targets", &targets).finish()
    }
}

fn parse_bool(s: &str) -> anyhow::Result<bool> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if s.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        anyhow::bail!("{s:?} is not a boolean")
    }
}
