//! Builds instances from parsed expressions.
//!
//! Positional parameters pick a constructor by arity; named parameters are
//! then assigned to writable properties. Both steps are best effort: a
//! constructor whose arguments fail to convert is skipped in favour of the
//! next one, and a property that is missing, read-only or unconvertible is
//! left alone.

use std::any::Any;

use markext_syntax::{NamespaceRegistry, ParsedExpression};

use crate::convert::ConversionRegistry;
use crate::error::{BindError, ConversionError};
use crate::resolver::Resolver;
use crate::types::{Constructor, Instance, TypeDescriptor, TypeKind, Value};

#[derive(Debug, Clone, Copy)]
pub struct Binder<'b> {
    resolver: &'b Resolver<'b>,
    conversions: &'b ConversionRegistry,
}

impl<'b> Binder<'b> {
    pub fn new(resolver: &'b Resolver<'b>, conversions: &'b ConversionRegistry) -> Self {
        Self { resolver, conversions }
    }

    /// Construct and populate an instance of `ty` from `expr`.
    ///
    /// `registry` resolves any type-valued arguments.
    pub fn bind_instance(
        &self,
        expr: &ParsedExpression,
        ty: &TypeDescriptor,
        registry: &NamespaceRegistry,
    ) -> Result<Instance, BindError> {
        let mut instance = self.construct(ty, &expr.positional(), registry)?;
        self.assign(&mut *instance, ty, expr, registry);
        log::debug!("bound {expr} as {}", ty.name());
        Ok(instance)
    }

    /// Like [`bind_instance`](Self::bind_instance), downcast to `T`.
    pub fn bind<T: Any>(
        &self,
        expr: &ParsedExpression,
        ty: &TypeDescriptor,
        registry: &NamespaceRegistry,
    ) -> Result<T, BindError> {
        self.bind_instance(expr, ty, registry)?
            .downcast::<T>()
            .map(|instance| *instance)
            .map_err(|_| BindError::UnexpectedInstance { type_name: ty.name().to_string() })
    }

    /// Convert one parameter value to `target`.
    ///
    /// Type targets are resolved as qualified names against `registry`;
    /// everything else goes to the conversion registry.
    pub fn convert(
        &self,
        target: &TypeDescriptor,
        input: Option<&str>,
        registry: &NamespaceRegistry,
    ) -> Result<Value, ConversionError> {
        match (target.kind(), input) {
            (TypeKind::Type, Some(text)) => Ok(Value::Type(self.resolver.resolve(text, registry)?)),
            (TypeKind::Type, None) => Err(ConversionError::NullValue { target: target.name().to_string() }),
            _ => self.conversions.convert(target, input),
        }
    }

    fn construct(
        &self,
        ty: &TypeDescriptor,
        args: &[Option<&str>],
        registry: &NamespaceRegistry,
    ) -> Result<Instance, BindError> {
        let candidates = ty.constructors().iter().filter(|c| c.arity() == args.len());
        for (attempt, ctor) in candidates.enumerate() {
            match self.try_constructor(ctor, args, registry) {
                Ok(instance) => return Ok(instance),
                Err(e) => log::trace!("{}: constructor #{attempt} {ctor:?} rejected: {e:#}", ty.name()),
            }
        }
        Err(BindError::NoMatchingConstructor { type_name: ty.name().to_string(), arity: args.len() })
    }

    /// One constructor attempt. Converted values are dropped on failure.
    fn try_constructor(
        &self,
        ctor: &Constructor,
        args: &[Option<&str>],
        registry: &NamespaceRegistry,
    ) -> anyhow::Result<Instance> {
        let values = ctor
            .params()
            .iter()
            .zip(args)
            .map(|(param, arg)| self.convert(param, *arg, registry))
            .collect::<Result<Vec<_>, _>>()?;
        ctor.invoke(values)
    }

    fn assign(
        &self,
        instance: &mut dyn Any,
        ty: &TypeDescriptor,
        expr: &ParsedExpression,
        registry: &NamespaceRegistry,
    ) {
        for (name, input) in expr.named() {
            let Some(property) = ty.property(name).filter(|p| p.is_writable()) else {
                log::debug!("{}: no writable property {name:?}, skipped", ty.name());
                continue;
            };
            let result = match self.convert(property.value_type(), input, registry) {
                Ok(value) => property.set(instance, value),
                Err(e) => Err(e.into()),
            };
            if let Err(e) = result {
                log::debug!("{}.{name}: {e:#}, skipped", ty.name());
            }
        }
    }
}
