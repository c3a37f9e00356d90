use std::any::{Any, type_name};
use std::marker::PhantomData;
use std::sync::Arc;

use anyhow::anyhow;

use super::{Args, Constructor, Instance, Property, TypeDescriptor, TypeKind, TypeRef, Value};

/// Builder for the descriptor of a Rust type `T`.
///
/// ```rust
/// use markext::types::{TypeDescriptor, TypeKind};
///
/// #[derive(Default)]
/// struct Marker { id: String }
///
/// let string = TypeDescriptor::scalar("String", "urn:sys", TypeKind::String);
/// let marker = TypeDescriptor::builder::<Marker>("Marker", "urn:app")
///     .constructor(&[], |_| Ok(Marker::default()))
///     .constructor(&[&string], |args| Ok(Marker { id: args.string()? }))
///     .property("Id", &string, |m, v| { m.id = v.into_string()?; Ok(()) })
///     .build();
/// assert_eq!(marker.constructors().len(), 2);
/// ```
pub struct TypeBuilder<T> {
    desc: TypeDescriptor,
    _target: PhantomData<fn() -> T>,
}

impl<T: Any> TypeBuilder<T> {
    pub(super) fn new(desc: TypeDescriptor) -> Self {
        Self { desc, _target: PhantomData }
    }

    pub fn kind(mut self, kind: TypeKind) -> Self {
        self.desc.kind = kind;
        self
    }

    pub fn preferred_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.desc.preferred_prefix = Some(prefix.into());
        self
    }

    /// Add a constructor. Constructors are tried in the order they are added.
    pub fn constructor<F>(mut self, params: &[&TypeRef], factory: F) -> Self
    where
        F: Fn(&mut Args) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        self.desc.constructors.push(Constructor {
            params: params.iter().map(|p| Arc::clone(p)).collect(),
            factory: Box::new(move |args| factory(args).map(|v| Box::new(v) as Instance)),
        });
        self
    }

    /// Add a writable property.
    pub fn property<F>(mut self, name: &str, value_type: &TypeRef, set: F) -> Self
    where
        F: Fn(&mut T, Value) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.desc.properties.push(Property {
            name: name.to_string(),
            value_type: Arc::clone(value_type),
            setter: Some(Box::new(move |target, value| {
                let target = target
                    .downcast_mut::<T>()
                    .ok_or_else(|| anyhow!("target is not a {}", type_name::<T>()))?;
                set(target, value)
            })),
        });
        self
    }

    /// Add a property that can be read (e.g. as a property element) but not
    /// assigned from markup.
    pub fn read_only(mut self, name: &str, value_type: &TypeRef) -> Self {
        self.desc.properties.push(Property {
            name: name.to_string(),
            value_type: Arc::clone(value_type),
            setter: None,
        });
        self
    }

    /// Declare an attached property: one this type defines for use on other
    /// elements (`Grid.Row`). It is only looked up, never assigned.
    pub fn attached(mut self, name: &str, value_type: &TypeRef) -> Self {
        self.desc.attached.push(Property {
            name: name.to_string(),
            value_type: Arc::clone(value_type),
            setter: None,
        });
        self
    }

    pub fn build(self) -> TypeRef {
        Arc::new(self.desc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Pair {
        a: String,
        b: String,
    }

    fn string() -> TypeRef {
        TypeDescriptor::scalar("String", "urn:sys", TypeKind::String)
    }

    #[test]
    fn constructor_boxes_target() {
        let s = string();
        let ty = TypeDescriptor::builder::<Pair>("Pair", "urn:app")
            .constructor(&[&s, &s], |args| Ok(Pair { a: args.string()?, b: args.string()? }))
            .build();
        let ctor = &ty.constructors()[0];
        assert_eq!(ctor.arity(), 2);
        let instance = ctor
            .invoke(vec![Value::Str("x".into()), Value::Str("y".into())])
            .unwrap();
        assert_eq!(*instance.downcast::<Pair>().unwrap(), Pair { a: "x".into(), b: "y".into() });
    }

    #[test]
    fn setter_rejects_foreign_target() {
        let s = string();
        let ty = TypeDescriptor::builder::<Pair>("Pair", "urn:app")
            .property("A", &s, |p, v| { p.a = v.into_string()?; Ok(()) })
            .read_only("B", &s)
            .build();
        let mut wrong = 5_u32;
        assert!(ty.property("A").unwrap().set(&mut wrong, Value::Str("x".into())).is_err());
        let mut pair = Pair::default();
        ty.property("A").unwrap().set(&mut pair, Value::Str("x".into())).unwrap();
        assert_eq!(pair.a, "x");
        assert!(!ty.property("B").unwrap().is_writable());
        assert!(ty.property("B").unwrap().set(&mut pair, Value::Null).is_err());
    }

    #[test]
    fn attached_kept_apart_from_instance_properties() {
        let s = string();
        let ty = TypeDescriptor::builder::<Pair>("Grid", "urn:app")
            .attached("Row", &s)
            .build();
        assert!(ty.property("Row").is_none());
        let row = ty.attached_property("Row").unwrap();
        assert_eq!(row.value_type().name(), "String");
        assert!(!row.is_writable());
        assert_eq!(ty.attached_properties().len(), 1);
    }

    #[test]
    fn identity_ignores_members() {
        let a = TypeDescriptor::builder::<Pair>("Pair", "urn:app").build();
        let b = TypeDescriptor::scalar("Pair", "urn:app", TypeKind::Object);
        assert_eq!(a, b);
    }
}
