use std::collections::HashMap;
use std::sync::Arc;

use markext_syntax::namespace::SYSTEM_NS;

use super::{TypeDescriptor, TypeKey, TypeKind, TypeRef, TypeSystem};

/// Scalar types registered by [`TypeRegistry::with_system_types`].
pub const SYSTEM_TYPE_NAMES: &[(&str, TypeKind)] = &[
    ("String", TypeKind::String),
    ("Object", TypeKind::Object),
    ("Type", TypeKind::Type),
    ("Boolean", TypeKind::Convertible),
    ("Int32", TypeKind::Convertible),
    ("Int64", TypeKind::Convertible),
    ("Double", TypeKind::Convertible),
];

/// In-memory [`TypeSystem`]: a registration table keyed by canonical
/// namespace and name.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: HashMap<TypeKey, TypeRef>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with [`SYSTEM_TYPE_NAMES`] in [`SYSTEM_NS`].
    pub fn with_system_types() -> Self {
        let mut registry = Self::new();
        for &(name, kind) in SYSTEM_TYPE_NAMES {
            registry.register(TypeDescriptor::scalar(name, SYSTEM_NS, kind));
        }
        registry
    }

    /// Register a type, replacing any earlier one with the same identity.
    /// Returns the handle for chaining into other descriptors.
    pub fn register(&mut self, ty: TypeRef) -> TypeRef {
        self.types.insert(ty.key().clone(), Arc::clone(&ty));
        ty
    }

    /// A type from the `System` namespace, e.g. `system("Int32")`.
    pub fn system(&self, name: &str) -> Option<TypeRef> {
        self.find_type(SYSTEM_NS, name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeSystem for TypeRegistry {
    fn find_type(&self, namespace: &str, name: &str) -> Option<TypeRef> {
        self.types.get(&TypeKey::new(namespace, name)).cloned()
    }
}
