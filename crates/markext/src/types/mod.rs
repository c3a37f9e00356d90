//! Type-system collaborator model.
//!
//! Markup names types that the binder must enumerate and construct at run
//! time. Rust has no runtime reflection, so every bindable type is described
//! by a [`TypeDescriptor`]: a registration table of constructors and
//! properties with type-erased factories and setters.

mod builder;
mod registry;
mod value;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use markext_syntax::qname::canonical_namespace;

pub use builder::TypeBuilder;
pub use registry::{SYSTEM_TYPE_NAMES, TypeRegistry};
pub use value::{Args, Value};

/// Shared handle to a descriptor.
pub type TypeRef = Arc<TypeDescriptor>;

/// A constructed, not yet downcast instance.
pub type Instance = Box<dyn Any>;

type Factory = Box<dyn Fn(&mut Args) -> anyhow::Result<Instance> + Send + Sync>;
type Setter = Box<dyn Fn(&mut dyn Any, Value) -> anyhow::Result<()> + Send + Sync>;

// ── TypeSystem ────────────────────────────────────────────────────────────

/// Looks up types by namespace identifier and bare name.
pub trait TypeSystem {
    fn find_type(&self, namespace: &str, name: &str) -> Option<TypeRef>;
}

// ── TypeKind ──────────────────────────────────────────────────────────────

/// How a string is turned into a value of this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeKind {
    /// Text target: the string passes through unconverted.
    String,
    /// Untyped object slot: the string passes through unconverted.
    Object,
    /// Type reference: the string is resolved as a qualified type name.
    Type,
    /// Everything else goes through the conversion registry.
    #[default]
    Convertible,
}

// ── TypeKey ───────────────────────────────────────────────────────────────

/// Identity of a type: canonical namespace plus name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeKey {
    pub namespace: String,
    pub name: String,
}

impl TypeKey {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self { namespace: canonical_namespace(namespace), name: name.to_string() }
    }
}

// ── Constructor ───────────────────────────────────────────────────────────

pub struct Constructor {
    params: Vec<TypeRef>,
    factory: Factory,
}

impl Constructor {
    pub fn params(&self) -> &[TypeRef] {
        &self.params
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn invoke(&self, args: Vec<Value>) -> anyhow::Result<Instance> {
        (self.factory)(&mut Args::new(args))
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<&str> = self.params.iter().map(|p| p.name()).collect();
        f.debug_struct("Constructor").field("params", &params).finish_non_exhaustive()
    }
}

// ── Property ──────────────────────────────────────────────────────────────

pub struct Property {
    name: String,
    value_type: TypeRef,
    /// `None` for read-only properties.
    setter: Option<Setter>,
}

impl Property {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> &TypeRef {
        &self.value_type
    }

    pub fn is_writable(&self) -> bool {
        self.setter.is_some()
    }

    pub fn set(&self, target: &mut dyn Any, value: Value) -> anyhow::Result<()> {
        match &self.setter {
            Some(set) => set(target, value),
            None => anyhow::bail!("property {:?} is read-only", self.name),
        }
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("value_type", &self.value_type.name())
            .field("writable", &self.is_writable())
            .finish()
    }
}

// ── TypeDescriptor ────────────────────────────────────────────────────────

/// Everything the resolver and binder need to know about one type.
///
/// Equality is identity: same canonical namespace and name.
pub struct TypeDescriptor {
    key: TypeKey,
    preferred_prefix: Option<String>,
    kind: TypeKind,
    constructors: Vec<Constructor>,
    properties: Vec<Property>,
    /// Properties this type defines for other elements (`Grid.Row`).
    attached: Vec<Property>,
}

impl TypeDescriptor {
    /// A type with no constructors or properties of its own (numbers,
    /// strings, brushes written as text, …).
    pub fn scalar(name: &str, namespace: &str, kind: TypeKind) -> TypeRef {
        Arc::new(Self::bare(name, namespace, kind))
    }

    /// Start describing the Rust type `T` under a markup name and namespace.
    pub fn builder<T: Any>(name: &str, namespace: &str) -> TypeBuilder<T> {
        TypeBuilder::new(Self::bare(name, namespace, TypeKind::Convertible))
    }

    fn bare(name: &str, namespace: &str, kind: TypeKind) -> Self {
        Self {
            key: TypeKey::new(namespace, name),
            preferred_prefix: None,
            kind,
            constructors: Vec::new(),
            properties: Vec::new(),
            attached: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.key.name
    }

    /// Canonical namespace identifier.
    pub fn namespace(&self) -> &str {
        &self.key.namespace
    }

    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    /// Prefix the type's library declares for its namespace, if any.
    pub fn preferred_prefix(&self) -> Option<&str> {
        self.preferred_prefix.as_deref()
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn constructors(&self) -> &[Constructor] {
        &self.constructors
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn attached_properties(&self) -> &[Property] {
        &self.attached
    }

    /// An attached property owned by this type. Never assigned by the binder.
    pub fn attached_property(&self, name: &str) -> Option<&Property> {
        self.attached.iter().find(|p| p.name == name)
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for TypeDescriptor {}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.key.name)
            .field("namespace", &self.key.namespace)
            .field("kind", &self.kind)
            .field("constructors", &self.constructors)
            .field("properties", &self.properties)
            .field("attached", &self.attached)
            .finish()
    }
}
