//! Resource keys written back as markup text.

use std::fmt;

use markext_syntax::NamespaceRegistry;
use markext_syntax::namespace::XAML_NS;

use crate::error::ResolveError;
use crate::resolver::Resolver;
use crate::types::TypeRef;

/// Prefix requested for the markup language namespace.
const XAML_PREFIX: &str = "x";

#[derive(Clone, PartialEq, Eq)]
pub enum ResourceKey {
    /// A plain string key.
    Name(String),
    /// A type used as key, written as `{x:Type …}`.
    Type(TypeRef),
    /// A key scoped to the library that defines `type_in_target_assembly`.
    Component { type_in_target_assembly: TypeRef, resource_id: String },
}

impl ResourceKey {
    pub fn component(type_in_target_assembly: TypeRef, resource_id: impl Into<String>) -> Self {
        Self::Component { type_in_target_assembly, resource_id: resource_id.into() }
    }

    /// Markup text for this key. Prefixes for any referenced namespace are
    /// allocated in `registry` as needed.
    pub fn to_markup(&self, resolver: &Resolver<'_>, registry: &mut NamespaceRegistry) -> Result<String, ResolveError> {
        match self {
            Self::Name(name) => Ok(name.clone()),
            Self::Type(ty) => {
                let name = resolver.qualified_name(ty, registry, true)?;
                let x = xaml_prefix(registry);
                Ok(format!("{{{x}:Type {name}}}"))
            }
            Self::Component { type_in_target_assembly, resource_id } => {
                let name = resolver.qualified_name(type_in_target_assembly, registry, true)?;
                if !name.contains(':') {
                    return Ok(format!("{{ComponentResourceKey {name}, {resource_id}}}"));
                }
                let x = xaml_prefix(registry);
                Ok(format!("{{ComponentResourceKey {{{x}:Type {name}}}, {resource_id}}}"))
            }
        }
    }
}

fn xaml_prefix(registry: &mut NamespaceRegistry) -> String {
    let allocation = registry.resolve_or_allocate(XAML_NS, XAML_PREFIX);
    if allocation.was_new {
        log::debug!("bound prefix {:?} to {XAML_NS:?}", allocation.prefix);
    }
    allocation.prefix
}

impl fmt::Debug for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.debug_tuple("Name").field(name).finish(),
            Self::Type(ty) => f.debug_tuple("Type").field(&ty.name()).finish(),
            Self::Component { type_in_target_assembly, resource_id } => f
                .debug_struct("Component")
                .field("type_in_target_assembly", &type_in_target_assembly.name())
                .field("resource_id", resource_id)
                .finish(),
        }
    }
}

impl From<&str> for ResourceKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<TypeRef> for ResourceKey {
    fn from(ty: TypeRef) -> Self {
        Self::Type(ty)
    }
}
