//! Qualified-name resolution: type ⇄ `prefix:Name` against a
//! [`NamespaceRegistry`].

use markext_syntax::NamespaceRegistry;
use markext_syntax::namespace::COMMON_NAMESPACES;
use markext_syntax::qname::{
    ClrNamespace, QualifiedName, canonical_namespace, format_qualified, strip_type_wrapper,
};

use crate::error::ResolveError;
use crate::types::{TypeDescriptor, TypeRef, TypeSystem};

/// Prefix used when nothing better can be derived from a namespace.
pub const FALLBACK_PREFIX: &str = "ns";

// ── AliasTable ────────────────────────────────────────────────────────────

/// Reserved short prefixes for well-known namespaces, tried before any
/// derived prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    entries: Vec<(String, String)>,
}

impl AliasTable {
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// Built from [`COMMON_NAMESPACES`] (`x`, `s`, `d`, …).
    pub fn well_known() -> Self {
        let entries = COMMON_NAMESPACES
            .iter()
            .map(|&(prefix, namespace)| (canonical_namespace(namespace), prefix.to_string()))
            .collect();
        Self { entries }
    }

    /// Add or replace the alias for `namespace`.
    pub fn with(mut self, namespace: &str, prefix: impl Into<String>) -> Self {
        let namespace = canonical_namespace(namespace);
        let prefix = prefix.into();
        match self.entries.iter_mut().find(|(ns, _)| *ns == namespace) {
            Some(entry) => entry.1 = prefix,
            None => self.entries.push((namespace, prefix)),
        }
        self
    }

    /// Alias for `namespace`; the core `System` spellings all match.
    pub fn prefix_for(&self, namespace: &str) -> Option<&str> {
        let namespace = canonical_namespace(namespace);
        self.entries
            .iter()
            .find(|(ns, _)| *ns == namespace)
            .map(|(_, prefix)| prefix.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::well_known()
    }
}

// ── Resolver ──────────────────────────────────────────────────────────────

/// Maps types to qualified names and back.
///
/// The resolver itself is stateless; every call takes the session's
/// registry explicitly.
#[derive(Clone)]
pub struct Resolver<'a> {
    types: &'a dyn TypeSystem,
    aliases: AliasTable,
}

impl<'a> Resolver<'a> {
    pub fn new(types: &'a dyn TypeSystem) -> Self {
        Self { types, aliases: AliasTable::default() }
    }

    pub fn with_aliases(mut self, aliases: AliasTable) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn types(&self) -> &'a dyn TypeSystem {
        self.types
    }

    /// `prefix:Name` for `ty`, or bare `Name` in the default namespace.
    ///
    /// Without `allow_register`, fails if no prefix is bound to the type's
    /// namespace. With it, a prefix is suggested and allocated.
    pub fn qualified_name(
        &self,
        ty: &TypeDescriptor,
        registry: &mut NamespaceRegistry,
        allow_register: bool,
    ) -> Result<String, ResolveError> {
        if let Some(prefix) = bound_prefix(registry, ty.namespace()) {
            return Ok(format_qualified(prefix, ty.name()));
        }
        if !allow_register {
            return Err(ResolveError::UnboundNamespace {
                namespace: ty.namespace().to_string(),
                type_name: ty.name().to_string(),
            });
        }

        let suggested = self.suggest_prefix(ty);
        let allocation = registry.resolve_or_allocate(ty.namespace(), &suggested);
        if allocation.was_new {
            log::debug!(
                "bound prefix {:?} to {:?} for type {}",
                allocation.prefix,
                ty.namespace(),
                ty.name()
            );
        }
        Ok(format_qualified(&allocation.prefix, ty.name()))
    }

    /// Prefix to ask for when `ty`'s namespace is unbound.
    ///
    /// Alias table first, then the type's preferred prefix, then the last
    /// segment of the namespace identifier.
    pub fn suggest_prefix(&self, ty: &TypeDescriptor) -> String {
        if let Some(alias) = self.aliases.prefix_for(ty.namespace()) {
            return alias.to_string();
        }
        if let Some(preferred) = ty.preferred_prefix().filter(|p| !p.is_empty()) {
            return preferred.to_string();
        }
        derive_prefix(ty.namespace())
    }

    /// Resolve `text` (`s:Int32`, `Button`, `{x:Type s:Int32}`) to a type.
    pub fn resolve(&self, text: &str, registry: &NamespaceRegistry) -> Result<TypeRef, ResolveError> {
        let name = QualifiedName::parse(strip_type_wrapper(text));
        let namespace = match name.prefix {
            Some(prefix) => registry
                .lookup_namespace(prefix)
                .ok_or_else(|| ResolveError::UnknownPrefix { prefix: prefix.to_string() })?,
            None => registry.default_namespace().unwrap_or(""),
        };
        self.find(namespace, name.local)
    }

    /// The type an element stands for: `Button` is the `Button` type,
    /// `Button.Foreground` is the value type of `Button`'s `Foreground`.
    /// `Grid.Row` falls back to `Grid`'s attached `Row` property when `Grid`
    /// has no instance property of that name.
    ///
    /// Unknown names give `Ok(None)`, or an error when `strict`.
    pub fn representing_type(
        &self,
        element_name: &str,
        namespace: &str,
        strict: bool,
    ) -> Result<Option<TypeRef>, ResolveError> {
        let found = match element_name.split_once('.') {
            Some((owner, property)) => self.find(namespace, owner).and_then(|owner| {
                owner
                    .property(property)
                    .or_else(|| owner.attached_property(property))
                    .map(|p| p.value_type().clone())
                    .ok_or_else(|| ResolveError::NoSuchProperty {
                        type_name: owner.name().to_string(),
                        property: property.to_string(),
                    })
            }),
            None => self.find(namespace, element_name),
        };
        match found {
            Ok(ty) => Ok(Some(ty)),
            Err(e) if strict => Err(e),
            Err(_) => Ok(None),
        }
    }

    fn find(&self, namespace: &str, name: &str) -> Result<TypeRef, ResolveError> {
        self.types.find_type(namespace, name).ok_or_else(|| ResolveError::TypeNotFound {
            name: name.to_string(),
            namespace: namespace.to_string(),
        })
    }
}

impl std::fmt::Debug for Resolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver").field("aliases", &self.aliases).finish_non_exhaustive()
    }
}

/// Prefix bound to `namespace`: exact match first, then any binding whose
/// identifier is an equivalent spelling.
fn bound_prefix<'r>(registry: &'r NamespaceRegistry, namespace: &str) -> Option<&'r str> {
    registry.lookup_prefix(namespace).or_else(|| {
        registry
            .bindings()
            .iter()
            .find(|b| canonical_namespace(&b.namespace) == namespace)
            .map(|b| b.prefix.as_str())
    })
}

/// Lower-cased alphanumerics of the namespace's last segment, or
/// [`FALLBACK_PREFIX`].
fn derive_prefix(namespace: &str) -> String {
    let segment = match ClrNamespace::parse(namespace) {
        Some(clr) if !clr.namespace.is_empty() => clr.last_segment(),
        Some(clr) => clr.assembly.and_then(|a| a.rsplit('.').next()).unwrap_or(""),
        None => namespace.trim_end_matches('/').rsplit(['.', '/']).next().unwrap_or(""),
    };
    let prefix: String = segment
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();
    if prefix.is_empty() { FALLBACK_PREFIX.to_string() } else { prefix }
}

#[cfg(test)]
mod tests {
    use markext_syntax::namespace::{PRESENTATION_NS, SYSTEM_MSCORLIB_NS, SYSTEM_NS, XAML_NS};

    use super::*;
    use crate::types::{TypeKind, TypeRegistry};

    struct Button;

    fn types() -> TypeRegistry {
        let mut types = TypeRegistry::with_system_types();
        let brush = types.register(TypeDescriptor::scalar("Brush", PRESENTATION_NS, TypeKind::Convertible));
        let int = types.system("Int32").unwrap();
        types.register(
            TypeDescriptor::builder::<Button>("Button", PRESENTATION_NS)
                .constructor(&[], |_| Ok(Button))
                .read_only("Foreground", &brush)
                .build(),
        );
        types.register(
            TypeDescriptor::builder::<Button>("Grid", PRESENTATION_NS)
                .read_only("Background", &brush)
                .attached("Row", &int)
                .attached("Background", &int)
                .build(),
        );
        types.register(TypeDescriptor::scalar("Widget", "clr-namespace:Acme.Controls;assembly=Acme", TypeKind::Object));
        types.register(
            TypeDescriptor::builder::<Button>("Gadget", "clr-namespace:Acme.Gadgets;assembly=Acme")
                .preferred_prefix("gx")
                .build(),
        );
        types
    }

    #[test]
    fn default_namespace_is_bare() {
        let types = types();
        let resolver = Resolver::new(&types);
        let mut reg = NamespaceRegistry::presentation();
        let button = types.find_type(PRESENTATION_NS, "Button").unwrap();
        assert_eq!(resolver.qualified_name(&button, &mut reg, false).unwrap(), "Button");
        assert_eq!(reg.last_allocated_prefix(), None);
    }

    #[test]
    fn system_type_gets_alias() {
        let types = types();
        let resolver = Resolver::new(&types);
        let mut reg = NamespaceRegistry::presentation();
        let int = types.system("Int32").unwrap();
        assert_eq!(resolver.qualified_name(&int, &mut reg, true).unwrap(), "s:Int32");
        assert_eq!(reg.last_allocated_prefix(), Some("s"));
    }

    #[test]
    fn alias_collision_increments_suffix() {
        let types = types();
        let resolver = Resolver::new(&types);
        let mut reg = NamespaceRegistry::presentation();
        reg.bind("s", "reserved");
        let int = types.system("Int32").unwrap();
        assert_eq!(resolver.qualified_name(&int, &mut reg, true).unwrap(), "s1:Int32");
        assert_eq!(reg.last_allocated_prefix(), Some("s1"));
    }

    #[test]
    fn unbound_without_permission_fails() {
        let types = types();
        let resolver = Resolver::new(&types);
        let mut reg = NamespaceRegistry::presentation();
        let int = types.system("Int32").unwrap();
        let err = resolver.qualified_name(&int, &mut reg, false).unwrap_err();
        assert!(matches!(err, ResolveError::UnboundNamespace { .. }));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn equivalent_spelling_reuses_binding() {
        let types = types();
        let resolver = Resolver::new(&types);
        let mut reg = NamespaceRegistry::new();
        reg.bind("sys", SYSTEM_MSCORLIB_NS);
        let int = types.system("Int32").unwrap();
        assert_eq!(resolver.qualified_name(&int, &mut reg, false).unwrap(), "sys:Int32");
    }

    #[test]
    fn prefix_derivation_order() {
        let types = types();
        let resolver = Resolver::new(&types);
        let widget = types.find_type("clr-namespace:Acme.Controls;assembly=Acme", "Widget").unwrap();
        let gadget = types.find_type("clr-namespace:Acme.Gadgets;assembly=Acme", "Gadget").unwrap();
        assert_eq!(resolver.suggest_prefix(&widget), "controls");
        assert_eq!(resolver.suggest_prefix(&gadget), "gx");
        let aliased = resolver.clone().with_aliases(AliasTable::empty().with("clr-namespace:Acme.Gadgets;assembly=Acme", "g"));
        assert_eq!(aliased.suggest_prefix(&gadget), "g");
    }

    #[test]
    fn derive_from_identifiers() {
        assert_eq!(derive_prefix("http://schemas.acme.com/ui/Controls/"), "controls");
        assert_eq!(derive_prefix("urn:acme.My-Lib"), "mylib");
        assert_eq!(derive_prefix("clr-namespace:;assembly=Acme.Core"), "core");
        assert_eq!(derive_prefix("///"), FALLBACK_PREFIX);
    }

    #[test]
    fn resolve_prefixed_and_default() {
        let types = types();
        let resolver = Resolver::new(&types);
        let mut reg = NamespaceRegistry::presentation();
        reg.bind("s", SYSTEM_NS);
        assert_eq!(resolver.resolve("s:Int32", &reg).unwrap().name(), "Int32");
        assert_eq!(resolver.resolve("{x:Type s:Int32}", &reg).unwrap().name(), "Int32");
        assert_eq!(resolver.resolve("Button", &reg).unwrap().name(), "Button");
        assert!(matches!(resolver.resolve("q:Int32", &reg), Err(ResolveError::UnknownPrefix { .. })));
        assert!(matches!(resolver.resolve("Nope", &reg), Err(ResolveError::TypeNotFound { .. })));
    }

    #[test]
    fn no_default_namespace_means_not_found() {
        let types = types();
        let resolver = Resolver::new(&types);
        let reg = NamespaceRegistry::new();
        assert!(matches!(resolver.resolve("Button", &reg), Err(ResolveError::TypeNotFound { .. })));
    }

    #[test]
    fn round_trip_through_allocation() {
        let types = types();
        let resolver = Resolver::new(&types);
        let mut reg = NamespaceRegistry::presentation();
        reg.bind("x", XAML_NS);
        for ty in [
            types.system("Double").unwrap(),
            types.find_type("clr-namespace:Acme.Controls;assembly=Acme", "Widget").unwrap(),
            types.find_type(PRESENTATION_NS, "Button").unwrap(),
        ] {
            let name = resolver.qualified_name(&ty, &mut reg, true).unwrap();
            assert_eq!(resolver.resolve(&name, &reg).unwrap(), ty);
        }
    }

    #[test]
    fn representing_types() {
        let types = types();
        let resolver = Resolver::new(&types);
        let button = resolver.representing_type("Button", PRESENTATION_NS, true).unwrap().unwrap();
        assert_eq!(button.name(), "Button");
        let brush = resolver.representing_type("Button.Foreground", PRESENTATION_NS, true).unwrap().unwrap();
        assert_eq!(brush.name(), "Brush");
        let int = resolver.representing_type("Int32", SYSTEM_MSCORLIB_NS, false).unwrap().unwrap();
        assert_eq!(int.name(), "Int32");

        assert!(resolver.representing_type("UnknownElement", PRESENTATION_NS, false).unwrap().is_none());
        assert!(resolver.representing_type("UnknownElement", PRESENTATION_NS, true).is_err());
        assert!(matches!(
            resolver.representing_type("Button.Missing", PRESENTATION_NS, true),
            Err(ResolveError::NoSuchProperty { .. })
        ));
    }

    #[test]
    fn attached_property_elements() {
        let types = types();
        let resolver = Resolver::new(&types);
        let row = resolver.representing_type("Grid.Row", PRESENTATION_NS, true).unwrap().unwrap();
        assert_eq!(row.name(), "Int32");
        // instance property wins over an attached one of the same name
        let bg = resolver.representing_type("Grid.Background", PRESENTATION_NS, true).unwrap().unwrap();
        assert_eq!(bg.name(), "Brush");
        assert!(resolver.representing_type("Grid.Column", PRESENTATION_NS, false).unwrap().is_none());
    }
}
