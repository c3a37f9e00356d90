//! One document-processing context: a namespace registry plus everything
//! that resolves and binds against it.

use std::any::Any;

use markext_syntax::{NamespaceRegistry, ParsedExpression, parse_str};

use crate::binder::Binder;
use crate::convert::ConversionRegistry;
use crate::error::{BindError, ResolveError};
use crate::resolver::{AliasTable, Resolver};
use crate::resource_key::ResourceKey;
use crate::types::{Instance, TypeDescriptor, TypeRef, TypeSystem};

/// Suffix tried when an extension type name is not found as written.
pub const EXTENSION_SUFFIX: &str = "Extension";

// ── SessionConfig ─────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub aliases: AliasTable,
    /// Bind the common prefixes (`x`, `d`, `mc`, `s`, …) in a fresh session.
    pub common_namespaces: bool,
    /// Resolve `{Name …}` to `NameExtension` when `Name` is not a type.
    pub extension_suffix: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { aliases: AliasTable::default(), common_namespaces: false, extension_suffix: true }
    }
}

impl SessionConfig {
    pub fn with_aliases(mut self, aliases: AliasTable) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn with_common_namespaces(mut self, enabled: bool) -> Self {
        self.common_namespaces = enabled;
        self
    }

    pub fn with_extension_suffix(mut self, enabled: bool) -> Self {
        self.extension_suffix = enabled;
        self
    }
}

// ── Session ───────────────────────────────────────────────────────────────

/// Resolution and binding against one owned [`NamespaceRegistry`].
///
/// A fresh session binds the default prefix to the presentation namespace.
#[derive(Debug)]
pub struct Session<'a> {
    resolver: Resolver<'a>,
    conversions: &'a ConversionRegistry,
    registry: NamespaceRegistry,
    extension_suffix: bool,
}

impl<'a> Session<'a> {
    pub fn new(types: &'a dyn TypeSystem, conversions: &'a ConversionRegistry) -> Self {
        Self::with_config(types, conversions, SessionConfig::default())
    }

    pub fn with_config(types: &'a dyn TypeSystem, conversions: &'a ConversionRegistry, config: SessionConfig) -> Self {
        let mut registry = NamespaceRegistry::presentation();
        if config.common_namespaces {
            registry.bind_common_namespaces();
        }
        Self {
            resolver: Resolver::new(types).with_aliases(config.aliases),
            conversions,
            registry,
            extension_suffix: config.extension_suffix,
        }
    }

    /// Replace the session's registry, e.g. with one built from a
    /// document's declaration scopes.
    pub fn with_registry(mut self, registry: NamespaceRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// A session for a nested context: inherited bindings, fresh
    /// last-allocated slot.
    pub fn child(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
            conversions: self.conversions,
            registry: self.registry.inherit(),
            extension_suffix: self.extension_suffix,
        }
    }

    pub fn registry(&self) -> &NamespaceRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut NamespaceRegistry {
        &mut self.registry
    }

    pub fn resolver(&self) -> &Resolver<'a> {
        &self.resolver
    }

    pub fn binder(&self) -> Binder<'_> {
        Binder::new(&self.resolver, self.conversions)
    }

    /// Prefix introduced by the latest allocation in this session.
    pub fn last_allocated_prefix(&self) -> Option<&str> {
        self.registry.last_allocated_prefix()
    }

    // ── names ─────────────────────────────────────────────────────────────

    pub fn qualified_name(&mut self, ty: &TypeDescriptor, allow_register: bool) -> Result<String, ResolveError> {
        self.resolver.qualified_name(ty, &mut self.registry, allow_register)
    }

    pub fn resolve_type(&self, text: &str) -> Result<TypeRef, ResolveError> {
        self.resolver.resolve(text, &self.registry)
    }

    /// The type an expression's `@Type` names, with the `Extension` suffix
    /// fallback when enabled. A failed fallback reports the first error.
    pub fn extension_type(&self, type_name: &str) -> Result<TypeRef, ResolveError> {
        match self.resolve_type(type_name) {
            Ok(ty) => Ok(ty),
            Err(first) if self.extension_suffix => self
                .resolve_type(&format!("{type_name}{EXTENSION_SUFFIX}"))
                .map_err(|_| first),
            Err(e) => Err(e),
        }
    }

    pub fn resource_key_string(&mut self, key: &ResourceKey) -> Result<String, ResolveError> {
        key.to_markup(&self.resolver, &mut self.registry)
    }

    // ── binding ───────────────────────────────────────────────────────────

    pub fn parse(&self, text: &str) -> ParsedExpression {
        parse_str(text)
    }

    /// Parse `text` and bind it to `ty`, ignoring the written type name.
    pub fn bind_as<T: Any>(&self, text: &str, ty: &TypeDescriptor) -> Result<T, BindError> {
        self.binder().bind(&parse_str(text), ty, &self.registry)
    }

    /// Parse `text`, resolve its type name and bind.
    pub fn bind_instance(&self, text: &str) -> Result<Instance, BindError> {
        let expr = parse_str(text);
        let ty = self.extension_type(expr.type_name())?;
        self.binder().bind_instance(&expr, &ty, &self.registry)
    }

    /// [`bind_instance`](Self::bind_instance), downcast to `T`.
    pub fn bind<T: Any>(&self, text: &str) -> Result<T, BindError> {
        let expr = parse_str(text);
        let ty = self.extension_type(expr.type_name())?;
        self.binder().bind(&expr, &ty, &self.registry)
    }
}
