//! Prefix ⇄ namespace-identifier bindings for one resolution session.

// ── Well-known namespaces ─────────────────────────────────────────────────

/// Default namespace of presentation markup documents.
pub const PRESENTATION_NS: &str = "http://schemas.microsoft.com/winfx/2006/xaml/presentation";
/// Markup language namespace (`x:Type`, `x:Static`, `x:Key`, …).
pub const XAML_NS: &str = "http://schemas.microsoft.com/winfx/2006/xaml";
pub const DESIGNER_NS: &str = "http://schemas.microsoft.com/expression/blend/2008";
pub const MARKUP_COMPATIBILITY_NS: &str = "http://schemas.openxmlformats.org/markup-compatibility/2006";
pub const INTERACTIVITY_NS: &str = "http://schemas.microsoft.com/expression/2010/interactivity";
pub const BEHAVIORS_NS: &str = "http://schemas.microsoft.com/xaml/behaviors";
pub const PRISM_NS: &str = "http://prismlibrary.com";

/// Host-runtime `System` namespace, reference-assembly spelling.
pub const SYSTEM_NS: &str = "clr-namespace:System;assembly=System.Runtime";
/// Host-runtime `System` namespace, implementation-assembly spelling.
pub const SYSTEM_CORELIB_NS: &str = "clr-namespace:System;assembly=System.Private.CoreLib";
/// Host-runtime `System` namespace, legacy-framework spelling.
pub const SYSTEM_MSCORLIB_NS: &str = "clr-namespace:System;assembly=mscorlib";

/// Prefixes conventionally bound in presentation documents.
pub const COMMON_NAMESPACES: &[(&str, &str)] = &[
    ("x", XAML_NS),
    ("d", DESIGNER_NS),
    ("mc", MARKUP_COMPATIBILITY_NS),
    ("s", SYSTEM_NS),
    ("i", INTERACTIVITY_NS),
    ("b", BEHAVIORS_NS),
    ("prism", PRISM_NS),
];

// ── NamespaceBinding ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceBinding {
    /// `""` is the default namespace.
    pub prefix: String,
    pub namespace: String,
}

/// Outcome of [`NamespaceRegistry::resolve_or_allocate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub prefix: String,
    /// `true` if a new binding was added.
    pub was_new: bool,
}

// ── NamespaceRegistry ─────────────────────────────────────────────────────

/// Ordered set of prefix bindings, scoped to one parsing/resolution session.
///
/// No two bindings share a prefix. A namespace may be bound under several
/// prefixes; reverse lookup returns the first in registration order.
///
/// Every mutation takes `&mut self`; give each document or thread its own
/// instance, or derive one with [`inherit`](Self::inherit).
#[derive(Debug, Clone, Default)]
pub struct NamespaceRegistry {
    bindings: Vec<NamespaceBinding>,
    /// Prefix introduced by the most recent allocation in this session.
    last_allocated: Option<String>,
}

impl NamespaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the default prefix bound to [`PRESENTATION_NS`].
    pub fn presentation() -> Self {
        let mut registry = Self::new();
        registry.bind("", PRESENTATION_NS);
        registry
    }

    /// Build a registry from nested declaration scopes, innermost first.
    ///
    /// The first declaration seen for a prefix wins, so inner scopes shadow
    /// outer ones.
    pub fn from_scopes<'a, S, D>(scopes: S) -> Self
    where
        S: IntoIterator<Item = D>,
        D: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut registry = Self::new();
        for scope in scopes {
            for (prefix, namespace) in scope {
                if registry.lookup_namespace(prefix).is_none() {
                    registry.bind(prefix, namespace);
                }
            }
        }
        registry
    }

    /// A child registry for a nested context: same bindings, fresh
    /// last-allocated slot.
    pub fn inherit(&self) -> Self {
        Self { bindings: self.bindings.clone(), last_allocated: None }
    }

    /// Bind [`COMMON_NAMESPACES`].
    pub fn bind_common_namespaces(&mut self) -> &mut Self {
        for &(prefix, namespace) in COMMON_NAMESPACES {
            self.bind(prefix, namespace);
        }
        self
    }

    /// Associate `prefix` with `namespace`, replacing any binding for that
    /// exact prefix. No check is made across namespaces.
    pub fn bind(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        let prefix = prefix.into();
        let namespace = namespace.into();
        match self.bindings.iter_mut().find(|b| b.prefix == prefix) {
            Some(existing) => existing.namespace = namespace,
            None => self.bindings.push(NamespaceBinding { prefix, namespace }),
        }
    }

    /// Remove the binding for `prefix`, returning its namespace.
    pub fn unbind(&mut self, prefix: &str) -> Option<String> {
        let idx = self.bindings.iter().position(|b| b.prefix == prefix)?;
        Some(self.bindings.remove(idx).namespace)
    }

    /// Return the prefix already bound to `namespace`, or bind
    /// `suggested_prefix` (suffixed until unused) and return that.
    ///
    /// Never returns a prefix bound to a different namespace.
    pub fn resolve_or_allocate(&mut self, namespace: &str, suggested_prefix: &str) -> Allocation {
        if let Some(prefix) = self.lookup_prefix(namespace) {
            return Allocation { prefix: prefix.to_string(), was_new: false };
        }

        let mut candidate = suggested_prefix.to_string();
        while self.lookup_namespace(&candidate).is_some() {
            candidate = next_candidate(&candidate);
        }

        self.bind(candidate.clone(), namespace);
        self.last_allocated = Some(candidate.clone());
        Allocation { prefix: candidate, was_new: true }
    }

    pub fn lookup_namespace(&self, prefix: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|b| b.prefix == prefix)
            .map(|b| b.namespace.as_str())
    }

    /// First prefix (registration order) bound to `namespace`.
    pub fn lookup_prefix(&self, namespace: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|b| b.namespace == namespace)
            .map(|b| b.prefix.as_str())
    }

    /// Namespace bound to the `""` prefix.
    pub fn default_namespace(&self) -> Option<&str> {
        self.lookup_namespace("")
    }

    /// Prefix introduced by the latest allocation on this registry.
    ///
    /// `None` until the first allocation.
    pub fn last_allocated_prefix(&self) -> Option<&str> {
        self.last_allocated.as_deref()
    }

    /// Bound prefixes in registration order; `""` only if `include_default`.
    pub fn prefixes(&self, include_default: bool) -> impl Iterator<Item = &str> + '_ {
        self.bindings
            .iter()
            .map(|b| b.prefix.as_str())
            .filter(move |p| include_default || !p.is_empty())
    }

    pub fn bindings(&self) -> &[NamespaceBinding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Next collision candidate: `s` → `s1`, `s1` → `s2`, `s09` → `s10`.
pub fn next_candidate(prefix: &str) -> String {
    let stem = prefix.trim_end_matches(|c: char| c.is_ascii_digit());
    let digits = &prefix[stem.len()..];
    match digits.parse::<u64>().ok().and_then(|n| n.checked_add(1)) {
        Some(n) if !digits.is_empty() => format!("{stem}{n}"),
        _ => format!("{prefix}1"),
    }
}
