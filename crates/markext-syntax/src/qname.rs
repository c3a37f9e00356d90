use std::fmt;

// ── QualifiedName ─────────────────────────────────────────────────────────

/// A possibly prefixed type name: `s:Int32`, `Button`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName<'s> {
    /// `None` when no `:` was written (the default namespace applies).
    pub prefix: Option<&'s str>,
    pub local: &'s str,
}

impl<'s> QualifiedName<'s> {
    /// Split on the first `:`.
    pub fn parse(text: &'s str) -> Self {
        let text = text.trim();
        match text.split_once(':') {
            Some((prefix, local)) => Self { prefix: Some(prefix.trim()), local: local.trim() },
            None => Self { prefix: None, local: text },
        }
    }

    /// Prefix used for registry lookup (`""` for the default namespace).
    pub fn lookup_prefix(&self) -> &'s str {
        self.prefix.unwrap_or("")
    }
}

impl fmt::Display for QualifiedName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_qualified(self.lookup_prefix(), self.local))
    }
}

/// `prefix:local`, or just `local` for the empty prefix.
pub fn format_qualified(prefix: &str, local: &str) -> String {
    if prefix.is_empty() {
        local.to_string()
    } else {
        format!("{prefix}:{local}")
    }
}

const TYPE_EXTENSION: &str = ":Type";

/// Strip an enclosing `{x:Type …}` wrapper, if present.
///
/// Any prefix is accepted in place of `x` (`{x1:Type …}` after a prefix
/// collision); the registry is not consulted.
pub fn strip_type_wrapper(text: &str) -> &str {
    let text = text.trim();
    let Some(body) = text.strip_prefix('{') else { return text };
    let Some((head, inner)) = body.split_once(char::is_whitespace) else { return text };
    let is_type_extension = head
        .strip_suffix(TYPE_EXTENSION)
        .is_some_and(|prefix| !prefix.is_empty() && !prefix.contains(':'));
    if !is_type_extension {
        return text;
    }
    inner.strip_suffix('}').unwrap_or(inner).trim()
}

// ── ClrNamespace ──────────────────────────────────────────────────────────

const CLR_SCHEME: &str = "clr-namespace:";
const ASSEMBLY_KEY: &str = "assembly=";

/// Core-library assembly spellings that name the same host namespace set.
pub const CORE_ASSEMBLIES: &[&str] = &["System.Runtime", "System.Private.CoreLib", "mscorlib"];

/// A host-runtime namespace identifier: `clr-namespace:Path;assembly=Asm`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClrNamespace<'s> {
    pub namespace: &'s str,
    pub assembly: Option<&'s str>,
}

impl<'s> ClrNamespace<'s> {
    /// `None` if `id` is not a `clr-namespace:` identifier.
    pub fn parse(id: &'s str) -> Option<Self> {
        let rest = id.trim().strip_prefix(CLR_SCHEME)?;
        let mut parts = rest.split(';');
        let namespace = parts.next().unwrap_or("").trim();
        let assembly = parts
            .find_map(|p| p.trim().strip_prefix(ASSEMBLY_KEY))
            .map(str::trim);
        Some(Self { namespace, assembly })
    }

    /// Last `.` segment of the namespace path.
    pub fn last_segment(&self) -> &'s str {
        self.namespace.rsplit('.').next().unwrap_or(self.namespace)
    }

    pub fn is_core_assembly(&self) -> bool {
        self.assembly.is_some_and(|a| CORE_ASSEMBLIES.contains(&a))
    }

    /// Canonical identifier: core-library assemblies collapse to
    /// `System.Runtime`, so the three spellings of `System` compare equal.
    pub fn canonical(&self) -> String {
        let assembly = if self.is_core_assembly() { Some(CORE_ASSEMBLIES[0]) } else { self.assembly };
        ClrNamespace { namespace: self.namespace, assembly }.to_string()
    }
}

impl fmt::Display for ClrNamespace<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CLR_SCHEME}{}", self.namespace)?;
        if let Some(assembly) = self.assembly {
            write!(f, ";{ASSEMBLY_KEY}{assembly}")?;
        }
        Ok(())
    }
}

/// Canonical form of any namespace identifier (see [`ClrNamespace::canonical`]).
/// Non-`clr-namespace` identifiers are returned unchanged.
pub fn canonical_namespace(id: &str) -> String {
    match ClrNamespace::parse(id) {
        Some(clr) => clr.canonical(),
        None => id.to_string(),
    }
}
