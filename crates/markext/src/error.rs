//! Error taxonomy.
//!
//! [`ResolveError`] and [`BindError`] are surfaced to callers.
//! [`ConversionError`] is the failure arm of a single conversion attempt; the
//! binder consumes it to abandon one constructor or property and moves on.

/// Qualified-name generation or resolution failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// No prefix is bound to the namespace and registration was not allowed.
    #[error("namespace {namespace:?} of type {type_name:?} has no bound prefix")]
    UnboundNamespace { namespace: String, type_name: String },
    /// A prefixed name used a prefix the registry does not know.
    #[error("unknown namespace prefix {prefix:?}")]
    UnknownPrefix { prefix: String },
    /// The type system has no such type in the resolved namespace.
    #[error("type {name:?} not found in namespace {namespace:?}")]
    TypeNotFound { name: String, namespace: String },
    /// A property element (`Owner.Property`) named a missing property.
    #[error("type {type_name:?} has no property {property:?}")]
    NoSuchProperty { type_name: String, property: String },
}

/// Binding a parsed expression to an instance failed.
#[derive(Debug, thiserror::Error)]
pub enum BindError {
    /// Every constructor with a matching arity failed (or none exists).
    #[error("no constructor of {type_name:?} accepts {arity} positional argument(s)")]
    NoMatchingConstructor { type_name: String, arity: usize },
    /// The extension type itself could not be resolved.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    /// The descriptor built a value of a different Rust type than requested.
    #[error("descriptor {type_name:?} does not construct the requested Rust type")]
    UnexpectedInstance { type_name: String },
}

/// One string-to-value conversion failed.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("no converter registered for {target:?}")]
    NoConverter { target: String },
    #[error("converter for {target:?} rejected {input:?}")]
    Rejected {
        target: String,
        input: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("{target:?} requires a value")]
    NullValue { target: String },
    #[error(transparent)]
    Unresolved(#[from] ResolveError),
}
