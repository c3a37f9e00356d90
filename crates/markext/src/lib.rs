//! markext: resolves and binds markup-extension expressions on top of
//! `markext-syntax`.
//!
//! # Quick start
//!
//! ```rust
//! use markext::prelude::*;
//!
//! #[derive(Debug, Default)]
//! struct StaticExtension { member: String }
//!
//! let mut types = TypeRegistry::with_system_types();
//! let string = types.system("String").unwrap();
//! types.register(
//!     TypeDescriptor::builder::<StaticExtension>("StaticExtension", XAML_NS)
//!         .constructor(&[&string], |args| Ok(StaticExtension { member: args.string()? }))
//!         .build(),
//! );
//! let conversions = ConversionRegistry::with_system_converters(&types);
//!
//! let mut session = Session::new(&types, &conversions);
//! session.registry_mut().bind("x", XAML_NS);
//!
//! // `x:Static` falls back to `x:StaticExtension`
//! let ext: StaticExtension = session.bind("{x:Static SystemColors.WindowBrushKey}").unwrap();
//! assert_eq!(ext.member, "SystemColors.WindowBrushKey");
//! ```
//!
//! Types are described to the binder with [`types::TypeDescriptor`]; string
//! values reach typed constructor parameters and properties through
//! [`convert::ConversionRegistry`].

pub mod binder;
pub mod convert;
pub mod error;
pub mod logging;
pub mod resolver;
pub mod resource_key;
pub mod session;
pub mod types;

pub use markext_syntax as syntax;

pub use binder::Binder;
pub use error::{BindError, ConversionError, ResolveError};
pub use resolver::{AliasTable, Resolver};
pub use session::{Session, SessionConfig};

/// Common imports for registering types and binding expressions.
pub mod prelude {
    pub use crate::binder::Binder;
    pub use crate::convert::ConversionRegistry;
    pub use crate::error::{BindError, ConversionError, ResolveError};
    pub use crate::logging::{LoggingConfig, init_logging};
    pub use crate::resolver::{AliasTable, Resolver};
    pub use crate::resource_key::ResourceKey;
    pub use crate::session::{Session, SessionConfig};
    pub use crate::types::{Args, TypeDescriptor, TypeKind, TypeRef, TypeRegistry, TypeSystem, Value};

    // Syntax layer.
    pub use markext_syntax::namespace::{PRESENTATION_NS, SYSTEM_NS, XAML_NS};
    pub use markext_syntax::{NamespaceRegistry, ParsedExpression, parse_str};
}
