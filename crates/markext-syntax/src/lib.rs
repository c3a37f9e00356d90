//! Parser, AST and namespace-prefix registry for **markup-extension
//! expressions** (`{TypeName Arg1, Prop=Value}`).
//!
//! This crate is intentionally dependency-free so it can be consumed by
//! editor tooling and linters without pulling in the object binder.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`ast`] | `ParsedExpression`, `ParamKey`, `Param` |
//! | [`parser`] | `parse_str` entry point, `is_markup_extension` |
//! | [`namespace`] | `NamespaceRegistry`, well-known namespace constants |
//! | [`qname`] | `QualifiedName`, `ClrNamespace`, `{x:Type …}` unwrapping |
//!
//! # Quick start
//!
//! ```rust
//! use markext_syntax::parse_str;
//!
//! let expr = parse_str("{ComponentResourceKey DataGrid, ResourceId=FocusBorderBrushKey}");
//! assert_eq!(expr.type_name(), "ComponentResourceKey");
//! assert_eq!(expr.get("1"), Some(Some("DataGrid")));
//! assert_eq!(expr.get("ResourceId"), Some(Some("FocusBorderBrushKey")));
//! ```

pub mod ast;
pub mod namespace;
pub mod parser;
pub mod qname;

pub use ast::{Param, ParamKey, ParsedExpression, TYPE_KEY};
pub use namespace::{Allocation, NamespaceBinding, NamespaceRegistry};
pub use parser::{is_markup_extension, parse_str};
pub use qname::{ClrNamespace, QualifiedName};
