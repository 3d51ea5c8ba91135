//! metadoc: strongly typed hierarchical metadata documents.
//!
//! A metadata document is a tree. A [`Document`] holds [`Section`]s,
//! sections nest and hold [`Property`]s, and every property carries an
//! ordered list of values that all share one [`DType`].
//!
//! # Overview
//!
//! - **Typed values**: a closed dtype vocabulary (`int`, `float`, `string`,
//!   `boolean`, `date`, `time`, `datetime`, `url`, `person`, `text` and
//!   `N-tuple`) with inference from raw text and all-or-nothing coercion
//! - **Ownership tree**: entities live in an arena [`Store`] and are
//!   addressed by typed handles; reparenting keeps both sides consistent
//! - **Merging**: properties and whole section subtrees merge with
//!   attribute reconciliation and no partial mutation on conflict
//!
//! # Quick Start
//!
//! ```rust
//! use metadoc::{DType, MergeOptions, PropertyBuilder, Store, Value};
//!
//! let mut store = Store::new();
//! let doc = store.create_document();
//! let section = store.create_section("recording");
//! store.attach(section, doc).unwrap();
//!
//! let flags = PropertyBuilder::new("flags")
//!     .value(vec![1, 0, 1, 0, 1])
//!     .parent(section)
//!     .build(&mut store)
//!     .unwrap();
//! assert_eq!(store.path(flags).unwrap(), "/recording:flags");
//!
//! let property = store.property_mut(flags).unwrap();
//! assert_eq!(property.dtype(), Some(DType::Int));
//! property.set_dtype(DType::Boolean).unwrap();
//! assert_eq!(property[0], Value::Bool(true));
//!
//! let more = PropertyBuilder::new("flags").value(vec![true, true]).build(&mut store).unwrap();
//! store.merge_properties(flags, more, MergeOptions::new()).unwrap();
//! assert_eq!(store.property(flags).unwrap().len(), 7);
//! ```
//!
//! # Modules
//!
//! - [`model`]: Entities, dtypes, values and builders
//! - [`tree`]: The arena store, handles, paths and traversal
//! - [`merge`]: The merge engine
//! - [`validate`]: Whole-tree consistency checks
//! - [`error`]: Error types
//! - [`util`]: Date and time text formats

pub mod error;
pub mod merge;
pub mod model;
pub mod tree;
pub mod util;
pub mod validate;

// Re-export commonly used types at crate root
pub use error::{Error, ErrorKind, Result, ValidationError};
pub use merge::{merge_property, MergeOptions};
pub use model::{
    DType, Document, DocumentBuilder, Id, IntoDType, Property, PropertyBuilder, Section,
    SectionBuilder, Value, ValueInput,
};
pub use model::id::{format_id, generate_id, is_valid_id, parse_id};
pub use tree::{Descendants, DocumentRef, NodeKind, NodeRef, PropertyRef, SectionRef, Store};
pub use validate::validate_tree;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
