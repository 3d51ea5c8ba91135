//! Data model types.
//!
//! This module contains the entities of a metadata tree and their values:
//! - Identifiers (UUIDs)
//! - DTypes (the value type vocabulary) and coercion
//! - Values and value inputs
//! - Documents, sections and properties
//! - Builders (ergonomic construction)

pub mod builder;
pub mod document;
pub mod dtype;
pub mod id;
pub mod property;
pub mod section;
pub mod value;

pub use builder::{DocumentBuilder, PropertyBuilder, SectionBuilder};
pub use document::Document;
pub use dtype::{DType, IntoDType};
pub use id::{format_id, generate_id, is_valid_id, parse_id, Id};
pub use property::Property;
pub use section::Section;
pub use value::{Value, ValueInput};
