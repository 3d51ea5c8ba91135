//! Ownership tree: typed handles, the arena store, paths and traversal.

mod handle;
mod path;
mod store;
mod walk;

pub use handle::{DocumentRef, NodeKind, NodeRef, PropertyRef, SectionRef};
pub use store::Store;
pub use walk::Descendants;
