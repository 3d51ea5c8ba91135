//! Consistency checks over a whole tree.
//!
//! The store keeps parent links and sibling names consistent on its own.
//! Value homogeneity is different: non-strict appends and lenient merges
//! are allowed to leave a property holding values of another dtype. This
//! module reports such drift, along with any structural damage.

use rustc_hash::FxHashSet;

use crate::error::ValidationError;
use crate::model::dtype::coerce;
use crate::model::Property;
use crate::tree::{NodeKind, NodeRef, Store};

/// Validates `root` and everything below it, reporting the first problem
/// in pre-order.
pub fn validate_tree(store: &Store, root: impl Into<NodeRef>) -> Result<(), ValidationError> {
    for node in store.descendants(root) {
        match node {
            NodeRef::Property(r) => {
                if let Some(property) = store.property(r) {
                    validate_values(store, node, property)?;
                }
            }
            parent => validate_children(store, parent)?,
        }
    }
    Ok(())
}

fn path_of(store: &Store, node: NodeRef) -> String {
    store.path(node).unwrap_or_default()
}

/// Checks back-links and name uniqueness of a parent's direct children.
fn validate_children(store: &Store, parent: NodeRef) -> Result<(), ValidationError> {
    let properties = parent
        .as_section()
        .and_then(|r| store.section(r))
        .map(|s| s.properties().iter().copied().map(NodeRef::Property).collect::<Vec<_>>())
        .unwrap_or_default();
    let sections = store.child_sections(parent).iter().copied().map(NodeRef::Section);

    let mut seen: FxHashSet<(NodeKind, &str)> = FxHashSet::default();
    for child in properties.into_iter().chain(sections) {
        if store.parent(child) != Some(parent) {
            return Err(ValidationError::BrokenParentLink {
                child: child.kind(),
                path: path_of(store, parent),
            });
        }
        let name = store.name_of(child).unwrap_or_default();
        if !seen.insert((child.kind(), name)) {
            return Err(ValidationError::DuplicateSibling {
                kind: child.kind(),
                name: name.to_string(),
                path: path_of(store, parent),
            });
        }
    }
    Ok(())
}

/// Every value must already be in the form the declared dtype produces.
fn validate_values(store: &Store, node: NodeRef, property: &Property) -> Result<(), ValidationError> {
    if property.is_empty() {
        return Ok(());
    }
    let Some(dtype) = property.dtype() else {
        return Err(ValidationError::MissingDType { path: path_of(store, node) });
    };
    for (index, value) in property.iter().enumerate() {
        if !coerce(value, dtype).is_ok_and(|converted| converted.is_same(value)) {
            return Err(ValidationError::HeterogeneousValues {
                path: path_of(store, node),
                index,
                dtype,
            });
        }
    }
    Ok(())
}
