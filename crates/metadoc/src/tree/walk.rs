//! Pre-order traversal of a subtree.

use crate::tree::{NodeRef, Store};

/// Pre-order iterator over a node and everything below it.
///
/// A section yields itself, then its properties, then each sub-section's
/// subtree, all in insertion order.
pub struct Descendants<'a> {
    store: &'a Store,
    stack: Vec<NodeRef>,
}

impl<'a> Descendants<'a> {
    fn new(store: &'a Store, root: NodeRef) -> Self {
        let mut stack = Vec::new();
        if store.contains(root) {
            stack.push(root);
        }
        Self { store, stack }
    }
}

impl Iterator for Descendants<'_> {
    type Item = NodeRef;

    fn next(&mut self) -> Option<NodeRef> {
        let current = self.stack.pop()?;
        // Push in reverse so children come out left to right.
        self.stack
            .extend(self.store.child_sections(current).iter().rev().copied().map(NodeRef::Section));
        if let Some(section) = current.as_section().and_then(|r| self.store.section(r)) {
            self.stack
                .extend(section.properties().iter().rev().copied().map(NodeRef::Property));
        }
        Some(current)
    }
}

impl Store {
    /// Walks `root` and its whole subtree in pre-order. A stale `root`
    /// yields nothing.
    pub fn descendants(&self, root: impl Into<NodeRef>) -> Descendants<'_> {
        Descendants::new(self, root.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preorder() {
        let mut store = Store::new();
        let doc = store.create_document();
        let a = store.create_section("a");
        let b = store.create_section("b");
        let a1 = store.create_section("a1");
        let p = store.create_property("p");
        store.attach(a, doc).unwrap();
        store.attach(b, doc).unwrap();
        store.attach(a1, a).unwrap();
        store.attach(p, a).unwrap();

        let order: Vec<NodeRef> = store.descendants(doc).collect();
        let expected: Vec<NodeRef> = vec![doc.into(), a.into(), p.into(), a1.into(), b.into()];
        assert_eq!(order, expected);
        assert_eq!(store.descendants(a1).count(), 1);
    }
}
