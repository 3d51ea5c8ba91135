//! Arena-backed storage for document trees.
//!
//! Every entity lives in one generational arena. A child stores its parent's
//! handle, a parent stores ordered lists of child handles, and the two sides
//! change together inside [`Store::set_parent`].

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::model::id::{format_id, generate_id};
use crate::model::property::normalize_attr;
use crate::model::{Document, Property, Section};
use crate::tree::{DocumentRef, NodeKind, NodeRef, PropertyRef, SectionRef};

/// Arena slot payload.
#[derive(Debug, Clone)]
pub(crate) enum Node {
    Document(Document),
    Section(Section),
    Property(Property),
}

/// Owner of every document, section and property.
///
/// Entities are addressed by typed handles. Handles of removed entities
/// resolve to `None`.
#[derive(Debug, Clone, Default)]
pub struct Store {
    arena: Arena<Node>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Creates an empty document with a generated identifier.
    pub fn create_document(&mut self) -> DocumentRef {
        self.insert_document(Document::new(None))
    }

    /// Creates a detached section. An empty name defaults to the identifier.
    pub fn create_section(&mut self, name: impl Into<String>) -> SectionRef {
        self.insert_section(Section::new(name, None))
    }

    /// Creates a detached, empty property. An empty name defaults to the
    /// identifier.
    pub fn create_property(&mut self, name: impl Into<String>) -> PropertyRef {
        self.insert_property(Property::new(name, None))
    }

    pub(crate) fn insert_document(&mut self, document: Document) -> DocumentRef {
        DocumentRef(self.arena.insert(Node::Document(document)))
    }

    pub(crate) fn insert_section(&mut self, section: Section) -> SectionRef {
        SectionRef(self.arena.insert(Node::Section(section)))
    }

    pub(crate) fn insert_property(&mut self, property: Property) -> PropertyRef {
        PropertyRef(self.arena.insert(Node::Property(property)))
    }

    // =========================================================================
    // Access
    // =========================================================================

    pub fn document(&self, r: DocumentRef) -> Option<&Document> {
        match self.arena.get(r.0) {
            Some(Node::Document(document)) => Some(document),
            _ => None,
        }
    }

    pub fn document_mut(&mut self, r: DocumentRef) -> Option<&mut Document> {
        match self.arena.get_mut(r.0) {
            Some(Node::Document(document)) => Some(document),
            _ => None,
        }
    }

    pub fn section(&self, r: SectionRef) -> Option<&Section> {
        match self.arena.get(r.0) {
            Some(Node::Section(section)) => Some(section),
            _ => None,
        }
    }

    pub fn section_mut(&mut self, r: SectionRef) -> Option<&mut Section> {
        match self.arena.get_mut(r.0) {
            Some(Node::Section(section)) => Some(section),
            _ => None,
        }
    }

    pub fn property(&self, r: PropertyRef) -> Option<&Property> {
        match self.arena.get(r.0) {
            Some(Node::Property(property)) => Some(property),
            _ => None,
        }
    }

    pub fn property_mut(&mut self, r: PropertyRef) -> Option<&mut Property> {
        match self.arena.get_mut(r.0) {
            Some(Node::Property(property)) => Some(property),
            _ => None,
        }
    }

    pub(crate) fn require_document(&self, r: DocumentRef) -> Result<&Document> {
        self.document(r)
            .ok_or(Error::UnknownEntity { kind: NodeKind::Document })
    }

    pub(crate) fn require_section(&self, r: SectionRef) -> Result<&Section> {
        self.section(r)
            .ok_or(Error::UnknownEntity { kind: NodeKind::Section })
    }

    pub(crate) fn require_section_mut(&mut self, r: SectionRef) -> Result<&mut Section> {
        self.section_mut(r)
            .ok_or(Error::UnknownEntity { kind: NodeKind::Section })
    }

    pub(crate) fn require_property(&self, r: PropertyRef) -> Result<&Property> {
        self.property(r)
            .ok_or(Error::UnknownEntity { kind: NodeKind::Property })
    }

    pub(crate) fn require_property_mut(&mut self, r: PropertyRef) -> Result<&mut Property> {
        self.property_mut(r)
            .ok_or(Error::UnknownEntity { kind: NodeKind::Property })
    }

    /// Returns true if `node` refers to a live entity of its kind.
    pub fn contains(&self, node: impl Into<NodeRef>) -> bool {
        let node = node.into();
        matches!(
            (node, self.arena.get(node.index())),
            (NodeRef::Document(_), Some(Node::Document(_)))
                | (NodeRef::Section(_), Some(Node::Section(_)))
                | (NodeRef::Property(_), Some(Node::Property(_)))
        )
    }

    fn require(&self, node: NodeRef) -> Result<()> {
        if self.contains(node) {
            Ok(())
        } else {
            Err(Error::UnknownEntity { kind: node.kind() })
        }
    }

    /// Name of a section or property; documents are unnamed.
    pub fn name_of(&self, node: impl Into<NodeRef>) -> Option<&str> {
        match node.into() {
            NodeRef::Document(_) => None,
            NodeRef::Section(r) => self.section(r).map(Section::name),
            NodeRef::Property(r) => self.property(r).map(Property::name),
        }
    }

    /// Live documents, in arena order.
    pub fn documents(&self) -> impl Iterator<Item = DocumentRef> + '_ {
        self.arena.iter().filter_map(|(index, node)| match node {
            Node::Document(_) => Some(DocumentRef(index)),
            _ => None,
        })
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Owning entity of `node`, if attached.
    pub fn parent(&self, node: impl Into<NodeRef>) -> Option<NodeRef> {
        match node.into() {
            NodeRef::Document(_) => None,
            NodeRef::Section(r) => self.section(r)?.parent,
            NodeRef::Property(r) => self.property(r)?.parent.map(NodeRef::Section),
        }
    }

    /// Sub-sections held directly by a document or section.
    pub fn child_sections(&self, parent: impl Into<NodeRef>) -> &[SectionRef] {
        match parent.into() {
            NodeRef::Document(r) => self.document(r).map(|d| d.sections.as_slice()).unwrap_or_default(),
            NodeRef::Section(r) => self.section(r).map(|s| s.sections.as_slice()).unwrap_or_default(),
            NodeRef::Property(_) => &[],
        }
    }

    /// Direct sub-section of `parent` with the given name.
    pub fn section_named(&self, parent: impl Into<NodeRef>, name: &str) -> Option<SectionRef> {
        self.child_sections(parent)
            .iter()
            .copied()
            .find(|r| self.section(*r).is_some_and(|s| s.name == name))
    }

    /// Direct property of `section` with the given name.
    pub fn property_named(&self, section: SectionRef, name: &str) -> Option<PropertyRef> {
        self.section(section)?
            .properties
            .iter()
            .copied()
            .find(|r| self.property(*r).is_some_and(|p| p.name == name))
    }

    /// The document `node` ultimately belongs to.
    pub fn document_of(&self, node: impl Into<NodeRef>) -> Option<DocumentRef> {
        let mut current = node.into();
        loop {
            match current {
                NodeRef::Document(r) => return self.contains(r).then_some(r),
                other => current = self.parent(other)?,
            }
        }
    }

    /// Topmost ancestor of `node`: its document, or a detached section or
    /// property.
    pub fn root_of(&self, node: impl Into<NodeRef>) -> NodeRef {
        let mut current = node.into();
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    fn is_ancestor_or_self(&self, ancestor: SectionRef, node: SectionRef) -> bool {
        let mut current = Some(node);
        while let Some(r) = current {
            if r == ancestor {
                return true;
            }
            current = self.section(r).and_then(|s| s.parent).and_then(NodeRef::as_section);
        }
        false
    }

    fn child_named(&self, parent: NodeRef, kind: NodeKind, name: &str) -> Option<NodeRef> {
        match kind {
            NodeKind::Section => self.section_named(parent, name).map(NodeRef::Section),
            NodeKind::Property => parent
                .as_section()
                .and_then(|s| self.property_named(s, name))
                .map(NodeRef::Property),
            NodeKind::Document => None,
        }
    }

    // =========================================================================
    // Ownership
    // =========================================================================

    /// Moves `child` under `parent`, or detaches it when `parent` is `None`.
    ///
    /// Only a section may hold a property; only a document or section may
    /// hold a section. Every check runs before the first write, so on error
    /// both the old and the new parent are unchanged.
    pub fn set_parent(&mut self, child: impl Into<NodeRef>, parent: Option<NodeRef>) -> Result<()> {
        self.reparent(child.into(), parent)
    }

    /// Moves `child` under `parent`.
    pub fn attach(&mut self, child: impl Into<NodeRef>, parent: impl Into<NodeRef>) -> Result<()> {
        self.reparent(child.into(), Some(parent.into()))
    }

    /// Detaches `child` from its parent, if any.
    pub fn detach(&mut self, child: impl Into<NodeRef>) -> Result<()> {
        self.reparent(child.into(), None)
    }

    #[instrument(level = "trace", skip(self))]
    fn reparent(&mut self, child: NodeRef, parent: Option<NodeRef>) -> Result<()> {
        self.require(child)?;
        let Some(parent) = parent else {
            self.unlink(child);
            return Ok(());
        };
        self.require(parent)?;

        let allowed = matches!(
            (child.kind(), parent.kind()),
            (NodeKind::Property, NodeKind::Section)
                | (NodeKind::Section, NodeKind::Section | NodeKind::Document)
        );
        if !allowed {
            return Err(Error::InvalidParent {
                child: child.kind(),
                parent: parent.kind(),
            });
        }
        if self.parent(child) == Some(parent) {
            return Ok(());
        }

        let name = self.name_of(child).unwrap_or_default().to_string();
        if let (NodeRef::Section(moved), NodeRef::Section(target)) = (child, parent) {
            if self.is_ancestor_or_self(moved, target) {
                return Err(Error::Cycle { name });
            }
        }
        if self.child_named(parent, child.kind(), &name).is_some() {
            return Err(Error::DuplicateName { kind: child.kind(), name });
        }

        self.unlink(child);
        self.link(child, parent);
        debug!(kind = %child.kind(), name = %name, parent = %parent.kind(), "entity reparented");
        Ok(())
    }

    /// Removes `child` from its parent's collection and clears its parent.
    fn unlink(&mut self, child: NodeRef) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        match (child, parent) {
            (NodeRef::Property(p), NodeRef::Section(s)) => {
                if let Some(section) = self.section_mut(s) {
                    section.properties.retain(|r| *r != p);
                }
            }
            (NodeRef::Section(c), NodeRef::Section(s)) => {
                if let Some(section) = self.section_mut(s) {
                    section.sections.retain(|r| *r != c);
                }
            }
            (NodeRef::Section(c), NodeRef::Document(d)) => {
                if let Some(document) = self.document_mut(d) {
                    document.sections.retain(|r| *r != c);
                }
            }
            _ => {}
        }
        self.set_parent_field(child, None);
    }

    /// Appends `child` to `parent`'s collection and records the back-link.
    /// The pair must already have been validated.
    pub(crate) fn link(&mut self, child: NodeRef, parent: NodeRef) {
        match (child, parent) {
            (NodeRef::Property(p), NodeRef::Section(s)) => {
                if let Some(section) = self.section_mut(s) {
                    section.properties.push(p);
                }
            }
            (NodeRef::Section(c), NodeRef::Section(s)) => {
                if let Some(section) = self.section_mut(s) {
                    section.sections.push(c);
                }
            }
            (NodeRef::Section(c), NodeRef::Document(d)) => {
                if let Some(document) = self.document_mut(d) {
                    document.sections.push(c);
                }
            }
            _ => return,
        }
        self.set_parent_field(child, Some(parent));
    }

    fn set_parent_field(&mut self, child: NodeRef, parent: Option<NodeRef>) {
        match child {
            NodeRef::Section(r) => {
                if let Some(section) = self.section_mut(r) {
                    section.parent = parent;
                }
            }
            NodeRef::Property(r) => {
                if let Some(property) = self.property_mut(r) {
                    property.parent = parent.and_then(NodeRef::as_section);
                }
            }
            NodeRef::Document(_) => {}
        }
    }

    /// Renames a section; the name must be unique among its siblings.
    pub fn rename_section(&mut self, r: SectionRef, name: impl Into<String>) -> Result<()> {
        let section = self.require_section(r)?;
        let name = normalize_attr(name).unwrap_or_else(|| format_id(&section.id));
        if let Some(parent) = section.parent {
            if self.section_named(parent, &name).is_some_and(|other| other != r) {
                return Err(Error::DuplicateName { kind: NodeKind::Section, name });
            }
        }
        self.require_section_mut(r)?.name = name;
        Ok(())
    }

    /// Renames a property; the name must be unique within its section.
    pub fn rename_property(&mut self, r: PropertyRef, name: impl Into<String>) -> Result<()> {
        let property = self.require_property(r)?;
        let name = normalize_attr(name).unwrap_or_else(|| format_id(&property.id));
        if let Some(parent) = property.parent {
            if self.property_named(parent, &name).is_some_and(|other| other != r) {
                return Err(Error::DuplicateName { kind: NodeKind::Property, name });
            }
        }
        self.require_property_mut(r)?.name = name;
        Ok(())
    }

    /// Detaches `node` and drops it together with its whole subtree.
    pub fn remove(&mut self, node: impl Into<NodeRef>) -> Result<()> {
        let node = node.into();
        self.require(node)?;
        self.unlink(node);
        let doomed: Vec<Index> = self.descendants(node).map(NodeRef::index).collect();
        debug!(kind = %node.kind(), count = doomed.len(), "subtree removed");
        for index in doomed {
            self.arena.remove(index);
        }
        Ok(())
    }

    // =========================================================================
    // Cloning
    // =========================================================================

    /// Copies a property under a fresh identifier. The copy is detached.
    #[instrument(level = "trace", skip(self))]
    pub fn clone_property(&mut self, r: PropertyRef) -> Result<PropertyRef> {
        let mut copy = self.require_property(r)?.clone();
        copy.id = generate_id();
        copy.parent = None;
        Ok(self.insert_property(copy))
    }

    /// Copies a section under a fresh identifier. The copy is detached and
    /// carries no merged counterpart.
    ///
    /// With `children`, every descendant is copied too, each under a fresh
    /// identifier.
    #[instrument(level = "trace", skip(self))]
    pub fn clone_section(&mut self, r: SectionRef, children: bool) -> Result<SectionRef> {
        let source = self.require_section(r)?;
        let (sub_sections, properties) = (source.sections.clone(), source.properties.clone());

        let mut copy = source.clone();
        copy.id = generate_id();
        copy.parent = None;
        copy.merged = None;
        copy.sections.clear();
        copy.properties.clear();
        let cloned = self.insert_section(copy);

        if children {
            for property in properties {
                let child = self.clone_property(property)?;
                self.link(child.into(), cloned.into());
            }
            for section in sub_sections {
                let child = self.clone_section(section, true)?;
                self.link(child.into(), cloned.into());
            }
        }
        Ok(cloned)
    }

    /// Deep-copies a document under a fresh identifier.
    #[instrument(level = "trace", skip(self))]
    pub fn clone_document(&mut self, r: DocumentRef) -> Result<DocumentRef> {
        let source = self.require_document(r)?;
        let sections = source.sections.clone();

        let mut copy = source.clone();
        copy.id = generate_id();
        copy.sections.clear();
        let cloned = self.insert_document(copy);

        for section in sections {
            let child = self.clone_section(section, true)?;
            self.link(child.into(), cloned.into());
        }
        Ok(cloned)
    }

    // =========================================================================
    // Values across entities
    // =========================================================================

    /// Appends the values of `source` to `destination`; units must agree.
    pub fn extend_property(
        &mut self,
        destination: PropertyRef,
        source: PropertyRef,
        strict: bool,
    ) -> Result<()> {
        let source = self.require_property(source)?.clone();
        self.require_property_mut(destination)?.extend_from(&source, strict)
    }
}
