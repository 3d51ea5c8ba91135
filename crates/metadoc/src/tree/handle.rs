//! Typed handles into a [`Store`](super::Store).
//!
//! A handle is a generational arena index tagged with the kind of entity it
//! points at. Handles are `Copy`; once their entity is removed they resolve
//! to `None` instead of aliasing a newer entity.

use std::fmt;

use generational_arena::Index;

/// Handle to a [`Document`](crate::model::Document).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentRef(pub(crate) Index);

/// Handle to a [`Section`](crate::model::Section).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionRef(pub(crate) Index);

/// Handle to a [`Property`](crate::model::Property).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyRef(pub(crate) Index);

/// Handle to any tree entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    Document(DocumentRef),
    Section(SectionRef),
    Property(PropertyRef),
}

/// The three kinds of tree entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Section,
    Property,
}

impl NodeRef {
    pub fn kind(self) -> NodeKind {
        match self {
            NodeRef::Document(_) => NodeKind::Document,
            NodeRef::Section(_) => NodeKind::Section,
            NodeRef::Property(_) => NodeKind::Property,
        }
    }

    pub(crate) fn index(self) -> Index {
        match self {
            NodeRef::Document(r) => r.0,
            NodeRef::Section(r) => r.0,
            NodeRef::Property(r) => r.0,
        }
    }

    pub fn as_section(self) -> Option<SectionRef> {
        match self {
            NodeRef::Section(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_document(self) -> Option<DocumentRef> {
        match self {
            NodeRef::Document(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_property(self) -> Option<PropertyRef> {
        match self {
            NodeRef::Property(r) => Some(r),
            _ => None,
        }
    }
}

impl From<DocumentRef> for NodeRef {
    fn from(r: DocumentRef) -> Self {
        NodeRef::Document(r)
    }
}

impl From<SectionRef> for NodeRef {
    fn from(r: SectionRef) -> Self {
        NodeRef::Section(r)
    }
}

impl From<PropertyRef> for NodeRef {
    fn from(r: PropertyRef) -> Self {
        NodeRef::Property(r)
    }
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Document => "document",
            NodeKind::Section => "section",
            NodeKind::Property => "property",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
