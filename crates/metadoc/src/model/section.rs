//! Sections: named containers of sub-sections and properties.

use crate::error::Result;
use crate::model::id::{self, Id};
use crate::model::property::normalize_attr;
use crate::tree::{NodeRef, PropertyRef, SectionRef};

/// A named grouping of properties and nested sections.
///
/// Child lists hold handles into the owning [`Store`](crate::tree::Store);
/// they change only through the store's reparenting operations.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub(crate) id: Id,
    pub(crate) name: String,
    pub(crate) section_type: Option<String>,
    pub(crate) definition: Option<String>,
    pub(crate) reference: Option<String>,
    pub(crate) repository: Option<String>,
    pub(crate) parent: Option<NodeRef>,
    pub(crate) sections: Vec<SectionRef>,
    pub(crate) properties: Vec<PropertyRef>,
    pub(crate) merged: Option<SectionRef>,
}

impl Section {
    pub(crate) fn new(name: impl Into<String>, id: Option<&str>) -> Self {
        let id = id::id_or_generate(id);
        let name = normalize_attr(name).unwrap_or_else(|| id::format_id(&id));
        Self {
            id,
            name,
            section_type: None,
            definition: None,
            reference: None,
            repository: None,
            parent: None,
            sections: Vec::new(),
            properties: Vec::new(),
            merged: None,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn id_str(&self) -> String {
        id::format_id(&self.id)
    }

    /// Assigns a new identifier: a generated one, or `custom` if it is valid.
    pub fn new_id(&mut self, custom: Option<&str>) -> Result<()> {
        id::reassign(&mut self.id, custom)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning document or section, if attached.
    pub fn parent(&self) -> Option<NodeRef> {
        self.parent
    }

    /// Direct sub-sections, in insertion order.
    pub fn sections(&self) -> &[SectionRef] {
        &self.sections
    }

    /// Direct properties, in insertion order.
    pub fn properties(&self) -> &[PropertyRef] {
        &self.properties
    }

    /// The section most recently merged into this one.
    pub fn merged(&self) -> Option<SectionRef> {
        self.merged
    }

    pub fn section_type(&self) -> Option<&str> {
        self.section_type.as_deref()
    }

    pub fn set_section_type(&mut self, value: impl Into<String>) {
        self.section_type = normalize_attr(value);
    }

    pub fn definition(&self) -> Option<&str> {
        self.definition.as_deref()
    }

    pub fn set_definition(&mut self, value: impl Into<String>) {
        self.definition = normalize_attr(value);
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn set_reference(&mut self, value: impl Into<String>) {
        self.reference = normalize_attr(value);
    }

    pub fn repository(&self) -> Option<&str> {
        self.repository.as_deref()
    }

    pub fn set_repository(&mut self, value: impl Into<String>) {
        self.repository = normalize_attr(value);
    }
}
