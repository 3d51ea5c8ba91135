//! Builder API for ergonomic tree construction.
//!
//! Builders collect attributes first and create entities in the store only
//! on `build`. A failed build leaves nothing behind in the store.
//!
//! # Example
//!
//! ```rust
//! use metadoc::{DocumentBuilder, PropertyBuilder, SectionBuilder, Store};
//!
//! let mut store = Store::new();
//! let doc = DocumentBuilder::new()
//!     .author("D. N. Adams")
//!     .section(
//!         SectionBuilder::new("recording")
//!             .property(PropertyBuilder::new("sampling_rate").value(20000).unit("Hz"))
//!             .property(PropertyBuilder::new("position").dtype("2-tuple").value("(39.12; 67.19)")),
//!     )
//!     .build(&mut store)
//!     .unwrap();
//!
//! let rate = store.find_path(doc, "/recording:sampling_rate").unwrap();
//! assert_eq!(store.path(rate).unwrap(), "/recording:sampling_rate");
//! ```

use chrono::NaiveDate;

use crate::error::Result;
use crate::model::dtype::{DType, IntoDType};
use crate::model::{Document, Property, Section, ValueInput};
use crate::tree::{DocumentRef, NodeRef, PropertyRef, SectionRef, Store};

/// Builder for a [`Property`].
#[derive(Debug, Clone)]
pub struct PropertyBuilder {
    name: String,
    id: Option<String>,
    dtype: Option<Result<DType>>,
    value: ValueInput,
    value_origin: String,
    unit: String,
    uncertainty: String,
    reference: String,
    definition: String,
    dependency: String,
    dependency_value: String,
    parent: Option<SectionRef>,
}

impl PropertyBuilder {
    /// Creates a builder for a property named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            dtype: None,
            value: ValueInput::Empty,
            value_origin: String::new(),
            unit: String::new(),
            uncertainty: String::new(),
            reference: String::new(),
            definition: String::new(),
            dependency: String::new(),
            dependency_value: String::new(),
            parent: None,
        }
    }

    /// Requests an explicit identifier. A malformed one is replaced by a
    /// generated identifier at build time.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Declares the dtype. The values are converted to it on build.
    pub fn dtype(mut self, dtype: impl IntoDType) -> Self {
        self.dtype = Some(dtype.into_dtype());
        self
    }

    /// Sets the initial values.
    pub fn value(mut self, value: impl Into<ValueInput>) -> Self {
        self.value = value.into();
        self
    }

    /// Sets the value origin.
    pub fn value_origin(mut self, value_origin: impl Into<String>) -> Self {
        self.value_origin = value_origin.into();
        self
    }

    /// Sets the unit.
    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Sets the uncertainty.
    pub fn uncertainty(mut self, uncertainty: impl Into<String>) -> Self {
        self.uncertainty = uncertainty.into();
        self
    }

    /// Sets the reference.
    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }

    /// Sets the definition.
    pub fn definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = definition.into();
        self
    }

    /// Sets the dependency.
    pub fn dependency(mut self, dependency: impl Into<String>) -> Self {
        self.dependency = dependency.into();
        self
    }

    /// Sets the dependency value.
    pub fn dependency_value(mut self, dependency_value: impl Into<String>) -> Self {
        self.dependency_value = dependency_value.into();
        self
    }

    /// Attaches the property to `parent` on build.
    pub fn parent(mut self, parent: SectionRef) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Creates the property in `store`.
    pub fn build(self, store: &mut Store) -> Result<PropertyRef> {
        let parent = self.parent.map(NodeRef::Section);
        self.build_under(store, parent)
    }

    fn build_under(self, store: &mut Store, parent: Option<NodeRef>) -> Result<PropertyRef> {
        let mut property = Property::new(self.name, self.id.as_deref());
        property.set_value_origin(self.value_origin);
        property.set_unit(self.unit);
        property.set_uncertainty(self.uncertainty);
        property.set_reference(self.reference);
        property.set_definition(self.definition);
        property.set_dependency(self.dependency);
        property.set_dependency_value(self.dependency_value);
        if let Some(dtype) = self.dtype {
            property.set_dtype(dtype?)?;
        }
        property.set_value(self.value)?;

        let created = store.insert_property(property);
        attach_or_discard(store, created.into(), parent)?;
        Ok(created)
    }
}

/// Builder for a [`Section`] and, optionally, its subtree.
#[derive(Debug, Clone)]
pub struct SectionBuilder {
    name: String,
    id: Option<String>,
    section_type: String,
    definition: String,
    reference: String,
    repository: String,
    properties: Vec<PropertyBuilder>,
    sections: Vec<SectionBuilder>,
    parent: Option<NodeRef>,
}

impl SectionBuilder {
    /// Creates a builder for a section named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            section_type: String::new(),
            definition: String::new(),
            reference: String::new(),
            repository: String::new(),
            properties: Vec::new(),
            sections: Vec::new(),
            parent: None,
        }
    }

    /// Requests an explicit identifier. A malformed one is replaced by a
    /// generated identifier at build time.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the section type.
    pub fn section_type(mut self, section_type: impl Into<String>) -> Self {
        self.section_type = section_type.into();
        self
    }

    /// Sets the definition.
    pub fn definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = definition.into();
        self
    }

    /// Sets the reference.
    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }

    /// Sets the repository.
    pub fn repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = repository.into();
        self
    }

    /// Adds a property created together with this section.
    pub fn property(mut self, property: PropertyBuilder) -> Self {
        self.properties.push(property);
        self
    }

    /// Adds a sub-section created together with this section.
    pub fn section(mut self, section: SectionBuilder) -> Self {
        self.sections.push(section);
        self
    }

    /// Attaches the section to a document or section on build.
    pub fn parent(mut self, parent: impl Into<NodeRef>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Creates the section and its subtree in `store`.
    pub fn build(self, store: &mut Store) -> Result<SectionRef> {
        let parent = self.parent;
        self.build_under(store, parent)
    }

    fn build_under(self, store: &mut Store, parent: Option<NodeRef>) -> Result<SectionRef> {
        let mut section = Section::new(self.name, self.id.as_deref());
        section.set_section_type(self.section_type);
        section.set_definition(self.definition);
        section.set_reference(self.reference);
        section.set_repository(self.repository);
        let created = store.insert_section(section);

        let children = build_children(store, created.into(), self.properties, self.sections);
        if let Err(err) = children {
            store.remove(created)?;
            return Err(err);
        }
        attach_or_discard(store, created.into(), parent)?;
        Ok(created)
    }
}

/// Builder for a [`Document`] and its sections.
#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    id: Option<String>,
    author: String,
    version: String,
    date: Option<NaiveDate>,
    repository: String,
    sections: Vec<SectionBuilder>,
}

impl DocumentBuilder {
    /// Creates an empty document builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests an explicit identifier.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the author.
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Sets the version.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Sets the document date.
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Sets the repository.
    pub fn repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = repository.into();
        self
    }

    /// Adds a section created together with the document.
    pub fn section(mut self, section: SectionBuilder) -> Self {
        self.sections.push(section);
        self
    }

    /// Creates the document and its sections in `store`.
    pub fn build(self, store: &mut Store) -> Result<DocumentRef> {
        let mut document = Document::new(self.id.as_deref());
        document.set_author(self.author);
        document.set_version(self.version);
        document.set_date(self.date);
        document.set_repository(self.repository);
        let created = store.insert_document(document);

        if let Err(err) = build_children(store, created.into(), Vec::new(), self.sections) {
            store.remove(created)?;
            return Err(err);
        }
        Ok(created)
    }
}

fn build_children(
    store: &mut Store,
    parent: NodeRef,
    properties: Vec<PropertyBuilder>,
    sections: Vec<SectionBuilder>,
) -> Result<()> {
    for property in properties {
        property.build_under(store, Some(parent))?;
    }
    for section in sections {
        section.build_under(store, Some(parent))?;
    }
    Ok(())
}

/// Attaches a freshly inserted node, dropping it again if that fails.
fn attach_or_discard(store: &mut Store, created: NodeRef, parent: Option<NodeRef>) -> Result<()> {
    let Some(parent) = parent else {
        return Ok(());
    };
    if let Err(err) = store.attach(created, parent) {
        store.remove(created)?;
        return Err(err);
    }
    Ok(())
}
