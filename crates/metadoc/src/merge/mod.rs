//! Merging properties and sections.
//!
//! A merge runs in two phases. The check phase walks the whole source
//! subtree read-only and reports the first conflict; only when it passes
//! does the apply phase mutate the destination. A failed merge therefore
//! leaves the destination exactly as it was.

use tracing::{debug, instrument, warn};

use crate::error::{Error, Result};
use crate::model::Property;
use crate::tree::{NodeKind, NodeRef, PropertyRef, SectionRef, Store};

/// Options controlling how conflicts are treated during a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOptions {
    /// Differing dtypes are a conflict. When false, values are concatenated
    /// as they are and the container may end up holding mixed dtypes.
    pub strict: bool,
    /// Conflicting attributes keep the destination's value instead of
    /// failing the merge.
    pub allow_divergence: bool,
    /// Skip source values already present in the destination.
    pub dedup_values: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            strict: true,
            allow_divergence: false,
            dedup_values: false,
        }
    }
}

impl MergeOptions {
    /// Creates strict merge options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options that tolerate differing dtypes.
    pub fn lenient() -> Self {
        Self {
            strict: false,
            ..Self::default()
        }
    }

    pub fn with_divergence(mut self) -> Self {
        self.allow_divergence = true;
        self
    }

    pub fn with_dedup(mut self) -> Self {
        self.dedup_values = true;
        self
    }
}

/// Definitions compare without whitespace and case.
fn normalize_definition(definition: &str) -> String {
    definition.split_whitespace().collect::<String>().to_lowercase()
}

fn attributes_agree(attribute: &str, destination: &str, source: &str) -> bool {
    if attribute == "definition" {
        normalize_definition(destination) == normalize_definition(source)
    } else {
        destination == source
    }
}

/// Checks one attribute pair. An unset side never conflicts.
fn check_attribute(
    attribute: &'static str,
    destination: Option<&str>,
    source: Option<&str>,
    options: MergeOptions,
) -> Result<()> {
    let (Some(destination), Some(source)) = (destination, source) else {
        return Ok(());
    };
    if options.allow_divergence || attributes_agree(attribute, destination, source) {
        return Ok(());
    }
    Err(Error::AttributeConflict {
        attribute,
        destination: destination.to_string(),
        incoming: source.to_string(),
    })
}

/// Adopts `source` into an unset slot; a set slot keeps its value.
fn reconcile_attribute(attribute: &'static str, slot: &mut Option<String>, source: Option<&String>) {
    let Some(source) = source else { return };
    if slot.is_none() {
        *slot = Some(source.clone());
        return;
    }
    if let Some(kept) = slot.as_deref() {
        if !attributes_agree(attribute, kept, source) {
            warn!(attribute, kept, dropped = %source, "divergent attribute kept during merge");
        }
    }
}

fn check_property(destination: &Property, source: &Property, options: MergeOptions) -> Result<()> {
    check_attribute("unit", destination.unit(), source.unit(), options)?;
    check_attribute("uncertainty", destination.uncertainty(), source.uncertainty(), options)?;
    check_attribute("reference", destination.reference(), source.reference(), options)?;
    check_attribute("definition", destination.definition(), source.definition(), options)?;

    let untyped_and_empty = destination.dtype().is_none() && destination.is_empty();
    if options.strict && destination.dtype() != source.dtype() && !untyped_and_empty {
        return Err(Error::DTypeConflict {
            destination: destination.dtype(),
            incoming: source.dtype(),
        });
    }
    Ok(())
}

fn apply_property(destination: &mut Property, source: &Property, options: MergeOptions) {
    reconcile_attribute("unit", &mut destination.unit, source.unit.as_ref());
    reconcile_attribute("uncertainty", &mut destination.uncertainty, source.uncertainty.as_ref());
    reconcile_attribute("reference", &mut destination.reference, source.reference.as_ref());
    reconcile_attribute("definition", &mut destination.definition, source.definition.as_ref());

    if destination.dtype.is_none() && destination.values.is_empty() {
        destination.dtype = source.dtype;
    }
    for value in &source.values {
        if options.dedup_values && destination.values.iter().any(|kept| kept.is_same(value)) {
            continue;
        }
        destination.values.push(value.clone());
    }
}

/// Merges the attributes and values of `source` into `destination`.
///
/// Values are appended after the destination's own. Nothing changes if the
/// merge fails.
pub fn merge_property(destination: &mut Property, source: &Property, options: MergeOptions) -> Result<()> {
    check_property(destination, source, options)?;
    apply_property(destination, source, options);
    debug!(property = %destination.name(), count = destination.len(), "property merged");
    Ok(())
}

impl Store {
    /// Merges property `source` into property `destination`.
    #[instrument(level = "trace", skip(self))]
    pub fn merge_properties(
        &mut self,
        destination: PropertyRef,
        source: PropertyRef,
        options: MergeOptions,
    ) -> Result<()> {
        if destination == source {
            return Err(Error::SelfMerge { kind: NodeKind::Property });
        }
        let source = self.require_property(source)?.clone();
        merge_property(self.require_property_mut(destination)?, &source, options)
    }

    /// Merges section `source` into section `destination`, recursively.
    ///
    /// Sub-sections and properties are matched by name. Matches merge
    /// recursively; unmatched source children are deep-copied into the
    /// destination. Afterwards every merged destination section records its
    /// source as the merged counterpart. The source tree is not modified.
    #[instrument(level = "trace", skip(self))]
    pub fn merge_sections(
        &mut self,
        destination: SectionRef,
        source: SectionRef,
        options: MergeOptions,
    ) -> Result<()> {
        if destination == source {
            return Err(Error::SelfMerge { kind: NodeKind::Section });
        }
        self.require_section(destination)?;
        let source_section = self.require_section(source)?;
        if self.descendants(source).any(|n| n == NodeRef::Section(destination))
            || self.descendants(destination).any(|n| n == NodeRef::Section(source))
        {
            return Err(Error::Cycle { name: source_section.name().to_string() });
        }

        self.check_sections(destination, source, options)?;
        self.apply_sections(destination, source, options)?;
        debug!(section = %self.name_of(destination).unwrap_or_default(), "section merged");
        Ok(())
    }

    fn check_sections(&self, destination: SectionRef, source: SectionRef, options: MergeOptions) -> Result<()> {
        let dst = self.require_section(destination)?;
        let src = self.require_section(source)?;
        check_attribute("definition", dst.definition(), src.definition(), options)?;
        check_attribute("reference", dst.reference(), src.reference(), options)?;
        check_attribute("repository", dst.repository(), src.repository(), options)?;

        for &property in src.properties() {
            let incoming = self.require_property(property)?;
            if let Some(existing) = self.property_named(destination, incoming.name()) {
                check_property(self.require_property(existing)?, incoming, options)?;
            }
        }
        for &section in src.sections() {
            let name = self.require_section(section)?.name();
            if let Some(existing) = self.section_named(destination, name) {
                self.check_sections(existing, section, options)?;
            }
        }
        Ok(())
    }

    /// Mutating half of a section merge. Runs only after `check_sections`
    /// passed, so the remaining errors are stale-handle errors.
    fn apply_sections(&mut self, destination: SectionRef, source: SectionRef, options: MergeOptions) -> Result<()> {
        let src = self.require_section(source)?.clone();
        let dst = self.require_section_mut(destination)?;
        reconcile_attribute("definition", &mut dst.definition, src.definition.as_ref());
        reconcile_attribute("reference", &mut dst.reference, src.reference.as_ref());
        reconcile_attribute("repository", &mut dst.repository, src.repository.as_ref());

        for &property in &src.properties {
            let incoming = self.require_property(property)?.clone();
            match self.property_named(destination, incoming.name()) {
                Some(existing) => apply_property(self.require_property_mut(existing)?, &incoming, options),
                None => {
                    let copy = self.clone_property(property)?;
                    self.link(copy.into(), destination.into());
                }
            }
        }
        for &section in &src.sections {
            let name = self.require_section(section)?.name().to_string();
            match self.section_named(destination, &name) {
                Some(existing) => self.apply_sections(existing, section, options)?,
                None => {
                    let copy = self.clone_section(section, true)?;
                    self.link(copy.into(), destination.into());
                }
            }
        }

        self.require_section_mut(destination)?.merged = Some(source);
        Ok(())
    }

    /// The section last merged into `section`, while it is still live.
    pub fn merged_section(&self, section: SectionRef) -> Option<SectionRef> {
        self.section(section)?.merged().filter(|m| self.contains(*m))
    }

    /// The equally-named property of the parent section's merged
    /// counterpart.
    pub fn property_merged_equivalent(&self, property: PropertyRef) -> Option<PropertyRef> {
        let property = self.property(property)?;
        let merged = self.merged_section(property.parent()?)?;
        self.property_named(merged, property.name())
    }

    /// The equally-named sub-section of the parent section's merged
    /// counterpart.
    pub fn section_merged_equivalent(&self, section: SectionRef) -> Option<SectionRef> {
        let current = self.section(section)?;
        let merged = self.merged_section(current.parent()?.as_section()?)?;
        self.section_named(merged, current.name())
    }
}
