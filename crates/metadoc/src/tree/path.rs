//! Path strings for tree entities.
//!
//! A section path is the `/`-joined chain of section names below the tree
//! root, such as `/sectionA/sectionB`. A property path appends `:name` to
//! its section's path. The root, and any detached entity, is `/`.

use crate::error::{Error, Result};
use crate::tree::{NodeRef, SectionRef, Store};

const ROOT: &str = "/";
const PROPERTY_SEPARATOR: char = ':';

impl Store {
    /// Returns the path of `node`.
    pub fn path(&self, node: impl Into<NodeRef>) -> Result<String> {
        let node = node.into();
        if !self.contains(node) {
            return Err(Error::UnknownEntity { kind: node.kind() });
        }
        let path = match node {
            NodeRef::Document(_) => ROOT.to_string(),
            NodeRef::Section(r) => self.section_path(r),
            NodeRef::Property(r) => match self.property(r).and_then(|p| Some((p.parent?, p.name()))) {
                Some((section, name)) => {
                    format!("{}{}{}", self.section_path(section), PROPERTY_SEPARATOR, name)
                }
                None => ROOT.to_string(),
            },
        };
        Ok(path)
    }

    /// Names from just below the root down to `section`. A detached top
    /// section is itself the root and contributes no segment.
    fn section_path(&self, section: SectionRef) -> String {
        let mut names = Vec::new();
        let mut current = Some(section);
        while let Some(r) = current {
            let Some(s) = self.section(r) else { break };
            let Some(parent) = s.parent() else { break };
            names.push(s.name());
            current = parent.as_section();
        }
        if names.is_empty() {
            return ROOT.to_string();
        }
        names.reverse();
        format!("{}{}", ROOT, names.join("/"))
    }

    /// Resolves `path` relative to `from`.
    ///
    /// Absolute paths start at the root of `from`'s tree. Relative paths
    /// start at `from` itself, or at the owning section when `from` is a
    /// property. `.` and `..` segments are honored. A trailing `:name`
    /// selects a property of the resolved section.
    pub fn find_path(&self, from: impl Into<NodeRef>, path: &str) -> Option<NodeRef> {
        let from = from.into();
        if !self.contains(from) {
            return None;
        }
        let (section_part, property) = match path.rsplit_once(PROPERTY_SEPARATOR) {
            Some((head, name)) => (head, Some(name)),
            None => (path, None),
        };

        let mut current = if section_part.starts_with(ROOT) {
            self.root_of(from)
        } else if let NodeRef::Property(_) = from {
            self.parent(from)?
        } else {
            from
        };

        for segment in section_part.split('/').filter(|s| !s.is_empty()) {
            current = match segment {
                "." => current,
                ".." => self.parent(current)?,
                name => NodeRef::Section(self.section_named(current, name)?),
            };
        }

        match property {
            Some(name) => self
                .property_named(current.as_section()?, name)
                .map(NodeRef::Property),
            None => Some(current),
        }
    }
}
