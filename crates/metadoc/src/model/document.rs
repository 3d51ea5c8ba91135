//! Documents: the roots of metadata trees.

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::model::dtype::DType;
use crate::model::id::{self, Id};
use crate::model::property::normalize_attr;
use crate::tree::SectionRef;
use crate::util::datetime::{format_date, parse_date};

/// Root of a metadata tree. A document holds top-level sections only.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub(crate) id: Id,
    pub(crate) author: Option<String>,
    pub(crate) version: Option<String>,
    pub(crate) date: Option<NaiveDate>,
    pub(crate) repository: Option<String>,
    pub(crate) sections: Vec<SectionRef>,
}

impl Document {
    pub(crate) fn new(id: Option<&str>) -> Self {
        Self {
            id: id::id_or_generate(id),
            author: None,
            version: None,
            date: None,
            repository: None,
            sections: Vec::new(),
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

    /// Top-level sections, in insertion order.
    pub fn sections(&self) -> &[SectionRef] {
        &self.sections
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn set_author(&mut self, value: impl Into<String>) {
        self.author = normalize_attr(value);
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn set_version(&mut self, value: impl Into<String>) {
        self.version = normalize_attr(value);
    }

    pub fn repository(&self) -> Option<&str> {
        self.repository.as_deref()
    }

    pub fn set_repository(&mut self, value: impl Into<String>) {
        self.repository = normalize_attr(value);
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn set_date(&mut self, date: Option<NaiveDate>) {
        self.date = date;
    }

    /// Sets the date from `YYYY-MM-DD` text; an empty string clears it.
    pub fn set_date_str(&mut self, date: &str) -> Result<()> {
        if date.is_empty() {
            self.date = None;
            return Ok(());
        }
        let parsed = parse_date(date).map_err(|_| Error::Coercion {
            value: date.to_string(),
            dtype: DType::Date,
        })?;
        self.date = Some(parsed);
        Ok(())
    }

    /// The date rendered as `YYYY-MM-DD`.
    pub fn date_str(&self) -> Option<String> {
        self.date.as_ref().map(format_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_text() {
        let mut doc = Document::new(None);
        doc.set_date_str("2008-07-07").unwrap();
        assert_eq!(doc.date_str().as_deref(), Some("2008-07-07"));

        let err = doc.set_date_str("07.07.2008").unwrap_err();
        assert!(matches!(err, Error::Coercion { dtype: DType::Date, .. }));
        assert_eq!(doc.date_str().as_deref(), Some("2008-07-07"));

        doc.set_date_str("").unwrap();
        assert_eq!(doc.date(), None);
    }

    #[test]
    fn test_new_id_keeps_old_id_on_malformed_input() {
        let mut doc = Document::new(None);
        let before = doc.id();
        assert!(doc.new_id(Some("not-an-id")).is_err());
        assert_eq!(doc.id(), before);

        doc.new_id(None).unwrap();
        assert_ne!(doc.id(), before);
    }
}
