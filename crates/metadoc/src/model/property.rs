//! Properties: named, typed value containers owned by sections.
//!
//! # Invariants
//! - Outside non-strict mutation, every stored value conforms to `dtype`.
//! - Optional attributes are `None` rather than empty strings.
//! - `parent` is written only by the store's reparenting operation.

use std::ops::Index;

use tracing::debug;

use crate::error::{Error, Result};
use crate::model::dtype::{self, DType, IntoDType};
use crate::model::id::{self, Id};
use crate::model::{Value, ValueInput};
use crate::tree::SectionRef;

/// Normalizes attribute input: the empty string means unset.
pub(crate) fn normalize_attr(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    (!value.is_empty()).then_some(value)
}

/// A named property holding an ordered, dtype-homogeneous list of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub(crate) id: Id,
    pub(crate) name: String,
    pub(crate) dtype: Option<DType>,
    pub(crate) values: Vec<Value>,
    pub(crate) value_origin: Option<String>,
    pub(crate) unit: Option<String>,
    pub(crate) uncertainty: Option<String>,
    pub(crate) reference: Option<String>,
    pub(crate) definition: Option<String>,
    pub(crate) dependency: Option<String>,
    pub(crate) dependency_value: Option<String>,
    pub(crate) parent: Option<SectionRef>,
}

impl Property {
    /// Creates a detached, empty property.
    ///
    /// A malformed `id` is replaced by a freshly generated identifier, and an
    /// empty name defaults to the identifier string.
    pub(crate) fn new(name: impl Into<String>, id: Option<&str>) -> Self {
        let id = id::id_or_generate(id);
        let name = normalize_attr(name).unwrap_or_else(|| id::format_id(&id));
        Self {
            id,
            name,
            dtype: None,
            values: Vec::new(),
            value_origin: None,
            unit: None,
            uncertainty: None,
            reference: None,
            definition: None,
            dependency: None,
            dependency_value: None,
            parent: None,
        }
    }

    // =========================================================================
    // Identity
    // =========================================================================

    pub fn id(&self) -> Id {
        self.id
    }

    /// Canonical identifier string.
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

    /// The owning section, if attached.
    pub fn parent(&self) -> Option<SectionRef> {
        self.parent
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    pub fn value_origin(&self) -> Option<&str> {
        self.value_origin.as_deref()
    }

    pub fn set_value_origin(&mut self, value: impl Into<String>) {
        self.value_origin = normalize_attr(value);
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn set_unit(&mut self, value: impl Into<String>) {
        self.unit = normalize_attr(value);
    }

    pub fn uncertainty(&self) -> Option<&str> {
        self.uncertainty.as_deref()
    }

    pub fn set_uncertainty(&mut self, value: impl Into<String>) {
        self.uncertainty = normalize_attr(value);
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn set_reference(&mut self, value: impl Into<String>) {
        self.reference = normalize_attr(value);
    }

    pub fn definition(&self) -> Option<&str> {
        self.definition.as_deref()
    }

    pub fn set_definition(&mut self, value: impl Into<String>) {
        self.definition = normalize_attr(value);
    }

    pub fn dependency(&self) -> Option<&str> {
        self.dependency.as_deref()
    }

    pub fn set_dependency(&mut self, value: impl Into<String>) {
        self.dependency = normalize_attr(value);
    }

    pub fn dependency_value(&self) -> Option<&str> {
        self.dependency_value.as_deref()
    }

    pub fn set_dependency_value(&mut self, value: impl Into<String>) {
        self.dependency_value = normalize_attr(value);
    }

    // =========================================================================
    // DType
    // =========================================================================

    pub fn dtype(&self) -> Option<DType> {
        self.dtype
    }

    /// Changes the dtype, converting every stored value.
    ///
    /// If any value fails to convert, the dtype and values stay as they were.
    pub fn set_dtype(&mut self, dtype: impl IntoDType) -> Result<()> {
        let dtype = dtype.into_dtype()?;
        let converted = dtype::coerce_all(&self.values, dtype)?;
        debug!(property = %self.name, from = ?self.dtype, to = %dtype, "dtype changed");
        self.dtype = Some(dtype);
        self.values = converted;
        Ok(())
    }

    /// Removes the declared dtype; stored values are kept as they are.
    pub fn clear_dtype(&mut self) {
        self.dtype = None;
    }

    // =========================================================================
    // Value container
    // =========================================================================

    /// Current values, in order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    /// Replaces the value at `index` after converting it to the current dtype.
    ///
    /// On mismatch the container is left untouched.
    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> Result<()> {
        let len = self.values.len();
        if index >= len {
            return Err(Error::IndexOutOfBounds { index, len });
        }
        let value = value.into();
        let value = match self.dtype {
            Some(dtype) => dtype::coerce(&value, dtype)?,
            None => value,
        };
        self.values[index] = value;
        Ok(())
    }

    /// Replaces all values.
    ///
    /// Empty input clears the container and keeps the dtype. Otherwise the
    /// values are converted to the declared dtype, or, when none is declared,
    /// to the dtype of the first value.
    pub fn set_value(&mut self, input: impl Into<ValueInput>) -> Result<()> {
        let values = input.into().into_values();
        let Some(first) = values.first() else {
            self.values.clear();
            return Ok(());
        };
        let dtype = match self.dtype {
            Some(dtype) => dtype,
            None => first.checked_dtype()?,
        };
        self.values = dtype::coerce_all(&values, dtype)?;
        self.dtype = Some(dtype);
        Ok(())
    }

    /// Appends a single value.
    ///
    /// Multi-valued input is rejected; use [`Property::extend`] instead.
    pub fn append(&mut self, input: impl Into<ValueInput>, strict: bool) -> Result<()> {
        let input = input.into();
        if input.len() > 1 {
            return Err(Error::MultipleValues { count: input.len() });
        }
        self.push_values(input.into_values(), strict)
    }

    /// Appends every value of `input`.
    pub fn extend(&mut self, input: impl Into<ValueInput>, strict: bool) -> Result<()> {
        self.push_values(input.into().into_values(), strict)
    }

    /// Appends the values (not the metadata) of another property.
    ///
    /// Both properties must use the same unit.
    pub fn extend_from(&mut self, other: &Property, strict: bool) -> Result<()> {
        if self.unit != other.unit {
            return Err(Error::UnitMismatch {
                expected: self.unit.clone(),
                found: other.unit.clone(),
            });
        }
        self.push_values(other.values.clone(), strict)
    }

    /// Shared body of `append` and `extend`.
    ///
    /// Strict mode type-checks the leading value against the dtype and then
    /// requires every value to convert, all-or-nothing. Non-strict mode
    /// converts what it can; a value that does not convert is stored as-is
    /// and its own dtype becomes the declared one (last writer wins).
    fn push_values(&mut self, values: Vec<Value>, strict: bool) -> Result<()> {
        let Some(first) = values.first() else {
            return Ok(());
        };

        let Some(dtype) = self.dtype else {
            let mut all = self.values.clone();
            all.extend(values.iter().cloned());
            return match self.set_value(all) {
                Err(_) if !strict => {
                    self.values.extend(values);
                    Ok(())
                }
                result => result,
            };
        };

        if strict {
            let found = first.checked_dtype()?;
            if !dtype.accepts(found) {
                return Err(Error::TypeMismatch { expected: dtype, found });
            }
            let converted = dtype::coerce_all(&values, dtype)?;
            self.values.extend(converted);
            return Ok(());
        }

        let mut current = dtype;
        let mut pushed = Vec::with_capacity(values.len());
        for value in values {
            match dtype::coerce(&value, current) {
                Ok(converted) => pushed.push(converted),
                Err(_) => {
                    let drifted = value.checked_dtype()?;
                    debug!(property = %self.name, from = %current, to = %drifted, "non-strict insert overrides dtype");
                    current = drifted;
                    pushed.push(value);
                }
            }
        }
        self.dtype = Some(current);
        self.values.extend(pushed);
        Ok(())
    }
}

impl Index<usize> for Property {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        &self.values[index]
    }
}

impl<'a> IntoIterator for &'a Property {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
