//! # Record Instances
//!
//! A `Record` is one value of a compiled record type: the shared
//! `Arc<Layout>` plus one `Value` per declared field, in declaration order.
//!
//! ## Construction
//!
//! [`Record::new`] takes positional values for the fields that participate in
//! construction (`init`); non-participating fields are filled from their
//! defaults (the layout compiler guarantees those defaults exist).
//! [`Record::from_defaults`] builds an instance entirely from defaults.
//!
//! Construction does not validate values: validation is a compile-time
//! defaults feature, and the encode step performs its own narrowing checks
//! when the instance is packed.
//!
//! ## Equality
//!
//! Two records are equal when they share the same compiled layout (by `Arc`
//! identity, since layouts are write-once singletons) and their values are
//! equal.

use crate::layout::Layout;
use crate::types::Value;
use eyre::{ensure, Result};
use std::sync::Arc;

/// One instance of a compiled record type.
#[derive(Debug, Clone)]
pub struct Record {
    layout: Arc<Layout>,
    values: Vec<Value>,
}

impl Record {
    /// Builds an instance from positional values for the init fields.
    pub fn new(layout: &Arc<Layout>, values: Vec<Value>) -> Result<Self> {
        let init_count = layout.fields().iter().filter(|f| f.init()).count();
        ensure!(
            values.len() == init_count,
            "record '{}' expects {} values, got {}",
            layout.name(),
            init_count,
            values.len()
        );

        let mut supplied = values.into_iter();
        let mut all = Vec::with_capacity(layout.field_count());
        for field in layout.fields() {
            if field.init() {
                all.push(supplied.next().ok_or_else(|| {
                    eyre::eyre!("record '{}' is missing a value", layout.name())
                })?);
            } else {
                let default = field.default().ok_or_else(|| {
                    eyre::eyre!("field '{}' has no default value", field.name())
                })?;
                all.push(default.clone());
            }
        }

        Ok(Self {
            layout: layout.clone(),
            values: all,
        })
    }

    /// Builds an instance entirely from field defaults.
    pub fn from_defaults(layout: &Arc<Layout>) -> Result<Self> {
        let mut values = Vec::with_capacity(layout.field_count());
        for field in layout.fields() {
            let default = field
                .default()
                .ok_or_else(|| eyre::eyre!("field '{}' has no default value", field.name()))?;
            values.push(default.clone());
        }
        Ok(Self {
            layout: layout.clone(),
            values,
        })
    }

    /// Used by the codec, which decodes one value per field by construction.
    pub(crate) fn from_values_unchecked(layout: Arc<Layout>, values: Vec<Value>) -> Self {
        Self { layout, values }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub(crate) fn layout_arc(&self) -> &Arc<Layout> {
        &self.layout
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Packed byte size of this instance's type.
    pub fn size(&self) -> usize {
        self.layout.size()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.layout
            .field_index(name)
            .map(|idx| &self.values[idx])
    }

    pub fn get_index(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx)
    }

    /// Replaces a field value by name. Values are not validated here; shape
    /// and range errors surface when the instance is packed.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let idx = self
            .layout
            .field_index(name)
            .ok_or_else(|| eyre::eyre!("record '{}' has no field '{}'", self.layout.name(), name))?;
        self.values[idx] = value.into();
        Ok(())
    }

    pub fn set_index(&mut self, idx: usize, value: impl Into<Value>) -> Result<()> {
        ensure!(
            idx < self.values.len(),
            "field index {} out of bounds (count={})",
            idx,
            self.values.len()
        );
        self.values[idx] = value.into();
        Ok(())
    }

    /// Serializes this instance to its packed byte representation.
    pub fn pack(&self) -> Result<Vec<u8>> {
        crate::codec::pack(self)
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.layout, &other.layout) && self.values == other.values
    }
}
