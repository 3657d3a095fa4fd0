//! # Layout Compilation
//!
//! This module turns a `RecordDef` (the declarative description of a record)
//! into a `Layout`: the immutable, precomputed format string, byte size, and
//! field-descriptor list shared by every instance of that record.
//!
//! ## Compilation
//!
//! Fields are resolved in declaration order; any resolver error aborts the
//! whole compilation and nothing is installed. The format string is the mode
//! marker followed by each field's fragment. The byte size is computed by
//! walking the resolved field tree with a running offset:
//!
//! - explicit `x` pads advance the offset by one byte each
//! - byte arrays advance by their declared length (alignment 1)
//! - primitives advance by their size, preceded under native-aligned mode by
//!   zero-fill up to their natural alignment
//! - arrays repeat the item walk, nested records walk their fields inline
//!
//! No trailing padding is added, matching the standard C-struct format
//! encoding. The codec uses the identical walk, so
//! `layout.size() == pack(instance).len()` always holds.
//!
//! ## Lifecycle
//!
//! A `Layout` is created exactly once per record definition and shared via
//! `Arc`; it is never mutated afterwards. Nested fields hold non-owning
//! (`Arc`) references to the nested record's layout, so a container compiled
//! against a nested type keeps seeing the layout it resolved.

pub mod field;

#[cfg(test)]
mod tests;

pub use field::{Field, FieldDef, FieldKind, TypeSpec};

use crate::mode::Mode;
use crate::record::Record;
use crate::registry::Registry;
use crate::types::Value;
use eyre::{ensure, Result};
use std::sync::Arc;

/// Declarative description of a record, compiled once into a [`Layout`].
#[derive(Debug, Clone)]
pub struct RecordDef {
    name: String,
    mode: Mode,
    validate_defaults: bool,
    fields: Vec<FieldDef>,
}

impl RecordDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode: Mode::NATIVE_ALIGNED,
            validate_defaults: true,
            fields: Vec::new(),
        }
    }

    /// Sets the layout mode. Defaults to native-aligned (`@`).
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Disables or enables default-value validation. Enabled by default;
    /// disabling lets out-of-range defaults through silently.
    pub fn validate_defaults(mut self, validate: bool) -> Self {
        self.validate_defaults = validate;
        self
    }

    /// Appends one field declaration.
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Compiles the definition. Nested records must be supplied as
    /// [`TypeSpec::Record`]; use [`Registry::define`] to resolve
    /// [`TypeSpec::Named`] references.
    pub fn compile(&self) -> Result<Arc<Layout>> {
        self.compile_with(None)
    }

    pub(crate) fn compile_with(&self, registry: Option<&Registry>) -> Result<Arc<Layout>> {
        let mut fields = Vec::with_capacity(self.fields.len());
        for def in &self.fields {
            ensure!(
                !fields.iter().any(|f: &Field| f.name == def.name),
                "record '{}' declares field '{}' more than once",
                self.name,
                def.name
            );
            fields.push(field::resolve(
                def,
                self.mode,
                self.validate_defaults,
                registry,
            )?);
        }

        let mut format = String::new();
        format.push(self.mode.marker());
        for f in &fields {
            format.push_str(&f.fragment());
        }

        let mut size = 0;
        for f in &fields {
            size = advance_field(f, self.mode, size);
        }

        Ok(Arc::new(Layout {
            name: self.name.clone(),
            mode: self.mode,
            format,
            size,
            fields,
        }))
    }
}

/// Compiled, immutable binary layout of one record type.
#[derive(Debug)]
pub struct Layout {
    name: String,
    mode: Mode,
    format: String,
    size: usize,
    fields: Vec<Field>,
}

impl Layout {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The full format string: mode marker plus per-field fragments.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Total packed byte size of one instance.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn field(&self, idx: usize) -> Option<&Field> {
        self.fields.get(idx)
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Decodes a packed buffer into a record instance. The buffer length
    /// must equal [`Layout::size`] exactly.
    pub fn unpack(self: &Arc<Self>, data: &[u8]) -> Result<Record> {
        crate::codec::unpack(self, data)
    }
}

pub(crate) fn align_up(offset: usize, align: usize) -> usize {
    offset.div_ceil(align) * align
}

/// Advances `offset` across one field: explicit pads, then the kind walk.
pub(crate) fn advance_field(field: &Field, mode: Mode, mut offset: usize) -> usize {
    offset += field.pad_before;
    offset = advance_kind(&field.kind, mode, offset);
    offset + field.pad_after
}

/// Advances `offset` across one resolved kind, inserting natural alignment
/// under native-aligned mode. The codec's encode and decode passes follow
/// this walk byte for byte.
pub(crate) fn advance_kind(kind: &FieldKind, mode: Mode, mut offset: usize) -> usize {
    match kind {
        FieldKind::Prim(p) => {
            if mode.is_aligned() {
                offset = align_up(offset, p.align());
            }
            offset + p.size()
        }
        FieldKind::Bytes(len) => offset + len,
        FieldKind::Array { item, len } => {
            for _ in 0..*len {
                offset = advance_kind(item, mode, offset);
            }
            offset
        }
        FieldKind::Record(layout) => {
            for f in layout.fields() {
                offset = advance_field(f, mode, offset);
            }
            offset
        }
    }
}

/// Returns the packed byte size of a layout or of a record instance's type.
///
/// This is the type/instance-polymorphic size accessor; both forms answer
/// from the compiled layout.
pub fn get_size(value: &Value) -> Result<usize> {
    match value {
        Value::Record(rec) => Ok(rec.layout().size()),
        other => eyre::bail!("{} is not a record instance", other.type_name()),
    }
}
