//! # Field Declarations and Resolution
//!
//! A record is declared as an ordered list of `FieldDef`s. Each declaration
//! carries a `TypeSpec` (what the field is), optional padding on either side,
//! an optional default value, and a construction-participation flag.
//!
//! Resolution turns one declaration into a `Field` descriptor under the
//! record's mode:
//!
//! 1. zero-length byte arrays / arrays are rejected
//! 2. nested records must carry exactly the container's mode
//! 3. registry-named types are looked up in the side-table
//! 4. the primitive catalog's mode flags are enforced
//! 5. when default validation is enabled, the default's runtime type and
//!    range are checked (arrays also check their declared length, elementwise)
//!
//! Descriptors are created once at record-compile time and are immutable
//! afterwards; they are owned exclusively by the compiled layout.
//!
//! ## Format Fragments
//!
//! Every resolved field contributes a fragment to the record's format string:
//! `{n}x` for padding, the catalog code for primitives, `{n}s` for byte
//! arrays, the item fragment repeated for arrays, and the nested record's
//! format body (mode marker stripped) for nested records.

use crate::layout::Layout;
use crate::mode::Mode;
use crate::registry::Registry;
use crate::types::{Primitive, Value};
use eyre::{bail, ensure, Result};
use std::sync::Arc;

/// Declared type of one field.
#[derive(Debug, Clone)]
pub enum TypeSpec {
    /// A primitive kind from the catalog.
    Prim(Primitive),
    /// A fixed-size byte array of the given length (`{n}s`).
    Bytes(usize),
    /// A fixed-length array of the item type. Nesting arrays gives
    /// multi-dimensional arrays.
    Array(Box<TypeSpec>, usize),
    /// A nested record with an already-compiled layout.
    Record(Arc<Layout>),
    /// A nested record resolved by name through a [`Registry`].
    Named(String),
}

impl TypeSpec {
    pub fn array(item: TypeSpec, len: usize) -> Self {
        TypeSpec::Array(Box::new(item), len)
    }

    pub fn named(name: impl Into<String>) -> Self {
        TypeSpec::Named(name.into())
    }
}

impl From<Primitive> for TypeSpec {
    fn from(p: Primitive) -> Self {
        TypeSpec::Prim(p)
    }
}

impl From<Arc<Layout>> for TypeSpec {
    fn from(layout: Arc<Layout>) -> Self {
        TypeSpec::Record(layout)
    }
}

impl From<&Arc<Layout>> for TypeSpec {
    fn from(layout: &Arc<Layout>) -> Self {
        TypeSpec::Record(layout.clone())
    }
}

/// One field declaration: name, type, padding, default, construction flag.
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub(crate) name: String,
    pub(crate) spec: TypeSpec,
    pub(crate) pad_before: usize,
    pub(crate) pad_after: usize,
    pub(crate) default: Option<Value>,
    pub(crate) init: bool,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, spec: impl Into<TypeSpec>) -> Self {
        Self {
            name: name.into(),
            spec: spec.into(),
            pad_before: 0,
            pad_after: 0,
            default: None,
            init: true,
        }
    }

    /// Adds zero-fill bytes before the field. Repeated calls accumulate.
    pub fn pad_before(mut self, bytes: usize) -> Self {
        self.pad_before += bytes;
        self
    }

    /// Adds zero-fill bytes after the field. Repeated calls accumulate.
    pub fn pad_after(mut self, bytes: usize) -> Self {
        self.pad_after += bytes;
        self
    }

    /// Sets the default value, validated at record-compile time unless the
    /// record opts out.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Excludes the field from positional construction; it is then filled
    /// from its default and must declare one.
    pub fn no_init(mut self) -> Self {
        self.init = false;
        self
    }
}

/// Resolved kind of one field.
#[derive(Debug, Clone)]
pub enum FieldKind {
    Prim(Primitive),
    Bytes(usize),
    Array { item: Box<FieldKind>, len: usize },
    Record(Arc<Layout>),
}

impl FieldKind {
    /// True if this kind is legal under native size mode.
    pub fn is_native(&self) -> bool {
        match self {
            FieldKind::Prim(p) => p.is_native(),
            FieldKind::Bytes(_) => true,
            FieldKind::Array { item, .. } => item.is_native(),
            FieldKind::Record(_) => true,
        }
    }

    /// True if this kind is legal under standard size mode.
    pub fn is_std(&self) -> bool {
        match self {
            FieldKind::Prim(p) => p.is_std(),
            FieldKind::Bytes(_) => true,
            FieldKind::Array { item, .. } => item.is_std(),
            FieldKind::Record(_) => true,
        }
    }

    /// Format fragment contributed by this kind (padding excluded).
    pub fn fragment(&self) -> String {
        match self {
            FieldKind::Prim(p) => p.code().to_string(),
            FieldKind::Bytes(n) => format!("{}s", n),
            FieldKind::Array { item, len } => item.fragment().repeat(*len),
            // The nested format body, mode marker stripped.
            FieldKind::Record(layout) => layout.format()[1..].to_string(),
        }
    }
}

/// Resolved field descriptor owned by a compiled layout.
#[derive(Debug, Clone)]
pub struct Field {
    pub(crate) name: String,
    pub(crate) kind: FieldKind,
    pub(crate) pad_before: usize,
    pub(crate) pad_after: usize,
    pub(crate) default: Option<Value>,
    pub(crate) init: bool,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn pad_before(&self) -> usize {
        self.pad_before
    }

    pub fn pad_after(&self) -> usize {
        self.pad_after
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// True if the field takes a positional value in [`crate::Record::new`].
    pub fn init(&self) -> bool {
        self.init
    }

    /// Format fragment including the field's explicit padding.
    pub fn fragment(&self) -> String {
        let mut fragment = String::new();
        if self.pad_before > 0 {
            fragment.push_str(&format!("{}x", self.pad_before));
        }
        fragment.push_str(&self.kind.fragment());
        if self.pad_after > 0 {
            fragment.push_str(&format!("{}x", self.pad_after));
        }
        fragment
    }
}

/// Resolves one declaration into a field descriptor under `mode`.
pub(crate) fn resolve(
    def: &FieldDef,
    mode: Mode,
    validate_defaults: bool,
    registry: Option<&Registry>,
) -> Result<Field> {
    let kind = resolve_spec(&def.spec, &def.name, mode, registry)?;

    ensure!(
        def.init || def.default.is_some(),
        "field '{}' does not participate in construction and has no default",
        def.name
    );

    if validate_defaults {
        if let Some(default) = &def.default {
            validate_default(&kind, default, &def.name)?;
        }
    }

    Ok(Field {
        name: def.name.clone(),
        kind,
        pad_before: def.pad_before,
        pad_after: def.pad_after,
        default: def.default.clone(),
        init: def.init,
    })
}

fn resolve_spec(
    spec: &TypeSpec,
    field: &str,
    mode: Mode,
    registry: Option<&Registry>,
) -> Result<FieldKind> {
    match spec {
        TypeSpec::Prim(p) => {
            if mode.is_aligned() {
                ensure!(
                    p.is_native(),
                    "field '{}': {} is only supported in standard size mode",
                    field,
                    p
                );
            } else {
                ensure!(
                    p.is_std(),
                    "field '{}': {} is only supported in native size mode",
                    field,
                    p
                );
            }
            Ok(FieldKind::Prim(*p))
        }
        TypeSpec::Bytes(len) => {
            ensure!(
                *len > 0,
                "field '{}': byte array length must be a positive integer",
                field
            );
            Ok(FieldKind::Bytes(*len))
        }
        TypeSpec::Array(item, len) => {
            ensure!(
                *len > 0,
                "field '{}': array length must be a positive integer",
                field
            );
            let item = resolve_spec(item, field, mode, registry)?;
            Ok(FieldKind::Array {
                item: Box::new(item),
                len: *len,
            })
        }
        TypeSpec::Record(layout) => {
            check_nested_mode(layout, field, mode)?;
            Ok(FieldKind::Record(layout.clone()))
        }
        TypeSpec::Named(name) => {
            let layout = registry
                .and_then(|reg| reg.get(name))
                .ok_or_else(|| {
                    eyre::eyre!(
                        "field '{}': type not supported: '{}' is not a registered record",
                        field,
                        name
                    )
                })?;
            check_nested_mode(&layout, field, mode)?;
            Ok(FieldKind::Record(layout))
        }
    }
}

fn check_nested_mode(layout: &Arc<Layout>, field: &str, mode: Mode) -> Result<()> {
    ensure!(
        layout.mode() == mode,
        "field '{}': mode of nested record '{}' ('{}') does not match that of container ('{}')",
        field,
        layout.name(),
        layout.mode(),
        mode
    );
    Ok(())
}

fn validate_default(kind: &FieldKind, value: &Value, field: &str) -> Result<()> {
    match kind {
        FieldKind::Prim(p) => p
            .validate(value)
            .map_err(|e| eyre::eyre!("{} (field '{}')", e, field)),
        FieldKind::Bytes(_) => match value {
            Value::Bytes(_) => Ok(()),
            other => bail!(
                "invalid type for field '{}': expected bytes, got {}",
                field,
                other.type_name()
            ),
        },
        FieldKind::Array { item, len } => {
            let items = match value {
                Value::Array(items) => items,
                other => bail!(
                    "invalid type for field '{}': expected array, got {}",
                    field,
                    other.type_name()
                ),
            };
            ensure!(
                items.len() == *len,
                "array default for field '{}' has length {}, expected {}",
                field,
                items.len(),
                len
            );
            for v in items {
                validate_default(item, v, field)?;
            }
            Ok(())
        }
        FieldKind::Record(layout) => match value {
            Value::Record(rec) if Arc::ptr_eq(rec.layout_arc(), layout) => Ok(()),
            other => bail!(
                "invalid type for field '{}': expected instance of record '{}', got {}",
                field,
                layout.name(),
                other.type_name()
            ),
        },
    }
}
