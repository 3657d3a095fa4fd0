//! # Primitive Field Catalog
//!
//! The canonical catalog of primitive field kinds: the mapping from a
//! semantic kind (bool, char, fixed-width integer, float, platform C type)
//! to its one-letter format code, byte size, native-mode alignment, mode
//! legality flags, and default-value validation rule.
//!
//! ## Catalog
//!
//! | Kind                  | Code | Size          | Modes       |
//! |-----------------------|------|---------------|-------------|
//! | Bool                  | `?`  | 1             | all         |
//! | Char                  | `c`  | 1             | all         |
//! | I8/U8                 | `b/B`| 1             | all         |
//! | I16/U16               | `h/H`| 2             | all         |
//! | I32/U32               | `i/I`| 4             | all         |
//! | I64/U64               | `q/Q`| 8             | all         |
//! | F16/F32/F64           |`e/f/d`| 2/4/8        | all         |
//! | CInt/CUInt            | `i/I`| platform      | native only |
//! | CLong/CULong          | `l/L`| platform      | native only |
//! | CLongLong/CULongLong  | `q/Q`| platform      | native only |
//! | SSize/Size            | `n/N`| platform      | native only |
//! | Pointer               | `P`  | platform      | native only |
//!
//! Platform widths come from `std::os::raw` / `size_of` at catalog-build
//! time, never from hardcoded constants.
//!
//! ## Validation
//!
//! `validate` runs against *default values* at record-compile time. Integer
//! kinds check two's-complement bounds for their width and signedness;
//! floats accept integer or float input with no range check; bool and char
//! are type-checked only (a char value is a `u8`, so the single-byte rule is
//! structural).

use crate::types::value::Value;
use eyre::{bail, Result};
use std::mem::size_of;
use std::os::raw::{c_int, c_long, c_longlong, c_uint, c_ulong, c_ulonglong};

/// A primitive field kind from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Bool,
    Char,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F16,
    F32,
    F64,
    CInt,
    CUInt,
    CLong,
    CULong,
    CLongLong,
    CULongLong,
    SSize,
    Size,
    Pointer,
}

impl Primitive {
    /// Returns the one-letter format code for this kind.
    pub fn code(&self) -> char {
        match self {
            Primitive::Bool => '?',
            Primitive::Char => 'c',
            Primitive::I8 => 'b',
            Primitive::U8 => 'B',
            Primitive::I16 => 'h',
            Primitive::U16 => 'H',
            Primitive::I32 | Primitive::CInt => 'i',
            Primitive::U32 | Primitive::CUInt => 'I',
            Primitive::I64 | Primitive::CLongLong => 'q',
            Primitive::U64 | Primitive::CULongLong => 'Q',
            Primitive::F16 => 'e',
            Primitive::F32 => 'f',
            Primitive::F64 => 'd',
            Primitive::CLong => 'l',
            Primitive::CULong => 'L',
            Primitive::SSize => 'n',
            Primitive::Size => 'N',
            Primitive::Pointer => 'P',
        }
    }

    /// Returns the packed byte size of this kind.
    pub fn size(&self) -> usize {
        match self {
            Primitive::Bool | Primitive::Char | Primitive::I8 | Primitive::U8 => 1,
            Primitive::I16 | Primitive::U16 | Primitive::F16 => 2,
            Primitive::I32 | Primitive::U32 | Primitive::F32 => 4,
            Primitive::I64 | Primitive::U64 | Primitive::F64 => 8,
            Primitive::CInt => size_of::<c_int>(),
            Primitive::CUInt => size_of::<c_uint>(),
            Primitive::CLong => size_of::<c_long>(),
            Primitive::CULong => size_of::<c_ulong>(),
            Primitive::CLongLong => size_of::<c_longlong>(),
            Primitive::CULongLong => size_of::<c_ulonglong>(),
            Primitive::SSize => size_of::<isize>(),
            Primitive::Size | Primitive::Pointer => size_of::<usize>(),
        }
    }

    /// Returns the natural alignment applied under native-aligned mode.
    ///
    /// Numeric kinds align to their size; bool and char pack byte-tight.
    pub fn align(&self) -> usize {
        match self {
            Primitive::Bool | Primitive::Char => 1,
            _ => self.size(),
        }
    }

    /// True if this kind is legal under native size mode.
    pub fn is_native(&self) -> bool {
        true
    }

    /// True if this kind is legal under standard size mode.
    pub fn is_std(&self) -> bool {
        !matches!(
            self,
            Primitive::CInt
                | Primitive::CUInt
                | Primitive::CLong
                | Primitive::CULong
                | Primitive::CLongLong
                | Primitive::CULongLong
                | Primitive::SSize
                | Primitive::Size
                | Primitive::Pointer
        )
    }

    /// Returns `Some(signed)` for integer kinds, `None` otherwise.
    pub fn int_signedness(&self) -> Option<bool> {
        match self {
            Primitive::I8
            | Primitive::I16
            | Primitive::I32
            | Primitive::I64
            | Primitive::CInt
            | Primitive::CLong
            | Primitive::CLongLong
            | Primitive::SSize => Some(true),
            Primitive::U8
            | Primitive::U16
            | Primitive::U32
            | Primitive::U64
            | Primitive::CUInt
            | Primitive::CULong
            | Primitive::CULongLong
            | Primitive::Size
            | Primitive::Pointer => Some(false),
            _ => None,
        }
    }

    /// Returns true for the half/single/double float kinds.
    pub fn is_float(&self) -> bool {
        matches!(self, Primitive::F16 | Primitive::F32 | Primitive::F64)
    }

    /// Returns the inclusive value bounds for integer kinds.
    pub fn int_bounds(&self) -> Option<(i128, i128)> {
        let signed = self.int_signedness()?;
        let bits = self.size() as u32 * 8;
        Some(if signed {
            (-(1i128 << (bits - 1)), (1i128 << (bits - 1)) - 1)
        } else {
            (0, (1i128 << bits) - 1)
        })
    }

    fn range_error(&self) -> String {
        match self {
            Primitive::SSize => "value out of range for signed size type".to_string(),
            Primitive::Size => "value out of range for unsigned size type".to_string(),
            Primitive::Pointer => "value out of range for system pointer".to_string(),
            _ => {
                let signed = self.int_signedness().unwrap_or(true);
                format!(
                    "value out of range for {}-bit {} integer",
                    self.size() * 8,
                    if signed { "signed" } else { "unsigned" }
                )
            }
        }
    }

    /// Validates a candidate default value against this kind.
    ///
    /// Checks the value's runtime type first, then the range rule.
    pub fn validate(&self, value: &Value) -> Result<()> {
        match self {
            Primitive::Bool => match value {
                Value::Bool(_) => Ok(()),
                other => bail!(
                    "invalid type for field: expected bool, got {}",
                    other.type_name()
                ),
            },
            Primitive::Char => match value {
                Value::Char(_) => Ok(()),
                other => bail!(
                    "invalid type for field: expected char, got {}",
                    other.type_name()
                ),
            },
            _ if self.is_float() => match value {
                Value::Float(_) | Value::Int(_) => Ok(()),
                other => bail!(
                    "invalid type for field: expected float, got {}",
                    other.type_name()
                ),
            },
            _ => {
                let v = match value {
                    Value::Int(v) => *v,
                    other => bail!(
                        "invalid type for field: expected integer, got {}",
                        other.type_name()
                    ),
                };
                let (min, max) = self
                    .int_bounds()
                    .expect("non-integer kinds are handled above");
                if v < min || v > max {
                    bail!("{}", self.range_error());
                }
                Ok(())
            }
        }
    }
}

impl std::fmt::Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
