//! # recpack - Declarative C-Struct Binary Layouts
//!
//! recpack compiles declarative record definitions into fixed C-struct binary
//! layouts and packs/unpacks instances against them. Every record type has a
//! deterministic format string, byte size, and field order; the codec never
//! allocates beyond the output buffer.
//!
//! ## Quick Start
//!
//! ```ignore
//! use recpack::{FieldDef, Mode, Primitive, Record, RecordDef, TypeSpec, Value};
//!
//! let layout = RecordDef::new("Header")
//!     .mode(Mode::BIG_ENDIAN)
//!     .field(FieldDef::new("version", Primitive::U16))
//!     .field(FieldDef::new("flags", Primitive::U8).default(0i64))
//!     .field(FieldDef::new("tag", TypeSpec::Bytes(4)))
//!     .compile()?;
//!
//! let rec = Record::new(&layout, vec![
//!     Value::Int(3),
//!     Value::Int(0),
//!     Value::Bytes(b"PACK".to_vec()),
//! ])?;
//!
//! let bytes = rec.pack()?;
//! assert_eq!(bytes.len(), layout.size());
//! assert_eq!(layout.unpack(&bytes)?, rec);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Registry (named record lookup)     │
//! ├─────────────────────────────────────┤
//! │   RecordDef ──compile──► Layout      │
//! │   (field resolution, format, size)   │
//! ├─────────────────────────────────────┤
//! │   Record (instance = layout+values)  │
//! ├─────────────────────────────────────┤
//! │   Codec (pack / unpack, f16)         │
//! └─────────────────────────────────────┘
//! ```
//!
//! ## Modes
//!
//! A layout mode is a size discipline crossed with a byte order, written as
//! the leading marker of the format string:
//!
//! | Mode                   | Marker | Sizes    | Alignment |
//! |------------------------|--------|----------|-----------|
//! | `Mode::NATIVE_ALIGNED` | `@`    | native   | natural   |
//! | `Mode::NATIVE`         | `=`    | standard | none      |
//! | `Mode::LITTLE_ENDIAN`  | `<`    | standard | none      |
//! | `Mode::BIG_ENDIAN`     | `>`    | standard | none      |
//! | `Mode::NETWORK`        | `!`    | standard | none      |
//!
//! Platform-dependent kinds (`c_int`, `size_t`, pointers) exist only under
//! the native modes; fixed-width kinds are legal everywhere. Nested records
//! must be compiled under exactly the container's mode.
//!
//! ## Module Overview
//!
//! - [`mode`]: size mode, byte order, format markers
//! - [`types`]: the primitive catalog and runtime values
//! - [`layout`]: field declarations, resolution, layout compilation
//! - [`record`]: record instances
//! - [`codec`]: pack/unpack and half-precision conversion
//! - [`registry`]: write-once named record table

pub mod codec;
pub mod layout;
pub mod mode;
pub mod record;
pub mod registry;
pub mod types;

pub use codec::{pack, unpack};
pub use layout::{get_size, Field, FieldDef, FieldKind, Layout, RecordDef, TypeSpec};
pub use mode::{ByteOrder, Mode, SizeMode};
pub use record::Record;
pub use registry::Registry;
pub use types::{Primitive, Value};
