//! # Type System
//!
//! The two halves of the crate's type vocabulary:
//!
//! - `primitive`: the primitive catalog (format codes, sizes, alignment,
//!   mode legality, and default-value validation rules)
//! - `value`: the owned runtime `Value` carried by record instances
//!
//! | Type        | Purpose                                  |
//! |-------------|------------------------------------------|
//! | `Primitive` | Catalog entry for one primitive kind     |
//! | `Value`     | Owned runtime value for one field        |

pub mod primitive;
pub mod value;

pub use primitive::Primitive;
pub use value::Value;
