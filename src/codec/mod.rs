//! # Binary Codec
//!
//! Serialization between record instances and their packed C-struct byte
//! representation. [`pack`] and [`unpack`] walk the compiled layout's
//! resolved field tree with the same offset rules the layout compiler used
//! to compute the size, so the three always agree:
//!
//! ```text
//! layout.size() == pack(instance)?.len()
//! unpack(&layout, &pack(instance)?)? == instance
//! ```
//!
//! Half-precision floats have no native Rust type; the [`f16`] submodule
//! converts their bit pattern by hand.

pub mod f16;

mod pack;
mod unpack;

pub use pack::pack;
pub use unpack::unpack;
