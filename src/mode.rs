//! # Layout Modes
//!
//! A record's binary layout is governed by its *mode*: the pair of size
//! discipline and byte order fixed when the record is compiled.
//!
//! ## Mode Matrix
//!
//! | Size   | Byte Order | Marker | Meaning                                   |
//! |--------|------------|--------|-------------------------------------------|
//! | Native | Native     | `@`    | Platform sizes, platform order, aligned   |
//! | Std    | Native     | `=`    | Fixed sizes, platform order, no alignment |
//! | Std    | Little     | `<`    | Fixed sizes, little-endian, no alignment  |
//! | Std    | Big        | `>`    | Fixed sizes, big-endian, no alignment     |
//! | Std    | Network    | `!`    | Fixed sizes, big-endian, no alignment     |
//!
//! The markers match the standard C-struct format conventions, so a format
//! string produced by this crate is readable by any tool that speaks them.
//!
//! ## Constraints
//!
//! Native size permits only native byte order: swapping bytes of types whose
//! width depends on the platform is not a meaningful layout. `Mode::new`
//! rejects the combination at construction, so an invalid mode cannot reach
//! the layout compiler.
//!
//! Mode propagates to every nested record: a record compiled under one mode
//! cannot be embedded in a container compiled under another. That check lives
//! in the field resolver.

use eyre::{bail, Result};

/// Size discipline: platform-dependent C sizes or fixed standard sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeMode {
    /// Platform C sizes with natural alignment padding.
    Native,
    /// Fixed, platform-independent sizes with no implicit padding.
    Std,
}

/// Byte order of multi-byte values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    Native,
    Little,
    Big,
    /// Network order (big-endian); kept distinct so the `!` marker survives.
    Network,
}

/// The (size, byteorder) pair governing a record's binary layout.
///
/// Construct via [`Mode::new`] or use one of the constants. Invalid
/// combinations are unrepresentable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mode {
    size: SizeMode,
    order: ByteOrder,
}

impl Mode {
    /// `@`: native sizes, native order, natural alignment.
    pub const NATIVE_ALIGNED: Mode = Mode {
        size: SizeMode::Native,
        order: ByteOrder::Native,
    };

    /// `=`: standard sizes, native order, no alignment.
    pub const NATIVE: Mode = Mode {
        size: SizeMode::Std,
        order: ByteOrder::Native,
    };

    /// `<`: standard sizes, little-endian.
    pub const LITTLE_ENDIAN: Mode = Mode {
        size: SizeMode::Std,
        order: ByteOrder::Little,
    };

    /// `>`: standard sizes, big-endian.
    pub const BIG_ENDIAN: Mode = Mode {
        size: SizeMode::Std,
        order: ByteOrder::Big,
    };

    /// `!`: standard sizes, network (big-endian) order.
    pub const NETWORK: Mode = Mode {
        size: SizeMode::Std,
        order: ByteOrder::Network,
    };

    pub fn new(size: SizeMode, order: ByteOrder) -> Result<Self> {
        if size == SizeMode::Native && order != ByteOrder::Native {
            bail!(
                "native size mode permits only native byte order (got {:?})",
                order
            );
        }
        Ok(Self { size, order })
    }

    pub fn size_mode(&self) -> SizeMode {
        self.size
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    /// Returns the single-character format marker for this mode.
    pub fn marker(&self) -> char {
        match (self.size, self.order) {
            (SizeMode::Native, _) => '@',
            (SizeMode::Std, ByteOrder::Native) => '=',
            (SizeMode::Std, ByteOrder::Little) => '<',
            (SizeMode::Std, ByteOrder::Big) => '>',
            (SizeMode::Std, ByteOrder::Network) => '!',
        }
    }

    /// Inverse of [`Mode::marker`].
    pub fn from_marker(marker: char) -> Result<Self> {
        match marker {
            '@' => Ok(Mode::NATIVE_ALIGNED),
            '=' => Ok(Mode::NATIVE),
            '<' => Ok(Mode::LITTLE_ENDIAN),
            '>' => Ok(Mode::BIG_ENDIAN),
            '!' => Ok(Mode::NETWORK),
            _ => bail!("invalid mode marker: {:?}", marker),
        }
    }

    /// True if this mode inserts natural alignment padding (`@` only).
    pub fn is_aligned(&self) -> bool {
        self.size == SizeMode::Native
    }

    /// True if multi-byte values are written most-significant byte first.
    pub fn is_big_endian(&self) -> bool {
        match self.order {
            ByteOrder::Big | ByteOrder::Network => true,
            ByteOrder::Little => false,
            ByteOrder::Native => cfg!(target_endian = "big"),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.marker())
    }
}
