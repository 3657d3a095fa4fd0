//! # Half-Precision Float Conversion
//!
//! Bit-level conversion between IEEE 754 binary16 and binary32 for the `e`
//! format code. The codec stores half-precision fields as `f64` values at
//! runtime and narrows through these helpers on encode.
//!
//! ## Encoding Rules
//!
//! - round-to-nearest-even on the 13 dropped mantissa bits
//! - values at or above 65520 overflow to infinity
//! - values below 2^-24 round to (signed) zero; the subnormal range
//!   [2^-24, 2^-14) is preserved
//! - NaN maps to a quiet half NaN, infinities map to half infinities
//!
//! ## Boundary Values
//!
//! | Value        | Bits     |
//! |--------------|----------|
//! | 0.0          | `0x0000` |
//! | -0.0         | `0x8000` |
//! | 2^-24 (min subnormal) | `0x0001` |
//! | 2^-14 (min normal)    | `0x0400` |
//! | 1.0          | `0x3c00` |
//! | 65504 (max)  | `0x7bff` |
//! | +inf         | `0x7c00` |
//!
//! All functions are pure and allocation-free.

/// Converts an `f32` to its nearest binary16 representation.
pub fn f32_to_f16_bits(value: f32) -> u16 {
    let bits = value.to_bits();
    let sign = ((bits >> 16) & 0x8000) as u16;
    let exp = ((bits >> 23) & 0xff) as i32;
    let man = bits & 0x007f_ffff;

    if exp == 255 {
        // Infinity keeps an empty mantissa, NaN keeps a quiet bit set.
        return if man != 0 { sign | 0x7e00 } else { sign | 0x7c00 };
    }

    let half_exp = exp - 127 + 15;
    if half_exp >= 31 {
        return sign | 0x7c00;
    }
    if half_exp <= 0 {
        if half_exp < -10 {
            return sign;
        }
        // Subnormal: restore the implicit bit, then shift into 10 bits.
        let man = man | 0x0080_0000;
        let shift = (14 - half_exp) as u32;
        let half = man >> shift;
        let rem = man & ((1 << shift) - 1);
        let halfway = 1 << (shift - 1);
        let rounded = if rem > halfway || (rem == halfway && half & 1 == 1) {
            half + 1
        } else {
            half
        };
        return sign | rounded as u16;
    }

    let half = ((half_exp as u32) << 10) | (man >> 13);
    let rem = man & 0x1fff;
    // A mantissa carry rolls into the exponent, which is still the correct
    // rounding (up to infinity at the top of the range).
    let rounded = if rem > 0x1000 || (rem == 0x1000 && half & 1 == 1) {
        half + 1
    } else {
        half
    };
    sign | rounded as u16
}

/// Widens binary16 bits to the exactly-representable `f32`.
pub fn f16_bits_to_f32(bits: u16) -> f32 {
    let sign = ((bits & 0x8000) as u32) << 16;
    let exp = ((bits >> 10) & 0x1f) as u32;
    let man = (bits & 0x03ff) as u32;

    let out = if exp == 31 {
        sign | 0x7f80_0000 | (man << 13)
    } else if exp == 0 {
        if man == 0 {
            sign
        } else {
            // Subnormal: normalize around the mantissa's leading bit.
            let msb = 31 - man.leading_zeros();
            let exp32 = msb + 103;
            let man32 = (man ^ (1 << msb)) << (23 - msb);
            sign | (exp32 << 23) | man32
        }
    } else {
        sign | ((exp + 112) << 23) | (man << 13)
    };
    f32::from_bits(out)
}
