//! Fixed-point constant sets for the IDCT butterflies and the color matrix.
//!
//! Every mantissa is `round(value * 2^frac_bits)`. A product with one of
//! these constants is always brought back to scale with [`descale`], which
//! adds a half-unit rounding bias before the arithmetic shift.

/// Number of coefficients in one block.
pub const DCTSIZE2: usize = 64;

/// Side length of one block.
pub const DCTSIZE: usize = 8;

/// A real constant approximated as `mantissa / 2^frac_bits`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPoint {
    /// Scaled integer value.
    pub mantissa: i32,
    /// Position of the implicit binary point.
    pub frac_bits: u32,
}

impl FixedPoint {
    /// Construct from an already scaled mantissa.
    #[must_use]
    pub const fn new(mantissa: i32, frac_bits: u32) -> Self {
        Self {
            mantissa,
            frac_bits,
        }
    }

    /// Nearest fixed-point approximation of `value`.
    #[must_use]
    pub fn from_f64(value: f64, frac_bits: u32) -> Self {
        let scaled = value * f64::from(1u32 << frac_bits);
        // round half away from zero without std
        let mantissa = if scaled >= 0.0 {
            (scaled + 0.5) as i32
        } else {
            (scaled - 0.5) as i32
        };
        Self::new(mantissa, frac_bits)
    }

    /// Rounded product `x * value`, brought back to integer scale.
    #[inline(always)]
    #[must_use]
    pub const fn scale(self, x: i32) -> i32 {
        descale(x.wrapping_mul(self.mantissa), self.frac_bits)
    }

    /// True when this constant is the nearest approximation of `value`.
    #[must_use]
    pub fn approximates(self, value: f64) -> bool {
        Self::from_f64(value, self.frac_bits) == self
    }
}

/// Rounding right shift: `(x + 2^(n-1)) >> n`, with a wrapping add.
#[inline(always)]
#[must_use]
pub const fn descale(x: i32, n: u32) -> i32 {
    x.wrapping_add(1 << (n - 1)) >> n
}

/// Fractional bits of the accurate (islow) butterfly constants.
pub const CONST_BITS: u32 = 13;

/// Accurate IDCT constants, 13 fractional bits.
pub mod islow {
    #![allow(missing_docs)]
    pub const F_0_298: i32 = 2446;
    pub const F_0_390: i32 = 3196;
    pub const F_0_541: i32 = 4433;
    pub const F_0_765: i32 = 6270;
    pub const F_0_899: i32 = 7373;
    pub const F_1_175: i32 = 9633;
    pub const F_1_501: i32 = 12299;
    pub const F_1_847: i32 = 15137;
    pub const F_1_961: i32 = 16069;
    pub const F_2_053: i32 = 16819;
    pub const F_2_562: i32 = 20995;
    pub const F_3_072: i32 = 25172;

    // Pre-combined pairs; each saves one multiply-accumulate per output.
    pub const F_0_541_PLUS_0_765: i32 = F_0_541 + F_0_765;
    pub const F_0_541_MINUS_1_847: i32 = F_0_541 - F_1_847;
    pub const F_1_175_MINUS_1_961: i32 = F_1_175 - F_1_961;
    pub const F_1_175_MINUS_0_390: i32 = F_1_175 - F_0_390;
    pub const F_0_298_MINUS_0_899: i32 = F_0_298 - F_0_899;
    pub const F_1_501_MINUS_0_899: i32 = F_1_501 - F_0_899;
    pub const F_2_053_MINUS_2_562: i32 = F_2_053 - F_2_562;
    pub const F_3_072_MINUS_2_562: i32 = F_3_072 - F_2_562;
}

/// Fractional bits of the fast (ifast) remainders.
pub const IFAST_BITS: u32 = 15;

/// Fast IDCT constants: fractional part of each multiplier in Q15.
///
/// The integer part is added back with plain adds, so `1.414 = 1 + F_0_414`.
pub mod ifast {
    #![allow(missing_docs)]
    /// 1.082392200 - 1
    pub const F_0_082: i32 = 2688;
    /// 1.414213562 - 1
    pub const F_0_414: i32 = 13568;
    /// 1.847759065 - 1
    pub const F_0_847: i32 = 27776;
    /// 2.613125930 - 2
    pub const F_0_613: i32 = 20096;
}

/// AAN scale factors (`cos(k*pi/16) * sqrt(2)` products), 14 fractional bits.
///
/// Used to fold the fast IDCT's output scaling into its multiplier table.
pub const AAN_SCALES: [i32; DCTSIZE2] = [
    16384, 22725, 21407, 19266, 16384, 12873, 8867, 4520, //
    22725, 31521, 29692, 26722, 22725, 17855, 12299, 6270, //
    21407, 29692, 27969, 25172, 21407, 16819, 11585, 5906, //
    19266, 26722, 25172, 22654, 19266, 15137, 10426, 5315, //
    16384, 22725, 21407, 19266, 16384, 12873, 8867, 4520, //
    12873, 17855, 16819, 15137, 12873, 10114, 6967, 3552, //
    8867, 12299, 11585, 10426, 8867, 6967, 4799, 2446, //
    4520, 6270, 5906, 5315, 4520, 3552, 2446, 1247,
];

/// Fractional bits of [`AAN_SCALES`].
pub const AAN_BITS: u32 = 14;

/// Reduced 4x4 IDCT constants, 13 fractional bits.
pub mod reduced4 {
    #![allow(missing_docs)]
    pub const F_0_211: i32 = 1730;
    pub const F_0_509: i32 = 4176;
    pub const F_0_601: i32 = 4926;
    pub const F_0_765: i32 = 6270;
    pub const F_0_899: i32 = 7373;
    pub const F_1_061: i32 = 8697;
    pub const F_1_451: i32 = 11893;
    pub const F_1_847: i32 = 15137;
    pub const F_2_172: i32 = 17799;
    pub const F_2_562: i32 = 20995;
}

/// Reduced 2x2 IDCT constants, 13 fractional bits.
pub mod reduced2 {
    #![allow(missing_docs)]
    pub const F_0_720: i32 = 5906;
    pub const F_0_850: i32 = 6967;
    pub const F_1_272: i32 = 10426;
    pub const F_3_624: i32 = 29692;
}

/// Fractional bits of the color matrix.
pub const SCALEBITS: u32 = 16;

/// Half unit at [`SCALEBITS`].
pub const ONE_HALF: i32 = 1 << (SCALEBITS - 1);

/// BT.601 (JFIF full range) color matrix, 16 fractional bits.
pub mod color {
    #![allow(missing_docs)]
    // forward
    pub const F_0_29900: i32 = 19595;
    pub const F_0_58700: i32 = 38470;
    pub const F_0_11400: i32 = 7471;
    pub const F_0_16874: i32 = 11059;
    pub const F_0_33126: i32 = 21709;
    pub const F_0_50000: i32 = 32768;
    pub const F_0_41869: i32 = 27439;
    pub const F_0_08131: i32 = 5329;
    // inverse
    pub const F_1_40200: i32 = 91881;
    pub const F_1_77200: i32 = 116130;
    pub const F_0_34414: i32 = 22554;
    pub const F_0_71414: i32 = 46802;
    // fractional remainders of the inverse multipliers above 1.0
    pub const F_0_40200: i32 = F_1_40200 - (1 << super::SCALEBITS);
    pub const F_0_77200: i32 = F_1_77200 - (1 << super::SCALEBITS);

    use super::{FixedPoint, SCALEBITS};

    /// 1.402 minus its integer part, applied to centered Cr for red.
    pub const CR_TO_RED: FixedPoint = FixedPoint::new(F_0_40200, SCALEBITS);
    /// 1.772 minus its integer part, applied to centered Cb for blue.
    pub const CB_TO_BLUE: FixedPoint = FixedPoint::new(F_0_77200, SCALEBITS);
}
