// src/reference/scalar.rs

use num_traits::Float;
use std::fmt::Debug;
use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

/// Real floating-point element type the reference kernels are generic over.
///
/// Implemented for `f32` and `f64`; the `s*` and `d*` entry points in
/// [`super::kernels`] instantiate each kernel once per precision.
pub(crate) trait Real:
    Float + AddAssign + SubAssign + MulAssign + DivAssign + Debug + Send + Sync + 'static
{
    /// Bits in the significand, including the implicit one.
    const DIGITS: u32;
    /// Minimum exponent before gradual underflow, Fortran `MINEXPONENT`.
    const MIN_EXPONENT: i32;
    /// Largest exponent before overflow, Fortran `MAXEXPONENT`.
    const MAX_EXPONENT: i32;

    fn from_f64(v: f64) -> Self;

    fn from_usize(v: usize) -> Self {
        Self::from_f64(v as f64)
    }

    fn two() -> Self {
        Self::one() + Self::one()
    }

    /// Fortran `SIGN(a, b)`: `|a|` carrying the sign of `b`.
    fn sign_of(self, b: Self) -> Self {
        if b >= Self::zero() {
            self.abs()
        } else {
            -self.abs()
        }
    }
}

impl Real for f32 {
    const DIGITS: u32 = f32::MANTISSA_DIGITS;
    const MIN_EXPONENT: i32 = f32::MIN_EXP;
    const MAX_EXPONENT: i32 = f32::MAX_EXP;

    fn from_f64(v: f64) -> Self {
        v as f32
    }
}

impl Real for f64 {
    const DIGITS: u32 = f64::MANTISSA_DIGITS;
    const MIN_EXPONENT: i32 = f64::MIN_EXP;
    const MAX_EXPONENT: i32 = f64::MAX_EXP;

    fn from_f64(v: f64) -> Self {
        v
    }
}
