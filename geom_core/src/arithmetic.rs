//! # Arithmetic Utilities
//!
//! Standalone numeric routines, independent of the shape model:
//!
//! - [`fast_power`] - exponentiation by repeated squaring
//! - [`fast_multiply`] / [`fast_square`] - multiplication by doubling and
//!   conditional addition
//! - [`nth_root_newton`] - real nth root via Newton-Raphson iteration
//!
//! ## Example
//!
//! ```rust
//! use geom_core::arithmetic::{fast_power, fast_square, nth_root_newton, DEFAULT_PRECISION};
//!
//! assert_eq!(fast_power(2.0, 10), 1024.0);
//! assert_eq!(fast_square(-7), 49);
//!
//! let root = nth_root_newton(27.0, 3, DEFAULT_PRECISION).unwrap();
//! assert!((root - 3.0).abs() < 1e-9);
//! ```

use crate::errors::{GeomError, GeomResult};

/// Default convergence threshold for [`nth_root_newton`]
pub const DEFAULT_PRECISION: f64 = 1e-10;

/// Iteration cap for [`nth_root_newton`]
pub const MAX_NEWTON_ITERATIONS: usize = 10_000;

/// Relative step below which iterates only differ by rounding
const ULP_TOLERANCE: f64 = 4.0 * f64::EPSILON;

/// `base` raised to `exponent` using O(log |exponent|) multiplications.
///
/// `exponent == 0` yields 1 for every base (including 0 and NaN).
/// A negative exponent yields the reciprocal of the positive power.
pub fn fast_power(base: f64, exponent: i64) -> f64 {
    if exponent < 0 {
        return 1.0 / fast_power_unsigned(base, exponent.unsigned_abs());
    }
    fast_power_unsigned(base, exponent as u64)
}

fn fast_power_unsigned(base: f64, mut exponent: u64) -> f64 {
    let mut result = 1.0;
    let mut current = base;
    while exponent > 0 {
        if exponent & 1 == 1 {
            result *= current;
        }
        exponent >>= 1;
        if exponent > 0 {
            current *= current;
        }
    }
    result
}

/// `m × n` by doubling `m` and adding it for each set bit of `n`.
pub fn fast_multiply(m: u128, n: u128) -> u128 {
    let mut result = 0;
    let mut addend = m;
    let mut bits = n;
    while bits > 0 {
        if bits & 1 == 1 {
            result += addend;
        }
        bits >>= 1;
        if bits > 0 {
            addend <<= 1;
        }
    }
    result
}

/// Square of `value`, always non-negative.
///
/// The magnitude is squared with [`fast_multiply`]; the sign of the input is
/// dropped because `(-v)² == v²`. The result is widened to `u128`, which
/// holds the square of every `i64` including `i64::MIN`.
pub fn fast_square(value: i64) -> u128 {
    let magnitude = u128::from(value.unsigned_abs());
    fast_multiply(magnitude, magnitude)
}

/// Real `n`th root of `number` by Newton-Raphson.
///
/// Iterates `x ← ((n−1)·x + number / x^(n−1)) / n` from `x₀ = number / n`
/// until two consecutive iterates differ by less than `precision`. For large
/// roots, where adjacent floats are further apart than `precision`, the
/// iteration also stops once a step shrinks to a few ULPs or an iterate
/// repeats.
///
/// # Errors
///
/// - [`GeomError::InvalidInput`] for `n == 0`, an even `n` with a negative
///   `number`, a non-finite `number`, or a precision that is not a positive
///   finite number
/// - [`GeomError::CalculationFailed`] if an iterate overflows or the
///   iteration cap is reached
pub fn nth_root_newton(number: f64, n: u32, precision: f64) -> GeomResult<f64> {
    if n == 0 {
        return Err(GeomError::invalid_input("n", "0", "Root degree must be non-zero"));
    }
    if number < 0.0 && n % 2 == 0 {
        return Err(GeomError::invalid_input(
            "number",
            number.to_string(),
            "Even root of a negative number is not real",
        ));
    }
    if !number.is_finite() {
        return Err(GeomError::invalid_input(
            "number",
            number.to_string(),
            "Number must be finite",
        ));
    }
    if !precision.is_finite() || precision <= 0.0 {
        return Err(GeomError::invalid_input(
            "precision",
            precision.to_string(),
            "Precision must be a positive finite number",
        ));
    }
    if number == 0.0 || n == 1 {
        return Ok(number);
    }

    let degree = f64::from(n);
    let mut x = number / degree;
    let mut previous = f64::NAN;
    for iteration in 0..MAX_NEWTON_ITERATIONS {
        let next = ((degree - 1.0) * x + number / fast_power(x, i64::from(n) - 1)) / degree;
        if !next.is_finite() {
            return Err(GeomError::calculation_failed(
                "nth_root_newton",
                format!("iterate diverged at step {iteration} (number={number}, n={n})"),
            ));
        }
        let step = (next - x).abs();
        if step < precision || step <= ULP_TOLERANCE * next.abs() || next == previous {
            tracing::trace!(number, n, iterations = iteration + 1, root = next, "newton converged");
            return Ok(next);
        }
        previous = x;
        x = next;
    }

    Err(GeomError::calculation_failed(
        "nth_root_newton",
        format!("no convergence within {MAX_NEWTON_ITERATIONS} iterations (number={number}, n={n})"),
    ))
}
