//! Multi-resolution splitting.
//!
//! A [`Decomposer`] splits one item into a list of smaller items at a
//! caller-chosen granularity. Constraint families implement it per their
//! geometry or time axis, and [`Task`](crate::models::Task) composes them.
//!
//! # Contract
//!
//! - `trivial_decompose()` returns exactly one element and never fails.
//! - `scale_decompose(1)` equals `trivial_decompose()`.
//! - Divisible families reject `scale < 1` with
//!   [`DecomposeError::InvalidScale`]; indivisible families ignore the
//!   scale and always return their trivial decomposition.

use crate::error::DecomposeError;

/// Splits an item into smaller items.
pub trait Decomposer<T> {
    /// Identity split: a single copy of the item.
    fn trivial_decompose(&self) -> Vec<T>;

    /// Splits into roughly `scale` parts.
    fn scale_decompose(&self, scale: i32) -> Result<Vec<T>, DecomposeError>;
}

/// Rejects scales below 1.
pub(crate) fn check_scale(scale: i32) -> Result<(), DecomposeError> {
    if scale < 1 {
        Err(DecomposeError::InvalidScale(scale))
    } else {
        Ok(())
    }
}

/// Splits `total` units into `scale` contiguous `(offset, length)` parts of
/// equal length, the integer-division remainder absorbed by the last part.
pub(crate) fn split_even(total: i64, scale: i32) -> Result<Vec<(i64, i64)>, DecomposeError> {
    check_scale(scale)?;
    let n = scale as i64;
    let per = total / n;
    if per <= 0 {
        return Err(DecomposeError::InvalidSubRange {
            scale,
            reason: format!("span of {total} units is shorter than {scale} parts"),
        });
    }
    Ok((0..n)
        .map(|i| {
            let offset = i * per;
            let length = if i == n - 1 { total - offset } else { per };
            (offset, length)
        })
        .collect())
}
