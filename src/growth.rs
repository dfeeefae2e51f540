//! Growth policies for flat arrays.
//!
//! Every container in this crate is backed by one or more flat arrays which
//! are created with an initial size and grown on demand. A [`GrowthStrategy`]
//! decides how large the new array should be, and [`ensure_capacity`] applies
//! that decision to a `Vec`.
//!
//! The arrays managed here are always fully initialized: their length *is*
//! their capacity, and slots beyond the in-use region hold a filler value.
//! This keeps the observable capacity of a container deterministic and
//! independent of the global allocator.

use alloc::vec::Vec;

use crate::Error;

/// Policy deciding the new size of an array which needs to grow.
#[derive(Clone, Copy, Debug, Default)]
pub enum GrowthStrategy {
    /// Repeatedly double the current size (treating an empty array as having a
    /// size of 1) until the minimum is reached.
    #[default]
    Double,

    /// Grow to exactly the minimum size.
    Exact,

    /// Caller-supplied policy, called with `(current, minimum)`.
    ///
    /// The function must return a value of at least `minimum`. Returning less
    /// causes the growing operation to fail with [`Error::GrowthFailure`].
    Custom(fn(usize, usize) -> usize),
}

impl GrowthStrategy {
    /// Returns the size that an array of `current` elements should grow to in
    /// order to hold at least `minimum` elements.
    ///
    /// If `minimum` is not larger than `current` then no growth is needed and
    /// `current` is returned unchanged.
    #[must_use]
    pub fn growth_request(self, current: usize, minimum: usize) -> usize {
        if minimum <= current {
            return current;
        }
        match self {
            GrowthStrategy::Double => {
                let mut size = current.max(1);
                while size < minimum {
                    size = size.saturating_mul(2);
                }
                size
            }
            GrowthStrategy::Exact => minimum,
            GrowthStrategy::Custom(f) => f(current, minimum),
        }
    }

    /// Same as [`GrowthStrategy::growth_request`] but checks that the strategy
    /// delivered at least `minimum`.
    pub fn checked_growth(self, current: usize, minimum: usize) -> Result<usize, Error> {
        let granted = self.growth_request(current, minimum);
        if granted < minimum {
            return Err(Error::GrowthFailure {
                requested: minimum,
                granted,
            });
        }
        Ok(granted)
    }
}

#[cfg(feature = "arbitrary")]
impl<'a> arbitrary::Arbitrary<'a> for GrowthStrategy {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        u.choose(&[Self::Double, Self::Exact]).copied()
    }
}

/// Ensures that `array` has a length of at least `min_size`, growing it
/// according to `strategy` if needed.
///
/// Existing elements are preserved and new slots are filled with clones of
/// `fill`. If the strategy returns a size smaller than `min_size` then
/// [`Error::GrowthFailure`] is returned and `array` is left untouched.
pub fn ensure_capacity<T: Clone>(
    array: &mut Vec<T>,
    min_size: usize,
    strategy: GrowthStrategy,
    fill: T,
) -> Result<(), Error> {
    ensure_capacity_with(array, min_size, strategy, || fill.clone())
}

/// Same as [`ensure_capacity`] but new slots are initialized by calling `f`.
pub fn ensure_capacity_with<T>(
    array: &mut Vec<T>,
    min_size: usize,
    strategy: GrowthStrategy,
    f: impl FnMut() -> T,
) -> Result<(), Error> {
    if array.len() >= min_size {
        return Ok(());
    }
    let new_size = strategy.checked_growth(array.len(), min_size)?;
    trace!("Growing array from {} to {new_size}", array.len());
    array.reserve_exact(new_size - array.len());
    array.resize_with(new_size, f);
    Ok(())
}
