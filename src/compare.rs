//! Comparison functions parameterized by direction.
//!
//! Containers and sorts in this crate take any `Fn(&T, &T) -> Ordering` as
//! their comparator. [`Direction`] produces plain function pointers for the
//! common cases so that the comparator type can be named, e.g.
//! `BinaryHeap<u32>` uses `fn(&u32, &u32) -> Ordering`.
//!
//! Floats don't implement `Ord`; their comparators order them with
//! [`OrderedFloat`], which sorts NaN above every other value.

use core::cmp::Ordering;

use ordered_float::OrderedFloat;

/// Direction of an ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Smaller values compare as less.
    #[default]
    Ascending,

    /// Larger values compare as less.
    Descending,
}

impl Direction {
    /// Applies the direction to an ordering produced in ascending order.
    #[inline]
    #[must_use]
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    }

    /// Compares two values according to this direction.
    #[inline]
    pub fn compare<T: Ord + ?Sized>(self, a: &T, b: &T) -> Ordering {
        self.apply(a.cmp(b))
    }

    /// Returns a comparator for `T` in this direction.
    #[must_use]
    pub fn comparator<T: Ord>(self) -> fn(&T, &T) -> Ordering {
        match self {
            Direction::Ascending => ascending::<T>,
            Direction::Descending => descending::<T>,
        }
    }

    /// Returns a comparator for `f32` in this direction.
    #[must_use]
    pub fn f32_comparator(self) -> fn(&f32, &f32) -> Ordering {
        match self {
            Direction::Ascending => |a, b| OrderedFloat(*a).cmp(&OrderedFloat(*b)),
            Direction::Descending => |a, b| OrderedFloat(*b).cmp(&OrderedFloat(*a)),
        }
    }

    /// Returns a comparator for `f64` in this direction.
    #[must_use]
    pub fn f64_comparator(self) -> fn(&f64, &f64) -> Ordering {
        match self {
            Direction::Ascending => |a, b| OrderedFloat(*a).cmp(&OrderedFloat(*b)),
            Direction::Descending => |a, b| OrderedFloat(*b).cmp(&OrderedFloat(*a)),
        }
    }
}

#[cfg(feature = "arbitrary")]
impl<'a> arbitrary::Arbitrary<'a> for Direction {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        u.choose(&[Self::Ascending, Self::Descending]).copied()
    }
}

/// Natural ordering.
#[inline]
pub fn ascending<T: Ord + ?Sized>(a: &T, b: &T) -> Ordering {
    a.cmp(b)
}

/// Reverse of the natural ordering.
#[inline]
pub fn descending<T: Ord + ?Sized>(a: &T, b: &T) -> Ordering {
    b.cmp(a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directions() {
        let asc = Direction::Ascending.comparator::<i64>();
        let desc = Direction::Descending.comparator::<i64>();
        assert_eq!(asc(&1, &2), Ordering::Less);
        assert_eq!(desc(&1, &2), Ordering::Greater);
        assert_eq!(desc(&3, &3), Ordering::Equal);
        assert_eq!(Direction::Descending.compare("a", "b"), Ordering::Greater);
    }

    #[test]
    fn floats() {
        let asc = Direction::Ascending.f64_comparator();
        assert_eq!(asc(&-0.5, &1.0), Ordering::Less);
        assert_eq!(asc(&f64::NAN, &f64::INFINITY), Ordering::Greater);
        let desc = Direction::Descending.f32_comparator();
        assert_eq!(desc(&-0.5, &1.0), Ordering::Greater);
    }
}
