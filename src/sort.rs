//! In-place sort of a master array which mirrors every swap onto slave arrays.
//!
//! This is useful for column-oriented data: a key column is sorted and every
//! other column follows along, so that row `i` of every array still describes
//! the same record afterwards. Slaves only need to implement [`Swappable`].
//!
//! The algorithm is an introsort: a quicksort with 3-way partitioning (so that
//! runs of equal keys are handled in linear time) which falls back to heapsort
//! when partitioning degenerates. Small ranges use insertion sort. Pending
//! ranges are kept on an explicit stack.

use alloc::vec::Vec;
use core::cmp::Ordering;

use smallvec::SmallVec;

use crate::Error;
use crate::entity::{EntityRef, SecondaryMap};

/// Ranges shorter than this are sorted with insertion sort.
const INSERTION_SORT_THRESHOLD: usize = 7;

/// Ranges longer than this use a pseudo-median of 9 as the pivot.
const NINTHER_THRESHOLD: usize = 40;

/// A sequence whose elements can be exchanged by position.
pub trait Swappable {
    /// Returns the number of elements.
    fn len(&self) -> usize;

    /// Exchanges the elements at positions `a` and `b`.
    fn swap(&mut self, a: usize, b: usize);
}

impl<T> Swappable for [T] {
    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    #[inline]
    fn swap(&mut self, a: usize, b: usize) {
        <[T]>::swap(self, a, b);
    }
}

impl<T> Swappable for Vec<T> {
    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn swap(&mut self, a: usize, b: usize) {
        self.as_mut_slice().swap(a, b);
    }
}

impl<K: EntityRef, V> Swappable for SecondaryMap<K, V> {
    #[inline]
    fn len(&self) -> usize {
        SecondaryMap::len(self)
    }

    #[inline]
    fn swap(&mut self, a: usize, b: usize) {
        SecondaryMap::swap(self, K::new(a), K::new(b));
    }
}

/// Sorts `master` by `cmp`, swapping the elements of every slave in lockstep.
///
/// Every slave must have the same length as `master`, otherwise
/// [`Error::ShapeMismatch`] is returned before anything is modified.
///
/// The sort is not stable.
pub fn sort<T, F>(master: &mut [T], cmp: F, slaves: &mut [&mut dyn Swappable]) -> Result<(), Error>
where
    F: FnMut(&T, &T) -> Ordering,
{
    let num_slaves = slaves.len();
    sort_range(master, 0, master.len(), cmp, slaves, num_slaves)
}

/// Sorts `master[off..off + len]` by `cmp`, swapping the elements of the first
/// `num_slaves` slaves in lockstep. The other slaves are left alone.
///
/// Swaps are applied at the same positions in the slaves as in `master`, so
/// every participating slave must have the same length as `master`.
///
/// Returns [`Error::ShapeMismatch`] if a participating slave has the wrong
/// length or if `num_slaves` exceeds `slaves.len()`, and
/// [`Error::OutOfBounds`] if the range doesn't fit in `master`. Nothing is
/// modified in either case.
pub fn sort_range<T, F>(
    master: &mut [T],
    off: usize,
    len: usize,
    cmp: F,
    slaves: &mut [&mut dyn Swappable],
    num_slaves: usize,
) -> Result<(), Error>
where
    F: FnMut(&T, &T) -> Ordering,
{
    if num_slaves > slaves.len() {
        return Err(Error::ShapeMismatch {
            expected: num_slaves,
            found: slaves.len(),
        });
    }
    match off.checked_add(len) {
        Some(end) if end <= master.len() => {}
        _ => {
            return Err(Error::OutOfBounds {
                end: off.saturating_add(len),
                len: master.len(),
            });
        }
    }
    let slaves = &mut slaves[..num_slaves];
    for slave in slaves.iter() {
        if slave.len() != master.len() {
            return Err(Error::ShapeMismatch {
                expected: master.len(),
                found: slave.len(),
            });
        }
    }

    let mut sorter = Sorter {
        master,
        slaves,
        cmp,
    };
    sorter.introsort(off, len);
    Ok(())
}

/// Maximum partitioning depth for a range of `len` elements before switching
/// to heapsort.
fn depth_limit(len: usize) -> u32 {
    2 * (usize::BITS - len.leading_zeros())
}

struct Sorter<'a, 'b, T, F> {
    master: &'a mut [T],
    slaves: &'a mut [&'b mut dyn Swappable],
    cmp: F,
}

impl<T, F> Sorter<'_, '_, T, F>
where
    F: FnMut(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&mut self, a: usize, b: usize) -> Ordering {
        (self.cmp)(&self.master[a], &self.master[b])
    }

    #[inline]
    fn swap(&mut self, a: usize, b: usize) {
        self.master.swap(a, b);
        for slave in self.slaves.iter_mut() {
            slave.swap(a, b);
        }
    }

    /// Swaps `n` elements starting at `a` with `n` elements starting at `b`.
    #[inline]
    fn swap_runs(&mut self, a: usize, b: usize, n: usize) {
        for i in 0..n {
            self.swap(a + i, b + i);
        }
    }

    /// Returns the index of the median of the elements at `a`, `b` and `c`.
    fn median_of_3(&mut self, a: usize, b: usize, c: usize) -> usize {
        if self.compare(a, b) == Ordering::Less {
            if self.compare(b, c) == Ordering::Less {
                b
            } else if self.compare(a, c) == Ordering::Less {
                c
            } else {
                a
            }
        } else if self.compare(b, c) == Ordering::Greater {
            b
        } else if self.compare(a, c) == Ordering::Greater {
            c
        } else {
            a
        }
    }

    /// Picks the pivot index for the range `[off, off + len)`.
    fn choose_pivot(&mut self, off: usize, len: usize) -> usize {
        let mut m = off + len / 2;
        if len > INSERTION_SORT_THRESHOLD {
            let mut l = off;
            let mut n = off + len - 1;
            if len > NINTHER_THRESHOLD {
                let s = len / 8;
                l = self.median_of_3(l, l + s, l + 2 * s);
                m = self.median_of_3(m - s, m, m + s);
                n = self.median_of_3(n - 2 * s, n - s, n);
            }
            m = self.median_of_3(l, m, n);
        }
        m
    }

    fn insertion_sort(&mut self, off: usize, len: usize) {
        for i in off + 1..off + len {
            let mut j = i;
            while j > off && self.compare(j - 1, j) == Ordering::Greater {
                self.swap(j, j - 1);
                j -= 1;
            }
        }
    }

    /// Moves the element at `root` down the max-heap stored in
    /// `[off, off + end)`.
    fn sift_down(&mut self, off: usize, mut root: usize, end: usize) {
        loop {
            let mut child = 2 * root + 1;
            if child >= end {
                break;
            }
            if child + 1 < end && self.compare(off + child, off + child + 1) == Ordering::Less {
                child += 1;
            }
            if self.compare(off + root, off + child) != Ordering::Less {
                break;
            }
            self.swap(off + root, off + child);
            root = child;
        }
    }

    fn heapsort(&mut self, off: usize, len: usize) {
        for start in (0..len / 2).rev() {
            self.sift_down(off, start, len);
        }
        for end in (1..len).rev() {
            self.swap(off, off + end);
            self.sift_down(off, 0, end);
        }
    }

    /// Partitions `[off, off + len)` around a pivot into elements less than,
    /// equal to and greater than it. Returns the lengths of the "less" run at
    /// the start of the range and of the "greater" run at its end.
    fn partition(&mut self, off: usize, len: usize) -> (usize, usize) {
        let pivot = self.choose_pivot(off, len);
        self.swap(off, pivot);

        // Invariant: [off, a) == pivot, [a, b) < pivot, (c, d] > pivot,
        // (d, end) == pivot.
        let end = off + len;
        let mut a = off + 1;
        let mut b = off + 1;
        let mut c = end - 1;
        let mut d = end - 1;
        loop {
            while b <= c {
                match self.compare(b, off) {
                    Ordering::Greater => break,
                    Ordering::Equal => {
                        self.swap(a, b);
                        a += 1;
                    }
                    Ordering::Less => {}
                }
                b += 1;
            }
            while c >= b {
                match self.compare(c, off) {
                    Ordering::Less => break,
                    Ordering::Equal => {
                        self.swap(c, d);
                        d -= 1;
                    }
                    Ordering::Greater => {}
                }
                c -= 1;
            }
            if b > c {
                break;
            }
            self.swap(b, c);
            b += 1;
            c -= 1;
        }

        // Move the runs equal to the pivot to the middle.
        let s = (a - off).min(b - a);
        self.swap_runs(off, b - s, s);
        let s = (d - c).min(end - d - 1);
        self.swap_runs(b, end - s, s);

        (b - a, d - c)
    }

    fn introsort(&mut self, off: usize, len: usize) {
        let mut stack: SmallVec<[(usize, usize, u32); 32]> = SmallVec::new();
        stack.push((off, len, depth_limit(len)));
        while let Some((off, len, depth)) = stack.pop() {
            if len < INSERTION_SORT_THRESHOLD {
                self.insertion_sort(off, len);
                continue;
            }
            if depth == 0 {
                trace!("Falling back to heapsort for {len} elements at {off}");
                self.heapsort(off, len);
                continue;
            }
            let (less, greater) = self.partition(off, len);
            if less > 1 {
                stack.push((off, less, depth - 1));
            }
            if greater > 1 {
                stack.push((off + len - greater, greater, depth - 1));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;
    use alloc::{format, vec};

    use super::*;
    use crate::Handle;
    use crate::compare::Direction;

    fn lcg(seed: &mut u64) -> u64 {
        *seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        *seed >> 33
    }

    #[test]
    fn swaps_are_mirrored() {
        for (n, range) in [(0, 1), (5, 100), (50, 10), (1000, 1000), (3000, 7)] {
            let mut seed = n as u64;
            let mut keys: Vec<u64> = (0..n).map(|_| lcg(&mut seed) % range).collect();
            let mut rows: Vec<usize> = (0..n).collect();
            let mut labels: Vec<String> = keys.iter().map(|k| format!("{k}")).collect();
            let original = keys.clone();

            sort(&mut keys, |a, b| a.cmp(b), &mut [&mut rows, &mut labels]).unwrap();

            assert!(keys.is_sorted());
            for i in 0..n {
                assert_eq!(original[rows[i]], keys[i]);
                assert_eq!(labels[i], format!("{}", keys[i]));
            }
        }
    }

    #[test]
    fn descending() {
        let mut keys = vec![3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5];
        let mut rows: Vec<usize> = (0..keys.len()).collect();
        sort(
            &mut keys,
            Direction::Descending.comparator(),
            &mut [&mut rows],
        )
        .unwrap();
        assert_eq!(keys, [9, 6, 5, 5, 5, 4, 3, 3, 2, 1, 1]);
        assert_eq!(rows[0], 5);
        assert_eq!(rows[1], 7);
    }

    #[test]
    fn shape_mismatch_leaves_arrays_untouched() {
        let mut keys = vec![3, 2, 1];
        let mut good = vec!['a', 'b', 'c'];
        let mut bad = vec![1, 2];
        assert_eq!(
            sort(&mut keys, |a, b| a.cmp(b), &mut [&mut good, &mut bad]),
            Err(Error::ShapeMismatch {
                expected: 3,
                found: 2
            })
        );
        assert_eq!(keys, [3, 2, 1]);
        assert_eq!(good, ['a', 'b', 'c']);
        assert_eq!(bad, [1, 2]);

        assert_eq!(
            sort_range(&mut keys, 0, 3, |a, b| a.cmp(b), &mut [&mut good], 2),
            Err(Error::ShapeMismatch {
                expected: 2,
                found: 1
            })
        );
        assert_eq!(keys, [3, 2, 1]);
    }

    #[test]
    fn sub_range_and_slave_prefix() {
        let mut keys = vec![9, 8, 7, 6, 5, 4, 3];
        let mut tracked = vec![0, 1, 2, 3, 4, 5, 6];
        let mut ignored = vec![0, 1];
        sort_range(
            &mut keys,
            2,
            4,
            |a, b| a.cmp(b),
            &mut [&mut tracked, &mut ignored],
            1,
        )
        .unwrap();
        assert_eq!(keys, [9, 8, 4, 5, 6, 7, 3]);
        assert_eq!(tracked, [0, 1, 5, 4, 3, 2, 6]);
        assert_eq!(ignored, [0, 1]);

        assert_eq!(
            sort_range(&mut keys, 5, 3, |a, b| a.cmp(b), &mut [], 0),
            Err(Error::OutOfBounds { end: 8, len: 7 })
        );
        assert_eq!(
            sort_range(&mut keys, usize::MAX, 3, |a, b| a.cmp(b), &mut [], 0),
            Err(Error::OutOfBounds {
                end: usize::MAX,
                len: 7
            })
        );
    }

    #[test]
    fn secondary_map_slave() {
        let mut keys = vec![2.5, -1.0, 0.0];
        let mut map: SecondaryMap<Handle, u8> = SecondaryMap::from(vec![0, 1, 2]);
        sort(
            &mut keys,
            Direction::Ascending.f64_comparator(),
            &mut [&mut map],
        )
        .unwrap();
        assert_eq!(keys, [-1.0, 0.0, 2.5]);
        assert_eq!(map.as_slice(), [1, 2, 0]);
    }

    #[test]
    fn heapsort_mirrors_swaps() {
        let mut seed = 99;
        let mut keys: Vec<u64> = (0..200).map(|_| lcg(&mut seed) % 50).collect();
        let mut rows: Vec<usize> = (0..200).collect();
        let original = keys.clone();
        let mut slaves: [&mut dyn Swappable; 1] = [&mut rows];
        let mut sorter = Sorter {
            master: &mut keys,
            slaves: &mut slaves,
            cmp: |a: &u64, b: &u64| a.cmp(b),
        };
        sorter.heapsort(0, 200);
        assert!(keys.is_sorted());
        for i in 0..200 {
            assert_eq!(original[rows[i]], keys[i]);
        }
    }
}
