//! Checks that `sort_range` sorts the requested range and mirrors every swap
//! onto the participating slaves only.

#![no_main]

use arbitrary::{Arbitrary, Result, Unstructured};
use flatcoll::Direction;
use flatcoll::sort::{sort_range, Swappable};
use libfuzzer_sys::fuzz_target;

#[derive(Debug)]
struct TestCase {
    keys: Vec<u8>,
    off: usize,
    len: usize,
    direction: Direction,
    num_slaves: usize,
}

impl Arbitrary<'_> for TestCase {
    fn arbitrary(u: &mut Unstructured) -> Result<Self> {
        // Ensure the logger is initialized.
        let _ = pretty_env_logger::try_init();

        let keys: Vec<u8> = u.arbitrary()?;
        let off = u.int_in_range(0..=keys.len())?;
        let len = u.int_in_range(0..=keys.len() - off)?;
        Ok(TestCase {
            keys,
            off,
            len,
            direction: u.arbitrary()?,
            num_slaves: u.int_in_range(0..=2)?,
        })
    }
}

fuzz_target!(|t: TestCase| {
    log::trace!("Test case: {t:?}");

    let n = t.keys.len();
    let mut keys = t.keys.clone();
    let mut rows: Vec<usize> = (0..n).collect();
    let mut labels: Vec<String> = t.keys.iter().map(|k| k.to_string()).collect();
    let mut untouched: Vec<usize> = (0..n).collect();
    let range = t.off..t.off + t.len;

    let mut slaves: [&mut dyn Swappable; 3] = [&mut rows, &mut labels, &mut untouched];
    sort_range(
        &mut keys,
        t.off,
        t.len,
        t.direction.comparator(),
        &mut slaves,
        t.num_slaves,
    )
    .unwrap();

    assert!(keys[range.clone()].is_sorted_by(|a, b| t.direction.compare(a, b).is_le()));
    assert_eq!(keys[..t.off], t.keys[..t.off]);
    assert_eq!(keys[range.end..], t.keys[range.end..]);
    if t.num_slaves >= 1 {
        for i in 0..n {
            assert_eq!(t.keys[rows[i]], keys[i]);
        }
    } else {
        assert!(rows.iter().enumerate().all(|(i, &r)| i == r));
    }
    if t.num_slaves >= 2 {
        for i in 0..n {
            assert_eq!(labels[i], keys[i].to_string());
        }
    }
    assert!(untouched.iter().enumerate().all(|(i, &r)| i == r));
});
