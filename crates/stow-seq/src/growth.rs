//! Capacity growth policy.
//!
//! Capacity only ever grows by doubling: an empty sequence grows to
//! [`INITIAL_CAPACITY`], anything else to twice its current capacity.
//! Bulk insertion that needs more than that grows straight to the size it
//! needs. Explicit reservations bypass the policy and request an exact
//! capacity.

use stow_raw::StorageError;

/// Capacity an empty sequence grows to on its first insertion.
pub const INITIAL_CAPACITY: usize = 1;

/// Capacity to grow to when `current` slots are all occupied.
///
/// Fails with [`StorageError::CapacityOverflow`] if doubling overflows
/// `usize`.
pub fn next_capacity(current: usize) -> Result<usize, StorageError> {
    if current == 0 {
        return Ok(INITIAL_CAPACITY);
    }
    current
        .checked_mul(2)
        .ok_or(StorageError::CapacityOverflow {
            requested: current.saturating_add(1),
        })
}

/// Capacity to grow to so that `needed` slots fit when `current` does not:
/// the doubled capacity, or `needed` itself if that is larger.
pub fn grown_capacity(current: usize, needed: usize) -> Result<usize, StorageError> {
    Ok(next_capacity(current)?.max(needed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_grows_to_one() {
        assert_eq!(next_capacity(0), Ok(1));
    }

    #[test]
    fn progression_doubles() {
        let mut cap = 0;
        let mut seen = Vec::new();
        for _ in 0..5 {
            cap = next_capacity(cap).unwrap();
            seen.push(cap);
        }
        assert_eq!(seen, vec![1, 2, 4, 8, 16]);
    }

    #[test]
    fn doubling_overflow_is_reported() {
        let err = next_capacity(usize::MAX / 2 + 1).unwrap_err();
        assert!(matches!(err, StorageError::CapacityOverflow { .. }));
    }

    #[test]
    fn grown_capacity_doubles_small_requests() {
        assert_eq!(grown_capacity(4, 5), Ok(8));
        assert_eq!(grown_capacity(0, 1), Ok(1));
    }

    #[test]
    fn grown_capacity_honours_large_requests() {
        assert_eq!(grown_capacity(4, 100), Ok(100));
        assert_eq!(grown_capacity(0, 10), Ok(10));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn growth_at_least_doubles(current in 1usize..(usize::MAX / 2)) {
                let next = next_capacity(current).unwrap();
                prop_assert!(next >= current * 2);
                prop_assert!(next > current);
            }

            #[test]
            fn grown_capacity_fits_and_doubles(
                current in 1usize..(usize::MAX / 4),
                extra in 1usize..4096,
            ) {
                let needed = current + extra;
                let grown = grown_capacity(current, needed).unwrap();
                prop_assert!(grown >= needed);
                prop_assert!(grown >= current * 2);
            }
        }
    }
}
