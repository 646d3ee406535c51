//! Input validation for merge calls
//!
//! Strategies only `debug_assert!` their preconditions. Callers that want a
//! loud failure in release builds (index consistency checks, tests, tools)
//! validate explicitly with these functions, which report the first violation
//! found.

use crate::error::{Error, Result};
use crate::types::{first_unsorted_position, WeightedList};

/// Validate a merge threshold
///
/// Returns `Err(Error::InvalidThreshold)` for zero.
pub fn validate_threshold(threshold: u32) -> Result<()> {
    if threshold == 0 {
        return Err(Error::InvalidThreshold);
    }
    Ok(())
}

/// Validate every list of a merge call
///
/// Checks, in input order:
/// - weight is at least 1
/// - ids are strictly ascending
pub fn validate_lists(lists: &[WeightedList<'_>]) -> Result<()> {
    for (index, list) in lists.iter().enumerate() {
        if list.weight == 0 {
            return Err(Error::ZeroWeight { list: index });
        }
        if let Some(position) = first_unsorted_position(list.ids) {
            return Err(Error::UnsortedList {
                list: index,
                position,
            });
        }
    }
    Ok(())
}

/// Validate a whole merge call
pub fn validate_merge_input(lists: &[WeightedList<'_>], threshold: u32) -> Result<()> {
    validate_threshold(threshold)?;
    validate_lists(lists)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_threshold() {
        assert!(validate_threshold(1).is_ok());
        assert!(matches!(
            validate_threshold(0),
            Err(Error::InvalidThreshold)
        ));
    }

    #[test]
    fn test_validate_lists_ok() {
        let a = [1, 5, 8];
        let b: [u32; 0] = [];
        let lists = [WeightedList::unit(&a), WeightedList::new(&b, 3)];
        assert!(validate_lists(&lists).is_ok());
    }

    #[test]
    fn test_validate_lists_reports_first_bad_list() {
        let good = [1, 2, 3];
        let bad = [4, 9, 9];
        let lists = [WeightedList::unit(&good), WeightedList::unit(&bad)];
        match validate_lists(&lists) {
            Err(Error::UnsortedList { list, position }) => {
                assert_eq!(list, 1);
                assert_eq!(position, 2);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_validate_lists_zero_weight() {
        let a = [1];
        let lists = [WeightedList::new(&a, 0)];
        assert!(matches!(
            validate_lists(&lists),
            Err(Error::ZeroWeight { list: 0 })
        ));
    }

    #[test]
    fn test_validate_merge_input_checks_threshold_first() {
        let bad = [3, 1];
        let lists = [WeightedList::unit(&bad)];
        assert!(matches!(
            validate_merge_input(&lists, 0),
            Err(Error::InvalidThreshold)
        ));
    }
}
