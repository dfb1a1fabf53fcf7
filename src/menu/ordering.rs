//! Custom display order of pages and items.
//!
//! An ordering maps a logical position to the underlying index. It is
//! only trusted when it is a permutation of the right length; anything
//! else falls back to the identity.

use crate::settings::is_permutation;

/// Underlying index shown at logical position `posn`.
pub fn resolve(ordering: Option<&[i32]>, posn: usize, len: usize) -> usize {
    match ordering {
        Some(o) if o.len() == len && is_permutation(o) => o
            .get(posn)
            .and_then(|&id| usize::try_from(id).ok())
            .unwrap_or(posn),
        _ => posn,
    }
}

/// Exchange two logical positions. Out-of-range positions are ignored.
pub fn swap(ordering: &mut [i32], a: usize, b: usize) -> bool {
    if a >= ordering.len() || b >= ordering.len() {
        return false;
    }
    ordering.swap(a, b);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_uses_valid_ordering() {
        let o = [2, 0, 1];
        assert_eq!(resolve(Some(&o), 0, 3), 2);
        assert_eq!(resolve(Some(&o), 2, 3), 1);
    }

    #[test]
    fn resolve_falls_back_to_identity() {
        assert_eq!(resolve(None, 1, 3), 1);
        // Wrong length for the item list.
        assert_eq!(resolve(Some(&[1, 0]), 1, 3), 1);
        // Not a permutation.
        assert_eq!(resolve(Some(&[0, 0, 1]), 1, 3), 1);
    }

    #[test]
    fn swap_checks_bounds() {
        let mut o = [0, 1, 2];
        assert!(swap(&mut o, 0, 1));
        assert_eq!(o, [1, 0, 2]);
        assert!(!swap(&mut o, 2, 3));
        assert_eq!(o, [1, 0, 2]);
    }
}
