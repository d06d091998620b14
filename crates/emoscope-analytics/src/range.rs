//! Frame-range resolution against the sparse sampled-frame set.
//!
//! Requested bounds are arbitrary integers; after sampling, the table only
//! holds every k-th frame, so a requested bound may fall in a gap. The
//! resolver snaps asymmetrically: the start rounds UP to the nearest sampled
//! frame, the end rounds DOWN, so the resolved window is always a subset of
//! the requested bounds, never wider.

use emoscope_models::FrameRange;
use tracing::warn;

/// Outcome of resolving a requested window.
///
/// `EmptyWindow` is a value, not an error: callers treat it as "nothing to
/// render" and skip that artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Window(FrameRange),
    EmptyWindow,
}

impl Resolution {
    pub fn window(&self) -> Option<FrameRange> {
        match self {
            Resolution::Window(range) => Some(*range),
            Resolution::EmptyWindow => None,
        }
    }
}

/// Resolve requested bounds against a sorted sampled-frame set.
///
/// An absent start defaults to the minimum sampled frame, an absent end to
/// the maximum. Each bound resolves independently; if either side has no
/// satisfying sampled frame, or the resolved window inverts, the whole
/// request resolves to `EmptyWindow` — a one-sided failure never silently
/// widens to "the rest of the range".
pub fn resolve_range(
    sampled: &[u64],
    requested_start: Option<u64>,
    requested_end: Option<u64>,
) -> Resolution {
    let (Some(&min), Some(&max)) = (sampled.first(), sampled.last()) else {
        return Resolution::EmptyWindow;
    };

    let start = match requested_start {
        None => min,
        Some(a) => match sampled.iter().copied().find(|&f| f >= a) {
            Some(f) => f,
            None => {
                warn!(requested = a, "no sampled frame at or after requested start");
                return Resolution::EmptyWindow;
            }
        },
    };

    let end = match requested_end {
        None => max,
        Some(b) => match sampled.iter().rev().copied().find(|&f| f <= b) {
            Some(f) => f,
            None => {
                warn!(requested = b, "no sampled frame at or before requested end");
                return Resolution::EmptyWindow;
            }
        },
    };

    if start > end {
        return Resolution::EmptyWindow;
    }

    Resolution::Window(FrameRange::new(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLED: &[u64] = &[0, 10, 20, 30];

    #[test]
    fn test_snaps_start_up_and_end_down() {
        // Requesting [5, 25] against {0, 10, 20, 30} resolves to [10, 20].
        let resolved = resolve_range(SAMPLED, Some(5), Some(25));
        assert_eq!(resolved, Resolution::Window(FrameRange::new(10, 20)));
    }

    #[test]
    fn test_exact_members_stay_put() {
        let resolved = resolve_range(SAMPLED, Some(10), Some(30));
        assert_eq!(resolved, Resolution::Window(FrameRange::new(10, 30)));
    }

    #[test]
    fn test_absent_bounds_default_to_extremes() {
        assert_eq!(
            resolve_range(SAMPLED, None, None),
            Resolution::Window(FrameRange::new(0, 30))
        );
        assert_eq!(
            resolve_range(SAMPLED, Some(15), None),
            Resolution::Window(FrameRange::new(20, 30))
        );
        assert_eq!(
            resolve_range(SAMPLED, None, Some(15)),
            Resolution::Window(FrameRange::new(0, 10))
        );
    }

    #[test]
    fn test_unsatisfiable_start_is_empty_window() {
        assert_eq!(resolve_range(SAMPLED, Some(31), None), Resolution::EmptyWindow);
    }

    #[test]
    fn test_one_sided_failure_does_not_widen() {
        // Valid start, end before every sampled frame: whole request empties.
        assert_eq!(
            resolve_range(&[10, 20, 30], Some(10), Some(5)),
            Resolution::EmptyWindow
        );
    }

    #[test]
    fn test_inverted_resolution_is_empty_window() {
        // [12, 18] against {0, 10, 20, 30}: start snaps to 20, end to 10.
        assert_eq!(resolve_range(SAMPLED, Some(12), Some(18)), Resolution::EmptyWindow);
    }

    #[test]
    fn test_empty_sampled_set_is_empty_window() {
        assert_eq!(resolve_range(&[], None, None), Resolution::EmptyWindow);
    }

    #[test]
    fn test_resolved_bounds_are_members_and_subset() {
        for a in 0..35u64 {
            for b in a..35u64 {
                if let Resolution::Window(range) = resolve_range(SAMPLED, Some(a), Some(b)) {
                    assert!(SAMPLED.contains(&range.start));
                    assert!(SAMPLED.contains(&range.end));
                    assert!(range.start >= a);
                    assert!(range.end <= b);
                }
            }
        }
    }
}
