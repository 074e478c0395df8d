//! Time-gap grouping
//!
//! Partitions an ordered fragment run into sub-runs wherever the silence
//! between two neighbours exceeds a threshold, so one subtitle never spans
//! an excessive gap.

use subalign_types::Fragment;

/// Maximum allowed silence inside one subtitle, in milliseconds
pub const DEFAULT_MAX_GAP_MS: f64 = 1500.0;

/// Split a fragment run into contiguous groups at every gap larger than
/// `max_gap_ms`. Every input fragment lands in exactly one group, in order.
pub fn group_by_gap(fragments: &[Fragment], max_gap_ms: f64) -> Vec<&[Fragment]> {
    if fragments.is_empty() {
        return Vec::new();
    }

    let mut groups = Vec::new();
    let mut group_start = 0;

    for i in 1..fragments.len() {
        let gap = fragments[i].start_ms - fragments[i - 1].end_ms;
        if gap > max_gap_ms {
            tracing::debug!(
                "gap {:.0}ms after '{}' exceeds {:.0}ms, starting new group",
                gap,
                fragments[i - 1].text.trim(),
                max_gap_ms
            );
            groups.push(&fragments[group_start..i]);
            group_start = i;
        }
    }

    groups.push(&fragments[group_start..]);
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_fragment(text: &str, start_ms: f64, end_ms: f64) -> Fragment {
        Fragment::new(text, start_ms, end_ms)
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(group_by_gap(&[], DEFAULT_MAX_GAP_MS).is_empty());
    }

    #[test]
    fn single_fragment_yields_one_group() {
        let frags = vec![make_fragment("a", 0.0, 100.0)];
        let groups = group_by_gap(&frags, DEFAULT_MAX_GAP_MS);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 1);
    }

    #[test]
    fn splits_at_the_large_gap_only() {
        // gaps: 100, 2000, 50
        let frags = vec![
            make_fragment("a", 0.0, 100.0),
            make_fragment("b", 200.0, 300.0),
            make_fragment("c", 2300.0, 2400.0),
            make_fragment("d", 2450.0, 2500.0),
        ];
        let groups = group_by_gap(&frags, 1500.0);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[1].len(), 2);
        assert_eq!(groups[1][0].text, "c");
    }

    #[test]
    fn gap_equal_to_threshold_does_not_split() {
        let frags = vec![
            make_fragment("a", 0.0, 100.0),
            make_fragment("b", 1600.0, 1700.0),
        ];
        assert_eq!(group_by_gap(&frags, 1500.0).len(), 1);
    }

    #[test]
    fn groups_partition_the_input() {
        let frags: Vec<Fragment> = (0..10)
            .map(|i| make_fragment("w", i as f64 * 2000.0, i as f64 * 2000.0 + 100.0))
            .collect();
        let groups = group_by_gap(&frags, 1500.0);
        let total: usize = groups.iter().map(|g| g.len()).sum();
        assert_eq!(total, frags.len());
        assert_eq!(groups.len(), 10);
    }
}
