//! Pairwise duplicate suppression.
//!
//! A true match produces a cluster of high-scoring placements around the exact
//! alignment. Suppression keeps one representative per cluster using a kill
//! list over candidate indices, so neighbors of neighbors are resolved without
//! mutating the input while it is being walked.

use crate::candidate::{MatchCandidate, NeighborRule, SuppressionMargin};

/// Removes near-duplicate candidates, keeping the best-scoring one per cluster.
///
/// Survivors are returned in input order. The result is deterministic for a
/// given input order; equal-scoring neighbors keep whichever the walk reaches
/// last.
pub fn suppress(
    candidates: &[MatchCandidate],
    margin: SuppressionMargin,
    rule: NeighborRule,
) -> Vec<MatchCandidate> {
    let killed = kill_list(candidates, margin, rule);
    candidates
        .iter()
        .zip(killed)
        .filter_map(|(candidate, dead)| (!dead).then_some(*candidate))
        .collect()
}

fn kill_list(
    candidates: &[MatchCandidate],
    margin: SuppressionMargin,
    rule: NeighborRule,
) -> Vec<bool> {
    let mut killed = vec![false; candidates.len()];

    for (a_idx, a) in candidates.iter().enumerate() {
        if killed[a_idx] {
            continue;
        }
        // Killed `b`s are still compared: a better `b` means something near `a`
        // beats it, so `a` must go as well.
        for (b_idx, b) in candidates.iter().enumerate() {
            if a_idx == b_idx || !are_neighbors(a, b, margin, rule) {
                continue;
            }
            if a.score > b.score {
                killed[b_idx] = true;
            } else if a.score < b.score || !killed[b_idx] {
                killed[a_idx] = true;
                break;
            }
        }
    }

    killed
}

fn are_neighbors(
    a: &MatchCandidate,
    b: &MatchCandidate,
    margin: SuppressionMargin,
    rule: NeighborRule,
) -> bool {
    let near_x = a.x.abs_diff(b.x) < margin.x;
    let near_y = a.y.abs_diff(b.y) < margin.y;
    match rule {
        NeighborRule::EitherAxis => near_x || near_y,
        NeighborRule::BothAxes => near_x && near_y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(x: usize, y: usize, score: f32) -> MatchCandidate {
        MatchCandidate { x, y, score }
    }

    const MARGIN: SuppressionMargin = SuppressionMargin { x: 10, y: 10 };

    #[test]
    fn empty_and_single_inputs_pass_through() {
        assert!(suppress(&[], MARGIN, NeighborRule::EitherAxis).is_empty());
        let one = [cand(5, 5, 0.9)];
        assert_eq!(suppress(&one, MARGIN, NeighborRule::EitherAxis), one.to_vec());
    }

    #[test]
    fn keeps_the_better_of_two_neighbors() {
        let input = [cand(100, 100, 0.85), cand(103, 101, 0.97)];
        let kept = suppress(&input, MARGIN, NeighborRule::EitherAxis);
        assert_eq!(kept, vec![cand(103, 101, 0.97)]);
    }

    #[test]
    fn equal_scores_at_the_same_spot_keep_the_later_one() {
        let input = [cand(7, 7, 0.9), cand(7, 7, 0.9)];
        let kept = suppress(&input, MARGIN, NeighborRule::EitherAxis);
        assert_eq!(kept.len(), 1);
        let killed = kill_list(&input, MARGIN, NeighborRule::EitherAxis);
        assert_eq!(killed, vec![true, false]);
    }

    #[test]
    fn same_row_hits_merge_under_either_axis_rule() {
        let input = [cand(0, 50, 0.9), cand(300, 52, 0.95)];
        let kept = suppress(&input, MARGIN, NeighborRule::EitherAxis);
        assert_eq!(kept, vec![cand(300, 52, 0.95)]);
        let kept = suppress(&input, MARGIN, NeighborRule::BothAxes);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn neighbor_of_a_killed_neighbor_is_still_resolved() {
        // b beats a, c beats b; a and c are far apart on both axes.
        let input = [cand(0, 0, 0.8), cand(8, 8, 0.9), cand(16, 16, 0.95)];
        let kept = suppress(&input, MARGIN, NeighborRule::BothAxes);
        assert_eq!(kept, vec![cand(16, 16, 0.95)]);
    }

    #[test]
    fn zero_margin_keeps_everything() {
        let input = [cand(1, 1, 0.9), cand(1, 1, 0.8)];
        let kept = suppress(&input, SuppressionMargin::new(0, 0), NeighborRule::EitherAxis);
        assert_eq!(kept, input.to_vec());
    }
}
