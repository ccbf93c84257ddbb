use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use screenmatch::{rank_candidates, suppress, MatchCandidate, NeighborRule, SuppressionMargin};

fn cand(x: usize, y: usize, score: f32) -> MatchCandidate {
    MatchCandidate { x, y, score }
}

fn neighbors(a: &MatchCandidate, b: &MatchCandidate, margin: SuppressionMargin) -> bool {
    a.x.abs_diff(b.x) < margin.x || a.y.abs_diff(b.y) < margin.y
}

#[test]
fn far_apart_candidates_are_all_kept() {
    let margin = SuppressionMargin::new(12, 9);
    let mut rng = StdRng::seed_from_u64(7);
    // A diagonal keeps every pair at least one margin apart on both axes.
    let input: Vec<_> = (0..20)
        .map(|i| cand(i * 12 + 3, i * 9 + 1, rng.random_range(0.5..1.0)))
        .collect();

    let kept = suppress(&input, margin, NeighborRule::EitherAxis);
    assert_eq!(kept, input);
}

#[test]
fn close_pair_keeps_the_higher_score_in_either_order() {
    let margin = SuppressionMargin::new(10, 10);
    let low = cand(200, 40, 0.82);
    let high = cand(500, 45, 0.91);

    assert_eq!(suppress(&[low, high], margin, NeighborRule::EitherAxis), vec![high]);
    assert_eq!(suppress(&[high, low], margin, NeighborRule::EitherAxis), vec![high]);
}

#[test]
fn tied_pair_keeps_exactly_one() {
    let margin = SuppressionMargin::new(10, 10);
    let a = cand(30, 30, 0.9);
    let b = cand(33, 31, 0.9);

    let kept = suppress(&[a, b], margin, NeighborRule::EitherAxis);
    assert_eq!(kept, vec![b]);
    let kept = suppress(&[b, a], margin, NeighborRule::EitherAxis);
    assert_eq!(kept, vec![a]);
}

#[test]
fn ranking_orders_by_descending_score() {
    let margin = SuppressionMargin::new(5, 5);
    let input = [cand(0, 0, 0.95), cand(100, 100, 0.99), cand(200, 200, 0.81)];

    let ranked = rank_candidates(&input, margin, NeighborRule::EitherAxis);
    let scores: Vec<f32> = ranked.iter().map(|c| c.score).collect();
    assert_eq!(scores, vec![0.99, 0.95, 0.81]);
}

#[test]
fn ranking_keeps_ties_in_input_order() {
    let margin = SuppressionMargin::new(1, 1);
    let input = [cand(0, 0, 0.9), cand(10, 10, 0.95), cand(20, 20, 0.9)];

    let ranked = rank_candidates(&input, margin, NeighborRule::EitherAxis);
    assert_eq!(ranked, vec![input[1], input[0], input[2]]);
}

#[test]
fn random_clusters_leave_no_neighboring_survivors() {
    let mut rng = StdRng::seed_from_u64(42);
    for round in 0..50 {
        let margin = SuppressionMargin::new(rng.random_range(1..20), rng.random_range(1..20));
        let count = rng.random_range(1..60);
        let input: Vec<_> = (0..count)
            .map(|_| {
                // Coarse score steps force plenty of ties.
                let score = rng.random_range(0..8) as f32 / 8.0;
                cand(rng.random_range(0..200), rng.random_range(0..200), score)
            })
            .collect();

        let kept = suppress(&input, margin, NeighborRule::EitherAxis);
        assert!(!kept.is_empty(), "round {round}: everything was suppressed");
        for (i, a) in kept.iter().enumerate() {
            for b in &kept[i + 1..] {
                assert!(
                    !neighbors(a, b, margin),
                    "round {round}: {a:?} and {b:?} both survived"
                );
            }
        }

        let again = suppress(&input, margin, NeighborRule::EitherAxis);
        assert_eq!(kept, again, "round {round}: suppression is not deterministic");
    }
}
