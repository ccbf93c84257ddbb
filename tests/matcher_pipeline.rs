use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use screenmatch::{
    match_all, match_best, ImageAsset, MatchConfig, Matcher, Metric, OwnedImage,
    ScreenMatchError, SearchTemplate,
};

fn noise(width: usize, height: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..width * height).map(|_| rng.random::<u8>()).collect()
}

fn paste(
    screen: &mut [u8],
    screen_width: usize,
    patch: &[u8],
    patch_width: usize,
    x0: usize,
    y0: usize,
) {
    for (row_idx, row) in patch.chunks(patch_width).enumerate() {
        let start = (y0 + row_idx) * screen_width + x0;
        screen[start..start + patch_width].copy_from_slice(row);
    }
}

fn degrade(patch: &[u8], amplitude: i16, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    patch
        .iter()
        .map(|&v| (v as i16 + rng.random_range(-amplitude..=amplitude)).clamp(0, 255) as u8)
        .collect()
}

fn template(name: &str, data: Vec<u8>, width: usize, height: usize, similarity: f32) -> SearchTemplate {
    let img = OwnedImage::new(data, width, height).unwrap();
    SearchTemplate::new(name, ImageAsset::from_image(img), similarity).unwrap()
}

fn screen_asset(data: Vec<u8>, width: usize, height: usize) -> ImageAsset {
    ImageAsset::from_image(OwnedImage::new(data, width, height).unwrap())
}

const SCREEN_W: usize = 160;
const SCREEN_H: usize = 130;
const TPL_W: usize = 20;
const TPL_H: usize = 16;

/// Screen with one exact copy and two degraded copies of a noise patch.
fn three_copies() -> (ImageAsset, Vec<u8>) {
    let patch = noise(TPL_W, TPL_H, 11);
    let mut screen = noise(SCREEN_W, SCREEN_H, 12);
    paste(&mut screen, SCREEN_W, &degrade(&patch, 80, 3), TPL_W, 10, 90);
    paste(&mut screen, SCREEN_W, &patch, TPL_W, 60, 50);
    paste(&mut screen, SCREEN_W, &degrade(&patch, 40, 4), TPL_W, 110, 10);
    (screen_asset(screen, SCREEN_W, SCREEN_H), patch)
}

#[test]
fn find_all_returns_each_copy_once_ranked() {
    let (screen, patch) = three_copies();
    let tpl = template("icon", patch, TPL_W, TPL_H, 0.6);
    let matcher = Matcher::new();

    let found = matcher.find_all(&screen, &tpl).unwrap();
    let positions: Vec<_> = found.iter().map(|m| (m.x, m.y)).collect();
    assert_eq!(positions, vec![(60, 50), (110, 10), (10, 90)]);
    assert_eq!(found[0].score, 1.0);
    assert!(found.windows(2).all(|w| w[0].score >= w[1].score));
    assert!(found.iter().all(|m| m.template == "icon"));
    assert_eq!(found[0].focus_point(), screenmatch::Point::new(70, 58));
}

#[test]
fn find_short_circuits_on_a_perfect_match() {
    let (screen, patch) = three_copies();
    let tpl = template("icon", patch, TPL_W, TPL_H, 0.6);
    let matcher = Matcher::new();

    let best = matcher.find(&screen, &tpl).unwrap().unwrap();
    assert_eq!((best.x, best.y, best.score), (60, 50, 1.0));
    assert_eq!(matcher.stats().scans(), 1);
    assert_eq!(matcher.stats().passes(), 1);
    assert_eq!(matcher.stats().suppressions(), 0);
}

#[test]
fn find_without_a_perfect_match_ranks_suppressed_candidates() {
    let patch = noise(TPL_W, TPL_H, 21);
    let mut screen = noise(SCREEN_W, SCREEN_H, 22);
    paste(&mut screen, SCREEN_W, &degrade(&patch, 30, 5), TPL_W, 33, 71);
    let screen = screen_asset(screen, SCREEN_W, SCREEN_H);
    let tpl = template("faded", patch, TPL_W, TPL_H, 0.7);
    let matcher = Matcher::new();

    let best = matcher.find(&screen, &tpl).unwrap().unwrap();
    assert_eq!((best.x, best.y), (33, 71));
    assert!(best.score < 1.0 && best.score >= 0.7);
    assert_eq!(matcher.stats().passes(), 1);
    assert_eq!(matcher.stats().suppressions(), 1);
}

#[test]
fn match_best_agrees_with_match_all() {
    let (screen, patch) = three_copies();
    let tpl = template("icon", patch, TPL_W, TPL_H, 0.6);
    let cfg = MatchConfig::default();

    let all = match_all(&screen, &tpl, &cfg).unwrap();
    let best = match_best(&screen, &tpl, &cfg).unwrap().unwrap();
    let top = all
        .iter()
        .copied()
        .fold(None::<screenmatch::MatchCandidate>, |acc, c| match acc {
            Some(a) if a.score >= c.score => Some(a),
            _ => Some(c),
        })
        .unwrap();
    assert_eq!(best, top);
}

#[test]
fn nothing_above_threshold_is_none() {
    let screen = screen_asset(noise(64, 64, 31), 64, 64);
    let tpl = template("absent", noise(12, 12, 32), 12, 12, 0.9);
    let matcher = Matcher::new();

    assert!(matcher.find(&screen, &tpl).unwrap().is_none());
    assert!(matcher.find_all(&screen, &tpl).unwrap().is_empty());
}

#[test]
fn template_larger_than_source_yields_nothing() {
    let screen = screen_asset(noise(8, 8, 41), 8, 8);
    let tpl = template("huge", noise(16, 4, 42), 16, 4, 0.5);

    assert!(Matcher::new().find_all(&screen, &tpl).unwrap().is_empty());
}

#[test]
fn empty_assets_fail_to_decode() {
    let screen = screen_asset(noise(16, 16, 51), 16, 16);
    let tpl = SearchTemplate::new("ghost", ImageAsset::empty(), 0.8).unwrap();

    let err = Matcher::new().find(&screen, &tpl).unwrap_err();
    assert!(matches!(err, ScreenMatchError::DecodeFailure { .. }));
}

#[test]
fn solid_templates_need_the_ssd_metric() {
    let mut screen = vec![30u8; 40 * 30];
    for y in 12..18 {
        for x in 20..28 {
            screen[y * 40 + x] = 220;
        }
    }
    let screen = screen_asset(screen, 40, 30);
    let tpl = template("button", vec![220u8; 8 * 6], 8, 6, 0.99);

    let zncc = Matcher::new().find(&screen, &tpl).unwrap_err();
    assert!(matches!(zncc, ScreenMatchError::DegenerateTemplate { .. }));

    let ssd = Matcher::new().with_config(MatchConfig {
        metric: Metric::Ssd,
        ..MatchConfig::default()
    });
    let best = ssd.find(&screen, &tpl).unwrap().unwrap();
    assert_eq!((best.x, best.y, best.score), (20, 12, 1.0));
}

#[test]
fn decode_cache_is_populated_once() {
    let (screen, patch) = three_copies();
    let tpl = template("icon", patch, TPL_W, TPL_H, 0.6);
    assert!(!screen.is_cached());

    let matcher = Matcher::new();
    let first = matcher.find_all(&screen, &tpl).unwrap();
    assert!(screen.is_cached() && tpl.asset().is_cached());
    let second = matcher.find_all(&screen, &tpl).unwrap();
    assert_eq!(first, second);
}
