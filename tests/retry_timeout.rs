use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use screenmatch::{
    ImageAsset, Matcher, OwnedImage, RetryConfig, RetryScheduler, ScreenMatchError,
    ScreenMatchResult, ScreenSource, SearchTemplate,
};
use std::time::{Duration, Instant};

fn noise(width: usize, height: usize, seed: u64) -> OwnedImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..width * height).map(|_| rng.random::<u8>()).collect();
    OwnedImage::new(data, width, height).unwrap()
}

/// Returns the same frame on every capture and counts the calls.
struct StaticScreen {
    frame: OwnedImage,
    captures: usize,
}

impl ScreenSource for StaticScreen {
    fn capture(&mut self) -> ScreenMatchResult<ImageAsset> {
        self.captures += 1;
        Ok(ImageAsset::from_image(self.frame.clone()))
    }
}

fn absent_template() -> SearchTemplate {
    SearchTemplate::new("missing-dialog", ImageAsset::from_image(noise(10, 10, 99)), 0.9).unwrap()
}

#[test]
fn times_out_with_the_template_name_and_never_early() {
    let mut screen = StaticScreen {
        frame: noise(48, 48, 1),
        captures: 0,
    };
    let scheduler = RetryScheduler::default();
    let timeout = Duration::from_millis(200);

    let start = Instant::now();
    let err = scheduler
        .find(&mut screen, &Matcher::new(), &absent_template(), timeout)
        .unwrap_err();
    let elapsed = start.elapsed();

    assert_eq!(
        err,
        ScreenMatchError::ImageNotFound {
            name: "missing-dialog".to_string()
        }
    );
    assert!(elapsed >= timeout, "gave up after {elapsed:?}");
    assert!(elapsed < Duration::from_secs(5), "overran: {elapsed:?}");
    assert!(screen.captures >= 1);
}

#[test]
fn poll_interval_paces_attempts() {
    let mut screen = StaticScreen {
        frame: noise(24, 24, 2),
        captures: 0,
    };
    let scheduler = RetryScheduler::new(RetryConfig {
        poll_interval: Duration::from_millis(60),
        ..RetryConfig::default()
    });

    let result = scheduler.find(
        &mut screen,
        &Matcher::new(),
        &absent_template(),
        Duration::from_millis(200),
    );
    assert!(result.is_err());
    // Attempts at roughly 0, 60, 120, 180 and 240 ms.
    assert!(
        (2..=6).contains(&screen.captures),
        "unexpected attempt count {}",
        screen.captures
    );
}

#[test]
fn wait_returns_once_the_image_is_visible() {
    let frame = noise(40, 40, 3);
    let tpl = SearchTemplate::new(
        "spinner",
        ImageAsset::from_image(frame.crop(20, 5, 9, 9).unwrap()),
        0.9,
    )
    .unwrap();
    let mut screen = StaticScreen { frame, captures: 0 };

    RetryScheduler::default()
        .wait(&mut screen, &Matcher::new(), &tpl, Duration::from_secs(1))
        .unwrap();
    assert_eq!(screen.captures, 1);
}

#[test]
fn default_timeouts_distinguish_find_from_wait() {
    let cfg = RetryConfig::default();
    assert_eq!(cfg.find_timeout, Duration::from_secs(10));
    assert_eq!(cfg.wait_timeout, Duration::from_secs(30));
    assert!(cfg.poll_interval.is_zero());
}
