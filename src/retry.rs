//! Bounded-time polling for a template on fresh captures.
//!
//! Each attempt captures the screen and runs [`Matcher::find`]. The deadline
//! is only checked between attempts, so an attempt that starts before the
//! deadline always runs to completion. At least one attempt is made even with
//! a zero timeout.

use crate::asset::ImageAsset;
use crate::search::{MatchResult, Matcher};
use crate::template::SearchTemplate;
use crate::trace::{trace_debug, trace_event, trace_span};
use crate::util::{ScreenMatchError, ScreenMatchResult};
use std::thread;
use std::time::{Duration, Instant};

/// Produces a freshly decoded capture on every call.
pub trait ScreenSource {
    fn capture(&mut self) -> ScreenMatchResult<ImageAsset>;
}

impl<F> ScreenSource for F
where
    F: FnMut() -> ScreenMatchResult<ImageAsset>,
{
    fn capture(&mut self) -> ScreenMatchResult<ImageAsset> {
        self()
    }
}

/// Timeouts and pacing for the retry loop.
#[derive(Clone, Debug)]
pub struct RetryConfig {
    /// Timeout for direct lookups (`find`, clicking on an image).
    pub find_timeout: Duration,
    /// Timeout for explicit `wait` calls.
    pub wait_timeout: Duration,
    /// Pause between attempts. Zero polls back to back.
    pub poll_interval: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            find_timeout: Duration::from_secs(10),
            wait_timeout: Duration::from_secs(30),
            poll_interval: Duration::ZERO,
        }
    }
}

/// Where the retry loop currently stands.
#[derive(Clone, Debug, PartialEq)]
pub enum SearchState {
    Searching { attempts: usize },
    Found(MatchResult),
    TimedOut { attempts: usize },
}

/// Drives the capture-and-match loop.
#[derive(Clone, Debug, Default)]
pub struct RetryScheduler {
    cfg: RetryConfig,
}

impl RetryScheduler {
    pub fn new(cfg: RetryConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.cfg
    }

    /// Polls until the template is found or `timeout` elapses.
    ///
    /// Fails with [`ScreenMatchError::ImageNotFound`] naming the template on
    /// timeout. Capture and decode errors end the loop immediately.
    pub fn find<S: ScreenSource + ?Sized>(
        &self,
        source: &mut S,
        matcher: &Matcher,
        template: &SearchTemplate,
        timeout: Duration,
    ) -> ScreenMatchResult<MatchResult> {
        let _span = trace_span!("retry_find", template = template.name()).entered();
        let start = Instant::now();
        let mut state = SearchState::Searching { attempts: 0 };

        loop {
            state = match state {
                SearchState::Searching { attempts } => {
                    let attempts = attempts + 1;
                    let capture = source.capture()?;
                    let found = matcher.find(&capture, template)?;
                    let elapsed = start.elapsed();
                    trace_debug!(
                        "attempt",
                        attempt = attempts,
                        elapsed_ms = elapsed.as_millis() as u64,
                        found = found.is_some(),
                    );
                    match found {
                        Some(result) => SearchState::Found(result),
                        None if elapsed >= timeout => SearchState::TimedOut { attempts },
                        None => {
                            if !self.cfg.poll_interval.is_zero() {
                                thread::sleep(self.cfg.poll_interval);
                            }
                            SearchState::Searching { attempts }
                        }
                    }
                }
                SearchState::Found(result) => return Ok(result),
                SearchState::TimedOut { attempts } => {
                    trace_event!("timed_out", template = template.name(), attempts = attempts);
                    return Err(ScreenMatchError::ImageNotFound {
                        name: template.name().to_string(),
                    });
                }
            };
        }
    }

    /// [`find`](Self::find) with the default find timeout.
    pub fn find_default<S: ScreenSource + ?Sized>(
        &self,
        source: &mut S,
        matcher: &Matcher,
        template: &SearchTemplate,
    ) -> ScreenMatchResult<MatchResult> {
        self.find(source, matcher, template, self.cfg.find_timeout)
    }

    /// Blocks until the template is visible, discarding the match.
    pub fn wait<S: ScreenSource + ?Sized>(
        &self,
        source: &mut S,
        matcher: &Matcher,
        template: &SearchTemplate,
        timeout: Duration,
    ) -> ScreenMatchResult<()> {
        self.find(source, matcher, template, timeout).map(|_| ())
    }
}
