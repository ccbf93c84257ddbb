//! Match resolution on a single capture.
//!
//! [`Matcher`] composes the dense scan with duplicate suppression:
//! `find_all` returns every distinct hit ranked by score, `find` returns the
//! best one and skips suppression when the scan already hit a perfect match.

use crate::asset::ImageAsset;
use crate::candidate::suppress::suppress;
use crate::candidate::{MatchCandidate, NeighborRule, SuppressionMargin};
use crate::template::SearchTemplate;
use crate::trace::{trace_event, trace_span};
use crate::util::ScreenMatchResult;
use scan::ScanOutcome;
use std::sync::atomic::{AtomicUsize, Ordering};

pub mod scan;

/// Similarity metric used by the scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Metric {
    /// Zero-mean normalized cross-correlation. Robust to brightness shifts;
    /// flat templates are rejected.
    #[default]
    Zncc,
    /// Sum of squared differences normalized to `[0, 1]`. Works for
    /// solid-color templates.
    Ssd,
}

/// Configuration for single-capture matching.
#[derive(Clone, Debug)]
pub struct MatchConfig {
    pub metric: Metric,
    /// How per-axis proximity combines during suppression.
    pub neighbor_rule: NeighborRule,
    /// Minimum image window variance (sum of squared deviations) for ZNCC.
    pub min_var_i: f64,
    /// Scan rows in parallel (requires the `rayon` feature; ignored otherwise).
    pub parallel: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            metric: Metric::Zncc,
            neighbor_rule: NeighborRule::EitherAxis,
            min_var_i: 1e-8,
            parallel: false,
        }
    }
}

/// A screen coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// A located template, ready to be acted on.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchResult {
    /// Name of the template that was found.
    pub template: String,
    /// Top-left corner of the matched region.
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
    pub score: f32,
    focus: Point,
}

impl MatchResult {
    /// Promotes a candidate, computing the center of the matched region.
    pub fn new(
        template: impl Into<String>,
        candidate: MatchCandidate,
        width: usize,
        height: usize,
    ) -> Self {
        let focus = Point {
            x: (candidate.x + width / 2) as i32,
            y: (candidate.y + height / 2) as i32,
        };
        Self {
            template: template.into(),
            x: candidate.x,
            y: candidate.y,
            width,
            height,
            score: candidate.score,
            focus,
        }
    }

    /// Center of the matched region.
    pub fn focus_point(&self) -> Point {
        self.focus
    }
}

/// Suppresses duplicates and orders survivors by descending score.
///
/// The sort is stable, so equal scores keep their input order.
pub fn rank_candidates(
    candidates: &[MatchCandidate],
    margin: SuppressionMargin,
    rule: NeighborRule,
) -> Vec<MatchCandidate> {
    let mut kept = suppress(candidates, margin, rule);
    kept.sort_by(|a, b| b.score.total_cmp(&a.score));
    kept
}

/// Counters for observing matcher behavior.
#[derive(Debug, Default)]
pub struct MatcherStats {
    scans: AtomicUsize,
    passes: AtomicUsize,
    suppressions: AtomicUsize,
}

impl MatcherStats {
    /// Number of `find`/`find_all` calls served.
    pub fn scans(&self) -> usize {
        self.scans.load(Ordering::Relaxed)
    }

    /// Number of scan passes over a capture.
    pub fn passes(&self) -> usize {
        self.passes.load(Ordering::Relaxed)
    }

    /// Number of times duplicate suppression ran.
    pub fn suppressions(&self) -> usize {
        self.suppressions.load(Ordering::Relaxed)
    }
}

/// Finds templates in source captures.
#[derive(Debug, Default)]
pub struct Matcher {
    cfg: MatchConfig,
    stats: MatcherStats,
}

impl Matcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, cfg: MatchConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    pub fn stats(&self) -> &MatcherStats {
        &self.stats
    }

    /// All distinct matches, ranked by descending score.
    ///
    /// The ranking is weakly ordered: equal scores keep their raster-scan
    /// discovery order, which carries no meaning beyond being reproducible.
    pub fn find_all(
        &self,
        source: &ImageAsset,
        template: &SearchTemplate,
    ) -> ScreenMatchResult<Vec<MatchResult>> {
        let _span = trace_span!("find_all", template = template.name()).entered();
        self.stats.scans.fetch_add(1, Ordering::Relaxed);
        self.stats.passes.fetch_add(1, Ordering::Relaxed);
        let candidates = scan::match_all(source, template, &self.cfg)?;
        self.rank(template, &candidates)
    }

    /// The best match, or `None` when nothing reaches the similarity threshold.
    pub fn find(
        &self,
        source: &ImageAsset,
        template: &SearchTemplate,
    ) -> ScreenMatchResult<Option<MatchResult>> {
        let _span = trace_span!("find", template = template.name()).entered();
        self.stats.scans.fetch_add(1, Ordering::Relaxed);
        let (width, height) = template.asset().dimensions()?;

        self.stats.passes.fetch_add(1, Ordering::Relaxed);
        match scan::match_until_perfect(source, template, &self.cfg)? {
            ScanOutcome::Perfect(best) => {
                trace_event!("perfect_match", x = best.x, y = best.y);
                Ok(Some(MatchResult::new(template.name(), best, width, height)))
            }
            ScanOutcome::Candidates(candidates) if candidates.is_empty() => Ok(None),
            ScanOutcome::Candidates(candidates) => {
                Ok(self.rank(template, &candidates)?.into_iter().next())
            }
        }
    }

    fn rank(
        &self,
        template: &SearchTemplate,
        candidates: &[MatchCandidate],
    ) -> ScreenMatchResult<Vec<MatchResult>> {
        let (width, height) = template.asset().dimensions()?;
        let margin = SuppressionMargin::for_template(width, height);
        self.stats.suppressions.fetch_add(1, Ordering::Relaxed);
        let kept = rank_candidates(candidates, margin, self.cfg.neighbor_rule);

        trace_event!("ranked", candidates = candidates.len(), kept = kept.len());
        Ok(kept
            .into_iter()
            .map(|c| MatchResult::new(template.name(), c, width, height))
            .collect())
    }
}
