//! Dense template scan over a source capture.
//!
//! Placements are visited in raster order (rows top to bottom, left to right
//! within a row), which fixes the discovery order that suppression and the
//! stable ranking rely on.

use crate::asset::ImageAsset;
use crate::candidate::MatchCandidate;
use crate::kernel::scalar::{SsdScalar, ZnccScalar};
use crate::kernel::{Kernel, ScanParams};
use crate::search::{MatchConfig, Metric};
use crate::template::{SearchTemplate, SsdTemplatePlan, TemplatePlan};
use crate::trace::trace_event;
use crate::util::ScreenMatchResult;
use crate::ImageView;

/// Returns every placement scoring at least the template's similarity.
///
/// Candidates are not deduplicated. A template larger than the source yields
/// no candidates.
pub fn match_all(
    source: &ImageAsset,
    template: &SearchTemplate,
    cfg: &MatchConfig,
) -> ScreenMatchResult<Vec<MatchCandidate>> {
    let image = source.pixels()?.view();
    let tpl = template.asset().pixels()?.view();
    let params = scan_params(template, cfg);
    if !fits(image, tpl) {
        return Ok(Vec::new());
    }

    let candidates = match cfg.metric {
        Metric::Zncc => {
            let plan = TemplatePlan::from_view(tpl)?;
            scan_all_dispatch::<ZnccScalar>(image, &plan, params, cfg.parallel)
        }
        Metric::Ssd => {
            let plan = SsdTemplatePlan::from_view(tpl)?;
            scan_all_dispatch::<SsdScalar>(image, &plan, params, cfg.parallel)
        }
    };

    trace_event!("match_all", template = template.name(), candidates = candidates.len());
    Ok(candidates)
}

/// Returns the best placement at or above the template's similarity.
///
/// The scan stops at the first placement scoring exactly `1.0`. Among equal
/// scores below that, the earliest in raster order wins.
pub fn match_best(
    source: &ImageAsset,
    template: &SearchTemplate,
    cfg: &MatchConfig,
) -> ScreenMatchResult<Option<MatchCandidate>> {
    let image = source.pixels()?.view();
    let tpl = template.asset().pixels()?.view();
    let params = scan_params(template, cfg);
    if !fits(image, tpl) {
        return Ok(None);
    }

    let best = match cfg.metric {
        Metric::Zncc => {
            let plan = TemplatePlan::from_view(tpl)?;
            scan_best::<ZnccScalar>(image, &plan, params)
        }
        Metric::Ssd => {
            let plan = SsdTemplatePlan::from_view(tpl)?;
            scan_best::<SsdScalar>(image, &plan, params)
        }
    };
    Ok(best)
}

/// Result of a scan that stops early on a perfect placement.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum ScanOutcome {
    Perfect(MatchCandidate),
    /// Every placement at or above the threshold, in raster order.
    Candidates(Vec<MatchCandidate>),
}

/// Single pass backing `Matcher::find`: collects candidates like
/// [`match_all`] but returns as soon as a perfect placement shows up.
pub(crate) fn match_until_perfect(
    source: &ImageAsset,
    template: &SearchTemplate,
    cfg: &MatchConfig,
) -> ScreenMatchResult<ScanOutcome> {
    let image = source.pixels()?.view();
    let tpl = template.asset().pixels()?.view();
    let params = scan_params(template, cfg);
    if !fits(image, tpl) {
        return Ok(ScanOutcome::Candidates(Vec::new()));
    }

    let outcome = match cfg.metric {
        Metric::Zncc => {
            let plan = TemplatePlan::from_view(tpl)?;
            scan_until_perfect_dispatch::<ZnccScalar>(image, &plan, params, cfg.parallel)
        }
        Metric::Ssd => {
            let plan = SsdTemplatePlan::from_view(tpl)?;
            scan_until_perfect_dispatch::<SsdScalar>(image, &plan, params, cfg.parallel)
        }
    };
    Ok(outcome)
}

fn scan_params(template: &SearchTemplate, cfg: &MatchConfig) -> ScanParams {
    ScanParams {
        min_score: template.similarity(),
        min_var_i: cfg.min_var_i,
    }
}

fn fits(image: ImageView<'_, u8>, tpl: ImageView<'_, u8>) -> bool {
    image.width() >= tpl.width() && image.height() >= tpl.height()
}

#[cfg(feature = "rayon")]
fn scan_all_dispatch<K: Kernel>(
    image: ImageView<'_, u8>,
    plan: &K::Plan,
    params: ScanParams,
    parallel: bool,
) -> Vec<MatchCandidate> {
    if parallel {
        crate::kernel::rayon::scan_all_par::<K>(image, plan, params)
    } else {
        scan_all::<K>(image, plan, params)
    }
}

#[cfg(not(feature = "rayon"))]
fn scan_all_dispatch<K: Kernel>(
    image: ImageView<'_, u8>,
    plan: &K::Plan,
    params: ScanParams,
    _parallel: bool,
) -> Vec<MatchCandidate> {
    scan_all::<K>(image, plan, params)
}

fn scan_until_perfect_dispatch<K: Kernel>(
    image: ImageView<'_, u8>,
    plan: &K::Plan,
    params: ScanParams,
    parallel: bool,
) -> ScanOutcome {
    if !(parallel && cfg!(feature = "rayon")) {
        return scan_until_perfect::<K>(image, plan, params);
    }
    // Rows are scored concurrently, so the whole image is scanned first.
    let candidates = scan_all_dispatch::<K>(image, plan, params, parallel);
    match candidates.iter().find(|c| c.is_perfect()) {
        Some(&perfect) => ScanOutcome::Perfect(perfect),
        None => ScanOutcome::Candidates(candidates),
    }
}

pub(crate) fn scan_all<K: Kernel>(
    image: ImageView<'_, u8>,
    plan: &K::Plan,
    params: ScanParams,
) -> Vec<MatchCandidate> {
    let (tpl_width, tpl_height) = K::plan_size(plan);
    let max_x = image.width() - tpl_width;
    let max_y = image.height() - tpl_height;

    let mut out = Vec::new();
    for y in 0..=max_y {
        for x in 0..=max_x {
            match K::score_at(image, plan, x, y, &params) {
                Some(score) if score >= params.min_score => {
                    out.push(MatchCandidate { x, y, score })
                }
                _ => {}
            }
        }
    }
    out
}

pub(crate) fn scan_until_perfect<K: Kernel>(
    image: ImageView<'_, u8>,
    plan: &K::Plan,
    params: ScanParams,
) -> ScanOutcome {
    let (tpl_width, tpl_height) = K::plan_size(plan);
    let max_x = image.width() - tpl_width;
    let max_y = image.height() - tpl_height;

    let mut out = Vec::new();
    for y in 0..=max_y {
        for x in 0..=max_x {
            let Some(score) = K::score_at(image, plan, x, y, &params) else {
                continue;
            };
            if score < params.min_score {
                continue;
            }
            let candidate = MatchCandidate { x, y, score };
            if candidate.is_perfect() {
                return ScanOutcome::Perfect(candidate);
            }
            out.push(candidate);
        }
    }
    ScanOutcome::Candidates(out)
}

pub(crate) fn scan_best<K: Kernel>(
    image: ImageView<'_, u8>,
    plan: &K::Plan,
    params: ScanParams,
) -> Option<MatchCandidate> {
    let (tpl_width, tpl_height) = K::plan_size(plan);
    let max_x = image.width() - tpl_width;
    let max_y = image.height() - tpl_height;

    let mut best: Option<MatchCandidate> = None;
    for y in 0..=max_y {
        for x in 0..=max_x {
            let Some(score) = K::score_at(image, plan, x, y, &params) else {
                continue;
            };
            if score < params.min_score {
                continue;
            }
            let candidate = MatchCandidate { x, y, score };
            if candidate.is_perfect() {
                return Some(candidate);
            }
            if best.map_or(true, |b| score > b.score) {
                best = Some(candidate);
            }
        }
    }
    best
}
