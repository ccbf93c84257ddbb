//! Raw match candidates and duplicate suppression.

pub mod suppress;

/// Percentage of the template size within which two hits are duplicates.
pub const SUPPRESSION_MARGIN_PERCENT: usize = 25;

/// One scored placement produced by the matcher.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchCandidate {
    /// X coordinate of the placement's top-left corner.
    pub x: usize,
    /// Y coordinate of the placement's top-left corner.
    pub y: usize,
    /// Similarity in `[0, 1]`; `1.0` is a perfect match.
    pub score: f32,
}

impl MatchCandidate {
    pub fn is_perfect(&self) -> bool {
        self.score >= 1.0
    }
}

/// Per-axis distance below which two candidates are considered the same hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SuppressionMargin {
    pub x: usize,
    pub y: usize,
}

impl SuppressionMargin {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// 25% of the template's width and height, truncated.
    pub fn for_template(width: usize, height: usize) -> Self {
        Self {
            x: width * SUPPRESSION_MARGIN_PERCENT / 100,
            y: height * SUPPRESSION_MARGIN_PERCENT / 100,
        }
    }
}

/// How the two per-axis proximity tests combine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NeighborRule {
    /// Close on either axis is enough. A row of distinct hits on one scan
    /// line collapses to a single survivor under this rule.
    #[default]
    EitherAxis,
    /// Close on both axes.
    BothAxes,
}
