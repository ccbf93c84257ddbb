//! screenmatch locates template images in screen captures for GUI automation.
//!
//! The crate scores every template placement in a capture, collapses clusters
//! of neighboring hits into one match, polls fresh captures until a match
//! appears or a timeout elapses, and turns coordinates, prior matches or image
//! names into the point an action should hit. Screen capture and event
//! injection are supplied by the caller through [`ScreenSource`] and
//! [`InputDriver`].

pub mod asset;
pub mod candidate;
pub mod directory;
pub mod focus;
pub mod image;
pub mod input;
pub mod kernel;
pub mod retry;
pub mod search;
pub mod session;
pub mod template;
mod trace;
pub mod util;

pub use asset::ImageAsset;
pub use candidate::suppress::suppress;
pub use candidate::{MatchCandidate, NeighborRule, SuppressionMargin};
pub use directory::{ImageDir, ImageDirectory};
pub use focus::{resolve_focus_point, FocusContext, ImageRef, Target};
#[cfg(feature = "image-io")]
pub use crate::image::io;
pub use crate::image::{ImageView, OwnedImage};
pub use input::{parse_key_sequence, type_text, InputDriver, KeyToken, SpecialKey};
pub use retry::{RetryConfig, RetryScheduler, ScreenSource, SearchState};
pub use search::scan::{match_all, match_best};
pub use search::{rank_candidates, MatchConfig, MatchResult, Matcher, MatcherStats, Metric, Point};
pub use session::Session;
pub use template::{SearchTemplate, DEFAULT_SIMILARITY};
pub use util::{ScreenMatchError, ScreenMatchResult};
