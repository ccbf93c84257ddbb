//! Resolution of action targets to a single screen point.

use crate::directory::ImageDirectory;
use crate::retry::{RetryScheduler, ScreenSource};
use crate::search::{MatchResult, Matcher, Point};
use crate::template::SearchTemplate;
use crate::util::ScreenMatchResult;

/// An image to locate before acting.
#[derive(Clone, Debug)]
pub enum ImageRef {
    /// Looked up in the image directory.
    Name(String),
    Template(SearchTemplate),
}

impl From<&str> for ImageRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for ImageRef {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<SearchTemplate> for ImageRef {
    fn from(template: SearchTemplate) -> Self {
        Self::Template(template)
    }
}

impl From<&SearchTemplate> for ImageRef {
    fn from(template: &SearchTemplate) -> Self {
        Self::Template(template.clone())
    }
}

/// What an action (click, hover, ...) should be aimed at.
#[derive(Clone, Debug)]
pub enum Target {
    Coordinates(Point),
    PriorMatch(MatchResult),
    Image(ImageRef),
}

impl From<Point> for Target {
    fn from(point: Point) -> Self {
        Self::Coordinates(point)
    }
}

impl From<(i32, i32)> for Target {
    fn from(xy: (i32, i32)) -> Self {
        Self::Coordinates(xy.into())
    }
}

impl From<MatchResult> for Target {
    fn from(result: MatchResult) -> Self {
        Self::PriorMatch(result)
    }
}

impl From<&MatchResult> for Target {
    fn from(result: &MatchResult) -> Self {
        Self::PriorMatch(result.clone())
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        Self::Image(ImageRef::Name(name.to_string()))
    }
}

impl From<String> for Target {
    fn from(name: String) -> Self {
        Self::Image(ImageRef::Name(name))
    }
}

impl From<SearchTemplate> for Target {
    fn from(template: SearchTemplate) -> Self {
        Self::Image(ImageRef::Template(template))
    }
}

/// Everything needed to locate an image on screen.
pub struct FocusContext<'a, S: ?Sized, D: ?Sized> {
    pub source: &'a mut S,
    pub directory: &'a D,
    pub matcher: &'a Matcher,
    pub scheduler: &'a RetryScheduler,
}

/// Maps a target to the point an action should hit.
///
/// Coordinates are returned verbatim and prior matches yield their stored
/// focus point, neither touching the screen. Images are located with the
/// scheduler's default find timeout.
pub fn resolve_focus_point<S, D>(
    target: Target,
    ctx: FocusContext<'_, S, D>,
) -> ScreenMatchResult<Point>
where
    S: ScreenSource + ?Sized,
    D: ImageDirectory + ?Sized,
{
    match target {
        Target::Coordinates(point) => Ok(point),
        Target::PriorMatch(result) => Ok(result.focus_point()),
        Target::Image(image) => {
            let template = match image {
                ImageRef::Name(name) => ctx.directory.resolve(&name)?,
                ImageRef::Template(template) => template,
            };
            let found = ctx
                .scheduler
                .find_default(ctx.source, ctx.matcher, &template)?;
            Ok(found.focus_point())
        }
    }
}
