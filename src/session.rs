//! Scripting facade tying capture, matching and input together.

use crate::directory::ImageDirectory;
use crate::focus::{resolve_focus_point, FocusContext, ImageRef, Target};
use crate::input::{parse_key_sequence, type_text, InputDriver, KeyToken};
use crate::retry::{RetryConfig, RetryScheduler, ScreenSource};
use crate::search::{MatchConfig, MatchResult, Matcher, Point};
use crate::template::SearchTemplate;
use crate::util::ScreenMatchResult;
use std::time::Duration;

/// A scripted GUI session.
///
/// ```no_run
/// # use screenmatch::{ImageDir, Session, ScreenMatchResult};
/// # fn demo<S: screenmatch::ScreenSource, I: screenmatch::InputDriver>(
/// #     source: S, driver: I,
/// # ) -> ScreenMatchResult<()> {
/// let mut images = ImageDir::new();
/// images.load("images/")?;
/// let mut session = Session::new(source, images, driver);
/// session.click("save-button")?;
/// session.wait("saved-dialog", None)?;
/// session.type_text("<Enter>", None)?;
/// # Ok(())
/// # }
/// ```
pub struct Session<S, D, I> {
    source: S,
    directory: D,
    driver: I,
    matcher: Matcher,
    scheduler: RetryScheduler,
    key_hold: Duration,
}

impl<S, D, I> Session<S, D, I>
where
    S: ScreenSource,
    D: ImageDirectory,
    I: InputDriver,
{
    pub fn new(source: S, directory: D, driver: I) -> Self {
        Self {
            source,
            directory,
            driver,
            matcher: Matcher::new(),
            scheduler: RetryScheduler::default(),
            key_hold: crate::input::DEFAULT_KEY_HOLD,
        }
    }

    pub fn with_match_config(mut self, cfg: MatchConfig) -> Self {
        self.matcher = Matcher::new().with_config(cfg);
        self
    }

    pub fn with_retry_config(mut self, cfg: RetryConfig) -> Self {
        self.scheduler = RetryScheduler::new(cfg);
        self
    }

    /// Default hold for chord modifiers in [`type_text`](Self::type_text).
    pub fn with_key_hold(mut self, hold: Duration) -> Self {
        self.key_hold = hold;
        self
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn directory_mut(&mut self) -> &mut D {
        &mut self.directory
    }

    pub fn driver(&self) -> &I {
        &self.driver
    }

    /// Finds an image, retrying for `timeout` (default: the find timeout).
    pub fn find(
        &mut self,
        image: impl Into<ImageRef>,
        timeout: Option<Duration>,
    ) -> ScreenMatchResult<MatchResult> {
        let template = self.template_for(image.into())?;
        let timeout = timeout.unwrap_or(self.scheduler.config().find_timeout);
        self.scheduler
            .find(&mut self.source, &self.matcher, &template, timeout)
    }

    /// Blocks until an image shows up (default: the wait timeout).
    pub fn wait(
        &mut self,
        image: impl Into<ImageRef>,
        timeout: Option<Duration>,
    ) -> ScreenMatchResult<()> {
        let template = self.template_for(image.into())?;
        let timeout = timeout.unwrap_or(self.scheduler.config().wait_timeout);
        self.scheduler
            .wait(&mut self.source, &self.matcher, &template, timeout)
    }

    /// Every distinct match of an image on one fresh capture, best first.
    pub fn find_all(&mut self, image: impl Into<ImageRef>) -> ScreenMatchResult<Vec<MatchResult>> {
        let template = self.template_for(image.into())?;
        let capture = self.source.capture()?;
        self.matcher.find_all(&capture, &template)
    }

    pub fn resolve_focus_point(&mut self, target: impl Into<Target>) -> ScreenMatchResult<Point> {
        resolve_focus_point(
            target.into(),
            FocusContext {
                source: &mut self.source,
                directory: &self.directory,
                matcher: &self.matcher,
                scheduler: &self.scheduler,
            },
        )
    }

    pub fn click(&mut self, target: impl Into<Target>) -> ScreenMatchResult<()> {
        let at = self.resolve_focus_point(target)?;
        self.driver.click(at)
    }

    pub fn right_click(&mut self, target: impl Into<Target>) -> ScreenMatchResult<()> {
        let at = self.resolve_focus_point(target)?;
        self.driver.right_click(at)
    }

    pub fn double_click(&mut self, target: impl Into<Target>) -> ScreenMatchResult<()> {
        let at = self.resolve_focus_point(target)?;
        self.driver.double_click(at)
    }

    pub fn hover(&mut self, target: impl Into<Target>) -> ScreenMatchResult<()> {
        let at = self.resolve_focus_point(target)?;
        self.driver.hover(at)
    }

    /// Types text that may contain `<Ctrl>`-style special keys.
    pub fn type_text(&mut self, text: &str, hold: Option<Duration>) -> ScreenMatchResult<()> {
        let tokens = parse_key_sequence(text);
        self.type_tokens(&tokens, hold)
    }

    pub fn type_tokens(
        &mut self,
        tokens: &[KeyToken],
        hold: Option<Duration>,
    ) -> ScreenMatchResult<()> {
        type_text(&mut self.driver, tokens, hold.unwrap_or(self.key_hold))
    }

    fn template_for(&self, image: ImageRef) -> ScreenMatchResult<SearchTemplate> {
        match image {
            ImageRef::Name(name) => self.directory.resolve(&name),
            ImageRef::Template(template) => Ok(template),
        }
    }
}
