//! Named template registry.

use crate::template::SearchTemplate;
use crate::util::{ScreenMatchError, ScreenMatchResult};
use std::collections::BTreeMap;

/// Looks up templates by name.
pub trait ImageDirectory {
    /// Fails with [`ScreenMatchError::UnregisteredImage`] for unknown names.
    fn resolve(&self, name: &str) -> ScreenMatchResult<SearchTemplate>;
}

/// In-memory template directory.
#[derive(Clone, Debug, Default)]
pub struct ImageDir {
    templates: BTreeMap<String, SearchTemplate>,
}

impl ImageDir {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a template under its own name, replacing any previous entry.
    pub fn insert(&mut self, template: SearchTemplate) -> Option<SearchTemplate> {
        self.templates.insert(template.name().to_string(), template)
    }

    pub fn get(&self, name: &str) -> Option<&SearchTemplate> {
        self.templates.get(name)
    }

    /// Mutable access, e.g. to invalidate a template's decode cache.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut SearchTemplate> {
        self.templates.get_mut(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Registers every decodable image file in `dir` by its file stem with the
    /// default similarity. Files are decoded lazily on first match. Returns the
    /// number of templates added.
    #[cfg(feature = "image-io")]
    pub fn load(&mut self, dir: impl AsRef<std::path::Path>) -> ScreenMatchResult<usize> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|err| ScreenMatchError::DecodeFailure {
            reason: format!("{}: {err}", dir.display()),
        })?;

        let mut added = 0;
        for entry in entries {
            let path = entry
                .map_err(|err| ScreenMatchError::DecodeFailure {
                    reason: format!("{}: {err}", dir.display()),
                })?
                .path();
            if !path.is_file() || !crate::image::io::is_supported_extension(&path) {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };
            self.insert(SearchTemplate::with_default_similarity(
                name,
                crate::asset::ImageAsset::from_path(path),
            ));
            added += 1;
        }
        Ok(added)
    }
}

impl ImageDirectory for ImageDir {
    fn resolve(&self, name: &str) -> ScreenMatchResult<SearchTemplate> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| ScreenMatchError::UnregisteredImage {
                name: name.to_string(),
            })
    }
}
