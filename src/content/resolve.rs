use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{GlyphError, GlyphResult};

/// Raw text of one content item plus where it came from.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ResolvedContent {
    pub text: String,
    pub url: String,
}

/// Source of post text, keyed by content id.
pub trait ContentResolver {
    fn resolve(&self, content_id: &str) -> GlyphResult<ResolvedContent>;
}

/// Content held in memory, mostly for hosts that already extracted their text.
#[derive(Clone, Debug, Default)]
pub struct InMemoryContent {
    items: BTreeMap<String, String>,
}

impl InMemoryContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, content_id: impl Into<String>, text: impl Into<String>) -> &mut Self {
        self.items.insert(content_id.into(), text.into());
        self
    }

    pub fn with(mut self, content_id: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(content_id, text);
        self
    }
}

impl ContentResolver for InMemoryContent {
    fn resolve(&self, content_id: &str) -> GlyphResult<ResolvedContent> {
        let text = self.items.get(content_id).ok_or_else(|| {
            GlyphError::missing(format!("no content registered for '{content_id}'"))
        })?;
        Ok(ResolvedContent {
            text: text.clone(),
            url: format!("memory://{content_id}"),
        })
    }
}

/// Content read from files under a root directory.
///
/// `content_id` resolves to `<root>/<id>` when that file exists, else `<root>/<id>.md`.
#[derive(Clone, Debug)]
pub struct FsContent {
    root: PathBuf,
}

impl FsContent {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn locate(&self, content_id: &str) -> GlyphResult<PathBuf> {
        let rel = Path::new(content_id);
        if rel.is_absolute()
            || rel
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Err(GlyphError::validation(format!(
                "content id '{content_id}' must be a relative path inside the content root"
            )));
        }
        let direct = self.root.join(rel);
        if direct.is_file() {
            return Ok(direct);
        }
        let md = self.root.join(format!("{content_id}.md"));
        if md.is_file() {
            return Ok(md);
        }
        Err(GlyphError::missing(format!(
            "content '{content_id}' not found under '{}'",
            self.root.display()
        )))
    }
}

impl ContentResolver for FsContent {
    fn resolve(&self, content_id: &str) -> GlyphResult<ResolvedContent> {
        let path = self.locate(content_id)?;
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("read '{}'", path.display()))?;
        Ok(ResolvedContent {
            text,
            url: format!("file://{}", path.display()),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/content/resolve.rs"]
mod tests;
