use std::path::Path;

use anyhow::Context as _;

use crate::{
    foundation::core::Rgba8,
    foundation::error::{GlyphError, GlyphResult},
};

/// Look of the inline error indicator.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FallbackStyle {
    pub background: Rgba8,
    pub box_color: Rgba8,
    /// Longest error message kept on the surface status.
    pub max_error_chars: usize,
}

impl Default for FallbackStyle {
    fn default() -> Self {
        Self {
            background: Rgba8::opaque(24, 20, 22),
            box_color: Rgba8::opaque(196, 48, 64),
            max_error_chars: 80,
        }
    }
}

/// Options for an [`Orchestrator`](crate::Orchestrator).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GlyphOpts {
    /// Family forced for every render unless post metadata names one.
    pub forced_family: Option<String>,
    /// Renderer id mixed into renderer seeds instead of the registered id.
    pub renderer_id: Option<String>,
    /// Run the lexicon analyzer; when off, entropy falls back to its default.
    pub analyze_lexicon: bool,
    pub fallback: FallbackStyle,
    /// Bound on events held while the bus has no subscriber.
    pub event_queue_capacity: usize,
}

impl Default for GlyphOpts {
    fn default() -> Self {
        Self {
            forced_family: None,
            renderer_id: None,
            analyze_lexicon: true,
            fallback: FallbackStyle::default(),
            event_queue_capacity: crate::events::DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl GlyphOpts {
    /// Defaults overlaid with `GLYPHIC_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    pub fn with_env(mut self) -> Self {
        if let Some(family) = env_string("GLYPHIC_FAMILY") {
            self.forced_family = Some(family);
        }
        if let Some(id) = env_string("GLYPHIC_RENDERER") {
            self.renderer_id = Some(id);
        }
        if let Some(v) = env_string("GLYPHIC_LEXICON") {
            self.analyze_lexicon = !matches!(v.as_str(), "0" | "false" | "off");
        }
        if let Some(n) = std::env::var("GLYPHIC_MAX_ERROR_CHARS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&n| n > 0)
        {
            self.fallback.max_error_chars = n;
        }
        if let Some(n) = std::env::var("GLYPHIC_EVENT_QUEUE")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
        {
            self.event_queue_capacity = n;
        }
        self
    }

    /// Load options from a JSON file; absent fields keep their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> GlyphResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).with_context(|| format!("read '{}'", path.display()))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| GlyphError::serde(format!("{}: {e}", path.display())))
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
