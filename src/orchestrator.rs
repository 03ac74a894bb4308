//! Per-render pipeline: content in, validated knobs out, renderer attached to a canvas.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::json;

use crate::{
    binding::contract::validate_family_binding,
    binding::output::BindingOutput,
    config::GlyphOpts,
    content::analyze::{ContentAnalysis, analyze_content, analyze_structure},
    content::resolve::ContentResolver,
    events::{ContentUnit, EventBus},
    foundation::error::GlyphResult,
    model::expression::{ExpressionModel, build_em},
    model::family::{Family, select_family},
    model::meaning::{MeaningModel, build_mm},
    registry::Registry,
    render::GlyphCanvas,
    render::plugin::RendererInit,
};

/// Metadata key carrying a seed hint.
pub const META_SEED: &str = "seed";
/// Metadata key forcing a family.
pub const META_FAMILY: &str = "family";
/// Metadata key overriding the renderer id mixed into renderer seeds.
pub const META_RENDERER: &str = "renderer";

/// String annotations attached to a post.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct PostMetadata(BTreeMap<String, String>);

impl PostMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Trimmed, non-empty value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
    }

    pub fn seed(&self) -> Option<&str> {
        self.get(META_SEED)
    }

    pub fn family(&self) -> Option<&str> {
        self.get(META_FAMILY)
    }

    pub fn renderer(&self) -> Option<&str> {
        self.get(META_RENDERER)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PostMetadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let pairs = iter.into_iter().map(|(k, v)| (k.into(), v.into()));
        Self(pairs.collect())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum Stage {
    ResolveContent,
    Analyze,
    BuildMm,
    BuildEm,
    SelectFamily,
    GetBinding,
    AdaptBinding,
    Validate,
    GetRenderer,
    Invoke,
    Log,
    Success,
    Failed,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::ResolveContent => "resolve-content",
            Stage::Analyze => "analyze",
            Stage::BuildMm => "build-mm",
            Stage::BuildEm => "build-em",
            Stage::SelectFamily => "select-family",
            Stage::GetBinding => "get-binding",
            Stage::AdaptBinding => "adapt-binding",
            Stage::Validate => "validate",
            Stage::GetRenderer => "get-renderer",
            Stage::Invoke => "invoke",
            Stage::Log => "log",
            Stage::Success => "success",
            Stage::Failed => "failed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every intermediate record of one pipeline run, up to the renderer lookup.
#[derive(Clone, Debug, serde::Serialize)]
pub struct PipelineTrace {
    pub content_id: String,
    pub url: String,
    pub analysis: ContentAnalysis,
    pub meaning: MeaningModel,
    pub expression: ExpressionModel,
    pub family: Family,
    pub binding: BindingOutput,
    /// Id mixed into the renderer seed.
    pub renderer_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy_version: Option<String>,
}

/// Runs the glyph pipeline against an injected registry and content source.
pub struct Orchestrator {
    registry: Registry,
    content: Box<dyn ContentResolver>,
    opts: GlyphOpts,
    bus: EventBus,
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("registry", &self.registry)
            .field("opts", &self.opts)
            .field("bus", &self.bus)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    pub fn new(
        registry: Registry,
        content: impl ContentResolver + 'static,
        opts: GlyphOpts,
    ) -> Self {
        let bus = EventBus::new(opts.event_queue_capacity);
        Self {
            registry,
            content: Box::new(content),
            opts,
            bus,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn opts(&self) -> &GlyphOpts {
        &self.opts
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// Run the pure stages (resolve through renderer lookup) without touching a canvas.
    #[tracing::instrument(skip(self, meta))]
    pub fn prepare(&self, content_id: &str, meta: &PostMetadata) -> GlyphResult<PipelineTrace> {
        let mut stage = Stage::ResolveContent;
        let trace = self.run_stages(content_id, meta, &mut stage);
        if let Err(err) = &trace {
            tracing::debug!(%stage, %err, "pipeline stopped");
        }
        trace
    }

    /// Render the glyph for `content_id` onto `canvas` and draw its first frame.
    ///
    /// Any failure tears down the canvas renderer, paints the fallback indicator,
    /// publishes `glyph.failed` and returns the error.
    #[tracing::instrument(skip(self, canvas, meta))]
    pub fn render_glyph(
        &mut self,
        canvas: &mut GlyphCanvas,
        content_id: &str,
        meta: &PostMetadata,
    ) -> GlyphResult<BindingOutput> {
        canvas.scheduler.set_fallback(self.opts.fallback.clone());

        let mut stage = Stage::ResolveContent;
        match self.attempt(canvas, content_id, meta, &mut stage) {
            Ok(trace) => {
                tracing::debug!(
                    stage = %Stage::Log,
                    family = %trace.family,
                    renderer = %trace.renderer_id,
                    "glyph rendered"
                );
                let payload = json!({
                    "family": trace.family,
                    "seed": trace.binding.seed,
                    "renderer": trace.renderer_id,
                    "secondary": trace.binding.secondary,
                });
                let unit = ContentUnit::new("glyph.rendered", content_id)
                    .with_context(json!({ "url": trace.url }))
                    .with_payload(payload);
                self.bus.publish(unit);
                tracing::debug!(stage = %Stage::Success, "pipeline done");
                Ok(trace.binding)
            }
            Err(err) => {
                let message = err.to_string();
                tracing::warn!(%stage, error = %message, "glyph render failed; showing fallback");
                canvas.scheduler.teardown();
                let fallback = &self.opts.fallback;
                canvas.surface.draw_error_indicator(&message, fallback);
                let payload = json!({ "stage": stage.name(), "error": message });
                let unit = ContentUnit::new("glyph.failed", content_id);
                self.bus.publish(unit.with_payload(payload));
                tracing::debug!(stage = %Stage::Failed, "pipeline done");
                Err(err)
            }
        }
    }

    fn attempt(
        &self,
        canvas: &mut GlyphCanvas,
        content_id: &str,
        meta: &PostMetadata,
        stage: &mut Stage,
    ) -> GlyphResult<PipelineTrace> {
        let trace = self.run_stages(content_id, meta, stage)?;

        *stage = Stage::GetRenderer;
        let entry = self.registry.renderer(trace.family)?;
        let init = RendererInit {
            renderer_id: &trace.renderer_id,
            binding: &trace.binding,
            width: canvas.surface.width(),
            height: canvas.surface.height(),
        };
        let renderer = entry.create(&init)?;

        *stage = Stage::Invoke;
        canvas.scheduler.attach(trace.family, renderer)?;
        canvas.tick()?;

        *stage = Stage::Log;
        Ok(trace)
    }

    fn run_stages(
        &self,
        content_id: &str,
        meta: &PostMetadata,
        stage: &mut Stage,
    ) -> GlyphResult<PipelineTrace> {
        *stage = Stage::ResolveContent;
        let content = self.content.resolve(content_id)?;
        tracing::debug!(%stage, url = %content.url, "content resolved");

        *stage = Stage::Analyze;
        let analysis = if self.opts.analyze_lexicon {
            analyze_content(&content.text)
        } else {
            ContentAnalysis {
                structure: analyze_structure(&content.text),
                lexicon: None,
            }
        };

        *stage = Stage::BuildMm;
        let meaning = build_mm(&analysis, meta.seed());

        *stage = Stage::BuildEm;
        let expression = build_em(&meaning);

        *stage = Stage::SelectFamily;
        let forced = meta.family().or(self.opts.forced_family.as_deref());
        let family = Family::parse(&select_family(&expression, forced))?;
        tracing::debug!(%stage, %family, forced = forced.is_some(), "family selected");

        *stage = Stage::GetBinding;
        let entry = self.registry.binding(family)?;
        if let Some(version) = entry.legacy_version() {
            *stage = Stage::AdaptBinding;
            tracing::debug!(%stage, %family, version, "adapting legacy binding");
        }
        let binding = entry.bind(&expression)?;

        *stage = Stage::Validate;
        validate_family_binding(family, &binding)?;

        *stage = Stage::GetRenderer;
        let registered = self.registry.renderer(family)?;
        let renderer_id = meta
            .renderer()
            .or(self.opts.renderer_id.as_deref())
            .unwrap_or(registered.id())
            .to_string();

        Ok(PipelineTrace {
            content_id: content_id.to_string(),
            url: content.url,
            analysis,
            meaning,
            expression,
            family,
            binding,
            renderer_id,
            legacy_version: entry.legacy_version().map(str::to_string),
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/orchestrator.rs"]
mod tests;
