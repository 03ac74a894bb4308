//! Glyphic turns a piece of text into a deterministic procedural illustration.
//!
//! The pipeline is a chain of small pure steps followed by a seeded renderer:
//!
//! - analyze the text into a [`ContentAnalysis`] and build a [`MeaningModel`]
//! - map meaning to renderer-neutral energies ([`ExpressionModel`]) and pick a [`Family`]
//! - bind the energies to a validated per-family knob record ([`BindingOutput`])
//! - hand the knobs to a [`GlyphRenderer`] driven by a [`FrameScheduler`] on a [`Surface`]
//!
//! [`Orchestrator`] runs the whole chain against an explicit [`Registry`].
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod binding;
pub mod config;
pub(crate) mod content;
pub mod events;
pub(crate) mod model;
pub mod orchestrator;
pub mod registry;
pub(crate) mod render;
pub(crate) mod seed;

pub use crate::foundation::core::{FrameIndex, Point, Rect, Rgba8, Vec2};
pub use crate::foundation::error::{GlyphError, GlyphResult};
pub use crate::foundation::math::{clamp_range, clamp01, quantize};

pub use crate::binding::contract::{
    required_knobs, validate_binding, validate_family_binding, validate_family_binding_value,
};
pub use crate::binding::families::{
    BindingFn, SECONDARY_THRESHOLD, binding_for, binding_scale, palette_for, secondary_blend,
};
pub use crate::binding::legacy::{LegacyAdapter, V1Adapter};
pub use crate::binding::output::{
    BindingOutput, CONTRACT_VERSION, KnobValue, MAX_SECONDARY_STRENGTH, Palette, SCALE_RANGE,
    Secondary,
};
pub use crate::config::{FallbackStyle, GlyphOpts};
pub use crate::content::analyze::{
    ContentAnalysis, LexiconFeatures, StructureFeatures, analyze_content, analyze_lexicon,
    analyze_structure,
};
pub use crate::content::resolve::{ContentResolver, FsContent, InMemoryContent, ResolvedContent};
pub use crate::events::{ContentUnit, EventBus};
pub use crate::model::expression::{Cadence, ExpressionModel, Scale, build_em};
pub use crate::model::family::{Family, rank_families, select_family};
pub use crate::model::meaning::{Dynamics, Intent, MeaningModel, Texture, build_mm};
pub use crate::orchestrator::{Orchestrator, PipelineTrace, PostMetadata, Stage};
pub use crate::registry::{BindingSource, LegacyBindingFn, Registry};
pub use crate::render::GlyphCanvas;
pub use crate::render::plugin::{
    DrawFn, GlyphRenderer, RendererFactory, RendererHandle, RendererInit,
};
pub use crate::render::reference::{ParticleField, draw_lattice, draw_rays, draw_strata};
pub use crate::render::scheduler::{FrameScheduler, LoopState};
pub use crate::render::surface::{Surface, SurfaceStatus};
pub use crate::seed::hash::{deterministic_seed, hash_seed, hash_seed_numeric};
pub use crate::seed::rng::SeededRng;

/// Per-family binding functions.
pub mod bindings {
    pub use crate::binding::families::{
        balance, chaos, collapse, constellation, flow, grid, interference, radiance, spiral,
        strata, threshold,
    };
}
