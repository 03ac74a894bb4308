//! Explicit registry of family bindings and renderer plugins.
//!
//! Everything the orchestrator dispatches to is registered here up front. Legacy
//! bindings are paired with their adapter at registration, and renderer handles are
//! turned into factories at registration, so lookups only ever see one shape.

use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

use crate::{
    binding::families::{BindingFn, binding_for},
    binding::legacy::LegacyAdapter,
    binding::output::BindingOutput,
    foundation::error::{GlyphError, GlyphResult},
    model::expression::ExpressionModel,
    model::family::Family,
    render::plugin::{BoxedFactory, GlyphRenderer, RendererHandle, RendererInit},
    render::reference::{ParticleField, draw_lattice, draw_rays, draw_strata},
};

/// A binding that still emits an older contract as raw JSON.
pub type LegacyBindingFn = fn(&ExpressionModel) -> GlyphResult<JsonValue>;

/// How a binding is registered.
pub enum BindingSource {
    Current(BindingFn),
    Legacy {
        bind: LegacyBindingFn,
        adapter: Box<dyn LegacyAdapter>,
    },
}

type UniformBinding = Box<dyn Fn(&ExpressionModel) -> GlyphResult<BindingOutput>>;

pub struct BindingEntry {
    legacy_version: Option<String>,
    bind: UniformBinding,
}

impl BindingEntry {
    /// Contract version adapted from, for legacy registrations.
    pub fn legacy_version(&self) -> Option<&str> {
        self.legacy_version.as_deref()
    }

    pub fn bind(&self, em: &ExpressionModel) -> GlyphResult<BindingOutput> {
        (self.bind)(em)
    }
}

pub struct RendererEntry {
    id: String,
    factory: BoxedFactory,
}

impl RendererEntry {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn create(&self, init: &RendererInit<'_>) -> GlyphResult<Box<dyn GlyphRenderer>> {
        (self.factory)(init)
    }
}

#[derive(Default)]
pub struct Registry {
    bindings: BTreeMap<Family, BindingEntry>,
    renderers: BTreeMap<Family, RendererEntry>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bindings: Vec<_> = self.bindings.keys().collect();
        let renderers: Vec<_> = self
            .renderers
            .iter()
            .map(|(family, r)| (family, r.id.as_str()))
            .collect();
        f.debug_struct("Registry")
            .field("bindings", &bindings)
            .field("renderers", &renderers)
            .finish()
    }
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in bindings for all families plus the reference renderers.
    pub fn with_defaults() -> Self {
        let mut reg = Self::new();
        for family in Family::ALL {
            reg.register_binding(family, BindingSource::Current(binding_for(family)));
            let (id, handle) = default_renderer(family);
            reg.register_renderer(family, id, handle);
        }
        reg
    }

    /// Register (or replace) the binding for `family`.
    pub fn register_binding(&mut self, family: Family, source: BindingSource) {
        let entry = match source {
            BindingSource::Current(bind) => BindingEntry {
                legacy_version: None,
                bind: Box::new(bind),
            },
            BindingSource::Legacy { bind, adapter } => BindingEntry {
                legacy_version: Some(adapter.version().to_string()),
                bind: Box::new(move |em: &ExpressionModel| {
                    let raw = bind(em)?;
                    adapter.adapt(family, &raw)
                }),
            },
        };
        tracing::debug!(%family, legacy = ?entry.legacy_version, "binding registered");
        self.bindings.insert(family, entry);
    }

    /// Register (or replace) the renderer for `family`.
    pub fn register_renderer(
        &mut self,
        family: Family,
        id: impl Into<String>,
        handle: RendererHandle,
    ) {
        let id = id.into();
        tracing::debug!(%family, renderer = %id, "renderer registered");
        self.renderers.insert(
            family,
            RendererEntry {
                id,
                factory: handle.into_factory(),
            },
        );
    }

    pub fn binding(&self, family: Family) -> GlyphResult<&BindingEntry> {
        self.bindings.get(&family).ok_or_else(|| {
            GlyphError::unknown_family(format!("no binding registered for '{family}'"))
        })
    }

    pub fn renderer(&self, family: Family) -> GlyphResult<&RendererEntry> {
        self.renderers.get(&family).ok_or_else(|| {
            GlyphError::unknown_family(format!("no renderer registered for '{family}'"))
        })
    }

    /// Run the registered binding for `family`.
    pub fn bind(&self, family: Family, em: &ExpressionModel) -> GlyphResult<BindingOutput> {
        self.binding(family)?.bind(em)
    }

    /// Families with both a binding and a renderer.
    pub fn families(&self) -> Vec<Family> {
        self.bindings
            .keys()
            .filter(|f| self.renderers.contains_key(f))
            .copied()
            .collect()
    }
}

fn default_renderer(family: Family) -> (&'static str, RendererHandle) {
    match family {
        Family::Radiance => ("rays", RendererHandle::Draw(draw_rays)),
        Family::Grid | Family::Balance | Family::Threshold | Family::Interference => {
            ("lattice", RendererHandle::Draw(draw_lattice))
        }
        Family::Strata | Family::Collapse => ("strata", RendererHandle::Draw(draw_strata)),
        Family::Flow | Family::Constellation | Family::Chaos | Family::Spiral => {
            ("particles", RendererHandle::Stateful(ParticleField::create))
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/registry.rs"]
mod tests;
