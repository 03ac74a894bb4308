//! Per-family bindings: pure maps from an [`ExpressionModel`] to a validated knob record.
//!
//! Every binding shares the same frame (scale, palette, micro-blend, validation) and only
//! differs in its palette and knob formulas. Knob formulas read the expression model's
//! cadence (`pulse`, `anisotropy`), scale (`density`, `granularity`) and affinities.

use std::collections::BTreeMap;

use crate::{
    binding::contract::validate_family_binding,
    binding::output::{
        BindingOutput, CONTRACT_VERSION, KnobValue, MAX_SECONDARY_STRENGTH, Palette, SCALE_RANGE,
        Secondary,
    },
    foundation::error::{GlyphError, GlyphResult},
    foundation::math::{clamp_range, clamp01, quantize},
    model::expression::ExpressionModel,
    model::family::{Family, rank_families},
};

/// Secondary affinity above which a micro-blend is attached.
pub const SECONDARY_THRESHOLD: f64 = 0.65;

/// Signature shared by every current-contract binding.
pub type BindingFn = fn(&ExpressionModel) -> GlyphResult<BindingOutput>;

type Knobs = BTreeMap<String, KnobValue>;

/// The built-in binding for `family`.
pub fn binding_for(family: Family) -> BindingFn {
    match family {
        Family::Flow => flow as BindingFn,
        Family::Grid => grid,
        Family::Strata => strata,
        Family::Constellation => constellation,
        Family::Radiance => radiance,
        Family::Interference => interference,
        Family::Spiral => spiral,
        Family::Balance => balance,
        Family::Chaos => chaos,
        Family::Collapse => collapse,
        Family::Threshold => threshold,
    }
}

/// Fixed palette for `family`.
pub fn palette_for(family: Family) -> Palette {
    let (name, intent) = match family {
        Family::Flow => ("tidal", "calm"),
        Family::Grid => ("ledger", "structured"),
        Family::Strata => ("sediment", "layered"),
        Family::Constellation => ("nocturne", "scattered"),
        Family::Radiance => ("solar", "luminous"),
        Family::Interference => ("moire", "oscillating"),
        Family::Spiral => ("vortex", "turning"),
        Family::Balance => ("equinox", "poised"),
        Family::Chaos => ("static", "volatile"),
        Family::Collapse => ("ember", "falling"),
        Family::Threshold => ("liminal", "liminal"),
    };
    Palette {
        name: name.to_string(),
        intent: intent.to_string(),
    }
}

/// `clamp(density, 0.5, 2.0)`.
pub fn binding_scale(em: &ExpressionModel) -> f64 {
    let (lo, hi) = SCALE_RANGE;
    clamp_range(em.scale.density, lo, hi)
}

/// Micro-blend toward the runner-up family when `secondary_affinity` clears the threshold.
///
/// The blend names the second-ranked family, or the first-ranked one when the
/// second-ranked family is `own` (forced selections).
pub fn secondary_blend(em: &ExpressionModel, own: Family) -> Option<Secondary> {
    if em.secondary_affinity.is_nan() || em.secondary_affinity <= SECONDARY_THRESHOLD {
        return None;
    }
    let ranked = rank_families(em);
    let family = match ranked.get(1) {
        Some((f, _)) if *f != own => *f,
        Some(_) => ranked[0].0,
        None => return None,
    };
    let excess = em.secondary_affinity - SECONDARY_THRESHOLD;
    Some(Secondary {
        family,
        strength: excess.min(MAX_SECONDARY_STRENGTH),
    })
}

fn finish(family: Family, em: &ExpressionModel, knobs: Knobs) -> GlyphResult<BindingOutput> {
    let out = BindingOutput {
        family,
        seed: em.seed.clone(),
        palette: palette_for(family),
        scale: binding_scale(em),
        knobs,
        secondary: secondary_blend(em, family),
        contract_version: CONTRACT_VERSION.to_string(),
    };
    validate_family_binding(family, &out)?;
    Ok(out)
}

fn require_families(em: &ExpressionModel, family: Family) -> GlyphResult<()> {
    if em.families.is_empty() {
        return Err(GlyphError::binding(format!(
            "{family} binding needs an expression model with family affinities"
        )));
    }
    Ok(())
}

fn knobs<const N: usize>(pairs: [(&str, KnobValue); N]) -> Knobs {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

fn num(x: f64) -> KnobValue {
    KnobValue::Number(clamp01(x))
}

fn count(x: f64, min: i64, max: i64) -> KnobValue {
    KnobValue::from(quantize(x, min, max))
}

pub fn flow(em: &ExpressionModel) -> GlyphResult<BindingOutput> {
    require_families(em, Family::Flow)?;
    let c = em.cadence;
    let speed = 0.5 * c.pulse + 0.5 * em.affinity(Family::Flow);
    let k = knobs([
        ("particleCount", count(em.scale.density, 200, 1200)),
        ("turbulence", num(c.pulse)),
        ("curl", num(c.anisotropy)),
        ("speed", num(speed)),
    ]);
    finish(Family::Flow, em, k)
}

pub fn grid(em: &ExpressionModel) -> GlyphResult<BindingOutput> {
    require_families(em, Family::Grid)?;
    let k = knobs([
        ("gridness", num(em.affinity(Family::Grid))),
        ("granularity", num(em.scale.granularity)),
        ("orthogonality", num(em.cadence.anisotropy)),
    ]);
    finish(Family::Grid, em, k)
}

pub fn strata(em: &ExpressionModel) -> GlyphResult<BindingOutput> {
    require_families(em, Family::Strata)?;
    let k = knobs([
        ("layers", count(em.scale.granularity, 3, 24)),
        ("erosion", num(em.cadence.pulse)),
        ("tilt", num(0.5 * em.cadence.anisotropy)),
    ]);
    finish(Family::Strata, em, k)
}

pub fn constellation(em: &ExpressionModel) -> GlyphResult<BindingOutput> {
    require_families(em, Family::Constellation)?;
    let k = knobs([
        ("starCount", count(em.scale.density, 24, 240)),
        ("linkDistance", num(1.0 - em.scale.granularity)),
        ("twinkle", num(em.cadence.pulse)),
    ]);
    finish(Family::Constellation, em, k)
}

pub fn radiance(em: &ExpressionModel) -> GlyphResult<BindingOutput> {
    require_families(em, Family::Radiance)?;
    let k = knobs([
        ("intensity", num(em.affinity(Family::Radiance))),
        ("rayCount", count(em.scale.granularity, 16, 128)),
        ("glow", num(em.scale.density)),
        ("burst", KnobValue::Bool(em.cadence.pulse > 0.7)),
    ]);
    finish(Family::Radiance, em, k)
}

pub fn interference(em: &ExpressionModel) -> GlyphResult<BindingOutput> {
    require_families(em, Family::Interference)?;
    let k = knobs([
        ("waveCount", count(em.scale.granularity, 2, 12)),
        ("frequency", num(em.cadence.pulse)),
        ("phaseShift", num(em.cadence.anisotropy)),
    ]);
    finish(Family::Interference, em, k)
}

pub fn spiral(em: &ExpressionModel) -> GlyphResult<BindingOutput> {
    require_families(em, Family::Spiral)?;
    let k = knobs([
        ("arms", count(em.cadence.anisotropy, 2, 9)),
        ("tightness", num(em.scale.granularity)),
        ("rotation", num(em.cadence.pulse)),
    ]);
    finish(Family::Spiral, em, k)
}

pub fn balance(em: &ExpressionModel) -> GlyphResult<BindingOutput> {
    require_families(em, Family::Balance)?;
    let k = knobs([
        ("symmetry", num(1.0 - em.cadence.anisotropy)),
        ("weight", num(em.scale.density)),
        ("tension", num(em.cadence.pulse)),
    ]);
    finish(Family::Balance, em, k)
}

pub fn chaos(em: &ExpressionModel) -> GlyphResult<BindingOutput> {
    require_families(em, Family::Chaos)?;
    let k = knobs([
        ("agitation", num(em.cadence.pulse)),
        ("fragments", count(em.scale.granularity, 16, 256)),
        ("drift", num(1.0 - em.cadence.anisotropy)),
    ]);
    finish(Family::Chaos, em, k)
}

pub fn collapse(em: &ExpressionModel) -> GlyphResult<BindingOutput> {
    require_families(em, Family::Collapse)?;
    let gravity = 0.5 * em.cadence.pulse + 0.5 * em.scale.density;
    let k = knobs([
        ("gravity", num(gravity)),
        ("fracture", num(em.scale.granularity)),
        ("remnant", num(1.0 - em.scale.density)),
    ]);
    finish(Family::Collapse, em, k)
}

pub fn threshold(em: &ExpressionModel) -> GlyphResult<BindingOutput> {
    require_families(em, Family::Threshold)?;
    let k = knobs([
        ("aperture", num(1.0 - em.scale.density)),
        ("contrast", num(em.cadence.anisotropy)),
        ("luminance", num(em.scale.granularity)),
    ]);
    finish(Family::Threshold, em, k)
}

#[cfg(test)]
#[path = "../../tests/unit/binding/families.rs"]
mod tests;
