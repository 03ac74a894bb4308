use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

use crate::{
    binding::families::palette_for,
    binding::output::{BindingOutput, CONTRACT_VERSION, KnobValue, Palette, SCALE_RANGE, Secondary},
    foundation::error::{GlyphError, GlyphResult},
    foundation::math::clamp_range,
    model::family::Family,
};

/// Top-level fields of a legacy record that are never knobs.
const RESERVED: [&str; 8] = [
    "family",
    "seed",
    "palette",
    "scale",
    "secondary",
    "contractVersion",
    "version",
    "knobs",
];

/// Converts the output of an older binding generation into the current contract.
///
/// An adapter is picked once, when a legacy binding is registered.
pub trait LegacyAdapter: Send + Sync {
    /// Contract version this adapter reads.
    fn version(&self) -> &str;

    fn adapt(&self, family: Family, legacy: &JsonValue) -> GlyphResult<BindingOutput>;
}

/// Adapter for the flat v1 records: parameters sit next to `seed`/`palette` and use
/// the v1 names.
#[derive(Clone, Copy, Debug, Default)]
pub struct V1Adapter;

impl V1Adapter {
    /// Renames from v1 parameter names to current knob names. Families without an
    /// entry keep their parameter names.
    pub fn renames(family: Family) -> &'static [(&'static str, &'static str)] {
        match family {
            Family::Flow => &[
                ("particles", "particleCount"),
                ("noise", "turbulence"),
                ("swirl", "curl"),
                ("velocity", "speed"),
            ],
            Family::Grid => &[
                ("regularity", "gridness"),
                ("cellSize", "granularity"),
                ("rightAngles", "orthogonality"),
            ],
            Family::Strata => &[
                ("bands", "layers"),
                ("weathering", "erosion"),
                ("dip", "tilt"),
            ],
            Family::Constellation => &[
                ("stars", "starCount"),
                ("reach", "linkDistance"),
                ("shimmer", "twinkle"),
            ],
            Family::Radiance => &[
                ("brightness", "intensity"),
                ("rays", "rayCount"),
                ("halo", "glow"),
                ("flare", "burst"),
            ],
            Family::Interference => &[
                ("waves", "waveCount"),
                ("freq", "frequency"),
                ("phase", "phaseShift"),
            ],
            _ => &[],
        }
    }
}

impl LegacyAdapter for V1Adapter {
    fn version(&self) -> &str {
        "1"
    }

    fn adapt(&self, family: Family, legacy: &JsonValue) -> GlyphResult<BindingOutput> {
        let obj = legacy
            .as_object()
            .ok_or_else(|| GlyphError::contract("legacy binding output must be an object"))?;

        let seed = match obj.get("seed") {
            Some(JsonValue::String(s)) if !s.is_empty() => s.clone(),
            Some(JsonValue::Number(n)) => n.to_string(),
            _ => return Err(GlyphError::contract("legacy binding output has no seed")),
        };

        let palette = match obj.get("palette") {
            Some(JsonValue::String(name)) => Palette {
                name: name.clone(),
                intent: palette_for(family).intent,
            },
            Some(p @ JsonValue::Object(_)) => serde_json::from_value(p.clone())
                .map_err(|e| GlyphError::contract(format!("legacy palette: {e}")))?,
            _ => palette_for(family),
        };

        let (lo, hi) = SCALE_RANGE;
        let scale = obj
            .get("scale")
            .and_then(JsonValue::as_f64)
            .map_or(1.0, |s| clamp_range(s, lo, hi));

        let secondary = match obj.get("secondary") {
            Some(v @ JsonValue::Object(_)) => Some(
                serde_json::from_value::<Secondary>(v.clone())
                    .map_err(|e| GlyphError::contract(format!("legacy secondary: {e}")))?,
            ),
            _ => None,
        };

        let renames = Self::renames(family);
        let mut knobs = BTreeMap::new();
        for (key, value) in obj {
            if RESERVED.contains(&key.as_str()) {
                continue;
            }
            let Some(knob) = knob_value(value) else {
                tracing::debug!(%family, key = %key, "dropping non-scalar legacy field");
                continue;
            };
            let name = renames
                .iter()
                .find(|(old, _)| *old == key.as_str())
                .map_or(key.as_str(), |(_, new)| *new);
            knobs.insert(name.to_string(), knob);
        }

        Ok(BindingOutput {
            family,
            seed,
            palette,
            scale,
            knobs,
            secondary,
            contract_version: CONTRACT_VERSION.to_string(),
        })
    }
}

fn knob_value(v: &JsonValue) -> Option<KnobValue> {
    match v {
        JsonValue::Bool(b) => Some(KnobValue::Bool(*b)),
        JsonValue::Number(n) => n.as_f64().map(KnobValue::Number),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/binding/legacy.rs"]
mod tests;
