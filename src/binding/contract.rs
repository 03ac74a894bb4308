use serde_json::Value as JsonValue;

use crate::{
    binding::output::{BindingOutput, MAX_SECONDARY_STRENGTH, SCALE_RANGE},
    foundation::error::{GlyphError, GlyphResult},
    model::family::Family,
};

const REQUIRED_FIELDS: [&str; 5] = ["family", "seed", "palette", "scale", "knobs"];

/// Knobs every binding of `family` must emit.
pub fn required_knobs(family: Family) -> &'static [&'static str] {
    match family {
        Family::Flow => &["particleCount", "turbulence", "curl"],
        Family::Grid => &["gridness", "granularity", "orthogonality"],
        Family::Strata => &["layers", "erosion", "tilt"],
        Family::Constellation => &["starCount", "linkDistance", "twinkle"],
        Family::Radiance => &["intensity", "rayCount", "glow", "burst"],
        Family::Interference => &["waveCount", "frequency", "phaseShift"],
        Family::Spiral => &["arms", "tightness", "rotation"],
        Family::Balance => &["symmetry", "weight", "tension"],
        Family::Chaos => &["agitation", "fragments", "drift"],
        Family::Collapse => &["gravity", "fracture", "remnant"],
        Family::Threshold => &["aperture", "contrast", "luminance"],
    }
}

/// Structural check of an untyped binding output. Stops at the first violation.
pub fn validate_binding(output: &JsonValue, required: &[&str]) -> GlyphResult<()> {
    let obj = output
        .as_object()
        .ok_or_else(|| GlyphError::contract("binding output must be an object"))?;

    for field in REQUIRED_FIELDS {
        if !obj.contains_key(field) {
            return Err(GlyphError::contract(format!(
                "binding output is missing '{field}'"
            )));
        }
    }

    if !obj["family"].is_string() {
        return Err(GlyphError::contract("'family' must be a string"));
    }
    if !obj["seed"].is_string() {
        return Err(GlyphError::contract("'seed' must be a string"));
    }
    if !obj["palette"].is_object() {
        return Err(GlyphError::contract("'palette' must be an object"));
    }

    let scale = obj["scale"]
        .as_f64()
        .ok_or_else(|| GlyphError::contract("'scale' must be a number"))?;
    check_scale(scale)?;

    let knobs = obj["knobs"]
        .as_object()
        .ok_or_else(|| GlyphError::contract("'knobs' must be an object"))?;
    for key in required {
        match knobs.get(*key) {
            None => {
                return Err(GlyphError::contract(format!(
                    "knobs are missing required '{key}'"
                )));
            }
            Some(v) if !(v.is_number() || v.is_boolean()) => {
                return Err(GlyphError::contract(format!(
                    "knob '{key}' must be a number or bool"
                )));
            }
            Some(_) => {}
        }
    }

    match obj.get("secondary") {
        None | Some(JsonValue::Null) => Ok(()),
        Some(JsonValue::Object(sec)) => {
            if !sec.get("family").is_some_and(JsonValue::is_string) {
                return Err(GlyphError::contract("'secondary.family' must be a string"));
            }
            let strength = sec
                .get("strength")
                .and_then(JsonValue::as_f64)
                .ok_or_else(|| GlyphError::contract("'secondary.strength' must be a number"))?;
            check_strength(strength)
        }
        Some(_) => Err(GlyphError::contract("'secondary' must be an object")),
    }
}

/// Validate a typed output against `family`'s knob table.
pub fn validate_family_binding(family: Family, output: &BindingOutput) -> GlyphResult<()> {
    if output.family != family {
        return Err(GlyphError::contract(format!(
            "binding for '{family}' reported family '{}'",
            output.family
        )));
    }
    if output.seed.is_empty() {
        return Err(GlyphError::contract("'seed' must be non-empty"));
    }
    check_scale(output.scale)?;

    for key in required_knobs(family) {
        if !output.knobs.contains_key(*key) {
            return Err(GlyphError::contract(format!(
                "{family} knobs are missing required '{key}'"
            )));
        }
    }
    if let Some((key, _)) = output
        .knobs
        .iter()
        .find(|(_, v)| v.as_f64().is_some_and(|x| !x.is_finite()))
    {
        return Err(GlyphError::contract(format!("knob '{key}' must be finite")));
    }

    match &output.secondary {
        Some(sec) => check_strength(sec.strength),
        None => Ok(()),
    }
}

/// Look up the knob table by family name, then run [`validate_binding`].
pub fn validate_family_binding_value(family: &str, output: &JsonValue) -> GlyphResult<()> {
    let family = Family::parse(family)?;
    validate_binding(output, required_knobs(family))
}

fn check_scale(scale: f64) -> GlyphResult<()> {
    let (lo, hi) = SCALE_RANGE;
    if !(lo..=hi).contains(&scale) {
        return Err(GlyphError::contract(format!(
            "'scale' {scale} is outside [{lo}, {hi}]"
        )));
    }
    Ok(())
}

fn check_strength(strength: f64) -> GlyphResult<()> {
    if !(0.0..=MAX_SECONDARY_STRENGTH).contains(&strength) {
        return Err(GlyphError::contract(format!(
            "'secondary.strength' {strength} is outside [0, {MAX_SECONDARY_STRENGTH}]"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/binding/contract.rs"]
mod tests;
