use std::collections::BTreeMap;

use crate::{
    content::analyze::ContentAnalysis,
    foundation::error::{GlyphError, GlyphResult},
    foundation::math::clamp01,
    seed::hash::hash_seed,
};

/// Seed used when neither a hint nor a content hash is available.
pub const DEFAULT_SEED: &str = "glyph-default";

/// Entropy assumed when no lexicon analysis ran.
pub const DEFAULT_ENTROPY: f64 = 0.4;

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Intent {
    pub contemplative: f64,
    pub analytical: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contested: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ritual: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Texture {
    pub structural_complexity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical_depth: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_intimacy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cyclicality: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Dynamics {
    pub entropy: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polarity: Option<f64>,
}

/// Shallow scalar summary of one content item. All scalars live in [0,1].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MeaningModel {
    pub seed: String,
    pub intent: Intent,
    pub texture: Texture,
    pub dynamics: Dynamics,
}

/// Build the meaning model for analyzed content. Never fails: empty text gives a
/// valid low-signal model.
#[tracing::instrument(skip(analysis))]
pub fn build_mm(analysis: &ContentAnalysis, seed_hint: Option<&str>) -> MeaningModel {
    let seed = seed_hint
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .or_else(|| {
            serde_json::to_string(analysis)
                .ok()
                .map(|json| hash_seed(&json))
        })
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_SEED.to_string());

    let headings = f64::from(analysis.structure.headings_count);
    let paragraphs = f64::from(analysis.structure.para_count);

    let structural_complexity = (headings / 10.0).min(1.0);
    let entropy = clamp01(analysis.lexicon.map_or(DEFAULT_ENTROPY, |l| l.rarity));

    MeaningModel {
        seed,
        intent: Intent {
            contemplative: (paragraphs / (headings + 1.0) / 8.0).min(1.0),
            analytical: (0.6 * structural_complexity + 0.4 * entropy).min(1.0),
            contested: None,
            ritual: None,
        },
        texture: Texture {
            structural_complexity,
            historical_depth: Some((paragraphs / 50.0).min(1.0)),
            personal_intimacy: None,
            cyclicality: None,
        },
        dynamics: Dynamics {
            entropy,
            velocity: Some((paragraphs / 30.0).min(1.0)),
            polarity: None,
        },
    }
}

impl MeaningModel {
    /// Decode a meaning model from JSON, tolerating legacy sub-records.
    ///
    /// `intent`, `texture` and `dynamics` may each be an object or a legacy string of
    /// the form `"key:value, key:value"`. Missing required keys read as 0, values are
    /// clamped into [0,1], unparsable pairs are skipped.
    pub fn from_json_value(value: &serde_json::Value) -> GlyphResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| GlyphError::serde("meaning model must be a JSON object"))?;

        let seed = match obj.get("seed") {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => s.clone(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => DEFAULT_SEED.to_string(),
        };

        let intent = coerce_record(obj.get("intent"));
        let texture = coerce_record(obj.get("texture"));
        let dynamics = coerce_record(obj.get("dynamics"));

        Ok(Self {
            seed,
            intent: Intent {
                contemplative: required(&intent, "contemplative"),
                analytical: required(&intent, "analytical"),
                contested: optional(&intent, "contested"),
                ritual: optional(&intent, "ritual"),
            },
            texture: Texture {
                structural_complexity: required(&texture, "structural_complexity"),
                historical_depth: optional(&texture, "historical_depth"),
                personal_intimacy: optional(&texture, "personal_intimacy"),
                cyclicality: optional(&texture, "cyclicality"),
            },
            dynamics: Dynamics {
                entropy: required(&dynamics, "entropy"),
                velocity: optional(&dynamics, "velocity"),
                polarity: optional(&dynamics, "polarity"),
            },
        })
    }

    /// Parse a JSON string with [`MeaningModel::from_json_value`].
    pub fn from_json_str(s: &str) -> GlyphResult<Self> {
        let value: serde_json::Value = serde_json::from_str(s)?;
        Self::from_json_value(&value)
    }
}

type Record = BTreeMap<String, f64>;

fn coerce_record(value: Option<&serde_json::Value>) -> Record {
    match value {
        Some(serde_json::Value::Object(map)) => map
            .iter()
            .filter_map(|(k, v)| scalar(v).map(|x| (k.clone(), x)))
            .collect(),
        Some(serde_json::Value::String(s)) => parse_legacy_pairs(s),
        _ => Record::new(),
    }
}

/// Parse `"key:value, key:value"`; malformed pairs are dropped.
pub(crate) fn parse_legacy_pairs(s: &str) -> Record {
    s.split(',')
        .filter_map(|pair| {
            let (k, v) = pair.split_once(':')?;
            let key = k.trim().trim_matches('"');
            if key.is_empty() {
                return None;
            }
            let x = v.trim().trim_matches('"').parse::<f64>().ok()?;
            x.is_finite().then(|| (key.to_string(), x))
        })
        .collect()
}

fn scalar(v: &serde_json::Value) -> Option<f64> {
    match v {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        serde_json::Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
    .filter(|x| x.is_finite())
}

fn required(rec: &Record, key: &str) -> f64 {
    rec.get(key).copied().map_or(0.0, clamp01)
}

fn optional(rec: &Record, key: &str) -> Option<f64> {
    rec.get(key).copied().map(clamp01)
}

#[cfg(test)]
#[path = "../../tests/unit/model/meaning.rs"]
mod tests;
