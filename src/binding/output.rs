use std::collections::BTreeMap;

use crate::model::family::Family;

/// Contract version stamped on every current binding output.
pub const CONTRACT_VERSION: &str = "2";

/// Lowest and highest scale a binding may emit.
pub const SCALE_RANGE: (f64, f64) = (0.5, 2.0);

/// Upper bound of a micro-blend strength.
pub const MAX_SECONDARY_STRENGTH: f64 = 0.2;

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Palette {
    pub name: String,
    pub intent: String,
}

/// One named rendering parameter.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum KnobValue {
    Bool(bool),
    Number(f64),
}

impl KnobValue {
    pub fn as_f64(self) -> Option<f64> {
        match self {
            KnobValue::Number(x) => Some(x),
            KnobValue::Bool(_) => None,
        }
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            KnobValue::Bool(b) => Some(b),
            KnobValue::Number(_) => None,
        }
    }
}

impl From<f64> for KnobValue {
    fn from(x: f64) -> Self {
        KnobValue::Number(x)
    }
}

impl From<i64> for KnobValue {
    fn from(x: i64) -> Self {
        KnobValue::Number(x as f64)
    }
}

impl From<bool> for KnobValue {
    fn from(b: bool) -> Self {
        KnobValue::Bool(b)
    }
}

/// Minor influence of a second family, capped at [`MAX_SECONDARY_STRENGTH`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Secondary {
    pub family: Family,
    pub strength: f64,
}

/// Validated, family-specific knob record handed to a renderer.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingOutput {
    pub family: Family,
    pub seed: String,
    pub palette: Palette,
    pub scale: f64,
    pub knobs: BTreeMap<String, KnobValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<Secondary>,
    pub contract_version: String,
}

impl BindingOutput {
    /// Numeric knob, or `default` when absent or boolean.
    pub fn knob(&self, name: &str, default: f64) -> f64 {
        self.knobs
            .get(name)
            .and_then(|v| v.as_f64())
            .unwrap_or(default)
    }

    /// Boolean knob; numeric knobs read as `!= 0`.
    pub fn flag(&self, name: &str) -> bool {
        match self.knobs.get(name) {
            Some(KnobValue::Bool(b)) => *b,
            Some(KnobValue::Number(x)) => *x != 0.0,
            None => false,
        }
    }
}
