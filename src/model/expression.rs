use std::collections::BTreeMap;

use crate::{
    foundation::math::{clamp01, weighted01},
    model::family::Family,
    model::meaning::MeaningModel,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Cadence {
    pub pulse: f64,
    pub anisotropy: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Scale {
    pub density: f64,
    pub granularity: f64,
}

/// Renderer-neutral energies derived from a [`MeaningModel`]. Every scalar is in [0,1].
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExpressionModel {
    pub families: BTreeMap<Family, f64>,
    pub cadence: Cadence,
    pub scale: Scale,
    pub secondary_affinity: f64,
    pub seed: String,
}

impl ExpressionModel {
    pub fn affinity(&self, family: Family) -> f64 {
        self.families.get(&family).copied().unwrap_or(0.0)
    }

    /// Re-clamp every scalar into [0,1]. Used on hand-built or deserialized models.
    pub fn clamped(mut self) -> Self {
        for v in self.families.values_mut() {
            *v = clamp01(*v);
        }
        self.cadence.pulse = clamp01(self.cadence.pulse);
        self.cadence.anisotropy = clamp01(self.cadence.anisotropy);
        self.scale.density = clamp01(self.scale.density);
        self.scale.granularity = clamp01(self.scale.granularity);
        self.secondary_affinity = clamp01(self.secondary_affinity);
        self
    }
}

/// Map meaning scalars to expression energies with fixed weights.
///
/// Absent optional meaning fields read as 0; inputs outside [0,1] are tolerated and
/// the results clamped.
#[tracing::instrument(skip(mm), fields(seed = %mm.seed))]
pub fn build_em(mm: &MeaningModel) -> ExpressionModel {
    let contemplative = mm.intent.contemplative;
    let analytical = mm.intent.analytical;
    let ritual = mm.intent.ritual.unwrap_or(0.0);
    let structural = mm.texture.structural_complexity;
    let historical = mm.texture.historical_depth.unwrap_or(0.0);
    let intimacy = mm.texture.personal_intimacy.unwrap_or(0.0);
    let cycles = mm.texture.cyclicality.unwrap_or(0.0);
    let entropy = mm.dynamics.entropy;
    let velocity = mm.dynamics.velocity.unwrap_or(0.0);
    let polarity = mm.dynamics.polarity.unwrap_or(0.0);

    let flow = weighted01(&[(0.45, contemplative), (0.35, velocity), (0.20, cycles)]);
    let grid = weighted01(&[(0.65, analytical), (0.35, structural)]);
    let strata = weighted01(&[
        (0.55, historical),
        (0.25, structural),
        (0.20, contemplative),
    ]);
    let radiance = weighted01(&[
        (0.40, polarity),
        (0.30, ritual),
        (0.15, intimacy),
        (0.15, entropy),
    ]);
    let families = BTreeMap::from([
        (Family::Flow, flow),
        (Family::Grid, grid),
        (Family::Strata, strata),
        (Family::Radiance, radiance),
    ]);

    let cadence = Cadence {
        pulse: weighted01(&[(0.60, velocity), (0.40, entropy)]),
        anisotropy: weighted01(&[(0.50, structural), (0.30, analytical), (0.20, polarity)]),
    };
    let scale = Scale {
        density: weighted01(&[(0.60, structural), (0.40, entropy)]),
        granularity: weighted01(&[(0.70, entropy), (0.30, analytical)]),
    };

    let secondary_affinity = second_highest(families.values().copied());

    ExpressionModel {
        families,
        cadence,
        scale,
        secondary_affinity,
        seed: mm.seed.clone(),
    }
}

fn second_highest(values: impl Iterator<Item = f64>) -> f64 {
    let mut sorted: Vec<f64> = values.collect();
    if sorted.len() < 2 {
        return 0.0;
    }
    sorted.sort_by(|a, b| b.total_cmp(a));
    clamp01(sorted[1])
}

#[cfg(test)]
#[path = "../../tests/unit/model/expression.rs"]
mod tests;
