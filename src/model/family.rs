use std::fmt;
use std::str::FromStr;

use crate::{
    foundation::error::{GlyphError, GlyphResult},
    foundation::math::clamp01,
    model::expression::ExpressionModel,
};

/// Family used when an expression model carries no affinities at all.
pub const DEFAULT_FAMILY: Family = Family::Flow;

/// The fixed set of visual archetypes.
///
/// Declaration order doubles as the selection priority: when two families tie on
/// affinity, the one declared first wins.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Flow,
    Grid,
    Strata,
    Constellation,
    Radiance,
    Interference,
    Spiral,
    Balance,
    Chaos,
    Collapse,
    Threshold,
}

impl Family {
    pub const ALL: [Family; 11] = [
        Family::Flow,
        Family::Grid,
        Family::Strata,
        Family::Constellation,
        Family::Radiance,
        Family::Interference,
        Family::Spiral,
        Family::Balance,
        Family::Chaos,
        Family::Collapse,
        Family::Threshold,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Family::Flow => "flow",
            Family::Grid => "grid",
            Family::Strata => "strata",
            Family::Constellation => "constellation",
            Family::Radiance => "radiance",
            Family::Interference => "interference",
            Family::Spiral => "spiral",
            Family::Balance => "balance",
            Family::Chaos => "chaos",
            Family::Collapse => "collapse",
            Family::Threshold => "threshold",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn parse(name: &str) -> GlyphResult<Self> {
        let wanted = name.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.name() == wanted)
            .ok_or_else(|| GlyphError::unknown_family(format!("'{}'", name.trim())))
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Family {
    type Err = GlyphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Pick the family to render.
///
/// A non-empty `forced` name wins verbatim (lowercased, not checked against the
/// known families; unknown names surface later as [`GlyphError::UnknownFamily`]).
/// Otherwise the highest affinity wins, ties going to the earlier family.
pub fn select_family(em: &ExpressionModel, forced: Option<&str>) -> String {
    if let Some(name) = forced.map(str::trim).filter(|s| !s.is_empty()) {
        return name.to_lowercase();
    }
    rank_families(em)
        .first()
        .map_or(DEFAULT_FAMILY, |(f, _)| *f)
        .name()
        .to_string()
}

/// Families by descending affinity, ties in priority order.
///
/// Affinities are clamped to [0,1] first; NaN ranks as 0.
pub fn rank_families(em: &ExpressionModel) -> Vec<(Family, f64)> {
    let mut ranked: Vec<(Family, f64)> =
        em.families.iter().map(|(f, v)| (*f, clamp01(*v))).collect();
    // `families` iterates in priority order and the sort is stable.
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}

#[cfg(test)]
#[path = "../../tests/unit/model/family.rs"]
mod tests;
