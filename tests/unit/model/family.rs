use super::*;
use std::collections::BTreeMap;

fn em_with(families: &[(Family, f64)]) -> ExpressionModel {
    ExpressionModel {
        families: families.iter().copied().collect::<BTreeMap<_, _>>(),
        ..ExpressionModel::default()
    }
}

#[test]
fn highest_affinity_wins() {
    let em = em_with(&[(Family::Grid, 0.9), (Family::Flow, 0.4)]);
    assert_eq!(select_family(&em, None), "grid");
}

#[test]
fn forced_name_wins_and_is_lowercased() {
    let em = em_with(&[(Family::Grid, 0.9), (Family::Flow, 0.4)]);
    assert_eq!(select_family(&em, Some("Radiance")), "radiance");
    assert_eq!(select_family(&em, Some("  ")), "grid");
    assert_eq!(select_family(&em, Some("Nebula")), "nebula");
}

#[test]
fn empty_families_fall_back_to_default() {
    assert_eq!(select_family(&ExpressionModel::default(), None), "flow");
}

#[test]
fn ties_break_by_family_priority() {
    let em = em_with(&[
        (Family::Radiance, 0.5),
        (Family::Strata, 0.5),
        (Family::Grid, 0.5),
    ]);
    assert_eq!(select_family(&em, None), "grid");
    let ranked: Vec<Family> = rank_families(&em).into_iter().map(|(f, _)| f).collect();
    assert_eq!(ranked, vec![Family::Grid, Family::Strata, Family::Radiance]);
}

#[test]
fn nan_affinity_never_wins() {
    let em = em_with(&[(Family::Grid, f64::NAN), (Family::Strata, 0.2)]);
    assert_eq!(select_family(&em, None), "strata");
    let ranked = rank_families(&em);
    assert_eq!(ranked, vec![(Family::Strata, 0.2), (Family::Grid, 0.0)]);
}

#[test]
fn parse_is_case_insensitive() {
    assert_eq!(
        Family::parse(" Constellation ").unwrap(),
        Family::Constellation
    );
    assert_eq!("THRESHOLD".parse::<Family>().unwrap(), Family::Threshold);
    assert!(matches!(
        Family::parse("nebula").unwrap_err(),
        GlyphError::UnknownFamily(_)
    ));
}

#[test]
fn names_round_trip_for_every_family() {
    for f in Family::ALL {
        assert_eq!(Family::parse(f.name()).unwrap(), f);
        assert_eq!(
            serde_json::to_value(f).unwrap(),
            serde_json::json!(f.name())
        );
    }
}
