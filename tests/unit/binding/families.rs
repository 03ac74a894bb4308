use super::*;
use crate::binding::contract::{required_knobs, validate_binding};
use crate::model::expression::{Cadence, Scale};
use crate::seed::rng::SeededRng;

fn em(secondary_affinity: f64) -> ExpressionModel {
    ExpressionModel {
        families: BTreeMap::from([
            (Family::Flow, 0.4),
            (Family::Grid, 0.9),
            (Family::Strata, 0.3),
            (Family::Radiance, 0.2),
        ]),
        cadence: Cadence {
            pulse: 0.8,
            anisotropy: 0.3,
        },
        scale: Scale {
            density: 0.6,
            granularity: 0.5,
        },
        secondary_affinity,
        seed: "content-seed".to_string(),
    }
}

#[test]
fn every_family_binding_satisfies_its_contract() {
    for family in Family::ALL {
        let out = binding_for(family)(&em(0.4)).unwrap();
        assert_eq!(out.family, family);
        assert_eq!(out.seed, "content-seed");
        assert_eq!(out.contract_version, CONTRACT_VERSION);
        assert_eq!(out.palette, palette_for(family));
        let value = serde_json::to_value(&out).unwrap();
        validate_binding(&value, required_knobs(family)).unwrap();
    }
}

#[test]
fn omitting_a_required_knob_fails_validation() {
    for family in Family::ALL {
        let out = binding_for(family)(&em(0.4)).unwrap();
        for key in required_knobs(family) {
            let mut broken = out.clone();
            broken.knobs.remove(*key);
            assert!(
                validate_family_binding(family, &broken).is_err(),
                "{family} without {key}"
            );
            let mut value = serde_json::to_value(&out).unwrap();
            value["knobs"].as_object_mut().unwrap().remove(*key);
            assert!(validate_binding(&value, required_knobs(family)).is_err());
        }
    }
}

#[test]
fn missing_families_is_a_binding_error() {
    let empty = ExpressionModel::default();
    for family in Family::ALL {
        assert!(matches!(
            binding_for(family)(&empty).unwrap_err(),
            GlyphError::Binding(_)
        ));
    }
}

#[test]
fn radiance_knobs_follow_formulas() {
    let out = radiance(&em(0.4)).unwrap();
    assert_eq!(out.knob("rayCount", 0.0), 72.0);
    assert_eq!(out.knob("intensity", 0.0), 0.2);
    assert_eq!(out.knob("glow", 0.0), 0.6);
    assert!(out.flag("burst"));
    assert_eq!(out.palette.intent, "luminous");
}

#[test]
fn grid_knobs_are_unit_scalars() {
    let out = grid(&em(0.4)).unwrap();
    assert_eq!(out.knob("gridness", -1.0), 0.9);
    assert_eq!(out.knob("granularity", -1.0), 0.5);
    assert_eq!(out.knob("orthogonality", -1.0), 0.3);
}

#[test]
fn secondary_blend_threshold() {
    let out = grid(&em(0.70)).unwrap();
    let sec = out.secondary.expect("secondary above threshold");
    assert!((sec.strength - 0.05).abs() < 1e-9);
    assert_eq!(sec.family, Family::Flow);

    assert!(grid(&em(0.60)).unwrap().secondary.is_none());
    assert!(grid(&em(0.65)).unwrap().secondary.is_none());

    let capped = grid(&em(1.0)).unwrap().secondary.unwrap();
    assert_eq!(capped.strength, MAX_SECONDARY_STRENGTH);
}

#[test]
fn forced_family_blends_toward_the_leader() {
    // Flow ranks second in `em`, so a flow binding blends toward grid instead.
    let out = flow(&em(0.9)).unwrap();
    assert_eq!(out.secondary.unwrap().family, Family::Grid);
}

#[test]
fn scale_is_clamped_into_contract_range() {
    let mut model = em(0.0);
    model.scale.density = 0.1;
    assert_eq!(binding_scale(&model), 0.5);
    model.scale.density = 7.0;
    assert_eq!(binding_scale(&model), 2.0);
    model.scale.density = f64::NAN;
    assert_eq!(binding_scale(&model), 0.5);
}

#[test]
fn fuzzed_models_keep_scale_and_strength_in_range() {
    let mut rng = SeededRng::new("binding-fuzz");
    for i in 0..300 {
        let model = ExpressionModel {
            families: BTreeMap::from([
                (Family::Flow, rng.next_f64()),
                (Family::Grid, rng.next_f64()),
                (Family::Strata, rng.next_f64()),
                (Family::Radiance, rng.next_f64()),
            ]),
            cadence: Cadence {
                pulse: rng.next_f64(),
                anisotropy: rng.next_f64(),
            },
            scale: Scale {
                density: rng.range(-1.0, 3.0),
                granularity: rng.next_f64(),
            },
            secondary_affinity: rng.next_f64(),
            seed: format!("s{i}"),
        };
        for family in Family::ALL {
            let out = binding_for(family)(&model).unwrap();
            assert!((0.5..=2.0).contains(&out.scale));
            if let Some(sec) = out.secondary {
                assert!(sec.strength > 0.0 && sec.strength <= 0.2);
            }
        }
    }
}
