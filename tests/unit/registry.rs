use super::*;
use crate::binding::contract::validate_family_binding;
use crate::binding::legacy::V1Adapter;
use crate::foundation::core::FrameIndex;
use crate::model::expression::{Cadence, Scale};
use crate::render::surface::Surface;
use serde_json::json;

fn em() -> ExpressionModel {
    ExpressionModel {
        families: BTreeMap::from([(Family::Grid, 0.7), (Family::Flow, 0.3)]),
        cadence: Cadence {
            pulse: 0.4,
            anisotropy: 0.6,
        },
        scale: Scale {
            density: 0.8,
            granularity: 0.5,
        },
        secondary_affinity: 0.3,
        seed: "registry".to_string(),
    }
}

fn legacy_grid(em: &ExpressionModel) -> GlyphResult<JsonValue> {
    Ok(json!({
        "seed": em.seed,
        "palette": "ledger",
        "scale": 3.5,
        "regularity": em.affinity(Family::Grid),
        "cellSize": em.scale.granularity,
        "rightAngles": em.cadence.anisotropy,
    }))
}

#[test]
fn defaults_cover_every_family() {
    let reg = Registry::with_defaults();
    assert_eq!(reg.families(), Family::ALL.to_vec());
    for family in Family::ALL {
        let out = reg.bind(family, &em()).unwrap();
        assert_eq!(out.family, family);
        assert!(reg.binding(family).unwrap().legacy_version().is_none());
        assert!(!reg.renderer(family).unwrap().id().is_empty());
    }
    assert_eq!(reg.renderer(Family::Radiance).unwrap().id(), "rays");
    assert_eq!(reg.renderer(Family::Flow).unwrap().id(), "particles");
}

#[test]
fn empty_registry_reports_unknown_family() {
    let reg = Registry::new();
    assert!(matches!(
        reg.bind(Family::Grid, &em()).unwrap_err(),
        GlyphError::UnknownFamily(_)
    ));
    assert!(matches!(
        reg.renderer(Family::Grid).err(),
        Some(GlyphError::UnknownFamily(_))
    ));
}

#[test]
fn legacy_binding_is_adapted_at_call_time() {
    let mut reg = Registry::with_defaults();
    reg.register_binding(
        Family::Grid,
        BindingSource::Legacy {
            bind: legacy_grid,
            adapter: Box::new(V1Adapter),
        },
    );
    let entry = reg.binding(Family::Grid).unwrap();
    assert_eq!(entry.legacy_version(), Some("1"));

    let out = entry.bind(&em()).unwrap();
    assert_eq!(out.seed, "registry");
    assert_eq!(out.scale, 2.0);
    assert_eq!(out.knob("gridness", 0.0), 0.7);
    assert_eq!(out.knob("granularity", 0.0), 0.5);
    assert_eq!(out.knob("orthogonality", 0.0), 0.6);
    validate_family_binding(Family::Grid, &out).unwrap();
}

#[test]
fn registered_renderer_replaces_the_default() {
    fn blank(
        surface: &mut Surface,
        _b: &BindingOutput,
        _rng: &mut crate::seed::rng::SeededRng,
        _frame: FrameIndex,
    ) -> GlyphResult<()> {
        surface.clear(crate::foundation::core::Rgba8::opaque(9, 9, 9));
        Ok(())
    }

    let mut reg = Registry::with_defaults();
    reg.register_renderer(Family::Flow, "blank", RendererHandle::Draw(blank));
    let entry = reg.renderer(Family::Flow).unwrap();
    assert_eq!(entry.id(), "blank");

    let binding = reg.bind(Family::Flow, &em()).unwrap();
    let init = RendererInit {
        renderer_id: entry.id(),
        binding: &binding,
        width: 4,
        height: 4,
    };
    let mut renderer = entry.create(&init).unwrap();
    let mut surface = Surface::new(4, 4).unwrap();
    renderer.render(&mut surface, FrameIndex(0)).unwrap();
    assert_eq!(surface.pixel(1, 1), Some([9, 9, 9, 255]));
}
