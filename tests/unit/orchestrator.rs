use super::*;
use crate::content::resolve::InMemoryContent;
use crate::events::ContentUnit;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::GlyphError;
use crate::render::scheduler::LoopState;
use crate::render::surface::SurfaceStatus;
use std::cell::RefCell;
use std::rc::Rc;

const POST: &str =
    "# Title\n\nFirst paragraph about things.\n\n## Part\n\nAnother paragraph here.\n";

fn orchestrator(opts: GlyphOpts) -> Orchestrator {
    let content = InMemoryContent::new().with("post", POST);
    Orchestrator::new(Registry::with_defaults(), content, opts)
}

fn events(orch: &mut Orchestrator) -> Rc<RefCell<Vec<ContentUnit>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    orch.bus_mut()
        .subscribe(move |unit: &ContentUnit| sink.borrow_mut().push(unit.clone()));
    seen
}

#[test]
fn metadata_ignores_blank_values() {
    let meta: PostMetadata = [("seed", "  "), ("family", " grid "), ("renderer", "r1")]
        .into_iter()
        .collect();
    assert_eq!(meta.seed(), None);
    assert_eq!(meta.family(), Some("grid"));
    assert_eq!(meta.renderer(), Some("r1"));
}

#[test]
fn prepare_uses_the_seed_hint_and_forced_family() {
    let orch = orchestrator(GlyphOpts::default());
    let meta = PostMetadata::new()
        .with("seed", "hint")
        .with("family", "Strata");
    let trace = orch.prepare("post", &meta).unwrap();

    assert_eq!(trace.meaning.seed, "hint");
    assert_eq!(trace.binding.seed, "hint");
    assert_eq!(trace.family, Family::Strata);
    assert_eq!(trace.renderer_id, "strata");
    assert_eq!(trace.url, "memory://post");
    assert_eq!(trace.analysis.structure.headings_count, 2);
    assert!(trace.legacy_version.is_none());
}

#[test]
fn prepare_is_deterministic() {
    let orch = orchestrator(GlyphOpts::default());
    let a = orch.prepare("post", &PostMetadata::new()).unwrap();
    let b = orch.prepare("post", &PostMetadata::new()).unwrap();
    assert_eq!(a.binding, b.binding);
    assert_eq!(a.meaning.seed.len(), 8);
}

#[test]
fn disabled_lexicon_uses_default_entropy() {
    let orch = orchestrator(GlyphOpts {
        analyze_lexicon: false,
        ..GlyphOpts::default()
    });
    let trace = orch.prepare("post", &PostMetadata::new()).unwrap();
    assert!(trace.analysis.lexicon.is_none());
    assert_eq!(trace.meaning.dynamics.entropy, 0.4);
}

#[test]
fn renderer_override_comes_from_metadata_then_opts() {
    let orch = orchestrator(GlyphOpts {
        renderer_id: Some("from-opts".to_string()),
        ..GlyphOpts::default()
    });
    let trace = orch.prepare("post", &PostMetadata::new()).unwrap();
    assert_eq!(trace.renderer_id, "from-opts");
    let trace = orch
        .prepare("post", &PostMetadata::new().with("renderer", "from-meta"))
        .unwrap();
    assert_eq!(trace.renderer_id, "from-meta");
}

#[test]
fn successful_render_attaches_and_publishes() {
    let mut orch = orchestrator(GlyphOpts::default());
    let seen = events(&mut orch);
    let mut canvas = GlyphCanvas::new(32, 24).unwrap();
    let meta = PostMetadata::new().with("family", "radiance");

    let out = orch.render_glyph(&mut canvas, "post", &meta).unwrap();
    assert_eq!(out.family, Family::Radiance);
    assert_eq!(canvas.scheduler.state(), LoopState::Running);
    assert_eq!(canvas.scheduler.family(), Some(Family::Radiance));
    let expected = SurfaceStatus::Glyph {
        family: Family::Radiance,
        frame: FrameIndex(0),
    };
    assert_eq!(canvas.surface.status(), &expected);

    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].kind, "glyph.rendered");
    assert_eq!(seen[0].source, "post");
    assert_eq!(seen[0].payload["family"], "radiance");
    assert_eq!(seen[0].payload["renderer"], "rays");
}

#[test]
fn missing_content_paints_fallback_and_reports_the_stage() {
    let mut orch = orchestrator(GlyphOpts::default());
    let mut canvas = GlyphCanvas::new(16, 16).unwrap();
    let err = orch
        .render_glyph(&mut canvas, "nope", &PostMetadata::new())
        .unwrap_err();
    assert!(matches!(err, GlyphError::MissingDependency(_)));
    assert!(matches!(canvas.surface.status(), SurfaceStatus::Fallback { .. }));

    // Queued until someone subscribes.
    assert_eq!(orch.bus().pending_len(), 1);
    let seen = events(&mut orch);
    assert_eq!(seen.borrow()[0].kind, "glyph.failed");
    assert_eq!(seen.borrow()[0].payload["stage"], "resolve-content");
}

#[test]
fn unknown_family_tears_down_the_previous_renderer() {
    let mut orch = orchestrator(GlyphOpts::default());
    let mut canvas = GlyphCanvas::new(16, 16).unwrap();
    let meta = PostMetadata::new();
    orch.render_glyph(&mut canvas, "post", &meta).unwrap();
    assert!(canvas.scheduler.is_running());

    let nebula = PostMetadata::new().with("family", "nebula");
    let err = orch.render_glyph(&mut canvas, "post", &nebula).unwrap_err();
    assert!(matches!(err, GlyphError::UnknownFamily(_)));
    assert_eq!(canvas.scheduler.state(), LoopState::Idle);
    assert_eq!(canvas.scheduler.family(), None);
    match canvas.surface.status() {
        SurfaceStatus::Fallback { message } => assert!(message.contains("nebula")),
        other => panic!("unexpected status {other:?}"),
    }
}

#[test]
fn stage_names_are_kebab_case() {
    assert_eq!(Stage::ResolveContent.to_string(), "resolve-content");
    assert_eq!(Stage::AdaptBinding.name(), "adapt-binding");
}
