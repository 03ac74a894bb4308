use super::*;

#[test]
fn display_prefixes_are_stable() {
    let cases = [
        (GlyphError::contract("x"), "contract violation:"),
        (GlyphError::binding("x"), "binding error:"),
        (GlyphError::unknown_family("x"), "unknown family:"),
        (GlyphError::missing("x"), "missing dependency:"),
        (GlyphError::render("x"), "render error:"),
        (GlyphError::serde("x"), "serialization error:"),
    ];
    for (err, prefix) in cases {
        assert!(err.to_string().starts_with(prefix), "{err}");
    }
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = GlyphError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde() {
    let err: GlyphError = serde_json::from_str::<serde_json::Value>("{")
        .unwrap_err()
        .into();
    assert!(matches!(err, GlyphError::Serde(_)));
    assert!(!err.is_fatal());
    assert!(GlyphError::contract("x").is_fatal());
}
