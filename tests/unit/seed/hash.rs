use super::*;
use std::collections::HashSet;

#[test]
fn hash_is_stable_hex() {
    assert_eq!(hash_seed(""), "811c9dc5");
    assert_eq!(hash_seed("a"), "e40c292c");
    assert_eq!(hash_seed("foobar"), hash_seed("foobar"));
    assert_eq!(hash_seed("foobar").len(), 8);
}

#[test]
fn numeric_and_string_forms_agree() {
    let n = hash_seed_numeric("essay-42");
    assert_eq!(hash_seed("essay-42"), format!("{n:08x}"));
}

#[test]
fn deterministic_seed_joins_with_colon() {
    assert_eq!(
        deterministic_seed("abc", "radiance"),
        hash_seed("abc:radiance")
    );
}

#[test]
fn seeds_diverge_across_renderers_and_content() {
    let contents = ["post-a", "post-b", "a1b2c3d4", "glyph-default", "essay"];
    let renderers = ["flow", "grid", "strata", "radiance", "fallback"];
    let mut seen = HashSet::new();
    for c in contents {
        for r in renderers {
            assert!(
                seen.insert(deterministic_seed(c, r)),
                "collision for {c}:{r}"
            );
        }
    }
    assert_eq!(seen.len(), 25);
}
