use crate::foundation::math::Fnv1a32;

/// FNV-1a over the UTF-8 bytes of `s`.
pub fn hash_seed_numeric(s: &str) -> u32 {
    let mut h = Fnv1a32::new_default();
    h.write_bytes(s.as_bytes());
    h.finish()
}

/// FNV-1a of `s` rendered as 8 lowercase hex digits.
pub fn hash_seed(s: &str) -> String {
    format!("{:08x}", hash_seed_numeric(s))
}

/// Per-renderer seed: `hash_seed("{mm_seed}:{renderer_id}")`.
///
/// Two renderers drawing the same content get unrelated streams, while the same
/// renderer redrawing the same content replays its stream exactly.
pub fn deterministic_seed(mm_seed: &str, renderer_id: &str) -> String {
    let mut h = Fnv1a32::new_default();
    h.write_bytes(mm_seed.as_bytes());
    h.write_u8(b':');
    h.write_bytes(renderer_id.as_bytes());
    format!("{:08x}", h.finish())
}

#[cfg(test)]
#[path = "../../tests/unit/seed/hash.rs"]
mod tests;
