/// 32-bit FNV-1a, the hash every glyph seed is derived from.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a32(u32);

impl Fnv1a32 {
    pub(crate) const OFFSET_BASIS: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;

    pub(crate) fn new_default() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    pub(crate) fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u32::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u32 {
        self.0
    }
}

/// Clamp into [0,1]; NaN collapses to 0.
pub fn clamp01(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}

/// Clamp into `[lo, hi]`; NaN collapses to `lo`.
pub fn clamp_range(x: f64, lo: f64, hi: f64) -> f64 {
    if x.is_nan() { lo } else { x.clamp(lo, hi) }
}

/// Map a unit scalar onto an integer range: `round(min + (max-min)*clamp01(x))`.
pub fn quantize(x: f64, min: i64, max: i64) -> i64 {
    let span = (max - min) as f64;
    (min as f64 + span * clamp01(x)).round() as i64
}

/// Weighted sum of `(weight, value)` terms, clamped into [0,1].
pub(crate) fn weighted01(terms: &[(f64, f64)]) -> f64 {
    clamp01(terms.iter().map(|(w, v)| w * v).sum())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
