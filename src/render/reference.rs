//! Reference renderer plugins.
//!
//! Plain drawings covering both plugin forms (stateless draw functions and the
//! stateful particle field). Knobs are read with defaults, so a plugin registered for
//! a family other than the one it was written for still draws.

use std::f64::consts::TAU;

use vello_cpu::kurbo::{BezPath, Rect};

use crate::{
    binding::output::{BindingOutput, Palette},
    foundation::core::{FrameIndex, Point, Rgba8, Vec2},
    foundation::error::{GlyphError, GlyphResult},
    foundation::math::clamp01,
    model::family::Family,
    render::plugin::{GlyphRenderer, RendererInit},
    render::surface::{Surface, to_color},
    seed::hash::hash_seed_numeric,
    seed::rng::SeededRng,
};

/// Upper bound on particles a single field allocates.
pub const MAX_PARTICLES: usize = 4096;

/// Upper bound on lattice cells per side.
pub const MAX_LATTICE_CELLS: usize = 64;

/// Background, primary and accent colors for a palette.
pub fn palette_colors(palette: &Palette) -> [Rgba8; 3] {
    match palette.name.as_str() {
        "tidal" => [
            Rgba8::opaque(10, 24, 38),
            Rgba8::opaque(88, 170, 196),
            Rgba8::opaque(220, 240, 236),
        ],
        "ledger" => [
            Rgba8::opaque(244, 240, 230),
            Rgba8::opaque(40, 44, 52),
            Rgba8::opaque(190, 64, 48),
        ],
        "sediment" => [
            Rgba8::opaque(52, 38, 30),
            Rgba8::opaque(176, 128, 84),
            Rgba8::opaque(226, 196, 150),
        ],
        "nocturne" => [
            Rgba8::opaque(6, 8, 20),
            Rgba8::opaque(200, 210, 255),
            Rgba8::opaque(255, 236, 180),
        ],
        "solar" => [
            Rgba8::opaque(30, 12, 4),
            Rgba8::opaque(255, 176, 48),
            Rgba8::opaque(255, 244, 200),
        ],
        "ember" => [
            Rgba8::opaque(20, 10, 10),
            Rgba8::opaque(200, 70, 40),
            Rgba8::opaque(250, 200, 120),
        ],
        other => {
            // Unknown palettes get a stable color triple derived from the name.
            let [a, b, c, _] = hash_seed_numeric(other).to_le_bytes();
            [
                Rgba8::opaque(a / 6, b / 6, c / 6),
                Rgba8::opaque(a | 0x40, b | 0x40, c | 0x40),
                Rgba8::opaque(255 - a / 4, 255 - b / 4, 255 - c / 4),
            ]
        }
    }
}

fn fill_background(surface: &mut Surface, color: Rgba8) {
    surface.clear(color);
}

fn to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

/// Radiating rays around the canvas center; `rayCount`, `intensity`, `glow`, `burst`.
pub fn draw_rays(
    surface: &mut Surface,
    binding: &BindingOutput,
    rng: &mut SeededRng,
    frame: FrameIndex,
) -> GlyphResult<()> {
    let [bg, primary, accent] = palette_colors(&binding.palette);
    fill_background(surface, bg);

    let (w, h) = (f64::from(surface.width()), f64::from(surface.height()));
    let center = Point::new(w / 2.0, h / 2.0);
    let reach = w.min(h) * 0.5 * binding.scale.min(1.0);
    let rays = binding.knob("rayCount", 32.0).clamp(1.0, 512.0) as usize;
    let intensity = binding.knob("intensity", 0.5);
    let glow = binding.knob("glow", 0.5);
    let burst = if binding.flag("burst") { 1.25 } else { 1.0 };
    let spin = frame.0 as f64 * 0.004;

    surface.paint(|ctx| {
        let core = reach * (0.08 + 0.12 * glow);
        ctx.set_paint(to_color(accent.with_alpha(160)));
        ctx.fill_rect(&Rect::new(
            center.x - core,
            center.y - core,
            center.x + core,
            center.y + core,
        ));

        let alpha = (80.0 + 160.0 * intensity).clamp(0.0, 255.0) as u8;
        ctx.set_paint(to_color(primary.with_alpha(alpha)));
        for i in 0..rays {
            let angle = spin + TAU * (i as f64) / (rays as f64) + rng.range(-0.02, 0.02);
            let len = reach * burst * rng.range(0.55, 1.0);
            let half_width = 0.012 + 0.02 * rng.next_f64();
            let tip = center + Vec2::from_angle(angle) * len;
            let left = center + Vec2::from_angle(angle - half_width) * core;
            let right = center + Vec2::from_angle(angle + half_width) * core;

            let mut path = BezPath::new();
            path.move_to(to_cpu(left));
            path.line_to(to_cpu(tip));
            path.line_to(to_cpu(right));
            path.close_path();
            ctx.fill_path(&path);
        }
        Ok(())
    })
}

/// Cells on a lattice; `granularity` sets the cell count, `orthogonality` the jitter.
pub fn draw_lattice(
    surface: &mut Surface,
    binding: &BindingOutput,
    rng: &mut SeededRng,
    frame: FrameIndex,
) -> GlyphResult<()> {
    let [bg, primary, accent] = palette_colors(&binding.palette);
    fill_background(surface, bg);

    let (w, h) = (f64::from(surface.width()), f64::from(surface.height()));
    let granularity = clamp01(binding.knob("granularity", 0.5));
    let order = binding.knob("orthogonality", 0.5);
    let fill = binding.knob("gridness", 0.6);
    let cells = ((4.0 + 20.0 * granularity).round() as usize).clamp(1, MAX_LATTICE_CELLS);
    let step = w.min(h) / cells as f64;
    let jitter = step * 0.25 * (1.0 - order);
    let breathe = 0.5 + 0.5 * (frame.0 as f64 * 0.05).sin();

    surface.paint(|ctx| {
        for row in 0..cells {
            for col in 0..cells {
                if !rng.chance(0.35 + 0.6 * fill) {
                    continue;
                }
                let color = if rng.chance(0.1) { accent } else { primary };
                ctx.set_paint(to_color(color.with_alpha((120.0 + 100.0 * breathe) as u8)));
                let x0 = col as f64 * step + rng.range(-jitter, jitter);
                let y0 = row as f64 * step + rng.range(-jitter, jitter);
                let inset = step * 0.15;
                ctx.fill_rect(&Rect::new(
                    (x0 + inset).clamp(0.0, w),
                    (y0 + inset).clamp(0.0, h),
                    (x0 + step - inset).clamp(0.0, w),
                    (y0 + step - inset).clamp(0.0, h),
                ));
            }
        }
        Ok(())
    })
}

/// Stacked horizontal bands; `layers`, `erosion`, `tilt`.
pub fn draw_strata(
    surface: &mut Surface,
    binding: &BindingOutput,
    rng: &mut SeededRng,
    frame: FrameIndex,
) -> GlyphResult<()> {
    let [bg, primary, accent] = palette_colors(&binding.palette);
    fill_background(surface, bg);

    let (w, h) = (f64::from(surface.width()), f64::from(surface.height()));
    let layers = binding.knob("layers", 8.0).clamp(1.0, 64.0) as usize;
    let erosion = binding.knob("erosion", 0.3);
    let tilt = binding.knob("tilt", 0.1) * h * 0.2;
    let band = h / layers as f64;
    let drift = (frame.0 as f64 * 0.02).sin() * band * 0.1;
    let segments = 24;

    surface.paint(|ctx| {
        for layer in 0..layers {
            let color = if layer % 3 == 2 { accent } else { primary };
            let alpha = 90 + ((layer * 140) / layers) as u8;
            ctx.set_paint(to_color(color.with_alpha(alpha)));

            let top = layer as f64 * band;
            let mut path = BezPath::new();
            path.move_to((0.0, top + drift));
            for s in 1..=segments {
                let x = w * s as f64 / segments as f64;
                let jitter = rng.range(-1.0, 1.0) * erosion * band * 0.5;
                let y = top + drift + tilt * (x / w - 0.5) + jitter;
                path.line_to((x, y));
            }
            path.line_to((w, top + band * 0.8 + tilt * 0.5));
            path.line_to((0.0, top + band * 0.8 - tilt * 0.5));
            path.close_path();
            ctx.fill_path(&path);
        }
        Ok(())
    })
}

#[derive(Clone, Copy, Debug)]
struct Particle {
    pos: Point,
    vel: Vec2,
}

/// Stateful particle field used by the flowing families.
///
/// Particles are allocated in `start`, advanced every frame and released in `destroy`.
pub struct ParticleField {
    family: Family,
    binding: BindingOutput,
    rng: SeededRng,
    width: f64,
    height: f64,
    particles: Vec<Particle>,
    running: bool,
}

impl ParticleField {
    pub fn create(init: &RendererInit<'_>) -> GlyphResult<Box<dyn GlyphRenderer>> {
        Ok(Box::new(Self::new(init)))
    }

    pub fn new(init: &RendererInit<'_>) -> Self {
        Self {
            family: init.binding.family,
            binding: init.binding.clone(),
            rng: init.rng(),
            width: f64::from(init.width),
            height: f64::from(init.height),
            particles: Vec::new(),
            running: false,
        }
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    fn wanted_particles(&self) -> usize {
        let count = ["particleCount", "starCount", "fragments"]
            .iter()
            .find_map(|k| self.binding.knobs.get(*k).and_then(|v| v.as_f64()))
            .unwrap_or(256.0);
        (count.max(0.0) as usize).min(MAX_PARTICLES)
    }

    fn speed(&self) -> f64 {
        let b = &self.binding;
        let s = b.knob("speed", b.knob("agitation", b.knob("twinkle", 0.4)));
        0.2 + 2.5 * s
    }
}

impl GlyphRenderer for ParticleField {
    fn start(&mut self) -> GlyphResult<()> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(GlyphError::render("particle field needs a non-empty surface"));
        }
        let n = self.wanted_particles();
        let speed = self.speed();
        self.particles = (0..n)
            .map(|_| Particle {
                pos: Point::new(
                    self.rng.range(0.0, self.width),
                    self.rng.range(0.0, self.height),
                ),
                vel: Vec2::from_angle(self.rng.range(0.0, TAU)) * speed,
            })
            .collect();
        self.running = true;
        Ok(())
    }

    fn render(&mut self, surface: &mut Surface, frame: FrameIndex) -> GlyphResult<()> {
        if !self.running {
            return Err(GlyphError::render(format!(
                "{} particle field rendered before start",
                self.family
            )));
        }
        let [bg, primary, accent] = palette_colors(&self.binding.palette);
        fill_background(surface, bg);

        let curl = self.binding.knob("curl", self.binding.knob("drift", 0.3));
        let turbulence = self.binding.knob("turbulence", 0.3);
        let (w, h) = (self.width, self.height);
        let t = frame.0 as f64 * 0.01;
        let dot = (1.0 + 1.5 * self.binding.scale).min(4.0);

        for p in &mut self.particles {
            let swirl = ((p.pos.y / h) * TAU + t).sin() * curl;
            let jitter = Vec2::new(
                self.rng.range(-1.0, 1.0),
                self.rng.range(-1.0, 1.0),
            ) * turbulence;
            p.vel = (p.vel + Vec2::new(-swirl, swirl) * 0.1 + jitter * 0.2) * 0.98;
            p.pos += p.vel;
            p.pos.x = p.pos.x.rem_euclid(w);
            p.pos.y = p.pos.y.rem_euclid(h);
        }

        let particles = &self.particles;
        surface.paint(|ctx| {
            for (i, p) in particles.iter().enumerate() {
                let color = if i % 17 == 0 { accent } else { primary };
                ctx.set_paint(to_color(color.with_alpha(200)));
                ctx.fill_rect(&Rect::new(p.pos.x, p.pos.y, p.pos.x + dot, p.pos.y + dot));
            }
            Ok(())
        })
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn destroy(&mut self) {
        self.running = false;
        self.particles = Vec::new();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/reference.rs"]
mod tests;
