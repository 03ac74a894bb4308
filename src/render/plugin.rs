use crate::{
    binding::output::BindingOutput, foundation::core::FrameIndex, foundation::error::GlyphResult,
    render::surface::Surface, seed::hash::deterministic_seed, seed::rng::SeededRng,
};

/// Lifecycle every renderer instance follows while attached to a scheduler.
///
/// `start` runs once before the first frame, `render` once per scheduled frame,
/// `stop` when the loop halts and `destroy` right before the instance is dropped.
/// A renderer owns its RNG and any particle state it allocates; `destroy` releases
/// that state.
pub trait GlyphRenderer {
    fn start(&mut self) -> GlyphResult<()> {
        Ok(())
    }

    fn render(&mut self, surface: &mut Surface, frame: FrameIndex) -> GlyphResult<()>;

    fn stop(&mut self) {}

    fn destroy(&mut self) {}
}

/// Stateless plugin form: redraws the whole frame from the knob record.
///
/// The RNG is reseeded for every frame, so a draw function paints the same picture
/// for the same frame index.
pub type DrawFn = fn(&mut Surface, &BindingOutput, &mut SeededRng, FrameIndex) -> GlyphResult<()>;

/// Stateful plugin form: builds a renderer instance for one canvas.
pub type RendererFactory = fn(&RendererInit<'_>) -> GlyphResult<Box<dyn GlyphRenderer>>;

/// Everything a renderer gets at construction.
#[derive(Clone, Copy, Debug)]
pub struct RendererInit<'a> {
    pub renderer_id: &'a str,
    pub binding: &'a BindingOutput,
    pub width: u32,
    pub height: u32,
}

impl RendererInit<'_> {
    /// Seed for this renderer: `deterministic_seed(binding.seed, renderer_id)`.
    pub fn seed(&self) -> String {
        deterministic_seed(&self.binding.seed, self.renderer_id)
    }

    pub fn rng(&self) -> SeededRng {
        SeededRng::new(&self.seed())
    }
}

/// The two plugin shapes a renderer can be registered as.
#[derive(Clone, Copy, Debug)]
pub enum RendererHandle {
    Draw(DrawFn),
    Stateful(RendererFactory),
}

/// Shape-agnostic constructor produced from a [`RendererHandle`] at registration.
pub(crate) type BoxedFactory =
    Box<dyn Fn(&RendererInit<'_>) -> GlyphResult<Box<dyn GlyphRenderer>>>;

impl RendererHandle {
    pub(crate) fn into_factory(self) -> BoxedFactory {
        match self {
            RendererHandle::Draw(draw) => Box::new(move |init: &RendererInit<'_>| {
                Ok(Box::new(DrawFnRenderer {
                    draw,
                    binding: init.binding.clone(),
                    seed: init.seed(),
                }) as Box<dyn GlyphRenderer>)
            }),
            RendererHandle::Stateful(factory) => Box::new(factory),
        }
    }
}

struct DrawFnRenderer {
    draw: DrawFn,
    binding: BindingOutput,
    seed: String,
}

impl GlyphRenderer for DrawFnRenderer {
    fn render(&mut self, surface: &mut Surface, frame: FrameIndex) -> GlyphResult<()> {
        let mut rng = SeededRng::new(&self.seed);
        (self.draw)(surface, &self.binding, &mut rng, frame)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/plugin.rs"]
mod tests;
