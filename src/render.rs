//! Canvas, renderer plugin contract, reference plugins and the frame loop.

pub(crate) mod plugin;
pub(crate) mod reference;
pub(crate) mod scheduler;
pub(crate) mod surface;

use crate::{
    config::FallbackStyle, foundation::error::GlyphResult, render::scheduler::FrameScheduler,
    render::surface::Surface,
};

/// A drawing surface together with the loop that draws into it.
#[derive(Debug)]
pub struct GlyphCanvas {
    pub surface: Surface,
    pub scheduler: FrameScheduler,
}

impl GlyphCanvas {
    pub fn new(width: u32, height: u32) -> GlyphResult<Self> {
        Self::with_fallback(width, height, FallbackStyle::default())
    }

    pub fn with_fallback(width: u32, height: u32, fallback: FallbackStyle) -> GlyphResult<Self> {
        Ok(Self {
            surface: Surface::new(width, height)?,
            scheduler: FrameScheduler::new(fallback),
        })
    }

    /// Advance the attached renderer by one frame.
    pub fn tick(&mut self) -> GlyphResult<bool> {
        self.scheduler.tick(&mut self.surface)
    }

    pub fn run(&mut self, frames: u64) -> GlyphResult<u64> {
        self.scheduler.run(&mut self.surface, frames)
    }
}
