use crate::{
    config::FallbackStyle, foundation::core::FrameIndex, foundation::error::GlyphResult,
    model::family::Family, render::plugin::GlyphRenderer, render::surface::Surface,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    /// No renderer attached.
    Idle,
    Running,
    /// Told to stop; the renderer stays attached but gets no more frames.
    Stopped,
    /// A frame failed; the renderer was torn down and the fallback painted.
    Faulted,
}

struct Active {
    family: Family,
    renderer: Box<dyn GlyphRenderer>,
}

/// Render loop for one canvas.
///
/// The scheduler owns the attached renderer and hands it frames on `tick`. Attaching
/// a new renderer tears the previous one down first, so at most one loop ever draws
/// into a canvas.
pub struct FrameScheduler {
    active: Option<Active>,
    state: LoopState,
    next_frame: FrameIndex,
    fallback: FallbackStyle,
}

impl std::fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("family", &self.family())
            .field("state", &self.state)
            .field("next_frame", &self.next_frame)
            .finish_non_exhaustive()
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(FallbackStyle::default())
    }
}

impl FrameScheduler {
    pub fn new(fallback: FallbackStyle) -> Self {
        Self {
            active: None,
            state: LoopState::Idle,
            next_frame: FrameIndex(0),
            fallback,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Family of the attached renderer, if any.
    pub fn family(&self) -> Option<Family> {
        self.active.as_ref().map(|a| a.family)
    }

    /// Frames rendered since the current renderer was attached.
    pub fn frames_rendered(&self) -> u64 {
        self.next_frame.0
    }

    pub(crate) fn set_fallback(&mut self, fallback: FallbackStyle) {
        self.fallback = fallback;
    }

    /// Tear down the current renderer (if any), then start `renderer`.
    ///
    /// A renderer whose `start` fails is destroyed before the error is returned.
    pub fn attach(
        &mut self,
        family: Family,
        mut renderer: Box<dyn GlyphRenderer>,
    ) -> GlyphResult<()> {
        self.teardown();
        if let Err(err) = renderer.start() {
            tracing::warn!(%family, %err, "renderer failed to start");
            renderer.destroy();
            return Err(err);
        }
        self.active = Some(Active { family, renderer });
        self.state = LoopState::Running;
        self.next_frame = FrameIndex(0);
        tracing::debug!(%family, "renderer attached");
        Ok(())
    }

    /// Render the next frame. Returns `Ok(false)` when the loop is not running.
    ///
    /// A failing frame stops the loop, destroys the renderer, paints the fallback
    /// indicator and returns the error.
    pub fn tick(&mut self, surface: &mut Surface) -> GlyphResult<bool> {
        if self.state != LoopState::Running {
            return Ok(false);
        }
        let Some(active) = self.active.as_mut() else {
            self.state = LoopState::Idle;
            return Ok(false);
        };

        let frame = self.next_frame;
        match active.renderer.render(surface, frame) {
            Ok(()) => {
                surface.mark_glyph(active.family, frame);
                self.next_frame = frame.next();
                Ok(true)
            }
            Err(err) => {
                tracing::warn!(
                    family = %active.family,
                    frame = frame.0,
                    %err,
                    "frame failed; stopping loop"
                );
                self.teardown();
                self.state = LoopState::Faulted;
                surface.draw_error_indicator(&err.to_string(), &self.fallback);
                Err(err)
            }
        }
    }

    /// Tick up to `frames` times; returns how many frames were drawn.
    pub fn run(&mut self, surface: &mut Surface, frames: u64) -> GlyphResult<u64> {
        let mut drawn = 0;
        for _ in 0..frames {
            if !self.tick(surface)? {
                break;
            }
            drawn += 1;
        }
        Ok(drawn)
    }

    /// Stop scheduling frames; the renderer stays attached.
    pub fn stop(&mut self) {
        if self.state == LoopState::Running {
            if let Some(active) = self.active.as_mut() {
                active.renderer.stop();
            }
            self.state = LoopState::Stopped;
        }
    }

    /// Stop the loop and destroy the attached renderer.
    pub fn teardown(&mut self) {
        self.stop();
        if let Some(mut active) = self.active.take() {
            active.renderer.destroy();
            tracing::debug!(family = %active.family, "renderer destroyed");
        }
        self.state = LoopState::Idle;
    }
}

impl Drop for FrameScheduler {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/scheduler.rs"]
mod tests;
