use crate::{
    config::FallbackStyle,
    foundation::core::{FrameIndex, Rgba8},
    foundation::error::{GlyphError, GlyphResult},
    model::family::Family,
};

/// What a surface currently shows. A surface is never left in an unknown state:
/// it is blank, shows a glyph, or shows the fallback indicator.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceStatus {
    Blank,
    Glyph { family: Family, frame: FrameIndex },
    Fallback { message: String },
}

/// Premultiplied RGBA8 drawing target standing in for a page canvas.
pub struct Surface {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
    status: SurfaceStatus,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl Surface {
    pub fn new(width: u32, height: u32) -> GlyphResult<Self> {
        if width == 0 || height == 0 {
            return Err(GlyphError::validation("surface width/height must be > 0"));
        }
        let width_u16: u16 = width
            .try_into()
            .map_err(|_| GlyphError::validation("surface width exceeds u16"))?;
        let height_u16: u16 = height
            .try_into()
            .map_err(|_| GlyphError::validation("surface height exceeds u16"))?;
        Ok(Self {
            width: width_u16,
            height: height_u16,
            pixmap: vello_cpu::Pixmap::new(width_u16, height_u16),
            status: SurfaceStatus::Blank,
        })
    }

    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    pub fn status(&self) -> &SurfaceStatus {
        &self.status
    }

    /// Premultiplied RGBA8 bytes, row-major.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let i = (y as usize * usize::from(self.width) + x as usize) * 4;
        let d = self.data();
        Some([d[i], d[i + 1], d[i + 2], d[i + 3]])
    }

    pub fn clear(&mut self, color: Rgba8) {
        let premul = color.premultiplied();
        for px in self.pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
            px.copy_from_slice(&premul);
        }
    }

    /// Run a batch of draw calls and composite them over the current contents.
    pub fn paint(
        &mut self,
        draw: impl FnOnce(&mut vello_cpu::RenderContext) -> GlyphResult<()>,
    ) -> GlyphResult<()> {
        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);
        draw(&mut ctx)?;
        ctx.flush();
        let mut layer = vello_cpu::Pixmap::new(self.width, self.height);
        ctx.render_to_pixmap(&mut layer);
        over_in_place(self.pixmap.data_as_u8_slice_mut(), layer.data_as_u8_slice());
        Ok(())
    }

    pub(crate) fn mark_glyph(&mut self, family: Family, frame: FrameIndex) {
        self.status = SurfaceStatus::Glyph { family, frame };
    }

    /// Replace whatever is on the surface with the error indicator: a colored box on
    /// the fallback background, with the truncated message recorded in the status.
    pub fn draw_error_indicator(&mut self, message: &str, style: &FallbackStyle) {
        self.clear(style.background);
        let (w, h) = (f64::from(self.width), f64::from(self.height));
        let inset = (w.min(h) * 0.1).max(1.0);
        let painted = self.paint(|ctx| {
            ctx.set_paint(to_color(style.box_color));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                inset,
                inset,
                (w - inset).max(inset + 1.0),
                (h - inset).max(inset + 1.0),
            ));
            Ok(())
        });
        if let Err(err) = painted {
            tracing::warn!(%err, "could not paint fallback box");
        }
        self.status = SurfaceStatus::Fallback {
            message: truncate_message(message, style.max_error_chars),
        };
    }
}

/// Premultiplied source-over, pixel by pixel.
fn over_in_place(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let inv = 255 - u16::from(s[3]);
        for i in 0..4 {
            d[i] = s[i].saturating_add(mul_div255(u16::from(d[i]), inv));
        }
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    ((u32::from(x) * u32::from(y) + 127) / 255) as u8
}

pub(crate) fn to_color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

/// Keep at most `max_chars` characters, marking the cut with an ellipsis.
pub fn truncate_message(message: &str, max_chars: usize) -> String {
    let message = message.trim();
    if message.chars().count() <= max_chars {
        return message.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut out: String = message.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
