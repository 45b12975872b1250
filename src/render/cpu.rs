use crate::foundation::core::Canvas;
use crate::foundation::error::{PixmorphError, PixmorphResult};
use crate::render::backend::FrameRGBA;
use crate::render::frame::FramePlan;

/// Raster surface backed by a `vello_cpu` pixmap.
///
/// Every [`CpuSurface::execute`] repaints the whole surface: the plan's clear color is filled over
/// the full canvas before any cell is drawn.
pub struct CpuSurface {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl CpuSurface {
    /// Allocate a surface covering `canvas`.
    pub fn new(canvas: Canvas) -> PixmorphResult<Self> {
        if canvas.is_empty() {
            return Err(PixmorphError::render("surface must have non-zero size"));
        }
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| PixmorphError::render("surface width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| PixmorphError::render("surface height exceeds u16"))?;
        Ok(Self {
            width,
            height,
            pixmap: vello_cpu::Pixmap::new(width, height),
        })
    }

    /// Surface dimensions.
    pub fn canvas(&self) -> Canvas {
        Canvas::new(u32::from(self.width), u32::from(self.height))
    }

    /// Paint `plan` onto the surface, replacing its previous contents.
    pub fn execute(&mut self, plan: &FramePlan) {
        let (w, h) = (f64::from(self.width), f64::from(self.height));
        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);

        ctx.set_paint(color(plan.clear));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));

        for op in &plan.ops {
            let x0 = op.origin.x;
            let y0 = op.origin.y;
            if x0 >= w || y0 >= h || x0 + op.size <= 0.0 || y0 + op.size <= 0.0 {
                continue;
            }
            ctx.set_paint(color(op.rgba));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                x0,
                y0,
                x0 + op.size,
                y0 + op.size,
            ));
        }

        ctx.flush();
        ctx.render_to_pixmap(&mut self.pixmap);
    }

    /// Fill the whole surface with one straight RGBA8 color.
    pub fn clear(&mut self, rgba: [u8; 4]) {
        let premul = premul_rgba8(rgba);
        for px in self.pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
            px.copy_from_slice(&premul);
        }
    }

    /// Copy the current contents out as a premultiplied [`FrameRGBA`].
    pub fn snapshot(&self) -> FrameRGBA {
        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }
}

fn color([r, g, b, a]: [u8; 4]) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

fn premul_rgba8([r, g, b, a]: [u8; 4]) -> [u8; 4] {
    let premul = |c: u8| ((u16::from(c) * u16::from(a) + 127) / 255) as u8;
    [premul(r), premul(g), premul(b), a]
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
