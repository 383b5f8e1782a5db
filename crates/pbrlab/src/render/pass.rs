//! Frame orchestration: acquire, record, submit, present.

use crate::render::gpu::GpuContext;

/// Background color of the scene pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearColor(pub [f64; 4]);

impl Default for ClearColor {
    fn default() -> Self {
        Self([0.1, 0.1, 0.1, 1.0])
    }
}

impl ClearColor {
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.0[0],
            g: self.0[1],
            b: self.0[2],
            a: self.0[3],
        }
    }
}

/// Per-frame render context.
///
/// Created by [`render_frame`], which acquires the surface texture and
/// encoder. The scene and overlay add their passes to the encoder;
/// submit/present happens after both are recorded.
pub struct FrameContext<'a> {
    pub encoder: wgpu::CommandEncoder,
    pub view: wgpu::TextureView,
    pub gpu: &'a GpuContext,
}

/// Render a single frame: `scene` records the 3D pass, then `overlay` draws
/// on top of it.
pub fn render_frame(
    gpu: &GpuContext,
    scene: impl FnOnce(&mut FrameContext<'_>),
    overlay: impl FnOnce(&mut FrameContext<'_>),
) -> Result<(), wgpu::SurfaceError> {
    let output = gpu.surface.get_current_texture()?;
    let view = output
        .texture
        .create_view(&wgpu::TextureViewDescriptor::default());
    let encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("pbrlab frame encoder"),
        });

    let mut frame = FrameContext { encoder, view, gpu };

    scene(&mut frame);
    overlay(&mut frame);

    gpu.queue.submit(std::iter::once(frame.encoder.finish()));
    output.present();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_color_converts() {
        let c = ClearColor::default().to_wgpu();
        assert_eq!((c.r, c.g, c.b, c.a), (0.1, 0.1, 0.1, 1.0));
    }
}
