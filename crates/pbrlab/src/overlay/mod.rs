//! # Overlay: egui Control Panel
//!
//! Integrates egui on top of the scene pass: window events are forwarded to
//! `egui_winit`, the panel is built once per frame and its paint jobs are
//! drawn in a second pass that loads (not clears) the frame.
//!
//! The panel never touches derived state itself. Plain switches (HDR, the
//! reflectance selectors, ambient and F0) are written straight into
//! [`ShadingParams`](crate::shading::ShadingParams); anything that needs
//! recomputation comes back as a [`PanelAction`] for
//! [`DemoState::apply`](crate::app::DemoState::apply).
//!
//! F12 hides and shows the panel.

mod panel;

use std::sync::Arc;

use crate::app::{DemoState, PanelAction};
use crate::render::{FrameContext, GpuContext};

/// Stored in the window handler; egui_winit state is not `Send`.
pub struct OverlayState {
    pub egui_ctx: egui::Context,
    pub egui_winit: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    pub visible: bool,
    paint_jobs: Vec<egui::ClippedPrimitive>,
    textures_delta: egui::TexturesDelta,
    frame_ready: bool,
}

impl OverlayState {
    pub fn new(gpu: &GpuContext, window: &Arc<winit::window::Window>) -> Self {
        let egui_ctx = egui::Context::default();

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window.as_ref(),
            Some(window.scale_factor() as f32),
            None,
            Some(gpu.device.limits().max_texture_dimension_2d as usize),
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            &gpu.device,
            gpu.surface_format(),
            egui_wgpu::RendererOptions::default(),
        );

        Self {
            egui_ctx,
            egui_winit,
            egui_renderer,
            visible: true,
            paint_jobs: Vec::new(),
            textures_delta: egui::TexturesDelta::default(),
            frame_ready: false,
        }
    }

    /// Forward a winit event to egui. Returns true if egui consumed it.
    pub fn on_window_event(
        &mut self,
        window: &winit::window::Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        if !self.visible {
            return false;
        }
        self.egui_winit.on_window_event(window, event).consumed
    }

    /// Whether the pointer is over (or dragging) a panel, in which case the
    /// camera must not react to it.
    pub fn wants_pointer_input(&self) -> bool {
        self.visible && self.egui_ctx.wants_pointer_input()
    }

    /// Build the panel for this frame and return the actions it produced.
    pub fn build(&mut self, window: &winit::window::Window, state: &mut DemoState) -> Vec<PanelAction> {
        if !self.visible {
            self.frame_ready = false;
            return Vec::new();
        }

        let raw_input = self.egui_winit.take_egui_input(window);
        let mut actions = Vec::new();

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            actions = panel::pbr_panel(ctx, state);
        });

        self.egui_winit
            .handle_platform_output(window, full_output.platform_output);

        self.paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        self.textures_delta = full_output.textures_delta;
        self.frame_ready = true;
        actions
    }

    /// Draw the panel on top of the already rendered scene.
    pub fn render_overlay(&mut self, frame: &mut FrameContext<'_>) {
        if !self.frame_ready {
            return;
        }
        self.frame_ready = false;

        let gpu = frame.gpu;
        let (sw, sh) = gpu.surface_size();

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [sw, sh],
            pixels_per_point: self.egui_ctx.pixels_per_point(),
        };

        for (id, delta) in &self.textures_delta.set {
            self.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, delta);
        }

        let cmd_buffers = self.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut frame.encoder,
            &self.paint_jobs,
            &screen_descriptor,
        );
        if !cmd_buffers.is_empty() {
            gpu.queue.submit(cmd_buffers);
        }

        {
            let render_pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui overlay"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.egui_renderer.render(
                &mut render_pass.forget_lifetime(),
                &self.paint_jobs,
                &screen_descriptor,
            );
        }

        for id in &self.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}
