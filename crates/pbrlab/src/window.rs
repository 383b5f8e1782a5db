//! winit event loop glue.
//!
//! [`WinitApp`] turns window events into [`InputEvent`]s, owns the GPU-side
//! objects and drives one [`DemoState`] frame per `RedrawRequested`.

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::app::DemoState;
use crate::error::{DemoError, InitError};
use crate::input::{InputEvent, InputQueue};
use crate::overlay::OverlayState;
use crate::render::{ClearColor, GpuContext, render_frame};
use crate::render3d::SceneRenderer;

/// Pixel scroll deltas (touchpads) are converted to lines at this rate.
const PIXELS_PER_LINE: f32 = 20.0;

pub(crate) struct WinitApp {
    state: DemoState,
    queue: InputQueue,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    scene: Option<SceneRenderer>,
    overlay: Option<OverlayState>,
    #[cfg(feature = "hot-reload")]
    watcher: Option<crate::asset::ShaderWatcher>,
    /// First fatal error; returned from [`crate::app::run`].
    error: Option<DemoError>,
}

impl WinitApp {
    pub fn new(state: DemoState) -> Self {
        Self {
            state,
            queue: InputQueue::default(),
            window: None,
            gpu: None,
            scene: None,
            overlay: None,
            #[cfg(feature = "hot-reload")]
            watcher: None,
            error: None,
        }
    }

    pub fn into_result(self) -> Result<(), DemoError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), InitError> {
        let wc = &self.state.config.window;
        let attrs = Window::default_attributes()
            .with_title(&self.state.config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(wc.width as f64, wc.height as f64));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let gpu = GpuContext::new(window.clone())?;

        let shader_path = self.state.config.shader_path.clone();
        let source = shader_path.as_deref().and_then(|path| match std::fs::read_to_string(path) {
            Ok(source) => Some(source),
            Err(e) => {
                log::debug!("using embedded shader ({}: {e})", path.display());
                None
            }
        });
        let scene = SceneRenderer::new(&gpu, ClearColor(self.state.config.clear_color), source.as_deref());

        #[cfg(feature = "hot-reload")]
        {
            self.watcher = shader_path
                .as_deref()
                .filter(|_| source.is_some())
                .and_then(crate::asset::ShaderWatcher::new);
        }

        self.overlay = Some(OverlayState::new(&gpu, &window));
        self.scene = Some(scene);
        self.gpu = Some(gpu);
        self.window = Some(window);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(gpu), Some(scene), Some(overlay)) = (
            self.window.as_ref(),
            self.gpu.as_mut(),
            self.scene.as_mut(),
            self.overlay.as_mut(),
        ) else {
            return;
        };
        let state = &mut self.state;

        state.time.update();
        state.handle_input(self.queue.drain(), !overlay.wants_pointer_input());
        if state.exit_requested() {
            log::info!("escape pressed, exiting");
            event_loop.exit();
            return;
        }
        if state.overlay_toggle_requested() {
            overlay.visible = !overlay.visible;
            log::info!("overlay {}", if overlay.visible { "shown" } else { "hidden" });
        }
        state.update_camera(state.time.delta_secs());

        for action in overlay.build(window, state) {
            state.apply(action);
        }
        state.update_lights();

        #[cfg(feature = "hot-reload")]
        if let Some(source) = self.watcher.as_mut().and_then(|w| w.poll()) {
            match scene.reload_shader(gpu, &source) {
                Ok(()) => log::info!("hot-reloaded PBR shader"),
                Err(e) => log::warn!("{e}; keeping old pipelines"),
            }
        }

        let uniforms = state.frame_uniforms(gpu.aspect());
        let items = state.draw_list();
        let result = render_frame(
            gpu,
            |frame| scene.render(frame, &uniforms, &items, &state.meshes, &state.catalog),
            |frame| overlay.render_overlay(frame),
        );
        match result {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (w, h) = gpu.surface_size();
                gpu.resize(w, h);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("out of GPU memory");
                event_loop.exit();
            }
            Err(e) => log::warn!("surface error: {e:?}"),
        }

        state.input.end_frame();
        window.request_redraw();
    }
}

impl ApplicationHandler for WinitApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            log::error!("initialization failed: {e}");
            self.error = Some(e.into());
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let consumed = match (&self.window, &mut self.overlay) {
            (Some(window), Some(overlay)) => overlay.on_window_event(window, &event),
            _ => false,
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("window close requested, exiting");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size.width, size.height);
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            other => {
                if let Some(input) = translate(&other) {
                    if !consumed || input.bypasses_overlay() {
                        self.queue.push(input);
                    }
                }
            }
        }
    }
}

/// The input-carrying subset of winit's window events.
fn translate(event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::KeyboardInput { event, .. } => match event.physical_key {
            PhysicalKey::Code(code) => Some(InputEvent::Key {
                code,
                pressed: event.state == ElementState::Pressed,
            }),
            PhysicalKey::Unidentified(_) => None,
        },
        WindowEvent::MouseInput { button, state, .. } => Some(InputEvent::MouseButton {
            button: *button,
            pressed: *state == ElementState::Pressed,
        }),
        WindowEvent::CursorMoved { position, .. } => Some(InputEvent::CursorMoved {
            x: position.x as f32,
            y: position.y as f32,
        }),
        WindowEvent::MouseWheel { delta, .. } => {
            let dy = match delta {
                MouseScrollDelta::LineDelta(_, y) => *y,
                MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_LINE,
            };
            Some(InputEvent::Scroll { dy })
        }
        _ => None,
    }
}
