//! # App: Demo State and Entry Point
//!
//! [`DemoState`] is the whole application: every value the overlay edits and
//! every value the renderer reads lives here and is passed around
//! explicitly. The window handler owns one and drives it once per frame:
//!
//! ```text
//! handle_input(events)   drain queued input, mouse look, scroll zoom
//! update_camera(dt)      WASD movement
//! overlay                builds the panel, which emits PanelActions
//! apply(action)          setters with derived recomputation
//! update_lights()        light motion from base positions and elapsed time
//! frame_uniforms()       camera, light and shading snapshot
//! draw_list()            grid instances plus light markers
//! ```
//!
//! The model (when the variant shows one) is loaded before the event loop
//! starts; a model that fails to load ends the run with an error.

use glam::{Mat4, Vec3};

use crate::assets::load_model;
use crate::camera::{FlyCamera, Movement};
use crate::config::{DemoConfig, VariantFeatures};
use crate::error::{AssetError, DemoError, InitError};
use crate::grid::InstanceGrid;
use crate::input::{InputEvent, InputState, KeyCode};
use crate::lights::{LightMotion, LightRig};
use crate::mesh::{MeshLibrary, ShapeKind};
use crate::render3d::{
    CameraUniform, DrawItem, FrameUniforms, LightUniform, ShadingUniform, TextureCatalog,
};
use crate::shading::{InstanceMaterial, ShadingParams, TextureSetId};
use crate::time::Time;

/// Light markers are the sphere mesh at this scale.
pub const MARKER_SCALE: f32 = 0.5;

/// A change requested by the overlay that needs more than a field write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelAction {
    /// `None` switches back to the constant color.
    SelectTexture(Option<TextureSetId>),
    SetColor([f32; 3]),
    SetRoughness(f32),
    SetMetallic(f32),
    SetGradient(bool),
    SetShape(ShapeKind),
    SetLightsEnabled(bool),
    SetLightColor([f32; 3]),
    SetMotion(LightMotion),
    SetSpeed(f32),
    SetLayout { distance: f32, depth: f32 },
}

/// Everything a running demo knows.
pub struct DemoState {
    pub config: DemoConfig,
    pub features: VariantFeatures,
    pub shape: ShapeKind,
    pub grid: InstanceGrid,
    pub shading: ShadingParams,
    pub lights: LightRig,
    pub camera: FlyCamera,
    pub meshes: MeshLibrary,
    pub catalog: TextureCatalog,
    pub input: InputState,
    pub time: Time,
    exit_requested: bool,
}

impl DemoState {
    pub fn new(config: DemoConfig) -> Result<Self, DemoError> {
        let features = config.variant.features();
        let profile = config.cylinder.profile()?;
        let meshes = MeshLibrary::new(config.sphere_segments, profile);

        let lc = &config.lights;
        let lights = LightRig::new(lc.count, lc.distance, lc.depth, lc.color, lc.intensity_scale)
            .with_motion(lc.motion, lc.speed);

        let shape = if features.shapes.contains(&config.initial_shape) {
            config.initial_shape
        } else {
            features.shapes[0]
        };

        Ok(Self {
            features,
            shape,
            grid: InstanceGrid::from(&config.grid),
            shading: ShadingParams::new(config.albedo, config.gradient),
            lights,
            camera: FlyCamera::default().with_speed_multiplier(config.camera_speed_multiplier),
            meshes,
            catalog: TextureCatalog::new(config.texture_sets.clone(), config.model.textures.clone()),
            input: InputState::default(),
            time: Time::new(),
            exit_requested: false,
            config,
        })
    }

    /// Whether this variant can show the loaded model.
    pub fn shows_model(&self) -> bool {
        self.features.shapes.contains(&ShapeKind::Model)
    }

    /// Load the configured model into the mesh library. Does nothing for
    /// variants without a model shape.
    pub fn load_model(&self) -> Result<(), AssetError> {
        if !self.shows_model() || self.meshes.model().is_some() {
            return Ok(());
        }
        let mesh = load_model(&self.config.model.path)?;
        self.meshes.set_model(mesh);
        Ok(())
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// F12 went down this frame. Held-key repeats do not count.
    pub fn overlay_toggle_requested(&self) -> bool {
        self.input.keys.just_pressed(KeyCode::F12)
    }

    /// Apply this frame's input. Escape requests exit; left-drag turns the
    /// camera while `look_allowed`; scroll zooms.
    pub fn handle_input(&mut self, events: Vec<InputEvent>, look_allowed: bool) {
        for event in events {
            match event {
                InputEvent::Key {
                    code: KeyCode::Escape,
                    pressed: true,
                } => self.exit_requested = true,
                InputEvent::Scroll { dy } if look_allowed => self.camera.process_scroll(dy),
                _ => {}
            }
            if let Some((dx, dy)) = self.input.apply(event, look_allowed) {
                self.camera.process_look(dx, dy);
            }
        }
    }

    /// Move the camera for every held WASD key.
    pub fn update_camera(&mut self, dt: f32) {
        let bindings = [
            (KeyCode::KeyW, Movement::Forward),
            (KeyCode::KeyS, Movement::Backward),
            (KeyCode::KeyA, Movement::Left),
            (KeyCode::KeyD, Movement::Right),
        ];
        for (key, movement) in bindings {
            if self.input.keys.pressed(key) {
                self.camera.process_movement(movement, dt);
            }
        }
    }

    pub fn update_lights(&mut self) {
        self.lights.update(self.time.elapsed_secs());
    }

    pub fn apply(&mut self, action: PanelAction) {
        log::debug!("panel: {action:?}");
        match action {
            PanelAction::SelectTexture(Some(set)) => self.shading.select_texture(set),
            PanelAction::SelectTexture(None) => self.shading.select_color(),
            PanelAction::SetColor(color) => self.shading.set_color(color),
            PanelAction::SetRoughness(r) => self.shading.set_roughness(r),
            PanelAction::SetMetallic(m) => self.shading.set_metallic(m),
            PanelAction::SetGradient(on) => {
                if !self.shading.set_gradient(on) {
                    log::info!("gradient mode is unavailable while a texture set is bound");
                }
            }
            PanelAction::SetShape(shape) => {
                if self.features.shapes.contains(&shape) {
                    self.shape = shape;
                }
            }
            PanelAction::SetLightsEnabled(on) => self.lights.set_enabled(on),
            PanelAction::SetLightColor(color) => self.lights.set_color(color),
            PanelAction::SetMotion(motion) => self.lights.set_motion(motion),
            PanelAction::SetSpeed(speed) => self.lights.set_speed(speed),
            PanelAction::SetLayout { distance, depth } => self.lights.set_layout(distance, depth),
        }
    }

    /// The grid actually drawn for the current shape.
    pub fn active_grid(&self) -> InstanceGrid {
        self.grid.effective(self.shape == ShapeKind::Model)
    }

    pub fn frame_uniforms(&self, aspect: f32) -> FrameUniforms {
        FrameUniforms {
            camera: CameraUniform::new(self.camera.view_projection(aspect), self.camera.position),
            lights: LightUniform::from_lights(self.lights.lights()),
            shading: ShadingUniform::from(&self.shading),
        }
    }

    /// Shape instances followed by one marker per light.
    pub fn draw_list(&self) -> Vec<DrawItem> {
        let grid = self.active_grid();
        let mut items = Vec::with_capacity(grid.len() + self.lights.len());

        for instance in grid.instances() {
            let material = match self.shape {
                ShapeKind::Model => InstanceMaterial::textured(TextureSetId::Model),
                _ => self.shading.instance_material(instance.row, instance.col, &grid),
            };
            items.push(DrawItem {
                shape: self.shape,
                transform: instance.transform(),
                material,
            });
        }

        for light in self.lights.lights() {
            items.push(DrawItem {
                shape: ShapeKind::Sphere,
                transform: Mat4::from_scale_rotation_translation(
                    Vec3::splat(MARKER_SCALE),
                    glam::Quat::IDENTITY,
                    light.position,
                ),
                material: InstanceMaterial::marker(),
            });
        }

        items
    }
}

/// Run a demo until its window closes. The model is loaded first; any
/// failure there or during window/GPU setup is returned.
pub fn run(config: DemoConfig) -> Result<(), DemoError> {
    log::info!("starting {} ({:?})", config.title, config.variant);
    let state = DemoState::new(config)?;
    state.load_model()?;

    let event_loop = winit::event_loop::EventLoop::new().map_err(InitError::from)?;
    event_loop.set_control_flow(winit::event_loop::ControlFlow::Poll);

    let mut app = crate::window::WinitApp::new(state);
    event_loop.run_app(&mut app).map_err(InitError::from)?;
    app.into_result()
}
