//! # Config: Demo Variants and Their Tunables
//!
//! All three demos share one binary-agnostic [`DemoConfig`]. The built-in
//! defaults for each [`DemoVariant`] live in [`DemoConfig::for_variant`];
//! a JSON file can override any subset of fields:
//!
//! ```json
//! {
//!   "variant": "light_lab",
//!   "lights": { "count": 8, "distance": 6.0 },
//!   "grid": { "rows": 5 }
//! }
//! ```
//!
//! Fields missing from the file keep the defaults of the file's variant,
//! including fields of partially specified nested tables. A file without a
//! `"variant"` key applies to the variant the binary asked for. The demo binaries
//! read the file named by the `PBRLAB_CONFIG` environment variable when it
//! is set.

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, ProfileError};
use crate::grid::InstanceGrid;
use crate::lights::LightMotion;
use crate::mesh::ShapeKind;
use crate::mesh::revolution::Profile;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "PBRLAB_CONFIG";

/// Which demo to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemoVariant {
    /// Metallic/roughness sweep across a grid of blue shapes.
    #[default]
    MaterialGrid,
    /// Texture sets and every reflectance-model selector.
    Textured,
    /// Eight moving lights and per-term toggles.
    LightLab,
}

/// Which shapes and overlay controls a variant offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantFeatures {
    pub shapes: &'static [ShapeKind],
    pub motions: &'static [LightMotion],
    /// "texture" combo: constant color or one of the texture sets.
    pub texture_combo: bool,
    /// Albedo color, roughness and metallic sliders.
    pub material_controls: bool,
    pub gradient_toggle: bool,
    /// Ambient, HDR/gamma, Fresnel, F0, NDF and geometry selectors.
    pub reflectance_controls: bool,
    /// Independent diffuse/specular toggles.
    pub contribution_toggles: bool,
    /// Speed, distance and depth sliders.
    pub light_sliders: bool,
}

impl DemoVariant {
    pub fn features(self) -> VariantFeatures {
        match self {
            DemoVariant::MaterialGrid => VariantFeatures {
                shapes: &[ShapeKind::Sphere, ShapeKind::Cylinder, ShapeKind::Model],
                motions: &[LightMotion::Oscillate],
                texture_combo: false,
                material_controls: false,
                gradient_toggle: false,
                reflectance_controls: false,
                contribution_toggles: false,
                light_sliders: false,
            },
            DemoVariant::Textured => VariantFeatures {
                shapes: &[ShapeKind::Sphere, ShapeKind::Model],
                motions: &[LightMotion::Static],
                texture_combo: true,
                material_controls: true,
                gradient_toggle: false,
                reflectance_controls: true,
                contribution_toggles: false,
                light_sliders: false,
            },
            DemoVariant::LightLab => VariantFeatures {
                shapes: &[ShapeKind::Sphere, ShapeKind::Cylinder],
                motions: &[
                    LightMotion::Static,
                    LightMotion::OrbitHorizontal,
                    LightMotion::OrbitVertical,
                ],
                texture_combo: false,
                material_controls: true,
                gradient_toggle: true,
                reflectance_controls: true,
                contribution_toggles: true,
                light_sliders: true,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub rows: u32,
    pub columns: u32,
    pub spacing: f32,
}

impl From<&GridConfig> for InstanceGrid {
    fn from(c: &GridConfig) -> Self {
        InstanceGrid::new(c.rows, c.columns, c.spacing)
    }
}

/// Surface-of-revolution profile used for the cylinder shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CylinderConfig {
    pub a: [f32; 3],
    pub b: [f32; 3],
    pub divisions: u32,
}

impl CylinderConfig {
    pub fn profile(&self) -> Result<Profile, ProfileError> {
        Profile::uniform(Vec3::from(self.a), Vec3::from(self.b), self.divisions)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightConfig {
    pub count: usize,
    pub distance: f32,
    pub depth: f32,
    /// Overlay color; the lights shine with `color · intensity_scale`.
    pub color: [f32; 3],
    pub intensity_scale: f32,
    pub motion: LightMotion,
    pub speed: f32,
}

/// Five PBR maps making up one selectable material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureSetConfig {
    pub name: String,
    pub albedo: PathBuf,
    pub normal: PathBuf,
    pub metallic: PathBuf,
    pub roughness: PathBuf,
    pub ao: PathBuf,
}

impl TextureSetConfig {
    /// `albedo.png`, `normal.png`, ... inside `dir`.
    pub fn from_dir(name: impl Into<String>, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            name: name.into(),
            albedo: dir.join("albedo.png"),
            normal: dir.join("normal.png"),
            metallic: dir.join("metallic.png"),
            roughness: dir.join("roughness.png"),
            ao: dir.join("ao.png"),
        }
    }

    /// Maps in load order: albedo, normal, metallic, roughness, ao.
    pub fn paths(&self) -> [&Path; 5] {
        [
            &self.albedo,
            &self.normal,
            &self.metallic,
            &self.roughness,
            &self.ao,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// `.obj`, `.gltf` or `.glb`.
    pub path: PathBuf,
    pub textures: TextureSetConfig,
}

/// Every tunable of a demo run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoConfig {
    pub title: String,
    pub variant: DemoVariant,
    pub window: WindowConfig,
    pub grid: GridConfig,
    pub sphere_segments: u32,
    pub cylinder: CylinderConfig,
    pub lights: LightConfig,
    /// Constant albedo the demo starts with.
    pub albedo: [f32; 3],
    /// Start in metallic/roughness gradient mode.
    pub gradient: bool,
    pub initial_shape: ShapeKind,
    pub camera_speed_multiplier: f32,
    pub model: ModelConfig,
    pub texture_sets: Vec<TextureSetConfig>,
    pub clear_color: [f64; 4],
    /// Shader source watched for hot reload; `None` disables watching.
    pub shader_path: Option<PathBuf>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self::for_variant(DemoVariant::default())
    }
}

impl DemoConfig {
    /// Built-in defaults for `variant`.
    pub fn for_variant(variant: DemoVariant) -> Self {
        let pbr = Path::new("resources/textures/pbr");
        let texture_sets = vec![
            TextureSetConfig::from_dir("gold", pbr.join("gold")),
            TextureSetConfig::from_dir("grass", pbr.join("grass")),
            TextureSetConfig::from_dir("plastic", pbr.join("plastic")),
            TextureSetConfig::from_dir("rusted", pbr.join("rusted_iron")),
            TextureSetConfig::from_dir("wall", pbr.join("wall")),
        ];
        let camera_model = ModelConfig {
            path: PathBuf::from("model/cgaxis_antique_photo_camera_65_04_blender.obj"),
            textures: TextureSetConfig {
                name: "camera".into(),
                albedo: "model/cgaxis_models_65_04_01_Albedo.png".into(),
                normal: "model/cgaxis_models_65_04_01_Normal.png".into(),
                metallic: "model/cgaxis_models_65_04_01_Metalness.png".into(),
                roughness: "model/cgaxis_models_65_04_01_Roughness.png".into(),
                ao: "model/cgaxis_models_65_04_01_AO.png".into(),
            },
        };
        let car_model = ModelConfig {
            path: PathBuf::from("model/kcar/kcar.obj"),
            textures: TextureSetConfig::from_dir("kcar", "model/kcar"),
        };
        let grid = GridConfig {
            rows: 7,
            columns: 7,
            spacing: 2.5,
        };
        let cylinder = CylinderConfig {
            a: Profile::CYLINDER_A.to_array(),
            b: Profile::CYLINDER_B.to_array(),
            divisions: Profile::CYLINDER_DIVISIONS,
        };
        let base = Self {
            title: String::new(),
            variant,
            window: WindowConfig {
                width: 1280,
                height: 720,
            },
            grid,
            sphere_segments: 64,
            cylinder,
            lights: LightConfig {
                count: 4,
                distance: 5.0,
                depth: 10.0,
                color: [300.0 / 255.0; 3],
                intensity_scale: 255.0,
                motion: LightMotion::Oscillate,
                speed: 1.0,
            },
            albedo: [0.0, 0.0, 1.0],
            gradient: true,
            initial_shape: ShapeKind::Cylinder,
            camera_speed_multiplier: 1.0,
            model: camera_model,
            texture_sets: Vec::new(),
            clear_color: [0.1, 0.1, 0.1, 1.0],
            shader_path: Some(PathBuf::from(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/src/render3d/shader.wgsl"
            ))),
        };

        match variant {
            DemoVariant::MaterialGrid => Self {
                title: "pbrlab: material grid".into(),
                ..base
            },
            DemoVariant::Textured => Self {
                title: "pbrlab: textured".into(),
                lights: LightConfig {
                    distance: 10.0,
                    motion: LightMotion::Static,
                    ..base.lights
                },
                albedo: [1.0, 0.0, 0.0],
                gradient: false,
                initial_shape: ShapeKind::Sphere,
                camera_speed_multiplier: 2.0,
                model: car_model,
                texture_sets,
                ..base
            },
            DemoVariant::LightLab => Self {
                title: "pbrlab: light lab".into(),
                lights: LightConfig {
                    count: 8,
                    distance: 10.0,
                    motion: LightMotion::Static,
                    ..base.lights
                },
                albedo: [1.0, 0.0, 0.0],
                gradient: false,
                initial_shape: ShapeKind::Sphere,
                camera_speed_multiplier: 2.0,
                ..base
            },
        }
    }

    /// Read `path`, filling anything it omits from the defaults of its
    /// `"variant"`, or of `fallback` when the file names none.
    pub fn load(path: impl AsRef<Path>, fallback: DemoVariant) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text, fallback).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a (possibly partial) JSON document. Without a `"variant"` key
    /// the document overrides the defaults of `fallback`.
    pub fn from_json(text: &str, fallback: DemoVariant) -> Result<Self, serde_json::Error> {
        let overrides: Value = serde_json::from_str(text)?;
        let variant = match overrides.get("variant") {
            Some(v) => serde_json::from_value(v.clone())?,
            None => fallback,
        };
        let mut merged = serde_json::to_value(Self::for_variant(variant))?;
        merge(&mut merged, overrides);
        serde_json::from_value(merged)
    }

    /// Defaults for `variant`, overridden by the file in `PBRLAB_CONFIG` if set.
    pub fn from_env(variant: DemoVariant) -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        Self::from_optional_file(path.as_deref(), variant)
    }

    fn from_optional_file(path: Option<&Path>, variant: DemoVariant) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                log::info!("loading config from {}", path.display());
                Self::load(path, variant)
            }
            None => Ok(Self::for_variant(variant)),
        }
    }
}

/// Recursively overlay `patch` onto `base`. Objects merge key by key;
/// anything else replaces.
fn merge(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_defaults() {
        let grid = DemoConfig::for_variant(DemoVariant::MaterialGrid);
        assert_eq!(grid.lights.count, 4);
        assert_eq!(grid.lights.distance, 5.0);
        assert_eq!(grid.albedo, [0.0, 0.0, 1.0]);
        assert!(grid.gradient);
        assert_eq!((grid.grid.rows, grid.grid.columns, grid.grid.spacing), (7, 7, 2.5));

        let textured = DemoConfig::for_variant(DemoVariant::Textured);
        assert_eq!(textured.texture_sets.len(), 5);
        assert_eq!(textured.lights.distance, 10.0);
        assert_eq!(textured.camera_speed_multiplier, 2.0);

        let lab = DemoConfig::for_variant(DemoVariant::LightLab);
        assert_eq!(lab.lights.count, 8);
    }

    #[test]
    fn json_round_trip() {
        let config = DemoConfig::for_variant(DemoVariant::Textured);
        let text = serde_json::to_string_pretty(&config).unwrap();
        assert_eq!(DemoConfig::from_json(&text, DemoVariant::MaterialGrid).unwrap(), config);
    }

    #[test]
    fn partial_json_keeps_variant_defaults() {
        let config = DemoConfig::from_json(
            r#"{ "variant": "light_lab", "lights": { "distance": 6.0 }, "grid": { "rows": 5 } }"#,
            DemoVariant::MaterialGrid,
        )
        .unwrap();
        let defaults = DemoConfig::for_variant(DemoVariant::LightLab);
        assert_eq!(config.variant, DemoVariant::LightLab);
        assert_eq!(config.lights.distance, 6.0);
        assert_eq!(config.lights.count, defaults.lights.count);
        assert_eq!(config.grid.rows, 5);
        assert_eq!(config.grid.columns, defaults.grid.columns);
        assert_eq!(config.title, defaults.title);
    }

    #[test]
    fn empty_object_keeps_the_callers_variant() {
        for variant in [DemoVariant::MaterialGrid, DemoVariant::Textured, DemoVariant::LightLab] {
            let config = DemoConfig::from_json("{}", variant).unwrap();
            assert_eq!(config, DemoConfig::for_variant(variant));
        }
    }

    #[test]
    fn config_file_without_variant_keeps_the_binarys_variant() {
        let path = std::env::temp_dir().join(format!("pbrlab-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "lights": { "speed": 2.0 } }"#).unwrap();

        let config = DemoConfig::from_optional_file(Some(&path), DemoVariant::LightLab).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.variant, DemoVariant::LightLab);
        assert_eq!(config.lights.count, 8);
        assert_eq!(config.lights.speed, 2.0);
        assert!(config.variant.features().light_sliders);
    }

    #[test]
    fn no_config_file_gives_variant_defaults() {
        let config = DemoConfig::from_optional_file(None, DemoVariant::Textured).unwrap();
        assert_eq!(config, DemoConfig::for_variant(DemoVariant::Textured));
    }

    #[test]
    fn bad_json_is_an_error() {
        let fallback = DemoVariant::MaterialGrid;
        assert!(DemoConfig::from_json(r#"{ "grid": { "rows": "many" } }"#, fallback).is_err());
        assert!(DemoConfig::from_json(r#"{ "variant": "nope" }"#, fallback).is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = DemoConfig::load("/definitely/not/here.json", DemoVariant::LightLab).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn texture_set_from_dir() {
        let set = TextureSetConfig::from_dir("gold", "resources/textures/pbr/gold");
        assert_eq!(set.roughness, PathBuf::from("resources/textures/pbr/gold/roughness.png"));
        assert_eq!(set.paths().len(), 5);
    }

    #[test]
    fn cylinder_config_builds_profile() {
        let config = DemoConfig::default();
        assert_eq!(config.cylinder.profile().unwrap(), Profile::cylinder());

        let flat = CylinderConfig {
            a: [1.0, 0.0, 0.0],
            b: [1.0, 0.0, 0.0],
            divisions: 8,
        };
        assert_eq!(flat.profile(), Err(ProfileError::CoincidentControlPoints));
    }

    #[test]
    fn shapes_per_variant() {
        assert!(DemoVariant::MaterialGrid.features().shapes.contains(&ShapeKind::Cylinder));
        assert!(!DemoVariant::Textured.features().shapes.contains(&ShapeKind::Cylinder));
        assert!(DemoVariant::LightLab.features().light_sliders);
        assert_eq!(DemoVariant::LightLab.features().motions.len(), 3);
    }
}
