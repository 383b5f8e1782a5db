//! # Shading: The Tweakable PBR Parameter Set
//!
//! [`ShadingParams`] is everything the overlay can change about how surfaces
//! respond to light. It is edited in place by the panel every frame and
//! snapshotted into uniform buffers right before the draw calls.
//!
//! ## Material Inputs
//!
//! A surface needs four inputs: albedo, metallic, roughness and ambient
//! occlusion. They come from one of two places:
//!
//! ```text
//! AlbedoSource::Constant(rgb)            AlbedoSource::Textured(set)
//! ├── albedo    = rgb                    ├── albedo    = albedo map
//! ├── metallic  = slider or row/rows     ├── metallic  = metallic map
//! ├── roughness = slider or col/cols     ├── roughness = roughness map
//! └── ao        = 1                      ├── ao        = ao map
//!                                        └── normal    = normal map
//! ```
//!
//! Selecting a texture set forces [`MaterialMode::Uniform`]: a per-instance
//! gradient would be ignored by the maps anyway.
//!
//! ## Reflectance Model Selectors
//!
//! The Cook-Torrance specular term is `D·G·F / (4·(n·v)·(n·l))`. Each factor
//! can be swapped at runtime via [`FresnelModel`], [`NormalDistribution`] and
//! [`GeometryTerm`]. A CPU mirror of every variant lives in [`brdf`].
//!
//! ## Roughness Floor
//!
//! Roughness 0 turns the GGX lobe into a delta function, which under point
//! lights renders as an invisible or single-pixel highlight. Every roughness
//! sent to the GPU goes through [`clamp_roughness`].

pub mod brdf;

use crate::grid::InstanceGrid;

/// Lowest roughness ever sent to the GPU.
pub const MIN_ROUGHNESS: f32 = 0.05;

/// Clamp to `[MIN_ROUGHNESS, 1.0]`. NaN maps to the floor.
pub fn clamp_roughness(roughness: f32) -> f32 {
    if roughness.is_nan() {
        MIN_ROUGHNESS
    } else {
        roughness.clamp(MIN_ROUGHNESS, 1.0)
    }
}

/// Identifies a bound set of five PBR maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSetId {
    /// Index into the configured texture set list.
    Library(usize),
    /// The maps that ship with the loaded model.
    Model,
}

/// Where surface albedo (and, for textures, every other material input) comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlbedoSource {
    Constant([f32; 3]),
    Textured(TextureSetId),
}

/// Scalar material controls, or a row/column sweep across the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialMode {
    Uniform { roughness: f32, metallic: f32 },
    /// `metallic = row / rows`, `roughness = col / cols`.
    Gradient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FresnelModel {
    /// `F0 + (1 - F0)(1 - cos θ)^5`
    Schlick,
    /// `F0` at every angle.
    Constant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalDistribution {
    GgxTrowbridgeReitz,
    /// Normalized Blinn-Phong with exponent `2/α² - 2`.
    BlinnPhong,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryTerm {
    SmithSchlickGgx,
    Kelemen,
    Off,
}

impl FresnelModel {
    pub(crate) fn shader_code(self) -> u32 {
        match self {
            FresnelModel::Schlick => 0,
            FresnelModel::Constant => 1,
        }
    }
}

impl NormalDistribution {
    pub const ALL: [NormalDistribution; 3] = [
        NormalDistribution::GgxTrowbridgeReitz,
        NormalDistribution::BlinnPhong,
        NormalDistribution::Off,
    ];

    pub fn label(self) -> &'static str {
        match self {
            NormalDistribution::GgxTrowbridgeReitz => "GGX Trowbridge-Reitz",
            NormalDistribution::BlinnPhong => "Blinn-Phong",
            NormalDistribution::Off => "off",
        }
    }

    pub(crate) fn shader_code(self) -> u32 {
        match self {
            NormalDistribution::GgxTrowbridgeReitz => 0,
            NormalDistribution::BlinnPhong => 1,
            NormalDistribution::Off => 2,
        }
    }
}

impl GeometryTerm {
    pub const ALL: [GeometryTerm; 3] = [
        GeometryTerm::SmithSchlickGgx,
        GeometryTerm::Kelemen,
        GeometryTerm::Off,
    ];

    pub fn label(self) -> &'static str {
        match self {
            GeometryTerm::SmithSchlickGgx => "Smith Schlick-GGX",
            GeometryTerm::Kelemen => "Kelemen",
            GeometryTerm::Off => "off",
        }
    }

    pub(crate) fn shader_code(self) -> u32 {
        match self {
            GeometryTerm::SmithSchlickGgx => 0,
            GeometryTerm::Kelemen => 1,
            GeometryTerm::Off => 2,
        }
    }
}

/// Resolved material inputs for one drawn instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceMaterial {
    pub albedo: [f32; 3],
    pub metallic: f32,
    /// Always within `[MIN_ROUGHNESS, 1.0]`.
    pub roughness: f32,
    pub ao: f32,
    /// When set, the maps override every scalar above.
    pub texture_set: Option<TextureSetId>,
}

impl InstanceMaterial {
    /// Flat white, used for light markers.
    pub fn marker() -> Self {
        Self {
            albedo: [1.0, 1.0, 1.0],
            metallic: 0.0,
            roughness: 1.0,
            ao: 1.0,
            texture_set: None,
        }
    }

    /// Material driven entirely by a texture set.
    pub fn textured(set: TextureSetId) -> Self {
        Self {
            albedo: [1.0, 1.0, 1.0],
            metallic: 0.0,
            roughness: 1.0,
            ao: 1.0,
            texture_set: Some(set),
        }
    }
}

/// Every PBR control the overlay exposes.
///
/// The albedo source and material mode change only through the setters, which
/// keep the cached color and slider values in step with them.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadingParams {
    albedo: AlbedoSource,
    material: MaterialMode,
    pub ambient: f32,
    pub f0: f32,
    pub fresnel: FresnelModel,
    pub ndf: NormalDistribution,
    pub geometry: GeometryTerm,
    /// Reinhard tone mapping followed by gamma 2.2.
    pub tone_map: bool,
    pub diffuse: bool,
    pub specular: bool,
    /// Last constant color, restored when switching back from a texture.
    color: [f32; 3],
    /// Last slider values, restored when leaving gradient mode.
    roughness: f32,
    metallic: f32,
}

impl Default for ShadingParams {
    fn default() -> Self {
        Self::new([1.0, 0.0, 0.0], false)
    }
}

impl ShadingParams {
    pub const DEFAULT_ROUGHNESS: f32 = 0.2;
    pub const DEFAULT_METALLIC: f32 = 0.0;
    pub const DEFAULT_AMBIENT: f32 = 0.03;
    pub const DEFAULT_F0: f32 = 0.04;

    pub fn new(color: [f32; 3], gradient: bool) -> Self {
        let material = if gradient {
            MaterialMode::Gradient
        } else {
            MaterialMode::Uniform {
                roughness: Self::DEFAULT_ROUGHNESS,
                metallic: Self::DEFAULT_METALLIC,
            }
        };
        Self {
            albedo: AlbedoSource::Constant(color),
            material,
            ambient: Self::DEFAULT_AMBIENT,
            f0: Self::DEFAULT_F0,
            fresnel: FresnelModel::Schlick,
            ndf: NormalDistribution::GgxTrowbridgeReitz,
            geometry: GeometryTerm::SmithSchlickGgx,
            tone_map: true,
            diffuse: true,
            specular: true,
            color,
            roughness: Self::DEFAULT_ROUGHNESS,
            metallic: Self::DEFAULT_METALLIC,
        }
    }

    pub fn albedo(&self) -> AlbedoSource {
        self.albedo
    }

    pub fn material(&self) -> MaterialMode {
        self.material
    }

    /// The constant color, kept while a texture set is bound.
    pub fn color(&self) -> [f32; 3] {
        self.color
    }

    pub fn texture_set(&self) -> Option<TextureSetId> {
        match self.albedo {
            AlbedoSource::Textured(set) => Some(set),
            AlbedoSource::Constant(_) => None,
        }
    }

    /// Bind a texture set. Gradient mode is turned off.
    pub fn select_texture(&mut self, set: TextureSetId) {
        self.albedo = AlbedoSource::Textured(set);
        self.material = MaterialMode::Uniform {
            roughness: self.roughness,
            metallic: self.metallic,
        };
    }

    /// Go back to the last constant color.
    pub fn select_color(&mut self) {
        self.albedo = AlbedoSource::Constant(self.color);
    }

    pub fn set_color(&mut self, color: [f32; 3]) {
        self.color = color;
        if let AlbedoSource::Constant(_) = self.albedo {
            self.albedo = AlbedoSource::Constant(color);
        }
    }

    pub fn is_gradient(&self) -> bool {
        matches!(self.material, MaterialMode::Gradient)
    }

    /// Switch gradient mode. Refused (returns `false`) while a texture is bound.
    pub fn set_gradient(&mut self, on: bool) -> bool {
        if on && self.texture_set().is_some() {
            return false;
        }
        self.material = if on {
            MaterialMode::Gradient
        } else {
            MaterialMode::Uniform {
                roughness: self.roughness,
                metallic: self.metallic,
            }
        };
        true
    }

    /// Raw slider value; clamping happens on the way to the GPU.
    pub fn roughness(&self) -> f32 {
        self.roughness
    }

    pub fn metallic(&self) -> f32 {
        self.metallic
    }

    pub fn set_roughness(&mut self, roughness: f32) {
        self.roughness = roughness;
        if let MaterialMode::Uniform { roughness: r, .. } = &mut self.material {
            *r = roughness;
        }
    }

    pub fn set_metallic(&mut self, metallic: f32) {
        self.metallic = metallic;
        if let MaterialMode::Uniform { metallic: m, .. } = &mut self.material {
            *m = metallic;
        }
    }

    /// Material inputs for grid cell `(row, col)`.
    pub fn instance_material(&self, row: u32, col: u32, grid: &InstanceGrid) -> InstanceMaterial {
        let albedo = match self.albedo {
            AlbedoSource::Constant(rgb) => rgb,
            AlbedoSource::Textured(set) => return InstanceMaterial::textured(set),
        };
        let (roughness, metallic) = match self.material {
            MaterialMode::Uniform {
                roughness,
                metallic,
            } => (roughness, metallic),
            MaterialMode::Gradient => (
                col as f32 / grid.columns.max(1) as f32,
                row as f32 / grid.rows.max(1) as f32,
            ),
        };
        InstanceMaterial {
            albedo,
            metallic,
            roughness: clamp_roughness(roughness),
            ao: 1.0,
            texture_set: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roughness_clamp_bounds() {
        assert_eq!(clamp_roughness(0.0), MIN_ROUGHNESS);
        assert_eq!(clamp_roughness(1.0), 1.0);
        assert_eq!(clamp_roughness(-3.0), MIN_ROUGHNESS);
        assert_eq!(clamp_roughness(7.0), 1.0);
        assert_eq!(clamp_roughness(0.5), 0.5);
        assert_eq!(clamp_roughness(f32::NAN), MIN_ROUGHNESS);
    }

    #[test]
    fn uploaded_roughness_is_always_clamped() {
        let grid = InstanceGrid::default();
        let mut params = ShadingParams::default();
        for raw in [0.0, 0.01, 0.05, 0.3, 1.0, 1.5, -1.0] {
            params.set_roughness(raw);
            let m = params.instance_material(0, 0, &grid);
            assert!((MIN_ROUGHNESS..=1.0).contains(&m.roughness), "raw {raw}");
        }
    }

    #[test]
    fn gradient_follows_rows_and_columns() {
        let grid = InstanceGrid::default();
        let params = ShadingParams::new([0.0, 0.0, 1.0], true);

        let first = params.instance_material(0, 0, &grid);
        assert_eq!(first.metallic, 0.0);
        assert_eq!(first.roughness, MIN_ROUGHNESS);

        let m = params.instance_material(3, 5, &grid);
        assert_eq!(m.metallic, 3.0 / 7.0);
        assert_eq!(m.roughness, 5.0 / 7.0);
        assert_eq!(m.albedo, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn uniform_mode_ignores_position() {
        let grid = InstanceGrid::default();
        let mut params = ShadingParams::default();
        params.set_roughness(0.6);
        params.set_metallic(0.9);
        assert_eq!(params.instance_material(0, 0, &grid), params.instance_material(6, 6, &grid));
        assert_eq!(params.instance_material(2, 2, &grid).metallic, 0.9);
    }

    #[test]
    fn selecting_a_texture_disables_gradient() {
        let mut params = ShadingParams::new([1.0, 0.0, 0.0], true);
        params.select_texture(TextureSetId::Library(2));
        assert!(!params.is_gradient());
        assert!(!params.set_gradient(true));
        assert!(!params.is_gradient());

        let m = params.instance_material(1, 1, &InstanceGrid::default());
        assert_eq!(m.texture_set, Some(TextureSetId::Library(2)));
    }

    #[test]
    fn color_survives_a_texture_round_trip() {
        let mut params = ShadingParams::new([0.2, 0.4, 0.6], false);
        params.select_texture(TextureSetId::Library(0));
        params.set_color([0.1, 0.1, 0.1]);
        assert!(matches!(params.albedo(), AlbedoSource::Textured(_)));
        params.select_color();
        assert_eq!(params.albedo(), AlbedoSource::Constant([0.1, 0.1, 0.1]));
    }

    #[test]
    fn color_edit_reaches_every_instance() {
        let grid = InstanceGrid::default();
        let mut params = ShadingParams::new([1.0, 0.0, 0.0], true);
        params.set_color([0.0, 1.0, 0.0]);
        assert_eq!(params.albedo(), AlbedoSource::Constant([0.0, 1.0, 0.0]));
        assert_eq!(params.instance_material(0, 0, &grid).albedo, [0.0, 1.0, 0.0]);
        assert_eq!(params.instance_material(6, 3, &grid).albedo, [0.0, 1.0, 0.0]);

        params.select_texture(TextureSetId::Model);
        params.set_color([0.5, 0.5, 0.5]);
        assert_eq!(params.instance_material(0, 0, &grid).albedo, [1.0, 1.0, 1.0]);
        params.select_color();
        assert_eq!(params.instance_material(0, 0, &grid).albedo, [0.5, 0.5, 0.5]);
    }

    #[test]
    fn leaving_gradient_restores_sliders() {
        let mut params = ShadingParams::default();
        params.set_roughness(0.7);
        params.set_gradient(true);
        params.set_roughness(0.4);
        params.set_gradient(false);
        assert_eq!(
            params.material(),
            MaterialMode::Uniform {
                roughness: 0.4,
                metallic: ShadingParams::DEFAULT_METALLIC
            }
        );
    }

    #[test]
    fn selector_codes_are_distinct() {
        let ndf: Vec<_> = NormalDistribution::ALL.iter().map(|n| n.shader_code()).collect();
        assert_eq!(ndf, vec![0, 1, 2]);
        let geo: Vec<_> = GeometryTerm::ALL.iter().map(|g| g.shader_code()).collect();
        assert_eq!(geo, vec![0, 1, 2]);
        assert_ne!(FresnelModel::Schlick.shader_code(), FresnelModel::Constant.shader_code());
    }
}
