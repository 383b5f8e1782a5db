//! CPU reference of the fragment shader's reflectance model.
//!
//! Mirrors `shader.wgsl` term for term so the selectors can be tested without
//! a GPU. All directions are unit vectors; all dot products are clamped to
//! zero before use, as the shader does.

use std::f32::consts::PI;

use glam::Vec3;

use super::{FresnelModel, GeometryTerm, NormalDistribution, ShadingParams, clamp_roughness};

/// `F(θ)`: fraction of light reflected at incidence angle `θ`.
pub fn fresnel(model: FresnelModel, cos_theta: f32, f0: Vec3) -> Vec3 {
    match model {
        FresnelModel::Schlick => {
            let k = (1.0 - cos_theta).clamp(0.0, 1.0).powi(5);
            f0 + (Vec3::ONE - f0) * k
        }
        FresnelModel::Constant => f0,
    }
}

/// `D(h)`: density of microfacets oriented along the half vector.
pub fn distribution(ndf: NormalDistribution, n_dot_h: f32, roughness: f32) -> f32 {
    let alpha = roughness * roughness;
    let n_dot_h = n_dot_h.max(0.0);
    match ndf {
        NormalDistribution::GgxTrowbridgeReitz => {
            let a2 = alpha * alpha;
            let denom = n_dot_h * n_dot_h * (a2 - 1.0) + 1.0;
            a2 / (PI * denom * denom)
        }
        NormalDistribution::BlinnPhong => {
            let shininess = 2.0 / (alpha * alpha) - 2.0;
            (shininess + 2.0) / (2.0 * PI) * n_dot_h.powf(shininess)
        }
        NormalDistribution::Off => 1.0,
    }
}

/// `G(l, v)`: microfacet self-shadowing and masking.
pub fn geometry(term: GeometryTerm, n_dot_v: f32, n_dot_l: f32, v_dot_h: f32, roughness: f32) -> f32 {
    let n_dot_v = n_dot_v.max(0.0);
    let n_dot_l = n_dot_l.max(0.0);
    match term {
        GeometryTerm::SmithSchlickGgx => {
            let r = roughness + 1.0;
            let k = r * r / 8.0;
            let g1 = |x: f32| x / (x * (1.0 - k) + k);
            g1(n_dot_v) * g1(n_dot_l)
        }
        GeometryTerm::Kelemen => {
            let v_dot_h = v_dot_h.max(1e-4);
            n_dot_l * n_dot_v / (v_dot_h * v_dot_h)
        }
        GeometryTerm::Off => 1.0,
    }
}

/// Point light radiance at `distance`, inverse-square falloff.
pub fn radiance(color: Vec3, distance: f32) -> Vec3 {
    color / (distance * distance)
}

/// Reinhard tone mapping followed by gamma 2.2 encoding.
pub fn tone_map(color: Vec3) -> Vec3 {
    let mapped = color / (color + Vec3::ONE);
    mapped.powf(1.0 / 2.2)
}

/// Material inputs at one shaded point.
#[derive(Debug, Clone, Copy)]
pub struct Surface {
    pub position: Vec3,
    pub normal: Vec3,
    pub albedo: Vec3,
    pub metallic: f32,
    pub roughness: f32,
    pub ao: f32,
}

/// Outgoing color at `surface` seen from `eye`, lit by `(position, color)` lights.
pub fn shade(params: &ShadingParams, surface: &Surface, eye: Vec3, lights: &[(Vec3, Vec3)]) -> Vec3 {
    let n = surface.normal.normalize();
    let v = (eye - surface.position).normalize();
    let roughness = clamp_roughness(surface.roughness);
    let f0 = Vec3::splat(params.f0).lerp(surface.albedo, surface.metallic);
    let n_dot_v = n.dot(v).max(0.0);

    let mut lo = Vec3::ZERO;
    for &(light_pos, light_color) in lights {
        let to_light = light_pos - surface.position;
        let l = to_light.normalize();
        let h = (v + l).normalize();
        let n_dot_l = n.dot(l).max(0.0);
        let v_dot_h = v.dot(h).max(0.0);

        let d = distribution(params.ndf, n.dot(h), roughness);
        let g = geometry(params.geometry, n_dot_v, n_dot_l, v_dot_h, roughness);
        let f = fresnel(params.fresnel, v_dot_h, f0);

        let specular = d * g * f / (4.0 * n_dot_v * n_dot_l + 0.0001);
        let k_d = (Vec3::ONE - f) * (1.0 - surface.metallic);

        let mut brdf = Vec3::ZERO;
        if params.diffuse {
            brdf += k_d * surface.albedo / PI;
        }
        if params.specular {
            brdf += specular;
        }
        lo += brdf * radiance(light_color, to_light.length()) * n_dot_l;
    }

    let color = Vec3::splat(params.ambient) * surface.albedo * surface.ao + lo;
    if params.tone_map { tone_map(color) } else { color }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn surface() -> Surface {
        Surface {
            position: Vec3::ZERO,
            normal: Vec3::Z,
            albedo: Vec3::new(0.8, 0.2, 0.2),
            metallic: 0.0,
            roughness: 0.5,
            ao: 1.0,
        }
    }

    #[test]
    fn constant_fresnel_is_f0_everywhere() {
        let f0 = Vec3::splat(0.04);
        for cos in [0.0, 0.3, 0.7, 1.0] {
            assert_eq!(fresnel(FresnelModel::Constant, cos, f0), f0);
        }
    }

    #[test]
    fn schlick_limits() {
        let f0 = Vec3::splat(0.04);
        assert!((fresnel(FresnelModel::Schlick, 0.0, f0) - Vec3::ONE).length() < EPS);
        assert!((fresnel(FresnelModel::Schlick, 1.0, f0) - f0).length() < EPS);
        let mid = fresnel(FresnelModel::Schlick, 0.5, f0).x;
        assert!(mid > 0.04 && mid < 1.0);
    }

    #[test]
    fn off_terms_are_one() {
        assert_eq!(distribution(NormalDistribution::Off, 0.3, 0.7), 1.0);
        assert_eq!(geometry(GeometryTerm::Off, 0.2, 0.9, 0.5, 0.1), 1.0);
    }

    #[test]
    fn ggx_peak_for_rough_surface() {
        // alpha = 1 makes GGX uniform over the hemisphere.
        let d = distribution(NormalDistribution::GgxTrowbridgeReitz, 1.0, 1.0);
        assert!((d - 1.0 / PI).abs() < EPS);
        let d = distribution(NormalDistribution::GgxTrowbridgeReitz, 0.3, 1.0);
        assert!((d - 1.0 / PI).abs() < EPS);
    }

    #[test]
    fn distributions_peak_at_the_normal() {
        for ndf in [NormalDistribution::GgxTrowbridgeReitz, NormalDistribution::BlinnPhong] {
            let peak = distribution(ndf, 1.0, 0.4);
            let off_peak = distribution(ndf, 0.8, 0.4);
            assert!(peak > off_peak, "{ndf:?}");
        }
    }

    #[test]
    fn smith_is_one_head_on() {
        let g = geometry(GeometryTerm::SmithSchlickGgx, 1.0, 1.0, 1.0, 0.5);
        assert!((g - 1.0).abs() < EPS);
        let grazing = geometry(GeometryTerm::SmithSchlickGgx, 0.1, 1.0, 1.0, 0.5);
        assert!(grazing < g);
    }

    #[test]
    fn kelemen_head_on() {
        let g = geometry(GeometryTerm::Kelemen, 1.0, 1.0, 1.0, 0.5);
        assert!((g - 1.0).abs() < EPS);
    }

    #[test]
    fn no_lights_leaves_ambient() {
        let mut params = ShadingParams::default();
        params.tone_map = false;
        let s = surface();
        let color = shade(&params, &s, Vec3::new(0.0, 0.0, 3.0), &[]);
        assert!((color - s.albedo * params.ambient).length() < EPS);
    }

    #[test]
    fn toggling_contributions_removes_light() {
        let mut params = ShadingParams::default();
        params.tone_map = false;
        let s = surface();
        let eye = Vec3::new(0.0, 0.0, 3.0);
        let lights = [(Vec3::new(0.0, 5.0, 10.0), Vec3::splat(300.0))];

        let full = shade(&params, &s, eye, &lights);
        params.diffuse = false;
        let spec_only = shade(&params, &s, eye, &lights);
        params.specular = false;
        let ambient_only = shade(&params, &s, eye, &lights);

        assert!(full.x > spec_only.x);
        assert!(spec_only.x > ambient_only.x);
        assert!((ambient_only - s.albedo * params.ambient).length() < EPS);
    }

    #[test]
    fn light_behind_surface_contributes_nothing() {
        let mut params = ShadingParams::default();
        params.tone_map = false;
        let s = surface();
        let lit = shade(&params, &s, Vec3::new(0.0, 0.0, 3.0), &[(Vec3::new(0.0, -5.0, -5.0), Vec3::splat(100.0))]);
        assert!((lit - s.albedo * params.ambient).length() < EPS);
    }

    #[test]
    fn tone_map_stays_below_one() {
        assert_eq!(tone_map(Vec3::ZERO), Vec3::ZERO);
        let bright = tone_map(Vec3::splat(1000.0));
        assert!(bright.x < 1.0 && bright.x > 0.99);
        assert!(tone_map(Vec3::splat(0.5)).x < tone_map(Vec3::splat(2.0)).x);
    }
}
