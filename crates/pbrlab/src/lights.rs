//! # Lights: Point Light Rig and Motion Policy
//!
//! The demos light every scene with a fixed number of point lights (4 or 8)
//! placed in front of the instance grid. Each light keeps a *base* position,
//! derived from two scalars:
//!
//! ```text
//!            (0, d, depth)                  lights 4..8 sit on the
//!                 ●                          diagonals (±d, ±d, depth)
//! (-d, 0, depth) ●   ● (d, 0, depth)
//!                 ●
//!            (0, -d, depth)
//! ```
//!
//! Every frame [`LightRig::update`] derives the *displayed* position from the
//! base position, the elapsed time and the active [`LightMotion`]. Nothing is
//! written back into the base, so switching to [`LightMotion::Static`] always
//! restores the original layout.
//!
//! ## Enable Toggle
//!
//! Turning the lights off zeroes their colors and leaves positions alone.
//! The color picked in the overlay is cached so turning them back on
//! restores exactly what was there before.

use glam::{Quat, Vec3};

/// Upper bound on lights; matches the shader's fixed-size array.
pub const MAX_LIGHTS: usize = 8;

/// Lights `0..ORBITING_LIGHTS` orbit in the orbit modes; the rest translate.
pub const ORBITING_LIGHTS: usize = 4;

/// Oscillation angular frequency (rad/s) and amplitude (world units).
const OSCILLATION_FREQUENCY: f32 = 5.0;
const OSCILLATION_AMPLITUDE: f32 = 5.0;

/// Time-driven pattern applied to base light positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightMotion {
    #[default]
    Static,
    /// Side to side along X.
    Oscillate,
    /// Lights 0..4 orbit the vertical (Y) axis; the rest oscillate along X.
    OrbitHorizontal,
    /// Lights 0..4 orbit the horizontal (X) axis; the rest oscillate along Y.
    OrbitVertical,
}

impl LightMotion {
    pub fn label(self) -> &'static str {
        match self {
            LightMotion::Static => "static",
            LightMotion::Oscillate => "oscillate",
            LightMotion::OrbitHorizontal => "orbit horizontal",
            LightMotion::OrbitVertical => "orbit vertical",
        }
    }

    /// Displayed position of light `index` at `t` seconds.
    pub fn apply(self, base: Vec3, index: usize, t: f32, speed: f32) -> Vec3 {
        let swing = (t * OSCILLATION_FREQUENCY).sin() * OSCILLATION_AMPLITUDE;
        let angle = speed * t;
        let orbits = index < ORBITING_LIGHTS;
        match self {
            LightMotion::Static => base,
            LightMotion::Oscillate => base + speed * Vec3::new(swing, 0.0, 0.0),
            LightMotion::OrbitHorizontal if orbits => Quat::from_rotation_y(angle) * base,
            LightMotion::OrbitHorizontal => base + speed * Vec3::new(swing, 0.0, 0.0),
            LightMotion::OrbitVertical if orbits => Quat::from_rotation_x(angle) * base,
            LightMotion::OrbitVertical => base + speed * Vec3::new(0.0, swing, 0.0),
        }
    }
}

/// Base layout for `count` lights: axis-aligned cross first, then diagonals.
pub fn base_positions(count: usize, distance: f32, depth: f32) -> Vec<Vec3> {
    let d = distance;
    let layout = [
        Vec3::new(0.0, d, depth),
        Vec3::new(0.0, -d, depth),
        Vec3::new(d, 0.0, depth),
        Vec3::new(-d, 0.0, depth),
        Vec3::new(-d, d, depth),
        Vec3::new(d, d, depth),
        Vec3::new(-d, -d, depth),
        Vec3::new(d, -d, depth),
    ];
    layout.into_iter().take(count.min(MAX_LIGHTS)).collect()
}

/// A single point light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub base: Vec3,
    pub position: Vec3,
    pub color: Vec3,
}

/// Fixed-size set of point lights plus the controls that drive them.
#[derive(Debug, Clone)]
pub struct LightRig {
    lights: Vec<Light>,
    motion: LightMotion,
    speed: f32,
    distance: f32,
    depth: f32,
    enabled: bool,
    chosen_color: [f32; 3],
    intensity_scale: f32,
}

impl LightRig {
    /// `count` is clamped to `1..=MAX_LIGHTS`. Lights start enabled with
    /// `color · intensity_scale`.
    pub fn new(count: usize, distance: f32, depth: f32, color: [f32; 3], intensity_scale: f32) -> Self {
        let count = count.clamp(1, MAX_LIGHTS);
        let lit = Vec3::from(color) * intensity_scale;
        let lights = base_positions(count, distance, depth)
            .into_iter()
            .map(|base| Light {
                base,
                position: base,
                color: lit,
            })
            .collect();
        Self {
            lights,
            motion: LightMotion::Static,
            speed: 1.0,
            distance,
            depth,
            enabled: true,
            chosen_color: color,
            intensity_scale,
        }
    }

    pub fn with_motion(mut self, motion: LightMotion, speed: f32) -> Self {
        self.motion = motion;
        self.speed = speed;
        self
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn motion(&self) -> LightMotion {
        self.motion
    }

    pub fn set_motion(&mut self, motion: LightMotion) {
        self.motion = motion;
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    /// Regenerate every base position from new distance/depth scalars.
    pub fn set_layout(&mut self, distance: f32, depth: f32) {
        self.distance = distance;
        self.depth = depth;
        let bases = base_positions(self.lights.len(), distance, depth);
        for (light, base) in self.lights.iter_mut().zip(bases) {
            light.base = base;
            light.position = base;
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Off zeroes every color; on restores the last chosen color.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        let color = if enabled { self.lit_color() } else { Vec3::ZERO };
        for light in &mut self.lights {
            light.color = color;
        }
    }

    pub fn chosen_color(&self) -> [f32; 3] {
        self.chosen_color
    }

    /// Remember `color`; apply it to every light only while enabled.
    pub fn set_color(&mut self, color: [f32; 3]) {
        self.chosen_color = color;
        if self.enabled {
            let lit = self.lit_color();
            for light in &mut self.lights {
                light.color = lit;
            }
        }
    }

    fn lit_color(&self) -> Vec3 {
        Vec3::from(self.chosen_color) * self.intensity_scale
    }

    /// Recompute displayed positions for elapsed time `t`.
    pub fn update(&mut self, t: f32) {
        let (motion, speed) = (self.motion, self.speed);
        for (index, light) in self.lights.iter_mut().enumerate() {
            light.position = motion.apply(light.base, index, t, speed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMES: [f32; 6] = [0.0, 0.1, 0.77, 1.5, 12.25, 300.0];

    fn rig(count: usize) -> LightRig {
        LightRig::new(count, 10.0, 10.0, [300.0 / 255.0; 3], 255.0)
    }

    #[test]
    fn static_is_base_at_all_times() {
        for (i, base) in base_positions(8, 5.0, 10.0).into_iter().enumerate() {
            for t in TIMES {
                assert_eq!(LightMotion::Static.apply(base, i, t, 3.0), base);
            }
        }
    }

    #[test]
    fn orbit_preserves_distance_from_axis() {
        let bases = base_positions(8, 10.0, 10.0);
        for (i, &base) in bases.iter().enumerate().take(ORBITING_LIGHTS) {
            let radius_y = base.x.hypot(base.z);
            let radius_x = base.y.hypot(base.z);
            for t in TIMES {
                let h = LightMotion::OrbitHorizontal.apply(base, i, t, 0.7);
                assert!((h.x.hypot(h.z) - radius_y).abs() < 1e-3);
                assert!((h.y - base.y).abs() < 1e-4);

                let v = LightMotion::OrbitVertical.apply(base, i, t, 0.7);
                assert!((v.y.hypot(v.z) - radius_x).abs() < 1e-3);
                assert!((v.x - base.x).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn outer_lights_translate_in_orbit_modes() {
        let base = Vec3::new(-10.0, 10.0, 10.0);
        let t = 0.3;
        let swing = (t * 5.0f32).sin() * 5.0;
        let h = LightMotion::OrbitHorizontal.apply(base, 5, t, 2.0);
        assert_eq!(h, base + Vec3::new(2.0 * swing, 0.0, 0.0));
        let v = LightMotion::OrbitVertical.apply(base, 5, t, 2.0);
        assert_eq!(v, base + Vec3::new(0.0, 2.0 * swing, 0.0));
    }

    #[test]
    fn oscillation_matches_sine() {
        let base = Vec3::new(0.0, 5.0, 10.0);
        let p = LightMotion::Oscillate.apply(base, 0, 0.25, 1.0);
        assert!((p.x - (1.25f32).sin() * 5.0).abs() < 1e-6);
        assert_eq!((p.y, p.z), (5.0, 10.0));
    }

    #[test]
    fn first_four_bases_form_a_cross() {
        let bases = base_positions(4, 5.0, 10.0);
        assert_eq!(
            bases,
            vec![
                Vec3::new(0.0, 5.0, 10.0),
                Vec3::new(0.0, -5.0, 10.0),
                Vec3::new(5.0, 0.0, 10.0),
                Vec3::new(-5.0, 0.0, 10.0),
            ]
        );
    }

    #[test]
    fn count_is_fixed() {
        let mut lights = rig(8);
        lights.set_layout(3.0, 1.0);
        lights.set_motion(LightMotion::OrbitVertical);
        lights.update(4.0);
        lights.set_enabled(false);
        assert_eq!(lights.len(), 8);
        assert_eq!(rig(4).len(), 4);
        assert_eq!(rig(40).len(), MAX_LIGHTS);
    }

    #[test]
    fn switching_back_to_static_restores_layout() {
        let mut lights = rig(8);
        let before: Vec<_> = lights.lights().iter().map(|l| l.position).collect();
        lights.set_motion(LightMotion::OrbitHorizontal);
        lights.update(2.5);
        assert_ne!(lights.lights()[0].position, before[0]);
        lights.set_motion(LightMotion::Static);
        lights.update(2.6);
        let after: Vec<_> = lights.lights().iter().map(|l| l.position).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn toggle_round_trip_restores_color() {
        let mut lights = rig(4);
        let before: Vec<_> = lights.lights().iter().map(|l| l.color).collect();
        lights.set_enabled(false);
        assert!(lights.lights().iter().all(|l| l.color == Vec3::ZERO));
        lights.set_enabled(true);
        let after: Vec<_> = lights.lights().iter().map(|l| l.color).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn toggle_keeps_positions() {
        let mut lights = rig(4);
        lights.set_motion(LightMotion::Oscillate);
        lights.update(1.0);
        let positions: Vec<_> = lights.lights().iter().map(|l| l.position).collect();
        lights.set_enabled(false);
        let after: Vec<_> = lights.lights().iter().map(|l| l.position).collect();
        assert_eq!(positions, after);
    }

    #[test]
    fn color_edit_while_off_only_updates_cache() {
        let mut lights = rig(4);
        lights.set_enabled(false);
        lights.set_color([0.5, 0.5, 0.5]);
        assert!(lights.lights().iter().all(|l| l.color == Vec3::ZERO));
        lights.set_enabled(true);
        assert!(lights.lights().iter().all(|l| l.color == Vec3::splat(0.5 * 255.0)));
    }

    #[test]
    fn color_edit_while_on_applies_to_all() {
        let mut lights = rig(8);
        lights.set_color([1.0, 0.0, 0.0]);
        assert!(lights.lights().iter().all(|l| l.color == Vec3::new(255.0, 0.0, 0.0)));
    }
}
