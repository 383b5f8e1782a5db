//! # pbrlab: Physically Based Shading Playground
//!
//! Interactive demos that light spheres, surfaces of revolution and loaded
//! models with a Cook-Torrance BRDF, next to an egui panel for every term of
//! the model.
//!
//! The shape generators, shading parameters, light motion and CPU reference
//! BRDF do not touch the GPU and are tested directly. The window, wgpu and
//! egui glue sits in [`window`], [`render`], [`render3d`] and [`overlay`].
//!
//! Start with `use pbrlab::prelude::*` and call [`app::run`] with a
//! [`DemoConfig`](config::DemoConfig).

pub mod app;
pub mod assets;
pub mod camera;
pub mod config;
pub mod error;
pub mod grid;
pub mod input;
pub mod lights;
pub mod logging;
pub mod mesh;
pub mod overlay;
pub mod prelude;
pub mod render;
pub mod render3d;
pub mod shading;
pub mod time;

mod window;

#[cfg(feature = "hot-reload")]
pub mod asset;
