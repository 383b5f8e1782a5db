//! # Render3d: PBR Scene Rendering
//!
//! Draws the instance grid and the light markers with a Cook-Torrance
//! shader. Everything here is GPU plumbing; the shading math and mesh
//! generation it draws live in [`crate::shading`] and [`crate::mesh`].
//!
//! ## Per-Frame Flow
//!
//! ```text
//! DemoState ── draw_list() ──► [DrawItem]          FrameUniforms
//!                                  │                    │
//!                                  ▼                    ▼
//!                        SceneRenderer::render(frame, uniforms, items, ...)
//!                          1. resize depth buffer if the surface changed
//!                          2. write camera, light and shading uniforms
//!                          3. upload missing meshes and texture sets
//!                          4. pack instance uniforms at aligned strides
//!                          5. one render pass, one draw per item
//! ```
//!
//! ## Modules
//!
//! - [`vertex`]: vertex layout and uniform structs, mirrored in `shader.wgsl`
//! - [`pipeline`]: bind group layouts, strip/list pipelines, depth buffer
//! - [`mesh`]: lazily uploaded GPU meshes, one slot per shape
//! - [`texture`]: lazily uploaded texture sets
//! - [`draw`]: [`SceneRenderer`], which ties the above together

pub mod draw;
pub mod mesh;
pub mod pipeline;
pub mod texture;
pub mod vertex;

pub use draw::{DrawItem, FrameUniforms, SceneRenderer};
pub use pipeline::SHADER_SOURCE;
pub use texture::TextureCatalog;
pub use vertex::{CameraUniform, InstanceUniform, LightUniform, ShadingUniform};
