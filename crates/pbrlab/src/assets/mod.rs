//! Loading assets from disk.
//!
//! Two kinds of files feed the demos. Texture maps go through [`image`]
//! (the `image` crate does the decoding) and a missing or corrupt map is
//! never fatal. Models go through [`model`] (`tobj` for OBJ, `gltf` for
//! glTF/GLB); a model that fails to load stops the demo, since nothing can
//! stand in for it.

pub mod image;
pub mod model;

pub use self::image::{DecodedImage, decode_image, load_or_placeholder};
pub use self::model::load_model;
