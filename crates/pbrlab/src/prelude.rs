//! Convenience re-exports for the demo binaries.
//!
//! ```ignore
//! use pbrlab::prelude::*;
//! ```

pub use crate::app::{DemoState, PanelAction, run};
pub use crate::config::{DemoConfig, DemoVariant};
pub use crate::error::DemoError;
pub use crate::lights::LightMotion;
pub use crate::logging;
pub use crate::mesh::ShapeKind;
pub use crate::shading::{FresnelModel, GeometryTerm, NormalDistribution, ShadingParams};
