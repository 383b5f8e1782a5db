//! Textured: PBR texture sets on spheres and a textured car model.
//!
//! Set `PBRLAB_CONFIG` to a JSON file to override any default.

use pbrlab::prelude::*;

fn main() {
    logging::init();

    let result = DemoConfig::from_env(DemoVariant::Textured)
        .map_err(DemoError::from)
        .and_then(run);
    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}
