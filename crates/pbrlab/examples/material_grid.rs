//! Material grid: seven by seven cylinders sweeping metallic (rows) and roughness (columns).
//!
//! Set `PBRLAB_CONFIG` to a JSON file to override any default.

use pbrlab::prelude::*;

fn main() {
    logging::init();

    let result = DemoConfig::from_env(DemoVariant::MaterialGrid)
        .map_err(DemoError::from)
        .and_then(run);
    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}
