//! Command-line entry point for the nightdrive 3D scene viewer.

use std::path::Path;

use nightdrive::options::Options;
use nightdrive::Viewer;

fn main() {
    env_logger::init();

    // Usage: nightdrive [assets_dir] [options.toml]
    let assets_dir = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "assets/models".into());

    let options = match std::env::args().nth(2) {
        Some(path) => match Options::load(Path::new(&path)) {
            Ok(options) => options,
            Err(e) => {
                log::error!("failed to load options {path}: {e}");
                std::process::exit(1);
            }
        },
        None => Options::default(),
    };

    let viewer = Viewer::builder()
        .with_assets_dir(&assets_dir)
        .with_options(options)
        .build();

    if let Err(e) = viewer.run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
