//! `embedding-explorer [DATASET.json]`
//!
//! Without an argument the dataset is looked up through the standard
//! provider chain (`$EMBEDDINGS_DATA`, `./data.json`, `./sample_data.json`).

use std::path::{Path, PathBuf};

use embedding_explorer::{load_from_file, run_explorer, ExplorerConfig, ProviderChain, ViewSettings};

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let view = ViewSettings::load_from_default_path().unwrap_or_else(|e| {
        log::warn!("ignoring view settings: {}", e);
        ViewSettings::default()
    });
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let (initial, image_root) = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => match load_from_file(&path) {
            Ok(loaded) => (Some(loaded), path.parent().map(Path::to_path_buf)),
            Err(e) => {
                log::error!("cannot load {}: {}", path.display(), e);
                (None, Some(cwd))
            }
        },
        None => {
            let loaded = ProviderChain::standard(None, &cwd).load();
            if loaded.is_none() {
                log::info!("no dataset found; open or drop a .json file");
            }
            (loaded, Some(cwd))
        }
    };

    let cfg = ExplorerConfig {
        view,
        image_root,
        ..Default::default()
    };
    run_explorer(initial, cfg)
}
