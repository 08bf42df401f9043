use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HybridError {
    #[error("could not load {path:?}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("config error: {0}")]
    Config(String),
}
