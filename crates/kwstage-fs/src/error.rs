use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("path '{path}' escapes containment root '{root}'")]
    Escape { path: PathBuf, root: PathBuf },

    #[error("failed to remove '{path}': {source}")]
    Remove { path: PathBuf, source: io::Error },

    #[error("failed to create '{path}': {source}")]
    Create { path: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, Error>;
