use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid model name '{0}': must not be blank or contain a path separator, '.', or ':'")]
    InvalidName(String),

    #[error("invalid archive entry: {0}")]
    InvalidEntry(String),

    #[error("sandbox escape: '{path}' resolves outside '{root}'")]
    SandboxEscape { path: PathBuf, root: PathBuf },

    #[error("failed to create directory '{path}': {source}")]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },

    #[error("failed to stage '{path}': {source}")]
    ExtractionFailed { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("no kws.table under '{0}'")]
    MissingTable(PathBuf),

    #[error("model file not found: '{0}'")]
    NotFound(PathBuf),
}

impl From<kwstage_fs::Error> for Error {
    fn from(err: kwstage_fs::Error) -> Self {
        match err {
            kwstage_fs::Error::Escape { path, root } => Self::SandboxEscape { path, root },
            kwstage_fs::Error::Remove { path, source } | kwstage_fs::Error::Create { path, source } => {
                Self::ExtractionFailed { path, source }
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn containment_failure_maps_to_sandbox_escape() {
        let err = Error::from(kwstage_fs::Error::Escape {
            path: PathBuf::from("/etc/passwd"),
            root: PathBuf::from("/tmp/stage"),
        });
        match err {
            Error::SandboxEscape { path, root } => {
                assert_eq!(path, Path::new("/etc/passwd"));
                assert_eq!(root, Path::new("/tmp/stage"));
            }
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[test]
    fn write_failures_map_to_extraction_failed() {
        let err = Error::from(kwstage_fs::Error::Create {
            path: PathBuf::from("/tmp/stage/kws.table"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        });
        assert!(matches!(err, Error::ExtractionFailed { .. }));
    }
}
