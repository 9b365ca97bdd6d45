use std::path::PathBuf;
use thiserror::Error;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum PrepError {
    #[error("Could not access '{}': {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: BoxedSource,
    },

    #[error("Station at position {index} has no '{key}' field")]
    KeyMissing { index: usize, key: &'static str },
}

impl PrepError {
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PrepError::FileAccess {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: impl Into<BoxedSource>) -> Self {
        PrepError::Parse {
            path: path.into(),
            source: source.into(),
        }
    }
}
