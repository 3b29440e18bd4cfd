use std::path::{Path, PathBuf};

/// Fatal errors for a recursive conversion pass.
#[derive(Debug, thiserror::Error)]
pub enum PassError {
    #[error("recipe source root does not exist: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("traverse recipe tree at {}", path.display())]
    Traversal {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("write recipes index: {}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PassError {
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Wrap a walk error, attributing it to the failing entry when walkdir knows it.
    pub fn traversal(root: &Path, source: walkdir::Error) -> Self {
        let path = source.path().unwrap_or(root).to_path_buf();
        Self::Traversal { path, source }
    }

    pub fn persist(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persist {
            path: path.into(),
            source,
        }
    }
}

/// Not fatal: the pass records it and moves on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct ConversionFailure {
    pub reason: String,
}

impl ConversionFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<anyhow::Error> for ConversionFailure {
    fn from(err: anyhow::Error) -> Self {
        Self::new(format!("{err:#}"))
    }
}
