use std::{
    fmt,
    io::{Error, ErrorKind},
    path::PathBuf,
};

#[derive(Debug)]
pub enum FailureListError {
    IoError(Error),
    WriteError { path: PathBuf, source: Error },
    RemoveError { path: PathBuf, source: Error },
}

impl fmt::Display for FailureListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureListError::IoError(e) => write!(f, "{e}"),
            FailureListError::WriteError { path, source } => {
                write!(f, "cannot write {}: {}", path.display(), source)
            }
            FailureListError::RemoveError { path, source } => {
                write!(f, "cannot remove stale {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for FailureListError {}

impl From<Error> for FailureListError {
    fn from(err: Error) -> Self {
        FailureListError::IoError(err)
    }
}

/// What [`FailureListManager::persist`] did with the remainder file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persisted {
    Written(usize),
    RemovedStale,
    Untouched,
}

/// Owns the remainder file listing the lines that still need a retry.
pub struct FailureListManager {
    path: PathBuf,
}

impl FailureListManager {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Writes the failures newline-joined, overwriting older content. With no
    /// failures a remainder file left by a previous run is deleted instead.
    pub async fn persist(&self, failures: &[String]) -> Result<Persisted, FailureListError> {
        if failures.is_empty() {
            return self.clear().await;
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|source| FailureListError::WriteError {
                    path: self.path.clone(),
                    source,
                })?;
        }

        async_fs::write(&self.path, failures.join("\n"))
            .await
            .map_err(|source| FailureListError::WriteError {
                path: self.path.clone(),
                source,
            })?;
        Ok(Persisted::Written(failures.len()))
    }

    pub async fn clear(&self) -> Result<Persisted, FailureListError> {
        match async_fs::remove_file(&self.path).await {
            Ok(_) => Ok(Persisted::RemovedStale),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Persisted::Untouched),
            Err(source) => Err(FailureListError::RemoveError {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Reads the lines of an existing remainder file.
    pub async fn load(&self) -> Result<Vec<String>, FailureListError> {
        let content = async_fs::read_to_string(&self.path).await?;
        Ok(content.lines().map(str::to_string).collect())
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}
