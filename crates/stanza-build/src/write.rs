use std::path::{Path, PathBuf};

/// Name of the generated Dockerfile.
pub const DOCKERFILE: &str = "Dockerfile";
/// Name of the generated ignore file.
pub const DOCKERIGNORE: &str = ".dockerignore";

/// Writes `content` to `path`, creating missing parent directories.
///
/// An existing file is only replaced when `overwrite` is set. I/O failures
/// are returned as-is; nothing is retried.
pub fn write_file(path: &Path, content: &str, overwrite: bool) -> Result<PathBuf, WriteError> {
    if path.exists() && !overwrite {
        return Err(WriteError::AlreadyExists(path.to_path_buf()));
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| WriteError::CreateDir {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    std::fs::write(path, content).map_err(|e| WriteError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "file written");
    Ok(path.to_path_buf())
}

/// Writes `Dockerfile` into `dir`.
pub fn write_dockerfile(dir: &Path, content: &str, overwrite: bool) -> Result<PathBuf, WriteError> {
    write_file(&dir.join(DOCKERFILE), content, overwrite)
}

/// Writes `.dockerignore` into `dir` unless one is already there.
///
/// Returns `None` when an existing file was kept; a hand-edited ignore file
/// is never replaced.
pub fn write_dockerignore_if_absent(
    dir: &Path,
    content: &str,
) -> Result<Option<PathBuf>, WriteError> {
    let path = dir.join(DOCKERIGNORE);
    if path.exists() {
        tracing::warn!(path = %path.display(), "keeping existing .dockerignore");
        return Ok(None);
    }
    write_file(&path, content, false).map(Some)
}

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{0} already exists — pass --force to overwrite")]
    AlreadyExists(PathBuf),
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
