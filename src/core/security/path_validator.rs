use std::io;
use std::path::{Component, Path, PathBuf};

use crate::core::config::SecurityConfig;

/// Errors that can occur during path validation
#[derive(Debug, thiserror::Error)]
pub enum PathSecurityError {
    #[error("Path '{path}' is outside allowed root directory '{root}'")]
    OutsideRootDirectory { path: PathBuf, root: PathBuf },

    #[error("Symlink '{path}' points outside allowed root directory")]
    SymlinkOutsideRoot { path: PathBuf },

    #[error("Symlinks are not allowed: '{path}'")]
    SymlinkNotAllowed { path: PathBuf },

    #[error("Path does not exist: '{path}'")]
    PathNotFound { path: PathBuf },

    #[error("Path '{path}' does not name a file")]
    NotAFileName { path: PathBuf },

    #[error("IO error for path '{path}': {error}")]
    IoError { path: PathBuf, error: io::Error },
}

/// Validate a path that must already exist, such as an import source.
///
/// Returns the canonical path. With a root configured, the canonical path
/// must lie inside it; symlinks are refused when the configuration
/// disallows them.
pub fn validate_existing_path(
    input_path: &str,
    security: &SecurityConfig,
) -> Result<PathBuf, PathSecurityError> {
    let path = Path::new(input_path);

    if path.symlink_metadata().is_err() {
        return Err(PathSecurityError::PathNotFound {
            path: path.to_path_buf(),
        });
    }

    check_symlink(path, security)?;
    let canonical = canonicalize(path)?;
    check_within_root(&canonical, security)?;
    Ok(canonical)
}

/// Validate a path that is about to be written, such as an export target.
///
/// The parent directory must exist and pass the same checks as
/// [`validate_existing_path`]; the final component must be a plain file
/// name. An existing target is checked too, so a symlink cannot redirect
/// the write.
pub fn validate_output_path(
    input_path: &str,
    security: &SecurityConfig,
) -> Result<PathBuf, PathSecurityError> {
    let path = Path::new(input_path);

    let file_name = match path.components().next_back() {
        Some(Component::Normal(name)) => name.to_owned(),
        _ => {
            return Err(PathSecurityError::NotAFileName {
                path: path.to_path_buf(),
            });
        }
    };

    if path.symlink_metadata().is_ok() {
        return validate_existing_path(input_path, security);
    }

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let parent_str = parent.to_string_lossy();
    let canonical_parent = validate_existing_path(&parent_str, security)?;
    Ok(canonical_parent.join(file_name))
}

fn check_symlink(path: &Path, security: &SecurityConfig) -> Result<(), PathSecurityError> {
    if !path.is_symlink() {
        return Ok(());
    }
    if !security.allow_symlinks {
        return Err(PathSecurityError::SymlinkNotAllowed {
            path: path.to_path_buf(),
        });
    }
    if let Some(root) = canonical_root(security)? {
        let target = canonicalize(path).map_err(|_| PathSecurityError::SymlinkOutsideRoot {
            path: path.to_path_buf(),
        })?;
        if !target.starts_with(&root) {
            return Err(PathSecurityError::SymlinkOutsideRoot {
                path: path.to_path_buf(),
            });
        }
    }
    Ok(())
}

fn check_within_root(canonical: &Path, security: &SecurityConfig) -> Result<(), PathSecurityError> {
    let Some(root) = canonical_root(security)? else {
        return Ok(());
    };
    if canonical.starts_with(&root) {
        Ok(())
    } else {
        Err(PathSecurityError::OutsideRootDirectory {
            path: canonical.to_path_buf(),
            root,
        })
    }
}

fn canonical_root(security: &SecurityConfig) -> Result<Option<PathBuf>, PathSecurityError> {
    security
        .root_path
        .as_ref()
        .map(|root| {
            root.canonicalize().map_err(|e| PathSecurityError::IoError {
                path: root.clone(),
                error: e,
            })
        })
        .transpose()
}

fn canonicalize(path: &Path) -> Result<PathBuf, PathSecurityError> {
    path.canonicalize().map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            PathSecurityError::PathNotFound {
                path: path.to_path_buf(),
            }
        } else {
            PathSecurityError::IoError {
                path: path.to_path_buf(),
                error: e,
            }
        }
    })
}
