use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;
use std::path::{Component, Path, PathBuf};

use crate::error::PathResolutionError;

/// Host directory and the place it shows up inside the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMount {
    pub host_path: PathBuf,
    pub container_path: PathBuf,
}

/// Resolves the mount for one run.
///
/// Relative overrides are taken against `cwd`. The host side is always
/// normalized; `dest` is only made absolute and otherwise reaches the
/// runtime as written. Without `dest` the container sees the directory at
/// the same absolute path as the host.
pub fn resolve(
    source: Option<&OsStr>,
    dest: Option<&OsStr>,
    cwd: &Path,
) -> Result<ResolvedMount, PathResolutionError> {
    if !cwd.is_absolute() {
        return Err(PathResolutionError::RelativeCwd(cwd.display().to_string()));
    }
    let cwd = normalize(cwd);

    let host_path = match source {
        Some(src) => normalize(&cwd.join(checked("--src", src)?)),
        None => cwd.clone(),
    };

    // joining an absolute path replaces cwd
    let container_path = match dest {
        Some(dest) => cwd.join(checked("--dest", dest)?),
        None => host_path.clone(),
    };

    Ok(ResolvedMount {
        host_path,
        container_path,
    })
}

fn checked<'a>(
    flag: &'static str,
    value: &'a OsStr,
) -> Result<&'a Path, PathResolutionError> {
    if value.is_empty() {
        return Err(PathResolutionError::Empty(flag));
    }
    if value.as_bytes().contains(&0) {
        return Err(PathResolutionError::Nul(flag));
    }
    Ok(Path::new(value))
}

/// Lexically collapses `.` and `..` in an absolute path, clamping at `/`.
/// Symlinks are left alone.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::from("/");
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(part) => normalized.push(part),
        }
    }
    normalized
}
