//! Pure path arithmetic.
//!
//! Nothing in this module touches the filesystem. Paths are compared
//! lexically: `.` and `..` are folded away, symlinks are not resolved.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Lexically normalizes `path`.
///
/// `.` components are dropped, `..` pops the previous normal component (and
/// is discarded at the root of an absolute path), repeated and trailing
/// separators collapse.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for comp in path.components() {
        match comp {
            Component::Prefix(_) | Component::RootDir => out.push(comp.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            Component::Normal(part) => out.push(part),
        }
    }

    out
}

/// Joins `rel` under `root`.
///
/// Absolute components inside `rel` are concatenated rather than replacing
/// `root`. If `rel` already lies under `root` it is returned normalized, so an
/// already resolved descendant can be passed through without doubling the root.
pub fn join_under(root: &Path, rel: &Path) -> PathBuf {
    if !rel.as_os_str().is_empty() && normalize(rel).starts_with(root) {
        return normalize(rel);
    }

    let mut joined = root.to_path_buf();
    for comp in rel.components() {
        match comp {
            Component::Prefix(_) | Component::RootDir => {}
            other => joined.push(other.as_os_str()),
        }
    }

    normalize(&joined)
}

/// Returns true if `candidate` lies at or under `base`.
///
/// Both paths are normalized first and compared component by component.
pub fn is_within(base: &Path, candidate: &Path) -> bool {
    normalize(candidate).starts_with(normalize(base))
}

/// Drops the final segment of `path` when it equals `dir_name`.
pub fn trim_dir_name_from_path(path: &Path, dir_name: &str) -> PathBuf {
    let path = normalize(path);
    if path.file_name() == Some(OsStr::new(dir_name)) {
        if let Some(parent) = path.parent() {
            return parent.to_path_buf();
        }
    }
    path
}

/// String prefix test on the raw path bytes.
///
/// Unlike [`Path::starts_with`] this matches partial segments, so
/// `output/tmp-abc` starts with `output/tmp-`.
pub fn starts_with_str(candidate: &Path, prefix: &Path) -> bool {
    candidate
        .as_os_str()
        .as_encoded_bytes()
        .starts_with(prefix.as_os_str().as_encoded_bytes())
}

/// Strips `prefix` from `candidate` as a string prefix.
///
/// Returns `candidate` unchanged when the prefix is absent or either path is
/// not valid UTF-8.
pub fn strip_path_prefix(candidate: &Path, prefix: &Path) -> PathBuf {
    match (candidate.to_str(), prefix.to_str()) {
        (Some(c), Some(p)) => c
            .strip_prefix(p)
            .map(PathBuf::from)
            .unwrap_or_else(|| candidate.to_path_buf()),
        _ => candidate.to_path_buf(),
    }
}
