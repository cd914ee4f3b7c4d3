// odm-common/src/model/path.rs
//! Slash-separated module paths relative to the library root.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{OdmError, Result};

/// A normalized, slash-separated path such as `Zend/View/Helper.php`.
///
/// The same value addresses a file on the remote source tree, its local
/// mirror, and its entry in the dependency table. Two paths compare equal
/// iff their normalized strings are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath(String);

impl RelativePath {
    /// Normalizes `raw`: backslashes become `/`, empty and `.` segments are
    /// dropped. Parent references are rejected so a path can never escape
    /// the local root.
    pub fn new(raw: &str) -> Result<Self> {
        let unified = raw.replace('\\', "/");
        let mut segments = Vec::new();
        for segment in unified.split('/') {
            match segment {
                "" | "." => continue,
                ".." => {
                    return Err(OdmError::InvalidPath(
                        raw.to_string(),
                        "parent references are not allowed".to_string(),
                    ))
                }
                s => segments.push(s),
            }
        }
        if segments.is_empty() {
            return Err(OdmError::InvalidPath(
                raw.to_string(),
                "path is empty".to_string(),
            ));
        }
        Ok(Self(segments.join("/")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Appends a single listing entry name.
    pub fn join(&self, name: &str) -> Result<Self> {
        Self::new(&format!("{}/{}", self.0, name))
    }

    /// Last path segment.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    pub fn parent(&self) -> Option<Self> {
        self.0
            .rsplit_once('/')
            .map(|(parent, _)| Self(parent.to_string()))
    }

    /// A path names a directory when it carries no file-extension marker.
    pub fn is_directory(&self, extension: &str) -> bool {
        !is_file_name(&self.0, extension)
    }

    /// Location of this path under `root` on the local filesystem.
    pub fn to_local(&self, root: &Path) -> PathBuf {
        self.0
            .split('/')
            .fold(root.to_path_buf(), |acc, segment| acc.join(segment))
    }
}

/// Whether `name` contains the extension marker (e.g. `.php`).
pub fn is_file_name(name: &str, extension: &str) -> bool {
    name.contains(extension)
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RelativePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for RelativePath {
    type Err = OdmError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}
