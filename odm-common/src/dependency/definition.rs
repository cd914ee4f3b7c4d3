// odm-common/src/dependency/definition.rs
use std::fmt;

use crate::error::Result;
use crate::model::RelativePath;

/// Something a library file needs on disk before it is usable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DependencyTarget {
    /// Fetch exactly this file.
    File(RelativePath),
    /// Mirror the whole subtree.
    Directory(RelativePath),
}

impl DependencyTarget {
    /// Classifies `raw` by the extension marker: no marker means directory.
    pub fn parse(raw: &str, extension: &str) -> Result<Self> {
        let path = RelativePath::new(raw)?;
        if path.is_directory(extension) {
            Ok(Self::Directory(path))
        } else {
            Ok(Self::File(path))
        }
    }

    pub fn path(&self) -> &RelativePath {
        match self {
            Self::File(p) | Self::Directory(p) => p,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory(_))
    }
}

impl fmt::Display for DependencyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(p) => write!(f, "{p}"),
            Self::Directory(p) => write!(f, "{p}/"),
        }
    }
}
