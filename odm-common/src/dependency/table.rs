// odm-common/src/dependency/table.rs
use std::collections::HashMap;

use tracing::debug;

use super::definition::DependencyTarget;
use crate::error::Result;
use crate::model::RelativePath;

/// Files of the upstream tree that load siblings at runtime without going
/// through the class resolver, and what they need next to them.
const BUILTIN_DEPENDENCIES: &[(&str, &[&str])] = &[
    (
        "Zend/Layout.php",
        &["Zend/Filter/Word", "Zend/Filter/StringToLower.php"],
    ),
    ("Zend/View.php", &["Zend/View"]),
    ("Zend/Controller/Action.php", &["Zend/Controller/Action/Helper"]),
];

/// Static mapping from a library file to the files and directory subtrees
/// it requires. Built once; never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct DependencyTable {
    entries: HashMap<RelativePath, Vec<DependencyTarget>>,
}

impl DependencyTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The table shipped with odm.
    pub fn builtin(extension: &str) -> Result<Self> {
        Self::from_entries(
            BUILTIN_DEPENDENCIES
                .iter()
                .map(|(file, deps)| (file.to_string(), deps.iter().map(|d| d.to_string()).collect())),
            extension,
        )
    }

    /// Builds a table from `(file, [targets])` pairs. A later pair for the
    /// same file replaces the earlier one.
    pub fn from_entries<I>(entries: I, extension: &str) -> Result<Self>
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let mut table = HashMap::new();
        for (file, deps) in entries {
            let key = RelativePath::new(&file)?;
            let targets = deps
                .iter()
                .map(|d| DependencyTarget::parse(d, extension))
                .collect::<Result<Vec<_>>>()?;
            debug!("Dependency table: {} -> {} target(s)", key, targets.len());
            table.insert(key, targets);
        }
        Ok(Self { entries: table })
    }

    /// Returns a new table with `other`'s entries layered over this one.
    pub fn merged(mut self, other: DependencyTable) -> Self {
        self.entries.extend(other.entries);
        self
    }

    /// Declared targets for `path`, in declaration order.
    pub fn get(&self, path: &RelativePath) -> &[DependencyTarget] {
        self.entries.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by file path.
    pub fn iter_sorted(&self) -> Vec<(&RelativePath, &[DependencyTarget])> {
        let mut all: Vec<_> = self
            .entries
            .iter()
            .map(|(k, v)| (k, v.as_slice()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(b.0));
        all
    }
}
