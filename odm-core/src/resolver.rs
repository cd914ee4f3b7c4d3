// odm-core/src/resolver.rs
use odm_common::dependency::DependencyTarget;
use odm_common::error::{OdmError, Result};
use odm_common::model::RelativePath;
use tracing::{debug, error};

use crate::materializer::{Materializer, Walk};

impl Materializer {
    /// Materializes what the dependency table declares for `path`, in
    /// declaration order, depth-first. The first failure stops the rest and
    /// comes back as [`OdmError::Dependency`].
    pub fn resolve_dependencies(&self, path: &RelativePath) -> Result<()> {
        self.resolve_dependencies_in(path, &mut Walk::default())
    }

    pub(crate) fn resolve_dependencies_in(&self, path: &RelativePath, walk: &mut Walk) -> Result<()> {
        let targets = self.table.get(path);
        if targets.is_empty() {
            return Ok(());
        }
        debug!("{} declares {} dependencies", path, targets.len());

        for target in targets {
            let result = match target {
                DependencyTarget::Directory(dir) => self.mirror_dir_in(dir, walk),
                DependencyTarget::File(file) => self.ensure_local_in(file, walk),
            };
            if let Err(e) = result {
                error!("Dependency {} of {} failed: {}", target, path, e);
                return Err(OdmError::dependency(path.as_str(), target.to_string(), e));
            }
        }
        Ok(())
    }
}
