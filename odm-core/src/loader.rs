// odm-core/src/loader.rs
//! The seam between a host's symbol resolution and the materializer.
//!
//! A host turns an unresolved name into a [`RelativePath`] through a
//! [`ModuleResolver`], then asks a [`Loader`] for the file.

use std::path::PathBuf;

use odm_common::config::Config;
use odm_common::error::Result;
use odm_common::model::RelativePath;
use tracing::debug;

use crate::materializer::Materializer;

/// Maps a symbolic module name to the file that defines it.
pub trait ModuleResolver {
    /// `None` when the name is not handled by this resolver.
    fn resolve(&self, name: &str) -> Option<RelativePath>;
}

/// A file handed to the host's code loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedModule {
    pub path: RelativePath,
    pub local_path: PathBuf,
    pub source: Vec<u8>,
}

pub trait Loader {
    fn ensure_local(&self, path: &RelativePath) -> Result<()>;

    /// Reads an already materialized file.
    fn read(&self, path: &RelativePath) -> Result<Vec<u8>>;

    fn local_path(&self, path: &RelativePath) -> PathBuf;

    /// Materializes `path` if needed and returns its contents.
    fn load(&self, path: &RelativePath) -> Result<LoadedModule> {
        self.ensure_local(path)?;
        Ok(LoadedModule {
            path: path.clone(),
            local_path: self.local_path(path),
            source: self.read(path)?,
        })
    }
}

impl Loader for Materializer {
    fn ensure_local(&self, path: &RelativePath) -> Result<()> {
        Materializer::ensure_local(self, path)
    }

    fn read(&self, path: &RelativePath) -> Result<Vec<u8>> {
        self.store.load(path)
    }

    fn local_path(&self, path: &RelativePath) -> PathBuf {
        Materializer::local_path(self, path)
    }
}

impl<L: Loader + ?Sized> Loader for &L {
    fn ensure_local(&self, path: &RelativePath) -> Result<()> {
        (**self).ensure_local(path)
    }

    fn read(&self, path: &RelativePath) -> Result<Vec<u8>> {
        (**self).read(path)
    }

    fn local_path(&self, path: &RelativePath) -> PathBuf {
        (**self).local_path(path)
    }
}

/// Underscore-separated class names to files: `Zend_View_Helper_Url`
/// becomes `Zend/View/Helper/Url.php`. Namespace separators map to
/// directories as well.
#[derive(Debug, Clone)]
pub struct ClassNameResolver {
    namespace_filter: Option<String>,
    extension: String,
}

impl ClassNameResolver {
    pub fn new(namespace_filter: Option<String>, extension: impl Into<String>) -> Self {
        Self {
            namespace_filter: namespace_filter.map(|f| f.to_lowercase()),
            extension: extension.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.namespace_filter.clone(), config.file_extension.clone())
    }
}

impl ModuleResolver for ClassNameResolver {
    fn resolve(&self, name: &str) -> Option<RelativePath> {
        if let Some(filter) = &self.namespace_filter {
            if !name.to_lowercase().contains(filter.as_str()) {
                return None;
            }
        }
        let file = format!("{}{}", name.replace('_', "/"), self.extension);
        RelativePath::new(&file).ok()
    }
}

/// Resolver plus loader: the callback a host registers for unresolved
/// names.
pub struct Autoloader<R, L> {
    resolver: R,
    loader: L,
}

impl<R: ModuleResolver, L: Loader> Autoloader<R, L> {
    pub fn new(resolver: R, loader: L) -> Self {
        Self { resolver, loader }
    }

    /// `Ok(None)` when the resolver does not handle `name`.
    pub fn autoload(&self, name: &str) -> Result<Option<LoadedModule>> {
        let Some(path) = self.resolver.resolve(name) else {
            debug!("'{}' is not handled by this autoloader", name);
            return Ok(None);
        };
        debug!("Autoloading '{}' from {}", name, path);
        self.loader.load(&path).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn underscores_become_directories() {
        let resolver = ClassNameResolver::new(Some("Zend".to_string()), ".php");
        assert_eq!(
            resolver.resolve("Zend_View_Helper_Url").unwrap().as_str(),
            "Zend/View/Helper/Url.php"
        );
        assert_eq!(resolver.resolve("Zend_View").unwrap().as_str(), "Zend/View.php");
        assert_eq!(
            resolver.resolve("Zend\\Db\\Adapter").unwrap().as_str(),
            "Zend/Db/Adapter.php"
        );
    }

    #[test]
    fn namespace_filter_is_case_insensitive() {
        let resolver = ClassNameResolver::new(Some("Zend".to_string()), ".php");
        assert!(resolver.resolve("ZEND_Log").is_some());
        assert!(resolver.resolve("My_Zend_Bridge").is_some());
        assert!(resolver.resolve("Doctrine_Orm").is_none());
    }

    #[test]
    fn no_filter_resolves_everything_valid() {
        let resolver = ClassNameResolver::new(None, ".php");
        assert_eq!(resolver.resolve("App_Model").unwrap().as_str(), "App/Model.php");
        assert!(resolver.resolve("App_.._etc_passwd").is_none());
    }
}
