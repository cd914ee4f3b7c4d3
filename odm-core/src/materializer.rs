// odm-core/src/materializer.rs
//! Fetch, patch, persist: materializes single library files.

use std::collections::HashSet;
use std::path::PathBuf;

use odm_aio::LocalStore;
use odm_common::config::{validate_include_directive, Config};
use odm_common::dependency::DependencyTable;
use odm_common::error::Result;
use odm_common::model::RelativePath;
use odm_net::transport::{transport_for, Transport};
use tracing::{debug, info};

use crate::patch::ContentPatcher;

/// Paths already entered during one top-level request. A path seen twice is
/// treated as satisfied, which keeps self-referential dependency tables and
/// looping listings from recursing forever.
#[derive(Debug, Default)]
pub(crate) struct Walk {
    pub(crate) files: HashSet<RelativePath>,
    pub(crate) dirs: HashSet<RelativePath>,
}

/// The process-wide context: configuration, transport, dependency table and
/// local store. Construct one at startup and hand it to whatever resolver
/// hook the host offers.
///
/// Everything is synchronous and blocking. Nothing is locked; driving one
/// library root from several threads or processes at once is the caller's
/// problem.
pub struct Materializer {
    pub(crate) config: Config,
    pub(crate) transport: Box<dyn Transport>,
    pub(crate) table: DependencyTable,
    pub(crate) store: LocalStore,
    pub(crate) patcher: ContentPatcher,
}

impl Materializer {
    /// Builds the context with the transport named in `config`.
    pub fn from_config(config: Config) -> Result<Self> {
        let transport = transport_for(config.transport)?;
        Self::new(config, transport)
    }

    pub fn new(config: Config, transport: Box<dyn Transport>) -> Result<Self> {
        validate_include_directive(&config.include_directive)?;
        let table = config.dependency_table()?;
        Ok(Self::with_table(config, transport, table))
    }

    /// Uses `table` instead of the one derived from `config`.
    pub fn with_table(config: Config, transport: Box<dyn Transport>, table: DependencyTable) -> Self {
        let store = LocalStore::new(config.local_root.clone());
        let patcher = ContentPatcher::new(config.include_directive.as_bytes().to_vec());
        debug!(
            "Materializer ready: root={}, remote={}{}, {} dependency entries",
            config.local_root.display(),
            config.remote_base_url,
            config.source_version,
            table.len()
        );
        Self {
            config,
            transport,
            table,
            store,
            patcher,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn dependency_table(&self) -> &DependencyTable {
        &self.table
    }

    pub fn local_path(&self, path: &RelativePath) -> PathBuf {
        self.store.local_path(path)
    }

    /// Makes sure `path` and its declared dependency closure exist locally.
    ///
    /// A file already on disk is trusted as-is and costs no network call.
    /// Otherwise it is fetched, its include directives disabled, and staged;
    /// the staged bytes only become visible once every declared dependency
    /// has been materialized. A failed dependency leaves nothing behind for
    /// `path` itself.
    pub fn ensure_local(&self, path: &RelativePath) -> Result<()> {
        self.ensure_local_in(path, &mut Walk::default())
    }

    pub(crate) fn ensure_local_in(&self, path: &RelativePath, walk: &mut Walk) -> Result<()> {
        if self.store.exists(path) {
            debug!("{} already materialized", path);
            return Ok(());
        }
        if !walk.files.insert(path.clone()) {
            debug!("{} is already being materialized further up", path);
            return Ok(());
        }

        let url = self.config.remote_url(path);
        debug!("Fetching {} from {}", path, url);
        let raw = self.transport.fetch(&url)?;
        let patched = self.patcher.neutralize(&raw);

        self.store.ensure_parent_dir(path)?;
        let staged = self.store.stage(path, &patched)?;

        // `staged` is dropped (and discarded) if this fails.
        self.resolve_dependencies_in(path, walk)?;

        staged.commit()?;
        info!("Materialized {}", path);
        Ok(())
    }
}
