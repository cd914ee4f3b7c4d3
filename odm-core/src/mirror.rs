// odm-core/src/mirror.rs
//! Recursive mirroring of whole upstream directories.

use odm_aio::list_directory_entries;
use odm_common::config::RemoteLocation;
use odm_common::error::Result;
use odm_common::model::{ListingEntry, RelativePath};
use odm_net::listing::parse_index;
use tracing::debug;

use crate::materializer::{Materializer, Walk};

impl Materializer {
    /// Materializes every file below `dir`.
    ///
    /// When the upstream tree is a local checkout the directory is read
    /// straight from disk; otherwise the remote HTML index is fetched and
    /// parsed.
    pub fn mirror_dir(&self, dir: &RelativePath) -> Result<()> {
        self.mirror_dir_in(dir, &mut Walk::default())
    }

    pub(crate) fn mirror_dir_in(&self, dir: &RelativePath, walk: &mut Walk) -> Result<()> {
        if !walk.dirs.insert(dir.clone()) {
            debug!("{}/ already mirrored in this request", dir);
            return Ok(());
        }
        self.store.ensure_dir(dir)?;

        let entries = self.list_remote_dir(dir)?;
        debug!("{}/ lists {} entries", dir, entries.len());

        for entry in entries {
            let child = dir.join(&entry.name)?;
            if entry.is_dir {
                self.mirror_dir_in(&child, walk)?;
            } else {
                self.ensure_local_in(&child, walk)?;
            }
        }
        Ok(())
    }

    fn list_remote_dir(&self, dir: &RelativePath) -> Result<Vec<ListingEntry>> {
        match self.config.remote_location(dir) {
            RemoteLocation::Local(source) if source.is_dir() => {
                debug!("Listing local source {}", source.display());
                list_directory_entries(&source)
            }
            _ => {
                let url = self.config.remote_url(dir);
                debug!("Fetching index {}", url);
                let raw = self.transport.fetch(&url)?;
                Ok(parse_index(&raw, &self.config.file_extension))
            }
        }
    }
}
