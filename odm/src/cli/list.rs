use clap::Args;
use colored::Colorize;
use odm_common::config::Config;
use odm_common::error::{OdmError, Result};
use tracing::warn;
use walkdir::WalkDir;

#[derive(Args, Debug)]
pub struct List {
    /// Also list directories
    #[arg(long)]
    pub dirs: bool,
}

impl List {
    pub fn run(&self, config: &Config) -> Result<()> {
        let root = config.local_root();
        if !root.is_dir() {
            return Err(OdmError::NotFound(format!(
                "library root {} does not exist",
                root.display()
            )));
        }

        let mut count = 0usize;
        // Staged writes are hidden dotfiles; skip them and anything else hidden.
        let walker = WalkDir::new(root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !e.file_name().to_string_lossy().starts_with('.'));
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                    continue;
                }
            };
            let is_dir = entry.file_type().is_dir();
            if is_dir && !self.dirs {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(root)
                .unwrap_or(entry.path())
                .to_string_lossy()
                .replace('\\', "/");
            if is_dir {
                println!("{}", format!("{relative}/").blue());
            } else {
                println!("{relative}");
                count += 1;
            }
        }

        if count == 0 {
            println!("{}", "No files materialized yet".yellow());
        }
        Ok(())
    }
}
