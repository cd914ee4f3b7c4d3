use clap::Args;
use colored::Colorize;
use odm_common::config::Config;
use odm_common::error::Result;
use odm_common::model::RelativePath;
use odm_core::Materializer;
use tracing::debug;

#[derive(Args, Debug)]
pub struct Fetch {
    /// Library-relative file paths, e.g. Zend/View.php
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<RelativePath>,
}

impl Fetch {
    pub fn run(&self, config: &Config) -> Result<()> {
        let materializer = Materializer::from_config(config.clone())?;
        for path in &self.paths {
            debug!("Ensuring {} is local", path);
            materializer.ensure_local(path)?;
            println!(
                "{} {} -> {}",
                "✓".green(),
                path,
                materializer.local_path(path).display()
            );
        }
        Ok(())
    }
}
