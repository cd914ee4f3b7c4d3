use clap::Args;
use colored::Colorize;
use odm_common::config::Config;
use odm_common::error::Result;
use odm_common::model::RelativePath;
use odm_core::Materializer;

#[derive(Args, Debug)]
pub struct Mirror {
    /// Library-relative directories, e.g. Zend/View
    #[arg(required = true, value_name = "DIR")]
    pub dirs: Vec<RelativePath>,
}

impl Mirror {
    pub fn run(&self, config: &Config) -> Result<()> {
        let materializer = Materializer::from_config(config.clone())?;
        for dir in &self.dirs {
            materializer.mirror_dir(dir)?;
            println!(
                "{} {}/ -> {}",
                "✓".green(),
                dir,
                materializer.local_path(dir).display()
            );
        }
        Ok(())
    }
}
