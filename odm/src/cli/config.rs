use clap::Args;
use colored::Colorize;
use odm_common::config::{config_file_path, Config};
use odm_common::error::Result;

#[derive(Args, Debug)]
pub struct ShowConfig;

impl ShowConfig {
    pub fn run(&self, config: &Config) -> Result<()> {
        let file = config_file_path()
            .filter(|p| p.is_file())
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string());

        let rows = [
            ("config file", file),
            ("local root", config.local_root.display().to_string()),
            ("remote base", config.remote_base_url.clone()),
            ("source version", config.source_version.clone()),
            ("transport", config.transport.to_string()),
            ("hook priority", config.hook_priority.to_string()),
            ("file extension", config.file_extension.clone()),
            ("include directive", config.include_directive.clone()),
            (
                "namespace filter",
                config.namespace_filter.clone().unwrap_or_else(|| "(any)".to_string()),
            ),
        ];
        for (key, value) in rows {
            println!("{:>18}  {}", key.bold(), value);
        }
        Ok(())
    }
}
