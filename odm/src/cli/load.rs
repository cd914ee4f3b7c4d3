use std::io::Write;

use clap::Args;
use colored::Colorize;
use odm_common::config::Config;
use odm_common::error::{OdmError, Result};
use odm_core::{Autoloader, ClassNameResolver, HookChain, Materializer};

#[derive(Args, Debug)]
pub struct Load {
    /// Module names, e.g. Zend_View_Helper_Url
    #[arg(required = true, value_name = "MODULE")]
    pub names: Vec<String>,

    /// Write the loaded source to stdout instead of its location
    #[arg(long)]
    pub print: bool,
}

impl Load {
    pub fn run(&self, config: &Config) -> Result<()> {
        let materializer = Materializer::from_config(config.clone())?;
        let mut hooks = HookChain::new();
        hooks.register(
            Autoloader::new(ClassNameResolver::from_config(config), &materializer),
            config.hook_priority,
        );

        for name in &self.names {
            let module = hooks
                .autoload(name)?
                .ok_or_else(|| OdmError::NotFound(format!("no autoload hook handles '{name}'")))?;
            if self.print {
                std::io::stdout().write_all(&module.source)?;
            } else {
                println!(
                    "{} {} -> {}",
                    "✓".green(),
                    name.bold(),
                    module.local_path.display()
                );
            }
        }
        Ok(())
    }
}
