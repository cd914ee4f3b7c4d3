use clap::Args;
use colored::Colorize;
use odm_common::config::Config;
use odm_common::error::Result;
use odm_common::model::RelativePath;
use prettytable::{format, Cell, Row, Table};

#[derive(Args, Debug)]
pub struct Deps {
    /// Only show the entry for this file
    #[arg(value_name = "PATH")]
    pub path: Option<RelativePath>,
}

impl Deps {
    pub fn run(&self, config: &Config) -> Result<()> {
        let dependency_table = config.dependency_table()?;

        let entries: Vec<_> = dependency_table
            .iter_sorted()
            .into_iter()
            .filter(|(file, _)| self.path.as_ref().map_or(true, |p| p == *file))
            .collect();

        if entries.is_empty() {
            match &self.path {
                Some(p) => println!("{}", format!("{p} declares no dependencies").yellow()),
                None => println!("{}", "Dependency table is empty".yellow()),
            }
            return Ok(());
        }

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
        table.add_row(Row::new(vec![
            Cell::new("File").style_spec("b"),
            Cell::new("Requires").style_spec("b"),
            Cell::new("Kind").style_spec("b"),
        ]));
        for (file, targets) in entries {
            for (i, target) in targets.iter().enumerate() {
                let shown = if i == 0 { file.to_string() } else { String::new() };
                let kind = if target.is_directory() { "directory" } else { "file" };
                table.add_row(Row::new(vec![
                    Cell::new(&shown),
                    Cell::new(target.path().as_str()),
                    Cell::new(kind),
                ]));
            }
        }
        table.printstd();
        Ok(())
    }
}
