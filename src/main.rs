use std::path::PathBuf;

use agenda_tools::config::AgendaConfig;
use agenda_tools::shell::Shell;
use agenda_tools::store::AgendaStore;
use agenda_tools::sync::{ExcelSync, ImportOutcome};
use agenda_tools::{Result, logging};
use clap::{ArgAction, Args, Parser};
use tracing::info;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    logging::init(cli.verbose)?;
    let config = AgendaConfig::load(cli.config.as_deref())?.with_database(cli.database);
    info!(database = %config.database.display(), "opening agenda");
    let mut store = AgendaStore::new(&config.database);

    let outcome = execute(&cli.action, &store, &config);
    store.close()?;
    outcome
}

fn execute(action: &Action, store: &AgendaStore, config: &AgendaConfig) -> Result<()> {
    let sync = ExcelSync::new(store);
    if let Some(path) = &action.export {
        let report = sync.export_to_excel(path)?;
        println!(
            "Exported {} contacts, {} events and {} tasks to {}",
            report.contacts,
            report.events,
            report.tasks,
            path.display()
        );
    } else if let Some(path) = &action.import {
        match sync.import_from_excel(path)? {
            ImportOutcome::MissingFile(path) => {
                println!("File {} not found; nothing imported", path.display())
            }
            ImportOutcome::Imported(report) => println!(
                "Imported {} new and {} updated contacts, {} events and {} tasks",
                report.contacts_added,
                report.contacts_updated,
                report.events_added,
                report.tasks_added
            ),
        }
    } else if let Some(path) = &action.template {
        sync.create_template(path)?;
        println!("Template created at {}", path.display());
    } else {
        Shell::new(store, config).run()?;
    }
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Personal agenda of contacts, events and tasks with Excel exchange."
)]
struct Cli {
    #[command(flatten)]
    action: Action,

    /// TOML file with database and workbook locations.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// SQLite database file; overrides the configuration.
    #[arg(long, value_name = "FILE", env = "AGENDA_DB")]
    database: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// One-shot operations. Without any of them the interactive menu starts.
#[derive(Args)]
#[group(multiple = false)]
struct Action {
    /// Export every record to an Excel workbook and exit.
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,

    /// Import records from an Excel workbook and exit.
    #[arg(long, value_name = "FILE")]
    import: Option<PathBuf>,

    /// Write an empty Excel template and exit.
    #[arg(long, value_name = "FILE")]
    template: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn action_flags_are_exclusive() {
        let result = Cli::try_parse_from(["agenda", "--export", "a.xlsx", "--import", "b.xlsx"]);
        assert!(result.is_err());
        let cli = Cli::try_parse_from(["agenda", "-vv", "--template", "t.xlsx"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.action.template, Some(PathBuf::from("t.xlsx")));
    }
}
