use std::path::PathBuf;

use agenda_tools::calendar::workbook::{DEFAULT_OUTPUT, write_calendar_workbook};
use agenda_tools::calendar::{CALENDAR_YEAR, terminal};
use agenda_tools::{Result, logging};
use clap::{ArgAction, Parser, Subcommand};

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    logging::init(cli.verbose)?;
    match cli.command {
        Command::Print { year, no_color } => {
            print!("{}", terminal::render_year(year, !no_color));
            Ok(())
        }
        Command::Excel { year, output } => {
            write_calendar_workbook(&output, year)?;
            println!("Calendar written to {}", output.display());
            Ok(())
        }
    }
}

#[derive(Parser)]
#[command(author, version, about = "Month calendars in the terminal or as an Excel workbook.")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Print every month, highlighting weekends and holidays.
    Print {
        #[arg(long, default_value_t = CALENDAR_YEAR)]
        year: i32,

        /// Print without ANSI colours.
        #[arg(long)]
        no_color: bool,
    },
    /// Write a workbook with one sheet per month.
    Excel {
        #[arg(long, default_value_t = CALENDAR_YEAR)]
        year: i32,

        #[arg(long, short, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
    },
}
