use std::io;
use std::path::PathBuf;
use std::process;
#[macro_use]
extern crate log;

use clap::Parser;

mod features;
use features::{ExpenseStore, Menu, SessionEnd};

/// Keep track of personal expenses, per user and per category
#[derive(Parser, Debug)]
#[clap(version, about)]
struct Args {
    /// File the expenses are loaded from and saved to
    #[clap(
        short = 'f',
        long,
        env = "EXPENSE_DATA_FILE",
        default_value = "expense_data.txt",
        parse(from_os_str)
    )]
    data_file: PathBuf,

    /// Start with an empty store instead of reading the data file
    #[clap(long)]
    no_load: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    match run(args) {
        Ok(end) => process::exit(exit_code(end)),
        Err(e) => {
            error!("{e:#}");
            process::exit(1);
        }
    }
}

fn exit_code(end: SessionEnd) -> i32 {
    match end {
        SessionEnd::Exited => 0,
        SessionEnd::SaveFailed => 1,
    }
}

fn run(args: Args) -> anyhow::Result<SessionEnd> {
    let mut store = ExpenseStore::new();

    if args.no_load {
        info!("Skipping {}", args.data_file.display());
    } else if let Err(e) = store.load(&args.data_file) {
        warn!("{e}");
        eprintln!("Error loading data from file: {e}");
    }
    debug!("Starting with {} expenses", store.record_count());

    let stdin = io::stdin();
    let stdout = io::stdout();
    Menu::new(stdin.lock(), stdout.lock(), args.data_file).run(&mut store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(&["-f", "mine.txt"] => (PathBuf::from("mine.txt"), false) ; "short flag")]
    #[test_case(&["--data-file", "a/b.txt"] => (PathBuf::from("a/b.txt"), false) ; "long flag")]
    #[test_case(&["--no-load", "-f", "x.txt"] => (PathBuf::from("x.txt"), true) ; "no load")]
    fn parses_flags(flags: &[&str]) -> (PathBuf, bool) {
        let argv = std::iter::once("expense-tracker").chain(flags.iter().copied());
        let args = Args::try_parse_from(argv).unwrap();
        (args.data_file, args.no_load)
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(Args::try_parse_from(["expense-tracker", "--bogus"]).is_err());
    }

    // The only test touching the process environment.
    #[test]
    fn data_file_falls_back_to_env_then_default() {
        std::env::remove_var("EXPENSE_DATA_FILE");
        let args = Args::try_parse_from(["expense-tracker"]).unwrap();
        assert_eq!(args.data_file, PathBuf::from("expense_data.txt"));
        assert!(!args.no_load);

        std::env::set_var("EXPENSE_DATA_FILE", "from_env.txt");
        let from_env = Args::try_parse_from(["expense-tracker"]).unwrap();
        let overridden = Args::try_parse_from(["expense-tracker", "-f", "flag.txt"]).unwrap();
        std::env::remove_var("EXPENSE_DATA_FILE");

        assert_eq!(from_env.data_file, PathBuf::from("from_env.txt"));
        assert_eq!(overridden.data_file, PathBuf::from("flag.txt"));
    }

    #[test_case(SessionEnd::Exited => 0)]
    #[test_case(SessionEnd::SaveFailed => 1)]
    fn session_end_maps_to_exit_code(end: SessionEnd) -> i32 {
        exit_code(end)
    }
}
